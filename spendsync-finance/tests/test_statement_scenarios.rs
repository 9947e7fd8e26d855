use rust_decimal_macros::dec;
use spendsync_core::{Category, Direction, Period, Provider};
use spendsync_finance::{CategoryRules, Extraction, Pipeline, StatementSource};
use spendsync_ingest::ScanOptions;

fn run(month: u32, sources: &[StatementSource]) -> Extraction {
    Pipeline::new(
        Period::new(month, 2025).unwrap(),
        CategoryRules::default(),
        ScanOptions::default(),
    )
    .unwrap()
    .run(sources)
}

fn gpay(text: &str) -> StatementSource {
    StatementSource::new(Provider::GPay, text)
}

const SWIGGY: &str = "01Oct,2025\n05:04AM\nPaidtoSwiggy\n₹350\n";

#[test]
fn test_swiggy_scenario() {
    let out = run(10, &[gpay(SWIGGY)]);
    assert_eq!(out.records.len(), 1);

    let json = serde_json::to_value(&out.records[0]).unwrap();
    assert_eq!(json["date"], "01/10/2025");
    assert_eq!(json["merchant"], "Swiggy");
    assert_eq!(json["category"], "Food & Drink");
    assert_eq!(json["label"], "Swiggy");
    assert_eq!(json["amount"], "350");
    assert_eq!(json["currency"], "INR");
    assert_eq!(json["transaction_type"], "Expenses");
    assert_eq!(json["source"], "GPay");
}

#[test]
fn test_month_mismatch_is_empty() {
    let out = run(9, &[gpay(SWIGGY)]);
    assert!(out.is_empty());
}

#[test]
fn test_received_is_income_gift() {
    let out = run(10, &[gpay("02Oct,2025\n11:20AM\nReceivedfromJohnDoe\n₹5000\n")]);
    assert_eq!(out.records.len(), 1);
    let r = &out.records[0];
    assert_eq!(r.merchant, "JohnDoe");
    assert_eq!(r.direction, Direction::Credit);
    assert_eq!(r.category, Category::Gifts);
    assert_eq!(r.label, None);
    assert_eq!(r.amount, dec!(5000));
}

#[test]
fn test_rent_never_appears() {
    // Rent in first, middle and last position
    let text = "01Oct,2025\nPaidtoRent\n₹20,000\n02Oct,2025\nPaidtoSwiggy\n₹120\n03Oct,2025\nPaid to House Rent\n₹1\n04Oct,2025\nPaidtoZomato\n₹80\n05Oct,2025\nPaidtoRENT\n₹5\n";
    let out = run(10, &[gpay(text)]);
    let merchants: Vec<&str> = out.records.iter().map(|r| r.merchant.as_str()).collect();
    assert_eq!(merchants, vec!["Swiggy", "Zomato"]);
    assert_eq!(out.stats.skipped, 3);
}

#[test]
fn test_malformed_amount_drops_only_that_record() {
    let text = "01Oct,2025\nPaidtoSwiggy\n₹350\n02Oct,2025\nPaidtoBlinkit\n₹abc\n03Oct,2025\nPaidtoZepto\n₹99\n";
    let out = run(10, &[gpay(text)]);
    let merchants: Vec<&str> = out.records.iter().map(|r| r.merchant.as_str()).collect();
    assert_eq!(merchants, vec!["Swiggy", "Zepto"]);
    assert_eq!(out.stats.bad_amount, 1);
}

#[test]
fn test_out_of_period_never_appears() {
    let text = "30Sep,2025\nPaidtoSwiggy\n₹1\n01Oct,2025\nPaidtoSwiggy\n₹2\n01Nov,2025\nPaidtoSwiggy\n₹3\n31Oct,24\nPaidtoSwiggy\n₹4\n";
    let out = run(10, &[gpay(text)]);
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].amount, dec!(2));
}

#[test]
fn test_date_variants_normalize() {
    let text = "07Oct,2025\nPaidtoAlpha\n₹1\n08 Oct, 2025\nPaidtoBravo\n₹2\n09Oct,25\nPaidtoCharlie\n₹3\n";
    let out = run(10, &[gpay(text)]);
    let dates: Vec<String> = out.records.iter().map(|r| r.formatted_date()).collect();
    assert_eq!(dates, vec!["07/10/2025", "08/10/2025", "09/10/2025"]);
}

#[test]
fn test_food_keyword_outranks_shopping() {
    // "swiggy" (Food & Drink) and "amazon" (Shopping) in one description
    let out = run(10, &[gpay("04Oct,2025\nPaidtoAmazonSwiggyCombo\n₹499\n")]);
    assert_eq!(out.records[0].category, Category::FoodAndDrink);
    assert_eq!(out.records[0].label.as_deref(), Some("Swiggy"));
}

#[test]
fn test_pipeline_is_idempotent() {
    let sources = vec![
        gpay("05Oct,2025\nPaidtoUber\n₹90\n01Oct,2025\nPaidtoSwiggy\n₹350\n"),
        StatementSource::new(Provider::PhonePe, "Oct 03, 2025 Paid to Jio DEBIT ₹299\n"),
    ];
    let first = run(10, &sources);
    let second = run(10, &sources);
    assert_eq!(first, second);
    assert_eq!(first.records.len(), 3);
}

#[test]
fn test_cross_provider_order_is_stable() {
    let sources = vec![
        gpay("02Oct,2025\nPaidtoAlpha\n₹1\n01Oct,2025\nPaidtoBravo\n₹2\n"),
        StatementSource::new(
            Provider::PhonePe,
            "Oct 01, 2025 Paid to Charlie DEBIT ₹3\nOct 02, 2025 Paid to Delta DEBIT ₹4\n",
        ),
    ];
    let out = run(10, &sources);
    let merchants: Vec<&str> = out.records.iter().map(|r| r.merchant.as_str()).collect();
    assert_eq!(merchants, vec!["Bravo", "Charlie", "Alpha", "Delta"]);
}

#[test]
fn test_empty_text_is_not_an_error() {
    let out = run(10, &[gpay(""), StatementSource::new(Provider::PhonePe, "   \n\n")]);
    assert!(out.is_empty());
    assert_eq!(out.stats.fragments, 0);
}
