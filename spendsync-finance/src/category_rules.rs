//! Deterministic category rules mapping statement descriptions to Spendee
//! categories and brand labels.
//!
//! Both tables are ordered and the first match wins. Keywords are compared
//! against the description lower-cased with whitespace removed, and several
//! are substrings of longer merchant names ("max", "jio"), so moving a rule
//! changes results.

use serde::{Deserialize, Serialize};
use spendsync_core::text::squash;
use spendsync_core::{Category, Direction};
use tracing::debug;

/// Secondary label picked once a rule's category has matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandLabel {
    pub keyword: String,
    pub label: String,
}

/// Keywords for one category, plus the brand labels recognised inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub labels: Vec<BrandLabel>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str], labels: &[(&str, &str)]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            labels: labels
                .iter()
                .map(|(keyword, label)| BrandLabel {
                    keyword: keyword.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    fn normalized(mut self) -> Self {
        self.keywords = self
            .keywords
            .iter()
            .map(|k| squash(k))
            .filter(|k| !k.is_empty())
            .collect();
        for l in &mut self.labels {
            l.keyword = squash(&l.keyword);
        }
        self.labels.retain(|l| !l.keyword.is_empty());
        self
    }

    fn matching_keyword(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }

    fn label_for(&self, text: &str) -> Option<String> {
        self.labels
            .iter()
            .find(|l| text.contains(l.keyword.as_str()))
            .map(|l| l.label.clone())
    }
}

/// Result of categorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorized {
    pub category: Category,
    pub label: Option<String>,
}

impl Categorized {
    fn plain(category: Category) -> Self {
        Self {
            category,
            label: None,
        }
    }
}

/// Ordered category table plus the recurring-payment ignore list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    ignore: Vec<String>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>, ignore: Vec<String>) -> Self {
        Self {
            rules: rules.into_iter().map(CategoryRule::normalized).collect(),
            ignore: ignore
                .iter()
                .map(|k| squash(k))
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Replace the category table, keeping the ignore list
    pub fn with_rules(self, rules: Vec<CategoryRule>) -> Self {
        Self::new(rules, self.ignore)
    }

    /// Replace the ignore list, keeping the category table
    pub fn with_ignore(self, ignore: Vec<String>) -> Self {
        Self::new(self.rules, ignore)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    /// Categorize a description.
    ///
    /// Priority: credit direction > category table > ignore list (SKIP) >
    /// Other. Credits never consult the keyword tables.
    pub fn categorize(&self, description: &str, direction: Direction) -> Categorized {
        if direction.is_credit() {
            return Categorized::plain(Category::INCOME_DEFAULT);
        }

        let text = squash(description);

        for rule in &self.rules {
            if let Some(keyword) = rule.matching_keyword(&text) {
                debug!(%description, keyword, category = %rule.category, "keyword match");
                return Categorized {
                    category: rule.category,
                    label: rule.label_for(&text),
                };
            }
        }

        if let Some(keyword) = self.ignore.iter().find(|k| text.contains(k.as_str())) {
            debug!(%description, keyword = keyword.as_str(), "recurring payment, skipping");
            return Categorized::plain(Category::Skip);
        }

        Categorized::plain(Category::Other)
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(default_rules(), default_ignore())
    }
}

/// Built-in category table, highest priority first
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            Category::FoodAndDrink,
            &[
                "veg", "zomato", "swiggy", "dominos", "pizza", "restaurant", "cafe", "food",
                "burger", "kfc", "mcdonald", "starbucks",
            ],
            &[("zomato", "Zomato"), ("swiggy", "Swiggy")],
        ),
        CategoryRule::new(
            Category::Groceries,
            &[
                "grofers", "freshivores", "blinkit", "samvrudhifamilysto", "lulu", "dmart",
                "reliancefresh", "more", "bigbasket", "bigbazaar", "grocery", "groceries",
                "supermarket", "dunzo", "zepto", "instamart",
            ],
            &[
                ("grofers", "Grofers"),
                ("freshivores", "Freshivores"),
                ("blinkit", "Blinkit"),
                ("samvrudhi", "Samvrudhi"),
                ("lulu", "Lulu"),
            ],
        ),
        CategoryRule::new(
            Category::Shopping,
            &[
                "amazon", "theindusvalley", "ravel", "sweetkaaramcoffee", "kushals", "littlejoy",
                "max", "lifestyle", "ikea", "meesho", "lenskart", "urbancompany", "flipkart",
                "myntra", "ajio", "shopping", "fashion",
            ],
            &[
                ("amazon", "Amazon"),
                ("theindusvalley", "TheIndusvalley"),
                ("ravel", "Ravel"),
                ("sweetkaaramcoffee", "Sweet Kaaram Coffee"),
                ("kushals", "kushals"),
                ("littlejoy", "Little Joy"),
                ("max", "Max"),
                ("lifestyle", "Lifestyle"),
                ("ikea", "IKEA"),
                ("meesho", "Meesho"),
                ("lenskart", "Lenskart"),
                ("urbancompany", "Urban Company"),
            ],
        ),
        CategoryRule::new(
            Category::Transport,
            &[
                "uber", "ola", "rapido", "metro", "petrol", "fuel", "parking", "bus", "taxi",
                "train",
            ],
            &[],
        ),
        CategoryRule::new(
            Category::BillsAndFees,
            &[
                "electricity", "water", "internet", "broadband", "wifi", "recharge", "airtel",
                "jio", "vodafone", "bsnl", "mobile", "bill",
            ],
            &[],
        ),
        CategoryRule::new(
            Category::Healthcare,
            &[
                "hospital", "medical", "doctor", "pharmacy", "chemist", "medicine", "apollo",
                "clinic", "health",
            ],
            &[],
        ),
        CategoryRule::new(
            Category::Education,
            &["school", "education", "books", "course", "tuition", "fees"],
            &[],
        ),
        CategoryRule::new(
            Category::Entertainment,
            &["movie", "cinema", "netflix", "prime", "hotstar", "spotify", "youtube"],
            &[],
        ),
        CategoryRule::new(
            Category::SportAndHobbies,
            &["gym", "fitness", "yoga", "sports"],
            &[],
        ),
        CategoryRule::new(Category::Beauty, &["salon", "beauty", "spa"], &[]),
    ]
}

/// Built-in recurring payments that are tracked elsewhere.
///
/// Person-to-person transfers belong in the user's config, not here.
pub fn default_ignore() -> Vec<String> {
    [
        "rent",
        "emi",
        "loan",
        "salary",
        "mygate",
        "gailgaslimited",
        "atriaconvergencetechnologieslimited",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debit(desc: &str) -> Categorized {
        CategoryRules::default().categorize(desc, Direction::Debit)
    }

    #[test]
    fn test_swiggy_is_food_with_label() {
        let cat = debit("PaidtoSwiggy");
        assert_eq!(cat.category, Category::FoodAndDrink);
        assert_eq!(cat.label.as_deref(), Some("Swiggy"));
    }

    #[test]
    fn test_generic_food_has_no_label() {
        let cat = debit("Hotel Saravana Veg");
        assert_eq!(cat.category, Category::FoodAndDrink);
        assert_eq!(cat.label, None);
    }

    #[test]
    fn test_spacing_and_case_do_not_matter() {
        assert_eq!(debit("BIG BASKET").category, Category::Groceries);
        assert_eq!(debit("Urban Company").label.as_deref(), Some("Urban Company"));
    }

    #[test]
    fn test_earlier_rule_wins() {
        // pizza (Food & Drink) outranks amazon (Shopping)
        let cat = debit("Amazon Pizza Voucher");
        assert_eq!(cat.category, Category::FoodAndDrink);
        assert_eq!(cat.label, None);
    }

    #[test]
    fn test_label_dispatch_inside_category() {
        // "veg" matches first, but the Zomato label still applies
        let cat = debit("Zomato Pure Veg Kitchen");
        assert_eq!(cat.category, Category::FoodAndDrink);
        assert_eq!(cat.label.as_deref(), Some("Zomato"));
    }

    #[test]
    fn test_credit_bypasses_keywords() {
        let rules = CategoryRules::default();
        let cat = rules.categorize("Swiggy refund", Direction::Credit);
        assert_eq!(cat.category, Category::Gifts);
        assert_eq!(cat.label, None);

        let cat = rules.categorize("Rent received", Direction::Credit);
        assert_eq!(cat.category, Category::Gifts);
    }

    #[test]
    fn test_recurring_is_skip() {
        assert_eq!(debit("PaidtoRent").category, Category::Skip);
        assert_eq!(debit("MyGate maintenance").category, Category::Skip);
    }

    #[test]
    fn test_category_keywords_outrank_ignore_list() {
        // "premium" contains "emi" but the cafe keyword is checked first
        assert_eq!(debit("Premium Cafe").category, Category::FoodAndDrink);
        assert_eq!(debit("Wellness Chemist").category, Category::Healthcare);
    }

    #[test]
    fn test_short_keywords_are_built_in() {
        assert_eq!(debit("PaidtoOla").category, Category::Transport);
        assert_eq!(debit("Paid to Water Board").category, Category::BillsAndFees);
        assert_eq!(debit("KSRTC Bus").category, Category::Transport);
        assert_eq!(debit("More Retail").category, Category::Groceries);
        assert_eq!(debit("Lotus Spa").category, Category::Beauty);
    }

    #[test]
    fn test_unknown_is_other() {
        let cat = debit("JohnDoe");
        assert_eq!(cat.category, Category::Other);
        assert_eq!(cat.label, None);
    }

    #[test]
    fn test_overrides_are_normalized() {
        let rules = CategoryRules::default()
            .with_rules(vec![CategoryRule::new(
                Category::Transport,
                &["Namma Yatri", "  "],
                &[("NAMMA YATRI", "Namma Yatri")],
            )])
            .with_ignore(vec!["Kanchana Murugesan".to_string()]);

        assert_eq!(rules.rules()[0].keywords, vec!["nammayatri"]);
        assert_eq!(rules.ignore(), ["kanchanamurugesan"]);

        let cat = rules.categorize("Paid to NammaYatri", Direction::Debit);
        assert_eq!(cat.category, Category::Transport);
        assert_eq!(cat.label.as_deref(), Some("Namma Yatri"));

        let cat = rules.categorize("KANCHANAMURUGESAN", Direction::Debit);
        assert_eq!(cat.category, Category::Skip);

        // The replaced table no longer knows Swiggy
        assert_eq!(rules.categorize("Swiggy", Direction::Debit).category, Category::Other);
    }

    #[test]
    fn test_rule_table_deserializes() {
        let json = r#"{"category":"Groceries","keywords":["nilgiris"],"labels":[{"keyword":"nilgiris","label":"Nilgiris"}]}"#;
        let rule: CategoryRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.category, Category::Groceries);
        assert_eq!(rule.labels[0].label, "Nilgiris");
    }
}
