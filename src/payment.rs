// Payment due records and the values derived from them
//
// Identity: `id` + `created_at` (never change after creation)
// Values: title, amount, due date, category (replaced wholesale on update)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CATEGORY
// ============================================================================

/// Preset categories offered by the add form, plus free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Housing,
    Utilities,
    Transportation,
    Food,
    Healthcare,
    Other,
    Custom(String),
}

impl Category {
    /// Presets in the order the add form shows them
    pub const PRESETS: [Category; 6] = [
        Category::Housing,
        Category::Utilities,
        Category::Transportation,
        Category::Food,
        Category::Healthcare,
        Category::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Transportation => "Transportation",
            Category::Food => "Food",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
            Category::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Housing" => Category::Housing,
            "Utilities" => Category::Utilities,
            "Transportation" => Category::Transportation,
            "Food" => Category::Food,
            "Healthcare" => Category::Healthcare,
            "Other" => Category::Other,
            _ => Category::Custom(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(name) => name,
            preset => preset.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PAYMENT DUE
// ============================================================================

/// A stored payment obligation
///
/// Serialized with the camelCase field names of the `payment_dues` blob:
/// `{id, title, amount, dueDate, category, createdAt}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDue {
    /// Stable identity, generated on create
    pub id: String,

    pub title: String,

    pub amount: f64,

    /// `YYYY-Mon-D` as composed by the add form, or ISO `YYYY-MM-DD`
    pub due_date: String,

    pub category: Category,

    /// Set once on create, carried through every update
    pub created_at: DateTime<Utc>,
}

impl PaymentDue {
    /// Current editable values of this record
    pub fn fields(&self) -> PaymentFields {
        PaymentFields {
            title: self.title.clone(),
            amount: self.amount,
            due_date: self.due_date.clone(),
            category: self.category.clone(),
        }
    }

    /// Due date as a calendar date, when the stored text parses
    pub fn due_on(&self) -> Option<NaiveDate> {
        parse_due_date(&self.due_date)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_on().map(|due| due < today).unwrap_or(false)
    }
}

/// The caller-supplied part of a payment due (create and update input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFields {
    pub title: String,
    pub amount: f64,
    pub due_date: String,
    pub category: Category,
}

impl PaymentFields {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        due_date: impl Into<String>,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            due_date: due_date.into(),
            category: category.into(),
        }
    }

    /// Same checks the add form runs before saving
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if !self.amount.is_finite() {
            return Err("Amount must be a valid number".to_string());
        }
        if self.amount < 0.0 {
            return Err("Amount must not be negative".to_string());
        }
        if self.category.as_str().trim().is_empty() {
            return Err("Category is required".to_string());
        }
        if self.due_date.trim().is_empty() {
            return Err("Due date is required".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// DERIVED VALUES
// ============================================================================

/// Month abbreviations used when composing due dates
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Running total shown above the list
pub fn total_due(dues: &[PaymentDue]) -> f64 {
    dues.iter().map(|due| due.amount).sum()
}

/// Build the stored due-date string from picker values, e.g. `2025-Jan-5`
pub fn compose_due_date(year: i32, month_abbrev: &str, day: u32) -> String {
    format!("{}-{}-{}", year, month_abbrev, day)
}

/// Display form: `2025-Jan-5` -> `5/Jan/2025`
pub fn format_due_date(due_date: &str) -> String {
    if due_date.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = due_date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{}/{}/{}", day, month, year),
        _ => due_date.to_string(),
    }
}

/// Parse either `YYYY-MM-DD` or `YYYY-Mon-D`
pub fn parse_due_date(due_date: &str) -> Option<NaiveDate> {
    let trimmed = due_date.trim();

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%b-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_due(id: &str, amount: f64) -> PaymentDue {
        PaymentDue {
            id: id.to_string(),
            title: "Rent".to_string(),
            amount,
            due_date: "2025-01-05".to_string(),
            category: Category::Housing,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let due = sample_due("k3x9q", 1200.0);
        let value = serde_json::to_value(&due).unwrap();

        assert_eq!(value["id"], "k3x9q");
        assert_eq!(value["dueDate"], "2025-01-05");
        assert_eq!(value["category"], "Housing");
        assert!(value["createdAt"].is_string());
        assert!(value.get("due_date").is_none());
    }

    #[test]
    fn test_collection_json_round_trip() {
        let mut custom = sample_due("b", 45.5);
        custom.category = Category::from("Gym membership");
        let dues = vec![sample_due("a", 1200.0), custom];

        let json = serde_json::to_string(&dues).unwrap();
        let back: Vec<PaymentDue> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, dues);
    }

    #[test]
    fn test_reads_blob_with_millisecond_timestamps() {
        let json = r#"[{"id":"abc12","title":"Power","amount":80,"dueDate":"2025-Feb-14",
            "category":"Utilities","createdAt":"2025-01-20T08:15:30.000Z"}]"#;

        let dues: Vec<PaymentDue> = serde_json::from_str(json).unwrap();

        assert_eq!(dues.len(), 1);
        assert_eq!(dues[0].category, Category::Utilities);
        assert_eq!(dues[0].amount, 80.0);
        assert_eq!(dues[0].due_on(), NaiveDate::from_ymd_opt(2025, 2, 14));
    }

    #[test]
    fn test_category_presets_and_custom() {
        assert_eq!(Category::from("Food"), Category::Food);
        assert_eq!(
            Category::from("Streaming"),
            Category::Custom("Streaming".to_string())
        );
        assert!(Category::from("Streaming").is_custom());
        assert_eq!(String::from(Category::Healthcare), "Healthcare");
        assert_eq!(Category::PRESETS.len(), 6);
    }

    #[test]
    fn test_validate_fields() {
        assert!(PaymentFields::new("Rent", 1200.0, "2025-01-05", "Housing")
            .validate()
            .is_ok());
        assert!(PaymentFields::new("Free trial", 0.0, "2025-01-05", "Other")
            .validate()
            .is_ok());

        assert!(PaymentFields::new("   ", 10.0, "2025-01-05", "Other")
            .validate()
            .is_err());
        assert!(PaymentFields::new("Rent", -1.0, "2025-01-05", "Housing")
            .validate()
            .is_err());
        assert!(PaymentFields::new("Rent", f64::NAN, "2025-01-05", "Housing")
            .validate()
            .is_err());
        assert!(PaymentFields::new("Rent", 10.0, "", "Housing")
            .validate()
            .is_err());
        assert!(PaymentFields::new("Rent", 10.0, "2025-01-05", "")
            .validate()
            .is_err());
    }

    #[test]
    fn test_total_due() {
        let dues = vec![sample_due("a", 1200.0), sample_due("b", 80.25)];
        assert_eq!(total_due(&dues), 1280.25);
        assert_eq!(total_due(&[]), 0.0);
    }

    #[test]
    fn test_due_date_helpers() {
        assert_eq!(compose_due_date(2025, MONTHS[0], 5), "2025-Jan-5");
        assert_eq!(format_due_date("2025-Jan-5"), "5/Jan/2025");
        assert_eq!(format_due_date("2025-01-05"), "05/01/2025");
        assert_eq!(format_due_date(""), "");
        assert_eq!(format_due_date("next week"), "next week");

        assert_eq!(
            parse_due_date("2025-Jan-5"),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
        assert_eq!(parse_due_date("whenever"), None);
    }

    #[test]
    fn test_is_overdue() {
        let due = sample_due("a", 10.0);
        let before = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

        assert!(!due.is_overdue(before));
        assert!(due.is_overdue(after));
    }
}
