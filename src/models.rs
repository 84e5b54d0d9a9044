//! Domain records persisted in the three collections plus the drafts the UI
//! fills in before handing them to the repositories. Records keep camelCase
//! field names on disk and in exports; the Portuguese aliases let older dumps
//! of the catalog load without conversion.

use std::fmt;

use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{CatalogError, Result};

/// Image shown for tours that never received an image reference.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1501785888041-af3ef285b470?auto=format&fit=crop&w=1200&q=60";

/// Generate a fresh surrogate key for a record.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Clamp a raw price to the non-negative range; anything unusable becomes 0.
pub fn sanitize_price(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

/// Parse free-form price input. Blank or garbage input yields 0.
pub fn parse_price(input: &str) -> f64 {
    let normalized = input.trim().replace(',', ".");
    sanitize_price(normalized.parse::<f64>().unwrap_or(0.0))
}

/// Format a value as Brazilian currency, e.g. `R$ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    let cents = (sanitize_price(value) * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("R$ {},{:02}", grouped, cents % 100)
}

/// Render epoch millis in local time the way the exports and panels show it.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(moment) => moment.format("%d/%m/%Y, %H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// Keep at most `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Shorten `text` for previews, appending an ellipsis when something was cut.
pub fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        format!("{}...", truncate_chars(text, limit))
    } else {
        text.to_string()
    }
}

/// Tour category. Stored in English; the Portuguese labels are accepted on
/// input because the catalog was first curated with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    Adventure,
    Cultural,
    Ecotourism,
}

impl Category {
    /// Parse either the stored English name or the Portuguese label.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "adventure" | "aventura" => Some(Category::Adventure),
            "cultural" => Some(Category::Cultural),
            "ecotourism" | "ecoturismo" => Some(Category::Ecotourism),
            _ => None,
        }
    }

    /// Name written to storage and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Adventure => "adventure",
            Category::Cultural => "cultural",
            Category::Ecotourism => "ecotourism",
        }
    }

    /// Label shown in the terminal UI.
    pub fn label(self) -> &'static str {
        match self {
            Category::Adventure => "Aventura",
            Category::Cultural => "Cultural",
            Category::Ecotourism => "Ecoturismo",
        }
    }

    /// Cycle to the following category; used by the tour form.
    pub fn next(self) -> Self {
        match self {
            Category::Adventure => Category::Cultural,
            Category::Cultural => Category::Ecotourism,
            Category::Ecotourism => Category::Adventure,
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Category::parse).unwrap_or_default())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accept numbers, numeric strings, or junk; junk and negatives become 0.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_price(&text),
        _ => 0.0,
    };
    Ok(sanitize_price(raw))
}

/// Accept a missing or `null` string field as empty text.
fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Persisted record addressed by a string id.
pub(crate) trait Record {
    fn id_mut(&mut self) -> &mut String;
}

/// A catalog entry. Display order is the order of the stored sequence; the
/// `id` is what edits and bookings hold on to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    /// Blank when the stored record had none; the repositories fill it in.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(alias = "nome", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(alias = "local", default, deserialize_with = "lenient_string")]
    pub location: String,
    /// Free text such as `meio-dia`, `2h` or `dia inteiro`.
    #[serde(alias = "duracao", default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(alias = "preco", default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(alias = "categoria", default)]
    pub category: Category,
    #[serde(alias = "descricao", default, deserialize_with = "lenient_string")]
    pub description: String,
    /// URL or local path of the cover image.
    #[serde(alias = "image", default, deserialize_with = "lenient_string")]
    pub image_ref: String,
    #[serde(alias = "created", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Tour {
    pub fn display_price(&self) -> String {
        format_currency(self.price)
    }

    /// Image reference with the stock photo substituted for blank values.
    pub fn image_or_fallback(&self) -> &str {
        if self.image_ref.trim().is_empty() {
            FALLBACK_IMAGE
        } else {
            self.image_ref.trim()
        }
    }
}

impl Record for Tour {
    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Editable tour fields as collected by the form, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourDraft {
    pub name: String,
    pub location: String,
    pub duration: String,
    pub price: f64,
    pub category: Category,
    pub description: String,
    pub image_ref: String,
}

impl TourDraft {
    /// Trim text fields and reject drafts without a name.
    pub fn validated(&self) -> Result<TourDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation("Tour name is required.".to_string()));
        }
        Ok(TourDraft {
            name: name.to_string(),
            location: self.location.trim().to_string(),
            duration: self.duration.trim().to_string(),
            price: sanitize_price(self.price),
            category: self.category,
            description: self.description.trim().to_string(),
            image_ref: self.image_ref.trim().to_string(),
        })
    }

    pub(crate) fn into_tour(self, id: String, created_at: i64) -> Tour {
        Tour {
            id,
            name: self.name,
            location: self.location,
            duration: self.duration,
            price: self.price,
            category: self.category,
            description: self.description,
            image_ref: self.image_ref,
            created_at: Some(created_at),
        }
    }
}

impl From<&Tour> for TourDraft {
    fn from(tour: &Tour) -> Self {
        Self {
            name: tour.name.clone(),
            location: tour.location.clone(),
            duration: tour.duration.clone(),
            price: tour.price,
            category: tour.category,
            description: tour.description.clone(),
            image_ref: tour.image_ref.clone(),
        }
    }
}

/// A reservation request. `tour_name` is a snapshot taken at booking time and
/// survives the tour being deleted; `tour_id` is cleared in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default)]
    pub tour_id: Option<String>,
    #[serde(alias = "trip", default, deserialize_with = "lenient_string")]
    pub tour_name: String,
    #[serde(alias = "ts", default)]
    pub timestamp: i64,
}

impl Record for Booking {
    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }
}

impl Booking {
    pub fn formatted_time(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub name: String,
    pub email: String,
    pub tour_id: Option<String>,
    pub tour_name: String,
}

impl BookingDraft {
    /// Prefill a draft for the given tour.
    pub fn for_tour(tour: &Tour) -> Self {
        Self {
            tour_id: Some(tour.id.clone()),
            tour_name: tour.name.clone(),
            ..Self::default()
        }
    }

    pub(crate) fn validated(&self) -> Result<BookingDraft> {
        let name = self.name.trim();
        let email = self.email.trim();
        let tour_name = self.tour_name.trim();
        if name.is_empty() || email.is_empty() || tour_name.is_empty() {
            return Err(CatalogError::Validation(
                "Name, e-mail and tour are required.".to_string(),
            ));
        }
        Ok(BookingDraft {
            name: name.to_string(),
            email: email.to_string(),
            tour_id: self.tour_id.clone(),
            tour_name: tour_name.to_string(),
        })
    }
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(alias = "nome", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(alias = "assunto", default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(alias = "mensagem", default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(alias = "ts", default)]
    pub timestamp: i64,
}

impl Record for Contact {
    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }
}

impl Contact {
    pub fn formatted_time(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactDraft {
    pub(crate) fn validated(&self) -> Result<ContactDraft> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(CatalogError::Validation(
                "Name, e-mail and message are required.".to_string(),
            ));
        }
        Ok(ContactDraft {
            name: name.to_string(),
            email: email.to_string(),
            subject: self.subject.trim().to_string(),
            message: message.to_string(),
        })
    }
}

/// Plain collection counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub tour_count: usize,
    pub booking_count: usize,
    pub contact_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands_with_dots() {
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(120.0), "R$ 120,00");
        assert_eq!(format_currency(1234.5), "R$ 1.234,50");
        assert_eq!(format_currency(1_000_000.0), "R$ 1.000.000,00");
    }

    #[test]
    fn price_input_is_coerced_to_non_negative() {
        assert_eq!(parse_price("10,5"), 10.5);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("abc"), 0.0);
        assert_eq!(parse_price("-4"), 0.0);
        assert_eq!(sanitize_price(f64::NAN), 0.0);
    }

    #[test]
    fn legacy_tour_fields_load_with_defaults() {
        let raw = r#"{"nome":"Forte","local":"Costa Marques","duracao":"2h","preco":"x","categoria":"ecoturismo","image":"forte.jpg","created":5}"#;
        let tour: Tour = serde_json::from_str(raw).unwrap();
        assert_eq!(tour.name, "Forte");
        assert_eq!(tour.location, "Costa Marques");
        assert_eq!(tour.price, 0.0);
        assert_eq!(tour.category, Category::Ecotourism);
        assert_eq!(tour.image_ref, "forte.jpg");
        assert_eq!(tour.created_at, Some(5));
        assert!(tour.id.is_empty());
    }

    #[test]
    fn category_is_stored_by_english_name() {
        let tour = Tour {
            category: Category::Ecotourism,
            ..serde_json::from_str::<Tour>(r#"{"name":"X"}"#).unwrap()
        };
        let stored = serde_json::to_value(&tour).unwrap();
        assert_eq!(stored["category"], "ecotourism");
        assert_eq!(Category::parse("Ecoturismo").map(Category::as_str), Some("ecotourism"));
    }

    #[test]
    fn unknown_category_falls_back_to_adventure() {
        let tour: Tour = serde_json::from_str(r#"{"name":"X","category":"spa"}"#).unwrap();
        assert_eq!(tour.category, Category::Adventure);
    }

    #[test]
    fn booking_draft_requires_name_email_and_tour() {
        let draft = BookingDraft {
            name: "Ana".into(),
            email: " ".into(),
            tour_id: None,
            tour_name: "Forte".into(),
        };
        assert!(matches!(draft.validated(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn contact_subject_is_optional() {
        let draft = ContactDraft {
            name: " Ana ".into(),
            email: "ana@example.com".into(),
            subject: String::new(),
            message: "Olá".into(),
        };
        let valid = draft.validated().unwrap();
        assert_eq!(valid.name, "Ana");
        assert!(valid.subject.is_empty());
    }

    #[test]
    fn preview_marks_cut_text() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }
}
