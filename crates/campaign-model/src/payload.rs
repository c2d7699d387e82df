//! Campaign payload types.
//!
//! A payload is the structured content every variant of a run is rendered
//! from: discount terms, coupon, validity window, and the course rows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use promokit_common::config::DEFAULT_EXPIRY_TEXT;
use promokit_common::error::{RenderError, RenderResult};

/// Longest coupon code the graphics have room for.
pub const MAX_COUPON_LEN: usize = 7;

/// Maximum offering labels shown per course row.
pub const MAX_OFFERINGS: usize = 4;

/// Maximum course rows per campaign.
pub const MAX_COURSES: usize = 6;

/// Discount terms of a campaign. Percentages are kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DiscountStructure {
    #[serde(rename = "Flat")]
    Flat { flat: String },

    #[serde(rename = "Flat + Additional")]
    FlatPlusAdditional { flat: String, additional: String },
}

/// Fieldless discriminant of [`DiscountStructure`], used for table lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountKind {
    Flat,
    FlatAdditional,
}

impl DiscountStructure {
    pub fn flat(value: impl Into<String>) -> Self {
        Self::Flat {
            flat: value.into(),
        }
    }

    pub fn flat_plus_additional(flat: impl Into<String>, additional: impl Into<String>) -> Self {
        Self::FlatPlusAdditional {
            flat: flat.into(),
            additional: additional.into(),
        }
    }

    pub fn kind(&self) -> DiscountKind {
        match self {
            Self::Flat { .. } => DiscountKind::Flat,
            Self::FlatPlusAdditional { .. } => DiscountKind::FlatAdditional,
        }
    }

    /// Label shown in the form and exposed to templates.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Flat { .. } => "Flat",
            Self::FlatPlusAdditional { .. } => "Flat + Additional",
        }
    }

    pub fn flat_value(&self) -> &str {
        match self {
            Self::Flat { flat } | Self::FlatPlusAdditional { flat, .. } => flat,
        }
    }

    pub fn additional_value(&self) -> Option<&str> {
        match self {
            Self::Flat { .. } => None,
            Self::FlatPlusAdditional { additional, .. } => Some(additional),
        }
    }
}

/// Inclusive date range the offer is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ValidityWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Human-readable range, e.g. `*Valid: 1 to 2 January 2025*`.
    ///
    /// The start month is spelled out only when it differs from the end
    /// month; the year always comes from the end date.
    pub fn display_text(&self) -> String {
        let (start, end) = (self.start, self.end);
        if start.month() == end.month() && start.year() == end.year() {
            format!(
                "*Valid: {} to {} {}*",
                start.day(),
                end.day(),
                start.format("%B %Y")
            )
        } else {
            format!(
                "*Valid: {} {} to {} {}*",
                start.day(),
                start.format("%B"),
                end.day(),
                end.format("%B %Y")
            )
        }
    }
}

/// One course row: exam, stream, subject and up to four offerings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseEntry {
    pub exam: String,
    pub stream: String,
    pub subject: String,
    #[serde(default)]
    pub offerings: Vec<String>,
}

impl CourseEntry {
    /// Build a row from raw form selections, trimming surrounding whitespace.
    pub fn from_form(
        exam: &str,
        stream: &str,
        subject: &str,
        offerings: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            exam: exam.trim().to_string(),
            stream: stream.trim().to_string(),
            subject: subject.trim().to_string(),
            offerings: offerings
                .into_iter()
                .map(|o| o.as_ref().trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// Offerings joined for single-line display.
    pub fn offerings_text(&self) -> String {
        self.offerings.join(" | ")
    }
}

/// Everything a template needs for one campaign run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPayload {
    pub discount: DiscountStructure,
    pub coupon_code: String,
    pub validity: ValidityWindow,
    #[serde(default = "default_expiry_text")]
    pub expiry_text: String,
    #[serde(default)]
    pub courses: Vec<CourseEntry>,
}

fn default_expiry_text() -> String {
    DEFAULT_EXPIRY_TEXT.to_string()
}

impl CampaignPayload {
    pub fn new(
        discount: DiscountStructure,
        coupon_code: impl Into<String>,
        validity: ValidityWindow,
    ) -> Self {
        Self {
            discount,
            coupon_code: coupon_code.into(),
            validity,
            expiry_text: default_expiry_text(),
            courses: Vec::new(),
        }
    }

    pub fn with_course(mut self, course: CourseEntry) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_expiry_text(mut self, text: impl Into<String>) -> Self {
        self.expiry_text = text.into();
        self
    }

    pub fn validity_text(&self) -> String {
        self.validity.display_text()
    }

    /// Check the fields every template consumes.
    pub fn validate(&self) -> RenderResult<()> {
        if self.discount.flat_value().trim().is_empty() {
            return Err(RenderError::invalid_payload("flat discount is empty"));
        }
        if let Some(additional) = self.discount.additional_value() {
            if additional.trim().is_empty() {
                return Err(RenderError::invalid_payload("additional discount is empty"));
            }
        }

        let coupon_len = self.coupon_code.chars().count();
        if coupon_len == 0 {
            return Err(RenderError::invalid_payload("coupon code is empty"));
        }
        if coupon_len > MAX_COUPON_LEN {
            return Err(RenderError::invalid_payload(format!(
                "coupon code '{}' exceeds {MAX_COUPON_LEN} characters",
                self.coupon_code
            )));
        }

        if self.courses.len() > MAX_COURSES {
            return Err(RenderError::invalid_payload(format!(
                "{} course rows given, at most {MAX_COURSES} fit",
                self.courses.len()
            )));
        }
        for (i, course) in self.courses.iter().enumerate() {
            if course.offerings.len() > MAX_OFFERINGS {
                return Err(RenderError::invalid_payload(format!(
                    "course row {} has {} offerings, at most {MAX_OFFERINGS} fit",
                    i + 1,
                    course.offerings.len()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_payload() -> CampaignPayload {
        CampaignPayload::new(
            DiscountStructure::flat("50"),
            "SUPER",
            ValidityWindow::new(date(2025, 1, 1), date(2025, 1, 2)),
        )
        .with_course(CourseEntry::from_form(
            "RBI Grade B",
            "General Stream",
            "Quant",
            ["Gold", "Silver"],
        ))
    }

    #[test]
    fn test_validity_text_same_month() {
        let window = ValidityWindow::new(date(2025, 1, 1), date(2025, 1, 2));
        assert_eq!(window.display_text(), "*Valid: 1 to 2 January 2025*");
    }

    #[test]
    fn test_validity_text_spans_months_and_years() {
        let window = ValidityWindow::new(date(2025, 1, 30), date(2025, 2, 2));
        assert_eq!(window.display_text(), "*Valid: 30 January to 2 February 2025*");

        let window = ValidityWindow::new(date(2024, 12, 31), date(2025, 1, 1));
        assert_eq!(window.display_text(), "*Valid: 31 December to 1 January 2025*");
    }

    #[test]
    fn test_course_from_form_trims() {
        let course = CourseEntry::from_form(" JAIIB ", "", " PPB", ["Gold ", " ", "Combo"]);
        assert_eq!(course.exam, "JAIIB");
        assert_eq!(course.subject, "PPB");
        assert_eq!(course.offerings, vec!["Gold", "Combo"]);
        assert_eq!(course.offerings_text(), "Gold | Combo");
    }

    #[test]
    fn test_payload_validates() {
        assert!(sample_payload().validate().is_ok());
    }

    #[test]
    fn test_coupon_longer_than_seven_is_rejected() {
        let mut payload = sample_payload();
        payload.coupon_code = "SUPERSALE".into();
        let err = payload.validate().unwrap_err();
        assert!(matches!(err, RenderError::InvalidPayload { .. }));
    }

    #[test]
    fn test_too_many_offerings_rejected() {
        let payload = sample_payload().with_course(CourseEntry::from_form(
            "SEBI Grade A",
            "",
            "",
            ["Gold", "Silver", "Combo", "Mahapack", "Test Series"],
        ));
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_empty_additional_rejected() {
        let mut payload = sample_payload();
        payload.discount = DiscountStructure::flat_plus_additional("50", " ");
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_payload_json_uses_form_labels() {
        let mut payload = sample_payload();
        payload.discount = DiscountStructure::flat_plus_additional("50", "40");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["discount"]["kind"], "Flat + Additional");
        assert_eq!(json["discount"]["additional"], "40");

        let parsed: CampaignPayload = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.discount.kind(), DiscountKind::FlatAdditional);
    }

    #[test]
    fn test_expiry_text_defaults_when_absent() {
        let json = r#"{
            "discount": { "kind": "Flat", "flat": "50" },
            "coupon_code": "SUPER",
            "validity": { "start": "2025-01-01", "end": "2025-01-02" }
        }"#;
        let payload: CampaignPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.expiry_text, DEFAULT_EXPIRY_TEXT);
        assert!(payload.courses.is_empty());
    }
}
