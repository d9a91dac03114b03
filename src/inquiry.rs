//! Inquiry submission: flattening a session into the stored payload and
//! rebuilding print areas from a stored row.
//!
//! The payload carries the print areas twice. `print_areas` is the nested,
//! canonical record of all eight areas. The legacy `<key>_text` and
//! `<key>_image_url` columns exist only for the seven keys in
//! [`LEGACY_FLATTENED_KEYS`] and never include colors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::{debug, info};
use uuid::Uuid;

use crate::colors::{BackColors, FrontColors, LiningOz};
use crate::errors::{InquiryError, InquiryResult};
use crate::print_areas::PrintAreas;
use crate::registry::PrintAreaKey;
use crate::session::MockupSession;

pub const DEFAULT_QUANTITY_NOTE: &str = "Small changes after submission are fine.";

/// Keys that also have flattened text/image columns, in column order
pub const LEGACY_FLATTENED_KEYS: [PrintAreaKey; 7] = [
    PrintAreaKey::FrontLeftChest,
    PrintAreaKey::FrontRightChest,
    PrintAreaKey::FrontLeftSleeve,
    PrintAreaKey::FrontRightSleeve,
    PrintAreaKey::BackTop,
    PrintAreaKey::BackMid,
    PrintAreaKey::BackBottom,
];

/// Quantity as entered: either a number or the raw text of a form field
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

impl Default for QuantityInput {
    fn default() -> Self {
        QuantityInput::Text(String::new())
    }
}

impl QuantityInput {
    fn validate(&self) -> InquiryResult<u32> {
        let raw = match self {
            QuantityInput::Number(n) => *n,
            QuantityInput::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| InquiryError::InvalidQuantity(s.clone()))?,
        };
        u32::try_from(raw)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or_else(|| InquiryError::InvalidQuantity(raw.to_string()))
    }
}

/// Contact and order details entered by the customer
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct InquiryDetails {
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub representative_name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub quantity: QuantityInput,
    #[serde(default)]
    pub desired_delivery_date: Option<String>,
    #[serde(default)]
    pub additional_note_text: Option<String>,
}

/// Flattened text/image columns kept for the existing store schema
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LegacyPrintAreaFields {
    #[serde(default)]
    pub front_left_chest_text: Option<String>,
    #[serde(default)]
    pub front_left_chest_image_url: Option<String>,
    #[serde(default)]
    pub front_right_chest_text: Option<String>,
    #[serde(default)]
    pub front_right_chest_image_url: Option<String>,
    #[serde(default)]
    pub front_left_sleeve_text: Option<String>,
    #[serde(default)]
    pub front_left_sleeve_image_url: Option<String>,
    #[serde(default)]
    pub front_right_sleeve_text: Option<String>,
    #[serde(default)]
    pub front_right_sleeve_image_url: Option<String>,
    #[serde(default)]
    pub back_top_text: Option<String>,
    #[serde(default)]
    pub back_top_image_url: Option<String>,
    #[serde(default)]
    pub back_mid_text: Option<String>,
    #[serde(default)]
    pub back_mid_image_url: Option<String>,
    #[serde(default)]
    pub back_bottom_text: Option<String>,
    #[serde(default)]
    pub back_bottom_image_url: Option<String>,
}

impl LegacyPrintAreaFields {
    /// (text, image_url) columns of a key, or `None` for keys without columns
    pub fn columns(&self, key: PrintAreaKey) -> Option<(Option<&str>, Option<&str>)> {
        let (text, image) = match key {
            PrintAreaKey::FrontLeftChest => {
                (&self.front_left_chest_text, &self.front_left_chest_image_url)
            }
            PrintAreaKey::FrontRightChest => {
                (&self.front_right_chest_text, &self.front_right_chest_image_url)
            }
            PrintAreaKey::FrontLeftSleeve => {
                (&self.front_left_sleeve_text, &self.front_left_sleeve_image_url)
            }
            PrintAreaKey::FrontRightSleeve => {
                (&self.front_right_sleeve_text, &self.front_right_sleeve_image_url)
            }
            PrintAreaKey::BackTop => (&self.back_top_text, &self.back_top_image_url),
            PrintAreaKey::BackMid => (&self.back_mid_text, &self.back_mid_image_url),
            PrintAreaKey::BackBottom => (&self.back_bottom_text, &self.back_bottom_image_url),
            PrintAreaKey::BackTop2 => return None,
        };
        Some((text.as_deref(), image.as_deref()))
    }

    fn columns_mut(
        &mut self,
        key: PrintAreaKey,
    ) -> Option<(&mut Option<String>, &mut Option<String>)> {
        let columns = match key {
            PrintAreaKey::FrontLeftChest => (
                &mut self.front_left_chest_text,
                &mut self.front_left_chest_image_url,
            ),
            PrintAreaKey::FrontRightChest => (
                &mut self.front_right_chest_text,
                &mut self.front_right_chest_image_url,
            ),
            PrintAreaKey::FrontLeftSleeve => (
                &mut self.front_left_sleeve_text,
                &mut self.front_left_sleeve_image_url,
            ),
            PrintAreaKey::FrontRightSleeve => (
                &mut self.front_right_sleeve_text,
                &mut self.front_right_sleeve_image_url,
            ),
            PrintAreaKey::BackTop => (&mut self.back_top_text, &mut self.back_top_image_url),
            PrintAreaKey::BackMid => (&mut self.back_mid_text, &mut self.back_mid_image_url),
            PrintAreaKey::BackBottom => {
                (&mut self.back_bottom_text, &mut self.back_bottom_image_url)
            }
            PrintAreaKey::BackTop2 => return None,
        };
        Some(columns)
    }

    /// Project the legacy subset out of the canonical print areas
    pub fn from_print_areas(areas: &PrintAreas) -> Self {
        let mut fields = Self::default();
        for key in LEGACY_FLATTENED_KEYS {
            let state = areas.get(key);
            if let Some((text, image)) = fields.columns_mut(key) {
                *text = non_empty(state.text.as_deref());
                *image = non_empty(state.image_url.as_deref());
            }
        }
        fields
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Submission record as stored by the persistence collaborator
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct InquiryPayload {
    #[serde(default)]
    pub front_colors: FrontColors,
    #[serde(default)]
    pub back_colors: BackColors,
    #[serde(default)]
    pub print_areas: Option<PrintAreas>,
    #[serde(flatten)]
    pub legacy: LegacyPrintAreaFields,
    pub group_name: String,
    pub representative_name: String,
    pub contact: String,
    #[serde(default)]
    pub email: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub quantity_note: Option<String>,
    #[serde(default)]
    pub desired_delivery_date: Option<String>,
    #[serde(default)]
    pub additional_note_text: Option<String>,
    #[serde(default)]
    pub additional_note_image_url: Option<String>,
    #[serde(default)]
    pub lining_oz: LiningOz,
}

/// Validate the customer details and flatten the session into a payload
pub fn build_payload(
    session: &MockupSession,
    details: &InquiryDetails,
) -> InquiryResult<InquiryPayload> {
    let group_name = details.group_name.trim();
    let representative_name = details.representative_name.trim();
    let contact = details.contact.trim();

    let missing: Vec<&'static str> = [
        ("group_name", group_name),
        ("representative_name", representative_name),
        ("contact", contact),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        return Err(InquiryError::MissingContact(missing));
    }

    let quantity = details.quantity.validate()?;
    debug!("Building inquiry payload for {} ({} pcs)", group_name, quantity);

    Ok(InquiryPayload {
        front_colors: session.colors.front().clone(),
        back_colors: session.colors.back().clone(),
        print_areas: Some(session.print_areas.clone()),
        legacy: LegacyPrintAreaFields::from_print_areas(&session.print_areas),
        group_name: group_name.to_string(),
        representative_name: representative_name.to_string(),
        contact: contact.to_string(),
        email: trimmed(details.email.as_deref()),
        quantity,
        quantity_note: Some(DEFAULT_QUANTITY_NOTE.to_string()),
        desired_delivery_date: trimmed(details.desired_delivery_date.as_deref()),
        additional_note_text: trimmed(details.additional_note_text.as_deref()),
        additional_note_image_url: non_empty(session.additional_note_image_url.as_deref()),
        lining_oz: session.lining_oz,
    })
}

/// Rebuild the eight print areas from a stored payload.
///
/// Nested records come first; keys without a record get the single-area default
/// (visible). Non-null legacy columns then override text and image.
pub fn restore_print_areas(payload: &InquiryPayload) -> PrintAreas {
    let mut areas = payload
        .print_areas
        .clone()
        .unwrap_or_else(PrintAreas::uniform);
    for key in LEGACY_FLATTENED_KEYS {
        let Some((text, image)) = payload.legacy.columns(key) else {
            continue;
        };
        if let Some(text) = text {
            areas.set_text(key, Some(text.to_string()));
        }
        if let Some(image) = image {
            areas.set_image_url(key, Some(image.to_string()));
        }
    }
    areas
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Contacted,
    Done,
}

impl Display for InquiryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Contacted => "contacted",
            InquiryStatus::Done => "done",
        };
        f.write_str(name)
    }
}

/// A stored inquiry with its administrative fields
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct InquiryRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub admin_memo: Option<String>,
    #[serde(default)]
    pub status: InquiryStatus,
    #[serde(flatten)]
    pub payload: InquiryPayload,
}

impl InquiryRow {
    pub fn new(payload: InquiryPayload) -> Self {
        let row = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            admin_memo: None,
            status: InquiryStatus::default(),
            payload,
        };
        info!("Recorded inquiry {} for {}", row.id, row.payload.group_name);
        row
    }

    pub fn print_areas(&self) -> PrintAreas {
        restore_print_areas(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionAction;

    fn details() -> InquiryDetails {
        InquiryDetails {
            group_name: "  Rowing Club ".to_string(),
            representative_name: "Kim".to_string(),
            contact: "010-0000-0000".to_string(),
            email: Some("   ".to_string()),
            quantity: QuantityInput::Text("25".to_string()),
            desired_delivery_date: None,
            additional_note_text: Some(" rush order ".to_string()),
        }
    }

    #[test]
    fn test_missing_contact_fields() {
        let mut d = details();
        d.group_name = "   ".to_string();
        d.contact = String::new();
        let err = build_payload(&MockupSession::new(), &d).unwrap_err();
        assert_eq!(err, InquiryError::MissingContact(vec!["group_name", "contact"]));
    }

    #[test]
    fn test_quantity_validation() {
        for bad in ["0", "-3", "many", ""] {
            let mut d = details();
            d.quantity = QuantityInput::Text(bad.to_string());
            assert!(matches!(
                build_payload(&MockupSession::new(), &d),
                Err(InquiryError::InvalidQuantity(_))
            ));
        }
        let mut d = details();
        d.quantity = QuantityInput::Number(3);
        assert_eq!(build_payload(&MockupSession::new(), &d).unwrap().quantity, 3);
    }

    #[test]
    fn test_payload_normalization() {
        let payload = build_payload(&MockupSession::new(), &details()).unwrap();
        assert_eq!(payload.group_name, "Rowing Club");
        assert_eq!(payload.email, None);
        assert_eq!(payload.additional_note_text.as_deref(), Some("rush order"));
        assert_eq!(payload.quantity_note.as_deref(), Some(DEFAULT_QUANTITY_NOTE));
        assert_eq!(payload.lining_oz, LiningOz::Four);
    }

    #[test]
    fn test_legacy_subset_excludes_back_top2_and_colors() {
        let session = MockupSession::new().apply_all([
            SessionAction::SetText(PrintAreaKey::BackTop2, Some("SINCE 1990".to_string())),
            SessionAction::SetText(PrintAreaKey::BackTop, Some("CREW".to_string())),
        ]);
        let payload = build_payload(&session, &details()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(json["back_top_text"], "CREW");
        assert!(!object.contains_key("back_top2_text"));
        assert!(!object.keys().any(|k| k.ends_with("_border_color")));
        assert_eq!(json["print_areas"]["back_top2"]["text"], "SINCE 1990");
        assert_eq!(
            object.keys().filter(|k| k.ends_with("_text") && *k != "additional_note_text").count(),
            7
        );
    }

    #[test]
    fn test_restore_legacy_overrides_nested() {
        let mut payload = build_payload(&MockupSession::new(), &details()).unwrap();
        payload.print_areas = None;
        payload.legacy.back_mid_image_url = Some("https://files/back_mid/1.png".to_string());

        let areas = restore_print_areas(&payload);
        // no nested record: every area is visible with default colors
        assert!(areas.get(PrintAreaKey::FrontRightChest).visible);
        assert_eq!(
            areas.get(PrintAreaKey::BackMid).image_url.as_deref(),
            Some("https://files/back_mid/1.png")
        );
    }

    #[test]
    fn test_row_round_trip_keeps_flat_columns() {
        let session = MockupSession::new()
            .apply(SessionAction::SetFaceColor(PrintAreaKey::FrontLeftChest, None));
        let row = InquiryRow::new(build_payload(&session, &details()).unwrap());
        let json = serde_json::to_string(&row).unwrap();
        let restored: InquiryRow = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.status, InquiryStatus::Pending);
        assert_eq!(restored.id, row.id);
        let areas = restored.print_areas();
        assert_eq!(areas.get(PrintAreaKey::FrontLeftChest).face_color, None);
        assert!(!areas.get(PrintAreaKey::FrontRightChest).visible);
    }
}
