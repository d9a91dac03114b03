use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::debug;

use crate::errors::MockupError;
use crate::registry::{BaseLayer, Side};

pub const BLACK: &str = "#1a1a1a";
pub const WHITE: &str = "#ffffff";

const DEFAULT_BODY: &str = BLACK;
const DEFAULT_SLEEVE: &str = WHITE;
const DEFAULT_RIBBING: &str = WHITE;
const DEFAULT_BUTTON: &str = WHITE;
const LINING_COLOR: &str = BLACK;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub hex: &'static str,
}

const fn preset(name: &'static str, hex: &'static str) -> ColorPreset {
    ColorPreset { name, hex }
}

pub const BODY_PRESETS: [ColorPreset; 11] = [
    preset("Black", "#1a1a1a"),
    preset("White", "#ffffff"),
    preset("Blue", "#2563eb"),
    preset("Navy", "#1e3a5f"),
    preset("Light green", "#86efac"),
    preset("Green", "#22c55e"),
    preset("Red", "#dc2626"),
    preset("Burgundy", "#722f37"),
    preset("Crimson red", "#dc143c"),
    preset("Sky blue", "#0ea5e9"),
    preset("Pink", "#ec4899"),
];

pub const SLEEVE_BUTTON_PRESETS: [ColorPreset; 2] =
    [preset("White", "#ffffff"), preset("Black", "#1a1a1a")];

pub const PRINT_AREA_PRESETS: [ColorPreset; 6] = [
    preset("White", "#ffffff"),
    preset("Black", "#1a1a1a"),
    preset("Blue", "#2563eb"),
    preset("Navy", "#1e3a5f"),
    preset("Red", "#dc2626"),
    preset("Green", "#22c55e"),
];

/// Display name for a color: the matching preset name, "Custom", or "None"
pub fn color_display_name(color: Option<&str>, presets: &[ColorPreset]) -> &'static str {
    match tint(color) {
        None => "None",
        Some(hex) => presets
            .iter()
            .find(|p| p.hex.eq_ignore_ascii_case(hex))
            .map(|p| p.name)
            .unwrap_or("Custom"),
    }
}

/// A color counts as a tint only when it is present and non-blank
pub fn tint(color: Option<&str>) -> Option<&str> {
    color.filter(|c| !c.trim().is_empty())
}

fn normalize(color: Option<String>) -> Option<String> {
    color.filter(|c| !c.trim().is_empty())
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontColors {
    #[serde(rename = "front_body", default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(rename = "front_sleeves", default, skip_serializing_if = "Option::is_none")]
    sleeves: Option<String>,
    #[serde(rename = "front_ribbing", default, skip_serializing_if = "Option::is_none")]
    ribbing: Option<String>,
    #[serde(rename = "front_lining", default, skip_serializing_if = "Option::is_none")]
    lining: Option<String>,
    #[serde(rename = "front_buttons", default, skip_serializing_if = "Option::is_none")]
    buttons: Option<String>,
}

impl FrontColors {
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn sleeves(&self) -> Option<&str> {
        self.sleeves.as_deref()
    }

    pub fn ribbing(&self) -> Option<&str> {
        self.ribbing.as_deref()
    }

    pub fn lining(&self) -> Option<&str> {
        self.lining.as_deref()
    }

    pub fn buttons(&self) -> Option<&str> {
        self.buttons.as_deref()
    }
}

/// Back-side colors. Back ribbing has no field: it always follows the front ribbing.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BackColors {
    #[serde(rename = "back_body", default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(rename = "back_sleeves", default, skip_serializing_if = "Option::is_none")]
    sleeves: Option<String>,
}

impl BackColors {
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn sleeves(&self) -> Option<&str> {
        self.sleeves.as_deref()
    }
}

/// Garment colors of both sides.
///
/// Fields are only writable through the setters below, which keep body and
/// sleeve colors identical on both sides.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GarmentColors {
    front: FrontColors,
    back: BackColors,
}

impl Default for GarmentColors {
    fn default() -> Self {
        Self {
            front: FrontColors {
                body: Some(DEFAULT_BODY.to_string()),
                sleeves: Some(DEFAULT_SLEEVE.to_string()),
                ribbing: Some(DEFAULT_RIBBING.to_string()),
                lining: Some(LINING_COLOR.to_string()),
                buttons: Some(DEFAULT_BUTTON.to_string()),
            },
            back: BackColors {
                body: Some(DEFAULT_BODY.to_string()),
                sleeves: Some(DEFAULT_SLEEVE.to_string()),
            },
        }
    }
}

impl GarmentColors {
    /// Rebuild from stored records, e.g. an inquiry row. The records are taken
    /// as they were persisted; no symmetry is re-imposed.
    pub fn from_parts(front: FrontColors, back: BackColors) -> Self {
        Self { front, back }
    }

    pub fn front(&self) -> &FrontColors {
        &self.front
    }

    pub fn back(&self) -> &BackColors {
        &self.back
    }

    /// Paired write: front and back body
    pub fn set_body(&mut self, color: Option<String>) {
        let color = normalize(color);
        debug!("Setting body color on both sides to {:?}", color);
        self.front.body = color.clone();
        self.back.body = color;
    }

    /// Paired write: front and back sleeves
    pub fn set_sleeves(&mut self, color: Option<String>) {
        let color = normalize(color);
        debug!("Setting sleeve color on both sides to {:?}", color);
        self.front.sleeves = color.clone();
        self.back.sleeves = color;
    }

    pub fn set_ribbing(&mut self, color: Option<String>) {
        self.front.ribbing = normalize(color);
    }

    pub fn set_lining(&mut self, color: Option<String>) {
        self.front.lining = normalize(color);
    }

    pub fn set_buttons(&mut self, color: Option<String>) {
        self.front.buttons = normalize(color);
    }

    /// Stored color of a base layer, without the ribbing link
    fn stored(&self, layer: BaseLayer) -> Option<&str> {
        match layer {
            BaseLayer::FrontBody => self.front.body(),
            BaseLayer::FrontSleeves => self.front.sleeves(),
            BaseLayer::FrontRibbing => self.front.ribbing(),
            BaseLayer::FrontLining => self.front.lining(),
            BaseLayer::FrontButtons => self.front.buttons(),
            BaseLayer::BackBody => self.back.body(),
            BaseLayer::BackSleeves => self.back.sleeves(),
            BaseLayer::BackRibbing => None,
        }
    }
}

/// Effective fill color of a base layer on the given side.
///
/// Back ribbing always reads the front ribbing color. Empty strings resolve to
/// `None` ("no tint").
pub fn resolve_base_color(side: Side, layer: BaseLayer, colors: &GarmentColors) -> Option<&str> {
    if side == Side::Back && layer == BaseLayer::BackRibbing {
        return tint(colors.front.ribbing());
    }
    tint(colors.stored(layer))
}

/// Lining fabric weight in ounces
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum LiningOz {
    Zero,
    Two,
    #[default]
    Four,
}

impl LiningOz {
    pub const OPTIONS: [LiningOz; 3] = [LiningOz::Zero, LiningOz::Two, LiningOz::Four];

    pub fn ounces(&self) -> u8 {
        match self {
            LiningOz::Zero => 0,
            LiningOz::Two => 2,
            LiningOz::Four => 4,
        }
    }
}

impl TryFrom<u8> for LiningOz {
    type Error = MockupError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LiningOz::Zero),
            2 => Ok(LiningOz::Two),
            4 => Ok(LiningOz::Four),
            other => Err(MockupError::InvalidLiningWeight(other)),
        }
    }
}

impl From<LiningOz> for u8 {
    fn from(value: LiningOz) -> Self {
        value.ounces()
    }
}

impl Display for LiningOz {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}oz", self.ounces())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let colors = GarmentColors::default();
        assert_eq!(colors.front().body(), Some("#1a1a1a"));
        assert_eq!(colors.back().body(), Some("#1a1a1a"));
        assert_eq!(colors.front().sleeves(), Some("#ffffff"));
        assert_eq!(colors.back().sleeves(), Some("#ffffff"));
        assert_eq!(colors.front().ribbing(), Some("#ffffff"));
        assert_eq!(colors.front().lining(), Some("#1a1a1a"));
        assert_eq!(colors.front().buttons(), Some("#ffffff"));
    }

    #[test]
    fn test_body_setter_writes_both_sides() {
        let mut colors = GarmentColors::default();
        colors.set_body(Some("#2563eb".to_string()));
        assert_eq!(
            resolve_base_color(Side::Front, BaseLayer::FrontBody, &colors),
            Some("#2563eb")
        );
        assert_eq!(
            resolve_base_color(Side::Back, BaseLayer::BackBody, &colors),
            Some("#2563eb")
        );
    }

    #[test]
    fn test_sleeve_setter_writes_both_sides() {
        let mut colors = GarmentColors::default();
        colors.set_sleeves(None);
        assert_eq!(colors.front().sleeves(), None);
        assert_eq!(colors.back().sleeves(), None);
    }

    #[test]
    fn test_back_ribbing_follows_front() {
        let mut colors = GarmentColors::default();
        for value in ["#dc2626", "#722f37", "#000000"] {
            colors.set_ribbing(Some(value.to_string()));
            assert_eq!(
                resolve_base_color(Side::Back, BaseLayer::BackRibbing, &colors),
                Some(value)
            );
        }
        colors.set_ribbing(None);
        assert_eq!(
            resolve_base_color(Side::Back, BaseLayer::BackRibbing, &colors),
            None
        );
    }

    #[test]
    fn test_back_ribbing_ignores_stored_back_record() {
        let json = r##"{
            "front": { "front_ribbing": "#22c55e" },
            "back": { "back_body": "#ffffff", "back_ribbing": "#000000" }
        }"##;
        let colors: GarmentColors = serde_json::from_str(json).unwrap();
        assert_eq!(
            resolve_base_color(Side::Back, BaseLayer::BackRibbing, &colors),
            Some("#22c55e")
        );
    }

    #[test]
    fn test_empty_string_is_no_tint() {
        let mut colors = GarmentColors::default();
        colors.set_buttons(Some("".to_string()));
        assert_eq!(
            resolve_base_color(Side::Front, BaseLayer::FrontButtons, &colors),
            None
        );
        assert_eq!(tint(Some("  ")), None);
        assert_eq!(tint(Some("#fff")), Some("#fff"));
    }

    #[test]
    fn test_front_colors_serialize_with_prefixed_keys() {
        let mut colors = GarmentColors::default();
        colors.set_lining(None);
        let json = serde_json::to_value(colors.front()).unwrap();
        assert_eq!(json["front_body"], "#1a1a1a");
        assert!(json.get("front_lining").is_none());
    }

    #[test]
    fn test_color_display_name() {
        assert_eq!(color_display_name(Some("#1E3A5F"), &BODY_PRESETS), "Navy");
        assert_eq!(color_display_name(Some("#123456"), &BODY_PRESETS), "Custom");
        assert_eq!(color_display_name(None, &BODY_PRESETS), "None");
        assert_eq!(color_display_name(Some(""), &BODY_PRESETS), "None");
    }

    #[test]
    fn test_lining_weight() {
        assert_eq!(LiningOz::default(), LiningOz::Four);
        assert_eq!(serde_json::to_string(&LiningOz::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<LiningOz>("0").unwrap(), LiningOz::Zero);
        assert!(serde_json::from_str::<LiningOz>("3").is_err());
        assert_eq!(LiningOz::try_from(3), Err(MockupError::InvalidLiningWeight(3)));
    }
}
