//! Highlight rectangles for the active print area, in percent of the canvas.
//!
//! The garment is shown as a viewer facing the wearer sees it, so the wearer's
//! left-hand areas sit on the right half of the canvas and vice versa.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

use crate::errors::{MockupError, MockupResult};
use crate::registry::{PrintAreaKey, Side};

pub const CANVAS_EXTENT: f64 = 100.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AreaBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The same box in the `"NN%"` string form used by renderers
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CssBox {
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
}

const fn area_box(left: f64, top: f64, width: f64, height: f64) -> AreaBox {
    AreaBox {
        left,
        top,
        width,
        height,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn format_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}%", rounded)
}

fn parse_percent(value: &str) -> MockupResult<f64> {
    let invalid = || MockupError::InvalidPercentage(value.to_string());
    let pattern = Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*%?\s*$").map_err(|_| invalid())?;
    pattern
        .captures(value)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(invalid)
}

impl AreaBox {
    /// Distance from the right canvas edge
    pub fn right(&self) -> f64 {
        CANVAS_EXTENT - self.left - self.width
    }

    /// Distance from the bottom canvas edge
    pub fn bottom(&self) -> f64 {
        CANVAS_EXTENT - self.top - self.height
    }

    pub fn get(&self, field: BoxField) -> f64 {
        match field {
            BoxField::Left => self.left,
            BoxField::Top => self.top,
            BoxField::Width => self.width,
            BoxField::Height => self.height,
        }
    }

    /// Pull the box back inside the canvas: origin first, then size.
    /// Non-finite fields collapse to 0.
    pub fn clamped(&self) -> AreaBox {
        let left = finite_or_zero(self.left).clamp(0.0, CANVAS_EXTENT);
        let top = finite_or_zero(self.top).clamp(0.0, CANVAS_EXTENT);
        AreaBox {
            left,
            top,
            width: finite_or_zero(self.width).clamp(0.0, CANVAS_EXTENT - left),
            height: finite_or_zero(self.height).clamp(0.0, CANVAS_EXTENT - top),
        }
    }

    /// Move one field by `delta`, bounded by the complementary dimension
    pub fn nudged(&self, field: BoxField, delta: f64) -> AreaBox {
        let mut next = self.clamped();
        if !delta.is_finite() {
            return next;
        }
        match field {
            BoxField::Left => {
                next.left = (next.left + delta).clamp(0.0, CANVAS_EXTENT - next.width)
            }
            BoxField::Top => next.top = (next.top + delta).clamp(0.0, CANVAS_EXTENT - next.height),
            BoxField::Width => {
                next.width = (next.width + delta).clamp(0.0, CANVAS_EXTENT - next.left)
            }
            BoxField::Height => {
                next.height = (next.height + delta).clamp(0.0, CANVAS_EXTENT - next.top)
            }
        }
        next
    }

    /// Whole-percent values, as written into the built-in layout table
    pub fn rounded(&self) -> AreaBox {
        AreaBox {
            left: self.left.round(),
            top: self.top.round(),
            width: self.width.round(),
            height: self.height.round(),
        }
    }

    pub fn to_css(&self) -> CssBox {
        CssBox {
            left: format_percent(self.left),
            top: format_percent(self.top),
            width: format_percent(self.width),
            height: format_percent(self.height),
        }
    }

    pub fn from_css(css: &CssBox) -> MockupResult<AreaBox> {
        Ok(AreaBox {
            left: parse_percent(&css.left)?,
            top: parse_percent(&css.top)?,
            width: parse_percent(&css.width)?,
            height: parse_percent(&css.height)?,
        }
        .clamped())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoxField {
    Left,
    Top,
    Width,
    Height,
}

impl Display for BoxField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BoxField::Left => "left",
            BoxField::Top => "top",
            BoxField::Width => "width",
            BoxField::Height => "height",
        };
        f.write_str(name)
    }
}

impl FromStr for BoxField {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(BoxField::Left),
            "top" => Ok(BoxField::Top),
            "width" => Ok(BoxField::Width),
            "height" => Ok(BoxField::Height),
            other => Err(MockupError::UnknownBoxField(other.to_string())),
        }
    }
}

/// Built-in highlight layout (mirrored: the wearer's left is on the canvas right)
pub fn default_box(key: PrintAreaKey) -> AreaBox {
    match key {
        PrintAreaKey::FrontLeftChest => area_box(52.0, 27.0, 24.0, 20.0),
        PrintAreaKey::FrontRightChest => area_box(1.0, 27.0, 24.0, 20.0),
        PrintAreaKey::FrontLeftSleeve => area_box(72.0, 28.0, 26.0, 45.0),
        PrintAreaKey::FrontRightSleeve => area_box(2.0, 28.0, 26.0, 45.0),
        PrintAreaKey::BackTop => area_box(28.0, 23.0, 44.0, 15.0),
        PrintAreaKey::BackTop2 => area_box(33.0, 32.0, 36.0, 10.0),
        PrintAreaKey::BackMid => area_box(22.0, 38.0, 56.0, 28.0),
        PrintAreaKey::BackBottom => area_box(28.0, 65.0, 44.0, 9.0),
    }
}

/// User-adjusted boxes keyed by print area. Keys without an entry use the default.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BoxOverrides(BTreeMap<PrintAreaKey, AreaBox>);

impl BoxOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// All eight keys populated: overrides where present, defaults elsewhere
    pub fn with_defaults(&self) -> BoxOverrides {
        let mut merged = self.0.clone();
        for key in PrintAreaKey::ALL {
            merged.entry(key).or_insert_with(|| default_box(key));
        }
        BoxOverrides(merged)
    }

    pub fn get(&self, key: PrintAreaKey) -> Option<&AreaBox> {
        self.0.get(&key)
    }

    pub fn insert(&mut self, key: PrintAreaKey, area: AreaBox) {
        self.0.insert(key, area.clamped());
    }

    pub fn remove(&mut self, key: PrintAreaKey) -> Option<AreaBox> {
        self.0.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PrintAreaKey, &AreaBox)> {
        self.0.iter()
    }
}

pub fn get_box(key: PrintAreaKey, overrides: &BoxOverrides) -> AreaBox {
    overrides.get(key).copied().unwrap_or_else(|| default_box(key))
}

/// Adjust one field of one box and return the new override map
pub fn nudge(
    key: PrintAreaKey,
    field: BoxField,
    delta: f64,
    overrides: &BoxOverrides,
) -> BoxOverrides {
    let current = get_box(key, overrides);
    let next = current.nudged(field, delta);
    if next.get(field) != current.get(field) + delta {
        debug!(
            "Nudge of {} {} by {} clamped to {}",
            key,
            field,
            delta,
            next.get(field)
        );
    }
    let mut updated = overrides.clone();
    updated.0.insert(key, next);
    updated
}

/// Highlight for the active area, only on the side that area belongs to
pub fn active_highlight(
    side: Side,
    active: Option<PrintAreaKey>,
    overrides: &BoxOverrides,
) -> Option<AreaBox> {
    active
        .filter(|key| key.side() == side)
        .map(|key| get_box(key, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_mirrored() {
        let left_chest = default_box(PrintAreaKey::FrontLeftChest);
        let right_chest = default_box(PrintAreaKey::FrontRightChest);
        assert!(left_chest.left > 50.0);
        assert!(right_chest.left + right_chest.width <= 50.0);

        let left_sleeve = default_box(PrintAreaKey::FrontLeftSleeve);
        let right_sleeve = default_box(PrintAreaKey::FrontRightSleeve);
        assert!(left_sleeve.left > right_sleeve.left);
    }

    #[test]
    fn test_defaults_inside_canvas() {
        for key in PrintAreaKey::ALL {
            let b = default_box(key);
            assert!(b.left + b.width <= 100.0, "{}", key);
            assert!(b.top + b.height <= 100.0, "{}", key);
        }
    }

    #[test]
    fn test_get_box_prefers_override() {
        let mut overrides = BoxOverrides::new();
        assert_eq!(
            get_box(PrintAreaKey::BackMid, &overrides),
            default_box(PrintAreaKey::BackMid)
        );
        overrides.insert(PrintAreaKey::BackMid, area_box(10.0, 10.0, 10.0, 10.0));
        assert_eq!(
            get_box(PrintAreaKey::BackMid, &overrides),
            area_box(10.0, 10.0, 10.0, 10.0)
        );
    }

    #[test]
    fn test_nudge_is_pure() {
        let overrides = BoxOverrides::new();
        let next = nudge(PrintAreaKey::BackTop, BoxField::Top, 2.0, &overrides);
        assert!(overrides.is_empty());
        assert_eq!(get_box(PrintAreaKey::BackTop, &next).top, 25.0);
    }

    #[test]
    fn test_width_clamp_is_idempotent() {
        let mut overrides = BoxOverrides::new();
        for _ in 0..20 {
            overrides = nudge(PrintAreaKey::FrontLeftChest, BoxField::Width, 5.0, &overrides);
            let b = get_box(PrintAreaKey::FrontLeftChest, &overrides);
            assert!(b.left + b.width <= 100.0);
        }
        let saturated = get_box(PrintAreaKey::FrontLeftChest, &overrides);
        assert_eq!(saturated.width, 48.0);

        let again = nudge(PrintAreaKey::FrontLeftChest, BoxField::Width, 5.0, &overrides);
        assert_eq!(again, overrides);
    }

    #[test]
    fn test_non_finite_nudge_is_ignored() {
        let key = PrintAreaKey::FrontLeftChest;
        for delta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let overrides = nudge(key, BoxField::Left, delta, &BoxOverrides::new());
            assert_eq!(get_box(key, &overrides), default_box(key));

            let overrides = nudge(key, BoxField::Width, 1.0, &overrides);
            let b = get_box(key, &overrides);
            assert_eq!(b.width, 25.0);
            assert!(b.left + b.width <= 100.0);
        }
    }

    #[test]
    fn test_clamped_replaces_non_finite_fields() {
        let b = AreaBox {
            left: f64::NAN,
            top: 10.0,
            width: f64::INFINITY,
            height: 20.0,
        }
        .clamped();
        assert_eq!(b.left, 0.0);
        assert_eq!(b.width, 0.0);
        assert_eq!(b.top, 10.0);
        assert_eq!(b.height, 20.0);
    }

    #[test]
    fn test_left_clamped_by_width() {
        let overrides = nudge(PrintAreaKey::FrontLeftSleeve, BoxField::Left, 50.0, &BoxOverrides::new());
        let b = get_box(PrintAreaKey::FrontLeftSleeve, &overrides);
        assert_eq!(b.left, 74.0);
        assert_eq!(b.right(), 0.0);

        let overrides = nudge(PrintAreaKey::FrontLeftSleeve, BoxField::Left, -500.0, &overrides);
        assert_eq!(get_box(PrintAreaKey::FrontLeftSleeve, &overrides).left, 0.0);
    }

    #[test]
    fn test_height_never_negative() {
        let overrides = nudge(PrintAreaKey::BackBottom, BoxField::Height, -50.0, &BoxOverrides::new());
        assert_eq!(get_box(PrintAreaKey::BackBottom, &overrides).height, 0.0);
    }

    #[test]
    fn test_with_defaults_fills_all_keys() {
        let mut overrides = BoxOverrides::new();
        overrides.insert(PrintAreaKey::BackTop2, area_box(30.0, 30.0, 40.0, 12.0));
        let merged = overrides.with_defaults();
        assert_eq!(merged.len(), 8);
        assert_eq!(
            merged.get(PrintAreaKey::BackTop2),
            Some(&area_box(30.0, 30.0, 40.0, 12.0))
        );
        assert_eq!(
            merged.get(PrintAreaKey::BackMid),
            Some(&default_box(PrintAreaKey::BackMid))
        );
    }

    #[test]
    fn test_css_conversion() {
        let css = default_box(PrintAreaKey::FrontLeftChest).to_css();
        assert_eq!(css.left, "52%");
        assert_eq!(css.height, "20%");

        let parsed = AreaBox::from_css(&CssBox {
            left: "12.5%".to_string(),
            top: " 3 %".to_string(),
            width: "40".to_string(),
            height: "10%".to_string(),
        })
        .unwrap();
        assert_eq!(parsed, area_box(12.5, 3.0, 40.0, 10.0));

        let err = AreaBox::from_css(&CssBox {
            left: "auto".to_string(),
            top: "0%".to_string(),
            width: "0%".to_string(),
            height: "0%".to_string(),
        });
        assert_eq!(err, Err(MockupError::InvalidPercentage("auto".to_string())));
    }

    #[test]
    fn test_insets() {
        let b = default_box(PrintAreaKey::BackMid);
        assert_eq!(b.right(), 22.0);
        assert_eq!(b.bottom(), 34.0);
    }

    #[test]
    fn test_active_highlight_side_filter() {
        let overrides = BoxOverrides::new();
        assert_eq!(
            active_highlight(Side::Front, Some(PrintAreaKey::BackTop), &overrides),
            None
        );
        assert_eq!(
            active_highlight(Side::Back, Some(PrintAreaKey::BackTop), &overrides),
            Some(default_box(PrintAreaKey::BackTop))
        );
        assert_eq!(active_highlight(Side::Back, None, &overrides), None);
    }

    #[test]
    fn test_rounded() {
        let b = area_box(12.4, 12.6, 30.5, 9.49).rounded();
        assert_eq!(b, area_box(12.0, 13.0, 31.0, 9.0));
    }
}
