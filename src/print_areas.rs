use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::colors::{BLACK, WHITE};
use crate::registry::{PrintAreaKey, Side};

fn default_visible() -> bool {
    true
}

fn default_face_color() -> Option<String> {
    Some(WHITE.to_string())
}

fn default_border_color() -> Option<String> {
    Some(BLACK.to_string())
}

/// State of a single print area. `None` colors mean "no color": that sub-layer is
/// not drawn.
///
/// When deserializing, a missing field takes the single-area default while an
/// explicit `null` is kept as "no color".
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrintAreaState {
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_face_color")]
    pub face_color: Option<String>,
    #[serde(default = "default_border_color")]
    pub border_color: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Default for PrintAreaState {
    fn default() -> Self {
        Self {
            visible: default_visible(),
            face_color: default_face_color(),
            border_color: default_border_color(),
            text: None,
            image_url: None,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Empty,
    Text,
    Image,
    TextAndImage,
}

impl PrintAreaState {
    /// What the customer attached to the area; informational only, never rendered
    pub fn content_status(&self) -> ContentStatus {
        let has_text = self
            .text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        let has_image = self
            .image_url
            .as_deref()
            .map(|u| !u.is_empty())
            .unwrap_or(false);
        match (has_text, has_image) {
            (true, true) => ContentStatus::TextAndImage,
            (true, false) => ContentStatus::Text,
            (false, true) => ContentStatus::Image,
            (false, false) => ContentStatus::Empty,
        }
    }
}

// Areas hidden when a new configuration starts.
const HIDDEN_BY_DEFAULT: [PrintAreaKey; 1] = [PrintAreaKey::FrontRightChest];

/// The eight print-area records, always complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintAreas {
    areas: [PrintAreaState; 8],
}

impl Default for PrintAreas {
    fn default() -> Self {
        get_default_print_areas()
    }
}

/// Initial print-area state for a new configuration session
pub fn get_default_print_areas() -> PrintAreas {
    let mut areas = PrintAreas::uniform();
    for key in HIDDEN_BY_DEFAULT {
        areas.set_visible(key, false);
    }
    areas
}

impl PrintAreas {
    /// All eight areas in the single-area default state (all visible)
    pub fn uniform() -> Self {
        Self {
            areas: std::array::from_fn(|_| PrintAreaState::default()),
        }
    }

    /// Build from a partial map; keys without an entry get the single-area default
    pub fn from_partial(entries: BTreeMap<PrintAreaKey, PrintAreaState>) -> Self {
        let mut areas = Self::uniform();
        for (key, state) in entries {
            areas.areas[key.index()] = state;
        }
        areas
    }

    pub fn get(&self, key: PrintAreaKey) -> &PrintAreaState {
        &self.areas[key.index()]
    }

    /// Areas in registry order
    pub fn iter(&self) -> impl Iterator<Item = (PrintAreaKey, &PrintAreaState)> {
        PrintAreaKey::ALL.iter().map(move |key| (*key, self.get(*key)))
    }

    /// Areas of one side in registry order
    pub fn side(&self, side: Side) -> impl Iterator<Item = (PrintAreaKey, &PrintAreaState)> {
        self.iter().filter(move |(key, _)| key.side() == side)
    }

    fn entry(&mut self, key: PrintAreaKey) -> &mut PrintAreaState {
        &mut self.areas[key.index()]
    }

    pub fn set_visible(&mut self, key: PrintAreaKey, visible: bool) {
        debug!("Print area {} visible: {}", key, visible);
        self.entry(key).visible = visible;
    }

    pub fn set_face_color(&mut self, key: PrintAreaKey, color: Option<String>) {
        self.entry(key).face_color = color;
    }

    pub fn set_border_color(&mut self, key: PrintAreaKey, color: Option<String>) {
        self.entry(key).border_color = color;
    }

    pub fn set_text(&mut self, key: PrintAreaKey, text: Option<String>) {
        self.entry(key).text = text;
    }

    pub fn set_image_url(&mut self, key: PrintAreaKey, url: Option<String>) {
        self.entry(key).image_url = url;
    }
}

impl Serialize for PrintAreas {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.areas.len()))?;
        for (key, state) in self.iter() {
            map.serialize_entry(&key, state)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PrintAreas {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<PrintAreaKey, PrintAreaState>::deserialize(deserializer)?;
        Ok(PrintAreas::from_partial(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_asymmetry() {
        let areas = get_default_print_areas();
        for (key, state) in areas.iter() {
            assert_eq!(state.visible, key != PrintAreaKey::FrontRightChest, "{}", key);
            assert_eq!(state.face_color.as_deref(), Some("#ffffff"));
            assert_eq!(state.border_color.as_deref(), Some("#1a1a1a"));
            assert_eq!(state.text, None);
            assert_eq!(state.image_url, None);
        }
    }

    #[test]
    fn test_setters_are_structural() {
        let mut areas = get_default_print_areas();
        areas.set_text(PrintAreaKey::BackTop, Some("HANKUK UNIV".to_string()));
        areas.set_face_color(PrintAreaKey::BackTop, None);

        let top = areas.get(PrintAreaKey::BackTop);
        assert_eq!(top.text.as_deref(), Some("HANKUK UNIV"));
        assert_eq!(top.face_color, None);
        assert_eq!(top.border_color.as_deref(), Some("#1a1a1a"));
        assert!(top.visible);

        // untouched neighbours
        assert_eq!(areas.get(PrintAreaKey::BackTop2), &PrintAreaState::default());
    }

    #[test]
    fn test_partial_map_fills_defaults() {
        let json = r##"{ "back_mid": { "visible": false } }"##;
        let areas: PrintAreas = serde_json::from_str(json).unwrap();
        assert!(!areas.get(PrintAreaKey::BackMid).visible);
        assert_eq!(
            areas.get(PrintAreaKey::BackMid).face_color.as_deref(),
            Some("#ffffff")
        );
        assert_eq!(
            areas.get(PrintAreaKey::FrontRightChest),
            &PrintAreaState::default()
        );
    }

    #[test]
    fn test_explicit_null_color_is_kept() {
        let json = r##"{ "front_left_chest": { "visible": true, "face_color": null, "border_color": "#dc2626" } }"##;
        let areas: PrintAreas = serde_json::from_str(json).unwrap();
        let area = areas.get(PrintAreaKey::FrontLeftChest);
        assert_eq!(area.face_color, None);
        assert_eq!(area.border_color.as_deref(), Some("#dc2626"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let json = r##"{ "front_pocket": { "visible": true } }"##;
        assert!(serde_json::from_str::<PrintAreas>(json).is_err());
    }

    #[test]
    fn test_serializes_all_keys_in_order() {
        let json = serde_json::to_string(&get_default_print_areas()).unwrap();
        let keys: Vec<usize> = PrintAreaKey::ALL
            .iter()
            .map(|k| json.find(&format!("\"{}\"", k.as_str())).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_content_status() {
        let mut state = PrintAreaState::default();
        assert_eq!(state.content_status(), ContentStatus::Empty);
        state.text = Some("   ".to_string());
        assert_eq!(state.content_status(), ContentStatus::Empty);
        state.text = Some("ABC".to_string());
        assert_eq!(state.content_status(), ContentStatus::Text);
        state.image_url = Some("https://cdn/x.png".to_string());
        assert_eq!(state.content_status(), ContentStatus::TextAndImage);
        state.text = None;
        assert_eq!(state.content_status(), ContentStatus::Image);
    }
}
