//! Static layer registry: sides, base garment layers, print areas and the
//! fixed painter's order in which they are composited.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::MockupError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Front, Side::Back];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(Side::Front),
            "back" => Ok(Side::Back),
            other => Err(MockupError::UnknownSide(other.to_string())),
        }
    }
}

/// Base garment part layers. The set is closed; each variant belongs to one side.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BaseLayer {
    FrontBody,
    FrontSleeves,
    FrontRibbing,
    FrontLining,
    FrontButtons,
    BackRibbing,
    BackBody,
    BackSleeves,
}

const FRONT_LAYER_ORDER: [BaseLayer; 5] = [
    BaseLayer::FrontBody,
    BaseLayer::FrontSleeves,
    BaseLayer::FrontRibbing,
    BaseLayer::FrontLining,
    BaseLayer::FrontButtons,
];

// Ribbing sits at the bottom of the back view, sleeves on top.
const BACK_LAYER_ORDER: [BaseLayer; 3] = [
    BaseLayer::BackRibbing,
    BaseLayer::BackBody,
    BaseLayer::BackSleeves,
];

impl BaseLayer {
    pub const ALL: [BaseLayer; 8] = [
        BaseLayer::FrontBody,
        BaseLayer::FrontSleeves,
        BaseLayer::FrontRibbing,
        BaseLayer::FrontLining,
        BaseLayer::FrontButtons,
        BaseLayer::BackRibbing,
        BaseLayer::BackBody,
        BaseLayer::BackSleeves,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseLayer::FrontBody => "front_body",
            BaseLayer::FrontSleeves => "front_sleeves",
            BaseLayer::FrontRibbing => "front_ribbing",
            BaseLayer::FrontLining => "front_lining",
            BaseLayer::FrontButtons => "front_buttons",
            BaseLayer::BackRibbing => "back_ribbing",
            BaseLayer::BackBody => "back_body",
            BaseLayer::BackSleeves => "back_sleeves",
        }
    }

    pub fn side(&self) -> Side {
        match self {
            BaseLayer::FrontBody
            | BaseLayer::FrontSleeves
            | BaseLayer::FrontRibbing
            | BaseLayer::FrontLining
            | BaseLayer::FrontButtons => Side::Front,
            BaseLayer::BackRibbing | BaseLayer::BackBody | BaseLayer::BackSleeves => Side::Back,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BaseLayer::FrontBody | BaseLayer::BackBody => "Body",
            BaseLayer::FrontSleeves | BaseLayer::BackSleeves => "Sleeves",
            BaseLayer::FrontRibbing => "Collar & hem ribbing",
            BaseLayer::BackRibbing => "Ribbing",
            BaseLayer::FrontLining => "Lining",
            BaseLayer::FrontButtons => "Buttons",
        }
    }
}

impl Display for BaseLayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseLayer {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseLayer::ALL
            .iter()
            .copied()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| MockupError::UnknownLayer(s.to_string()))
    }
}

/// The eight garment regions eligible for decoration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PrintAreaKey {
    FrontLeftChest,
    FrontRightChest,
    FrontLeftSleeve,
    FrontRightSleeve,
    BackTop,
    #[serde(rename = "back_top2")]
    BackTop2,
    BackMid,
    BackBottom,
}

impl PrintAreaKey {
    /// All areas, front first, each side in registry order
    pub const ALL: [PrintAreaKey; 8] = [
        PrintAreaKey::FrontLeftChest,
        PrintAreaKey::FrontRightChest,
        PrintAreaKey::FrontLeftSleeve,
        PrintAreaKey::FrontRightSleeve,
        PrintAreaKey::BackTop,
        PrintAreaKey::BackTop2,
        PrintAreaKey::BackMid,
        PrintAreaKey::BackBottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrintAreaKey::FrontLeftChest => "front_left_chest",
            PrintAreaKey::FrontRightChest => "front_right_chest",
            PrintAreaKey::FrontLeftSleeve => "front_left_sleeve",
            PrintAreaKey::FrontRightSleeve => "front_right_sleeve",
            PrintAreaKey::BackTop => "back_top",
            PrintAreaKey::BackTop2 => "back_top2",
            PrintAreaKey::BackMid => "back_mid",
            PrintAreaKey::BackBottom => "back_bottom",
        }
    }

    /// Position in [`PrintAreaKey::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn side(&self) -> Side {
        match self {
            PrintAreaKey::FrontLeftChest
            | PrintAreaKey::FrontRightChest
            | PrintAreaKey::FrontLeftSleeve
            | PrintAreaKey::FrontRightSleeve => Side::Front,
            _ => Side::Back,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrintAreaKey::FrontLeftChest => "Front left chest",
            PrintAreaKey::FrontRightChest => "Front right chest",
            PrintAreaKey::FrontLeftSleeve => "Left sleeve",
            PrintAreaKey::FrontRightSleeve => "Right sleeve",
            PrintAreaKey::BackTop => "Back top",
            PrintAreaKey::BackTop2 => "Back top 2",
            PrintAreaKey::BackMid => "Back middle",
            PrintAreaKey::BackBottom => "Back bottom",
        }
    }

    /// Usual content for the area, shown as a hint in the guided flow
    pub fn tip(&self) -> &'static str {
        match self {
            PrintAreaKey::FrontLeftChest => "Usually the initial of the school or group name.",
            PrintAreaKey::FrontRightChest => "Usually a logo or an image.",
            PrintAreaKey::FrontLeftSleeve => "Usually a logo or an image.",
            PrintAreaKey::FrontRightSleeve => "Usually a class year or a number.",
            PrintAreaKey::BackTop => "Usually the school name.",
            PrintAreaKey::BackTop2 => "Usually UNIV. or University.",
            PrintAreaKey::BackMid => "Usually an embroidered school logo or graphic.",
            PrintAreaKey::BackBottom => "Usually a major or a script line such as 'since 2022'.",
        }
    }
}

impl Display for PrintAreaKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrintAreaKey {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrintAreaKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| MockupError::UnknownPrintArea(s.to_string()))
    }
}

const FRONT_PATCH_ORDER: [PrintAreaKey; 4] = [
    PrintAreaKey::FrontLeftChest,
    PrintAreaKey::FrontRightChest,
    PrintAreaKey::FrontLeftSleeve,
    PrintAreaKey::FrontRightSleeve,
];

const BACK_PATCH_ORDER: [PrintAreaKey; 4] = [
    PrintAreaKey::BackTop,
    PrintAreaKey::BackTop2,
    PrintAreaKey::BackMid,
    PrintAreaKey::BackBottom,
];

const BORDER_SUFFIX: &str = "_border";

/// Any drawable layer: a base garment part, a print-area patch, or a patch border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKey {
    Base(BaseLayer),
    Patch(PrintAreaKey),
    Border(PrintAreaKey),
}

impl LayerKey {
    pub fn side(&self) -> Side {
        match self {
            LayerKey::Base(layer) => layer.side(),
            LayerKey::Patch(key) | LayerKey::Border(key) => key.side(),
        }
    }
}

impl Display for LayerKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKey::Base(layer) => f.write_str(layer.as_str()),
            LayerKey::Patch(key) => f.write_str(key.as_str()),
            LayerKey::Border(key) => write!(f, "{}{}", key.as_str(), BORDER_SUFFIX),
        }
    }
}

impl FromStr for LayerKey {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(layer) = s.parse::<BaseLayer>() {
            return Ok(LayerKey::Base(layer));
        }
        if let Some(patch) = s.strip_suffix(BORDER_SUFFIX) {
            return patch
                .parse::<PrintAreaKey>()
                .map(LayerKey::Border)
                .map_err(|_| MockupError::UnknownLayer(s.to_string()));
        }
        s.parse::<PrintAreaKey>()
            .map(LayerKey::Patch)
            .map_err(|_| MockupError::UnknownLayer(s.to_string()))
    }
}

impl Serialize for LayerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LayerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Base layers of one side, bottom to top
pub fn base_layer_order(side: Side) -> &'static [BaseLayer] {
    match side {
        Side::Front => &FRONT_LAYER_ORDER,
        Side::Back => &BACK_LAYER_ORDER,
    }
}

/// Print areas of one side, in drawing order
pub fn print_area_order(side: Side) -> &'static [PrintAreaKey] {
    match side {
        Side::Front => &FRONT_PATCH_ORDER,
        Side::Back => &BACK_PATCH_ORDER,
    }
}

/// Sibling layer holding the border shape of a print area (`<key>_border`)
pub fn border_layer_key(key: PrintAreaKey) -> LayerKey {
    LayerKey::Border(key)
}
