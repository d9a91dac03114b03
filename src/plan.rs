use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::colors::LiningOz;
use crate::inquiry::InquiryDetails;
use crate::registry::{PrintAreaKey, Side};
use crate::session::{FlowStep, MockupSession, SessionAction};

/// ## Structure
/// This module contains the data structures for the mockup plan file.
///
/// ```text
/// Plan
///   ├── meta: Option<Meta>
///   │   └── name: Option<String>
///   ├── assets: AssetsConfig
///   │   ├── manifest: Option<String>
///   │   └── rest: Option<RestAssetsConfig>
///   ├── colors: ColorsConfig
///   ├── print_areas: map of key -> PrintAreaConfig
///   ├── active_area: Option<PrintAreaKey>
///   ├── lining_oz: Option<LiningOz>
///   ├── step: Option<FlowStep>
///   ├── boxes: Option<BoxesConfig>
///   ├── inquiry: Option<InquiryDetails>
///   ├── render: RenderConfig
///   └── export: ExportProfile
///       └── profiles: Vec<ExportProfileItem>
///           ├── filename: String
///           ├── exporter: ExportFileType
///           │   ├── JSON
///           │   ├── SVG
///           │   ├── Payload
///           │   └── Custom(CustomExportProfile)
///           └── side: Option<Side>
/// ```
///
/// Colors are optional strings: a missing entry keeps the session default and
/// an empty string means "no color".

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Meta {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Plan {
    pub meta: Option<Meta>,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default)]
    pub print_areas: BTreeMap<PrintAreaKey, PrintAreaConfig>,
    #[serde(default)]
    pub active_area: Option<PrintAreaKey>,
    #[serde(default)]
    pub lining_oz: Option<LiningOz>,
    #[serde(default)]
    pub step: Option<FlowStep>,
    #[serde(default)]
    pub boxes: Option<BoxesConfig>,
    #[serde(default)]
    pub inquiry: Option<InquiryDetails>,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub export: ExportProfile,
}

//
// Session configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AssetsConfig {
    /// CSV or JSON manifest, relative to the plan file
    pub manifest: Option<String>,
    pub rest: Option<RestAssetsConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RestAssetsConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ColorsConfig {
    pub body: Option<String>,
    pub sleeves: Option<String>,
    pub ribbing: Option<String>,
    pub lining: Option<String>,
    pub buttons: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PrintAreaConfig {
    pub visible: Option<bool>,
    pub face_color: Option<String>,
    pub border_color: Option<String>,
    pub text: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BoxesConfig {
    /// Directory of the box-override store, relative to the plan file
    pub store: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub background: Option<String>,
    /// Draw the dashed box around the active print area
    pub show_highlight: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 720,
            background: None,
            show_highlight: true,
        }
    }
}

impl Plan {
    pub fn name(&self) -> String {
        self.meta
            .as_ref()
            .and_then(|meta| meta.name.clone())
            .unwrap_or_else(|| "Unnamed Mockup".to_string())
    }

    /// Session actions that turn a fresh session into the configured one
    pub fn session_actions(&self) -> Vec<SessionAction> {
        let mut actions = Vec::new();
        let colors = &self.colors;
        let color_actions: [(&Option<String>, fn(Option<String>) -> SessionAction); 5] = [
            (&colors.body, SessionAction::SetBodyColor),
            (&colors.sleeves, SessionAction::SetSleeveColor),
            (&colors.ribbing, SessionAction::SetRibbingColor),
            (&colors.lining, SessionAction::SetLiningColor),
            (&colors.buttons, SessionAction::SetButtonColor),
        ];
        for (value, action) in color_actions {
            if let Some(color) = value {
                actions.push(action(Some(color.clone())));
            }
        }

        for (key, area) in &self.print_areas {
            let key = *key;
            if let Some(visible) = area.visible {
                actions.push(SessionAction::SetVisible(key, visible));
            }
            if let Some(color) = &area.face_color {
                actions.push(SessionAction::SetFaceColor(key, non_blank(color)));
            }
            if let Some(color) = &area.border_color {
                actions.push(SessionAction::SetBorderColor(key, non_blank(color)));
            }
            if let Some(text) = &area.text {
                actions.push(SessionAction::SetText(key, Some(text.clone())));
            }
            if let Some(url) = &area.image_url {
                actions.push(SessionAction::SetImageUrl(key, Some(url.clone())));
            }
        }

        if let Some(oz) = self.lining_oz {
            actions.push(SessionAction::SetLiningOz(oz));
        }
        if let Some(step) = self.step {
            actions.push(SessionAction::GoToStep(step));
        }
        if self.active_area.is_some() {
            actions.push(SessionAction::Focus(self.active_area));
        }
        actions
    }

    pub fn build_session(&self) -> MockupSession {
        MockupSession::new().apply_all(self.session_actions())
    }
}

fn non_blank(color: &str) -> Option<String> {
    Some(color.to_string()).filter(|c| !c.trim().is_empty())
}

//
// Export configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExportProfile {
    pub profiles: Vec<ExportProfileItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExportProfileItem {
    pub filename: String,
    pub exporter: ExportFileType,
    /// Limit the export to one side; otherwise the sides of the current step
    pub side: Option<Side>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CustomExportProfile {
    pub template: String,
    pub partials: Option<HashMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ExportFileType {
    JSON,
    SVG,
    Payload,
    Custom(CustomExportProfile),
}

impl ExportProfileItem {
    pub fn sides(&self, session: &MockupSession) -> Vec<Side> {
        match self.side {
            Some(side) => vec![side],
            None => session.visible_sides().to_vec(),
        }
    }
}
