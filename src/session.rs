//! Configuration session snapshot and the reducer that advances it.
//!
//! Every change goes through [`MockupSession::apply`], which returns a new
//! snapshot and leaves the previous one untouched. Renderers only ever read
//! snapshots.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::debug;

use crate::assets::AssetIndex;
use crate::boxes::{active_highlight, AreaBox, BoxOverrides};
use crate::colors::{GarmentColors, LiningOz};
use crate::compositor::{compose, DrawOp};
use crate::print_areas::{get_default_print_areas, PrintAreas};
use crate::registry::{PrintAreaKey, Side};
use crate::upload::UploadTarget;

/// Steps of the guided configuration flow
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    #[default]
    Colors,
    FrontPrint,
    BackPrint,
    Review,
}

impl FlowStep {
    pub const ALL: [FlowStep; 4] = [
        FlowStep::Colors,
        FlowStep::FrontPrint,
        FlowStep::BackPrint,
        FlowStep::Review,
    ];

    /// 1-based step number
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn title(&self) -> &'static str {
        match self {
            FlowStep::Colors => "Colors",
            FlowStep::FrontPrint => "Front print",
            FlowStep::BackPrint => "Back print",
            FlowStep::Review => "Review",
        }
    }

    /// Sides shown while this step is active
    pub fn visible_sides(&self) -> &'static [Side] {
        match self {
            FlowStep::FrontPrint => &[Side::Front],
            FlowStep::BackPrint => &[Side::Back],
            FlowStep::Colors | FlowStep::Review => &Side::BOTH,
        }
    }

    pub fn next(&self) -> FlowStep {
        let idx = (*self as usize + 1).min(Self::ALL.len() - 1);
        Self::ALL[idx]
    }

    pub fn previous(&self) -> FlowStep {
        Self::ALL[(*self as usize).saturating_sub(1)]
    }
}

impl Display for FlowStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// A single user interaction
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    SetBodyColor(Option<String>),
    SetSleeveColor(Option<String>),
    SetRibbingColor(Option<String>),
    SetLiningColor(Option<String>),
    SetButtonColor(Option<String>),
    SetLiningOz(LiningOz),
    SetVisible(PrintAreaKey, bool),
    SetFaceColor(PrintAreaKey, Option<String>),
    SetBorderColor(PrintAreaKey, Option<String>),
    SetText(PrintAreaKey, Option<String>),
    SetImageUrl(PrintAreaKey, Option<String>),
    /// Result of a successful upload
    Uploaded(UploadTarget, String),
    ClearAdditionalNote,
    Focus(Option<PrintAreaKey>),
    NextStep,
    PreviousStep,
    GoToStep(FlowStep),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MockupSession {
    pub colors: GarmentColors,
    pub print_areas: PrintAreas,
    #[serde(default)]
    pub lining_oz: LiningOz,
    #[serde(default)]
    pub active_area: Option<PrintAreaKey>,
    #[serde(default)]
    pub additional_note_image_url: Option<String>,
    #[serde(default)]
    pub step: FlowStep,
}

impl Default for MockupSession {
    fn default() -> Self {
        Self {
            colors: GarmentColors::default(),
            print_areas: get_default_print_areas(),
            lining_oz: LiningOz::default(),
            active_area: None,
            additional_note_image_url: None,
            step: FlowStep::default(),
        }
    }
}

impl MockupSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, action: SessionAction) -> MockupSession {
        debug!("Applying {:?}", action);
        let mut next = self.clone();
        match action {
            SessionAction::SetBodyColor(color) => next.colors.set_body(color),
            SessionAction::SetSleeveColor(color) => next.colors.set_sleeves(color),
            SessionAction::SetRibbingColor(color) => next.colors.set_ribbing(color),
            SessionAction::SetLiningColor(color) => next.colors.set_lining(color),
            SessionAction::SetButtonColor(color) => next.colors.set_buttons(color),
            SessionAction::SetLiningOz(oz) => next.lining_oz = oz,
            SessionAction::SetVisible(key, visible) => next.print_areas.set_visible(key, visible),
            SessionAction::SetFaceColor(key, color) => next.print_areas.set_face_color(key, color),
            SessionAction::SetBorderColor(key, color) => {
                next.print_areas.set_border_color(key, color)
            }
            SessionAction::SetText(key, text) => next.print_areas.set_text(key, text),
            SessionAction::SetImageUrl(key, url) => next.print_areas.set_image_url(key, url),
            SessionAction::Uploaded(UploadTarget::PrintArea(key), url) => {
                next.print_areas.set_image_url(key, Some(url))
            }
            SessionAction::Uploaded(UploadTarget::AdditionalNote, url) => {
                next.additional_note_image_url = Some(url)
            }
            SessionAction::ClearAdditionalNote => next.additional_note_image_url = None,
            SessionAction::Focus(key) => next.active_area = key,
            SessionAction::NextStep => next.step = self.step.next(),
            SessionAction::PreviousStep => next.step = self.step.previous(),
            SessionAction::GoToStep(step) => next.step = step,
        }
        next
    }

    /// Fold a batch of actions, left to right
    pub fn apply_all(&self, actions: impl IntoIterator<Item = SessionAction>) -> MockupSession {
        actions
            .into_iter()
            .fold(self.clone(), |session, action| session.apply(action))
    }

    pub fn compose(&self, side: Side, assets: &AssetIndex) -> Vec<DrawOp> {
        compose(side, assets, &self.colors, &self.print_areas)
    }

    pub fn highlight(&self, side: Side, overrides: &BoxOverrides) -> Option<AreaBox> {
        active_highlight(side, self.active_area, overrides)
    }

    pub fn visible_sides(&self) -> &'static [Side] {
        self.step.visible_sides()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_leaves_previous_snapshot() {
        let before = MockupSession::new();
        let after = before.apply(SessionAction::SetBodyColor(Some("#722f37".to_string())));
        assert_eq!(before.colors.front().body(), Some("#1a1a1a"));
        assert_eq!(after.colors.front().body(), Some("#722f37"));
        assert_eq!(after.colors.back().body(), Some("#722f37"));
    }

    #[test]
    fn test_upload_actions() {
        let session = MockupSession::new().apply_all([
            SessionAction::Uploaded(
                UploadTarget::PrintArea(PrintAreaKey::BackMid),
                "https://files/back_mid/1.png".to_string(),
            ),
            SessionAction::Uploaded(
                UploadTarget::AdditionalNote,
                "https://files/additional_note/2.png".to_string(),
            ),
        ]);
        assert_eq!(
            session.print_areas.get(PrintAreaKey::BackMid).image_url.as_deref(),
            Some("https://files/back_mid/1.png")
        );
        assert_eq!(
            session.additional_note_image_url.as_deref(),
            Some("https://files/additional_note/2.png")
        );

        let cleared = session.apply(SessionAction::ClearAdditionalNote);
        assert_eq!(cleared.additional_note_image_url, None);
    }

    #[test]
    fn test_flow_steps_saturate() {
        assert_eq!(FlowStep::Colors.previous(), FlowStep::Colors);
        assert_eq!(FlowStep::Review.next(), FlowStep::Review);
        assert_eq!(FlowStep::FrontPrint.next(), FlowStep::BackPrint);
        assert_eq!(FlowStep::BackPrint.number(), 3);
        assert_eq!(FlowStep::FrontPrint.to_string(), "2. Front print");
    }

    #[test]
    fn test_visible_sides_per_step() {
        let session = MockupSession::new();
        assert_eq!(session.visible_sides(), &[Side::Front, Side::Back]);
        let session = session.apply(SessionAction::NextStep);
        assert_eq!(session.visible_sides(), &[Side::Front]);
        let session = session.apply(SessionAction::NextStep);
        assert_eq!(session.visible_sides(), &[Side::Back]);
        let session = session.apply(SessionAction::GoToStep(FlowStep::Review));
        assert_eq!(session.visible_sides().len(), 2);
    }

    #[test]
    fn test_focus_drives_highlight() {
        let overrides = BoxOverrides::new();
        let session = MockupSession::new().apply(SessionAction::Focus(Some(PrintAreaKey::FrontLeftChest)));
        assert!(session.highlight(Side::Front, &overrides).is_some());
        assert!(session.highlight(Side::Back, &overrides).is_none());

        let session = session.apply(SessionAction::Focus(None));
        assert!(session.highlight(Side::Front, &overrides).is_none());
    }
}
