pub mod to_custom;
pub mod to_json;
pub mod to_payload;
pub mod to_svg;

use crate::assets::AssetIndex;
use crate::boxes::BoxOverrides;
use crate::inquiry::InquiryDetails;
use crate::plan::RenderConfig;
use crate::session::MockupSession;

/// Everything an exporter needs to render one configuration
#[derive(Clone, Debug)]
pub struct MockupDocument {
    pub name: String,
    pub session: MockupSession,
    pub assets: AssetIndex,
    pub boxes: BoxOverrides,
    pub render: RenderConfig,
    pub inquiry: Option<InquiryDetails>,
}

/// Common rendering function used by all exporters
/// This helps eliminate duplication across export modules
pub mod renderer {
    use super::MockupDocument;
    use crate::boxes::{AreaBox, CssBox, CANVAS_EXTENT};
    use crate::colors::{
        color_display_name, resolve_base_color, ColorPreset, BODY_PRESETS, PRINT_AREA_PRESETS,
        SLEEVE_BUTTON_PRESETS,
    };
    use crate::compositor::DrawOp;
    use crate::registry::{base_layer_order, BaseLayer, PrintAreaKey, Side};
    use serde::Serialize;
    use serde_json::{json, Value};
    use std::error::Error;

    #[derive(Serialize, Clone, Debug)]
    pub struct HighlightView {
        pub key: PrintAreaKey,
        pub label: &'static str,
        pub tip: &'static str,
        pub area: AreaBox,
        pub css: CssBox,
        pub right: f64,
        pub bottom: f64,
        pub x: f64,
        pub y: f64,
        pub width: f64,
        pub height: f64,
    }

    #[derive(Serialize, Clone, Debug)]
    pub struct OpView {
        pub op: &'static str,
        pub layer: String,
        pub href: String,
        pub color: Option<String>,
        pub mask_id: String,
        pub canvas_width: u32,
        pub canvas_height: u32,
    }

    #[derive(Serialize, Clone, Debug)]
    pub struct SideView {
        pub side: Side,
        pub label: &'static str,
        pub offset_x: u32,
        pub ops: Vec<OpView>,
        pub draw_ops: Vec<DrawOp>,
        pub highlight: Option<HighlightView>,
    }

    fn side_label(side: Side) -> &'static str {
        match side {
            Side::Front => "Front",
            Side::Back => "Back",
        }
    }

    fn op_view(side: Side, index: usize, op: &DrawOp, doc: &MockupDocument) -> OpView {
        let (name, href, color) = match op {
            DrawOp::MaskedFill {
                mask_url, color, ..
            } => ("masked_fill", mask_url.clone(), Some(color.clone())),
            DrawOp::Image { url, .. } => ("image", url.clone(), None),
        };
        OpView {
            op: name,
            layer: op.layer().to_string(),
            href,
            color,
            mask_id: format!("{}-mask-{}", side, index),
            canvas_width: doc.render.width,
            canvas_height: doc.render.height,
        }
    }

    fn highlight_view(side: Side, doc: &MockupDocument) -> Option<HighlightView> {
        if !doc.render.show_highlight {
            return None;
        }
        let key = doc.session.active_area?;
        let area = doc.session.highlight(side, &doc.boxes)?;
        let scale_x = f64::from(doc.render.width) / CANVAS_EXTENT;
        let scale_y = f64::from(doc.render.height) / CANVAS_EXTENT;
        Some(HighlightView {
            key,
            label: key.label(),
            tip: key.tip(),
            css: area.to_css(),
            right: area.right(),
            bottom: area.bottom(),
            x: area.left * scale_x,
            y: area.top * scale_y,
            width: area.width * scale_x,
            height: area.height * scale_y,
            area,
        })
    }

    /// Draw ops and highlight of each requested side, laid out left to right
    pub fn prepare_side_views(doc: &MockupDocument, sides: &[Side]) -> Vec<SideView> {
        sides
            .iter()
            .enumerate()
            .map(|(position, side)| {
                let draw_ops = doc.session.compose(*side, &doc.assets);
                let ops = draw_ops
                    .iter()
                    .enumerate()
                    .map(|(index, op)| op_view(*side, index, op, doc))
                    .collect();
                SideView {
                    side: *side,
                    label: side_label(*side),
                    offset_x: position as u32 * doc.render.width,
                    ops,
                    draw_ops,
                    highlight: highlight_view(*side, doc),
                }
            })
            .collect()
    }

    fn color_summary(doc: &MockupDocument) -> Vec<Value> {
        Side::BOTH
            .iter()
            .flat_map(|side| base_layer_order(*side).iter().map(move |layer| (*side, *layer)))
            .map(|(side, layer)| {
                let color = resolve_base_color(side, layer, &doc.session.colors);
                let presets: &[ColorPreset] = match layer {
                    BaseLayer::FrontSleeves | BaseLayer::BackSleeves | BaseLayer::FrontButtons => {
                        &SLEEVE_BUTTON_PRESETS
                    }
                    _ => &BODY_PRESETS,
                };
                json!({
                    "layer": layer,
                    "label": layer.label(),
                    "color": color,
                    "color_name": color_display_name(color, presets),
                })
            })
            .collect()
    }

    fn print_area_summary(doc: &MockupDocument) -> Vec<Value> {
        doc.session
            .print_areas
            .iter()
            .map(|(key, state)| {
                json!({
                    "key": key,
                    "label": key.label(),
                    "side": key.side(),
                    "visible": state.visible,
                    "face_color": state.face_color,
                    "face_color_name": color_display_name(state.face_color.as_deref(), &PRINT_AREA_PRESETS),
                    "border_color": state.border_color,
                    "border_color_name": color_display_name(state.border_color.as_deref(), &PRINT_AREA_PRESETS),
                    "text": state.text,
                    "image_url": state.image_url,
                    "content": state.content_status(),
                })
            })
            .collect()
    }

    /// Standard rendering function for template-based exports
    pub fn render_template(
        doc: &MockupDocument,
        sides: &[Side],
        template: &str,
    ) -> Result<String, Box<dyn Error>> {
        let handlebars = crate::common::get_handlebars();

        let context = create_standard_context(doc, sides);

        let res = handlebars.render_template(template, &context)?;
        Ok(res)
    }

    /// Creates a standard context object used for most templates
    pub fn create_standard_context(doc: &MockupDocument, sides: &[Side]) -> Value {
        let views = prepare_side_views(doc, sides);
        let total_width = doc.render.width * views.len().max(1) as u32;

        json!({
            "name": &doc.name,
            "render": &doc.render,
            "total_width": total_width,
            "step": doc.session.step,
            "step_title": doc.session.step.to_string(),
            "lining_oz": doc.session.lining_oz.to_string(),
            "active_area": doc.session.active_area,
            "additional_note_image_url": &doc.session.additional_note_image_url,
            "sides": views,
            "colors": color_summary(doc),
            "print_areas": print_area_summary(doc),
        })
    }
}
