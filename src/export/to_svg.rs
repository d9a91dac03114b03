use crate::export::MockupDocument;
use crate::registry::Side;
use std::error::Error;

pub fn render(doc: &MockupDocument, sides: &[Side]) -> Result<String, Box<dyn Error>> {
    crate::export::renderer::render_template(doc, sides, &get_template())
}

/// Masked fills become a solid rect clipped by an alpha mask of the layer image
pub fn get_template() -> String {
    let template = r##"<svg xmlns="http://www.w3.org/2000/svg" width="{{total_width}}" height="{{render.height}}" viewBox="0 0 {{total_width}} {{render.height}}">
  <title>{{name}}</title>
{{#if (exists render.background)}}
  <rect width="{{total_width}}" height="{{render.height}}" fill="{{render.background}}"/>
{{/if}}
{{#each sides as |view|}}
  <g id="{{view.side}}" transform="translate({{view.offset_x}},0)">
{{#each view.ops as |op|}}
{{#if (stringeq op.op "masked_fill")}}
    <mask id="{{op.mask_id}}" style="mask-type:alpha" maskUnits="userSpaceOnUse" x="0" y="0" width="{{op.canvas_width}}" height="{{op.canvas_height}}">
      <image href="{{op.href}}" width="{{op.canvas_width}}" height="{{op.canvas_height}}" preserveAspectRatio="xMidYMid meet"/>
    </mask>
    <rect data-layer="{{op.layer}}" width="{{op.canvas_width}}" height="{{op.canvas_height}}" fill="{{op.color}}" mask="url(#{{op.mask_id}})"/>
{{else}}
    <image data-layer="{{op.layer}}" href="{{op.href}}" width="{{op.canvas_width}}" height="{{op.canvas_height}}" preserveAspectRatio="xMidYMid meet"/>
{{/if}}
{{/each}}
{{#if (exists view.highlight)}}
    <rect class="highlight" data-area="{{view.highlight.key}}" x="{{view.highlight.x}}" y="{{view.highlight.y}}" width="{{view.highlight.width}}" height="{{view.highlight.height}}" fill="none" stroke="#f59e0b" stroke-width="2" stroke-dasharray="6 4">
      <title>{{view.highlight.label}}: {{view.highlight.tip}}</title>
    </rect>
{{/if}}
  </g>
{{/each}}
</svg>
"##;

    template.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::document;
    use crate::registry::PrintAreaKey;
    use crate::session::{MockupSession, SessionAction};

    #[test]
    fn test_svg_masks_and_order() {
        let output = render(&document(MockupSession::new()), &[Side::Front]).unwrap();
        assert!(output.starts_with("<svg"));
        assert!(output.contains(r#"style="mask-type:alpha""#));
        assert!(output.contains(r#"mask="url(#front-mask-0)""#));

        let body = output.find(r#"data-layer="front_body""#).unwrap();
        let border = output.find(r#"data-layer="front_left_chest_border""#).unwrap();
        let face = output.find(r#"data-layer="front_left_chest""#).unwrap();
        assert!(body < border && border < face);
        assert!(!output.contains("front_right_chest"));
        assert!(!output.contains("class=\"highlight\""));
    }

    #[test]
    fn test_svg_uncolored_layer_is_plain_image() {
        let session = MockupSession::new().apply(SessionAction::SetButtonColor(None));
        let output = render(&document(session), &[Side::Front]).unwrap();
        assert!(output.contains(
            r#"<image data-layer="front_buttons" href="https://cdn.example/front_buttons.png""#
        ));
    }

    #[test]
    fn test_svg_highlight_and_layout() {
        let session =
            MockupSession::new().apply(SessionAction::Focus(Some(PrintAreaKey::BackTop)));
        let mut doc = document(session);
        doc.render.background = Some("#f4f4f5".to_string());
        let output = render(&doc, &[Side::Front, Side::Back]).unwrap();

        assert!(output.contains(r#"width="1200""#));
        assert!(output.contains(r##"fill="#f4f4f5""##));
        assert!(output.contains(r#"transform="translate(600,0)""#));
        assert_eq!(output.matches("class=\"highlight\"").count(), 1);
        assert!(output.contains(r#"data-area="back_top""#));
    }
}
