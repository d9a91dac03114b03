use crate::boxes::{AreaBox, CssBox};
use crate::colors::{GarmentColors, LiningOz};
use crate::compositor::DrawOp;
use crate::export::renderer::prepare_side_views;
use crate::export::MockupDocument;
use crate::print_areas::PrintAreas;
use crate::registry::{PrintAreaKey, Side};
use crate::session::FlowStep;
use indexmap::IndexMap;
use serde::Serialize;
use std::error::Error;

#[derive(Serialize)]
struct HighlightJson {
    key: PrintAreaKey,
    #[serde(rename = "box")]
    area: AreaBox,
    css: CssBox,
    right: f64,
    bottom: f64,
}

#[derive(Serialize)]
struct SideJson {
    ops: Vec<DrawOp>,
    highlight: Option<HighlightJson>,
}

// Sides keep the requested order, so this is a struct rather than a json! value
#[derive(Serialize)]
struct MockupJson<'a> {
    name: &'a str,
    step: FlowStep,
    active_area: Option<PrintAreaKey>,
    lining_oz: LiningOz,
    colors: &'a GarmentColors,
    print_areas: &'a PrintAreas,
    sides: IndexMap<Side, SideJson>,
}

pub fn render(doc: &MockupDocument, sides: &[Side]) -> Result<String, Box<dyn Error>> {
    let mut views = IndexMap::new();
    for view in prepare_side_views(doc, sides) {
        views.insert(
            view.side,
            SideJson {
                ops: view.draw_ops,
                highlight: view.highlight.map(|h| HighlightJson {
                    key: h.key,
                    area: h.area,
                    css: h.css,
                    right: h.right,
                    bottom: h.bottom,
                }),
            },
        );
    }

    let res = MockupJson {
        name: &doc.name,
        step: doc.session.step,
        active_area: doc.session.active_area,
        lining_oz: doc.session.lining_oz,
        colors: &doc.session.colors,
        print_areas: &doc.session.print_areas,
        sides: views,
    };
    Ok(serde_json::to_string_pretty(&res)?)
}
