//! Builds the ordered draw-operation stack for one side of the garment.
//!
//! The output is renderer-agnostic: a [`DrawOp::MaskedFill`] fills the canvas with
//! a solid color clipped to the alpha shape of an image, a [`DrawOp::Image`] paints
//! an image as-is. Ops are listed bottom to top.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::assets::AssetIndex;
use crate::colors::{resolve_base_color, tint, GarmentColors};
use crate::print_areas::PrintAreas;
use crate::registry::{
    base_layer_order, border_layer_key, print_area_order, LayerKey, PrintAreaKey, Side,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    MaskedFill {
        layer: LayerKey,
        mask_url: String,
        color: String,
    },
    Image {
        layer: LayerKey,
        url: String,
    },
}

impl DrawOp {
    pub fn layer(&self) -> LayerKey {
        match self {
            DrawOp::MaskedFill { layer, .. } | DrawOp::Image { layer, .. } => *layer,
        }
    }

    pub fn is_masked_fill(&self) -> bool {
        matches!(self, DrawOp::MaskedFill { .. })
    }
}

fn masked_fill(layer: LayerKey, mask_url: &str, color: &str) -> DrawOp {
    DrawOp::MaskedFill {
        layer,
        mask_url: mask_url.to_string(),
        color: color.to_string(),
    }
}

/// Compose one side: base layers in registry order, then print areas in registry
/// order with each border drawn before its face.
pub fn compose(
    side: Side,
    assets: &AssetIndex,
    colors: &GarmentColors,
    print_areas: &PrintAreas,
) -> Vec<DrawOp> {
    let mut ops = Vec::new();

    for layer in base_layer_order(side) {
        let key = LayerKey::Base(*layer);
        let Some(url) = assets.get(key) else {
            trace!("No image for base layer {}, skipping", key);
            continue;
        };
        match resolve_base_color(side, *layer, colors) {
            Some(color) => ops.push(masked_fill(key, url, color)),
            None => ops.push(DrawOp::Image {
                layer: key,
                url: url.to_string(),
            }),
        }
    }

    for area in print_area_order(side) {
        compose_print_area(*area, assets, print_areas, &mut ops);
    }

    debug!("Composed {} side with {} draw ops", side, ops.len());
    ops
}

fn compose_print_area(
    key: PrintAreaKey,
    assets: &AssetIndex,
    print_areas: &PrintAreas,
    ops: &mut Vec<DrawOp>,
) {
    let state = print_areas.get(key);
    if !state.visible {
        trace!("Print area {} hidden", key);
        return;
    }
    let patch = LayerKey::Patch(key);
    let Some(patch_url) = assets.get(patch) else {
        trace!("No patch image for print area {}, skipping", key);
        return;
    };

    let border = border_layer_key(key);
    if let (Some(border_url), Some(color)) =
        (assets.get(border), tint(state.border_color.as_deref()))
    {
        ops.push(masked_fill(border, border_url, color));
    }

    if let Some(color) = tint(state.face_color.as_deref()) {
        ops.push(masked_fill(patch, patch_url, color));
    }
}
