//! vmtx merging

use log::debug;

use crate::{glyph_order::GlyphName, model::FontTableSet, tables::hmtx::copy_metrics};

/// Copy vertical metrics for `added` glyphs when both fonts have them.
pub fn merge_vmtx(base: &mut FontTableSet, incoming: &FontTableSet, added: &[GlyphName]) {
    match (base.v_metrics.as_mut(), incoming.v_metrics.as_ref()) {
        (Some(base_metrics), Some(incoming_metrics)) => {
            copy_metrics(base_metrics, incoming_metrics, added, "vmtx");
        }
        (None, Some(_)) => debug!("Base font has no vmtx, dropping incoming vertical metrics"),
        _ => {}
    }
}
