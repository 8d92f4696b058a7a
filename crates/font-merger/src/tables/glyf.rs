//! glyf merging (TrueType outlines)
//!
//! Per-glyph hinting instructions are stripped from every incoming glyph.
//! Only the base font's `fpgm`, `prep` and `cvt ` survive the merge, and
//! instructions written against another font's function numbers or CVT
//! indices would misrender.

use log::debug;

use crate::{
    error::{FontRole, MergeError},
    glyph_order::GlyphName,
    model::{FontTableSet, GlyphOutline, OutlineTable},
};

/// Append every glyph of `incoming` whose name the base lacks.
///
/// Returns the added names in incoming glyph order. Fails before touching
/// `base` when either side has no TrueType outlines.
pub fn merge_glyf(
    base: &mut FontTableSet,
    incoming: &FontTableSet,
) -> Result<Vec<GlyphName>, MergeError> {
    let incoming_outlines = require_outlines(incoming, FontRole::Incoming)?;
    require_outlines(base, FontRole::Base)?;

    let mut added = Vec::new();
    let mut kept = 0usize;
    for name in &incoming.glyph_order {
        if base.glyph_order.contains(name) {
            kept += 1;
            continue;
        }
        let outline = incoming_outlines.get(name).map(strip_hinting).unwrap_or(GlyphOutline::Empty);
        base.glyph_order.insert(name.clone());
        if let Some(outlines) = base.outlines.as_mut() {
            outlines.insert(name.clone(), outline);
        }
        added.push(name.clone());
    }

    if kept > 0 {
        debug!("Kept {kept} base glyphs over same-named incoming glyphs");
    }
    Ok(added)
}

fn require_outlines(font: &FontTableSet, role: FontRole) -> Result<&OutlineTable, MergeError> {
    font.outlines.as_ref().ok_or(MergeError::MissingRequiredTable { table: "glyf", role })
}

fn strip_hinting(outline: &GlyphOutline) -> GlyphOutline {
    let mut outline = outline.clone();
    if let GlyphOutline::Simple(simple) = &mut outline {
        simple.instructions.clear();
    }
    outline
}
