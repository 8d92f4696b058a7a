//! Merging one font into the accumulating base font

use log::debug;

use crate::{
    error::MergeError,
    model::FontTableSet,
    tables::{
        cmap::merge_cmap, glyf::merge_glyf, hmtx::merge_hmtx, name::merge_names, os2::merge_os2,
        vmtx::merge_vmtx,
    },
};

/// What a single [`merge_into`] call contributed to the base font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub glyphs_added: usize,
    pub codepoints_added: usize,
    pub names_added: usize,
}

/// Merge `incoming` into `base`, first writer wins.
///
/// Glyphs, metrics, codepoints and name ids already present in `base` are
/// never overwritten. The glyph count is not updated here; run
/// [`reconcile`](crate::reconcile::reconcile) once every font is merged.
pub fn merge_into(
    base: &mut FontTableSet,
    incoming: &FontTableSet,
) -> Result<MergeStats, MergeError> {
    let added = merge_glyf(base, incoming)?;
    merge_hmtx(base, incoming, &added);
    merge_vmtx(base, incoming, &added);
    let codepoints_added = merge_cmap(base, incoming);
    let names_added = merge_names(base, incoming);
    merge_os2(base, incoming);

    let stats = MergeStats { glyphs_added: added.len(), codepoints_added, names_added };
    debug!("{stats:?}");
    Ok(stats)
}
