//! cmap merging

use log::debug;

use crate::model::FontTableSet;

/// Map every codepoint of `incoming` that no base subtable maps yet.
///
/// New entries go into the base's first subtable; a Windows Unicode BMP
/// subtable is created when the base has none. Incoming subtables are read
/// in order, so the first incoming mapping of a codepoint wins. Returns the
/// number of codepoints added.
pub fn merge_cmap(base: &mut FontTableSet, incoming: &FontTableSet) -> usize {
    let mut mapped = base.mapped_codepoints();
    let mut added = 0;

    for subtable in &incoming.char_map {
        for (&codepoint, glyph) in &subtable.entries {
            if !mapped.insert(codepoint) {
                continue;
            }
            if !base.contains_glyph(glyph) {
                debug!("Skipping {codepoint}: glyph '{glyph}' is not in the merged font");
                continue;
            }
            base.map_codepoint(codepoint, glyph.clone());
            added += 1;
        }
    }

    added
}
