//! Round-trip validation of a merged table set

use std::path::Path;

use log::debug;
use tempfile::Builder;

use crate::{codec::FontCodec, error::ValidationError, model::FontTableSet};

/// Save `table` to a scratch file in `scratch_dir` and load it back.
///
/// The scratch file is removed when this returns, whatever the outcome.
pub fn validate(
    table: &FontTableSet,
    codec: &impl FontCodec,
    scratch_dir: &Path,
) -> Result<(), ValidationError> {
    let scratch = Builder::new()
        .prefix(".fontmeld-validate-")
        .suffix(".ttf")
        .tempfile_in(scratch_dir)
        .map_err(|err| ValidationError(err.into()))?;

    codec.save(table, scratch.path())?;
    let reloaded = codec.load(scratch.path())?;
    debug!("Round trip reloaded {} glyphs", reloaded.glyph_order.len());
    Ok(())
}
