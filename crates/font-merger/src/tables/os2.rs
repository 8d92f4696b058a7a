//! OS/2 merging
//!
//! The base font's OS/2 table is authoritative. Incoming values are never
//! blended in; Unicode and code page ranges are not recomputed either.

use log::debug;

use crate::model::FontTableSet;

pub fn merge_os2(base: &mut FontTableSet, incoming: &FontTableSet) {
    if base.os2.is_none() && incoming.os2.is_some() {
        debug!("Base font has no OS/2 table, incoming OS/2 is ignored");
    }
}
