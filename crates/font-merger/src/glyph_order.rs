//! Glyph names and glyph ordering
//!
//! Glyphs are identified by name throughout the merge engine: glyph ids are
//! only meaningful inside one binary font and are assigned by the codec when
//! a table set is encoded.

use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{Display, Formatter, Result},
    ops::Deref,
};

use indexmap::IndexSet;

use crate::types::Codepoint;

/// Ordered, duplicate-free sequence of glyph names. Position is glyph id.
pub type GlyphOrder = IndexSet<GlyphName>;

pub const NOTDEF: &str = ".notdef";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlyphName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlyphName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GlyphName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<GlyphName> for String {
    fn from(GlyphName(name): GlyphName) -> Self {
        name
    }
}

/// Fallback name for a glyph the font does not name.
pub fn fallback_name(gid: u16) -> GlyphName {
    if gid == 0 { GlyphName::new(NOTDEF) } else { GlyphName::new(format!("glyph{gid:05}")) }
}

/// Name for an unnamed glyph that `cp` maps to: `uniXXXX` in the BMP,
/// `uXXXXX` above it.
pub fn codepoint_name(cp: Codepoint) -> GlyphName {
    let cp = cp.to_u32();
    if cp <= 0xFFFF {
        GlyphName::new(format!("uni{cp:04X}"))
    } else {
        GlyphName::new(format!("u{cp:05X}"))
    }
}

/// Build a glyph order from raw per-glyph names, renaming repeats.
///
/// A name seen before becomes `name#1`, `name#2`, ... so every glyph keeps a
/// distinct identity. Missing names fall back to [`fallback_name`].
pub fn build_glyph_order(names: impl IntoIterator<Item = Option<String>>) -> GlyphOrder {
    let mut order = GlyphOrder::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();

    for (gid, name) in names.into_iter().enumerate() {
        let name = match name {
            Some(name) if !name.is_empty() => GlyphName::new(name),
            _ => fallback_name(gid as u16),
        };
        if !order.contains(&name) {
            order.insert(name);
            continue;
        }
        let count = repeats.entry(name.to_string()).or_insert(0);
        loop {
            *count += 1;
            let renamed = GlyphName::new(format!("{name}#{count}"));
            if order.insert(renamed) {
                break;
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_name_equality() {
        let name = GlyphName::new("test");
        assert_eq!(name, "test");
        assert_eq!(name, GlyphName::from(String::from("test")));
        assert_eq!(name.len(), 4);
    }

    #[test]
    fn test_glyph_order_lookup_by_str() {
        let order = build_glyph_order([Some(".notdef".into()), Some("A".into())]);
        assert!(order.contains("A"));
        assert_eq!(order.get_index_of("A"), Some(1));
    }

    #[test]
    fn test_fallback_names() {
        let order = build_glyph_order([None, None, Some(String::new())]);
        let names: Vec<&str> = order.iter().map(GlyphName::as_str).collect();
        assert_eq!(names, [".notdef", "glyph00001", "glyph00002"]);
    }

    #[test]
    fn test_codepoint_names() {
        assert_eq!(codepoint_name(Codepoint::new(0x41)), "uni0041");
        assert_eq!(codepoint_name(Codepoint::new(0x4E00)), "uni4E00");
        assert_eq!(codepoint_name(Codepoint::new(0x1F600)), "u1F600");
        assert_eq!(codepoint_name(Codepoint::new(0x10FFFD)), "u10FFFD");
    }

    #[test]
    fn test_repeated_names_are_renamed() {
        let order = build_glyph_order([
            Some(".notdef".into()),
            Some("a".into()),
            Some("a".into()),
            Some("a#1".into()),
            Some("a".into()),
        ]);
        let names: Vec<&str> = order.iter().map(GlyphName::as_str).collect();
        assert_eq!(names, [".notdef", "a", "a#1", "a#1#1", "a#2"]);
    }
}
