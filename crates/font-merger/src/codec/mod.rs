//! Conversion between font files and [`FontTableSet`]
//!
//! The merge engine never sees raw bytes. Everything that reads or writes a
//! binary font goes through a [`FontCodec`].

mod read;
mod write;

use std::{fs, io::Write, path::Path};

use log::debug;
use tempfile::NamedTempFile;

use crate::{error::CodecError, model::FontTableSet};

/// Loads and saves table sets.
pub trait FontCodec {
    fn load(&self, path: &Path) -> Result<FontTableSet, CodecError>;

    /// Write `table` to `path`. A failed save leaves no file at `path`.
    fn save(&self, table: &FontTableSet, path: &Path) -> Result<(), CodecError>;
}

/// TrueType sfnt codec built on `read-fonts` and `write-fonts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SfntCodec;

impl SfntCodec {
    pub fn decode(&self, data: &[u8]) -> Result<FontTableSet, CodecError> {
        read::decode(data)
    }

    pub fn encode(&self, table: &FontTableSet) -> Result<Vec<u8>, CodecError> {
        write::encode(table)
    }
}

impl FontCodec for SfntCodec {
    fn load(&self, path: &Path) -> Result<FontTableSet, CodecError> {
        let data = fs::read(path)?;
        let table = self.decode(&data)?;
        debug!("Loaded {} ({} glyphs)", path.display(), table.glyph_order.len());
        Ok(table)
    }

    fn save(&self, table: &FontTableSet, path: &Path) -> Result<(), CodecError> {
        let data = self.encode(table)?;

        // same directory as the target so the final rename cannot cross filesystems
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&data)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| err.error)?;

        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        glyph_order::GlyphName,
        model::{
            BoundingBox, Component, CompositeOutline, GlyphOutline, Metric, MetricTable,
            NameRecord, OutlinePoint, Placement, SimpleOutline,
        },
    };

    fn sample_font() -> FontTableSet {
        let mut font = FontTableSet::new(1000);
        font.add_glyph(".notdef", GlyphOutline::Empty, Metric::new(500, 0));
        font.add_glyph(
            "A",
            GlyphOutline::Simple(SimpleOutline::new(vec![vec![
                OutlinePoint::new(10.0, 0.0, true),
                OutlinePoint::new(300.0, 700.0, true),
                OutlinePoint::new(590.0, 0.0, true),
            ]])),
            Metric::new(600, 10),
        );
        let aacute = CompositeOutline {
            components: vec![
                Component::offset("A", 0.0, 0.0),
                Component::offset("A", 50.0, 120.0),
            ],
            bbox: BoundingBox { x_min: 10, y_min: 0, x_max: 640, y_max: 820 },
        };
        font.add_glyph("Aacute", GlyphOutline::Composite(aacute), Metric::new(600, 10));
        font.map_codepoint(0x41u32, "A");
        font.map_codepoint(0xC1u32, "Aacute");
        font.name_records = vec![
            NameRecord::new(1, 3, 1, 0x409, "Sample"),
            NameRecord::new(2, 3, 1, 0x409, "Regular"),
        ];
        font.maxp.num_glyphs = 3;
        font
    }

    #[test]
    fn test_encode_decode_preserves_merge_tables() {
        let codec = SfntCodec;
        let font = sample_font();

        let decoded = codec.decode(&codec.encode(&font).unwrap()).unwrap();

        assert_eq!(decoded.glyph_order, font.glyph_order);
        assert_eq!(decoded.h_metrics, font.h_metrics);
        assert_eq!(decoded.outline("A"), font.outline("A"));
        let Some(GlyphOutline::Composite(aacute)) = decoded.outline("Aacute") else {
            panic!("expected a composite glyph");
        };
        let placements: Vec<_> =
            aacute.components.iter().map(|c| (c.glyph.as_str(), c.placement)).collect();
        assert_eq!(
            placements,
            [
                ("A", Placement::Offset { dx: 0.0, dy: 0.0 }),
                ("A", Placement::Offset { dx: 50.0, dy: 120.0 }),
            ]
        );
        assert_eq!(decoded.mapped_glyph(0x41u32), Some(&GlyphName::new("A")));
        assert_eq!(decoded.mapped_glyph(0xC1u32), Some(&GlyphName::new("Aacute")));
        assert_eq!(decoded.name(1), Some("Sample"));
        assert_eq!(decoded.units_per_em(), 1000);
        assert_eq!(decoded.glyph_count(), 3);
    }

    #[test]
    fn test_vertical_metrics_round_trip() {
        let codec = SfntCodec;
        let mut font = sample_font();
        let mut v_metrics = MetricTable::new();
        for name in &font.glyph_order {
            v_metrics.insert(name.clone(), Metric::new(1000, 100));
        }
        font.v_metrics = Some(v_metrics);
        font.vhea = Some(Default::default());

        let decoded = codec.decode(&codec.encode(&font).unwrap()).unwrap();

        assert_eq!(decoded.v_metrics, font.v_metrics);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ttf");
        let codec = SfntCodec;

        codec.save(&sample_font(), &path).unwrap();
        let loaded = codec.load(&path).unwrap();

        assert_eq!(loaded.glyph_order.len(), 3);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_save_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        let mut font = sample_font();
        font.maxp.num_glyphs = 7;

        let err = SfntCodec.save(&font, &path).unwrap_err();

        assert!(matches!(err, CodecError::GlyphCountMismatch { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SfntCodec.load(&dir.path().join("absent.ttf")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
