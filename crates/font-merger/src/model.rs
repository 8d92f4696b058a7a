//! In-memory font table model
//!
//! [`FontTableSet`] is what the merge engine reads and mutates. The header
//! tables are kept as owned `write-fonts` tables so every field the codec
//! does not interpret survives a load/save cycle untouched; the tables the
//! engine merges (outlines, metrics, cmap, names) are modelled by name
//! instead of by glyph id.

use std::collections::{BTreeMap, HashSet};

use font_types::{F2Dot14, FWord, Fixed, LongDateTime, UfWord, Version16Dot16};
use indexmap::IndexMap;
use read_fonts::types::Tag;
use write_fonts::tables::{
    glyf::ComponentFlags,
    head::{Flags, Head, MacStyle},
    hhea::Hhea,
    maxp::Maxp,
    os2::Os2,
    post::Post,
    vhea::Vhea,
};

use crate::{
    glyph_order::{GlyphName, GlyphOrder},
    types::Codepoint,
};

pub type OutlineTable = IndexMap<GlyphName, GlyphOutline>;
pub type MetricTable = IndexMap<GlyphName, Metric>;

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_WINDOWS: u16 = 3;
pub const ENCODING_WINDOWS_BMP: u16 = 1;

/// Advance and side bearing of one glyph, horizontal or vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metric {
    pub advance: u16,
    pub side_bearing: i16,
}

impl Metric {
    pub const ZERO: Metric = Metric { advance: 0, side_bearing: 0 };

    pub const fn new(advance: u16, side_bearing: i16) -> Self {
        Self { advance, side_bearing }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl BoundingBox {
    /// Smallest integer box enclosing `points`, or `None` when empty.
    pub fn enclosing(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let (mut x_min, mut y_min, mut x_max, mut y_max) = (x, y, x, y);
        for (x, y) in points {
            x_min = x_min.min(x);
            y_min = y_min.min(y);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }
        Some(Self {
            x_min: x_min.floor() as i16,
            y_min: y_min.floor() as i16,
            x_max: x_max.ceil() as i16,
            y_max: y_max.ceil() as i16,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePoint {
    pub x: f64,
    pub y: f64,
    pub on_curve: bool,
}

impl OutlinePoint {
    pub const fn new(x: f64, y: f64, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleOutline {
    pub contours: Vec<Vec<OutlinePoint>>,
    pub bbox: BoundingBox,
    pub instructions: Vec<u8>,
}

impl SimpleOutline {
    /// Outline with a bounding box derived from its points and no hinting.
    pub fn new(contours: Vec<Vec<OutlinePoint>>) -> Self {
        let bbox = BoundingBox::enclosing(contours.iter().flatten().map(|p| (p.x, p.y)))
            .unwrap_or_default();
        Self { contours, bbox, instructions: Vec::new() }
    }
}

/// How a component is positioned inside its composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Offset { dx: f64, dy: f64 },
    /// Align point `component` of the component with point `base` of the
    /// composite built so far.
    Point { base: u16, component: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentTransform {
    pub xx: F2Dot14,
    pub yx: F2Dot14,
    pub xy: F2Dot14,
    pub yy: F2Dot14,
}

impl Default for ComponentTransform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::from_f32(1.0),
            yx: F2Dot14::from_f32(0.0),
            xy: F2Dot14::from_f32(0.0),
            yy: F2Dot14::from_f32(1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub glyph: GlyphName,
    pub placement: Placement,
    pub transform: ComponentTransform,
    pub flags: ComponentFlags,
}

impl Component {
    pub fn offset(glyph: impl Into<GlyphName>, dx: f64, dy: f64) -> Self {
        Self {
            glyph: glyph.into(),
            placement: Placement::Offset { dx, dy },
            transform: ComponentTransform::default(),
            flags: ComponentFlags::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOutline {
    pub components: Vec<Component>,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlyphOutline {
    Empty,
    Simple(SimpleOutline),
    Composite(CompositeOutline),
}

impl GlyphOutline {
    /// Every point coordinate of a simple glyph, in contour order.
    pub fn coordinates(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let contours: &[Vec<OutlinePoint>] = match self {
            GlyphOutline::Simple(simple) => &simple.contours,
            _ => &[],
        };
        contours.iter().flatten().map(|p| (p.x, p.y))
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        match self {
            GlyphOutline::Empty => None,
            GlyphOutline::Simple(simple) => Some(simple.bbox),
            GlyphOutline::Composite(composite) => Some(composite.bbox),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmapSubtable {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub entries: BTreeMap<Codepoint, GlyphName>,
}

impl CmapSubtable {
    pub fn new(platform_id: u16, encoding_id: u16) -> Self {
        Self { platform_id, encoding_id, entries: BTreeMap::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub name_id: u16,
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub value: String,
}

impl NameRecord {
    pub fn new(
        name_id: u16,
        platform_id: u16,
        encoding_id: u16,
        language_id: u16,
        value: impl Into<String>,
    ) -> Self {
        Self { name_id, platform_id, encoding_id, language_id, value: value.into() }
    }

    /// Sort key of the binary name table: platform, encoding, language, name id.
    pub fn key(&self) -> (u16, u16, u16, u16) {
        (self.platform_id, self.encoding_id, self.language_id, self.name_id)
    }
}

/// The complete, mutable table set of one font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontTableSet {
    pub head: Head,
    pub hhea: Hhea,
    pub maxp: Maxp,
    pub post: Post,
    pub os2: Option<Os2>,
    pub vhea: Option<Vhea>,
    pub glyph_order: GlyphOrder,
    /// `None` when the font has no TrueType outline table (e.g. CFF fonts).
    pub outlines: Option<OutlineTable>,
    pub h_metrics: MetricTable,
    pub v_metrics: Option<MetricTable>,
    pub char_map: Vec<CmapSubtable>,
    pub name_records: Vec<NameRecord>,
    /// Raw tables carried through without interpretation.
    pub passthrough: BTreeMap<Tag, Vec<u8>>,
}

impl FontTableSet {
    /// An empty TrueType table set on a `units_per_em` grid.
    pub fn new(units_per_em: u16) -> Self {
        let ascender = (units_per_em as i32 * 4 / 5) as i16;
        let descender = -((units_per_em as i32 / 5) as i16);
        Self {
            head: Head {
                font_revision: Fixed::from_f64(1.0),
                checksum_adjustment: 0,
                magic_number: 0x5F0F3CF5,
                flags: Flags::empty(),
                units_per_em,
                created: LongDateTime::new(0),
                modified: LongDateTime::new(0),
                x_min: 0,
                y_min: 0,
                x_max: 0,
                y_max: 0,
                mac_style: MacStyle::empty(),
                lowest_rec_ppem: 8,
                font_direction_hint: 2,
                index_to_loc_format: 0,
            },
            hhea: Hhea {
                ascender: FWord::new(ascender),
                descender: FWord::new(descender),
                line_gap: FWord::new(0),
                advance_width_max: UfWord::new(0),
                min_left_side_bearing: FWord::new(0),
                min_right_side_bearing: FWord::new(0),
                x_max_extent: FWord::new(0),
                caret_slope_rise: 1,
                caret_slope_run: 0,
                caret_offset: 0,
                number_of_h_metrics: 0,
            },
            maxp: Maxp {
                num_glyphs: 0,
                max_points: Some(0),
                max_contours: Some(0),
                max_composite_points: Some(0),
                max_composite_contours: Some(0),
                max_zones: Some(1),
                max_twilight_points: Some(0),
                max_storage: Some(0),
                max_function_defs: Some(0),
                max_instruction_defs: Some(0),
                max_stack_elements: Some(0),
                max_size_of_instructions: Some(0),
                max_component_elements: Some(0),
                max_component_depth: Some(0),
            },
            post: Post {
                version: Version16Dot16::VERSION_3_0,
                italic_angle: Fixed::from_f64(0.0),
                underline_position: FWord::new(-(units_per_em as i32 / 10) as i16),
                underline_thickness: FWord::new((units_per_em as i32 / 20) as i16),
                is_fixed_pitch: 0,
                min_mem_type42: 0,
                max_mem_type42: 0,
                min_mem_type1: 0,
                max_mem_type1: 0,
                num_glyphs: None,
                glyph_name_index: None,
                string_data: None,
            },
            os2: None,
            vhea: None,
            glyph_order: GlyphOrder::new(),
            outlines: Some(OutlineTable::new()),
            h_metrics: MetricTable::new(),
            v_metrics: None,
            char_map: Vec::new(),
            name_records: Vec::new(),
            passthrough: BTreeMap::new(),
        }
    }

    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    /// The glyph count declared by `maxp`.
    pub fn glyph_count(&self) -> u16 {
        self.maxp.num_glyphs
    }

    pub fn contains_glyph(&self, name: &str) -> bool {
        self.glyph_order.contains(name)
    }

    pub fn outline(&self, name: &str) -> Option<&GlyphOutline> {
        self.outlines.as_ref()?.get(name)
    }

    /// Append a glyph, keeping any existing glyph of the same name.
    ///
    /// Returns `false` when the name was already present.
    pub fn add_glyph(
        &mut self,
        name: impl Into<GlyphName>,
        outline: GlyphOutline,
        metric: Metric,
    ) -> bool {
        let name = name.into();
        if !self.glyph_order.insert(name.clone()) {
            return false;
        }
        if let Some(outlines) = self.outlines.as_mut() {
            outlines.insert(name.clone(), outline);
        }
        self.h_metrics.insert(name, metric);
        true
    }

    /// Glyph mapped to `cp` by the first subtable that maps it.
    pub fn mapped_glyph(&self, cp: impl Into<Codepoint>) -> Option<&GlyphName> {
        let cp = cp.into();
        self.char_map.iter().find_map(|subtable| subtable.entries.get(&cp))
    }

    /// Codepoints mapped by any subtable.
    pub fn mapped_codepoints(&self) -> HashSet<Codepoint> {
        self.char_map
            .iter()
            .flat_map(|subtable| subtable.entries.keys().copied())
            .collect()
    }

    /// The default insertion target for new codepoints.
    ///
    /// Creates a Windows Unicode BMP subtable when the font has none.
    pub fn primary_subtable_mut(&mut self) -> &mut CmapSubtable {
        if self.char_map.is_empty() {
            self.char_map.push(CmapSubtable::new(PLATFORM_WINDOWS, ENCODING_WINDOWS_BMP));
        }
        &mut self.char_map[0]
    }

    /// Map `cp` in the primary subtable, replacing any mapping it had there.
    pub fn map_codepoint(&mut self, cp: impl Into<Codepoint>, glyph: impl Into<GlyphName>) {
        self.primary_subtable_mut().entries.insert(cp.into(), glyph.into());
    }

    /// Value of the first record with `name_id`.
    pub fn name(&self, name_id: u16) -> Option<&str> {
        self.name_records
            .iter()
            .find(|record| record.name_id == name_id)
            .map(|record| record.value.as_str())
    }
}
