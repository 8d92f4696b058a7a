//! Encoding a [`FontTableSet`] into sfnt bytes

use std::collections::{BTreeMap, HashMap, HashSet};

use font_types::FWord;
use log::{debug, warn};
use read_fonts::{tables::glyf::CurvePoint, types::NameId};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::{
            Cmap, Cmap12, CmapSubtable as WriteCmapSubtable, EncodingRecord,
            PlatformId as WritePlatformId, SequentialMapGroup,
        },
        glyf::{
            Anchor, Bbox, Component as WriteComponent, CompositeGlyph, Contour, GlyfLocaBuilder,
            Glyph, SimpleGlyph, Transform,
        },
        hmtx::{Hmtx, LongMetric},
        name::{Name, NameRecord as WriteNameRecord},
        post::Post,
        vmtx::{LongMetric as VerticalLongMetric, Vmtx},
    },
};

use crate::{
    error::CodecError,
    glyph_order::{GlyphName, GlyphOrder},
    model::{
        BoundingBox, CompositeOutline, FontTableSet, GlyphOutline, MetricTable, OutlineTable,
        Placement, SimpleOutline,
    },
};

type GlyphIds<'a> = HashMap<&'a str, u16>;

pub(crate) fn encode(table: &FontTableSet) -> Result<Vec<u8>, CodecError> {
    let order = &table.glyph_order;
    if order.len() > u16::MAX as usize {
        return Err(CodecError::TooManyGlyphs(order.len()));
    }
    if table.glyph_count() as usize != order.len() {
        return Err(CodecError::GlyphCountMismatch {
            declared: table.glyph_count(),
            actual: order.len(),
        });
    }
    let glyph_ids: GlyphIds =
        order.iter().enumerate().map(|(gid, name)| (name.as_str(), gid as u16)).collect();

    let mut builder = FontBuilder::new();
    let mut head = table.head.clone();
    let mut hhea = table.hhea.clone();
    let mut maxp = table.maxp.clone();

    let h_metrics = long_metrics(order, &table.h_metrics)?;
    hhea.number_of_h_metrics = h_metrics.len() as u16;
    if let Some(widest) = h_metrics.iter().map(|m| m.advance).max() {
        hhea.advance_width_max = widest.into();
    }

    if let Some(outlines) = table.outlines.as_ref() {
        let profile = OutlineProfile::measure(outlines);
        maxp.max_points = maxp.max_points.map(|_| profile.points);
        maxp.max_contours = maxp.max_contours.map(|_| profile.contours);
        maxp.max_composite_points = maxp.max_composite_points.map(|_| profile.composite_points);
        maxp.max_composite_contours =
            maxp.max_composite_contours.map(|_| profile.composite_contours);
        maxp.max_component_elements =
            maxp.max_component_elements.map(|_| profile.component_elements);
        maxp.max_component_depth = maxp.max_component_depth.map(|_| profile.component_depth);
        maxp.max_size_of_instructions =
            maxp.max_size_of_instructions.map(|v| v.max(profile.instruction_bytes));

        let mut glyf_builder = GlyfLocaBuilder::new();
        let mut bounds = Vec::with_capacity(order.len());
        for name in order {
            let (glyph, bbox) = match outlines.get(name) {
                Some(outline) => encode_glyph(name, outline, &glyph_ids)?,
                None => (Glyph::Empty, None),
            };
            glyf_builder
                .add_glyph(&glyph)
                .map_err(|_| CodecError::GlyphEncoding(name.clone()))?;
            bounds.push(bbox);
        }
        let (glyf, loca, loca_format) = glyf_builder.build();
        head.index_to_loc_format = loca_format as i16;

        if let Some(font_bbox) = union(bounds.iter().flatten().copied()) {
            head.x_min = font_bbox.x_min;
            head.y_min = font_bbox.y_min;
            head.x_max = font_bbox.x_max;
            head.y_max = font_bbox.y_max;
        }
        if let Some(extents) = HorizontalExtents::measure(&h_metrics, &bounds) {
            hhea.min_left_side_bearing = FWord::new(extents.min_left_side_bearing);
            hhea.min_right_side_bearing = FWord::new(extents.min_right_side_bearing);
            hhea.x_max_extent = FWord::new(extents.x_max_extent);
        }

        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;
    }

    builder.add_table(&head)?;
    builder.add_table(&hhea)?;
    builder.add_table(&Hmtx::new(h_metrics, Vec::new()))?;
    builder.add_table(&maxp)?;
    builder.add_table(&encode_post(&table.post, order))?;
    builder.add_table(&encode_cmap(table, &glyph_ids))?;
    if !table.name_records.is_empty() {
        builder.add_table(&encode_names(table))?;
    }
    if let Some(os2) = table.os2.as_ref() {
        builder.add_table(os2)?;
    }

    match (table.vhea.as_ref(), table.v_metrics.as_ref()) {
        (Some(vhea), Some(v_metrics)) => {
            let v_metrics: Vec<VerticalLongMetric> = long_metrics(order, v_metrics)?
                .into_iter()
                .map(|m| VerticalLongMetric { advance: m.advance, side_bearing: m.side_bearing })
                .collect();
            let mut vhea = vhea.clone();
            vhea.number_of_long_ver_metrics = v_metrics.len() as u16;
            builder.add_table(&vhea)?;
            builder.add_table(&Vmtx { v_metrics, top_side_bearings: Vec::new() })?;
        }
        (None, None) => {}
        _ => warn!("vhea and vmtx must come together, dropping vertical metrics"),
    }

    for (tag, data) in &table.passthrough {
        if builder.contains(*tag) {
            debug!("'{tag}' is already encoded, skipping raw copy");
            continue;
        }
        builder.add_raw(*tag, data.clone());
    }

    Ok(builder.build())
}

/// One long metric per glyph, in glyph order.
fn long_metrics(order: &GlyphOrder, metrics: &MetricTable) -> Result<Vec<LongMetric>, CodecError> {
    order
        .iter()
        .map(|name| {
            let metric =
                metrics.get(name).ok_or_else(|| CodecError::MissingMetric(name.clone()))?;
            Ok(LongMetric { advance: metric.advance, side_bearing: metric.side_bearing })
        })
        .collect()
}

/// maxp limits derived from the outlines.
#[derive(Debug, Default)]
struct OutlineProfile {
    points: u16,
    contours: u16,
    composite_points: u16,
    composite_contours: u16,
    component_elements: u16,
    component_depth: u16,
    instruction_bytes: u16,
}

/// Points, contours and nesting depth of a glyph with its components resolved.
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    points: usize,
    contours: usize,
    depth: usize,
}

impl OutlineProfile {
    fn measure(outlines: &OutlineTable) -> Self {
        let mut profile = Self::default();
        let clamp = |n: usize| n.min(u16::MAX as usize) as u16;
        let mut resolved = HashMap::new();
        for (name, outline) in outlines {
            match outline {
                GlyphOutline::Empty => {}
                GlyphOutline::Simple(simple) => {
                    let points = simple.contours.iter().map(Vec::len).sum();
                    profile.points = profile.points.max(clamp(points));
                    profile.contours = profile.contours.max(clamp(simple.contours.len()));
                    profile.instruction_bytes =
                        profile.instruction_bytes.max(clamp(simple.instructions.len()));
                }
                GlyphOutline::Composite(composite) => {
                    profile.component_elements =
                        profile.component_elements.max(clamp(composite.components.len()));
                    let totals =
                        resolve_totals(name.as_str(), outlines, &mut resolved, &mut HashSet::new());
                    profile.composite_points = profile.composite_points.max(clamp(totals.points));
                    profile.composite_contours =
                        profile.composite_contours.max(clamp(totals.contours));
                    profile.component_depth = profile.component_depth.max(clamp(totals.depth));
                }
            }
        }
        profile
    }
}

fn resolve_totals<'a>(
    name: &'a str,
    outlines: &'a OutlineTable,
    resolved: &mut HashMap<&'a str, Totals>,
    visiting: &mut HashSet<&'a str>,
) -> Totals {
    if let Some(totals) = resolved.get(name) {
        return *totals;
    }
    let totals = match outlines.get(name) {
        None | Some(GlyphOutline::Empty) => Totals::default(),
        Some(GlyphOutline::Simple(simple)) => Totals {
            points: simple.contours.iter().map(Vec::len).sum(),
            contours: simple.contours.len(),
            depth: 0,
        },
        Some(GlyphOutline::Composite(composite)) => {
            if !visiting.insert(name) {
                warn!("Composite '{name}' contains itself");
                return Totals::default();
            }
            let mut totals = Totals::default();
            for component in &composite.components {
                let child = resolve_totals(component.glyph.as_str(), outlines, resolved, visiting);
                totals.points += child.points;
                totals.contours += child.contours;
                totals.depth = totals.depth.max(child.depth);
            }
            totals.depth += 1;
            visiting.remove(name);
            totals
        }
    };
    resolved.insert(name, totals);
    totals
}

/// Smallest box containing every box in `boxes`.
fn union(boxes: impl IntoIterator<Item = BoundingBox>) -> Option<BoundingBox> {
    boxes.into_iter().reduce(|a, b| BoundingBox {
        x_min: a.x_min.min(b.x_min),
        y_min: a.y_min.min(b.y_min),
        x_max: a.x_max.max(b.x_max),
        y_max: a.y_max.max(b.y_max),
    })
}

/// hhea extremes over the glyphs that have an outline.
#[derive(Debug, PartialEq)]
struct HorizontalExtents {
    min_left_side_bearing: i16,
    min_right_side_bearing: i16,
    x_max_extent: i16,
}

impl HorizontalExtents {
    fn measure(metrics: &[LongMetric], bounds: &[Option<BoundingBox>]) -> Option<Self> {
        let mut extremes: Option<(i32, i32, i32)> = None;
        for (metric, bbox) in metrics.iter().zip(bounds) {
            let Some(bbox) = bbox else {
                continue;
            };
            let lsb = metric.side_bearing as i32;
            let extent = lsb + bbox.x_max as i32 - bbox.x_min as i32;
            let rsb = metric.advance as i32 - extent;
            extremes = Some(match extremes {
                None => (lsb, rsb, extent),
                Some((l, r, x)) => (l.min(lsb), r.min(rsb), x.max(extent)),
            });
        }
        let clamp = |v: i32| v.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        extremes.map(|(lsb, rsb, extent)| Self {
            min_left_side_bearing: clamp(lsb),
            min_right_side_bearing: clamp(rsb),
            x_max_extent: clamp(extent),
        })
    }
}

/// The encoded glyph and the bounding box it was written with.
fn encode_glyph(
    name: &GlyphName,
    outline: &GlyphOutline,
    glyph_ids: &GlyphIds,
) -> Result<(Glyph, Option<BoundingBox>), CodecError> {
    match outline {
        GlyphOutline::Empty => Ok((Glyph::Empty, None)),
        GlyphOutline::Simple(simple) if simple.contours.is_empty() => Ok((Glyph::Empty, None)),
        GlyphOutline::Simple(simple) => {
            let (glyph, bbox) = encode_simple(name, simple)?;
            Ok((Glyph::Simple(glyph), Some(bbox)))
        }
        GlyphOutline::Composite(composite) => {
            let glyph = encode_composite(name, composite, glyph_ids)?;
            let bbox = matches!(glyph, Glyph::Composite(_)).then_some(composite.bbox);
            Ok((glyph, bbox))
        }
    }
}

fn to_bbox(bbox: BoundingBox) -> Bbox {
    Bbox { x_min: bbox.x_min, y_min: bbox.y_min, x_max: bbox.x_max, y_max: bbox.y_max }
}

fn coordinate(name: &GlyphName, value: f64) -> Result<i16, CodecError> {
    let rounded = value.round_ties_even();
    if !(i16::MIN as f64..=i16::MAX as f64).contains(&rounded) {
        return Err(CodecError::CoordinateOutOfRange { glyph: name.clone(), value });
    }
    Ok(rounded as i16)
}

/// Simple glyph on the integer grid, boxed by its rounded points.
fn encode_simple(
    name: &GlyphName,
    simple: &SimpleOutline,
) -> Result<(SimpleGlyph, BoundingBox), CodecError> {
    let mut contours: Vec<Vec<CurvePoint>> = Vec::with_capacity(simple.contours.len());
    for contour in &simple.contours {
        let points = contour
            .iter()
            .map(|p| {
                Ok(CurvePoint::new(coordinate(name, p.x)?, coordinate(name, p.y)?, p.on_curve))
            })
            .collect::<Result<Vec<_>, CodecError>>()?;
        contours.push(points);
    }
    let bbox = BoundingBox::enclosing(contours.iter().flatten().map(|p| (p.x as f64, p.y as f64)))
        .unwrap_or_default();

    let glyph = SimpleGlyph {
        bbox: to_bbox(bbox),
        contours: contours.into_iter().map(Contour::from).collect(),
        instructions: simple.instructions.clone(),
    };
    Ok((glyph, bbox))
}

fn encode_composite(
    name: &GlyphName,
    composite: &CompositeOutline,
    glyph_ids: &GlyphIds,
) -> Result<Glyph, CodecError> {
    let mut components = Vec::with_capacity(composite.components.len());
    for component in &composite.components {
        let gid = glyph_ids
            .get(component.glyph.as_str())
            .copied()
            .ok_or_else(|| CodecError::GlyphEncoding(component.glyph.clone()))?;
        let anchor = match component.placement {
            Placement::Offset { dx, dy } => {
                Anchor::Offset { x: coordinate(name, dx)?, y: coordinate(name, dy)? }
            }
            Placement::Point { base, component } => Anchor::Point { base, component },
        };
        components.push(WriteComponent {
            glyph: font_types::GlyphId16::new(gid),
            anchor,
            flags: component.flags,
            transform: Transform {
                xx: component.transform.xx,
                yx: component.transform.yx,
                xy: component.transform.xy,
                yy: component.transform.yy,
            },
        });
    }

    let mut components = components.into_iter();
    let Some(first) = components.next() else {
        return Ok(Glyph::Empty);
    };
    let bbox = to_bbox(composite.bbox);
    let mut glyph = CompositeGlyph::new(first, bbox);
    for component in components {
        glyph.add_component(component, bbox);
    }
    Ok(Glyph::Composite(glyph))
}

/// A version 2 post table carrying the glyph names.
fn encode_post(header: &Post, order: &GlyphOrder) -> Post {
    let names: Vec<&str> = order.iter().map(GlyphName::as_str).collect();
    let mut post = Post::new_v2(names);
    post.italic_angle = header.italic_angle;
    post.underline_position = header.underline_position;
    post.underline_thickness = header.underline_thickness;
    post.is_fixed_pitch = header.is_fixed_pitch;
    post.min_mem_type42 = header.min_mem_type42;
    post.max_mem_type42 = header.max_mem_type42;
    post.min_mem_type1 = header.min_mem_type1;
    post.max_mem_type1 = header.max_mem_type1;
    post
}

/// Flatten every subtable into one mapping, earlier subtables winning.
fn encode_cmap(table: &FontTableSet, glyph_ids: &GlyphIds) -> Cmap {
    let mut mappings: BTreeMap<u32, u32> = BTreeMap::new();
    for subtable in &table.char_map {
        for (codepoint, glyph) in &subtable.entries {
            let Some(&gid) = glyph_ids.get(glyph.as_str()) else {
                warn!("{codepoint} maps to unknown glyph '{glyph}', dropping it");
                continue;
            };
            mappings.entry(codepoint.to_u32()).or_insert(gid.into());
        }
    }
    let mappings: Vec<(u32, u32)> = mappings.into_iter().collect();
    build_cmap_format12(&mappings)
}

/// Format 12 only. Format 4 segment arithmetic overflows on large merged
/// repertoires.
fn build_cmap_format12(mappings: &[(u32, u32)]) -> Cmap {
    let cmap12 = Cmap12 { language: 0, groups: build_sequential_groups(mappings) };

    Cmap::new(vec![
        // Unicode full repertoire
        EncodingRecord::new(
            WritePlatformId::Unicode,
            4,
            WriteCmapSubtable::Format12(cmap12.clone()),
        ),
        EncodingRecord::new(WritePlatformId::Windows, 10, WriteCmapSubtable::Format12(cmap12)),
    ])
}

/// Runs of consecutive codepoints mapped to consecutive glyph ids.
fn build_sequential_groups(mappings: &[(u32, u32)]) -> Vec<SequentialMapGroup> {
    let Some((&(first_cp, first_gid), rest)) = mappings.split_first() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    let (mut start_cp, mut start_gid) = (first_cp, first_gid);
    let (mut prev_cp, mut prev_gid) = (first_cp, first_gid);
    for &(cp, gid) in rest {
        if cp != prev_cp + 1 || gid != prev_gid + 1 {
            groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));
            start_cp = cp;
            start_gid = gid;
        }
        prev_cp = cp;
        prev_gid = gid;
    }
    groups.push(SequentialMapGroup::new(start_cp, prev_cp, start_gid));

    groups
}

/// Records sorted by (platform, encoding, language, name id); on duplicate
/// keys the earliest record wins.
fn encode_names(table: &FontTableSet) -> Name {
    let mut records = table.name_records.clone();
    records.sort_by_key(|record| record.key());
    records.dedup_by_key(|record| record.key());

    Name::new(
        records
            .into_iter()
            .map(|record| {
                WriteNameRecord::new(
                    record.platform_id,
                    record.encoding_id,
                    record.language_id,
                    NameId::new(record.name_id),
                    record.value.into(),
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use read_fonts::{FontRef, TableProvider};

    use super::*;
    use crate::model::{Component, Metric, NameRecord, OutlinePoint};

    fn rectangle(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> GlyphOutline {
        GlyphOutline::Simple(SimpleOutline::new(vec![vec![
            OutlinePoint::new(x_min, y_min, true),
            OutlinePoint::new(x_min, y_max, true),
            OutlinePoint::new(x_max, y_max, true),
            OutlinePoint::new(x_max, y_min, true),
        ]]))
    }

    fn composite(components: Vec<Component>) -> GlyphOutline {
        GlyphOutline::Composite(CompositeOutline { components, bbox: BoundingBox::default() })
    }

    fn one_glyph_font() -> FontTableSet {
        let mut font = FontTableSet::new(1000);
        font.add_glyph(
            ".notdef",
            GlyphOutline::Simple(SimpleOutline::new(vec![vec![
                OutlinePoint::new(0.0, 0.0, true),
                OutlinePoint::new(500.0, 700.0, true),
            ]])),
            Metric::new(500, 0),
        );
        font.maxp.num_glyphs = 1;
        font
    }

    #[test]
    fn test_sequential_groups() {
        let groups =
            build_sequential_groups(&[(0x41, 1), (0x42, 2), (0x43, 3), (0x45, 4), (0x46, 9)]);
        assert_eq!(
            groups,
            vec![
                SequentialMapGroup::new(0x41, 0x43, 1),
                SequentialMapGroup::new(0x45, 0x45, 4),
                SequentialMapGroup::new(0x46, 0x46, 9),
            ]
        );
        assert!(build_sequential_groups(&[]).is_empty());
    }

    #[test]
    fn test_glyph_count_must_match_order() {
        let mut font = one_glyph_font();
        font.maxp.num_glyphs = 2;
        assert!(matches!(
            encode(&font),
            Err(CodecError::GlyphCountMismatch { declared: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_missing_metric_is_rejected() {
        let mut font = one_glyph_font();
        font.h_metrics.clear();
        assert!(matches!(encode(&font), Err(CodecError::MissingMetric(name)) if name == ".notdef"));
    }

    #[test]
    fn test_coordinate_out_of_range() {
        let mut font = one_glyph_font();
        if let Some(GlyphOutline::Simple(simple)) =
            font.outlines.as_mut().and_then(|o| o.get_mut(".notdef"))
        {
            simple.contours[0][1].x = 40000.0;
        }
        assert!(matches!(encode(&font), Err(CodecError::CoordinateOutOfRange { .. })));
    }

    #[test]
    fn test_duplicate_name_keys_keep_first() {
        let mut font = one_glyph_font();
        font.name_records = vec![
            NameRecord::new(1, 3, 1, 0x409, "First"),
            NameRecord::new(2, 3, 1, 0x409, "Regular"),
            NameRecord::new(1, 3, 1, 0x409, "Second"),
        ];
        let name = encode_names(&font);
        assert_eq!(name.name_record.len(), 2);
    }

    #[test]
    fn test_profile_counts_largest_glyph() {
        let font = one_glyph_font();
        let profile = OutlineProfile::measure(font.outlines.as_ref().unwrap());
        assert_eq!(profile.points, 2);
        assert_eq!(profile.contours, 1);
        assert_eq!(profile.component_elements, 0);
    }

    #[test]
    fn test_profile_resolves_nested_composites() {
        let mut font = one_glyph_font();
        font.add_glyph("A", rectangle(0.0, 0.0, 500.0, 700.0), Metric::new(500, 0));
        font.add_glyph("acute", rectangle(200.0, 750.0, 300.0, 900.0), Metric::new(0, 200));
        font.add_glyph(
            "Aacute",
            composite(vec![Component::offset("A", 0.0, 0.0), Component::offset("acute", 0.0, 0.0)]),
            Metric::new(500, 0),
        );
        font.add_glyph(
            "Aacute.double",
            composite(vec![
                Component::offset("Aacute", 0.0, 0.0),
                Component::offset("acute", 0.0, 200.0),
            ]),
            Metric::new(500, 0),
        );

        let profile = OutlineProfile::measure(font.outlines.as_ref().unwrap());
        assert_eq!(profile.points, 4);
        assert_eq!(profile.contours, 1);
        assert_eq!(profile.component_elements, 2);
        assert_eq!(profile.composite_points, 12);
        assert_eq!(profile.composite_contours, 3);
        assert_eq!(profile.component_depth, 2);
    }

    #[test]
    fn test_profile_survives_cyclic_composites() {
        let mut font = one_glyph_font();
        font.add_glyph(
            "loop.a",
            composite(vec![Component::offset("loop.b", 0.0, 0.0)]),
            Metric::new(0, 0),
        );
        font.add_glyph(
            "loop.b",
            composite(vec![Component::offset("loop.a", 0.0, 0.0)]),
            Metric::new(0, 0),
        );

        let profile = OutlineProfile::measure(font.outlines.as_ref().unwrap());
        assert_eq!(profile.composite_points, 0);
        assert_eq!(profile.component_elements, 1);
    }

    #[test]
    fn test_horizontal_extents_skip_empty_glyphs() {
        let metrics = vec![
            LongMetric { advance: 600, side_bearing: 50 },
            LongMetric { advance: 250, side_bearing: 0 },
            LongMetric { advance: 1000, side_bearing: -30 },
        ];
        let bounds = vec![
            Some(BoundingBox { x_min: 50, y_min: 0, x_max: 550, y_max: 700 }),
            None,
            Some(BoundingBox { x_min: -30, y_min: -120, x_max: 1010, y_max: 880 }),
        ];
        assert_eq!(
            HorizontalExtents::measure(&metrics, &bounds),
            Some(HorizontalExtents {
                min_left_side_bearing: -30,
                min_right_side_bearing: -10,
                x_max_extent: 1010,
            })
        );
        assert_eq!(HorizontalExtents::measure(&metrics[1..2], &bounds[1..2]), None);
    }

    #[test]
    fn test_encode_recomputes_font_bounds() {
        let mut font = one_glyph_font();
        font.head.y_max = 800;
        font.hhea.x_max_extent = FWord::new(3000);
        font.add_glyph("tall", rectangle(-20.0, -100.0, 480.0, 1500.0), Metric::new(600, -20));
        font.add_glyph(
            "tall.alt",
            composite(vec![Component::offset("tall", 0.0, 0.0)]),
            Metric::new(600, -20),
        );
        if let Some(GlyphOutline::Composite(alt)) =
            font.outlines.as_mut().and_then(|o| o.get_mut("tall.alt"))
        {
            alt.bbox = BoundingBox { x_min: -20, y_min: -100, x_max: 480, y_max: 1500 };
        }
        font.maxp.num_glyphs = 3;

        let bytes = encode(&font).unwrap();
        let encoded = FontRef::new(&bytes).unwrap();

        let head = encoded.head().unwrap();
        assert_eq!(
            (head.x_min(), head.y_min(), head.x_max(), head.y_max()),
            (-20, -100, 500, 1500)
        );
        let hhea = encoded.hhea().unwrap();
        assert_eq!(hhea.min_left_side_bearing().to_i16(), -20);
        assert_eq!(hhea.min_right_side_bearing().to_i16(), 0);
        assert_eq!(hhea.x_max_extent().to_i16(), 500);
        let maxp = encoded.maxp().unwrap();
        assert_eq!(maxp.max_points(), Some(4));
        assert_eq!(maxp.max_composite_points(), Some(4));
        assert_eq!(maxp.max_composite_contours(), Some(1));
        assert_eq!(maxp.max_component_depth(), Some(1));
    }
}
