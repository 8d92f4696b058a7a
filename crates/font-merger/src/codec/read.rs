//! Decoding sfnt bytes into a [`FontTableSet`]

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use read_fonts::{
    FontRef, ReadError, TableProvider,
    tables::{
        cmap::{Cmap, CmapSubtable as ReadCmapSubtable},
        glyf::{Anchor, CompositeGlyph, CurvePoint, Glyf, Glyph as ReadGlyph, SimpleGlyph},
        loca::Loca,
    },
    types::{GlyphId, GlyphId16, Tag},
};
use write_fonts::from_obj::ToOwnedTable;

use crate::{
    error::CodecError,
    glyph_order::{GlyphName, GlyphOrder, build_glyph_order, codepoint_name},
    model::{
        BoundingBox, CmapSubtable, Component, ComponentTransform, CompositeOutline, FontTableSet,
        GlyphOutline, Metric, MetricTable, NameRecord, OutlinePoint, OutlineTable,
        PLATFORM_UNICODE, PLATFORM_WINDOWS, Placement, SimpleOutline,
    },
    types::Codepoint,
};

/// Tables decoded into typed fields; everything else is carried raw.
const DECODED_TABLES: &[[u8; 4]] = &[
    *b"head", *b"hhea", *b"maxp", *b"post", *b"OS/2", *b"vhea", *b"hmtx", *b"vmtx", *b"glyf",
    *b"loca", *b"cmap", *b"name",
];

/// Tables indexed by glyph id that go stale once glyphs are added.
const DROPPED_TABLES: &[[u8; 4]] = &[*b"hdmx", *b"LTSH", *b"gvar", *b"DSIG"];

const GLYF: Tag = Tag::new(b"glyf");

const MAX_CODEPOINT: u32 = 0x10FFFF;

pub(crate) fn decode(data: &[u8]) -> Result<FontTableSet, CodecError> {
    let font = FontRef::new(data)?;

    let head = required(font.head(), "head")?;
    let hhea = required(font.hhea(), "hhea")?;
    let maxp = required(font.maxp(), "maxp")?;
    let num_glyphs = maxp.num_glyphs();

    let mut table = FontTableSet::new(head.units_per_em());
    table.head = head.to_owned_table();
    table.hhea = hhea.to_owned_table();
    table.maxp = maxp.to_owned_table();

    let raw_cmap = match optional(font.cmap())? {
        Some(cmap) => read_cmap(&cmap),
        None => Vec::new(),
    };

    // glyphs post leaves unnamed are named after their lowest codepoint
    let cmap_names = names_from_cmap(&raw_cmap);
    let post = optional(font.post())?;
    let names = (0..num_glyphs).map(|gid| {
        post.as_ref()
            .and_then(|post| post.glyph_name(GlyphId16::new(gid)))
            .map(str::to_string)
            .or_else(|| cmap_names.get(&(gid as u32)).map(GlyphName::to_string))
    });
    table.glyph_order = build_glyph_order(names);
    if let Some(post) = post {
        table.post = post.to_owned_table();
    }

    table.os2 = optional(font.os2())?.map(|os2| os2.to_owned_table());

    table.outlines = match font.table_data(GLYF) {
        Some(_) => Some(decode_outlines(&font.glyf()?, &font.loca(None)?, &table.glyph_order)?),
        None => {
            debug!("No glyf table, outlines are not decoded");
            None
        }
    };

    table.h_metrics = decode_h_metrics(&font, &table.glyph_order)?;
    let vhea = optional(font.vhea())?;
    if let Some(vhea) = vhea {
        match optional(font.vmtx())? {
            Some(vmtx) => {
                let long_metrics = vmtx.v_metrics();
                let count = (vhea.number_of_long_ver_metrics() as usize).min(long_metrics.len());
                let mut v_metrics = MetricTable::new();
                for (gid, name) in table.glyph_order.iter().enumerate() {
                    let metric = if gid < count {
                        let long = &long_metrics[gid];
                        Some(Metric::new(long.advance.get(), long.side_bearing.get()))
                    } else {
                        // trailing glyphs reuse the last long advance
                        let advance =
                            count.checked_sub(1).map(|last| long_metrics[last].advance.get());
                        let side_bearing =
                            vmtx.top_side_bearings().get(gid - count).map(|b| b.get());
                        advance.zip(side_bearing).map(|(a, s)| Metric::new(a, s))
                    };
                    if let Some(metric) = metric {
                        v_metrics.insert(name.clone(), metric);
                    }
                }
                table.vhea = Some(vhea.to_owned_table());
                table.v_metrics = Some(v_metrics);
            }
            None => warn!("Font has vhea but no vmtx, dropping vertical metrics"),
        }
    }

    table.char_map = resolve_cmap(raw_cmap, &table.glyph_order);
    if let Some(name) = optional(font.name())? {
        table.name_records = decode_names(&name);
    }

    let decoded: HashSet<Tag> = DECODED_TABLES.iter().map(Tag::new).collect();
    let dropped: HashSet<Tag> = DROPPED_TABLES.iter().map(Tag::new).collect();
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if decoded.contains(&tag) {
            continue;
        }
        if dropped.contains(&tag) {
            debug!("Dropping '{tag}'");
            continue;
        }
        if let Some(data) = font.table_data(tag) {
            table.passthrough.insert(tag, data.as_bytes().to_vec());
        }
    }

    Ok(table)
}

fn required<T>(table: Result<T, ReadError>, tag: &'static str) -> Result<T, CodecError> {
    table.map_err(|err| match err {
        ReadError::TableIsMissing(_) => CodecError::MissingTable(tag),
        other => other.into(),
    })
}

fn optional<T>(table: Result<T, ReadError>) -> Result<Option<T>, CodecError> {
    match table {
        Ok(table) => Ok(Some(table)),
        Err(ReadError::TableIsMissing(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn decode_outlines(
    glyf: &Glyf,
    loca: &Loca,
    order: &GlyphOrder,
) -> Result<OutlineTable, CodecError> {
    let mut outlines = OutlineTable::with_capacity(order.len());
    for (gid, name) in order.iter().enumerate() {
        let outline = match loca.get_glyf(GlyphId::new(gid as u32), glyf)? {
            None => GlyphOutline::Empty,
            Some(ReadGlyph::Simple(simple)) => decode_simple(&simple)?,
            Some(ReadGlyph::Composite(composite)) => decode_composite(&composite, name, order),
        };
        outlines.insert(name.clone(), outline);
    }
    Ok(outlines)
}

fn decode_simple(glyph: &SimpleGlyph) -> Result<GlyphOutline, CodecError> {
    let points: Vec<CurvePoint> = glyph.points().collect();
    let mut contours = Vec::new();
    let mut start = 0usize;
    for end in glyph.end_pts_of_contours() {
        let end = end.get() as usize + 1;
        let contour = points
            .get(start..end)
            .ok_or(ReadError::MalformedData("contour end point out of range"))?;
        contours.push(
            contour
                .iter()
                .map(|p| OutlinePoint::new(p.x.into(), p.y.into(), p.on_curve))
                .collect(),
        );
        start = end;
    }

    Ok(GlyphOutline::Simple(SimpleOutline {
        contours,
        bbox: BoundingBox {
            x_min: glyph.x_min(),
            y_min: glyph.y_min(),
            x_max: glyph.x_max(),
            y_max: glyph.y_max(),
        },
        instructions: glyph.instructions().to_vec(),
    }))
}

fn decode_composite(glyph: &CompositeGlyph, name: &GlyphName, order: &GlyphOrder) -> GlyphOutline {
    let mut components = Vec::new();
    for component in glyph.components() {
        let Some(target) = order.get_index(component.glyph.to_u32() as usize) else {
            warn!("Composite '{name}' references missing glyph {}", component.glyph.to_u32());
            continue;
        };
        let placement = match component.anchor {
            Anchor::Offset { x, y } => Placement::Offset { dx: x.into(), dy: y.into() },
            Anchor::Point { base, component } => Placement::Point { base, component },
        };
        components.push(Component {
            glyph: target.clone(),
            placement,
            transform: ComponentTransform {
                xx: component.transform.xx,
                yx: component.transform.yx,
                xy: component.transform.xy,
                yy: component.transform.yy,
            },
            flags: component.flags.into(),
        });
    }

    if components.is_empty() {
        return GlyphOutline::Empty;
    }
    GlyphOutline::Composite(CompositeOutline {
        components,
        bbox: BoundingBox {
            x_min: glyph.x_min(),
            y_min: glyph.y_min(),
            x_max: glyph.x_max(),
            y_max: glyph.y_max(),
        },
    })
}

/// Horizontal metrics keyed by name. Glyphs past the last long metric take
/// its advance; glyphs the table does not cover at all are left out.
fn decode_h_metrics(font: &FontRef, order: &GlyphOrder) -> Result<MetricTable, CodecError> {
    let hmtx = required(font.hmtx(), "hmtx")?;
    let mut metrics = MetricTable::with_capacity(order.len());
    for (gid, name) in order.iter().enumerate() {
        let glyph_id = GlyphId::new(gid as u32);
        match (hmtx.advance(glyph_id), hmtx.side_bearing(glyph_id)) {
            (Some(advance), Some(side_bearing)) => {
                metrics.insert(name.clone(), Metric::new(advance, side_bearing));
            }
            _ => debug!("No hmtx entry for '{name}'"),
        }
    }
    Ok(metrics)
}

/// Unicode subtables only: platform 0, or Windows BMP / full repertoire.
fn is_unicode(platform_id: u16, encoding_id: u16) -> bool {
    platform_id == PLATFORM_UNICODE
        || (platform_id == PLATFORM_WINDOWS && matches!(encoding_id, 1 | 10))
}

/// A Unicode cmap subtable still keyed by glyph id.
struct RawSubtable {
    platform_id: u16,
    encoding_id: u16,
    mappings: Vec<(Codepoint, u32)>,
}

fn read_cmap(cmap: &Cmap) -> Vec<RawSubtable> {
    let mut subtables = Vec::new();
    for record in cmap.encoding_records() {
        let platform_id = record.platform_id() as u16;
        let encoding_id = record.encoding_id();
        if !is_unicode(platform_id, encoding_id) {
            debug!("Skipping non-Unicode cmap subtable ({platform_id}, {encoding_id})");
            continue;
        }
        let subtable = match record.subtable(cmap.offset_data()) {
            Ok(subtable) => subtable,
            Err(err) => {
                warn!("Unreadable cmap subtable ({platform_id}, {encoding_id}): {err}");
                continue;
            }
        };
        let Some(mappings) = iter_cmap_subtable(&subtable) else {
            debug!("Skipping unsupported cmap format in ({platform_id}, {encoding_id})");
            continue;
        };
        subtables.push(RawSubtable { platform_id, encoding_id, mappings });
    }
    subtables
}

/// `uniXXXX` style names by glyph id, from the lowest codepoint of each glyph.
fn names_from_cmap(subtables: &[RawSubtable]) -> HashMap<u32, GlyphName> {
    let mut lowest: HashMap<u32, Codepoint> = HashMap::new();
    for &(codepoint, gid) in subtables.iter().flat_map(|subtable| &subtable.mappings) {
        lowest
            .entry(gid)
            .and_modify(|cp| {
                if codepoint.to_u32() < cp.to_u32() {
                    *cp = codepoint;
                }
            })
            .or_insert(codepoint);
    }
    lowest.into_iter().map(|(gid, cp)| (gid, codepoint_name(cp))).collect()
}

fn resolve_cmap(subtables: Vec<RawSubtable>, order: &GlyphOrder) -> Vec<CmapSubtable> {
    subtables
        .into_iter()
        .map(|raw| {
            let mut decoded = CmapSubtable::new(raw.platform_id, raw.encoding_id);
            for (codepoint, gid) in raw.mappings {
                match order.get_index(gid as usize) {
                    Some(name) => {
                        decoded.entries.insert(codepoint, name.clone());
                    }
                    None => debug!("{codepoint} maps to missing glyph {gid}"),
                }
            }
            decoded
        })
        .collect()
}

/// Every `(codepoint, glyph id)` pair of a format 4, 6 or 12 subtable.
fn iter_cmap_subtable(subtable: &ReadCmapSubtable) -> Option<Vec<(Codepoint, u32)>> {
    let mut mappings = Vec::new();

    match subtable {
        ReadCmapSubtable::Format4(f4) => {
            let end_codes = f4.end_code();
            let start_codes = f4.start_code();
            let id_deltas = f4.id_delta();
            let id_range_offsets = f4.id_range_offsets();
            let glyph_id_array = f4.glyph_id_array();

            let seg_count = f4.seg_count_x2() as usize / 2;
            for seg in 0..seg_count {
                let end_code = end_codes.get(seg).map(|v| v.get()).unwrap_or(0xFFFF);
                let start_code = start_codes.get(seg).map(|v| v.get()).unwrap_or(0);
                let id_delta = id_deltas.get(seg).map(|v| v.get()).unwrap_or(0);
                let id_range_offset = id_range_offsets.get(seg).map(|v| v.get()).unwrap_or(0);

                if start_code == 0xFFFF || start_code > end_code {
                    continue;
                }

                for cp in start_code..=end_code {
                    let gid = if id_range_offset == 0 {
                        ((cp as i32 + id_delta as i32) & 0xFFFF) as u16
                    } else {
                        // offset is relative to this segment's idRangeOffset slot
                        let glyph_idx = (id_range_offset as usize / 2 + (cp - start_code) as usize)
                            .checked_sub(seg_count - seg);
                        match glyph_idx.and_then(|idx| glyph_id_array.get(idx)).map(|g| g.get()) {
                            Some(0) | None => 0,
                            Some(gid) => ((gid as i32 + id_delta as i32) & 0xFFFF) as u16,
                        }
                    };

                    if gid != 0 {
                        mappings.push((Codepoint::new(cp as u32), gid as u32));
                    }
                }
            }
        }
        ReadCmapSubtable::Format12(f12) => {
            for group in f12.groups() {
                mappings.extend(sequential_group(
                    group.start_char_code(),
                    group.end_char_code(),
                    group.start_glyph_id(),
                ));
            }
        }
        ReadCmapSubtable::Format6(f6) => {
            let first = f6.first_code() as u32;
            for (i, gid) in f6.glyph_id_array().iter().enumerate() {
                let gid = gid.get();
                if gid != 0 {
                    mappings.push((Codepoint::new(first + i as u32), gid as u32));
                }
            }
        }
        _ => return None,
    }

    Some(mappings)
}

/// Mappings of one format 12 group. Codepoints past U+10FFFF are ignored.
fn sequential_group(
    start: u32,
    end: u32,
    start_gid: u32,
) -> impl Iterator<Item = (Codepoint, u32)> {
    (start..=end.min(MAX_CODEPOINT))
        .enumerate()
        .map(move |(i, cp)| (Codepoint::new(cp), start_gid.saturating_add(i as u32)))
        .filter(|&(_, gid)| gid != 0)
}

fn decode_names(name: &read_fonts::tables::name::Name) -> Vec<NameRecord> {
    let mut records = Vec::new();
    for record in name.name_record() {
        let name_id = record.name_id().to_u16();
        match record.string(name.string_data()) {
            Ok(value) => records.push(NameRecord::new(
                name_id,
                record.platform_id(),
                record.encoding_id(),
                record.language_id(),
                value.chars().collect::<String>(),
            )),
            Err(err) => debug!("Skipping undecodable name {name_id}: {err}"),
        }
    }
    records
}
