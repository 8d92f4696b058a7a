//! Uniform rescaling of a font's unit grid
//!
//! Outline coordinates stay real-valued; every integer field derived from
//! them (bounding boxes, metrics, vertical metrics, unitsPerEm) is rounded
//! with round-half-to-even. Rounding is lossy, so scaling by `f` and then by
//! `1/f` only restores integer fields to within one unit.

use std::fmt;

use font_types::{FWord, UfWord};
use log::debug;
use write_fonts::tables::{head::Head, hhea::Hhea, os2::Os2, post::Post, vhea::Vhea};

use crate::{
    error::ScaleError,
    model::{BoundingBox, FontTableSet, GlyphOutline, MetricTable, Placement},
};

/// A positive rational scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleFactor {
    numerator: u32,
    denominator: u32,
}

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor { numerator: 1, denominator: 1 };

    pub fn new(numerator: u32, denominator: u32) -> Result<Self, ScaleError> {
        if numerator == 0 || denominator == 0 {
            return Err(ScaleError::InvalidScaleFactor { numerator, denominator });
        }
        Ok(Self { numerator, denominator })
    }

    /// The factor that moves a font from `current` to `target` units per em.
    pub fn from_units_per_em(target: u16, current: u16) -> Result<Self, ScaleError> {
        Self::new(target.into(), current.into())
    }

    pub fn reciprocal(self) -> Self {
        Self { numerator: self.denominator, denominator: self.numerator }
    }

    pub fn is_identity(self) -> bool {
        self.numerator == self.denominator
    }

    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn apply(self, value: f64) -> f64 {
        value * self.numerator as f64 / self.denominator as f64
    }

    fn round(self, value: f64) -> f64 {
        self.apply(value).round_ties_even()
    }

    fn i16(self, value: i16, field: &'static str) -> Result<i16, ScaleError> {
        let scaled = self.round(value.into());
        if scaled < i16::MIN as f64 || scaled > i16::MAX as f64 {
            return Err(ScaleError::OutOfRange { field, value: scaled });
        }
        Ok(scaled as i16)
    }

    fn u16(self, value: u16, field: &'static str) -> Result<u16, ScaleError> {
        let scaled = self.round(value.into());
        if scaled > u16::MAX as f64 {
            return Err(ScaleError::OutOfRange { field, value: scaled });
        }
        Ok(scaled as u16)
    }

    fn fword(self, value: FWord, field: &'static str) -> Result<FWord, ScaleError> {
        self.i16(value.to_i16(), field).map(FWord::new)
    }

    fn ufword(self, value: UfWord, field: &'static str) -> Result<UfWord, ScaleError> {
        self.u16(value.to_u16(), field).map(UfWord::new)
    }

    fn coordinate(self, value: f64, field: &'static str) -> Result<f64, ScaleError> {
        let scaled = self.apply(value);
        let rounded = scaled.round_ties_even();
        if !scaled.is_finite() || rounded < i16::MIN as f64 || rounded > i16::MAX as f64 {
            return Err(ScaleError::OutOfRange { field, value: scaled });
        }
        Ok(scaled)
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Rescale every scale-dependent field of `table` by `factor`.
///
/// Either every table is updated or, on error, `table` is left exactly as
/// it was. Tables the font does not have are skipped.
pub fn scale(table: &mut FontTableSet, factor: ScaleFactor) -> Result<(), ScaleError> {
    if factor.is_identity() {
        return Ok(());
    }

    let mut scaled = table.clone();
    scale_head(&mut scaled.head, factor)?;
    scale_hhea(&mut scaled.hhea, factor)?;
    if let Some(vhea) = scaled.vhea.as_mut() {
        scale_vhea(vhea, factor)?;
    }
    if let Some(os2) = scaled.os2.as_mut() {
        scale_os2(os2, factor)?;
    }
    scale_post(&mut scaled.post, factor)?;
    if let Some(outlines) = scaled.outlines.as_mut() {
        for outline in outlines.values_mut() {
            scale_outline(outline, factor)?;
        }
    }
    scale_metrics(&mut scaled.h_metrics, factor, "hmtx")?;
    if let Some(v_metrics) = scaled.v_metrics.as_mut() {
        scale_metrics(v_metrics, factor, "vmtx")?;
    }

    debug!(
        "Scaled {} glyphs by {factor}: unitsPerEm {} -> {}",
        scaled.glyph_order.len(),
        table.units_per_em(),
        scaled.units_per_em()
    );
    *table = scaled;
    Ok(())
}

fn scale_head(head: &mut Head, factor: ScaleFactor) -> Result<(), ScaleError> {
    let units_per_em = factor.u16(head.units_per_em, "head.unitsPerEm")?;
    if units_per_em == 0 {
        return Err(ScaleError::OutOfRange { field: "head.unitsPerEm", value: 0.0 });
    }
    head.units_per_em = units_per_em;
    head.x_min = factor.i16(head.x_min, "head.xMin")?;
    head.y_min = factor.i16(head.y_min, "head.yMin")?;
    head.x_max = factor.i16(head.x_max, "head.xMax")?;
    head.y_max = factor.i16(head.y_max, "head.yMax")?;
    Ok(())
}

fn scale_hhea(hhea: &mut Hhea, factor: ScaleFactor) -> Result<(), ScaleError> {
    hhea.ascender = factor.fword(hhea.ascender, "hhea.ascender")?;
    hhea.descender = factor.fword(hhea.descender, "hhea.descender")?;
    hhea.line_gap = factor.fword(hhea.line_gap, "hhea.lineGap")?;
    hhea.advance_width_max = factor.ufword(hhea.advance_width_max, "hhea.advanceWidthMax")?;
    hhea.min_left_side_bearing =
        factor.fword(hhea.min_left_side_bearing, "hhea.minLeftSideBearing")?;
    hhea.min_right_side_bearing =
        factor.fword(hhea.min_right_side_bearing, "hhea.minRightSideBearing")?;
    hhea.x_max_extent = factor.fword(hhea.x_max_extent, "hhea.xMaxExtent")?;
    Ok(())
}

fn scale_vhea(vhea: &mut Vhea, factor: ScaleFactor) -> Result<(), ScaleError> {
    vhea.ascender = factor.fword(vhea.ascender, "vhea.ascender")?;
    vhea.descender = factor.fword(vhea.descender, "vhea.descender")?;
    vhea.line_gap = factor.fword(vhea.line_gap, "vhea.lineGap")?;
    vhea.advance_height_max = factor.ufword(vhea.advance_height_max, "vhea.advanceHeightMax")?;
    vhea.min_top_side_bearing = factor.fword(vhea.min_top_side_bearing, "vhea.minTopSideBearing")?;
    vhea.min_bottom_side_bearing =
        factor.fword(vhea.min_bottom_side_bearing, "vhea.minBottomSideBearing")?;
    vhea.y_max_extent = factor.fword(vhea.y_max_extent, "vhea.yMaxExtent")?;
    Ok(())
}

fn scale_os2(os2: &mut Os2, factor: ScaleFactor) -> Result<(), ScaleError> {
    os2.x_avg_char_width = factor.i16(os2.x_avg_char_width, "OS/2.xAvgCharWidth")?;
    os2.y_subscript_x_size = factor.i16(os2.y_subscript_x_size, "OS/2.ySubscriptXSize")?;
    os2.y_subscript_y_size = factor.i16(os2.y_subscript_y_size, "OS/2.ySubscriptYSize")?;
    os2.y_subscript_x_offset = factor.i16(os2.y_subscript_x_offset, "OS/2.ySubscriptXOffset")?;
    os2.y_subscript_y_offset = factor.i16(os2.y_subscript_y_offset, "OS/2.ySubscriptYOffset")?;
    os2.y_superscript_x_size = factor.i16(os2.y_superscript_x_size, "OS/2.ySuperscriptXSize")?;
    os2.y_superscript_y_size = factor.i16(os2.y_superscript_y_size, "OS/2.ySuperscriptYSize")?;
    os2.y_superscript_x_offset =
        factor.i16(os2.y_superscript_x_offset, "OS/2.ySuperscriptXOffset")?;
    os2.y_superscript_y_offset =
        factor.i16(os2.y_superscript_y_offset, "OS/2.ySuperscriptYOffset")?;
    os2.y_strikeout_size = factor.i16(os2.y_strikeout_size, "OS/2.yStrikeoutSize")?;
    os2.y_strikeout_position = factor.i16(os2.y_strikeout_position, "OS/2.yStrikeoutPosition")?;
    os2.s_typo_ascender = factor.i16(os2.s_typo_ascender, "OS/2.sTypoAscender")?;
    os2.s_typo_descender = factor.i16(os2.s_typo_descender, "OS/2.sTypoDescender")?;
    os2.s_typo_line_gap = factor.i16(os2.s_typo_line_gap, "OS/2.sTypoLineGap")?;
    os2.us_win_ascent = factor.u16(os2.us_win_ascent, "OS/2.usWinAscent")?;
    os2.us_win_descent = factor.u16(os2.us_win_descent, "OS/2.usWinDescent")?;
    if let Some(x_height) = os2.sx_height {
        os2.sx_height = Some(factor.i16(x_height, "OS/2.sxHeight")?);
    }
    if let Some(cap_height) = os2.s_cap_height {
        os2.s_cap_height = Some(factor.i16(cap_height, "OS/2.sCapHeight")?);
    }
    Ok(())
}

fn scale_post(post: &mut Post, factor: ScaleFactor) -> Result<(), ScaleError> {
    post.underline_position = factor.fword(post.underline_position, "post.underlinePosition")?;
    post.underline_thickness = factor.fword(post.underline_thickness, "post.underlineThickness")?;
    Ok(())
}

fn scale_bbox(bbox: &mut BoundingBox, factor: ScaleFactor) -> Result<(), ScaleError> {
    bbox.x_min = factor.i16(bbox.x_min, "glyf.xMin")?;
    bbox.y_min = factor.i16(bbox.y_min, "glyf.yMin")?;
    bbox.x_max = factor.i16(bbox.x_max, "glyf.xMax")?;
    bbox.y_max = factor.i16(bbox.y_max, "glyf.yMax")?;
    Ok(())
}

fn scale_outline(outline: &mut GlyphOutline, factor: ScaleFactor) -> Result<(), ScaleError> {
    match outline {
        GlyphOutline::Empty => Ok(()),
        GlyphOutline::Simple(simple) => {
            for point in simple.contours.iter_mut().flatten() {
                point.x = factor.coordinate(point.x, "glyf.x")?;
                point.y = factor.coordinate(point.y, "glyf.y")?;
            }
            scale_bbox(&mut simple.bbox, factor)
        }
        GlyphOutline::Composite(composite) => {
            for component in &mut composite.components {
                // point-matched placements carry indices, not distances
                if let Placement::Offset { dx, dy } = &mut component.placement {
                    *dx = factor.coordinate(*dx, "glyf.dx")?;
                    *dy = factor.coordinate(*dy, "glyf.dy")?;
                }
            }
            scale_bbox(&mut composite.bbox, factor)
        }
    }
}

fn scale_metrics(
    metrics: &mut MetricTable,
    factor: ScaleFactor,
    table: &'static str,
) -> Result<(), ScaleError> {
    for metric in metrics.values_mut() {
        metric.advance = factor.u16(metric.advance, table)?;
        metric.side_bearing = factor.i16(metric.side_bearing, table)?;
    }
    Ok(())
}
