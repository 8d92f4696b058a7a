//! Restoring cross-table consistency after merging

use log::{debug, warn};

use crate::{
    glyph_order::GlyphOrder,
    model::{FontTableSet, Metric, MetricTable},
};

/// Bring the glyph count and metric tables in line with the glyph order.
///
/// Sets `maxp.numGlyphs` to the glyph order length (saturating; the codec
/// refuses to encode more than 65535 glyphs), gives every glyph without a
/// metric a `(0, 0)` entry and reorders the metric tables to follow the
/// glyph order.
pub fn reconcile(table: &mut FontTableSet) {
    let count = table.glyph_order.len();
    if count > u16::MAX as usize {
        warn!("{count} glyphs do not fit in maxp.numGlyphs");
    }
    table.maxp.num_glyphs = count.min(u16::MAX as usize) as u16;

    let filled = backfill(&mut table.h_metrics, &table.glyph_order);
    if filled > 0 {
        debug!("Backfilled {filled} missing hmtx entries");
    }
    if let Some(v_metrics) = table.v_metrics.as_mut() {
        let filled = backfill(v_metrics, &table.glyph_order);
        if filled > 0 {
            debug!("Backfilled {filled} missing vmtx entries");
        }
    }
}

fn backfill(metrics: &mut MetricTable, glyph_order: &GlyphOrder) -> usize {
    let mut filled = 0;
    let ordered: MetricTable = glyph_order
        .iter()
        .map(|name| {
            let metric = metrics.get(name).copied().unwrap_or_else(|| {
                filled += 1;
                Metric::ZERO
            });
            (name.clone(), metric)
        })
        .collect();
    *metrics = ordered;
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{glyph_order::GlyphName, model::GlyphOutline};

    #[test]
    fn test_count_and_metrics_follow_glyph_order() {
        let mut font = FontTableSet::new(1000);
        font.add_glyph(".notdef", GlyphOutline::Empty, Metric::new(500, 0));
        font.glyph_order.insert("A".into());
        font.glyph_order.insert("B".into());
        font.h_metrics.insert("B".into(), Metric::new(610, 12));
        font.h_metrics.shift_remove(".notdef");
        font.h_metrics.insert(".notdef".into(), Metric::new(500, 0));

        reconcile(&mut font);

        assert_eq!(font.glyph_count(), 3);
        let metrics: Vec<_> = font.h_metrics.iter().map(|(n, m)| (n.as_str(), *m)).collect();
        assert_eq!(
            metrics,
            [(".notdef", Metric::new(500, 0)), ("A", Metric::ZERO), ("B", Metric::new(610, 12))]
        );
    }

    #[test]
    fn test_vertical_metrics_backfilled_when_present() {
        let mut font = FontTableSet::new(1000);
        font.add_glyph("A", GlyphOutline::Empty, Metric::new(500, 0));
        font.v_metrics = Some(MetricTable::new());

        reconcile(&mut font);

        assert_eq!(font.v_metrics.unwrap()[&GlyphName::new("A")], Metric::ZERO);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut font = FontTableSet::new(1000);
        font.glyph_order.insert("x".into());
        reconcile(&mut font);
        let once = font.clone();
        reconcile(&mut font);
        assert_eq!(font, once);
    }
}
