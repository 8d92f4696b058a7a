//! hmtx merging

use log::debug;

use crate::{
    glyph_order::GlyphName,
    model::{FontTableSet, Metric, MetricTable},
};

/// Copy the horizontal metric of every glyph in `added` from `incoming`.
///
/// Glyphs the incoming font has no metric for get `(0, 0)`.
pub fn merge_hmtx(base: &mut FontTableSet, incoming: &FontTableSet, added: &[GlyphName]) {
    copy_metrics(&mut base.h_metrics, &incoming.h_metrics, added, "hmtx");
}

/// Shared by the horizontal and vertical metric merges.
pub(crate) fn copy_metrics(
    base: &mut MetricTable,
    incoming: &MetricTable,
    added: &[GlyphName],
    table: &str,
) {
    for name in added {
        if base.contains_key(name) {
            continue;
        }
        let metric = incoming.get(name).copied().unwrap_or_else(|| {
            debug!("No {table} entry for '{name}', using (0, 0)");
            Metric::ZERO
        });
        base.insert(name.clone(), metric);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GlyphOutline;

    #[test]
    fn test_metrics_copied_for_added_glyphs_only() {
        let mut base = FontTableSet::new(1000);
        base.add_glyph("B", GlyphOutline::Empty, Metric::new(650, 40));
        let mut incoming = FontTableSet::new(1000);
        incoming.add_glyph("B", GlyphOutline::Empty, Metric::new(1, 1));
        incoming.add_glyph("C", GlyphOutline::Empty, Metric::new(600, 50));

        merge_hmtx(&mut base, &incoming, &["C".into()]);

        assert_eq!(base.h_metrics["B"], Metric::new(650, 40));
        assert_eq!(base.h_metrics["C"], Metric::new(600, 50));
    }

    #[test]
    fn test_missing_metric_becomes_zero() {
        let mut base = FontTableSet::new(1000);
        let incoming = FontTableSet::new(1000);

        merge_hmtx(&mut base, &incoming, &["orphan".into()]);

        assert_eq!(base.h_metrics["orphan"], Metric::ZERO);
    }
}
