//! Sequencing a whole merge run
//!
//! The first source is the base font. Every further source is loaded,
//! optionally rescaled and merged into it; the result is reconciled, named,
//! validated and saved. [`Merger::spawn`] runs the same pipeline on a worker
//! thread and reports over a channel.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
    thread,
};

use log::{debug, error, info, warn};

use crate::{
    codec::{FontCodec, SfntCodec},
    error::{Error, MergeFailure, Result},
    finalize::{FinalMetadata, apply_final_metadata},
    merger::merge_into,
    model::FontTableSet,
    options::{MergeOptions, ScaleConfig, basename},
    reconcile::reconcile,
    scale::{ScaleFactor, scale},
    validate::validate,
};

/// Where a merge run is. Font indices are 1-based positions in the source list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    Idle,
    Loading(usize),
    Scaling(usize),
    Merging(usize),
    Reconciling,
    Finalizing,
    Validating,
    Saving,
    Done,
    Failed,
}

impl fmt::Display for MergeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStage::Idle => f.write_str("starting"),
            MergeStage::Loading(i) => write!(f, "loading font {i}"),
            MergeStage::Scaling(i) => write!(f, "scaling font {i}"),
            MergeStage::Merging(i) => write!(f, "merging font {i}"),
            MergeStage::Reconciling => f.write_str("reconciling glyph counts"),
            MergeStage::Finalizing => f.write_str("applying final metadata"),
            MergeStage::Validating => f.write_str("validating"),
            MergeStage::Saving => f.write_str("saving"),
            MergeStage::Done => f.write_str("done"),
            MergeStage::Failed => f.write_str("failed"),
        }
    }
}

/// Reported by a spawned merge. Exactly one `Completed` or `Failed` ends
/// the stream.
#[derive(Debug)]
pub enum MergeEvent {
    /// Percent complete, never decreasing.
    Progress(u8),
    Completed(PathBuf),
    Failed(MergeFailure),
}

/// Percent reported once `done` of the `total` additional fonts are merged.
///
/// Capped at 99 so that 100 always means the output is on disk.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (done as f64 / total as f64 * 100.0).round();
    percent.clamp(0.0, 99.0) as u8
}

/// Runs merges with a codec and a set of options.
#[derive(Debug, Clone, Default)]
pub struct Merger<C: FontCodec = SfntCodec> {
    codec: C,
    options: MergeOptions,
}

impl Merger<SfntCodec> {
    pub fn new(options: MergeOptions) -> Self {
        Self { codec: SfntCodec, options }
    }
}

impl<C: FontCodec> Merger<C> {
    pub fn with_codec(codec: C, options: MergeOptions) -> Self {
        Self { codec, options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `sources` into `output`, calling `progress` with percentages.
    ///
    /// Nothing is written to `output` unless every step up to saving
    /// succeeds.
    pub fn run(
        &self,
        sources: &[PathBuf],
        output: &Path,
        mut progress: impl FnMut(u8),
    ) -> Result<(), MergeFailure> {
        let mut stage = MergeStage::Idle;
        match self.execute(sources, output, &mut stage, &mut progress) {
            Ok(()) => Ok(()),
            Err(err) => {
                let failure = MergeFailure { stage, error: err };
                error!("{failure}");
                enter(&mut stage, MergeStage::Failed);
                Err(failure)
            }
        }
    }

    fn execute(
        &self,
        sources: &[PathBuf],
        output: &Path,
        stage: &mut MergeStage,
        progress: &mut impl FnMut(u8),
    ) -> Result<()> {
        let (first, rest) = sources.split_first().ok_or(Error::NoInputFonts)?;
        let total = rest.len();

        enter(stage, MergeStage::Loading(1));
        let mut base = self.load(first)?;
        let base_units_per_em = base.units_per_em();
        info!("Base font {} ({} glyphs)", basename(first), base.glyph_order.len());

        for (done, path) in rest.iter().enumerate().map(|(i, path)| (i + 1, path)) {
            let index = done + 1;

            enter(stage, MergeStage::Loading(index));
            let mut font = self.load(path)?;

            if let Some(config) = self.options.scale_for(path) {
                enter(stage, MergeStage::Scaling(index));
                rescale(&mut font, config, base_units_per_em, path);
            }

            enter(stage, MergeStage::Merging(index));
            let stats = merge_into(&mut base, &font)
                .map_err(|source| Error::Merge { file: basename(path), source })?;
            info!(
                "Merged {}: {} glyphs, {} codepoints, {} names added",
                basename(path),
                stats.glyphs_added,
                stats.codepoints_added,
                stats.names_added
            );
            progress(progress_percent(done, total));
        }

        enter(stage, MergeStage::Reconciling);
        reconcile(&mut base);

        enter(stage, MergeStage::Finalizing);
        let report = apply_final_metadata(&mut base, &self.options.metadata);
        if !report.failures.is_empty() {
            warn!("{} name records could not be written", report.failures.len());
        }

        enter(stage, MergeStage::Validating);
        if let Err(err) = validate(&base, &self.codec, scratch_dir(output)) {
            if self.options.strict_validation {
                return Err(err.into());
            }
            warn!("{err}; saving anyway");
        }

        enter(stage, MergeStage::Saving);
        self.codec
            .save(&base, output)
            .map_err(|source| Error::Save { path: output.to_path_buf(), source })?;

        enter(stage, MergeStage::Done);
        progress(100);
        info!("Wrote {} ({} glyphs)", output.display(), base.glyph_order.len());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<FontTableSet> {
        self.codec.load(path).map_err(|source| Error::Load { file: basename(path), source })
    }
}

impl<C: FontCodec + Send + 'static> Merger<C> {
    /// Run the merge on a dedicated worker thread.
    pub fn spawn(self, sources: Vec<PathBuf>, output: PathBuf) -> Receiver<MergeEvent> {
        let (tx, rx) = mpsc::channel();
        let fallback = tx.clone();

        let worker = thread::Builder::new().name("fontmeld-merge".into()).spawn(move || {
            let result = self.run(&sources, &output, |percent| {
                // a dropped receiver only means nobody is listening
                let _ = tx.send(MergeEvent::Progress(percent));
            });
            let _ = tx.send(match result {
                Ok(()) => MergeEvent::Completed(output),
                Err(failure) => MergeEvent::Failed(failure),
            });
        });

        if let Err(err) = worker {
            let _ = fallback.send(MergeEvent::Failed(MergeFailure {
                stage: MergeStage::Idle,
                error: Error::Worker(err),
            }));
        }
        rx
    }
}

/// Merge `sources` into `output` on a worker thread.
///
/// `scale_config` is keyed by source file name.
pub fn merge_fonts(
    sources: Vec<PathBuf>,
    output: PathBuf,
    scale_config: HashMap<String, ScaleConfig>,
    final_metadata: FinalMetadata,
) -> Receiver<MergeEvent> {
    let options = MergeOptions::new().scale_all(scale_config).metadata(final_metadata);
    Merger::new(options).spawn(sources, output)
}

fn enter(stage: &mut MergeStage, next: MergeStage) {
    debug!("{stage} -> {next}");
    *stage = next;
}

fn scratch_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Rescale `font` as configured. Failures leave it unscaled.
fn rescale(font: &mut FontTableSet, config: ScaleConfig, base_units_per_em: u16, path: &Path) {
    let current = font.units_per_em();
    if current == 0 {
        warn!("{} has unitsPerEm 0, not scaling", basename(path));
        return;
    }
    let target = config.target_units_per_em.unwrap_or(base_units_per_em);
    let factor = match ScaleFactor::from_units_per_em(target, current) {
        Ok(factor) if factor.is_identity() => {
            debug!("{} is already at {target} units per em", basename(path));
            return;
        }
        Ok(factor) => factor,
        Err(err) => {
            warn!("Not scaling {}: {err}", basename(path));
            return;
        }
    };
    match scale(font, factor) {
        Ok(()) => info!("Scaled {} from {current} to {target} units per em", basename(path)),
        Err(err) => warn!("Merging {} unscaled: {err}", basename(path)),
    }
}
