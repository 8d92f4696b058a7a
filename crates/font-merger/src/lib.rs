//! Merge several TrueType fonts into one.
//!
//! The first source is the base: its glyphs, metrics, character mappings and
//! names always win. Each further source only contributes what the base (as
//! merged so far) does not already have. A source can be rescaled to the
//! base's units per em before it is merged.
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use fontmeld::{FinalMetadata, MergeOptions, Merger, ScaleConfig};
//!
//! let options = MergeOptions::new()
//!     .scale("NotoSansSC.ttf", ScaleConfig::to_base())
//!     .metadata(FinalMetadata::new().full_name("Meld Sans"));
//! let sources = vec![PathBuf::from("Latin.ttf"), PathBuf::from("NotoSansSC.ttf")];
//!
//! Merger::new(options)
//!     .run(&sources, "Merged.ttf".as_ref(), |percent| println!("{percent}%"))
//!     .unwrap();
//! ```

pub mod codec;
mod error;
mod finalize;
mod glyph_order;
mod merger;
pub mod model;
mod options;
mod orchestrator;
mod reconcile;
mod scale;
mod tables;
mod types;
mod validate;

pub use codec::{FontCodec, SfntCodec};
pub use error::{
    CodecError, Error, FontRole, MergeError, MergeFailure, MetadataWriteError, Result, ScaleError,
    ValidationError,
};
pub use finalize::{FinalMetadata, FinalizeReport, LANGUAGES, apply_final_metadata};
pub use glyph_order::{GlyphName, GlyphOrder};
pub use merger::{MergeStats, merge_into};
pub use model::FontTableSet;
pub use options::{MergeOptions, ScaleConfig};
pub use orchestrator::{MergeEvent, MergeStage, Merger, merge_fonts, progress_percent};
pub use reconcile::reconcile;
pub use scale::{ScaleFactor, scale};
pub use types::Codepoint;
pub use validate::validate;
