use std::{fmt, io, path::PathBuf, result};

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::BuilderError;

use crate::{glyph_order::GlyphName, orchestrator::MergeStage};

/// Failures of the sfnt codec (decode, encode, and the file I/O around them).
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to read font: {0}")]
    Read(#[from] ReadError),

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("required table '{0}' not found")]
    MissingTable(&'static str),

    #[error("maxp declares {declared} glyphs but the glyph order has {actual}")]
    GlyphCountMismatch { declared: u16, actual: usize },

    #[error("glyph '{0}' has no horizontal metric")]
    MissingMetric(GlyphName),

    #[error("{0} glyphs exceed the 65535 glyph limit")]
    TooManyGlyphs(usize),

    #[error("glyph '{glyph}' has a coordinate outside the 16-bit range: {value}")]
    CoordinateOutOfRange { glyph: GlyphName, value: f64 },

    #[error("glyph '{0}' could not be encoded")]
    GlyphEncoding(GlyphName),
}

/// Failures while rescaling a single font.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("scale factor must be positive, got {numerator}/{denominator}")]
    InvalidScaleFactor { numerator: u32, denominator: u32 },

    #[error("scaled value {value} does not fit '{field}'")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Which side of a merge step a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Base,
    Incoming,
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontRole::Base => f.write_str("base"),
            FontRole::Incoming => f.write_str("incoming"),
        }
    }
}

/// Structural failures while merging one font into the accumulator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("{role} font has no '{table}' table")]
    MissingRequiredTable { table: &'static str, role: FontRole },
}

#[derive(Error, Debug)]
#[error("round-trip validation failed: {0}")]
pub struct ValidationError(#[from] pub CodecError);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetadataWriteError {
    #[error("name {name_id} is {len} bytes long once encoded; the limit is 65535")]
    ValueTooLong { name_id: u16, len: usize },
}

/// Fatal failures of a whole merge operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no fonts provided for merging")]
    NoInputFonts,

    #[error("failed to load font '{file}': {source}")]
    Load {
        file: String,
        #[source]
        source: CodecError,
    },

    #[error("failed to merge font '{file}': {source}")]
    Merge {
        file: String,
        #[source]
        source: MergeError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to save '{}': {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("failed to start merge worker: {0}")]
    Worker(#[source] io::Error),
}

impl Error {
    /// The source font the failure is attributed to, if any.
    pub fn source_file(&self) -> Option<&str> {
        match self {
            Error::Load { file, .. } | Error::Merge { file, .. } => Some(file),
            _ => None,
        }
    }
}

/// A fatal error together with the pipeline stage it interrupted.
#[derive(Error, Debug)]
#[error("merge failed while {stage}: {error}")]
pub struct MergeFailure {
    pub stage: MergeStage,
    #[source]
    pub error: Error,
}

pub type Result<T, E = Error> = result::Result<T, E>;
