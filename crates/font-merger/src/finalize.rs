//! Caller-supplied naming metadata for the merged font

use log::{debug, warn};

use crate::{
    error::MetadataWriteError,
    model::{ENCODING_WINDOWS_BMP, FontTableSet, NameRecord, PLATFORM_WINDOWS},
};

pub const NAME_ID_FAMILY: u16 = 1;
pub const NAME_ID_STYLE: u16 = 2;
pub const NAME_ID_FULL_NAME: u16 = 4;
pub const NAME_ID_VERSION: u16 = 5;

/// Languages every metadata record is written for: en-US and zh-CN.
pub const LANGUAGES: [u16; 2] = [0x0409, 0x0804];

pub const DEFAULT_VERSION: &str = "Version 1.000";

/// Naming metadata applied after merging. Blank values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalMetadata {
    pub full_name: Option<String>,
    pub family_name: Option<String>,
    pub style_name: Option<String>,
    pub version: Option<String>,
}

impl FinalMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    pub fn family_name(mut self, name: impl Into<String>) -> Self {
        self.family_name = Some(name.into());
        self
    }

    pub fn style_name(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// `(name id, value)` pairs to write, or nothing without a full name.
    fn resolved(&self) -> Option<[(u16, String); 4]> {
        let full_name = non_blank(&self.full_name)?;
        let family = non_blank(&self.family_name).unwrap_or(full_name);
        let style = non_blank(&self.style_name).unwrap_or("");
        let version = non_blank(&self.version).unwrap_or(DEFAULT_VERSION);
        Some([
            (NAME_ID_FULL_NAME, full_name.to_string()),
            (NAME_ID_FAMILY, family.to_string()),
            (NAME_ID_STYLE, style.to_string()),
            (NAME_ID_VERSION, version.to_string()),
        ])
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Outcome of [`apply_final_metadata`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalizeReport {
    pub written: usize,
    pub failures: Vec<MetadataWriteError>,
}

/// Write full name, family, style and version records for every entry of
/// [`LANGUAGES`] on the Windows Unicode BMP platform.
///
/// Does nothing unless a full name is set. Records with the same full key
/// are overwritten in place. A record that cannot be written is reported
/// and skipped without affecting the others.
pub fn apply_final_metadata(table: &mut FontTableSet, meta: &FinalMetadata) -> FinalizeReport {
    let mut report = FinalizeReport::default();
    let Some(values) = meta.resolved() else {
        debug!("No full name given, keeping the merged name table");
        return report;
    };

    for language_id in LANGUAGES {
        for (name_id, value) in &values {
            let record = NameRecord::new(
                *name_id,
                PLATFORM_WINDOWS,
                ENCODING_WINDOWS_BMP,
                language_id,
                value.clone(),
            );
            match set_name(table, record) {
                Ok(()) => report.written += 1,
                Err(err) => {
                    warn!("Skipping name {name_id} for language {language_id:#06x}: {err}");
                    report.failures.push(err);
                }
            }
        }
    }
    report
}

fn set_name(table: &mut FontTableSet, record: NameRecord) -> Result<(), MetadataWriteError> {
    let len = record.value.encode_utf16().count() * 2;
    if len > u16::MAX as usize {
        return Err(MetadataWriteError::ValueTooLong { name_id: record.name_id, len });
    }
    match table.name_records.iter_mut().find(|existing| existing.key() == record.key()) {
        Some(existing) => existing.value = record.value,
        None => table.name_records.push(record),
    }
    Ok(())
}
