//! Options for a merge run

use std::{collections::HashMap, path::Path};

use crate::finalize::FinalMetadata;

/// Per-source rescaling request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleConfig {
    pub enabled: bool,
    /// `None` scales to the base font's units per em.
    pub target_units_per_em: Option<u16>,
}

impl ScaleConfig {
    pub fn to_base() -> Self {
        Self { enabled: true, target_units_per_em: None }
    }

    pub fn to_units_per_em(target: u16) -> Self {
        Self { enabled: true, target_units_per_em: Some(target) }
    }
}

/// Options for merging, keyed by source file name.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Scale configuration by file name (not full path).
    pub scale: HashMap<String, ScaleConfig>,

    /// Naming metadata written after the merge.
    pub metadata: FinalMetadata,

    /// Treat a failed round-trip validation as fatal.
    pub strict_validation: bool,
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scale configuration of the source named `file`.
    ///
    /// Only the file name of `file` is used, so full paths are accepted.
    pub fn scale(mut self, file: impl AsRef<Path>, config: ScaleConfig) -> Self {
        self.scale.insert(basename(file.as_ref()), config);
        self
    }

    pub fn scale_all(mut self, configs: impl IntoIterator<Item = (String, ScaleConfig)>) -> Self {
        for (file, config) in configs {
            self = self.scale(file, config);
        }
        self
    }

    pub fn metadata(mut self, metadata: FinalMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Enabled scale configuration for the source at `path`, if any.
    pub fn scale_for(&self, path: &Path) -> Option<ScaleConfig> {
        self.scale.get(&basename(path)).copied().filter(|config| config.enabled)
    }
}

/// File name of `path` as a string, falling back to the whole path.
pub(crate) fn basename(path: &Path) -> String {
    path.file_name().unwrap_or(path.as_os_str()).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_keyed_by_file_name() {
        let options = MergeOptions::new()
            .scale("/fonts/cjk/NotoSansSC.ttf", ScaleConfig::to_units_per_em(1000))
            .scale("Symbols.ttf", ScaleConfig { enabled: false, target_units_per_em: Some(2048) });

        assert_eq!(
            options.scale_for(Path::new("elsewhere/NotoSansSC.ttf")),
            Some(ScaleConfig::to_units_per_em(1000))
        );
        assert_eq!(options.scale_for(Path::new("Symbols.ttf")), None);
        assert_eq!(options.scale_for(Path::new("Other.ttf")), None);
    }

    #[test]
    fn test_defaults() {
        let options = MergeOptions::default();
        assert!(options.scale.is_empty());
        assert!(!options.strict_validation);
        assert_eq!(options.metadata, FinalMetadata::default());
    }
}
