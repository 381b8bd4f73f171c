//! Path configuration for huffman-codec

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the sidecar config written when none has been uploaded.
pub const DEFAULT_CONFIG_NAME: &str = "huffman.conf";

/// Extension an uploaded sidecar config file must carry.
pub const CONFIG_EXTENSION: &str = "conf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Where the code table is written on encode and read on decode.
    pub config_path: PathBuf,
    /// Directory receiving `_encoded` and `_decoded` outputs.
    pub output_dir: PathBuf,
}

impl CodecConfig {
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Places both the sidecar and the outputs under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            config_path: dir.join(DEFAULT_CONFIG_NAME),
            output_dir: dir.to_path_buf(),
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        // An unreadable cwd falls back to relative paths.
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(cwd)
    }
}
