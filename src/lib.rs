//! huffman-codec: Huffman file compression with a sidecar code table.
//!
//! Encoding a file produces two artifacts:
//! - `<stem>_encoded<ext>` in the output directory, holding the bit-packed codes
//! - the sidecar config file, holding the code table needed to decode it
//!
//! Decoding reads the sidecar, rebuilds the tree and writes
//! `<stem>_decoded<ext>` to the output directory.

pub mod bitstream;
pub mod code_table;
pub mod codec;
pub mod config;
pub mod error;
pub mod frequency;
pub mod sidecar;
pub mod tree;

pub use crate::codec::{compress, decompress, Compressed};
pub use crate::config::CodecConfig;
pub use crate::error::{CodecError, ErrorCategory};

use crate::code_table::CodeTable;
use crate::config::CONFIG_EXTENSION;
use crate::frequency::ByteFrequencyMap;
use crate::tree::HuffmanTree;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

/// Outcome of [`Huffman::encode`]
#[derive(Debug, Clone, serde::Serialize)]
pub struct EncodeReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub config_size: u64,
    pub distinct_symbols: usize,
    pub entropy_bits: f64,
}

impl EncodeReport {
    /// Compressed size over original size, sidecar excluded.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.original_size as f64
        }
    }
}

/// Outcome of [`Huffman::decode`]
#[derive(Debug, Clone, serde::Serialize)]
pub struct DecodeReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub decoded_size: u64,
}

/// The file-level codec. Owns the sidecar location and output directory.
#[derive(Debug, Clone, Default)]
pub struct Huffman {
    config: CodecConfig,
}

impl Huffman {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compresses `path` into the output directory and writes the code
    /// table to the configured sidecar path.
    ///
    /// An empty input yields an empty compressed file and an empty sidecar.
    pub fn encode(&self, path: impl AsRef<Path>) -> Result<EncodeReport, CodecError> {
        let input = path.as_ref();
        require_file(input)?;
        self.require_output_dir()?;
        let output = output_path(input, "_encoded", &self.config.output_dir)?;
        reject_aliases(&self.config.config_path, &[input])?;
        reject_aliases(&output, &[input, &self.config.config_path])?;

        let mut reader = BufReader::new(File::open(input)?);
        let freq = ByteFrequencyMap::from_reader(&mut reader)?;
        let table = match HuffmanTree::build(&freq) {
            Some(tree) => CodeTable::from_tree(&tree),
            None => {
                tracing::debug!(input = %input.display(), "empty input");
                CodeTable::default()
            }
        };

        let mut config_file = BufWriter::new(File::create(&self.config.config_path)?);
        let config_size = sidecar::write_sidecar(&mut config_file, freq.total(), &table)?;
        config_file.flush()?;

        reader.rewind()?;
        let mut out = BufWriter::new(File::create(&output)?);
        let compressed_size = codec::encode_stream(&mut reader, &table, &mut out)?;
        out.flush()?;

        let report = EncodeReport {
            input: input.to_path_buf(),
            output,
            config: self.config.config_path.clone(),
            original_size: freq.total(),
            compressed_size,
            config_size,
            distinct_symbols: freq.len(),
            entropy_bits: freq.entropy_bits(),
        };
        tracing::info!(
            input = %report.input.display(),
            output = %report.output.display(),
            original = report.original_size,
            compressed = report.compressed_size,
            "encoded"
        );
        Ok(report)
    }

    /// Decompresses `path` using the configured sidecar.
    pub fn decode(&self, path: impl AsRef<Path>) -> Result<DecodeReport, CodecError> {
        let input = path.as_ref();
        require_file(input)?;
        if !self.config.config_path.is_file() {
            return Err(missing(format!(
                "config file {} not found",
                self.config.config_path.display()
            )));
        }
        self.require_output_dir()?;
        let output = output_path(input, "_decoded", &self.config.output_dir)?;
        reject_aliases(&output, &[input, &self.config.config_path])?;

        let config_file = File::open(&self.config.config_path)?;
        let sidecar = sidecar::read_sidecar(BufReader::new(config_file))?;

        let mut out = BufWriter::new(File::create(&output)?);
        let decoded_size = match &sidecar.tree {
            Some(tree) => {
                let reader = BufReader::new(File::open(input)?);
                codec::decode_stream(reader, tree, sidecar.symbol_count, &mut out)?
            }
            None => 0,
        };
        out.flush()?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            decoded = decoded_size,
            "decoded"
        );
        Ok(DecodeReport {
            input: input.to_path_buf(),
            output,
            decoded_size,
        })
    }

    /// Points later encodes and decodes at an existing `.conf` file.
    pub fn upload_config(&mut self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        require_file(path)?;
        if path.extension().map_or(true, |ext| ext != CONFIG_EXTENSION) {
            tracing::warn!(path = %path.display(), "rejected config without .conf extension");
            return Err(CodecError::NotAConfigFile {
                path: path.to_path_buf(),
                expected: CONFIG_EXTENSION,
            });
        }
        self.config.config_path = path.to_path_buf();
        tracing::info!(path = %path.display(), "config file set");
        Ok(())
    }

    pub fn set_save_directory(&mut self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(rejected(CodecError::PathNotFound(path.to_path_buf())));
        }
        if !path.is_dir() {
            return Err(rejected(CodecError::NotADirectory(path.to_path_buf())));
        }
        self.config.output_dir = path.to_path_buf();
        tracing::info!(path = %path.display(), "output directory set");
        Ok(())
    }

    fn require_output_dir(&self) -> Result<(), CodecError> {
        if self.config.output_dir.is_dir() {
            Ok(())
        } else {
            Err(missing(format!(
                "output directory {} not found",
                self.config.output_dir.display()
            )))
        }
    }
}

fn require_file(path: &Path) -> Result<(), CodecError> {
    if !path.exists() {
        return Err(rejected(CodecError::PathNotFound(path.to_path_buf())));
    }
    if !path.is_file() {
        return Err(rejected(CodecError::NotAFile(path.to_path_buf())));
    }
    Ok(())
}

/// Fails if writing `written` would clobber any of `protected`.
fn reject_aliases(written: &Path, protected: &[&Path]) -> Result<(), CodecError> {
    let Some(resolved) = resolve(written) else {
        return Ok(());
    };
    for &path in protected {
        if resolve(path).as_ref() == Some(&resolved) {
            return Err(rejected(CodecError::SamePath {
                input: path.to_path_buf(),
                target: written.to_path_buf(),
            }));
        }
    }
    Ok(())
}

/// Canonical form of `path`, which need not exist yet as long as its
/// parent does.
fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(real) = fs::canonicalize(path) {
        return Some(real);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|p| p.join(name))
}

fn rejected(err: CodecError) -> CodecError {
    tracing::warn!(%err, "path rejected");
    err
}

fn missing(what: String) -> CodecError {
    rejected(CodecError::MissingPrerequisite(what))
}

/// `dir/<stem><suffix><.ext>`
fn output_path(input: &Path, suffix: &str, dir: &Path) -> Result<PathBuf, CodecError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| CodecError::NotAFile(input.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_naming() {
        let dir = Path::new("/out");
        assert_eq!(
            output_path(Path::new("/data/report.txt"), "_encoded", dir).unwrap(),
            PathBuf::from("/out/report_encoded.txt")
        );
        assert_eq!(
            output_path(Path::new("file"), "_decoded", dir).unwrap(),
            PathBuf::from("/out/file_decoded")
        );
        assert_eq!(
            output_path(Path::new("archive.tar.gz"), "_encoded", dir).unwrap(),
            PathBuf::from("/out/archive.tar_encoded.gz")
        );
    }

    #[test]
    fn test_ratio() {
        let report = EncodeReport {
            input: PathBuf::from("a"),
            output: PathBuf::from("a_encoded"),
            config: PathBuf::from("huffman.conf"),
            original_size: 1000,
            compressed_size: 250,
            config_size: 20,
            distinct_symbols: 4,
            entropy_bits: 2.0,
        };
        assert!((report.ratio() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_matches_relative_and_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.conf");
        fs::write(&file, b"x").unwrap();
        let dotted = dir.path().join(".").join("a.conf");
        assert_eq!(resolve(&file), resolve(&dotted));

        let pending = dir.path().join("not_yet.bin");
        assert_eq!(
            resolve(&pending),
            Some(fs::canonicalize(dir.path()).unwrap().join("not_yet.bin"))
        );
        assert!(matches!(
            reject_aliases(&file, &[&dotted]),
            Err(CodecError::SamePath { .. })
        ));
        assert!(reject_aliases(&file, &[&pending]).is_ok());
    }

    #[test]
    fn test_missing_input_is_validation_error() {
        let huffman = Huffman::default();
        let err = huffman.encode("/definitely/not/here.bin").unwrap_err();
        assert!(matches!(err, CodecError::PathNotFound(_)));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
