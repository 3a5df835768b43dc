use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Both encode artifacts for one input.
///
/// `uncompressed` is the human-readable layout (`<header> \n` followed by the
/// code bits as `'0'`/`'1'` characters); `compressed` is `<header>\n` followed
/// by the same bits packed eight to a byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    pub header: String,
    pub uncompressed: Vec<u8>,
    pub compressed: Vec<u8>,
    /// Code bits including the trailing end-of-text code.
    pub bit_count: usize,
}

impl EncodedOutput {
    pub fn save(&self, paths: &OutputPaths) -> Result<()> {
        fs::write(&paths.uncompressed, &self.uncompressed)?;
        fs::write(&paths.compressed, &self.compressed)?;
        debug!(
            uncompressed = %paths.uncompressed.display(),
            compressed = %paths.compressed.display(),
            bytes = self.compressed.len(),
            "wrote encoded files"
        );
        Ok(())
    }
}

/// Where `encode_file` writes its two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub uncompressed: PathBuf,
    pub compressed: PathBuf,
}

impl OutputPaths {
    /// `out.txt` pairs with `out_compressed.txt` in the same directory.
    pub fn for_output(path: impl Into<PathBuf>) -> Self {
        let uncompressed = path.into();
        let stem = uncompressed
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let compressed = uncompressed.with_file_name(format!("{stem}_compressed.txt"));
        OutputPaths {
            uncompressed,
            compressed,
        }
    }

    pub fn with_compressed(mut self, path: impl AsRef<Path>) -> Self {
        self.compressed = path.as_ref().to_path_buf();
        self
    }
}
