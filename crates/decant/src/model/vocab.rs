use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::resolve::UNK_TOKEN;

/// Sentinel tokens every vocabulary carries in addition to its file
/// entries, in index order after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokens {
    pub unk: String,
    pub sequence_start: String,
    pub sequence_end: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            unk: UNK_TOKEN.to_string(),
            sequence_start: "SEQUENCE_START".to_string(),
            sequence_end: "SEQUENCE_END".to_string(),
        }
    }
}

impl SpecialTokens {
    pub fn len(&self) -> usize {
        3
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Metadata about a vocabulary file.
///
/// A vocabulary file holds one token per line with an optional
/// tab-separated count column. The tokens themselves stay on disk; models
/// only need the entry count and the special-token set to size their
/// embeddings.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabInfo {
    pub path: PathBuf,
    /// File entries plus the special tokens.
    pub vocab_size: usize,
    pub special_tokens: SpecialTokens,
}

impl VocabInfo {
    /// Resolves vocabulary metadata from a file.
    ///
    /// Lines with a count column must carry an unsigned integer there;
    /// anything else is a fatal [`Error::MalformedVocabFile`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;

        let mut entries = 0;
        for (index, line) in contents.lines().enumerate() {
            let mut fields = line.split('\t');
            let _token = fields.next();
            if let Some(count) = fields.next() {
                if count.trim().parse::<u64>().is_err() {
                    return Err(Error::MalformedVocabFile {
                        path: path.to_path_buf(),
                        line: index + 1,
                    });
                }
            }
            entries += 1;
        }

        let special_tokens = SpecialTokens::default();
        Ok(Self {
            path: path.to_path_buf(),
            vocab_size: entries + special_tokens.len(),
            special_tokens,
        })
    }
}
