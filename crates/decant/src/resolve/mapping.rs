use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Error;

/// An immutable lexicon mapping source tokens to replacement tokens.
///
/// Built once, typically from a two-column file via
/// [`TokenMapping::from_file`], and held read-only for the duration of a
/// resolution session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenMapping {
    entries: HashMap<String, String>,
}

impl TokenMapping {
    /// Parses a mapping file with one `<source>\t<target>` entry per line.
    ///
    /// Only the first two tab-separated fields of a line are significant
    /// and both are trimmed of surrounding whitespace. A line without two
    /// fields is a fatal [`Error::MalformedMappingFile`]; no partial table
    /// is returned. Duplicate source keys resolve to the last line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;

        let mut entries = HashMap::new();
        for (index, line) in contents.lines().enumerate() {
            let mut fields = line.split('\t');
            let (Some(source), Some(target)) = (fields.next(), fields.next()) else {
                return Err(Error::MalformedMappingFile {
                    path: path.to_path_buf(),
                    line: index + 1,
                });
            };
            entries.insert(source.trim().to_string(), target.trim().to_string());
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded token mapping");
        Ok(Self { entries })
    }

    /// Builds a table from in-memory pairs; later duplicates win, matching
    /// the file loader.
    pub fn from_pairs<I, K, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        }
    }

    /// The replacement registered for `source`, if any.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
