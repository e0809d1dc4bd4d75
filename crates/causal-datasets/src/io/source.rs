//! Where artifacts come from.
//!
//! An [`ArtifactSource`] resolves `(root, artifact)` pairs to raw content.
//! Decoding never depends on the source, so anything that can produce a
//! table or a JSON document can back a [`DatasetLoader`](super::DatasetLoader).

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::decode::matrix_from_rows;
use crate::error::{DecodeError, Result};

use super::{DataArtifact, RawArtifact};

/// Retrieves raw dataset artifacts.
pub trait ArtifactSource: Send + Sync {
    /// Fetch `artifact` of the dataset rooted at `root`.
    fn fetch(&self, root: &str, artifact: DataArtifact) -> Result<RawArtifact>;
}

impl<S: ArtifactSource + ?Sized> ArtifactSource for &S {
    fn fetch(&self, root: &str, artifact: DataArtifact) -> Result<RawArtifact> {
        (**self).fetch(root, artifact)
    }
}

// =============================================================================
// Local directories
// =============================================================================

/// Reads artifacts from `<base>/<root>/<file name>`.
#[derive(Clone, Debug, Default)]
pub struct DirectorySource {
    base: PathBuf,
}

impl DirectorySource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Full path of `artifact` under `root`.
    pub fn path(&self, root: &str, artifact: DataArtifact) -> PathBuf {
        self.base.join(root).join(artifact.file_name())
    }
}

impl ArtifactSource for DirectorySource {
    fn fetch(&self, root: &str, artifact: DataArtifact) -> Result<RawArtifact> {
        let file = BufReader::new(File::open(self.path(root, artifact))?);
        if artifact.is_table() {
            read_table(file).map(RawArtifact::Table)
        } else {
            Ok(RawArtifact::Json(serde_json::from_reader(file)?))
        }
    }
}

/// Parse a headerless numeric CSV into a row-major matrix.
///
/// Whitespace around values is ignored and lines starting with `#` are
/// skipped. Every row must have the same number of values.
pub fn read_table<R: Read>(reader: R) -> Result<ndarray::Array2<f64>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows = Vec::new();
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let values = record
            .iter()
            .enumerate()
            .map(|(column, value)| {
                value.parse::<f64>().map_err(|_| DecodeError::InvalidNumber {
                    row,
                    column,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(values);
    }
    matrix_from_rows(&rows, 0)
}

// =============================================================================
// In-memory
// =============================================================================

/// Serves pre-materialised artifacts, keyed by root and artifact.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    artifacts: HashMap<(String, DataArtifact), RawArtifact>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `raw` as `artifact` of `root`, replacing any previous entry.
    pub fn insert(&mut self, root: impl Into<String>, artifact: DataArtifact, raw: RawArtifact) {
        self.artifacts.insert((root.into(), artifact), raw);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, root: impl Into<String>, artifact: DataArtifact, raw: RawArtifact) -> Self {
        self.insert(root, artifact, raw);
        self
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactSource for InMemorySource {
    fn fetch(&self, root: &str, artifact: DataArtifact) -> Result<RawArtifact> {
        self.artifacts
            .get(&(root.to_string(), artifact))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no artifact {artifact} under '{root}'"),
                )
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ndarray::array;

    #[test]
    fn reads_headerless_table() {
        let text = "# generated\n1, 2.5, -3\n4,5e-1,6\n";
        let table = read_table(text.as_bytes()).unwrap();
        assert_eq!(table, array![[1.0, 2.5, -3.0], [4.0, 0.5, 6.0]]);
    }

    #[test]
    fn empty_table() {
        let table = read_table("".as_bytes()).unwrap();
        assert_eq!(table.dim(), (0, 0));
    }

    #[test]
    fn ragged_table_is_rejected() {
        let err = read_table("1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::RaggedRows { row: 1, expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn non_numeric_cell_is_rejected() {
        let err = read_table("1,abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { row: 0, column: 1, .. }));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn in_memory_lookup() {
        let source = InMemorySource::new().with(
            "toy",
            DataArtifact::Train,
            RawArtifact::Table(array![[1.0]]),
        );
        assert_eq!(
            source.fetch("toy", DataArtifact::Train).unwrap(),
            RawArtifact::Table(array![[1.0]])
        );

        let err = source.fetch("toy", DataArtifact::Test).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        let err = source.fetch("other", DataArtifact::Train).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn directory_paths() {
        let source = DirectorySource::new("/data");
        assert_eq!(
            source.path("csuite", DataArtifact::TrueAdjacency),
            PathBuf::from("/data/csuite/adj_matrix.csv")
        );
    }
}
