//! Dataset artifact kinds and their raw, undecoded content.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::error::{DecodeError, Result};

/// A file that makes up a benchmark dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataArtifact {
    Train,
    Test,
    Interventions,
    Counterfactuals,
    TrueAdjacency,
    VariablesJson,
}

impl DataArtifact {
    pub const ALL: [DataArtifact; 6] = [
        DataArtifact::Train,
        DataArtifact::Test,
        DataArtifact::Interventions,
        DataArtifact::Counterfactuals,
        DataArtifact::TrueAdjacency,
        DataArtifact::VariablesJson,
    ];

    /// Canonical file name inside a dataset directory.
    pub fn file_name(self) -> &'static str {
        match self {
            DataArtifact::Train => "train.csv",
            DataArtifact::Test => "test.csv",
            DataArtifact::Interventions => "interventions.json",
            DataArtifact::Counterfactuals => "counterfactuals.json",
            DataArtifact::TrueAdjacency => "adj_matrix.csv",
            DataArtifact::VariablesJson => "variables.json",
        }
    }

    /// Short name, used in logs and accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            DataArtifact::Train => "train",
            DataArtifact::Test => "test",
            DataArtifact::Interventions => "interventions",
            DataArtifact::Counterfactuals => "counterfactuals",
            DataArtifact::TrueAdjacency => "adjacency",
            DataArtifact::VariablesJson => "variables",
        }
    }

    /// Whether the artifact is stored as a headerless numeric CSV.
    #[inline]
    pub fn is_table(self) -> bool {
        matches!(
            self,
            DataArtifact::Train | DataArtifact::Test | DataArtifact::TrueAdjacency
        )
    }
}

impl fmt::Display for DataArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for DataArtifact {
    type Err = DecodeError;

    /// Accepts either the file name (`"train.csv"`) or the short name (`"train"`).
    fn from_str(s: &str) -> Result<Self> {
        DataArtifact::ALL
            .into_iter()
            .find(|a| a.file_name() == s || a.name() == s)
            .ok_or_else(|| DecodeError::UnsupportedArtifact(s.to_string()))
    }
}

/// Artifact content as fetched, before any decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum RawArtifact {
    Table(Array2<f64>),
    Json(serde_json::Value),
}

impl RawArtifact {
    /// The numeric table, or [`DecodeError::ArtifactFormat`] for JSON content.
    pub fn into_table(self, artifact: DataArtifact) -> Result<Array2<f64>> {
        match self {
            RawArtifact::Table(table) => Ok(table),
            RawArtifact::Json(_) => Err(DecodeError::ArtifactFormat {
                artifact: artifact.file_name(),
                expected: "a table",
            }),
        }
    }

    /// The JSON document, or [`DecodeError::ArtifactFormat`] for table content.
    pub fn into_json(self, artifact: DataArtifact) -> Result<serde_json::Value> {
        match self {
            RawArtifact::Json(value) => Ok(value),
            RawArtifact::Table(_) => Err(DecodeError::ArtifactFormat {
                artifact: artifact.file_name(),
                expected: "a JSON document",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("train.csv", DataArtifact::Train)]
    #[case("test", DataArtifact::Test)]
    #[case("interventions.json", DataArtifact::Interventions)]
    #[case("counterfactuals", DataArtifact::Counterfactuals)]
    #[case("adj_matrix.csv", DataArtifact::TrueAdjacency)]
    #[case("variables.json", DataArtifact::VariablesJson)]
    fn parses_file_and_short_names(#[case] input: &str, #[case] expected: DataArtifact) {
        assert_eq!(input.parse::<DataArtifact>().unwrap(), expected);
    }

    #[test]
    fn display_is_file_name() {
        for artifact in DataArtifact::ALL {
            assert_eq!(artifact.to_string().parse::<DataArtifact>().unwrap(), artifact);
        }
    }

    #[test]
    fn unknown_artifact() {
        let err = "weights.pt".parse::<DataArtifact>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedArtifact);
    }

    #[test]
    fn format_mismatch_is_schema_error() {
        let raw = RawArtifact::Json(serde_json::json!({}));
        let err = raw.into_table(DataArtifact::Train).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("train.csv"));
    }
}
