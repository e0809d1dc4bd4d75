//! Error types for dataset decoding.
//!
//! Every failure is a concrete [`DecodeError`] variant. [`DecodeError::kind`]
//! projects the variant onto the coarse [`ErrorKind`] taxonomy, which is what
//! callers usually want to branch on.

use crate::variables::VariableType;

/// Coarse classification of a [`DecodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Variable metadata or data shape is inconsistent.
    Schema,
    /// An intervened value is not constant across a sampled batch.
    InvariantViolation,
    /// Reference data was required but absent.
    MissingReference,
    /// An experiment column index has no catalog entry.
    IndexMapping,
    /// The requested artifact kind is not recognised.
    UnsupportedArtifact,
    /// Retrieval failed (filesystem, CSV or JSON parsing).
    Io,
}

/// Errors produced while decoding datasets and experiment files.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("expected 2-dimensional data, got {ndim} dimensions")]
    NotTwoDimensional { ndim: usize },

    #[error("variable sizes do not match data shape: catalog declares {expected} columns, data has {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("row {row} has {actual} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid number {value:?} at row {row}, column {column}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("value {value} at row {row}, column {column} is not an integer")]
    NonIntegral { row: usize, column: usize, value: f64 },

    #[error("categorical variable '{group}': please specify either both limits or neither")]
    CategoricalBounds { group: String },

    #[error("categorical variable '{group}': upper limit {upper} is below lower limit {lower}")]
    CategoricalRange { group: String, lower: i64, upper: i64 },

    #[error("categorical variable '{group}': cannot one-hot expand a field of width {width} to {target}")]
    CategoricalWidth {
        group: String,
        width: usize,
        target: usize,
    },

    #[error("categorical variable '{group}': value {value} is outside [{lower}, {lower} + {width})")]
    CategoricalValue {
        group: String,
        value: f64,
        lower: i64,
        width: usize,
    },

    #[error("variable group '{group}' mixes types {first} and {other}")]
    MixedGroupTypes {
        group: String,
        first: VariableType,
        other: VariableType,
    },

    #[error("no dtype registered for variable type {0}")]
    MissingDType(VariableType),

    #[error("unknown variable type '{0}'")]
    UnknownVariableType(String),

    #[error("field '{group}' has {actual} rows, record batch has {expected}")]
    BatchMismatch {
        group: String,
        expected: usize,
        actual: usize,
    },

    #[error("record has no field named '{0}'")]
    UnknownGroup(String),

    #[error("environment {environment}: sampled batch is empty")]
    EmptyBatch { environment: usize },

    #[error("environment {environment}: counterfactual is missing conditioning_values")]
    MissingFactualData { environment: usize },

    #[error("environment {environment}: intervened variable '{group}' differs from the first row at row {row}")]
    NonConstantIntervention {
        environment: usize,
        group: String,
        row: usize,
    },

    #[error("environment {environment}: intervention reference_data is missing")]
    MissingReference { environment: usize },

    #[error("column index {0} has no corresponding variable")]
    UnknownColumn(usize),

    #[error("column index {0} is listed more than once in columns_to_nodes")]
    DuplicateColumn(usize),

    #[error("columns_to_nodes has {columns} entries, catalog has {groups} groups and {descriptors} variables")]
    ColumnMapLength {
        columns: usize,
        groups: usize,
        descriptors: usize,
    },

    #[error("unsupported artifact '{0}'")]
    UnsupportedArtifact(String),

    #[error("artifact {artifact} was expected to be {expected}")]
    ArtifactFormat {
        artifact: &'static str,
        expected: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        use DecodeError::*;
        match self {
            NotTwoDimensional { .. }
            | ColumnCountMismatch { .. }
            | RaggedRows { .. }
            | InvalidNumber { .. }
            | NonIntegral { .. }
            | CategoricalBounds { .. }
            | CategoricalRange { .. }
            | CategoricalWidth { .. }
            | CategoricalValue { .. }
            | MixedGroupTypes { .. }
            | MissingDType(_)
            | UnknownVariableType(_)
            | BatchMismatch { .. }
            | UnknownGroup(_)
            | EmptyBatch { .. }
            | MissingFactualData { .. }
            | ArtifactFormat { .. } => ErrorKind::Schema,
            NonConstantIntervention { .. } => ErrorKind::InvariantViolation,
            MissingReference { .. } => ErrorKind::MissingReference,
            UnknownColumn(_) | DuplicateColumn(_) | ColumnMapLength { .. } => {
                ErrorKind::IndexMapping
            }
            UnsupportedArtifact(_) => ErrorKind::UnsupportedArtifact,
            Io(_) | Csv(_) | Json(_) => ErrorKind::Io,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;
