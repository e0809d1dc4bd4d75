//! Loading and decoding whole datasets.

use ndarray::Array2;
use tracing::debug;

use crate::config::DecodeConfig;
use crate::decode::DatasetDecoder;
use crate::error::{DecodeError, Result};
use crate::experiment::{CounterfactualWithEffects, ExperimentDescriptor, InterventionWithEffects};
use crate::record::StructuredRecord;
use crate::variables::VariablesMetadata;

use super::{ArtifactSource, DataArtifact};

/// A decoded artifact.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadedArtifact {
    Variables(VariablesMetadata),
    Table(StructuredRecord),
    Interventions(Vec<InterventionWithEffects>),
    Counterfactuals(Vec<CounterfactualWithEffects>),
    Adjacency(Array2<i64>),
}

/// Decodes the artifacts of one dataset.
///
/// The variables metadata is read once, when the loader is opened, and the
/// decoder built from it is reused for every artifact.
///
/// # Example
///
/// ```no_run
/// use causal_datasets::io::{DatasetLoader, DirectorySource};
/// use causal_datasets::DecodeConfig;
///
/// let loader = DatasetLoader::open(
///     DirectorySource::new("/data/causal"),
///     "csuite_linexp",
///     DecodeConfig::default(),
/// )?;
/// let train = loader.load_table(causal_datasets::io::DataArtifact::Train)?;
/// let interventions = loader.load_interventions()?;
/// # Ok::<(), causal_datasets::DecodeError>(())
/// ```
#[derive(Debug)]
pub struct DatasetLoader<S> {
    source: S,
    root: String,
    variables: VariablesMetadata,
    decoder: DatasetDecoder,
}

impl<S: ArtifactSource> DatasetLoader<S> {
    /// Open the dataset at `root`, reading its `variables.json` from `source`.
    pub fn open(source: S, root: impl Into<String>, config: DecodeConfig) -> Result<Self> {
        let root = root.into();
        let raw = source.fetch(&root, DataArtifact::VariablesJson)?;
        let variables = VariablesMetadata::from_value(raw.into_json(DataArtifact::VariablesJson)?)?;
        debug!(root = %root, n_variables = variables.variables.len(), "loaded variables metadata");
        Self::with_variables(source, root, variables, config)
    }

    /// Open the dataset at `root` with metadata supplied by the caller.
    pub fn with_variables(
        source: S,
        root: impl Into<String>,
        variables: VariablesMetadata,
        config: DecodeConfig,
    ) -> Result<Self> {
        let decoder = DatasetDecoder::from_metadata(&variables, config)?;
        for group in decoder.catalog().mixed_type_groups() {
            debug!(
                group = group.name(),
                variable_type = %group.variable_type(),
                "variable group mixes types"
            );
        }
        Ok(Self {
            source,
            root: root.into(),
            variables,
            decoder,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn variables(&self) -> &VariablesMetadata {
        &self.variables
    }

    pub fn decoder(&self) -> &DatasetDecoder {
        &self.decoder
    }

    /// Load and decode any artifact.
    pub fn load(&self, artifact: DataArtifact) -> Result<LoadedArtifact> {
        match artifact {
            DataArtifact::Train | DataArtifact::Test => self.load_table(artifact).map(LoadedArtifact::Table),
            DataArtifact::Interventions => self.load_interventions().map(LoadedArtifact::Interventions),
            DataArtifact::Counterfactuals => {
                self.load_counterfactuals().map(LoadedArtifact::Counterfactuals)
            }
            DataArtifact::TrueAdjacency => self.load_true_adjacency().map(LoadedArtifact::Adjacency),
            DataArtifact::VariablesJson => Ok(LoadedArtifact::Variables(self.variables.clone())),
        }
    }

    /// Decode the train or test table.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnsupportedArtifact`] for any other artifact.
    pub fn load_table(&self, artifact: DataArtifact) -> Result<StructuredRecord> {
        if !matches!(artifact, DataArtifact::Train | DataArtifact::Test) {
            return Err(DecodeError::UnsupportedArtifact(artifact.to_string()));
        }
        let table = self.fetch(artifact)?.into_table(artifact)?;
        self.decoder.decode_table(table.view())
    }

    pub fn load_interventions(&self) -> Result<Vec<InterventionWithEffects>> {
        let descriptor = self.experiment(DataArtifact::Interventions)?;
        let out = self.decoder.decode_interventions(&descriptor)?;
        debug!(root = %self.root, n_environments = out.len(), "decoded interventions");
        Ok(out)
    }

    pub fn load_counterfactuals(&self) -> Result<Vec<CounterfactualWithEffects>> {
        let descriptor = self.experiment(DataArtifact::Counterfactuals)?;
        let out = self.decoder.decode_counterfactuals(&descriptor)?;
        debug!(
            root = %self.root,
            n_environments = out.len(),
            n_with_reference = out.iter().filter(|cf| cf.reference.is_some()).count(),
            "decoded counterfactuals"
        );
        Ok(out)
    }

    /// Ground-truth adjacency matrix of the causal graph.
    ///
    /// # Errors
    ///
    /// [`DecodeError::NonIntegral`] if an entry is not a whole number.
    pub fn load_true_adjacency(&self) -> Result<Array2<i64>> {
        let table = self
            .fetch(DataArtifact::TrueAdjacency)?
            .into_table(DataArtifact::TrueAdjacency)?;
        to_integer_matrix(&table)
    }

    fn experiment(&self, artifact: DataArtifact) -> Result<ExperimentDescriptor> {
        let value = self.fetch(artifact)?.into_json(artifact)?;
        Ok(ExperimentDescriptor::from_value(value)?)
    }

    fn fetch(&self, artifact: DataArtifact) -> Result<super::RawArtifact> {
        debug!(root = %self.root, %artifact, "fetching artifact");
        self.source.fetch(&self.root, artifact)
    }
}

fn to_integer_matrix(table: &Array2<f64>) -> Result<Array2<i64>> {
    if let Some(((row, column), &value)) = table
        .indexed_iter()
        .find(|(_, v)| !v.is_finite() || v.fract() != 0.0)
    {
        return Err(DecodeError::NonIntegral { row, column, value });
    }
    Ok(table.mapv(|v| v as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::io::{InMemorySource, RawArtifact};
    use crate::record::Field;
    use ndarray::array;
    use serde_json::json;

    const ROOT: &str = "toy";

    fn source() -> InMemorySource {
        InMemorySource::new()
            .with(
                ROOT,
                DataArtifact::VariablesJson,
                RawArtifact::Json(json!({"variables": [
                    {"group_name": "a", "type": "binary"},
                    {"group_name": "b", "type": "categorical", "lower": 1, "upper": 3}
                ]})),
            )
            .with(ROOT, DataArtifact::Train, RawArtifact::Table(array![[0.0, 3.0], [1.0, 1.0]]))
            .with(ROOT, DataArtifact::TrueAdjacency, RawArtifact::Table(array![[0.0, 1.0], [0.0, 0.0]]))
            .with(
                ROOT,
                DataArtifact::Interventions,
                RawArtifact::Json(json!({
                    "metadata": {"columns_to_nodes": [0, 1]},
                    "environments": [{
                        "intervention_idxs": [0],
                        "test_data": [[1.0, 2.0], [1.0, 3.0]],
                        "reference_data": [[0.0, 2.0]]
                    }]
                })),
            )
    }

    #[test]
    fn loads_tables_through_decoder() {
        let loader = DatasetLoader::open(source(), ROOT, DecodeConfig::default()).unwrap();
        assert_eq!(loader.variables().variables.len(), 2);

        let train = loader.load_table(DataArtifact::Train).unwrap();
        assert_eq!(train.get("b"), Some(&Field::Int32(array![[0, 0, 1], [1, 0, 0]])));
    }

    #[test]
    fn adjacency_is_integral() {
        let loader = DatasetLoader::open(source(), ROOT, DecodeConfig::default()).unwrap();
        assert_eq!(
            loader.load(DataArtifact::TrueAdjacency).unwrap(),
            LoadedArtifact::Adjacency(array![[0, 1], [0, 0]])
        );

        let bad = source().with(ROOT, DataArtifact::TrueAdjacency, RawArtifact::Table(array![[0.5]]));
        let loader = DatasetLoader::open(bad, ROOT, DecodeConfig::default()).unwrap();
        let err = loader.load_true_adjacency().unwrap_err();
        assert!(matches!(err, DecodeError::NonIntegral { row: 0, column: 0, .. }));
    }

    #[test]
    fn loads_interventions() {
        let loader = DatasetLoader::open(source(), ROOT, DecodeConfig::default()).unwrap();
        let out = loader.load_interventions().unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].effect_nodes.iter().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn missing_artifact_is_io_error() {
        let loader = DatasetLoader::open(source(), ROOT, DecodeConfig::default()).unwrap();
        let err = loader.load(DataArtifact::Counterfactuals).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn experiment_is_not_a_table() {
        let loader = DatasetLoader::open(source(), ROOT, DecodeConfig::default()).unwrap();
        let err = loader.load_table(DataArtifact::Interventions).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedArtifact);
    }

    #[test]
    fn supplied_variables_skip_fetch() {
        let metadata = VariablesMetadata::from_value(json!({"variables": [
            {"group_name": "a", "type": "continuous"},
            {"group_name": "b", "type": "continuous"}
        ]}))
        .unwrap();
        let source = InMemorySource::new().with(ROOT, DataArtifact::Test, RawArtifact::Table(array![[1.0, 2.0]]));
        let loader = DatasetLoader::with_variables(&source, ROOT, metadata, DecodeConfig::default()).unwrap();
        let test = loader.load_table(DataArtifact::Test).unwrap();
        assert_eq!(test.get("b"), Some(&Field::Float32(array![[2.0]])));
    }
}
