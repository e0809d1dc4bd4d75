//! Retrieval of dataset artifacts and end-to-end loading.
//!
//! A dataset is a directory of files named after [`DataArtifact::file_name`].
//! [`ArtifactSource`] abstracts where they live; [`DatasetLoader`] fetches
//! them and runs them through a [`DatasetDecoder`](crate::DatasetDecoder).

mod artifact;
mod loader;
mod source;

pub use artifact::{DataArtifact, RawArtifact};
pub use loader::{DatasetLoader, LoadedArtifact};
pub use source::{read_table, ArtifactSource, DirectorySource, InMemorySource};
