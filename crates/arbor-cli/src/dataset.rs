//! Dataset loading.

use std::{fs, path::Path};

use log::{debug, info};

use arbor::{ArborError, dataset::Dataset};

/// Reads and deserializes the TOML dataset at `path`.
///
/// # Errors
///
/// Returns [`ArborError::Io`] if the file cannot be read and
/// [`ArborError::Dataset`] if it is not a valid dataset document.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, ArborError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading dataset");

    let content = fs::read_to_string(path)?;
    let dataset: Dataset = toml::from_str(&content).map_err(|err| ArborError::Dataset {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    debug!(
        title = dataset.title.as_str(),
        layers = dataset.layers.len(),
        forests = dataset.forests.len(),
        entities = dataset.entities.len(),
        relations = dataset.relations.len();
        "Dataset loaded"
    );
    Ok(dataset)
}
