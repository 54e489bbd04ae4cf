use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Name of the options file persisted inside a model directory.
pub const TRAIN_OPTIONS_FILENAME: &str = "train_options.json";

/// Training configuration persisted next to a model's checkpoints.
///
/// Written once when training starts and read back verbatim at load time,
/// so that inference runs with the exact model class and hyperparameters
/// the checkpoints were produced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOptions {
    /// Registered name of the model class to instantiate.
    pub model_class: String,

    /// Hyperparameters recorded at training time.
    #[serde(default)]
    pub hparams: Map<String, Value>,

    pub source_vocab_path: PathBuf,
    pub target_vocab_path: PathBuf,
}

impl TrainOptions {
    /// Reads `train_options.json` from `model_dir`.
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let path = model_dir.as_ref().join(TRAIN_OPTIONS_FILENAME);
        let contents = fs::read_to_string(&path).map_err(|err| Error::io(&path, err))?;
        serde_json::from_str(&contents)
            .map_err(|source| Error::InvalidTrainOptions { path, source })
    }

    /// Writes `train_options.json` into `model_dir`.
    pub fn dump(&self, model_dir: impl AsRef<Path>) -> Result<(), Error> {
        let path = model_dir.as_ref().join(TRAIN_OPTIONS_FILENAME);
        let contents = serde_json::to_string_pretty(self)
            .map_err(|source| Error::InvalidTrainOptions {
                path: path.clone(),
                source,
            })?;
        fs::write(&path, contents).map_err(|err| Error::io(&path, err))
    }
}
