//! # Model Loading
//!
//! A module for resolving a persisted training configuration into a
//! runnable model instance.
//!
//! ## Key Components
//!
//! * [`TrainOptions`] - Training configuration persisted next to the
//!   checkpoints of a model directory
//! * [`ModelRegistry`] - An explicit registry mapping configuration-declared
//!   class names to factories; unknown names fail resolution instead of
//!   falling back to any reflective lookup
//! * [`ModelMode`] - The closed set of phases a model can be built for
//! * [`VocabInfo`] - Metadata about a vocabulary file, resolved for both
//!   sides of the model
//!
//! ## Hyperparameter precedence
//!
//! [`load_model`] merges hyperparameters the way the persisted
//! configuration expects: class defaults first, overwritten by the options
//! stored in the model directory, overwritten by caller overrides.

mod mode;
mod options;
mod registry;
mod vocab;

pub use mode::ModelMode;
pub use options::{TRAIN_OPTIONS_FILENAME, TrainOptions};
pub use registry::{ModelRegistry, ModelSpec, load_model};
pub use vocab::{SpecialTokens, VocabInfo};
