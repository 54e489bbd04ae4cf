use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use super::mode::ModelMode;
use super::options::TrainOptions;
use super::vocab::VocabInfo;
use crate::error::Error;

/// Everything a factory needs to instantiate a model: the phase, the fully
/// merged hyperparameters, and the resolved vocabulary metadata for both
/// sides.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub mode: ModelMode,
    pub hparams: Map<String, Value>,
    pub source_vocab: VocabInfo,
    pub target_vocab: VocabInfo,
}

type ModelFactory<M> = Box<dyn Fn(&ModelSpec) -> Result<M, Error> + Send + Sync>;

struct ModelEntry<M> {
    defaults: Map<String, Value>,
    factory: ModelFactory<M>,
}

/// An explicit registry of model classes.
///
/// Persisted configurations name their model class as a string; the
/// registry maps those names to factory closures plus per-class default
/// hyperparameters. Resolution of an unregistered name is a fatal
/// [`Error::ModelResolutionFailure`] - there is no reflective fallback.
pub struct ModelRegistry<M> {
    entries: HashMap<String, ModelEntry<M>>,
}

impl<M> ModelRegistry<M> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a model class under `name` with its default
    /// hyperparameters. A later registration under the same name replaces
    /// the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, defaults: Map<String, Value>, factory: F)
    where
        F: Fn(&ModelSpec) -> Result<M, Error> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.into(),
            ModelEntry {
                defaults,
                factory: Box::new(factory),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Instantiates the class registered under `name` from an already
    /// merged spec.
    pub fn build(&self, name: &str, spec: &ModelSpec) -> Result<M, Error> {
        (self.entry(name)?.factory)(spec)
    }

    fn entry(&self, name: &str) -> Result<&ModelEntry<M>, Error> {
        self.entries.get(name).ok_or_else(|| Error::ModelResolutionFailure {
            name: name.to_string(),
        })
    }
}

impl<M> Default for ModelRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the persisted configuration of `model_dir` into a runnable
/// model instance.
///
/// Hyperparameters merge in precedence order: the class defaults recorded
/// at registration, overwritten by the hparams persisted in the model
/// directory, overwritten by `overrides`. Both vocabulary files named by
/// the options are resolved before the factory runs.
pub fn load_model<M>(
    registry: &ModelRegistry<M>,
    model_dir: impl AsRef<Path>,
    mode: ModelMode,
    overrides: Option<&Map<String, Value>>,
) -> Result<M, Error> {
    let options = TrainOptions::load(model_dir)?;
    let entry = registry.entry(&options.model_class)?;

    let mut hparams = entry.defaults.clone();
    merge_params(&mut hparams, &options.hparams);
    if let Some(overrides) = overrides {
        merge_params(&mut hparams, overrides);
    }

    let spec = ModelSpec {
        mode,
        hparams,
        source_vocab: VocabInfo::from_file(&options.source_vocab_path)?,
        target_vocab: VocabInfo::from_file(&options.target_vocab_path)?,
    };

    tracing::debug!(
        model_class = %options.model_class,
        mode = %mode,
        "resolved model configuration"
    );
    (entry.factory)(&spec)
}

/// Shallow key-wise overwrite of `base` with `layer`.
fn merge_params(base: &mut Map<String, Value>, layer: &Map<String, Value>) {
    for (key, value) in layer {
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    /// A stand-in "model" that just records what it was built from.
    #[derive(Debug)]
    struct Probe {
        mode: ModelMode,
        hparams: Map<String, Value>,
        source_vocab_size: usize,
    }

    fn probe_registry(defaults: Map<String, Value>) -> ModelRegistry<Probe> {
        let mut registry = ModelRegistry::new();
        registry.register("AttentionSeq2Seq", defaults, |spec: &ModelSpec| {
            Ok(Probe {
                mode: spec.mode,
                hparams: spec.hparams.clone(),
                source_vocab_size: spec.source_vocab.vocab_size,
            })
        });
        registry
    }

    fn model_dir(hparams: Map<String, Value>) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let source_vocab = dir.path().join("vocab.src");
        let target_vocab = dir.path().join("vocab.tgt");
        fs::write(&source_vocab, "the\ncat\n").unwrap();
        fs::write(&target_vocab, "le\nchat\n").unwrap();

        TrainOptions {
            model_class: "AttentionSeq2Seq".to_string(),
            hparams,
            source_vocab_path: source_vocab,
            target_vocab_path: target_vocab,
        }
        .dump(dir.path())
        .unwrap();
        dir
    }

    fn map(pairs: Vec<(&str, Value)>) -> Map<String, Value> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn unknown_class_fails_resolution() {
        let registry = probe_registry(Map::new());
        let dir = tempdir().unwrap();
        let source_vocab = dir.path().join("vocab.src");
        fs::write(&source_vocab, "a\n").unwrap();
        TrainOptions {
            model_class: "TransformerXXL".to_string(),
            hparams: Map::new(),
            source_vocab_path: source_vocab.clone(),
            target_vocab_path: source_vocab,
        }
        .dump(dir.path())
        .unwrap();

        let err = load_model(&registry, dir.path(), ModelMode::Infer, None).unwrap_err();
        match err {
            Error::ModelResolutionFailure { name } => assert_eq!(name, "TransformerXXL"),
            other => panic!("expected ModelResolutionFailure, got {other:?}"),
        }
    }

    #[test]
    fn hparams_merge_in_precedence_order() {
        let registry = probe_registry(map(vec![
            ("embedding.dim", json!(128)),
            ("dropout", json!(0.2)),
            ("beam.width", json!(1)),
        ]));
        let dir = model_dir(map(vec![
            ("embedding.dim", json!(512)),
            ("dropout", json!(0.1)),
        ]));

        let overrides = map(vec![("dropout", json!(0.0))]);
        let probe =
            load_model(&registry, dir.path(), ModelMode::Infer, Some(&overrides)).unwrap();

        // defaults < persisted options < caller overrides
        assert_eq!(probe.hparams["embedding.dim"], json!(512));
        assert_eq!(probe.hparams["dropout"], json!(0.0));
        assert_eq!(probe.hparams["beam.width"], json!(1));
    }

    #[test]
    fn factory_receives_mode_and_vocab_metadata() {
        let registry = probe_registry(Map::new());
        let dir = model_dir(Map::new());

        let probe = load_model(&registry, dir.path(), ModelMode::Eval, None).unwrap();
        assert_eq!(probe.mode, ModelMode::Eval);
        // Two file entries plus three special tokens
        assert_eq!(probe.source_vocab_size, 5);
    }

    #[test]
    fn build_uses_the_registered_factory() {
        let registry = probe_registry(Map::new());
        assert!(registry.contains("AttentionSeq2Seq"));
        assert!(!registry.contains("BasicSeq2Seq"));

        let err = registry
            .build("BasicSeq2Seq", &dummy_spec())
            .unwrap_err();
        assert!(matches!(err, Error::ModelResolutionFailure { .. }));
    }

    fn dummy_spec() -> ModelSpec {
        ModelSpec {
            mode: ModelMode::Infer,
            hparams: Map::new(),
            source_vocab: VocabInfo {
                path: "/tmp/vocab.src".into(),
                vocab_size: 3,
                special_tokens: Default::default(),
            },
            target_vocab: VocabInfo {
                path: "/tmp/vocab.tgt".into(),
                vocab_size: 3,
                special_tokens: Default::default(),
            },
        }
    }
}
