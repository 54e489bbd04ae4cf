use std::collections::HashMap;

use async_trait::async_trait;
use rand::{Rng, thread_rng};
use tokio::sync::mpsc;

use decant::{AttentionScores, Batch, Error, ExecutionSource, UNK_TOKEN, WorkerHandle};

/// Per-example value carried by the toy pipeline's batch fields.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Tokens(Vec<String>),
    Scores(AttentionScores),
}

impl FieldValue {
    pub fn into_tokens(self) -> Option<Vec<String>> {
        match self {
            FieldValue::Tokens(tokens) => Some(tokens),
            FieldValue::Scores(_) => None,
        }
    }

    pub fn into_scores(self) -> Option<AttentionScores> {
        match self {
            FieldValue::Tokens(_) => None,
            FieldValue::Scores(scores) => Some(scores),
        }
    }
}

/// How many batches the feeder may run ahead of the poll loop.
const FEED_DEPTH: usize = 4;

/// A toy translation pipeline standing in for a real forward-pass executor.
///
/// A background feeder chunks the input sentences into batches, "translates"
/// each one with a tiny word lexicon, and queues the batches for polling.
/// Words outside the lexicon come out as the unknown-token sentinel with
/// near-diagonal attention, which gives the resolver something to repair.
pub struct ToyTranslationSource {
    sentences: Option<Vec<String>>,
    batch_size: usize,
    batches: Option<mpsc::Receiver<Batch<FieldValue>>>,
}

impl ToyTranslationSource {
    pub fn new(sentences: Vec<String>, batch_size: usize) -> Self {
        Self {
            sentences: Some(sentences),
            batch_size,
            batches: None,
        }
    }
}

#[async_trait]
impl ExecutionSource for ToyTranslationSource {
    type Value = FieldValue;

    fn start_feeding(&mut self) -> Option<WorkerHandle> {
        let sentences = self.sentences.take().unwrap_or_default();
        let batch_size = self.batch_size.max(1);
        let (tx, rx) = mpsc::channel(FEED_DEPTH);
        self.batches = Some(rx);

        Some(WorkerHandle::new(move |running, _notifier| {
            tokio::spawn(async move {
                for chunk in sentences.chunks(batch_size) {
                    if !running.load(std::sync::atomic::Ordering::SeqCst) {
                        break;
                    }
                    let batch = translate_batch(chunk);
                    if tx.send(batch).await.is_err() {
                        // Poll side gone
                        break;
                    }
                }
                tracing::debug!("feeder drained all input sentences");
            })
        }))
    }

    async fn poll_batch(&mut self) -> Result<Option<Batch<FieldValue>>, Error> {
        match self.batches.as_mut() {
            Some(batches) => Ok(batches.recv().await),
            // Feeding never started; nothing will ever arrive
            None => Ok(None),
        }
    }
}

fn translate_batch(sentences: &[String]) -> Batch<FieldValue> {
    let mut source_column = Vec::with_capacity(sentences.len());
    let mut predicted_column = Vec::with_capacity(sentences.len());
    let mut scores_column = Vec::with_capacity(sentences.len());

    for sentence in sentences {
        let source: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        let (predicted, scores) = translate(&source);

        source_column.push(FieldValue::Tokens(source));
        predicted_column.push(FieldValue::Tokens(predicted));
        scores_column.push(FieldValue::Scores(scores));
    }

    Batch::from_fields([
        ("source_tokens".to_string(), source_column),
        ("predicted_tokens".to_string(), predicted_column),
        ("attention_scores".to_string(), scores_column),
    ])
    .expect("columns are built in lockstep")
}

/// Word-by-word "translation" with near-diagonal attention.
fn translate(source: &[String]) -> (Vec<String>, AttentionScores) {
    let lexicon = lexicon();
    let mut rng = thread_rng();

    let mut predicted = Vec::with_capacity(source.len());
    let mut rows = Vec::with_capacity(source.len());

    for (position, word) in source.iter().enumerate() {
        let translated = lexicon
            .get(word.to_lowercase().as_str())
            .map(|w| w.to_string())
            .unwrap_or_else(|| UNK_TOKEN.to_string());
        predicted.push(translated);

        let mut row = vec![0.0f32; source.len()];
        for (j, score) in row.iter_mut().enumerate() {
            *score = rng.gen_range(0.0..0.05);
            if j == position {
                *score += 0.9;
            }
        }
        rows.push(row);
    }

    let scores = AttentionScores::from_rows(rows).expect("rows share the source length");
    (predicted, scores)
}

fn lexicon() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("the", "le"),
        ("cat", "chat"),
        ("dog", "chien"),
        ("sat", "assis"),
        ("on", "sur"),
        ("a", "un"),
        ("mat", "tapis"),
        ("is", "est"),
        ("great", "formidable"),
        ("in", "en"),
    ])
}
