use super::mapping::TokenMapping;
use crate::error::Error;

/// The placeholder emitted when a model's vocabulary cannot represent the
/// true target word.
///
/// The sentinel is assumed reserved: a genuine output token spelled the
/// same way is indistinguishable from a placeholder and will be rewritten.
pub const UNK_TOKEN: &str = "UNK";

/// Attention weights of one prediction, shape `[target_len, source_len]`.
///
/// Row `t` holds the alignment weights from predicted position `t` to every
/// source position. Stored row-major; rows are validated to be rectangular
/// at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AttentionScores {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl AttentionScores {
    /// Builds a score matrix from per-position rows.
    ///
    /// Fails with [`Error::RaggedAttentionRow`] when rows disagree on
    /// length. An empty row set is the degenerate `[0, 0]` matrix.
    pub fn from_rows<R>(rows: Vec<R>) -> Result<Self, Error>
    where
        R: Into<Vec<f32>>,
    {
        let mut data = Vec::new();
        let mut cols = None;
        let mut count = 0;

        for (index, row) in rows.into_iter().enumerate() {
            let row = row.into();
            let expected = *cols.get_or_insert(row.len());
            if row.len() != expected {
                return Err(Error::RaggedAttentionRow {
                    row: index,
                    expected,
                    actual: row.len(),
                });
            }
            data.extend(row);
            count = index + 1;
        }

        Ok(Self {
            rows: count,
            cols: cols.unwrap_or(0),
            data,
        })
    }

    /// `(target_len, source_len)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The score row of predicted position `t`.
    pub fn row(&self, t: usize) -> &[f32] {
        let start = t * self.cols;
        &self.data[start..start + self.cols]
    }
}

/// Replaces every [`UNK_TOKEN`] in `predicted_tokens` with the source token
/// carrying the highest attention score at that position, remapped through
/// `mapping` when the chosen token has an entry there.
///
/// Ties on the maximum score resolve to the lowest source index, which
/// keeps the output reproducible; rows without a finite maximum resolve to
/// index zero under the same rule. Non-sentinel tokens pass through
/// unchanged.
///
/// Fails with [`Error::AlignmentShapeMismatch`] when the matrix shape does
/// not match the token sequence lengths, or when the source sequence is
/// empty.
pub fn resolve_unknown_tokens<S, P>(
    source_tokens: &[S],
    predicted_tokens: &[P],
    attention_scores: &AttentionScores,
    mapping: Option<&TokenMapping>,
) -> Result<Vec<String>, Error>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    let (rows, cols) = attention_scores.shape();
    if rows != predicted_tokens.len() || cols != source_tokens.len() || source_tokens.is_empty() {
        return Err(Error::AlignmentShapeMismatch {
            rows,
            cols,
            targets: predicted_tokens.len(),
            sources: source_tokens.len(),
        });
    }

    let mut resolved = Vec::with_capacity(predicted_tokens.len());
    for (t, token) in predicted_tokens.iter().enumerate() {
        let token = token.as_ref();
        if token != UNK_TOKEN {
            resolved.push(token.to_string());
            continue;
        }

        let chosen = source_tokens[argmax(attention_scores.row(t))].as_ref();
        let replacement = mapping
            .and_then(|m| m.get(chosen))
            .unwrap_or(chosen);
        resolved.push(replacement.to_string());
    }
    Ok(resolved)
}

/// Index of the first maximum in `row`.
///
/// The strictly-greater scan keeps the earliest maximum and stays total for
/// non-finite input: NaN never compares greater, so index zero survives an
/// all-NaN row.
fn argmax(row: &[f32]) -> usize {
    let mut best = 0;
    for (index, &score) in row.iter().enumerate().skip(1) {
        if score > row[best] {
            best = index;
        }
    }
    best
}
