//! # Unknown-Token Resolution
//!
//! A module for repairing unknown-token placeholders in predicted sequences.
//!
//! ## Overview
//!
//! Sequence models with a closed output vocabulary emit a sentinel token
//! when the true target word cannot be represented. Given the attention
//! scores of the prediction, each sentinel can be redirected to the source
//! token the model attended to most strongly at that position, optionally
//! remapped through a user-supplied lexicon.
//!
//! ## Key Components
//!
//! * [`AttentionScores`] - A rectangular `[target, source]` score matrix
//! * [`resolve_unknown_tokens`] - The pure, deterministic resolver
//! * [`TokenMapping`] - An immutable source-to-replacement lexicon
//!
//! Resolution is wholly synchronous and keeps no state between calls, so it
//! can run per record across a streamed prediction sequence.

mod align;
mod mapping;

pub use align::{AttentionScores, UNK_TOKEN, resolve_unknown_tokens};
pub use mapping::TokenMapping;
