//! Chess position evaluation backed by a trained move-prediction model.
//!
//! The pipeline has three pure stages wired together by [`Oracle`]:
//! a board encoder that turns a position into an `[18, 8, 8]` feature
//! tensor, a [`Predictor`] that maps the tensor to a 4096-slot move
//! distribution plus a scalar evaluation, and a move decoder that keeps
//! only the legal moves, renormalizes their mass, and ranks them.
//!
//! The raw model output ranges over every origin/destination pair whether
//! legal or not; the decoder is the correctness step that reconciles it
//! with the actual rules of chess (delegated to `shakmaty`). Results
//! include the ranked moves with probabilities summing to 1 and the
//! evaluation in `[-1, 1]` from the side to move's perspective.
//!
//! The library re-exports `shakmaty` to make position construction easy.

mod decoder;
mod encoder;
mod error;
mod moves;
mod oracle;
mod predictor;
mod types;

/// Evaluation service orchestrating encode → predict → decode.
pub use oracle::Oracle;

/// Error type produced by library operations.
pub use error::{EncodingError, ModelLoadError, OracleError};

/// Board encoding: position to feature tensor.
pub use encoder::{PLANES, encode};

/// Move decoding: raw distribution to ranked legal moves.
pub use decoder::decode;

/// Model interface and the ONNX-backed implementation.
pub use predictor::{INPUT_NAME, OnnxPredictor, POLICY_OUTPUT, Prediction, Predictor, VALUE_OUTPUT};

/// Move-slot arithmetic for the model's fixed output space.
pub use moves::MoveIndex;

/// Output data structures returned by evaluations.
pub use types::{EvaluationResult, ScoredMove};

/// Re-export of `shakmaty` for convenience when building positions.
pub use shakmaty;
