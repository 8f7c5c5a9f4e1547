//! Error types for the chess-oracle evaluation library.
//!
//! All fallible operations return [`OracleError`], built with `thiserror`.
//! The variants wrap underlying errors from chess parsing, tensor handling,
//! and ONNX Runtime, so callers have a single error type to match on.

use shakmaty::{Chess, Color, PositionError, Square, fen::ParseFenError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    /// The provided FEN string could not be parsed.
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] ParseFenError),

    /// A parsed position is illegal from the perspective of `shakmaty`.
    #[error("invalid chess position: {0}")]
    InvalidPosition(#[from] PositionError<Chess>),

    /// The position failed the encoder's structural checks.
    #[error("malformed position: {0}")]
    Encoding(#[from] EncodingError),

    /// A tensor did not have the dimensions the encoder/predictor contract
    /// requires. Reaching this at runtime indicates a programming defect or
    /// a model artifact that does not match the documented shape.
    #[error("tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The model artifact could not be loaded. Fatal at startup.
    #[error("failed to load model artifact: {0}")]
    ModelLoad(#[from] ModelLoadError),

    /// ONNX Runtime failed while running inference.
    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),

    /// The side to move has no legal moves (checkmate or stalemate). An
    /// expected terminal condition, not a crash.
    #[error("no legal moves: the position is checkmate or stalemate")]
    NoLegalMoves,
}

/// Best-effort structural problems detected before encoding a position.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    #[error("{0:?} has no king")]
    MissingKing(Color),

    #[error("{0:?} has more than one king")]
    TooManyKings(Color),

    #[error("{color:?} has {count} pieces, at most 16 are possible")]
    TooManyPieces { color: Color, count: usize },

    #[error("{color:?} has {count} pawns, at most 8 are possible")]
    TooManyPawns { color: Color, count: usize },

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("impossible castling rights at {0}")]
    ImpossibleCastling(Square),

    #[error("impossible en passant square {0}")]
    BadEnPassant(Square),
}

/// Failures while obtaining or opening a model artifact.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("onnx runtime: {0}")]
    Ort(#[from] ort::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("download: {0}")]
    Download(#[from] reqwest::Error),

    /// The artifact loaded but does not expose a required model output.
    #[error("model artifact is missing output {0:?}")]
    MissingOutput(String),
}
