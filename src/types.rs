use shakmaty::uci::UciMove;

/// A legal move paired with the model's confidence after legality
/// filtering and renormalization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScoredMove {
    pub uci: UciMove,
    /// Probability in `[0, 1]`, renormalized over the legal moves of the
    /// evaluated position.
    pub probability: f32,
}

/// The complete answer for one evaluated position.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvaluationResult {
    /// Scalar evaluation in `[-1, 1]` from the side to move's perspective.
    pub evaluation: f32,
    /// Legal moves ranked most confident first.
    pub moves: Vec<ScoredMove>,
}

impl EvaluationResult {
    /// The model's top-ranked move.
    pub fn best_move(&self) -> Option<&ScoredMove> {
        self.moves.first()
    }
}
