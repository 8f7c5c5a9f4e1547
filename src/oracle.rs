use shakmaty::{CastlingMode, Chess, EnPassantMode, Position, fen::Fen};

use crate::{
    decoder::decode,
    encoder::encode,
    error::OracleError,
    predictor::{OnnxPredictor, Predictor},
    types::EvaluationResult,
};

/// Position evaluation service: encode, predict, decode.
///
/// The predictor is injected at construction and owned for the service's
/// lifetime; the model artifact behind it is loaded exactly once and read
/// thereafter. Each [`evaluate`](Oracle::evaluate) call is independent
/// request/response work with no state carried between calls, and any
/// component failure propagates to the caller unchanged.
pub struct Oracle {
    predictor: Box<dyn Predictor>,
}

impl Oracle {
    pub fn new(predictor: Box<dyn Predictor>) -> Self {
        Self { predictor }
    }

    /// Build a service around an ONNX artifact on disk.
    pub fn from_onnx_file(path: &str) -> Result<Self, OracleError> {
        Ok(Self::new(Box::new(OnnxPredictor::from_file(path)?)))
    }

    /// Build a service around an ONNX artifact fetched from a URL.
    pub fn from_onnx_url(url: &str) -> Result<Self, OracleError> {
        Ok(Self::new(Box::new(OnnxPredictor::from_url(url)?)))
    }

    /// Evaluate a position given as a FEN string.
    ///
    /// Structural problems with the position surface as
    /// [`OracleError::Encoding`] before `shakmaty`'s own full legality
    /// check runs.
    pub fn evaluate_fen(&mut self, fen: &str) -> Result<EvaluationResult, OracleError> {
        let fen: Fen = fen.parse()?;
        let setup = fen.into_setup();
        let board = encode(&setup)?;
        let position: Chess = setup.position(CastlingMode::Standard)?;
        self.finish(&position, board)
    }

    /// Evaluate an already-validated position.
    pub fn evaluate(&mut self, position: &Chess) -> Result<EvaluationResult, OracleError> {
        let setup = position.clone().to_setup(EnPassantMode::Always);
        let board = encode(&setup)?;
        self.finish(position, board)
    }

    fn finish(
        &mut self,
        position: &Chess,
        board: ndarray::Array3<f32>,
    ) -> Result<EvaluationResult, OracleError> {
        let prediction = self.predictor.predict(board.view())?;
        let moves = decode(position, prediction.policy.view())?;
        log::debug!(
            "evaluated position: {} legal moves, value {:.3}",
            moves.len(),
            prediction.value
        );
        Ok(EvaluationResult {
            evaluation: prediction.value,
            moves,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::EncodingError,
        moves::MoveIndex,
        predictor::{Prediction, ensure_board_shape},
    };
    use ndarray::{Array1, ArrayView3};
    use shakmaty::Square;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Returns a fixed distribution and value, like a loaded model would.
    struct StubPredictor {
        policy: Array1<f32>,
        value: f32,
    }

    impl StubPredictor {
        fn uniform(value: f32) -> Self {
            Self {
                policy: Array1::from_elem(MoveIndex::COUNT, 1.0 / MoveIndex::COUNT as f32),
                value,
            }
        }
    }

    impl Predictor for StubPredictor {
        fn predict(&mut self, board: ArrayView3<'_, f32>) -> Result<Prediction, OracleError> {
            ensure_board_shape(board.shape())?;
            Ok(Prediction {
                policy: self.policy.clone(),
                value: self.value,
            })
        }
    }

    #[test]
    fn start_position_end_to_end() {
        let mut oracle = Oracle::new(Box::new(StubPredictor::uniform(0.1)));
        let result = oracle.evaluate_fen(START_FEN).unwrap();

        assert_eq!(result.moves.len(), 20);
        let sum: f32 = result.moves.iter().map(|m| m.probability).sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert_eq!(result.evaluation, 0.1);
        assert!(result.best_move().is_some());
    }

    #[test]
    fn peaked_policy_ranks_its_move_first() {
        let mut policy = Array1::zeros(MoveIndex::COUNT);
        policy[MoveIndex::new(Square::G1, Square::F3).as_usize()] = 1.0;
        let mut oracle = Oracle::new(Box::new(StubPredictor { policy, value: 0.0 }));

        let result = oracle.evaluate_fen(START_FEN).unwrap();
        assert_eq!(result.best_move().unwrap().uci, "g1f3".parse().unwrap());
        assert!((result.best_move().unwrap().probability - 1.0).abs() < 1e-4);
    }

    #[test]
    fn checkmate_surfaces_no_legal_moves() {
        let mut oracle = Oracle::new(Box::new(StubPredictor::uniform(0.0)));
        let err = oracle
            .evaluate_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap_err();
        assert!(matches!(err, OracleError::NoLegalMoves));
    }

    #[test]
    fn structural_problems_surface_as_encoding_errors() {
        let mut oracle = Oracle::new(Box::new(StubPredictor::uniform(0.0)));
        let err = oracle
            .evaluate_fen("rnbqkbnr/pppppppp/8/8/4K3/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::Encoding(EncodingError::TooManyKings(_))
        ));
    }

    #[test]
    fn garbage_fen_is_rejected() {
        let mut oracle = Oracle::new(Box::new(StubPredictor::uniform(0.0)));
        let err = oracle.evaluate_fen("not a fen").unwrap_err();
        assert!(matches!(err, OracleError::InvalidFen(_)));
    }

    #[test]
    fn evaluate_accepts_a_chess_position() {
        let mut oracle = Oracle::new(Box::new(StubPredictor::uniform(-0.5)));
        let result = oracle.evaluate(&Chess::default()).unwrap();
        assert_eq!(result.moves.len(), 20);
        assert_eq!(result.evaluation, -0.5);
    }
}
