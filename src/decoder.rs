use ndarray::ArrayView1;
use shakmaty::{CastlingMode, Chess, Position};

use crate::{error::OracleError, moves::MoveIndex, types::ScoredMove};

/// Turn a raw 4096-slot move distribution into ranked legal moves.
///
/// The model's output ranges over every origin/destination pair regardless
/// of legality, so this is where the two meet: each legal move of
/// `position` looks up its [`MoveIndex`] slot, every other slot is
/// discarded no matter how much mass the model put on it, and the surviving
/// mass is renormalized to sum to 1. Confidence scores are therefore
/// comparable across positions with different legal-move counts.
///
/// Moves are ordered by probability descending; ties break by ascending
/// `MoveIndex`, so the ranking is deterministic for a given input.
///
/// Fails with [`OracleError::NoLegalMoves`] when the position is checkmate
/// or stalemate, and with [`OracleError::ShapeMismatch`] when the
/// distribution is not 4096 wide.
pub fn decode(
    position: &Chess,
    distribution: ArrayView1<'_, f32>,
) -> Result<Vec<ScoredMove>, OracleError> {
    if distribution.len() != MoveIndex::COUNT {
        return Err(OracleError::ShapeMismatch {
            expected: vec![MoveIndex::COUNT],
            actual: vec![distribution.len()],
        });
    }

    let legal_moves = position.legal_moves();
    if legal_moves.is_empty() {
        return Err(OracleError::NoLegalMoves);
    }

    let mut scored: Vec<(MoveIndex, ScoredMove)> = legal_moves
        .iter()
        .map(|m| {
            let index = MoveIndex::from_move(m);
            // Clamp negative or NaN slots to zero mass.
            let mass = distribution[index.as_usize()].max(0.0);
            let uci = m.to_uci(CastlingMode::Standard);
            (
                index,
                ScoredMove {
                    uci,
                    probability: mass,
                },
            )
        })
        .collect();

    // Slots are clamped to non-negative above, so any mass at all on a
    // legal move makes the total strictly positive.
    let total: f32 = scored.iter().map(|(_, m)| m.probability).sum();
    if total > 0.0 {
        for (_, m) in &mut scored {
            m.probability /= total;
        }
    } else {
        // The model put no mass on any legal move; fall back to a uniform
        // distribution rather than dividing by zero.
        let uniform = 1.0 / scored.len() as f32;
        for (_, m) in &mut scored {
            m.probability = uniform;
        }
    }

    scored.sort_by(|a, b| {
        b.1.probability
            .total_cmp(&a.1.probability)
            .then_with(|| a.0.cmp(&b.0))
    });

    Ok(scored.into_iter().map(|(_, m)| m).collect())
}
