use ndarray::{Array3, Axis};
use shakmaty::{Bitboard, Color, Rank, Role, Setup, Square};

use crate::error::{EncodingError, OracleError};

/// Number of feature planes in an encoded board tensor.
///
/// - 0..5: white pawn, knight, bishop, rook, queen, king
/// - 6..11: the same for black
/// - 12: side to move (all ones when white moves)
/// - 13..16: castling rights K, Q, k, q
/// - 17: en passant target square, one-hot
pub const PLANES: usize = 18;

/// Encode a position into the `[18, 8, 8]` tensor the predictor consumes.
///
/// Pure function of the setup: identical positions always produce
/// bit-identical tensors. Structural problems (wrong piece counts,
/// impossible castling flags, a misplaced en passant square) fail with
/// [`EncodingError`]; full legality verification stays with `shakmaty`.
pub fn encode(setup: &Setup) -> Result<Array3<f32>, OracleError> {
    validate(setup)?;

    let mut tensor = Array3::<f32>::zeros((PLANES, 8, 8));

    // 1. Piece placement occupies channels 0..11, white in 0..5 and black
    // in 6..11. Rank 1 -> row 0, file a -> column 0.
    for sq in Square::ALL {
        if let Some(piece) = setup.board.piece_at(sq) {
            let color_offset = if piece.color.is_white() { 0 } else { 6 };
            let role_offset = match piece.role {
                Role::Pawn => 0,
                Role::Knight => 1,
                Role::Bishop => 2,
                Role::Rook => 3,
                Role::Queen => 4,
                Role::King => 5,
            };
            let channel = color_offset + role_offset;
            tensor[[channel, sq.rank() as usize, sq.file() as usize]] = 1.0;
        }
    }

    // 2. Side to move (channel 12): all ones when white is to move.
    tensor
        .index_axis_mut(Axis(0), 12)
        .fill(setup.turn.is_white() as u8 as f32);

    // 3. Castling rights (channels 13..16) keyed by the rook's corner.
    let corners = [Square::H1, Square::A1, Square::H8, Square::A8];
    for (i, &corner) in corners.iter().enumerate() {
        tensor
            .index_axis_mut(Axis(0), 13 + i)
            .fill(setup.castling_rights.contains(corner) as u8 as f32);
    }

    // 4. En passant target (channel 17) is a one-hot square if present.
    if let Some(ep) = setup.ep_square {
        tensor[[17, ep.rank() as usize, ep.file() as usize]] = 1.0;
    }

    Ok(tensor)
}

/// Best-effort structural checks, run before any plane is written.
fn validate(setup: &Setup) -> Result<(), EncodingError> {
    for color in [Color::White, Color::Black] {
        let pieces = setup.board.by_color(color);
        match (setup.board.kings() & pieces).count() {
            0 => return Err(EncodingError::MissingKing(color)),
            1 => {}
            _ => return Err(EncodingError::TooManyKings(color)),
        }
        let count = pieces.count();
        if count > 16 {
            return Err(EncodingError::TooManyPieces { color, count });
        }
        let count = (setup.board.pawns() & pieces).count();
        if count > 8 {
            return Err(EncodingError::TooManyPawns { color, count });
        }
    }

    if let Some(sq) = (setup.board.pawns() & Bitboard::BACKRANKS).first() {
        return Err(EncodingError::PawnOnBackRank(sq));
    }

    // A castling right must name a corner holding the matching rook, with
    // the king still on its home square.
    for sq in setup.castling_rights {
        if !Bitboard::CORNERS.contains(sq) {
            return Err(EncodingError::ImpossibleCastling(sq));
        }
        let color = if sq.rank() == Rank::First {
            Color::White
        } else {
            Color::Black
        };
        let king_home = if color.is_white() {
            Square::E1
        } else {
            Square::E8
        };
        if setup.board.piece_at(sq) != Some(Role::Rook.of(color))
            || setup.board.piece_at(king_home) != Some(Role::King.of(color))
        {
            return Err(EncodingError::ImpossibleCastling(sq));
        }
    }

    // The en passant target sits behind a pawn that just advanced two
    // squares, so its rank is fixed by the side to move.
    if let Some(ep) = setup.ep_square {
        let (target_rank, pawn_rank, pawn) = if setup.turn.is_white() {
            (Rank::Sixth, Rank::Fifth, Role::Pawn.of(Color::Black))
        } else {
            (Rank::Third, Rank::Fourth, Role::Pawn.of(Color::White))
        };
        if ep.rank() != target_rank
            || setup.board.piece_at(Square::from_coords(ep.file(), pawn_rank)) != Some(pawn)
        {
            return Err(EncodingError::BadEnPassant(ep));
        }
    }

    Ok(())
}
