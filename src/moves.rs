use shakmaty::{File, Move, Square};

/// Index of a move slot in the model's fixed output space.
///
/// The output layer is 4096 wide: `origin × 64 + destination`, both squares
/// numbered a1=0 .. h8=63. Promotion choice is not disambiguated, so all
/// promotions sharing an origin/destination map to the same slot. Castling
/// uses the king's two-square UCI form (e1g1, e1c1, e8g8, e8c8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveIndex(u16);

impl MoveIndex {
    /// Width of the model's policy output.
    pub const COUNT: usize = 64 * 64;

    pub fn new(origin: Square, destination: Square) -> Self {
        Self(origin as u16 * 64 + destination as u16)
    }

    /// Map a legal move to its output slot.
    pub fn from_move(m: &Move) -> Self {
        match *m {
            Move::Normal { from, to, .. } | Move::EnPassant { from, to } => Self::new(from, to),
            Move::Castle { king, rook } => {
                let file = if rook > king { File::G } else { File::C };
                Self::new(king, Square::from_coords(file, king.rank()))
            }
            // Drops do not occur in standard chess.
            Move::Put { to, .. } => Self::new(to, to),
        }
    }

    pub fn origin(self) -> Square {
        Square::new(u32::from(self.0) / 64)
    }

    pub fn destination(self) -> Square {
        Square::new(u32::from(self.0) % 64)
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}
