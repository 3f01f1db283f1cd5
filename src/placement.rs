//! Collision checks and piece movement
//!
//! Bounds are checked per occupied cell, never per bounding box: a shape may
//! hang partly off the grid as long as its empty cells are the ones outside.

use crate::board::Board;
use crate::piece::Piece;

/// Offsets tried, in order, when a rotation collides in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kick {
    Left1,
    Right1,
    Up1,
    Left2,
    Right2,
}

impl Kick {
    pub const ORDER: [Kick; 5] = [Kick::Left1, Kick::Right1, Kick::Up1, Kick::Left2, Kick::Right2];

    /// `(dx, dy)`, with y growing downward
    pub fn offset(self) -> (i32, i32) {
        match self {
            Kick::Left1 => (-1, 0),
            Kick::Right1 => (1, 0),
            Kick::Up1 => (0, -1),
            Kick::Left2 => (-2, 0),
            Kick::Right2 => (2, 0),
        }
    }
}

/// Result of a rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateOutcome {
    InPlace,
    Kicked(Kick),
    /// No candidate fit; the piece is unchanged
    Blocked,
}

/// Whether every occupied cell of the piece is on the board and empty
pub fn is_valid(piece: &Piece, board: &Board) -> bool {
    piece
        .block_positions()
        .all(|(x, y)| board.in_bounds(y, x) && !board.is_occupied(y, x))
}

/// Translate the piece if the destination is valid
pub fn try_shift(piece: &mut Piece, board: &Board, dx: i32, dy: i32) -> bool {
    let original = piece.position;
    piece.position = original.offset(dx, dy);
    if is_valid(piece, board) {
        true
    } else {
        piece.position = original;
        false
    }
}

/// Rotate clockwise, falling back to the first kick that fits
pub fn try_rotate(piece: &mut Piece, board: &Board) -> RotateOutcome {
    let mut candidate = piece.clone().with_shape(piece.shape.rotated_clockwise());
    if is_valid(&candidate, board) {
        *piece = candidate;
        return RotateOutcome::InPlace;
    }

    let origin = piece.position;
    for kick in Kick::ORDER {
        let (dx, dy) = kick.offset();
        candidate.position = origin.offset(dx, dy);
        if is_valid(&candidate, board) {
            *piece = candidate;
            return RotateOutcome::Kicked(kick);
        }
    }

    RotateOutcome::Blocked
}

/// Lowest row the piece can settle on from its current position.
/// Returns the current row when it cannot move down at all.
pub fn landing_row(piece: &Piece, board: &Board) -> i32 {
    let mut probe = piece.clone();
    loop {
        probe.position.y += 1;
        if !is_valid(&probe, board) {
            return probe.position.y - 1;
        }
    }
}
