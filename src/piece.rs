//! Active falling piece

use crate::tetromino::{Shape, TetrominoType};
use ratatui::style::Color;

/// Board offset of a shape's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A player-controlled piece
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub piece_type: TetrominoType,
    /// Current orientation
    pub shape: Shape,
    pub position: Position,
    pub color: Color,
}

impl Piece {
    /// Create a piece horizontally centered on row 0
    pub fn spawn(piece_type: TetrominoType, board_width: usize) -> Self {
        let shape_width = piece_type.shape().width();
        let x = (board_width / 2) as i32 - (shape_width / 2) as i32;
        Self::at(piece_type, Position::new(x, 0))
    }

    /// Create a piece in its spawn orientation at an arbitrary position
    pub fn at(piece_type: TetrominoType, position: Position) -> Self {
        Self {
            piece_type,
            shape: piece_type.shape(),
            position,
            color: piece_type.color(),
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Absolute `(x, y)` board coordinates of every occupied cell
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(|(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }
}
