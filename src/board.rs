//! Game board representation

use crate::piece::Piece;
use ratatui::style::Color;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Cells fused in place by earlier pieces
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: Vec<Vec<Cell>>,
    width: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create an empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![vec![Cell::Empty; width]; height],
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height() && (col as usize) < self.width
    }

    /// Get the cell at (row, col), `None` if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if !self.in_bounds(row, col) {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    /// Set a cell, returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }
        self.cells[row as usize][col as usize] = cell;
        true
    }

    /// Out-of-range coordinates count as occupied
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.get(row, col).is_none_or(|cell| cell.is_filled())
    }

    /// Write the piece's color into every in-bounds cell it covers
    pub fn fuse(&mut self, piece: &Piece) {
        for (x, y) in piece.block_positions() {
            self.set(y, x, Cell::Filled(piece.color));
        }
    }

    /// Remove full rows, shifting everything above down. Returns rows removed.
    pub fn sweep_completed_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut row = self.height();

        while row > 0 {
            if self.is_line_full(row - 1) {
                self.cells.remove(row - 1);
                self.cells.insert(0, vec![Cell::Empty; self.width]);
                cleared += 1;
                // The row above has shifted into this index; look at it again
            } else {
                row -= 1;
            }
        }

        cleared
    }

    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Rows top to bottom
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Position;
    use crate::tetromino::TetrominoType;

    fn fill_row(board: &mut Board, row: i32, color: Color) {
        for col in 0..board.width() as i32 {
            board.set(row, col, Cell::Filled(color));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.width(), BOARD_WIDTH);
        assert_eq!(board.height(), BOARD_HEIGHT);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::default();
        assert!(board.set(5, 5, Cell::Filled(Color::Red)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(Color::Red)));
        assert!(board.is_occupied(5, 5));
        assert!(!board.is_occupied(5, 6));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
        assert!(!board.set(0, BOARD_WIDTH as i32, Cell::Filled(Color::Red)));
        assert!(board.is_occupied(-1, 0));
        assert!(board.is_occupied(0, BOARD_WIDTH as i32));
    }

    #[test]
    fn test_fuse_writes_only_set_cells() {
        let mut board = Board::default();
        let piece = Piece::at(TetrominoType::T, Position::new(3, 10));
        board.fuse(&piece);

        let color = Cell::Filled(TetrominoType::T.color());
        assert_eq!(board.get(10, 4), Some(color));
        assert_eq!(board.get(11, 3), Some(color));
        assert_eq!(board.get(11, 4), Some(color));
        assert_eq!(board.get(11, 5), Some(color));
        // Zero cells of the shape matrix stay empty
        assert_eq!(board.get(10, 3), Some(Cell::Empty));
        assert_eq!(board.get(10, 5), Some(Cell::Empty));
    }

    #[test]
    fn test_fuse_skips_out_of_bounds_cells() {
        let mut board = Board::default();
        let piece = Piece::at(TetrominoType::I, Position::new(8, 19));
        board.fuse(&piece);

        assert!(board.is_occupied(19, 8));
        assert!(board.is_occupied(19, 9));
        let filled = board.rows().iter().flatten().filter(|c| c.is_filled()).count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        fill_row(&mut board, 19, Color::Cyan);
        board.set(18, 0, Cell::Filled(Color::Red));

        assert_eq!(board.sweep_completed_rows(), 1);
        // The block from row 18 should now be on row 19
        assert_eq!(board.get(19, 0), Some(Cell::Filled(Color::Red)));
        assert_eq!(board.get(18, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_sweep_adjacent_rows() {
        let mut board = Board::default();
        fill_row(&mut board, 18, Color::Cyan);
        fill_row(&mut board, 19, Color::Cyan);
        board.set(17, 3, Cell::Filled(Color::Red));

        assert_eq!(board.sweep_completed_rows(), 2);
        assert_eq!(board.get(19, 3), Some(Cell::Filled(Color::Red)));
        let filled = board.rows().iter().flatten().filter(|c| c.is_filled()).count();
        assert_eq!(filled, 1);
    }

    #[test]
    fn test_sweep_preserves_partial_row_order() {
        let mut board = Board::default();
        for row in 0..BOARD_HEIGHT as i32 {
            if matches!(row, 2 | 5 | 7) {
                fill_row(&mut board, row, Color::Blue);
            } else {
                // Mark each partial row with its original index in column 0
                board.set(row, 0, Cell::Filled(Color::Indexed(row as u8)));
            }
        }

        assert_eq!(board.sweep_completed_rows(), 3);
        assert_eq!(board.height(), BOARD_HEIGHT);

        for row in 0..3 {
            assert!(board.rows()[row].iter().all(|c| c.is_empty()));
        }
        let remaining: Vec<u8> = board.rows()[3..]
            .iter()
            .map(|row| match row[0] {
                Cell::Filled(Color::Indexed(i)) => i,
                other => panic!("unexpected cell {:?}", other),
            })
            .collect();
        let expected: Vec<u8> = (0..BOARD_HEIGHT as u8)
            .filter(|r| !matches!(r, 2 | 5 | 7))
            .collect();
        assert_eq!(remaining, expected);
        assert!(board.rows().iter().all(|row| !row.iter().all(|c| c.is_filled())));
    }

    #[test]
    fn test_sweep_nothing_to_clear() {
        let mut board = Board::default();
        board.set(19, 0, Cell::Filled(Color::Red));
        let before = board.clone();
        assert_eq!(board.sweep_completed_rows(), 0);
        assert_eq!(board, before);
    }
}
