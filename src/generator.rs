//! Memoryless piece generator
//!
//! Every piece is drawn independently and uniformly from the seven types.
//! There is no bag and no drought protection.

use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Uniform i.i.d. piece source
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: ChaCha8Rng,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic sequence for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn random_type(&mut self) -> TetrominoType {
        *TetrominoType::all()
            .choose(&mut self.rng)
            .unwrap_or(&TetrominoType::I)
    }

    /// A fresh piece at the spawn position for a board of `board_width`
    pub fn random_piece(&mut self, board_width: usize) -> Piece {
        Piece::spawn(self.random_type(), board_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceGenerator::with_seed(42);
        let mut b = PieceGenerator::with_seed(42);
        for _ in 0..50 {
            assert_eq!(a.random_type(), b.random_type());
        }
    }

    #[test]
    fn test_all_types_appear() {
        let mut generator = PieceGenerator::with_seed(7);
        let mut counts: HashMap<TetrominoType, usize> = HashMap::new();
        for _ in 0..7000 {
            *counts.entry(generator.random_type()).or_default() += 1;
        }
        assert_eq!(counts.len(), 7);
        // Roughly uniform: expected 1000 each
        for (piece, count) in counts {
            assert!((700..1300).contains(&count), "{:?} drawn {} times", piece, count);
        }
    }

    #[test]
    fn test_repeats_are_possible() {
        // Unlike a 7-bag, the same type can come up twice in a row
        let mut generator = PieceGenerator::with_seed(1);
        let draws: Vec<_> = (0..200).map(|_| generator.random_type()).collect();
        assert!(draws.windows(2).any(|w| w[0] == w[1]));
    }

    #[test]
    fn test_random_piece_spawns_on_top_row() {
        let mut generator = PieceGenerator::with_seed(3);
        for _ in 0..20 {
            let piece = generator.random_piece(10);
            assert_eq!(piece.position.y, 0);
            assert_eq!(piece.shape, piece.piece_type.shape());
        }
    }
}
