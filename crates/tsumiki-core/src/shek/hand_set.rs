//! 持ち駒のビット集合

use crate::types::{Hand, PieceType};

use super::ShekState;

/// 先手の持ち駒を単項表現で並べたビット集合
///
/// 駒種ごとに枚数分の 1 を立てるので、集合の包含がそのまま持ち駒の優劣になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HandSet(u64);

impl HandSet {
    pub fn new(hand: &Hand) -> HandSet {
        let mut set = HandSet(0);
        set.push(hand.count(PieceType::Pawn), 0);
        set.push(hand.count(PieceType::Lance), 4);
        set.push(hand.count(PieceType::Knight), 4);
        set.push(hand.count(PieceType::Silver), 4);
        set.push(hand.count(PieceType::Gold), 4);
        set.push(hand.count(PieceType::Bishop), 2);
        set.push(hand.count(PieceType::Rook), 2);
        set
    }

    #[inline]
    fn push(&mut self, count: u8, shift: u32) {
        self.0 <<= shift;
        self.0 |= (1u64 << count) - 1;
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// `rhs` と比べた優劣
    pub fn compare_to(self, rhs: HandSet) -> ShekState {
        if self.0 == rhs.0 {
            return ShekState::Equal;
        }
        let sup = self.0 & !rhs.0 != 0;
        let inf = !self.0 & rhs.0 != 0;
        match (sup, inf) {
            (true, false) => ShekState::Superior,
            (false, true) => ShekState::Inferior,
            _ => ShekState::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(pieces: &[(PieceType, u8)]) -> Hand {
        let mut hand = Hand::EMPTY;
        for &(pt, count) in pieces {
            hand.set(pt, count);
        }
        hand
    }

    #[test]
    fn test_hand_set_compare() {
        let base = HandSet::new(&hand(&[(PieceType::Gold, 1), (PieceType::Pawn, 2)]));
        let more = HandSet::new(&hand(&[(PieceType::Gold, 1), (PieceType::Pawn, 3)]));
        let other = HandSet::new(&hand(&[(PieceType::Rook, 1), (PieceType::Pawn, 3)]));
        assert_eq!(base.compare_to(base), ShekState::Equal);
        assert_eq!(more.compare_to(base), ShekState::Superior);
        assert_eq!(base.compare_to(more), ShekState::Inferior);
        assert_eq!(other.compare_to(base), ShekState::None);
    }

    #[test]
    fn test_hand_set_full_pawns_fits() {
        let full = HandSet::new(&hand(&[
            (PieceType::Pawn, 18),
            (PieceType::Lance, 4),
            (PieceType::Knight, 4),
            (PieceType::Silver, 4),
            (PieceType::Gold, 4),
            (PieceType::Bishop, 2),
            (PieceType::Rook, 2),
        ]));
        assert_eq!(full.raw().count_ones(), 38);
    }
}
