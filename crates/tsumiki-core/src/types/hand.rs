//! 持ち駒（Hand）

use super::PieceType;

/// 片方の手番の持ち駒
///
/// `PieceType::HAND_TYPES` の順に枚数を保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand([u8; 7]);

impl Hand {
    pub const EMPTY: Hand = Hand([0; 7]);

    /// 枚数を取得（成り駒は元の駒種として数える）
    #[inline]
    pub fn count(&self, pt: PieceType) -> u8 {
        pt.hand_index().map_or(0, |i| self.0[i])
    }

    #[inline]
    pub fn add(&mut self, pt: PieceType) {
        if let Some(i) = pt.hand_index() {
            self.0[i] += 1;
        }
    }

    #[inline]
    pub fn remove(&mut self, pt: PieceType) {
        if let Some(i) = pt.hand_index() {
            debug_assert!(self.0[i] > 0);
            self.0[i] -= 1;
        }
    }

    #[inline]
    pub fn set(&mut self, pt: PieceType, count: u8) {
        if let Some(i) = pt.hand_index() {
            self.0[i] = count;
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// (駒種, 枚数) を列挙（0枚も含む）
    pub fn iter(&self) -> impl Iterator<Item = (PieceType, u8)> + '_ {
        PieceType::HAND_TYPES.iter().map(|&pt| (pt, self.count(pt)))
    }
}
