//! 読み筋（Principal Variation）

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use smallvec::SmallVec;

use crate::types::{Depth, Move};

/// 読み筋の1手（その手を探索したときの残り深さを持つ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvElement {
    pub mv: Move,
    pub depth: Depth,
}

/// 読み筋
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pv {
    elements: SmallVec<[PvElement; 16]>,
}

impl Pv {
    /// 保持する最大手数
    pub const MAX_LENGTH: usize = 64;

    pub fn new() -> Pv {
        Pv::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// i 手目の指し手
    #[inline]
    pub fn get(&self, index: usize) -> Option<Move> {
        self.elements.get(index).map(|e| e.mv)
    }

    #[inline]
    pub fn element(&self, index: usize) -> Option<PvElement> {
        self.elements.get(index).copied()
    }

    /// 先頭の指し手
    #[inline]
    pub fn first(&self) -> Option<Move> {
        self.get(0)
    }

    /// `mv` の後ろに子ノードの読み筋をつなげる
    pub fn set(&mut self, mv: Move, depth: Depth, child: &Pv) {
        self.elements.clear();
        self.elements.push(PvElement { mv, depth });
        let rest = child.elements.len().min(Self::MAX_LENGTH - 1);
        self.elements.extend_from_slice(&child.elements[..rest]);
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.elements.iter().map(|e| e.mv)
    }

    /// 先頭から一致している手数
    pub fn common_prefix_len(&self, other: &Pv) -> usize {
        self.moves().zip(other.moves()).take_while(|(a, b)| a == b).count()
    }
}

impl fmt::Display for Pv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

impl Serialize for Pv {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for mv in self.moves() {
            seq.serialize_element(&mv)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceType, Square};

    fn pawn(file: u8) -> Move {
        Move::normal(Square::new(file, 6), Square::new(file, 5), false, PieceType::Pawn)
    }

    #[test]
    fn test_pv_set_prepends_move() {
        let mut child = Pv::new();
        child.set(pawn(1), 8, &Pv::new());
        let mut pv = Pv::new();
        pv.set(pawn(0), 16, &child);
        assert_eq!(pv.len(), 2);
        assert_eq!(pv.first(), Some(pawn(0)));
        assert_eq!(pv.element(1), Some(PvElement { mv: pawn(1), depth: 8 }));
        assert_eq!(pv.to_string(), "1g1f 2g2f");
    }

    #[test]
    fn test_pv_max_length() {
        let mut pv = Pv::new();
        for _ in 0..100 {
            let child = pv.clone();
            pv.set(pawn(0), 8, &child);
        }
        assert_eq!(pv.len(), Pv::MAX_LENGTH);
    }

    #[test]
    fn test_pv_common_prefix_len() {
        let mut a = Pv::new();
        a.set(pawn(2), 8, &Pv::new());
        let mut b = Pv::new();
        b.set(pawn(1), 16, &a);
        let mut c = Pv::new();
        c.set(pawn(1), 16, &Pv::new());
        assert_eq!(b.common_prefix_len(&b), 2);
        assert_eq!(b.common_prefix_len(&c), 1);
        assert_eq!(a.common_prefix_len(&c), 0);
    }

    #[test]
    fn test_pv_serialize() {
        let mut pv = Pv::new();
        pv.set(pawn(0), 8, &Pv::new());
        assert_eq!(serde_json::to_string(&pv).unwrap(), "[\"1g1f\"]");
    }
}
