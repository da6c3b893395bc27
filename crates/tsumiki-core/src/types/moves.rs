//! 指し手（Move / Move16）
//!
//! 16bit 形式（`Move16`）は置換表や棋譜保存用の最小表現で、
//! 32bit 形式（`Move`）は上位に動かした駒種を拡張情報として持つ。
//!
//! ```text
//! bit  0- 6: 移動先
//! bit  7-13: 移動元（駒打ちの場合は駒種の値）
//! bit 14   : 成りフラグ
//! bit 15   : 駒打ちフラグ
//! bit 16-19: 動かした駒種（Move のみ）
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use super::{PieceType, Square};

const TO_MASK: u32 = 0x7f;
const FROM_SHIFT: u32 = 7;
const PROMOTE_FLAG: u32 = 1 << 14;
const DROP_FLAG: u32 = 1 << 15;
const PIECE_SHIFT: u32 = 16;

/// 16bit 指し手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move16(u16);

impl Move16 {
    pub const NONE: Move16 = Move16(0);

    #[inline]
    pub const fn from_raw(raw: u16) -> Move16 {
        Move16(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// 指し手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// 指し手なし
    pub const NONE: Move = Move(0);

    /// 盤上の駒を動かす手
    #[inline]
    pub const fn normal(from: Square, to: Square, promote: bool, piece: PieceType) -> Move {
        let mut raw = to.raw() as u32 | (from.raw() as u32) << FROM_SHIFT;
        if promote {
            raw |= PROMOTE_FLAG;
        }
        Move(raw | (piece.raw() as u32) << PIECE_SHIFT)
    }

    /// 駒打ち
    #[inline]
    pub const fn drop(piece: PieceType, to: Square) -> Move {
        let raw = to.raw() as u32 | (piece.raw() as u32) << FROM_SHIFT | DROP_FLAG;
        Move(raw | (piece.raw() as u32) << PIECE_SHIFT)
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index((self.0 & TO_MASK) as usize)
    }

    /// 移動元（駒打ちでは None）
    #[inline]
    pub const fn from(self) -> Option<Square> {
        if self.is_drop() {
            None
        } else {
            Some(Square::from_index(((self.0 >> FROM_SHIFT) & TO_MASK) as usize))
        }
    }

    #[inline]
    pub const fn is_drop(self) -> bool {
        self.0 & DROP_FLAG != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 & PROMOTE_FLAG != 0
    }

    /// 打つ駒種（駒打ちでなければ None）
    #[inline]
    pub const fn drop_piece_type(self) -> Option<PieceType> {
        if self.is_drop() {
            PieceType::from_u8(((self.0 >> FROM_SHIFT) & TO_MASK) as u8)
        } else {
            None
        }
    }

    /// 動かした駒種（成る前）
    #[inline]
    pub const fn piece_type(self) -> Option<PieceType> {
        PieceType::from_u8(((self.0 >> PIECE_SHIFT) & 0x0f) as u8)
    }

    /// 指した後の駒種（成りを反映）
    #[inline]
    pub const fn piece_type_after(self) -> Option<PieceType> {
        match self.piece_type() {
            Some(pt) if self.is_promotion() => Some(pt.promote()),
            other => other,
        }
    }

    /// 16bit 形式へ変換（駒種情報は落ちる）
    #[inline]
    pub const fn to_move16(self) -> Move16 {
        Move16(self.0 as u16)
    }

    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_u32(raw: u32) -> Move {
        Move(raw)
    }

    /// 盤面を180度回転した手
    pub fn flip(self) -> Move {
        if self.is_none() {
            return self;
        }
        let to = self.to().flip();
        match (self.from(), self.piece_type()) {
            (Some(from), Some(pt)) => Move::normal(from.flip(), to, self.is_promotion(), pt),
            (None, Some(pt)) => Move::drop(pt, to),
            _ => Move::NONE,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "none");
        }
        match self.from() {
            None => {
                let pt = self.drop_piece_type().map_or('?', PieceType::usi_char);
                write!(f, "{pt}*{}", self.to())
            }
            Some(from) => {
                write!(f, "{from}{}", self.to())?;
                if self.is_promotion() {
                    write!(f, "+")?;
                }
                Ok(())
            }
        }
    }
}

/// JSON などへは USI 形式の文字列として書き出す
impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 並べ替え用の値付き指し手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtMove {
    pub mv: Move,
    pub value: i32,
}

impl ExtMove {
    #[inline]
    pub const fn new(mv: Move, value: i32) -> ExtMove {
        ExtMove { mv, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_normal_fields() {
        let from = Square::new(6, 6);
        let to = Square::new(6, 5);
        let mv = Move::normal(from, to, false, PieceType::Pawn);
        assert_eq!(mv.from(), Some(from));
        assert_eq!(mv.to(), to);
        assert!(!mv.is_drop());
        assert!(!mv.is_promotion());
        assert_eq!(mv.piece_type(), Some(PieceType::Pawn));
        assert_eq!(mv.to_string(), "7g7f");
    }

    #[test]
    fn test_move_drop_fields() {
        let mv = Move::drop(PieceType::Gold, Square::new(4, 1));
        assert!(mv.is_drop());
        assert_eq!(mv.from(), None);
        assert_eq!(mv.drop_piece_type(), Some(PieceType::Gold));
        assert_eq!(mv.to_string(), "G*5b");
    }

    #[test]
    fn test_move_promotion_piece_after() {
        let mv = Move::normal(Square::new(7, 7), Square::new(1, 1), true, PieceType::Bishop);
        assert_eq!(mv.piece_type_after(), Some(PieceType::Horse));
        assert_eq!(mv.to_string(), "8h2b+");
    }

    #[test]
    fn test_move_none_is_distinct() {
        assert!(Move::NONE.is_none());
        assert!(Move::NONE.to_move16().is_none());
        let mv = Move::normal(Square::new(0, 1), Square::new(0, 0), false, PieceType::Lance);
        assert!(mv.is_some());
        assert!(!mv.to_move16().is_none());
    }

    #[test]
    fn test_move_flip() {
        let mv = Move::normal(Square::new(6, 6), Square::new(6, 5), false, PieceType::Pawn);
        let flipped = mv.flip();
        assert_eq!(flipped.to_string(), "3c3d");
        assert_eq!(flipped.flip(), mv);
    }

    #[test]
    fn test_move_serialize_as_usi() {
        let mv = Move::drop(PieceType::Pawn, Square::new(4, 4));
        assert_eq!(serde_json::to_string(&mv).unwrap(), "\"P*5e\"");
    }
}
