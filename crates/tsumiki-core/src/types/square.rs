//! 升目（Square）
//!
//! インデックスは `file * 9 + rank`。
//! file 0 が USI の 1 筋、rank 0 が USI の `a` 段（一段目）に対応する。

use std::fmt;
use std::str::FromStr;

use super::Color;

/// 升目（0-80）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// 升目の数
    pub const NUM: usize = 81;

    /// 筋と段から生成
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 9 && rank < 9);
        Square(file * 9 + rank)
    }

    /// インデックスから生成
    #[inline]
    pub const fn from_index(index: usize) -> Square {
        debug_assert!(index < Self::NUM);
        Square(index as u8)
    }

    /// 筋（0-8、USI の 1-9 筋）
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 / 9
    }

    /// 段（0-8、USI の a-i 段）
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 % 9
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// 盤面を180度回転した升目
    #[inline]
    pub const fn flip(self) -> Square {
        Square(80 - self.0)
    }

    /// (筋, 段) 方向へずらした升目。盤外なら None
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        if (0..9).contains(&f) && (0..9).contains(&r) {
            Some(Square::new(f as u8, r as u8))
        } else {
            None
        }
    }

    /// 手番側から見た段（0 が敵陣最奥）
    #[inline]
    pub const fn relative_rank(self, color: Color) -> u8 {
        match color {
            Color::Black => self.rank(),
            Color::White => 8 - self.rank(),
        }
    }

    /// 敵陣（成れる段）かどうか
    #[inline]
    pub const fn in_promotion_zone(self, color: Color) -> bool {
        self.relative_rank(color) < 3
    }

    /// 全升目を列挙
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'1' + self.file()) as char, (b'a' + self.rank()) as char)
    }
}

impl FromStr for Square {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(());
        }
        let file = bytes[0].wrapping_sub(b'1');
        let rank = bytes[1].wrapping_sub(b'a');
        if file < 9 && rank < 9 {
            Ok(Square::new(file, rank))
        } else {
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_usi_notation() {
        let sq = Square::new(6, 6);
        assert_eq!(sq.to_string(), "7g");
        assert_eq!("7g".parse::<Square>(), Ok(sq));
        assert!("0a".parse::<Square>().is_err());
        assert!("1j".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_flip() {
        assert_eq!(Square::new(0, 0).flip(), Square::new(8, 8));
        assert_eq!(Square::new(4, 4).flip(), Square::new(4, 4));
        assert_eq!(Square::new(6, 6).flip(), Square::new(2, 2));
    }

    #[test]
    fn test_square_offset_and_zone() {
        let sq = Square::new(0, 0);
        assert_eq!(sq.offset(-1, 0), None);
        assert_eq!(sq.offset(1, 2), Some(Square::new(1, 2)));
        assert!(Square::new(4, 2).in_promotion_zone(Color::Black));
        assert!(!Square::new(4, 3).in_promotion_zone(Color::Black));
        assert!(Square::new(4, 6).in_promotion_zone(Color::White));
    }
}
