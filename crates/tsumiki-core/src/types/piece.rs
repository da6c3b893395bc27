//! 駒種（PieceType）と駒（Piece）

use std::fmt;

use super::Color;

/// 駒種
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 1,
    Lance = 2,
    Knight = 3,
    Silver = 4,
    Bishop = 5,
    Rook = 6,
    Gold = 7,
    King = 8,
    ProPawn = 9,
    ProLance = 10,
    ProKnight = 11,
    ProSilver = 12,
    Horse = 13,
    Dragon = 14,
}

impl PieceType {
    /// 駒種の数（0 を欠番として含む配列サイズ）
    pub const NUM: usize = 15;

    /// 持ち駒になる駒種（Hand のインデックス順）
    pub const HAND_TYPES: [PieceType; 7] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Gold,
    ];

    /// 生の値から生成
    #[inline]
    pub const fn from_u8(v: u8) -> Option<PieceType> {
        Some(match v {
            1 => PieceType::Pawn,
            2 => PieceType::Lance,
            3 => PieceType::Knight,
            4 => PieceType::Silver,
            5 => PieceType::Bishop,
            6 => PieceType::Rook,
            7 => PieceType::Gold,
            8 => PieceType::King,
            9 => PieceType::ProPawn,
            10 => PieceType::ProLance,
            11 => PieceType::ProKnight,
            12 => PieceType::ProSilver,
            13 => PieceType::Horse,
            14 => PieceType::Dragon,
            _ => return None,
        })
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 成れる駒種か
    #[inline]
    pub const fn can_promote(self) -> bool {
        (self as u8) <= PieceType::Rook as u8
    }

    /// 成り駒か
    #[inline]
    pub const fn is_promoted(self) -> bool {
        (self as u8) >= PieceType::ProPawn as u8
    }

    /// 成った駒種（成れない駒はそのまま）
    #[inline]
    pub const fn promote(self) -> PieceType {
        if self.can_promote() {
            match PieceType::from_u8(self as u8 + 8) {
                Some(pt) => pt,
                None => self,
            }
        } else {
            self
        }
    }

    /// 成る前の駒種
    #[inline]
    pub const fn unpromote(self) -> PieceType {
        if self.is_promoted() {
            match PieceType::from_u8(self as u8 - 8) {
                Some(pt) => pt,
                None => self,
            }
        } else {
            self
        }
    }

    /// 持ち駒インデックス（玉は None）
    #[inline]
    pub const fn hand_index(self) -> Option<usize> {
        let base = self.unpromote();
        match base {
            PieceType::King => None,
            _ => Some(base as usize - 1),
        }
    }

    /// 飛び駒か
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(
            self,
            PieceType::Lance
                | PieceType::Bishop
                | PieceType::Rook
                | PieceType::Horse
                | PieceType::Dragon
        )
    }

    /// USI 表記の文字（先手の大文字、成りを除く）
    pub const fn usi_char(self) -> char {
        match self.unpromote() {
            PieceType::Pawn => 'P',
            PieceType::Lance => 'L',
            PieceType::Knight => 'N',
            PieceType::Silver => 'S',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Gold => 'G',
            _ => 'K',
        }
    }

    /// USI 表記の文字から生成（大文字小文字は問わない）
    pub fn from_usi_char(c: char) -> Option<PieceType> {
        Some(match c.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'L' => PieceType::Lance,
            'N' => PieceType::Knight,
            'S' => PieceType::Silver,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'G' => PieceType::Gold,
            'K' => PieceType::King,
            _ => return None,
        })
    }
}

/// 先後付きの駒
///
/// 下位4bitが駒種、bit4が後手フラグ。`EMPTY` は空き升。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    /// 空き升
    pub const EMPTY: Piece = Piece(0);

    /// インデックス空間のサイズ
    pub const NUM: usize = 32;

    const WHITE_BIT: u8 = 16;

    #[inline]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        match color {
            Color::Black => Piece(piece_type as u8),
            Color::White => Piece(piece_type as u8 | Self::WHITE_BIT),
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 駒種（空き升では None）
    #[inline]
    pub const fn piece_type(self) -> Option<PieceType> {
        PieceType::from_u8(self.0 & 0x0f)
    }

    /// 手番（空き升では None）
    #[inline]
    pub const fn color(self) -> Option<Color> {
        if self.0 == 0 {
            None
        } else if self.0 & Self::WHITE_BIT != 0 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    /// 指定手番の駒か
    #[inline]
    pub const fn is_color(self, color: Color) -> bool {
        self.0 != 0 && ((self.0 & Self::WHITE_BIT != 0) == matches!(color, Color::White))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 先後を入れ替えた駒
    #[inline]
    pub const fn flip(self) -> Piece {
        if self.0 == 0 { self } else { Piece(self.0 ^ Self::WHITE_BIT) }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(pt), Some(color)) = (self.piece_type(), self.color()) else {
            return write!(f, ".");
        };
        let c = match color {
            Color::Black => pt.usi_char(),
            Color::White => pt.usi_char().to_ascii_lowercase(),
        };
        if pt.is_promoted() {
            write!(f, "+{c}")
        } else {
            write!(f, "{c}")
        }
    }
}
