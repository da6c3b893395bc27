//! SFEN 形式の解析・出力

use crate::types::{Color, Piece, PieceType, Square};

use super::{Position, PositionError};

/// 平手初期局面の SFEN
pub const SFEN_HIRATE: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// SFEN で持ち駒を並べる順
const HAND_ORDER: [PieceType; 7] = [
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Gold,
    PieceType::Silver,
    PieceType::Knight,
    PieceType::Lance,
    PieceType::Pawn,
];

impl Position {
    /// SFEN 文字列から局面を生成（`sfen` の接頭辞は付けない）
    pub fn from_sfen(sfen: &str) -> Result<Position, PositionError> {
        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(PositionError::Board(format!("SFEN must have at least 3 parts: {sfen}")));
        }

        let mut pos = Position::empty();

        // 1. 盤面
        pos.parse_board(parts[0])?;

        // 2. 手番
        let side = match parts[1] {
            "b" => Color::Black,
            "w" => Color::White,
            other => return Err(PositionError::SideToMove(format!("expected 'b' or 'w', got '{other}'"))),
        };
        pos.set_side_to_move(side);

        // 3. 手駒
        pos.parse_hand(parts[2])?;

        // 4. 手数（省略可）
        if let Some(ply) = parts.get(3) {
            let ply = ply.parse().map_err(|_| PositionError::Ply(ply.to_string()))?;
            pos.set_game_ply(ply);
        }

        Ok(pos)
    }

    /// 現局面の SFEN 文字列
    pub fn to_sfen(&self) -> String {
        let mut result = String::new();

        for rank in 0..9u8 {
            let mut empty_count = 0;
            for file in (0..9u8).rev() {
                let piece = self.piece_on(Square::new(file, rank));
                if piece.is_empty() {
                    empty_count += 1;
                    continue;
                }
                if empty_count > 0 {
                    result.push_str(&empty_count.to_string());
                    empty_count = 0;
                }
                result.push_str(&piece.to_string());
            }
            if empty_count > 0 {
                result.push_str(&empty_count.to_string());
            }
            if rank < 8 {
                result.push('/');
            }
        }

        result.push(' ');
        result.push(match self.side_to_move() {
            Color::Black => 'b',
            Color::White => 'w',
        });

        result.push(' ');
        let hand = self.hand_to_sfen();
        if hand.is_empty() {
            result.push('-');
        } else {
            result.push_str(&hand);
        }

        result.push(' ');
        result.push_str(&self.game_ply().to_string());
        result
    }

    fn parse_board(&mut self, board: &str) -> Result<(), PositionError> {
        let ranks: Vec<&str> = board.split('/').collect();
        if ranks.len() != 9 {
            return Err(PositionError::Board(format!("expected 9 ranks, got {}", ranks.len())));
        }

        for (rank, row) in ranks.iter().enumerate() {
            // 9 筋から 1 筋へ向かって読む
            let mut file = 9i32;
            let mut promoted = false;
            for c in row.chars() {
                if c == '+' {
                    promoted = true;
                    continue;
                }
                if let Some(digit) = c.to_digit(10) {
                    file -= digit as i32;
                    if file < 0 {
                        return Err(PositionError::Board(format!("too many squares in rank {}", rank + 1)));
                    }
                    continue;
                }
                file -= 1;
                if file < 0 {
                    return Err(PositionError::Board(format!("too many pieces in rank {}", rank + 1)));
                }
                let piece = sfen_char_to_piece(c, promoted)?;
                let sq = Square::new(file as u8, rank as u8);
                if piece.piece_type() == Some(PieceType::King)
                    && piece.color().and_then(|color| self.king_square(color)).is_some()
                {
                    return Err(PositionError::Board("more than one king per side".to_string()));
                }
                self.put_piece(sq, piece);
                promoted = false;
            }
            if file != 0 || promoted {
                return Err(PositionError::Board(format!("rank {} has wrong number of squares", rank + 1)));
            }
        }
        Ok(())
    }

    fn parse_hand(&mut self, hand: &str) -> Result<(), PositionError> {
        if hand == "-" {
            return Ok(());
        }
        let mut count = 0u32;
        for c in hand.chars() {
            if let Some(digit) = c.to_digit(10) {
                count = count * 10 + digit;
                if count > 18 {
                    return Err(PositionError::Hand(format!("count too large in '{hand}'")));
                }
                continue;
            }
            let pt = PieceType::from_usi_char(c)
                .filter(|pt| pt.hand_index().is_some())
                .ok_or_else(|| PositionError::Hand(format!("unknown hand piece '{c}'")))?;
            let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
            for _ in 0..count.max(1) {
                self.add_hand(color, pt);
            }
            count = 0;
        }
        if count != 0 {
            return Err(PositionError::Hand(format!("trailing count in '{hand}'")));
        }
        Ok(())
    }

    fn hand_to_sfen(&self) -> String {
        let mut result = String::new();
        for color in Color::ALL {
            for pt in HAND_ORDER {
                let count = self.hand(color).count(pt);
                if count == 0 {
                    continue;
                }
                if count > 1 {
                    result.push_str(&count.to_string());
                }
                let c = pt.usi_char();
                result.push(match color {
                    Color::Black => c,
                    Color::White => c.to_ascii_lowercase(),
                });
            }
        }
        result
    }
}

fn sfen_char_to_piece(c: char, promoted: bool) -> Result<Piece, PositionError> {
    let pt = PieceType::from_usi_char(c).ok_or_else(|| PositionError::Board(format!("unknown piece '{c}'")))?;
    let pt = if promoted {
        if !pt.can_promote() {
            return Err(PositionError::Board(format!("'{c}' cannot be promoted")));
        }
        pt.promote()
    } else {
        pt
    };
    let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
    Ok(Piece::new(color, pt))
}
