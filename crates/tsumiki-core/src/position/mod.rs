//! 局面（Position）
//!
//! - 盤面は 81 升の配列（mailbox）で持ち、利きは `attack` で都度計算する
//! - 盤面キー（駒配置のみ）・持ち駒キー・手番を分けて差分更新する
//! - `do_move` は自玉が取られる手と打ち歩詰めを拒否し、局面を変えずに `None` を返す

mod attack;
mod error;
pub mod mate;
pub mod movegen;
mod record;
mod sfen;
mod zobrist;

pub use attack::CheckState;
pub use error::PositionError;
pub use record::Record;
pub use sfen::SFEN_HIRATE;

pub(crate) use attack::{between, for_each_destination, is_attacked, scan_attackers};

use crate::types::{Color, Hand, Move, Move16, Piece, PieceType, Square};

/// 局面
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Piece; Square::NUM],
    hands: [Hand; Color::NUM],
    side_to_move: Color,
    king_square: [Option<Square>; Color::NUM],
    /// 盤上の駒配置のみのキー
    board_key: u64,
    /// 持ち駒のキー
    hand_key: u64,
    /// 手数（SFEN の 4 項目目）
    game_ply: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl Position {
    /// 駒のない局面
    pub fn empty() -> Position {
        Position {
            board: [Piece::EMPTY; Square::NUM],
            hands: [Hand::EMPTY; Color::NUM],
            side_to_move: Color::Black,
            king_square: [None; Color::NUM],
            board_key: 0,
            hand_key: 0,
            game_ply: 1,
        }
    }

    /// 平手初期局面
    pub fn startpos() -> Position {
        match Position::from_sfen(SFEN_HIRATE) {
            Ok(pos) => pos,
            Err(_) => unreachable!("SFEN_HIRATE is well-formed"),
        }
    }

    // =========================================================================
    // 参照
    // =========================================================================

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    #[inline]
    pub(crate) fn board(&self) -> &[Piece; Square::NUM] {
        &self.board
    }

    #[inline]
    pub fn hand(&self, color: Color) -> &Hand {
        &self.hands[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_square[color.index()]
    }

    #[inline]
    pub fn game_ply(&self) -> u32 {
        self.game_ply
    }

    /// 駒配置のみのキー（持ち駒・手番を含まない）
    #[inline]
    pub fn board_key(&self) -> u64 {
        self.board_key
    }

    /// 局面全体のキー
    #[inline]
    pub fn key(&self) -> u64 {
        let side = match self.side_to_move {
            Color::Black => 0,
            Color::White => zobrist::side(),
        };
        self.board_key ^ self.hand_key ^ side
    }

    /// 手番側の玉にかかっている王手
    pub fn checkers(&self) -> CheckState {
        match self.king_square(self.side_to_move) {
            Some(king) => CheckState::from_board(&self.board, king, !self.side_to_move),
            None => CheckState::NONE,
        }
    }

    /// 手番側が王手されているか
    #[inline]
    pub fn in_check(&self) -> bool {
        self.king_square(self.side_to_move)
            .is_some_and(|king| is_attacked(&self.board, king, !self.side_to_move))
    }

    /// 駒を取る手か
    #[inline]
    pub fn is_capture(&self, mv: Move) -> bool {
        !mv.is_drop() && !self.piece_on(mv.to()).is_empty()
    }

    /// 指した後に相手玉へ王手がかかるか
    pub fn gives_check(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let Some(king) = self.king_square(!us) else {
            return false;
        };
        let Some(after) = mv.piece_type_after() else {
            return false;
        };
        let mut board = self.board;
        if let Some(from) = mv.from() {
            board[from.index()] = Piece::EMPTY;
        }
        board[mv.to().index()] = Piece::new(us, after);
        is_attacked(&board, king, us)
    }

    // =========================================================================
    // 盤面操作
    // =========================================================================

    pub(crate) fn put_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.board[sq.index()].is_empty());
        self.board[sq.index()] = piece;
        self.board_key ^= zobrist::psq(piece, sq);
        if piece.piece_type() == Some(PieceType::King) {
            if let Some(color) = piece.color() {
                self.king_square[color.index()] = Some(sq);
            }
        }
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) -> Piece {
        let piece = self.board[sq.index()];
        self.board[sq.index()] = Piece::EMPTY;
        self.board_key ^= zobrist::psq(piece, sq);
        piece
    }

    pub(crate) fn add_hand(&mut self, color: Color, pt: PieceType) {
        let hand = &mut self.hands[color.index()];
        hand.add(pt);
        self.hand_key ^= zobrist::hand(color, pt, hand.count(pt));
    }

    pub(crate) fn remove_hand(&mut self, color: Color, pt: PieceType) {
        let hand = &mut self.hands[color.index()];
        self.hand_key ^= zobrist::hand(color, pt, hand.count(pt));
        hand.remove(pt);
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub(crate) fn set_game_ply(&mut self, ply: u32) {
        self.game_ply = ply;
    }

    /// 指し手を実行する
    ///
    /// 成功時は取った駒（取らなければ `Piece::EMPTY`）を返す。
    /// 自玉が取られる手・打ち歩詰めなど指せない手は局面を変えずに `None` を返す。
    pub fn do_move(&mut self, mv: Move) -> Option<Piece> {
        let us = self.side_to_move;
        let to = mv.to();
        let captured = match mv.from() {
            None => {
                let pt = mv.drop_piece_type()?;
                if !self.piece_on(to).is_empty() || self.hand(us).count(pt) == 0 {
                    return None;
                }
                self.remove_hand(us, pt);
                self.put_piece(to, Piece::new(us, pt));
                Piece::EMPTY
            }
            Some(from) => {
                let piece = self.piece_on(from);
                let target = self.piece_on(to);
                if !piece.is_color(us) || target.is_color(us) {
                    return None;
                }
                let pt = piece.piece_type()?;
                if target.piece_type() == Some(PieceType::King) {
                    return None;
                }
                self.remove_piece(from);
                if let Some(captured_type) = target.piece_type() {
                    self.remove_piece(to);
                    self.add_hand(us, captured_type.unpromote());
                }
                let after = if mv.is_promotion() { pt.promote() } else { pt };
                self.put_piece(to, Piece::new(us, after));
                target
            }
        };
        self.side_to_move = !us;
        self.game_ply += 1;

        let self_check = self
            .king_square(us)
            .is_some_and(|king| is_attacked(&self.board, king, !us));
        if self_check || (mv.drop_piece_type() == Some(PieceType::Pawn) && self.is_pawn_drop_mate()) {
            self.undo_move(mv, captured);
            return None;
        }
        Some(captured)
    }

    /// 直前の歩打ちが打ち歩詰めか（手番側が詰まされているか）
    fn is_pawn_drop_mate(&mut self) -> bool {
        self.in_check() && !self.has_legal_move()
    }

    /// 指し手を戻す
    pub fn undo_move(&mut self, mv: Move, captured: Piece) {
        let us = !self.side_to_move;
        self.side_to_move = us;
        self.game_ply -= 1;
        let to = mv.to();
        match mv.from() {
            None => {
                let piece = self.remove_piece(to);
                if let Some(pt) = piece.piece_type() {
                    self.add_hand(us, pt);
                }
            }
            Some(from) => {
                let piece = self.remove_piece(to);
                let Some(after) = piece.piece_type() else {
                    debug_assert!(false, "undo_move: no piece on {to}");
                    log::error!("undo_move: no piece on {to} for {mv}");
                    return;
                };
                let before = if mv.is_promotion() { after.unpromote() } else { after };
                self.put_piece(from, Piece::new(us, before));
                if let Some(captured_type) = captured.piece_type() {
                    self.remove_hand(us, captured_type.unpromote());
                    self.put_piece(to, captured);
                }
            }
        }
    }

    /// パス（null move）
    #[inline]
    pub fn do_null_move(&mut self) {
        self.side_to_move = !self.side_to_move;
    }

    #[inline]
    pub fn undo_null_move(&mut self) {
        self.side_to_move = !self.side_to_move;
    }

    /// 手番側に指せる手があるか
    pub fn has_legal_move(&mut self) -> bool {
        let mut moves = Vec::with_capacity(movegen::MAX_MOVES);
        if self.in_check() {
            movegen::generate_evasions(self, &mut moves);
        } else {
            movegen::generate_captures(self, &mut moves);
            movegen::generate_quiets(self, &mut moves);
        }
        moves.iter().any(|ext| match self.do_move(ext.mv) {
            Some(captured) => {
                self.undo_move(ext.mv, captured);
                true
            }
            None => false,
        })
    }

    // =========================================================================
    // 指し手の検証
    // =========================================================================

    /// 置換表やキラーから得た手が現局面で成立するか（自玉の安全は見ない）
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_none() {
            return false;
        }
        let us = self.side_to_move;
        let to = mv.to();
        match mv.from() {
            None => {
                let Some(pt) = mv.drop_piece_type() else {
                    return false;
                };
                self.piece_on(to).is_empty()
                    && self.hand(us).count(pt) > 0
                    && movegen::can_drop(self, pt, to)
            }
            Some(from) => {
                let piece = self.piece_on(from);
                let Some(pt) = piece.piece_type() else {
                    return false;
                };
                if !piece.is_color(us) || mv.piece_type() != Some(pt) {
                    return false;
                }
                if mv.is_promotion() {
                    if !pt.can_promote() || !(from.in_promotion_zone(us) || to.in_promotion_zone(us)) {
                        return false;
                    }
                } else if movegen::must_promote(pt, to, us) {
                    return false;
                }
                let mut reachable = false;
                for_each_destination(&self.board, from, piece, |dest| reachable |= dest == to);
                reachable
            }
        }
    }

    /// 16bit 形式の手を現局面の手に戻す（成立しなければ None）
    pub fn to_move(&self, m16: Move16) -> Option<Move> {
        let raw = m16.raw() as u32;
        if m16.is_none() {
            return None;
        }
        let to = (raw & 0x7f) as usize;
        let from = ((raw >> 7) & 0x7f) as usize;
        if to >= Square::NUM {
            return None;
        }
        let to = Square::from_index(to);
        let mv = if raw & (1 << 15) != 0 {
            let pt = PieceType::from_u8(from as u8).filter(|pt| pt.hand_index().is_some())?;
            Move::drop(pt, to)
        } else {
            if from >= Square::NUM {
                return None;
            }
            let from = Square::from_index(from);
            let pt = self.piece_on(from).piece_type()?;
            Move::normal(from, to, raw & (1 << 14) != 0, pt)
        };
        self.is_pseudo_legal(mv).then_some(mv)
    }

    // =========================================================================
    // 変換
    // =========================================================================

    /// 先後を入れ替えて盤を 180 度回転した局面
    pub fn flipped(&self) -> Position {
        let mut pos = Position::empty();
        for sq in Square::all() {
            let piece = self.piece_on(sq);
            if !piece.is_empty() {
                pos.put_piece(sq.flip(), piece.flip());
            }
        }
        for color in Color::ALL {
            for (pt, count) in self.hand(color).iter() {
                for _ in 0..count {
                    pos.add_hand(!color, pt);
                }
            }
        }
        pos.side_to_move = !self.side_to_move;
        pos.game_ply = self.game_ply;
        pos
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sfen())
    }
}
