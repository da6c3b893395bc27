//! 静的交換評価（SEE）
//!
//! 移動先の升で駒の取り合いを続けたときの駒得を、
//! 双方が最も安い駒から取り返す前提で求める。
//! 盤面のコピーから取った駒を取り除きながら利きを数え直すので、
//! 飛び駒の背後からの利き（x-ray）も反映される。

use crate::eval::material;
use crate::position::{Position, scan_attackers};
use crate::types::{Color, Move, Piece, PieceType, Score, Square};

/// 取り合いの最大手数
const MAX_EXCHANGES: usize = 40;

/// 玉を取られることは他のどの交換より大きな損として扱う
const KING_VALUE: i32 = 15_000;

#[inline]
fn see_value(pt: PieceType) -> i32 {
    if pt == PieceType::King { KING_VALUE } else { material::exchange_value(pt) }
}

/// 指し手 `mv` の交換値（指した側の視点）
pub fn see(pos: &Position, mv: Move) -> Score {
    let Some(moved) = mv.piece_type_after() else {
        return Score::ZERO;
    };
    let to = mv.to();
    let us = pos.side_to_move();
    let mut board = *pos.board();

    let mut gain = [0i32; MAX_EXCHANGES];
    gain[0] = board[to.index()].piece_type().map_or(0, see_value);
    if mv.is_promotion() {
        if let Some(pt) = mv.piece_type() {
            gain[0] += material::promotion_value(pt);
        }
    }

    if let Some(from) = mv.from() {
        board[from.index()] = Piece::EMPTY;
    }
    board[to.index()] = Piece::new(us, moved);
    let mut on_square = see_value(moved);
    let mut side = us.opponent();

    let mut d = 0;
    while d + 1 < MAX_EXCHANGES {
        let Some((sq, pt)) = least_valuable_attacker(&board, to, side) else {
            break;
        };
        d += 1;
        gain[d] = on_square - gain[d - 1];
        if (-gain[d - 1]).max(gain[d]) < 0 {
            break;
        }
        on_square = see_value(pt);
        board[sq.index()] = Piece::EMPTY;
        board[to.index()] = Piece::new(side, pt);
        side = side.opponent();
    }

    while d > 0 {
        gain[d - 1] = -(-gain[d - 1]).max(gain[d]);
        d -= 1;
    }
    Score::new(gain[0])
}

fn least_valuable_attacker(board: &[Piece; Square::NUM], to: Square, by: Color) -> Option<(Square, PieceType)> {
    let mut best: Option<(Square, PieceType)> = None;
    scan_attackers(board, to, by, |sq, pt| {
        if best.is_none_or(|(_, b)| see_value(pt) < see_value(b)) {
            best = Some((sq, pt));
        }
        false
    });
    best
}
