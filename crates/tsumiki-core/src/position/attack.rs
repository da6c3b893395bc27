//! 駒の利き
//!
//! 盤面配列（mailbox）上で利きを求める。方向は先手視点で定義し、
//! 後手の駒は段方向を反転して扱う。
//! SEE のように一時的な盤面で利きを数えたい場合にも使えるよう、
//! `Position` ではなく盤面配列を受け取る関数として実装している。

use crate::types::{Color, Piece, PieceType, Square};

/// 先手視点の 8 方向 (筋, 段)。段 -1 が前方
pub(crate) const DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),  // 前
    (1, -1),  // 斜め前
    (-1, -1), // 斜め前
    (1, 0),   // 横
    (-1, 0),  // 横
    (0, 1),   // 後
    (1, 1),   // 斜め後
    (-1, 1),  // 斜め後
];

/// 桂馬の跳び先（先手視点）
pub(crate) const KNIGHT_JUMPS: [(i8, i8); 2] = [(1, -2), (-1, -2)];

const FRONT: u8 = 1 << 0;
const DIAG_FRONT: u8 = 1 << 1 | 1 << 2;
const SIDE: u8 = 1 << 3 | 1 << 4;
const BACK: u8 = 1 << 5;
const DIAG_BACK: u8 = 1 << 6 | 1 << 7;
const ORTHOGONAL: u8 = FRONT | SIDE | BACK;
const DIAGONAL: u8 = DIAG_FRONT | DIAG_BACK;
const GOLD: u8 = FRONT | DIAG_FRONT | SIDE | BACK;

/// 1 マスだけ動ける方向のマスク
#[inline]
pub(crate) const fn step_mask(pt: PieceType) -> u8 {
    match pt {
        PieceType::Pawn => FRONT,
        PieceType::Silver => FRONT | DIAGONAL,
        PieceType::Gold
        | PieceType::ProPawn
        | PieceType::ProLance
        | PieceType::ProKnight
        | PieceType::ProSilver => GOLD,
        PieceType::King => ORTHOGONAL | DIAGONAL,
        PieceType::Horse => ORTHOGONAL,
        PieceType::Dragon => DIAGONAL,
        PieceType::Lance | PieceType::Knight | PieceType::Bishop | PieceType::Rook => 0,
    }
}

/// 遠くまで動ける方向のマスク
#[inline]
pub(crate) const fn slide_mask(pt: PieceType) -> u8 {
    match pt {
        PieceType::Lance => FRONT,
        PieceType::Bishop | PieceType::Horse => DIAGONAL,
        PieceType::Rook | PieceType::Dragon => ORTHOGONAL,
        _ => 0,
    }
}

/// 手番に応じて先手視点の方向を盤面上の変位に直す
#[inline]
pub(crate) const fn orient(color: Color, (df, dr): (i8, i8)) -> (i8, i8) {
    match color {
        Color::Black => (df, dr),
        Color::White => (df, -dr),
    }
}

/// `sq` に利いている `by` 側の駒を順に `f` へ渡す。`f` が true を返すと打ち切って true を返す
pub(crate) fn scan_attackers<F>(board: &[Piece; Square::NUM], sq: Square, by: Color, mut f: F) -> bool
where
    F: FnMut(Square, PieceType) -> bool,
{
    for (i, &dir) in DIRECTIONS.iter().enumerate() {
        let bit = 1u8 << i;
        let (df, dr) = orient(by, dir);
        let mut cur = sq;
        let mut distance = 0;
        // 攻め駒は sq から移動方向の逆側にいる
        while let Some(next) = cur.offset(-df, -dr) {
            distance += 1;
            cur = next;
            let piece = board[next.index()];
            if piece.is_empty() {
                continue;
            }
            if piece.is_color(by) {
                if let Some(pt) = piece.piece_type() {
                    let hit = (distance == 1 && step_mask(pt) & bit != 0) || slide_mask(pt) & bit != 0;
                    if hit && f(next, pt) {
                        return true;
                    }
                }
            }
            break;
        }
    }
    for &jump in &KNIGHT_JUMPS {
        let (df, dr) = orient(by, jump);
        if let Some(from) = sq.offset(-df, -dr) {
            let piece = board[from.index()];
            if piece.is_color(by) && piece.piece_type() == Some(PieceType::Knight) && f(from, PieceType::Knight) {
                return true;
            }
        }
    }
    false
}

/// `sq` に `by` 側の利きがあるか
#[inline]
pub(crate) fn is_attacked(board: &[Piece; Square::NUM], sq: Square, by: Color) -> bool {
    scan_attackers(board, sq, by, |_, _| true)
}

/// 王手の状態（王手している駒の位置、最大 2 つ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckState {
    checkers: [Option<Square>; 2],
}

impl CheckState {
    /// 王手なし
    pub const NONE: CheckState = CheckState { checkers: [None, None] };

    pub(crate) fn from_board(board: &[Piece; Square::NUM], king: Square, by: Color) -> CheckState {
        let mut state = CheckState::NONE;
        let mut n = 0;
        scan_attackers(board, king, by, |from, _| {
            state.checkers[n] = Some(from);
            n += 1;
            n == 2
        });
        state
    }

    /// 1 マス目の王手駒を指定して生成
    pub fn single(sq: Square) -> CheckState {
        CheckState { checkers: [Some(sq), None] }
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.checkers[0].is_some()
    }

    #[inline]
    pub fn is_double(&self) -> bool {
        self.checkers[1].is_some()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.checkers.iter().flatten().count()
    }

    /// 王手している駒の位置
    pub fn checkers(&self) -> impl Iterator<Item = Square> + '_ {
        self.checkers.iter().flatten().copied()
    }
}

/// `from` にいる `piece` の移動先を列挙する（自駒のいる升は除く）
pub(crate) fn for_each_destination<F>(board: &[Piece; Square::NUM], from: Square, piece: Piece, mut f: F)
where
    F: FnMut(Square),
{
    let (Some(pt), Some(color)) = (piece.piece_type(), piece.color()) else {
        return;
    };
    let steps = step_mask(pt);
    let slides = slide_mask(pt);
    for (i, &dir) in DIRECTIONS.iter().enumerate() {
        let bit = 1u8 << i;
        if (steps | slides) & bit == 0 {
            continue;
        }
        let (df, dr) = orient(color, dir);
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            let target = board[to.index()];
            if target.is_color(color) {
                break;
            }
            f(to);
            if !target.is_empty() || slides & bit == 0 {
                break;
            }
            cur = to;
        }
    }
    if pt == PieceType::Knight {
        for &jump in &KNIGHT_JUMPS {
            let (df, dr) = orient(color, jump);
            if let Some(to) = from.offset(df, dr) {
                if !board[to.index()].is_color(color) {
                    f(to);
                }
            }
        }
    }
}

/// `a` と `b` の間の升（同一直線上にない場合や隣接している場合は空）
pub(crate) fn between(a: Square, b: Square) -> impl Iterator<Item = Square> {
    let df = (b.file() as i8 - a.file() as i8).signum();
    let dr = (b.rank() as i8 - a.rank() as i8).signum();
    let aligned = a.file() == b.file()
        || a.rank() == b.rank()
        || (a.file() as i8 - b.file() as i8).abs() == (a.rank() as i8 - b.rank() as i8).abs();
    let mut cur = if aligned && a != b { a.offset(df, dr) } else { None };
    std::iter::from_fn(move || {
        let sq = cur?;
        if sq == b {
            cur = None;
            return None;
        }
        cur = sq.offset(df, dr);
        Some(sq)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board() -> [Piece; Square::NUM] {
        [Piece::EMPTY; Square::NUM]
    }

    #[test]
    fn test_pawn_attacks_forward_only() {
        let mut board = empty_board();
        board[Square::new(4, 5).index()] = Piece::new(Color::Black, PieceType::Pawn);
        assert!(is_attacked(&board, Square::new(4, 4), Color::Black));
        assert!(!is_attacked(&board, Square::new(4, 6), Color::Black));

        board[Square::new(2, 3).index()] = Piece::new(Color::White, PieceType::Pawn);
        assert!(is_attacked(&board, Square::new(2, 4), Color::White));
        assert!(!is_attacked(&board, Square::new(2, 2), Color::White));
    }

    #[test]
    fn test_slider_blocked() {
        let mut board = empty_board();
        board[Square::new(0, 8).index()] = Piece::new(Color::Black, PieceType::Lance);
        assert!(is_attacked(&board, Square::new(0, 0), Color::Black));
        board[Square::new(0, 4).index()] = Piece::new(Color::White, PieceType::Pawn);
        assert!(is_attacked(&board, Square::new(0, 4), Color::Black));
        assert!(!is_attacked(&board, Square::new(0, 3), Color::Black));
    }

    #[test]
    fn test_knight_and_check_state() {
        let mut board = empty_board();
        let king = Square::new(4, 0);
        board[king.index()] = Piece::new(Color::White, PieceType::King);
        board[Square::new(3, 2).index()] = Piece::new(Color::Black, PieceType::Knight);
        board[Square::new(4, 5).index()] = Piece::new(Color::Black, PieceType::Rook);
        let state = CheckState::from_board(&board, king, Color::Black);
        assert!(state.is_check());
        assert!(state.is_double());
        assert_eq!(state.count(), 2);
    }

    #[test]
    fn test_between_squares() {
        let a = Square::new(4, 0);
        let b = Square::new(4, 4);
        let squares: Vec<_> = between(a, b).collect();
        assert_eq!(squares, vec![Square::new(4, 1), Square::new(4, 2), Square::new(4, 3)]);
        assert_eq!(between(a, Square::new(5, 2)).count(), 0);
        assert_eq!(between(a, Square::new(6, 2)).count(), 1);
    }
}
