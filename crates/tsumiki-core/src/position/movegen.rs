//! 指し手生成
//!
//! 生成する手は擬似合法手（自玉の安全と打ち歩詰めは `Position::do_move` で判定する）。
//! 呼び出し側が用意したバッファに追加する。
//!
//! - `generate_captures`: 駒を取る手と、駒を取らない歩の成り
//! - `generate_quiets`: それ以外の盤上の手と駒打ち
//! - `generate_evasions`: 王手回避手（玉の移動、王手駒の捕獲、合駒）

use crate::types::{Color, ExtMove, Move, Piece, PieceType, Square};

use super::{Position, between, for_each_destination};

/// 1 局面の指し手数の上限
pub const MAX_MOVES: usize = 600;

/// 行き所のない駒になる升か（成らなければならない）
#[inline]
pub fn must_promote(pt: PieceType, to: Square, color: Color) -> bool {
    let rank = to.relative_rank(color);
    match pt {
        PieceType::Pawn | PieceType::Lance => rank == 0,
        PieceType::Knight => rank <= 1,
        _ => false,
    }
}

/// `pt` を `to` に打てるか（二歩・行き所のない駒）。打ち歩詰めはここでは見ない
pub fn can_drop(pos: &Position, pt: PieceType, to: Square) -> bool {
    let us = pos.side_to_move();
    if must_promote(pt, to, us) {
        return false;
    }
    if pt == PieceType::Pawn {
        let own_pawn = Piece::new(us, PieceType::Pawn);
        let file = to.file();
        if (0..9).any(|rank| pos.piece_on(Square::new(file, rank)) == own_pawn) {
            return false;
        }
    }
    true
}

fn push_board_moves(moves: &mut Vec<ExtMove>, pos: &Position, from: Square, to: Square, pt: PieceType) {
    let us = pos.side_to_move();
    if pt.can_promote() && (from.in_promotion_zone(us) || to.in_promotion_zone(us)) {
        moves.push(ExtMove::new(Move::normal(from, to, true, pt), 0));
    }
    if !must_promote(pt, to, us) {
        moves.push(ExtMove::new(Move::normal(from, to, false, pt), 0));
    }
}

/// 駒を取る手と駒を取らない歩の成りを生成
pub fn generate_captures(pos: &Position, moves: &mut Vec<ExtMove>) {
    let us = pos.side_to_move();
    for from in Square::all() {
        let piece = pos.piece_on(from);
        if !piece.is_color(us) {
            continue;
        }
        let Some(pt) = piece.piece_type() else {
            continue;
        };
        for_each_destination(pos.board(), from, piece, |to| {
            let target = pos.piece_on(to);
            if !target.is_empty() {
                push_board_moves(moves, pos, from, to, pt);
            } else if pt == PieceType::Pawn && to.in_promotion_zone(us) {
                moves.push(ExtMove::new(Move::normal(from, to, true, pt), 0));
            }
        });
    }
}

/// 駒を取らない手（歩の成りを除く）と駒打ちを生成
pub fn generate_quiets(pos: &Position, moves: &mut Vec<ExtMove>) {
    generate_non_captures(pos, moves);
    generate_drops(pos, moves, |_| true);
}

fn generate_drops<F>(pos: &Position, moves: &mut Vec<ExtMove>, mut target: F)
where
    F: FnMut(Square) -> bool,
{
    let us = pos.side_to_move();
    let hand = *pos.hand(us);
    if hand.is_empty() {
        return;
    }
    for to in Square::all() {
        if !pos.piece_on(to).is_empty() || !target(to) {
            continue;
        }
        for (pt, count) in hand.iter() {
            if count > 0 && can_drop(pos, pt, to) {
                moves.push(ExtMove::new(Move::drop(pt, to), 0));
            }
        }
    }
}

/// 王手回避手を生成
pub fn generate_evasions(pos: &Position, moves: &mut Vec<ExtMove>) {
    let us = pos.side_to_move();
    let Some(king) = pos.king_square(us) else {
        return;
    };
    let checks = pos.checkers();

    let mut blocks = [false; Square::NUM];
    let mut checker_sq = None;
    if !checks.is_double() {
        if let Some(checker) = checks.checkers().next() {
            checker_sq = Some(checker);
            for sq in between(king, checker) {
                blocks[sq.index()] = true;
            }
        }
    }

    let mut candidates = Vec::with_capacity(MAX_MOVES);
    generate_captures(pos, &mut candidates);
    generate_non_captures(pos, &mut candidates);
    candidates.retain(|ext| {
        let mv = ext.mv;
        mv.from() == Some(king) || checker_sq == Some(mv.to()) || blocks[mv.to().index()]
    });
    moves.extend(candidates);
    // 駒打ちは合駒のみ
    if checker_sq.is_some() {
        generate_drops(pos, moves, |to| blocks[to.index()]);
    }
}

/// 駒を取らない盤上の手（歩の成りを除く）
fn generate_non_captures(pos: &Position, moves: &mut Vec<ExtMove>) {
    let us = pos.side_to_move();
    for from in Square::all() {
        let piece = pos.piece_on(from);
        if !piece.is_color(us) {
            continue;
        }
        let Some(pt) = piece.piece_type() else {
            continue;
        };
        for_each_destination(pos.board(), from, piece, |to| {
            if !pos.piece_on(to).is_empty() {
                return;
            }
            if pt == PieceType::Pawn {
                if !must_promote(pt, to, us) {
                    moves.push(ExtMove::new(Move::normal(from, to, false, pt), 0));
                }
            } else {
                push_board_moves(moves, pos, from, to, pt);
            }
        });
    }
}

/// 合法手をすべて生成
pub fn legal_moves(pos: &mut Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(MAX_MOVES);
    if pos.in_check() {
        generate_evasions(pos, &mut moves);
    } else {
        generate_captures(pos, &mut moves);
        generate_quiets(pos, &mut moves);
    }
    moves
        .into_iter()
        .map(|ext| ext.mv)
        .filter(|&mv| match pos.do_move(mv) {
            Some(captured) => {
                pos.undo_move(mv, captured);
                true
            }
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(usi: &str) -> Square {
        usi.parse().unwrap()
    }

    #[test]
    fn test_startpos_has_30_moves() {
        let mut pos = Position::startpos();
        assert_eq!(legal_moves(&mut pos).len(), 30);
    }

    #[test]
    fn test_captures_and_quiets_are_disjoint() {
        let pos =
            Position::from_sfen("lnsgkgsnl/1r5b1/pppppp1pp/6p2/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL b - 1").unwrap();
        let mut captures = Vec::new();
        let mut quiets = Vec::new();
        generate_captures(&pos, &mut captures);
        generate_quiets(&pos, &mut quiets);
        for c in &captures {
            assert!(!quiets.iter().any(|q| q.mv == c.mv));
        }
        // 角成り・不成の 2 通り
        assert_eq!(captures.len(), 2);
        assert!(captures.iter().all(|ext| pos.is_capture(ext.mv)));
    }

    #[test]
    fn test_nifu_and_dead_drops() {
        let pos = Position::from_sfen("4k4/9/9/9/9/9/4P4/9/4K4 b PNL 1").unwrap();
        assert!(!can_drop(&pos, PieceType::Pawn, sq("5e")));
        assert!(can_drop(&pos, PieceType::Pawn, sq("4e")));
        assert!(!can_drop(&pos, PieceType::Pawn, sq("4a")));
        assert!(!can_drop(&pos, PieceType::Lance, sq("4a")));
        assert!(can_drop(&pos, PieceType::Lance, sq("4b")));
        assert!(!can_drop(&pos, PieceType::Knight, sq("4b")));
        assert!(can_drop(&pos, PieceType::Knight, sq("4c")));
    }

    #[test]
    fn test_pawn_promotion_forced_on_last_rank() {
        let mut pos = Position::from_sfen("k8/4P4/9/9/9/9/9/9/K8 b - 1").unwrap();
        let moves = legal_moves(&mut pos);
        let pawn_moves: Vec<_> = moves.iter().filter(|mv| mv.from() == Some(sq("5b"))).collect();
        assert_eq!(pawn_moves.len(), 1);
        assert!(pawn_moves[0].is_promotion());
    }

    #[test]
    fn test_evasions_match_filtered_moves() {
        // 5一の飛車で王手。合駒・玉移動のみが合法
        let mut pos = Position::from_sfen("4r3k/9/9/9/9/9/9/3S5/4K4 b G 1").unwrap();
        assert!(pos.in_check());
        let legal = legal_moves(&mut pos);
        let mut all = Vec::new();
        generate_captures(&pos, &mut all);
        generate_quiets(&pos, &mut all);
        let mut brute: Vec<Move> = all
            .into_iter()
            .map(|ext| ext.mv)
            .filter(|&mv| match pos.do_move(mv) {
                Some(captured) => {
                    pos.undo_move(mv, captured);
                    true
                }
                None => false,
            })
            .collect();
        let mut legal_sorted = legal.clone();
        legal_sorted.sort_by_key(|mv| mv.to_u32());
        brute.sort_by_key(|mv| mv.to_u32());
        assert_eq!(legal_sorted, brute);
        assert!(legal.contains(&Move::drop(PieceType::Gold, sq("5e"))));
    }

    #[test]
    fn test_double_check_only_king_moves() {
        let mut pos = Position::from_sfen("4r3k/9/9/9/9/9/9/9/r3K4 b G 1").unwrap();
        assert!(pos.checkers().is_double());
        for mv in legal_moves(&mut pos) {
            assert_eq!(mv.from(), Some(sq("5i")));
        }
    }
}
