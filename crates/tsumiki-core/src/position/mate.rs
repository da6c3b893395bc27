//! 1 手詰め判定

use crate::types::Move;

use super::{Position, movegen};

/// 手番側に 1 手で詰ます手があれば返す
///
/// 王手になる手を順に指してみて、相手に合法手がなければ詰み。
/// 打ち歩詰めは `do_move` が拒否するので候補に残らない。
pub fn mate_in_one(pos: &mut Position) -> Option<Move> {
    let mut moves = Vec::with_capacity(movegen::MAX_MOVES);
    if pos.in_check() {
        movegen::generate_evasions(pos, &mut moves);
    } else {
        movegen::generate_captures(pos, &mut moves);
        movegen::generate_quiets(pos, &mut moves);
    }
    for ext in moves {
        let mv = ext.mv;
        if !pos.gives_check(mv) {
            continue;
        }
        let Some(captured) = pos.do_move(mv) else {
            continue;
        };
        let mated = !pos.has_legal_move();
        pos.undo_move(mv, captured);
        if mated {
            return Some(mv);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceType;

    #[test]
    fn test_mate_in_one_gold_drop() {
        let mut pos = Position::from_sfen("4k4/9/4P4/9/9/9/9/9/K8 b G 1").unwrap();
        let before = pos.clone();
        let mv = mate_in_one(&mut pos).unwrap();
        assert_eq!(mv, Move::drop(PieceType::Gold, "5b".parse().unwrap()));
        assert_eq!(pos, before);
    }

    #[test]
    fn test_mate_in_one_flipped() {
        let mut pos = Position::from_sfen("4k4/9/4P4/9/9/9/9/9/K8 b G 1").unwrap().flipped();
        let mv = mate_in_one(&mut pos).unwrap();
        assert_eq!(mv, Move::drop(PieceType::Gold, "5h".parse().unwrap()));
    }

    #[test]
    fn test_no_mate_in_one() {
        let mut pos = Position::startpos();
        assert_eq!(mate_in_one(&mut pos), None);
    }

    #[test]
    fn test_pawn_drop_mate_is_not_mate_in_one() {
        let mut pos = Position::from_sfen("7nk/7s1/7G1/9/9/9/9/9/K8 b P 1").unwrap();
        assert_eq!(mate_in_one(&mut pos), None);
    }
}
