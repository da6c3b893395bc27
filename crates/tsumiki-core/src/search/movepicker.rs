//! 段階的な指し手生成
//!
//! 置換表の手 → SEE が負でない取る手 → キラー手 → 静かな手 → SEE が負の取る手
//! の順に、必要になった段階で生成・並べ替えする。
//! 王手を受けている局面・静止探索・ProbCut はそれぞれ専用の段階を持つ。

use super::history::{HISTORY_MAX, History};
use super::see::see;
use super::{GenPhase, Node, Tree};
use crate::eval::material;
use crate::position::{Position, movegen};
use crate::types::{DEPTH_1PLY, Depth, ExtMove, Move, PieceType, Score};

/// 静止探索でこの深さより深くなったら取る価値の低い手を除く
const QUIES2_DEPTH: Depth = -6 * DEPTH_1PLY;

/// 通常探索の指し手生成を始める（置換表の手を先頭に置く）
pub(super) fn generate_moves(tree: &mut Tree) {
    let node = tree.node_mut();
    node.reset_moves();
    if node.tt_move.is_some() {
        node.moves.push(ExtMove::new(node.tt_move, 0));
    }
    node.gen_phase = if node.check_state.is_check() { GenPhase::InitEvasions } else { GenPhase::Init };
}

/// 静止探索の指し手生成を始める
pub(super) fn generate_moves_on_quies(tree: &mut Tree, depth: Depth) {
    let node = tree.node_mut();
    node.reset_moves();
    node.gen_phase = if node.check_state.is_check() {
        GenPhase::InitEvasions
    } else if depth > QUIES2_DEPTH {
        GenPhase::InitQuies
    } else {
        GenPhase::InitQuies2
    };
}

/// ProbCut の指し手生成を始める（SEE が `threshold` 以上の取る手）
pub(super) fn generate_moves_on_prob_cut(tree: &mut Tree, threshold: Score) {
    let node = tree.node_mut();
    node.reset_moves();
    node.prob_threshold = threshold;
    if node.tt_move.is_some() {
        node.moves.push(ExtMove::new(node.tt_move, 0));
    }
    node.gen_phase = GenPhase::InitProb;
}

/// 次の指し手（尽きたら `Move::NONE`）
pub(super) fn next_move(tree: &mut Tree, history: &History) -> Move {
    let pos = &tree.position;
    let node = &mut tree.nodes[tree.ply];

    loop {
        match node.gen_phase {
            GenPhase::Init => {
                if let Some(mv) = pop(node) {
                    return mv;
                }
                movegen::generate_captures(pos, &mut node.moves);
                let tt_move = node.tt_move;
                retain_pending(node, |mv| mv != tt_move);
                sort_moves(pos, node, history, true);
                node.gen_phase = GenPhase::Captures;
            }

            GenPhase::Captures => {
                while node.has_next() {
                    let em = node.moves[node.cursor];
                    node.cursor += 1;
                    if see(pos, em.mv) >= Score::ZERO {
                        return em.mv;
                    }
                    // 読み終えた位置に詰めて最後に回す
                    node.moves[node.bad_capture_end] = em;
                    node.bad_capture_end += 1;
                }

                if !node.check_state.is_check() {
                    let killers = node.killers;
                    for (mv, good) in [(killers.move1, killers.is_good1()), (killers.move2, killers.is_good2())] {
                        if good && mv != node.tt_move && pos.is_pseudo_legal(mv) && !pos.is_capture(mv) {
                            node.moves.push(ExtMove::new(mv, 0));
                        }
                    }
                }
                node.gen_phase = GenPhase::Killers;
            }

            GenPhase::Killers => {
                if let Some(mv) = pop(node) {
                    return mv;
                }
                movegen::generate_quiets(pos, &mut node.moves);
                let (tt_move, killers) = (node.tt_move, node.killers);
                retain_pending(node, |mv| mv != tt_move && !killers.is_good_killer(mv));
                sort_moves(pos, node, history, false);
                node.gen_phase = GenPhase::Quiets;
            }

            GenPhase::Quiets => {
                if let Some(mv) = pop(node) {
                    return mv;
                }
                node.cursor = 0;
                node.moves.truncate(node.bad_capture_end);
                node.gen_phase = GenPhase::BadCaptures;
            }

            GenPhase::BadCaptures => {
                if let Some(mv) = pop(node) {
                    return mv;
                }
                node.gen_phase = GenPhase::End;
            }

            GenPhase::InitEvasions => {
                if let Some(mv) = pop(node) {
                    return mv;
                }
                movegen::generate_evasions(pos, &mut node.moves);
                let tt_move = node.tt_move;
                retain_pending(node, |mv| mv != tt_move);
                sort_moves(pos, node, history, true);
                node.gen_phase = GenPhase::Evasions;
            }

            GenPhase::Evasions => {
                if let Some(mv) = pop(node) {
                    return mv;
                }
                node.gen_phase = GenPhase::End;
            }

            GenPhase::InitQuies | GenPhase::InitQuies2 => {
                movegen::generate_captures(pos, &mut node.moves);
                sort_moves(pos, node, history, true);
                node.gen_phase =
                    if node.gen_phase == GenPhase::InitQuies { GenPhase::Quies } else { GenPhase::Quies2 };
            }

            GenPhase::Quies | GenPhase::Quies2 => {
                let skip_small = node.gen_phase == GenPhase::Quies2;
                while node.has_next() {
                    let mv = node.moves[node.cursor].mv;
                    node.cursor += 1;
                    if skip_small && is_small_gain(pos, mv) {
                        continue;
                    }
                    if see(pos, mv) < Score::ZERO {
                        continue;
                    }
                    return mv;
                }
                node.gen_phase = GenPhase::End;
            }

            GenPhase::InitProb => {
                if let Some(mv) = pop(node) {
                    return mv;
                }
                movegen::generate_captures(pos, &mut node.moves);
                let tt_move = node.tt_move;
                retain_pending(node, |mv| mv != tt_move);
                sort_moves(pos, node, history, true);
                node.gen_phase = GenPhase::ProbCaptures;
            }

            GenPhase::ProbCaptures => {
                while node.has_next() {
                    let mv = node.moves[node.cursor].mv;
                    node.cursor += 1;
                    if see(pos, mv) >= node.prob_threshold {
                        return mv;
                    }
                }
                node.gen_phase = GenPhase::End;
            }

            GenPhase::End => return Move::NONE,
        }
    }
}

#[inline]
fn pop(node: &mut Node) -> Option<Move> {
    if node.has_next() {
        let mv = node.moves[node.cursor].mv;
        node.cursor += 1;
        Some(mv)
    } else {
        None
    }
}

/// まだ返していない手のうち `keep` を満たすものだけ残す
fn retain_pending<F>(node: &mut Node, keep: F)
where
    F: Fn(Move) -> bool,
{
    let mut write = node.cursor;
    for read in node.cursor..node.moves.len() {
        let em = node.moves[read];
        if keep(em.mv) {
            node.moves[write] = em;
            write += 1;
        }
    }
    node.moves.truncate(write);
}

/// 歩を成らずに取る手と、歩以外で駒を取らない手（末端の静止探索では読まない）
fn is_small_gain(pos: &Position, mv: Move) -> bool {
    let captured = pos.piece_on(mv.to()).piece_type();
    (captured == Some(PieceType::Pawn) && !mv.is_promotion())
        || (captured.is_none() && mv.piece_type() != Some(PieceType::Pawn))
}

/// 未返却の手を並べ替える
///
/// 取る手は MVV-LVA 風（取られる駒 − 取る駒）で、静かな手より必ず前に来るよう底上げする。
/// 静かな手は History の値。
fn sort_moves(pos: &Position, node: &mut Node, history: &History, captures: bool) {
    let turn = pos.side_to_move();
    let cursor = node.cursor;
    for em in &mut node.moves[cursor..] {
        em.value = if captures && pos.is_capture(em.mv) {
            let captured = pos.piece_on(em.mv.to()).piece_type().map_or(0, material::exchange_value);
            let aggressor = em.mv.piece_type().map_or(0, material::exchange_value);
            captured - aggressor + HISTORY_MAX * 2
        } else {
            history.get(turn, em.mv)
        };
    }
    node.moves[cursor..].sort_by(|a, b| b.value.cmp(&a.value));
}
