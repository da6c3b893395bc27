//! 静止探索
//!
//! 駒を取る手（王手されていれば王手回避手）だけを読み、局面が落ち着くまで延長する。

use super::alpha_beta::SearchContext;
use super::movepicker::{generate_moves_on_quies, next_move};
use super::stats::inc_stat;
use super::{STACK_SIZE, Tree};
use crate::position::mate::mate_in_one;
use crate::tt::Bound;
use crate::types::{DEPTH_1PLY, Depth, Move, Score};

/// 静止探索（`depth` は 0 から負の方向へ進む）
pub(super) fn quies(ctx: &SearchContext<'_>, tree: &mut Tree, depth: Depth, alpha: Score, beta: Score) -> Score {
    tree.visit();
    tree.info.quies_nodes += 1;
    tree.nodes_searched += 1;
    if ctx.check_abort(tree) {
        return Score::ZERO;
    }

    let ply = tree.ply as i32;
    let in_check = tree.node().check_state.is_check();
    let mut best = alpha;

    if !in_check {
        let stand_pat = tree.stand_pat(ctx.evaluator);
        if stand_pat > best {
            best = stand_pat;
            if best >= beta {
                return best;
            }
        }
    } else {
        best = best.max(Score::lose_in(ply));
    }

    if tree.ply >= STACK_SIZE - 2 {
        tree.node_mut().is_historical = true;
        return tree.stand_pat(ctx.evaluator);
    }

    // 置換表
    let is_null_window = alpha + 1 == beta;
    if let Some(tt) = ctx.tt.probe(tree.node().key) {
        let score = tt.score(ply);
        let is_mate = (score <= -Score::MATE && tt.bound.is_upper()) || (score >= Score::MATE && tt.bound.is_lower());
        if is_null_window && (tt.depth >= depth || is_mate) {
            let cut = match tt.bound {
                Bound::Exact => true,
                Bound::Upper => score <= best,
                Bound::Lower => score >= beta,
                Bound::None => false,
            };
            if cut {
                tree.info.hash_cut += 1;
                return score;
            }
        }
    }

    if !in_check && mate_in_one(&mut tree.position).is_some() {
        inc_stat!(tree, mate_in_one);
        return Score::win_in(ply + 1);
    }

    generate_moves_on_quies(tree, depth);
    loop {
        let mv = next_move(tree, ctx.history);
        if mv.is_none() {
            break;
        }

        if !in_check && !tree.position.gives_check(mv) {
            let futility = tree.estimate(mv, ctx.evaluator) + ctx.params.fut_prun_margin;
            if futility <= alpha {
                tree.info.futility_pruning += 1;
                continue;
            }
        }

        if !tree.do_move(mv, ctx.evaluator) {
            continue;
        }
        let score = -quies(ctx, tree, depth - DEPTH_1PLY, -beta, -best);
        let child_historical = tree.node().is_historical;
        tree.undo_move();

        if ctx.is_interrupted(tree) {
            return Score::ZERO;
        }

        tree.node_mut().is_historical |= child_historical;
        if score > best {
            best = score;
            let child_pv = tree.nodes[tree.ply + 1].pv.clone();
            tree.node_mut().pv.set(mv, 0, &child_pv);
            if best >= beta {
                break;
            }
        }
    }

    if !tree.node().is_historical {
        let status = ctx.tt.store(tree.node().key, alpha, beta, best, depth, ply, Move::NONE, false);
        tree.info.count_store(status);
    }
    best
}
