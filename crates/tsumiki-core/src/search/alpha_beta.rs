//! Alpha-Beta探索
//!
//! 1スレッド分の通常探索。探索木（`Tree`）を進めながら、
//! 共有の置換表・History・評価関数を `SearchContext` 経由で参照する。
//!
//! ノードごとの処理順:
//! 1. SHEK による同一局面・優越局面の判定
//! 2. 置換表のカット
//! 3. 1手詰め
//! 4. Futility Pruning / Razoring / Null Move Pruning / ProbCut
//! 5. Recursive Iterative Deepening / Singular Extension の検証探索
//! 6. 指し手ループ（延長・LMR・PVS）

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::config::SearchParams;
use super::history::History;
use super::movepicker::{generate_moves, generate_moves_on_prob_cut, next_move};
use super::qsearch::quies;
use super::stats::inc_stat;
use super::tree::CHECK_INTERVAL;
use super::{NodeStat, STACK_SIZE, Tree};
use crate::eval::Evaluator;
use crate::position::mate::mate_in_one;
use crate::shek::{ScrState, ShekState};
use crate::tt::TranspositionTable;
use crate::types::{DEPTH_1PLY, Depth, Move, Score};

/// 探索中に共有する参照
pub struct SearchContext<'a> {
    /// 置換表への参照
    pub tt: &'a TranspositionTable,
    /// 履歴テーブルへの参照
    pub history: &'a History,
    pub evaluator: &'a dyn Evaluator,
    pub params: &'a SearchParams,
    /// 全スレッド共通の停止フラグ
    pub stop: &'a AtomicBool,
    pub start: Instant,
    /// これを超えたら探索を打ち切る
    pub maximum: Option<Duration>,
    /// 1スレッドあたりのノード数上限
    pub max_nodes: Option<u64>,
    /// `params` から作った LMR の削減量
    pub reductions: &'a Reductions,
}

impl SearchContext<'_> {
    /// 中断すべきか（停止フラグ・時間・ノード数を `CHECK_INTERVAL` ごとに確認する）
    pub(super) fn check_abort(&self, tree: &mut Tree) -> bool {
        if tree.aborted {
            return true;
        }

        tree.calls_cnt -= 1;
        if tree.calls_cnt > 0 {
            return false;
        }
        tree.calls_cnt = CHECK_INTERVAL;

        let stopped = self.stop.load(Ordering::Relaxed)
            || self.maximum.is_some_and(|max| self.start.elapsed() >= max);
        let node_limit = self.max_nodes.is_some_and(|max| tree.nodes_searched >= max);
        // ヘルパーはノード数上限に達しても自分だけ止まる
        if stopped || (node_limit && tree.thread_index == 0) {
            self.stop.store(true, Ordering::Relaxed);
        }
        if stopped || node_limit {
            tree.aborted = true;
        }
        tree.aborted
    }

    #[inline]
    pub(super) fn is_interrupted(&self, tree: &Tree) -> bool {
        tree.aborted
    }
}

/// Late Move Reduction の削減量の表
///
/// [null window か][残り深さ(手数)][手の順番]。係数 `reduction_rate1`/`reduction_rate2`
/// を変えたら作り直す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reductions {
    table: Box<[[[Depth; 64]; 64]; 2]>,
}

impl Reductions {
    pub fn new(params: &SearchParams) -> Reductions {
        let mut table = Box::new([[[0; 64]; 64]; 2]);
        let rate1 = params.reduction_rate1 as f64;
        let rate2 = params.reduction_rate2 as f64;
        for d in 1..64 {
            for mc in 0..64 {
                let r = 0.05 * rate1 * (d as f64).ln() + 0.08 * rate2 * ((mc + 1) as f64).ln();
                if r < 0.8 {
                    continue;
                }
                table[0][d][mc] = ((r - 1.0).max(0.0) * DEPTH_1PLY as f64) as Depth;
                table[1][d][mc] = (r * DEPTH_1PLY as f64) as Depth;
            }
        }
        Reductions { table }
    }

    /// 削減量
    #[inline]
    pub fn get(&self, depth: Depth, null_window: bool, move_count: usize) -> Depth {
        let d = ((depth / DEPTH_1PLY).max(0) as usize).min(63);
        let mc = move_count.min(63);
        self.table[null_window as usize][d][mc]
    }
}

/// Recursive Iterative Deepening の浅い探索の深さ
#[inline]
fn rid_depth(depth: Depth) -> Depth {
    if depth < 4 * DEPTH_1PLY { DEPTH_1PLY } else { depth - 3 * DEPTH_1PLY }
}

/// 通常探索
pub(super) fn search(
    ctx: &SearchContext<'_>,
    tree: &mut Tree,
    depth: Depth,
    alpha: Score,
    beta: Score,
    mut stat: NodeStat,
) -> Score {
    if stat.root {
        tree.visit_root();
    } else {
        tree.visit();
    }
    let ply = tree.ply as i32;

    // 同一局面・優越局面
    match tree.shek_state() {
        ShekState::Equal4 => {
            tree.node_mut().is_historical = true;
            match tree.scr.detect(&*tree) {
                ScrState::Draw => return Score::ZERO,
                ScrState::Win => return Score::win_in(ply),
                ScrState::Lose => return Score::lose_in(ply),
                ScrState::None => {}
            }
        }
        ShekState::Superior => {
            tree.node_mut().is_historical = true;
            return Score::win_in(ply);
        }
        ShekState::Inferior => {
            tree.node_mut().is_historical = true;
            return Score::lose_in(ply);
        }
        ShekState::Equal | ShekState::None => {}
    }

    if depth < DEPTH_1PLY {
        return quies(ctx, tree, 0, alpha, beta);
    }

    tree.info.nodes += 1;
    tree.nodes_searched += 1;
    if ctx.check_abort(tree) {
        return Score::ZERO;
    }

    if tree.ply >= STACK_SIZE - 2 {
        tree.node_mut().is_historical = true;
        return tree.stand_pat(ctx.evaluator);
    }

    // 手数による枝刈り
    let lower = Score::lose_in(ply);
    let upper = Score::win_in(ply) - 1;
    if lower >= beta {
        return lower;
    }
    if upper <= alpha {
        return upper;
    }

    let is_null_window = alpha + 1 == beta;
    let in_check = tree.node().check_state.is_check();
    let params = ctx.params;

    // 置換表
    let mut tt_score = -Score::INFINITY;
    let mut tt_depth: Depth = 0;
    let mut tt_lower = false;
    if tree.node().excluded_move.is_none()
        && let Some(tt) = ctx.tt.probe(tree.node().key)
    {
        tt_score = tt.score(ply);
        tt_depth = tt.depth;
        tt_lower = tt.bound.is_lower();
        let tt_upper = tt.bound.is_upper();
        let is_mate = (tt_score <= -Score::MATE && tt_upper) || (tt_score >= Score::MATE && tt_lower);

        if stat.hash_cut
            && is_null_window
            && (tt_depth >= depth || is_mate)
            && (if tt_score <= alpha { tt_upper } else { tt_lower })
        {
            if !in_check
                && let Some(mv) = tree.position.to_move(tt.mv)
                && !tree.position.is_capture(mv)
            {
                ctx.history.update(tree.position.side_to_move(), mv, tt_depth, &[]);
            }
            tree.info.hash_cut += 1;
            return tt_score;
        }

        if depth < 3 * DEPTH_1PLY || tt_depth >= rid_depth(depth) {
            if tt_score < beta && tt_upper {
                stat.null_move_search = false;
            }
            if let Some(mv) = tree.position.to_move(tt.mv) {
                tree.node_mut().tt_move = mv;
            }
        }

        if tt.mate_threat {
            stat = stat.with_mate_threat();
        }
    }

    // 1手詰め
    if stat.mate_detection && !in_check && mate_in_one(&mut tree.position).is_some() {
        inc_stat!(tree, mate_in_one);
        return Score::win_in(ply + 1);
    }

    let stand_pat = tree.stand_pat(ctx.evaluator);

    // Futility Pruning
    if !in_check && depth < params.fut_prun_max_depth {
        let margin = depth * params.fut_prun_margin_rate;
        if stand_pat - margin >= beta {
            tree.info.futility_pruning += 1;
            return stand_pat - margin;
        }
    }

    // Razoring
    if is_null_window && !in_check && depth < 4 * DEPTH_1PLY && tree.node().tt_move.is_none() {
        let margin = params.razor_margins[(depth / DEPTH_1PLY) as usize];
        if stand_pat + margin <= alpha {
            let razor_alpha = alpha - margin;
            let score = quies(ctx, tree, 0, razor_alpha, razor_alpha + 1);
            if score <= razor_alpha {
                tree.info.razoring += 1;
                return score;
            }
            tree.revisit();
        }
    }

    // Null Move Pruning
    if is_null_window && stand_pat >= beta && stat.null_move_search && !in_check && !stat.mate_threat {
        inc_stat!(tree, null_move_attempted);
        let vrate = params.null_depth_vrate.max(1);
        let null_depth = depth * params.null_depth_rate / 16
            - params.null_depth_reduce
            - (DEPTH_1PLY * (stand_pat - beta).raw() / vrate).max(0);

        tree.do_null_move();
        let score = if null_depth < DEPTH_1PLY {
            -quies(ctx, tree, 0, -beta, -beta + 1)
        } else {
            -search(ctx, tree, null_depth, -beta, -beta + 1, NodeStat::normal().without_null_move())
        };
        let child_historical = tree.node().is_historical;
        tree.undo_null_move();

        if ctx.is_interrupted(tree) {
            return Score::ZERO;
        }

        if score >= beta {
            tree.node_mut().is_historical = child_historical;
            tree.info.null_move_pruning += 1;
            if !child_historical {
                let status = ctx.tt.store(tree.node().key, alpha, beta, score, depth, ply, Move::NONE, false);
                tree.info.count_store(status);
            }
            return score;
        }
        if score < -Score::MATE {
            stat = stat.with_mate_threat();
        }
    }

    // ProbCut
    if is_null_window && beta > -Score::MATE && beta < Score::MATE && depth >= 5 * DEPTH_1PLY && !in_check {
        inc_stat!(tree, prob_cut_attempted);
        let prob_beta = beta + params.probcut_margin;
        let new_depth = depth - 4 * DEPTH_1PLY;
        generate_moves_on_prob_cut(tree, prob_beta - stand_pat);
        loop {
            let mv = next_move(tree, ctx.history);
            if mv.is_none() {
                break;
            }
            if !tree.do_move(mv, ctx.evaluator) {
                continue;
            }
            let score = -search(ctx, tree, new_depth, -prob_beta, -prob_beta + 1, NodeStat::normal());
            tree.undo_move();

            if ctx.is_interrupted(tree) {
                return Score::ZERO;
            }
            if score >= prob_beta {
                tree.info.prob_cut += 1;
                return score;
            }
        }
    }

    // Recursive Iterative Deepening
    if depth >= 3 * DEPTH_1PLY && tree.node().tt_move.is_none() && stat.recursive_id_search && !in_check {
        inc_stat!(tree, recursive_id);
        let rid_stat = NodeStat::normal().without_null_move().without_hash_cut().without_mate_detection();
        search(ctx, tree, rid_depth(depth), alpha, beta, rid_stat);

        if ctx.is_interrupted(tree) {
            return Score::ZERO;
        }

        tree.revisit();
        if let Some(tt) = ctx.tt.probe(tree.node().key)
            && let Some(mv) = tree.position.to_move(tt.mv)
        {
            tree.node_mut().tt_move = mv;
            tt_score = tt.score(ply);
            tt_depth = tt.depth;
            tt_lower = tt.bound.is_lower();
        }
    }

    // Singular Extension
    let tt_move = tree.node().tt_move;
    let mut do_singular = false;
    if tt_move.is_some()
        && tree.node().excluded_move.is_none()
        && depth >= 8 * DEPTH_1PLY
        && !in_check
        && !(stat.recapture_extension && tree.is_recapture(tt_move))
        && tree.position.is_pseudo_legal(tt_move)
        && !tree.position.gives_check(tt_move)
        && tt_lower
        && tt_depth >= depth - 3 * DEPTH_1PLY
        && tt_score > -Score::MATE
        && tt_score < Score::MATE
    {
        inc_stat!(tree, singular_attempted);
        let singular_beta = tt_score - 3 * depth / DEPTH_1PLY;
        let singular_stat = stat.without_null_move().without_hash_cut().without_mate_detection();
        tree.node_mut().excluded_move = tt_move;
        let score = search(ctx, tree, depth / 2, singular_beta - 1, singular_beta, singular_stat);
        tree.node_mut().excluded_move = Move::NONE;

        if ctx.is_interrupted(tree) {
            return Score::ZERO;
        }

        do_singular = score < singular_beta;
        tree.revisit();
        tree.node_mut().tt_move = tt_move;
    }

    // 指し手ループ
    let turn = tree.position.side_to_move();
    let excluded_move = tree.node().excluded_move;
    let mut best = lower;
    let mut best_move = Move::NONE;
    let mut is_first = true;
    let mut move_count = 0usize;
    generate_moves(tree);

    loop {
        let mv = next_move(tree, ctx.history);
        if mv.is_none() {
            break;
        }
        if mv == excluded_move {
            continue;
        }

        let gives_check = tree.position.gives_check(mv);
        let mut new_depth = depth - DEPTH_1PLY;
        let mut child_stat = NodeStat::normal();

        // 延長
        if gives_check {
            new_depth += params.ext_depth_check;
        } else if is_first && in_check && is_last_move(tree) {
            new_depth += params.ext_depth_one_reply;
        } else if !in_check && stat.recapture_extension && tree.is_recapture(mv) {
            new_depth += params.ext_depth_recapture;
            stat.recapture_extension = false;
            child_stat = child_stat.without_recapture_extension();
        } else if do_singular && mv == tt_move {
            new_depth += DEPTH_1PLY;
            tree.info.singular_extension += 1;
        }

        let is_prior = tree.node().is_prior_move(mv);

        // Late Move Reduction
        let mut reduced: Depth = 0;
        if !is_first
            && new_depth >= DEPTH_1PLY
            && !in_check
            && !tree.is_tactical(mv)
            && !is_prior
            && !stat.mate_threat
        {
            reduced = ctx.reductions.get(new_depth, is_null_window, move_count);
            if reduced != 0 {
                inc_stat!(tree, lmr_applied);
            }
        }

        let new_alpha = alpha.max(best);

        // Futility Pruning（LMR で削った後の深さで判定する）
        let pruning_depth = new_depth - reduced;
        if !gives_check
            && !in_check
            && pruning_depth < params.fut_prun_max_depth
            && new_alpha > -Score::MATE
            && !is_prior
        {
            let futility = tree.estimate(mv, ctx.evaluator)
                + params.fut_prun_margin
                + pruning_depth.max(0) * params.fut_prun_margin_rate;
            if futility <= new_alpha {
                is_first = false;
                best = best.max(futility);
                tree.info.futility_pruning += 1;
                continue;
            }
        }

        if !tree.do_move(mv, ctx.evaluator) {
            continue;
        }
        move_count += 1;

        // Principal Variation Search
        let mut score;
        if is_first {
            score = -search(ctx, tree, new_depth, -beta, -new_alpha, child_stat);
        } else {
            score = -search(ctx, tree, new_depth - reduced, -(new_alpha + 1), -new_alpha, child_stat);
            if !ctx.is_interrupted(tree) && score > new_alpha && (reduced != 0 || score < beta) {
                if reduced != 0 {
                    inc_stat!(tree, lmr_research);
                }
                score = -search(ctx, tree, new_depth, -beta, -new_alpha, child_stat);
            }
        }
        let child_historical = tree.node().is_historical;
        tree.undo_move();

        if ctx.is_interrupted(tree) {
            return Score::ZERO;
        }

        if score > best {
            best = score;
            best_move = mv;
            if best >= beta {
                tree.node_mut().is_historical |= child_historical;
                tree.info.fail_high += 1;
                if is_first {
                    tree.info.fail_high_first += 1;
                }
                break;
            }
            let child_pv = tree.nodes[tree.ply + 1].pv.clone();
            tree.node_mut().pv.set(mv, depth, &child_pv);
        }

        if !tree.position.is_capture(mv) {
            let quiets = &mut tree.node_mut().quiets_searched;
            if quiets.len() < quiets.inline_size() {
                quiets.push(mv);
            }
        }
        tree.node_mut().is_historical |= child_historical;
        is_first = false;
    }

    if best_move.is_some() && !in_check && !tree.position.is_capture(best_move) {
        if !best_move.is_promotion() {
            tree.add_killer(best_move);
        }
        let node = &tree.nodes[tree.ply];
        ctx.history.update(turn, best_move, depth, &node.quiets_searched);
    }

    if !tree.node().is_historical && excluded_move.is_none() {
        let status = ctx.tt.store(tree.node().key, alpha, beta, best, depth, ply, best_move, stat.mate_threat);
        tree.info.count_store(status);
    }

    best
}

/// 王手回避の最初の手で、他に候補が残っていないか（応手が1つだけ）
fn is_last_move(tree: &Tree) -> bool {
    let node = tree.node();
    !node.has_next() && matches!(node.gen_phase, super::GenPhase::Evasions | super::GenPhase::End)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;
    use crate::position::Position;

    struct Fixture {
        tt: TranspositionTable,
        history: History,
        params: SearchParams,
        reductions: Reductions,
        stop: AtomicBool,
    }

    impl Fixture {
        fn new() -> Fixture {
            Fixture {
                tt: TranspositionTable::new(1),
                history: History::new(),
                params: SearchParams::default(),
                reductions: Reductions::new(&SearchParams::default()),
                stop: AtomicBool::new(false),
            }
        }

        fn ctx(&self) -> SearchContext<'_> {
            SearchContext {
                tt: &self.tt,
                history: &self.history,
                evaluator: &MaterialEvaluator,
                params: &self.params,
                stop: &self.stop,
                start: Instant::now(),
                maximum: None,
                max_nodes: None,
                reductions: &self.reductions,
            }
        }
    }

    fn tree_at(sfen: &str) -> Tree {
        let mut tree = Tree::new(0);
        tree.initialize(&Position::from_sfen(sfen).unwrap(), None, &MaterialEvaluator);
        tree
    }

    #[test]
    fn test_reduction_table_monotonic() {
        let table = Reductions::new(&SearchParams::default());
        assert_eq!(table.get(DEPTH_1PLY, true, 0), 0);
        let shallow = table.get(4 * DEPTH_1PLY, true, 10);
        let deep = table.get(20 * DEPTH_1PLY, true, 10);
        assert!(deep >= shallow);
        // null window の方が削減量が大きい
        assert!(table.get(20 * DEPTH_1PLY, true, 30) >= table.get(20 * DEPTH_1PLY, false, 30));
        // 範囲外は端の値
        assert_eq!(table.get(200 * DEPTH_1PLY, true, 500), table.get(63 * DEPTH_1PLY, true, 63));
    }

    #[test]
    fn test_reduction_table_follows_rates() {
        let base = SearchParams::default();
        let default_table = Reductions::new(&base);
        let stronger = Reductions::new(&SearchParams {
            reduction_rate1: base.reduction_rate1 * 2,
            reduction_rate2: base.reduction_rate2 * 2,
            ..base.clone()
        });
        assert!(stronger.get(20 * DEPTH_1PLY, true, 30) > default_table.get(20 * DEPTH_1PLY, true, 30));

        let none = Reductions::new(&SearchParams { reduction_rate1: 0, reduction_rate2: 0, ..base });
        assert_eq!(none.get(63 * DEPTH_1PLY, true, 63), 0);
    }

    #[test]
    fn test_rid_depth() {
        assert_eq!(rid_depth(3 * DEPTH_1PLY), DEPTH_1PLY);
        assert_eq!(rid_depth(6 * DEPTH_1PLY), 3 * DEPTH_1PLY);
    }

    #[test]
    fn test_check_abort_by_stop_flag() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut tree = tree_at(crate::position::SFEN_HIRATE);
        tree.calls_cnt = 1;
        assert!(!ctx.check_abort(&mut tree));
        fixture.stop.store(true, Ordering::Relaxed);
        // 間隔が来るまでは確認しない
        assert!(!ctx.check_abort(&mut tree));
        tree.calls_cnt = 1;
        assert!(ctx.check_abort(&mut tree));
        assert!(ctx.is_interrupted(&tree));
    }

    #[test]
    fn test_check_abort_by_node_limit() {
        let fixture = Fixture::new();
        let ctx = SearchContext { max_nodes: Some(100), ..fixture.ctx() };
        let mut tree = tree_at(crate::position::SFEN_HIRATE);
        tree.nodes_searched = 100;
        tree.calls_cnt = 1;
        assert!(ctx.check_abort(&mut tree));
        assert!(fixture.stop.load(Ordering::Relaxed));
    }

    #[test]
    fn test_check_abort_node_limit_on_helper() {
        let fixture = Fixture::new();
        let ctx = SearchContext { max_nodes: Some(100), ..fixture.ctx() };
        let mut tree = Tree::new(2);
        tree.initialize(&Position::from_sfen(crate::position::SFEN_HIRATE).unwrap(), None, &MaterialEvaluator);
        tree.nodes_searched = 100;
        tree.calls_cnt = 1;
        assert!(ctx.check_abort(&mut tree));
        assert!(ctx.is_interrupted(&tree));
        // 他のスレッドは止めない
        assert!(!fixture.stop.load(Ordering::Relaxed));
    }

    #[test]
    fn test_search_finds_mate_in_one() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut tree = tree_at("4k4/9/4P4/9/9/9/9/9/4K4 b G 1");
        let score = search(&ctx, &mut tree, 3 * DEPTH_1PLY, -Score::INFINITY, Score::INFINITY, NodeStat::normal());
        assert_eq!(score, Score::win_in(1));
    }

    #[test]
    fn test_search_finds_mate_without_detection() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut tree = tree_at("4k4/9/4P4/9/9/9/9/9/4K4 b G 1");
        let stat = NodeStat::normal().without_mate_detection();
        let score = search(&ctx, &mut tree, 2 * DEPTH_1PLY, -Score::INFINITY, Score::INFINITY, stat);
        assert_eq!(score, Score::win_in(1));
        let mv = tree.node().pv.first().unwrap();
        assert_eq!(mv.to_string(), "G*5b");
    }

    #[test]
    fn test_search_wins_material() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut tree = tree_at("4k4/9/7p1/9/9/7R1/9/9/4K4 b - 1");
        let before = MaterialEvaluator.material_score(tree.position());
        let score = search(&ctx, &mut tree, 2 * DEPTH_1PLY, -Score::INFINITY, Score::INFINITY, NodeStat::normal());
        assert!(score > before);
        assert!(tree.info.nodes > 0);
    }

    #[test]
    fn test_search_futility_uses_reduced_depth() {
        // LMR で削った後の深さなら futility の対象になる
        let mut fixture = Fixture::new();
        fixture.params = SearchParams {
            reduction_rate2: 100,
            razor_margins: [20000; 4],
            fut_prun_max_depth: DEPTH_1PLY,
            ..SearchParams::default()
        };
        fixture.reductions = Reductions::new(&fixture.params);
        let ctx = fixture.ctx();
        // 飛車損で玉しか動かせない
        let mut tree = tree_at("4k4/1r7/9/9/9/9/9/9/4K4 b - 1");
        search(&ctx, &mut tree, 2 * DEPTH_1PLY, Score::new(500), Score::INFINITY, NodeStat::normal());
        assert!(tree.info.futility_pruning > 0);
    }

    #[test]
    fn test_search_recursive_id_leaves_tt_move() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let mut tree = tree_at("4k4/9/7p1/9/9/7R1/9/9/4K4 b - 1");
        let key = tree.position().key();
        assert!(fixture.tt.probe(key).is_none());
        let before = MaterialEvaluator.material_score(tree.position());
        let score = search(&ctx, &mut tree, 4 * DEPTH_1PLY, -Score::INFINITY, Score::INFINITY, NodeStat::normal());
        assert!(score > before);
        let entry = fixture.tt.probe(key).unwrap();
        assert!(tree.position().to_move(entry.mv).is_some());
    }

    #[test]
    fn test_search_returns_zero_after_stop() {
        let fixture = Fixture::new();
        fixture.stop.store(true, Ordering::Relaxed);
        let ctx = fixture.ctx();
        let mut tree = tree_at(crate::position::SFEN_HIRATE);
        tree.calls_cnt = 1;
        let score = search(&ctx, &mut tree, 4 * DEPTH_1PLY, -Score::INFINITY, Score::INFINITY, NodeStat::normal());
        assert_eq!(score, Score::ZERO);
        assert!(tree.aborted);
    }
}
