//! 探索の入口
//!
//! - 反復深化（`idsearch`）とルートの Aspiration Window 探索
//! - Lazy SMP: `SearchConfig::threads` 本のスレッドが置換表と History を共有し、
//!   それぞれの探索木で同じ局面を読む。補助スレッドは深さを間引いて探索を分散させる。
//! - 結果の集約（最も深く読み終えたスレッドの最善手）

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::alpha_beta::{self, Reductions, SearchContext};
use super::see::see;
use super::{History, NodeStat, Pv, STACK_SIZE, SearchConfig, SearchHandler, SearchInfo, SearchResult, TimeManager, Tree};
use crate::eval::Evaluator;
use crate::position::{Position, Record, movegen};
use crate::tt::TranspositionTable;
use crate::types::{DEPTH_1PLY, Depth, ExtMove, Move, Score};

/// 補助スレッドが読む深さの間引き表
///
/// 先頭が周期、続く要素が 1 の深さ（手数 % 周期）を読まない。
const HALF_DENSITY: [&[u8]; 20] = [
    &[2, 0, 1],
    &[2, 1, 0],
    &[4, 0, 0, 1, 1],
    &[4, 0, 1, 1, 0],
    &[4, 1, 1, 0, 0],
    &[4, 1, 0, 0, 1],
    &[6, 0, 0, 0, 1, 1, 1],
    &[6, 0, 0, 1, 1, 1, 0],
    &[6, 0, 1, 1, 1, 0, 0],
    &[6, 1, 1, 1, 0, 0, 0],
    &[6, 1, 1, 0, 0, 0, 1],
    &[6, 1, 0, 0, 0, 1, 1],
    &[8, 0, 0, 0, 0, 1, 1, 1, 1],
    &[8, 0, 0, 0, 1, 1, 1, 1, 0],
    &[8, 0, 0, 1, 1, 1, 1, 0, 0],
    &[8, 0, 1, 1, 1, 1, 0, 0, 0],
    &[8, 1, 1, 1, 1, 0, 0, 0, 0],
    &[8, 1, 1, 1, 0, 0, 0, 0, 1],
    &[8, 1, 1, 0, 0, 0, 0, 1, 1],
    &[8, 1, 0, 0, 0, 0, 1, 1, 1],
];

/// 補助スレッド `thread_index` が `plies` 手の反復を飛ばすか
fn skips_depth(thread_index: usize, plies: u32) -> bool {
    if thread_index == 0 {
        return false;
    }
    let row = HALF_DENSITY[(thread_index - 1) % HALF_DENSITY.len()];
    let cycle = row[0] as u32;
    row[(plies % cycle) as usize + 1] != 0
}

/// Aspiration Window の幅（段階ごと、最後は無限）
const ASPIRATION_WIDTHS: [i32; 2] = [128, 512];
const ASPIRATION_LAST: usize = ASPIRATION_WIDTHS.len();

/// 全スレッドで共有する状態
struct Shared<'a> {
    ctx: SearchContext<'a>,
    /// ルートの手を読み終えるたびに各スレッドの統計を集める
    info: &'a Mutex<SearchInfo>,
}

/// メインスレッドだけが持つもの
struct MainThread<'a> {
    handler: &'a mut dyn SearchHandler,
    time_manager: &'a mut TimeManager,
}

/// 探索エンジン
pub struct Searcher {
    config: SearchConfig,
    evaluator: Box<dyn Evaluator>,
    tt: TranspositionTable,
    history: History,
    reductions: Reductions,
    stop: Arc<AtomicBool>,
    trees: Vec<Tree>,
    time_manager: TimeManager,
    result: SearchResult,
}

impl Searcher {
    pub fn new(config: SearchConfig, evaluator: Box<dyn Evaluator>) -> Searcher {
        let tt = TranspositionTable::new(config.hash_mb);
        let reductions = Reductions::new(&config.params);
        Searcher {
            config,
            evaluator,
            tt,
            history: History::new(),
            reductions,
            stop: Arc::new(AtomicBool::new(false)),
            trees: Vec::new(),
            time_manager: TimeManager::new(),
            result: SearchResult::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 設定を差し替える（置換表のサイズや LMR の係数が変われば作り直す）
    pub fn set_config(&mut self, config: SearchConfig) {
        if config.hash_mb != self.config.hash_mb {
            self.tt.resize(config.hash_mb);
        }
        if config.params.reduction_rate1 != self.config.params.reduction_rate1
            || config.params.reduction_rate2 != self.config.params.reduction_rate2
        {
            self.reductions = Reductions::new(&config.params);
        }
        self.config = config;
    }

    /// 別スレッドから探索を止めるためのフラグ
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn interrupt(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// 置換表と History を消す（新しい対局の開始時）
    pub fn clear(&mut self) {
        self.tt.clear();
        self.history.clear();
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// 反復深化で探索する
    ///
    /// `record` を渡すと、その棋譜の局面も千日手・優越局面の判定に使う。
    /// `max_depth` は手数。時間・ノード数の制限や `interrupt` で途中で止まっても、
    /// それまでに読み終えた結果を返す。
    pub fn idsearch(
        &mut self,
        pos: &Position,
        record: Option<&Record>,
        max_depth: u32,
        handler: &mut dyn SearchHandler,
    ) -> &SearchResult {
        let start = Instant::now();
        self.begin(pos, record);
        handler.on_start();

        let Searcher { config, evaluator, tt, history, reductions, stop, trees, time_manager, result } = self;
        let Some((main_tree, helpers)) = trees.split_first_mut() else {
            return result;
        };

        prepare_root(main_tree, tt, &**evaluator, config.seed);
        if main_tree.nodes[0].moves.is_empty() {
            log::info!("no legal move: {}", pos.to_sfen());
            result.score = Score::lose_in(0);
            result.elapsed = start.elapsed();
            return result;
        }
        for helper in helpers.iter_mut() {
            helper.nodes[0].moves.clone_from(&main_tree.nodes[0].moves);
        }

        log::debug!(
            "search start: depth={} threads={} hash={}MB root_moves={}",
            max_depth,
            helpers.len() + 1,
            config.hash_mb,
            main_tree.nodes[0].moves.len()
        );

        let info = Mutex::new(SearchInfo::default());
        let shared = Shared {
            ctx: SearchContext {
                tt,
                history,
                evaluator: &**evaluator,
                params: &config.params,
                stop: &**stop,
                start,
                maximum: config.maximum_ms.map(Duration::from_millis),
                max_nodes: config.max_nodes,
                reductions,
            },
            info: &info,
        };

        std::thread::scope(|scope| {
            for tree in helpers.iter_mut() {
                let shared = &shared;
                scope.spawn(move || iterate(shared, tree, max_depth, None));
            }
            let mut main = MainThread { handler: &mut *handler, time_manager };
            iterate(&shared, main_tree, max_depth, Some(&mut main));
            // 補助スレッドを止める
            shared.ctx.stop.store(true, Ordering::Relaxed);
        });

        let mut total = info.into_inner().unwrap_or_else(PoisonError::into_inner);
        for tree in trees.iter() {
            total.merge(&tree.info);
        }
        result.info = total;

        for tree in trees.iter() {
            let root = &tree.nodes[0];
            let Some(best) = root.moves.first() else {
                continue;
            };
            if tree.completed_depth <= result.depth {
                continue;
            }
            result.depth = tree.completed_depth;
            result.mv = best.mv;
            result.score = Score::new(best.value);
            if root.pv.first() == Some(best.mv) {
                result.pv = root.pv.clone();
            } else {
                result.pv.clear();
            }
            if tree.thread_index != 0 {
                handler.on_update_pv(&result.pv, start.elapsed(), result.depth, result.score);
            }
        }

        if result.mv.is_none() {
            // 1回も反復を終えられなかった場合は並べ替え済みの先頭の手を返す
            let root = &trees[0].nodes[0];
            if let Some(first) = root.moves.first() {
                log::warn!("no iteration completed; falling back to {}", first.mv);
                result.mv = first.mv;
                result.score = Score::ZERO;
                result.pv.clear();
            }
        }
        result.elapsed = start.elapsed();

        #[cfg(feature = "search-stats")]
        {
            let mut stats = super::stats::SearchStats::default();
            for tree in trees.iter() {
                stats.merge(&tree.stats);
            }
            stats.log(result.depth / DEPTH_1PLY);
        }

        log::debug!(
            "search end: move={} score={} depth={} nodes={} elapsed={}ms",
            result.mv,
            result.score,
            result.depth / DEPTH_1PLY,
            result.info.total_nodes(),
            result.elapsed.as_millis()
        );
        result
    }

    /// 指定の深さと窓で1回だけ探索する（反復深化なし、メインスレッドのみ）
    pub fn search(&mut self, pos: &Position, record: Option<&Record>, depth: Depth, alpha: Score, beta: Score) -> &SearchResult {
        let start = Instant::now();
        self.begin(pos, record);

        let Searcher { config, evaluator, tt, history, reductions, stop, trees, result, .. } = self;
        let Some(tree) = trees.first_mut() else {
            return result;
        };
        let ctx = SearchContext {
            tt,
            history,
            evaluator: &**evaluator,
            params: &config.params,
            stop: &**stop,
            start,
            maximum: config.maximum_ms.map(Duration::from_millis),
            max_nodes: config.max_nodes,
            reductions,
        };

        let score = alpha_beta::search(&ctx, tree, depth, alpha, beta, NodeStat::normal().with_root());
        result.score = score;
        result.depth = depth;
        result.pv = tree.nodes[0].pv.clone();
        result.mv = result.pv.first().unwrap_or(Move::NONE);
        result.info = tree.info;
        result.elapsed = start.elapsed();
        result
    }

    /// 探索開始の共通処理
    fn begin(&mut self, pos: &Position, record: Option<&Record>) {
        self.stop.store(false, Ordering::Relaxed);
        self.result.reset();
        self.history.reduce();
        self.tt.evolve();
        self.time_manager.clear_position(self.config.optimum_ms, self.config.maximum_ms);

        let threads = self.config.threads.max(1);
        if self.trees.len() != threads {
            self.trees = (0..threads).map(Tree::new).collect();
        }
        for tree in &mut self.trees {
            tree.initialize(pos, record, self.evaluator.as_ref());
        }
    }
}

/// ルートの指し手を生成して並べる
///
/// シャッフルしてから合法手に絞り、置換表の手を先頭、残りを SEE の順にする。
fn prepare_root(tree: &mut Tree, tt: &TranspositionTable, evaluator: &dyn Evaluator, seed: u64) {
    tree.visit();

    let mut moves: Vec<ExtMove> = Vec::with_capacity(movegen::MAX_MOVES);
    if tree.position.in_check() {
        movegen::generate_evasions(&tree.position, &mut moves);
    } else {
        movegen::generate_captures(&tree.position, &mut moves);
        movegen::generate_quiets(&tree.position, &mut moves);
    }

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    moves.shuffle(&mut rng);
    moves.retain(|em| {
        if tree.do_move(em.mv, evaluator) {
            tree.undo_move();
            true
        } else {
            false
        }
    });

    let tt_move = tt.probe(tree.node().key).and_then(|data| tree.position.to_move(data.mv)).unwrap_or(Move::NONE);
    for em in &mut moves {
        em.value = if em.mv == tt_move {
            Score::INFINITY.raw()
        } else {
            see(&tree.position, em.mv).raw() + em.mv.is_promotion() as i32
        };
    }
    moves.sort_by(|a, b| b.value.cmp(&a.value));

    let root = tree.node_mut();
    root.moves = moves;
    root.cursor = 0;
}

/// 1スレッド分の反復深化
fn iterate(shared: &Shared<'_>, tree: &mut Tree, max_depth: u32, mut main: Option<&mut MainThread<'_>>) {
    for plies in 1..=max_depth {
        if skips_depth(tree.thread_index, plies) {
            continue;
        }
        let depth = plies as Depth * DEPTH_1PLY;
        let in_mate_band = aspsearch(shared, tree, depth, main.as_deref_mut());

        if tree.aborted || shared.ctx.stop.load(Ordering::Relaxed) {
            break;
        }
        tree.completed_depth = depth;

        #[cfg(feature = "search-stats")]
        if tree.thread_index == 0 {
            tree.stats.log(plies as i32);
        }

        // 詰みが見つかったらそれ以上読まない
        if !in_mate_band {
            break;
        }
    }
}

/// ルートの探索（Aspiration Window）
///
/// 最善の評価値が詰みの範囲の外（通常の評価値）なら true を返す。
fn aspsearch(shared: &Shared<'_>, tree: &mut Tree, depth: Depth, mut main: Option<&mut MainThread<'_>>) -> bool {
    let ctx = &shared.ctx;
    let Some(first) = tree.nodes[0].moves.first() else {
        return false;
    };

    let prev = Score::new(first.value);
    let do_asp = depth >= 6 * DEPTH_1PLY && !prev.is_mate();
    let alphas = [prev - ASPIRATION_WIDTHS[0], prev - ASPIRATION_WIDTHS[1], -Score::INFINITY];
    let betas = [prev + ASPIRATION_WIDTHS[0], prev + ASPIRATION_WIDTHS[1], Score::INFINITY];
    let (mut ai, mut bi) = if do_asp { (0, 0) } else { (ASPIRATION_LAST, ASPIRATION_LAST) };

    let mut pv_alpha = -Score::INFINITY;
    let mut pv_beta = -Score::INFINITY;
    let mut best = -Score::INFINITY;
    let mut do_full = true;
    let mut interrupted = false;

    for em in tree.nodes[0].moves.iter_mut().skip(1) {
        em.value = (-Score::INFINITY).raw();
    }
    let in_check = tree.node().check_state.is_check();

    let mut mc = 0;
    while mc < tree.nodes[0].moves.len() {
        let mv = tree.nodes[0].moves[mc].mv;
        let alpha = alphas[ai].max(best);
        let beta = betas[bi];
        let new_depth = depth - DEPTH_1PLY;

        let mut reduced: Depth = 0;
        if !do_full && new_depth >= DEPTH_1PLY && !in_check && !tree.is_tactical(mv) {
            reduced = ctx.reductions.get(new_depth, false, mc);
        }

        if !tree.do_move(mv, ctx.evaluator) {
            log::warn!("illegal root move removed: {mv}");
            tree.nodes[0].moves.remove(mc);
            continue;
        }

        let mut score;
        if do_full {
            score = -alpha_beta::search(ctx, tree, new_depth, -beta, -alpha, NodeStat::normal());
        } else {
            score = -alpha_beta::search(ctx, tree, new_depth - reduced, -(alpha + 1), -alpha, NodeStat::normal());
            if !ctx.is_interrupted(tree) && score > alpha {
                score = -alpha_beta::search(ctx, tree, new_depth, -beta, -alpha, NodeStat::normal());
            }
        }
        tree.undo_move();
        merge_info(shared, tree);

        if ctx.is_interrupted(tree) {
            interrupted = true;
            break;
        }

        let elapsed = ctx.start.elapsed();

        // fail-low: 窓を下に広げて同じ手を読み直す
        if score <= alphas[ai] && ai < ASPIRATION_LAST && score > best {
            while score <= alphas[ai] && ai < ASPIRATION_LAST {
                ai += 1;
            }
            if alphas[ai] < score {
                do_full = true;
                if let Some(main) = main.as_deref_mut() {
                    let mut pv = Pv::new();
                    pv.set(mv, depth, &tree.nodes[1].pv);
                    main.handler.on_fail_low(&pv, elapsed, depth, score);
                }
                continue;
            }
        }

        tree.nodes[0].moves[mc].value = score.raw();
        if score > alpha {
            let (root, rest) = tree.nodes.split_at_mut(1);
            root[0].pv.set(mv, depth, &rest[0].pv);
            pv_alpha = alpha;
            pv_beta = beta;
        }

        // fail-high: 窓を上に広げて同じ手を読み直す
        if score >= beta && bi < ASPIRATION_LAST {
            while score >= betas[bi] && bi < ASPIRATION_LAST {
                bi += 1;
            }
            if betas[bi] > score {
                do_full = true;
                if let Some(main) = main.as_deref_mut() {
                    main.handler.on_fail_high(&tree.nodes[0].pv, elapsed, depth, score);
                }
                continue;
            }
        }

        if score > best {
            best = score;
            if let Some(main) = main.as_deref_mut() {
                main.handler.on_update_pv(&tree.nodes[0].pv, elapsed, depth, score);
            }
        }

        if let Some(main) = main.as_deref_mut() {
            main.time_manager.update(elapsed.as_millis() as u64, depth, best, &tree.nodes[0].pv);
            if main.time_manager.should_interrupt() {
                ctx.stop.store(true, Ordering::Relaxed);
                interrupted = true;
                break;
            }
        }

        mc += 1;
        do_full = false;
    }

    tree.nodes[0].moves.sort_by(|a, b| b.value.cmp(&a.value));

    if pv_beta != -Score::INFINITY {
        let pv = tree.nodes[0].pv.clone();
        store_pv(ctx, tree, &pv, pv_alpha, pv_beta, best);
    }

    if !interrupted && let Some(main) = main.as_deref_mut() {
        main.handler.on_iterate_end(ctx.start.elapsed(), depth);
    }

    best > -Score::MATE && best < Score::MATE
}

/// 統計を共有の集計に移す
fn merge_info(shared: &Shared<'_>, tree: &mut Tree) {
    let mut info = shared.info.lock().unwrap_or_else(PoisonError::into_inner);
    info.merge(&tree.info);
    tree.info = SearchInfo::default();
}

/// 読み筋を置換表に書き戻す
///
/// ルートは探索窓つきの評価値で、それより先は指し手だけを書く。
fn store_pv(ctx: &SearchContext<'_>, tree: &mut Tree, pv: &Pv, alpha: Score, beta: Score, score: Score) {
    let mut played = 0;
    for index in 0..pv.len() {
        let Some(element) = pv.element(index) else {
            break;
        };
        if element.depth <= 0 || tree.ply + 1 >= STACK_SIZE {
            break;
        }

        let key = tree.node().key;
        let status = if index == 0 {
            ctx.tt.store(key, alpha, beta, score, element.depth, 0, element.mv, false)
        } else {
            ctx.tt.store_pv(key, element.depth, element.mv)
        };
        tree.info.count_store(status);

        if !tree.do_move(element.mv, ctx.evaluator) {
            log::warn!("illegal move in pv: {} ({pv})", element.mv);
            break;
        }
        played += 1;
    }
    for _ in 0..played {
        tree.undo_move();
    }
}
