//! 探索木（スレッドごとの探索状態）
//!
//! 局面・ply ごとのノード・SHEK 表・連続王手の千日手検出器を持つ。
//! 探索スレッドが専有し、探索のたびに `initialize` で作り直す。

use super::{Node, SearchInfo};
use crate::eval::Evaluator;
use crate::position::{CheckState, Position, Record};
use crate::shek::{ScrDetector, ScrPath, ShekState, ShekTable};
use crate::types::{Color, Move, Piece, Score};

/// 探索スタックの段数
pub const STACK_SIZE: usize = 64;

/// 中断チェックの間隔（ノード数）
pub(crate) const CHECK_INTERVAL: i32 = 512;

/// 探索木
pub struct Tree {
    pub(crate) position: Position,
    pub(crate) ply: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) shek: ShekTable,
    pub(crate) scr: ScrDetector,
    /// ルートの手を読み終えるたびに共有の統計へ移す
    pub(crate) info: SearchInfo,
    /// 0 がメインスレッド
    pub(crate) thread_index: usize,
    /// 読み終えた反復深化の深さ
    pub(crate) completed_depth: i32,
    /// 累計ノード数（ノード数制限用）
    pub(crate) nodes_searched: u64,
    pub(crate) calls_cnt: i32,
    pub(crate) aborted: bool,
    #[cfg(feature = "search-stats")]
    pub(crate) stats: super::stats::SearchStats,
}

impl Tree {
    pub fn new(thread_index: usize) -> Tree {
        Tree {
            position: Position::startpos(),
            ply: 0,
            nodes: (0..STACK_SIZE).map(|_| Node::default()).collect(),
            shek: ShekTable::new(),
            scr: ScrDetector::new(),
            info: SearchInfo::default(),
            thread_index,
            completed_depth: 0,
            nodes_searched: 0,
            calls_cnt: CHECK_INTERVAL,
            aborted: false,
            #[cfg(feature = "search-stats")]
            stats: super::stats::SearchStats::default(),
        }
    }

    /// 探索開始局面で初期化する
    ///
    /// `record` があれば、その局面列を SHEK 表と連続王手の判定に使う。
    pub fn initialize(&mut self, pos: &Position, record: Option<&Record>, evaluator: &dyn Evaluator) {
        self.position = pos.clone();
        self.ply = 0;
        self.shek.clear();
        self.scr.clear();
        if let Some(record) = record {
            let shek = &mut self.shek;
            let replayed = record.replay(|p, _| shek.retain(p));
            if let Err(err) = replayed.and_then(|()| self.scr.register_record(record)) {
                log::error!("record ignored for repetition detection: {err}");
                self.shek.clear();
                self.scr.clear();
            }
        }

        for node in &mut self.nodes {
            node.killers.clear();
            node.pv.clear();
            node.quiets_searched.clear();
            node.reset_moves();
            node.tt_move = Move::NONE;
            node.excluded_move = Move::NONE;
            node.is_historical = false;
        }

        let root = &mut self.nodes[0];
        root.key = pos.key();
        root.material = evaluator.material_score(pos);
        root.score = Score::INVALID;
        root.check_state = pos.checkers();
        root.mv = Move::NONE;
        root.captured = Piece::EMPTY;

        self.info = SearchInfo::default();
        self.completed_depth = 0;
        self.nodes_searched = 0;
        self.calls_cnt = CHECK_INTERVAL;
        self.aborted = false;
        #[cfg(feature = "search-stats")]
        {
            self.stats = super::stats::SearchStats::default();
        }
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn ply(&self) -> usize {
        self.ply
    }

    #[inline]
    pub(crate) fn node(&self) -> &Node {
        &self.nodes[self.ply]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self) -> &mut Node {
        &mut self.nodes[self.ply]
    }

    /// 現局面の SHEK 判定
    #[inline]
    pub(crate) fn shek_state(&self) -> ShekState {
        self.shek.check(&self.position)
    }

    /// 指し手を進める。自玉が取られる手などで指せなければ false を返し、状態は変えない
    pub fn do_move(&mut self, mv: Move, evaluator: &dyn Evaluator) -> bool {
        let mover = self.position.side_to_move();
        self.shek.retain(&self.position);
        let Some(captured) = self.position.do_move(mv) else {
            self.shek.release(&self.position);
            return false;
        };

        let ply = self.ply;
        let material = self.nodes[ply].material + evaluator.material_delta(mv, captured) * mover.sign();
        let node = &mut self.nodes[ply];
        node.mv = mv;
        node.captured = captured;

        self.ply += 1;
        let child = &mut self.nodes[self.ply];
        child.key = self.position.key();
        child.material = material;
        child.score = Score::INVALID;
        child.check_state = self.position.checkers();
        child.mv = Move::NONE;
        child.captured = Piece::EMPTY;
        child.excluded_move = Move::NONE;
        true
    }

    pub fn undo_move(&mut self) {
        debug_assert!(self.ply > 0, "undo_move at root");
        self.ply -= 1;
        let node = &self.nodes[self.ply];
        let (mv, captured) = (node.mv, node.captured);
        self.position.undo_move(mv, captured);
        self.shek.release(&self.position);
    }

    /// 手番だけを渡す。静的評価のキャッシュは先手視点なのでそのまま引き継ぐ
    pub fn do_null_move(&mut self) {
        let ply = self.ply;
        let (material, score) = (self.nodes[ply].material, self.nodes[ply].score);
        let node = &mut self.nodes[ply];
        node.mv = Move::NONE;
        node.captured = Piece::EMPTY;
        self.position.do_null_move();

        self.ply += 1;
        let child = &mut self.nodes[self.ply];
        child.key = self.position.key();
        child.material = material;
        child.score = score;
        child.check_state = CheckState::NONE;
        child.mv = Move::NONE;
        child.captured = Piece::EMPTY;
        child.excluded_move = Move::NONE;
    }

    pub fn undo_null_move(&mut self) {
        debug_assert!(self.ply > 0, "undo_null_move at root");
        self.ply -= 1;
        self.position.undo_null_move();
    }

    /// ノードに初めて入ったときの初期化（子ノードのキラー手も消す）
    pub(crate) fn visit(&mut self) {
        let node = &mut self.nodes[self.ply];
        node.is_historical = false;
        node.tt_move = Move::NONE;
        node.quiets_searched.clear();
        node.pv.clear();
        if let Some(child) = self.nodes.get_mut(self.ply + 1) {
            child.killers.clear();
        }
    }

    /// ルートに入ったときの初期化（前回の読み筋は残す）
    pub(crate) fn visit_root(&mut self) {
        let pv = std::mem::take(&mut self.nodes[self.ply].pv);
        self.visit();
        self.nodes[self.ply].pv = pv;
    }

    /// 同じノードを探索し直すときの初期化（置換表の手は残す）
    pub(crate) fn revisit(&mut self) {
        let node = &mut self.nodes[self.ply];
        node.is_historical = false;
        node.quiets_searched.clear();
        node.pv.clear();
        if let Some(child) = self.nodes.get_mut(self.ply + 1) {
            child.killers.clear();
        }
    }

    #[inline]
    pub(crate) fn add_killer(&mut self, mv: Move) {
        self.nodes[self.ply].killers.add(mv);
    }

    /// 手番側から見た静的評価（ノードにキャッシュする）
    pub(crate) fn stand_pat(&mut self, evaluator: &dyn Evaluator) -> Score {
        let node = &mut self.nodes[self.ply];
        if !node.score.is_valid() {
            node.score = evaluator.total_score(node.material, &self.position);
        }
        match self.position.side_to_move() {
            Color::Black => node.score,
            Color::White => -node.score,
        }
    }

    /// 指し手を指した後の評価値の見積もり（手番側視点）
    pub(crate) fn estimate(&mut self, mv: Move, evaluator: &dyn Evaluator) -> Score {
        let captured = if mv.is_drop() { Piece::EMPTY } else { self.position.piece_on(mv.to()) };
        self.stand_pat(evaluator) + evaluator.material_delta(mv, captured)
    }

    /// 直前に取られた駒を同じ升で取り返す手か
    pub(crate) fn is_recapture(&self, mv: Move) -> bool {
        if self.ply == 0 || mv.is_none() {
            return false;
        }
        let parent = &self.nodes[self.ply - 1];
        parent.mv.is_some() && !parent.captured.is_empty() && parent.mv.to() == mv.to()
    }

    /// 駒を取る手か成る手
    #[inline]
    pub(crate) fn is_tactical(&self, mv: Move) -> bool {
        self.position.is_capture(mv) || mv.is_promotion()
    }
}

impl ScrPath for Tree {
    fn ply(&self) -> usize {
        self.ply
    }

    fn node(&self, ply: usize) -> (u64, bool) {
        let node = &self.nodes[ply];
        (node.key, node.check_state.is_check())
    }

    fn current_key(&self) -> u64 {
        self.position.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;
    use crate::shek::ScrState;

    fn tree_at(sfen: &str) -> Tree {
        let mut tree = Tree::new(0);
        let pos = Position::from_sfen(sfen).unwrap();
        tree.initialize(&pos, None, &MaterialEvaluator);
        tree
    }

    #[test]
    fn test_tree_do_undo_restores_position() {
        let mut tree = tree_at(crate::position::SFEN_HIRATE);
        let before = tree.position().clone();
        let mv = before.parse_usi_move("7g7f").unwrap();
        assert!(tree.do_move(mv, &MaterialEvaluator));
        assert_eq!(tree.ply(), 1);
        assert_eq!(tree.nodes[0].mv, mv);
        assert_eq!(tree.nodes[1].key, tree.position().key());
        tree.undo_move();
        assert_eq!(tree.ply(), 0);
        assert_eq!(tree.position(), &before);
        assert_eq!(tree.shek_state(), ShekState::None);
    }

    #[test]
    fn test_tree_material_follows_captures() {
        let mut tree = tree_at("4k4/9/7p1/9/9/7R1/9/9/4K4 b - 1");
        let root_material = tree.nodes[0].material;
        let mv = tree.position().parse_usi_move("2f2c+").unwrap();
        assert!(tree.do_move(mv, &MaterialEvaluator));
        let expected = MaterialEvaluator.material_score(tree.position());
        assert_eq!(tree.node().material, expected);
        assert!(tree.node().material > root_material);
        // 後手番なので手番側から見ると負
        assert_eq!(tree.stand_pat(&MaterialEvaluator), -expected);
    }

    #[test]
    fn test_tree_illegal_move_keeps_state() {
        // 5一の香が 5八の金越しに 5九の王を狙っている
        let mut tree = tree_at("k3l4/9/9/9/9/9/9/4G4/4K4 b - 1");
        let mv = tree.position().parse_usi_move("5h4h").unwrap();
        let before = tree.position().clone();
        assert!(!tree.do_move(mv, &MaterialEvaluator));
        assert_eq!(tree.ply(), 0);
        assert_eq!(tree.position(), &before);
        assert_eq!(tree.shek_state(), ShekState::None);
    }

    #[test]
    fn test_tree_null_move_keeps_score_cache() {
        let mut tree = tree_at("4k4/9/9/9/9/9/9/9/4K4 b G 1");
        let stand_pat = tree.stand_pat(&MaterialEvaluator);
        tree.do_null_move();
        assert_eq!(tree.position().side_to_move(), Color::White);
        assert_eq!(tree.stand_pat(&MaterialEvaluator), -stand_pat);
        tree.undo_null_move();
        assert_eq!(tree.position().side_to_move(), Color::Black);
    }

    #[test]
    fn test_tree_shek_detects_repetition() {
        let mut tree = tree_at("4k4/9/9/9/9/9/9/9/4K4 b - 1");
        for usi in ["5i5h", "5a5b", "5h5i", "5b5a"] {
            let mv = tree.position().parse_usi_move(usi).unwrap();
            assert!(tree.do_move(mv, &MaterialEvaluator));
        }
        assert_eq!(tree.shek_state(), ShekState::Equal);
        // 王手がないまま同一局面に戻ったので引き分け
        assert_eq!(tree.scr.detect_short(&tree), ScrState::Draw);
    }

    /// 5一の玉を飛車が 4筋と 5筋から交互に王手し続ける
    const PERPETUAL_CHECK: [&str; 4] = ["4i5i", "5a4a", "5i4i", "4a5a"];

    fn play(tree: &mut Tree, moves: &[&str]) {
        for usi in moves {
            let mv = tree.position().parse_usi_move(usi).unwrap();
            assert!(tree.do_move(mv, &MaterialEvaluator), "{usi}");
        }
    }

    #[test]
    fn test_tree_perpetual_check_loses_for_checker() {
        let mut tree = tree_at("4k4/9/9/9/9/9/9/9/K4R3 b - 1");
        play(&mut tree, &PERPETUAL_CHECK);
        assert_eq!(tree.ply(), 4);
        assert_eq!(tree.shek_state(), ShekState::Equal);
        // 王手をかけ続けた先手の手番
        assert_eq!(tree.scr.detect_short(&tree), ScrState::Lose);
    }

    #[test]
    fn test_tree_perpetual_check_wins_for_defender() {
        let mut tree = tree_at("4k4/9/9/9/9/9/9/9/K4R3 b - 1");
        play(&mut tree, &PERPETUAL_CHECK);
        play(&mut tree, &PERPETUAL_CHECK[..1]);
        assert!(tree.node().check_state.is_check());
        // 王手され続けた後手の手番
        assert_eq!(tree.scr.detect_short(&tree), ScrState::Win);
    }

    #[test]
    fn test_tree_perpetual_check_needs_fourth_occurrence() {
        let mut tree = tree_at("4k4/9/9/9/9/9/9/9/K4R3 b - 1");
        play(&mut tree, &PERPETUAL_CHECK);
        play(&mut tree, &PERPETUAL_CHECK);
        assert_eq!(tree.scr.detect(&tree), ScrState::None);
        play(&mut tree, &PERPETUAL_CHECK);
        assert_eq!(tree.ply(), 12);
        assert_eq!(tree.scr.detect(&tree), ScrState::Lose);
    }

    #[test]
    fn test_tree_perpetual_check_from_record() {
        let record = Record::parse("sfen 4k4/9/9/9/9/9/9/9/K4R3 b - 1 moves 4i5i 5a4a 5i4i 4a5a 4i5i 5a4a 5i4i 4a5a")
            .unwrap();
        let mut tree = Tree::new(0);
        tree.initialize(&record.position().unwrap(), Some(&record), &MaterialEvaluator);
        play(&mut tree, &PERPETUAL_CHECK);
        // 棋譜の 2 回と探索中の 1 回で同一局面が 4 回目
        assert_eq!(tree.scr.detect(&tree), ScrState::Lose);
        assert_eq!(tree.shek_state(), ShekState::Equal4);
    }

    #[test]
    fn test_tree_recapture() {
        // 2三の歩を飛車で取り、2二の銀で取り返す
        let mut tree = tree_at("4k4/7s1/7p1/9/9/7R1/9/9/4K4 b - 1");
        let capture = tree.position().parse_usi_move("2f2c").unwrap();
        assert!(!tree.is_recapture(capture));
        assert!(tree.do_move(capture, &MaterialEvaluator));
        let recapture = tree.position().parse_usi_move("2b2c").unwrap();
        assert!(tree.is_recapture(recapture));
        let other = tree.position().parse_usi_move("5a4a").unwrap();
        assert!(!tree.is_recapture(other));
    }
}
