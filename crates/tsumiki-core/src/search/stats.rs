//! 探索統計（search-stats feature有効時のみ）
//!
//! `SearchInfo` に含めない細かい試行回数を数え、反復ごとにログへ出す。

/// 枝刈り・延長の試行回数
#[cfg(feature = "search-stats")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// LMR適用回数
    pub lmr_applied: u64,
    /// LMRによる再探索回数
    pub lmr_research: u64,
    /// Null Move の試行回数
    pub null_move_attempted: u64,
    /// ProbCut の試行回数
    pub prob_cut_attempted: u64,
    /// Recursive Iterative Deepening の実行回数
    pub recursive_id: u64,
    /// Singular Extension の検証探索回数
    pub singular_attempted: u64,
    /// 1手詰めの検出回数
    pub mate_in_one: u64,
}

#[cfg(feature = "search-stats")]
impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.lmr_applied += other.lmr_applied;
        self.lmr_research += other.lmr_research;
        self.null_move_attempted += other.null_move_attempted;
        self.prob_cut_attempted += other.prob_cut_attempted;
        self.recursive_id += other.recursive_id;
        self.singular_attempted += other.singular_attempted;
        self.mate_in_one += other.mate_in_one;
    }

    pub fn log(&self, depth: i32) {
        log::debug!(
            "[stats] depth={} lmr={} lmr_research={} null={} probcut={} rid={} singular={} mate1={}",
            depth,
            self.lmr_applied,
            self.lmr_research,
            self.null_move_attempted,
            self.prob_cut_attempted,
            self.recursive_id,
            self.singular_attempted,
            self.mate_in_one
        );
    }
}

/// 統計カウンタを加算するマクロ（feature無効時は何もしない）
#[cfg(feature = "search-stats")]
macro_rules! inc_stat {
    ($tree:expr, $field:ident) => {
        $tree.stats.$field += 1;
    };
}

#[cfg(not(feature = "search-stats"))]
macro_rules! inc_stat {
    ($tree:expr, $field:ident) => {};
}

pub(super) use inc_stat;
