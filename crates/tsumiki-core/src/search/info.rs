//! 探索統計

use serde::Serialize;

use crate::tt::TtStatus;

/// 探索中の各種カウンタ
///
/// スレッドごとに集計し、ルートの1手を読み終えるたびに共有の合計へ加算する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchInfo {
    pub nodes: u64,
    pub quies_nodes: u64,
    pub hash_cut: u64,
    pub null_move_pruning: u64,
    pub futility_pruning: u64,
    pub razoring: u64,
    pub prob_cut: u64,
    pub singular_extension: u64,
    pub fail_high: u64,
    pub fail_high_first: u64,
    pub hash_new: u64,
    pub hash_update: u64,
    pub hash_collide: u64,
    pub hash_reject: u64,
}

impl SearchInfo {
    /// 通常探索と静止探索を合わせたノード数
    #[inline]
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.quies_nodes
    }

    /// 置換表への書き込み結果を数える
    #[inline]
    pub fn count_store(&mut self, status: TtStatus) {
        match status {
            TtStatus::New => self.hash_new += 1,
            TtStatus::Update => self.hash_update += 1,
            TtStatus::Collide => self.hash_collide += 1,
            TtStatus::Reject => self.hash_reject += 1,
        }
    }

    /// 最初の手で beta カットした割合
    pub fn fail_high_first_rate(&self) -> f64 {
        if self.fail_high == 0 { 0.0 } else { self.fail_high_first as f64 / self.fail_high as f64 }
    }

    pub fn merge(&mut self, other: &SearchInfo) {
        self.nodes += other.nodes;
        self.quies_nodes += other.quies_nodes;
        self.hash_cut += other.hash_cut;
        self.null_move_pruning += other.null_move_pruning;
        self.futility_pruning += other.futility_pruning;
        self.razoring += other.razoring;
        self.prob_cut += other.prob_cut;
        self.singular_extension += other.singular_extension;
        self.fail_high += other.fail_high;
        self.fail_high_first += other.fail_high_first;
        self.hash_new += other.hash_new;
        self.hash_update += other.hash_update;
        self.hash_collide += other.hash_collide;
        self.hash_reject += other.hash_reject;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_info_merge() {
        let mut total = SearchInfo { nodes: 10, fail_high: 2, ..Default::default() };
        let other = SearchInfo { nodes: 5, quies_nodes: 7, fail_high: 1, fail_high_first: 1, ..Default::default() };
        total.merge(&other);
        assert_eq!(total.nodes, 15);
        assert_eq!(total.quies_nodes, 7);
        assert_eq!(total.total_nodes(), 22);
        assert_eq!(total.fail_high, 3);
        assert!((total.fail_high_first_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_search_info_count_store() {
        let mut info = SearchInfo::default();
        info.count_store(TtStatus::New);
        info.count_store(TtStatus::New);
        info.count_store(TtStatus::Reject);
        assert_eq!(info.hash_new, 2);
        assert_eq!(info.hash_reject, 1);
        assert_eq!(info.hash_update, 0);
    }
}
