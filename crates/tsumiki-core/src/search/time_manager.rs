//! 思考時間の管理
//!
//! 反復深化の各ルート手の探索後に呼ばれ、経過時間・評価値の変化・
//! 読み筋の安定度から、次の反復に進まずに打ち切るかを決める。
//!
//! 直近3回の反復（2回前・前回・今回）の深さ・評価値・読み筋を記録しておき、
//! 読み筋が前回または2回前と長く一致していて、評価値の変化が小さいほど早く打ち切る。

use super::Pv;
use crate::types::{DEPTH_1PLY, Depth, Score};

/// ある反復の結果
#[derive(Debug, Clone, Default)]
struct Snapshot {
    depth: Depth,
    score: Score,
    pv: Pv,
}

/// 打ち切り条件の1行
struct StopRule {
    /// 最適時間に対する割合（%）
    percent: u64,
    /// この深さ（手数）以上で適用する
    min_depth: Depth,
    /// 前回からの評価値の変化がこの範囲内（両端を含まない）
    score_low: i32,
    score_high: i32,
    /// 前回または2回前の読み筋と一致している手数（どちらかを満たせばよい）
    stable1: usize,
    stable2: usize,
}

const STOP_RULES: [StopRule; 6] = [
    StopRule { percent: 10, min_depth: 25, score_low: -16, score_high: 32, stable1: 14, stable2: 15 },
    StopRule { percent: 20, min_depth: 23, score_low: -32, score_high: 64, stable1: 12, stable2: 13 },
    StopRule { percent: 70, min_depth: 18, score_low: -64, score_high: 256, stable1: 4, stable2: 5 },
    StopRule { percent: 100, min_depth: 18, score_low: -128, score_high: 512, stable1: 3, stable2: 3 },
    StopRule { percent: 200, min_depth: 18, score_low: -256, score_high: 1024, stable1: 2, stable2: 2 },
    StopRule { percent: 400, min_depth: 18, score_low: -512, score_high: 2048, stable1: 1, stable2: 1 },
];

/// 最大時間に対してこの割合（%）を使ったら必ず打ち切る
const HARD_LIMIT_PERCENT: u64 = 97;

/// 時間管理
#[derive(Debug, Default)]
pub struct TimeManager {
    optimum_ms: Option<u64>,
    maximum_ms: Option<u64>,
    previous2: Snapshot,
    previous: Snapshot,
    current: Snapshot,
    should_interrupt: bool,
}

impl TimeManager {
    pub fn new() -> TimeManager {
        TimeManager::default()
    }

    /// 探索開始時に呼ぶ。`None` は制限なし
    pub fn clear_position(&mut self, optimum_ms: Option<u64>, maximum_ms: Option<u64>) {
        *self = TimeManager { optimum_ms, maximum_ms, ..TimeManager::default() };
    }

    /// ルート手を1つ読み終えるたびに呼ぶ
    pub fn update(&mut self, elapsed_ms: u64, depth: Depth, score: Score, pv: &Pv) {
        if self.current.depth != 0 && self.current.depth != depth {
            self.previous2 = std::mem::take(&mut self.previous);
            self.previous = std::mem::take(&mut self.current);
        }
        self.current = Snapshot { depth, score, pv: pv.clone() };

        if let Some(maximum) = self.maximum_ms
            && elapsed_ms.saturating_mul(100) >= maximum.saturating_mul(HARD_LIMIT_PERCENT)
        {
            log::info!("time manager: maximum time reached ({elapsed_ms} ms)");
            self.should_interrupt = true;
            return;
        }

        if self.previous2.depth == 0 || self.previous.depth == 0 {
            return;
        }
        let Some(optimum) = self.optimum_ms else {
            return;
        };

        let score_diff = (self.current.score - self.previous.score).raw();
        let stable1 = self.current.pv.common_prefix_len(&self.previous.pv);
        let stable2 = self.current.pv.common_prefix_len(&self.previous2.pv);

        for rule in &STOP_RULES {
            if elapsed_ms.saturating_mul(100) >= optimum.saturating_mul(rule.percent)
                && depth >= rule.min_depth * DEPTH_1PLY
                && score_diff > rule.score_low
                && score_diff < rule.score_high
                && (stable1 >= rule.stable1 || stable2 >= rule.stable2)
            {
                log::info!(
                    "time manager: interrupt at {elapsed_ms} ms (depth={}, diff={score_diff}, stable={stable1}/{stable2})",
                    depth / DEPTH_1PLY
                );
                self.should_interrupt = true;
                return;
            }
        }
    }

    pub fn should_interrupt(&self) -> bool {
        self.should_interrupt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Move, PieceType, Square};

    fn pv_of(len: usize) -> Pv {
        let mut pv = Pv::new();
        for i in (0..len).rev() {
            let file = (i % 9) as u8;
            let mv = Move::normal(Square::new(file, 6), Square::new(file, 5), false, PieceType::Pawn);
            let child = pv.clone();
            pv.set(mv, DEPTH_1PLY, &child);
        }
        pv
    }

    #[test]
    fn test_time_manager_hard_limit() {
        let mut tm = TimeManager::new();
        tm.clear_position(Some(1000), Some(1000));
        tm.update(960, DEPTH_1PLY, Score::ZERO, &Pv::new());
        assert!(!tm.should_interrupt());
        tm.update(970, DEPTH_1PLY, Score::ZERO, &Pv::new());
        assert!(tm.should_interrupt());
    }

    #[test]
    fn test_time_manager_unlimited_never_interrupts() {
        let mut tm = TimeManager::new();
        tm.clear_position(None, None);
        let pv = pv_of(20);
        for d in 1..=40 {
            tm.update(1_000_000, d * DEPTH_1PLY, Score::ZERO, &pv);
        }
        assert!(!tm.should_interrupt());
    }

    #[test]
    fn test_time_manager_needs_two_previous_iterations() {
        let mut tm = TimeManager::new();
        tm.clear_position(Some(100), None);
        let pv = pv_of(20);
        tm.update(10_000, 30 * DEPTH_1PLY, Score::ZERO, &pv);
        assert!(!tm.should_interrupt());
        tm.update(10_000, 31 * DEPTH_1PLY, Score::ZERO, &pv);
        assert!(!tm.should_interrupt());
        tm.update(10_000, 32 * DEPTH_1PLY, Score::ZERO, &pv);
        assert!(tm.should_interrupt());
    }

    #[test]
    fn test_time_manager_stable_pv_interrupts_early() {
        let mut tm = TimeManager::new();
        tm.clear_position(Some(1000), Some(10_000));
        let pv = pv_of(16);
        tm.update(10, 24 * DEPTH_1PLY, Score::new(100), &pv);
        tm.update(50, 25 * DEPTH_1PLY, Score::new(110), &pv);
        assert!(!tm.should_interrupt());
        // 最適時間の 10% を超え、評価値の変化が小さく読み筋も一致
        tm.update(100, 26 * DEPTH_1PLY, Score::new(120), &pv);
        assert!(tm.should_interrupt());
    }

    #[test]
    fn test_time_manager_previous_pv_alone_is_enough() {
        let mut tm = TimeManager::new();
        tm.clear_position(Some(1000), Some(10_000));
        let mut other = Pv::new();
        let mv = Move::normal(Square::new(8, 8), Square::new(8, 7), false, PieceType::Lance);
        other.set(mv, DEPTH_1PLY, &Pv::new());
        // 2回前だけ読み筋が違う
        tm.update(10, 24 * DEPTH_1PLY, Score::new(100), &other);
        tm.update(50, 25 * DEPTH_1PLY, Score::new(110), &pv_of(16));
        assert!(!tm.should_interrupt());
        tm.update(100, 26 * DEPTH_1PLY, Score::new(120), &pv_of(16));
        assert!(tm.should_interrupt());
    }

    #[test]
    fn test_time_manager_huge_limits_do_not_overflow() {
        let mut tm = TimeManager::new();
        tm.clear_position(Some(u64::MAX / 2), Some(u64::MAX));
        let pv = pv_of(4);
        for d in 1..=3 {
            tm.update(u64::MAX / 200, d * DEPTH_1PLY, Score::ZERO, &pv);
        }
        assert!(!tm.should_interrupt());
        tm.update(u64::MAX, 4 * DEPTH_1PLY, Score::ZERO, &pv);
        assert!(tm.should_interrupt());
    }

    #[test]
    fn test_time_manager_unstable_pv_keeps_searching() {
        let mut tm = TimeManager::new();
        tm.clear_position(Some(1000), Some(10_000));
        tm.update(10, 20 * DEPTH_1PLY, Score::new(100), &pv_of(10));
        tm.update(50, 21 * DEPTH_1PLY, Score::new(100), &pv_of(10));
        // 読み筋の先頭が変わった
        let mut other = Pv::new();
        let mv = Move::normal(Square::new(8, 8), Square::new(8, 7), false, PieceType::Lance);
        other.set(mv, DEPTH_1PLY, &Pv::new());
        tm.update(900, 22 * DEPTH_1PLY, Score::new(100), &other);
        assert!(!tm.should_interrupt());
    }
}
