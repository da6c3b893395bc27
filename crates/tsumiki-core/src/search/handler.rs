//! 探索の進捗通知
//!
//! メインスレッドの探索から同期的に呼ばれる。重い処理をすると探索が止まる。

use std::time::Duration;

use super::Pv;
use crate::types::{Depth, Score};

/// 探索の進捗を受け取るハンドラ
///
/// すべてのメソッドにデフォルト実装（何もしない）がある。
pub trait SearchHandler {
    /// 探索開始
    fn on_start(&mut self) {}

    /// 最善手順が更新された
    fn on_update_pv(&mut self, _pv: &Pv, _elapsed: Duration, _depth: Depth, _score: Score) {}

    /// ルートで fail-low し、窓を広げて再探索する
    fn on_fail_low(&mut self, _pv: &Pv, _elapsed: Duration, _depth: Depth, _score: Score) {}

    /// ルートで fail-high し、窓を広げて再探索する
    fn on_fail_high(&mut self, _pv: &Pv, _elapsed: Duration, _depth: Depth, _score: Score) {}

    /// 反復深化の1回分が終わった
    fn on_iterate_end(&mut self, _elapsed: Duration, _depth: Depth) {}
}

/// 何もしないハンドラ
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl SearchHandler for NoopHandler {}
