//! 探索の進捗をログに出す

use std::time::Duration;

use tsumiki_core::search::{Pv, SearchHandler};
use tsumiki_core::types::{DEPTH_1PLY, Depth};
use tsumiki_core::Score;

/// 読み筋の更新を `info` で、反復の区切りを `debug` で出力するハンドラ
#[derive(Debug, Default)]
pub struct LogReporter {
    pub iterations: u32,
}

impl SearchHandler for LogReporter {
    fn on_start(&mut self) {
        log::debug!("search started");
    }

    fn on_update_pv(&mut self, pv: &Pv, elapsed: Duration, depth: Depth, score: Score) {
        log::info!("depth {} score {score} time {}ms pv {pv}", depth / DEPTH_1PLY, elapsed.as_millis());
    }

    fn on_fail_low(&mut self, pv: &Pv, elapsed: Duration, depth: Depth, score: Score) {
        log::info!("depth {} score {score} upperbound time {}ms pv {pv}", depth / DEPTH_1PLY, elapsed.as_millis());
    }

    fn on_fail_high(&mut self, pv: &Pv, elapsed: Duration, depth: Depth, score: Score) {
        log::info!("depth {} score {score} lowerbound time {}ms pv {pv}", depth / DEPTH_1PLY, elapsed.as_millis());
    }

    fn on_iterate_end(&mut self, elapsed: Duration, depth: Depth) {
        self.iterations += 1;
        log::debug!("iteration {} done in {}ms", depth / DEPTH_1PLY, elapsed.as_millis());
    }
}
