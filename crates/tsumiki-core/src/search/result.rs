//! 探索結果

use std::time::Duration;

use serde::Serialize;

use super::{Pv, SearchInfo};
use crate::types::{Depth, Move, Score};

/// 探索結果
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    /// 最善手（合法手がなければ `Move::NONE`）
    #[serde(rename = "move")]
    pub mv: Move,
    /// 読み筋（先頭が `mv` と一致する場合のみ）
    pub pv: Pv,
    pub score: Score,
    /// 読み終えた深さ
    pub depth: Depth,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub info: SearchInfo,
}

impl SearchResult {
    /// 探索開始時の状態
    pub(crate) fn reset(&mut self) {
        self.mv = Move::NONE;
        self.pv.clear();
        self.score = -Score::INFINITY;
        self.depth = 0;
        self.elapsed = Duration::ZERO;
        self.info = SearchInfo::default();
    }
}

fn serialize_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}
