//! 探索設定と探索パラメータ
//!
//! どちらも `serde` で読み書きでき、TOML の設定ファイルから読み込める。
//! 省略した項目はデフォルト値になる。

use serde::{Deserialize, Serialize};

use crate::types::Depth;

/// 探索設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 置換表のサイズ（MiB）
    pub hash_mb: usize,
    /// 探索スレッド数
    pub threads: usize,
    /// 目安の思考時間（ミリ秒、None は無制限）
    pub optimum_ms: Option<u64>,
    /// 最大の思考時間（ミリ秒、None は無制限）
    pub maximum_ms: Option<u64>,
    /// 探索ノード数の上限
    pub max_nodes: Option<u64>,
    /// ルートの手をシャッフルする乱数の種
    pub seed: u64,
    pub params: SearchParams,
}

impl SearchConfig {
    /// 反復深化の最大深さ（手数）
    pub const DEPTH_INFINITY: u32 = 60;

    pub const DEFAULT_OPTIMUM_MS: u64 = 3_000;
    pub const DEFAULT_MAXIMUM_MS: u64 = 3_000;

    /// 時間制限なし（検討・先読み用）
    pub fn with_infinite_time(mut self) -> SearchConfig {
        self.optimum_ms = None;
        self.maximum_ms = None;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hash_mb: 16,
            threads: 1,
            optimum_ms: Some(Self::DEFAULT_OPTIMUM_MS),
            maximum_ms: Some(Self::DEFAULT_MAXIMUM_MS),
            max_nodes: None,
            seed: 0x7473_756d_696b_69,
            params: SearchParams::default(),
        }
    }
}

/// 枝刈り・延長・削減の係数
///
/// 深さはすべて `DEPTH_1PLY` 単位。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// 王手の延長
    pub ext_depth_check: Depth,
    /// 応手が1つしかない王手回避の延長
    pub ext_depth_one_reply: Depth,
    /// 取り返しの延長
    pub ext_depth_recapture: Depth,
    /// null move 探索の深さ係数（/16）
    pub null_depth_rate: i32,
    /// null move 探索で差し引く深さ
    pub null_depth_reduce: Depth,
    /// 静的評価が beta を上回る量に応じて深さを減らす割合
    pub null_depth_vrate: i32,
    /// LMR の深さ側係数
    pub reduction_rate1: i32,
    /// LMR の手数側係数
    pub reduction_rate2: i32,
    /// razoring のマージン（残り深さ 0〜3 手）
    pub razor_margins: [i32; 4],
    /// futility pruning を行う最大の深さ
    pub fut_prun_max_depth: Depth,
    /// futility pruning の深さあたりのマージン
    pub fut_prun_margin_rate: i32,
    /// 指し手ごとの futility pruning の固定マージン
    pub fut_prun_margin: i32,
    /// ProbCut のマージン
    pub probcut_margin: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            ext_depth_check: 6,
            ext_depth_one_reply: 4,
            ext_depth_recapture: 4,
            null_depth_rate: 11,
            null_depth_reduce: 12,
            null_depth_vrate: 150,
            reduction_rate1: 8,
            reduction_rate2: 8,
            razor_margins: [300, 350, 400, 450],
            fut_prun_max_depth: 28,
            fut_prun_margin_rate: 20,
            fut_prun_margin: 200,
            probcut_margin: 200,
        }
    }
}
