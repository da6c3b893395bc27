//! # tsumiki-core
//!
//! 将棋の探索エンジンコアライブラリ。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, Square, Piece, Move, Score, etc.）
//! - `position`: 局面表現とdo_move/undo_move、指し手生成、1手詰め、棋譜
//! - `eval`: 評価関数（駒割り）
//! - `tt`: 置換表（Transposition Table）
//! - `shek`: 同一局面・優越局面の検出と連続王手の千日手
//! - `search`: 探索アルゴリズムと時間管理

pub mod eval;
pub mod position;
pub mod search;
pub mod shek;
pub mod tt;
pub mod types;

pub use eval::{Evaluator, MaterialEvaluator, ZeroEvaluator};
pub use position::{Position, PositionError, Record};
pub use search::{NoopHandler, SearchConfig, SearchHandler, SearchResult, Searcher};
pub use types::{Color, Move, Score};
