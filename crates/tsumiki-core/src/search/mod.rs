//! 探索モジュール
//!
//! Alpha-Beta探索と各種枝刈り。
//!
//! - Iterative Deepening
//! - Alpha-Beta with PVS
//! - Aspiration Windows
//! - 静止探索（Quiescence Search）
//! - 各種枝刈り（Null Move, ProbCut, Razoring, Futility, LMR）
//! - 延長（王手・応手1つ・取り返し・Singular Extension）
//! - Lazy SMP

mod alpha_beta;
mod config;
mod handler;
mod history;
mod info;
mod movepicker;
mod node;
mod node_stat;
mod pv;
mod qsearch;
mod result;
mod searcher;
mod see;
mod stats;
mod time_manager;
mod tree;

pub use config::{SearchConfig, SearchParams};
pub use handler::{NoopHandler, SearchHandler};
pub use history::{HISTORY_MAX, History};
pub use info::SearchInfo;
pub use node::{GenPhase, Killers, Node};
pub use node_stat::NodeStat;
pub use pv::{Pv, PvElement};
pub use result::SearchResult;
pub use searcher::Searcher;
pub use see::see;
pub use time_manager::TimeManager;
pub use tree::{STACK_SIZE, Tree};
