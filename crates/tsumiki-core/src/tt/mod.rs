//! 置換表モジュール
//!
//! 探索結果をキャッシュする置換表（Transposition Table）。
//!
//! - `TtEntry`: エントリ（AtomicU64 × 2 = 16バイト）
//! - `Cluster`: 4 エントリのグループ（64バイト）
//! - `TranspositionTable`: テーブル本体
//!
//! エントリは `key ^ data` と `data` の 2 語で保持し、読み出し時に XOR で
//! 64bit キー全体を検証する。書き込み途中の読み出しはキー不一致として扱われる。

mod entry;
mod table;

pub use entry::{Bound, TtData, TtEntry};
pub use table::{TranspositionTable, TtStatus};

/// クラスターサイズ（エントリ数）
pub const CLUSTER_SIZE: usize = 4;
