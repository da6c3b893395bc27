//! 同一局面・優越局面の検出（SHEK）と連続王手の千日手（SCR）
//!
//! - `HandSet`: 先手の持ち駒を単項表現したビット集合（包含関係で優劣を比較する）
//! - `ShekTable`: 探索経路上の局面を盤面キーで登録する表
//! - `ScrDetector`: 経路と棋譜をさかのぼって千日手の勝敗を判定する

mod hand_set;
mod scr;
mod table;

pub use hand_set::HandSet;
pub use scr::{ScrDetector, ScrPath, ScrState};
pub use table::ShekTable;

/// 登録済みの局面と比べた現局面の状態（手番側から見た優劣）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShekState {
    /// 該当なし
    None,
    /// 同一局面
    Equal,
    /// 同一局面が経路上に 3 回以上現れている
    Equal4,
    /// 手番側が得をしている
    Superior,
    /// 手番側が損をしている
    Inferior,
}
