//! 局面・指し手の入力エラー

use thiserror::Error;

/// SFEN・USI 指し手・棋譜の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// 盤面の形式が不正
    #[error("invalid board: {0}")]
    Board(String),
    /// 手番の形式が不正
    #[error("invalid side to move: {0}")]
    SideToMove(String),
    /// 持ち駒の形式が不正
    #[error("invalid hand: {0}")]
    Hand(String),
    /// 手数の形式が不正
    #[error("invalid ply: {0}")]
    Ply(String),
    /// USI 指し手の書式が不正
    #[error("malformed move: {0}")]
    MoveSyntax(String),
    /// 局面に対して不正な指し手
    #[error("illegal move {mv} at ply {ply}")]
    IllegalMove { mv: String, ply: usize },
}
