//! 基本型
//!
//! - `Color`: 手番
//! - `Square`: 升目（筋×9+段）
//! - `PieceType` / `Piece`: 駒種と先後付きの駒
//! - `Hand`: 持ち駒
//! - `Move` / `Move16` / `ExtMove`: 指し手
//! - `Score` / `Depth`: 評価値と探索深さ

mod color;
mod hand;
mod moves;
mod piece;
mod score;
mod square;

pub use color::Color;
pub use hand::Hand;
pub use moves::{ExtMove, Move, Move16};
pub use piece::{Piece, PieceType};
pub use score::{DEPTH_1PLY, Depth, Score};
pub use square::Square;
