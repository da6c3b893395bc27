//! 評価関数
//!
//! 探索から見た評価関数の境界。評価値はすべて先手視点。
//!
//! - `material_score`: 駒割り（盤上＋持ち駒）
//! - `total_score`: 駒割りを元にした静的評価
//! - `material_delta`: 指し手による駒割りの変化（指した側の視点）

pub mod material;

use crate::position::Position;
use crate::types::{Color, Move, Piece, Score, Square};

/// 評価関数
///
/// 複数の探索スレッドから共有されるため `Send + Sync` を要求する。
pub trait Evaluator: Send + Sync {
    /// 駒割り（先手視点）
    fn material_score(&self, pos: &Position) -> Score;

    /// 静的評価値（先手視点）
    fn total_score(&self, material: Score, pos: &Position) -> Score;

    /// 指し手による駒割りの変化量（指した側の視点）
    fn material_delta(&self, mv: Move, captured: Piece) -> Score {
        let mut delta = captured.piece_type().map_or(0, material::exchange_value);
        if mv.is_promotion() {
            if let Some(pt) = mv.piece_type() {
                delta += material::promotion_value(pt);
            }
        }
        Score::new(delta)
    }
}

/// 駒割りのみの評価関数
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn material_score(&self, pos: &Position) -> Score {
        let mut score = 0;
        for sq in Square::all() {
            let piece = pos.piece_on(sq);
            if let (Some(pt), Some(color)) = (piece.piece_type(), piece.color()) {
                score += material::value(pt) * color.sign();
            }
        }
        for color in Color::ALL {
            for (pt, count) in pos.hand(color).iter() {
                score += material::value(pt) * count as i32 * color.sign();
            }
        }
        Score::new(score)
    }

    fn total_score(&self, material: Score, _pos: &Position) -> Score {
        material
    }
}

/// 常に 0 を返す評価関数（テスト用）
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroEvaluator;

impl Evaluator for ZeroEvaluator {
    fn material_score(&self, _pos: &Position) -> Score {
        Score::ZERO
    }

    fn total_score(&self, _material: Score, _pos: &Position) -> Score {
        Score::ZERO
    }

    fn material_delta(&self, _mv: Move, _captured: Piece) -> Score {
        Score::ZERO
    }
}
