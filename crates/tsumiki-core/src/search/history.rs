//! History統計
//!
//! 静かな手（駒を取らない手）の成功/失敗を記録し、手の順序付けに利用する。
//!
//! - from→to: [Color][from][to]
//! - piece→to: [Color][駒種（成り後）][to]
//!
//! 全スレッドで共有する。更新は Relaxed のアトミック操作で、
//! 競合で値が多少ずれても順序付けにしか使わないので問題にならない。

use std::sync::atomic::{AtomicI16, Ordering};

use crate::types::{Color, Depth, DEPTH_1PLY, Move, PieceType, Square};

/// 値の上限（絶対値）
pub const HISTORY_MAX: i32 = 0x2000;

const FROM_TO_SIZE: usize = Color::NUM * Square::NUM * Square::NUM;
const PIECE_TO_SIZE: usize = Color::NUM * PieceType::NUM * Square::NUM;

/// 指し手の History
pub struct History {
    from_to: Box<[AtomicI16]>,
    piece_to: Box<[AtomicI16]>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> History {
        History { from_to: zeroed(FROM_TO_SIZE), piece_to: zeroed(PIECE_TO_SIZE) }
    }

    /// すべて 0 にする（新しい対局の開始時）
    pub fn clear(&self) {
        for entry in self.from_to.iter().chain(self.piece_to.iter()) {
            entry.store(0, Ordering::Relaxed);
        }
    }

    /// 探索開始時に値を半分にして古い統計の影響を弱める
    pub fn reduce(&self) {
        for entry in self.from_to.iter().chain(self.piece_to.iter()) {
            let v = entry.load(Ordering::Relaxed);
            entry.store(v / 2, Ordering::Relaxed);
        }
    }

    /// 並べ替え用の値
    ///
    /// 駒打ちは piece→to のみなので 2 倍して盤上の手と釣り合わせる。
    pub fn get(&self, color: Color, mv: Move) -> i32 {
        let Some(pt) = mv.piece_type_after() else {
            return 0;
        };
        let piece_to = self.piece_to[piece_to_index(color, pt, mv.to())].load(Ordering::Relaxed) as i32;
        match mv.from() {
            Some(from) => {
                let from_to = self.from_to[from_to_index(color, from, mv.to())].load(Ordering::Relaxed) as i32;
                from_to + piece_to
            }
            None => piece_to * 2,
        }
    }

    /// beta カットした手 `best` を加点し、それ以前に探索した静かな手を減点する
    pub fn update(&self, color: Color, best: Move, depth: Depth, searched: &[Move]) {
        let bonus = bonus(depth);
        self.add(color, best, bonus);
        for &mv in searched {
            if mv != best {
                self.add(color, mv, -bonus);
            }
        }
    }

    fn add(&self, color: Color, mv: Move, bonus: i32) {
        let Some(pt) = mv.piece_type_after() else {
            return;
        };
        if let Some(from) = mv.from() {
            apply(&self.from_to[from_to_index(color, from, mv.to())], bonus);
        }
        apply(&self.piece_to[piece_to_index(color, pt, mv.to())], bonus);
    }
}

/// 深さ d 手のボーナス `(d+1)^2 - 3`
#[inline]
fn bonus(depth: Depth) -> i32 {
    let d = (depth / DEPTH_1PLY).max(0);
    (d + 1) * (d + 1) - 3
}

/// 更新式: entry += b - entry * |b| / HISTORY_MAX（b は ±HISTORY_MAX に丸める）
#[inline]
fn apply(entry: &AtomicI16, bonus: i32) {
    let clamped = bonus.clamp(-HISTORY_MAX, HISTORY_MAX);
    let value = entry.load(Ordering::Relaxed) as i32;
    let updated = value + clamped - value * clamped.abs() / HISTORY_MAX;
    entry.store(updated.clamp(-HISTORY_MAX, HISTORY_MAX) as i16, Ordering::Relaxed);
}

#[inline]
fn from_to_index(color: Color, from: Square, to: Square) -> usize {
    (color.index() * Square::NUM + from.index()) * Square::NUM + to.index()
}

#[inline]
fn piece_to_index(color: Color, pt: PieceType, to: Square) -> usize {
    (color.index() * PieceType::NUM + pt.index()) * Square::NUM + to.index()
}

fn zeroed(size: usize) -> Box<[AtomicI16]> {
    (0..size).map(|_| AtomicI16::new(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(from: (u8, u8), to: (u8, u8)) -> Move {
        Move::normal(Square::new(from.0, from.1), Square::new(to.0, to.1), false, PieceType::Silver)
    }

    #[test]
    fn test_history_bonus() {
        assert_eq!(bonus(0), -2);
        assert_eq!(bonus(8), 1);
        assert_eq!(bonus(3 * DEPTH_1PLY), 13);
    }

    #[test]
    fn test_history_update_rewards_best_and_penalizes_others() {
        let history = History::new();
        let best = quiet((6, 8), (6, 7));
        let other = quiet((2, 8), (2, 7));
        history.update(Color::Black, best, 5 * DEPTH_1PLY, &[other, best]);
        assert!(history.get(Color::Black, best) > 0);
        assert!(history.get(Color::Black, other) < 0);
        // 手番ごとに独立
        assert_eq!(history.get(Color::White, best), 0);
    }

    #[test]
    fn test_history_drop_counts_double() {
        let history = History::new();
        let drop = Move::drop(PieceType::Gold, Square::new(4, 4));
        history.update(Color::White, drop, 4 * DEPTH_1PLY, &[]);
        // bonus(4 ply) = 22 が piece→to に加算され、2 倍で返る
        assert_eq!(history.get(Color::White, drop), 44);
    }

    #[test]
    fn test_history_saturates() {
        let history = History::new();
        let best = quiet((6, 8), (6, 7));
        for _ in 0..10_000 {
            history.update(Color::Black, best, 40 * DEPTH_1PLY, &[]);
        }
        let value = history.get(Color::Black, best);
        assert!(value <= 2 * HISTORY_MAX);
        assert!(value > HISTORY_MAX);
    }

    #[test]
    fn test_history_reduce_and_clear() {
        let history = History::new();
        let best = quiet((6, 8), (6, 7));
        history.update(Color::Black, best, 4 * DEPTH_1PLY, &[]);
        let before = history.get(Color::Black, best);
        history.reduce();
        assert_eq!(history.get(Color::Black, best), before / 2);
        history.clear();
        assert_eq!(history.get(Color::Black, best), 0);
    }
}
