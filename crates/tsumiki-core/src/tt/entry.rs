//! 置換表エントリ
//!
//! ```text
//! bit  0-15: 指し手（Move16）
//! bit 16-31: 評価値（i16、詰みスコアは ply で正規化済み）
//! bit 32-47: 深さ（i16）
//! bit 48-49: Bound
//! bit 50   : 詰めろフラグ
//! bit 56-63: 世代（0 は空きエントリ）
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{Depth, Move16, Score};

const SCORE_SHIFT: u32 = 16;
const DEPTH_SHIFT: u32 = 32;
const BOUND_SHIFT: u32 = 48;
const MATE_SHIFT: u32 = 50;
const AGE_SHIFT: u32 = 56;

/// 評価値の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    /// 評価値を持たない（PV の指し手のみ）
    None = 0,
    /// 上界（fail-low）
    Upper = 1,
    /// 下界（fail-high）
    Lower = 2,
    /// 正確な値
    Exact = 3,
}

impl Bound {
    #[inline]
    const fn from_bits(bits: u64) -> Bound {
        match bits & 3 {
            1 => Bound::Upper,
            2 => Bound::Lower,
            3 => Bound::Exact,
            _ => Bound::None,
        }
    }

    /// 探索窓から Bound を決める
    #[inline]
    pub fn from_window(score: Score, alpha: Score, beta: Score) -> Bound {
        if score >= beta {
            Bound::Lower
        } else if score <= alpha {
            Bound::Upper
        } else {
            Bound::Exact
        }
    }

    #[inline]
    pub const fn is_lower(self) -> bool {
        matches!(self, Bound::Lower | Bound::Exact)
    }

    #[inline]
    pub const fn is_upper(self) -> bool {
        matches!(self, Bound::Upper | Bound::Exact)
    }
}

/// エントリから読み出した値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtData {
    pub mv: Move16,
    /// 正規化された評価値（`score(ply)` で探索中の値に戻す）
    raw_score: i16,
    pub depth: Depth,
    pub bound: Bound,
    pub mate_threat: bool,
    pub age: u8,
}

impl TtData {
    pub const EMPTY: TtData = TtData {
        mv: Move16::NONE,
        raw_score: 0,
        depth: 0,
        bound: Bound::None,
        mate_threat: false,
        age: 0,
    };

    pub(crate) fn new(mv: Move16, score: Score, ply: i32, depth: Depth, bound: Bound, mate_threat: bool, age: u8) -> TtData {
        TtData {
            mv,
            raw_score: normalize(score, ply).raw() as i16,
            depth: depth.clamp(i16::MIN as Depth, i16::MAX as Depth),
            bound,
            mate_threat,
            age,
        }
    }

    /// 探索中の ply から見た評価値
    #[inline]
    pub fn score(&self, ply: i32) -> Score {
        let s = Score::new(self.raw_score as i32);
        if s >= Score::MATE {
            s - ply
        } else if s <= -Score::MATE {
            s + ply
        } else {
            s
        }
    }

    /// 詰みスコアか
    #[inline]
    pub fn is_mate(&self) -> bool {
        Score::new(self.raw_score as i32).is_mate()
    }

    /// 評価値を残したまま指し手と世代を差し替える
    #[inline]
    pub(crate) fn with_pv_move(self, mv: Move16, depth: Depth, age: u8) -> TtData {
        TtData { mv, depth: self.depth.max(depth), age, ..self }
    }

    #[inline]
    pub(crate) fn is_vacant(&self) -> bool {
        self.age == 0
    }

    fn pack(&self) -> u64 {
        self.mv.raw() as u64
            | (self.raw_score as u16 as u64) << SCORE_SHIFT
            | (self.depth as i16 as u16 as u64) << DEPTH_SHIFT
            | (self.bound as u64) << BOUND_SHIFT
            | (self.mate_threat as u64) << MATE_SHIFT
            | (self.age as u64) << AGE_SHIFT
    }

    fn unpack(data: u64) -> TtData {
        TtData {
            mv: Move16::from_raw(data as u16),
            raw_score: (data >> SCORE_SHIFT) as u16 as i16,
            depth: (data >> DEPTH_SHIFT) as u16 as i16 as Depth,
            bound: Bound::from_bits(data >> BOUND_SHIFT),
            mate_threat: (data >> MATE_SHIFT) & 1 != 0,
            age: (data >> AGE_SHIFT) as u8,
        }
    }
}

/// 詰みスコアを現局面からの手数に正規化する
fn normalize(score: Score, ply: i32) -> Score {
    if score >= Score::MATE {
        Score::new((score.raw() + ply).min(Score::INFINITY.raw()))
    } else if score <= -Score::MATE {
        Score::new((score.raw() - ply).max(-Score::INFINITY.raw()))
    } else {
        score
    }
}

/// 置換表エントリ
#[derive(Debug, Default)]
pub struct TtEntry {
    key_xor_data: AtomicU64,
    data: AtomicU64,
}

impl TtEntry {
    pub(crate) const fn new() -> TtEntry {
        TtEntry {
            key_xor_data: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    /// キーが一致すれば値を返す
    #[inline]
    pub fn read(&self, key: u64) -> Option<TtData> {
        let data = self.data.load(Ordering::Relaxed);
        let check = self.key_xor_data.load(Ordering::Relaxed);
        if data == 0 || check ^ data != key {
            return None;
        }
        Some(TtData::unpack(data))
    }

    /// キーを問わず値を返す（置換先の選択用）
    #[inline]
    pub(crate) fn peek(&self) -> TtData {
        TtData::unpack(self.data.load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn write(&self, key: u64, data: &TtData) {
        let packed = data.pack();
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor_data.store(key ^ packed, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn clear(&self) {
        self.data.store(0, Ordering::Relaxed);
        self.key_xor_data.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_entry_packing() {
        let data = TtData::new(Move16::from_raw(0x8123), Score::new(-321), 0, -5, Bound::Upper, true, 7);
        let entry = TtEntry::new();
        entry.write(0xdead_beef_0123_4567, &data);
        let read = entry.read(0xdead_beef_0123_4567).unwrap();
        assert_eq!(read, data);
        assert_eq!(read.score(10), Score::new(-321));
        assert_eq!(read.depth, -5);
        assert!(read.mate_threat);
        assert!(entry.read(0xdead_beef_0123_4568).is_none());
    }

    #[test]
    fn test_tt_mate_score_normalized() {
        // ply 3 で保存した勝ちスコアを ply 7 で読むと、詰みまでの手数が 4 手延びる
        let win = Score::win_in(8);
        let data = TtData::new(Move16::NONE, win, 3, 16, Bound::Exact, false, 1);
        assert_eq!(data.score(3), win);
        assert_eq!(data.score(7), Score::win_in(12));
        let lose = Score::lose_in(8);
        let data = TtData::new(Move16::NONE, lose, 3, 16, Bound::Exact, false, 1);
        assert_eq!(data.score(3), lose);
    }

    #[test]
    fn test_bound_from_window() {
        let alpha = Score::new(-10);
        let beta = Score::new(10);
        assert_eq!(Bound::from_window(Score::new(10), alpha, beta), Bound::Lower);
        assert_eq!(Bound::from_window(Score::new(-10), alpha, beta), Bound::Upper);
        assert_eq!(Bound::from_window(Score::new(0), alpha, beta), Bound::Exact);
    }
}
