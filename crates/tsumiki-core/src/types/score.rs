//! 評価値（Score）と探索深さ（Depth）
//!
//! 詰みスコアは `INFINITY - ply` の形で表現し、`|score| >= MATE` を詰み領域とする。
//! 通常の評価値は `MATERIAL_INFINITY` 程度までに収まる。

use serde::{Deserialize, Serialize};

/// 探索深さ（1手 = `DEPTH_1PLY`）
pub type Depth = i32;

/// 1手分の深さ
///
/// 延長や削減を手数未満の単位で扱うため 8 倍スケールにしている。
pub const DEPTH_1PLY: Depth = 8;

/// 評価値
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Score(i32);

impl Score {
    /// ゼロ
    pub const ZERO: Score = Score(0);
    /// 無限大（詰みスコアの上限）
    pub const INFINITY: Score = Score(20000);
    /// 詰み領域の下限
    pub const MATE: Score = Score(15000);
    /// 駒割りだけで到達しうる最大値
    pub const MATERIAL_INFINITY: Score = Score(5000);
    /// 無効値（未計算の静的評価など）
    pub const INVALID: Score = Score(30000);

    #[inline]
    pub const fn new(v: i32) -> Score {
        Score(v)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// ply 手目で勝ちになるスコア
    #[inline]
    pub const fn win_in(ply: i32) -> Score {
        Score(Self::INFINITY.0 - ply)
    }

    /// ply 手目で負けになるスコア
    #[inline]
    pub const fn lose_in(ply: i32) -> Score {
        Score(-Self::INFINITY.0 + ply)
    }

    /// 詰みスコア（勝ち/負け）か
    #[inline]
    pub const fn is_mate(self) -> bool {
        self.0 >= Self::MATE.0 || self.0 <= -Self::MATE.0
    }

    #[inline]
    pub const fn is_win(self) -> bool {
        self.0 >= Self::MATE.0
    }

    #[inline]
    pub const fn is_loss(self) -> bool {
        self.0 <= -Self::MATE.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    #[inline]
    pub const fn abs(self) -> Score {
        Score(self.0.abs())
    }
}

impl std::ops::Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        Score(-self.0)
    }
}

impl std::ops::Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score(self.0 - rhs.0)
    }
}

impl std::ops::Add<i32> for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: i32) -> Score {
        Score(self.0 + rhs)
    }
}

impl std::ops::Sub<i32> for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: i32) -> Score {
        Score(self.0 - rhs)
    }
}

impl std::ops::AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        self.0 -= rhs.0;
    }
}

impl std::ops::Mul<i32> for Score {
    type Output = Score;

    #[inline]
    fn mul(self, rhs: i32) -> Score {
        Score(self.0 * rhs)
    }
}

impl std::ops::Div<i32> for Score {
    type Output = Score;

    #[inline]
    fn div(self, rhs: i32) -> Score {
        Score(self.0 / rhs)
    }
}

impl From<i32> for Score {
    fn from(v: i32) -> Score {
        Score(v)
    }
}

impl From<Score> for i32 {
    fn from(s: Score) -> i32 {
        s.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
