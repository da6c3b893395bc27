//! 探索スタックの1段（ノード）

use smallvec::SmallVec;

use super::Pv;
use crate::position::CheckState;
use crate::position::movegen::MAX_MOVES;
use crate::types::{ExtMove, Move, Piece, Score};

/// 指し手生成の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenPhase {
    /// 置換表の手を返してから駒を取る手を生成
    #[default]
    Init,
    Captures,
    Killers,
    Quiets,
    BadCaptures,
    /// 置換表の手を返してから王手回避手を生成
    InitEvasions,
    Evasions,
    InitQuies,
    Quies,
    /// 末端付近の静止探索（取る価値の低い手を除く）
    InitQuies2,
    Quies2,
    /// ProbCut 用（SEE が閾値以上の取る手のみ）
    InitProb,
    ProbCaptures,
    End,
}

/// キラー手（2枠、良し悪しのカウンタ付き）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Killers {
    pub move1: Move,
    pub count1: i32,
    pub move2: Move,
    pub count2: i32,
}

impl Default for Killers {
    fn default() -> Self {
        Killers { move1: Move::NONE, count1: 0, move2: Move::NONE, count2: 0 }
    }
}

impl Killers {
    pub fn clear(&mut self) {
        *self = Killers::default();
    }

    /// カットした手を登録する
    ///
    /// 1枠目と同じ手なら1枠目の評価を上げ、2枠目と同じ手なら2枠目を上げて
    /// 1枠目を上回れば入れ替える。新しい手は1枠目に入り、元の1枠目は2枠目に下がる。
    pub fn add(&mut self, mv: Move) {
        if mv == self.move1 {
            self.count1 += 2;
            self.count2 -= 1;
        } else if mv == self.move2 {
            self.count2 += 2;
            self.count1 -= 1;
            if self.count2 > self.count1 {
                std::mem::swap(&mut self.move1, &mut self.move2);
                std::mem::swap(&mut self.count1, &mut self.count2);
            }
        } else {
            self.move2 = self.move1;
            self.count2 = -1;
            self.move1 = mv;
            self.count1 = 0;
        }
    }

    #[inline]
    pub fn is_good1(&self) -> bool {
        self.move1.is_some() && self.count1 >= 0
    }

    #[inline]
    pub fn is_good2(&self) -> bool {
        self.move2.is_some() && self.count2 >= 0
    }

    /// 評価が負でないキラー手のどちらかと一致するか
    #[inline]
    pub fn is_good_killer(&self, mv: Move) -> bool {
        (mv == self.move1 && self.is_good1()) || (mv == self.move2 && self.is_good2())
    }
}

/// 探索スタックの1段
#[derive(Debug, Clone)]
pub struct Node {
    /// 局面のハッシュキー
    pub key: u64,
    /// 駒割り（先手視点、差分更新）
    pub material: Score,
    /// 静的評価のキャッシュ（先手視点、未計算なら `Score::INVALID`）
    pub score: Score,
    pub check_state: CheckState,
    /// このノードで指した手と取った駒
    pub mv: Move,
    pub captured: Piece,
    pub tt_move: Move,
    /// singular extension の検証探索で除外する手
    pub excluded_move: Move,
    pub killers: Killers,
    pub gen_phase: GenPhase,
    pub moves: Vec<ExtMove>,
    /// `moves` の次に返す位置
    pub cursor: usize,
    /// `moves` の先頭に詰めた SEE < 0 の取る手の終端
    pub bad_capture_end: usize,
    pub prob_threshold: Score,
    /// 探索済みの静かな手（History の減点用）
    pub quiets_searched: SmallVec<[Move; 32]>,
    pub pv: Pv,
    /// 千日手判定を経由した値を含む（置換表に保存しない）
    pub is_historical: bool,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            key: 0,
            material: Score::ZERO,
            score: Score::INVALID,
            check_state: CheckState::NONE,
            mv: Move::NONE,
            captured: Piece::EMPTY,
            tt_move: Move::NONE,
            excluded_move: Move::NONE,
            killers: Killers::default(),
            gen_phase: GenPhase::End,
            moves: Vec::with_capacity(MAX_MOVES),
            cursor: 0,
            bad_capture_end: 0,
            prob_threshold: Score::ZERO,
            quiets_searched: SmallVec::new(),
            pv: Pv::new(),
            is_historical: false,
        }
    }
}

impl Node {
    /// 置換表の手かキラー手として先に返す手か
    #[inline]
    pub fn is_prior_move(&self, mv: Move) -> bool {
        mv == self.tt_move || self.killers.is_good_killer(mv)
    }

    /// 指し手リストを空にする
    #[inline]
    pub fn reset_moves(&mut self) {
        self.moves.clear();
        self.cursor = 0;
        self.bad_capture_end = 0;
    }

    /// 次に返す指し手が残っているか
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor < self.moves.len()
    }
}
