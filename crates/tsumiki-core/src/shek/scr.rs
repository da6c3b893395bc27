//! 連続王手の千日手（Successive Checks Repetition）の判定
//!
//! 現局面から経路をさかのぼり、同一局面が現れるまでの間に
//! どちらかが王手をかけ続けていたかで勝敗を決める。

use crate::position::{PositionError, Record};

/// 判定結果（現局面の手番側から見た勝敗）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrState {
    None,
    Draw,
    Win,
    Lose,
}

/// 判定に使う探索経路
pub trait ScrPath {
    /// 現局面の ply
    fn ply(&self) -> usize;
    /// `ply` の局面のキーと、その局面で手番側が王手されていたか
    fn node(&self, ply: usize) -> (u64, bool);
    /// 現局面のキー
    fn current_key(&self) -> u64;
}

/// 連続王手の千日手の検出器
#[derive(Debug, Clone, Default)]
pub struct ScrDetector {
    /// 探索開始局面より前の局面。直前の局面が先頭
    history: Vec<(u64, bool)>,
}

/// さかのぼりながら双方の王手の継続を追う
struct Streak {
    current_turn: bool,
    current_checking: bool,
    enemy_checking: bool,
}

impl Streak {
    fn new() -> Streak {
        Streak { current_turn: false, current_checking: true, enemy_checking: true }
    }

    /// 1 局面さかのぼる
    #[inline]
    fn step(&mut self, check: bool) {
        if self.current_turn {
            self.enemy_checking &= check;
        } else {
            self.current_checking &= check;
        }
        self.current_turn = !self.current_turn;
    }

    #[inline]
    fn verdict(&self) -> ScrState {
        if self.current_checking {
            ScrState::Lose
        } else if self.enemy_checking {
            ScrState::Win
        } else {
            ScrState::Draw
        }
    }

    #[inline]
    fn broken(&self) -> bool {
        !self.current_checking && !self.enemy_checking
    }
}

impl ScrDetector {
    /// 保持する棋譜の最大長
    pub const MAX_LENGTH: usize = 32;

    pub fn new() -> ScrDetector {
        ScrDetector::default()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// 棋譜の各局面を登録する（直近 `MAX_LENGTH` 局面）
    pub fn register_record(&mut self, record: &Record) -> Result<(), PositionError> {
        self.history.clear();
        let mut entries = Vec::with_capacity(record.len());
        let result = record.replay(|pos, _| entries.push((pos.key(), pos.in_check())));
        if let Err(err) = result {
            log::error!("failed to register record: {err}");
            return Err(err);
        }
        self.history = entries.into_iter().rev().take(Self::MAX_LENGTH).collect();
        Ok(())
    }

    /// 同一局面が経路上に 1 回でも現れたら判定する
    pub fn detect_short<P: ScrPath>(&self, path: &P) -> ScrState {
        let key = path.current_key();
        let mut streak = Streak::new();
        for ply in (0..path.ply()).rev() {
            let (node_key, check) = path.node(ply);
            streak.step(check);
            if node_key == key {
                return streak.verdict();
            }
            if streak.broken() {
                return ScrState::Draw;
            }
        }
        ScrState::None
    }

    /// 同一局面が経路と棋譜を通して 3 回現れたら判定する
    pub fn detect<P: ScrPath>(&self, path: &P) -> ScrState {
        let key = path.current_key();
        let mut streak = Streak::new();
        let mut repetition = 0;
        let ancestors = (0..path.ply()).rev().map(|ply| path.node(ply));
        for (node_key, check) in ancestors.chain(self.history.iter().copied()) {
            streak.step(check);
            if node_key == key {
                repetition += 1;
                if repetition == 3 {
                    return streak.verdict();
                }
            }
            if streak.broken() {
                return ScrState::Draw;
            }
        }
        ScrState::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// テスト用の経路
    struct Path {
        nodes: Vec<(u64, bool)>,
        key: u64,
    }

    impl ScrPath for Path {
        fn ply(&self) -> usize {
            self.nodes.len()
        }

        fn node(&self, ply: usize) -> (u64, bool) {
            self.nodes[ply]
        }

        fn current_key(&self) -> u64 {
            self.key
        }
    }

    const KEY: u64 = 0x1234;

    #[test]
    fn test_scr_short_no_repetition() {
        let scr = ScrDetector::new();
        let path = Path { nodes: vec![(0, false)], key: KEY };
        assert_eq!(scr.detect_short(&path), ScrState::None);
    }

    #[test]
    fn test_scr_short_draw_win_lose() {
        let scr = ScrDetector::new();
        let draw = Path { nodes: vec![(KEY, false), (0, false)], key: KEY };
        assert_eq!(scr.detect_short(&draw), ScrState::Draw);

        // 相手が王手をかけ続けている
        let win = Path { nodes: vec![(KEY, true), (0, false)], key: KEY };
        assert_eq!(scr.detect_short(&win), ScrState::Win);

        // 自分が王手をかけ続けている
        let lose = Path { nodes: vec![(KEY, false), (0, true)], key: KEY };
        assert_eq!(scr.detect_short(&lose), ScrState::Lose);
    }

    #[test]
    fn test_scr_short_stops_when_both_streaks_break() {
        let scr = ScrDetector::new();
        let path = Path { nodes: vec![(KEY, false), (1, false), (2, false)], key: KEY };
        assert_eq!(scr.detect_short(&path), ScrState::Draw);
        let path = Path { nodes: vec![(KEY, true), (1, true), (2, false)], key: KEY };
        assert_eq!(scr.detect_short(&path), ScrState::Win);
    }

    #[test]
    fn test_scr_detect_needs_three_repetitions() {
        let scr = ScrDetector::new();
        let twice = Path {
            nodes: vec![(KEY, true), (1, false), (KEY, true), (2, false)],
            key: KEY,
        };
        assert_eq!(scr.detect(&twice), ScrState::None);

        let nodes = vec![(KEY, true), (1, false), (KEY, true), (2, false), (KEY, true), (3, false)];
        let win = Path { nodes: nodes.clone(), key: KEY };
        assert_eq!(scr.detect(&win), ScrState::Win);

        let lose_nodes: Vec<_> = nodes.iter().map(|&(key, check)| (key, !check)).collect();
        let lose = Path { nodes: lose_nodes, key: KEY };
        assert_eq!(scr.detect(&lose), ScrState::Lose);

        let draw_nodes: Vec<_> = nodes.iter().map(|&(key, _)| (key, false)).collect();
        let draw = Path { nodes: draw_nodes, key: KEY };
        assert_eq!(scr.detect(&draw), ScrState::Draw);
    }

    #[test]
    fn test_scr_detect_continues_into_record() {
        // 玉を往復させる棋譜。開始局面に 2 回戻っている
        let record = Record::parse("4k4/9/9/9/9/9/9/9/4K4 b - 1 moves 5i4i 5a4a 4i5i 4a5a 5i4i 5a4a 4i5i 4a5a").unwrap();
        let mut scr = ScrDetector::new();
        scr.register_record(&record).unwrap();
        assert_eq!(scr.len(), 8);

        let current = record.position().unwrap();
        // 探索経路上に現局面が 1 回だけある（2 手前）
        let path = Path {
            nodes: vec![(current.key(), false), (0, false)],
            key: current.key(),
        };
        assert_eq!(scr.detect_short(&path), ScrState::Draw);
        // 棋譜側だけで判定する。双方とも王手をかけていないので引き分け
        let root_path = Path { nodes: vec![], key: current.key() };
        assert_eq!(scr.detect(&root_path), ScrState::Draw);
    }
}
