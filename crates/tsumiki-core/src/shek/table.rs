//! SHEK 表
//!
//! 盤面キー（持ち駒・手番を含まない）で索引し、同じ盤面で持ち駒の異なる局面を
//! 1 バケット 4 スロットまで保持する。

use crate::position::Position;
use crate::types::Color;

use super::{HandSet, ShekState};

const WIDTH: u32 = 16;
const SLOTS: usize = 4;

const COUNT_MASK: u32 = 0x0000_0007;
const TURN_MASK: u32 = 0x0000_0008;
const HASH_MASK: u32 = 0xffff_fff0;
const MAX_COUNT: u32 = 7;

#[derive(Debug, Clone, Copy, Default)]
struct ShekSlot {
    hand_set: HandSet,
    /// 上位 28bit: キーの上位ビット、bit3: 先手番、bit0-2: 登録回数
    data: u32,
}

impl ShekSlot {
    #[inline]
    fn count(&self) -> u32 {
        self.data & COUNT_MASK
    }

    #[inline]
    fn is_vacant(&self) -> bool {
        self.count() == 0
    }

    #[inline]
    fn turn(&self) -> Color {
        if self.data & TURN_MASK != 0 { Color::Black } else { Color::White }
    }

    #[inline]
    fn matches(&self, key: u64) -> bool {
        !self.is_vacant() && ((key >> 32) as u32 ^ self.data) & HASH_MASK == 0
    }

    fn set(&mut self, key: u64, hand_set: HandSet, turn: Color) {
        self.hand_set = hand_set;
        self.data = (key >> 32) as u32 & HASH_MASK;
        if turn == Color::Black {
            self.data |= TURN_MASK;
        }
        self.data |= 1;
    }

    fn retain(&mut self) {
        if self.count() < MAX_COUNT {
            self.data += 1;
        } else {
            log::debug!("shek slot count saturated");
        }
    }

    fn release(&mut self) {
        if !self.is_vacant() {
            self.data -= 1;
        }
    }

    /// 登録済みの局面と比べた現局面の状態
    fn check(&self, hand_set: HandSet, turn: Color) -> ShekState {
        let turn0 = self.turn();
        match hand_set.compare_to(self.hand_set) {
            ShekState::Equal => {
                if turn0 != turn {
                    ShekState::Superior
                } else if self.count() >= 3 {
                    ShekState::Equal4
                } else {
                    ShekState::Equal
                }
            }
            ShekState::Superior => {
                if turn == Color::Black {
                    ShekState::Superior
                } else if turn0 == Color::Black {
                    ShekState::None
                } else {
                    ShekState::Inferior
                }
            }
            ShekState::Inferior => {
                if turn == Color::White {
                    ShekState::Superior
                } else if turn0 == Color::White {
                    ShekState::None
                } else {
                    ShekState::Inferior
                }
            }
            _ => ShekState::None,
        }
    }
}

/// SHEK 表
pub struct ShekTable {
    buckets: Vec<[ShekSlot; SLOTS]>,
}

impl Default for ShekTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ShekTable {
    pub fn new() -> ShekTable {
        ShekTable {
            buckets: vec![[ShekSlot::default(); SLOTS]; 1 << WIDTH],
        }
    }

    #[inline]
    fn bucket(&self, key: u64) -> &[ShekSlot; SLOTS] {
        &self.buckets[key as usize & ((1 << WIDTH) - 1)]
    }

    #[inline]
    fn bucket_mut(&mut self, key: u64) -> &mut [ShekSlot; SLOTS] {
        &mut self.buckets[key as usize & ((1 << WIDTH) - 1)]
    }

    /// すべての登録を消す
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = [ShekSlot::default(); SLOTS];
        }
    }

    /// 経路上の局面と比べた現局面の状態
    pub fn check(&self, pos: &Position) -> ShekState {
        let key = pos.board_key();
        match self.bucket(key).iter().find(|slot| slot.matches(key)) {
            Some(slot) => slot.check(HandSet::new(pos.hand(Color::Black)), pos.side_to_move()),
            None => ShekState::None,
        }
    }

    /// 局面を登録する（同じ局面なら回数を増やす）
    pub fn retain(&mut self, pos: &Position) {
        let key = pos.board_key();
        let hand_set = HandSet::new(pos.hand(Color::Black));
        let bucket = self.bucket_mut(key);
        if let Some(slot) = bucket.iter_mut().find(|slot| slot.matches(key) && slot.hand_set == hand_set) {
            slot.retain();
            return;
        }
        if let Some(slot) = bucket.iter_mut().find(|slot| slot.is_vacant()) {
            slot.set(key, hand_set, pos.side_to_move());
        }
    }

    /// 登録を 1 回分取り消す
    pub fn release(&mut self, pos: &Position) {
        let key = pos.board_key();
        let hand_set = HandSet::new(pos.hand(Color::Black));
        if let Some(slot) = self
            .bucket_mut(key)
            .iter_mut()
            .find(|slot| slot.matches(key) && slot.hand_set == hand_set)
        {
            slot.release();
        }
    }
}
