//! Zobrist ハッシュ
//!
//! 盤上の駒・持ち駒・手番それぞれに乱数を割り当てる。
//! 盤面キー（駒配置のみ）は SHEK 表の索引にも使うため、持ち駒と手番は別キーで管理する。

use std::sync::LazyLock;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::{Color, Piece, PieceType, Square};

/// 1 駒種あたりの持ち駒最大枚数（歩 18 枚）
const MAX_HAND_COUNT: usize = 18;

pub(crate) struct ZobristTable {
    /// [piece][square]
    psq: [[u64; Square::NUM]; Piece::NUM],
    /// [color][hand_index][count]
    hand: [[[u64; MAX_HAND_COUNT + 1]; 7]; Color::NUM],
    /// 後手番のとき XOR する
    side: u64,
}

impl ZobristTable {
    fn generate() -> Self {
        // 再現性のため固定シード
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x7473_756d_696b_6921);
        let mut table = ZobristTable {
            psq: [[0; Square::NUM]; Piece::NUM],
            hand: [[[0; MAX_HAND_COUNT + 1]; 7]; Color::NUM],
            side: 0,
        };
        for piece in table.psq.iter_mut().skip(1) {
            for key in piece.iter_mut() {
                *key = rng.random();
            }
        }
        for color in table.hand.iter_mut() {
            for kind in color.iter_mut() {
                // 0 枚目は 0 のままにして、空の持ち駒がキーに寄与しないようにする
                for key in kind.iter_mut().skip(1) {
                    *key = rng.random();
                }
            }
        }
        table.side = rng.random();
        table
    }
}

static ZOBRIST: LazyLock<ZobristTable> = LazyLock::new(ZobristTable::generate);

/// 盤上の駒のキー
#[inline]
pub(crate) fn psq(piece: Piece, sq: Square) -> u64 {
    ZOBRIST.psq[piece.index()][sq.index()]
}

/// 持ち駒 `count` 枚目のキー
#[inline]
pub(crate) fn hand(color: Color, pt: PieceType, count: u8) -> u64 {
    match pt.hand_index() {
        Some(i) => ZOBRIST.hand[color.index()][i][(count as usize).min(MAX_HAND_COUNT)],
        None => 0,
    }
}

/// 手番キー
#[inline]
pub(crate) fn side() -> u64 {
    ZOBRIST.side
}
