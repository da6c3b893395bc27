//! 駒価値

use crate::types::PieceType;

/// 駒の価値
pub const fn value(pt: PieceType) -> i32 {
    match pt {
        PieceType::Pawn => 115,
        PieceType::Lance => 246,
        PieceType::Knight => 273,
        PieceType::Silver => 414,
        PieceType::Gold => 504,
        PieceType::Bishop => 625,
        PieceType::Rook => 695,
        PieceType::ProPawn => 535,
        PieceType::ProLance => 424,
        PieceType::ProKnight => 469,
        PieceType::ProSilver => 429,
        PieceType::Horse => 768,
        PieceType::Dragon => 903,
        PieceType::King => 0,
    }
}

/// 駒を取ったときの評価値の変化量（相手の駒が減り、自分の持ち駒が増える）
pub const fn exchange_value(pt: PieceType) -> i32 {
    if pt.is_promoted() { value(pt) + value(pt.unpromote()) } else { value(pt) * 2 }
}

/// 成りによる評価値の変化量
pub const fn promotion_value(pt: PieceType) -> i32 {
    value(pt.promote()) - value(pt.unpromote())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_value() {
        assert_eq!(exchange_value(PieceType::Pawn), 230);
        assert_eq!(exchange_value(PieceType::ProPawn), 535 + 115);
        assert_eq!(exchange_value(PieceType::Dragon), 903 + 695);
        assert_eq!(promotion_value(PieceType::Silver), 429 - 414);
        assert_eq!(promotion_value(PieceType::Gold), 0);
    }
}
