//! 棋譜（開始局面＋指し手列）と USI 指し手の解析

use crate::types::{Move, PieceType, Square};

use super::{Position, PositionError, SFEN_HIRATE};

/// 棋譜
///
/// 探索開始局面までの手順を保持し、千日手・連続王手の千日手の判定に使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub initial: Position,
    pub moves: Vec<Move>,
}

impl Record {
    /// 開始局面のみの棋譜
    pub fn new(initial: Position) -> Record {
        Record { initial, moves: Vec::new() }
    }

    /// `startpos [moves ...]`、`sfen <SFEN> [moves ...]`、または `<SFEN> [moves ...]` を解析する
    pub fn parse(text: &str) -> Result<Record, PositionError> {
        let text = text.trim();
        let (head, moves) = match text.split_once(" moves") {
            Some((head, rest)) => (head.trim(), rest.split_whitespace().collect::<Vec<_>>()),
            None => (text, Vec::new()),
        };
        let head = head.strip_prefix("sfen ").unwrap_or(head);
        let initial = if head == "startpos" {
            Position::from_sfen(SFEN_HIRATE)?
        } else {
            Position::from_sfen(head)?
        };
        let mut record = Record::new(initial);
        record.extend_usi(moves)?;
        Ok(record)
    }

    /// USI 形式の指し手を順に追加する。途中で不正な手があればエラー
    pub fn extend_usi<'a, I>(&mut self, moves: I) -> Result<(), PositionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut pos = self.position()?;
        for text in moves {
            let ply = self.moves.len() + 1;
            let mv = pos.parse_usi_move(text)?;
            if pos.do_move(mv).is_none() {
                return Err(PositionError::IllegalMove { mv: text.to_string(), ply });
            }
            self.moves.push(mv);
        }
        Ok(())
    }

    /// 全手順を進めた局面
    pub fn position(&self) -> Result<Position, PositionError> {
        let mut pos = self.initial.clone();
        for (i, &mv) in self.moves.iter().enumerate() {
            if pos.do_move(mv).is_none() {
                return Err(PositionError::IllegalMove { mv: mv.to_string(), ply: i + 1 });
            }
        }
        Ok(pos)
    }

    /// 開始局面から各手を指す直前の局面を順に渡す
    pub fn replay<F>(&self, mut f: F) -> Result<(), PositionError>
    where
        F: FnMut(&Position, Move),
    {
        let mut pos = self.initial.clone();
        for (i, &mv) in self.moves.iter().enumerate() {
            f(&pos, mv);
            if pos.do_move(mv).is_none() {
                return Err(PositionError::IllegalMove { mv: mv.to_string(), ply: i + 1 });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Position {
    /// USI 形式の指し手を現局面の手として解釈する（`7g7f`、`8h2b+`、`G*5b`）
    ///
    /// 書式が正しくても現局面で成立しない手は `IllegalMove` を返す。自玉の安全は見ない。
    pub fn parse_usi_move(&self, text: &str) -> Result<Move, PositionError> {
        let syntax = || PositionError::MoveSyntax(text.to_string());
        let bytes = text.as_bytes();
        let mv = if bytes.len() == 4 && bytes[1] == b'*' {
            let pt = PieceType::from_usi_char(bytes[0] as char)
                .filter(|pt| pt.hand_index().is_some() && bytes[0].is_ascii_uppercase())
                .ok_or_else(syntax)?;
            let to: Square = text[2..4].parse().map_err(|_| syntax())?;
            Move::drop(pt, to)
        } else if bytes.len() == 4 || (bytes.len() == 5 && bytes[4] == b'+') {
            let from: Square = text[0..2].parse().map_err(|_| syntax())?;
            let to: Square = text[2..4].parse().map_err(|_| syntax())?;
            let pt = self.piece_on(from).piece_type().ok_or_else(|| PositionError::IllegalMove {
                mv: text.to_string(),
                ply: self.game_ply() as usize,
            })?;
            Move::normal(from, to, bytes.len() == 5, pt)
        } else {
            return Err(syntax());
        };
        if !self.is_pseudo_legal(mv) {
            return Err(PositionError::IllegalMove { mv: text.to_string(), ply: self.game_ply() as usize });
        }
        Ok(mv)
    }
}
