//! 置換表本体

use std::sync::atomic::{AtomicU8, Ordering};

use super::{Bound, CLUSTER_SIZE, TtData, TtEntry};
use crate::types::{Depth, Move, Score};

/// クラスター（4 エントリ = 64 バイト）
#[repr(C, align(64))]
#[derive(Debug)]
pub struct Cluster {
    entries: [TtEntry; CLUSTER_SIZE],
}

impl Cluster {
    const fn new() -> Self {
        Self {
            entries: [TtEntry::new(), TtEntry::new(), TtEntry::new(), TtEntry::new()],
        }
    }
}

// キャッシュライン 1 本に収まること
const _: () = assert!(std::mem::size_of::<Cluster>() == 64);

/// 書き込みの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtStatus {
    /// 空きエントリに書き込んだ
    New,
    /// 同じ局面のエントリを更新した
    Update,
    /// 別の局面のエントリを上書きした
    Collide,
    /// 既存のエントリの方が深いので書き込まなかった
    Reject,
}

/// 置換表
#[derive(Debug)]
pub struct TranspositionTable {
    table: Vec<Cluster>,
    /// 世代（1..=255、0 は空きエントリを表す）
    age: AtomicU8,
}

impl TranspositionTable {
    /// 新しい置換表を作成（サイズは MiB 単位）
    pub fn new(mb_size: usize) -> Self {
        Self {
            table: allocate(cluster_count_for(mb_size)),
            age: AtomicU8::new(1),
        }
    }

    /// サイズを変更（探索中に呼んではならない）
    pub fn resize(&mut self, mb_size: usize) {
        let new_count = cluster_count_for(mb_size);
        if new_count != self.table.len() {
            self.table = allocate(new_count);
            log::debug!("tt resized: {} clusters ({} MiB)", new_count, mb_size);
        }
    }

    /// クリア
    pub fn clear(&mut self) {
        for cluster in &self.table {
            for entry in &cluster.entries {
                entry.clear();
            }
        }
        self.age.store(1, Ordering::Relaxed);
    }

    /// 世代を進める（0 は飛ばす）
    pub fn evolve(&self) {
        let age = self.age();
        self.age.store(age % 255 + 1, Ordering::Relaxed);
    }

    #[inline]
    pub fn age(&self) -> u8 {
        self.age.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cluster_count(&self) -> usize {
        self.table.len()
    }

    #[inline]
    fn cluster(&self, key: u64) -> &Cluster {
        &self.table[key as usize & (self.table.len() - 1)]
    }

    /// 置換表を検索（64bit キーで完全一致）
    pub fn probe(&self, key: u64) -> Option<TtData> {
        self.cluster(key).entries.iter().find_map(|entry| entry.read(key))
    }

    /// 探索結果を書き込む
    ///
    /// Bound は `alpha`/`beta` と `score` の関係から決める。
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &self,
        key: u64,
        alpha: Score,
        beta: Score,
        score: Score,
        depth: Depth,
        ply: i32,
        mv: Move,
        mate_threat: bool,
    ) -> TtStatus {
        let bound = Bound::from_window(score, alpha, beta);
        let age = self.age();
        let cluster = self.cluster(key);

        for entry in &cluster.entries {
            if let Some(old) = entry.read(key) {
                // 今回の探索で得た深い結果は浅い結果で上書きしない
                if old.age == age && depth < old.depth && !score.is_mate() {
                    return TtStatus::Reject;
                }
                let mv16 = if mv.is_none() { old.mv } else { mv.to_move16() };
                let data = TtData::new(mv16, score, ply, depth, bound, mate_threat || old.mate_threat, age);
                entry.write(key, &data);
                return TtStatus::Update;
            }
        }

        let data = TtData::new(mv.to_move16(), score, ply, depth, bound, mate_threat, age);
        let (entry, status) = self.replacement(cluster);
        entry.write(key, &data);
        status
    }

    /// PV の指し手を書き込む（評価値は既存のものを残す）
    pub fn store_pv(&self, key: u64, depth: Depth, mv: Move) -> TtStatus {
        let age = self.age();
        let cluster = self.cluster(key);

        for entry in &cluster.entries {
            if let Some(old) = entry.read(key) {
                let data = old.with_pv_move(mv.to_move16(), depth, age);
                entry.write(key, &data);
                return TtStatus::Update;
            }
        }

        let data = TtData::new(mv.to_move16(), Score::ZERO, 0, depth, Bound::None, false, age);
        let (entry, status) = self.replacement(cluster);
        entry.write(key, &data);
        status
    }

    /// 書き込み先を選ぶ。空きがなければ最も古く、同じ古さなら最も浅いエントリ
    fn replacement<'a>(&self, cluster: &'a Cluster) -> (&'a TtEntry, TtStatus) {
        if let Some(entry) = cluster.entries.iter().find(|entry| entry.peek().is_vacant()) {
            return (entry, TtStatus::New);
        }
        let age = self.age();
        let entry = cluster
            .entries
            .iter()
            .max_by_key(|entry| {
                let data = entry.peek();
                (relative_age(age, data.age), -data.depth)
            })
            .unwrap_or(&cluster.entries[0]);
        (entry, TtStatus::Collide)
    }

    /// 現世代のエントリの使用率を 1000 分率で返す（先頭 1000 クラスターを標本にする）
    pub fn hashfull(&self) -> usize {
        let age = self.age();
        let sample = 1000.min(self.table.len());
        let used: usize = self
            .table
            .iter()
            .take(sample)
            .map(|cluster| cluster.entries.iter().filter(|entry| entry.peek().age == age).count())
            .sum();
        used * 1000 / (sample * CLUSTER_SIZE)
    }

    /// 全エントリのうち使用中の割合
    pub fn usage_rate(&self) -> f64 {
        let used: usize = self
            .table
            .iter()
            .map(|cluster| cluster.entries.iter().filter(|entry| !entry.peek().is_vacant()).count())
            .sum();
        used as f64 / (self.table.len() * CLUSTER_SIZE) as f64
    }
}

/// 世代の差（1..=255 で循環）
#[inline]
fn relative_age(current: u8, age: u8) -> u16 {
    if age == 0 {
        return u16::MAX;
    }
    (current as u16 + 255 - age as u16) % 255
}

/// `mb_size` MiB に収まる最大の 2 の冪のクラスター数
fn cluster_count_for(mb_size: usize) -> usize {
    let count = (mb_size.max(1) * 1024 * 1024 / std::mem::size_of::<Cluster>()).max(1);
    1 << (usize::BITS - 1 - count.leading_zeros())
}

fn allocate(count: usize) -> Vec<Cluster> {
    (0..count).map(|_| Cluster::new()).collect()
}
