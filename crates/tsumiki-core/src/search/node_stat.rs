//! ノードごとの探索フラグ

/// 子ノードに引き継ぐ探索フラグ
///
/// 再帰的な探索（null move、多重反復深化、singular extension の検証探索）で
/// 特定の処理を無効化するために使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStat {
    /// null move pruning を許可
    pub null_move_search: bool,
    /// 多重反復深化を許可
    pub recursive_id_search: bool,
    /// null move 探索で詰みの脅威が見つかった
    pub mate_threat: bool,
    /// 置換表による枝刈りを許可
    pub hash_cut: bool,
    /// 取り返しの延長を許可
    pub recapture_extension: bool,
    /// 1手詰め判定を許可
    pub mate_detection: bool,
    /// ルート局面
    pub root: bool,
}

impl NodeStat {
    /// 通常ノード（`mate_threat` と `root` 以外すべて有効）
    #[inline]
    pub const fn normal() -> NodeStat {
        NodeStat {
            null_move_search: true,
            recursive_id_search: true,
            mate_threat: false,
            hash_cut: true,
            recapture_extension: true,
            mate_detection: true,
            root: false,
        }
    }

    #[inline]
    pub const fn without_null_move(mut self) -> NodeStat {
        self.null_move_search = false;
        self
    }

    #[inline]
    pub const fn without_hash_cut(mut self) -> NodeStat {
        self.hash_cut = false;
        self
    }

    #[inline]
    pub const fn without_mate_detection(mut self) -> NodeStat {
        self.mate_detection = false;
        self
    }

    #[inline]
    pub const fn without_recapture_extension(mut self) -> NodeStat {
        self.recapture_extension = false;
        self
    }

    #[inline]
    pub const fn with_mate_threat(mut self) -> NodeStat {
        self.mate_threat = true;
        self
    }

    #[inline]
    pub const fn with_root(mut self) -> NodeStat {
        self.root = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_stat_normal() {
        let stat = NodeStat::normal();
        assert!(stat.null_move_search);
        assert!(stat.recursive_id_search);
        assert!(stat.hash_cut);
        assert!(stat.recapture_extension);
        assert!(stat.mate_detection);
        assert!(!stat.mate_threat);
        assert!(!stat.root);
    }

    #[test]
    fn test_node_stat_builders_are_independent() {
        let stat = NodeStat::normal().without_null_move().without_hash_cut().with_mate_threat();
        assert!(!stat.null_move_search);
        assert!(!stat.hash_cut);
        assert!(stat.mate_threat);
        assert!(stat.recursive_id_search);
        assert!(stat.mate_detection);
        assert!(!stat.root);
        assert!(NodeStat::normal().with_root().root);
    }
}
