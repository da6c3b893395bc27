//! 設定ファイル（TOML）の読み込みとコマンドライン引数による上書き

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tsumiki_core::{Evaluator, MaterialEvaluator, SearchConfig, ZeroEvaluator};

use crate::Cli;

/// 評価関数の種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// 駒割りのみ
    #[default]
    Material,
    /// 常に 0（探索の動作確認用）
    Zero,
}

impl EvaluatorKind {
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::Material => Box::new(MaterialEvaluator),
            EvaluatorKind::Zero => Box::new(ZeroEvaluator),
        }
    }
}

/// 設定ファイルの内容
///
/// ```toml
/// depth = 12
/// evaluator = "material"
///
/// [search]
/// hash_mb = 64
/// threads = 4
///
/// [search.params]
/// probcut_margin = 180
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub depth: Option<u32>,
    pub evaluator: Option<EvaluatorKind>,
    pub search: SearchConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<FileConfig> {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }
}

/// 実際に使う設定
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub depth: u32,
    pub evaluator: EvaluatorKind,
    pub search: SearchConfig,
}

impl RunConfig {
    /// 設定ファイル（指定があれば）を読み、コマンドライン引数で上書きする
    pub fn resolve(cli: &Cli) -> Result<RunConfig> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(RunConfig::merge(file, cli))
    }

    fn merge(file: FileConfig, cli: &Cli) -> RunConfig {
        let mut search = file.search;
        if let Some(hash_mb) = cli.hash_mb {
            search.hash_mb = hash_mb;
        }
        if let Some(threads) = cli.threads {
            search.threads = threads;
        }
        if let Some(seed) = cli.seed {
            search.seed = seed;
        }
        if let Some(nodes) = cli.nodes {
            search.max_nodes = Some(nodes);
        }
        if cli.infinite {
            search = search.with_infinite_time();
        }
        if let Some(optimum_ms) = cli.optimum_ms {
            search.optimum_ms = Some(optimum_ms);
        }
        if let Some(maximum_ms) = cli.maximum_ms {
            search.maximum_ms = Some(maximum_ms);
        }
        search.threads = search.threads.max(1);

        RunConfig {
            depth: cli.depth.or(file.depth).unwrap_or(SearchConfig::DEPTH_INFINITY),
            evaluator: cli.evaluator.or(file.evaluator).unwrap_or_default(),
            search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("tsumiki").chain(args.iter().copied()))
    }

    #[test]
    fn test_file_config_partial_toml() {
        let file: FileConfig = toml::from_str(
            r#"
            depth = 7
            evaluator = "zero"

            [search]
            threads = 3

            [search.params]
            probcut_margin = 150
            "#,
        )
        .unwrap();
        assert_eq!(file.depth, Some(7));
        assert_eq!(file.evaluator, Some(EvaluatorKind::Zero));
        assert_eq!(file.search.threads, 3);
        assert_eq!(file.search.params.probcut_margin, 150);
        assert_eq!(file.search.hash_mb, SearchConfig::default().hash_mb);
    }

    #[test]
    fn test_file_config_rejects_unknown_key() {
        assert!(toml::from_str::<FileConfig>("dpeth = 3").is_err());
    }

    #[test]
    fn test_run_config_flags_override_file() {
        let file = FileConfig {
            depth: Some(7),
            evaluator: Some(EvaluatorKind::Zero),
            search: SearchConfig { threads: 3, hash_mb: 32, ..SearchConfig::default() },
        };
        let config = RunConfig::merge(file, &cli(&["--depth", "4", "--threads", "2", "--nodes", "1000"]));
        assert_eq!(config.depth, 4);
        assert_eq!(config.evaluator, EvaluatorKind::Zero);
        assert_eq!(config.search.threads, 2);
        assert_eq!(config.search.hash_mb, 32);
        assert_eq!(config.search.max_nodes, Some(1000));
    }

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::merge(FileConfig::default(), &cli(&[]));
        assert_eq!(config.depth, SearchConfig::DEPTH_INFINITY);
        assert_eq!(config.evaluator, EvaluatorKind::Material);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_run_config_infinite_then_explicit_limit() {
        let config = RunConfig::merge(FileConfig::default(), &cli(&["--infinite", "--maximum-ms", "500"]));
        assert_eq!(config.search.optimum_ms, None);
        assert_eq!(config.search.maximum_ms, Some(500));
    }
}
