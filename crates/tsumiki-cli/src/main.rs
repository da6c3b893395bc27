//! tsumiki: 局面を1つ読んで最善手を出力する

mod config;
mod report;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use config::{EvaluatorKind, RunConfig};
use report::LogReporter;
use tsumiki_core::types::DEPTH_1PLY;
use tsumiki_core::{Record, SearchResult, Searcher};

#[derive(Parser, Debug)]
#[command(name = "tsumiki", version, about = "Search a shogi position and print the best move")]
pub struct Cli {
    /// SFEN of the root position, or `startpos`
    #[arg(long, default_value = "startpos")]
    pub sfen: String,

    /// USI moves played from the SFEN position
    #[arg(long, num_args = 1.., value_name = "USI")]
    pub moves: Vec<String>,

    /// Maximum iterative deepening depth in plies
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Target thinking time in milliseconds
    #[arg(long)]
    pub optimum_ms: Option<u64>,

    /// Hard thinking time limit in milliseconds
    #[arg(long)]
    pub maximum_ms: Option<u64>,

    /// Ignore the time limits from the config (explicit --optimum-ms/--maximum-ms still apply)
    #[arg(long)]
    pub infinite: bool,

    /// Node limit per search thread
    #[arg(long)]
    pub nodes: Option<u64>,

    /// Transposition table size in MiB
    #[arg(long)]
    pub hash_mb: Option<usize>,

    /// Number of search threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Seed for shuffling root moves
    #[arg(long)]
    pub seed: Option<u64>,

    /// Static evaluator
    #[arg(long, value_enum)]
    pub evaluator: Option<EvaluatorKind>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.debug);
    run(&cli)
}

fn init_logger(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = RunConfig::resolve(cli)?;
    let record = build_record(&cli.sfen, &cli.moves)?;
    let pos = record.position().context("failed to replay moves")?;
    log::info!("position: {}", pos.to_sfen());
    log::debug!("config: {config:?}");

    let mut searcher = Searcher::new(config.search, config.evaluator.build());
    let mut reporter = LogReporter::default();
    let result = searcher.idsearch(&pos, Some(&record), config.depth, &mut reporter);
    log::debug!("{} iterations reported", reporter.iterations);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, result).context("failed to serialize result")?;
        writeln!(out)?;
    } else {
        write_text(&mut out, result)?;
    }
    Ok(())
}

fn build_record(sfen: &str, moves: &[String]) -> Result<Record> {
    let mut record = Record::parse(sfen).with_context(|| format!("invalid sfen: {sfen}"))?;
    record.extend_usi(moves.iter().map(String::as_str)).context("invalid moves")?;
    Ok(record)
}

fn write_text<W: Write>(out: &mut W, result: &SearchResult) -> Result<()> {
    writeln!(
        out,
        "info depth {} score {} nodes {} time {} pv {}",
        result.depth / DEPTH_1PLY,
        result.score,
        result.info.total_nodes(),
        result.elapsed.as_millis(),
        result.pv,
    )?;
    if result.mv.is_none() {
        writeln!(out, "bestmove resign")?;
    } else {
        writeln!(out, "bestmove {}", result.mv)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_record_startpos_with_moves() {
        let moves = vec!["7g7f".to_string(), "3c3d".to_string()];
        let record = build_record("startpos", &moves).unwrap();
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_build_record_rejects_illegal_move() {
        let moves = vec!["7g7e".to_string()];
        assert!(build_record("startpos", &moves).is_err());
    }

    #[test]
    fn test_write_text_resign_without_move() {
        let mut buf = Vec::new();
        write_text(&mut buf, &SearchResult::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("bestmove resign\n"));
    }
}
