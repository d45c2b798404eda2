use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use relalg_common::{ColumnType, Relation, Schema};
use relalg_engine::executor::{build_join, JoinKind};
use relalg_engine::{col, QueryError, Timeline, VolcanoIterator};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Times the join strategies over synthetic relations", long_about = None)]
struct Args {
    /// Rows in the left relation
    #[arg(long, default_value_t = 1000)]
    left_rows: usize,

    /// Rows in the right relation
    #[arg(long, default_value_t = 1000)]
    right_rows: usize,

    /// Distinct join key values per relation
    #[arg(long, default_value_t = 100)]
    key_cardinality: usize,

    /// Join strategy to run
    #[arg(long, value_enum, default_value_t = Strategy::All)]
    strategy: Strategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Cross,
    Theta,
    Hash,
    All,
}

struct BenchmarkResult {
    name: &'static str,
    rows: usize,
    elapsed: Duration,
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    info!(?args, "setting up relations");

    let r = match keyed_relation("r_key", "r_payload", args.left_rows, args.key_cardinality) {
        Ok(relation) => relation,
        Err(e) => {
            error!(error = %e, "failed to build left relation");
            return;
        }
    };
    let s = match keyed_relation("s_key", "s_payload", args.right_rows, args.key_cardinality) {
        Ok(relation) => relation,
        Err(e) => {
            error!(error = %e, "failed to build right relation");
            return;
        }
    };

    let mut kinds = Vec::new();
    if matches!(args.strategy, Strategy::Cross | Strategy::All) {
        kinds.push(JoinKind::Cross);
    }
    if matches!(args.strategy, Strategy::Theta | Strategy::All) {
        kinds.push(JoinKind::Theta(col("r_key").eq(col("s_key"))));
    }
    if matches!(args.strategy, Strategy::Hash | Strategy::All) {
        kinds.push(JoinKind::Hash {
            on: vec![("r_key".to_string(), "s_key".to_string())],
        });
    }

    let mut results = Vec::new();
    for kind in kinds {
        let name = kind.name();
        match run_benchmark(kind, &r, &s) {
            Ok(result) => results.push(result),
            Err(e) => error!(join = name, error = %e, "benchmark failed"),
        }
    }

    println!("\n--- Benchmark Results ---");
    println!("| Join      | Output Rows  | Forward Time    | Replay Time     |");
    println!("|-----------|--------------|-----------------|-----------------|");
    for (forward, replay) in results {
        let replay = replay.map_or_else(|| "-".to_string(), |r| format!("{:?}", r.elapsed));
        println!(
            "| {:<9} | {:<12} | {:<15?} | {:<15} |",
            forward.name, forward.rows, forward.elapsed, replay
        );
    }
}

fn keyed_relation(
    key: &str,
    payload: &str,
    rows: usize,
    key_cardinality: usize,
) -> relalg_common::Result<Relation> {
    let schema = Schema::from_pairs([(key, ColumnType::Integer), (payload, ColumnType::String)])?;
    let mut relation = Relation::empty(schema);
    for i in 0..rows {
        let k = (i % key_cardinality.max(1)).to_string();
        let p = format!("row-{}", i);
        relation.add_row(&[(key, k.as_str()), (payload, p.as_str())])?;
    }
    Ok(relation)
}

/// Cross products grow as `left_rows * right_rows`; logging every output
/// tuple for replay would hold the whole product in memory.
fn replays(kind: &JoinKind) -> bool {
    !matches!(kind, JoinKind::Cross)
}

/// Drains the join through a timeline, then steps all the way back and forward again.
/// Joins that are not replayed are drained directly and report no replay time.
fn run_benchmark(
    kind: JoinKind,
    r: &Relation,
    s: &Relation,
) -> Result<(BenchmarkResult, Option<BenchmarkResult>), QueryError> {
    let name = kind.name();
    let replay = replays(&kind);
    let mut join = build_join(kind, r, s)?;

    if !replay {
        let start = Instant::now();
        let rows = drain(&mut join)?;
        let forward = BenchmarkResult {
            name,
            rows,
            elapsed: start.elapsed(),
        };
        info!(join = name, rows, "benchmark finished without replay");
        return Ok((forward, None));
    }

    let mut timeline = Timeline::new(join);

    let start = Instant::now();
    timeline.open()?;
    while timeline.next()?.is_some() {}
    let forward = BenchmarkResult {
        name,
        rows: timeline.len(),
        elapsed: start.elapsed(),
    };

    let start = Instant::now();
    while timeline.previous().is_ok() {}
    while timeline.next()?.is_some() {}
    let replay = BenchmarkResult {
        name,
        rows: timeline.len(),
        elapsed: start.elapsed(),
    };
    timeline.close();

    info!(join = name, rows = forward.rows, "benchmark finished");
    Ok((forward, Some(replay)))
}

/// Counts the join's output without keeping it.
fn drain<I: VolcanoIterator>(join: &mut I) -> Result<usize, QueryError> {
    join.open()?;
    let mut rows = 0;
    while join.next()?.is_some() {
        rows += 1;
    }
    join.close();
    Ok(rows)
}
