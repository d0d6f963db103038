//! Stats Feed Binary - batch ingestion and periodic stats reporting
//!
//! Follows a JSONL feed of per-symbol sample batches, routes them through
//! the statistics service task, and periodically appends per-symbol window
//! statistics to an output JSONL file.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin stats_feed
//! ```
//!
//! ## Environment Variables
//!
//! - BATCH_FEED_PATH - input JSONL stream of {"symbol", "values"} records
//!   (default: streams/batches.jsonl)
//! - SNAPSHOT_OUTPUT_PATH - output JSONL file (default: streams/stats.jsonl)
//! - REPORT_EXPONENTS - window exponents k to report, 10^k samples each
//!   (default: 1,2)
//! - EMISSION_INTERVAL_SECS - how often to emit snapshots (default: 60)
//! - MAX_WINDOW_SIZE / CAPACITY_BUFFER_FACTOR / INITIAL_CAPACITY - window
//!   sizing (defaults: 100000000 / 1.2 / 100)
//! - MAX_SYMBOLS / MAX_BATCH_SIZE - boundary limits (defaults: 10 / 10000)
//! - RUST_LOG - logging level (optional, default: info)

use chrono::Utc;
use tickstats::feed::{BatchFeedReader, BatchRecord, SnapshotWriter, StatsSnapshot};
use tickstats::ingestion::{stats_service_task, StatsCommand};
use tickstats::service::{TradingStatsService, WindowParams};
use tickstats::Config;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    log::info!("🚀 Starting tickstats feed");
    log::info!("   Batch feed: {}", config.batch_feed_path.display());
    log::info!("   Snapshots: {}", config.snapshot_output_path.display());
    log::info!("   Report exponents: {:?}", config.report_exponents);
    log::info!("   Emission interval: {}s", config.emission_interval_secs);
    log::info!(
        "   Window: max {} samples, buffer factor {}, initial capacity {}",
        config.max_window_size,
        config.buffer_factor,
        config.initial_capacity
    );
    log::info!(
        "   Limits: {} symbols, {} values per batch",
        config.max_symbols,
        config.max_batch_size
    );

    let params = WindowParams {
        initial_capacity: config.initial_capacity,
        max_window_size: config.max_window_size,
        buffer_factor: config.buffer_factor,
    };
    let service = TradingStatsService::new(params, config.max_symbols);

    let (tx, rx) = mpsc::channel::<StatsCommand>(1000);
    tokio::spawn(stats_service_task(rx, service));

    let mut reader = BatchFeedReader::new(config.batch_feed_path.clone());
    reader.start().await?;
    let mut writer = SnapshotWriter::new(config.snapshot_output_path.clone())?;

    let mut emission_ticker = interval(Duration::from_secs(config.emission_interval_secs));
    emission_ticker.tick().await; // skip the immediate first tick

    log::info!("✅ Feed running - processing batches...");

    loop {
        tokio::select! {
            line_result = reader.read_line() => {
                match line_result {
                    Ok(line) => {
                        if let Err(e) = ingest_line(&line, &config, &tx).await {
                            log::warn!("Skipping batch: {}", e);
                        }
                    }
                    Err(e) => {
                        log::error!("Batch feed error: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }

            _ = emission_ticker.tick() => {
                if let Err(e) = emit_snapshots(&config, &tx, &mut writer).await {
                    log::error!("Snapshot emission failed: {}", e);
                }
            }
        }
    }
}

/// Parse, validate and hand one feed line to the service task
async fn ingest_line(
    line: &str,
    config: &Config,
    tx: &mpsc::Sender<StatsCommand>,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = BatchRecord::from_jsonl(line)?;
    record.validate(config.max_batch_size)?;

    let (reply, result) = oneshot::channel();
    tx.send(StatsCommand::AddBatch {
        symbol: record.symbol.clone(),
        values: record.values,
        reply,
    })
    .await?;
    result.await??;

    log::debug!("Batch added for symbol {}", record.symbol);
    Ok(())
}

/// Query every tracked symbol at every configured exponent and append the
/// rows to the snapshot file.
async fn emit_snapshots(
    config: &Config,
    tx: &mpsc::Sender<StatsCommand>,
    writer: &mut SnapshotWriter,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reply, symbols) = oneshot::channel();
    tx.send(StatsCommand::Symbols { reply }).await?;
    let symbols = symbols.await?;

    if symbols.is_empty() {
        log::debug!("No symbols tracked yet, skipping emission");
        return Ok(());
    }

    let timestamp = Utc::now().timestamp();
    let mut rows = 0;

    for symbol in &symbols {
        for &k in &config.report_exponents {
            let (reply, result) = oneshot::channel();
            tx.send(StatsCommand::GetStats { symbol: symbol.clone(), k, reply })
                .await?;
            match result.await? {
                Ok(stats) => {
                    let snapshot = StatsSnapshot::from_stats(symbol, k, &stats, timestamp);
                    writer.write_snapshot(&snapshot)?;
                    rows += 1;
                }
                Err(e) => log::warn!("Stats unavailable for {}: {}", symbol, e),
            }
        }
    }

    writer.flush()?;
    log::info!("Emitted {} snapshot rows for {} symbols", rows, symbols.len());
    Ok(())
}
