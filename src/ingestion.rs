//! Channel-based command processing for the statistics service
//!
//! The registry is owned by a single background task; callers send commands
//! through an mpsc channel and receive results over oneshot replies. Running
//! every mutation through one task keeps each window single-writer without
//! any locking inside the tree itself.

use crate::service::{ServiceError, TradingStatsService};
use crate::stats_core::WindowStats;
use tokio::sync::{mpsc, oneshot};

/// Commands accepted by the statistics service task
#[derive(Debug)]
pub enum StatsCommand {
    AddBatch {
        symbol: String,
        values: Vec<f64>,
        reply: oneshot::Sender<Result<(), ServiceError>>,
    },
    GetStats {
        symbol: String,
        k: u32,
        reply: oneshot::Sender<Result<WindowStats, ServiceError>>,
    },
    Symbols {
        reply: oneshot::Sender<Vec<String>>,
    },
    Shutdown,
}

/// Background task that owns the service and processes commands until the
/// channel closes or a `Shutdown` command arrives.
pub async fn stats_service_task(
    mut receiver: mpsc::Receiver<StatsCommand>,
    mut service: TradingStatsService,
) {
    log::info!("Stats service task started");

    while let Some(command) = receiver.recv().await {
        match command {
            StatsCommand::AddBatch { symbol, values, reply } => {
                let result = service.add_batch(&symbol, &values);
                let _ = reply.send(result);
            }
            StatsCommand::GetStats { symbol, k, reply } => {
                let result = service.get_stats(&symbol, k);
                let _ = reply.send(result);
            }
            StatsCommand::Symbols { reply } => {
                let _ = reply.send(service.symbols());
            }
            StatsCommand::Shutdown => {
                log::info!("Stats service received shutdown signal");
                break;
            }
        }
    }

    log::info!("Stats service task stopped");
}
