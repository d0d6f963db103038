//! End-to-end feed flow: JSONL batches in, JSONL stats snapshots out
//!
//! Mirrors what the stats_feed binary does, with temp files standing in for
//! the stream paths.

use tickstats::feed::{BatchFeedReader, BatchRecord, SnapshotWriter, StatsSnapshot};
use tickstats::ingestion::{stats_service_task, StatsCommand};
use tickstats::service::{TradingStatsService, WindowParams};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};

#[tokio::test]
async fn test_feed_to_snapshot_roundtrip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let feed_path = temp_dir.path().join("batches.jsonl");
    let out_path = temp_dir.path().join("stats.jsonl");

    let mut file = tokio::fs::File::create(&feed_path).await.unwrap();
    file.write_all(
        b"{\"symbol\":\"AAPL\",\"values\":[1.0,2.0,3.0,4.0,5.0]}\n\
          {\"symbol\":\"AAPL\",\"values\":[6.0,7.0]}\n",
    )
    .await
    .unwrap();
    file.flush().await.unwrap();
    drop(file);

    let params = WindowParams {
        initial_capacity: 10,
        max_window_size: 100,
        buffer_factor: 1.2,
    };
    let service = TradingStatsService::new(params, 10);
    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(stats_service_task(rx, service));

    // replay the feed into the service task
    let mut reader = BatchFeedReader::new(feed_path);
    reader.start().await.unwrap();
    for _ in 0..2 {
        let line = reader.read_line().await.unwrap();
        let record = BatchRecord::from_jsonl(&line).unwrap();
        record.validate(10_000).unwrap();

        let (reply, result) = oneshot::channel();
        tx.send(StatsCommand::AddBatch {
            symbol: record.symbol,
            values: record.values,
            reply,
        })
        .await
        .unwrap();
        result.await.unwrap().unwrap();
    }

    // query and snapshot, the way the emission tick does
    let (reply, result) = oneshot::channel();
    tx.send(StatsCommand::GetStats { symbol: "AAPL".to_string(), k: 1, reply })
        .await
        .unwrap();
    let stats = result.await.unwrap().unwrap();

    let mut writer = SnapshotWriter::new(out_path.clone()).unwrap();
    writer
        .write_snapshot(&StatsSnapshot::from_stats("AAPL", 1, &stats, 1763026318))
        .unwrap();
    writer.flush().unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let row: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
    assert_eq!(row["symbol"], "AAPL");
    assert_eq!(row["min"], 1.0);
    assert_eq!(row["max"], 7.0);
    assert_eq!(row["last"], 7.0);
    assert_eq!(row["avg"], 4.0);
}

#[tokio::test]
async fn test_invalid_records_are_rejected_before_the_service() {
    // oversized batch
    let record = BatchRecord { symbol: "AAPL".to_string(), values: vec![1.0; 11] };
    assert!(record.validate(10).is_err());

    // the service never sees a batch that fails boundary validation, so the
    // symbol must not exist afterwards
    let params = WindowParams {
        initial_capacity: 10,
        max_window_size: 100,
        buffer_factor: 1.2,
    };
    let service = TradingStatsService::new(params, 10);
    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(stats_service_task(rx, service));

    let (reply, symbols) = oneshot::channel();
    tx.send(StatsCommand::Symbols { reply }).await.unwrap();
    assert!(symbols.await.unwrap().is_empty());
}
