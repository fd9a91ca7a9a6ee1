//! 동시 수집 기록 통합 테스트
//!
//! 여러 작성자가 같은 스트림에 동시에 기록해도 레코드가 섞이거나 잘리지 않고,
//! 다시 읽으면 기록한 이벤트 그대로 복원되는지 확인한다.

use std::sync::Arc;

use abrbench_core::models::experiment::{Algorithm, ExperimentKey};
use abrbench_core::models::metric::MetricKind;
use abrbench_core::models::telemetry::{
    DelayEvent, DownloadEvent, EventMeta, SkippedEvent, TelemetryEvent, ThroughputEvent,
};
use abrbench_core::ports::storage::{CampaignSource, MetricSink};
use abrbench_storage::{read_stream, CampaignReader, MetricStore};
use tempfile::TempDir;

fn meta(writer: u32, seq: u32) -> EventMeta {
    EventMeta {
        timestamp: 1_480_000_000_000 + (writer * 1_000 + seq) as i64,
        key: ExperimentKey {
            algorithm: Algorithm::new(Algorithm::LOLYPOP).unwrap(),
            omega: 10 * (writer % 3 + 1),
            sigma: 3,
            test_nr: 1,
            run_nr: seq % 5 + 1,
        },
    }
}

fn download(writer: u32, seq: u32) -> TelemetryEvent {
    TelemetryEvent::Download(DownloadEvent {
        meta: meta(writer, seq),
        media_type: "video".to_string(),
        bitrate: 250_000 * (seq as u64 % 4 + 1),
        send_time: 100,
        first_byte_time: 150,
        loaded_time: 900,
        bytes_loaded: 1_048_576,
        bytes_total: 1_048_576,
    })
}

fn one_of_each(writer: u32, seq: u32) -> Vec<TelemetryEvent> {
    vec![
        download(writer, seq),
        TelemetryEvent::Delay(DelayEvent {
            meta: meta(writer, seq),
            delay: seq as f64 / 7.0,
        }),
        TelemetryEvent::Skipped(SkippedEvent {
            meta: meta(writer, seq),
            media_type: String::new(),
            bitrate: 1_000_000,
            send_time: 10,
            first_byte_time: 20,
            abort_time: 30,
            bytes_loaded: 512,
            bytes_total: 4_096,
        }),
        TelemetryEvent::Throughput(ThroughputEvent {
            meta: meta(writer, seq),
            media_type: "audio".to_string(),
            bytes: 64_000,
            activity_duration_s: 0.37,
            throughput_bps: 64_000.0 * 8.0 / 0.37,
        }),
    ]
}

fn sort_by_timestamp(events: &mut [TelemetryEvent]) {
    events.sort_by_key(|e| e.meta().timestamp);
}

#[test]
fn threads_never_interleave_records() {
    const WRITERS: u32 = 8;
    const PER_WRITER: u32 = 50;

    let root = TempDir::new().unwrap();
    let store = MetricStore::create_at(&root.path().join("campaign"), false).unwrap();

    std::thread::scope(|scope| {
        for writer in 0..WRITERS {
            let store = &store;
            scope.spawn(move || {
                for seq in 0..PER_WRITER {
                    store.append(&download(writer, seq)).unwrap();
                }
            });
        }
    });
    store.close().unwrap();

    let total = (WRITERS * PER_WRITER) as usize;
    assert_eq!(store.record_count(MetricKind::Download), total as u64);

    let content = std::fs::read_to_string(store.paths().download).unwrap();
    let header_lines = content
        .lines()
        .filter(|line| line.starts_with("metric_id"))
        .count();
    assert_eq!(header_lines, 1);

    let mut read = read_stream(MetricKind::Download, &store.paths().download).unwrap();
    assert_eq!(read.len(), total);

    let mut expected: Vec<TelemetryEvent> = (0..WRITERS)
        .flat_map(|w| (0..PER_WRITER).map(move |s| download(w, s)))
        .collect();
    sort_by_timestamp(&mut read);
    sort_by_timestamp(&mut expected);
    assert_eq!(read, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn async_reports_round_trip_through_campaign_reader() {
    const WRITERS: u32 = 6;
    const PER_WRITER: u32 = 20;

    let root = TempDir::new().unwrap();
    let dir = root.path().join("campaign");
    let store = Arc::new(MetricStore::create_at(&dir, true).unwrap());

    let tasks = (0..WRITERS).map(|writer| {
        let sink: Arc<dyn MetricSink> = store.clone();
        tokio::spawn(async move {
            for seq in 0..PER_WRITER {
                for event in one_of_each(writer, seq) {
                    sink.append(&event).await.unwrap();
                }
            }
        })
    });
    for result in futures::future::join_all(tasks).await {
        result.unwrap();
    }
    store.close().unwrap();

    let log = CampaignReader::from_dir(&dir).load().unwrap();
    let per_stream = (WRITERS * PER_WRITER) as usize;
    assert_eq!(log.downloads.len(), per_stream);
    assert_eq!(log.delays.len(), per_stream);
    assert_eq!(log.skipped.len(), per_stream);
    assert_eq!(log.throughputs.len(), per_stream);

    let mut delays = log.delays.clone();
    delays.sort_by_key(|e| e.meta.timestamp);
    // 타임스탬프 순서 == (writer, seq) 순서
    let expected: Vec<f64> = (0..WRITERS)
        .flat_map(|_| (0..PER_WRITER).map(|s| s as f64 / 7.0))
        .collect();
    let actual: Vec<f64> = delays.iter().map(|e| e.delay).collect();
    assert_eq!(actual, expected);

    assert!(log.throughputs.iter().all(|e| e.activity_duration_s == 0.37));
}

#[test]
fn campaign_directories_do_not_collide() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("1480000000");
    let first = MetricStore::create_at(&dir, false).unwrap();
    first.append(&download(0, 0)).unwrap();

    assert!(MetricStore::create_at(&dir, false).is_err());
    // 실패한 생성이 기존 캠페인을 건드리지 않음
    first.close().unwrap();
    let events = read_stream(MetricKind::Download, &first.paths().download).unwrap();
    assert_eq!(events, vec![download(0, 0)]);
}
