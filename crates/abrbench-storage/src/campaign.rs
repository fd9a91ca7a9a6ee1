//! 캠페인 디렉토리와 스트림 네 개의 소유자.
//!
//! 서버 시작 시 한 번 만들어지고, 모든 수집 요청이 공유한다.
//! 스트림별로 잠금이 분리되어 있어 서로 다른 메트릭의 기록은 서로를 기다리지 않는다.

use std::fs;
use std::path::{Path, PathBuf};

use abrbench_core::config::StorageConfig;
use abrbench_core::error::CoreError;
use abrbench_core::models::metric::MetricKind;
use abrbench_core::models::telemetry::TelemetryEvent;
use abrbench_core::ports::storage::MetricSink;
use async_trait::async_trait;
use tracing::info;

use crate::reader::CampaignPaths;
use crate::stream::MetricStream;

/// 진행 중인 캠페인의 로그 저장소
#[derive(Debug)]
pub struct MetricStore {
    dir: PathBuf,
    sync_writes: bool,
    /// `MetricKind::metric_id` 순서
    streams: [MetricStream; 4],
}

impl MetricStore {
    /// `<log_root>/<현재 유닉스 초>/` 아래에 새 캠페인 생성
    pub fn create(log_root: &Path, sync_writes: bool) -> Result<Self, CoreError> {
        let started = chrono::Utc::now().timestamp();
        Self::create_at(&log_root.join(started.to_string()), sync_writes)
    }

    /// 설정의 로그 루트에 새 캠페인 생성
    pub fn from_config(config: &StorageConfig) -> Result<Self, CoreError> {
        Self::create(&config.log_root, config.sync_writes)
    }

    /// 지정 디렉토리에 새 캠페인 생성. 디렉토리가 이미 있으면 실패한다.
    pub fn create_at(dir: &Path, sync_writes: bool) -> Result<Self, CoreError> {
        let campaign_err = |message: String| CoreError::Campaign {
            path: dir.to_path_buf(),
            message,
        };

        if let Some(parent) = dir.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| campaign_err(format!("로그 루트 생성 실패: {e}")))?;
            }
        }
        fs::create_dir(dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => {
                campaign_err("캠페인 디렉토리가 이미 존재함".to_string())
            }
            _ => campaign_err(format!("캠페인 디렉토리 생성 실패: {e}")),
        })?;

        let streams = [
            MetricStream::create(dir, MetricKind::Download)?,
            MetricStream::create(dir, MetricKind::Delay)?,
            MetricStream::create(dir, MetricKind::Skipped)?,
            MetricStream::create(dir, MetricKind::Throughput)?,
        ];

        info!(
            "캠페인 시작: {} (sync_writes={})",
            dir.display(),
            sync_writes
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            sync_writes,
            streams,
        })
    }

    /// 캠페인 디렉토리
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 분석 입력으로 넘길 스트림 경로 묶음
    pub fn paths(&self) -> CampaignPaths {
        let path = |kind| self.stream(kind).path().to_path_buf();
        CampaignPaths {
            download: path(MetricKind::Download),
            delay: path(MetricKind::Delay),
            skipped: path(MetricKind::Skipped),
            throughput: path(MetricKind::Throughput),
        }
    }

    fn stream(&self, kind: MetricKind) -> &MetricStream {
        &self.streams[kind.metric_id() as usize]
    }

    /// 이벤트를 해당 종류의 스트림에 한 건 기록
    pub fn append(&self, event: &TelemetryEvent) -> Result<(), CoreError> {
        self.stream(event.kind()).append(event, self.sync_writes)
    }

    /// 해당 스트림에 온전히 기록된 레코드 수
    pub fn record_count(&self, kind: MetricKind) -> u64 {
        self.stream(kind).records()
    }

    /// 모든 스트림 flush 후 닫기
    ///
    /// 하나가 실패해도 나머지는 끝까지 닫고 첫 에러를 반환한다.
    pub fn close(&self) -> Result<(), CoreError> {
        let mut first_err = None;
        for stream in &self.streams {
            if let Err(e) = stream.close() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => {
                let counts: Vec<String> = MetricKind::ALL
                    .iter()
                    .map(|kind| format!("{}={}", kind, self.record_count(*kind)))
                    .collect();
                info!("캠페인 종료: {} ({})", self.dir.display(), counts.join(", "));
                Ok(())
            }
        }
    }
}

#[async_trait]
impl MetricSink for MetricStore {
    async fn append(&self, event: &TelemetryEvent) -> Result<(), CoreError> {
        MetricStore::append(self, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abrbench_core::models::experiment::{Algorithm, ExperimentKey};
    use abrbench_core::models::telemetry::{DelayEvent, EventMeta, ThroughputEvent};
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn key() -> ExperimentKey {
        ExperimentKey {
            algorithm: Algorithm::new(Algorithm::LOLYPOP).unwrap(),
            omega: 20,
            sigma: 6,
            test_nr: 1,
            run_nr: 1,
        }
    }

    #[test]
    fn create_lays_out_four_streams() {
        let root = TempDir::new().unwrap();
        let store = MetricStore::create(&root.path().join("logs"), false).unwrap();

        let name = store.dir().file_name().unwrap().to_str().unwrap();
        assert!(name.parse::<i64>().is_ok());
        for kind in MetricKind::ALL {
            assert!(store.dir().join(kind.file_name()).is_file());
            assert_eq!(store.record_count(kind), 0);
        }
    }

    #[test]
    fn existing_directory_is_rejected() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("1480000000");
        fs::create_dir(&dir).unwrap();

        let result = MetricStore::create_at(&dir, false);
        assert_matches!(result, Err(CoreError::Campaign { .. }));
    }

    #[test]
    fn events_route_to_their_stream() {
        let root = TempDir::new().unwrap();
        let store = MetricStore::create_at(&root.path().join("c"), false).unwrap();

        store
            .append(&TelemetryEvent::Delay(DelayEvent {
                meta: EventMeta {
                    timestamp: 1,
                    key: key(),
                },
                delay: 3.0,
            }))
            .unwrap();
        store
            .append(&TelemetryEvent::Throughput(ThroughputEvent {
                meta: EventMeta {
                    timestamp: 2,
                    key: key(),
                },
                media_type: "video".to_string(),
                bytes: 100,
                activity_duration_s: 0.5,
                throughput_bps: 1600.0,
            }))
            .unwrap();
        store.close().unwrap();

        assert_eq!(store.record_count(MetricKind::Delay), 1);
        assert_eq!(store.record_count(MetricKind::Throughput), 1);
        assert_eq!(store.record_count(MetricKind::Download), 0);
        assert_eq!(store.paths().path(MetricKind::Delay), store.dir().join("delay_log.csv"));
    }
}
