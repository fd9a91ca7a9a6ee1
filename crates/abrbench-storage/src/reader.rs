//! 종료된 캠페인 스트림 적재.
//!
//! 헤더가 기대 컬럼과 정확히 같아야 하며, 각 행은 수집 때와 같은 검증 규칙으로
//! 다시 이벤트가 된다. 형식 오류는 파일 경로와 줄 번호를 담은 `StreamFormat` 에러.
//!
//! 모든 레코드는 줄바꿈으로 끝난다. 줄바꿈 없이 끝나는 마지막 레코드는
//! 기록 도중 중단된 부분 레코드이므로 `warn!`을 남기고 버린다.

use std::fs;
use std::path::{Path, PathBuf};

use abrbench_core::error::CoreError;
use abrbench_core::models::campaign::CampaignLog;
use abrbench_core::models::metric::MetricKind;
use abrbench_core::models::telemetry::TelemetryEvent;
use abrbench_core::ports::storage::CampaignSource;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::record;

/// 캠페인 스트림 네 개의 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignPaths {
    pub download: PathBuf,
    pub delay: PathBuf,
    pub skipped: PathBuf,
    pub throughput: PathBuf,
}

impl CampaignPaths {
    /// 캠페인 디렉토리의 표준 파일명으로 구성
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            download: dir.join(MetricKind::Download.file_name()),
            delay: dir.join(MetricKind::Delay.file_name()),
            skipped: dir.join(MetricKind::Skipped.file_name()),
            throughput: dir.join(MetricKind::Throughput.file_name()),
        }
    }

    pub fn path(&self, kind: MetricKind) -> &Path {
        match kind {
            MetricKind::Download => &self.download,
            MetricKind::Delay => &self.delay,
            MetricKind::Skipped => &self.skipped,
            MetricKind::Throughput => &self.throughput,
        }
    }
}

/// 스트림 하나를 기록 순서대로 읽기
pub fn read_stream(kind: MetricKind, path: &Path) -> Result<Vec<TelemetryEvent>, CoreError> {
    let bytes = fs::read(path).map_err(|e| CoreError::Campaign {
        path: path.to_path_buf(),
        message: format!("스트림 열기 실패: {e}"),
    })?;
    let format_err = |line: u64, message: String| CoreError::StreamFormat {
        path: path.to_path_buf(),
        line,
        message,
    };
    // 마지막 레코드의 종결 여부
    let torn = !bytes.is_empty() && !bytes.ends_with(b"\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let mut records = reader.records().peekable();
    let header = match records.next() {
        Some(row) => row.map_err(|e| format_err(1, e.to_string()))?,
        None => return Err(format_err(1, "헤더 없음".to_string())),
    };
    if torn && records.peek().is_none() {
        return Err(format_err(1, "헤더가 줄바꿈 없이 끝남".to_string()));
    }
    if !header.iter().eq(kind.columns().iter().copied()) {
        return Err(format_err(
            1,
            format!("[{kind}] 헤더 불일치: {}", join(&header)),
        ));
    }

    let mut events = Vec::new();
    while let Some(row) = records.next() {
        let tail = torn && records.peek().is_none();
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                if tail {
                    warn!("[{}] 끝나지 않은 마지막 레코드 무시: {}:{}", kind, path.display(), line);
                    break;
                }
                return Err(format_err(line, e.to_string()));
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if tail {
            warn!("[{}] 끝나지 않은 마지막 레코드 무시: {}:{}", kind, path.display(), line);
            break;
        }
        if row.len() != header.len() {
            return Err(format_err(
                line,
                format!("컬럼 수 {}개, 기대 {}개", row.len(), header.len()),
            ));
        }
        let event = record::decode(kind, &header, &row).map_err(|e| format_err(line, e.to_string()))?;
        events.push(event);
    }

    debug!("[{}] {}건 적재: {}", kind, events.len(), path.display());
    Ok(events)
}

fn join(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}

/// 종료된 캠페인의 네 스트림을 읽는 [`CampaignSource`]
#[derive(Debug, Clone)]
pub struct CampaignReader {
    paths: CampaignPaths,
}

impl CampaignReader {
    pub fn new(paths: CampaignPaths) -> Self {
        Self { paths }
    }

    /// 캠페인 디렉토리에서 생성
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(CampaignPaths::from_dir(dir))
    }

    pub fn paths(&self) -> &CampaignPaths {
        &self.paths
    }
}

impl CampaignSource for CampaignReader {
    fn load(&self) -> Result<CampaignLog, CoreError> {
        let mut log = CampaignLog::new();
        for kind in MetricKind::ALL {
            for event in read_stream(kind, self.paths.path(kind))? {
                log.push(event);
            }
        }
        info!(
            "캠페인 적재 완료: 다운로드 {}, 지연 {}, 스킵 {}, 처리량 {}",
            log.downloads.len(),
            log.delays.len(),
            log.skipped.len(),
            log.throughputs.len()
        );
        Ok(log)
    }
}
