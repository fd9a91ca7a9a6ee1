//! 메트릭 종류와 스트림 스키마.
//!
//! 스트림 파일명과 헤더 컬럼 순서는 기존 분석 도구와의 호환을 위해 고정이다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 다운로드 스트림 헤더
const DOWNLOAD_COLUMNS: &[&str] = &[
    "metric_id",
    "timestamp",
    "type",
    "bitrate",
    "send_time",
    "first_bytes_time",
    "loaded_time",
    "bytes_loaded",
    "bytes_total",
    "algo",
    "omega",
    "sigma",
    "test_nr",
    "run_nr",
];

/// 지연 스트림 헤더
const DELAY_COLUMNS: &[&str] = &[
    "metric_id",
    "timestamp",
    "delay",
    "algo",
    "omega",
    "sigma",
    "test_nr",
    "run_nr",
];

/// 스킵 세그먼트 스트림 헤더
const SKIPPED_COLUMNS: &[&str] = &[
    "metric_id",
    "timestamp",
    "type",
    "bitrate",
    "send_time",
    "first_bytes_time",
    "abort_time",
    "bytes_loaded",
    "bytes_total",
    "algo",
    "omega",
    "sigma",
    "test_nr",
    "run_nr",
];

/// 처리량 스트림 헤더
const THROUGHPUT_COLUMNS: &[&str] = &[
    "metric_id",
    "timestamp",
    "type",
    "bytes",
    "activity_s",
    "throughput_bps",
    "algo",
    "omega",
    "sigma",
    "test_nr",
    "run_nr",
];

/// 메트릭 종류: 논리 스트림 하나에 대응
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// 세그먼트 다운로드 완료
    Download,
    /// 라이브 지연 샘플
    Delay,
    /// 중단(스킵)된 세그먼트
    Skipped,
    /// 처리량 측정
    Throughput,
}

impl MetricKind {
    /// 모든 메트릭 종류 (metric_id 순)
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Download,
        MetricKind::Delay,
        MetricKind::Skipped,
        MetricKind::Throughput,
    ];

    /// 플레이어가 보고하는 숫자 구분자 (`metric_id`)
    pub fn metric_id(self) -> u8 {
        match self {
            MetricKind::Download => 0,
            MetricKind::Delay => 1,
            MetricKind::Skipped => 2,
            MetricKind::Throughput => 3,
        }
    }

    /// 소문자 이름
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Download => "download",
            MetricKind::Delay => "delay",
            MetricKind::Skipped => "skipped",
            MetricKind::Throughput => "throughput",
        }
    }

    /// 캠페인 디렉토리 안의 스트림 파일명
    pub fn file_name(self) -> &'static str {
        match self {
            MetricKind::Download => "download_log.csv",
            MetricKind::Delay => "delay_log.csv",
            MetricKind::Skipped => "skipped.csv",
            MetricKind::Throughput => "throughput_log.csv",
        }
    }

    /// 스트림 헤더 (직렬화 컬럼 순서)
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            MetricKind::Download => DOWNLOAD_COLUMNS,
            MetricKind::Delay => DELAY_COLUMNS,
            MetricKind::Skipped => SKIPPED_COLUMNS,
            MetricKind::Throughput => THROUGHPUT_COLUMNS,
        }
    }

    /// 구분자 파싱: 숫자 id(`"0"`..`"3"`) 또는 이름(대소문자 무시)
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return MetricKind::ALL
                .into_iter()
                .find(|k| k.metric_id() == id)
                .ok_or_else(|| CoreError::UnknownMetricKind(raw.to_string()));
        }
        MetricKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownMetricKind(raw.to_string()))
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKind::parse(s)
    }
}
