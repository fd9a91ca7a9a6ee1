//! 텔레메트리 이벤트 모델.
//!
//! 재생 세션이 보고하는 측정값 하나를 메트릭 종류별 variant로 표현한다.
//! 검증([`crate::validation`])을 통과한 값만 이 타입으로 만들어진다.

use serde::{Deserialize, Serialize};

use super::experiment::ExperimentKey;
use super::metric::MetricKind;

/// 모든 이벤트 공통 속성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMeta {
    /// 보고 시각 (밀리초)
    pub timestamp: i64,
    /// 소속 실험 키
    pub key: ExperimentKey,
}

/// 세그먼트 다운로드 완료
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadEvent {
    pub meta: EventMeta,
    /// 세그먼트 미디어 종류 (예: "video"), 보고되지 않으면 빈 문자열
    #[serde(default)]
    pub media_type: String,
    /// 선택된 표현의 비트레이트 (bits/sec)
    pub bitrate: u64,
    pub send_time: i64,
    pub first_byte_time: i64,
    pub loaded_time: i64,
    pub bytes_loaded: u64,
    pub bytes_total: u64,
}

/// 라이브 지연 샘플
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayEvent {
    pub meta: EventMeta,
    /// 지연 (초)
    pub delay: f64,
}

/// 완료 전에 중단된 세그먼트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEvent {
    pub meta: EventMeta,
    #[serde(default)]
    pub media_type: String,
    pub bitrate: u64,
    pub send_time: i64,
    pub first_byte_time: i64,
    pub abort_time: i64,
    pub bytes_loaded: u64,
    pub bytes_total: u64,
}

/// 처리량 측정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputEvent {
    pub meta: EventMeta,
    #[serde(default)]
    pub media_type: String,
    /// 측정 구간 수신 바이트
    pub bytes: u64,
    /// 실제 전송 활동 시간 (초)
    pub activity_duration_s: f64,
    /// 처리량 (bits/sec)
    pub throughput_bps: f64,
}

/// 검증된 텔레메트리 이벤트: 메트릭 종류별 tagged variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric_kind", rename_all = "snake_case")]
pub enum TelemetryEvent {
    Download(DownloadEvent),
    Delay(DelayEvent),
    Skipped(SkippedEvent),
    Throughput(ThroughputEvent),
}

impl TelemetryEvent {
    /// 이벤트의 메트릭 종류
    pub fn kind(&self) -> MetricKind {
        match self {
            TelemetryEvent::Download(_) => MetricKind::Download,
            TelemetryEvent::Delay(_) => MetricKind::Delay,
            TelemetryEvent::Skipped(_) => MetricKind::Skipped,
            TelemetryEvent::Throughput(_) => MetricKind::Throughput,
        }
    }

    /// 공통 속성
    pub fn meta(&self) -> &EventMeta {
        match self {
            TelemetryEvent::Download(e) => &e.meta,
            TelemetryEvent::Delay(e) => &e.meta,
            TelemetryEvent::Skipped(e) => &e.meta,
            TelemetryEvent::Throughput(e) => &e.meta,
        }
    }

    /// 소속 실험 키
    pub fn key(&self) -> &ExperimentKey {
        &self.meta().key
    }
}
