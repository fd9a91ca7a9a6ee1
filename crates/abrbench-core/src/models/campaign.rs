//! 캠페인 로그: 종료된 캠페인의 네 스트림을 메모리에 적재한 읽기 전용 뷰.
//!
//! 각 벡터는 스트림 기록 순서(수집 도착 순서)를 그대로 유지한다.

use serde::{Deserialize, Serialize};

use super::telemetry::{DelayEvent, DownloadEvent, SkippedEvent, TelemetryEvent, ThroughputEvent};

/// 캠페인 이벤트 로그
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignLog {
    pub downloads: Vec<DownloadEvent>,
    pub delays: Vec<DelayEvent>,
    pub skipped: Vec<SkippedEvent>,
    pub throughputs: Vec<ThroughputEvent>,
}

impl CampaignLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이벤트를 해당 스트림 끝에 추가
    pub fn push(&mut self, event: TelemetryEvent) {
        match event {
            TelemetryEvent::Download(e) => self.downloads.push(e),
            TelemetryEvent::Delay(e) => self.delays.push(e),
            TelemetryEvent::Skipped(e) => self.skipped.push(e),
            TelemetryEvent::Throughput(e) => self.throughputs.push(e),
        }
    }

    /// 전체 이벤트 수
    pub fn len(&self) -> usize {
        self.downloads.len() + self.delays.len() + self.skipped.len() + self.throughputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<TelemetryEvent> for CampaignLog {
    fn from_iter<T: IntoIterator<Item = TelemetryEvent>>(iter: T) -> Self {
        let mut log = CampaignLog::new();
        for event in iter {
            log.push(event);
        }
        log
    }
}
