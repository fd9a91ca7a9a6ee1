//! 메트릭 저장소 포트.
//!
//! 구현: `abrbench-storage` crate (CSV 레코드 스트림)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::campaign::CampaignLog;
use crate::models::telemetry::TelemetryEvent;

/// 수집 단계: 검증된 이벤트의 append-only 기록
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// 이벤트 한 건을 해당 스트림에 기록
    ///
    /// 동시 호출 시에도 레코드가 섞이거나 잘리지 않는다.
    /// 실패하면 부분 레코드 없이 `CoreError::Persistence`를 반환한다.
    async fn append(&self, event: &TelemetryEvent) -> Result<(), CoreError>;
}

/// 분석 단계: 종료된 캠페인 스트림 읽기
pub trait CampaignSource: Send + Sync {
    /// 네 스트림을 기록 순서대로 적재
    fn load(&self) -> Result<CampaignLog, CoreError>;
}
