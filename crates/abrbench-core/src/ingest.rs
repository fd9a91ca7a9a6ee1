//! 수집 경계.
//!
//! 전송 계층(HTTP 쿼리 등)이 넘긴 평탄한 레코드를 검증하고 [`MetricSink`]에 기록한다.
//! 거부/기록 실패는 호출자에게 그대로 반환되며 수집 프로세스를 중단시키지 않는다.

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::models::telemetry::TelemetryEvent;
use crate::ports::storage::MetricSink;
use crate::validation::{self, FieldMap};

/// 레코드 하나를 검증 후 기록
///
/// 반환값: 기록된 이벤트.
/// 에러: `UnknownMetricKind`, `Validation`, `Persistence` (재시도하지 않음)
pub async fn report(sink: &dyn MetricSink, fields: &FieldMap) -> Result<TelemetryEvent, CoreError> {
    let event = match validation::validate_report(fields) {
        Ok(event) => event,
        Err(e) => {
            warn!("텔레메트리 거부: {e}");
            return Err(e);
        }
    };

    if let Err(e) = sink.append(&event).await {
        warn!("텔레메트리 기록 실패: {e}");
        return Err(e);
    }

    debug!("텔레메트리 기록 [{}] {}", event.kind(), event.key());
    Ok(event)
}
