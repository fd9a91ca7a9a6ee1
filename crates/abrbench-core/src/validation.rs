//! 텔레메트리 검증.
//!
//! 평탄한 key-value 레코드와 선언된 메트릭 종류로부터 [`TelemetryEvent`]를 만든다.
//! 부수효과 없는 순수 함수이며, 실패 시 문제 필드명을 담은
//! [`CoreError::Validation`] 또는 [`CoreError::UnknownMetricKind`]를 반환한다.
//!
//! 필드는 저장 컬럼명(플레이어가 보내는 쿼리 이름)과 정식 이름 둘 다 허용한다.
//! 예: `algo` / `algorithm`, `first_bytes_time` / `first_byte_time`.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::experiment::{Algorithm, ExperimentKey};
use crate::models::metric::MetricKind;
use crate::models::telemetry::{
    DelayEvent, DownloadEvent, EventMeta, SkippedEvent, TelemetryEvent, ThroughputEvent,
};

/// 수신 레코드 (필드명 → 원시 문자열 값)
pub type FieldMap = HashMap<String, String>;

/// 필드 정의: 저장 컬럼명 + 허용 별칭
struct Field {
    column: &'static str,
    aliases: &'static [&'static str],
}

const fn field(column: &'static str, aliases: &'static [&'static str]) -> Field {
    Field { column, aliases }
}

const METRIC_ID: Field = field("metric_id", &["metric_kind"]);
const TIMESTAMP: Field = field("timestamp", &[]);
const MEDIA_TYPE: Field = field("type", &["media_type"]);
const BITRATE: Field = field("bitrate", &[]);
const SEND_TIME: Field = field("send_time", &[]);
const FIRST_BYTE_TIME: Field = field("first_bytes_time", &["first_byte_time"]);
const LOADED_TIME: Field = field("loaded_time", &[]);
const ABORT_TIME: Field = field("abort_time", &[]);
const BYTES_LOADED: Field = field("bytes_loaded", &[]);
const BYTES_TOTAL: Field = field("bytes_total", &[]);
const DELAY: Field = field("delay", &[]);
const BYTES: Field = field("bytes", &[]);
const ACTIVITY: Field = field("activity_s", &["activity_duration_s"]);
const THROUGHPUT: Field = field("throughput_bps", &[]);
const ALGORITHM: Field = field("algo", &["algorithm"]);
const OMEGA: Field = field("omega", &[]);
const SIGMA: Field = field("sigma", &[]);
const TEST_NR: Field = field("test_nr", &[]);
const RUN_NR: Field = field("run_nr", &[]);

/// 레코드의 메트릭 구분자(`metric_id` 또는 `metric_kind`) 해석
pub fn declared_kind(fields: &FieldMap) -> Result<MetricKind, CoreError> {
    let raw = lookup(fields, &METRIC_ID)
        .ok_or_else(|| CoreError::UnknownMetricKind("(구분자 없음)".to_string()))?;
    MetricKind::parse(raw)
}

/// 구분자를 레코드에서 읽어 검증
pub fn validate_report(fields: &FieldMap) -> Result<TelemetryEvent, CoreError> {
    let kind = declared_kind(fields)?;
    validate(kind, fields)
}

/// 선언된 메트릭 종류로 레코드 검증
///
/// 레코드에 구분자가 함께 들어 있으면 선언된 종류와 일치해야 한다.
pub fn validate(kind: MetricKind, fields: &FieldMap) -> Result<TelemetryEvent, CoreError> {
    let reader = Reader { kind, fields };

    if lookup(fields, &METRIC_ID).is_some() {
        let reported = declared_kind(fields)?;
        if reported != kind {
            return Err(reader.invalid(
                &METRIC_ID,
                format!("선언된 종류({kind})와 보고된 종류({reported})가 다름"),
            ));
        }
    }

    let meta = reader.meta()?;
    let event = match kind {
        MetricKind::Download => TelemetryEvent::Download(DownloadEvent {
            meta,
            media_type: reader.text(&MEDIA_TYPE),
            bitrate: reader.integer(&BITRATE)?,
            send_time: reader.integer(&SEND_TIME)?,
            first_byte_time: reader.integer(&FIRST_BYTE_TIME)?,
            loaded_time: reader.integer(&LOADED_TIME)?,
            bytes_loaded: reader.integer(&BYTES_LOADED)?,
            bytes_total: reader.integer(&BYTES_TOTAL)?,
        }),
        MetricKind::Delay => TelemetryEvent::Delay(DelayEvent {
            meta,
            delay: reader.non_negative_float(&DELAY)?,
        }),
        MetricKind::Skipped => TelemetryEvent::Skipped(SkippedEvent {
            meta,
            media_type: reader.text(&MEDIA_TYPE),
            bitrate: reader.integer(&BITRATE)?,
            send_time: reader.integer(&SEND_TIME)?,
            first_byte_time: reader.integer(&FIRST_BYTE_TIME)?,
            abort_time: reader.integer(&ABORT_TIME)?,
            bytes_loaded: reader.integer(&BYTES_LOADED)?,
            bytes_total: reader.integer(&BYTES_TOTAL)?,
        }),
        MetricKind::Throughput => TelemetryEvent::Throughput(ThroughputEvent {
            meta,
            media_type: reader.text(&MEDIA_TYPE),
            bytes: reader.integer(&BYTES)?,
            activity_duration_s: reader.non_negative_float(&ACTIVITY)?,
            throughput_bps: reader.non_negative_float(&THROUGHPUT)?,
        }),
    };
    Ok(event)
}

fn lookup<'a>(fields: &'a FieldMap, field: &Field) -> Option<&'a str> {
    std::iter::once(field.column)
        .chain(field.aliases.iter().copied())
        .find_map(|name| fields.get(name))
        .map(|value| value.trim())
}

struct Reader<'a> {
    kind: MetricKind,
    fields: &'a FieldMap,
}

impl<'a> Reader<'a> {
    fn meta(&self) -> Result<EventMeta, CoreError> {
        let algorithm = Algorithm::new(self.required(&ALGORITHM)?)
            .map_err(|_| self.invalid(&ALGORITHM, "빈 알고리즘 이름"))?;
        Ok(EventMeta {
            timestamp: self.integer(&TIMESTAMP)?,
            key: ExperimentKey {
                algorithm,
                omega: self.integer(&OMEGA)?,
                sigma: self.integer(&SIGMA)?,
                test_nr: self.positive(&TEST_NR)?,
                run_nr: self.positive(&RUN_NR)?,
            },
        })
    }

    fn required(&self, field: &Field) -> Result<&'a str, CoreError> {
        match lookup(self.fields, field) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(self.invalid(field, "필수 필드 누락")),
        }
    }

    fn text(&self, field: &Field) -> String {
        lookup(self.fields, field).unwrap_or_default().to_string()
    }

    fn integer<T: FromStr>(&self, field: &Field) -> Result<T, CoreError> {
        let raw = self.required(field)?;
        raw.parse::<T>()
            .map_err(|_| self.invalid(field, format!("정수 형식 아님: {raw:?}")))
    }

    fn positive(&self, field: &Field) -> Result<u32, CoreError> {
        let value: u32 = self.integer(field)?;
        if value == 0 {
            return Err(self.invalid(field, "1 이상이어야 함"));
        }
        Ok(value)
    }

    fn non_negative_float(&self, field: &Field) -> Result<f64, CoreError> {
        let raw = self.required(field)?;
        let value: f64 = raw
            .parse()
            .map_err(|_| self.invalid(field, format!("실수 형식 아님: {raw:?}")))?;
        if !value.is_finite() || value < 0.0 {
            return Err(self.invalid(field, format!("유한한 0 이상 값이어야 함: {raw:?}")));
        }
        Ok(value)
    }

    fn invalid(&self, field: &Field, message: impl Into<String>) -> CoreError {
        CoreError::Validation {
            kind: self.kind,
            field: field.column.to_string(),
            message: message.into(),
        }
    }
}
