//! 이벤트 ↔ CSV 레코드 변환.
//!
//! 컬럼 순서는 [`MetricKind::columns`]를 따른다. 역변환은 헤더와 값을 필드 맵으로
//! 묶어 수집과 같은 검증 규칙([`abrbench_core::validation::validate`])을 통과시키므로
//! 기록된 레코드는 원래 이벤트로 정확히 복원된다.

use abrbench_core::error::CoreError;
use abrbench_core::models::metric::MetricKind;
use abrbench_core::models::telemetry::{EventMeta, TelemetryEvent};
use abrbench_core::validation::{self, FieldMap};
use csv::{StringRecord, Terminator, WriterBuilder};

/// 이벤트의 컬럼 값 (헤더 순서)
pub fn columns(event: &TelemetryEvent) -> Vec<String> {
    let kind = event.kind();
    let mut cols = vec![
        kind.metric_id().to_string(),
        event.meta().timestamp.to_string(),
    ];

    match event {
        TelemetryEvent::Download(e) => cols.extend([
            e.media_type.clone(),
            e.bitrate.to_string(),
            e.send_time.to_string(),
            e.first_byte_time.to_string(),
            e.loaded_time.to_string(),
            e.bytes_loaded.to_string(),
            e.bytes_total.to_string(),
        ]),
        TelemetryEvent::Delay(e) => cols.push(e.delay.to_string()),
        TelemetryEvent::Skipped(e) => cols.extend([
            e.media_type.clone(),
            e.bitrate.to_string(),
            e.send_time.to_string(),
            e.first_byte_time.to_string(),
            e.abort_time.to_string(),
            e.bytes_loaded.to_string(),
            e.bytes_total.to_string(),
        ]),
        TelemetryEvent::Throughput(e) => cols.extend([
            e.media_type.clone(),
            e.bytes.to_string(),
            e.activity_duration_s.to_string(),
            e.throughput_bps.to_string(),
        ]),
    }

    push_key(&mut cols, event.meta());
    cols
}

fn push_key(cols: &mut Vec<String>, meta: &EventMeta) {
    let key = &meta.key;
    cols.extend([
        key.algorithm.to_string(),
        key.omega.to_string(),
        key.sigma.to_string(),
        key.test_nr.to_string(),
        key.run_nr.to_string(),
    ]);
}

/// 레코드 한 줄 (줄바꿈 포함) 직렬화
pub fn encode(event: &TelemetryEvent) -> Result<Vec<u8>, CoreError> {
    write_line(&columns(event)).map_err(|message| CoreError::Persistence {
        kind: event.kind(),
        key: event.key().to_string(),
        message,
    })
}

/// 스트림 헤더 한 줄 직렬화
pub fn encode_header(kind: MetricKind) -> Result<Vec<u8>, CoreError> {
    write_line(kind.columns())
        .map_err(|message| CoreError::Internal(format!("[{kind}] 헤더 직렬화 실패: {message}")))
}

fn write_line<I, T>(fields: I) -> Result<Vec<u8>, String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(128));
    writer.write_record(fields).map_err(|e| e.to_string())?;
    writer.into_inner().map_err(|e| e.to_string())
}

/// 헤더 + 레코드 → 검증된 이벤트
pub fn decode(
    kind: MetricKind,
    header: &StringRecord,
    record: &StringRecord,
) -> Result<TelemetryEvent, CoreError> {
    let fields: FieldMap = header
        .iter()
        .zip(record.iter())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    validation::validate(kind, &fields)
}
