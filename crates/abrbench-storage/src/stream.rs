//! 메트릭 스트림 하나의 append-only 기록.
//!
//! 스트림마다 파일 핸들 하나를 뮤텍스로 감싸 단일 작성자 규율을 지킨다.
//! 레코드 바이트는 잠금 밖에서 만들고, 잠금 안에서는 한 번의 `write_all`만 수행하므로
//! 동시 append가 한 줄 안에서 섞이지 않는다.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use abrbench_core::error::CoreError;
use abrbench_core::models::metric::MetricKind;
use abrbench_core::models::telemetry::TelemetryEvent;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::record;

/// 스트림이 기록하는 파일 핸들
pub(crate) trait StreamFile: Write + Send {
    fn sync_data(&self) -> io::Result<()>;
    fn sync_all(&self) -> io::Result<()>;
    fn set_len(&self, len: u64) -> io::Result<()>;
}

impl StreamFile for File {
    fn sync_data(&self) -> io::Result<()> {
        File::sync_data(self)
    }

    fn sync_all(&self) -> io::Result<()> {
        File::sync_all(self)
    }

    fn set_len(&self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

struct StreamState {
    /// 닫힌 뒤에는 None
    file: Option<Box<dyn StreamFile>>,
    /// 마지막으로 온전히 기록된 레코드 끝 위치
    len: u64,
    records: u64,
    /// 실패한 레코드를 잘라내지 못한 경우: 이후 기록은 모두 거부
    poisoned: bool,
}

pub(crate) struct MetricStream {
    kind: MetricKind,
    path: PathBuf,
    state: Mutex<StreamState>,
}

impl std::fmt::Debug for MetricStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricStream")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl MetricStream {
    /// 새 스트림 파일 생성 + 헤더 기록. 이미 있는 파일이면 실패한다.
    pub(crate) fn create(dir: &Path, kind: MetricKind) -> Result<Self, CoreError> {
        let path = dir.join(kind.file_name());
        let campaign_err = |message: String| CoreError::Campaign {
            path: path.clone(),
            message,
        };

        let mut file = OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| campaign_err(format!("스트림 생성 실패: {e}")))?;

        let header = record::encode_header(kind)?;
        file.write_all(&header)
            .and_then(|_| file.sync_all())
            .map_err(|e| campaign_err(format!("헤더 기록 실패: {e}")))?;

        debug!("스트림 생성: {}", path.display());

        let len = header.len() as u64;
        Ok(Self::with_file(kind, path, Box::new(file), len))
    }

    /// 헤더까지 기록된 핸들로 스트림 구성. `len`은 현재 파일 길이.
    pub(crate) fn with_file(kind: MetricKind, path: PathBuf, file: Box<dyn StreamFile>, len: u64) -> Self {
        Self {
            kind,
            path,
            state: Mutex::new(StreamState {
                file: Some(file),
                len,
                records: 0,
                poisoned: false,
            }),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// 온전히 기록된 레코드 수 (헤더 제외)
    pub(crate) fn records(&self) -> u64 {
        self.state.lock().records
    }

    /// 레코드 한 건 기록. 실패하면 부분 기록을 잘라내고 `Persistence` 에러.
    pub(crate) fn append(&self, event: &TelemetryEvent, sync: bool) -> Result<(), CoreError> {
        debug_assert_eq!(event.kind(), self.kind);
        let line = record::encode(event)?;
        let persistence_err = |message: String| CoreError::Persistence {
            kind: self.kind,
            key: event.key().to_string(),
            message,
        };

        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.poisoned {
            return Err(persistence_err(
                "이전 기록 실패로 스트림이 손상됨".to_string(),
            ));
        }
        let len = state.len;
        let Some(file) = state.file.as_mut() else {
            return Err(persistence_err("스트림이 닫힘".to_string()));
        };

        let written = file.write_all(&line).and_then(|_| {
            if sync {
                file.sync_data()
            } else {
                Ok(())
            }
        });

        match written {
            Ok(()) => {
                state.len += line.len() as u64;
                state.records += 1;
                Ok(())
            }
            Err(e) => {
                if let Err(truncate_err) = file.set_len(len) {
                    error!(
                        "[{}] 부분 레코드 정리 실패, 스트림 사용 중지: {}",
                        self.kind, truncate_err
                    );
                    state.poisoned = true;
                }
                Err(persistence_err(e.to_string()))
            }
        }
    }

    /// 버퍼 flush 후 핸들 해제. 두 번째 호출은 아무 일도 하지 않는다.
    pub(crate) fn close(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        if let Some(file) = state.file.take() {
            file.sync_all().map_err(|e| CoreError::Campaign {
                path: self.path.clone(),
                message: format!("스트림 닫기 실패: {e}"),
            })?;
            debug!("[{}] 스트림 닫힘 ({}건)", self.kind, state.records);
        }
        Ok(())
    }
}
