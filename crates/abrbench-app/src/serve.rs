//! `abrbench serve`: 캠페인 수집 서버 실행.
//!
//! 캠페인 디렉토리 생성 → 수집 서버 시작 → 시그널 대기 → 서버 종료 → 스트림 닫기.

use std::sync::Arc;

use abrbench_core::config::AppConfig;
use abrbench_storage::MetricStore;
use abrbench_web::WebServer;
use anyhow::{Context, Result};
use tracing::{error, info};

use crate::lifecycle::LifecycleManager;

pub async fn run(config: AppConfig) -> Result<()> {
    let store = Arc::new(
        MetricStore::from_config(&config.storage).context("캠페인 저장소 생성 실패")?,
    );
    info!("캠페인 로그: {}", store.dir().display());

    let server = WebServer::new(store.clone(), config.web.clone());
    println!("리포터 주소: {}", server.url());
    println!("캠페인 디렉토리: {}", store.dir().display());

    let lifecycle = LifecycleManager::new();
    let mut server_task = tokio::spawn(server.run(lifecycle.subscribe()));

    let finished_early = tokio::select! {
        signal = lifecycle.wait_for_signal() => {
            if let Err(e) = signal {
                error!("시그널 핸들러 등록 실패: {e}");
            }
            None
        }
        finished = &mut server_task => Some(finished),
    };
    let server_result = match finished_early {
        Some(result) => result,
        None => {
            lifecycle.shutdown();
            server_task.await
        }
    };

    // 서버가 어떻게 끝났든 스트림은 닫는다
    let close_result = store.close();

    server_result
        .context("수집 서버 태스크 비정상 종료")?
        .context("수집 서버 실행 실패")?;
    close_result.context("캠페인 스트림 닫기 실패")?;

    info!("캠페인 종료: {}", store.dir().display());
    Ok(())
}
