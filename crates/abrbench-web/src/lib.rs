//! # abrbench-web
//!
//! 텔레메트리 수집 HTTP 서버.
//! 평가 대상 플레이어가 측정값을 하나씩 `GET /report` 쿼리로 보고하면
//! 검증 후 [`MetricSink`]에 기록하고 `ok`를 돌려준다.
//!
//! ## 라우트
//! - `GET /`: 안내 문구
//! - `GET /report?<fields>`: 텔레메트리 보고 (실패 시 JSON 에러, 400/500)

pub mod error;
pub mod handlers;
pub mod routes;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use abrbench_core::config::WebConfig;
use abrbench_core::ports::storage::MetricSink;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    /// 진행 중인 캠페인 저장소
    pub sink: Arc<dyn MetricSink>,
}

impl AppState {
    pub fn new(sink: Arc<dyn MetricSink>) -> Self {
        Self { sink }
    }
}

/// 수집 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 수집 서버 생성
    pub fn new(sink: Arc<dyn MetricSink>, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState::new(sink),
        }
    }

    /// 서버 실행
    ///
    /// 설정 포트에만 바인드한다. 리포터는 포트가 고정되어 있으므로
    /// 포트가 사용 중이면 다른 포트로 옮기지 않고 `AddrInUse`로 실패한다.
    /// `shutdown_rx`에 `true`가 들어오면 진행 중인 요청을 마치고 종료한다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };
        let addr = SocketAddr::new(host, self.config.port);

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                error!("포트 {} 이미 사용 중, 수집 서버 시작 불가", self.config.port);
                return Err(std::io::Error::new(
                    std::io::ErrorKind::AddrInUse,
                    format!("포트 {} 이미 사용 중: {}", self.config.port, e),
                ));
            }
            Err(e) => return Err(e),
        };
        info!("수집 서버 시작: http://{}/report", listener.local_addr()?);

        let app = routes::app(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("수집 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("수집 서버 종료");
        Ok(())
    }

    /// 리포터에 설정할 보고 URL
    pub fn url(&self) -> String {
        format!("http://localhost:{}/report", self.config.port)
    }
}
