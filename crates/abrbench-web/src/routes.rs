//! 라우트 정의.

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// 수집 라우트
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/report", get(handlers::report::report))
}

/// 미들웨어까지 붙인 전체 앱
///
/// 플레이어 페이지는 다른 origin에서 로드되므로 CORS는 모든 origin 허용.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    report_routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
