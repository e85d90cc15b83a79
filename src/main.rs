// region:    --- Imports
use auction_house::config::Config;
use auction_house::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 오류: {}", "Main", e);
            return Err(e.into());
        }
    };
    let addr = config.listen_addr();

    // 저장소 및 상태 초기화
    let state = match AppState::from_config(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("{:<12} --> 저장소 초기화 실패: {:?}", "Main", e);
            return Err(e.into());
        }
    };

    let routes_all = auction_house::app(state);

    // 리스너 생성
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
