use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::session::SessionStore;
use crate::store::{CategoryRepository, MemoryStore, PgStore, Store, StoreError};

/// 핸들러가 공유하는 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            sessions: SessionStore::new(config.session_ttl_secs),
            store,
            config: Arc::new(config),
        }
    }

    /// 메모리 저장소를 쓰는 상태 (로컬 실행, 테스트)
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    /// 설정에 따라 저장소를 준비한다. DATABASE_URL 이 없으면 메모리 저장소를 쓴다.
    pub async fn from_config(config: Config) -> Result<Self, AppError> {
        let state = match &config.database_url {
            Some(url) => {
                let db = DatabaseManager::connect(url, config.database_max_connections).await?;
                db.initialize_database(config.database_reset).await?;
                info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
                Self::new(Arc::new(PgStore::new(Arc::new(db))), config)
            }
            None => {
                warn!(
                    "{:<12} --> DATABASE_URL 이 없어 메모리 저장소를 사용합니다",
                    "Main"
                );
                Self::in_memory(config)
            }
        };
        state.seed_categories().await?;
        Ok(state)
    }

    /// 설정된 카테고리를 만든다. 이미 있는 카테고리는 건너뛴다.
    async fn seed_categories(&self) -> Result<(), AppError> {
        for name in &self.config.seed_categories {
            match self.store.create_category(name).await {
                Ok(category) => info!("{:<12} --> 카테고리 생성: {}", "Main", category.name),
                Err(StoreError::Duplicate(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
