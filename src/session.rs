/// 세션 및 요청 컨텍스트
/// HttpOnly 쿠키에 세션 id 만 담고, 로그인 사용자와 플래시 메시지는 서버 메모리에 둔다.
// region:    --- Imports
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Flash Messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

/// 다음 페이지에 한 번 표시되는 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

// endregion: --- Flash Messages

// region:    --- Session Store
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: i64,
    pub username: String,
    pub created_at: i64,
    pub flashes: Vec<Flash>,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl_secs: i64,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_secs,
        }
    }

    pub fn create_session(&self, user_id: i64, username: &str) -> String {
        self.cleanup_expired_sessions();

        let session_id = Uuid::new_v4().to_string();
        let session_data = SessionData {
            user_id,
            username: username.to_string(),
            created_at: chrono::Utc::now().timestamp(),
            flashes: Vec::new(),
        };

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.clone(), session_data);
        }
        info!("{:<12} --> 세션 생성: user={}", "Session", username);

        session_id
    }

    /// 만료된 세션은 조회 시 제거된다.
    pub fn get_session(&self, session_id: &str) -> Option<SessionData> {
        let now = chrono::Utc::now().timestamp();
        let mut sessions = self.sessions.write().ok()?;
        match sessions.get(session_id) {
            Some(session) if session.created_at + self.ttl_secs <= now => {
                debug!("{:<12} --> 만료된 세션 제거", "Session");
                sessions.remove(session_id);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    /// 만료된 세션을 모두 제거한다. 다시 쓰이지 않는 쿠키의 세션도 여기서 정리된다.
    pub fn cleanup_expired_sessions(&self) {
        let now = chrono::Utc::now().timestamp();
        if let Ok(mut sessions) = self.sessions.write() {
            let before = sessions.len();
            sessions.retain(|_, session| session.created_at + self.ttl_secs > now);
            let removed = before - sessions.len();
            if removed > 0 {
                debug!("{:<12} --> 만료된 세션 {}개 제거", "Session", removed);
            }
        }
    }

    pub fn remove_session(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    pub fn push_flash(&self, session_id: &str, flash: Flash) {
        if let Ok(mut sessions) = self.sessions.write() {
            if let Some(session) = sessions.get_mut(session_id) {
                session.flashes.push(flash);
            }
        }
    }

    pub fn take_flashes(&self, session_id: &str) -> Vec<Flash> {
        self.sessions
            .write()
            .ok()
            .and_then(|mut sessions| {
                sessions
                    .get_mut(session_id)
                    .map(|session| std::mem::take(&mut session.flashes))
            })
            .unwrap_or_default()
    }
}

pub const SESSION_COOKIE_NAME: &str = "auction_session";

pub fn create_session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// `CookieJar::remove` 에 넘길 세션 쿠키. 경로가 같아야 브라우저에서 만료된다.
pub fn create_logout_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
}

// endregion: --- Session Store

// region:    --- Request Context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// 요청 단위 컨텍스트: 로그인 사용자(있다면)와 요청 경로
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session_id: Option<String>,
    pub user: Option<CurrentUser>,
    pub path: String,
}

impl RequestContext {
    pub fn anonymous(path: &str) -> Self {
        Self {
            session_id: None,
            user: None,
            path: path.to_string(),
        }
    }

    /// 로그인하지 않았다면 로그인 페이지로 보낸다.
    pub fn require_user(&self) -> Result<&CurrentUser, AppError> {
        self.user.as_ref().ok_or_else(|| AppError::LoginRequired {
            next: self.path.clone(),
        })
    }

    pub fn flash(&self, sessions: &SessionStore, flash: Flash) {
        if let Some(session_id) = &self.session_id {
            sessions.push_flash(session_id, flash);
        }
    }

    pub fn take_flashes(&self, sessions: &SessionStore) -> Vec<Flash> {
        match &self.session_id {
            Some(session_id) => sessions.take_flashes(session_id),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let path = parts.uri.path();

        let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
            return Ok(Self::anonymous(path));
        };
        let Some(session) = state.sessions.get_session(cookie.value()) else {
            return Ok(Self::anonymous(path));
        };

        Ok(Self {
            session_id: Some(cookie.value().to_string()),
            user: Some(CurrentUser {
                id: session.user_id,
                username: session.username,
            }),
            path: path.to_string(),
        })
    }
}

// endregion: --- Request Context

// endregion: --- Tests
