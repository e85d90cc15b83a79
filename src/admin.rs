/// 관리자 조회 및 카테고리 관리
/// `x-admin-token` 헤더가 설정된 관리자 토큰과 같아야 한다. 토큰이 설정되지 않았다면 경로 자체가 없다.
// region:    --- Imports
use crate::auction::model::{Auction, Bid, Category, Comment, User};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::{
    AuctionRepository, BidRepository, CategoryRepository, CommentRepository, UserRepository,
};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Debug, Serialize)]
pub struct Inspection {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub auctions: Vec<Auction>,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Err(AppError::NotFound("페이지를 찾을 수 없습니다.".to_string()));
    };
    let provided = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if provided != Some(expected) {
        warn!("{:<12} --> 관리자 토큰 불일치", "Admin");
        return Err(AppError::AuthorizationDenied(
            "관리자 토큰이 올바르지 않습니다.".to_string(),
        ));
    }
    Ok(())
}

/// 전체 데이터 조회 (비밀번호 해시 제외)
pub async fn handle_inspect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Inspection>> {
    authorize(&state, &headers)?;
    info!("{:<12} --> 전체 데이터 조회", "Admin");

    let store = state.store.as_ref();
    Ok(Json(Inspection {
        users: store.list_users().await?,
        categories: store.list_categories().await?,
        auctions: store.list_auctions().await?,
        bids: store.list_bids().await?,
        comments: store.list_comments().await?,
    }))
}

/// 카테고리 생성. 같은 이름이 있으면 409.
pub async fn handle_create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NewCategoryRequest>,
) -> Result<impl IntoResponse> {
    authorize(&state, &headers)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BusinessRule(
            "카테고리 이름을 입력하세요.".to_string(),
        ));
    }

    let category = state.store.create_category(name).await?;
    info!("{:<12} --> 카테고리 생성: {}", "Admin", category.name);
    Ok((StatusCode::CREATED, Json(category)))
}
