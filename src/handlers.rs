/// HTTP 핸들러
/// 페이지는 JSON 문서로 응답하고, 상태를 바꾸는 요청은 플래시 메시지와 함께 303 으로 돌려보낸다.
// region:    --- Imports
use crate::auction::forms::{BidInput, CommentInput, ListingInput, LoginInput, RegisterInput};
use crate::commands::{account, bidding, listing, watchlist};
use crate::error::{AppError, Result};
use crate::query;
use crate::query::pages::{LoginPage, Page, RegisterPage};
use crate::session::{self, CurrentUser, Flash, RequestContext};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Helpers
const PAGE_NOT_FOUND: &str = "페이지를 찾을 수 없습니다.";

/// 경로의 id. 숫자가 아니면 없는 페이지로 취급한다.
pub fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(PAGE_NOT_FOUND.to_string()))
}

/// 로그인 후 이동 경로. 사이트 내부 경로만 허용한다.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

fn listing_path(auction_id: i64) -> String {
    format!("/listing/{}", auction_id)
}

fn render<T: Serialize>(state: &AppState, ctx: &RequestContext, body: T) -> Json<Page<T>> {
    Json(Page {
        user: ctx.user.clone(),
        messages: ctx.take_flashes(&state.sessions),
        body,
    })
}

/// 상품 페이지 하위 요청은 로그인 후 상품 페이지로 돌아간다.
fn require_user_for_listing(ctx: &RequestContext, auction_id: i64) -> Result<&CurrentUser> {
    ctx.user.as_ref().ok_or_else(|| AppError::LoginRequired {
        next: listing_path(auction_id),
    })
}

/// 커맨드 결과를 플래시 메시지로 남기고 `to` 로 돌려보낸다.
/// 규칙 위반은 오류 메시지로 남기며, 그 밖의 오류는 그대로 응답한다.
fn redirect_with_flash(
    state: &AppState,
    ctx: &RequestContext,
    outcome: Result<String>,
    to: &str,
) -> Result<Response> {
    let flash = match outcome {
        Ok(message) => Flash::success(message),
        Err(
            err @ (AppError::BusinessRule(_)
            | AppError::AuthorizationDenied(_)
            | AppError::Conflict(_)
            | AppError::ValidationFailed(_)),
        ) => {
            info!("{:<12} --> 요청 거절: {}", "Handler", err);
            Flash::error(err.to_string())
        }
        Err(err) => return Err(err),
    };
    ctx.flash(&state.sessions, flash);
    Ok(Redirect::to(to).into_response())
}

/// 새 세션을 만들고 쿠키를 설정한다. 기존 세션은 버린다.
fn log_in(
    state: &AppState,
    ctx: &RequestContext,
    jar: CookieJar,
    user_id: i64,
    username: &str,
) -> (CookieJar, String) {
    if let Some(old) = &ctx.session_id {
        state.sessions.remove_session(old);
    }
    let session_id = state.sessions.create_session(user_id, username);
    let cookie = session::create_session_cookie(session_id.clone(), state.config.secure_cookies);
    (jar.add(cookie), session_id)
}

// endregion: --- Helpers

// region:    --- Fallbacks

/// 알려진 경로에 허용되지 않는 메서드
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!(
        "{} {} 요청은 허용되지 않습니다.",
        method,
        uri.path()
    ))
}

/// 알 수 없는 경로
pub async fn handle_not_found(uri: Uri) -> AppError {
    info!("{:<12} --> 없는 경로: {}", "Handler", uri.path());
    AppError::NotFound(PAGE_NOT_FOUND.to_string())
}

// endregion: --- Fallbacks

// region:    --- Account Handlers
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

pub async fn handle_login_form(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    render(
        &state,
        &ctx,
        LoginPage {
            message: None,
            next: query.next.map(|n| safe_next(Some(&n))),
        },
    )
}

/// 로그인. 실패하면 401 과 함께 폼을 다시 보여준다.
pub async fn handle_login(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
    Form(input): Form<LoginInput>,
) -> Result<Response> {
    match account::handle_authenticate(state.store.as_ref(), &input).await {
        Ok(user) => {
            let (jar, session_id) = log_in(&state, &ctx, jar, user.id, &user.username);
            state.sessions.push_flash(
                &session_id,
                Flash::success(format!(
                    "{}님, 환영합니다. 로그인에 성공했습니다.",
                    user.username
                )),
            );
            info!("{:<12} --> 로그인 성공: {}", "Handler", user.username);
            let to = safe_next(input.next.as_deref());
            Ok((jar, Redirect::to(&to)).into_response())
        }
        Err(AppError::ValidationFailed(errors)) => {
            let message = errors
                .get("__all__")
                .unwrap_or("아이디와 비밀번호를 입력하세요.")
                .to_string();
            let page = render(
                &state,
                &ctx,
                LoginPage {
                    message: Some(message),
                    next: input.next.as_deref().map(|n| safe_next(Some(n))),
                },
            );
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn handle_logout(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(session_id) = &ctx.session_id {
        state.sessions.remove_session(session_id);
        info!("{:<12} --> 로그아웃", "Handler");
    }
    (jar.remove(session::create_logout_cookie()), Redirect::to("/"))
}

pub async fn handle_register_form(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> impl IntoResponse {
    render(&state, &ctx, RegisterPage::default())
}

/// 회원가입. 성공하면 바로 로그인된다.
pub async fn handle_register(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
    Form(input): Form<RegisterInput>,
) -> Result<Response> {
    match account::handle_register(state.store.as_ref(), &input).await {
        Ok(user) => {
            let (jar, session_id) = log_in(&state, &ctx, jar, user.id, &user.username);
            state.sessions.push_flash(
                &session_id,
                Flash::success(format!("{}님, 가입을 환영합니다.", user.username)),
            );
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AppError::ValidationFailed(errors)) => {
            let page = render(
                &state,
                &ctx,
                RegisterPage {
                    message: Some("회원가입에 실패했습니다. 입력값을 확인하세요.".to_string()),
                    errors: Some(errors),
                },
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e),
    }
}

// endregion: --- Account Handlers

// region:    --- Query Handlers

/// 진행 중인 경매 목록
pub async fn handle_index(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<impl IntoResponse> {
    let body = query::handlers::get_index(state.store.as_ref()).await?;
    Ok(render(&state, &ctx, body))
}

pub async fn handle_categories(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<impl IntoResponse> {
    let body = query::handlers::get_categories(state.store.as_ref()).await?;
    Ok(render(&state, &ctx, body))
}

pub async fn handle_category(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let category_id = parse_id(&id)?;
    let body = query::handlers::get_category(state.store.as_ref(), category_id).await?;
    Ok(render(&state, &ctx, body))
}

pub async fn handle_watchlist(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<impl IntoResponse> {
    let user = ctx.require_user()?;
    let body = query::handlers::get_watchlist(state.store.as_ref(), user.id).await?;
    Ok(render(&state, &ctx, body))
}

/// 상품 상세. 종료된 경매도 조회할 수 있다.
pub async fn handle_listing(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let auction_id = parse_id(&id)?;
    let body =
        query::handlers::get_listing(state.store.as_ref(), auction_id, ctx.user.as_ref()).await?;
    Ok(render(&state, &ctx, body))
}

// endregion: --- Query Handlers

// region:    --- Command Handlers

pub async fn handle_create_form(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<impl IntoResponse> {
    ctx.require_user()?;
    let body = query::handlers::get_create_form(state.store.as_ref(), None).await?;
    Ok(render(&state, &ctx, body))
}

/// 상품 등록. 검증 오류는 422 와 함께 폼을 다시 보여준다.
pub async fn handle_create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(input): Form<ListingInput>,
) -> Result<Response> {
    let seller = ctx.require_user()?;
    match listing::handle_create_listing(state.store.as_ref(), seller, &input).await {
        Ok(auction) => redirect_with_flash(
            &state,
            &ctx,
            Ok(format!("'{}' 상품이 등록되었습니다.", auction.title)),
            "/",
        ),
        Err(AppError::ValidationFailed(errors)) => {
            let body =
                query::handlers::get_create_form(state.store.as_ref(), Some(errors)).await?;
            let mut page = render(&state, &ctx, body);
            page.0
                .messages
                .push(Flash::error("상품 등록에 실패했습니다. 입력값을 확인하세요."));
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e),
    }
}

/// 경매 종료 (판매자만)
pub async fn handle_close(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response> {
    let auction_id = parse_id(&id)?;
    let user = require_user_for_listing(&ctx, auction_id)?;
    let outcome = bidding::handle_close_auction(state.store.as_ref(), auction_id, user)
        .await
        .map(|outcome| match outcome.winner {
            Some(winner) => format!("경매가 종료되었습니다. 낙찰자: {}", winner.username),
            None => "입찰 없이 경매가 종료되었습니다.".to_string(),
        });
    redirect_with_flash(&state, &ctx, outcome, &listing_path(auction_id))
}

/// 입찰
pub async fn handle_bid(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Form(input): Form<BidInput>,
) -> Result<Response> {
    let auction_id = parse_id(&id)?;
    let bidder = require_user_for_listing(&ctx, auction_id)?;
    let outcome = bidding::handle_place_bid(state.store.as_ref(), auction_id, bidder, &input)
        .await
        .map(|bid| format!("{} 입찰이 완료되었습니다.", bid.bid_price));
    redirect_with_flash(&state, &ctx, outcome, &listing_path(auction_id))
}

/// 댓글 작성
pub async fn handle_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Form(input): Form<CommentInput>,
) -> Result<Response> {
    let auction_id = parse_id(&id)?;
    let user = require_user_for_listing(&ctx, auction_id)?;
    let outcome = listing::handle_add_comment(state.store.as_ref(), auction_id, user, &input)
        .await
        .map(|_| "댓글이 등록되었습니다.".to_string());
    redirect_with_flash(&state, &ctx, outcome, &listing_path(auction_id))
}

pub async fn handle_watchlist_add(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response> {
    let auction_id = parse_id(&id)?;
    let user = require_user_for_listing(&ctx, auction_id)?;
    let outcome = watchlist::handle_add_to_watchlist(state.store.as_ref(), auction_id, user)
        .await
        .map(|auction| format!("'{}' 상품을 관심 목록에 추가했습니다.", auction.title));
    redirect_with_flash(&state, &ctx, outcome, &listing_path(auction_id))
}

pub async fn handle_watchlist_remove(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response> {
    let auction_id = parse_id(&id)?;
    let user = require_user_for_listing(&ctx, auction_id)?;
    let outcome = watchlist::handle_remove_from_watchlist(state.store.as_ref(), auction_id, user)
        .await
        .map(|auction| format!("'{}' 상품을 관심 목록에서 삭제했습니다.", auction.title));
    redirect_with_flash(&state, &ctx, outcome, &listing_path(auction_id))
}

// endregion: --- Command Handlers

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_ids_are_not_found() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id(""), Err(AppError::NotFound(_))));
    }

    #[test]
    fn next_path_stays_on_site() {
        assert_eq!(safe_next(Some("/watchlist")), "/watchlist");
        assert_eq!(safe_next(Some("//evil.example.com")), "/");
        assert_eq!(safe_next(Some("https://evil.example.com")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
// endregion: --- Tests
