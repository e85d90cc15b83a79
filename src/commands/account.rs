/// 계정 관련 커맨드 처리
/// 1. 회원가입
/// 2. 로그인 인증
// region:    --- Imports
use crate::auction::forms::{self, FieldErrors, LoginInput, RegisterInput};
use crate::auction::model::{NewUser, User};
use crate::error::{AppError, Result};
use crate::store::{Store, StoreError, UserRepository};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
const USERNAME_TAKEN: &str = "이미 사용 중인 아이디입니다.";
const INVALID_CREDENTIALS: &str = "아이디 또는 비밀번호가 올바르지 않습니다.";

/// 1. 회원가입
/// 중복 아이디는 계정을 만들지 않고 검증 오류로 돌려준다.
pub async fn handle_register(store: &dyn Store, input: &RegisterInput) -> Result<User> {
    let registration = forms::validate_registration(input).map_err(AppError::ValidationFailed)?;
    info!("{:<12} --> 회원가입 요청: {}", "Command", registration.username);

    if store
        .find_user_by_username(&registration.username)
        .await?
        .is_some()
    {
        warn!("{:<12} --> 중복 아이디: {}", "Command", registration.username);
        return Err(AppError::ValidationFailed(FieldErrors::single(
            "username",
            USERNAME_TAKEN,
        )));
    }

    let new_user = NewUser {
        username: registration.username,
        email: registration.email,
        password_hash: hash_password(&registration.password)?,
    };

    match store.create_user(new_user).await {
        Ok(user) => Ok(user),
        Err(StoreError::Duplicate(_)) => Err(AppError::ValidationFailed(FieldErrors::single(
            "username",
            USERNAME_TAKEN,
        ))),
        Err(e) => Err(e.into()),
    }
}

/// 2. 로그인 인증
pub async fn handle_authenticate(store: &dyn Store, input: &LoginInput) -> Result<User> {
    let (username, password) = forms::validate_login(input).map_err(AppError::ValidationFailed)?;
    info!("{:<12} --> 로그인 요청: {}", "Command", username);

    let invalid = || AppError::ValidationFailed(FieldErrors::single("__all__", INVALID_CREDENTIALS));

    let user = store
        .find_user_by_username(&username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&password, &user.password_hash) {
        warn!("{:<12} --> 비밀번호 불일치: {}", "Command", username);
        return Err(invalid());
    }
    Ok(user)
}

// endregion: --- Commands

// region:    --- Password
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("비밀번호 해시 실패: {}", e)))
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// endregion: --- Password

// endregion: --- Tests
