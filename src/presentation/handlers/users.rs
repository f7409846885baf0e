use axum::extract::{Json, State, rejection::JsonRejection};
use axum_extra::{extract::CookieJar, extract::WithRejection};
use serde_json::{Value, json};

use super::multipart::FormData;
use super::{ApiJson, ApiMultipart, AppState};
use crate::application::dto::{LoginRequest, LoginResponse, RefreshTokenRequest, RegisterUserInput};
use crate::domain::read_models::PublicUser;
use crate::presentation::middleware::auth::{
    CurrentUser, REFRESH_TOKEN_COOKIE, TokenPair, with_session_cookies, without_session_cookies,
};
use crate::presentation::middleware::AppError;
use crate::presentation::response::ApiResponse;

/// `POST /users/register` (multipart, `avatar` required, `coverImage` optional)
pub async fn register(
    State(state): State<AppState>,
    WithRejection(multipart, _): ApiMultipart,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let mut form = FormData::read(multipart).await?;
    let input = RegisterUserInput {
        full_name: form.text("fullName").unwrap_or_default(),
        email: form.text("email").unwrap_or_default(),
        username: form.text("username").unwrap_or_default(),
        password: form.text("password").unwrap_or_default(),
        avatar: form.file("avatar"),
        cover_image: form.file("coverImage"),
    };

    let user = state.users.register(input).await?;
    Ok(ApiResponse::created(user, "User registered successfully"))
}

/// `POST /users/login`; sets both session cookies
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): ApiJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<LoginResponse>), AppError> {
    let response = state.users.login(request).await?;
    let tokens = TokenPair {
        access_token: response.access_token.clone(),
        refresh_token: response.refresh_token.clone(),
    };

    let jar = with_session_cookies(jar, &tokens, state.secure_cookies);
    Ok((jar, ApiResponse::ok(response, "User logged in successfully")))
}

/// `POST /users/logout`; clears the stored refresh token and both cookies
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<Value>), AppError> {
    state.users.logout(user.id).await?;
    Ok((without_session_cookies(jar), ApiResponse::ok(json!({}), "User logged out")))
}

/// `POST /users/refresh-token`; the cookie wins over the body field
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiResponse<TokenPair>), AppError> {
    let presented = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| body.ok().and_then(|Json(request)| request.refresh_token));

    let tokens = state.users.refresh(presented.as_deref()).await?;
    let jar = with_session_cookies(jar, &tokens, state.secure_cookies);
    Ok((jar, ApiResponse::ok(tokens, "Access token refreshed")))
}

/// `GET /users/current-user`
pub async fn current_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let profile = state.users.current_user(user.id).await?;
    Ok(ApiResponse::ok(profile, "Current user fetched successfully"))
}
