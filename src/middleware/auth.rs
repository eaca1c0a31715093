// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::users::User,
};

// Operador logado, colocado nos extensions pelo `auth_guard`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Valida o Bearer token, carrega o perfil atual e segue com a requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| AppError::InvalidToken.to_api_error(&locale))?;

    // Token válido de um usuário apagado também é rejeitado
    let user = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(|e| match e {
            AppError::UserNotFound => AppError::InvalidToken.to_api_error(&locale),
            other => other.to_api_error(&locale),
        })?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(user);
        }
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
        Err(AppError::InvalidToken.to_api_error(&locale))
    }
}
