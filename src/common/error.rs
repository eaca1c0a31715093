// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::middleware::i18n::Locale;
use crate::services::reconciliation::RuleError;

// Erros de domínio/infra. Viram `ApiError` na borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão ausente: {0}")]
    Forbidden(String),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Recurso em uso: {0}")]
    ResourceInUse(String),

    #[error("Regra de ocupação violada: {0}")]
    OccupancyRule(#[from] RuleError),

    #[error("Carga de dados de exemplo desabilitada")]
    SeedDisabled,

    #[error("Permissão desconhecida: {0}")]
    UnknownPermission(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro pronto para o cliente: status, código estável e mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    /// Converte uma falha de banco em um erro de domínio quando a causa é conhecida.
    pub fn from_db(e: sqlx::Error, what: &str) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::UniqueConstraintViolation(what.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::ResourceNotFound(what.to_string());
            }
        }
        AppError::DatabaseError(e)
    }

    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let en = locale.is_english();
        let t = |pt: &str, english: &str| -> String {
            if en { english.to_string() } else { pt.to_string() }
        };

        match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    code: "VALIDATION_ERROR",
                    error: t("Um ou mais campos são inválidos.", "One or more fields are invalid."),
                    details: Some(json!(details)),
                }
            }
            AppError::EmailAlreadyExists => ApiError::simple(
                StatusCode::CONFLICT,
                "EMAIL_ALREADY_EXISTS",
                t("Este e-mail já está em uso.", "This e-mail is already in use."),
            ),
            AppError::InvalidCredentials => ApiError::simple(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                t("E-mail ou senha inválidos.", "Invalid e-mail or password."),
            ),
            AppError::InvalidToken => ApiError::simple(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                t(
                    "Token de autenticação inválido ou ausente.",
                    "Missing or invalid authentication token.",
                ),
            ),
            AppError::Forbidden(slug) => ApiError::simple(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                if en {
                    format!("You need the '{}' permission to perform this action.", slug)
                } else {
                    format!("Você precisa da permissão '{}' para realizar esta ação.", slug)
                },
            ),
            AppError::UserNotFound => ApiError::simple(
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                t("Usuário não encontrado.", "User not found."),
            ),
            AppError::ResourceNotFound(what) => ApiError::simple(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                if en { format!("{} not found.", what) } else { format!("{} não encontrado(a).", what) },
            ),
            AppError::UniqueConstraintViolation(what) => ApiError::simple(
                StatusCode::CONFLICT,
                "CONFLICT",
                if en { format!("{} already exists.", what) } else { format!("{} já existe.", what) },
            ),
            AppError::ResourceInUse(what) => ApiError::simple(
                StatusCode::CONFLICT,
                "IN_USE",
                if en { format!("{} is still in use.", what) } else { format!("{} ainda está em uso.", what) },
            ),
            AppError::OccupancyRule(rule) => rule_to_api_error(rule, en),
            AppError::SeedDisabled => ApiError::simple(
                StatusCode::FORBIDDEN,
                "SEED_DISABLED",
                t(
                    "A carga de dados de exemplo está desabilitada neste ambiente.",
                    "Seeding sample data is disabled in this environment.",
                ),
            ),
            AppError::UnknownPermission(slug) => ApiError::simple(
                StatusCode::BAD_REQUEST,
                "UNKNOWN_PERMISSION",
                if en { format!("Unknown permission '{}'.", slug) } else { format!("Permissão desconhecida '{}'.", slug) },
            ),

            // Todos os outros erros (DatabaseError, InternalServerError, ...) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                ApiError::simple(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    t("Ocorreu um erro inesperado.", "An unexpected error occurred."),
                )
            }
        }
    }
}

fn rule_to_api_error(rule: RuleError, en: bool) -> ApiError {
    let (status, code, pt, english) = match rule {
        RuleError::StationNotFound(id) => (
            StatusCode::NOT_FOUND,
            "STATION_NOT_FOUND",
            format!("Estação {} não encontrada.", id),
            format!("Workstation {} not found.", id),
        ),
        RuleError::StationNotFlex(id) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "STATION_NOT_FLEX",
            format!("A estação {} não está no pool flex.", id),
            format!("Workstation {} is not in the flex pool.", id),
        ),
        RuleError::NoFlexAvailable => (
            StatusCode::CONFLICT,
            "NO_FLEX_AVAILABLE",
            "Não há estações flex disponíveis.".to_string(),
            "There are no flex workstations available.".to_string(),
        ),
        RuleError::StationNotOccupied(id) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "STATION_NOT_OCCUPIED",
            format!("A estação {} não está ocupada.", id),
            format!("Workstation {} is not occupied.", id),
        ),
    };
    ApiError::simple(status, code, if en { english } else { pt })
}

impl ApiError {
    pub fn simple(status: StatusCode, code: &'static str, error: String) -> Self {
        Self { status, code, error, details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "code": self.code, "details": details }),
            None => json!({ "error": self.error, "code": self.code }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Sem `Accept-Language` disponível, responde no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

pub(crate) fn not_found(kind: &str, id: Uuid) -> AppError {
    AppError::ResourceNotFound(format!("{} {}", kind, id))
}
