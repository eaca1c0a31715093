// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::Claims,
        users::{permission_slugs, Permission, User},
    },
};

// Hash em thread separada para não travar o runtime
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_days: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_days: i64, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, token_ttl_days, pool }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let credentials = self
            .user_repo
            .find_credentials_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &credentials.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let user = self.load_user(credentials.id).await?;
        let token = self.create_token(user.id)?;
        tracing::info!("🔑 Login de {}", user.email);
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let user_id = decode_subject(&self.jwt_secret, token)?;
        self.load_user(user_id).await
    }

    /// Cria a identidade de login e o perfil na mesma transação.
    pub async fn provision_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        permissions: &[Permission],
    ) -> Result<User, AppError> {
        // Hashing fica fora da transação, não toca no banco
        let hashed_password = hash_password(password).await?;

        let mut tx = self.pool.begin().await?;

        let id = self.user_repo.create_identity(&mut *tx, email, &hashed_password).await?;
        let row = self
            .user_repo
            .create_profile(&mut *tx, id, name, email, &permission_slugs(permissions))
            .await?;

        tx.commit().await?;

        User::try_from(row)
    }

    pub async fn change_password(&self, user_id: Uuid, current: &str, new_password: &str) -> Result<(), AppError> {
        let credentials = self
            .user_repo
            .find_credentials_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !verify_password(current, &credentials.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let hashed = hash_password(new_password).await?;
        self.user_repo.update_password(user_id, &hashed).await
    }

    /// Cria o primeiro operador (com todas as permissões) se ainda não houver nenhum.
    pub async fn bootstrap_admin(&self, name: &str, email: &str, password: &str) -> Result<Option<User>, AppError> {
        if self.user_repo.count_profiles().await? > 0 {
            return Ok(None);
        }
        let admin = self.provision_user(name, email, password, &Permission::ALL).await?;
        tracing::info!("👤 Operador inicial criado: {}", admin.email);
        Ok(Some(admin))
    }

    async fn load_user(&self, id: Uuid) -> Result<User, AppError> {
        let row = self.user_repo.find_profile(id).await?.ok_or(AppError::UserNotFound)?;
        User::try_from(row)
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        issue_token(&self.jwt_secret, user_id, self.token_ttl_days)
    }
}

pub fn issue_token(secret: &str, user_id: Uuid, ttl_days: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(ttl_days);

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Decodifica e valida assinatura e expiração, devolvendo o id do usuário.
pub fn decode_subject(secret: &str, token: &str) -> Result<Uuid, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims.sub)
        .map_err(|_| AppError::InvalidToken)
}
