// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::users::{permission_slugs, CreateUserPayload, UpdateUserPayload, User},
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    auth_service: AuthService,
}

impl UserService {
    pub fn new(repo: UserRepository, auth_service: AuthService) -> Self {
        Self { repo, auth_service }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo
            .list_profiles()
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        let row = self.repo.find_profile(id).await?.ok_or(AppError::UserNotFound)?;
        User::try_from(row)
    }

    pub async fn create_user(&self, input: &CreateUserPayload) -> Result<User, AppError> {
        let user = self
            .auth_service
            .provision_user(&input.name, &input.email, &input.password, &input.permissions)
            .await?;
        tracing::info!("👤 Operador {} criado", user.email);
        Ok(user)
    }

    pub async fn update_user(&self, id: Uuid, input: &UpdateUserPayload) -> Result<User, AppError> {
        let slugs = input.permissions.as_deref().map(permission_slugs);
        let row = self
            .repo
            .update_profile(id, input.name.as_deref(), slugs.as_deref())
            .await?
            .ok_or(AppError::UserNotFound)?;
        User::try_from(row)
    }

    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<User, AppError> {
        let row = self
            .repo
            .update_profile(id, Some(name), None)
            .await?
            .ok_or(AppError::UserNotFound)?;
        User::try_from(row)
    }

    /// Um operador não pode apagar a si mesmo.
    pub async fn delete_user(&self, acting_user: Uuid, id: Uuid) -> Result<(), AppError> {
        if acting_user == id {
            return Err(AppError::ResourceInUse("Usuário logado".into()));
        }
        if !self.repo.delete_identity(id).await? {
            return Err(AppError::UserNotFound);
        }
        tracing::info!("🗑️ Operador {} removido", id);
        Ok(())
    }
}
