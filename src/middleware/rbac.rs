// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::users::{Permission, User},
};

/// O que uma rota exige: basta ter uma das permissões aceitas.
pub trait PermissionDef: Send + Sync + 'static {
    fn accepted() -> &'static [Permission];
}

/// Guardião de rota. Usa o operador já carregado pelo `auth_guard`,
/// então não consulta o banco.
pub struct RequirePermission<T>(pub PhantomData<T>);

pub fn check_permission<T: PermissionDef>(user: &User) -> Result<(), AppError> {
    let accepted = T::accepted();
    if accepted.iter().any(|p| user.has_permission(*p)) {
        return Ok(());
    }
    let slugs: Vec<&str> = accepted.iter().map(|p| p.as_str()).collect();
    Err(AppError::Forbidden(slugs.join("' ou '")))
}

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        check_permission::<T>(&user).map_err(|e| e.to_api_error(&locale))?;
        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermDashboard;
impl PermissionDef for PermDashboard {
    fn accepted() -> &'static [Permission] { &[Permission::Dashboard] }
}

pub struct PermUsers;
impl PermissionDef for PermUsers {
    fn accepted() -> &'static [Permission] { &[Permission::Users] }
}

pub struct PermClients;
impl PermissionDef for PermClients {
    fn accepted() -> &'static [Permission] { &[Permission::Clients] }
}

// Leitura do catálogo serve tanto a tela de planos quanto a de serviços
pub struct PermCatalogRead;
impl PermissionDef for PermCatalogRead {
    fn accepted() -> &'static [Permission] { &[Permission::Plans, Permission::Services] }
}

pub struct PermServices;
impl PermissionDef for PermServices {
    fn accepted() -> &'static [Permission] { &[Permission::Services] }
}

pub struct PermOccupancy;
impl PermissionDef for PermOccupancy {
    fn accepted() -> &'static [Permission] { &[Permission::Occupancy] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with(permissions: Vec<Permission>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Operador".into(),
            email: "op@cowork.com.br".into(),
            permissions,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn catalog_read_accepts_plans_or_services() {
        assert!(check_permission::<PermCatalogRead>(&user_with(vec![Permission::Plans])).is_ok());
        assert!(check_permission::<PermCatalogRead>(&user_with(vec![Permission::Services])).is_ok());
        assert!(check_permission::<PermServices>(&user_with(vec![Permission::Plans])).is_err());
    }

    #[test]
    fn missing_permission_names_what_was_required() {
        let user = user_with(vec![Permission::Dashboard]);
        assert_matches!(
            check_permission::<PermOccupancy>(&user),
            Err(AppError::Forbidden(slug)) if slug == "occupancy"
        );
    }

    #[test]
    fn user_without_permissions_is_denied_everywhere() {
        let user = user_with(vec![]);
        assert!(check_permission::<PermDashboard>(&user).is_err());
        assert!(check_permission::<PermUsers>(&user).is_err());
        assert!(check_permission::<PermClients>(&user).is_err());
    }
}
