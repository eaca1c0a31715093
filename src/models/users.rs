// src/models/users.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// Áreas do painel que um operador pode acessar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Dashboard,
    Users,
    Clients,
    Plans,
    Services,
    Occupancy,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Permission::Dashboard,
        Permission::Users,
        Permission::Clients,
        Permission::Plans,
        Permission::Services,
        Permission::Occupancy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Dashboard => "dashboard",
            Permission::Users => "users",
            Permission::Clients => "clients",
            Permission::Plans => "plans",
            Permission::Services => "services",
            Permission::Occupancy => "occupancy",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AppError::UnknownPermission(s.to_string()))
    }
}

// Operador do painel, no formato usado pela aplicação
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[schema(example = "maria@cowork.com.br")]
    pub email: String,
    #[schema(example = json!(["dashboard", "occupancy"]))]
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

// Linha da tabela `profiles` (permissões guardadas como TEXT[])
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for User {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let permissions = row
            .permissions
            .iter()
            .map(|slug| slug.parse())
            .collect::<Result<Vec<Permission>, _>>()?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            permissions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
impl From<&User> for ProfileRow {
    fn from(user: &User) -> Self {
        ProfileRow {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            permissions: permission_slugs(&user.permissions),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Slugs sem repetição, na ordem em que aparecem.
pub fn permission_slugs(permissions: &[Permission]) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::with_capacity(permissions.len());
    for p in permissions {
        let slug = p.as_str().to_string();
        if !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria Souza")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@cowork.com.br")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[serde(default)]
    #[schema(example = json!(["dashboard", "clients"]))]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,

    pub permissions: Option<Vec<Permission>>,
}
