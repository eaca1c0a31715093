// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, str::FromStr, time::Duration};

use crate::{
    db::{CatalogRepository, ClientRepository, OccupancyRepository, UserRepository},
    services::{
        auth::AuthService, catalog_service::CatalogService, client_service::ClientService,
        dashboard_service::DashboardService, occupancy_service::OccupancyService,
        reconciliation::FlexReplacementPolicy, user_service::UserService,
    },
};

// Operador criado no primeiro boot, se não houver nenhum
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

// Tudo que vem do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub cors_origins: Vec<String>,
    pub max_connections: u32,
    pub jwt_expiration_days: i64,
    pub allow_seed: bool,
    pub flex_policy: FlexReplacementPolicy,
    pub admin: Option<AdminBootstrap>,
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválido ('{}'): {}", name, raw, e)),
        _ => Ok(default),
    }
}

fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_or(name, env::var(name).ok(), default)
}

// "a, b" -> ["a", "b"]
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminBootstrap {
                name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000".to_string())?,
            cors_origins: parse_origins(&var_or("CORS_ORIGINS", "http://localhost:5173".to_string())?),
            max_connections: var_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_expiration_days: var_or("JWT_EXPIRATION_DAYS", 7)?,
            allow_seed: var_or("ALLOW_SEED", false)?,
            flex_policy: var_or("FLEX_REPLACEMENT_POLICY", FlexReplacementPolicy::default())?,
            admin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub client_service: ClientService,
    pub catalog_service: CatalogService,
    pub occupancy_service: OccupancyService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let occupancy_repo = OccupancyRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_days,
            db_pool.clone(),
        );
        let user_service = UserService::new(user_repo, auth_service.clone());
        let client_service = ClientService::new(client_repo.clone(), occupancy_repo.clone(), db_pool.clone());
        let catalog_service = CatalogService::new(catalog_repo, db_pool.clone());
        let occupancy_service = OccupancyService::new(
            occupancy_repo.clone(),
            db_pool.clone(),
            config.flex_policy,
            config.allow_seed,
        );
        let dashboard_service = DashboardService::new(occupancy_repo, client_repo);

        Self {
            db_pool,
            config,
            auth_service,
            user_service,
            client_service,
            catalog_service,
            occupancy_service,
            dashboard_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_missing_values_fall_back_to_default() {
        assert_eq!(parse_or("DATABASE_MAX_CONNECTIONS", None, 5u32).unwrap(), 5);
        assert_eq!(parse_or("DATABASE_MAX_CONNECTIONS", Some("  ".into()), 5u32).unwrap(), 5);
        assert_eq!(parse_or("DATABASE_MAX_CONNECTIONS", Some(" 12 ".into()), 5u32).unwrap(), 12);
    }

    #[test]
    fn invalid_values_are_reported_with_the_variable_name() {
        let err = parse_or("ALLOW_SEED", Some("talvez".into()), false).unwrap_err();
        assert!(err.to_string().contains("ALLOW_SEED"));
    }

    #[test]
    fn flex_policy_is_read_from_its_slug() {
        let policy = parse_or("FLEX_REPLACEMENT_POLICY", Some("random".into()), FlexReplacementPolicy::default());
        assert_eq!(policy.unwrap(), FlexReplacementPolicy::Random);
        assert!(parse_or("FLEX_REPLACEMENT_POLICY", Some("sorteio".into()), FlexReplacementPolicy::default()).is_err());
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins("http://localhost:5173, https://painel.cowork.com.br,"),
            vec!["http://localhost:5173", "https://painel.cowork.com.br"]
        );
    }
}
