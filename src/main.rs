// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use coworking_backend::{
    config::{AppState, Config},
    routes,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // RUST_LOG controla o nível; sem ele, info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // .expect() é aceitável aqui: sem configuração a aplicação não deve iniciar.
    let config = Config::from_env().expect("Configuração inválida");
    let bind_addr = config.bind_addr.clone();
    let admin = config.admin.clone();

    let app_state = AppState::new(config)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    match admin {
        Some(admin) => {
            if let Err(e) = app_state
                .auth_service
                .bootstrap_admin(&admin.name, &admin.email, &admin.password)
                .await
            {
                tracing::error!("🔥 Falha ao criar o operador inicial: {:?}", e);
            }
        }
        None => tracing::debug!("ADMIN_EMAIL/ADMIN_PASSWORD ausentes, sem operador inicial"),
    }

    if app_state.config.allow_seed {
        tracing::warn!("⚠️ ALLOW_SEED ativo: POST /api/occupancy/seed apaga salas e estações");
    }

    let app = routes::app(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", bind_addr);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
