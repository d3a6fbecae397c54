//src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use backoffice::{
    config::{connect_store, AppState, Settings},
    router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env().context("Falha ao carregar a configuração")?;
    let store = connect_store(&settings).await?;
    let app_state = AppState::new(settings, store).context("Falha ao inicializar o estado da aplicação")?;

    if let Some((email, password)) = &app_state.settings.super_admin {
        app_state
            .auth_service
            .ensure_super_admin(email, password)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao garantir a conta super_admin: {}", e))?;
    }

    let app = router::app(app_state.clone());

    // Inicia o servidor
    let listener = TcpListener::bind(app_state.settings.bind_addr)
        .await
        .context("Falha ao iniciar o listener TCP")?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
