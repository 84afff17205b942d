use gamify_dash::config::AppConfig;
use gamify_dash::presentation::theme::{self, Theme};
use gamify_dash::AppState;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamify_dash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()?;
    theme::init(Theme::default());

    let listener = gamify_dash::bind_listener(&config).await?;
    let state = AppState::from_config(config)?;
    tracing::info!(
        addr = %listener.local_addr()?,
        provider = state.provider.name(),
        "Starting gamification dashboard"
    );

    let app = gamify_dash::routes::build_router(state);

    axum::serve(listener, app).await?;

    Ok(())
}
