use std::sync::Arc;

use financas_auth::config::{environment::Config, init_db};
use financas_auth::services::jwt::JwtService;
use financas_auth::services::mailer::{LogMailer, Mailer, SmtpMailer};
use financas_auth::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "financas_auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url).await;
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Connected to MySQL");

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "SMTP mailer configured");
            Arc::new(SmtpMailer::new(smtp).expect("Failed to build SMTP mailer"))
        }
        None => {
            tracing::warn!("SMTP not configured, two-factor codes will not be delivered");
            Arc::new(LogMailer)
        }
    };

    let jwt = JwtService::new(config.jwt_secret);
    let state = AppState::mysql(db, jwt, mailer);

    let app = financas_auth::create_app(state, config.rate_limit_burst).await;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.unwrap();
}
