use dotenv::dotenv;
use moonlight_api::{
    AppConfig, AppState, PostgresRepository, RepositoryState,
    auth::hash_password,
    config::Env,
    create_router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from the .env file, if present.
    dotenv().ok();

    // 1. Configuration Loading
    let config = AppConfig::load();

    // 2. Logging Setup
    // Respect RUST_LOG when set, otherwise default to a sensible filter.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "moonlight_api=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            // Human-readable logs for local development.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // Structured JSON logs for ingestion by the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Configuration loaded for environment: {:?}", config.env);

    // 3. Database Connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let repo: RepositoryState = Arc::new(PostgresRepository::new(pool));

    // 4. Local Admin Seeding
    // A fresh local database gets a superadmin so the console is usable
    // immediately. Production admins are provisioned out of band.
    if config.env == Env::Local && repo.count_admins().await == 0 {
        match hash_password(&config.admin_password) {
            Ok(password_hash) => {
                match repo
                    .create_admin(config.admin_email.clone(), password_hash, "superadmin".into())
                    .await
                {
                    Some(admin) => {
                        tracing::info!("Seeded local admin account: {}", admin.email)
                    }
                    None => tracing::error!("Failed to seed local admin account"),
                }
            }
            Err(e) => tracing::error!("Failed to hash local admin password: {}", e),
        }
    }

    // 5. Application State and Router Assembly
    let state = AppState { repo, config };
    let app = create_router(state);

    // 6. Server Startup
    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("Server starting...");
    tracing::info!("Listening on {}", listener.local_addr().unwrap());
    tracing::info!("Swagger UI available at http://localhost:3000/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
