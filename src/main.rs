use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_notebook::db::LogOnError;
use vocab_notebook::{config, db, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vocab_notebook=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  {
    let conn = pool.lock().expect("Database lock failed during startup");
    let due = db::get_due_count(&conn, chrono::Utc::now().date_naive())
      .log_warn_default("Failed to count due words");
    tracing::info!("{} words due today", due);
  }

  let app = handlers::router(AppState::new(pool));

  let port = config::load_server_port();
  let bind_addr = config::server_bind_addr(port);
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
