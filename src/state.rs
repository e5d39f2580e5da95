use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::tasks::repo::{PgTaskStore, TaskStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self::from_parts(
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgTaskStore::new(db)),
            config,
        ))
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            tasks,
            config,
        }
    }
}
