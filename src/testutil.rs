//! In-memory store implementations backing the test suite. They honor the
//! same contracts as the Postgres stores, so handler and service tests run
//! without a database.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::{NewUser, User, UserStore};
use crate::config::{AppConfig, SessionConfig};
use crate::error::AppError;
use crate::state::AppState;
use crate::tasks::repo::{validate_description, Task, TaskStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    /// Test hook for the vanished-user path.
    pub fn remove(&self, id: Uuid) {
        self.users.write().unwrap().retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn add(&self, owner_id: Uuid, description: &str) -> Result<Task, AppError> {
        let description = validate_description(description)?;
        let task = Task {
            id: Uuid::new_v4(),
            owner_id,
            description: description.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.tasks.write().unwrap().push(task.clone());
        Ok(task)
    }

    // Vec order is insertion order, matching the SQL ordering contract.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

pub fn config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: "postgres://unused".into(),
        session: SessionConfig {
            cookie_name: "todo_session".into(),
            secure: false,
            ttl_minutes: 60,
        },
    })
}

pub fn state() -> AppState {
    AppState::from_parts(
        Arc::new(MemoryUserStore::default()),
        Arc::new(MemoryTaskStore::default()),
        config(),
    )
}

pub fn app() -> axum::Router {
    crate::app::build_app(state())
}
