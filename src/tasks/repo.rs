use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, FieldError};

/// A to-do item. Owned by exactly one user; never shared, mutated or
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub description: String,
    pub created_at: OffsetDateTime,
}

/// Persistence contract for tasks. Every read is scoped to an owner; there
/// is no operation that can cross user boundaries.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn add(&self, owner_id: Uuid, description: &str) -> Result<Task, AppError>;
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError>;
}

pub(crate) fn validate_description(description: &str) -> Result<&str, AppError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "description",
            "description must not be empty",
        )]));
    }
    Ok(description)
}

pub struct PgTaskStore {
    db: PgPool,
}

impl PgTaskStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn add(&self, owner_id: Uuid, description: &str) -> Result<Task, AppError> {
        let description = validate_description(description)?;
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, description)
            VALUES ($1, $2)
            RETURNING id, owner_id, description, created_at
            "#,
        )
        .bind(owner_id)
        .bind(description)
        .fetch_one(&self.db)
        .await?;
        Ok(task)
    }

    /// Tasks for one owner in insertion order. The id tiebreak keeps the
    /// order deterministic when timestamps collide.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, description, created_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at ASC, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemoryTaskStore;

    #[tokio::test]
    async fn empty_description_is_rejected() {
        let store = MemoryTaskStore::default();
        for description in ["", "   ", "\t\n"] {
            let err = store.add(Uuid::new_v4(), description).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn added_task_appears_in_owner_listing() {
        let store = MemoryTaskStore::default();
        let owner = Uuid::new_v4();

        let task = store.add(owner, "buy milk").await.expect("add");
        let tasks = store.list_for_owner(owner).await.expect("list");

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, task.id);
        assert_eq!(tasks[0].description, "buy milk");
    }

    #[tokio::test]
    async fn listing_never_leaks_other_owners_tasks() {
        let store = MemoryTaskStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        // Interleave writes from both owners.
        store.add(alice, "a-1").await.expect("add");
        store.add(bob, "b-1").await.expect("add");
        store.add(alice, "a-2").await.expect("add");
        store.add(bob, "b-2").await.expect("add");
        store.add(alice, "a-3").await.expect("add");

        let tasks = store.list_for_owner(alice).await.expect("list");
        assert!(tasks.iter().all(|t| t.owner_id == alice));
        let descriptions: Vec<_> = tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["a-1", "a-2", "a-3"]);
    }

    #[tokio::test]
    async fn description_is_trimmed_before_storage() {
        let store = MemoryTaskStore::default();
        let owner = Uuid::new_v4();
        let task = store.add(owner, "  write report  ").await.expect("add");
        assert_eq!(task.description, "write report");
    }
}
