use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::users::model::User;

pub mod memory;
pub mod postgres;

/// Storage interface for user records, scoped to a single collection.
///
/// Both implementations enforce email uniqueness on write, so the
/// handler-level pre-check is a fast path for a friendly error rather than
/// the actual guarantee.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn insert(&self, user: User) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Records sorted by created_at descending, skipping `skip` and
    /// returning at most `limit`.
    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<User>>;

    /// Total number of records, unfiltered.
    async fn count(&self) -> Result<i64>;

    /// Writes every mutable field of `user` over the stored record with the
    /// same id.
    async fn update(&self, user: &User) -> Result<()>;

    /// Removes the note field as a standalone write. Fails with NotFound
    /// when no record has the id.
    async fn clear_note(&self, id: Uuid) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
