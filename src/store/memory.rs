use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::UserStore;
use crate::error::{AppError, Result};
use crate::users::model::User;

/// In-memory implementation of UserStore for tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(initial: Vec<User>) -> Self {
        let mut users = HashMap::new();
        for user in initial {
            users.insert(user.id, user);
        }
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<User> {
        let mut users = self
            .users
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;

        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        let users = self
            .users
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;
        Ok(users.len() as i64)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;

        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(AppError::DuplicateEmail);
        }
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(AppError::not_found("user not found")),
        }
    }

    async fn clear_note(&self, id: Uuid) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;
        match users.get_mut(&id) {
            Some(stored) => {
                stored.note = None;
                Ok(())
            }
            None => Err(AppError::not_found("user not found")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))?;
        match users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("user not found")),
        }
    }
}
