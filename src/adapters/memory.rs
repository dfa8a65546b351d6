use crate::domain::model::{PlanId, PlanQuery, User, UserId, WorkoutPlan};
use crate::domain::ports::{PlanRepository, UserRepository};
use crate::utils::error::{PlanError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory plan store keeping whole JSON documents, the same shape the
/// production document database holds. Writes are last-writer-wins.
#[derive(Default)]
pub struct InMemoryPlanRepository {
    documents: RwLock<HashMap<PlanId, serde_json::Value>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn insert(&self, plan: &WorkoutPlan) -> Result<()> {
        let document = serde_json::to_value(plan)?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(&plan.id) {
            return Err(PlanError::StorageError {
                message: format!("Duplicate plan id {}", plan.id),
            });
        }
        documents.insert(plan.id, document);
        Ok(())
    }

    async fn replace(&self, plan: &WorkoutPlan) -> Result<()> {
        let document = serde_json::to_value(plan)?;
        let mut documents = self.documents.write().await;
        match documents.get_mut(&plan.id) {
            Some(slot) => {
                *slot = document;
                Ok(())
            }
            None => Err(PlanError::StorageError {
                message: format!("Plan {} does not exist", plan.id),
            }),
        }
    }

    async fn fetch(&self, id: PlanId) -> Result<Option<WorkoutPlan>> {
        let documents = self.documents.read().await;
        match documents.get(&id) {
            Some(document) => {
                let plan: WorkoutPlan = serde_json::from_value(document.clone())?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    async fn find(&self, query: &PlanQuery) -> Result<Vec<WorkoutPlan>> {
        let documents = self.documents.read().await;
        let mut plans = Vec::new();
        for document in documents.values() {
            let plan: WorkoutPlan = serde_json::from_value(document.clone())?;
            if query.matches(&plan) {
                plans.push(plan);
            }
        }
        // HashMap iteration order is arbitrary; keep results stable.
        plans.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(plans)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let map = users.into_iter().map(|user| (user.id, user)).collect();
        Self {
            users: RwLock::new(map),
        }
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn fetch_user(&self, id: UserId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }
}
