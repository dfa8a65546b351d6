use crate::domain::model::{PlanId, PlanQuery, User, UserId, WorkoutPlan};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Lookup into the externally-owned user store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn fetch_user(&self, id: UserId) -> Result<Option<User>>;
}

/// Document-store access for plans. Writes replace the whole document;
/// the store is responsible for durability and single-write atomicity.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn insert(&self, plan: &WorkoutPlan) -> Result<()>;
    async fn replace(&self, plan: &WorkoutPlan) -> Result<()>;
    async fn fetch(&self, id: PlanId) -> Result<Option<WorkoutPlan>>;
    async fn find(&self, query: &PlanQuery) -> Result<Vec<WorkoutPlan>>;
}
