pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::memory::{InMemoryPlanRepository, InMemoryUserRepository};
pub use config::{PlanDefaults, PlannerConfig};
pub use crate::core::planner::PlanService;
pub use domain::model::{
    validate_assignment, ApprovalStatus, CompletedSession, ExperienceLevel, Frequency,
    NewWorkoutPlan, PlanId, PlanProgress, PlanQuery, PlanStats, SessionId, TrainingGoal,
    UpdateWorkoutPlan, User, UserId, UserRole, WorkoutPlan,
};
pub use domain::ports::{PlanRepository, UserRepository};
pub use utils::error::{PlanError, Result};
