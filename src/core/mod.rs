pub mod planner;

pub use crate::domain::model::{PlanQuery, PlanStats, User, WorkoutPlan};
pub use crate::domain::ports::{PlanRepository, UserRepository};
pub use crate::utils::error::Result;
