use crate::config::PlanDefaults;
use crate::core::{PlanRepository, UserRepository};
use crate::domain::model::{
    validate_assignment, NewWorkoutPlan, PlanId, PlanProgress, PlanQuery, PlanStats, SessionId,
    UpdateWorkoutPlan, User, UserId, WorkoutPlan,
};
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::Validate;
use chrono::Utc;
use uuid::Uuid;

/// Persistence-boundary orchestrator for plan writes: validates the
/// record, runs the creation-time assignment rules, recomputes derived
/// progress fields, then hands the document to the repository.
pub struct PlanService<P: PlanRepository, U: UserRepository> {
    plans: P,
    users: U,
    defaults: PlanDefaults,
}

impl<P: PlanRepository, U: UserRepository> PlanService<P, U> {
    pub fn new(plans: P, users: U) -> Self {
        Self::with_defaults(plans, users, PlanDefaults::default())
    }

    pub fn with_defaults(plans: P, users: U, defaults: PlanDefaults) -> Self {
        Self {
            plans,
            users,
            defaults,
        }
    }

    pub async fn create_plan(&self, new_plan: NewWorkoutPlan) -> Result<WorkoutPlan> {
        let now = Utc::now();
        let mut plan = WorkoutPlan {
            id: Uuid::new_v4(),
            client: new_plan.client,
            trainer: new_plan.trainer,
            name: new_plan.name,
            description: new_plan.description,
            notes: new_plan.notes,
            frequency: new_plan.frequency.unwrap_or(self.defaults.frequency),
            start_date: new_plan.start_date,
            end_date: new_plan.end_date,
            current_week: 1,
            total_weeks: new_plan.total_weeks.unwrap_or(self.defaults.total_weeks),
            goals: new_plan.goals,
            level: new_plan.level.unwrap_or(self.defaults.level),
            is_template: new_plan.is_template,
            template_name: new_plan.template_name,
            is_active: true,
            sessions: new_plan.sessions,
            progress: PlanProgress::default(),
            created_at: now,
            updated_at: now,
        };

        plan.validate()?;
        plan.check_capacity()?;

        // Assignment rules run once, at creation.
        let trainer = self.require_reference(plan.trainer, "trainer").await?;
        let client = self.require_reference(plan.client, "client").await?;
        validate_assignment(&trainer, &client)?;

        plan.recalculate_progress();
        self.plans.insert(&plan).await?;

        tracing::info!(
            "✅ Created plan '{}' for client {} ({} sessions/week, {} weeks)",
            plan.name,
            plan.client,
            plan.frequency,
            plan.total_weeks
        );
        Ok(plan)
    }

    pub async fn update_plan(&self, id: PlanId, update: UpdateWorkoutPlan) -> Result<WorkoutPlan> {
        let mut plan = self.require_plan(id).await?;

        update.apply(&mut plan);
        plan.validate()?;
        plan.check_capacity()?;
        plan.recalculate_progress();
        plan.updated_at = Utc::now();

        self.plans.replace(&plan).await?;
        tracing::debug!("Updated plan {}", plan.id);
        Ok(plan)
    }

    /// Stamps one completed session and persists the refreshed progress
    /// block. Storage failures propagate to the caller.
    pub async fn mark_session_completed(
        &self,
        id: PlanId,
        session: SessionId,
        week: u32,
    ) -> Result<WorkoutPlan> {
        let mut plan = self.require_plan(id).await?;

        let now = Utc::now();
        plan.record_completed_session(session, week, now);
        plan.updated_at = now;

        self.plans.replace(&plan).await?;
        tracing::info!(
            "Session {} completed on plan {} (week {}, {}% done)",
            session,
            plan.id,
            week,
            plan.progress.completion_rate
        );
        Ok(plan)
    }

    pub async fn get_plan(&self, id: PlanId) -> Result<WorkoutPlan> {
        self.require_plan(id).await
    }

    pub async fn get_stats(&self, id: PlanId) -> Result<PlanStats> {
        let plan = self.require_plan(id).await?;
        Ok(plan.stats())
    }

    pub async fn find_plans(&self, query: &PlanQuery) -> Result<Vec<WorkoutPlan>> {
        self.plans.find(query).await
    }

    /// Soft-deactivation; the document stays queryable with
    /// `is_active = false`.
    pub async fn deactivate_plan(&self, id: PlanId) -> Result<WorkoutPlan> {
        let mut plan = self.require_plan(id).await?;
        plan.is_active = false;
        plan.updated_at = Utc::now();

        self.plans.replace(&plan).await?;
        tracing::info!("Deactivated plan {}", plan.id);
        Ok(plan)
    }

    async fn require_plan(&self, id: PlanId) -> Result<WorkoutPlan> {
        self.plans
            .fetch(id)
            .await?
            .ok_or(PlanError::NotFound { entity: "Plan", id })
    }

    async fn require_reference(&self, id: UserId, role_label: &str) -> Result<User> {
        match self.users.fetch_user(id).await? {
            Some(user) => Ok(user),
            None => Err(PlanError::ReferenceError {
                reason: format!("Referenced {} {} does not exist", role_label, id),
            }),
        }
    }
}
