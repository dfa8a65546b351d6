use crate::utils::error::{PlanError, Result};
use crate::utils::validation::{
    validate_max_length, validate_min, validate_non_empty_string, validate_range,
    validate_required_field, Validate,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

pub type UserId = Uuid;
pub type PlanId = Uuid;
pub type SessionId = Uuid;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_NOTES_CHARS: usize = 1000;
pub const MIN_TOTAL_WEEKS: u32 = 1;
pub const MAX_TOTAL_WEEKS: u32 = 52;

/// Weekly session count target.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Frequency {
    #[default]
    #[serde(rename = "3x")]
    ThreePerWeek,
    #[serde(rename = "4x")]
    FourPerWeek,
    #[serde(rename = "5x")]
    FivePerWeek,
}

impl Frequency {
    /// Cap on the number of session references a plan may hold.
    pub fn max_sessions(&self) -> usize {
        match self {
            Frequency::ThreePerWeek => 3,
            Frequency::FourPerWeek => 4,
            Frequency::FivePerWeek => 5,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::ThreePerWeek => "3x",
            Frequency::FourPerWeek => "4x",
            Frequency::FivePerWeek => "5x",
        };
        write!(f, "{}", label)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
    WeightLoss,
    MuscleGain,
    Strength,
    Endurance,
    Flexibility,
    GeneralFitness,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Trainer,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Account record owned by the user service. Read-only on this side;
/// only the fields the assignment rules look at are modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
    pub approval: ApprovalStatus,
    pub assigned_trainer: Option<UserId>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub session: SessionId,
    pub completed_at: DateTime<Utc>,
    pub week: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanProgress {
    pub total_sessions_completed: u32,
    pub total_sessions_planned: u32,
    pub completion_rate: u8,
    pub last_completed_session: Option<CompletedSession>,
}

/// A scheduled set of workout sessions assigned to a client by a trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: PlanId,
    pub client: UserId,
    pub trainer: UserId,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current_week: u32,
    pub total_weeks: u32,
    pub goals: BTreeSet<TrainingGoal>,
    pub level: ExperienceLevel,
    pub is_template: bool,
    pub template_name: Option<String>,
    pub is_active: bool,
    pub sessions: Vec<SessionId>,
    pub progress: PlanProgress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutPlan {
    /// Percentage of planned sessions actually completed, rounded to the
    /// nearest integer and capped at 100. Zero when nothing is planned.
    pub fn completion_rate(&self) -> u8 {
        let planned = self.progress.total_sessions_planned;
        if planned == 0 {
            return 0;
        }
        let completed = self.progress.total_sessions_completed;
        let rate = (completed as f64 / planned as f64 * 100.0).round() as u32;
        rate.min(100) as u8
    }

    /// Recomputes the planned total from the schedule and refreshes the
    /// stored completion rate. Runs on every write.
    pub fn recalculate_progress(&mut self) {
        self.progress.total_sessions_planned = self.sessions.len() as u32 * self.total_weeks;
        self.progress.completion_rate = self.completion_rate();
    }

    pub fn record_completed_session(
        &mut self,
        session: SessionId,
        week: u32,
        completed_at: DateTime<Utc>,
    ) {
        self.progress.total_sessions_completed += 1;
        self.progress.last_completed_session = Some(CompletedSession {
            session,
            completed_at,
            week,
        });
        self.recalculate_progress();
    }

    pub fn check_capacity(&self) -> Result<()> {
        let max = self.frequency.max_sessions();
        if self.sessions.len() > max {
            return Err(PlanError::CapacityError {
                count: self.sessions.len(),
                max,
                frequency: self.frequency,
            });
        }
        Ok(())
    }

    pub fn stats(&self) -> PlanStats {
        PlanStats {
            plan: self.id,
            client: self.client,
            trainer: self.trainer,
            frequency: self.frequency,
            start_date: self.start_date,
            end_date: self.end_date,
            current_week: self.current_week,
            total_weeks: self.total_weeks,
            is_active: self.is_active,
            total_sessions_completed: self.progress.total_sessions_completed,
            total_sessions_planned: self.progress.total_sessions_planned,
            completion_rate: self.progress.completion_rate,
            last_completed_session: self.progress.last_completed_session.clone(),
        }
    }
}

impl Validate for WorkoutPlan {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_max_length("name", &self.name, MAX_NAME_CHARS)?;

        if let Some(description) = &self.description {
            validate_max_length("description", description, MAX_DESCRIPTION_CHARS)?;
        }
        if let Some(notes) = &self.notes {
            validate_max_length("notes", notes, MAX_NOTES_CHARS)?;
        }

        validate_min("current_week", self.current_week, 1)?;
        validate_range("total_weeks", self.total_weeks, MIN_TOTAL_WEEKS, MAX_TOTAL_WEEKS)?;

        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(PlanError::ValidationError {
                    field: "end_date".to_string(),
                    value: end_date.to_string(),
                    reason: "End date cannot be before the start date".to_string(),
                });
            }
        }

        if self.is_template {
            let template_name = validate_required_field("template_name", &self.template_name)?;
            validate_non_empty_string("template_name", template_name)?;
            validate_max_length("template_name", template_name, MAX_NAME_CHARS)?;
        }

        Ok(())
    }
}

/// Read-only projection of the progress and scheduling fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStats {
    pub plan: PlanId,
    pub client: UserId,
    pub trainer: UserId,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current_week: u32,
    pub total_weeks: u32,
    pub is_active: bool,
    pub total_sessions_completed: u32,
    pub total_sessions_planned: u32,
    pub completion_rate: u8,
    pub last_completed_session: Option<CompletedSession>,
}

/// Payload for creating a plan. Fields left at `None` fall back to the
/// configured defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkoutPlan {
    pub client: UserId,
    pub trainer: UserId,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub frequency: Option<Frequency>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_weeks: Option<u32>,
    #[serde(default)]
    pub goals: BTreeSet<TrainingGoal>,
    pub level: Option<ExperienceLevel>,
    #[serde(default)]
    pub is_template: bool,
    pub template_name: Option<String>,
    #[serde(default)]
    pub sessions: Vec<SessionId>,
}

/// Partial update applied over the stored document. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkoutPlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub current_week: Option<u32>,
    pub total_weeks: Option<u32>,
    pub goals: Option<BTreeSet<TrainingGoal>>,
    pub level: Option<ExperienceLevel>,
    pub is_template: Option<bool>,
    pub template_name: Option<String>,
    pub is_active: Option<bool>,
    pub sessions: Option<Vec<SessionId>>,
}

impl UpdateWorkoutPlan {
    pub fn apply(self, plan: &mut WorkoutPlan) {
        if let Some(name) = self.name {
            plan.name = name;
        }
        if let Some(description) = self.description {
            plan.description = Some(description);
        }
        if let Some(notes) = self.notes {
            plan.notes = Some(notes);
        }
        if let Some(frequency) = self.frequency {
            plan.frequency = frequency;
        }
        if let Some(start_date) = self.start_date {
            plan.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            plan.end_date = Some(end_date);
        }
        if let Some(current_week) = self.current_week {
            plan.current_week = current_week;
        }
        if let Some(total_weeks) = self.total_weeks {
            plan.total_weeks = total_weeks;
        }
        if let Some(goals) = self.goals {
            plan.goals = goals;
        }
        if let Some(level) = self.level {
            plan.level = level;
        }
        if let Some(is_template) = self.is_template {
            plan.is_template = is_template;
        }
        if let Some(template_name) = self.template_name {
            plan.template_name = Some(template_name);
        }
        if let Some(is_active) = self.is_active {
            plan.is_active = is_active;
        }
        if let Some(sessions) = self.sessions {
            plan.sessions = sessions;
        }
    }
}

/// Filter over the indexed plan fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanQuery {
    pub client: Option<UserId>,
    pub trainer: Option<UserId>,
    pub is_active: Option<bool>,
    pub is_template: Option<bool>,
    pub frequency: Option<Frequency>,
    pub level: Option<ExperienceLevel>,
    pub goal: Option<TrainingGoal>,
    pub starts_after: Option<NaiveDate>,
    pub starts_before: Option<NaiveDate>,
}

impl PlanQuery {
    pub fn matches(&self, plan: &WorkoutPlan) -> bool {
        if let Some(client) = self.client {
            if plan.client != client {
                return false;
            }
        }
        if let Some(trainer) = self.trainer {
            if plan.trainer != trainer {
                return false;
            }
        }
        if let Some(is_active) = self.is_active {
            if plan.is_active != is_active {
                return false;
            }
        }
        if let Some(is_template) = self.is_template {
            if plan.is_template != is_template {
                return false;
            }
        }
        if let Some(frequency) = self.frequency {
            if plan.frequency != frequency {
                return false;
            }
        }
        if let Some(level) = self.level {
            if plan.level != level {
                return false;
            }
        }
        if let Some(goal) = self.goal {
            if !plan.goals.contains(&goal) {
                return false;
            }
        }
        if let Some(starts_after) = self.starts_after {
            if plan.start_date < starts_after {
                return false;
            }
        }
        if let Some(starts_before) = self.starts_before {
            if plan.start_date > starts_before {
                return false;
            }
        }
        true
    }
}

/// Trainer/client consistency rules checked once, at plan creation.
/// Takes both resolved accounts so the caller decides where they come from.
pub fn validate_assignment(trainer: &User, client: &User) -> Result<()> {
    if trainer.role != UserRole::Trainer {
        return Err(PlanError::ReferenceError {
            reason: format!("User {} does not have the trainer role", trainer.id),
        });
    }
    if trainer.approval != ApprovalStatus::Approved {
        return Err(PlanError::ReferenceError {
            reason: format!("Trainer {} is not approved", trainer.id),
        });
    }
    if client.role != UserRole::Client {
        return Err(PlanError::ReferenceError {
            reason: format!("User {} does not have the client role", client.id),
        });
    }
    match client.assigned_trainer {
        Some(assigned) if assigned == trainer.id => Ok(()),
        Some(assigned) => Err(PlanError::ReferenceError {
            reason: format!(
                "Client {} is assigned to trainer {}, not {}",
                client.id, assigned, trainer.id
            ),
        }),
        None => Err(PlanError::ReferenceError {
            reason: format!("Client {} has no assigned trainer", client.id),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> WorkoutPlan {
        let now = Utc::now();
        WorkoutPlan {
            id: Uuid::new_v4(),
            client: Uuid::new_v4(),
            trainer: Uuid::new_v4(),
            name: "Hypertrophy block".to_string(),
            description: None,
            notes: None,
            frequency: Frequency::ThreePerWeek,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            end_date: None,
            current_week: 1,
            total_weeks: 4,
            goals: BTreeSet::new(),
            level: ExperienceLevel::Beginner,
            is_template: false,
            template_name: None,
            is_active: true,
            sessions: vec![Uuid::new_v4(), Uuid::new_v4()],
            progress: PlanProgress::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_frequency_caps() {
        assert_eq!(Frequency::ThreePerWeek.max_sessions(), 3);
        assert_eq!(Frequency::FourPerWeek.max_sessions(), 4);
        assert_eq!(Frequency::FivePerWeek.max_sessions(), 5);
    }

    #[test]
    fn test_frequency_serde_spelling() {
        assert_eq!(
            serde_json::to_string(&Frequency::ThreePerWeek).unwrap(),
            "\"3x\""
        );
        let parsed: Frequency = serde_json::from_str("\"5x\"").unwrap();
        assert_eq!(parsed, Frequency::FivePerWeek);
    }

    #[test]
    fn test_goal_and_level_serde_spelling() {
        assert_eq!(
            serde_json::to_string(&TrainingGoal::WeightLoss).unwrap(),
            "\"weight_loss\""
        );
        assert_eq!(
            serde_json::to_string(&ExperienceLevel::Intermediate).unwrap(),
            "\"intermediate\""
        );
    }

    #[test]
    fn test_completion_rate_zero_when_nothing_planned() {
        let mut plan = sample_plan();
        plan.sessions.clear();
        plan.recalculate_progress();
        assert_eq!(plan.progress.total_sessions_planned, 0);
        assert_eq!(plan.progress.completion_rate, 0);
    }

    #[test]
    fn test_completion_rate_rounds_to_nearest() {
        let mut plan = sample_plan();
        plan.total_weeks = 4;
        plan.sessions = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        plan.recalculate_progress();
        assert_eq!(plan.progress.total_sessions_planned, 12);

        plan.progress.total_sessions_completed = 1;
        // 1/12 = 8.33% -> 8
        assert_eq!(plan.completion_rate(), 8);
        plan.progress.total_sessions_completed = 5;
        // 5/12 = 41.67% -> 42
        assert_eq!(plan.completion_rate(), 42);
    }

    #[test]
    fn test_completion_rate_caps_at_hundred() {
        let mut plan = sample_plan();
        plan.recalculate_progress();
        plan.progress.total_sessions_completed = plan.progress.total_sessions_planned * 3;
        assert_eq!(plan.completion_rate(), 100);
    }

    #[test]
    fn test_planned_total_follows_schedule_and_weeks() {
        let mut plan = sample_plan();
        plan.total_weeks = 6;
        plan.sessions = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        plan.recalculate_progress();
        assert_eq!(plan.progress.total_sessions_planned, 18);
    }

    #[test]
    fn test_record_completed_session() {
        let mut plan = sample_plan();
        plan.recalculate_progress();
        let session = Uuid::new_v4();
        let stamp = Utc::now();

        plan.record_completed_session(session, 2, stamp);

        assert_eq!(plan.progress.total_sessions_completed, 1);
        let last = plan.progress.last_completed_session.as_ref().unwrap();
        assert_eq!(last.session, session);
        assert_eq!(last.week, 2);
        assert_eq!(last.completed_at, stamp);
    }

    #[test]
    fn test_check_capacity() {
        let mut plan = sample_plan();
        plan.sessions = (0..3).map(|_| Uuid::new_v4()).collect();
        assert!(plan.check_capacity().is_ok());

        plan.sessions.push(Uuid::new_v4());
        match plan.check_capacity() {
            Err(PlanError::CapacityError { count, max, .. }) => {
                assert_eq!(count, 4);
                assert_eq!(max, 3);
            }
            other => panic!("expected CapacityError, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_bound_fields() {
        let mut plan = sample_plan();
        plan.name = "x".repeat(101);
        assert!(plan.validate().is_err());

        let mut plan = sample_plan();
        plan.name = "  ".to_string();
        assert!(plan.validate().is_err());

        let mut plan = sample_plan();
        plan.description = Some("d".repeat(501));
        assert!(plan.validate().is_err());

        let mut plan = sample_plan();
        plan.notes = Some("n".repeat(1001));
        assert!(plan.validate().is_err());

        let mut plan = sample_plan();
        plan.total_weeks = 53;
        assert!(plan.validate().is_err());

        let mut plan = sample_plan();
        plan.current_week = 0;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_validate_template_requires_name() {
        let mut plan = sample_plan();
        plan.is_template = true;
        plan.template_name = None;
        assert!(plan.validate().is_err());

        plan.template_name = Some("Beginner strength".to_string());
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let mut plan = sample_plan();
        plan.end_date = Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(plan.validate().is_err());
    }

    fn approved_trainer() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Coach".to_string(),
            role: UserRole::Trainer,
            approval: ApprovalStatus::Approved,
            assigned_trainer: None,
            is_active: true,
        }
    }

    fn client_of(trainer: &User) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Athlete".to_string(),
            role: UserRole::Client,
            approval: ApprovalStatus::Approved,
            assigned_trainer: Some(trainer.id),
            is_active: true,
        }
    }

    #[test]
    fn test_validate_assignment_accepts_matching_pair() {
        let trainer = approved_trainer();
        let client = client_of(&trainer);
        assert!(validate_assignment(&trainer, &client).is_ok());
    }

    #[test]
    fn test_validate_assignment_rejects_unapproved_trainer() {
        let mut trainer = approved_trainer();
        trainer.approval = ApprovalStatus::Pending;
        let client = client_of(&trainer);
        assert!(matches!(
            validate_assignment(&trainer, &client),
            Err(PlanError::ReferenceError { .. })
        ));
    }

    #[test]
    fn test_validate_assignment_rejects_wrong_roles() {
        let trainer = approved_trainer();
        let mut not_a_client = client_of(&trainer);
        not_a_client.role = UserRole::Admin;
        assert!(validate_assignment(&trainer, &not_a_client).is_err());

        let mut not_a_trainer = approved_trainer();
        not_a_trainer.role = UserRole::Client;
        let client = client_of(&not_a_trainer);
        assert!(validate_assignment(&not_a_trainer, &client).is_err());
    }

    #[test]
    fn test_validate_assignment_rejects_mismatched_trainer() {
        let trainer = approved_trainer();
        let other_trainer = approved_trainer();
        let client = client_of(&other_trainer);
        assert!(matches!(
            validate_assignment(&trainer, &client),
            Err(PlanError::ReferenceError { .. })
        ));
    }

    #[test]
    fn test_update_apply_merges_only_set_fields() {
        let mut plan = sample_plan();
        let original_name = plan.name.clone();
        let update = UpdateWorkoutPlan {
            total_weeks: Some(8),
            notes: Some("Deload on week 4".to_string()),
            ..Default::default()
        };

        update.apply(&mut plan);

        assert_eq!(plan.name, original_name);
        assert_eq!(plan.total_weeks, 8);
        assert_eq!(plan.notes.as_deref(), Some("Deload on week 4"));
    }

    #[test]
    fn test_plan_query_matches() {
        let plan = sample_plan();

        let mut query = PlanQuery::default();
        assert!(query.matches(&plan));

        query.client = Some(plan.client);
        query.is_active = Some(true);
        query.frequency = Some(Frequency::ThreePerWeek);
        assert!(query.matches(&plan));

        query.frequency = Some(Frequency::FivePerWeek);
        assert!(!query.matches(&plan));

        let mut goal_query = PlanQuery {
            goal: Some(TrainingGoal::Strength),
            ..Default::default()
        };
        assert!(!goal_query.matches(&plan));
        goal_query.goal = None;
        goal_query.starts_after = Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert!(!goal_query.matches(&plan));
    }
}
