use chrono::NaiveDate;
use log::{debug, error};

use crate::{
    BodyMetric, BodyMetricRepository, BodyMetricService, CreateError, DeleteError, Goal,
    GoalActivity, GoalActivityID, GoalActivityRepository, GoalID, GoalRepository, GoalService,
    LedgerEntry, LedgerEntryID, LedgerRepository, LedgerService, ReadError, UpdateError, Workout,
    WorkoutID, WorkoutRepository, WorkoutService,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        log_on_error!(self.repository.read_workouts(), ReadError, "get", "workouts")
    }

    async fn create_workout(&self, workout: Workout) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository.create_workout(workout),
            CreateError,
            "create",
            "workout"
        )
    }

    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }
}

impl<R: GoalRepository + GoalActivityRepository> GoalService for Service<R> {
    async fn get_goals(&self) -> Result<Vec<Goal>, ReadError> {
        log_on_error!(self.repository.read_goals(), ReadError, "get", "goals")
    }

    async fn create_goal(&self, goal: Goal) -> Result<Goal, CreateError> {
        log_on_error!(
            self.repository.create_goal(goal),
            CreateError,
            "create",
            "goal"
        )
    }

    async fn replace_goal(&self, goal: Goal) -> Result<Goal, UpdateError> {
        log_on_error!(
            self.repository.replace_goal(goal),
            UpdateError,
            "replace",
            "goal"
        )
    }

    async fn delete_goal(&self, id: GoalID) -> Result<GoalID, DeleteError> {
        log_on_error!(
            self.repository.delete_goal(id),
            DeleteError,
            "delete",
            "goal"
        )
    }

    async fn get_goal_activities(&self) -> Result<Vec<GoalActivity>, ReadError> {
        log_on_error!(
            self.repository.read_goal_activities(),
            ReadError,
            "get",
            "goal activities"
        )
    }

    async fn create_goal_activity(
        &self,
        activity: GoalActivity,
    ) -> Result<GoalActivity, CreateError> {
        log_on_error!(
            self.repository.create_goal_activity(activity),
            CreateError,
            "create",
            "goal activity"
        )
    }

    async fn delete_goal_activity(
        &self,
        id: GoalActivityID,
    ) -> Result<GoalActivityID, DeleteError> {
        log_on_error!(
            self.repository.delete_goal_activity(id),
            DeleteError,
            "delete",
            "goal activity"
        )
    }
}

impl<R: BodyMetricRepository> BodyMetricService for Service<R> {
    async fn get_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError> {
        log_on_error!(
            self.repository.read_body_metrics(),
            ReadError,
            "get",
            "body metrics"
        )
    }

    async fn create_body_metric(
        &self,
        body_metric: BodyMetric,
    ) -> Result<BodyMetric, CreateError> {
        log_on_error!(
            self.repository.create_body_metric(body_metric),
            CreateError,
            "create",
            "body metric"
        )
    }

    async fn replace_body_metric(
        &self,
        body_metric: BodyMetric,
    ) -> Result<BodyMetric, UpdateError> {
        log_on_error!(
            self.repository.replace_body_metric(body_metric),
            UpdateError,
            "replace",
            "body metric"
        )
    }

    async fn delete_body_metric(&self, date: NaiveDate) -> Result<NaiveDate, DeleteError> {
        log_on_error!(
            self.repository.delete_body_metric(date),
            DeleteError,
            "delete",
            "body metric"
        )
    }
}

impl<R: LedgerRepository> LedgerService for Service<R> {
    async fn get_ledger_entries(&self) -> Result<Vec<LedgerEntry>, ReadError> {
        log_on_error!(
            self.repository.read_ledger_entries(),
            ReadError,
            "get",
            "ledger entries"
        )
    }

    async fn create_ledger_entry(&self, entry: LedgerEntry) -> Result<LedgerEntry, CreateError> {
        log_on_error!(
            self.repository.create_ledger_entry(entry),
            CreateError,
            "create",
            "ledger entry"
        )
    }

    async fn replace_ledger_entry(
        &self,
        entry: LedgerEntry,
    ) -> Result<LedgerEntry, UpdateError> {
        log_on_error!(
            self.repository.replace_ledger_entry(entry),
            UpdateError,
            "replace",
            "ledger entry"
        )
    }

    async fn delete_ledger_entry(
        &self,
        id: LedgerEntryID,
    ) -> Result<LedgerEntryID, DeleteError> {
        log_on_error!(
            self.repository.delete_ledger_entry(id),
            DeleteError,
            "delete",
            "ledger entry"
        )
    }
}
