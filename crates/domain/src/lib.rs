#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod body_metric;
mod calendar;
mod day_stats;
mod error;
mod goal;
mod ledger;
mod name;
pub mod parse;
mod progress;
mod service;
mod statistics;
mod workout;

pub use body_metric::{
    BodyMetric, BodyMetricRepository, BodyMetricService, avg_weekly_change, avg_weight,
    latest_weight,
};
pub use calendar::{CalendarDay, HeatLevel, calendar, entries_by_day, expand_skip_ranges};
pub use day_stats::{DayStats, day_stats, workouts_on};
pub use error::{
    CreateError, DeleteError, ReadError, StorageError, UpdateError, ValidationError,
};
pub use goal::{
    Goal, GoalActivity, GoalActivityID, GoalActivityRepository, GoalGroup, GoalID,
    GoalRepository, GoalService, goal_for_day, goal_overview, goal_streak, goals_on,
};
pub use ledger::{
    Amount, AmountError, LedgerEntry, LedgerEntryID, LedgerKind, LedgerRepository,
    LedgerService, LedgerSummary, monthly_income,
};
pub use name::{Name, NameError, capitalize, group_key};
pub use progress::{
    DataPoint, ExerciseProgress, ExerciseSeries, Metric, Selection, exercise_progress,
};
pub use service::Service;
pub use statistics::{DefaultInterval, Interval, round2, value_based_centered_moving_average};
pub use workout::{
    CardioSet, Exercise, ExerciseKind, ExerciseSets, RawSet, Skip, StrengthSet, Workout,
    WorkoutID, WorkoutRepository, WorkoutService,
};
