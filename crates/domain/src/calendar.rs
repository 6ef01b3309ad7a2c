use std::{borrow::Cow, collections::BTreeMap};

use chrono::NaiveDate;

use crate::{Interval, Workout, WorkoutID};

/// Repeat each skip record on every day of its range.
///
/// A skip record with an end date yields one copy per day from its date to its end date inclusive,
/// each with the date set to that day. All other records are passed through unchanged.
#[must_use]
pub fn expand_skip_ranges(workouts: &[Workout]) -> Vec<Cow<'_, Workout>> {
    workouts
        .iter()
        .flat_map(|workout| {
            workout
                .date
                .iter_days()
                .take_while(move |d| *d <= workout.last_date())
                .map(move |date| {
                    if date == workout.date {
                        Cow::Borrowed(workout)
                    } else {
                        Cow::Owned(Workout {
                            date,
                            ..workout.clone()
                        })
                    }
                })
        })
        .collect()
}

/// Records present on each day, with skip ranges expanded.
#[must_use]
pub fn entries_by_day(workouts: &[Workout]) -> BTreeMap<NaiveDate, Vec<Cow<'_, Workout>>> {
    let mut result: BTreeMap<NaiveDate, Vec<Cow<'_, Workout>>> = BTreeMap::new();
    for entry in expand_skip_ranges(workouts) {
        result.entry(entry.date).or_default().push(entry);
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeatLevel {
    None,
    Skipped,
    Low,
    Medium,
    High,
}

impl HeatLevel {
    #[must_use]
    pub fn new(exercise_count: usize, skipped: bool) -> Self {
        match exercise_count {
            0 if skipped => HeatLevel::Skipped,
            0 => HeatLevel::None,
            1..=2 => HeatLevel::Low,
            3..=4 => HeatLevel::Medium,
            _ => HeatLevel::High,
        }
    }
}

/// One cell of the calendar heat-map.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub workouts: Vec<WorkoutID>,
    pub exercise_count: usize,
    pub skip_reason: Option<String>,
    pub skip_color: Option<String>,
    pub level: HeatLevel,
}

#[must_use]
pub fn calendar(workouts: &[Workout], interval: &Interval) -> Vec<CalendarDay> {
    let entries = entries_by_day(workouts);

    interval
        .days()
        .map(|date| {
            let day = entries.get(&date).map(Vec::as_slice).unwrap_or_default();
            let exercise_count = day
                .iter()
                .filter(|w| !w.is_skip_day())
                .map(|w| w.exercises.len())
                .sum::<usize>();
            let skip = day.iter().find_map(|w| w.skip.as_ref());
            CalendarDay {
                date,
                workouts: day.iter().map(|w| w.id).collect(),
                exercise_count,
                skip_reason: skip.map(|s| s.reason.clone()),
                skip_color: skip.and_then(|s| s.color.clone()),
                level: HeatLevel::new(exercise_count, skip.is_some()),
            }
        })
        .collect()
}
