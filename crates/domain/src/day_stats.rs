use chrono::NaiveDate;

use crate::{ExerciseSets, Workout, round2};

/// Summary of the training done on one day.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DayStats {
    pub workout_count: u32,
    pub exercise_count: u32,
    pub strength_exercise_count: u32,
    pub cardio_exercise_count: u32,
    pub set_count: u32,
    pub rep_count: u32,
    /// Total weight moved in kg.
    pub tonnage: f32,
    pub max_weight: f32,
    pub max_reps: u32,
    /// Total cardio duration in minutes.
    pub cardio_minutes: f32,
    /// Total cardio distance in km.
    pub cardio_distance: f32,
}

impl DayStats {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercise_count == 0
    }
}

/// Workouts performed on `date`, excluding skip days.
#[must_use]
pub fn workouts_on(workouts: &[Workout], date: NaiveDate) -> Vec<&Workout> {
    workouts
        .iter()
        .filter(|w| w.date == date && !w.is_skip_day())
        .collect()
}

#[must_use]
pub fn day_stats(workouts: &[&Workout]) -> DayStats {
    let mut stats = DayStats::default();

    for workout in workouts {
        stats.workout_count += 1;

        for exercise in &workout.exercises {
            stats.exercise_count += 1;

            match &exercise.sets {
                ExerciseSets::Strength(sets) => {
                    stats.strength_exercise_count += 1;

                    for set in sets {
                        let (Some(reps), Some(weight)) = (set.reps, set.weight) else {
                            continue;
                        };
                        #[allow(clippy::cast_precision_loss)]
                        {
                            stats.tonnage += reps as f32 * weight;
                        }
                        stats.max_weight = stats.max_weight.max(weight);
                        stats.max_reps = stats.max_reps.max(reps);
                        stats.set_count += 1;
                        stats.rep_count += reps;
                    }
                }
                ExerciseSets::Cardio(sets) => {
                    stats.cardio_exercise_count += 1;

                    for set in sets {
                        if let Some(distance) = set.distance {
                            stats.cardio_distance += distance;
                        }
                        let Some(duration) = set.duration else {
                            continue;
                        };
                        stats.cardio_minutes += duration;
                        stats.set_count += 1;
                    }
                }
            }
        }
    }

    stats.tonnage = round2(stats.tonnage);
    stats.cardio_minutes = round2(stats.cardio_minutes);
    stats.cardio_distance = round2(stats.cardio_distance);

    stats
}
