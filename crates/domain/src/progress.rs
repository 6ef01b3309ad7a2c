use std::collections::BTreeMap;

use chrono::NaiveDate;
use derive_more::Deref;
use strum::Display;

use crate::{ExerciseKind, ExerciseSets, Interval, Workout, capitalize, group_key};

/// Metrics of one exercise on one day.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataPoint {
    pub max_weight: f32,
    pub total_volume: f32,
    pub max_reps: u32,
    /// Average over all sets with a positive weight.
    pub avg_weight: f32,
    /// Minutes.
    pub total_duration: f32,
    /// Kilometers.
    pub total_distance: f32,
    weight_sum: f32,
    weighted_sets: u32,
}

impl DataPoint {
    #[allow(clippy::cast_precision_loss)]
    fn add(&mut self, sets: &ExerciseSets) {
        match sets {
            ExerciseSets::Strength(sets) => {
                for set in sets {
                    let reps = set.reps.unwrap_or(0);
                    let weight = set.weight.unwrap_or(0.0);
                    self.max_weight = self.max_weight.max(weight);
                    self.max_reps = self.max_reps.max(reps);
                    self.total_volume += reps as f32 * weight;
                    if weight > 0.0 {
                        self.weight_sum += weight;
                        self.weighted_sets += 1;
                    }
                }
                if self.weighted_sets > 0 {
                    self.avg_weight = self.weight_sum / self.weighted_sets as f32;
                }
            }
            ExerciseSets::Cardio(sets) => {
                for set in sets {
                    self.total_duration += set.duration.unwrap_or(0.0);
                    self.total_distance += set.distance.unwrap_or(0.0);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSeries {
    /// Name for display, taken from the first occurrence.
    pub name: String,
    /// Kind of the first occurrence.
    pub kind: ExerciseKind,
    pub points: BTreeMap<NaiveDate, DataPoint>,
}

impl ExerciseSeries {
    #[must_use]
    pub fn values(&self, metric: Metric) -> Vec<(NaiveDate, f32)> {
        self.points
            .iter()
            .map(|(date, point)| (*date, metric.value(point)))
            .collect()
    }
}

/// Time series per exercise, keyed by the normalized exercise name.
#[derive(Deref, Debug, Default, Clone, PartialEq)]
pub struct ExerciseProgress(BTreeMap<String, ExerciseSeries>);

impl ExerciseProgress {
    /// The kind most exercises are of, preferring strength on a tie.
    #[must_use]
    pub fn dominant_kind(&self) -> Option<ExerciseKind> {
        if self.0.is_empty() {
            return None;
        }
        let cardio = self
            .0
            .values()
            .filter(|s| s.kind == ExerciseKind::Cardio)
            .count();
        if cardio * 2 > self.0.len() {
            Some(ExerciseKind::Cardio)
        } else {
            Some(ExerciseKind::Strength)
        }
    }

    #[must_use]
    pub fn select(&self, selection: &Selection) -> Vec<&ExerciseSeries> {
        match selection {
            Selection::Exercise(name) => self.0.get(&group_key(name)).into_iter().collect(),
            Selection::All => {
                let Some(kind) = self.dominant_kind() else {
                    return vec![];
                };
                self.0.values().filter(|s| s.kind == kind).collect()
            }
        }
    }

    /// Keys and display names, ordered by display name.
    #[must_use]
    pub fn names(&self) -> Vec<(&str, &str)> {
        let mut names = self
            .0
            .iter()
            .map(|(key, series)| (key.as_str(), series.name.as_str()))
            .collect::<Vec<_>>();
        names.sort_by(|a, b| a.1.cmp(b.1));
        names
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Exercise(String),
    All,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    #[strum(to_string = "Max weight (kg)")]
    MaxWeight,
    #[strum(to_string = "Volume (kg)")]
    Volume,
    #[strum(to_string = "Max reps")]
    MaxReps,
    #[strum(to_string = "Avg. weight (kg)")]
    AvgWeight,
    #[strum(to_string = "Duration (min)")]
    Duration,
    #[strum(to_string = "Distance (km)")]
    Distance,
}

impl Metric {
    #[must_use]
    pub fn for_kind(kind: ExerciseKind) -> &'static [Metric] {
        match kind {
            ExerciseKind::Strength => &[
                Metric::MaxWeight,
                Metric::Volume,
                Metric::MaxReps,
                Metric::AvgWeight,
            ],
            ExerciseKind::Cardio => &[Metric::Duration, Metric::Distance],
        }
    }

    #[must_use]
    pub fn value(self, point: &DataPoint) -> f32 {
        match self {
            Metric::MaxWeight => point.max_weight,
            Metric::Volume => point.total_volume,
            #[allow(clippy::cast_precision_loss)]
            Metric::MaxReps => point.max_reps as f32,
            Metric::AvgWeight => point.avg_weight,
            Metric::Duration => point.total_duration,
            Metric::Distance => point.total_distance,
        }
    }
}

/// Build the time series of every exercise performed within `interval`.
///
/// Skip days are ignored. All sets of an exercise on the same date, also from different workouts,
/// are folded into a single data point.
#[must_use]
pub fn exercise_progress(workouts: &[Workout], interval: &Interval) -> ExerciseProgress {
    let mut result: BTreeMap<String, ExerciseSeries> = BTreeMap::new();

    for workout in workouts
        .iter()
        .filter(|w| !w.is_skip_day() && interval.contains(w.date))
    {
        for exercise in &workout.exercises {
            let key = group_key(&exercise.name);
            if key.is_empty() || exercise.num_sets() == 0 {
                continue;
            }
            result
                .entry(key)
                .or_insert_with(|| ExerciseSeries {
                    name: capitalize(&exercise.name),
                    kind: exercise.kind(),
                    points: BTreeMap::new(),
                })
                .points
                .entry(workout.date)
                .or_default()
                .add(&exercise.sets);
        }
    }

    ExerciseProgress(result)
}
