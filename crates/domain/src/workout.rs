use chrono::NaiveDate;
use derive_more::Deref;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
    CalendarDay, CreateError, DayStats, DeleteError, ExerciseProgress, Interval, ReadError,
    UpdateError, ValidationError, calendar, day_stats, exercise_progress, parse, workouts_on,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn create_workout(&self, workout: Workout) -> Result<Workout, CreateError>;
    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;

    async fn get_day_stats(&self, date: NaiveDate) -> Result<DayStats, ReadError> {
        let workouts = self.get_workouts().await?;
        Ok(day_stats(&workouts_on(&workouts, date)))
    }

    async fn get_exercise_progress(
        &self,
        interval: &Interval,
    ) -> Result<ExerciseProgress, ReadError> {
        let workouts = self.get_workouts().await?;
        Ok(exercise_progress(&workouts, interval))
    }

    async fn get_calendar(&self, interval: &Interval) -> Result<Vec<CalendarDay>, ReadError> {
        let workouts = self.get_workouts().await?;
        Ok(calendar(&workouts, interval))
    }

    fn validate_workout_name(&self, name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            Err(ValidationError::Other("Name must not be empty".into()))
        } else {
            Ok(name.to_string())
        }
    }

    fn validate_workout_date(&self, date: &str) -> Result<NaiveDate, ValidationError> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ValidationError::Other("Invalid date".into()))
    }

    fn validate_skip_end_date(
        &self,
        date: NaiveDate,
        end_date: &str,
    ) -> Result<Option<NaiveDate>, ValidationError> {
        if end_date.trim().is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(end_date.trim(), "%Y-%m-%d") {
            Ok(parsed_date) => {
                if parsed_date >= date {
                    Ok(Some(parsed_date))
                } else {
                    Err(ValidationError::Other(
                        "End date must not be before the start date".into(),
                    ))
                }
            }
            Err(_) => Err(ValidationError::Other("Invalid date".into())),
        }
    }

    fn validate_workout_duration(&self, duration: &str) -> Result<Option<u32>, ValidationError> {
        if duration.trim().is_empty() {
            return Ok(None);
        }
        match duration.trim().parse::<u32>() {
            Ok(minutes) if minutes <= 24 * 60 => Ok(Some(minutes)),
            Ok(_) => Err(ValidationError::Other(
                "Duration must not exceed one day".into(),
            )),
            Err(_) => Err(ValidationError::Other(
                "Duration must be a whole number of minutes".into(),
            )),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    async fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn create_workout(&self, workout: Workout) -> Result<Workout, CreateError>;
    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub name: String,
    pub date: NaiveDate,
    pub skip: Option<Skip>,
    pub exercises: Vec<Exercise>,
    pub notes: String,
    /// Total duration in minutes.
    pub duration: Option<u32>,
}

impl Workout {
    #[must_use]
    pub fn is_skip_day(&self) -> bool {
        self.skip.is_some()
    }

    /// Last day covered by this record.
    #[must_use]
    pub fn last_date(&self) -> NaiveDate {
        match &self.skip {
            Some(Skip {
                end_date: Some(end_date),
                ..
            }) if *end_date > self.date => *end_date,
            _ => self.date,
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Marks a workout record as an intentionally missed day or range of days.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Skip {
    pub reason: String,
    pub color: Option<String>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: ExerciseSets,
}

impl Exercise {
    #[must_use]
    pub fn kind(&self) -> ExerciseKind {
        match self.sets {
            ExerciseSets::Strength(_) => ExerciseKind::Strength,
            ExerciseSets::Cardio(_) => ExerciseKind::Cardio,
        }
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        match &self.sets {
            ExerciseSets::Strength(sets) => sets.len(),
            ExerciseSets::Cardio(sets) => sets.len(),
        }
    }
}

#[derive(Debug, Display, EnumString, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[strum(serialize_all = "lowercase")]
pub enum ExerciseKind {
    Strength,
    Cardio,
}

/// Sets of an exercise, typed by the exercise kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseSets {
    Strength(Vec<StrengthSet>),
    Cardio(Vec<CardioSet>),
}

impl ExerciseSets {
    /// Build the sets of an exercise of the given kind from raw set fields.
    ///
    /// Fields irrelevant to the kind are ignored.
    #[must_use]
    pub fn parse(kind: ExerciseKind, raw: &[RawSet]) -> Self {
        match kind {
            ExerciseKind::Strength => {
                ExerciseSets::Strength(raw.iter().map(StrengthSet::from).collect())
            }
            ExerciseKind::Cardio => ExerciseSets::Cardio(raw.iter().map(CardioSet::from).collect()),
        }
    }
}

/// Set fields as entered, before they are interpreted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawSet {
    pub reps: String,
    pub weight: String,
    pub duration: String,
    pub distance: String,
    pub notes: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StrengthSet {
    pub reps: Option<u32>,
    /// Weight in kg.
    pub weight: Option<f32>,
    pub notes: String,
}

impl StrengthSet {
    /// Weight moved in this set, if both reps and weight were entered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tonnage(&self) -> Option<f32> {
        Some(self.reps? as f32 * self.weight?)
    }
}

impl From<&RawSet> for StrengthSet {
    fn from(value: &RawSet) -> Self {
        Self {
            reps: parse::reps(&value.reps),
            weight: parse::decimal(&value.weight),
            notes: value.notes.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CardioSet {
    /// Duration in minutes.
    pub duration: Option<f32>,
    /// Distance in km.
    pub distance: Option<f32>,
    pub notes: String,
}

impl From<&RawSet> for CardioSet {
    fn from(value: &RawSet) -> Self {
        Self {
            duration: parse::duration_minutes(&value.duration),
            distance: parse::decimal(&value.distance),
            notes: value.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    struct FakeService;

    impl WorkoutService for FakeService {
        async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
            Ok(vec![])
        }
        async fn create_workout(&self, workout: Workout) -> Result<Workout, CreateError> {
            Ok(workout)
        }
        async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
            Ok(workout)
        }
        async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
            Ok(id)
        }
    }

    #[test]
    fn test_exercise_sets_parse_strength_ignores_cardio_fields() {
        let raw = [RawSet {
            reps: "10".to_string(),
            weight: "62,5".to_string(),
            duration: "2:30".to_string(),
            distance: "5".to_string(),
            notes: "easy".to_string(),
        }];
        assert_eq!(
            ExerciseSets::parse(ExerciseKind::Strength, &raw),
            ExerciseSets::Strength(vec![StrengthSet {
                reps: Some(10),
                weight: Some(62.0),
                notes: "easy".to_string(),
            }])
        );
    }

    #[test]
    fn test_exercise_sets_parse_cardio_ignores_strength_fields() {
        let raw = [RawSet {
            reps: "10".to_string(),
            weight: "60".to_string(),
            duration: "1:02:30".to_string(),
            distance: "".to_string(),
            notes: String::new(),
        }];
        assert_eq!(
            ExerciseSets::parse(ExerciseKind::Cardio, &raw),
            ExerciseSets::Cardio(vec![CardioSet {
                duration: Some(62.5),
                distance: None,
                notes: String::new(),
            }])
        );
    }

    #[rstest]
    #[case(Some(10), Some(50.0), Some(500.0))]
    #[case(Some(10), None, None)]
    #[case(None, Some(50.0), None)]
    #[case(Some(0), Some(50.0), Some(0.0))]
    fn test_strength_set_tonnage(
        #[case] reps: Option<u32>,
        #[case] weight: Option<f32>,
        #[case] expected: Option<f32>,
    ) {
        assert_eq!(
            StrengthSet {
                reps,
                weight,
                notes: String::new()
            }
            .tonnage(),
            expected
        );
    }

    #[rstest]
    #[case("strength", Ok(ExerciseKind::Strength))]
    #[case("cardio", Ok(ExerciseKind::Cardio))]
    #[case("yoga", Err(strum::ParseError::VariantNotFound))]
    fn test_exercise_kind_from_str(
        #[case] value: &str,
        #[case] expected: Result<ExerciseKind, strum::ParseError>,
    ) {
        assert_eq!(value.parse::<ExerciseKind>(), expected);
    }

    #[test]
    fn test_exercise_kind_display() {
        assert_eq!(ExerciseKind::Cardio.to_string(), "cardio");
    }

    #[rstest]
    #[case(None, (2024, 1, 1))]
    #[case(Some((2024, 1, 3)), (2024, 1, 3))]
    #[case(Some((2023, 12, 30)), (2024, 1, 1))]
    fn test_workout_last_date(
        #[case] end_date: Option<(i32, u32, u32)>,
        #[case] expected: (i32, u32, u32),
    ) {
        let workout = Workout {
            id: 1.into(),
            name: "Rest".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            skip: Some(Skip {
                reason: "sick".to_string(),
                color: None,
                end_date: end_date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            }),
            exercises: vec![],
            notes: String::new(),
            duration: None,
        };
        assert_eq!(
            workout.last_date(),
            NaiveDate::from_ymd_opt(expected.0, expected.1, expected.2).unwrap()
        );
    }

    #[rstest]
    #[case("", Ok(None))]
    #[case("2024-01-03", Ok(Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap())))]
    #[case("2024-01-01", Ok(Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())))]
    #[case("2023-12-31", Err("End date must not be before the start date"))]
    #[case("soon", Err("Invalid date"))]
    fn test_validate_skip_end_date(
        #[case] end_date: &str,
        #[case] expected: Result<Option<NaiveDate>, &str>,
    ) {
        assert_eq!(
            FakeService
                .validate_skip_end_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), end_date)
                .map_err(|err| err.to_string()),
            expected.map_err(ToString::to_string)
        );
    }

    #[rstest]
    #[case("", Ok(None))]
    #[case(" 45 ", Ok(Some(45)))]
    #[case("1441", Err("Duration must not exceed one day"))]
    #[case("1.5", Err("Duration must be a whole number of minutes"))]
    fn test_validate_workout_duration(
        #[case] duration: &str,
        #[case] expected: Result<Option<u32>, &str>,
    ) {
        assert_eq!(
            FakeService
                .validate_workout_duration(duration)
                .map_err(|err| err.to_string()),
            expected.map_err(ToString::to_string)
        );
    }

    #[test]
    fn test_validate_workout_name() {
        assert_eq!(
            FakeService.validate_workout_name("  Push day ").unwrap(),
            "Push day"
        );
        assert!(FakeService.validate_workout_name("  ").is_err());
    }

    #[test]
    fn test_get_day_stats_without_workouts() {
        let stats = futures::executor::block_on(
            FakeService.get_day_stats(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        )
        .unwrap();
        assert_eq!(stats, DayStats::default());
    }
}
