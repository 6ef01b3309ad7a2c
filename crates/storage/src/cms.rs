//! Records as exchanged with the CMS.
//!
//! Field names are camelCase. Set fields are plain strings as entered by the user, they are
//! interpreted once when a record is converted into its domain type. Dates may be sent either as
//! `YYYY-MM-DD` or as full ISO timestamps, only the date part is used.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stride_domain as domain;
use uuid::Uuid;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub docs: Vec<T>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Doc<T> {
    pub doc: T,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(with = "date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_skip_day: bool,
    #[serde(default)]
    pub skip_reason: Option<String>,
    #[serde(default)]
    pub skip_color: Option<String>,
    #[serde(default, with = "optional_date")]
    pub skip_end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl From<domain::Workout> for Workout {
    fn from(value: domain::Workout) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self {
            id: *value.id,
            name: value.name.clone(),
            date: value.date,
            is_skip_day: value.is_skip_day(),
            skip_reason: value.skip.as_ref().map(|s| s.reason.clone()),
            skip_color: value.skip.as_ref().and_then(|s| s.color.clone()),
            skip_end_date: value.skip.as_ref().and_then(|s| s.end_date),
            exercises: value.exercises.iter().map(Exercise::from).collect(),
            notes: Some(value.notes.clone()).filter(|n| !n.is_empty()),
            duration: value.duration,
        }
    }
}

impl TryFrom<Workout> for domain::Workout {
    type Error = ConversionError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: value.name,
            date: value.date,
            skip: value.is_skip_day.then(|| domain::Skip {
                reason: value.skip_reason.unwrap_or_default(),
                color: value.skip_color,
                end_date: value.skip_end_date,
            }),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::Exercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            notes: value.notes.unwrap_or_default(),
            duration: value.duration,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sets: Vec<Set>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        let sets = match &value.sets {
            domain::ExerciseSets::Strength(sets) => sets.iter().map(Set::from).collect(),
            domain::ExerciseSets::Cardio(sets) => sets.iter().map(Set::from).collect(),
        };
        Self {
            name: value.name.clone(),
            kind: value.kind().to_string(),
            sets,
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = ConversionError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        let kind = domain::ExerciseKind::from_str(value.kind.trim())
            .map_err(|_| ConversionError::InvalidExerciseKind(value.kind.clone()))?;
        let raw = value.sets.into_iter().map(domain::RawSet::from).collect::<Vec<_>>();
        Ok(Self {
            name: value.name,
            sets: domain::ExerciseSets::parse(kind, &raw),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Set {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reps: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

impl From<&domain::StrengthSet> for Set {
    fn from(value: &domain::StrengthSet) -> Self {
        Self {
            reps: value.reps.map(|r| r.to_string()).unwrap_or_default(),
            weight: value.weight.map(|w| w.to_string()).unwrap_or_default(),
            notes: value.notes.clone(),
            ..Self::default()
        }
    }
}

impl From<&domain::CardioSet> for Set {
    fn from(value: &domain::CardioSet) -> Self {
        Self {
            duration: value.duration.map(format_minutes).unwrap_or_default(),
            distance: value.distance.map(|d| d.to_string()).unwrap_or_default(),
            notes: value.notes.clone(),
            ..Self::default()
        }
    }
}

impl From<Set> for domain::RawSet {
    fn from(value: Set) -> Self {
        Self {
            reps: value.reps,
            weight: value.weight,
            duration: value.duration,
            distance: value.distance,
            notes: value.notes,
        }
    }
}

/// Format minutes as `m:ss`, which is read back as minutes regardless of the value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_minutes(minutes: f32) -> String {
    let seconds = (minutes * 60.0).round().max(0.0) as u32;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "date")]
    pub start_date: NaiveDate,
    #[serde(default, with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::Goal> for Goal {
    fn from(value: &domain::Goal) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            start_date: value.start_date,
            end_date: value.end_date,
            image: value.image.clone(),
            notes: Some(value.notes.clone()).filter(|n| !n.is_empty()),
        }
    }
}

impl TryFrom<Goal> for domain::Goal {
    type Error = ConversionError;

    fn try_from(value: Goal) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            start_date: value.start_date,
            end_date: value.end_date,
            image: value.image.filter(|i| !i.is_empty()),
            notes: value.notes.unwrap_or_default(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalActivity {
    pub id: Uuid,
    pub goal: Uuid,
    #[serde(with = "date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::GoalActivity> for GoalActivity {
    fn from(value: &domain::GoalActivity) -> Self {
        Self {
            id: *value.id,
            goal: *value.goal_id,
            date: value.date,
            notes: Some(value.notes.clone()).filter(|n| !n.is_empty()),
        }
    }
}

impl From<GoalActivity> for domain::GoalActivity {
    fn from(value: GoalActivity) -> Self {
        Self {
            id: value.id.into(),
            goal_id: value.goal.into(),
            date: value.date,
            notes: value.notes.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetric {
    #[serde(with = "date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub body_fat: Option<f32>,
    #[serde(default)]
    pub waist: Option<f32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::BodyMetric> for BodyMetric {
    fn from(value: &domain::BodyMetric) -> Self {
        Self {
            date: value.date,
            weight: value.weight,
            body_fat: value.body_fat,
            waist: value.waist,
            notes: Some(value.notes.clone()).filter(|n| !n.is_empty()),
        }
    }
}

impl From<BodyMetric> for domain::BodyMetric {
    fn from(value: BodyMetric) -> Self {
        Self {
            date: value.date,
            weight: value.weight,
            body_fat: value.body_fat,
            waist: value.waist,
            notes: value.notes.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    #[serde(with = "date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    /// Amount in cents.
    pub amount: i64,
    #[serde(default)]
    pub settled: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::LedgerEntry> for LedgerEntry {
    fn from(value: &domain::LedgerEntry) -> Self {
        Self {
            id: *value.id,
            date: value.date,
            kind: value.kind.to_string(),
            name: value.name.to_string(),
            amount: value.amount.cents(),
            settled: value.settled,
            notes: Some(value.notes.clone()).filter(|n| !n.is_empty()),
        }
    }
}

impl TryFrom<LedgerEntry> for domain::LedgerEntry {
    type Error = ConversionError;

    fn try_from(value: LedgerEntry) -> Result<Self, Self::Error> {
        if value.amount <= 0 {
            return Err(ConversionError::InvalidAmount(value.amount));
        }
        Ok(Self {
            id: value.id.into(),
            date: value.date,
            kind: domain::LedgerKind::from_str(&value.kind)
                .map_err(|_| ConversionError::InvalidLedgerKind(value.kind.clone()))?,
            name: domain::Name::new(&value.name)?,
            amount: domain::Amount::from_cents(value.amount),
            settled: value.settled,
            notes: value.notes.unwrap_or_default(),
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error("invalid exercise type \"{0}\"")]
    InvalidExerciseKind(String),
    #[error("invalid ledger entry type \"{0}\"")]
    InvalidLedgerKind(String),
    #[error("invalid amount {0}")]
    InvalidAmount(i64),
}

/// Deserialize a field that may be sent as `null`, which is read like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value.get(..10).unwrap_or(value), "%Y-%m-%d")
}

mod date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_date(&value).map_err(D::Error::custom)
    }
}

mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => super::date::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) if !value.trim().is_empty() => {
                super::parse_date(&value).map(Some).map_err(D::Error::custom)
            }
            _ => Ok(None),
        }
    }
}
