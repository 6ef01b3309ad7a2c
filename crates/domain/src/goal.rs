use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError, ValidationError};

#[allow(async_fn_in_trait)]
pub trait GoalService {
    async fn get_goals(&self) -> Result<Vec<Goal>, ReadError>;
    async fn create_goal(&self, goal: Goal) -> Result<Goal, CreateError>;
    async fn replace_goal(&self, goal: Goal) -> Result<Goal, UpdateError>;
    async fn delete_goal(&self, id: GoalID) -> Result<GoalID, DeleteError>;

    async fn get_goal_activities(&self) -> Result<Vec<GoalActivity>, ReadError>;
    async fn create_goal_activity(
        &self,
        activity: GoalActivity,
    ) -> Result<GoalActivity, CreateError>;
    async fn delete_goal_activity(
        &self,
        id: GoalActivityID,
    ) -> Result<GoalActivityID, DeleteError>;

    async fn get_goal_overview(&self) -> Result<Vec<GoalGroup>, ReadError> {
        Ok(goal_overview(&self.get_goals().await?))
    }

    async fn get_goals_on(&self, date: NaiveDate) -> Result<Vec<Goal>, ReadError> {
        let goals = self.get_goals().await?;
        let activities = self.get_goal_activities().await?;
        Ok(goals_on(&goals, &activities, date)
            .into_iter()
            .cloned()
            .collect())
    }

    fn validate_goal_name(&self, name: &str) -> Result<Name, ValidationError> {
        Name::new(name).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_goal_end_date(
        &self,
        start_date: NaiveDate,
        end_date: &str,
    ) -> Result<Option<NaiveDate>, ValidationError> {
        if end_date.trim().is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(end_date.trim(), "%Y-%m-%d") {
            Ok(parsed_date) if parsed_date >= start_date => Ok(Some(parsed_date)),
            Ok(_) => Err(ValidationError::Other(
                "End date must not be before the start date".into(),
            )),
            Err(_) => Err(ValidationError::Other("Invalid date".into())),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait GoalRepository {
    async fn read_goals(&self) -> Result<Vec<Goal>, ReadError>;
    async fn create_goal(&self, goal: Goal) -> Result<Goal, CreateError>;
    async fn replace_goal(&self, goal: Goal) -> Result<Goal, UpdateError>;
    async fn delete_goal(&self, id: GoalID) -> Result<GoalID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait GoalActivityRepository {
    async fn read_goal_activities(&self) -> Result<Vec<GoalActivity>, ReadError>;
    async fn create_goal_activity(
        &self,
        activity: GoalActivity,
    ) -> Result<GoalActivity, CreateError>;
    async fn delete_goal_activity(
        &self,
        id: GoalActivityID,
    ) -> Result<GoalActivityID, DeleteError>;
}

/// A tracked personal target.
///
/// Several goals may share a name, e.g. when a goal is restarted after it was completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: GoalID,
    pub name: Name,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub image: Option<String>,
    pub notes: String,
}

impl Goal {
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end_date| date <= end_date)
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GoalID(Uuid);

impl GoalID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl From<Uuid> for GoalID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for GoalID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalActivity {
    pub id: GoalActivityID,
    pub goal_id: GoalID,
    pub date: NaiveDate,
    pub notes: String,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GoalActivityID(Uuid);

impl GoalActivityID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl From<Uuid> for GoalActivityID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for GoalActivityID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// All goals sharing a name, represented by the most recently started one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalGroup {
    pub key: String,
    pub goal: Goal,
    pub goal_ids: Vec<GoalID>,
}

#[must_use]
pub fn goal_overview(goals: &[Goal]) -> Vec<GoalGroup> {
    let mut groups: BTreeMap<String, GoalGroup> = BTreeMap::new();

    for goal in goals {
        let key = goal.name.key();
        match groups.get_mut(&key) {
            Some(group) => {
                group.goal_ids.push(goal.id);
                if goal.start_date > group.goal.start_date {
                    group.goal = goal.clone();
                }
            }
            None => {
                groups.insert(
                    key.clone(),
                    GoalGroup {
                        key,
                        goal: goal.clone(),
                        goal_ids: vec![goal.id],
                    },
                );
            }
        }
    }

    groups.into_values().collect()
}

/// Pick the goal to show on `date` among goals sharing a name.
///
/// Goals with an activity on that day are preferred. Ties are broken by the latest start date.
#[must_use]
pub fn goal_for_day<'a>(
    goals: &[&'a Goal],
    activities: &[GoalActivity],
    date: NaiveDate,
) -> Option<&'a Goal> {
    let active: BTreeSet<GoalID> = activities
        .iter()
        .filter(|a| a.date == date)
        .map(|a| a.goal_id)
        .collect();

    goals
        .iter()
        .copied()
        .filter(|g| active.contains(&g.id))
        .reduce(latest)
        .or_else(|| goals.iter().copied().reduce(latest))
}

/// One goal per name relevant on `date`.
#[must_use]
pub fn goals_on<'a>(
    goals: &'a [Goal],
    activities: &[GoalActivity],
    date: NaiveDate,
) -> Vec<&'a Goal> {
    let recorded: BTreeSet<GoalID> = activities
        .iter()
        .filter(|a| a.date == date)
        .map(|a| a.goal_id)
        .collect();
    let mut by_name: BTreeMap<String, Vec<&Goal>> = BTreeMap::new();

    for goal in goals
        .iter()
        .filter(|g| g.is_active_on(date) || recorded.contains(&g.id))
    {
        by_name.entry(goal.name.key()).or_default().push(goal);
    }

    by_name
        .values()
        .filter_map(|rows| goal_for_day(rows, activities, date))
        .collect()
}

/// Number of consecutive days with an activity, ending today or, if there is none today yet,
/// yesterday.
#[must_use]
pub fn goal_streak(activities: &[GoalActivity], goal_ids: &[GoalID], today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = activities
        .iter()
        .filter(|a| goal_ids.contains(&a.goal_id))
        .map(|a| a.date)
        .collect();

    let mut day = if dates.contains(&today) {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };
    let mut streak = 0;

    while dates.contains(&day) {
        streak += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}

fn latest<'a>(a: &'a Goal, b: &'a Goal) -> &'a Goal {
    if b.start_date > a.start_date { b } else { a }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal(id: u128, name: &str, start_date: NaiveDate) -> Goal {
        Goal {
            id: id.into(),
            name: Name::new(name).unwrap(),
            start_date,
            end_date: None,
            image: None,
            notes: String::new(),
        }
    }

    fn activity(id: u128, goal_id: u128, date: NaiveDate) -> GoalActivity {
        GoalActivity {
            id: id.into(),
            goal_id: goal_id.into(),
            date,
            notes: String::new(),
        }
    }

    #[test]
    fn test_goal_overview_keeps_latest_row() {
        let goals = vec![
            Goal {
                end_date: Some(date(2024, 3, 1)),
                image: Some("old.png".to_string()),
                ..goal(1, "Quit smoking", date(2024, 1, 1))
            },
            Goal {
                image: Some("new.png".to_string()),
                ..goal(2, "quit smoking ", date(2024, 6, 1))
            },
            goal(3, "Read", date(2024, 2, 1)),
        ];
        let overview = goal_overview(&goals);
        assert_eq!(overview.len(), 2);
        assert_eq!(overview[0].key, "quit smoking");
        assert_eq!(overview[0].goal, goals[1]);
        assert_eq!(overview[0].goal.end_date, None);
        assert_eq!(overview[0].goal.image, Some("new.png".to_string()));
        assert_eq!(overview[0].goal_ids, vec![1.into(), 2.into()]);
        assert_eq!(overview[1].goal, goals[2]);
    }

    #[test]
    fn test_goal_overview_tie_keeps_first_row() {
        let goals = vec![
            goal(1, "Run", date(2024, 1, 1)),
            goal(2, "Run", date(2024, 1, 1)),
        ];
        assert_eq!(goal_overview(&goals)[0].goal.id, 1.into());
    }

    #[test]
    fn test_goal_overview_empty() {
        assert_eq!(goal_overview(&[]), vec![]);
    }

    #[rstest]
    #[case::no_activity(&[], 2)]
    #[case::activity_on_older_row(&[(1, 1, (2024, 7, 1))], 1)]
    #[case::activity_on_both_rows(&[(1, 1, (2024, 7, 1)), (2, 2, (2024, 7, 1))], 2)]
    #[case::activity_on_other_day(&[(1, 1, (2024, 7, 2))], 2)]
    fn test_goal_for_day(
        #[case] activities: &[(u128, u128, (i32, u32, u32))],
        #[case] expected: u128,
    ) {
        let a = goal(1, "Quit smoking", date(2024, 1, 1));
        let b = goal(2, "Quit smoking", date(2024, 6, 1));
        let activities = activities
            .iter()
            .map(|(id, goal_id, (y, m, d))| activity(*id, *goal_id, date(*y, *m, *d)))
            .collect::<Vec<_>>();
        assert_eq!(
            goal_for_day(&[&a, &b], &activities, date(2024, 7, 1)).map(|g| g.id),
            Some(expected.into())
        );
    }

    #[test]
    fn test_goal_for_day_without_goals() {
        assert_eq!(goal_for_day(&[], &[], date(2024, 7, 1)), None);
    }

    #[test]
    fn test_goals_on() {
        let goals = vec![
            Goal {
                end_date: Some(date(2024, 3, 1)),
                ..goal(1, "Quit smoking", date(2024, 1, 1))
            },
            goal(2, "Quit smoking", date(2024, 6, 1)),
            goal(3, "Read", date(2024, 8, 1)),
            Goal {
                end_date: Some(date(2024, 5, 1)),
                ..goal(4, "Meditate", date(2024, 4, 1))
            },
        ];
        let activities = vec![activity(1, 4, date(2024, 7, 1))];
        assert_eq!(
            goals_on(&goals, &activities, date(2024, 7, 1))
                .iter()
                .map(|g| g.id)
                .collect::<Vec<_>>(),
            vec![4.into(), 2.into()]
        );
    }

    #[rstest]
    #[case::none(&[], 0)]
    #[case::today(&[(2024, 7, 10)], 1)]
    #[case::until_yesterday(&[(2024, 7, 8), (2024, 7, 9)], 2)]
    #[case::gap(&[(2024, 7, 6), (2024, 7, 8), (2024, 7, 9), (2024, 7, 10)], 3)]
    #[case::broken(&[(2024, 7, 8)], 0)]
    fn test_goal_streak(#[case] dates: &[(i32, u32, u32)], #[case] expected: u32) {
        let activities = dates
            .iter()
            .enumerate()
            .map(|(i, (y, m, d))| activity(i as u128, 1, date(*y, *m, *d)))
            .chain([activity(100, 2, date(2024, 7, 7))])
            .collect::<Vec<_>>();
        assert_eq!(
            goal_streak(&activities, &[1.into()], date(2024, 7, 10)),
            expected
        );
    }

    #[rstest]
    #[case(date(2023, 12, 31), false)]
    #[case(date(2024, 1, 1), true)]
    #[case(date(2024, 3, 1), true)]
    #[case(date(2024, 3, 2), false)]
    fn test_goal_is_active_on(#[case] day: NaiveDate, #[case] expected: bool) {
        let g = Goal {
            end_date: Some(date(2024, 3, 1)),
            ..goal(1, "Read", date(2024, 1, 1))
        };
        assert_eq!(g.is_active_on(day), expected);
    }
}
