use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate};

use crate::{
    CreateError, DeleteError, ReadError, UpdateError, ValidationError,
    value_based_centered_moving_average,
};

#[allow(async_fn_in_trait)]
pub trait BodyMetricService {
    async fn get_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError>;
    async fn create_body_metric(&self, body_metric: BodyMetric)
    -> Result<BodyMetric, CreateError>;
    async fn replace_body_metric(
        &self,
        body_metric: BodyMetric,
    ) -> Result<BodyMetric, UpdateError>;
    async fn delete_body_metric(&self, date: NaiveDate) -> Result<NaiveDate, DeleteError>;

    async fn validate_body_metric_date(&self, date: &str) -> Result<NaiveDate, ValidationError> {
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed_date) => {
                if parsed_date <= Local::now().date_naive() {
                    match self.get_body_metrics().await {
                        Ok(body_metrics) => {
                            if body_metrics.iter().all(|m| m.date != parsed_date) {
                                Ok(parsed_date)
                            } else {
                                Err(ValidationError::Conflict("date".to_string()))
                            }
                        }
                        Err(err) => Err(ValidationError::Other(err.into())),
                    }
                } else {
                    Err(ValidationError::Other(
                        "Date must not be in the future".into(),
                    ))
                }
            }
            Err(_) => Err(ValidationError::Other("Invalid date".into())),
        }
    }

    fn validate_body_metric_weight(&self, weight: &str) -> Result<Option<f32>, ValidationError> {
        if weight.trim().is_empty() {
            return Ok(None);
        }
        match weight.replace(',', ".").trim().parse::<f32>() {
            Ok(parsed_weight) => {
                if parsed_weight > 0.0 {
                    Ok(Some(parsed_weight))
                } else {
                    Err(ValidationError::Other(
                        "Weight must be a positive decimal number".into(),
                    ))
                }
            }
            Err(_) => Err(ValidationError::Other(
                "Weight must be a decimal number".into(),
            )),
        }
    }

    fn validate_body_metric_body_fat(&self, body_fat: &str) -> Result<Option<f32>, ValidationError> {
        if body_fat.trim().is_empty() {
            return Ok(None);
        }
        match body_fat.replace(',', ".").trim().parse::<f32>() {
            Ok(parsed) if (0.0..=100.0).contains(&parsed) => Ok(Some(parsed)),
            Ok(_) => Err(ValidationError::Other(
                "Body fat must be in the range 0 to 100 %".into(),
            )),
            Err(_) => Err(ValidationError::Other(
                "Body fat must be a decimal number".into(),
            )),
        }
    }

    #[must_use]
    fn avg_weight(&self, body_metrics: &[BodyMetric]) -> Vec<(NaiveDate, f32)> {
        avg_weight(body_metrics)
    }

    #[must_use]
    fn avg_weekly_change(
        &self,
        avg_weight: &[(NaiveDate, f32)],
        current: Option<&BodyMetric>,
    ) -> Option<f32> {
        avg_weekly_change(&avg_weight.iter().copied().collect(), current)
    }
}

#[allow(async_fn_in_trait)]
pub trait BodyMetricRepository {
    async fn read_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError>;
    async fn create_body_metric(&self, body_metric: BodyMetric)
    -> Result<BodyMetric, CreateError>;
    async fn replace_body_metric(
        &self,
        body_metric: BodyMetric,
    ) -> Result<BodyMetric, UpdateError>;
    async fn delete_body_metric(&self, date: NaiveDate) -> Result<NaiveDate, DeleteError>;
}

/// Body measurements taken on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMetric {
    pub date: NaiveDate,
    /// kg
    pub weight: Option<f32>,
    /// %
    pub body_fat: Option<f32>,
    /// cm
    pub waist: Option<f32>,
    pub notes: String,
}

/// Moving average over the four weight values before and after each value.
#[must_use]
pub fn avg_weight(body_metrics: &[BodyMetric]) -> Vec<(NaiveDate, f32)> {
    let data = body_metrics
        .iter()
        .filter_map(|m| Some((m.date, m.weight?)))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect::<Vec<_>>();
    value_based_centered_moving_average(&data, 4)
}

/// Change of the current weight relative to the average weight one week earlier in percent.
#[must_use]
pub fn avg_weekly_change(
    avg_weight: &BTreeMap<NaiveDate, f32>,
    current: Option<&BodyMetric>,
) -> Option<f32> {
    let current = current?;
    let weight = current.weight?;
    let prev_date = current.date - Duration::days(7);
    let prev_avg_weight = match avg_weight.get(&prev_date) {
        Some(value) => *value,
        None => {
            let (a, b) = neighbors(avg_weight, prev_date)?;
            interpolate(a, b, prev_date)
        }
    };
    Some((weight - prev_avg_weight) / prev_avg_weight * 100.)
}

/// Most recent measurement with a weight.
#[must_use]
pub fn latest_weight(body_metrics: &[BodyMetric]) -> Option<&BodyMetric> {
    body_metrics
        .iter()
        .filter(|m| m.weight.is_some())
        .max_by_key(|m| m.date)
}

fn neighbors(
    values: &BTreeMap<NaiveDate, f32>,
    date: NaiveDate,
) -> Option<((NaiveDate, f32), (NaiveDate, f32))> {
    use std::ops::Bound::{Excluded, Unbounded};

    let before = values.range((Unbounded, Excluded(date))).next_back()?;
    let after = values.range((Excluded(date), Unbounded)).next()?;

    Some(((*before.0, *before.1), (*after.0, *after.1)))
}

fn interpolate(a: (NaiveDate, f32), b: (NaiveDate, f32), date: NaiveDate) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let ratio = (date - a.0).num_days() as f32 / (b.0 - a.0).num_days() as f32;
    a.1 + (b.1 - a.1) * ratio
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn from_num_days(days: i32) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt(days).unwrap()
    }

    fn metric(days: i32, weight: Option<f32>) -> BodyMetric {
        BodyMetric {
            date: from_num_days(days),
            weight,
            body_fat: None,
            waist: None,
            notes: String::new(),
        }
    }

    struct FakeService(Vec<BodyMetric>);

    impl BodyMetricService for FakeService {
        async fn get_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError> {
            Ok(self.0.clone())
        }
        async fn create_body_metric(
            &self,
            body_metric: BodyMetric,
        ) -> Result<BodyMetric, CreateError> {
            Ok(body_metric)
        }
        async fn replace_body_metric(
            &self,
            body_metric: BodyMetric,
        ) -> Result<BodyMetric, UpdateError> {
            Ok(body_metric)
        }
        async fn delete_body_metric(&self, date: NaiveDate) -> Result<NaiveDate, DeleteError> {
            Ok(date)
        }
    }

    #[rstest]
    #[case::no_value(vec![], vec![])]
    #[case::one_value(vec![metric(0, Some(80.0))], vec![(0, 80.0)])]
    #[case::values_without_weight_are_skipped(
        vec![metric(0, Some(80.0)), metric(1, None), metric(2, Some(82.0))],
        vec![(0, 81.0), (2, 81.0)],
    )]
    #[case::more_values_than_radius(
        vec![
            metric(0, Some(81.0)),
            metric(2, Some(82.0)),
            metric(3, Some(83.0)),
            metric(5, Some(84.0)),
            metric(6, Some(85.0)),
            metric(8, Some(86.0)),
            metric(9, Some(87.0)),
            metric(10, Some(88.0)),
            metric(12, Some(89.0)),
        ],
        vec![
            (0, 83.0),
            (2, 83.5),
            (3, 84.0),
            (5, 84.5),
            (6, 85.0),
            (8, 85.5),
            (9, 86.0),
            (10, 86.5),
            (12, 87.0),
        ],
    )]
    fn test_avg_weight(#[case] body_metrics: Vec<BodyMetric>, #[case] expected: Vec<(i32, f32)>) {
        assert_eq!(
            avg_weight(&body_metrics),
            expected
                .into_iter()
                .map(|(days, weight)| (from_num_days(days), weight))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_avg_weekly_change() {
        assert_eq!(
            avg_weekly_change(&BTreeMap::new(), Some(&metric(1, Some(70.0)))),
            None
        );
        assert_eq!(
            avg_weekly_change(
                &BTreeMap::from([(from_num_days(0), 70.0)]),
                Some(&metric(7, Some(70.0)))
            ),
            Some(0.0)
        );
        assert_eq!(
            avg_weekly_change(
                &BTreeMap::from([(from_num_days(0), 70.0)]),
                Some(&metric(7, None))
            ),
            None
        );
        assert_approx_eq!(
            avg_weekly_change(
                &BTreeMap::from([(from_num_days(0), 70.0)]),
                Some(&metric(7, Some(70.7)))
            )
            .unwrap(),
            1.0,
            0.001
        );
        assert_approx_eq!(
            avg_weekly_change(
                &BTreeMap::from([(from_num_days(0), 69.0), (from_num_days(2), 71.0)]),
                Some(&metric(8, Some(69.44)))
            )
            .unwrap(),
            -0.8,
            0.001
        );
    }

    #[test]
    fn test_latest_weight() {
        let body_metrics = vec![metric(3, Some(80.0)), metric(5, None), metric(1, Some(81.0))];
        assert_eq!(latest_weight(&body_metrics), Some(&body_metrics[0]));
        assert_eq!(latest_weight(&[]), None);
    }

    #[rstest]
    #[case("", Ok(None))]
    #[case("80,5", Ok(Some(80.5)))]
    #[case("0", Err("Weight must be a positive decimal number"))]
    #[case("heavy", Err("Weight must be a decimal number"))]
    fn test_validate_body_metric_weight(
        #[case] weight: &str,
        #[case] expected: Result<Option<f32>, &str>,
    ) {
        assert_eq!(
            FakeService(vec![])
                .validate_body_metric_weight(weight)
                .map_err(|err| err.to_string()),
            expected.map_err(ToString::to_string)
        );
    }

    #[rstest]
    #[case("", Ok(None))]
    #[case("18.5", Ok(Some(18.5)))]
    #[case("101", Err("Body fat must be in the range 0 to 100 %"))]
    #[case("lean", Err("Body fat must be a decimal number"))]
    fn test_validate_body_metric_body_fat(
        #[case] body_fat: &str,
        #[case] expected: Result<Option<f32>, &str>,
    ) {
        assert_eq!(
            FakeService(vec![])
                .validate_body_metric_body_fat(body_fat)
                .map_err(|err| err.to_string()),
            expected.map_err(ToString::to_string)
        );
    }

    #[test]
    fn test_validate_body_metric_date() {
        let service = FakeService(vec![BodyMetric {
            date: NaiveDate::from_ymd_opt(2020, 2, 2).unwrap(),
            ..metric(0, Some(80.0))
        }]);
        assert_eq!(
            futures::executor::block_on(service.validate_body_metric_date("2020-02-03")).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 3).unwrap()
        );
        assert!(matches!(
            futures::executor::block_on(service.validate_body_metric_date("2020-02-02")),
            Err(ValidationError::Conflict(field)) if field == "date"
        ));
        assert_eq!(
            futures::executor::block_on(service.validate_body_metric_date("9999-01-01"))
                .unwrap_err()
                .to_string(),
            "Date must not be in the future"
        );
        assert_eq!(
            futures::executor::block_on(service.validate_body_metric_date("02/03/2020"))
                .unwrap_err()
                .to_string(),
            "Invalid date"
        );
    }
}
