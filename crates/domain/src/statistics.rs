use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl Interval {
    /// The last `days` calendar days, ending with `today`.
    #[must_use]
    pub fn trailing(today: NaiveDate, days: u64) -> Self {
        Interval {
            first: today
                .checked_sub_days(Days::new(days.saturating_sub(1)))
                .unwrap_or(today),
            last: today,
        }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.last;
        self.first.iter_days().take_while(move |d| *d <= last)
    }
}

impl From<std::ops::RangeInclusive<NaiveDate>> for Interval {
    fn from(value: std::ops::RangeInclusive<NaiveDate>) -> Self {
        Interval {
            first: *value.start(),
            last: *value.end(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultInterval {
    _1Y = 365,
    _6M = 182,
    _3M = 91,
    _1M = 30,
}

impl DefaultInterval {
    #[must_use]
    pub fn ending(self, today: NaiveDate) -> Interval {
        Interval::trailing(today, self as u64)
    }
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Calculate a series of moving averages from a given series of (date, value) pairs.
///
/// The data argument must have only one value per day.
///
/// The radius argument determines the number of values to include into the calculated
/// average before and after each value. Near the ends of the series the window shrinks.
#[must_use]
pub fn value_based_centered_moving_average(
    data: &[(NaiveDate, f32)],
    radius: usize,
) -> Vec<(NaiveDate, f32)> {
    data.iter()
        .enumerate()
        .map(|(i, (date, _))| {
            let window = &data[i.saturating_sub(radius)..=(i + radius).min(data.len() - 1)];
            #[allow(clippy::cast_precision_loss)]
            let avg = window.iter().map(|(_, value)| value).sum::<f32>() / window.len() as f32;
            (*date, avg)
        })
        .collect()
}
