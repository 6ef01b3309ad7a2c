use std::{collections::BTreeMap, fmt, iter::Sum, ops::Add};

use chrono::{Datelike, NaiveDate};
use derive_more::{Deref, Into};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError, ValidationError};

#[allow(async_fn_in_trait)]
pub trait LedgerService {
    async fn get_ledger_entries(&self) -> Result<Vec<LedgerEntry>, ReadError>;
    async fn create_ledger_entry(&self, entry: LedgerEntry) -> Result<LedgerEntry, CreateError>;
    async fn replace_ledger_entry(&self, entry: LedgerEntry)
    -> Result<LedgerEntry, UpdateError>;
    async fn delete_ledger_entry(&self, id: LedgerEntryID)
    -> Result<LedgerEntryID, DeleteError>;

    async fn get_ledger_summary(&self) -> Result<LedgerSummary, ReadError> {
        Ok(LedgerSummary::new(&self.get_ledger_entries().await?))
    }

    fn validate_ledger_amount(&self, amount: &str) -> Result<Amount, ValidationError> {
        Amount::try_from(amount).map_err(|err| ValidationError::Other(err.into()))
    }

    fn validate_ledger_name(&self, name: &str) -> Result<Name, ValidationError> {
        Name::new(name).map_err(|err| ValidationError::Other(err.into()))
    }
}

#[allow(async_fn_in_trait)]
pub trait LedgerRepository {
    async fn read_ledger_entries(&self) -> Result<Vec<LedgerEntry>, ReadError>;
    async fn create_ledger_entry(&self, entry: LedgerEntry) -> Result<LedgerEntry, CreateError>;
    async fn replace_ledger_entry(&self, entry: LedgerEntry)
    -> Result<LedgerEntry, UpdateError>;
    async fn delete_ledger_entry(&self, id: LedgerEntryID)
    -> Result<LedgerEntryID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: LedgerEntryID,
    pub date: NaiveDate,
    pub kind: LedgerKind,
    /// Creditor of a debt or source of an income.
    pub name: Name,
    pub amount: Amount,
    pub settled: bool,
    pub notes: String,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LedgerEntryID(Uuid);

impl LedgerEntryID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl From<Uuid> for LedgerEntryID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for LedgerEntryID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum LedgerKind {
    Debt,
    Income,
}

/// Amount of money in cents.
#[derive(Debug, Default, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub fn cents(self) -> i64 {
        self.0
    }
}

impl TryFrom<&str> for Amount {
    type Error = AmountError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim().replace(',', ".");
        let (units, fraction) = value.split_once('.').unwrap_or((value.as_str(), ""));

        if units.is_empty() && fraction.is_empty() {
            return Err(AmountError::ParseError);
        }
        if fraction.len() > 2 {
            return Err(AmountError::InvalidResolution);
        }

        let units = if units.is_empty() {
            0
        } else {
            units.parse::<u32>().map_err(|_| AmountError::ParseError)?
        };
        let fraction = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<2}")
                .parse::<u8>()
                .map_err(|_| AmountError::ParseError)?
        };
        let cents = i64::from(units) * 100 + i64::from(fraction);

        if cents == 0 {
            return Err(AmountError::NotPositive);
        }

        Ok(Self(cents))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", self.0.abs() / 100, self.0.abs() % 100)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AmountError {
    #[error("Amount must be a positive decimal number")]
    ParseError,
    #[error("Amount must be greater than zero")]
    NotPositive,
    #[error("Amount must have at most two decimal places")]
    InvalidResolution,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    pub income: Amount,
    pub outstanding_debt: Amount,
    pub settled_debt: Amount,
}

impl LedgerSummary {
    #[must_use]
    pub fn new(entries: &[LedgerEntry]) -> Self {
        let total = |kind: LedgerKind, settled: Option<bool>| {
            entries
                .iter()
                .filter(|e| e.kind == kind && settled.is_none_or(|s| e.settled == s))
                .map(|e| e.amount)
                .sum::<Amount>()
        };
        Self {
            income: total(LedgerKind::Income, None),
            outstanding_debt: total(LedgerKind::Debt, Some(false)),
            settled_debt: total(LedgerKind::Debt, Some(true)),
        }
    }

    #[must_use]
    pub fn balance(&self) -> Amount {
        Amount(self.income.0 - self.outstanding_debt.0)
    }
}

/// Income per (year, month).
#[must_use]
pub fn monthly_income(entries: &[LedgerEntry]) -> BTreeMap<(i32, u32), Amount> {
    let mut result: BTreeMap<(i32, u32), Amount> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.kind == LedgerKind::Income) {
        let month = result
            .entry((entry.date.year(), entry.date.month()))
            .or_default();
        *month = *month + entry.amount;
    }
    result
}
