use anyhow::Context;
use chrono::NaiveDate;
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use stride_domain as domain;

use crate::cms::{self, ConversionError, Doc, Page};

const WORKOUTS: &str = "api/workouts";
const GOALS: &str = "api/goals";
const GOAL_ACTIVITIES: &str = "api/goal-activities";
const BODY_METRICS: &str = "api/body-metrics";
const LEDGER_ENTRIES: &str = "api/ledger-entries";

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not be sent or no response was received.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SendError(pub String);

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, SendError>;
}

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct GlooNetSendRequest;

#[cfg(target_arch = "wasm32")]
impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, SendError> {
        use gloo_net::http::Request as GlooRequest;

        let builder = match request.method {
            Method::Get => GlooRequest::get(&request.url),
            Method::Post => GlooRequest::post(&request.url),
            Method::Patch => GlooRequest::patch(&request.url),
            Method::Delete => GlooRequest::delete(&request.url),
        };
        let request = match request.body {
            Some(body) => builder.json(&body),
            None => builder.build(),
        }
        .map_err(|err| SendError(err.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|err| SendError(err.to_string()))?;

        Ok(Response {
            status: response.status(),
            status_text: response.status_text(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}

/// Failure of a single request, before it is mapped to the error of the repository operation.
#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] domain::StorageError),
}

impl From<RequestError> for domain::ReadError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Conflict => domain::ReadError::Other("conflict".into()),
            RequestError::Storage(err) => domain::ReadError::Storage(err),
        }
    }
}

impl From<RequestError> for domain::CreateError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Conflict => domain::CreateError::Conflict,
            RequestError::Storage(err) => domain::CreateError::Storage(err),
        }
    }
}

impl From<RequestError> for domain::UpdateError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Conflict => domain::UpdateError::Conflict,
            RequestError::Storage(err) => domain::UpdateError::Storage(err),
        }
    }
}

impl From<RequestError> for domain::DeleteError {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::Conflict => domain::DeleteError::Other("conflict".into()),
            RequestError::Storage(err) => domain::DeleteError::Storage(err),
        }
    }
}

impl From<ConversionError> for RequestError {
    fn from(value: ConversionError) -> Self {
        RequestError::Storage(domain::StorageError::Other(
            anyhow::Error::new(value)
                .context("invalid record received")
                .into(),
        ))
    }
}

/// Repository backed by the REST interface of the CMS.
#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub base_url: String,
    pub sender: S,
}

#[cfg(target_arch = "wasm32")]
impl REST<GlooNetSendRequest> {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            sender: GlooNetSendRequest,
        }
    }
}

impl<S: SendRequest> REST<S> {
    fn url(&self, path: &str) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        if base_url.is_empty() {
            path.to_string()
        } else {
            format!("{base_url}/{path}")
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, RequestError> {
        let request = Request {
            method,
            url: self.url(path),
            body,
        };
        debug!("{} {}", request.method, request.url);
        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|_| domain::StorageError::NoConnection)?;

        if response.ok() {
            return Ok(response);
        }

        match response.status {
            409 => Err(RequestError::Conflict),
            401 | 403 => Err(domain::StorageError::NoSession.into()),
            _ => Err(domain::StorageError::Other(
                format!("{} {}", response.status, response.status_text).into(),
            )
            .into()),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, RequestError> {
        let response = self.send(method, path, body).await?;
        serde_json::from_str::<T>(&response.body)
            .with_context(|| format!("deserialization of response to {method} {path} failed"))
            .map_err(|err| domain::StorageError::Other(err.into()).into())
    }

    async fn read_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, RequestError> {
        Ok(self
            .fetch::<Page<T>>(Method::Get, &format!("{path}?limit=0"), None)
            .await?
            .docs)
    }

    async fn create<T: Serialize + DeserializeOwned>(
        &self,
        path: &str,
        record: &T,
    ) -> Result<T, RequestError> {
        Ok(self
            .fetch::<Doc<T>>(Method::Post, path, Some(to_json(record)?))
            .await?
            .doc)
    }

    async fn replace<T: Serialize + DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        record: &T,
    ) -> Result<T, RequestError> {
        Ok(self
            .fetch::<Doc<T>>(Method::Patch, &format!("{path}/{key}"), Some(to_json(record)?))
            .await?
            .doc)
    }

    async fn delete(&self, path: &str, key: &str) -> Result<(), RequestError> {
        self.send(Method::Delete, &format!("{path}/{key}"), None)
            .await
            .map(|_| ())
    }
}

fn to_json<T: Serialize>(record: &T) -> Result<serde_json::Value, RequestError> {
    serde_json::to_value(record)
        .context("serialization failed")
        .map_err(|err| domain::StorageError::Other(err.into()).into())
}

fn convert<T, U>(records: Vec<T>) -> Result<Vec<U>, RequestError>
where
    U: TryFrom<T, Error = ConversionError>,
{
    Ok(records
        .into_iter()
        .map(U::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

impl<S: SendRequest> domain::WorkoutRepository for REST<S> {
    async fn read_workouts(&self) -> Result<Vec<domain::Workout>, domain::ReadError> {
        let records = self.read_all::<cms::Workout>(WORKOUTS).await?;
        Ok(convert(records)?)
    }

    async fn create_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::Workout, domain::CreateError> {
        let record = self.create(WORKOUTS, &cms::Workout::from(workout)).await?;
        Ok(domain::Workout::try_from(record).map_err(RequestError::from)?)
    }

    async fn replace_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::Workout, domain::UpdateError> {
        let record = self
            .replace(WORKOUTS, &workout.id.to_string(), &cms::Workout::from(workout))
            .await?;
        Ok(domain::Workout::try_from(record).map_err(RequestError::from)?)
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        self.delete(WORKOUTS, &id.to_string()).await?;
        Ok(id)
    }
}

impl<S: SendRequest> domain::GoalRepository for REST<S> {
    async fn read_goals(&self) -> Result<Vec<domain::Goal>, domain::ReadError> {
        let records = self.read_all::<cms::Goal>(GOALS).await?;
        Ok(convert(records)?)
    }

    async fn create_goal(&self, goal: domain::Goal) -> Result<domain::Goal, domain::CreateError> {
        let record = self.create(GOALS, &cms::Goal::from(&goal)).await?;
        Ok(domain::Goal::try_from(record).map_err(RequestError::from)?)
    }

    async fn replace_goal(&self, goal: domain::Goal) -> Result<domain::Goal, domain::UpdateError> {
        let record = self
            .replace(GOALS, &goal.id.to_string(), &cms::Goal::from(&goal))
            .await?;
        Ok(domain::Goal::try_from(record).map_err(RequestError::from)?)
    }

    async fn delete_goal(&self, id: domain::GoalID) -> Result<domain::GoalID, domain::DeleteError> {
        self.delete(GOALS, &id.to_string()).await?;
        Ok(id)
    }
}

impl<S: SendRequest> domain::GoalActivityRepository for REST<S> {
    async fn read_goal_activities(&self) -> Result<Vec<domain::GoalActivity>, domain::ReadError> {
        let records = self.read_all::<cms::GoalActivity>(GOAL_ACTIVITIES).await?;
        Ok(records.into_iter().map(domain::GoalActivity::from).collect())
    }

    async fn create_goal_activity(
        &self,
        activity: domain::GoalActivity,
    ) -> Result<domain::GoalActivity, domain::CreateError> {
        let record = self
            .create(GOAL_ACTIVITIES, &cms::GoalActivity::from(&activity))
            .await?;
        Ok(record.into())
    }

    async fn delete_goal_activity(
        &self,
        id: domain::GoalActivityID,
    ) -> Result<domain::GoalActivityID, domain::DeleteError> {
        self.delete(GOAL_ACTIVITIES, &id.to_string()).await?;
        Ok(id)
    }
}

impl<S: SendRequest> domain::BodyMetricRepository for REST<S> {
    async fn read_body_metrics(&self) -> Result<Vec<domain::BodyMetric>, domain::ReadError> {
        let records = self.read_all::<cms::BodyMetric>(BODY_METRICS).await?;
        Ok(records.into_iter().map(domain::BodyMetric::from).collect())
    }

    async fn create_body_metric(
        &self,
        body_metric: domain::BodyMetric,
    ) -> Result<domain::BodyMetric, domain::CreateError> {
        let record = self
            .create(BODY_METRICS, &cms::BodyMetric::from(&body_metric))
            .await?;
        Ok(record.into())
    }

    async fn replace_body_metric(
        &self,
        body_metric: domain::BodyMetric,
    ) -> Result<domain::BodyMetric, domain::UpdateError> {
        let record = self
            .replace(
                BODY_METRICS,
                &body_metric.date.to_string(),
                &cms::BodyMetric::from(&body_metric),
            )
            .await?;
        Ok(record.into())
    }

    async fn delete_body_metric(
        &self,
        date: NaiveDate,
    ) -> Result<NaiveDate, domain::DeleteError> {
        self.delete(BODY_METRICS, &date.to_string()).await?;
        Ok(date)
    }
}

impl<S: SendRequest> domain::LedgerRepository for REST<S> {
    async fn read_ledger_entries(&self) -> Result<Vec<domain::LedgerEntry>, domain::ReadError> {
        let records = self.read_all::<cms::LedgerEntry>(LEDGER_ENTRIES).await?;
        Ok(convert(records)?)
    }

    async fn create_ledger_entry(
        &self,
        entry: domain::LedgerEntry,
    ) -> Result<domain::LedgerEntry, domain::CreateError> {
        let record = self
            .create(LEDGER_ENTRIES, &cms::LedgerEntry::from(&entry))
            .await?;
        Ok(domain::LedgerEntry::try_from(record).map_err(RequestError::from)?)
    }

    async fn replace_ledger_entry(
        &self,
        entry: domain::LedgerEntry,
    ) -> Result<domain::LedgerEntry, domain::UpdateError> {
        let record = self
            .replace(
                LEDGER_ENTRIES,
                &entry.id.to_string(),
                &cms::LedgerEntry::from(&entry),
            )
            .await?;
        Ok(domain::LedgerEntry::try_from(record).map_err(RequestError::from)?)
    }

    async fn delete_ledger_entry(
        &self,
        id: domain::LedgerEntryID,
    ) -> Result<domain::LedgerEntryID, domain::DeleteError> {
        self.delete(LEDGER_ENTRIES, &id.to_string()).await?;
        Ok(id)
    }
}
