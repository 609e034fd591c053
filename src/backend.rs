use crate::models::{
    LeaveRequestRecord, NewUser, PunchEvent, RawPunch, UserCountsPatch, UserRecord,
};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend answered {status} for {path}")]
    Status { status: StatusCode, path: String },
    #[error("{0} not found")]
    NotFound(String),
    #[error("backend returned an invalid record: {0}")]
    InvalidRecord(String),
}

impl TryFrom<RawPunch> for PunchEvent {
    type Error = BackendError;

    fn try_from(raw: RawPunch) -> Result<Self, Self::Error> {
        if NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d").is_err() || raw.date.len() != 10 {
            return Err(BackendError::InvalidRecord(format!(
                "punch date {:?} is not YYYY-MM-DD",
                raw.date
            )));
        }
        if raw.timestamp < 0 {
            return Err(BackendError::InvalidRecord(format!(
                "punch timestamp {} is negative",
                raw.timestamp
            )));
        }
        Ok(PunchEvent {
            id: raw.id,
            date: raw.date,
            timestamp: raw.timestamp,
            label: raw.label,
            kind: raw.kind,
        })
    }
}

/// Parses a backend punch listing, rejecting the whole payload if any record is off-schema.
pub fn parse_punches(body: &[u8]) -> Result<Vec<PunchEvent>, BackendError> {
    let raw: Vec<RawPunch> = serde_json::from_slice(body)
        .map_err(|err| BackendError::InvalidRecord(err.to_string()))?;
    raw.into_iter().map(PunchEvent::try_from).collect()
}

/// HTTP client for the user/punch REST backend.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn user(&self, id: &str) -> Result<UserRecord, BackendError> {
        let path = format!("/users/{id}");
        match self.fetch(self.http.get(self.url(&path)), &path).await {
            Err(BackendError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Err(BackendError::NotFound(format!("user {id}"))),
            other => self.decode(other?),
        }
    }

    pub async fn users_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<UserRecord>, BackendError> {
        let request = self
            .http
            .get(self.url("/users"))
            .query(&[("username", username), ("password", password)]);
        self.decode(self.fetch(request, "/users").await?)
    }

    pub async fn users_by_email(&self, email: &str) -> Result<Vec<UserRecord>, BackendError> {
        let request = self.http.get(self.url("/users")).query(&[("email", email)]);
        self.decode(self.fetch(request, "/users").await?)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<UserRecord, BackendError> {
        let request = self.http.post(self.url("/users")).json(user);
        self.decode(self.fetch(request, "/users").await?)
    }

    pub async fn patch_user_counts(
        &self,
        id: &str,
        patch: &UserCountsPatch,
    ) -> Result<(), BackendError> {
        let path = format!("/users/{id}");
        self.fetch(self.http.patch(self.url(&path)).json(patch), &path)
            .await?;
        Ok(())
    }

    /// All punches of a user, optionally narrowed to one business date by the backend.
    pub async fn punches(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<PunchEvent>, BackendError> {
        let mut query = vec![("userId", user_id.to_string())];
        if let Some(date) = date {
            query.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        let request = self.http.get(self.url("/pontos")).query(&query);
        let body = self.fetch(request, "/pontos").await?;
        let punches = parse_punches(&body)?;
        debug!(user_id, count = punches.len(), "loaded punches");
        Ok(punches)
    }

    pub async fn create_punch(&self, punch: &RawPunch) -> Result<PunchEvent, BackendError> {
        let request = self.http.post(self.url("/pontos")).json(punch);
        let raw: RawPunch = self.decode(self.fetch(request, "/pontos").await?)?;
        PunchEvent::try_from(raw)
    }

    pub async fn create_leave_request(
        &self,
        leave: &LeaveRequestRecord,
    ) -> Result<LeaveRequestRecord, BackendError> {
        let request = self.http.post(self.url("/abonos")).json(leave);
        self.decode(self.fetch(request, "/abonos").await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn fetch(&self, request: RequestBuilder, path: &str) -> Result<Vec<u8>, BackendError> {
        let response = request.send().await.map_err(|err| {
            warn!("backend request to {path} failed: {err}");
            BackendError::Transport(err)
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!("backend answered {status} for {path}");
            return Err(BackendError::Status {
                status,
                path: path.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    fn decode<T: DeserializeOwned>(&self, body: Vec<u8>) -> Result<T, BackendError> {
        serde_json::from_slice(&body).map_err(|err| BackendError::InvalidRecord(err.to_string()))
    }
}
