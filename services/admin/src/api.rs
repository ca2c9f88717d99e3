//! Users API as seen through the gateway's `/api` prefix.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dto::{ErrorBody, UserWrite};
use models::{User, UserDraft};
use reqwest::{Client, Response, StatusCode, Url};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("Could not reach the server: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Unexpected response from the server: {0}")]
    Decode(#[source] reqwest::Error),
}

/// The four calls the admin screen makes.
///
/// Saves report only success or failure: the screen reloads the list after
/// every save, so the echoed record is never needed.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, ApiError>;
    async fn create(&self, draft: &UserDraft) -> Result<(), ApiError>;
    async fn update(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: UsersApi + ?Sized> UsersApi for Arc<T> {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, draft: &UserDraft) -> Result<(), ApiError> {
        (**self).create(draft).await
    }

    async fn update(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}

/// [`UsersApi`] over HTTP, rooted at `<base>/api/users`.
pub struct HttpUsersApi {
    client: Client,
    users_url: Url,
}

impl HttpUsersApi {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: &Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut users_url = base.clone();
        let prefix = base.path().trim_end_matches('/');
        users_url.set_path(&format!("{prefix}/api/users"));
        users_url.set_query(None);
        Ok(Self { client, users_url })
    }

    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    fn user_url(&self, id: i64) -> Url {
        let mut url = self.users_url.clone();
        url.set_path(&format!("{}/{id}", self.users_url.path()));
        url
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let response = self
            .client
            .get(self.users_url.clone())
            .send()
            .await
            .map_err(ApiError::Transport)?;
        check(response).await?.json().await.map_err(ApiError::Decode)
    }

    async fn create(&self, draft: &UserDraft) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.users_url.clone())
            .json(&UserWrite::from(draft))
            .send()
            .await
            .map_err(ApiError::Transport)?;
        check(response).await.map(drop)
    }

    async fn update(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.user_url(id))
            .json(&UserWrite::from(draft))
            .send()
            .await
            .map_err(ApiError::Transport)?;
        check(response).await.map(drop)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.user_url(id))
            .send()
            .await
            .map_err(ApiError::Transport)?;
        check(response).await.map(drop)
    }
}

/// Pass 2xx responses through; turn anything else into [`ApiError::Status`]
/// carrying the backend's own message when it sent one.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = ErrorBody::parse(&body)
        .and_then(|envelope| envelope.message())
        .unwrap_or_else(|| failure_message(status));
    Err(ApiError::Status { status, message })
}

fn failure_message(status: StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}
