use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use super::{
    ApiError, CREATE_PATH, DELETE_PATH, ErrorBody, LIST_PATH, ListBody, ProjectApi, ProjectBody,
    UPDATE_PATH,
};
use crate::models::{NewProject, Project, ProjectId};

/// `ProjectApi` over HTTPS using `reqwest`.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `{base}{path}/{id}` with the id percent-encoded as one path segment.
    fn item_url(&self, path: &str, id: &ProjectId) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| ApiError::Transport(format!("invalid API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport("API URL cannot take a path".into()))?
            .push(&id.to_string());
        Ok(url)
    }

    /// Sends the request and sorts the response into success or one of the
    /// two failure kinds.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .unwrap_or_default()
            .message;
        Err(ApiError::Application {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Transport(format!("unreadable response body: {e}")))
    }
}

#[async_trait]
impl ProjectApi for HttpApi {
    async fn list(&self) -> Result<Vec<Project>, ApiError> {
        let response = self.send(self.client.get(self.url(LIST_PATH))).await?;
        let body: ListBody = Self::decode(response).await?;
        Ok(body.into_projects())
    }

    async fn create(&self, project: &NewProject) -> Result<Project, ApiError> {
        let request = self.client.post(self.url(CREATE_PATH)).json(project);
        let response = self.send(request).await?;
        let body: ProjectBody = Self::decode(response).await?;
        Ok(body.proyecto)
    }

    async fn update(&self, project: &Project) -> Result<Project, ApiError> {
        let url = self.item_url(UPDATE_PATH, &project.id)?;
        let response = self.send(self.client.put(url).json(project)).await?;
        let body: ProjectBody = Self::decode(response).await?;
        Ok(body.proyecto)
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError> {
        let url = self.item_url(DELETE_PATH, id)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
