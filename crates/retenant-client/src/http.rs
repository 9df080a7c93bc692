//! HTTP repository
//!
//! Thin JSON client over the remote platform's API. Every call is one
//! blocking round trip; non-success statuses become [`ClientError::Api`] and
//! abort the run. `create_or_modify_*` reads the collection and posts only
//! when no entity of that name exists, matching the platform's own
//! upsert-by-name behaviour.

use crate::repository::{same_name, ClientError, Repository};
use async_trait::async_trait;
use retenant_model::{
    Channel, Environment, LibraryVariableSet, Lifecycle, Machine, Project, TagSet, Tenant,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

const API_KEY_HEADER: &str = "X-API-Key";

/// [`Repository`] implementation backed by the remote platform's HTTP API
#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpRepository {
    /// Create a client for the given server, e.g. `https://deploy.example.com`
    #[must_use]
    pub fn new(server: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: server.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn success(
        method: &'static str,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            method,
            path: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        Ok(Self::success("GET", path, response).await?.json().await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(Self::success("POST", path, response).await?.json().await?)
    }

    async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        tracing::debug!(path, "PUT");
        let response = self
            .client
            .put(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        Self::success("PUT", path, response).await?;
        Ok(())
    }

    async fn create_or_modify<T, F>(
        &self,
        collection: &str,
        name: &str,
        name_of: F,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> &str,
    {
        let existing: Vec<T> = self.get_json(&format!("/api/{collection}/all")).await?;
        if let Some(found) = existing
            .into_iter()
            .find(|entity| same_name(name_of(entity), name))
        {
            return Ok(found);
        }
        self.post_json(
            &format!("/api/{collection}"),
            &serde_json::json!({ "Name": name }),
        )
        .await
    }
}

#[async_trait]
impl Repository for HttpRepository {
    async fn environments(&self) -> Result<Vec<Environment>, ClientError> {
        self.get_json("/api/environments/all").await
    }

    async fn tenants(&self) -> Result<Vec<Tenant>, ClientError> {
        self.get_json("/api/tenants/all").await
    }

    async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        self.get_json("/api/projects/all").await
    }

    async fn lifecycles(&self) -> Result<Vec<Lifecycle>, ClientError> {
        self.get_json("/api/lifecycles/all").await
    }

    async fn channels(&self) -> Result<Vec<Channel>, ClientError> {
        self.get_json("/api/channels/all").await
    }

    async fn machines(&self) -> Result<Vec<Machine>, ClientError> {
        self.get_json("/api/machines/all").await
    }

    async fn tag_sets(&self) -> Result<Vec<TagSet>, ClientError> {
        self.get_json("/api/tagsets/all").await
    }

    async fn library_variable_sets(&self) -> Result<Vec<LibraryVariableSet>, ClientError> {
        self.get_json("/api/libraryvariablesets/all").await
    }

    async fn create_or_modify_environment(&self, name: &str) -> Result<Environment, ClientError> {
        self.create_or_modify("environments", name, |env: &Environment| env.name.as_str())
            .await
    }

    async fn create_or_modify_tenant(&self, name: &str) -> Result<Tenant, ClientError> {
        self.create_or_modify("tenants", name, |tenant: &Tenant| tenant.name.as_str())
            .await
    }

    async fn create_or_modify_tag_set(&self, name: &str) -> Result<TagSet, ClientError> {
        self.create_or_modify("tagsets", name, |set: &TagSet| set.name.as_str())
            .await
    }

    async fn create_or_modify_library_variable_set(
        &self,
        name: &str,
    ) -> Result<LibraryVariableSet, ClientError> {
        self.create_or_modify("libraryvariablesets", name, |set: &LibraryVariableSet| {
            set.name.as_str()
        })
        .await
    }

    async fn modify_lifecycle(&self, lifecycle: &Lifecycle) -> Result<(), ClientError> {
        self.put_json(&format!("/api/lifecycles/{}", lifecycle.id), lifecycle)
            .await
    }

    async fn modify_project(&self, project: &Project) -> Result<(), ClientError> {
        self.put_json(&format!("/api/projects/{}", project.id), project)
            .await
    }

    async fn modify_tenant(&self, tenant: &Tenant) -> Result<(), ClientError> {
        self.put_json(&format!("/api/tenants/{}", tenant.id), tenant)
            .await
    }

    async fn modify_machine(&self, machine: &Machine) -> Result<(), ClientError> {
        self.put_json(&format!("/api/machines/{}", machine.id), machine)
            .await
    }

    async fn modify_tag_set(&self, tag_set: &TagSet) -> Result<(), ClientError> {
        self.put_json(&format!("/api/tagsets/{}", tag_set.id), tag_set)
            .await
    }

    async fn modify_library_variable_set(
        &self,
        set: &LibraryVariableSet,
    ) -> Result<(), ClientError> {
        self.put_json(&format!("/api/libraryvariablesets/{}", set.id), set)
            .await
    }
}
