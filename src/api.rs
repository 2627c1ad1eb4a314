//! HTTP client for the Nimbus management APIs.
//!
//! One method per remote operation, parameterized by project and resource
//! identifiers. Exactly one request goes out per CLI invocation; there are
//! no retries and no pagination beyond the single page the service returns.
//!
//! Each service exposes its operations through a small trait so commands
//! can be exercised against a stub in tests.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, CliError};
use crate::models::{
    BackupSchedule, BackupScheduleListResponse, CreateUpdatePayload, Credentials,
    CredentialsListItem, CredentialsListResponse, Server, ServerListResponse, Update,
    UpdateListResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.nimbus-cloud.dev";

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Token comes from NIMBUS_API_TOKEN; the base URL from NIMBUS_API_URL,
    /// then the config file value passed in, then the default endpoint.
    pub fn configure(config_base_url: Option<&str>) -> Result<Self, CliError> {
        let token = std::env::var("NIMBUS_API_TOKEN").map_err(|_| {
            CliError::Auth("NIMBUS_API_TOKEN not set; add it to your environment or .env file".into())
        })?;
        let base_url = std::env::var("NIMBUS_API_URL")
            .ok()
            .or_else(|| config_base_url.map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(base_url, token))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = req.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(ApiError::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json::<T>().await?)
    }

    async fn execute_no_content(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let resp = req.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(ApiError::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

pub(crate) trait ComputeApi {
    async fn list_servers(&self, project_id: &str) -> Result<Vec<Server>, ApiError>;
    async fn get_server(&self, project_id: &str, server_id: &str) -> Result<Server, ApiError>;
}

pub(crate) trait BackupApi {
    async fn list_backup_schedules(
        &self,
        project_id: &str,
        server_id: &str,
    ) -> Result<Vec<BackupSchedule>, ApiError>;
    async fn get_backup_schedule(
        &self,
        project_id: &str,
        server_id: &str,
        schedule_id: &str,
    ) -> Result<BackupSchedule, ApiError>;
    async fn delete_backup_schedule(
        &self,
        project_id: &str,
        server_id: &str,
        schedule_id: &str,
    ) -> Result<(), ApiError>;
}

pub(crate) trait UpdateApi {
    async fn create_update(
        &self,
        project_id: &str,
        server_id: &str,
        payload: &CreateUpdatePayload,
    ) -> Result<Update, ApiError>;
    async fn list_updates(
        &self,
        project_id: &str,
        server_id: &str,
    ) -> Result<Vec<Update>, ApiError>;
}

pub(crate) trait DatabaseApi {
    async fn list_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
    ) -> Result<Vec<CredentialsListItem>, ApiError>;
    async fn create_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
    ) -> Result<Credentials, ApiError>;
    async fn get_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
        credentials_id: &str,
    ) -> Result<Credentials, ApiError>;
    async fn delete_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
        credentials_id: &str,
    ) -> Result<(), ApiError>;
}

impl ComputeApi for ApiClient {
    async fn list_servers(&self, project_id: &str) -> Result<Vec<Server>, ApiError> {
        let url = self.url(&format!("/compute/v1/projects/{project_id}/servers"));
        let resp: ServerListResponse = self.execute(self.http.get(url)).await?;
        Ok(resp.items)
    }

    async fn get_server(&self, project_id: &str, server_id: &str) -> Result<Server, ApiError> {
        let url = self.url(&format!(
            "/compute/v1/projects/{project_id}/servers/{server_id}"
        ));
        self.execute(self.http.get(url)).await
    }
}

impl BackupApi for ApiClient {
    async fn list_backup_schedules(
        &self,
        project_id: &str,
        server_id: &str,
    ) -> Result<Vec<BackupSchedule>, ApiError> {
        let url = self.url(&format!(
            "/serverbackup/v1/projects/{project_id}/servers/{server_id}/backup-schedules"
        ));
        let resp: BackupScheduleListResponse = self.execute(self.http.get(url)).await?;
        Ok(resp.items)
    }

    async fn get_backup_schedule(
        &self,
        project_id: &str,
        server_id: &str,
        schedule_id: &str,
    ) -> Result<BackupSchedule, ApiError> {
        let url = self.url(&format!(
            "/serverbackup/v1/projects/{project_id}/servers/{server_id}/backup-schedules/{schedule_id}"
        ));
        self.execute(self.http.get(url)).await
    }

    async fn delete_backup_schedule(
        &self,
        project_id: &str,
        server_id: &str,
        schedule_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!(
            "/serverbackup/v1/projects/{project_id}/servers/{server_id}/backup-schedules/{schedule_id}"
        ));
        self.execute_no_content(self.http.delete(url)).await
    }
}

impl UpdateApi for ApiClient {
    async fn create_update(
        &self,
        project_id: &str,
        server_id: &str,
        payload: &CreateUpdatePayload,
    ) -> Result<Update, ApiError> {
        let url = self.url(&format!(
            "/serverupdate/v1/projects/{project_id}/servers/{server_id}/updates"
        ));
        self.execute(self.http.post(url).json(payload)).await
    }

    async fn list_updates(
        &self,
        project_id: &str,
        server_id: &str,
    ) -> Result<Vec<Update>, ApiError> {
        let url = self.url(&format!(
            "/serverupdate/v1/projects/{project_id}/servers/{server_id}/updates"
        ));
        let resp: UpdateListResponse = self.execute(self.http.get(url)).await?;
        Ok(resp.items)
    }
}

impl DatabaseApi for ApiClient {
    async fn list_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
    ) -> Result<Vec<CredentialsListItem>, ApiError> {
        let url = self.url(&format!(
            "/database/v1/projects/{project_id}/instances/{instance_id}/credentials"
        ));
        let resp: CredentialsListResponse = self.execute(self.http.get(url)).await?;
        Ok(resp.items)
    }

    async fn create_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
    ) -> Result<Credentials, ApiError> {
        let url = self.url(&format!(
            "/database/v1/projects/{project_id}/instances/{instance_id}/credentials"
        ));
        self.execute(self.http.post(url)).await
    }

    async fn get_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
        credentials_id: &str,
    ) -> Result<Credentials, ApiError> {
        let url = self.url(&format!(
            "/database/v1/projects/{project_id}/instances/{instance_id}/credentials/{credentials_id}"
        ));
        self.execute(self.http.get(url)).await
    }

    async fn delete_credentials(
        &self,
        project_id: &str,
        instance_id: &str,
        credentials_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!(
            "/database/v1/projects/{project_id}/instances/{instance_id}/credentials/{credentials_id}"
        ));
        self.execute_no_content(self.http.delete(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient::new("https://api.nimbus-cloud.dev/", "token");
        assert_eq!(
            client.url("/compute/v1/projects/p1/servers"),
            "https://api.nimbus-cloud.dev/compute/v1/projects/p1/servers"
        );
    }
}
