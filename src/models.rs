//! Request and response types for the Nimbus management APIs.
//!
//! These mirror the wire schema of the service endpoints; the schema is
//! versioned with the services and treated as fixed here. Optional fields
//! stay `Option` rather than defaulting, so rendering decides how absence
//! looks.

use serde::{Deserialize, Serialize};

// ---- compute ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub machine_type: Option<String>,
    pub availability_zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerListResponse {
    #[serde(default)]
    pub items: Vec<Server>,
}

// ---- server backup ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupProperties {
    pub name: String,
    pub retention_period: i64,
    pub volume_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSchedule {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub rrule: String,
    pub backup_properties: BackupProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupScheduleListResponse {
    #[serde(default)]
    pub items: Vec<BackupSchedule>,
}

// ---- OS update ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: i64,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub maintenance_window: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateListResponse {
    #[serde(default)]
    pub items: Vec<Update>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdatePayload {
    pub maintenance_window: i64,
}

// ---- database ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsListItem {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsListResponse {
    #[serde(default)]
    pub items: Vec<CredentialsListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub id: String,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub uri: Option<String>,
}
