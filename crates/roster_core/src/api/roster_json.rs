//! JSON API for team and roster operations
//!
//! String-in, string-out handlers over a [`RosterService`]. Every response is
//! an [`ApiResponse`] envelope; failures carry the stable error code of the
//! underlying error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{ServiceError, StoreError};
use crate::models::{RosterSlot, Team, TeamSettings};
use crate::service::{RosterService, RosterView};
use crate::store::{PlayerDirectory, TeamStore};

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured API error with codes and details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    pub schema_version: Option<String>,
    #[serde(flatten)]
    pub settings: TeamSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRosterRequest {
    pub schema_version: Option<String>,
    pub team_id: Uuid,
}

/// Add or move request: put `player_id` into `roster_slot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotPlayerRequest {
    pub schema_version: Option<String>,
    pub team_id: Uuid,
    pub player_id: String,
    pub roster_slot: RosterSlot,
    /// Version the client last read; the write fails if the team moved on.
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovePlayerRequest {
    pub schema_version: Option<String>,
    pub team_id: Uuid,
    pub player_id: String,
    pub expected_version: Option<u64>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: None }
    }

    pub fn with_detail(mut self, key: &str, value: serde_json::Value) -> Self {
        self.details.get_or_insert_with(HashMap::new).insert(key.to_string(), value);
        self
    }

    pub fn from_service_error(err: &ServiceError) -> Self {
        let api_error =
            Self::new(err.code(), &err.to_string()).with_detail("recoverable", json!(err.is_recoverable()));

        match err {
            ServiceError::Store(StoreError::VersionConflict { expected, found, .. }) => api_error
                .with_detail("expected_version", json!(expected))
                .with_detail("current_version", json!(found)),
            _ => api_error,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::from_service_error(&err)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

fn parse_request<R: for<'de> Deserialize<'de>>(request_json: &str, kind: &str) -> Result<R, ApiError> {
    serde_json::from_str(request_json).map_err(|e| {
        error!("Failed to parse {}: {}", kind, e);
        ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e))
    })
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> String {
    let response = match result {
        Ok(data) => ApiResponse::success(data),
        Err(error) => ApiResponse::error(error),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

fn log_failure(action: &str, err: &ServiceError) {
    if err.is_recoverable() {
        warn!("{} rejected [{}]: {}", action, err.code(), err);
    } else {
        error!("{} failed [{}]: {}", action, err.code(), err);
    }
}

/// Create a team from a JSON `CreateTeamRequest`.
///
/// # Returns
/// JSON string containing `ApiResponse<Team>`
pub fn create_team_json<S: TeamStore, D: PlayerDirectory>(request_json: &str, service: &RosterService<S, D>) -> String {
    info!("Processing team creation request");

    respond::<Team>(parse_request::<CreateTeamRequest>(request_json, "CreateTeamRequest").and_then(|request| {
        service.create_team(request.settings).map_err(|err| {
            log_failure("Team creation", &err);
            ApiError::from(err)
        })
    }))
}

/// Fetch the roster view of a team.
///
/// # Returns
/// JSON string containing `ApiResponse<RosterView>`
pub fn get_roster_json<S: TeamStore, D: PlayerDirectory>(request_json: &str, service: &RosterService<S, D>) -> String {
    respond::<RosterView>(parse_request::<GetRosterRequest>(request_json, "GetRosterRequest").and_then(|request| {
        service.roster_view(request.team_id).map_err(|err| {
            log_failure("Roster fetch", &err);
            ApiError::from(err)
        })
    }))
}

pub fn add_player_json<S: TeamStore, D: PlayerDirectory>(request_json: &str, service: &RosterService<S, D>) -> String {
    info!("Processing add-player request");

    respond::<RosterView>(parse_request::<SlotPlayerRequest>(request_json, "SlotPlayerRequest").and_then(|request| {
        service
            .add_player(request.team_id, &request.player_id, request.roster_slot, request.expected_version)
            .map_err(|err| {
                log_failure("Add player", &err);
                ApiError::from(err)
            })
    }))
}

pub fn move_player_json<S: TeamStore, D: PlayerDirectory>(request_json: &str, service: &RosterService<S, D>) -> String {
    info!("Processing move-player request");

    respond::<RosterView>(parse_request::<SlotPlayerRequest>(request_json, "SlotPlayerRequest").and_then(|request| {
        service
            .move_player(request.team_id, &request.player_id, request.roster_slot, request.expected_version)
            .map_err(|err| {
                log_failure("Move player", &err);
                ApiError::from(err)
            })
    }))
}

pub fn remove_player_json<S: TeamStore, D: PlayerDirectory>(request_json: &str, service: &RosterService<S, D>) -> String {
    info!("Processing remove-player request");

    respond::<RosterView>(parse_request::<RemovePlayerRequest>(request_json, "RemovePlayerRequest").and_then(
        |request| {
            service.remove_player(request.team_id, &request.player_id, request.expected_version).map_err(|err| {
                log_failure("Remove player", &err);
                ApiError::from(err)
            })
        },
    ))
}
