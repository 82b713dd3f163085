//! Supervisor dashboard models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::import_log::ImportLog;

/// Number of clients owned by one sales agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentClientCount {
    pub agent_id: Uuid,
    pub agent_name: String,
    pub client_count: i64,
}

/// Aggregated client portfolio figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardSummary {
    pub total_clients: i64,
    pub active: i64,
    pub inactive: i64,
    pub without_agent: i64,
    pub clients_per_agent: Vec<AgentClientCount>,
    pub last_import: Option<ImportLog>,
    pub generated_at: DateTime<Utc>,
}
