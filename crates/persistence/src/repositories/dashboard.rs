//! Supervisor dashboard repository.

use chrono::Utc;
use domain::models::{AgentClientCount, DashboardSummary, ImportLog};
use sqlx::{PgPool, Row};

use super::import_log::ImportLogRepository;

/// Client counts as read from the clients table.
struct ClientCounts {
    total: i64,
    active: i64,
    inactive: i64,
    without_agent: i64,
}

/// Repository for dashboard aggregates.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the full dashboard summary.
    pub async fn summary(&self) -> Result<DashboardSummary, sqlx::Error> {
        let imports = ImportLogRepository::new(self.pool.clone());

        let (counts, clients_per_agent, last_import) = tokio::try_join!(
            self.client_counts(),
            self.clients_per_agent(),
            imports.latest(),
        )?;

        Ok(DashboardSummary {
            total_clients: counts.total,
            active: counts.active,
            inactive: counts.inactive,
            without_agent: counts.without_agent,
            clients_per_agent,
            last_import: last_import.map(ImportLog::from),
            generated_at: Utc::now(),
        })
    }

    async fn client_counts(&self) -> Result<ClientCounts, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE is_active = true) as active,
                COUNT(*) FILTER (WHERE is_active = false) as inactive,
                COUNT(*) FILTER (WHERE agent_id IS NULL) as without_agent
            FROM clients
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ClientCounts {
            total: row.get::<i64, _>("total"),
            active: row.get::<i64, _>("active"),
            inactive: row.get::<i64, _>("inactive"),
            without_agent: row.get::<i64, _>("without_agent"),
        })
    }

    /// Every agent with its client count, including agents with none.
    async fn clients_per_agent(&self) -> Result<Vec<AgentClientCount>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT sa.id, sa.name, COUNT(c.id) as client_count
            FROM sales_agents sa
            LEFT JOIN clients c ON c.agent_id = sa.id
            GROUP BY sa.id, sa.name
            ORDER BY sa.name, sa.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AgentClientCount {
                agent_id: row.get("id"),
                agent_name: row.get("name"),
                client_count: row.get::<i64, _>("client_count"),
            })
            .collect())
    }
}
