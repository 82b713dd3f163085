//! Database query and pool metrics.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::future::Future;
use std::time::Instant;

/// Runs a query future and records its duration under `query`.
///
/// Failed queries are additionally counted in `database_query_errors_total`.
pub async fn timed<T, F>(query: &'static str, fut: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let start = Instant::now();
    let result = fut.await;
    histogram!("database_query_duration_seconds", "query" => query)
        .record(start.elapsed().as_secs_f64());
    if result.is_err() {
        counter!("database_query_errors_total", "query" => query).increment(1);
    }
    result
}

/// Publishes connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_total").set(size as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
}
