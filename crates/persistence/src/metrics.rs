//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

use crate::error::db_error;
use domain::DomainResult;

/// Records connection pool gauges. Called when metrics are scraped.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one query against a table.
///
/// ```ignore
/// let timer = QueryTimer::new("roles", "find");
/// let row = timer.finish(query.fetch_optional(&pool).await)?;
/// ```
pub struct QueryTimer {
    table: &'static str,
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(table: &'static str, operation: &'static str) -> Self {
        Self {
            table,
            operation,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time and converts the query result into a domain result.
    pub fn finish<T>(self, result: Result<T, sqlx::Error>) -> DomainResult<T> {
        histogram!(
            "database_query_duration_seconds",
            "table" => self.table,
            "operation" => self.operation
        )
        .record(self.start.elapsed().as_secs_f64());

        if result.is_err() {
            counter!(
                "database_query_errors_total",
                "table" => self.table,
                "operation" => self.operation
            )
            .increment(1);
        }

        result.map_err(db_error)
    }
}
