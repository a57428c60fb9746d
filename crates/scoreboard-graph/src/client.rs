//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query, Row, Txn};
use serde::Deserialize;

/// Errors from graph store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Unexpected row shape: {0}")]
    Decode(String),
}

/// Configuration for connecting to Neo4j.
///
/// Loaded from the `[neo4j]` table of `scoreboard.toml` or
/// `SCOREBOARD__NEO4J__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "scoreboard-dev".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Handle to the Neo4j store shared by every registry operation.
///
/// Wraps the driver's pooled `Graph`; cloning shares the pool.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Open the connection pool described by `config`.
    pub async fn connect(config: &GraphConfig) -> Result<Self, StoreError> {
        let driver_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(connection_error)?;
        let graph = Graph::connect(driver_config)
            .await
            .map_err(connection_error)?;

        tracing::info!(uri = %config.uri, user = %config.user, "Neo4j pool ready");
        Ok(Self { graph })
    }

    /// Run a statement whose result rows are not needed.
    pub async fn run(&self, statement: Query) -> Result<(), StoreError> {
        Ok(self.graph.run(statement).await?)
    }

    /// Run a statement and drain every row it yields.
    pub async fn query_rows(&self, statement: Query) -> Result<Vec<Row>, StoreError> {
        let mut stream = self.graph.execute(statement).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run a statement and keep only its first row.
    ///
    /// `None` means the statement matched nothing.
    pub async fn query_one(&self, statement: Query) -> Result<Option<Row>, StoreError> {
        let mut stream = self.graph.execute(statement).await?;
        Ok(stream.next().await?)
    }

    /// Open an explicit transaction for multi-statement writes.
    pub async fn start_txn(&self) -> Result<Txn, StoreError> {
        Ok(self.graph.start_txn().await?)
    }
}

fn connection_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Connection(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.max_connections, 16);
        assert_eq!(config.fetch_size, 256);
    }
}
