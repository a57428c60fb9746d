//! Schema bootstrap: uniqueness constraints for node identifiers.

use neo4rs::query;

use crate::client::StoreError;
use crate::registry::MatchRegistry;

impl MatchRegistry {
    /// Create the `id` uniqueness constraints if they do not exist yet.
    ///
    /// Safe to call on every startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for (name, label) in [("player_id_unique", "Player"), ("match_id_unique", "Match")] {
            let cypher = constraint_cypher(name, label);
            self.client.run(query(&cypher)).await?;
        }
        tracing::info!("Schema constraints ensured");
        Ok(())
    }
}

fn constraint_cypher(name: &str, label: &str) -> String {
    format!("CREATE CONSTRAINT {name} IF NOT EXISTS FOR (n:{label}) REQUIRE n.id IS UNIQUE")
}
