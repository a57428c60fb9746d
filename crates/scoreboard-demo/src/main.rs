//! Demonstration driver for the Scoreboard match registry.
//!
//! Creates a handful of players, plays one match, prints the derived winner
//! and a player's history, then cleans everything up again.

use std::collections::BTreeMap;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use scoreboard_core::config::{load_section, DEFAULT_ENV_PREFIX, DEFAULT_FILE_PREFIX};
use scoreboard_core::{HistoryEntry, MatchDetail};
use scoreboard_graph::{GraphClient, GraphConfig, MatchRegistry};

#[derive(Parser)]
#[command(name = "scoreboard-demo")]
#[command(about = "Walk through the Scoreboard match registry against a live Neo4j")]
struct Cli {
    /// Config file prefix (default: scoreboard).
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX)]
    config: String,

    /// Override the Neo4j bolt URI.
    #[arg(long)]
    uri: Option<String>,

    /// Override the Neo4j user.
    #[arg(long)]
    user: Option<String>,

    /// Override the Neo4j password.
    #[arg(long)]
    password: Option<String>,

    /// Print match details and history as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Demo failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Acquire the store, run the demo, and release the store on every path.
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let graph_config = load_graph_config(cli)?;
    let client = GraphClient::connect(&graph_config).await?;
    let registry = MatchRegistry::new(client);

    let result = run_demo(&registry, cli.json).await;

    drop(registry);
    tracing::info!("Neo4j connection released");
    result
}

fn load_graph_config(cli: &Cli) -> anyhow::Result<GraphConfig> {
    let mut config: GraphConfig = load_section(&cli.config, DEFAULT_ENV_PREFIX, "neo4j")?;
    if let Some(uri) = &cli.uri {
        config.uri = uri.clone();
    }
    if let Some(user) = &cli.user {
        config.user = user.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    Ok(config)
}

async fn run_demo(registry: &MatchRegistry, json: bool) -> anyhow::Result<()> {
    registry.ensure_schema().await?;

    println!("Creating players...");
    let mut players = Vec::new();
    for name in ["Ana", "Bruno", "Carla", "Davi"] {
        players.push(registry.create_player(name).await?);
    }
    let [ana, bruno, carla, davi] = [players[0], players[1], players[2], players[3]];

    registry.update_player(ana, "Ana Lima").await?;

    println!("\nRegistered players:");
    for player in registry.list_players().await? {
        println!("- {} (id: {})", player.name, player.id);
    }

    println!("\nCreating match...");
    let game = registry.create_match().await?;
    println!("Match created with id: {game}");

    println!("Adding players to the match...");
    for player in &players {
        registry.add_player_to_match(game, *player).await?;
    }

    println!("Recording results...");
    let scores = BTreeMap::from([(ana, 56), (bruno, 85), (carla, 12), (davi, 654)]);
    registry.record_result(game, &scores).await?;

    println!("\nMatch details:");
    match registry.get_match(game).await? {
        Some(detail) if json => println!("{}", serde_json::to_string_pretty(&detail)?),
        Some(detail) => print_match(registry, &detail).await?,
        None => println!("Match not found."),
    }

    println!("\nMatches on record: {}", registry.list_matches().await?.len());

    println!("\nMatch history for Ana:");
    let history = registry.player_history(ana).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        history.iter().for_each(print_history_entry);
    }

    println!("\nDeleting player Bruno (id: {bruno})...");
    registry.delete_player(bruno).await?;
    let still_there = registry.get_player(bruno).await?.is_some();
    println!("Bruno found after deletion: {}", yes_no(still_there));

    println!("Deleting match (id: {game})...");
    registry.delete_match(game).await?;
    let still_there = registry.get_match(game).await?.is_some();
    println!("Match found after deletion: {}", yes_no(still_there));

    for player in [ana, carla, davi] {
        registry.delete_player(player).await?;
    }

    Ok(())
}

async fn print_match(registry: &MatchRegistry, detail: &MatchDetail) -> anyhow::Result<()> {
    println!("ID: {}", detail.id());
    println!("Played at: {}", detail.summary.played_at.to_rfc3339());
    println!("Players:");
    for p in detail.standings() {
        match p.score {
            Some(score) => println!("- {}: {score} points", p.player_name),
            None => println!("- {}: n/a", p.player_name),
        }
    }

    if let Some(winner_id) = detail.summary.winner_id {
        if let Some(winner) = registry.get_player(winner_id).await? {
            println!("Winner: {}", winner.name);
        }
    }
    Ok(())
}

fn print_history_entry(entry: &HistoryEntry) {
    let score = entry
        .player_score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "- Match {}: {score} points ({})",
        entry.detail.id(),
        entry.outcome()
    );
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("scoreboard.toml"),
            "[neo4j]\nuri = \"bolt://graph:7687\"\nuser = \"admin\"\n",
        )
        .unwrap();
        let prefix = dir.path().join("scoreboard");

        let cli = Cli::parse_from([
            "scoreboard-demo",
            "--config",
            prefix.to_str().unwrap(),
            "--password",
            "hunter2",
        ]);
        let config = load_graph_config(&cli).unwrap();
        assert_eq!(config.uri, "bolt://graph:7687");
        assert_eq!(config.user, "admin");
        assert_eq!(config.password, "hunter2");
    }

    #[tokio::test]
    async fn test_bad_config_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("scoreboard.toml"),
            "[neo4j]\nmax_connections = \"lots\"\n",
        )
        .unwrap();
        let prefix = dir.path().join("scoreboard");

        let cli = Cli::parse_from(["scoreboard-demo", "--config", prefix.to_str().unwrap()]);
        let err = run(&cli).await.unwrap_err();
        assert!(format!("{err:#}").contains("Configuration error"));
    }
}
