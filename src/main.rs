use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use watch_snake::game::GameConfig;
use watch_snake::logging::init_tracing;
use watch_snake::modes::PlayMode;

#[derive(Parser)]
#[command(name = "watch_snake")]
#[command(version, about = "Swipe-controlled Snake for small square displays")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// How often the game loop polls, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Time between snake moves, in milliseconds
    #[arg(long)]
    move_interval_ms: Option<u64>,

    /// Stop after this many finished games (0 = keep playing)
    #[arg(long, default_value = "0")]
    max_games: u32,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::read_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(poll) = self.poll_interval_ms {
            config.poll_interval_ms = poll;
        }
        if let Some(step) = self.move_interval_ms {
            config.move_interval_ms = step;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.game_config()?;
    let mut play_mode = PlayMode::new(config, cli.max_games)?;
    play_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn test_flags_override_file_before_validation() {
        let file = config_file(r#"{ "grid_size": 1, "move_interval_ms": 200 }"#);
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["watch_snake", "--config", path, "--grid-size", "16"]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_size, 16);
        assert_eq!(config.move_interval_ms, 200);
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let file = config_file(r#"{ "grid_size": 1 }"#);
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["watch_snake", "--config", path]);
        assert!(cli.game_config().is_err());
    }

    #[test]
    fn test_defaults_without_file() {
        let cli = Cli::parse_from(["watch_snake", "--move-interval-ms", "250"]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_size, 16);
        assert_eq!(config.move_interval_ms, 250);
    }
}
