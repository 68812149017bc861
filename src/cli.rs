//! Command-line interface for gem-cascade.

use std::path::PathBuf;

use clap::Parser;

use gem_cascade::types::Difficulty;

/// Gem Cascade - terminal match-3
#[derive(Parser, Debug)]
#[command(name = "gem-cascade")]
#[command(about = "Swap gems, chain specials, beat the target score", long_about = None)]
#[command(version)]
pub struct Cli {
    /// RNG seed (defaults to the clock)
    #[arg(long)]
    pub seed: Option<u32>,

    /// 1-based level to start on
    #[arg(short, long, default_value = "1")]
    pub level: usize,

    /// easy, normal or hard
    #[arg(short, long, default_value = "normal", value_parser = parse_difficulty)]
    pub difficulty: Difficulty,

    /// JSON file holding an array of level configs (camelCase keys)
    #[arg(long)]
    pub levels: Option<PathBuf>,

    /// Where tracing output goes; the terminal belongs to the game
    #[arg(long, default_value = "gem-cascade.log")]
    pub log_file: PathBuf,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["gem-cascade"]);
        assert_eq!(cli.level, 1);
        assert_eq!(cli.difficulty, Difficulty::Normal);
        assert!(cli.seed.is_none());
        assert!(cli.levels.is_none());
    }

    #[test]
    fn difficulty_is_case_insensitive() {
        let cli = Cli::parse_from(["gem-cascade", "-d", "HARD", "--seed", "9"]);
        assert_eq!(cli.difficulty, Difficulty::Hard);
        assert_eq!(cli.seed, Some(9));
        assert!(Cli::try_parse_from(["gem-cascade", "-d", "brutal"]).is_err());
    }
}
