// ⚙️ Configuration - command line + environment

use crate::catalogue::DEFAULT_PAGE_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://assets.pokemon.com/assets/cms2/img/pokedex/full";

#[derive(Parser, Debug)]
#[command(name = "dex-viewer")]
#[command(about = "Browse, sort and filter the creature catalogue", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, env = "DEX_API_BASE_URL", default_value = DEFAULT_API_BASE_URL, global = true)]
    pub api_base_url: String,

    #[arg(long, env = "DEX_IMAGE_BASE_URL", default_value = DEFAULT_IMAGE_BASE_URL, global = true)]
    pub image_base_url: String,

    /// Entries requested per page
    #[arg(
        long,
        env = "DEX_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE as u16,
        value_parser = clap::value_parser!(u16).range(1..),
        global = true
    )]
    pub page_size: u16,

    /// Per-request timeout
    #[arg(long, env = "DEX_TIMEOUT_SECS", default_value_t = 10, global = true)]
    pub timeout_secs: u64,

    /// Write logs here (the TUI logs nowhere otherwise)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive catalogue (default)
    Tui,

    /// Load pages and print the displayed subset
    List {
        #[arg(long, default_value_t = 1)]
        pages: usize,

        #[arg(long, default_value = "")]
        query: String,

        /// id-asc, id-desc, name-asc or name-desc
        #[arg(long, default_value = "id-asc")]
        sort: String,
    },

    /// Print the detail overlay for one identifier
    Show { id: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub image_base_url: String,
    pub page_size: usize,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(10),
            log_file: None,
        }
    }
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.api_base_url.clone(),
            image_base_url: self.image_base_url.clone(),
            page_size: self.page_size as usize,
            timeout: Duration::from_secs(self.timeout_secs),
            log_file: self.log_file.clone(),
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dex-viewer"]).unwrap();

        assert_eq!(cli.command(), Command::Tui);
        assert_eq!(cli.config().page_size, 10);
        assert_eq!(cli.config().image_base_url, DEFAULT_IMAGE_BASE_URL);
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::try_parse_from([
            "dex-viewer", "list", "--pages", "3", "--query", "saur", "--sort", "name-desc",
            "--page-size", "20",
        ])
        .unwrap();

        assert_eq!(
            cli.command(),
            Command::List {
                pages: 3,
                query: "saur".to_string(),
                sort: "name-desc".to_string(),
            }
        );
        assert_eq!(cli.config().page_size, 20);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["dex-viewer", "--page-size", "0"]).is_err());
    }

    #[test]
    fn test_show_takes_an_id() {
        let cli = Cli::try_parse_from(["dex-viewer", "show", "25"]).unwrap();
        assert_eq!(cli.command(), Command::Show { id: 25 });
    }
}
