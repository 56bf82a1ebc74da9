// Run configuration: input locations and the dashboard listen address
// Defaults are fixed; there is no CLI or environment surface

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const CHARACTERS_FILE: &str = "characters.grivg.csv";
pub const GAMES_FILE: &str = "games.grivg.csv";
pub const SEXUALIZATION_FILE: &str = "sexualization.grivg.csv";
pub const DEVELOPERS_FILE: &str = "video_game_developers_worldwide2014_2021.csv";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LISTEN_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8050);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub characters_path: PathBuf,
    pub games_path: PathBuf,
    pub sexualization_path: PathBuf,
    pub developers_path: PathBuf,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// All four inputs under one directory, with their standard file names
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Config {
            characters_path: dir.join(CHARACTERS_FILE),
            games_path: dir.join(GAMES_FILE),
            sexualization_path: dir.join(SEXUALIZATION_FILE),
            developers_path: dir.join(DEVELOPERS_FILE),
            listen_addr: SocketAddr::from(DEFAULT_LISTEN_ADDR),
        }
    }

    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::with_data_dir(DEFAULT_DATA_DIR)
    }
}
