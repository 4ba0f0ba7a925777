use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Catalogue management HTTP service")]
pub struct Cli {
    /// Address the REST API listens on
    #[arg(
        short = 'l',
        long = "listen",
        env = "CATALOGUE_LISTEN",
        default_value = "127.0.0.1:3001",
        value_name = "ADDR"
    )]
    pub listen: SocketAddr,

    /// Directory holding the SQLite database
    #[arg(
        short = 'd',
        long = "data-dir",
        env = "CATALOGUE_DATA_DIR",
        default_value = "./data",
        value_name = "DIR"
    )]
    pub data_dir: PathBuf,

    /// Also append logs to this file
    #[arg(long = "log-file", env = "CATALOGUE_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Drop the database before starting
    #[arg(long = "reset", default_value_t = false)]
    pub reset: bool,
}

pub fn parse() -> Cli {
    dotenvy::dotenv().ok();
    Cli::parse()
}
