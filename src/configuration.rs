use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Clone)]
pub struct Configuration {
    pub listen: SocketAddr,
    pub data_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub reset: bool,
}

impl Configuration {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            listen: cli.listen,
            data_dir: cli.data_dir.clone(),
            log_file: cli.log_file.clone(),
            reset: cli.reset,
        }
    }
}
