use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;

const DEFAULT_SEARCH_PATH: &str = "/usr/local/bin:/usr/bin:/bin";
const DEFAULT_HISTORY_SIZE: usize = 1000;

/// Environment variable holding the `env_logger` filter.
pub const LOG_ENV: &str = "FGSH_LOG";

/// Startup settings, read once from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directories searched, in order, for programs named without a `/`.
    pub search_path: Vec<PathBuf>,
    pub home: Option<PathBuf>,
    pub interactive: bool,
    pub history_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let path = env::var_os("PATH").unwrap_or_else(|| DEFAULT_SEARCH_PATH.into());
        let interactive =
            env::var_os("FGSH_NONINTERACTIVE").is_none() && std::io::stdin().is_terminal();
        let history_size = env::var("FGSH_HISTSIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HISTORY_SIZE);

        Config {
            search_path: parse_search_path(&path),
            home: env::var_os("HOME").map(PathBuf::from),
            interactive,
            history_size,
        }
    }

    /// Non-interactive configuration with an explicit search list.
    pub fn with_search_path(search_path: &str) -> Self {
        Config {
            search_path: parse_search_path(search_path.as_ref()),
            home: env::var_os("HOME").map(PathBuf::from),
            interactive: false,
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

fn parse_search_path(path: &std::ffi::OsStr) -> Vec<PathBuf> {
    env::split_paths(path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .collect()
}
