use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ShowcaseError>;

#[derive(Debug)]
pub enum ShowcaseError {
    /// Reading a file from disk failed
    Io { path: PathBuf, source: std::io::Error },
    /// Config file exists but is not valid TOML for ShowcaseConfig
    ConfigParse { path: PathBuf, source: toml::de::Error },
    /// Config values parsed but make no sense together
    InvalidConfig(String),
    /// Command line could not be parsed
    Cli(String),
    /// Flame layer could not create its output file
    Tracing(String),
}

impl fmt::Display for ShowcaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowcaseError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            ShowcaseError::ConfigParse { path, source } => {
                write!(f, "Invalid config {}: {}", path.display(), source)
            }
            ShowcaseError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            ShowcaseError::Cli(msg) => write!(f, "Command line error: {}", msg),
            ShowcaseError::Tracing(msg) => write!(f, "Tracing setup failed: {}", msg),
        }
    }
}

impl std::error::Error for ShowcaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShowcaseError::Io { source, .. } => Some(source),
            ShowcaseError::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<pico_args::Error> for ShowcaseError {
    fn from(err: pico_args::Error) -> Self {
        ShowcaseError::Cli(err.to_string())
    }
}
