use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_FILE_ENV: &str = "LOG_FILE";

pub const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

const CONSOLE_APPENDER: &str = "console";
const FILE_APPENDER: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file: None,
        }
    }
}

impl LoggingSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| dotenv::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let level = match var(LOG_LEVEL_ENV) {
            None => LevelFilter::Info,
            Some(level) => LevelFilter::from_str(level.trim())
                .map_err(|_| anyhow!("invalid {}: {}", LOG_LEVEL_ENV, level))?,
        };

        Ok(Self {
            level,
            file: var(LOG_FILE_ENV).map(PathBuf::from),
        })
    }
}

/// Logs go to stderr so that they do not interleave with the operator console on stdout.
pub fn build_config(settings: &LoggingSettings) -> Result<Config> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder()
        .appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut root = Root::builder().appender(CONSOLE_APPENDER);

    if let Some(path) = &settings.file {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)
            .context(format!("failed to open the log file {}", path.display()))?;

        config = config.appender(Appender::builder().build(FILE_APPENDER, Box::new(file)));
        root = root.appender(FILE_APPENDER);
    }

    config
        .build(root.build(settings.level))
        .context("invalid logging config")
}

pub fn init_logging(settings: &LoggingSettings) -> Result<log4rs::Handle> {
    let config = build_config(settings)?;
    log4rs::init_config(config).context("failed to initialize logging")
}
