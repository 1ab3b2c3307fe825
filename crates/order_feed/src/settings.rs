use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use base::entities::{AuthToken, RestaurantId, DEFAULT_TARGET_LOGGER, TARGET_LOGGER_ENV};

use crate::session::{
    Credentials, RetrySettings, DEFAULT_NUMBER_OF_LOGIN_RETRIES,
    DEFAULT_SECONDS_TO_SLEEP_BEFORE_LOGIN_RETRY,
};

pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const AUTH_TOKEN_ENV: &str = "AUTH_TOKEN";
pub const RESTAURANT_ID_ENV: &str = "RESTAURANT_ID";
pub const LOGIN_EMAIL_ENV: &str = "LOGIN_EMAIL";
pub const LOGIN_PASSWORD_ENV: &str = "LOGIN_PASSWORD";
pub const POLL_INTERVAL_SECS_ENV: &str = "POLL_INTERVAL_SECS";
pub const CURSOR_FILE_ENV: &str = "CURSOR_FILE";
pub const TICKET_SPOOL_DIR_ENV: &str = "TICKET_SPOOL_DIR";
pub const LOGIN_RETRIES_ENV: &str = "LOGIN_RETRIES";
pub const LOGIN_RETRY_SLEEP_SECS_ENV: &str = "LOGIN_RETRY_SLEEP_SECS";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
pub const DEFAULT_CURSOR_FILE: &str = "order_feed_cursor.json";
pub const DEFAULT_TICKET_SPOOL_DIR: &str = "tickets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSettings {
    Token {
        token: AuthToken,
        restaurant_id: RestaurantId,
    },
    Login {
        email: String,
        password: String,
    },
}

impl AuthSettings {
    pub fn credentials(&self) -> Option<Credentials> {
        match self {
            AuthSettings::Login { email, password } => Some(Credentials {
                email: email.clone(),
                password: password.clone(),
            }),
            AuthSettings::Token { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub backend_url: String,
    pub auth: AuthSettings,
    pub poll_interval: Duration,
    pub cursor_file: PathBuf,
    pub ticket_spool_dir: PathBuf,
    pub target_logger: String,
    pub login_retries: RetrySettings,
}

impl FeedSettings {
    /// Reads the settings from the process environment (and `.env` if already loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| dotenv::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let backend_url = var(BACKEND_URL_ENV)
            .context(format!("{} should be set", BACKEND_URL_ENV))?
            .trim_end_matches('/')
            .to_string();

        let auth = match (var(AUTH_TOKEN_ENV), var(RESTAURANT_ID_ENV)) {
            (Some(token), Some(restaurant_id)) => AuthSettings::Token {
                token,
                restaurant_id,
            },
            (Some(_), None) => bail!(
                "{} requires {} to be set as well",
                AUTH_TOKEN_ENV,
                RESTAURANT_ID_ENV
            ),
            (None, _) => AuthSettings::Login {
                email: var(LOGIN_EMAIL_ENV).context(format!(
                    "either {} or {} should be set",
                    AUTH_TOKEN_ENV, LOGIN_EMAIL_ENV
                ))?,
                password: var(LOGIN_PASSWORD_ENV)
                    .context(format!("{} should be set", LOGIN_PASSWORD_ENV))?,
            },
        };

        let poll_interval_secs: u64 = parse_or_default(
            var(POLL_INTERVAL_SECS_ENV),
            POLL_INTERVAL_SECS_ENV,
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        if poll_interval_secs == 0 {
            bail!("{} should be positive", POLL_INTERVAL_SECS_ENV);
        }

        Ok(Self {
            backend_url,
            auth,
            poll_interval: Duration::from_secs(poll_interval_secs),
            cursor_file: PathBuf::from(
                var(CURSOR_FILE_ENV).unwrap_or_else(|| DEFAULT_CURSOR_FILE.to_string()),
            ),
            ticket_spool_dir: PathBuf::from(
                var(TICKET_SPOOL_DIR_ENV).unwrap_or_else(|| DEFAULT_TICKET_SPOOL_DIR.to_string()),
            ),
            target_logger: var(TARGET_LOGGER_ENV)
                .unwrap_or_else(|| DEFAULT_TARGET_LOGGER.to_string()),
            login_retries: RetrySettings {
                number_of_request_retries: parse_or_default(
                    var(LOGIN_RETRIES_ENV),
                    LOGIN_RETRIES_ENV,
                    DEFAULT_NUMBER_OF_LOGIN_RETRIES,
                )?,
                seconds_to_sleep_before_request_retry: parse_or_default(
                    var(LOGIN_RETRY_SLEEP_SECS_ENV),
                    LOGIN_RETRY_SLEEP_SECS_ENV,
                    DEFAULT_SECONDS_TO_SLEEP_BEFORE_LOGIN_RETRY,
                )?,
            },
        })
    }
}

fn parse_or_default<T>(value: Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .context(format!("invalid {}: {}", name, value)),
    }
}
