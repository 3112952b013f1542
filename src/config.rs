//! Application configuration parsed from build-time environment variables.
//!
//! The browser has no runtime environment, so the app reads values baked in
//! with `option_env!`. [`AppConfig::from_lookup`] takes any key lookup and is
//! what tests drive.

use log::LevelFilter;

use crate::state::session::{DEFAULT_SESSION_KEY, DEFAULT_TOKEN_KEY, RegisterPolicy, StorageKeys};
use crate::util::theme::ThemeMode;

pub const DEFAULT_APP_NAME: &str = "Scrapeboard";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_API_TIMEOUT_MS: u32 = 10_000;
pub const DEFAULT_THEME_STORAGE_KEY: &str = "theme_mode";
pub const DEFAULT_URLS_PAGE_SIZE: u32 = 5;
pub const DEFAULT_LINKS_PAGE_SIZE: u32 = 10;

/// Debug builds count as development unless `APP_ENV` says otherwise.
fn default_environment() -> &'static str {
    if cfg!(debug_assertions) { "development" } else { "production" }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown REGISTER_POLICY: {0} (expected 'return_to_login' or 'sign_in')")]
    RegisterPolicy(String),
    #[error("{key} must be greater than zero")]
    ZeroPageSize { key: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    pub api_base_url: String,
    pub api_timeout_ms: u32,
    pub storage_keys: StorageKeys,
    pub theme_storage_key: String,
    pub default_theme: ThemeMode,
    pub enable_registration: bool,
    pub register_policy: RegisterPolicy,
    pub enable_password_reset: bool,
    pub enable_scrape: bool,
    pub urls_page_size: u32,
    pub links_page_size: u32,
    pub environment: String,
    pub debug_mode: bool,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_owned(),
            app_version: env!("CARGO_PKG_VERSION").to_owned(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_timeout_ms: DEFAULT_API_TIMEOUT_MS,
            storage_keys: StorageKeys::default(),
            theme_storage_key: DEFAULT_THEME_STORAGE_KEY.to_owned(),
            default_theme: ThemeMode::Light,
            enable_registration: true,
            register_policy: RegisterPolicy::ReturnToLogin,
            enable_password_reset: true,
            enable_scrape: true,
            urls_page_size: DEFAULT_URLS_PAGE_SIZE,
            links_page_size: DEFAULT_LINKS_PAGE_SIZE,
            environment: default_environment().to_owned(),
            debug_mode: false,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Build typed config from a key lookup.
    ///
    /// Every key is optional. Unparseable numbers and booleans fall back to
    /// their defaults; empty values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown `REGISTER_POLICY` or a page
    /// size of zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let urls_page_size = parse_page_size(get("URLS_PAGE_SIZE").as_deref(), "URLS_PAGE_SIZE", DEFAULT_URLS_PAGE_SIZE)?;
        let links_page_size =
            parse_page_size(get("LINKS_PAGE_SIZE").as_deref(), "LINKS_PAGE_SIZE", DEFAULT_LINKS_PAGE_SIZE)?;

        Ok(Self {
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_owned()),
            app_version: get("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned()),
            api_base_url: get("API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            api_timeout_ms: parse_u32(get("API_TIMEOUT_MS").as_deref(), DEFAULT_API_TIMEOUT_MS),
            storage_keys: StorageKeys {
                session: get("AUTH_SESSION_KEY").unwrap_or_else(|| DEFAULT_SESSION_KEY.to_owned()),
                token: get("AUTH_TOKEN_KEY").unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_owned()),
            },
            theme_storage_key: get("THEME_STORAGE_KEY").unwrap_or_else(|| DEFAULT_THEME_STORAGE_KEY.to_owned()),
            default_theme: get("DEFAULT_THEME").map_or(ThemeMode::Light, |v| ThemeMode::parse(&v)),
            enable_registration: parse_bool(get("ENABLE_REGISTRATION").as_deref(), true),
            register_policy: parse_register_policy(get("REGISTER_POLICY").as_deref())?,
            enable_password_reset: parse_bool(get("ENABLE_PASSWORD_RESET").as_deref(), true),
            enable_scrape: parse_bool(get("ENABLE_SCRAPE").as_deref(), true),
            urls_page_size,
            links_page_size,
            environment: get("APP_ENV")
                .map_or_else(|| default_environment().to_owned(), |v| v.trim().to_ascii_lowercase()),
            debug_mode: parse_bool(get("DEBUG_MODE").as_deref(), false),
            log_level: parse_log_level(get("LOG_LEVEL").as_deref()),
        })
    }

    /// Development builds, or any build with `DEBUG_MODE=true`.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.debug_mode
    }

    /// Config baked in at compile time.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| build_env(key).map(str::to_owned))
    }
}

fn build_env(key: &str) -> Option<&'static str> {
    match key {
        "APP_NAME" => option_env!("APP_NAME"),
        "APP_VERSION" => option_env!("APP_VERSION"),
        "API_BASE_URL" => option_env!("API_BASE_URL"),
        "API_TIMEOUT_MS" => option_env!("API_TIMEOUT_MS"),
        "AUTH_SESSION_KEY" => option_env!("AUTH_SESSION_KEY"),
        "AUTH_TOKEN_KEY" => option_env!("AUTH_TOKEN_KEY"),
        "THEME_STORAGE_KEY" => option_env!("THEME_STORAGE_KEY"),
        "DEFAULT_THEME" => option_env!("DEFAULT_THEME"),
        "ENABLE_REGISTRATION" => option_env!("ENABLE_REGISTRATION"),
        "REGISTER_POLICY" => option_env!("REGISTER_POLICY"),
        "ENABLE_PASSWORD_RESET" => option_env!("ENABLE_PASSWORD_RESET"),
        "ENABLE_SCRAPE" => option_env!("ENABLE_SCRAPE"),
        "URLS_PAGE_SIZE" => option_env!("URLS_PAGE_SIZE"),
        "LINKS_PAGE_SIZE" => option_env!("LINKS_PAGE_SIZE"),
        "APP_ENV" => option_env!("APP_ENV"),
        "DEBUG_MODE" => option_env!("DEBUG_MODE"),
        "LOG_LEVEL" => option_env!("LOG_LEVEL"),
        _ => None,
    }
}

fn parse_u32(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok()).unwrap_or(default)
}

fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "true" => true,
        Some(v) if v == "false" => false,
        _ => default,
    }
}

fn parse_page_size(raw: Option<&str>, key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match parse_u32(raw, default) {
        0 => Err(ConfigError::ZeroPageSize { key }),
        n => Ok(n),
    }
}

fn parse_register_policy(raw: Option<&str>) -> Result<RegisterPolicy, ConfigError> {
    match raw.map(str::trim).unwrap_or("return_to_login") {
        "return_to_login" => Ok(RegisterPolicy::ReturnToLogin),
        "sign_in" => Ok(RegisterPolicy::SignIn),
        other => Err(ConfigError::RegisterPolicy(other.to_owned())),
    }
}

fn parse_log_level(raw: Option<&str>) -> LevelFilter {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("debug") => LevelFilter::Debug,
        Some("warn") => LevelFilter::Warn,
        Some("error") => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
