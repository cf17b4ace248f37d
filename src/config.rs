use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use config::{Config, File};
use serde::Deserialize;
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "settings.yml";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_JWT_EXPIRES_IN: Duration = Duration::from_secs(60 * 60);

const APP_PORT_ENV: &str = "APP_PORT";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DB_HOST_ENV: &str = "DB_HOST";
const DB_PORT_ENV: &str = "DB_PORT";
const DB_USER_ENV: &str = "DB_USER";
const DB_PASSWORD_ENV: &str = "DB_PASSWORD";
const DB_NAME_ENV: &str = "DB_NAME";
const REDIS_HOST_ENV: &str = "REDIS_HOST";
const REDIS_PORT_ENV: &str = "REDIS_PORT";
const JWT_SECRET_ENV: &str = "JWT_SECRET";
const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";

pub struct Settings {
    pub port: u16,
    pub database_url: Url,
    /// None selects the in-process cache
    pub redis_url: Option<Url>,
    pub jwt: JwtSettings,
}

pub struct JwtSettings {
    pub secret: String,
    pub expires_in: Duration,
}

/// Fallback values read from `settings.yml`; every key is optional
#[derive(Deserialize, Default)]
struct FileConfig {
    app_port: Option<u16>,
    db_name: Option<String>,
    db_host: Option<String>,
    db_port: Option<u16>,
    db_user: Option<String>,
    db_pass: Option<String>,
    redis_host: Option<String>,
    redis_port: Option<u16>,
    jwt_secret: Option<String>,
    jwt_expires_in: Option<String>,
}

fn load_file_config() -> Result<FileConfig> {
    let settings = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false))
        .build()
        .map_err(|e| anyhow!("Failed to read config file: {e}"))?;

    settings
        .try_deserialize::<FileConfig>()
        .map_err(|e| anyhow!("Failed to deserialize config file: {e}"))
}

/// Parse `3600`, `90s`, `15m`, `1h` or `7d`
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| anyhow!("invalid duration `{raw}`"))?;
    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => bail!("unknown duration unit in `{raw}`"),
    };

    value
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow!("duration `{raw}` is too large"))
}

/// Resolve each setting from env, then the config file, then a default
struct Resolver<F> {
    env: F,
    file: FileConfig,
}

impl<F> Resolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Parse an env variable if set; an unparsable value is an error rather than a fallback
    fn env_parsed<T, P>(&self, key: &str, parse: P) -> Result<Option<T>>
    where
        P: FnOnce(&str) -> Result<T>,
    {
        (self.env)(key)
            .map(|raw| parse(&raw).map_err(|e| anyhow!("Failed to parse {key}: {e}")))
            .transpose()
    }

    fn port(&self) -> Result<u16> {
        let env = self.env_parsed(APP_PORT_ENV, |raw| Ok(raw.parse::<u16>()?))?;
        Ok(env.or(self.file.app_port).unwrap_or_else(|| {
            tracing::warn!("{APP_PORT_ENV} is not set, using default port {DEFAULT_PORT}");
            DEFAULT_PORT
        }))
    }

    fn database_url(&self) -> Result<Url> {
        if let Some(url) = self.env_parsed(DATABASE_URL_ENV, |raw| Ok(Url::parse(raw)?))? {
            return Ok(url);
        }

        tracing::debug!("{DATABASE_URL_ENV} is not set, assembling it from DB_* settings");
        let host = (self.env)(DB_HOST_ENV)
            .or_else(|| self.file.db_host.clone())
            .unwrap_or_else(|| "localhost".to_string());
        let port = self
            .env_parsed(DB_PORT_ENV, |raw| Ok(raw.parse::<u16>()?))?
            .or(self.file.db_port)
            .unwrap_or(DEFAULT_DB_PORT);
        let user = (self.env)(DB_USER_ENV)
            .or_else(|| self.file.db_user.clone())
            .ok_or_else(|| anyhow!("{DB_USER_ENV} is not set"))?;
        let pass = (self.env)(DB_PASSWORD_ENV)
            .or_else(|| self.file.db_pass.clone())
            .unwrap_or_default();
        let name = (self.env)(DB_NAME_ENV)
            .or_else(|| self.file.db_name.clone())
            .ok_or_else(|| anyhow!("{DB_NAME_ENV} is not set"))?;

        let mut url = Url::parse(&format!("postgres://{host}:{port}/{name}"))?;
        url.set_username(&user)
            .map_err(|_| anyhow!("invalid database user"))?;
        if !pass.is_empty() {
            url.set_password(Some(&pass))
                .map_err(|_| anyhow!("invalid database password"))?;
        }

        Ok(url)
    }

    fn redis_url(&self) -> Result<Option<Url>> {
        let Some(host) = (self.env)(REDIS_HOST_ENV).or_else(|| self.file.redis_host.clone())
        else {
            return Ok(None);
        };
        let port = self
            .env_parsed(REDIS_PORT_ENV, |raw| Ok(raw.parse::<u16>()?))?
            .or(self.file.redis_port)
            .unwrap_or(DEFAULT_REDIS_PORT);

        Ok(Some(Url::parse(&format!("redis://{host}:{port}"))?))
    }

    fn jwt(&self) -> Result<JwtSettings> {
        let secret = (self.env)(JWT_SECRET_ENV)
            .or_else(|| self.file.jwt_secret.clone())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("{JWT_SECRET_ENV} must be set"))?;

        let expires_in = match self.env_parsed(JWT_EXPIRES_IN_ENV, parse_duration)? {
            Some(d) => d,
            None => match &self.file.jwt_expires_in {
                Some(raw) => parse_duration(raw)?,
                None => DEFAULT_JWT_EXPIRES_IN,
            },
        };

        Ok(JwtSettings { secret, expires_in })
    }

    fn settings(&self) -> Result<Settings> {
        Ok(Settings {
            port: self.port()?,
            database_url: self.database_url()?,
            redis_url: self.redis_url()?,
            jwt: self.jwt()?,
        })
    }
}

/// Load configuration from env with fallback to the optional config file
pub fn load() -> Result<Settings> {
    let resolver = Resolver {
        env: |key: &str| std::env::var(key).ok(),
        file: load_file_config()?,
    };

    resolver.settings()
}
