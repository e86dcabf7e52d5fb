use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "dev_jwt_secret_change_this_in_production";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub telegram: Option<TelegramConfig>,
    pub app: AppConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub admin_username: String,
    pub admin_password: SecretString,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    pub chat_id: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub static_dir: String,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub submit_max: u32,
    pub login_max: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration
        let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bookings.db".to_string());
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
            ),
            Err(_) => Some(5),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MIN_CONNECTIONS")?,
            ),
            Err(_) => Some(1),
        };

        // App configuration
        let environment_str =
            env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = environment_str
            .parse::<Environment>()
            .unwrap_or(Environment::Development);

        // Auth configuration; the baked-in defaults exist so a local
        // checkout starts without a .env, never for a deployed instance.
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(val) => SecretString::from(val),
            Err(_) => {
                if environment == Environment::Production {
                    bail!("JWT_SECRET must be set in production");
                }
                SecretString::from(DEV_JWT_SECRET.to_string())
            }
        };
        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = match env::var("ADMIN_PASSWORD") {
            Ok(val) => SecretString::from(val),
            Err(_) => {
                if environment == Environment::Production {
                    bail!("ADMIN_PASSWORD must be set in production");
                }
                SecretString::from("admin".to_string())
            }
        };

        // Telegram notification (optional)
        let telegram = if let Ok(bot_token) = env::var("TELEGRAM_BOT_TOKEN") {
            let chat_id = env::var("TELEGRAM_CHAT_ID")
                .context("TELEGRAM_CHAT_ID must be set when TELEGRAM_BOT_TOKEN is provided")?
                .parse::<i64>()
                .context("Failed to parse TELEGRAM_CHAT_ID")?;
            Some(TelegramConfig {
                bot_token: SecretString::from(bot_token),
                chat_id,
            })
        } else {
            None
        };

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Guesthouse Backend".to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let rate_limit = RateLimitConfig {
            submit_max: parse_or("RATE_LIMIT_SUBMIT_MAX", 10)?,
            login_max: parse_or("RATE_LIMIT_LOGIN_MAX", 5)?,
            window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 900)?,
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            auth: AuthConfig {
                jwt_secret,
                admin_username,
                admin_password,
            },
            telegram,
            app: AppConfig {
                name: app_name,
                environment,
                static_dir,
                rate_limit,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", key)),
        Err(_) => Ok(default),
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}
