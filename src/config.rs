use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub backend_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: parsed_var("PORT", DEFAULT_PORT),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            backend_timeout: Duration::from_secs(parsed_var(
                "BACKEND_TIMEOUT_SECS",
                DEFAULT_BACKEND_TIMEOUT_SECS,
            )),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> T {
    parse_or_default(name, env::var(name).ok(), default)
}

fn parse_or_default<T: FromStr>(name: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {name}={value:?}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        assert_eq!(parse_or_default("PORT", Some("eighty".to_string()), DEFAULT_PORT), 8080);
        assert_eq!(parse_or_default("PORT", Some("70000".to_string()), DEFAULT_PORT), 8080);
        assert_eq!(parse_or_default("BACKEND_TIMEOUT_SECS", Some("-1".to_string()), 10u64), 10);
    }

    #[test]
    fn valid_and_missing_values() {
        assert_eq!(parse_or_default("PORT", Some("9000".to_string()), DEFAULT_PORT), 9000);
        assert_eq!(parse_or_default("PORT", None, DEFAULT_PORT), DEFAULT_PORT);
    }
}
