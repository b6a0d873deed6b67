use std::time::Duration;

/// Runtime configuration, read from environment variables.
///
/// | Variable | Default |
/// |---|---|
/// | `HTTP_PORT` | 3000 |
/// | `LOW_STOCK_THRESHOLD` | 5 |
/// | `RESERVATION_TIMEOUT_MS` | 5000 |
/// | `ACTOR_BUFFER` | 64 |
/// | `SEED_DEMO` | true |
#[derive(Debug, Clone)]
pub struct Config {
    /// API listen port
    pub http_port: u16,
    /// Rows strictly below this quantity are reported as low
    pub low_stock_threshold: u32,
    /// How long an order may hold reservations before it is rolled back
    pub reservation_timeout: Duration,
    /// Request channel capacity of every actor
    pub actor_buffer: usize,
    /// Seed a demo catalog at startup
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            low_stock_threshold: 5,
            reservation_timeout: Duration::from_millis(5000),
            actor_buffer: 64,
            seed_demo: true,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Reads the environment. Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(defaults.http_port),
            low_stock_threshold: env_parse("LOW_STOCK_THRESHOLD")
                .unwrap_or(defaults.low_stock_threshold),
            reservation_timeout: env_parse("RESERVATION_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.reservation_timeout),
            actor_buffer: env_parse::<usize>("ACTOR_BUFFER")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.actor_buffer),
            seed_demo: env_parse("SEED_DEMO").unwrap_or(defaults.seed_demo),
        }
    }
}
