use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub eta_speed_kmph: f64,
    pub map_output: String,
    pub map_steps: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let eta_speed_kmph = parse_or_default("ETA_SPEED_KMPH", 12.0)?;
        if !(eta_speed_kmph > 0.0) {
            return Err(AppError::Internal(format!(
                "invalid ETA_SPEED_KMPH: must be > 0, got {eta_speed_kmph}"
            )));
        }

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            eta_speed_kmph,
            map_output: env::var("MAP_OUTPUT").unwrap_or_else(|_| "route_map.html".to_string()),
            map_steps: parse_or_default("MAP_STEPS", 6)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

pub fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .with_target(false)
        .compact()
        .init();
}
