use super::parse_var;
use crate::core::{AppError, Result};
use actix_cors::Cors;
use std::thread;

/// Server configuration for HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Single origin allowed by CORS; any origin when unset
    pub cors_allowed_origin: Option<String>,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // PORT wins over SERVER_PORT, as set by most hosting platforms
        let port_key = if lookup("PORT").is_some() {
            "PORT"
        } else {
            "SERVER_PORT"
        };

        let workers = match lookup("SERVER_WORKERS") {
            Some(value) => value
                .parse()
                .map_err(|_| AppError::Configuration("Invalid SERVER_WORKERS".to_string()))?,
            None => default_workers(),
        };

        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(lookup, port_key, "3000")?,
            workers,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.trim().is_empty()),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS policy for the invoice API
    pub fn cors(&self) -> Cors {
        let cors = match &self.cors_allowed_origin {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        };

        cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allow_any_header()
            .max_age(3600)
    }
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
