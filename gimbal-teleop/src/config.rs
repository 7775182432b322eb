use crate::cli::Args;
use anyhow::{bail, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Target {
    host: String,
    api_port: u16,
    api_path: String,
    focus_port: u16,
    timeout: Duration,
    poll_interval: Duration,
}

/// Fully resolved URLs of the four device endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub gimbal: String,
    pub camera: String,
    pub focus: String,
    pub ai: String,
}

impl Target {
    pub fn from_args(args: &Args) -> Result<Self> {
        let host = args.host.trim().to_string();
        if host.is_empty() {
            bail!("host is required");
        }
        if args.timeout_ms == 0 {
            bail!("timeout must be greater than zero");
        }
        Ok(Self {
            host,
            api_port: args.api_port,
            api_path: normalize_path(&args.api_path),
            focus_port: args.focus_port,
            timeout: Duration::from_millis(args.timeout_ms),
            poll_interval: Duration::from_millis(args.poll_interval_ms),
        })
    }

    pub fn api_endpoint(&self) -> String {
        format!("http://{}:{}{}", self.host, self.api_port, self.api_path)
    }

    pub fn endpoints(&self) -> Endpoints {
        let api = self.api_endpoint();
        Endpoints {
            gimbal: format!("{}/gimbal", api),
            camera: format!("{}/camera", api),
            focus: format!("http://{}:{}", self.host, self.focus_port),
            ai: api,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
