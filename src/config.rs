use crate::engine::settlement::RedeclarePolicy;
use anyhow::Result;

/// Runtime configuration, read from the environment (`.env` supported).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub redeclare_policy: RedeclarePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let redeclare_policy = match std::env::var("REDECLARE_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => RedeclarePolicy::default(),
        };
        Ok(Self {
            bind_addr,
            redeclare_policy,
        })
    }
}
