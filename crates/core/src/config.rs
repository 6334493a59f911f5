use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub venues: VenuesConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueEndpointConfig {
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VenuesConfig {
    pub binance: VenueEndpointConfig,
    pub bybit: VenueEndpointConfig,
    pub hyperliquid: VenueEndpointConfig,
    pub mexc: VenueEndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Six-field cron for the four history jobs.
    pub history_cron: String,
    /// Six-field cron for the four online jobs.
    pub online_cron: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/funding_rates".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for VenuesConfig {
    fn default() -> Self {
        Self {
            binance: VenueEndpointConfig {
                api_url: "https://fapi.binance.com".to_string(),
            },
            bybit: VenueEndpointConfig {
                api_url: "https://api.bybit.com".to_string(),
            },
            hyperliquid: VenueEndpointConfig {
                api_url: "https://api.hyperliquid.xyz".to_string(),
            },
            mexc: VenueEndpointConfig {
                api_url: "https://contract.mexc.com".to_string(),
            },
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_cron: "*/15 * * * * *".to_string(),
            online_cron: "*/10 * * * * *".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            venues: VenuesConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}
