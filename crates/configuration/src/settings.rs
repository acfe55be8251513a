use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub analytics: AnalyticsParams,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.analytics.validate()
    }
}

const BYTES_PER_MB: usize = 1024 * 1024;

/// Where and how the HTTP service listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on the size of a multipart upload, in megabytes.
    pub body_limit_mb: usize,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(BYTES_PER_MB)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.body_limit_mb == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_mb must be greater than zero".to_string(),
            ));
        }
        if self.body_limit_mb.checked_mul(BYTES_PER_MB).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "server.body_limit_mb is too large (got {})",
                self.body_limit_mb
            )));
        }
        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            body_limit_mb: 50,
        }
    }
}

/// Tunable parameters of the inventory analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsParams {
    /// A SKU is slow-moving when its daily average is below this fraction of the
    /// catalogue-wide daily average.
    pub slow_rotation_ratio: Decimal,
    /// Days without a sale, counted back from the latest sale date, after which a
    /// product is considered dead stock.
    pub dead_stock_idle_days: i64,
    /// How many best sellers of the latest month go into the detailed report.
    pub top_month_n: usize,
    /// How many all-time best sellers go onto the dashboard.
    pub dashboard_top_n: usize,
}

impl AnalyticsParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slow_rotation_ratio.is_sign_negative() {
            return Err(ConfigError::ValidationError(format!(
                "analytics.slow_rotation_ratio must not be negative (got {})",
                self.slow_rotation_ratio
            )));
        }
        if self.dead_stock_idle_days < 0 {
            return Err(ConfigError::ValidationError(format!(
                "analytics.dead_stock_idle_days must not be negative (got {})",
                self.dead_stock_idle_days
            )));
        }
        if self.top_month_n == 0 || self.dashboard_top_n == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.top_month_n and analytics.dashboard_top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            slow_rotation_ratio: dec!(0.5),
            dead_stock_idle_days: 14,
            top_month_n: 5,
            dashboard_top_n: 3,
        }
    }
}
