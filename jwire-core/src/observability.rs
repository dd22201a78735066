//! Logging configuration and initialization
//!
//! The codec reports what it does through `tracing` events: classification
//! results at `trace` level and rejected input at `debug` level, with the
//! error attached as a field. Nothing is printed unless a subscriber is
//! installed. Libraries embedding jwire usually install their own; binaries
//! and tests can use [`init_observability`].
//!
//! # Usage Pattern
//!
//! ```rust,no_run
//! use jwire_core::ObservabilityConfig;
//!
//! let config = ObservabilityConfig::new("rpc-gateway")
//!     .with_log_level("jwire_core=debug")
//!     .with_json(false);
//!
//! jwire_core::init_observability(config).expect("Failed to init logging");
//!
//! tracing::info!("Application started");
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter directives (e.g., "info", "jwire_core=trace").
//!   Takes precedence over the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
///
/// # Defaults
///
/// - Service name: "jwire"
/// - Log level: `$RUST_LOG`, or "info"
/// - JSON output with targets and line numbers
///
/// # Examples
///
/// ```rust
/// use jwire_core::ObservabilityConfig;
///
/// let config = ObservabilityConfig::new("my-api-server")
///     .with_log_level("debug")
///     .with_json(false)
///     .with_line_number(false);
///
/// assert_eq!(config.log_level, "debug");
/// assert!(!config.json);
/// ```
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name, attached to the initialization event
    pub service_name: String,

    /// Filter directives used when `RUST_LOG` is not set
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Include the event target (module path)
    pub with_target: bool,

    /// Include the source line number
    pub with_line_number: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "jwire".to_string(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json: true,
            with_target: true,
            with_line_number: true,
        }
    }
}

impl ObservabilityConfig {
    /// Create a new configuration with a custom service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the log filter directives
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Choose between JSON and human-readable output
    pub fn with_json(mut self, enable: bool) -> Self {
        self.json = enable;
        self
    }

    /// Include or omit event targets
    pub fn with_target(mut self, enable: bool) -> Self {
        self.with_target = enable;
        self
    }

    /// Include or omit source line numbers
    pub fn with_line_number(mut self, enable: bool) -> Self {
        self.with_line_number = enable;
        self
    }
}

/// Install a global `tracing` subscriber
///
/// # Errors
///
/// Fails if the filter directives are invalid or a global subscriber is
/// already installed. Never panics.
pub fn init_observability(
    config: ObservabilityConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let json_layer = config.json.then(|| {
        fmt::layer()
            .with_target(config.with_target)
            .with_line_number(config.with_line_number)
            .json()
    });
    let text_layer = (!config.json).then(|| {
        fmt::layer()
            .with_target(config.with_target)
            .with_line_number(config.with_line_number)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::info!(
        service_name = %config.service_name,
        json = config.json,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "jwire");
        assert!(config.json);
        assert!(config.with_target);
        assert!(config.with_line_number);
    }

    #[test]
    fn test_config_builder_chaining() {
        let config = ObservabilityConfig::new("test-service")
            .with_log_level("jwire_core=trace")
            .with_json(false)
            .with_target(false)
            .with_line_number(false);

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.log_level, "jwire_core=trace");
        assert!(!config.json);
        assert!(!config.with_target);
        assert!(!config.with_line_number);
    }

    #[test]
    fn test_config_log_levels() {
        for level in &["trace", "debug", "info", "warn", "error"] {
            let config = ObservabilityConfig::default().with_log_level(*level);
            assert_eq!(config.log_level, *level);
        }
    }

    #[test]
    fn test_init_twice_fails_without_panicking() {
        // Only test in this binary that installs a global subscriber
        let first = init_observability(ObservabilityConfig::new("test-init").with_log_level("debug"));
        assert!(first.is_ok());

        crate::codec::classify(r#"{"jsonrpc":"2.0","method":"logged"}"#).unwrap();

        let second = init_observability(ObservabilityConfig::new("test-init"));
        assert!(second.is_err());
    }
}
