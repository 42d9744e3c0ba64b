//! Environment variable validation and configuration module for logsink
//!
//! This module builds the single `AppConfig` the service runs with. It is
//! constructed once at startup and handed to the pool factory and the server;
//! nothing reads the environment after that.
//!
//! # Supported Environment Variables
//!
//! ## Database Configuration
//! - `DB_HOST`: Postgres host (default: "db")
//! - `DB_NAME`: Database name (default: "logs_db")
//! - `DB_USER`: Database user (default: "logs_user")
//! - `DB_PASSWORD`: Database password (default: "logs_password")
//! - `DB_PORT`: Database port (default: "5432")
//! - `LOGSINK_DB_MAX_CONNECTIONS`: Connection pool size (default: "5")
//! - `LOGSINK_DB_ACQUIRE_TIMEOUT_SECS`: Pool checkout timeout (default: "5")
//!
//! ## Server Configuration
//! - `LOGSINK_HOST`: Server bind address (default: "0.0.0.0")
//! - `LOGSINK_PORT`: Server port (default: "5000")
//! - `LOGSINK_CORS_ENABLED`: Permissive CORS layer (default: "true")
//!
//! ## Logging Configuration
//! - `RUST_LOG`: Standard Rust logging configuration
//! - `LOGSINK_LOG_LEVEL`: Application-specific log level override
//!
//! # Usage
//!
//! ```rust
//! use logsink::env::{validate_environment, get_config};
//!
//! // Validate all environment variables at startup
//! let config = get_config();
//! println!("Server will bind to {}", config.bind_address);
//! ```

use sqlx::postgres::PgConnectOptions;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use tracing::{info, warn};

pub const DEFAULT_DB_HOST: &str = "db";
pub const DEFAULT_DB_NAME: &str = "logs_db";
pub const DEFAULT_DB_USER: &str = "logs_user";
pub const DEFAULT_DB_PASSWORD: &str = "logs_password";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "logsink=info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Environment validation errors
#[derive(Debug, Clone)]
pub struct EnvValidationError {
    pub variable: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Severity level for environment validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    /// Critical errors that prevent application startup
    Critical,
    /// Warnings about invalid values that were replaced by defaults
    Warning,
    /// Informational messages about default values being used
    Info,
}

/// Validated application configuration derived from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Database
    pub db_host: String,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Server
    pub bind_address: SocketAddr,
    pub cors_enabled: bool,

    // Logging
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_host: DEFAULT_DB_HOST.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            db_user: DEFAULT_DB_USER.to_string(),
            db_password: DEFAULT_DB_PASSWORD.to_string(),
            db_port: DEFAULT_DB_PORT,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_acquire_timeout_secs: DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            cors_enabled: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Postgres connection options for the pool factory
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    /// Connection URL with the password masked, safe for logs
    pub fn redacted_database_url(&self) -> String {
        format!(
            "postgres://{}:****@{}:{}/{}",
            self.db_user, self.db_host, self.db_port, self.db_name
        )
    }
}

/// Resolve the tracing filter before the rest of the configuration is validated,
/// so validation messages themselves can be logged.
pub fn resolve_log_level() -> String {
    env::var("LOGSINK_LOG_LEVEL")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
}

/// Validate all environment variables and return configuration or errors
pub fn validate_environment() -> Result<AppConfig, Vec<EnvValidationError>> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Database configuration
    let db_host = string_env_var_with_default("DB_HOST", DEFAULT_DB_HOST, &mut warnings);
    let db_name = string_env_var_with_default("DB_NAME", DEFAULT_DB_NAME, &mut warnings);
    let db_user = string_env_var_with_default("DB_USER", DEFAULT_DB_USER, &mut warnings);
    let db_password = env::var("DB_PASSWORD").unwrap_or_else(|_| {
        warnings.push(EnvValidationError {
            variable: "DB_PASSWORD".to_string(),
            message: "Using default database password".to_string(),
            severity: ErrorSeverity::Info,
        });
        DEFAULT_DB_PASSWORD.to_string()
    });

    let db_port = match env::var("DB_PORT") {
        Ok(port_str) => match port_str.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                errors.push(EnvValidationError {
                    variable: "DB_PORT".to_string(),
                    message: format!("Invalid port number: {}", port_str),
                    severity: ErrorSeverity::Critical,
                });
                DEFAULT_DB_PORT
            }
        },
        Err(_) => {
            warnings.push(EnvValidationError {
                variable: "DB_PORT".to_string(),
                message: format!("Using default port {}", DEFAULT_DB_PORT),
                severity: ErrorSeverity::Info,
            });
            DEFAULT_DB_PORT
        }
    };

    let db_max_connections = parse_env_var_with_default(
        "LOGSINK_DB_MAX_CONNECTIONS",
        DEFAULT_DB_MAX_CONNECTIONS,
        &mut warnings,
    );
    if db_max_connections == 0 {
        errors.push(EnvValidationError {
            variable: "LOGSINK_DB_MAX_CONNECTIONS".to_string(),
            message: "Connection pool size must be at least 1".to_string(),
            severity: ErrorSeverity::Critical,
        });
    }

    let db_acquire_timeout_secs = parse_env_var_with_default(
        "LOGSINK_DB_ACQUIRE_TIMEOUT_SECS",
        DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
        &mut warnings,
    );

    // Server configuration
    let host = string_env_var_with_default("LOGSINK_HOST", DEFAULT_HOST, &mut warnings);

    // Validate host is a valid IP address
    if IpAddr::from_str(&host).is_err() {
        errors.push(EnvValidationError {
            variable: "LOGSINK_HOST".to_string(),
            message: format!("Invalid IP address: {}", host),
            severity: ErrorSeverity::Critical,
        });
    }

    let port = match env::var("LOGSINK_PORT") {
        Ok(port_str) => match port_str.parse::<u16>() {
            Ok(port) => {
                if port < 1024 && port != 0 {
                    warnings.push(EnvValidationError {
                        variable: "LOGSINK_PORT".to_string(),
                        message: format!(
                            "Using privileged port {}, may require root privileges",
                            port
                        ),
                        severity: ErrorSeverity::Warning,
                    });
                }
                port
            }
            Err(_) => {
                errors.push(EnvValidationError {
                    variable: "LOGSINK_PORT".to_string(),
                    message: format!("Invalid port number: {}", port_str),
                    severity: ErrorSeverity::Critical,
                });
                DEFAULT_PORT
            }
        },
        Err(_) => {
            warnings.push(EnvValidationError {
                variable: "LOGSINK_PORT".to_string(),
                message: format!("Using default port {}", DEFAULT_PORT),
                severity: ErrorSeverity::Info,
            });
            DEFAULT_PORT
        }
    };

    let bind_address = match format!("{}:{}", host, port).parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(_) => {
            // Already reported as a critical host error when the host is bad
            SocketAddr::from(([0, 0, 0, 0], port))
        }
    };

    let cors_enabled = parse_bool_env_var_with_default("LOGSINK_CORS_ENABLED", true, &mut warnings);

    let log_level = resolve_log_level();

    // Add all warnings to errors for reporting
    errors.extend(warnings);

    if errors.iter().any(|e| e.severity == ErrorSeverity::Critical) {
        return Err(errors);
    }

    for error in &errors {
        match error.severity {
            ErrorSeverity::Warning => warn!("{}: {}", error.variable, error.message),
            ErrorSeverity::Info => info!("{}: {}", error.variable, error.message),
            ErrorSeverity::Critical => {}
        }
    }

    Ok(AppConfig {
        db_host,
        db_name,
        db_user,
        db_password,
        db_port,
        db_max_connections,
        db_acquire_timeout_secs,
        bind_address,
        cors_enabled,
        log_level,
    })
}

/// Get the validated configuration, exiting the process if validation fails
pub fn get_config() -> AppConfig {
    match validate_environment() {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("Environment validation failed:");
            for error in errors {
                match error.severity {
                    ErrorSeverity::Critical => {
                        eprintln!("CRITICAL - {}: {}", error.variable, error.message)
                    }
                    ErrorSeverity::Warning => {
                        eprintln!("WARNING - {}: {}", error.variable, error.message)
                    }
                    ErrorSeverity::Info => {
                        eprintln!("INFO - {}: {}", error.variable, error.message)
                    }
                }
            }
            std::process::exit(1);
        }
    }
}

/// Print environment validation results in a user-friendly format
pub fn print_validation_results(result: &Result<AppConfig, Vec<EnvValidationError>>) {
    match result {
        Ok(config) => {
            println!("Environment validation successful");
            println!("Configuration:");
            println!("  Database: {}", config.redacted_database_url());
            println!(
                "  Pool: {} connections, {}s acquire timeout",
                config.db_max_connections, config.db_acquire_timeout_secs
            );
            println!("  Server: {}", config.bind_address);
            println!("  CORS Enabled: {}", config.cors_enabled);
            println!("  Log Level: {}", config.log_level);
        }
        Err(errors) => {
            let critical_count = errors
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Critical)
                .count();
            let warning_count = errors
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Warning)
                .count();

            eprintln!(
                "Environment validation failed with {} critical error(s), {} warning(s):",
                critical_count, warning_count
            );

            for error in errors {
                let prefix = match error.severity {
                    ErrorSeverity::Critical => "CRITICAL",
                    ErrorSeverity::Warning => "WARNING",
                    ErrorSeverity::Info => "INFO",
                };
                eprintln!("  {} - {}: {}", prefix, error.variable, error.message);
            }
        }
    }
}

/// Generate example environment configuration file
pub fn generate_env_example() -> String {
    format!(
        r#"# logsink Environment Configuration
# Copy this file to .env and customize the values for your deployment

# =============================================================================
# Database Configuration
# =============================================================================

DB_HOST={db_host}
DB_NAME={db_name}
DB_USER={db_user}
DB_PASSWORD={db_password}
DB_PORT={db_port}

# Connection pool size
LOGSINK_DB_MAX_CONNECTIONS={max_connections}

# Seconds a request waits for a pooled connection before failing with a 500
LOGSINK_DB_ACQUIRE_TIMEOUT_SECS={acquire_timeout}

# =============================================================================
# Server Configuration
# =============================================================================

# Server bind address (must be an IP address)
LOGSINK_HOST={host}

# Server port
LOGSINK_PORT={port}

# Allow cross-origin requests from any origin
LOGSINK_CORS_ENABLED=true

# =============================================================================
# Logging Configuration
# =============================================================================

# Examples:
#   RUST_LOG=debug                             # Everything at debug level
#   RUST_LOG=logsink=debug,tower_http=debug    # Custom per-module levels
#   LOGSINK_LOG_LEVEL=info                     # Takes precedence over RUST_LOG
RUST_LOG={log_level}
"#,
        db_host = DEFAULT_DB_HOST,
        db_name = DEFAULT_DB_NAME,
        db_user = DEFAULT_DB_USER,
        db_password = DEFAULT_DB_PASSWORD,
        db_port = DEFAULT_DB_PORT,
        max_connections = DEFAULT_DB_MAX_CONNECTIONS,
        acquire_timeout = DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
        host = DEFAULT_HOST,
        port = DEFAULT_PORT,
        log_level = DEFAULT_LOG_LEVEL,
    )
}

/// Read a string variable, recording an info message when the default is used
fn string_env_var_with_default(
    var_name: &str,
    default: &str,
    warnings: &mut Vec<EnvValidationError>,
) -> String {
    env::var(var_name).unwrap_or_else(|_| {
        warnings.push(EnvValidationError {
            variable: var_name.to_string(),
            message: format!("Using default value: {}", default),
            severity: ErrorSeverity::Info,
        });
        default.to_string()
    })
}

/// Helper function to parse environment variable with default value
fn parse_env_var_with_default<T>(
    var_name: &str,
    default: T,
    warnings: &mut Vec<EnvValidationError>,
) -> T
where
    T: FromStr + Clone + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(var_name) {
        Ok(value_str) => match value_str.parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                warnings.push(EnvValidationError {
                    variable: var_name.to_string(),
                    message: format!(
                        "Invalid value '{}': {}. Using default: {}",
                        value_str, e, default
                    ),
                    severity: ErrorSeverity::Warning,
                });
                default
            }
        },
        Err(_) => {
            warnings.push(EnvValidationError {
                variable: var_name.to_string(),
                message: format!("Using default value: {}", default),
                severity: ErrorSeverity::Info,
            });
            default
        }
    }
}

/// Helper function to parse boolean environment variable with default value
fn parse_bool_env_var_with_default(
    var_name: &str,
    default: bool,
    warnings: &mut Vec<EnvValidationError>,
) -> bool {
    match env::var(var_name) {
        Ok(value_str) => match value_str.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => {
                warnings.push(EnvValidationError {
                    variable: var_name.to_string(),
                    message: format!(
                        "Invalid boolean value '{}'. Using default: {}",
                        value_str, default
                    ),
                    severity: ErrorSeverity::Warning,
                });
                default
            }
        },
        Err(_) => {
            warnings.push(EnvValidationError {
                variable: var_name.to_string(),
                message: format!("Using default value: {}", default),
                severity: ErrorSeverity::Info,
            });
            default
        }
    }
}
