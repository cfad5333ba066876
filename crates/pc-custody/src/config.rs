//! Ledger configuration from environment variables.

use shared_types::entities::{ActorId, ParseActorIdError};
use std::env;
use thiserror::Error;

/// Default cap on page sizes for history reads.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Default event bus buffer per subscriber.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable held a value that could not be parsed.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// Environment variable name
        var: &'static str,
        /// What went wrong
        reason: String,
    },

    /// The bootstrap admin address was malformed.
    #[error("Invalid bootstrap admin address: {0}")]
    InvalidAdmin(#[from] ParseActorIdError),

    /// The bootstrap admin is required but absent or null.
    #[error("PC_BOOTSTRAP_ADMIN must be set to a non-zero address")]
    MissingAdmin,
}

/// Custody ledger configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Actor installed as Admin (and granted Regulator) at startup.
    pub bootstrap_admin: Option<ActorId>,

    /// Upper bound on `PageRequest::limit`.
    pub max_page_size: usize,

    /// Reject batches with an empty name or batch number.
    pub strict_batch_fields: bool,

    /// Event bus buffer per subscriber.
    pub event_bus_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            bootstrap_admin: None,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            strict_batch_fields: false,
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}

impl LedgerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PC_BOOTSTRAP_ADMIN`: Hex address of the initial Admin (default: unset)
    /// - `PC_MAX_PAGE_SIZE`: Page size cap (default: 100)
    /// - `PC_STRICT_BATCH_FIELDS`: Reject empty batch fields (default: false)
    /// - `PC_EVENT_BUS_CAPACITY`: Event bus buffer (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bootstrap_admin = match lookup("PC_BOOTSTRAP_ADMIN") {
            Some(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<ActorId>()?),
            _ => None,
        };

        Ok(Self {
            bootstrap_admin,
            max_page_size: parse_positive(&lookup, "PC_MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)?,
            strict_batch_fields: lookup("PC_STRICT_BATCH_FIELDS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            event_bus_capacity: parse_positive(
                &lookup,
                "PC_EVENT_BUS_CAPACITY",
                DEFAULT_EVENT_BUS_CAPACITY,
            )?,
        })
    }

    /// Set the bootstrap admin.
    #[must_use]
    pub fn with_admin(mut self, admin: ActorId) -> Self {
        self.bootstrap_admin = Some(admin);
        self
    }

    /// The bootstrap admin, which must be present and non-null.
    pub fn require_admin(&self) -> Result<ActorId, ConfigError> {
        match self.bootstrap_admin {
            Some(admin) if !admin.is_zero() => Ok(admin),
            _ => Err(ConfigError::MissingAdmin),
        }
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
        }),
    }
}
