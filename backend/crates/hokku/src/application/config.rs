//! Application Configuration
//!
//! Configuration for the Hokku application layer.

use platform::password::PasswordCost;

use crate::domain::pagination::DEFAULT_LIMIT;

/// Hokku application configuration
#[derive(Debug, Clone)]
pub struct HokkuConfig {
    /// Page size for listings when `limit` is absent or zero
    pub default_limit: usize,
    /// Argon2id work factor for author passwords
    pub password_cost: PasswordCost,
}

impl Default for HokkuConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            password_cost: PasswordCost::default(),
        }
    }
}

impl HokkuConfig {
    /// Create config for development (cheap password hashing)
    pub fn development() -> Self {
        Self {
            password_cost: PasswordCost::low(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HokkuConfig::default();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.password_cost, PasswordCost::default());
    }

    #[test]
    fn test_development_config() {
        let config = HokkuConfig::development();
        assert_eq!(config.default_limit, 10);
        assert!(config.password_cost.memory_kib < PasswordCost::default().memory_kib);
    }
}
