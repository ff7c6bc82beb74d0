use log::LevelFilter;

use crate::error::ShellError;

pub(crate) const LOG_ENV_VAR: &str = "RBT_LEADERBOARD_LOG";
pub(crate) const WINDOW_ENV_VAR: &str = "RBT_LEADERBOARD_WINDOW";
pub(crate) const VALIDATE_ENV_VAR: &str = "RBT_LEADERBOARD_VALIDATE";

/// Shell settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShellConfig {
    /// Stderr log level. Default: warn.
    /// Can be overridden via RBT_LEADERBOARD_LOG.
    pub(crate) log_level: LevelFilter,
    /// Rows shown above and below a player after an update. Default: 2.
    /// Can be overridden via RBT_LEADERBOARD_WINDOW.
    pub(crate) neighbor_window: usize,
    /// Check the tree invariants after every update. Default: true.
    /// Can be overridden via RBT_LEADERBOARD_VALIDATE.
    pub(crate) validate_after_update: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Warn,
            neighbor_window: 2,
            validate_after_update: true,
        }
    }
}

impl ShellConfig {
    /// Reads overrides from the process environment.
    pub(crate) fn from_env() -> Result<Self, ShellError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Applies overrides from `lookup` on top of the defaults.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ShellError> {
        let mut config = Self::default();

        if let Some(value) = lookup(LOG_ENV_VAR) {
            config.log_level = value.trim().parse().map_err(|_| ShellError::Config {
                var: LOG_ENV_VAR,
                value,
                reason: "expected off, error, warn, info, debug or trace",
            })?;
        }

        if let Some(value) = lookup(WINDOW_ENV_VAR) {
            config.neighbor_window = value.trim().parse().map_err(|_| ShellError::Config {
                var: WINDOW_ENV_VAR,
                value,
                reason: "expected a non-negative integer",
            })?;
        }

        if let Some(value) = lookup(VALIDATE_ENV_VAR) {
            config.validate_after_update = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ShellError::Config {
                        var: VALIDATE_ENV_VAR,
                        value,
                        reason: "expected true or false",
                    });
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = ShellConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.neighbor_window, 2);
        assert!(config.validate_after_update);
    }

    #[test]
    fn overrides_are_applied() {
        let config = ShellConfig::from_lookup(lookup_in(&[
            (LOG_ENV_VAR, "Debug"),
            (WINDOW_ENV_VAR, " 5 "),
            (VALIDATE_ENV_VAR, "off"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.neighbor_window, 5);
        assert!(!config.validate_after_update);
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (var, value) in [(LOG_ENV_VAR, "loud"), (WINDOW_ENV_VAR, "-1"), (VALIDATE_ENV_VAR, "maybe")] {
            let err = ShellConfig::from_lookup(lookup_in(&[(var, value)])).unwrap_err();
            match err {
                ShellError::Config { var: got, value: bad, .. } => {
                    assert_eq!(got, var);
                    assert_eq!(bad, value);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
