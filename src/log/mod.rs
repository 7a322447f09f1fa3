//! The `log` module defines the crate's logging facilities. This is not to be confused with the
//! _simulation log_ in [`crate::report`], which records the daily statistics of a run.
//!
//! This module (re)exports the five logging macros: `error!`, `warn!`, `info!`, `debug!` and
//! `trace!`. The simulator emits `info!` on reset and run completion, a `debug!` summary per day,
//! and a `trace!` line for every infection and test.
//!
//! Logging is _disabled_ by default. It can be enabled from code with
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with priority at least `level`
//!
//! and per module with `set_module_filter()` / `set_module_filters()` and
//! `remove_module_filter()`:
//!
//! ```rust
//! use campus_epi::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! set_log_level(LevelFilter::Info);
//! set_module_filter("campus_epi::random", LevelFilter::Off);
//! ```
//!
//! The command line accepts the same configuration as a single string, see
//! [`parse_log_level_spec`].
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};
use std::collections::hash_map::Entry;
use std::str::FromStr;

#[cfg(feature = "logging")]
use log4rs::Handle;
use rustc_hash::FxHashMap;
use std::sync::LazyLock;
use std::sync::{Mutex, MutexGuard};

use crate::error::EpiError;

// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// A level filter applied to the log messages emitted from one module path
/// (e.g. `"campus_epi::simulator"`).
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    /// The module path this configuration applies to
    module: String,
    /// The maximum log level for this module path
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Holds logging configuration: the global filter, the per-module filters and a handle to the
/// installed logger.
///
/// Loggers are installed process wide, so only one instance of this struct exists. The public
/// API are free functions which fetch the singleton and call the appropriate member function.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// The level filter for modules without an explicitly set filter. `LevelFilter::Off`
    /// disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: FxHashMap<String, ModuleLogConfiguration>,

    #[cfg(feature = "logging")]
    /// Handle to the `log4rs` logger.
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations: FxHashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    pub(in crate::log) fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Returns true if the configuration was mutated, false otherwise.
    fn insert_module_filter(&mut self, module: &str, level: LevelFilter) -> bool {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                let module_config = entry.get_mut();
                if module_config.level == level {
                    return false;
                }
                module_config.level = level;
            }

            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        true
    }

    pub(in crate::log) fn set_module_filter(&mut self, module: &str, level: LevelFilter) {
        if self.insert_module_filter(module, level) {
            self.set_config();
        }
    }

    pub(in crate::log) fn set_module_filters(&mut self, module_filters: &[(&str, LevelFilter)]) {
        let mut mutated = false;
        for (module, level) in module_filters {
            mutated |= self.insert_module_filter(module, *level);
        }
        if mutated {
            self.set_config();
        }
    }

    pub(in crate::log) fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

// The public API

/// Enables the logger with no global level filter / full logging. Equivalent to
/// `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A global filter level of `LevelFilter::Off` disables logging.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    get_log_configuration().set_module_filter(module_path, level_filter);
}

/// Removes a module-specific level filter for the given module path. The global level filter will
/// apply to the module.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

/// Sets the level filters for a set of modules. Use this instead of `set_module_filter()` to set
/// filters in bulk.
pub fn set_module_filters(module_filters: &[(&str, LevelFilter)]) {
    get_log_configuration().set_module_filters(module_filters);
}

/// A parsed `--log-level` argument.
#[derive(Debug, Default, PartialEq)]
pub struct LogLevelSpec {
    /// Level for modules without their own filter, if one was given.
    pub global: Option<LevelFilter>,
    /// `(module, level)` pairs in the order they were given.
    pub modules: Vec<(String, LevelFilter)>,
}

impl LogLevelSpec {
    /// Installs this specification. Naming only modules enables logging for those modules and
    /// leaves everything else off.
    pub fn apply(&self) {
        let filters: Vec<(&str, LevelFilter)> = self
            .modules
            .iter()
            .map(|(module, level)| (module.as_str(), *level))
            .collect();
        set_module_filters(&filters);
        match self.global {
            Some(level) => set_log_level(level),
            None if !self.modules.is_empty() => {
                // Module filters are only consulted once the root logger is installed.
                get_log_configuration().set_config();
            }
            None => {}
        }
    }
}

/// Parses a log level specification of the form `info` or `info,campus_epi::random=off` or
/// `campus_epi::simulator=trace`.
///
/// # Errors
///
/// Returns an [`EpiError::InvalidParameter`] naming `log_level` if a level is not recognized.
pub fn parse_log_level_spec(spec: &str) -> Result<LogLevelSpec, EpiError> {
    let mut parsed = LogLevelSpec::default();
    for part in spec.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        match part.split_once('=') {
            Some((module, level)) => {
                parsed
                    .modules
                    .push((module.trim().to_string(), parse_level(level.trim())?));
            }
            None => parsed.global = Some(parse_level(part)?),
        }
    }
    Ok(parsed)
}

fn parse_level(level: &str) -> Result<LevelFilter, EpiError> {
    LevelFilter::from_str(level).map_err(|_| {
        EpiError::invalid_parameter("log_level", format!("unrecognized log level `{level}`"))
    })
}

/// Fetches a mutable reference to the global `LogConfiguration`.
fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}

#[cfg(test)]
mod tests {
    use super::{
        get_log_configuration, parse_log_level_spec, remove_module_filter, set_log_level,
        set_module_filters,
    };
    use log::{error, trace, LevelFilter};
    use std::sync::{LazyLock, Mutex};

    // Force logging tests to run serially for consistent behavior.
    static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    #[test]
    fn test_set_log_level() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Trace);
        set_log_level(LevelFilter::Error);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Error);
            error!("test_set_log_level: global set to error");
            trace!("test_set_log_level: NOT EMITTED");
        }
        set_log_level(LevelFilter::Trace);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Trace);
        }
        set_log_level(LevelFilter::Off);
    }

    #[test]
    fn test_set_remove_module_filters() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Trace);

        let filters = [
            ("campus_epi::random", LevelFilter::Error),
            ("campus_epi::simulator", LevelFilter::Debug),
        ];
        set_module_filters(&filters);
        {
            let config = get_log_configuration();
            for (module_path, level) in &filters {
                assert_eq!(
                    config.module_configurations.get(*module_path),
                    Some(&((*module_path, *level).into()))
                );
            }
        }

        remove_module_filter("campus_epi::random");
        {
            let config = get_log_configuration();
            assert!(!config.module_configurations.contains_key("campus_epi::random"));
            assert_eq!(
                config.module_configurations.get("campus_epi::simulator"),
                Some(&("campus_epi::simulator", LevelFilter::Debug).into())
            );
        }
        remove_module_filter("campus_epi::simulator");
        set_log_level(LevelFilter::Off);
    }

    #[test]
    fn parses_global_level() {
        let spec = parse_log_level_spec("info").unwrap();
        assert_eq!(spec.global, Some(LevelFilter::Info));
        assert!(spec.modules.is_empty());
    }

    #[test]
    fn parses_module_levels() {
        let spec = parse_log_level_spec("warn, campus_epi::simulator=trace,campus_epi::random=OFF")
            .unwrap();
        assert_eq!(spec.global, Some(LevelFilter::Warn));
        assert_eq!(
            spec.modules,
            vec![
                ("campus_epi::simulator".to_string(), LevelFilter::Trace),
                ("campus_epi::random".to_string(), LevelFilter::Off),
            ]
        );
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(parse_log_level_spec("loud").is_err());
        assert!(parse_log_level_spec("campus_epi=loud").is_err());
    }
}
