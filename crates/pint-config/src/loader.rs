// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, ConfigError, ConfigResult, ObjectiveMode, PintConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "pint.toml";

/// Find the PINT configuration file
///
/// Search order:
/// 1. `PINT_CONFIG_PATH` environment variable
/// 2. Current working directory: `./pint.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("PINT_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by PINT_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "PINT configuration file '{}' not found in any of these locations:\n{}\n\nSet PINT_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<PintConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let config: PintConfig = toml::from_str(&content)?;

    finish(config, cli_args)
}

/// Load configuration, falling back to built-in defaults when no file is found
///
/// An explicitly given `config_path` must exist; only automatic discovery may
/// come up empty.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<PintConfig> {
    if config_path.is_some() {
        return load_config(config_path, cli_args);
    }
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) => finish(PintConfig::default(), cli_args),
        Err(e) => Err(e),
    }
}

fn finish(
    mut config: PintConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<PintConfig> {
    apply_environment_overrides(&mut config)?;

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(format!("{} = '{}' is not a number", key, value)))
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `PINT_SAMPLING_RADIUS` -> `search.sampling_radius_mm`
/// - `PINT_SEARCH_RADIUS` -> `search.search_radius_mm`
/// - `PINT_PADDING_RADIUS` -> `search.padding_radius_mm`
/// - `PINT_OBJECTIVE` -> `search.objective`
/// - `PINT_RANDOM_SEED` -> `search.random_seed`
/// - `PINT_OUTPUT_ALL` -> `output.output_all`
/// - `PINT_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut PintConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("PINT_SAMPLING_RADIUS") {
        config.search.sampling_radius_mm = parse_number("PINT_SAMPLING_RADIUS", &value)?;
    }
    if let Ok(value) = env::var("PINT_SEARCH_RADIUS") {
        config.search.search_radius_mm = parse_number("PINT_SEARCH_RADIUS", &value)?;
    }
    if let Ok(value) = env::var("PINT_PADDING_RADIUS") {
        config.search.padding_radius_mm = parse_number("PINT_PADDING_RADIUS", &value)?;
    }
    if let Ok(value) = env::var("PINT_OBJECTIVE") {
        config.search.objective = value.parse::<ObjectiveMode>()?;
    }
    if let Ok(value) = env::var("PINT_RANDOM_SEED") {
        config.search.random_seed = Some(parse_number("PINT_RANDOM_SEED", &value)?);
    }
    if let Ok(value) = env::var("PINT_OUTPUT_ALL") {
        config.output.output_all = parse_flag(&value);
    }
    if let Ok(value) = env::var("PINT_LOG_LEVEL") {
        config.logging.level = value;
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"sampling_radius": "4", "pcorr": "true"}`)
pub fn apply_cli_overrides(
    config: &mut PintConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("sampling_radius") {
        config.search.sampling_radius_mm = parse_number("sampling_radius", value)?;
    }
    if let Some(value) = cli_args.get("search_radius") {
        config.search.search_radius_mm = parse_number("search_radius", value)?;
    }
    if let Some(value) = cli_args.get("padding_radius") {
        config.search.padding_radius_mm = parse_number("padding_radius", value)?;
    }
    if let Some(value) = cli_args.get("pcorr") {
        if parse_flag(value) {
            config.search.objective = ObjectiveMode::Partial;
        }
    }
    if let Some(value) = cli_args.get("random_seed") {
        config.search.random_seed = Some(parse_number("random_seed", value)?);
    }
    if let Some(value) = cli_args.get("output_all") {
        if parse_flag(value) {
            config.output.output_all = true;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const PINT_VARS: &[&str] = &[
        "PINT_SAMPLING_RADIUS",
        "PINT_SEARCH_RADIUS",
        "PINT_PADDING_RADIUS",
        "PINT_OBJECTIVE",
        "PINT_RANDOM_SEED",
        "PINT_OUTPUT_ALL",
        "PINT_LOG_LEVEL",
    ];

    fn clear_pint_vars() {
        for var in PINT_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_pint.toml");
        File::create(&config_path).unwrap();

        env::set_var("PINT_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("PINT_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_missing_env_path_is_reported() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("PINT_CONFIG_PATH", "/definitely/not/here/pint.toml");
        let result = find_config_file();
        env::remove_var("PINT_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_pint_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pint.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[search]").unwrap();
        writeln!(file, "sampling_radius_mm = 4.0").unwrap();
        writeln!(file, "objective = \"partial\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.search.sampling_radius_mm, 4.0);
        assert_eq!(config.search.objective, ObjectiveMode::Partial);
        assert_eq!(config.search.padding_radius_mm, 12.0);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pint.toml");
        std::fs::write(&config_path, "[search\nsampling_radius_mm = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = PintConfig::default();

        env::set_var("PINT_SEARCH_RADIUS", "8");
        env::set_var("PINT_OBJECTIVE", "partial");
        env::set_var("PINT_RANDOM_SEED", "42");

        let result = apply_environment_overrides(&mut config);
        clear_pint_vars();

        assert!(result.is_ok());
        assert_eq!(config.search.search_radius_mm, 8.0);
        assert_eq!(config.search.objective, ObjectiveMode::Partial);
        assert_eq!(config.search.random_seed, Some(42));
    }

    #[test]
    fn test_bad_environment_value_is_rejected() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = PintConfig::default();

        env::set_var("PINT_PADDING_RADIUS", "twelve");
        let result = apply_environment_overrides(&mut config);
        clear_pint_vars();

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = PintConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("padding_radius".to_string(), "10".to_string());
        cli_args.insert("pcorr".to_string(), "true".to_string());
        cli_args.insert("output_all".to_string(), "true".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.search.padding_radius_mm, 10.0);
        assert_eq!(config.search.objective, ObjectiveMode::Partial);
        assert!(config.output.output_all);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_pint_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pint.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[search]").unwrap();
        writeln!(file, "sampling_radius_mm = 3.0").unwrap();
        writeln!(file, "search_radius_mm = 3.0").unwrap();

        env::set_var("PINT_SAMPLING_RADIUS", "4");
        env::set_var("PINT_SEARCH_RADIUS", "5");

        let mut cli_args = HashMap::new();
        cli_args.insert("sampling_radius".to_string(), "2".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args));
        clear_pint_vars();
        let config = config.unwrap();

        // CLI wins for sampling, env wins for search (no CLI override)
        assert_eq!(config.search.sampling_radius_mm, 2.0);
        assert_eq!(config.search.search_radius_mm, 5.0);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_pint_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pint.toml");
        std::fs::write(&config_path, "[search]\nmax_sweeps_per_pass = 0\n").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
