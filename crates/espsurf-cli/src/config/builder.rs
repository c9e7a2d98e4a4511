use super::file::FileConfig;
use crate::cli::SurfaceArgs;
use crate::error::{CliError, Result};
use espsurf::engine::config::{SurfaceConfig, SurfaceConfigBuilder};
use std::str::FromStr;

/// Resolves the surface configuration.
///
/// Precedence, highest first: command-line flags, `--set` values, the config file, then the
/// library defaults.
pub fn build_config(args: &SurfaceArgs) -> Result<SurfaceConfig> {
    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, &args.set_values)?;

    let grid_file = file_config.grid.unwrap_or_default();
    let shell_file = file_config.shell.unwrap_or_default();
    let smoothing_file = file_config.smoothing.unwrap_or_default();

    let mut builder = SurfaceConfigBuilder::new();
    if let Some(spacing) = args.spacing.or(grid_file.spacing) {
        builder = builder.spacing(spacing);
    }
    if let Some(margin_scale) = args.margin_scale.or(grid_file.margin_scale) {
        builder = builder.margin_scale(margin_scale);
    }
    if let Some(radius_scale) = args.radius_scale.or(shell_file.radius_scale) {
        builder = builder.radius_scale(radius_scale);
    }

    let iterations = if args.no_smoothing {
        Some(0)
    } else {
        args.smoothing_iterations.or(smoothing_file.iterations)
    };
    if let Some(iterations) = iterations {
        builder = builder.smoothing_iterations(iterations);
    }
    if let Some(factor) = args.smoothing_factor.or(smoothing_file.factor) {
        builder = builder.smoothing_factor(factor);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "grid.spacing" => {
                config.grid.get_or_insert_with(Default::default).spacing =
                    Some(parse_value(key, value_str, "float")?);
            }
            "grid.margin-scale" => {
                config.grid.get_or_insert_with(Default::default).margin_scale =
                    Some(parse_value(key, value_str, "float")?);
            }
            "shell.radius-scale" => {
                config.shell.get_or_insert_with(Default::default).radius_scale =
                    Some(parse_value(key, value_str, "float")?);
            }
            "smoothing.iterations" => {
                config
                    .smoothing
                    .get_or_insert_with(Default::default)
                    .iterations = Some(parse_value(key, value_str, "integer")?);
            }
            "smoothing.factor" => {
                config.smoothing.get_or_insert_with(Default::default).factor =
                    Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
