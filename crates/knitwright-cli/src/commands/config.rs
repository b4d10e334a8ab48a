//! `knitwright config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.data(&value)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(&config.to_toml()?)?;
        }

        ConfigCommands::Path => {
            output.data(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let value = match key {
        "defaults.craft" => config.defaults.craft.to_string(),
        "defaults.language" => config.defaults.language.to_string(),
        "defaults.abbreviate" => config.defaults.abbreviate.to_string(),
        "defaults.unit" => config.defaults.unit.to_string(),
        "output.no_color" => config.output.no_color.to_string(),
        "output.format" => config.output.format.clone(),
        "patterns.local_path" => config
            .patterns
            .local_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        _ => template_value(config, key).ok_or_else(|| CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        })?,
    };
    Ok(value)
}

/// `templates.<craft>.<kind>`
fn template_value(config: &AppConfig, key: &str) -> Option<String> {
    let mut parts = key.splitn(3, '.');
    if parts.next() != Some("templates") {
        return None;
    }
    let (craft, kind) = (parts.next()?, parts.next()?);
    config.templates.get(craft)?.get(kind).cloned()
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.craft").unwrap(), "knitting");
        assert_eq!(get_config_value(&cfg, "defaults.language").unwrap(), "en-us");
        assert_eq!(get_config_value(&cfg, "defaults.unit").unwrap(), "cm");
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "patterns.local_path").unwrap(), "");
    }

    #[test]
    fn get_template_override() {
        let mut cfg = AppConfig::default();
        cfg.templates
            .entry("crochet".into())
            .or_default()
            .insert("plain".into(), "Ch 1, sc across ({stitches} sts).".into());
        assert_eq!(
            get_config_value(&cfg, "templates.crochet.plain").unwrap(),
            "Ch 1, sc across ({stitches} sts)."
        );
        assert!(get_config_value(&cfg, "templates.crochet.cast_on").is_err());
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
