use std::fmt::Display;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::cli_types::ExportArgs;
use crate::config::{Setting, Settings, config_path};
use crate::error::CliError;

fn mask_value(s: &str) -> String {
    if s.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", s.chars().take(4).collect::<String>())
    }
}

fn show_setting<T: Display>(name: &str, setting: &Setting<T>, is_secret: bool) {
    let label = format!("{name}:");
    let source = format!("({})", setting.source);
    match &setting.value {
        Some(v) => {
            let v = v.to_string();
            let v = if is_secret { mask_value(&v) } else { v };
            log::info!(
                "  {} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                v,
                source.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  {} {} {}",
                label.if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
}

/// Show resolved settings and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let settings = Settings::load(&ExportArgs::default())?;

    log::info!(
        "{}",
        "gametrack-data Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match config_path() {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let database = Setting {
        value: settings.database.value.as_ref().map(|p| p.display()),
        source: settings.database.source.clone(),
    };
    show_setting("database", &database, false);
    show_setting("github.repository", &settings.repository, false);
    show_setting("github.token", &settings.token, true);
    show_setting("github.branch", &settings.branch, false);
    show_setting("github.path", &settings.path, false);
    show_setting("github.message", &settings.message, false);
    show_setting("wikidata.endpoint", &settings.wikidata_endpoint, false);
    show_setting("wikidata.user_agent", &settings.user_agent, false);

    if settings.github_credentials().is_none() {
        log::info!("");
        log::info!(
            "  {}",
            "GitHub publishing is disabled until both repository and token are set"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = config_path().ok_or_else(|| CliError::config("Could not determine config directory"))?;
    println!("{}", path.display());
    Ok(())
}
