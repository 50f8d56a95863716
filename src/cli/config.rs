//! Settings CLI commands

use clap::Subcommand;
use tracing::info;

use crate::config::{ResidualPaths, Settings, Theme};
use crate::error::{ResidualError, ResidualResult};

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current settings and paths
    Show,
    /// Set the theme: light, dark, or toggle
    Theme {
        value: String,
    },
    /// Configure the image host
    ImageHost {
        /// LskyPro or EasyImages
        #[arg(short, long)]
        kind: Option<String>,
        /// Base URL (http or https)
        #[arg(short, long)]
        url: Option<String>,
        /// API token
        #[arg(short, long)]
        token: Option<String>,
        /// markdown or url
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Restore the default image host
    ResetImageHost,
    /// Set the high-value threshold
    Threshold {
        value: f64,
    },
    /// Set the corner toasts stack from: bottom-right or top-right
    ToastPosition {
        value: String,
    },
}

/// Handle a config command
pub fn handle_config_command(
    cmd: ConfigCommands,
    settings: &mut Settings,
    paths: &ResidualPaths,
) -> ResidualResult<()> {
    match cmd {
        ConfigCommands::Show => {
            print_settings(settings, paths);
            return Ok(());
        }

        ConfigCommands::Theme { value } => {
            let theme = if value.trim().eq_ignore_ascii_case("toggle") {
                settings.toggle_theme()
            } else {
                let theme: Theme = value.parse()?;
                settings.theme = Some(theme);
                theme
            };
            println!("Theme set to {}", theme);
        }

        ConfigCommands::ImageHost {
            kind,
            url,
            token,
            format,
        } => {
            let mut host = settings.image_host.clone();
            if let Some(kind) = kind {
                host.kind = kind.parse()?;
            }
            if let Some(url) = url {
                host.url = url.trim().trim_end_matches('/').to_string();
            }
            if let Some(token) = token {
                host.token = token;
            }
            if let Some(format) = format {
                host.copy_format = format.parse()?;
            }
            host.validate()?;
            settings.image_host = host;
            println!("Image host saved: {:?} at {}", settings.image_host.kind, settings.image_host.url);
        }

        ConfigCommands::ResetImageHost => {
            settings.reset_image_host();
            println!("Image host restored to defaults");
        }

        ConfigCommands::Threshold { value } => {
            if !value.is_finite() || value < 0.0 {
                return Err(ResidualError::validation(format!(
                    "Threshold must be a non-negative number, got {}",
                    value
                )));
            }
            settings.high_value_threshold = value;
            println!("High-value threshold set to {:.2}", value);
        }

        ConfigCommands::ToastPosition { value } => {
            settings.toast_anchor = value.parse()?;
            println!("Toast position set to {}", settings.toast_anchor);
        }
    }

    settings.save(paths)?;
    info!("settings updated from command line");
    Ok(())
}

fn print_settings(settings: &Settings, paths: &ResidualPaths) {
    println!("Residual Configuration");
    println!("======================");
    println!("Data directory:   {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Log file:         {}", paths.log_file().display());
    println!();
    println!(
        "Version:          {}",
        settings.app_version.as_deref().unwrap_or("-")
    );
    println!(
        "Theme:            {}",
        settings
            .theme
            .map(|t| t.to_string())
            .unwrap_or_else(|| "system".to_string())
    );
    println!("Default currency: {}", settings.default_currency);
    println!("Threshold:        {:.2}", settings.high_value_threshold);
    println!("Toast duration:   {} ms", settings.notification_duration_ms);
    println!("Toast position:   {}", settings.toast_anchor);
    println!(
        "Share base URL:   {}",
        settings.share_base_url.as_deref().unwrap_or("-")
    );
    println!();
    println!("Image host:       {:?}", settings.image_host.kind);
    println!("  URL:            {}", settings.image_host.url);
    println!(
        "  Token:          {}",
        if settings.image_host.token.is_empty() {
            "(none)"
        } else {
            "(set)"
        }
    );
    println!("  Copy format:    {:?}", settings.image_host.copy_format);
}
