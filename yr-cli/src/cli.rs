use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, CustomUserError, Text, validator::Validation};
use tracing::debug;
use yr_core::{
    ClientOptions, Config, Language, LocationSpec, TableStyle, YrClient,
    config::validate_date_format,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "yr", version, about = "Forecasts from yr.no")]
pub struct Cli {
    /// Language for labels and feed variant (nb, nn, en). Defaults to the URL's.
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Bypass the cache for this invocation.
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Location {
    /// yr.no place URL, e.g. http://www.yr.no/sted/Norge/Oslo/Oslo/Oslo
    pub url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set cache, date format and default location.
    Configure,

    /// Show place details and sun times.
    Info {
        #[command(flatten)]
        location: Location,
    },

    /// List forecast periods.
    Forecast {
        #[command(flatten)]
        location: Location,

        /// Only the 12:00-18:00 period of the next three days.
        #[arg(long)]
        three_days: bool,

        /// Print entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the forecast as HTML tables.
    Table {
        #[command(flatten)]
        location: Location,

        /// Leave out the <style> block.
        #[arg(long)]
        no_style: bool,

        /// Header background colour.
        #[arg(long)]
        header_bg: Option<String>,

        /// Header text colour.
        #[arg(long)]
        header_color: Option<String>,
    },

    /// Print the URL of the PDF forecast.
    Pdf {
        #[command(flatten)]
        location: Location,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        debug!(
            default_url = ?config.default_url,
            cache_directory = ?config.client.cache_directory,
            date_format = %config.client.date_format,
            "configuration loaded"
        );

        match &self.command {
            Command::Configure => configure(config),
            Command::Info { location } => {
                let client = self.client(&config, location)?;
                let (report, cache_error) = client.report_checked().await?;
                if let Some(e) = cache_error {
                    eprintln!("warning: {e}");
                }
                let format = &client.options().date_format;
                print!("{}", output::info(&report, format)?);
                Ok(())
            }
            Command::Forecast {
                location,
                three_days,
                json,
            } => {
                let client = self.client(&config, location)?;
                let entries = if *three_days {
                    client.forecast_next_three_days().await?
                } else {
                    client.forecast().await?
                };

                if *json {
                    let text = serde_json::to_string_pretty(&entries)
                        .context("Failed to serialize forecast to JSON")?;
                    println!("{text}");
                } else {
                    print!("{}", output::forecast(&entries, client.language()));
                }
                Ok(())
            }
            Command::Table {
                location,
                no_style,
                header_bg,
                header_color,
            } => {
                let client = self.client(&config, location)?;
                let defaults = TableStyle::default();
                let style = TableStyle {
                    include_default_style: !no_style,
                    header_background: header_bg.clone().unwrap_or(defaults.header_background),
                    header_text_color: header_color.clone().unwrap_or(defaults.header_text_color),
                };
                println!("{}", client.forecast_table(&style).await?);
                Ok(())
            }
            Command::Pdf { location } => {
                let client = self.client(&config, location)?;
                println!("{}", client.pdf_url());
                Ok(())
            }
        }
    }

    fn client(&self, config: &Config, location: &Location) -> anyhow::Result<YrClient> {
        let url = match location.url.as_deref() {
            Some(url) => url,
            None => config.default_url()?,
        };

        let mut options = config.client.clone();
        if self.no_cache {
            options.cache_directory = None;
        }

        let mut client = YrClient::new(url, options)?;
        if let Some(lang) = self.lang {
            client.set_language(lang);
        }
        debug!(
            location = url,
            feed_url = %client.feed_url(),
            language = %client.language(),
            cache = client.options().cache_directory.is_some(),
            "client ready"
        );
        Ok(client)
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current = config.client.clone();

    let use_cache = Confirm::new("Cache downloaded forecasts on disk?")
        .with_default(current.cache_directory.is_some())
        .prompt()?;

    let cache_directory = if use_cache {
        let suggested = match &current.cache_directory {
            Some(dir) => dir.clone(),
            None => Config::default_cache_dir()?,
        };
        let dir = Text::new("Cache directory:")
            .with_default(&suggested.to_string_lossy())
            .prompt()?;
        let dir = std::path::PathBuf::from(dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
        Some(dir)
    } else {
        None
    };

    let cache_ttl_seconds = CustomType::<u64>::new("Cache lifetime in seconds:")
        .with_default(current.cache_ttl_seconds)
        .prompt()?;

    let date_format = Text::new("Date format (strftime):")
        .with_default(&current.date_format)
        .with_validator(|s: &str| -> Result<Validation, CustomUserError> {
            Ok(match validate_date_format(s) {
                Ok(()) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;

    let default_url = Text::new("Default location URL (empty for none):")
        .with_default(config.default_url.as_deref().unwrap_or(""))
        .with_validator(|s: &str| -> Result<Validation, CustomUserError> {
            Ok(if s.trim().is_empty() {
                Validation::Valid
            } else {
                match LocationSpec::resolve(s) {
                    Ok(_) => Validation::Valid,
                    Err(e) => Validation::Invalid(e.to_string().into()),
                }
            })
        })
        .prompt()?;

    config.client = ClientOptions {
        cache_directory,
        cache_ttl_seconds,
        date_format,
        ..current
    };
    config.default_url = Some(default_url.trim().to_string()).filter(|s| !s.is_empty());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
