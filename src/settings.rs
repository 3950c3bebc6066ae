use anyhow::{Context, Result};
use clap::{Arg, Command};
use config::Config;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use url::Url;

use crate::log::LogSettings;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// target of the relay. absent means no delivery is attempted
    #[serde(default)]
    pub webhook_url: Option<Url>,
    #[serde(default)]
    pub log: LogSettings,
    /// path of the event json document, `-` for stdin. set from the command
    /// line, not from the config file
    #[serde(skip)]
    pub event: String,
}

impl Settings {
    pub fn global() -> &'static Self {
        SETTINGS.get_or_init(|| {
            match Self::load().context("failed to load config and command line arguments") {
                Ok(settings) => settings,
                Err(err) => {
                    // tracing wasn't setup yet
                    panic!("{:#?}", err);
                }
            }
        })
    }

    fn load() -> Result<Self> {
        let opts = Command::new(clap::crate_name!())
            .version(clap::crate_version!())
            .about(clap::crate_description!())
            .arg(
                Arg::new("config")
                    .help("path of config file")
                    .takes_value(true)
                    .short('c')
                    .long("config")
                    .default_value("./config.yaml"),
            )
            .arg(
                Arg::new("level")
                    .help("log level")
                    .possible_values(["error", "warn", "info", "debug", "trace"])
                    .ignore_case(true)
                    .takes_value(true)
                    .long("log"),
            )
            .arg(
                Arg::new("event")
                    .help("path of the event json document, - for stdin")
                    .takes_value(true)
                    .default_value("-")
                    .index(1),
            )
            .get_matches();

        let config_path = opts.value_of("config").unwrap();

        let conf = Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .build()
            .context("can't load config")?;

        let mut settings: Settings = conf.try_deserialize().context("can't load config")?;

        // the webhook is fed in via environment variable in a lambda style
        // deployment, it wins over the config file
        if let Ok(hook) = std::env::var("SLACK_HOOK") {
            if hook.is_empty() {
                settings.webhook_url = None;
            } else {
                settings.webhook_url =
                    Some(hook.parse().context("SLACK_HOOK is not a valid url")?);
            }
        }

        if let Some(level) = opts.value_of("level") {
            settings.log.level = level.to_string();
        }

        settings.event = opts.value_of("event").unwrap().to_string();

        Ok(settings)
    }
}
