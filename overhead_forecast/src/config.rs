use std::{
    fs,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use directories::ProjectDirs;
use indexmap::IndexMap;
use jiff::tz::TimeZone;
use serde::Deserialize;
use tracing::debug;
use tracing_unwrap::ResultExt;

use crate::{
    error::ApplicationResult,
    runway::Runway,
    schedule::{NightPair, RunwaySchedule},
};

pub(crate) const USER_AGENT: &str = concat!("overhead-forecast/", env!("CARGO_PKG_VERSION"));

const DEFAULT_CONFIG: &str = include_str!("../config.toml");
const ENV_PREFIX: &str = "OVERHEAD";

pub(crate) fn overhead_forecast_project_dir() -> Option<ProjectDirs> {
    ProjectDirs::from("", "meltinglava", "overhead_forecast")
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastSettings {
    pub url: String,
    pub days: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NotifySettings {
    pub enabled: bool,
    pub server: Option<String>,
    pub topic: Option<String>,
}

impl NotifySettings {
    /// `{server}/{topic}`, only when notifications are enabled and both parts are set.
    pub fn endpoint(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let server = self
            .server
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())?;
        let topic = self
            .topic
            .as_deref()
            .map(|t| t.trim().trim_matches('/'))
            .filter(|t| !t.is_empty())?;
        Some(format!("{server}/{topic}"))
    }
}

#[derive(Debug, Deserialize)]
struct ScheduleSettings {
    day_fallback: Runway,
    night_fallback: NightPair,
    #[serde(default)]
    day: IndexMap<String, Runway>,
    #[serde(default)]
    night: IndexMap<String, NightPair>,
}

#[derive(Debug, Deserialize)]
struct Configurable {
    timezone: String,
    location: Location,
    forecast: ForecastSettings,
    notify: NotifySettings,
    schedule: ScheduleSettings,
}

#[derive(Debug)]
pub(crate) struct AppConfig {
    pub timezone_name: String,
    pub time_zone: TimeZone,
    pub location: Location,
    pub forecast: ForecastSettings,
    pub notify: NotifySettings,
    pub schedule: RunwaySchedule,
}

impl AppConfig {
    /// Loads the embedded defaults, then `config_file` (or the per user config
    /// file when none is given), then the environment.
    pub fn load(config_file: Option<&Path>) -> ApplicationResult<Self> {
        let user_file = match config_file {
            Some(path) => Some(File::from(path.to_path_buf()).required(true)),
            None => default_config_file().map(|path| File::from(path).required(false)),
        };
        Self::from_configurable(build_configuration(user_file, environment())?)
    }

    fn from_configurable(configurable: Configurable) -> ApplicationResult<Self> {
        let Configurable {
            timezone,
            location,
            forecast,
            notify,
            schedule,
        } = configurable;
        let time_zone = TimeZone::get(&timezone)?;
        let schedule = RunwaySchedule::new(
            &schedule.day,
            &schedule.night,
            schedule.day_fallback,
            schedule.night_fallback,
        )?;
        Ok(Self {
            timezone_name: timezone,
            time_zone,
            location,
            forecast,
            notify,
            schedule,
        })
    }
}

/// `OVERHEAD_<SECTION>__<KEY>`, e.g. `OVERHEAD_NOTIFY__ENABLED=true`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn build_configuration(
    user_file: Option<File<FileSourceFile, FileFormat>>,
    environment: Environment,
) -> Result<Configurable, ConfigError> {
    let mut builder =
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
    if let Some(file) = user_file {
        builder = builder.add_source(file);
    }
    builder
        .add_source(environment)
        .build()?
        .try_deserialize::<Configurable>()
}

/// The per user config file, written from the defaults on first run.
fn default_config_file() -> Option<PathBuf> {
    let config_dir = overhead_forecast_project_dir()?.config_dir().to_path_buf();
    let config_file = config_dir.join("config.toml");
    if !config_file.exists() {
        debug!("Creating default config file at {:?}", config_file);
        fs::create_dir_all(&config_dir)
            .and_then(|()| fs::write(&config_file, DEFAULT_CONFIG))
            .ok_or_log()?;
    }
    Some(config_file)
}
