use itertools::izip;
use jiff::civil::DateTime;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::{AppConfig, USER_AGENT},
    error::{ApplicationError, ApplicationResult},
    wind::WindObservation,
};

pub(crate) trait ForecastSource {
    async fn fetch(&self) -> ApplicationResult<ForecastSeries>;
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    hourly: HourlyWind,
}

/// Parallel arrays, one element per hour. Open-Meteo sends `null` for hours
/// the model does not cover.
#[derive(Debug, Deserialize)]
struct HourlyWind {
    time: Vec<String>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_direction_10m: Vec<Option<f64>>,
}

/// Hourly wind at the airport, keyed by local wall clock time.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ForecastSeries {
    entries: Vec<(DateTime, WindObservation)>,
}

impl ForecastSeries {
    pub fn new(entries: Vec<(DateTime, WindObservation)>) -> Self {
        Self { entries }
    }

    pub fn from_json(body: &str) -> ApplicationResult<Self> {
        let response: OpenMeteoResponse =
            serde_json::from_str(body).map_err(|e| ApplicationError::DataError(e.to_string()))?;
        Self::from_hourly(response.hourly)
    }

    pub fn entries(&self) -> &[(DateTime, WindObservation)] {
        &self.entries
    }

    /// Only an exact match on the local time counts.
    pub fn wind_at(&self, at: DateTime) -> ApplicationResult<WindObservation> {
        self.entries
            .iter()
            .find(|(time, _)| *time == at)
            .map(|&(_, wind)| wind)
            .ok_or(ApplicationError::ForecastMissing(at))
    }

    fn from_hourly(hourly: HourlyWind) -> ApplicationResult<Self> {
        let HourlyWind {
            time,
            wind_speed_10m,
            wind_direction_10m,
        } = hourly;
        if time.len() != wind_speed_10m.len() || time.len() != wind_direction_10m.len() {
            return Err(ApplicationError::DataError(format!(
                "hourly arrays differ in length: {} times, {} speeds, {} directions",
                time.len(),
                wind_speed_10m.len(),
                wind_direction_10m.len()
            )));
        }

        let mut entries = Vec::with_capacity(time.len());
        for (time, speed, direction) in izip!(time, wind_speed_10m, wind_direction_10m) {
            let at = time.parse::<DateTime>().map_err(|e| {
                ApplicationError::DataError(format!("invalid timestamp {time:?}: {e}"))
            })?;
            match (speed, direction) {
                (Some(speed), Some(direction)) => {
                    entries.push((at, WindObservation::new(speed, direction)))
                }
                _ => debug!(%at, "No wind data for hour"),
            }
        }
        Ok(Self::new(entries))
    }
}

pub(crate) struct OpenMeteoClient {
    client: reqwest::Client,
    url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &AppConfig) -> ApplicationResult<Self> {
        let url = format!(
            "{}?latitude={}&longitude={}&hourly=wind_speed_10m,wind_direction_10m&timezone={}&forecast_days={}&wind_speed_unit=kn",
            config.forecast.url,
            config.location.latitude,
            config.location.longitude,
            config.timezone_name,
            config.forecast.days,
        );
        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ForecastSource for OpenMeteoClient {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> ApplicationResult<ForecastSeries> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = body.len(), "Received forecast");
        ForecastSeries::from_json(&body)
    }
}
