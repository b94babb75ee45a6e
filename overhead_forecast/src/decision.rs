use std::process::ExitCode;

use jiff::{Zoned, civil::Date};
use tracing::{debug, error, info, warn};

use crate::{
    error::{ApplicationError, ApplicationResult},
    forecast::ForecastSource,
    notify::Notify,
    runway::{Runway, RunwayStrip},
    schedule::RunwaySchedule,
    wind::WindObservation,
};

/// Morning arrivals start at 06:00 local, this is the hour we forecast for.
pub const ARRIVALS_HOUR: i8 = 6;
const NIGHT_START_HOUR: i8 = 22;

pub const FORECAST_UNAVAILABLE: &str = "❓ Could not retrieve 6 AM wind forecast.";
const EASTERLY: &str = "😴 No planes overhead — easterly ops expected.";
const HEAVY_ARRIVALS: &str = " 🚨 Heavy arrivals on both runways between 06:00–07:00.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Day,
    Night,
}

impl Regime {
    pub fn from_hour(hour: i8) -> Self {
        if !(ARRIVALS_HOUR..NIGHT_START_HOUR).contains(&hour) {
            Self::Night
        } else {
            Self::Day
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub westerly: bool,
    pub runway: Runway,
    pub regime: Regime,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::Failed => ExitCode::FAILURE,
        }
    }
}

/// The next 06:00: today before six in the morning, otherwise tomorrow.
pub fn target_date(now: &Zoned) -> ApplicationResult<Date> {
    let today = now.date();
    if now.hour() < ARRIVALS_HOUR {
        Ok(today)
    } else {
        Ok(today.tomorrow()?)
    }
}

/// Night runways depend on the wind, the day alternation does not.
pub fn decide(
    now: &Zoned,
    target: Date,
    wind: WindObservation,
    schedule: &RunwaySchedule,
) -> Decision {
    let westerly = wind.is_westerly();
    let regime = Regime::from_hour(now.hour());
    let runway = match regime {
        Regime::Night => schedule.night_runway(target, westerly),
        Regime::Day => schedule.day_runway(target),
    };
    let message = compose_message(westerly, runway, wind, now.hour() == ARRIVALS_HOUR);
    Decision {
        westerly,
        runway,
        regime,
        message,
    }
}

pub fn compose_message(
    westerly: bool,
    runway: Runway,
    wind: WindObservation,
    heavy_arrivals: bool,
) -> String {
    if !westerly {
        return EASTERLY.to_string();
    }
    let conditions = format!(
        "{:.1} kt from {:.0}°.",
        wind.speed_knots, wind.direction_degrees
    );
    let mut message = match runway.strip() {
        RunwayStrip::Southern => {
            format!("🔊 Planes likely overhead on southern runway ({runway}) — {conditions}")
        }
        RunwayStrip::Northern => format!("✅ Planes on northern runway ({runway}) — {conditions}"),
    };
    if heavy_arrivals {
        message.push_str(HEAVY_ARRIVALS);
    }
    message
}

pub(crate) struct DecisionEngine<'a, S, N> {
    source: &'a S,
    notifier: &'a N,
    schedule: &'a RunwaySchedule,
}

impl<'a, S: ForecastSource, N: Notify> DecisionEngine<'a, S, N> {
    pub fn new(source: &'a S, notifier: &'a N, schedule: &'a RunwaySchedule) -> Self {
        Self {
            source,
            notifier,
            schedule,
        }
    }

    async fn evaluate(&self, now: &Zoned) -> ApplicationResult<String> {
        let target = target_date(now)?;
        let at = target.at(ARRIVALS_HOUR, 0, 0, 0);
        debug!(%now, %at, "Fetching forecast");
        let series = self.source.fetch().await?;
        let wind = match series.wind_at(at) {
            Ok(wind) => wind,
            Err(ApplicationError::ForecastMissing(at)) => {
                warn!(%at, hours = series.entries().len(), "Forecast has no entry for arrivals hour");
                return Ok(FORECAST_UNAVAILABLE.to_string());
            }
            Err(e) => return Err(e),
        };
        let decision = decide(now, target, wind, self.schedule);
        info!(
            westerly = decision.westerly,
            runway = %decision.runway,
            regime = ?decision.regime,
            speed = wind.speed_knots,
            direction = wind.direction_degrees,
            "Runway decided"
        );
        Ok(decision.message)
    }

    /// One attempt. Every outcome, failures included, produces exactly one notification.
    pub async fn run(&self, now: &Zoned) -> RunStatus {
        match self.evaluate(now).await {
            Ok(message) => {
                self.notifier.deliver(&message).await;
                RunStatus::Completed
            }
            Err(e) => report_failure(self.notifier, &e).await,
        }
    }
}

/// Logs `error` and delivers it as the error notification.
pub(crate) async fn report_failure<N: Notify>(
    notifier: &N,
    error: &ApplicationError,
) -> RunStatus {
    error!("Plane forecast failed: {error}");
    notifier
        .deliver(&format!("⚠️ Error in plane forecast: {error}"))
        .await;
    RunStatus::Failed
}
