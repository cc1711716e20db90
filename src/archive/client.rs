//! Provides the `ArchiveClient` for requesting hourly observations from the Open-Meteo
//! historical archive.

use crate::archive::response::ArchiveResponse;
use crate::fetch::error::FetchError;
use crate::fetch::session::HttpSession;
use crate::types::date_range::{DateRange, DATE_FORMAT};
use crate::types::lat_lon::LatLon;
use crate::types::variable::{UnitSystem, WeatherVariable};
use bon::bon;
use log::info;
use reqwest::Url;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1";

/// Client for the archive endpoint. Responses go through the session's cache, so
/// repeating a request for the same place, variable and dates costs no network traffic.
pub struct ArchiveClient {
    session: HttpSession,
    base_url: String,
}

#[bon]
impl ArchiveClient {
    /// `base_url` is the API root; `/archive` is appended.
    pub fn new(session: HttpSession, base_url: impl Into<String>) -> Self {
        Self {
            session,
            base_url: base_url.into(),
        }
    }

    /// Fetches one hourly variable for a location and an inclusive date range.
    ///
    /// This starts a builder: set `.variable(..)` and `.range(..)`, optionally
    /// `.units(..)` (default [`UnitSystem::Imperial`]), then `.call().await`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the request fails after retries or the body is not
    /// an archive response.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use weather_trends::{ArchiveClient, DateRange, HttpSession, LatLon, WeatherVariable};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let session = HttpSession::builder().build()?;
    /// let archive = ArchiveClient::new(session, "https://archive-api.open-meteo.com/v1");
    /// let range = DateRange::parse("2024-01-01", "2024-01-07", 31)?;
    ///
    /// let response = archive
    ///     .hourly(LatLon(35.0456, -85.3097))
    ///     .variable(WeatherVariable::Temperature)
    ///     .range(range)
    ///     .call()
    ///     .await?;
    /// println!("{} hourly values", response.hourly_payload(WeatherVariable::Temperature)?.values.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = hourly)]
    #[doc(hidden)]
    pub async fn build_hourly(
        &self,
        #[builder(start_fn)] location: LatLon,
        variable: WeatherVariable,
        range: DateRange,
        #[builder(default)] units: UnitSystem,
    ) -> Result<ArchiveResponse, FetchError> {
        let url = self.hourly_url(location, variable, range, units)?;
        info!(
            "Requesting hourly {} for {} from {}",
            variable.api_name(),
            location,
            range
        );
        self.session.get_json(&url).await
    }

    /// The request URL for [`ArchiveClient::hourly`]. It doubles as the cache key.
    pub fn hourly_url(
        &self,
        location: LatLon,
        variable: WeatherVariable,
        range: DateRange,
        units: UnitSystem,
    ) -> Result<Url, FetchError> {
        let params = [
            ("latitude", location.latitude().to_string()),
            ("longitude", location.longitude().to_string()),
            ("start_date", range.start().format(DATE_FORMAT).to_string()),
            ("end_date", range.end().format(DATE_FORMAT).to_string()),
            ("hourly", variable.api_name().to_string()),
            ("temperature_unit", units.temperature_param().to_string()),
            ("precipitation_unit", units.precipitation_param().to_string()),
            ("wind_speed_unit", units.wind_speed_param().to_string()),
            ("timeformat", "unixtime".to_string()),
            ("timezone", "GMT".to_string()),
        ];
        HttpSession::url(
            &format!("{}/archive", self.base_url.trim_end_matches('/')),
            &params,
        )
    }
}
