//! The single plotting pipeline behind both menu entries.
//!
//! A request names a plot mode, a variable, a place and a date range. The pipeline
//! resolves the place, fetches the hourly archive data, builds the series and then
//! either annotates it (point plot) or resamples and smooths it (trend plot) before
//! handing the chart to the renderer.

use crate::archive::client::{ArchiveClient, DEFAULT_ARCHIVE_URL};
use crate::archive::response::ArchiveResponse;
use crate::config::{Settings, DEFAULT_MAX_POINT_SPAN_DAYS, DEFAULT_MAX_TREND_SPAN_DAYS};
use crate::error::WeatherTrendsError;
use crate::fetch::cache::ResponseCache;
use crate::fetch::session::HttpSession;
use crate::geocode::client::{GeocodeClient, DEFAULT_GEOCODE_URL, DEFAULT_REGION};
use crate::render::chart::{point_chart, trend_chart};
use crate::render::{Chart, Renderer, SvgRenderer};
use crate::series::builder::build_time_series;
use crate::series::error::SeriesError;
use crate::series::markers::annotate_markers;
use crate::series::resample::resample_daily;
use crate::series::smoothing::smooth_trend;
use crate::types::date_range::{DateRange, DateRangeError};
use crate::types::lat_lon::LatLon;
use crate::types::time_series::TimeSeries;
use crate::types::variable::{PlotMode, UnitSystem, WeatherVariable};
use bon::bon;
use log::{debug, info};
use std::path::PathBuf;

/// What to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub mode: PlotMode,
    pub variable: WeatherVariable,
    pub city: String,
    pub state: String,
    pub range: DateRange,
}

/// Where the plot went, plus what the archive reported about the location.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOutcome {
    pub path: PathBuf,
    pub location: LatLon,
    pub elevation: Option<f64>,
    pub timezone: Option<String>,
    pub utc_offset_seconds: i32,
    /// Hourly samples received, with and without a value.
    pub samples: usize,
    pub present_samples: usize,
}

/// Builds the chart for `mode` from an hourly series.
///
/// # Errors
///
/// Trend plots fail with [`SeriesError::InsufficientData`] when the series covers fewer
/// days than the smoothing window or has no values at all.
pub fn chart_from_series(
    mode: PlotMode,
    variable: WeatherVariable,
    units: UnitSystem,
    city: &str,
    state: &str,
    series: &TimeSeries,
) -> Result<Chart, SeriesError> {
    match mode {
        PlotMode::Point => {
            let markers = annotate_markers(series, variable.unit(units));
            debug!("Annotated {} of {} samples", markers.len(), series.len());
            Ok(point_chart(variable, units, city, state, series, markers))
        }
        PlotMode::Trend => {
            let daily = resample_daily(series)?;
            let trend = smooth_trend(&daily)?;
            Ok(trend_chart(variable, units, city, state, &trend))
        }
    }
}

/// One run's worth of clients and settings.
pub struct WeatherTrends {
    geocoder: GeocodeClient,
    archive: ArchiveClient,
    renderer: Box<dyn Renderer>,
    units: UnitSystem,
    max_point_span_days: i64,
    max_trend_span_days: i64,
}

#[bon]
impl WeatherTrends {
    #[builder]
    pub fn new(
        session: HttpSession,
        renderer: Box<dyn Renderer>,
        #[builder(into, default = DEFAULT_ARCHIVE_URL.to_string())] archive_base_url: String,
        #[builder(into, default = DEFAULT_GEOCODE_URL.to_string())] geocode_base_url: String,
        #[builder(into, default = DEFAULT_REGION.to_string())] geocode_region: String,
        #[builder(into)] api_key: Option<String>,
        #[builder(default)] units: UnitSystem,
        #[builder(default = DEFAULT_MAX_POINT_SPAN_DAYS)] max_point_span_days: i64,
        #[builder(default = DEFAULT_MAX_TREND_SPAN_DAYS)] max_trend_span_days: i64,
    ) -> Self {
        let geocoder = GeocodeClient::builder()
            .session(session.clone())
            .base_url(geocode_base_url)
            .region(geocode_region)
            .maybe_api_key(api_key)
            .build();
        Self {
            geocoder,
            archive: ArchiveClient::new(session, archive_base_url),
            renderer,
            units,
            max_point_span_days,
            max_trend_span_days,
        }
    }

    /// Sets up the cache, HTTP session and SVG renderer described by `settings`.
    pub async fn from_settings(settings: &Settings) -> Result<Self, WeatherTrendsError> {
        let cache = if settings.no_cache {
            None
        } else {
            Some(ResponseCache::open(settings.resolved_cache_dir()?).await?)
        };
        let session = HttpSession::builder()
            .maybe_cache(cache)
            .retry(settings.retry_policy())
            .timeout(settings.timeout())
            .build()?;

        Ok(Self::builder()
            .session(session)
            .renderer(Box::new(SvgRenderer::new(&settings.output_dir)))
            .archive_base_url(settings.archive_base_url.as_str())
            .geocode_base_url(settings.geocode_base_url.as_str())
            .geocode_region(settings.geocode_region.as_str())
            .maybe_api_key(settings.api_key.clone())
            .units(settings.units)
            .max_point_span_days(settings.max_point_span_days)
            .max_trend_span_days(settings.max_trend_span_days)
            .build())
    }

    pub fn max_span_days(&self, mode: PlotMode) -> i64 {
        match mode {
            PlotMode::Point => self.max_point_span_days,
            PlotMode::Trend => self.max_trend_span_days,
        }
    }

    /// Parses and validates a date range against the span limit of `mode`.
    pub fn date_range(
        &self,
        mode: PlotMode,
        start: &str,
        end: &str,
    ) -> Result<DateRange, DateRangeError> {
        DateRange::parse(start, end, self.max_span_days(mode))
    }

    pub async fn resolve_location(
        &self,
        city: &str,
        state: &str,
    ) -> Result<LatLon, WeatherTrendsError> {
        Ok(self.geocoder.resolve(city, state).await?)
    }

    /// Fetches one variable and turns the response into an hourly series.
    pub async fn fetch_series(
        &self,
        location: LatLon,
        variable: WeatherVariable,
        range: DateRange,
    ) -> Result<(ArchiveResponse, TimeSeries), WeatherTrendsError> {
        let response = self
            .archive
            .hourly(location)
            .variable(variable)
            .range(range)
            .units(self.units)
            .call()
            .await?;
        info!(
            "Archive grid point {:.4}°N {:.4}°E, elevation {:?} m, timezone {:?} ({} s from GMT)",
            response.latitude,
            response.longitude,
            response.elevation,
            response.timezone,
            response.utc_offset_seconds
        );
        let series = build_time_series(response.hourly_payload(variable)?)?;
        Ok((response, series))
    }

    /// Runs the whole pipeline for one request and returns where the plot was written.
    pub async fn run(&self, request: &PlotRequest) -> Result<PlotOutcome, WeatherTrendsError> {
        let range = DateRange::new(
            request.range.start(),
            request.range.end(),
            self.max_span_days(request.mode),
        )?;
        let location = self.resolve_location(&request.city, &request.state).await?;
        let (response, series) = self.fetch_series(location, request.variable, range).await?;

        let chart = chart_from_series(
            request.mode,
            request.variable,
            self.units,
            &request.city,
            &request.state,
            &series,
        )?;
        let path = self.renderer.render(&chart)?;

        Ok(PlotOutcome {
            path,
            location,
            elevation: response.elevation,
            timezone: response.timezone,
            utc_offset_seconds: response.utc_offset_seconds,
            samples: series.len(),
            present_samples: series.present_count(),
        })
    }
}
