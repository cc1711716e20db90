mod archive;
mod cli;
mod config;
mod error;
mod fetch;
mod geocode;
mod pipeline;
mod render;
mod series;
mod types;
mod utils;

pub use error::{ErrorKind, WeatherTrendsError};
pub use pipeline::*;

pub use config::{ConfigError, Settings};

pub use archive::client::ArchiveClient;
pub use archive::response::{ArchiveResponse, HourlyBlock};
pub use fetch::cache::ResponseCache;
pub use fetch::error::FetchError;
pub use fetch::retry::RetryPolicy;
pub use fetch::session::HttpSession;
pub use geocode::client::GeocodeClient;
pub use geocode::error::GeocodeError;

pub use series::builder::build_time_series;
pub use series::error::SeriesError;
pub use series::markers::{annotate_markers, marker_stride};
pub use series::payload::HourlyPayload;
pub use series::resample::resample_daily;
pub use series::smoothing::{smooth_trend, smooth_trend_with, SavitzkyGolay};

pub use render::chart::{point_chart, trend_chart};
pub use render::{Chart, LineColor, RenderError, Renderer, SvgRenderer};

pub use cli::menu::{run_menu, MenuChoice};
pub use cli::prompt::{PromptError, Prompter};

pub use types::daily_series::{DailyMean, DailySeries, TrendPoint, TrendSeries};
pub use types::date_range::{parse_date, DateRange, DateRangeError};
pub use types::lat_lon::LatLon;
pub use types::marker::{LabelPlacement, Marker};
pub use types::time_series::{Sample, TimeSeries};
pub use types::variable::{PlotMode, ReferenceLine, UnitSystem, WeatherVariable};
