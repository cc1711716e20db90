pub mod daily_series;
pub mod date_range;
pub mod lat_lon;
pub mod marker;
pub mod time_series;
pub mod variable;
