/// The hourly block of one archive response, reduced to a single variable.
///
/// Times are unix seconds. The covered range is half-open: `start` is the first
/// timestamp, `end` lies one interval past the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPayload {
    pub start: i64,
    pub end: i64,
    pub interval: i64,
    pub utc_offset_seconds: i32,
    pub values: Vec<Option<f64>>,
}

impl HourlyPayload {
    /// Payload in UTC.
    pub fn new(start: i64, end: i64, interval: i64, values: Vec<Option<f64>>) -> Self {
        Self {
            start,
            end,
            interval,
            utc_offset_seconds: 0,
            values,
        }
    }

    pub fn with_utc_offset(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = seconds;
        self
    }
}
