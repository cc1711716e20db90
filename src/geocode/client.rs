//! Resolves a US city and state to coordinates through geocode.xyz.

use crate::fetch::session::HttpSession;
use crate::geocode::error::GeocodeError;
use crate::types::lat_lon::LatLon;
use bon::bon;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_GEOCODE_URL: &str = "https://geocode.xyz";
pub const DEFAULT_REGION: &str = "US";

/// geocode.xyz answers throttled requests with a 200 and this error code.
const THROTTLED_CODE: &str = "006";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    latt: Option<Value>,
    longt: Option<Value>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

pub struct GeocodeClient {
    session: HttpSession,
    base_url: String,
    region: String,
    api_key: Option<String>,
}

#[bon]
impl GeocodeClient {
    #[builder]
    pub fn new(
        session: HttpSession,
        #[builder(into, default = DEFAULT_GEOCODE_URL.to_string())] base_url: String,
        #[builder(into, default = DEFAULT_REGION.to_string())] region: String,
        #[builder(into)] api_key: Option<String>,
    ) -> Self {
        Self {
            session,
            base_url,
            region,
            api_key,
        }
    }

    /// Looks up `"{city} {state}"` restricted to the configured region.
    ///
    /// Responses are never cached: the service reports throttling and lookup failures
    /// inside successful responses.
    ///
    /// # Errors
    ///
    /// * [`GeocodeError::EmptyQuery`] if `city` is blank.
    /// * [`GeocodeError::Fetch`] if the request fails.
    /// * [`GeocodeError::Throttled`] or [`GeocodeError::Service`] if the service reports an error.
    /// * [`GeocodeError::MissingCoordinates`], [`GeocodeError::InvalidCoordinate`] or
    ///   [`GeocodeError::OutOfRange`] if the response holds no usable position.
    pub async fn resolve(&self, city: &str, state: &str) -> Result<LatLon, GeocodeError> {
        let query = format!("{} {}", city.trim(), state.trim()).trim().to_string();
        if city.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let mut params = vec![
            ("locate", query.clone()),
            ("region", self.region.clone()),
            ("json", "1".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("auth", key.clone()));
        }
        let url = HttpSession::url(&format!("{}/", self.base_url.trim_end_matches('/')), &params)?;

        debug!("Geocoding '{}'", query);
        let response: GeocodeResponse = self.session.get_json_fresh(&url).await?;
        let location = interpret(&query, response)?;
        info!("Resolved '{}' to {}", query, location);
        Ok(location)
    }
}

fn interpret(query: &str, response: GeocodeResponse) -> Result<LatLon, GeocodeError> {
    if let Some(error) = response.error {
        let code = match error.code {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let description = error.description.unwrap_or_default();
        if code == THROTTLED_CODE {
            return Err(GeocodeError::Throttled(description));
        }
        return Err(GeocodeError::Service {
            query: query.to_string(),
            code,
            description,
        });
    }

    let (Some(latt), Some(longt)) = (response.latt, response.longt) else {
        return Err(GeocodeError::MissingCoordinates(query.to_string()));
    };
    let location = LatLon(coordinate("latt", &latt)?, coordinate("longt", &longt)?);
    if !location.is_valid() {
        return Err(GeocodeError::OutOfRange(location));
    }
    Ok(location)
}

/// The service sends coordinates as decimal strings; plain numbers are accepted too.
fn coordinate(field: &'static str, value: &Value) -> Result<f64, GeocodeError> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::InvalidCoordinate {
            field,
            value: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
}
