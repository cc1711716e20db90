//! Geographic coordinates resolved for one invocation.

use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use weather_trends::LatLon;
///
/// let chattanooga = LatLon(35.0456, -85.3097);
/// assert_eq!(chattanooga.0, 35.0456); // Latitude
/// assert_eq!(chattanooga.1, -85.3097); // Longitude
/// assert!(chattanooga.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// Returns `true` when latitude is within -90..=90 and longitude within -180..=180.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.0) && (-180.0..=180.0).contains(&self.1)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°N {:.4}°E", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        assert!(LatLon(0.0, 0.0).is_valid());
        assert!(LatLon(90.0, 180.0).is_valid());
        assert!(LatLon(-90.0, -180.0).is_valid());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(!LatLon(91.0, 0.0).is_valid());
        assert!(!LatLon(0.0, -181.0).is_valid());
        assert!(!LatLon(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(LatLon(35.0456, -85.3097).to_string(), "35.0456°N -85.3097°E");
    }
}
