//! Geographic coordinates of a resource query.

use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are in degrees.
///
/// # Examples
///
/// ```
/// use nrel_resource::LatLon;
///
/// let golden = LatLon(39.7555, -105.2211);
/// assert_eq!(golden.0, 39.7555); // Latitude
/// assert_eq!(golden.1, -105.2211); // Longitude
/// assert!(golden.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }

    /// `true` when latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.0) && (-180.0..=180.0).contains(&self.1)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::LatLon;

    #[test]
    fn test_bounds() {
        assert!(LatLon(90.0, 180.0).is_valid());
        assert!(LatLon(-90.0, -180.0).is_valid());
        assert!(!LatLon(90.5, 0.0).is_valid());
        assert!(!LatLon(0.0, -180.1).is_valid());
        assert!(!LatLon(f64::NAN, 0.0).is_valid());
    }
}
