//! Geographic point and bounding box types used for ERA5 requests.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use era5_spi::LatLon;
///
/// let alice_holt = LatLon(51.1536, -0.8582);
/// assert_eq!(alice_holt.0, 51.1536); // Latitude
/// assert_eq!(alice_holt.1, -0.8582); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Half width (degrees) of the box requested around a point, one ERA5 grid half-cell.
pub const DEFAULT_HALF_WIDTH_DEG: f64 = 0.125;

/// A bounding box in degrees.
///
/// CDS expects areas as `[north, west, south, east]`, which is how this type serialises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl Area {
    pub fn new(north: f64, west: f64, south: f64, east: f64) -> Self {
        Self {
            north,
            west,
            south,
            east,
        }
    }

    /// A square box of `half_width_deg` around `center`.
    ///
    /// ```
    /// use era5_spi::{Area, LatLon};
    ///
    /// let area = Area::around(LatLon(51.0, -1.0), 0.125);
    /// assert_eq!(area.as_array(), [51.125, -1.125, 50.875, -0.875]);
    /// ```
    pub fn around(center: LatLon, half_width_deg: f64) -> Self {
        Self {
            north: center.0 + half_width_deg,
            west: center.1 - half_width_deg,
            south: center.0 - half_width_deg,
            east: center.1 + half_width_deg,
        }
    }

    /// A degenerate box selecting the grid cell nearest to `location`.
    pub fn point(location: LatLon) -> Self {
        Self::around(location, 0.0)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.north, self.west, self.south, self.east]
    }

    pub fn center(&self) -> LatLon {
        LatLon(
            (self.north + self.south) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

impl Serialize for Area {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        for value in self.as_array() {
            tuple.serialize_element(&value)?;
        }
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_serialises_as_nwse_array() {
        let area = Area::new(51.1, 0.85, 49.6, 0.9);
        let json = serde_json::to_string(&area).unwrap();
        assert_eq!(json, "[51.1,0.85,49.6,0.9]");
    }

    #[test]
    fn test_point_area() {
        let area = Area::point(LatLon(51.2, -0.9));
        assert_eq!(area.as_array(), [51.2, -0.9, 51.2, -0.9]);
        assert_eq!(area.center(), LatLon(51.2, -0.9));
    }
}
