//! Great-circle distances between site coordinates.

use qtty::{Degrees, Kilometers};

/// Mean Earth radius (IUGG) in kilometers.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance between two `(lat, lon)` positions.
pub fn haversine_distance(a: (Degrees, Degrees), b: (Degrees, Degrees)) -> Kilometers {
    let (lat1, lon1) = (a.0.value().to_radians(), a.1.value().to_radians());
    let (lat2, lon2) = (b.0.value().to_radians(), b.1.value().to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h slightly above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    Kilometers::new(EARTH_MEAN_RADIUS_KM * c)
}
