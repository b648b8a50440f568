use std::cmp::Ordering;

use errors::ErrorMetadata;

use crate::numeric::compare_f64;

#[derive(Clone, Copy, Debug)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const MIN: GeoPoint = GeoPoint {
        latitude: -90.0,
        longitude: -180.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude),
            ErrorMetadata::bad_request(
                "InvalidGeoPoint",
                format!("({latitude}, {longitude}) is not a valid latitude/longitude pair"),
            )
        );
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn compare(&self, other: &GeoPoint) -> Ordering {
        compare_f64(self.latitude, other.latitude)
            .then_with(|| compare_f64(self.longitude, other.longitude))
    }
}
