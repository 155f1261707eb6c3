// core/src/geodesy.rs
//! Local flat-earth projection of lon/lat onto planar offsets.
//!
//! Known approximation: `rho` (the parallel radius) is fixed from the first
//! sample's latitude for the whole track, so rides spanning a wide latitude
//! range pick up a small east-west distortion.

pub const EARTH_RADIUS_KM: f64 = 6367.449;
pub const KM_TO_MI: f64 = 0.621371;
pub const M_TO_FT: f64 = 3.28084;

/// Planar offset in the projector's linear unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Equirectangular small-angle projector around a fixed reference point.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticProjector {
    radius: f64, // same linear unit as the output
    rho: f64,    // radius * cos(lat of first sample)
    lon_ref: f64,
    lat_ref: f64,
}

impl GeodeticProjector {
    /// `lat_origin` is the first sample's latitude, not `lat_ref`.
    pub fn new(radius: f64, lon_ref: f64, lat_ref: f64, lat_origin: f64) -> Self {
        Self::with_elevation(radius, lon_ref, lat_ref, lat_origin, 0.0)
    }

    /// Same as `new`, with `rho` taken at the first sample's elevation
    /// (`elevation` in the radius unit).
    pub fn with_elevation(
        radius: f64,
        lon_ref: f64,
        lat_ref: f64,
        lat_origin: f64,
        elevation: f64,
    ) -> Self {
        let rho = (radius + elevation) * lat_origin.to_radians().cos();
        Self { radius, rho, lon_ref, lat_ref }
    }

    /// Offset of (lon, lat) from the reference point.
    pub fn project(&self, lon: f64, lat: f64) -> Offset {
        self.project_at(lon, lat, 0.0)
    }

    /// Offset of (lon, lat) from the reference point, with the north-south
    /// radius raised by `elevation`.
    pub fn project_at(&self, lon: f64, lat: f64, elevation: f64) -> Offset {
        self.project_delta_at(lon - self.lon_ref, lat - self.lat_ref, elevation)
    }

    /// Projects a lon/lat difference directly. Incremental displacement must
    /// go through here (delta first, then project), not through the
    /// difference of two projected points.
    pub fn project_delta(&self, dlon: f64, dlat: f64) -> Offset {
        self.project_delta_at(dlon, dlat, 0.0)
    }

    pub fn project_delta_at(&self, dlon: f64, dlat: f64, elevation: f64) -> Offset {
        Offset {
            x: self.rho * dlon.to_radians().atan(),
            y: (self.radius + elevation) * dlat.to_radians().atan(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_point_projects_to_origin() {
        let p = GeodeticProjector::new(EARTH_RADIUS_KM, -71.36, 42.43, 42.5);
        let o = p.project(-71.36, 42.43);
        assert_eq!(o, Offset { x: 0.0, y: 0.0 });
    }

    #[test]
    fn non_finite_input_propagates_nan() {
        let p = GeodeticProjector::new(EARTH_RADIUS_KM, 0.0, 0.0, 0.0);
        let o = p.project(f64::NAN, 1.0);
        assert!(o.x.is_nan());
        assert!(o.y.is_finite());
    }

    #[test]
    fn one_degree_north_is_about_111_km() {
        let p = GeodeticProjector::new(EARTH_RADIUS_KM, 0.0, 0.0, 0.0);
        let o = p.project(0.0, 1.0);
        assert!((o.y - 111.13).abs() < 0.1, "got {}", o.y);
        assert_eq!(o.x, 0.0);
    }
}
