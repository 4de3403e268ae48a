// crates/langmap-core/src/projection.rs

//! # Projection Selector
//!
//! Area is computed in a planar coordinate system. This module provides the
//! geographic (EPSG:4326, lon/lat degrees) -> planar transforms the pipeline
//! knows about, and picks one from an ordered preference list:
//!
//! | CRS          | Projection                                   | Equal-area |
//! |--------------|----------------------------------------------|------------|
//! | `EPSG:6933`  | Lambert cylindrical, WGS84, lat_ts = 30°     | yes        |
//! | `ESRI:54009` | Mollweide (spherical, R = 6378137 m)         | yes        |
//! | `EPSG:3857`  | Web Mercator (spherical, R = 6378137 m)      | **no**     |
//!
//! Each candidate is constructed and smoke-tested on (0, 0). The first that
//! passes wins; if none does, Web Mercator is used unconditionally.

use crate::error::ProjectionError;
use log::debug;
use once_cell::sync::OnceCell;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt::Debug;
use std::sync::Arc;

pub const CYLINDRICAL_EQUAL_AREA: &str = "EPSG:6933";
pub const MOLLWEIDE: &str = "ESRI:54009";
pub const WEB_MERCATOR: &str = "EPSG:3857";

/// Default preference, best first.
pub const DEFAULT_PREFERENCE: [&str; 3] = [CYLINDRICAL_EQUAL_AREA, MOLLWEIDE, WEB_MERCATOR];

/// WGS84 semi-major axis in metres.
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 first eccentricity squared.
const WGS84_E2: f64 = 0.006_694_379_990_141_317;

/// Slack for coordinates that sit on the domain edge after float noise.
const DOMAIN_EPS: f64 = 1e-9;

/// A geographic -> planar coordinate transform.
///
/// Input is longitude/latitude in degrees (always x/y order); output is
/// projected metres.
pub trait CrsTransform: Debug + Send + Sync {
    /// Identifier of the target CRS, e.g. `EPSG:6933`.
    fn crs(&self) -> &str;

    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError>;
}

fn check_domain(crs: &str, lon: f64, lat: f64, max_lat: f64) -> Result<(), ProjectionError> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(ProjectionError::NonFinite {
            crs: crs.to_string(),
        });
    }
    if lon.abs() > 180.0 + DOMAIN_EPS || lat.abs() > max_lat {
        return Err(ProjectionError::OutOfDomain {
            crs: crs.to_string(),
            lon,
            lat,
        });
    }
    Ok(())
}

fn finite(crs: &str, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
    if x.is_finite() && y.is_finite() {
        Ok((x, y))
    } else {
        Err(ProjectionError::NonFinite {
            crs: crs.to_string(),
        })
    }
}

/// EPSG:6933, WGS 84 / NSIDC EASE-Grid 2.0 Global.
#[derive(Debug, Clone, Copy)]
pub struct CylindricalEqualArea {
    /// Scale factor along the standard parallel.
    k0: f64,
    e: f64,
}

impl CylindricalEqualArea {
    pub fn new() -> Self {
        let phi_ts = 30f64.to_radians();
        let sin_ts = phi_ts.sin();
        Self {
            k0: phi_ts.cos() / (1.0 - WGS84_E2 * sin_ts * sin_ts).sqrt(),
            e: WGS84_E2.sqrt(),
        }
    }

    /// Authalic `q` (Snyder 3-12).
    fn q(&self, sin_phi: f64) -> f64 {
        let e = self.e;
        let es = e * sin_phi;
        (1.0 - WGS84_E2)
            * (sin_phi / (1.0 - es * es) - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
    }
}

impl Default for CylindricalEqualArea {
    fn default() -> Self {
        Self::new()
    }
}

impl CrsTransform for CylindricalEqualArea {
    fn crs(&self) -> &str {
        CYLINDRICAL_EQUAL_AREA
    }

    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        check_domain(self.crs(), lon, lat, 90.0 + DOMAIN_EPS)?;
        let lat = lat.clamp(-90.0, 90.0);
        let x = WGS84_A * self.k0 * lon.to_radians();
        let y = WGS84_A * self.q(lat.to_radians().sin()) / (2.0 * self.k0);
        finite(self.crs(), x, y)
    }
}

/// ESRI:54009, World Mollweide.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mollweide;

impl Mollweide {
    const MAX_ITER: usize = 30;
    const TOLERANCE: f64 = 1e-12;

    /// Solves `2θ + sin 2θ = π sin φ` by Newton iteration.
    fn auxiliary_angle(phi: f64) -> f64 {
        if (phi.abs() - FRAC_PI_2).abs() < Self::TOLERANCE {
            return phi.signum() * FRAC_PI_2;
        }
        let target = PI * phi.sin();
        let mut theta = phi;
        for _ in 0..Self::MAX_ITER {
            let f = 2.0 * theta + (2.0 * theta).sin() - target;
            let df = 2.0 + 2.0 * (2.0 * theta).cos();
            if df.abs() < f64::EPSILON {
                break;
            }
            let step = f / df;
            theta -= step;
            if step.abs() < Self::TOLERANCE {
                break;
            }
        }
        theta
    }
}

impl CrsTransform for Mollweide {
    fn crs(&self) -> &str {
        MOLLWEIDE
    }

    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        check_domain(self.crs(), lon, lat, 90.0 + DOMAIN_EPS)?;
        let theta = Self::auxiliary_angle(lat.clamp(-90.0, 90.0).to_radians());
        let x = 2.0 * std::f64::consts::SQRT_2 / PI * WGS84_A * lon.to_radians() * theta.cos();
        let y = std::f64::consts::SQRT_2 * WGS84_A * theta.sin();
        finite(self.crs(), x, y)
    }
}

/// EPSG:3857, Web Mercator. Not equal-area; poles are outside its domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl CrsTransform for WebMercator {
    fn crs(&self) -> &str {
        WEB_MERCATOR
    }

    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        // Strictly inside ±90°: the northing diverges at the poles.
        if lat.abs() >= 90.0 {
            return Err(ProjectionError::OutOfDomain {
                crs: self.crs().to_string(),
                lon,
                lat,
            });
        }
        check_domain(self.crs(), lon, lat, 90.0)?;
        let x = WGS84_A * lon.to_radians();
        let y = WGS84_A * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        finite(self.crs(), x, y)
    }
}

/// The unconditional fallback used when nothing else works.
pub static FALLBACK: WebMercator = WebMercator;

/// Builds the transform for a CRS identifier (case-insensitive).
pub fn build_transform(crs: &str) -> Result<Box<dyn CrsTransform>, ProjectionError> {
    match crs.trim().to_ascii_uppercase().as_str() {
        CYLINDRICAL_EQUAL_AREA => Ok(Box::new(CylindricalEqualArea::new())),
        MOLLWEIDE => Ok(Box::new(Mollweide)),
        WEB_MERCATOR => Ok(Box::new(WebMercator)),
        _ => Err(ProjectionError::UnknownCrs(crs.to_string())),
    }
}

/// The transform chosen for area computation, plus the identifier actually
/// selected (for disclosing the approximation).
#[derive(Debug, Clone)]
pub struct ProjectionSelection {
    transform: Arc<dyn CrsTransform>,
    used_crs: String,
}

static SHARED_SELECTION: OnceCell<ProjectionSelection> = OnceCell::new();

impl ProjectionSelection {
    /// Selection over [`DEFAULT_PREFERENCE`], computed once per process.
    pub fn shared() -> &'static ProjectionSelection {
        SHARED_SELECTION.get_or_init(|| select_projection(&DEFAULT_PREFERENCE, build_transform))
    }

    pub fn transform(&self) -> &dyn CrsTransform {
        self.transform.as_ref()
    }

    pub fn used_crs(&self) -> &str {
        &self.used_crs
    }

    /// Whether the selected CRS preserves area.
    pub fn is_equal_area(&self) -> bool {
        !self.used_crs.eq_ignore_ascii_case(WEB_MERCATOR)
    }

    /// Consumer-facing note on how area values were obtained.
    pub fn disclosure(&self) -> String {
        let mut note = format!(
            "Area computed by projecting to {} (equal-area preference). Values are approximate.",
            self.used_crs
        );
        if !self.is_equal_area() {
            note.push_str(" This projection is not equal-area; high-latitude areas are inflated.");
        }
        note
    }
}

/// Tries each candidate in order: construct via `factory`, then smoke-test
/// the transform on (0, 0). The first that passes is returned. If every
/// candidate fails, Web Mercator is used without testing.
pub fn select_projection<S, F>(preference: &[S], factory: F) -> ProjectionSelection
where
    S: AsRef<str>,
    F: Fn(&str) -> Result<Box<dyn CrsTransform>, ProjectionError>,
{
    for candidate in preference {
        let candidate = candidate.as_ref();
        let transform = match factory(candidate) {
            Ok(t) => t,
            Err(e) => {
                debug!("projection {candidate} unavailable: {e}");
                continue;
            }
        };
        if let Err(e) = transform.forward(0.0, 0.0) {
            debug!("projection {candidate} failed smoke test: {e}");
            continue;
        }
        return ProjectionSelection {
            transform: Arc::from(transform),
            used_crs: candidate.to_string(),
        };
    }

    debug!("no preferred projection usable, falling back to {WEB_MERCATOR}");
    ProjectionSelection {
        transform: Arc::new(WebMercator),
        used_crs: WEB_MERCATOR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn origin_maps_to_origin() {
        for crs in DEFAULT_PREFERENCE {
            let t = build_transform(crs).unwrap();
            let (x, y) = t.forward(0.0, 0.0).unwrap();
            assert!(approx(x, 0.0, 1e-6) && approx(y, 0.0, 1e-6), "{crs}");
        }
    }

    #[test]
    fn ease_grid_known_extent() {
        // x = ±17367530.45 m at the antimeridian, y = ±7342230.14 m at the poles
        let t = CylindricalEqualArea::new();
        let (x, _) = t.forward(180.0, 0.0).unwrap();
        let (_, y) = t.forward(0.0, 90.0).unwrap();
        assert!(approx(x, 17_367_530.45, 1.0), "x = {x}");
        assert!(approx(y, 7_342_230.14, 1.0), "y = {y}");
    }

    #[test]
    fn mollweide_known_extent() {
        // x = 2√2·R at lon 180 on the equator, y = √2·R at the pole
        let (x, _) = Mollweide.forward(180.0, 0.0).unwrap();
        let (_, y) = Mollweide.forward(0.0, 90.0).unwrap();
        assert!(approx(x, 2.0 * std::f64::consts::SQRT_2 * WGS84_A, 1e-3));
        assert!(approx(y, std::f64::consts::SQRT_2 * WGS84_A, 1e-3));
    }

    #[test]
    fn web_mercator_known_value_and_poles() {
        let (x, y) = WebMercator.forward(180.0, 85.051_128_779_806_59).unwrap();
        assert!(approx(x, 20_037_508.342_789_244, 1e-6));
        assert!(approx(y, 20_037_508.342_789_244, 1e-3));
        assert!(WebMercator.forward(0.0, 90.0).is_err());
        assert!(WebMercator.forward(0.0, -90.0).is_err());
    }

    #[test]
    fn out_of_domain_and_non_finite_are_errors() {
        let t = CylindricalEqualArea::new();
        assert!(matches!(
            t.forward(0.0, 91.0),
            Err(ProjectionError::OutOfDomain { .. })
        ));
        assert!(matches!(
            t.forward(181.0, 0.0),
            Err(ProjectionError::OutOfDomain { .. })
        ));
        assert!(matches!(
            Mollweide.forward(f64::NAN, 0.0),
            Err(ProjectionError::NonFinite { .. })
        ));
    }

    #[test]
    fn unknown_crs_rejected() {
        assert_eq!(
            build_transform("EPSG:9999").unwrap_err(),
            ProjectionError::UnknownCrs("EPSG:9999".into())
        );
        assert!(build_transform("epsg:6933").is_ok());
    }

    #[test]
    fn default_selection_is_cylindrical_equal_area() {
        let sel = ProjectionSelection::shared();
        assert_eq!(sel.used_crs(), CYLINDRICAL_EQUAL_AREA);
        assert!(sel.is_equal_area());
        assert!(std::ptr::eq(sel, ProjectionSelection::shared()));
    }

    #[test]
    fn selection_skips_failed_construction() {
        let factory = |crs: &str| {
            if crs == CYLINDRICAL_EQUAL_AREA {
                Err(ProjectionError::UnknownCrs(crs.to_string()))
            } else {
                build_transform(crs)
            }
        };
        let sel = select_projection(&DEFAULT_PREFERENCE, factory);
        assert_eq!(sel.used_crs(), MOLLWEIDE);
        assert_eq!(sel.transform().crs(), MOLLWEIDE);
    }

    #[derive(Debug)]
    struct BrokenAtOrigin;

    impl CrsTransform for BrokenAtOrigin {
        fn crs(&self) -> &str {
            "TEST:BROKEN"
        }
        fn forward(&self, _lon: f64, _lat: f64) -> Result<(f64, f64), ProjectionError> {
            Err(ProjectionError::NonFinite {
                crs: "TEST:BROKEN".into(),
            })
        }
    }

    #[test]
    fn selection_skips_failed_smoke_test() {
        let factory = |crs: &str| -> Result<Box<dyn CrsTransform>, ProjectionError> {
            if crs == "TEST:BROKEN" {
                Ok(Box::new(BrokenAtOrigin))
            } else {
                build_transform(crs)
            }
        };
        let sel = select_projection(&["TEST:BROKEN", MOLLWEIDE], factory);
        assert_eq!(sel.used_crs(), MOLLWEIDE);
    }

    #[test]
    fn all_candidates_failing_falls_back_to_web_mercator() {
        let sel = select_projection(&["EPSG:1", "EPSG:2"], build_transform);
        assert_eq!(sel.used_crs(), WEB_MERCATOR);
        assert!(!sel.is_equal_area());
        assert!(sel.disclosure().contains("not equal-area"));

        let empty: [&str; 0] = [];
        assert_eq!(select_projection(&empty, build_transform).used_crs(), WEB_MERCATOR);
    }
}
