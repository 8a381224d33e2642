//! Reference ellipsoid math.
//!
//! All positions are Earth-centred Earth-fixed cartesian coordinates in metres,
//! stored as `DVec3` so that surface-scale edits keep millimetre precision.

use std::f64::consts::{FRAC_PI_2, TAU};

use bevy::math::{DQuat, DVec3};

const EPSILON12: f64 = 1e-12;
/// Points closer than this (in scaled units) to the centre have no surface projection.
const CENTER_TOLERANCE_SQUARED: f64 = 0.1;
const MAX_NEWTON_ITERATIONS: usize = 32;

/// Geographic coordinate: longitude and latitude in radians, height in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    pub fn from_degrees(longitude: f64, latitude: f64, height: f64) -> Self {
        Self::new(longitude.to_radians(), latitude.to_radians(), height)
    }
}

/// A sphere in world space, used for pixel-size estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Triaxial ellipsoid centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    radii: DVec3,
    radii_squared: DVec3,
    one_over_radii: DVec3,
    one_over_radii_squared: DVec3,
}

impl Ellipsoid {
    pub fn new(radii: DVec3) -> Self {
        Self {
            radii,
            radii_squared: radii * radii,
            one_over_radii: DVec3::ONE / radii,
            one_over_radii_squared: DVec3::ONE / (radii * radii),
        }
    }

    /// The WGS84 ellipsoid.
    pub fn wgs84() -> Self {
        Self::new(DVec3::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179))
    }

    pub fn radii(&self) -> DVec3 {
        self.radii
    }

    /// Surface normal for a point already on (or near) the surface.
    pub fn geodetic_surface_normal(&self, cartesian: DVec3) -> Option<DVec3> {
        (cartesian * self.one_over_radii_squared).try_normalize()
    }

    pub fn geodetic_surface_normal_cartographic(&self, cartographic: Cartographic) -> DVec3 {
        let cos_latitude = cartographic.latitude.cos();
        DVec3::new(
            cos_latitude * cartographic.longitude.cos(),
            cos_latitude * cartographic.longitude.sin(),
            cartographic.latitude.sin(),
        )
        .normalize()
    }

    pub fn cartographic_to_cartesian(&self, cartographic: Cartographic) -> DVec3 {
        let normal = self.geodetic_surface_normal_cartographic(cartographic);
        let k = self.radii_squared * normal;
        let gamma = normal.dot(k).sqrt();
        k / gamma + normal * cartographic.height
    }

    /// Projects a point along the geodetic normal onto the surface.
    ///
    /// Returns `None` for points too close to the centre to have a
    /// well-defined projection, for non-finite input, and when the Newton
    /// iteration fails to converge.
    pub fn scale_to_geodetic_surface(&self, cartesian: DVec3) -> Option<DVec3> {
        if !cartesian.is_finite() {
            return None;
        }
        let oorsq = self.one_over_radii_squared;
        let x2 = cartesian.x * cartesian.x * oorsq.x;
        let y2 = cartesian.y * cartesian.y * oorsq.y;
        let z2 = cartesian.z * cartesian.z * oorsq.z;

        let squared_norm = x2 + y2 + z2;
        let ratio = (1.0 / squared_norm).sqrt();
        let intersection = cartesian * ratio;

        if squared_norm < CENTER_TOLERANCE_SQUARED {
            return ratio.is_finite().then_some(intersection);
        }

        let gradient = intersection * oorsq * 2.0;
        let mut lambda = (1.0 - ratio) * cartesian.length() / (0.5 * gradient.length());
        let mut correction = 0.0;

        let mut x_multiplier = 1.0;
        let mut y_multiplier = 1.0;
        let mut z_multiplier = 1.0;
        let mut converged = false;
        for _ in 0..MAX_NEWTON_ITERATIONS {
            lambda -= correction;

            x_multiplier = 1.0 / (1.0 + lambda * oorsq.x);
            y_multiplier = 1.0 / (1.0 + lambda * oorsq.y);
            z_multiplier = 1.0 / (1.0 + lambda * oorsq.z);

            let x_multiplier2 = x_multiplier * x_multiplier;
            let y_multiplier2 = y_multiplier * y_multiplier;
            let z_multiplier2 = z_multiplier * z_multiplier;

            let x_multiplier3 = x_multiplier2 * x_multiplier;
            let y_multiplier3 = y_multiplier2 * y_multiplier;
            let z_multiplier3 = z_multiplier2 * z_multiplier;

            let func = x2 * x_multiplier2 + y2 * y_multiplier2 + z2 * z_multiplier2 - 1.0;
            let denominator = x2 * x_multiplier3 * oorsq.x
                + y2 * y_multiplier3 * oorsq.y
                + z2 * z_multiplier3 * oorsq.z;
            let derivative = -2.0 * denominator;
            correction = func / derivative;

            if func.abs() <= EPSILON12 {
                converged = true;
                break;
            }
        }
        if !converged {
            return None;
        }

        Some(DVec3::new(
            cartesian.x * x_multiplier,
            cartesian.y * y_multiplier,
            cartesian.z * z_multiplier,
        ))
    }

    pub fn cartesian_to_cartographic(&self, cartesian: DVec3) -> Option<Cartographic> {
        let on_surface = self.scale_to_geodetic_surface(cartesian)?;
        let normal = self.geodetic_surface_normal(on_surface)?;
        let offset = cartesian - on_surface;

        Some(Cartographic {
            longitude: normal.y.atan2(normal.x),
            latitude: normal.z.asin(),
            height: offset.dot(cartesian).signum() * offset.length(),
        })
    }

    /// Same geographic coordinate as `cartesian`, raised by `delta` metres.
    pub fn raise(&self, cartesian: DVec3, delta: f64) -> Option<DVec3> {
        let mut cartographic = self.cartesian_to_cartographic(cartesian)?;
        cartographic.height += delta;
        Some(self.cartographic_to_cartesian(cartographic))
    }

    /// Ray intersection as a `(start, stop)` parameter interval along `direction`.
    pub fn ray_intersection(&self, origin: DVec3, direction: DVec3) -> Option<(f64, f64)> {
        let q = self.one_over_radii * origin;
        let w = self.one_over_radii * direction;

        let q2 = q.length_squared();
        let qw = q.dot(w);
        let w2 = w.length_squared();

        if q2 > 1.0 {
            // Outside the ellipsoid.
            if qw >= 0.0 {
                return None;
            }

            let qw2 = qw * qw;
            let difference = q2 - 1.0;
            let product = w2 * difference;

            if qw2 < product {
                return None;
            }
            if qw2 > product {
                let discriminant = qw2 - product;
                let temp = -qw + discriminant.sqrt();
                let root0 = temp / w2;
                let root1 = difference / temp;
                return Some((root0.min(root1), root0.max(root1)));
            }

            let root = (difference / w2).sqrt();
            return Some((root, root));
        }

        if q2 < 1.0 {
            let difference = q2 - 1.0;
            let product = w2 * difference;
            let discriminant = qw * qw - product;
            let temp = -qw + discriminant.sqrt();
            return Some((0.0, temp / w2));
        }

        // On the surface.
        (qw < 0.0).then(|| (0.0, -qw / w2))
    }

    /// First point where the ray enters the ellipsoid.
    pub fn ray_hit(&self, origin: DVec3, direction: DVec3) -> Option<DVec3> {
        let (start, _) = self.ray_intersection(origin, direction)?;
        Some(origin + direction * start)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Local east/north/up frame at a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentPlane {
    pub origin: DVec3,
    /// East.
    pub x_axis: DVec3,
    /// North.
    pub y_axis: DVec3,
    /// Up (geodetic surface normal).
    pub z_axis: DVec3,
}

impl TangentPlane {
    /// Builds the frame at the surface projection of `point`.
    pub fn new(ellipsoid: &Ellipsoid, point: DVec3) -> Option<Self> {
        let origin = ellipsoid.scale_to_geodetic_surface(point)?;
        let up = ellipsoid.geodetic_surface_normal(origin)?;
        let east = DVec3::new(-origin.y, origin.x, 0.0)
            .try_normalize()
            .unwrap_or(DVec3::Y);
        let north = up.cross(east);

        Some(Self {
            origin,
            x_axis: east,
            y_axis: north,
            z_axis: up,
        })
    }
}

/// Point on the boundary of a surface ellipse at parametric angle `theta`.
///
/// Distances are measured along the sphere through `center`; `theta = PI/2`
/// with no rotation lies due east of the center at `semi_minor` metres.
pub fn ellipse_boundary_point(
    center: DVec3,
    semi_major: f64,
    semi_minor: f64,
    rotation: f64,
    theta: f64,
) -> DVec3 {
    let mag = center.length();
    let unit = center / mag;
    let east = DVec3::Z.cross(center).try_normalize().unwrap_or(DVec3::Y);
    let north = unit.cross(east);

    let azimuth = theta + rotation;
    let axis = east * azimuth.cos() + north * azimuth.sin();

    let (sin_theta, cos_theta) = theta.sin_cos();
    let radius = semi_major * semi_minor
        / (semi_minor * semi_minor * cos_theta * cos_theta
            + semi_major * semi_major * sin_theta * sin_theta)
            .sqrt();
    let angle = radius / mag;

    (DQuat::from_axis_angle(axis, angle) * unit).normalize() * mag
}

/// Samples the ellipse outline, one point every `granularity` radians.
///
/// The first sample is the `theta = PI/2` reference point.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn compute_ellipse_boundary(
    center: DVec3,
    semi_major: f64,
    semi_minor: f64,
    rotation: f64,
    granularity: f64,
) -> Vec<DVec3> {
    let granularity = if granularity > 0.0 && granularity.is_finite() {
        granularity
    } else {
        FRAC_PI_2
    };

    // Points per quarter, including both ends.
    let per_quarter = 1 + (FRAC_PI_2 / granularity).ceil() as usize;
    let delta_theta = FRAC_PI_2 / (per_quarter - 1) as f64;
    let count = (TAU / delta_theta).round() as usize;

    (0..count)
        .map(|k| {
            let theta = FRAC_PI_2 - k as f64 * delta_theta;
            ellipse_boundary_point(center, semi_major, semi_minor, rotation, theta)
        })
        .collect()
}
