//! Viewer boundary: screen projection, ground picking and pixel-size estimation.
//!
//! `GlobeView` is what the editing systems need from a 3D viewer.
//! `PerspectiveView` is a self-contained f64 implementation that the
//! windowed plugin keeps in sync with the primary `Camera3d`.

use bevy::math::{DVec3, UVec2, Vec2};

use crate::ellipsoid::{BoundingSphere, Ellipsoid};

/// Relative slack when deciding whether a point is hidden behind the ellipsoid.
const OCCLUSION_EPSILON: f64 = 1e-6;

pub trait GlobeView: Send + Sync {
    /// Projects a world point to screen pixels (top-left origin).
    fn world_to_screen(&self, point: DVec3) -> Option<Vec2>;

    /// Ground point under a screen position.
    fn pick_ellipsoid(&self, screen: Vec2, ellipsoid: &Ellipsoid) -> Option<DVec3>;

    /// Metres covered by one pixel at the distance of `sphere`.
    fn pixel_size(&self, sphere: BoundingSphere, buffer: UVec2) -> f64;

    fn drawing_buffer_size(&self) -> UVec2;

    /// Whether `point` is in front of the camera and not behind the globe.
    fn is_point_visible(&self, point: DVec3, ellipsoid: &Ellipsoid) -> bool;
}

/// Pinhole camera in Earth-fixed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveView {
    pub position: DVec3,
    pub direction: DVec3,
    pub up: DVec3,
    /// Vertical field of view in radians.
    pub fovy: f64,
    pub near: f64,
    pub viewport: UVec2,
}

impl PerspectiveView {
    /// Camera at `position` looking at `target`, rolled so `up_hint` points up on screen.
    pub fn look_at(
        position: DVec3,
        target: DVec3,
        up_hint: DVec3,
        fovy: f64,
        viewport: UVec2,
    ) -> Self {
        let direction = (target - position).try_normalize().unwrap_or(DVec3::NEG_Z);
        let right = direction.cross(up_hint).try_normalize().unwrap_or(DVec3::X);
        let up = right.cross(direction);

        Self {
            position,
            direction,
            up,
            fovy,
            near: 1.0,
            viewport,
        }
    }

    pub fn right(&self) -> DVec3 {
        self.direction.cross(self.up)
    }

    fn aspect_ratio(&self) -> f64 {
        f64::from(self.viewport.x.max(1)) / f64::from(self.viewport.y.max(1))
    }

    /// Unit ray direction through a screen position.
    pub fn screen_ray(&self, screen: Vec2) -> DVec3 {
        let width = f64::from(self.viewport.x.max(1));
        let height = f64::from(self.viewport.y.max(1));
        let tan_half = (self.fovy * 0.5).tan();

        let ndc_x = 2.0 * f64::from(screen.x) / width - 1.0;
        let ndc_y = 1.0 - 2.0 * f64::from(screen.y) / height;

        (self.direction
            + self.right() * (ndc_x * tan_half * self.aspect_ratio())
            + self.up * (ndc_y * tan_half))
            .normalize()
    }

    /// Distance from the camera to the sphere along the view direction.
    fn distance_to_bounding_sphere(&self, sphere: BoundingSphere) -> f64 {
        let offset = self.position - sphere.center;
        let projected = self.direction * offset.dot(self.direction);
        (projected.length() - sphere.radius).max(0.0)
    }
}

impl GlobeView for PerspectiveView {
    #[allow(clippy::cast_possible_truncation)]
    fn world_to_screen(&self, point: DVec3) -> Option<Vec2> {
        let offset = point - self.position;
        let depth = offset.dot(self.direction);
        if depth <= self.near {
            return None;
        }

        let tan_half = (self.fovy * 0.5).tan();
        let ndc_x = offset.dot(self.right()) / (depth * tan_half * self.aspect_ratio());
        let ndc_y = offset.dot(self.up) / (depth * tan_half);

        let width = f64::from(self.viewport.x);
        let height = f64::from(self.viewport.y);
        Some(Vec2::new(
            ((ndc_x + 1.0) * 0.5 * width) as f32,
            ((1.0 - ndc_y) * 0.5 * height) as f32,
        ))
    }

    fn pick_ellipsoid(&self, screen: Vec2, ellipsoid: &Ellipsoid) -> Option<DVec3> {
        ellipsoid.ray_hit(self.position, self.screen_ray(screen))
    }

    fn pixel_size(&self, sphere: BoundingSphere, buffer: UVec2) -> f64 {
        let distance = self.distance_to_bounding_sphere(sphere);
        let top = self.near * (self.fovy * 0.5).tan();
        let right = self.aspect_ratio() * top;
        let inverse_near = 1.0 / self.near;

        let pixel_height = 2.0 * distance * top * inverse_near / f64::from(buffer.y.max(1));
        let pixel_width = 2.0 * distance * right * inverse_near / f64::from(buffer.x.max(1));
        pixel_width.max(pixel_height)
    }

    fn drawing_buffer_size(&self) -> UVec2 {
        self.viewport
    }

    fn is_point_visible(&self, point: DVec3, ellipsoid: &Ellipsoid) -> bool {
        let offset = point - self.position;
        if offset.dot(self.direction) <= self.near {
            return false;
        }
        // `offset` is not normalised, so the point itself sits at t = 1.
        match ellipsoid.ray_intersection(self.position, offset) {
            Some((start, _)) => start >= 1.0 - OCCLUSION_EPSILON,
            None => true,
        }
    }
}
