//! Globe-Draw Library
//!
//! Interactive, dragger-based editing of polylines, polygons, extruded
//! polygons, ellipses and corridors on a 3D globe.
//!
//! The crate is split into:
//! - Geometry math (`ellipsoid`, `view`): f64 ellipsoid and camera projection
//! - Bevy integration (`bevy`): editing sessions, pointer input and rendering

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]

pub mod config;
pub mod ellipsoid;
pub mod error;
pub mod shape;
pub mod view;

// Bevy integration
pub mod bevy;

pub use config::{DragAxisMode, EditorConfig, KeyModifier};
pub use ellipsoid::{
    BoundingSphere, Cartographic, Ellipsoid, TangentPlane, compute_ellipse_boundary,
};
pub use error::EditError;
pub use shape::{GlobePosition, GlobeShape, PositionProperty};
pub use view::{GlobeView, PerspectiveView};
