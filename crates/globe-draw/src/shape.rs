//! Editable globe geometry.

use bevy::math::DVec3;
use bevy::prelude::*;

/// An ordered list of control points.
///
/// `is_constant` tells the renderer the values will not change, so the
/// tessellated geometry can be cached. Editing clears it for the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionProperty {
    pub values: Vec<DVec3>,
    pub is_constant: bool,
}

impl PositionProperty {
    pub fn new(values: Vec<DVec3>) -> Self {
        Self {
            values,
            is_constant: true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// World-space anchor of an entity, in Earth-fixed metres.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobePosition(pub DVec3);

/// Geometry of an editable entity.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum GlobeShape {
    Polyline {
        positions: PositionProperty,
    },
    Polygon {
        hierarchy: PositionProperty,
        /// Extrusion above each vertex, in metres.
        extruded_height: Option<f64>,
    },
    /// Centered on the entity's `GlobePosition`.
    Ellipse {
        semi_major_axis: f64,
        semi_minor_axis: f64,
        rotation: f64,
    },
    Corridor {
        positions: PositionProperty,
        width: f64,
    },
}

impl GlobeShape {
    pub fn polyline(values: Vec<DVec3>) -> Self {
        Self::Polyline {
            positions: PositionProperty::new(values),
        }
    }

    pub fn polygon(values: Vec<DVec3>) -> Self {
        Self::Polygon {
            hierarchy: PositionProperty::new(values),
            extruded_height: None,
        }
    }

    pub fn extruded_polygon(values: Vec<DVec3>, extruded_height: f64) -> Self {
        Self::Polygon {
            hierarchy: PositionProperty::new(values),
            extruded_height: Some(extruded_height),
        }
    }

    pub fn circle(radius: f64) -> Self {
        Self::Ellipse {
            semi_major_axis: radius,
            semi_minor_axis: radius,
            rotation: 0.0,
        }
    }

    pub fn corridor(values: Vec<DVec3>, width: f64) -> Self {
        Self::Corridor {
            positions: PositionProperty::new(values),
            width,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Polyline { .. } => "polyline",
            Self::Polygon {
                extruded_height: Some(_),
                ..
            } => "extruded polygon",
            Self::Polygon { .. } => "polygon",
            Self::Ellipse { .. } => "ellipse",
            Self::Corridor { .. } => "corridor",
        }
    }

    /// The vertex sequence, if this shape has one.
    pub fn positions(&self) -> Option<&PositionProperty> {
        match self {
            Self::Polyline { positions } | Self::Corridor { positions, .. } => Some(positions),
            Self::Polygon { hierarchy, .. } => Some(hierarchy),
            Self::Ellipse { .. } => None,
        }
    }

    pub fn positions_mut(&mut self) -> Option<&mut PositionProperty> {
        match self {
            Self::Polyline { positions } | Self::Corridor { positions, .. } => Some(positions),
            Self::Polygon { hierarchy, .. } => Some(hierarchy),
            Self::Ellipse { .. } => None,
        }
    }

    pub fn extruded_height(&self) -> Option<f64> {
        match self {
            Self::Polygon {
                extruded_height, ..
            } => *extruded_height,
            _ => None,
        }
    }
}
