use super::{ShapeKind, ShapeTrait};
use crate::{
    bounds::Bounds,
    error::{PhysicsError, Result},
    math::{FVec2, Fixed},
};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Convex polygon in body-local space.
///
/// Vertices are stored counter-clockwise; clockwise input is reversed on construction. Outward
/// edge normals are precomputed, `normals[i]` belonging to the edge `vertices[i] ->
/// vertices[i + 1]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolygonVertices", into = "PolygonVertices")]
pub struct ShapePolygon {
    vertices: Vec<FVec2>,
    normals: Vec<FVec2>,
}

#[derive(Clone, Serialize, Deserialize)]
struct PolygonVertices {
    vertices: Vec<FVec2>,
}

fn invalid(reason: impl Into<String>) -> PhysicsError {
    PhysicsError::InvalidShape {
        kind: ShapeKind::Polygon,
        reason: reason.into(),
    }
}

impl ShapePolygon {
    pub fn new(vertices: &[FVec2]) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(invalid(format!(
                "needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        let mut vertices = vertices.to_vec();
        let twice_area: Fixed = (0..vertices.len())
            .map(|i| vertices[i].cross(vertices[(i + 1) % vertices.len()]))
            .sum();
        if twice_area.is_zero() {
            return Err(invalid("vertices are collinear"));
        }
        if twice_area.is_negative() {
            vertices.reverse();
        }

        let count = vertices.len();
        let mut normals = Vec::with_capacity(count);
        for i in 0..count {
            let a = vertices[i];
            let b = vertices[(i + 1) % count];
            let c = vertices[(i + 2) % count];
            let edge = b - a;
            if edge.length_squared().is_zero() {
                return Err(invalid(format!("duplicate vertex at index {}", i)));
            }
            if edge.cross(c - b).is_negative() {
                return Err(invalid(format!("not convex at vertex {}", (i + 1) % count)));
            }
            // outward normal of a counter-clockwise edge
            normals.push(FVec2::new(edge.y, -edge.x).normalize_or_zero());
        }

        Ok(Self { vertices, normals })
    }

    pub fn vertices(&self) -> &[FVec2] {
        &self.vertices
    }

    pub fn normals(&self) -> &[FVec2] {
        &self.normals
    }
}

impl TryFrom<PolygonVertices> for ShapePolygon {
    type Error = PhysicsError;
    fn try_from(value: PolygonVertices) -> Result<Self> {
        Self::new(&value.vertices)
    }
}

impl From<ShapePolygon> for PolygonVertices {
    fn from(value: ShapePolygon) -> Self {
        Self {
            vertices: value.vertices,
        }
    }
}

impl ShapeTrait for ShapePolygon {
    fn bounds(&self, pos: FVec2, sin: Fixed, cos: Fixed) -> Bounds {
        self.vertices
            .iter()
            .fold(Bounds::new(), |acc, pt| acc + (pt.rotate(sin, cos) + pos))
    }
}
