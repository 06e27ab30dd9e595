mod shape_box;
mod shape_circle;
mod shape_polygon;

use crate::{
    bounds::Bounds,
    error::{PhysicsError, Result},
    math::{FVec2, Fixed},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

pub use shape_box::ShapeBox;
pub use shape_circle::ShapeCircle;
pub use shape_polygon::ShapePolygon;

trait ShapeTrait {
    fn bounds(&self, pos: FVec2, sin: Fixed, cos: Fixed) -> Bounds;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Box,
    Polygon,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Box => "box",
            ShapeKind::Polygon => "polygon",
        })
    }
}

/// Reference from a body into the [`ShapeCatalog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collider {
    pub kind: ShapeKind,
    pub index: u32,
}

impl Collider {
    pub const fn new(kind: ShapeKind, index: u32) -> Self {
        Self { kind, index }
    }
}

/// A resolved catalog entry.
#[derive(Copy, Clone, Debug)]
pub enum ShapeRef<'a> {
    Circle(&'a ShapeCircle),
    Box(&'a ShapeBox),
    Polygon(&'a ShapePolygon),
}

impl<'a> ShapeRef<'a> {
    fn shape_trait(&self) -> &dyn ShapeTrait {
        match *self {
            ShapeRef::Circle(data) => data,
            ShapeRef::Box(data) => data,
            ShapeRef::Polygon(data) => data,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRef::Circle(_) => ShapeKind::Circle,
            ShapeRef::Box(_) => ShapeKind::Box,
            ShapeRef::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// World-space bounds at `pos`, rotated by the angle whose sine and cosine are given.
    pub fn bounds(&self, pos: FVec2, sin: Fixed, cos: Fixed) -> Bounds {
        self.shape_trait().bounds(pos, sin, cos)
    }
}

/// Read-only geometry store that colliders index into.
///
/// Populated by the host before simulation. Each kind has its own list, so a [`Collider`]'s
/// kind also selects the list its index refers to.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShapeCatalog {
    #[serde(default)]
    circles: Vec<ShapeCircle>,
    #[serde(default)]
    boxes: Vec<ShapeBox>,
    #[serde(default)]
    polygons: Vec<ShapePolygon>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_circle(&mut self, radius: Fixed) -> Result<Collider> {
        let shape = ShapeCircle::new(radius)?;
        self.circles.push(shape);
        Ok(Collider::new(ShapeKind::Circle, self.circles.len() as u32 - 1))
    }

    pub fn add_box(&mut self, half_extents: FVec2) -> Result<Collider> {
        let shape = ShapeBox::new(half_extents)?;
        self.boxes.push(shape);
        Ok(Collider::new(ShapeKind::Box, self.boxes.len() as u32 - 1))
    }

    pub fn add_polygon(&mut self, vertices: &[FVec2]) -> Result<Collider> {
        let shape = ShapePolygon::new(vertices)?;
        self.polygons.push(shape);
        Ok(Collider::new(ShapeKind::Polygon, self.polygons.len() as u32 - 1))
    }

    pub fn get(&self, collider: Collider) -> Option<ShapeRef<'_>> {
        let index = collider.index as usize;
        match collider.kind {
            ShapeKind::Circle => self.circles.get(index).map(ShapeRef::Circle),
            ShapeKind::Box => self.boxes.get(index).map(ShapeRef::Box),
            ShapeKind::Polygon => self.polygons.get(index).map(ShapeRef::Polygon),
        }
    }

    /// Like [`ShapeCatalog::get`], but a missing entry is a content error attributed to `body`.
    pub fn resolve(&self, body: u32, collider: Collider) -> Result<ShapeRef<'_>> {
        self.get(collider).ok_or(PhysicsError::MissingShape {
            body,
            kind: collider.kind,
            index: collider.index,
        })
    }

    pub fn len(&self) -> usize {
        self.circles.len() + self.boxes.len() + self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-checks circle and box parameters. Polygons are checked while deserializing.
    pub fn validate(&self) -> Result<()> {
        for circle in &self.circles {
            ShapeCircle::new(circle.radius)?;
        }
        for shape in &self.boxes {
            ShapeBox::new(shape.half_extents)?;
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let catalog: Self = serde_json::from_reader(reader)?;
        catalog.validate()?;

        Ok(catalog)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, self)?;

        Ok(())
    }
}
