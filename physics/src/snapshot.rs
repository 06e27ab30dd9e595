use crate::{
    body::{BodyArena, BodyHandle},
    bounds::Bounds,
    error::Result,
    shapes::ShapeCatalog,
};

/// Bounding box of one body as seen by the broad phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BodyBounds {
    /// Position in the snapshot, which is what broad phase strategies report pairs with.
    pub index: u32,
    pub bounds: Bounds,
    pub is_static: bool,
}

/// Flat list of world space bounds rebuilt every tick.
#[derive(Debug, Default)]
pub struct WorldSnapshot {
    entries: Vec<BodyBounds>,
    handles: Vec<BodyHandle>,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the snapshot from every live body in handle order.
    ///
    /// Fails if a collider references a shape the catalog does not have.
    pub fn build(&mut self, bodies: &BodyArena, catalog: &ShapeCatalog) -> Result<()> {
        self.entries.clear();
        self.handles.clear();

        for (handle, body) in bodies.iter() {
            let shape = catalog.resolve(handle.0, body.collider)?;
            let (sin, cos) = body.rotation.sin_cos();
            self.entries.push(BodyBounds {
                index: self.entries.len() as u32,
                bounds: shape.bounds(body.position, sin, cos),
                is_static: body.is_static(),
            });
            self.handles.push(handle);
        }

        Ok(())
    }

    pub fn entries(&self) -> &[BodyBounds] {
        &self.entries
    }

    pub fn handle(&self, index: u32) -> BodyHandle {
        self.handles[index as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
