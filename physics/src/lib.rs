pub mod body;
pub mod bounds;
pub mod broadphase;
pub mod config;
pub mod contact;
pub mod correction;
pub mod damping;
pub mod error;
pub mod integrate;
pub mod intersect;
pub mod island;
pub mod material;
pub mod math;
pub mod motion;
pub mod narrowphase;
pub mod scene;
pub mod shapes;
pub mod sleep;
pub mod snapshot;
pub mod solver;

pub use body::{Body, BodyHandle, MassProps};
pub use config::{OverflowPolicy, PhysicsConfig};
pub use damping::DampingField;
pub use error::{PhysicsError, Result};
pub use material::Material;
pub use math::{FVec2, Fixed};
pub use scene::PhysicsScene;
pub use shapes::{Collider, ShapeCatalog, ShapeKind};
