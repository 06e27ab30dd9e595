use crate::{
    contact::Contact,
    math::{FVec2, Fixed},
    shapes::{ShapeBox, ShapeCircle, ShapePolygon, ShapeRef},
};

/// A catalog shape placed in the world.
#[derive(Copy, Clone, Debug)]
pub struct ShapeInstance<'a> {
    pub shape: ShapeRef<'a>,
    pub position: FVec2,
    pub rotation: Fixed,
}

/// Exact intersection test used by the narrow phase.
///
/// Implementations must return a normal pointing from `a` to `b`.
pub trait ContactTest {
    fn contact(&self, a: &ShapeInstance, b: &ShapeInstance) -> Option<Contact>;
}

/// Default contact test for circles, boxes and convex polygons.
///
/// Boxes are handled as four vertex polygons. Touching shapes report a contact with zero
/// penetration.
#[derive(Copy, Clone, Debug, Default)]
pub struct ShapeContactTest;

impl ContactTest for ShapeContactTest {
    fn contact(&self, a: &ShapeInstance, b: &ShapeInstance) -> Option<Contact> {
        match (a.shape, b.shape) {
            (ShapeRef::Circle(circle_a), ShapeRef::Circle(circle_b)) => {
                circle_circle(circle_a, a.position, circle_b, b.position)
            }
            (ShapeRef::Circle(circle), _) => {
                let polygon = WorldPolygon::from_instance(b)?;
                polygon_circle(&polygon, circle, a.position).map(flip)
            }
            (_, ShapeRef::Circle(circle)) => {
                let polygon = WorldPolygon::from_instance(a)?;
                polygon_circle(&polygon, circle, b.position)
            }
            (_, _) => {
                let polygon_a = WorldPolygon::from_instance(a)?;
                let polygon_b = WorldPolygon::from_instance(b)?;
                polygon_polygon(&polygon_a, &polygon_b)
            }
        }
    }
}

fn flip(contact: Contact) -> Contact {
    Contact {
        normal: -contact.normal,
        ..contact
    }
}

pub fn circle_circle(
    circle_a: &ShapeCircle,
    pos_a: FVec2,
    circle_b: &ShapeCircle,
    pos_b: FVec2,
) -> Option<Contact> {
    let ab = pos_b - pos_a;
    let radius_ab = circle_a.radius + circle_b.radius;

    // cheap reject on each axis
    if ab.x.abs() > radius_ab || ab.y.abs() > radius_ab {
        return None;
    }
    if ab.length_squared_wide() > radius_ab.square_wide() {
        return None;
    }

    let distance = ab.length();
    let normal = if distance.is_zero() {
        // concentric, pick any axis
        FVec2::X
    } else {
        FVec2::new(ab.x / distance, ab.y / distance)
    };

    Some(Contact {
        normal,
        penetration: radius_ab - distance,
        point: pos_a + normal * circle_a.radius,
    })
}

/// Convex polygon transformed into world space.
struct WorldPolygon {
    vertices: Vec<FVec2>,
    normals: Vec<FVec2>,
}

impl WorldPolygon {
    fn from_instance(instance: &ShapeInstance) -> Option<Self> {
        let (sin, cos) = instance.rotation.sin_cos();
        let pos = instance.position;
        match instance.shape {
            ShapeRef::Box(shape) => Some(Self::from_box(shape, pos, sin, cos)),
            ShapeRef::Polygon(shape) => Some(Self::from_polygon(shape, pos, sin, cos)),
            ShapeRef::Circle(_) => None,
        }
    }

    fn from_box(shape: &ShapeBox, pos: FVec2, sin: Fixed, cos: Fixed) -> Self {
        const BOX_NORMALS: [FVec2; 4] = [
            FVec2::new(Fixed::ZERO, Fixed::NEG_ONE),
            FVec2::X,
            FVec2::Y,
            FVec2::new(Fixed::NEG_ONE, Fixed::ZERO),
        ];
        Self {
            vertices: shape
                .vertices()
                .iter()
                .map(|v| v.rotate(sin, cos) + pos)
                .collect(),
            normals: BOX_NORMALS.iter().map(|n| n.rotate(sin, cos)).collect(),
        }
    }

    fn from_polygon(shape: &ShapePolygon, pos: FVec2, sin: Fixed, cos: Fixed) -> Self {
        Self {
            vertices: shape
                .vertices()
                .iter()
                .map(|v| v.rotate(sin, cos) + pos)
                .collect(),
            normals: shape.normals().iter().map(|n| n.rotate(sin, cos)).collect(),
        }
    }

    fn edge(&self, i: usize) -> (FVec2, FVec2) {
        (self.vertices[i], self.vertices[(i + 1) % self.vertices.len()])
    }
}

fn polygon_circle(polygon: &WorldPolygon, circle: &ShapeCircle, centre: FVec2) -> Option<Contact> {
    let radius = circle.radius;

    // find the edge with the largest separation from the centre
    let mut best_edge = 0;
    let mut separation = Fixed::MIN;
    for (i, (vertex, normal)) in polygon
        .vertices
        .iter()
        .zip(polygon.normals.iter())
        .enumerate()
    {
        let s = normal.dot(centre - *vertex);
        if s > radius {
            return None;
        }
        if s > separation {
            separation = s;
            best_edge = i;
        }
    }

    let (v1, v2) = polygon.edge(best_edge);
    let normal = polygon.normals[best_edge];

    // centre inside the polygon
    if !separation.is_positive() {
        return Some(Contact {
            normal,
            penetration: radius - separation,
            point: centre - normal * separation,
        });
    }

    // voronoi regions of the two edge vertices
    let u1 = (centre - v1).dot(v2 - v1);
    let u2 = (centre - v2).dot(v1 - v2);
    let closest = if !u1.is_positive() {
        v1
    } else if !u2.is_positive() {
        v2
    } else {
        return Some(Contact {
            normal,
            penetration: radius - separation,
            point: centre - normal * separation,
        });
    };

    let d = centre - closest;
    if d.length_squared_wide() > radius.square_wide() {
        return None;
    }
    let distance = d.length();
    Some(Contact {
        normal: d.normalize_or_zero(),
        penetration: radius - distance,
        point: closest,
    })
}

/// Largest separation of `b` along the edge normals of `a`, with the edge index and the vertex of
/// `b` that is deepest along it.
fn find_max_separation(a: &WorldPolygon, b: &WorldPolygon) -> (Fixed, usize, FVec2) {
    let mut best = (Fixed::MIN, 0, FVec2::ZERO);
    for (i, (vertex_a, normal)) in a.vertices.iter().zip(a.normals.iter()).enumerate() {
        let mut deepest = (Fixed::MAX, FVec2::ZERO);
        for vertex_b in &b.vertices {
            let s = normal.dot(*vertex_b - *vertex_a);
            if s < deepest.0 {
                deepest = (s, *vertex_b);
            }
        }
        if deepest.0 > best.0 {
            best = (deepest.0, i, deepest.1);
        }
    }
    best
}

fn polygon_polygon(a: &WorldPolygon, b: &WorldPolygon) -> Option<Contact> {
    let (separation_a, edge_a, deepest_b) = find_max_separation(a, b);
    if separation_a.is_positive() {
        return None;
    }
    let (separation_b, edge_b, deepest_a) = find_max_separation(b, a);
    if separation_b.is_positive() {
        return None;
    }

    // prefer A as the reference polygon unless B is clearly better
    let tolerance = Fixed::from_ratio(1, 1000);
    if separation_b > separation_a + tolerance {
        Some(Contact {
            normal: -b.normals[edge_b],
            penetration: -separation_b,
            point: deepest_a,
        })
    } else {
        Some(Contact {
            normal: a.normals[edge_a],
            penetration: -separation_a,
            point: deepest_b,
        })
    }
}
