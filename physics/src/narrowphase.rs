use crate::{
    body::BodyArena,
    contact::PairPool,
    error::Result,
    intersect::{ContactTest, ShapeInstance},
    shapes::ShapeCatalog,
};

/// Runs the exact contact test for every active pair.
///
/// A hit stores the contact on the record. A miss clears the contact together with its
/// accumulated impulses, so a lost contact is never warm started.
pub fn update_contacts(
    pairs: &mut PairPool,
    bodies: &BodyArena,
    catalog: &ShapeCatalog,
    contact_test: &dyn ContactTest,
) -> Result<usize> {
    let mut num_contacts = 0;
    for i in 0..pairs.active_slots().len() {
        let slot = pairs.active_slots()[i];
        let pair = pairs.get_mut(slot);
        let (handle_a, handle_b) = (pair.key.a, pair.key.b);
        let body_a = bodies.get_body(handle_a);
        let body_b = bodies.get_body(handle_b);

        let a = ShapeInstance {
            shape: catalog.resolve(handle_a.0, body_a.collider)?,
            position: body_a.position,
            rotation: body_a.rotation,
        };
        let b = ShapeInstance {
            shape: catalog.resolve(handle_b.0, body_b.collider)?,
            position: body_b.position,
            rotation: body_b.rotation,
        };

        match contact_test.contact(&a, &b) {
            Some(contact) => {
                pair.contact_count = 1;
                pair.normal = contact.normal;
                pair.penetration = contact.penetration;
                pair.local_point = contact.point - body_a.position;
                num_contacts += 1;
            }
            None => pair.clear_contact(),
        }
    }
    Ok(num_contacts)
}
