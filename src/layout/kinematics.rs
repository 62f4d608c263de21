//! Neighbor attraction and explicit Euler integration.
//!
//! Each entity's velocity is the sum, over its linked neighbors, of the
//! vector toward the neighbor scaled to the gap between the two bounding
//! circles. The gap shrinks to zero once the circles touch and goes
//! negative (repulsive) when they overlap. There is no damping, so dense
//! graphs can oscillate.

use vek::Vec2;

use crate::graph::Body;

/// Pull exerted on `body` by one linked neighbor.
///
/// Coincident centers have no direction and contribute nothing.
pub fn pull_toward(body: &Body, neighbor: &Body) -> Vec2<f32> {
    let offset = neighbor.position - body.position;
    let distance = offset.magnitude();
    if distance <= f32::EPSILON {
        return Vec2::zero();
    }
    let gap = distance - (body.radius() + neighbor.radius());
    offset / distance * gap
}

/// Velocity of `body` given all of its linked neighbors.
pub fn attraction<'a, I>(body: &Body, neighbors: I) -> Vec2<f32>
where
    I: IntoIterator<Item = &'a Body>,
{
    neighbors
        .into_iter()
        .fold(Vec2::zero(), |acc, neighbor| acc + pull_toward(body, neighbor))
}

/// Advance the position by one explicit Euler step.
#[inline]
pub fn integrate(body: &mut Body, dt: f32) {
    body.position += body.velocity * dt;
}
