//! Steering rules. Each rule returns a force and keeps its working values
//! local; summing them into the agent is the caller's job.

use crate::agent::{SteeringAgent, WorldBounds};
use crate::math;
use crate::vector::Vector3D;

/// Distances at or below this count as touching and produce no force.
const EPSILON: f32 = 1.0e-6;

/// Inverse-distance push away from one boundary plane, directed toward the
/// inside of the box. `normal` is the plane's inward unit normal and
/// `distance` the agent's signed distance along it.
fn wall_push(normal: Vector3D, distance: f32) -> Vector3D {
    let gap = math::abs(distance);
    if gap <= EPSILON {
        Vector3D::zero()
    } else {
        normal / gap
    }
}

/// Sum of the pushes from all six faces of the box.
///
/// Inside the box this is `(position - wall_point) / |position - wall_point|²`
/// for each face, where `wall_point` is the position projected onto it.
/// Outside, the push still points inward so stray agents come back.
pub fn avoid_walls(position: Vector3D, bounds: &WorldBounds) -> Vector3D {
    let faces = [
        (Vector3D::new(1.0, 0.0, 0.0), position.x + bounds.width),
        (Vector3D::new(-1.0, 0.0, 0.0), bounds.width - position.x),
        (Vector3D::new(0.0, 1.0, 0.0), position.y + bounds.height),
        (Vector3D::new(0.0, -1.0, 0.0), bounds.height - position.y),
        (Vector3D::new(0.0, 0.0, 1.0), position.z + bounds.depth),
        (Vector3D::new(0.0, 0.0, -1.0), bounds.depth - position.z),
    ];

    faces
        .iter()
        .fold(Vector3D::zero(), |acc, &(normal, distance)| {
            acc + wall_push(normal, distance)
        })
}

/// Linear pull toward `target`, unclamped.
pub fn reach(position: Vector3D, target: Vector3D, amount: f32) -> Vector3D {
    (target - position) * amount
}

/// Push away from `target` when closer than `radius`.
pub fn repulse(position: Vector3D, target: Vector3D, radius: f32, weight: f32) -> Vector3D {
    let distance = position.distance(&target);
    if distance > EPSILON && distance < radius {
        (position - target) * (weight / distance)
    } else {
        Vector3D::zero()
    }
}

fn is_neighbor(agent: &SteeringAgent, other: &SteeringAgent) -> Option<f32> {
    let distance = agent.position().distance(&other.position());
    (distance > 0.0 && distance <= agent.config().neighborhood_radius).then_some(distance)
}

/// Mean velocity of the neighbours, clamped to the steer limit.
pub fn alignment<'a, I>(agent: &SteeringAgent, others: I) -> Vector3D
where
    I: Iterator<Item = &'a SteeringAgent>,
{
    let mut sum = Vector3D::zero();
    let mut count = 0;

    for other in others {
        if is_neighbor(agent, other).is_some() {
            sum += other.velocity();
            count += 1;
        }
    }

    if count > 0 {
        (sum / count as f32).limit(agent.config().max_steer_force)
    } else {
        Vector3D::zero()
    }
}

/// Steer toward the neighbours' centre, clamped to the steer limit. With no
/// neighbours the centre is the world origin.
pub fn cohesion<'a, I>(agent: &SteeringAgent, others: I) -> Vector3D
where
    I: Iterator<Item = &'a SteeringAgent>,
{
    let mut sum = Vector3D::zero();
    let mut count = 0;

    for other in others {
        if is_neighbor(agent, other).is_some() {
            sum += other.position();
            count += 1;
        }
    }

    let centre = if count > 0 { sum / count as f32 } else { sum };
    (centre - agent.position()).limit(agent.config().max_steer_force)
}

/// Sum of unit pushes away from each neighbour, each weighted by
/// `1 / distance`. Left unclamped so it wins over the other rules at close
/// range.
pub fn separation<'a, I>(agent: &SteeringAgent, others: I) -> Vector3D
where
    I: Iterator<Item = &'a SteeringAgent>,
{
    let mut steering = Vector3D::zero();

    for other in others {
        if let Some(distance) = is_neighbor(agent, other) {
            let diff = (agent.position() - other.position()).normalize();
            steering += diff / distance;
        }
    }

    steering
}
