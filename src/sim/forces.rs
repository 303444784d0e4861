use eframe::egui::{Vec2, vec2};

use super::{Body, SimConfig};

/// Direction to push two coincident disks apart: derived from the pair's
/// indices so the outcome is deterministic instead of depending on a random
/// source.
fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Accumulates one tick worth of forces: center attraction, soft pairwise
/// repulsion and hard collision separation. Repulsion and centering are
/// scaled by the decaying temperature so the system loses energy and
/// converges; collision response stays active at any temperature.
pub(super) fn accumulate(
    bodies: &[Body],
    container: Vec2,
    config: &SimConfig,
    temperature: f32,
    forces: &mut Vec<Vec2>,
) {
    let count = bodies.len();
    forces.resize(count, Vec2::ZERO);
    forces.fill(Vec2::ZERO);

    let center = container * 0.5;
    let center_pull = config.center_pull * temperature;
    if center_pull > 0.0 {
        for (force, body) in forces.iter_mut().zip(bodies.iter()) {
            *force += (center - body.position) * center_pull;
        }
    }

    let repulsion = config.repulsion * temperature;
    for i in 0..count {
        for j in (i + 1)..count {
            let delta = bodies[i].position - bodies[j].position;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                fallback_direction(i, j)
            };

            if repulsion > 0.0 {
                let push = repulsion / (distance_sq + config.repulsion_softening);
                forces[i] += direction * push;
                forces[j] -= direction * push;
            }

            let min_distance = bodies[i].radius + bodies[j].radius + config.collision_padding;
            if distance < min_distance {
                let overlap_push = (min_distance - distance) * config.collision_strength;
                // Heavier (larger) disks yield less, so a newcomer shoulders
                // its way in without shoving the whole layout around.
                let (share_i, share_j) = mass_shares(bodies[i].radius, bodies[j].radius);
                forces[i] += direction * (overlap_push * 2.0 * share_i);
                forces[j] -= direction * (overlap_push * 2.0 * share_j);
            }
        }
    }
}

/// One relaxation pass of direct positional de-overlap. Returns the largest
/// single correction applied, which doubles as the motion signal once the
/// integrator has gone quiet.
pub(super) fn separate_overlaps(bodies: &mut [Body], padding: f32, relax: f32) -> f32 {
    let count = bodies.len();
    let mut max_correction = 0.0_f32;

    for i in 0..count {
        for j in (i + 1)..count {
            let delta = bodies[i].position - bodies[j].position;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let min_distance = bodies[i].radius + bodies[j].radius + padding;
            if distance >= min_distance {
                continue;
            }

            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                fallback_direction(i, j)
            };

            let correction = (min_distance - distance) * relax;
            let (share_i, share_j) = mass_shares(bodies[i].radius, bodies[j].radius);
            bodies[i].position += direction * (correction * share_i);
            bodies[j].position -= direction * (correction * share_j);
            max_correction = max_correction.max(correction);
        }
    }

    max_correction
}

/// Splits a pairwise push in inverse proportion to disk area.
fn mass_shares(radius_a: f32, radius_b: f32) -> (f32, f32) {
    let mass_a = (radius_a * radius_a).max(1.0);
    let mass_b = (radius_b * radius_b).max(1.0);
    let total = mass_a + mass_b;
    (mass_b / total, mass_a / total)
}
