//! Exact all-pairs gravity and contact response.
//!
//! Every ordered pair `(i, j)` with `i != j` contributes to `out[i]`, so the
//! cost is O(n²) per frame. The relative position gets a small constant offset
//! on both axes so coincident bodies never yield a zero vector; very close
//! pairs can still produce huge accelerations.

use bevy::prelude::*;

use crate::store::Body;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    /// Gravitational constant, in pixel units.
    pub g: f32,
    /// Offset added to both components of every relative position.
    pub dist_eps: f32,
    /// Overlap tolerance before the contact term kicks in.
    pub coll_eps: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            g: 667.43,
            dist_eps: 1e-4,
            coll_eps: 1.0,
        }
    }
}

/// Adds gravity and contact accelerations for every body into `out`.
///
/// `out` must be the same length as `bodies`. `bodies` is only read, so all
/// pairs see the same pre-step state.
pub fn accumulate_accels(params: &ForceParams, dt: f32, bodies: &[Body], out: &mut [Vec2]) {
    debug_assert_eq!(bodies.len(), out.len());

    let idt = if dt == 0.0 { 0.0 } else { 1.0 / dt };

    for (i, body) in bodies.iter().enumerate() {
        for (j, other) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            let xrel = other.pos - body.pos + Vec2::splat(params.dist_eps);
            let dist_sqr = xrel.length_squared();

            out[i] += gravity(params.g, other.mass, xrel, dist_sqr);

            if dist_sqr.sqrt() < body.radius + other.radius - params.coll_eps {
                out[i] += contact(body, other, xrel, dist_sqr, idt);
            }
        }
    }
}

/// `xrel` is left unnormalised, hence the 1.5 power.
fn gravity(g: f32, other_mass: f32, xrel: Vec2, dist_sqr: f32) -> Vec2 {
    xrel * g * other_mass / dist_sqr.powf(1.5)
}

// 1D elastic velocity change along the line of centres, divided by dt to land
// in acceleration units.
fn contact(body: &Body, other: &Body, xrel: Vec2, dist_sqr: f32, idt: f32) -> Vec2 {
    let vrel = body.vel - other.vel;
    let v_proj = -vrel.dot(xrel) / dist_sqr;
    let m_tot = body.mass + other.mass;
    xrel * 2.0 * other.mass / m_tot * v_proj * idt
}
