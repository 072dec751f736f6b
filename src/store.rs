use bevy::prelude::*;
use thiserror::Error;

use crate::forces::{accumulate_accels, ForceParams};

#[derive(Debug, Error, PartialEq)]
pub enum BodyError {
    #[error("body mass must be positive and finite, got {0}")]
    NonPositiveMass(f32),
    #[error("body radius must be positive and finite, got {0}")]
    NonPositiveRadius(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub mass: f32,
    pub radius: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
}

impl Body {
    pub fn new(mass: f32, radius: f32, pos: Vec2, vel: Vec2, color: Color) -> Result<Self, BodyError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(BodyError::NonPositiveMass(mass));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BodyError::NonPositiveRadius(radius));
        }
        Ok(Self {
            mass,
            radius,
            pos,
            vel,
            color,
        })
    }

    /// Symplectic Euler: the position step uses the freshly updated velocity.
    pub fn update(&mut self, acc: Vec2, dt: f32) {
        self.vel += acc * dt;
        self.pos += self.vel * dt;
    }
}

/// Simulation rectangle `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// True once the whole disc has left the rectangle.
    pub fn escaped(&self, body: &Body) -> bool {
        let r = body.radius;
        body.pos.x > self.width + r
            || body.pos.x < -r
            || body.pos.y > self.height + r
            || body.pos.y < -r
    }
}

/// Ordered bodies plus their per-frame acceleration slots.
///
/// Both vectors are private so every insertion and removal goes through a
/// method that touches them together; `bodies[i]` always owns `acc[i]`.
#[derive(Resource, Default, Debug)]
pub struct BodyStore {
    bodies: Vec<Body>,
    acc: Vec<Vec2>,
}

impl BodyStore {
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn accelerations(&self) -> &[Vec2] {
        &self.acc
    }

    pub fn push(&mut self, body: Body) {
        self.bodies.push(body);
        self.acc.push(Vec2::ZERO);
    }

    /// Keeps the bodies for which `keep` is true. Returns how many were dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Body) -> bool,
    {
        let before = self.bodies.len();
        let mut slots = std::mem::take(&mut self.acc).into_iter();
        let mut kept_acc = Vec::with_capacity(before);
        self.bodies.retain(|b| {
            let slot = slots.next().unwrap_or(Vec2::ZERO);
            let keep_it = keep(b);
            if keep_it {
                kept_acc.push(slot);
            }
            keep_it
        });
        self.acc = kept_acc;
        before - self.bodies.len()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.acc.clear();
    }

    /// Removes bodies that have fully left `bounds`.
    pub fn cull(&mut self, bounds: Bounds) -> usize {
        self.retain(|b| !bounds.escaped(b))
    }

    /// Fills the accumulator from the current (pre-step) state.
    pub fn evaluate(&mut self, params: &ForceParams, dt: f32) {
        accumulate_accels(params, dt, &self.bodies, &mut self.acc);
    }

    /// Applies and then zeroes every accumulator slot.
    pub fn integrate(&mut self, dt: f32) {
        for (body, acc) in self.bodies.iter_mut().zip(self.acc.iter_mut()) {
            body.update(*acc, dt);
            *acc = Vec2::ZERO;
        }
    }

    /// One full physics frame: every read completes before any body moves.
    pub fn step(&mut self, params: &ForceParams, dt: f32) {
        self.evaluate(params, dt);
        self.integrate(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32) -> Body {
        Body::new(100.0, 20.0, Vec2::new(x, y), Vec2::ZERO, Color::WHITE).unwrap()
    }

    fn assert_aligned(store: &BodyStore) {
        assert_eq!(store.bodies().len(), store.accelerations().len());
    }

    #[test]
    fn rejects_non_positive_mass_and_radius() {
        let c = Color::WHITE;
        assert_eq!(
            Body::new(0.0, 1.0, Vec2::ZERO, Vec2::ZERO, c),
            Err(BodyError::NonPositiveMass(0.0))
        );
        assert_eq!(
            Body::new(-5.0, 1.0, Vec2::ZERO, Vec2::ZERO, c),
            Err(BodyError::NonPositiveMass(-5.0))
        );
        assert!(Body::new(f32::NAN, 1.0, Vec2::ZERO, Vec2::ZERO, c).is_err());
        assert_eq!(
            Body::new(1.0, 0.0, Vec2::ZERO, Vec2::ZERO, c),
            Err(BodyError::NonPositiveRadius(0.0))
        );
        assert!(Body::new(1.0, f32::INFINITY, Vec2::ZERO, Vec2::ZERO, c).is_err());
        assert!(Body::new(1.0, 1.0, Vec2::ZERO, Vec2::ZERO, c).is_ok());
    }

    #[test]
    fn push_and_retain_keep_accumulator_aligned() {
        let mut store = BodyStore::default();
        assert!(store.is_empty());
        assert_aligned(&store);

        for i in 0..5 {
            store.push(body_at(i as f32 * 100.0, 0.0));
            assert_aligned(&store);
        }
        assert_eq!(store.len(), 5);

        let removed = store.retain(|b| b.pos.x < 250.0);
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 3);
        assert_aligned(&store);

        store.clear();
        assert!(store.is_empty());
        assert_aligned(&store);
    }

    #[test]
    fn retain_preserves_order_and_slot_pairing() {
        let mut store = BodyStore::default();
        store.push(body_at(0.0, 0.0));
        store.push(body_at(1000.0, 0.0));
        store.push(body_at(2000.0, 0.0));
        store.evaluate(&ForceParams::default(), 1.0 / 60.0);
        let last_acc = store.accelerations()[2];

        store.retain(|b| b.pos.x != 1000.0);

        let xs: Vec<f32> = store.bodies().iter().map(|b| b.pos.x).collect();
        assert_eq!(xs, vec![0.0, 2000.0]);
        assert_eq!(store.accelerations()[1], last_acc);
    }

    #[test]
    fn zero_acceleration_moves_by_velocity() {
        let mut body = body_at(10.0, 20.0);
        body.vel = Vec2::new(3.0, -4.0);
        let dt = 0.25;
        body.update(Vec2::ZERO, dt);
        assert_eq!(body.vel, Vec2::new(3.0, -4.0));
        assert_eq!(body.pos, Vec2::new(10.0 + 3.0 * dt, 20.0 - 4.0 * dt));
    }

    #[test]
    fn update_uses_new_velocity_for_position() {
        let mut body = body_at(0.0, 0.0);
        body.update(Vec2::new(2.0, 0.0), 1.0);
        assert_eq!(body.vel, Vec2::new(2.0, 0.0));
        assert_eq!(body.pos, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn integrate_clears_accumulator() {
        let mut store = BodyStore::default();
        store.push(body_at(100.0, 100.0));
        store.push(body_at(300.0, 100.0));
        store.evaluate(&ForceParams::default(), 1.0 / 60.0);
        assert!(store.accelerations().iter().all(|a| *a != Vec2::ZERO));

        store.integrate(1.0 / 60.0);
        assert!(store.accelerations().iter().all(|a| *a == Vec2::ZERO));
    }

    #[test]
    fn zero_dt_step_leaves_state_untouched() {
        let mut store = BodyStore::default();
        let mut a = body_at(100.0, 100.0);
        a.vel = Vec2::new(10.0, 0.0);
        let mut b = body_at(120.0, 100.0);
        b.vel = Vec2::new(-10.0, 0.0);
        store.push(a);
        store.push(b);

        store.step(&ForceParams::default(), 0.0);

        assert_eq!(store.bodies()[0], a);
        assert_eq!(store.bodies()[1], b);
        assert!(store.accelerations().iter().all(|acc| *acc == Vec2::ZERO));
    }

    #[test]
    fn cull_removes_body_past_right_edge() {
        let bounds = Bounds::new(1000.0, 600.0);
        let mut store = BodyStore::default();
        store.push(body_at(500.0, 300.0));
        store.push(body_at(1010.0, 300.0));
        store.push(body_at(250.0, 100.0));

        // still overlapping the edge
        assert_eq!(store.cull(bounds), 0);

        let mut runaway = body_at(1000.0, 300.0);
        runaway.vel = Vec2::new(600.0, 0.0);
        store.push(runaway);
        store.integrate(0.1);
        assert!(store.bodies()[3].pos.x > bounds.width + runaway.radius);

        assert_eq!(store.cull(bounds), 1);
        assert_eq!(store.len(), 3);
        assert_aligned(&store);
    }

    #[test]
    fn escaped_checks_every_edge() {
        let bounds = Bounds::new(100.0, 50.0);
        assert!(bounds.escaped(&body_at(-20.5, 10.0)));
        assert!(!bounds.escaped(&body_at(-19.5, 10.0)));
        assert!(bounds.escaped(&body_at(50.0, 70.5)));
        assert!(bounds.escaped(&body_at(50.0, -21.0)));
        assert!(!bounds.escaped(&body_at(50.0, 25.0)));
    }

    #[test]
    fn empty_store_steps_and_culls() {
        let mut store = BodyStore::default();
        store.step(&ForceParams::default(), 1.0 / 60.0);
        assert_eq!(store.cull(Bounds::new(10.0, 10.0)), 0);
        assert!(store.is_empty());
    }
}
