use bevy::prelude::*;
use rand::{Rng, RngCore, SeedableRng};

use crate::forces::ForceParams;
use crate::gesture::Gesture;
use crate::store::{Body, BodyError, BodyStore, Bounds};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Scenario {
    #[default]
    ThreeBody,
    RandomCloud,
    Empty,
}

pub struct SimPlugin;
impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimSettings>()
            .init_resource::<BodyStore>()
            .init_resource::<Gesture>()
            .add_event::<ResetEvent>()
            .add_systems(Startup, spawn_initial_bodies)
            .add_systems(
                Update,
                (handle_reset, step_bodies, draw_bodies, cull_escaped).chain(),
            );
    }
}

#[derive(Event, Default)]
pub struct ResetEvent;

#[derive(Resource, Clone)]
pub struct SimSettings {
    pub g: f32,
    pub dist_eps: f32,
    pub coll_eps: f32,
    pub body_radius: f32,
    pub spawn_mass: f32,
    pub bounds: Bounds,
    pub running: bool,
    pub time_scale: f32,
    pub scenario: Scenario,
    pub random_count: usize,
    pub random_mass: f32,
    pub deterministic: bool,
    pub show_hud: bool,
}
impl Default for SimSettings {
    fn default() -> Self {
        let force = ForceParams::default();
        Self {
            g: force.g,
            dist_eps: force.dist_eps,
            coll_eps: force.coll_eps,
            body_radius: 20.0,
            spawn_mass: 200.0,
            bounds: Bounds::new(1000.0, 600.0),
            running: true,
            time_scale: 1.0,
            scenario: Scenario::default(),
            random_count: 30,
            random_mass: 100.0,
            deterministic: false,
            show_hud: true,
        }
    }
}

impl SimSettings {
    pub fn force_params(&self) -> ForceParams {
        ForceParams {
            g: self.g,
            dist_eps: self.dist_eps,
            coll_eps: self.coll_eps,
        }
    }

    /// Template for a body launched by a drag gesture.
    pub fn spawn_body(&self, pos: Vec2, color: Color) -> Result<Body, BodyError> {
        Body::new(self.spawn_mass, self.body_radius, pos, Vec2::ZERO, color)
    }
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::srgb_u8(rng.gen(), rng.gen(), rng.gen())
}

impl Scenario {
    pub fn build(&self, settings: &SimSettings, rng: &mut dyn RngCore) -> Result<Vec<Body>, BodyError> {
        let bounds = settings.bounds;
        let r = settings.body_radius;
        match self {
            Scenario::ThreeBody => {
                // Heavy hub, a light orbiter, and a medium body falling in.
                let c = bounds.center();
                Ok(vec![
                    Body::new(1000.0, r, c, Vec2::ZERO, Color::srgb(0.0, 0.47, 0.95))?,
                    Body::new(
                        10.0,
                        r,
                        c + Vec2::new(0.0, 100.0),
                        Vec2::new(81.69, 0.0),
                        Color::srgb(0.0, 0.89, 0.19),
                    )?,
                    Body::new(
                        100.0,
                        r,
                        c + Vec2::new(200.0, 200.0),
                        Vec2::new(-60.0, -60.0),
                        Color::srgb(0.9, 0.16, 0.22),
                    )?,
                ])
            }
            Scenario::RandomCloud => (0..settings.random_count)
                .map(|_| {
                    let pos = Vec2::new(
                        rng.gen_range(0.0..=bounds.width),
                        rng.gen_range(0.0..=bounds.height),
                    );
                    let color = random_color(&mut *rng);
                    Body::new(settings.random_mass, r, pos, Vec2::ZERO, color)
                })
                .collect(),
            Scenario::Empty => Ok(Vec::new()),
        }
    }
}

fn populate(settings: &SimSettings, store: &mut BodyStore) {
    let mut rng: Box<dyn RngCore> = if settings.deterministic {
        Box::new(rand::rngs::StdRng::from_seed([0; 32]))
    } else {
        Box::new(rand::thread_rng())
    };

    match settings.scenario.build(settings, rng.as_mut()) {
        Ok(bodies) => {
            for body in bodies {
                store.push(body);
            }
            info!("spawned {:?} with {} bodies", settings.scenario, store.len());
        }
        Err(err) => warn!("could not build {:?}: {err}", settings.scenario),
    }
}

/// Drops every body and any half-finished gesture, then respawns the scenario.
pub fn reset_world(settings: &SimSettings, store: &mut BodyStore, gesture: &mut Gesture) {
    store.clear();
    gesture.cancel();
    populate(settings, store);
}

pub fn spawn_initial_bodies(settings: Res<SimSettings>, mut store: ResMut<BodyStore>) {
    populate(&settings, &mut store);
}

pub fn handle_reset(
    mut ev_reset: EventReader<ResetEvent>,
    settings: Res<SimSettings>,
    mut store: ResMut<BodyStore>,
    mut gesture: ResMut<Gesture>,
) {
    if ev_reset.is_empty() {
        return;
    }
    ev_reset.clear();

    reset_world(&settings, &mut store, &mut gesture);
}

pub fn step_bodies(time: Res<Time>, settings: Res<SimSettings>, mut store: ResMut<BodyStore>) {
    if !settings.running {
        return;
    }
    let dt = time.delta_seconds() * settings.time_scale;
    store.step(&settings.force_params(), dt);
}

pub fn draw_bodies(mut gizmos: Gizmos, store: Res<BodyStore>, gesture: Res<Gesture>) {
    for b in store.bodies() {
        gizmos.circle_2d(b.pos, b.radius, b.color);
    }

    if let Some(p) = gesture.pending() {
        gizmos.circle_2d(p.pos, p.radius, p.color);
        gizmos.line_2d(p.pos, p.pos + p.vel, p.color);
    }
}

pub fn cull_escaped(settings: Res<SimSettings>, mut store: ResMut<BodyStore>) {
    let culled = store.cull(settings.bounds);
    debug_assert_eq!(store.bodies().len(), store.accelerations().len());
    if culled > 0 {
        debug!("culled {culled} escaped bodies, {} left", store.len());
    }
}
