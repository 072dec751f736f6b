use crate::gesture::Gesture;
use crate::sim::{handle_reset, random_color, step_bodies, ResetEvent, SimSettings};
use crate::store::BodyStore;
use crate::MainCamera;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                drag_spawn.after(handle_reset).before(step_bodies),
                pause_toggle,
                time_scale_toggle,
                reset_trigger,
                hud_toggle,
            ),
        );
    }
}

fn window_cursor_world(cursor_pos: Vec2, cam: (&Camera, &GlobalTransform)) -> Option<Vec2> {
    cam.0.viewport_to_world_2d(cam.1, cursor_pos)
}

/// Left button held: place or aim the pending body. Released: launch it.
fn drag_spawn(
    windows: Query<&Window>,
    q_cam: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    buttons: Res<ButtonInput<MouseButton>>,
    settings: Res<SimSettings>,
    mut gesture: ResMut<Gesture>,
    mut store: ResMut<BodyStore>,
    mut contexts: EguiContexts,
) {
    if buttons.pressed(MouseButton::Left) {
        // presses on the HUD never start a body
        if !gesture.is_dragging() && contexts.ctx_mut().wants_pointer_input() {
            return;
        }
        let Ok(win) = windows.get_single() else {
            return;
        };
        let Some(cursor) = win.cursor_position() else {
            return;
        };
        let Ok(cam) = q_cam.get_single() else {
            return;
        };
        let Some(world) = window_cursor_world(cursor, cam) else {
            return;
        };

        let mut rng = rand::thread_rng();
        if let Err(err) = gesture.hold(world, |p| settings.spawn_body(p, random_color(&mut rng))) {
            warn!("cannot place a new body: {err}");
        }
    } else if buttons.just_released(MouseButton::Left) {
        match gesture.release() {
            Some(body) => {
                debug!(
                    "launched body at {:?} with velocity {:?}",
                    body.pos, body.vel
                );
                store.push(body);
            }
            None => debug!("pointer released without a pending body"),
        }
    }
}

fn pause_toggle(mut settings: ResMut<SimSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::Space) {
        settings.running = !settings.running;
    }
}

fn time_scale_toggle(mut settings: ResMut<SimSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::BracketRight) {
        settings.time_scale *= 2.0;
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        settings.time_scale /= 2.0;
    }
    settings.time_scale = settings.time_scale.clamp(0.25, 4.0);
}

fn reset_trigger(mut ev_reset: EventWriter<ResetEvent>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyR) {
        ev_reset.send(ResetEvent::default());
    }
}

fn hud_toggle(mut settings: ResMut<SimSettings>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyH) {
        settings.show_hud = !settings.show_hud;
    }
}
