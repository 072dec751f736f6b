mod forces;
mod gesture;
mod input;
mod sim;
mod store;
mod ui;

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use input::InputPlugin;
use sim::{SimPlugin, SimSettings};
use ui::UiPlugin;

fn main() {
    let bounds = SimSettings::default().bounds;

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.96, 0.96, 0.96)))
        .insert_resource(Msaa::Sample4)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "nbody".into(),
                resolution: (bounds.width, bounds.height).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((SimPlugin, UiPlugin, InputPlugin))
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands, settings: Res<SimSettings>) {
    // frame the simulation rectangle [0, w] x [0, h]
    let center = settings.bounds.center();
    commands.spawn((
        Camera2dBundle {
            transform: Transform::from_xyz(center.x, center.y, 999.0),
            ..default()
        },
        MainCamera,
    ));
}

#[derive(Component)]
pub struct MainCamera;
