use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::gesture::Gesture;
use crate::sim::{ResetEvent, Scenario, SimSettings};
use crate::store::BodyStore;

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Update, (body_counter, ui_system));
    }
}

pub fn body_count_label(n: usize) -> String {
    format!("{} bod{}", n, if n == 1 { "y" } else { "ies" })
}

fn body_counter(mut contexts: EguiContexts, store: Res<BodyStore>) {
    egui::Area::new(egui::Id::new("body_counter"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 5.0))
        .show(contexts.ctx_mut(), |ui| {
            ui.label(
                egui::RichText::new(body_count_label(store.len()))
                    .size(20.0)
                    .color(egui::Color32::GRAY),
            );
        });
}

fn ui_system(
    mut contexts: EguiContexts,
    mut settings: ResMut<SimSettings>,
    gesture: Res<Gesture>,
    diagnostics: Res<DiagnosticsStore>,
    mut ev_reset: EventWriter<ResetEvent>,
) {
    if !settings.show_hud {
        return;
    }

    egui::Window::new("Simulation").show(contexts.ctx_mut(), |ui| {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                ui.label(format!("FPS: {:.1}", value));
            }
        }
        ui.label(format!("Sim Rate: {:.2}x", settings.time_scale));
        if let Some(p) = gesture.pending() {
            ui.label(format!(
                "Launching: mass {:.0}, speed {:.1}",
                p.mass,
                p.vel.length()
            ));
        }

        ui.separator();

        ui.checkbox(&mut settings.running, "Running");
        ui.add(egui::Slider::new(&mut settings.g, 0.0..=2000.0).text("Gravity (G)"));
        ui.add(egui::Slider::new(&mut settings.time_scale, 0.25..=4.0).text("Time Scale"));
        ui.add(egui::Slider::new(&mut settings.spawn_mass, 1.0..=2000.0).text("Launch Mass"));

        ui.separator();

        egui::ComboBox::from_label("Scenario")
            .selected_text(format!("{:?}", settings.scenario))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut settings.scenario, Scenario::ThreeBody, "Three Body");
                ui.selectable_value(
                    &mut settings.scenario,
                    Scenario::RandomCloud,
                    "Random Cloud",
                );
                ui.selectable_value(&mut settings.scenario, Scenario::Empty, "Empty");
            });
        if settings.scenario == Scenario::RandomCloud {
            ui.add(egui::Slider::new(&mut settings.random_count, 1..=60).text("Bodies"));
            ui.add(egui::Slider::new(&mut settings.random_mass, 1.0..=1000.0).text("Body Mass"));
            ui.checkbox(&mut settings.deterministic, "Deterministic");
        }
        if ui.button("Reset").clicked() {
            ev_reset.send(ResetEvent::default());
        }

        ui.separator();

        ui.label("Left Mouse: drag to launch a body");
        ui.label("Space: Pause  [/]: Sim Speed");
        ui.label("R: Reset  H: Toggle Panel");
    });
}
