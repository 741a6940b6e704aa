use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use nalgebra::Vector3;

use hoverboard_sim::gnc::FlightController;
use hoverboard_sim::input::TriggerId;
use hoverboard_sim::physics::terrain::Terrain;
use hoverboard_sim::sim::{simulate_with, Telemetry};
use hoverboard_sim::types::{BodyState, Craft, GamepadInput, SimConfig};
use hoverboard_sim::vehicle::presets;
use hoverboard_sim::CraftConfig;

fn main() -> eframe::Result {
    env_logger::init();
    let craft_config = presets::citycruiser();
    let craft = presets::citycruiser_craft();
    let config = SimConfig { dt: 0.01, max_time: 10.0 };
    let terrain = Terrain::flat(0.0, "street");

    let telemetry = match FlightController::from_config(&craft_config) {
        Ok(mut controller) => simulate_with(
            &craft,
            &config,
            &terrain,
            BodyState::at_rest(Vector3::new(0.0, craft_config.hover_height, 0.0)),
            &mut controller,
            &mut |t| {
                let mut input = GamepadInput::default();
                input.left_stick.y = if (5.0..8.0).contains(&t) { 0.6 } else { 0.0 };
                let pull = if (2.0..2.6).contains(&t) { 1.0 } else { 0.0 };
                input.with_trigger(TriggerId::Right, pull)
            },
        ),
        Err(e) => {
            log::error!("invalid preset: {e}");
            Vec::new()
        }
    };

    let app = HoverViz { telemetry, craft_config, craft };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Hoverboard Flight", options, Box::new(|_| Ok(Box::new(app))))
}

struct HoverViz {
    telemetry: Vec<Telemetry>,
    craft_config: CraftConfig,
    craft: Craft,
}

fn plot(ui: &mut egui::Ui, id: &str, label: &str, w: f32, h: f32, lines: Vec<(&str, Vec<[f64; 2]>)>) {
    ui.vertical(|ui| {
        ui.label(label);
        Plot::new(id)
            .width(w)
            .height(h)
            .x_axis_label("Time (s)")
            .show(ui, |plot_ui| {
                for (name, points) in lines {
                    plot_ui.line(Line::new(name, PlotPoints::from(points)));
                }
            });
    });
}

impl eframe::App for HoverViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.telemetry.len() / 2000).max(1);
        let sampled: Vec<&Telemetry> = self.telemetry.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Craft: {}", self.craft_config.name));
            let max_gnd = sampled
                .iter()
                .filter(|f| f.output.ground.hit)
                .map(|f| f.output.ground.distance)
                .fold(0.0_f64, f64::max);
            ui.label(format!(
                "Hover: {:.2} m  |  Peak ground distance: {:.2} m  |  Mass: {:.0} kg  |  Actuators: {}",
                self.craft_config.hover_height,
                max_gnd,
                self.craft.mass,
                self.craft_config.actuators.len(),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;
            let series = |f: fn(&Telemetry) -> f64| -> Vec<[f64; 2]> {
                sampled.iter().map(|t| [t.state.time, f(t)]).collect()
            };

            ui.horizontal(|ui| {
                plot(ui, "ground", "Ground distance (m)", half_w, half_h, vec![
                    ("Ground", series(|t| t.output.ground.distance.min(50.0))),
                ]);
                plot(ui, "throttle", "Total throttle", half_w, half_h, vec![
                    ("Throttle", series(|t| t.output.total_throttle())),
                    ("Height PID", series(|t| t.output.height_response)),
                ]);
            });

            ui.horizontal(|ui| {
                plot(ui, "attitude", "Attitude response", half_w, half_h, vec![
                    ("X", series(|t| t.output.attitude_response.x)),
                    ("Y", series(|t| t.output.attitude_response.y)),
                    ("Z", series(|t| t.output.attitude_response.z)),
                ]);
                plot(ui, "speed", "Speed (m/s)", half_w, half_h, vec![
                    ("Speed", series(|t| t.state.vel.norm())),
                ]);
            });
        });
    }
}
