#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(rustdoc::missing_crate_level_docs)] // it's an example

use eframe::{egui, egui_glow, glow};

use egui::mutex::Mutex;
use hello_glow::{config::WindowConfig, mesh::Mesh, shapes, Shader};
use std::sync::Arc;

const SHADER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/basic.shader");

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let config = WindowConfig::default().with_title("Two rectangles");
    eframe::run_native(
        &config.title.clone(),
        config.native_options(),
        Box::new(|cc| Ok(Box::new(MyApp::new(cc, config)?))),
    )
}

struct Scene {
    config: WindowConfig,
    shader: Shader<glow::Context>,
    mesh: Mesh,
}

impl Scene {
    fn paint(&mut self, gl: &glow::Context) {
        self.config.clear(gl);
        self.shader.use_program(gl);
        let n = shapes::RECTANGLE_NUM_INDEX;
        self.shader.set_vec4(gl, "uColor", &RED);
        self.mesh.draw_elements(gl, glow::TRIANGLES, 0, n);
        self.shader.set_vec4(gl, "uColor", &BLUE);
        self.mesh.draw_elements(gl, glow::TRIANGLES, n, n);
    }

    fn destroy(&mut self, gl: &glow::Context) {
        self.shader.destroy(gl);
        self.mesh.destroy(gl);
    }
}

struct MyApp {
    scene: Arc<Mutex<Scene>>,
}

impl MyApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        config: WindowConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let gl: &glow::Context = cc
            .gl
            .as_ref()
            .ok_or("You need to run eframe with the glow backend")?;
        // compile or link failures are logged; the rectangles then stay blank
        let mut shader = Shader::from_file(gl, SHADER_PATH)?;
        let mut mesh = shader.release_on_err(gl, Mesh::new(gl, &shapes::TWO_RECTANGLES_VTX2XYZ, 3))?;
        if let Err(err) = mesh.set_elem2vtx(gl, &shapes::TWO_RECTANGLES_TRI2VTX) {
            mesh.destroy(gl);
            shader.destroy(gl);
            return Err(err.into());
        }
        Ok(Self {
            scene: Arc::new(Mutex::new(Scene {
                config,
                shader,
                mesh,
            })),
        })
    }

    fn custom_painting(&mut self, ui: &mut egui::Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        let scene = self.scene.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                let gl: &glow::Context = painter.gl();
                scene.lock().paint(gl);
            })),
        };
        ui.painter().add(callback);
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        hello_glow::config::close_on_escape(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::canvas(ui.style()).show(ui, |ui| {
                self.custom_painting(ui);
            });
        });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.scene.lock().destroy(gl);
        }
    }
}
