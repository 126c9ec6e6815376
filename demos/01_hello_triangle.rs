#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(rustdoc::missing_crate_level_docs)] // it's an example

use eframe::{egui, egui_glow, glow};

use egui::mutex::Mutex;
use hello_glow::{config::WindowConfig, mesh::Mesh, Shader, ShaderProgramSource};
use std::sync::Arc;

const VS_SRC: &str = r#"
layout (location = 0) in vec3 aPos;

void main() {
    gl_Position = vec4(aPos, 1.0);
}
"#;

const FS_SRC: &str = r#"
precision mediump float;
out vec4 FragColor;

void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let config = WindowConfig::default();
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
    fn paint(&self, gl: &glow::Context) {
        self.config.clear(gl);
        self.shader.use_program(gl);
        self.mesh.draw_arrays(gl, glow::TRIANGLES);
    }

    fn destroy(&mut self, gl: &glow::Context) {
        self.shader.destroy(gl);
        self.mesh.destroy(gl);
    }
}

struct MyApp {
    /// Behind an `Arc<Mutex<…>>` so we can pass it to [`egui::PaintCallback`] and paint later.
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
        let source = ShaderProgramSource::new(VS_SRC, FS_SRC)
            .with_version(hello_glow::config::glsl_version_header());
        let mut shader = Shader::new(gl, &source)?;
        let mesh = shader.release_on_err(gl, Mesh::new(gl, &hello_glow::shapes::TRIANGLE_VTX2XYZ, 3))?;
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
