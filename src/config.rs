use eframe::egui;
use glow::HasContext as _;

/// `#version` line matching the target: desktop GL 3.3 core, or WebGL2.
pub fn glsl_version_header() -> &'static str {
    if cfg!(target_arch = "wasm32") {
        "#version 300 es"
    } else {
        "#version 330 core"
    }
}

/// Asks the viewport to close when Escape was pressed this frame.
pub fn close_on_escape(ctx: &egui::Context) -> bool {
    let pressed = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    if pressed {
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
    pressed
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub multisampling: u16,
    pub clear_color: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hello OpenGL".to_string(),
            width: 800.0,
            height: 600.0,
            multisampling: 4,
            clear_color: [0.1, 0.15, 0.15, 1.0],
        }
    }
}

impl WindowConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn native_options(&self) -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(self.title.clone())
                .with_inner_size([self.width, self.height]),
            multisampling: self.multisampling,
            renderer: eframe::Renderer::Glow,
            ..Default::default()
        }
    }

    pub fn clear(&self, gl: &glow::Context) {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }
}
