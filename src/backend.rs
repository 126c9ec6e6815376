//! The GL calls a [`crate::Shader`] needs, behind one trait.

use glow::HasContext as _;

use crate::{ShaderType, UniformValue};

/// Shader-related part of a GL context.
///
/// Failure to compile or link is reported through the returned status flag and
/// the info log, never through `Err`; `Err` means the object itself could not
/// be created.
pub trait ShaderBackend {
    type Shader: Copy;
    type Program: Copy;
    type UniformLocation: Clone;

    fn create_shader(&self, stage: ShaderType) -> Result<Self::Shader, String>;
    /// Uploads `source` and compiles it; returns the compile status.
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Links `program`; returns the link status.
    fn link_program(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    fn active_uniform_names(&self, program: Self::Program) -> Vec<String>;
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    /// Writes to the uniform at `location` of the bound program.
    fn set_uniform(&self, location: &Self::UniformLocation, value: &UniformValue);
}

impl ShaderBackend for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderType) -> Result<glow::Shader, String> {
        unsafe { glow::HasContext::create_shader(self, stage.gl_enum()) }
    }

    fn compile_shader(&self, shader: glow::Shader, source: &str) -> bool {
        unsafe {
            self.shader_source(shader, source);
            glow::HasContext::compile_shader(self, shader);
            self.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { glow::HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { glow::HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { glow::HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { glow::HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: glow::Program) -> bool {
        unsafe {
            glow::HasContext::link_program(self, program);
            self.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { glow::HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        unsafe { glow::HasContext::use_program(self, program) }
    }

    fn active_uniform_names(&self, program: glow::Program) -> Vec<String> {
        unsafe {
            (0..self.get_active_uniforms(program))
                .filter_map(|index| self.get_active_uniform(program, index))
                .map(|uniform| uniform.name)
                .collect()
        }
    }

    fn uniform_location(
        &self,
        program: glow::Program,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn set_uniform(&self, location: &glow::UniformLocation, value: &UniformValue) {
        let loc = Some(location);
        unsafe {
            match value {
                UniformValue::Bool(v) => self.uniform_1_i32(loc, *v as i32),
                UniformValue::I32(v) => self.uniform_1_i32(loc, *v),
                UniformValue::F32(v) => self.uniform_1_f32(loc, *v),
                UniformValue::Vec2(v) => self.uniform_2_f32(loc, v[0], v[1]),
                UniformValue::Vec3(v) => self.uniform_3_f32(loc, v[0], v[1], v[2]),
                UniformValue::Vec4(v) => self.uniform_4_f32(loc, v[0], v[1], v[2], v[3]),
                UniformValue::Mat3(m) => self.uniform_matrix_3_f32_slice(loc, false, m),
                UniformValue::Mat4(m) => self.uniform_matrix_4_f32_slice(loc, false, m),
            }
        }
    }
}
