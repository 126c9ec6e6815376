//! Compile, link and drive a vertex + fragment program.

use std::collections::HashMap;
use std::path::Path;

use crate::{ShaderBackend, ShaderError, ShaderProgramSource, ShaderType, UniformValue};

/// A stage object after compilation. It is returned even when compilation
/// failed so the caller can inspect the log.
pub struct CompiledStage<B: ShaderBackend> {
    pub stage: ShaderType,
    pub shader: B::Shader,
    pub success: bool,
    pub info_log: String,
}

pub struct LinkedProgram<B: ShaderBackend> {
    pub program: B::Program,
    pub success: bool,
    pub info_log: String,
}

pub fn compile_stage<B: ShaderBackend>(
    gl: &B,
    stage: ShaderType,
    source: &str,
) -> Result<CompiledStage<B>, ShaderError> {
    let shader = gl.create_shader(stage).map_err(ShaderError::Creation)?;
    let success = gl.compile_shader(shader, source);
    let info_log = if success {
        String::new()
    } else {
        let diagnostic = gl.shader_info_log(shader);
        log::error!(
            "{}",
            ShaderError::Compile {
                stage,
                log: diagnostic.clone()
            }
        );
        diagnostic
    };
    Ok(CompiledStage {
        stage,
        shader,
        success,
        info_log,
    })
}

/// Links `stages` into a new program. The stage objects are detached and
/// deleted afterwards whatever the outcome.
pub fn link_program<B: ShaderBackend>(
    gl: &B,
    stages: Vec<CompiledStage<B>>,
) -> Result<LinkedProgram<B>, ShaderError> {
    let program = match gl.create_program() {
        Ok(program) => program,
        Err(reason) => {
            for stage in stages {
                gl.delete_shader(stage.shader);
            }
            return Err(ShaderError::Creation(reason));
        }
    };
    for stage in &stages {
        gl.attach_shader(program, stage.shader);
    }
    let linked = gl.link_program(program);
    let mut info_log = if linked {
        String::new()
    } else {
        gl.program_info_log(program)
    };
    let failed_stages: Vec<_> = stages.iter().filter(|s| !s.success).map(|s| s.stage).collect();
    for stage in stages {
        gl.detach_shader(program, stage.shader);
        gl.delete_shader(stage.shader);
    }
    if !failed_stages.is_empty() && info_log.is_empty() {
        info_log = failed_stages
            .iter()
            .map(|stage| format!("{stage} failed to compile"))
            .collect::<Vec<_>>()
            .join("; ");
    }
    let success = linked && failed_stages.is_empty();
    if !success {
        log::error!("{}", ShaderError::Link(info_log.clone()));
    }
    Ok(LinkedProgram {
        program,
        success,
        info_log,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Linked,
    /// Compilation or linking failed; the program object exists but is unusable.
    Unlinked,
    Released,
}

/// Owns a GPU program and caches its uniform locations by name.
///
/// An unknown uniform name is a no-op for the `set_*` methods; it is logged
/// once per name. Use [`Shader::try_set_uniform`] to fail instead.
pub struct Shader<B: ShaderBackend> {
    program: Option<B::Program>,
    state: ProgramState,
    info_log: String,
    uniforms: HashMap<String, Option<B::UniformLocation>>,
}

impl<B: ShaderBackend> Shader<B> {
    pub fn new(gl: &B, source: &ShaderProgramSource) -> Result<Self, ShaderError> {
        if let Err(err) = source.validate() {
            log::warn!("{err}; compiling anyway");
        }
        let mut stages = Vec::with_capacity(ShaderType::ALL.len());
        for stage in ShaderType::ALL {
            match compile_stage(gl, stage, source.stage(stage)) {
                Ok(compiled) => stages.push(compiled),
                Err(err) => {
                    for compiled in stages {
                        gl.delete_shader(compiled.shader);
                    }
                    return Err(err);
                }
            }
        }
        let linked = link_program(gl, stages)?;
        let mut shader = Shader {
            program: Some(linked.program),
            state: if linked.success {
                ProgramState::Linked
            } else {
                ProgramState::Unlinked
            },
            info_log: linked.info_log,
            uniforms: HashMap::new(),
        };
        if shader.is_linked() {
            for name in gl.active_uniform_names(linked.program) {
                let location = gl.uniform_location(linked.program, &name);
                shader.uniforms.insert(name, location);
            }
            log::debug!("linked program with {} active uniforms", shader.uniforms.len());
        }
        Ok(shader)
    }

    /// Builds from a combined `#shader vertex` / `#shader fragment` file.
    pub fn from_file<P: AsRef<Path>>(gl: &B, path: P) -> Result<Self, ShaderError> {
        Self::new(gl, &ShaderProgramSource::from_file(path))
    }

    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        gl: &B,
        vertex_path: P,
        fragment_path: Q,
    ) -> Result<Self, ShaderError> {
        Self::new(gl, &ShaderProgramSource::from_files(vertex_path, fragment_path))
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == ProgramState::Linked
    }

    pub fn program(&self) -> Option<B::Program> {
        self.program
    }

    /// Linker diagnostic; empty when linking succeeded.
    pub fn info_log(&self) -> &str {
        &self.info_log
    }

    pub fn check(&self) -> Result<(), ShaderError> {
        match self.state {
            ProgramState::Linked => Ok(()),
            ProgramState::Unlinked => Err(ShaderError::Link(self.info_log.clone())),
            ProgramState::Released => Err(ShaderError::Released),
        }
    }

    pub fn use_program(&self, gl: &B) {
        if self.is_linked() {
            gl.use_program(self.program);
        }
    }

    /// Location of `name`, or `None` when it does not resolve or the program
    /// is not linked.
    pub fn uniform_location(&mut self, gl: &B, name: &str) -> Option<&B::UniformLocation> {
        if !self.is_linked() {
            return None;
        }
        let program = self.program?;
        if !self.uniforms.contains_key(name) {
            let location = gl.uniform_location(program, name);
            self.uniforms.insert(name.to_owned(), location);
        }
        self.uniforms.get(name).and_then(Option::as_ref)
    }

    pub fn try_set_uniform(
        &mut self,
        gl: &B,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), ShaderError> {
        if self.state == ProgramState::Released {
            return Err(ShaderError::Released);
        }
        let location = self
            .uniform_location(gl, name)
            .ok_or_else(|| ShaderError::UniformNotFound(name.to_owned()))?;
        gl.set_uniform(location, &value.into());
        Ok(())
    }

    /// Writes `value` to `name` in the bound program; see [`Shader::use_program`].
    pub fn set_uniform(&mut self, gl: &B, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        let first_lookup = self.is_linked() && !self.uniforms.contains_key(name);
        match self.uniform_location(gl, name) {
            Some(location) => gl.set_uniform(location, &value),
            None if first_lookup => log::warn!(
                "uniform `{name}` ({}) is not active in this program; writes are ignored",
                value.type_name()
            ),
            None => {}
        }
    }

    pub fn set_bool(&mut self, gl: &B, name: &str, value: bool) {
        self.set_uniform(gl, name, value);
    }

    pub fn set_i32(&mut self, gl: &B, name: &str, value: i32) {
        self.set_uniform(gl, name, value);
    }

    pub fn set_f32(&mut self, gl: &B, name: &str, value: f32) {
        self.set_uniform(gl, name, value);
    }

    pub fn set_vec2(&mut self, gl: &B, name: &str, value: &[f32; 2]) {
        self.set_uniform(gl, name, *value);
    }

    pub fn set_vec3(&mut self, gl: &B, name: &str, value: &[f32; 3]) {
        self.set_uniform(gl, name, *value);
    }

    pub fn set_vec4(&mut self, gl: &B, name: &str, value: &[f32; 4]) {
        self.set_uniform(gl, name, *value);
    }

    pub fn set_mat3(&mut self, gl: &B, name: &str, value: &[f32; 9]) {
        self.set_uniform(gl, name, *value);
    }

    pub fn set_mat4(&mut self, gl: &B, name: &str, value: &[f32; 16]) {
        self.set_uniform(gl, name, *value);
    }

    /// Releases the program when `result` is an error, so a failure later in
    /// a setup sequence does not leak it.
    pub fn release_on_err<T, E>(&mut self, gl: &B, result: Result<T, E>) -> Result<T, E> {
        if result.is_err() {
            self.destroy(gl);
        }
        result
    }

    pub fn destroy(&mut self, gl: &B) {
        if let Some(program) = self.program.take() {
            gl.delete_program(program);
            log::debug!("released program");
        }
        self.uniforms.clear();
        self.state = ProgramState::Released;
    }
}

impl<B: ShaderBackend> Drop for Shader<B> {
    fn drop(&mut self) {
        if self.program.is_some() {
            log::warn!("shader program dropped without `destroy`; the GL object leaks");
        }
    }
}
