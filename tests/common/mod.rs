//! A `ShaderBackend` that "compiles" GLSL with a few textual checks and records
//! every call, so program lifecycles can be tested without a GPU.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use hello_glow::{ShaderBackend, ShaderType, UniformValue};

struct StageObject {
    stage: ShaderType,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    uniforms: Vec<String>,
}

#[derive(Default)]
pub struct ScriptedBackend {
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<u32, StageObject>>,
    programs: RefCell<HashMap<u32, ProgramObject>>,
    pub fail_create_program: Cell<bool>,
    pub deleted_shaders: RefCell<Vec<u32>>,
    pub deleted_programs: RefCell<Vec<u32>>,
    pub bound: Cell<Option<u32>>,
    pub location_queries: Cell<usize>,
    pub values: RefCell<HashMap<(u32, usize), UniformValue>>,
}

impl ScriptedBackend {
    fn next(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    /// Value last written to `name` of `program`.
    pub fn value(&self, program: u32, name: &str) -> Option<UniformValue> {
        let programs = self.programs.borrow();
        let index = programs.get(&program)?.uniforms.iter().position(|n| n == name)?;
        self.values.borrow().get(&(program, index)).copied()
    }
}

fn looks_valid(source: &str) -> bool {
    source.contains("void main") && source.matches('{').count() == source.matches('}').count()
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform ") && line.ends_with(';'))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_owned)
        .collect()
}

impl ShaderBackend for ScriptedBackend {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = (u32, usize);

    fn create_shader(&self, stage: ShaderType) -> Result<u32, String> {
        let id = self.next();
        self.shaders.borrow_mut().insert(
            id,
            StageObject {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        Ok(id)
    }

    fn compile_shader(&self, shader: u32, source: &str) -> bool {
        let mut shaders = self.shaders.borrow_mut();
        let object = shaders.get_mut(&shader).expect("unknown shader");
        object.source = source.to_owned();
        object.compiled = looks_valid(source);
        object.compiled
    }

    fn shader_info_log(&self, shader: u32) -> String {
        match self.shaders.borrow().get(&shader) {
            Some(object) if !object.compiled => {
                format!("0:1(1): error: syntax error in {}", object.stage)
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.shaders.borrow_mut().remove(&shader);
        self.deleted_shaders.borrow_mut().push(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        if self.fail_create_program.get() {
            return Err("out of program names".to_string());
        }
        let id = self.next();
        self.programs.borrow_mut().insert(id, ProgramObject::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut programs = self.programs.borrow_mut();
        programs.get_mut(&program).expect("unknown program").attached.push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut programs = self.programs.borrow_mut();
        let object = programs.get_mut(&program).expect("unknown program");
        object.attached.retain(|&s| s != shader);
    }

    fn link_program(&self, program: u32) -> bool {
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let object = programs.get_mut(&program).expect("unknown program");
        let stages: Vec<&StageObject> = object
            .attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .collect();
        let has = |stage: ShaderType| stages.iter().any(|s| s.stage == stage);
        object.linked = stages.iter().all(|s| s.compiled)
            && has(ShaderType::Vertex)
            && has(ShaderType::Fragment);
        object.uniforms.clear();
        if object.linked {
            for s in &stages {
                for name in declared_uniforms(&s.source) {
                    if !object.uniforms.contains(&name) {
                        object.uniforms.push(name);
                    }
                }
            }
        }
        object.linked
    }

    fn program_info_log(&self, program: u32) -> String {
        match self.programs.borrow().get(&program) {
            Some(object) if !object.linked => {
                "error: linking with uncompiled/unspecialized shader".to_string()
            }
            _ => String::new(),
        }
    }

    fn delete_program(&self, program: u32) {
        self.programs.borrow_mut().remove(&program);
        self.deleted_programs.borrow_mut().push(program);
    }

    fn use_program(&self, program: Option<u32>) {
        self.bound.set(program);
    }

    fn active_uniform_names(&self, program: u32) -> Vec<String> {
        self.programs
            .borrow()
            .get(&program)
            .map(|object| object.uniforms.clone())
            .unwrap_or_default()
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<(u32, usize)> {
        self.location_queries.set(self.location_queries.get() + 1);
        let programs = self.programs.borrow();
        let object = programs.get(&program)?;
        if !object.linked {
            return None;
        }
        let index = object.uniforms.iter().position(|n| n == name)?;
        Some((program, index))
    }

    fn set_uniform(&self, location: &(u32, usize), value: &UniformValue) {
        self.values.borrow_mut().insert(*location, *value);
    }
}
