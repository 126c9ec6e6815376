//! Small OpenGL exercises built on `glow`: a shader loader for combined or
//! separate GLSL files, a program wrapper with cached uniform setters, and the
//! vertex data the demos draw.

pub mod backend;
pub mod config;
pub mod error;
pub mod mesh;
pub mod shader;
pub mod shader_source;
pub mod shapes;
pub mod uniform;

pub use backend::ShaderBackend;
pub use error::ShaderError;
pub use shader::{compile_stage, link_program, CompiledStage, LinkedProgram, ProgramState, Shader};
pub use shader_source::{ShaderProgramSource, ShaderType};
pub use uniform::UniformValue;
