use std::{error, fmt, io, path::PathBuf};

use crate::shader_source::ShaderType;

/// Errors raised while loading, building or driving a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// A shader source file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// A stage has no source text.
    MissingStage(ShaderType),
    /// The driver refused to create a shader or program object.
    Creation(String),
    /// A stage failed to compile; carries the compiler log.
    Compile { stage: ShaderType, log: String },
    /// The program failed to link; carries the linker log.
    Link(String),
    /// No active uniform with this name.
    UniformNotFound(String),
    /// The program was already released.
    Released,
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "cannot read shader file {}: {}", path.display(), source)
            }
            ShaderError::MissingStage(stage) => write!(f, "missing {} source", stage),
            ShaderError::Creation(reason) => write!(f, "cannot create GL object: {}", reason),
            ShaderError::Compile { stage, log } => {
                write!(f, "{} compilation error: {}", stage, log)
            }
            ShaderError::Link(log) => write!(f, "program link error: {}", log),
            ShaderError::UniformNotFound(name) => write!(f, "uniform `{}` not found", name),
            ShaderError::Released => write!(f, "program already released"),
        }
    }
}

impl error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
