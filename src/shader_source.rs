//! Loading GLSL sources from text files.
//!
//! A combined file holds both stages, each introduced by a marker line:
//!
//! ```text
//! #shader vertex
//! ...
//! #shader fragment
//! ...
//! ```
//!
//! Lines before the first marker are dropped. The two-file variant stores each
//! stage whole, without markers.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::ShaderError;

const MARKER: &str = "#shader";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderType {
    Vertex,
    Fragment,
}

impl ShaderType {
    pub const ALL: [ShaderType; 2] = [ShaderType::Vertex, ShaderType::Fragment];

    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderType::Vertex => glow::VERTEX_SHADER,
            ShaderType::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    /// Stage selected by a marker line, if the line names one.
    fn from_marker(line: &str) -> Option<Self> {
        if line.contains("vertex") {
            Some(ShaderType::Vertex)
        } else if line.contains("fragment") {
            Some(ShaderType::Fragment)
        } else {
            None
        }
    }
}

impl fmt::Display for ShaderType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderType::Vertex => f.write_str("vertex shader"),
            ShaderType::Fragment => f.write_str("fragment shader"),
        }
    }
}

/// Vertex and fragment source text of one program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderProgramSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn parse_str(text: &str) -> Self {
        let mut source = Self::default();
        let mut current = None;
        for line in text.lines() {
            source.push_line(&mut current, line);
        }
        source
    }

    /// Splits a combined source read line by line. A read error ends the split
    /// early with whatever was accumulated so far.
    pub fn from_reader<R: BufRead>(reader: R) -> Self {
        let mut source = Self::default();
        if let Err(err) = source.read_lines(reader) {
            log::error!("failed while reading shader source: {err}");
        }
        source
    }

    pub fn try_from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut source = Self::default();
        source.read_lines(reader)?;
        Ok(source)
    }

    pub fn try_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let io_error = |source: io::Error| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let source = Self::try_from_reader(BufReader::new(file)).map_err(io_error)?;
        log::debug!(
            "split {}: {} vertex bytes, {} fragment bytes",
            path.display(),
            source.vertex.len(),
            source.fragment.len()
        );
        Ok(source)
    }

    /// Like [`Self::try_from_file`], but errors are only logged: an unopenable
    /// file yields empty sources and a read error keeps the lines split so far.
    /// Check [`Self::validate`] before compiling.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file)),
            Err(source) => {
                let err = ShaderError::Io {
                    path: path.to_path_buf(),
                    source,
                };
                log::error!("{err}");
                Self::default()
            }
        }
    }

    pub fn try_from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        vertex_path: P,
        fragment_path: Q,
    ) -> Result<Self, ShaderError> {
        Ok(Self {
            vertex: read_whole(vertex_path.as_ref())?,
            fragment: read_whole(fragment_path.as_ref())?,
        })
    }

    /// Two-file variant; each unreadable file is logged and leaves its stage empty.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(vertex_path: P, fragment_path: Q) -> Self {
        let read_or_empty = |path: &Path| {
            read_whole(path).unwrap_or_else(|err| {
                log::error!("{err}");
                String::new()
            })
        };
        Self {
            vertex: read_or_empty(vertex_path.as_ref()),
            fragment: read_or_empty(fragment_path.as_ref()),
        }
    }

    /// Prepends `header` (e.g. `#version 330 core`) to every stage that does not
    /// already start with a `#version` directive.
    pub fn with_version(mut self, header: &str) -> Self {
        for text in [&mut self.vertex, &mut self.fragment] {
            if !text.trim_start().starts_with("#version") {
                *text = format!("{header}\n{text}");
            }
        }
        self
    }

    pub fn stage(&self, stage: ShaderType) -> &str {
        match stage {
            ShaderType::Vertex => &self.vertex,
            ShaderType::Fragment => &self.fragment,
        }
    }

    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), ShaderError> {
        match ShaderType::ALL
            .into_iter()
            .find(|&stage| self.stage(stage).trim().is_empty())
        {
            Some(stage) => Err(ShaderError::MissingStage(stage)),
            None => Ok(()),
        }
    }

    fn read_lines<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        let mut current = None;
        for line in reader.lines() {
            self.push_line(&mut current, &line?);
        }
        Ok(())
    }

    fn push_line(&mut self, current: &mut Option<ShaderType>, line: &str) {
        if line.contains(MARKER) {
            if let Some(stage) = ShaderType::from_marker(line) {
                *current = Some(stage);
            }
            return;
        }
        let buf = match current {
            Some(ShaderType::Vertex) => &mut self.vertex,
            Some(ShaderType::Fragment) => &mut self.fragment,
            None => return,
        };
        buf.push_str(line);
        buf.push('\n');
    }
}

fn read_whole(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const BASIC: &str = "#shader vertex
#version 330 core
layout (location = 0) in vec3 aPos;
void main() { gl_Position = vec4(aPos, 1.0); }
#shader fragment
#version 330 core
out vec4 FragColor;
uniform vec4 uColor;
void main() { FragColor = uColor; }
";

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("hello_glow_{}_{name}", std::process::id()))
    }

    #[test]
    fn splits_on_markers_in_order() {
        let source = ShaderProgramSource::parse_str(BASIC);
        assert_eq!(
            source.vertex,
            "#version 330 core\nlayout (location = 0) in vec3 aPos;\nvoid main() { gl_Position = vec4(aPos, 1.0); }\n"
        );
        assert_eq!(
            source.fragment,
            "#version 330 core\nout vec4 FragColor;\nuniform vec4 uColor;\nvoid main() { FragColor = uColor; }\n"
        );
        assert!(source.is_complete());
    }

    #[test]
    fn no_markers_gives_empty_buffers() {
        let source = ShaderProgramSource::parse_str("void main() {}\nvoid main() {}\n");
        assert_eq!(source, ShaderProgramSource::default());
        assert!(matches!(
            source.validate(),
            Err(ShaderError::MissingStage(ShaderType::Vertex))
        ));
    }

    #[test]
    fn single_marker_leaves_other_stage_empty() {
        let only_vertex = ShaderProgramSource::parse_str("#shader vertex\na\nb\n");
        assert_eq!(only_vertex.vertex, "a\nb\n");
        assert!(only_vertex.fragment.is_empty());
        assert!(matches!(
            only_vertex.validate(),
            Err(ShaderError::MissingStage(ShaderType::Fragment))
        ));

        let only_fragment = ShaderProgramSource::parse_str("#shader fragment\nc\n");
        assert!(only_fragment.vertex.is_empty());
        assert_eq!(only_fragment.fragment, "c\n");
    }

    #[test]
    fn lines_before_first_marker_are_dropped() {
        let source = ShaderProgramSource::parse_str("// header\n#shader fragment\nx\n");
        assert_eq!(source.fragment, "x\n");
        assert!(source.vertex.is_empty());
    }

    #[test]
    fn unknown_marker_keeps_current_stage() {
        let source =
            ShaderProgramSource::parse_str("#shader vertex\na\n#shader geometry\nb\n");
        assert_eq!(source.vertex, "a\nb\n");
        assert!(source.fragment.is_empty());
    }

    #[test]
    fn repeated_marker_appends() {
        let source = ShaderProgramSource::parse_str(
            "#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n",
        );
        assert_eq!(source.vertex, "a\nc\n");
        assert_eq!(source.fragment, "b\n");
    }

    #[test]
    fn crlf_lines_are_normalised() {
        let reader = Cursor::new("#shader vertex\r\na\r\n#shader fragment\r\nb\r\n");
        let source = ShaderProgramSource::from_reader(reader);
        assert_eq!(source.vertex, "a\n");
        assert_eq!(source.fragment, "b\n");
    }

    #[test]
    fn missing_file_yields_empty_source() {
        let path = temp_path("does_not_exist.shader");
        assert_eq!(
            ShaderProgramSource::from_file(&path),
            ShaderProgramSource::default()
        );
        assert!(matches!(
            ShaderProgramSource::try_from_file(&path),
            Err(ShaderError::Io { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let path = temp_path("invalid_utf8.shader");
        std::fs::write(
            &path,
            b"#shader vertex\nvoid main() {}\n#shader fragment\n\xff\xfe\nvoid main() {}\n",
        )
        .unwrap();
        let strict = ShaderProgramSource::try_from_file(&path);
        let lenient = ShaderProgramSource::from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(strict, Err(ShaderError::Io { .. })));
        assert_eq!(lenient.vertex, "void main() {}\n");
        assert!(lenient.fragment.is_empty());

        let reader = Cursor::new(&b"#shader vertex\n\xff\n"[..]);
        assert!(ShaderProgramSource::try_from_reader(reader).is_err());
    }

    #[test]
    fn reads_combined_file() {
        let path = temp_path("basic.shader");
        std::fs::write(&path, BASIC).unwrap();
        let source = ShaderProgramSource::try_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(source, ShaderProgramSource::parse_str(BASIC));
    }

    #[test]
    fn reads_separate_files_without_markers() {
        let vs = temp_path("vertex.shader");
        let fs = temp_path("fragment.shader");
        std::fs::write(&vs, "void main() {}\n").unwrap();
        std::fs::write(&fs, "out vec4 c;\nvoid main() { c = vec4(1.0); }\n").unwrap();
        let source = ShaderProgramSource::try_from_files(&vs, &fs).unwrap();
        let partial = ShaderProgramSource::from_files(&vs, temp_path("missing.shader"));
        let _ = std::fs::remove_file(&vs);
        let _ = std::fs::remove_file(&fs);
        assert_eq!(source.vertex, "void main() {}\n");
        assert_eq!(source.fragment, "out vec4 c;\nvoid main() { c = vec4(1.0); }\n");
        assert_eq!(partial.vertex, "void main() {}\n");
        assert!(partial.fragment.is_empty());
    }

    #[test]
    fn version_header_only_added_when_absent() {
        let source = ShaderProgramSource::new("#version 330 core\nvoid main() {}\n", "void main() {}\n")
            .with_version("#version 300 es");
        assert!(source.vertex.starts_with("#version 330 core\n"));
        assert_eq!(source.fragment, "#version 300 es\nvoid main() {}\n");
    }

    #[test]
    fn stage_kind_maps_to_gl_enum() {
        assert_eq!(ShaderType::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderType::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
        assert_eq!(ShaderType::Vertex.to_string(), "vertex shader");
    }
}
