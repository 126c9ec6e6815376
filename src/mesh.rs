//! Vertex positions in a VAO at attribute location 0, with optional indices.

use glow::HasContext;

pub struct Mesh {
    vertex_array: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ebo: Option<glow::Buffer>,
    num_vtx: usize,
    num_elem: usize,
}

impl Mesh {
    pub fn new(gl: &glow::Context, vtx2xyz: &[f32], ndim: usize) -> Result<Self, String> {
        assert!(ndim > 0 && vtx2xyz.len() % ndim == 0);
        unsafe {
            let vertex_array = gl.create_vertex_array()?;
            gl.bind_vertex_array(Some(vertex_array));
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(err) => {
                    gl.bind_vertex_array(None);
                    gl.delete_vertex_array(vertex_array);
                    return Err(err);
                }
            };
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vtx2xyz),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(
                0,
                ndim as i32,
                glow::FLOAT,
                false,
                (ndim * std::mem::size_of::<f32>()) as i32,
                0,
            );
            gl.enable_vertex_attrib_array(0);
            gl.bind_vertex_array(None);
            Ok(Mesh {
                vertex_array: Some(vertex_array),
                vbo: Some(vbo),
                ebo: None,
                num_vtx: vtx2xyz.len() / ndim,
                num_elem: 0,
            })
        }
    }

    /// Uploads indices into the element buffer, replacing any previous ones.
    pub fn set_elem2vtx<T>(&mut self, gl: &glow::Context, elem2vtx: &[T]) -> Result<(), String>
    where
        T: 'static + Copy + num_traits::AsPrimitive<u32>,
    {
        let elem2vtx: Vec<u32> = elem2vtx.iter().map(|i| (*i).as_()).collect();
        debug_assert!(elem2vtx.iter().all(|&i| (i as usize) < self.num_vtx));
        unsafe {
            let ebo = match self.ebo {
                Some(ebo) => ebo,
                None => gl.create_buffer()?,
            };
            gl.bind_vertex_array(self.vertex_array);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&elem2vtx),
                glow::STATIC_DRAW,
            );
            gl.bind_vertex_array(None);
            self.ebo = Some(ebo);
        }
        self.num_elem = elem2vtx.len();
        Ok(())
    }

    pub fn draw_arrays(&self, gl: &glow::Context, mode: u32) {
        if self.vertex_array.is_none() {
            return;
        }
        unsafe {
            gl.bind_vertex_array(self.vertex_array);
            gl.draw_arrays(mode, 0, self.num_vtx as i32);
            gl.bind_vertex_array(None);
        }
    }

    /// Draws `count` indices starting at index `first`.
    pub fn draw_elements(&self, gl: &glow::Context, mode: u32, first: usize, count: usize) {
        if self.vertex_array.is_none() || self.ebo.is_none() {
            return;
        }
        let count = count.min(self.num_elem.saturating_sub(first));
        unsafe {
            gl.bind_vertex_array(self.vertex_array);
            gl.draw_elements(
                mode,
                count as i32,
                glow::UNSIGNED_INT,
                (first * std::mem::size_of::<u32>()) as i32,
            );
            gl.bind_vertex_array(None);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(ebo) = self.ebo.take() {
                gl.delete_buffer(ebo);
            }
            if let Some(vbo) = self.vbo.take() {
                gl.delete_buffer(vbo);
            }
            if let Some(vertex_array) = self.vertex_array.take() {
                gl.delete_vertex_array(vertex_array);
            }
        }
    }
}
