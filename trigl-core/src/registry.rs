//! The GPU resource registry.
//!
//! [`GlProgram`] owns one linked shader program together with every buffer,
//! vertex array and uniform location used to draw with it. Resources are
//! looked up by caller-chosen names.

use std::sync::Arc;

use bytemuck::Pod;
use fxhash::FxHashMap;

use crate::{
    buffer::{AttributeLayout, NamedBuffer},
    context::GraphicsContext,
    error::RegistryError,
    program::ShaderProgram,
};

/// A linked shader program and the named GPU resources that feed it.
pub struct GlProgram<G: GraphicsContext = glow::Context> {
    gl: Arc<G>,
    program: ShaderProgram<G>,
    buffers: FxHashMap<String, NamedBuffer<G::Buffer>>,
    groups: FxHashMap<String, G::VertexArray>,
    uniforms: FxHashMap<String, G::UniformLocation>,
    attribute_locations: FxHashMap<String, u32>,
}

impl<G: GraphicsContext> GlProgram<G> {
    /// Compiles both stages and links them into a new program.
    pub fn new(gl: &Arc<G>, vertex_source: &str, fragment_source: &str) -> Result<Self, RegistryError> {
        let program = ShaderProgram::from_sources(gl, vertex_source, fragment_source)?;
        log::debug!("linked program {:?}", program.id());

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            buffers: FxHashMap::default(),
            groups: FxHashMap::default(),
            uniforms: FxHashMap::default(),
            attribute_locations: FxHashMap::default(),
        })
    }

    /// Sets the viewport to the given surface size and makes the program current.
    pub fn init_program(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
        self.program.use_program();
    }

    /// Uploads `data` into a new static buffer read by `attribute` through `layout`.
    ///
    /// An existing buffer with the same name is replaced and its GPU storage released.
    ///
    /// Only [`Pod`] data can be uploaded, so types with padding bytes are rejected:
    ///
    /// ```compile_fail
    /// # use trigl_core::{AttributeLayout, ComponentType, GlProgram, GraphicsContext};
    /// fn upload_padded<G: GraphicsContext>(program: &mut GlProgram<G>) {
    ///     let data = [(1u8, 2.0f32), (3u8, 4.0f32)];
    ///     let layout = AttributeLayout::new(2, ComponentType::Float);
    ///     program.create_buffer("padded", &data, "vertexPosition", layout).unwrap();
    /// }
    /// ```
    pub fn create_buffer<T: Pod>(
        &mut self,
        name: &str,
        data: &[T],
        attribute: &str,
        layout: AttributeLayout,
    ) -> Result<(), RegistryError> {
        let attribute_location = self.attribute_location(attribute)?;

        let buffer = self
            .gl
            .create_buffer()
            .map_err(|reason| RegistryError::Allocation {
                what: format!("buffer `{name}`"),
                reason,
            })?;

        self.gl.bind_array_buffer(Some(buffer));
        self.gl.array_buffer_data(bytemuck::cast_slice(data), glow::STATIC_DRAW);
        self.gl.bind_array_buffer(None);

        let named = NamedBuffer {
            buffer,
            attribute_location,
            layout,
        };
        if let Some(old) = self.buffers.insert(name.to_string(), named) {
            log::debug!("buffer `{name}` replaced, releasing {:?}", old.buffer);
            self.gl.delete_buffer(old.buffer);
        }
        log::trace!("created buffer `{name}` for attribute `{attribute}` at {attribute_location}");

        Ok(())
    }

    /// Returns the bookkeeping for the buffer called `name`.
    pub fn buffer(&self, name: &str) -> Option<&NamedBuffer<G::Buffer>> {
        self.buffers.get(name)
    }

    /// Re-uploads `data` into the existing storage of buffer `name`, starting at offset 0.
    ///
    /// The size of `data` is not checked against the original allocation.
    pub fn update_buffer<T: Pod>(&self, name: &str, data: &[T]) -> Result<(), RegistryError> {
        let named = self
            .buffers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownBuffer(name.to_string()))?;

        self.gl.bind_array_buffer(Some(named.buffer));
        self.gl.array_buffer_sub_data(0, bytemuck::cast_slice(data));
        self.gl.bind_array_buffer(None);
        Ok(())
    }

    /// Points the attribute of buffer `name` at that buffer.
    ///
    /// Usually called between [`start_attribute_group`](Self::start_attribute_group)
    /// and [`AttributeGroupBuilder::end`] so the binding is recorded.
    pub fn set_attribute_pointer(&self, name: &str) -> Result<(), RegistryError> {
        let NamedBuffer {
            buffer,
            attribute_location,
            layout,
        } = *self
            .buffers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownBuffer(name.to_string()))?;

        self.gl.enable_vertex_attrib_array(attribute_location);
        self.gl.bind_array_buffer(Some(buffer));
        self.gl.vertex_attrib_pointer(
            attribute_location,
            layout.components,
            layout.component_type.gl_enum(),
            layout.normalized,
            layout.stride,
            layout.offset,
        );
        self.gl.bind_array_buffer(None);
        Ok(())
    }

    /// Starts recording attribute bindings into a new group called `name`.
    ///
    /// The returned builder borrows the registry, so only one group can be
    /// open at a time:
    ///
    /// ```compile_fail
    /// # use trigl_core::{GlProgram, GraphicsContext};
    /// fn two_groups<G: GraphicsContext>(program: &mut GlProgram<G>) {
    ///     let first = program.start_attribute_group("g").unwrap();
    ///     let second = program.start_attribute_group("h").unwrap();
    ///     first.end();
    ///     second.end();
    /// }
    /// ```
    pub fn start_attribute_group(&mut self, name: &str) -> Result<AttributeGroupBuilder<'_, G>, RegistryError> {
        let vertex_array = self
            .gl
            .create_vertex_array()
            .map_err(|reason| RegistryError::Allocation {
                what: format!("vertex array `{name}`"),
                reason,
            })?;
        self.gl.bind_vertex_array(Some(vertex_array));

        Ok(AttributeGroupBuilder {
            program: self,
            name: name.to_string(),
            vertex_array: Some(vertex_array),
        })
    }

    /// Activates a completed group for the following draw calls.
    pub fn bind_attribute_group(&self, name: &str) -> Result<(), RegistryError> {
        let vertex_array = self
            .groups
            .get(name)
            .ok_or_else(|| RegistryError::UnknownGroup(name.to_string()))?;
        self.gl.bind_vertex_array(Some(*vertex_array));
        Ok(())
    }

    /// Unbinds whatever group is active.
    pub fn clear_attribute_group(&self) {
        self.gl.bind_vertex_array(None);
    }

    /// Resolves the locations of all `names` in one pass.
    ///
    /// On failure every unresolved name is reported and the previously
    /// registered uniforms are kept. On success they are replaced.
    pub fn register_uniforms(&mut self, names: &[&str]) -> Result<(), RegistryError> {
        let mut resolved = FxHashMap::default();
        let mut missing = Vec::new();

        for name in names {
            match self.gl.uniform_location(self.program.id(), name) {
                Some(location) => {
                    resolved.insert(name.to_string(), location);
                }
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(RegistryError::UniformNotFound(missing));
        }

        self.uniforms = resolved;
        Ok(())
    }

    /// Sets a registered `float` or `vec2` uniform, depending on how many values are given.
    pub fn set_uniform(&self, name: &str, values: &[f32]) -> Result<(), RegistryError> {
        let location = self
            .uniforms
            .get(name)
            .ok_or_else(|| RegistryError::UnregisteredUniform(name.to_string()))?;

        match *values {
            [] => Err(RegistryError::EmptyValues(name.to_string())),
            [x] => {
                self.gl.uniform_1_f32(location, x);
                Ok(())
            }
            [x, y] => {
                self.gl.uniform_2_f32(location, x, y);
                Ok(())
            }
            _ => Err(RegistryError::UnsupportedArity {
                name: name.to_string(),
                count: values.len(),
            }),
        }
    }

    /// Clears color and depth of the render target to the given color.
    pub fn clear(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.gl.clear_color(red, green, blue, alpha);
        self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
    }

    /// Draws `vertex_count` vertices as a triangle list with the current bindings.
    ///
    /// Fails if the count does not fit the GL vertex count type.
    pub fn draw(&self, vertex_count: usize) -> Result<(), RegistryError> {
        let count =
            i32::try_from(vertex_count).map_err(|_| RegistryError::VertexCountOverflow(vertex_count))?;
        self.gl.draw_arrays(glow::TRIANGLES, 0, count);
        Ok(())
    }

    /// Draws a single triangle.
    pub fn draw_triangles(&self) {
        self.gl.draw_arrays(glow::TRIANGLES, 0, 3);
    }

    fn attribute_location(&mut self, attribute: &str) -> Result<u32, RegistryError> {
        if let Some(location) = self.attribute_locations.get(attribute) {
            return Ok(*location);
        }

        let location = self
            .gl
            .attrib_location(self.program.id(), attribute)
            .ok_or_else(|| RegistryError::AttributeNotFound(attribute.to_string()))?;
        self.attribute_locations.insert(attribute.to_string(), location);
        Ok(location)
    }
}

impl<G: GraphicsContext> Drop for GlProgram<G> {
    fn drop(&mut self) {
        for (_, named) in self.buffers.drain() {
            self.gl.delete_buffer(named.buffer);
        }
        for (_, vertex_array) in self.groups.drain() {
            self.gl.delete_vertex_array(vertex_array);
        }
    }
}

/// An attribute group being recorded.
///
/// Obtained from [`GlProgram::start_attribute_group`]. Dropping it without
/// calling [`end`](Self::end) discards the group.
pub struct AttributeGroupBuilder<'a, G: GraphicsContext> {
    program: &'a mut GlProgram<G>,
    name: String,
    vertex_array: Option<G::VertexArray>,
}

impl<G: GraphicsContext> AttributeGroupBuilder<'_, G> {
    /// Records the attribute binding of buffer `name` into this group.
    pub fn set_attribute_pointer(&mut self, name: &str) -> Result<(), RegistryError> {
        self.program.set_attribute_pointer(name)
    }

    /// Finishes the group and stores it, replacing any group with the same name.
    pub fn end(mut self) {
        let Some(vertex_array) = self.vertex_array.take() else {
            return;
        };
        self.program.gl.bind_vertex_array(None);

        let name = std::mem::take(&mut self.name);
        if let Some(old) = self.program.groups.insert(name.clone(), vertex_array) {
            log::debug!("attribute group `{name}` replaced, releasing {old:?}");
            self.program.gl.delete_vertex_array(old);
        }
        log::trace!("recorded attribute group `{name}`");
    }
}

impl<G: GraphicsContext> Drop for AttributeGroupBuilder<'_, G> {
    fn drop(&mut self) {
        if let Some(vertex_array) = self.vertex_array.take() {
            log::debug!("attribute group `{}` abandoned", self.name);
            self.program.gl.bind_vertex_array(None);
            self.program.gl.delete_vertex_array(vertex_array);
        }
    }
}
