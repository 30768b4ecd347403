//! A recording [`GraphicsContext`] used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::context::{GraphicsContext, ShaderStage};

/// A GL call observed by [`FakeContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage),
    DeleteShader(u32),
    DetachShader(u32, u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    BindArrayBuffer(Option<u32>),
    BufferData { len: usize, usage: u32 },
    BufferSubData { offset: i32, len: usize },
    DeleteBuffer(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    EnableAttrib(u32),
    AttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    Uniform1f(String, f32),
    Uniform2f(String, f32, f32),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear(u32),
    DrawArrays { mode: u32, first: i32, count: i32 },
}

/// Pretends to be a GL context whose single program exposes a fixed set of
/// attributes and uniforms.
///
/// Shader sources containing `syntax error` fail to compile.
pub struct FakeContext {
    attributes: Vec<String>,
    uniforms: Vec<String>,
    link_error: Option<String>,
    next_handle: Cell<u32>,
    sources: RefCell<HashMap<u32, String>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeContext {
    pub fn new(attributes: &[&str], uniforms: &[&str]) -> Self {
        Self {
            attributes: attributes.iter().map(|s| s.to_string()).collect(),
            uniforms: uniforms.iter().map(|s| s.to_string()).collect(),
            link_error: None,
            next_handle: Cell::new(1),
            sources: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Makes every link attempt fail with the given log.
    pub fn failing_link(mut self, log: &str) -> Self {
        self.link_error = Some(log.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn handle(&self) -> u32 {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl GraphicsContext for FakeContext {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        self.record(Call::CreateShader(stage));
        Ok(self.handle())
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.sources.borrow_mut().insert(shader, source.to_string());
    }

    fn compile_shader(&self, _shader: u32) {}

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.sources
            .borrow()
            .get(&shader)
            .is_some_and(|source| !source.contains("syntax error"))
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "0:1: syntax error".to_string()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(self.handle())
    }

    fn attach_shader(&self, _program: u32, _shader: u32) {}

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, _program: u32) {}

    fn program_link_status(&self, _program: u32) -> bool {
        self.link_error.is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.link_error.clone().unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        Ok(self.handle())
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[u8], usage: u32) {
        self.record(Call::BufferData {
            len: data.len(),
            usage,
        });
    }

    fn array_buffer_sub_data(&self, offset: i32, data: &[u8]) {
        self.record(Call::BufferSubData {
            offset,
            len: data.len(),
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        Ok(self.handle())
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .position(|a| a == name)
            .map(|i| i as u32)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        self.uniforms
            .iter()
            .any(|u| u == name)
            .then(|| name.to_string())
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::AttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn uniform_1_f32(&self, location: &String, x: f32) {
        self.record(Call::Uniform1f(location.clone(), x));
    }

    fn uniform_2_f32(&self, location: &String, x: f32, y: f32) {
        self.record(Call::Uniform2f(location.clone(), x, y));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear(&self, mask: u32) {
        self.record(Call::Clear(mask));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(Call::DrawArrays { mode, first, count });
    }
}
