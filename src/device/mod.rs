//! The native command seam. A `Device` should be responsible for only one thing:
//! forwarding commands to the graphics API of the context that is current on the
//! calling thread. Every resource in `graphics` issues its commands through this
//! trait, which makes it possible to swap the OpenGL driver for a software fake.

pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::graphics::framebuffer::FramebufferStatus;
use crate::graphics::types::*;

/// The raw name of a native object. `0` is reserved as invalid/unallocated.
pub type RawHandle = u32;

/// The kinds of shader stages a program can be linked from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
}

/// The kinds of native objects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Texture,
    Buffer,
    Framebuffer,
    VertexArray,
    Program,
    Shader(ShaderStage),
}

/// The targets a buffer object could be bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ShaderStorage,
    CopyRead,
    CopyWrite,
}

/// The "currently bound" slots of the native context. Each slot holds at most one
/// object at a time, and `0` means the default object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BindPoint {
    /// The 2D texture bound on the specified texture unit.
    Texture(u32),
    Buffer(BufferTarget),
    Program,
    Framebuffer,
    VertexArray,
}

/// The attachment points of a framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color(u32),
    Depth,
}

/// Describes the storage of the texture bound on unit 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureStorage {
    pub width: u32,
    pub height: u32,
    pub level: i32,
    pub internal: InternalFormat,
    pub format: PixelFormat,
    pub data_type: DataType,
}

impl TextureStorage {
    /// The number of bytes of client memory that matches this storage.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.pixel_size(self.data_type)
    }
}

/// Sampling parameters of the texture bound on unit 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerState {
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    pub wrap: WrapMode,
    pub env_mode: EnvMode,
    pub max_anisotropy: f32,
}

/// Describes how a texture level is exposed on an image unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageBinding {
    pub unit: u32,
    pub level: i32,
    pub layered: bool,
    pub layer: i32,
    pub access: TextureAccess,
    pub format: InternalFormat,
}

/// A value that could be assigned to an uniform location. Matrices are stored in
/// column-major order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    I32(i32),
    U32(u32),
    F32(f32),
    Vector2i([i32; 2]),
    Vector3i([i32; 3]),
    Vector4i([i32; 4]),
    Vector2f([f32; 2]),
    Vector3f([f32; 3]),
    Vector4f([f32; 4]),
    Matrix3f([[f32; 3]; 3], bool),
    Matrix4f([[f32; 4]; 4], bool),
}

/// The output of a compile or link command: `None` on success, or the diagnostic log
/// of the native compiler/linker.
pub type Diagnostics = Option<String>;

pub trait Device {
    /// Allocates a native object. Returns `0` if the native allocator failed.
    fn create(&mut self, kind: ObjectKind) -> Result<RawHandle>;

    fn delete(&mut self, kind: ObjectKind, id: RawHandle) -> Result<()>;

    /// Queries the object currently bound at `point`.
    fn current(&mut self, point: BindPoint) -> Result<RawHandle>;

    fn bind(&mut self, point: BindPoint, id: RawHandle) -> Result<()>;

    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, id: RawHandle)
        -> Result<()>;

    /// (Re)allocates the data store of the buffer bound at `target`.
    fn buffer_data(
        &mut self,
        target: BufferTarget,
        data: Option<&[u8]>,
        size: usize,
        usage: Usage,
    ) -> Result<()>;

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8])
        -> Result<()>;

    fn buffer_size(&mut self, target: BufferTarget) -> Result<usize>;

    /// Maps the buffer bound at `target` and copies `src` into it.
    fn write_mapped(&mut self, target: BufferTarget, src: &[u8]) -> Result<()>;

    /// Maps the buffer bound at `target` and copies its first `dst.len()` bytes out.
    fn read_mapped(&mut self, target: BufferTarget, dst: &mut [u8]) -> Result<()>;

    /// Copies `size` bytes from the `CopyRead` buffer into the `CopyWrite` buffer.
    fn copy_buffer(&mut self, size: usize) -> Result<()>;

    /// Specifies the storage of the texture bound on unit 0.
    fn tex_image(&mut self, storage: &TextureStorage, data: Option<&[u8]>) -> Result<()>;

    fn tex_sampler(&mut self, sampler: &SamplerState) -> Result<()>;

    fn generate_mipmap(&mut self) -> Result<()>;

    /// Reads the level 0 image of the texture bound on unit 0 back into `dst`.
    fn get_tex_image(&mut self, format: PixelFormat, tp: DataType, dst: &mut [u8])
        -> Result<()>;

    fn bind_image_texture(&mut self, id: RawHandle, binding: &ImageBinding) -> Result<()>;

    /// Copies a `width` x `height` region between two textures without a round-trip
    /// through client memory.
    fn copy_image(&mut self, src: RawHandle, dst: RawHandle, width: u32, height: u32)
        -> Result<()>;

    /// Attaches a texture to the framebuffer currently bound.
    fn framebuffer_texture(&mut self, attachment: Attachment, id: RawHandle) -> Result<()>;

    fn framebuffer_status(&mut self) -> Result<FramebufferStatus>;

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()>;

    /// Blits the color attachment 0 of the bound framebuffer, sized `src`, into the
    /// rectangle `dst` of the default framebuffer.
    fn blit_to_default(&mut self, src: (u32, u32), dst: [i32; 4]) -> Result<()>;

    /// Describes the vertex attribute `location` with the buffer currently bound at
    /// `BufferTarget::Array`.
    fn vertex_attrib_pointer(&mut self, location: u32, components: u32, tp: DataType)
        -> Result<()>;

    fn enable_vertex_attrib(&mut self, location: u32) -> Result<()>;

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) -> Result<()>;

    fn compile_shader(&mut self, shader: RawHandle, source: &str) -> Result<Diagnostics>;

    fn attach_shader(&mut self, program: RawHandle, shader: RawHandle) -> Result<()>;

    fn detach_shader(&mut self, program: RawHandle, shader: RawHandle) -> Result<()>;

    fn link_program(&mut self, program: RawHandle) -> Result<Diagnostics>;

    fn uniform_location(&mut self, program: RawHandle, name: &str) -> Result<Option<i32>>;

    /// Assigns `value` to `location` of the program currently bound.
    fn uniform(&mut self, location: i32, value: &UniformValue) -> Result<()>;

    /// The local work group size declared by a linked compute program.
    fn work_group_size(&mut self, program: RawHandle) -> Result<[u32; 3]>;

    fn max_work_group_size(&mut self) -> Result<[u32; 3]>;

    fn dispatch_compute(&mut self, groups: [u32; 3]) -> Result<()>;

    fn memory_barrier(&mut self, barrier: Barrier) -> Result<()>;
}
