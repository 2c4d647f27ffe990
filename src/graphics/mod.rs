//! Lifetime-managed wrappers of native graphics objects.
//!
//! Every resource owns exactly one native object, allocated on construction and released
//! when the resource is dropped. Resources are made current through the `Bind` trait,
//! either explicitly or scoped with a `Binder`:
//!
//! ```rust,ignore
//! let _fbo = Binder::new(&framebuffer)?;
//! let _program = Binder::new(&program)?;
//! let _vao = Binder::new(&vao)?;
//! vao.render(DrawMode::Triangles, 0, 3)?;
//! ```

pub mod binder;
pub mod buffer;
pub mod context;
pub mod framebuffer;
pub mod handle;
pub mod program;
pub mod texture;
pub mod types;
pub mod vertex;

pub use self::binder::{Bind, Binder};
pub use self::buffer::GpuBuffer;
pub use self::context::Context;
pub use self::framebuffer::{Framebuffer, FramebufferStatus};
pub use self::handle::{Handle, Resource};
pub use self::program::{ComputeProgram, Program, ProgramState, RenderProgram, Uniforms};
pub use self::texture::{Texture, TextureParams};
pub use self::vertex::{VertexArray, VertexBuffer, VertexComponent, VertexData, VertexLayout};

pub mod prelude {
    pub use super::program::read_shader_file;
    pub use super::types::*;
    pub use super::{Bind, Binder, Context, Handle};
    pub use super::{ComputeProgram, Program, ProgramState, RenderProgram, Uniforms};
    pub use super::{Framebuffer, FramebufferStatus, GpuBuffer, Texture, TextureParams};
    pub use super::{VertexArray, VertexBuffer, VertexLayout};
    pub use crate::device::{ShaderStage, UniformValue};
}
