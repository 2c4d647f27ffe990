//! # Pigment
//!
//! Lifetime-managed OpenGL objects: textures, framebuffers, shader storage buffers,
//! vertex buffers and arrays, and render or compute programs. Each wrapper owns exactly
//! one native object and releases it when dropped, and is made current through a scoped
//! binding discipline over the single "currently bound" slots of the context.
//!
//! All native calls go through the `device::Device` trait. `Context::gl` drives a real
//! OpenGL context, while `Context::headless` runs everything against a software fake,
//! which is what the tests use.
//!
//! ```rust,ignore
//! use pigment::prelude::*;
//!
//! let ctx = Context::headless();
//! let target = Rc::new(Texture::new(&ctx, 4, 4)?);
//! target.allocate()?;
//!
//! let mut fbo = Framebuffer::new(&ctx)?;
//! fbo.attach_texture(target.clone())?;
//!
//! let kernel = ComputeProgram::new(&ctx, KERNEL)?;
//! let _kernel = Binder::new(&kernel)?;
//! kernel.bind_image(0, &target, TextureAccess::WriteOnly)?;
//! kernel.dispatch(0, 0, 4, 4)?;
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;

pub mod device;
pub mod errors;
pub mod graphics;
pub mod projection;
pub mod settings;
pub mod window;

pub mod prelude {
    pub use crate::errors::{Error, Result};
    pub use crate::graphics::prelude::*;
    pub use crate::projection::ortho;
    pub use crate::settings::{ContextParams, Settings, WindowParams};
    pub use crate::window::{Action, Event, Key, Modifiers, MouseButton, Window};
    pub use std::rc::Rc;
}
