//! The OpenGL driver. Every command is forwarded to the context current on the calling
//! thread, followed by a `glGetError` check.

pub mod capabilities;
pub mod device;
pub mod types;

pub use self::capabilities::{Capabilities, Version};
pub use self::device::GLDevice;
