use std::io;

use crate::device::{ObjectKind, ShaderStage};
use crate::graphics::framebuffer::FramebufferStatus;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Failed to allocate a {:?} handle.", _0)]
    Allocation(ObjectKind),
    #[fail(
        display = "Failed to compile {:?} shader, errors: \n{}\nsource: \n{}",
        stage, log, source
    )]
    Compile {
        stage: ShaderStage,
        source: String,
        log: String,
    },
    #[fail(display = "Failed to link program, errors: \n{}\nsource: \n{}", log, source)]
    Link { source: String, log: String },
    #[fail(display = "The source of {:?} shader is empty.", _0)]
    EmptySource(ShaderStage),
    #[fail(display = "Framebuffer is incomplete: {}.", _0)]
    Incomplete(FramebufferStatus),
    #[fail(display = "Framebuffer has no target texture attached.")]
    NoTarget,
    #[fail(display = "Trying to {} while it is not bound.", _0)]
    NotBound(&'static str),
    #[fail(display = "Program has not been linked successfully.")]
    NotLinked,
    #[fail(display = "Expects {} bytes, but got {}.", expected, actual)]
    SizeMismatch { expected: usize, actual: usize },
    #[fail(display = "Incompatible dimensions {:?} and {:?}.", _0, _1)]
    DimensionMismatch((u32, u32), (u32, u32)),
    #[fail(display = "Invalid argument: {}", _0)]
    InvalidArgument(String),
    #[fail(display = "OpenGL implementation doesn\'t support {}.", _0)]
    Requirement(String),
    #[fail(display = "{}", _0)]
    Device(String),
    #[fail(display = "Could not read file {}: {}", path, err)]
    Io {
        path: String,
        #[cause]
        err: io::Error,
    },
    #[fail(display = "Invalid settings: {}", _0)]
    Settings(#[cause] serde_json::Error),
    #[fail(display = "Window: {}", _0)]
    Window(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Returns true if this error is caused by a misuse of the API rather than by the
    /// environment (driver, shader sources, files).
    pub fn is_usage(&self) -> bool {
        match *self {
            Error::EmptySource(_)
            | Error::NoTarget
            | Error::NotBound(_)
            | Error::NotLinked
            | Error::SizeMismatch { .. }
            | Error::DimensionMismatch(_, _)
            | Error::InvalidArgument(_) => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Settings(err)
    }
}

impl From<failure::Error> for Error {
    fn from(err: failure::Error) -> Error {
        Error::Device(err.to_string())
    }
}
