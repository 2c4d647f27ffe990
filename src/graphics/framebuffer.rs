use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::device::{Attachment, BindPoint, ObjectKind};
use crate::errors::*;

use super::binder::{Bind, Binder};
use super::context::Context;
use super::handle::{Handle, Resource};
use super::texture::Texture;

/// The outcome of a framebuffer completeness check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    /// An attachment is not complete, e.g. it has no storage or the wrong kind of format.
    IncompleteAttachment,
    /// No image is attached.
    MissingAttachment,
    /// The attached images have different dimensions.
    MismatchedDimensions,
    /// The color attached images have different internal formats.
    MismatchedFormats,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    /// The combination of internal formats is not supported by the implementation.
    Unsupported,
    Unknown(u32),
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FramebufferStatus::Complete => write!(f, "complete"),
            FramebufferStatus::IncompleteAttachment => write!(f, "attachment is not complete"),
            FramebufferStatus::MissingAttachment => write!(f, "no image is attached"),
            FramebufferStatus::MismatchedDimensions => {
                write!(f, "attached images have different dimensions")
            }
            FramebufferStatus::MismatchedFormats => {
                write!(f, "color attached images have different internal formats")
            }
            FramebufferStatus::IncompleteDrawBuffer => write!(f, "incomplete draw buffer"),
            FramebufferStatus::IncompleteReadBuffer => write!(f, "incomplete read buffer"),
            FramebufferStatus::Unsupported => write!(f, "unsupported by the implementation"),
            FramebufferStatus::Unknown(v) => write!(f, "unknown status {:#x}", v),
        }
    }
}

/// A render target made of a color texture (attachment 0) and an optional depth
/// texture. Attachments are shared with the caller.
///
/// Only a complete framebuffer could be bound. Binding it also sets the viewport to the
/// dimensions of its target.
#[derive(Debug)]
pub struct Framebuffer {
    res: Resource,
    target: Option<Rc<Texture>>,
    depth: Option<Rc<Texture>>,
    status: Cell<FramebufferStatus>,
}

impl Framebuffer {
    pub fn new(ctx: &Context) -> Result<Self> {
        Ok(Framebuffer {
            res: Resource::new(ctx, ObjectKind::Framebuffer)?,
            target: None,
            depth: None,
            status: Cell::new(FramebufferStatus::MissingAttachment),
        })
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.res.handle()
    }

    #[inline]
    pub fn target(&self) -> Option<&Rc<Texture>> {
        self.target.as_ref()
    }

    #[inline]
    pub fn depth(&self) -> Option<&Rc<Texture>> {
        self.depth.as_ref()
    }

    /// The status of the last completeness check. Binding an incomplete framebuffer
    /// checks it again first.
    #[inline]
    pub fn status(&self) -> FramebufferStatus {
        self.status.get()
    }

    /// Attaches `texture` as color attachment 0, and checks completeness.
    pub fn attach_texture(&mut self, texture: Rc<Texture>) -> Result<FramebufferStatus> {
        self.attach(Attachment::Color(0), &texture)?;
        self.target = Some(texture);
        self.check_status()
    }

    /// Attaches `texture` as depth attachment, and checks completeness.
    pub fn attach_depth(&mut self, texture: Rc<Texture>) -> Result<FramebufferStatus> {
        self.attach(Attachment::Depth, &texture)?;
        self.depth = Some(texture);
        self.check_status()
    }

    /// Re-evaluates the completeness of this framebuffer.
    pub fn check_status(&self) -> Result<FramebufferStatus> {
        let status = match self.validate() {
            Some(status) => status,
            None => {
                let ctx = self.res.context();
                ctx.bind(BindPoint::Framebuffer, self.handle())?;
                let status = ctx.with(|dev| dev.framebuffer_status());
                ctx.unbind(BindPoint::Framebuffer)?;
                status?
            }
        };

        if status != FramebufferStatus::Complete {
            warn!("Framebuffer {} is incomplete: {}.", self.handle(), status);
        }

        self.status.set(status);
        Ok(status)
    }

    /// Copies the color target into the rectangle `(x, y, width, height)` of the default
    /// framebuffer.
    pub fn blit(&self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        let _binder = Binder::new(self)?;
        let src = self.target.as_ref().map(|v| v.dimensions()).unwrap_or((0, 0));
        self.res
            .context()
            .with(|dev| dev.blit_to_default(src, [x, y, width as i32, height as i32]))
    }

    fn attach(&self, attachment: Attachment, texture: &Texture) -> Result<()> {
        let ctx = self.res.context();
        ctx.bind(BindPoint::Framebuffer, self.handle())?;
        let id = texture.handle().raw();
        let result = ctx.with(|dev| dev.framebuffer_texture(attachment, id));
        ctx.unbind(BindPoint::Framebuffer)?;
        result
    }

    /// Detects the incomplete cases that do not need a round-trip to the device.
    fn validate(&self) -> Option<FramebufferStatus> {
        match (&self.target, &self.depth) {
            (None, None) => Some(FramebufferStatus::MissingAttachment),
            (Some(color), Some(depth)) if color.dimensions() != depth.dimensions() => {
                Some(FramebufferStatus::MismatchedDimensions)
            }
            _ => None,
        }
    }
}

impl Bind for Framebuffer {
    fn bind(&self, bind: bool) -> Result<()> {
        let ctx = self.res.context();
        if !bind {
            return ctx.unbind(BindPoint::Framebuffer);
        }

        let (width, height) = match self.target {
            Some(ref v) => v.dimensions(),
            None => return Err(Error::NoTarget),
        };

        let status = match self.status.get() {
            FramebufferStatus::Complete => FramebufferStatus::Complete,
            _ => self.check_status()?,
        };

        if status != FramebufferStatus::Complete {
            return Err(Error::Incomplete(status));
        }

        ctx.bind(BindPoint::Framebuffer, self.handle())?;
        ctx.with(|dev| dev.viewport(0, 0, width, height))
    }
}
