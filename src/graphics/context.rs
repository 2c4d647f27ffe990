//! The binding context: the "currently bound" slots of the native context that is
//! current on this thread.
//!
//! There is no shadow copy of the binding state. Every query is forwarded to the device,
//! which keeps it the single source of truth even when raw native calls are interleaved
//! with the resources of this crate.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::device::headless::HeadlessDevice;
use crate::device::{BindPoint, Device, ObjectKind};
use crate::errors::*;

use super::handle::Handle;

/// A cheap, cloneable reference to the device. It is confined to the thread that owns
/// the native context.
#[derive(Clone)]
pub struct Context {
    device: Rc<RefCell<Box<dyn Device>>>,
}

impl Context {
    pub fn new<T: Device + 'static>(device: T) -> Self {
        Context {
            device: Rc::new(RefCell::new(Box::new(device))),
        }
    }

    /// Creates a context over a software device that never touches a GPU.
    pub fn headless() -> Self {
        Context::new(HeadlessDevice::new())
    }

    /// Creates a context over the OpenGL context that is current on this thread.
    ///
    /// # Unsafe
    ///
    /// The native context must stay current on this thread for as long as any clone of
    /// this `Context`, or any resource created from it, is alive.
    #[cfg(not(target_arch = "wasm32"))]
    pub unsafe fn gl<F>(loader: F, debug: bool) -> Result<Self>
    where
        F: FnMut(&str) -> *const ::std::os::raw::c_void,
    {
        let device = crate::device::gl::GLDevice::load(loader, debug)?;
        Ok(Context::new(device))
    }

    /// Runs `func` with exclusive access to the device. `func` must not call back into
    /// this context.
    pub fn with<F, R>(&self, func: F) -> Result<R>
    where
        F: FnOnce(&mut dyn Device) -> Result<R>,
    {
        let mut device = self
            .device
            .try_borrow_mut()
            .map_err(|_| Error::Device("Re-entrant access to the device.".into()))?;

        func(&mut **device)
    }

    pub fn allocate(&self, kind: ObjectKind) -> Result<Handle> {
        let raw = self.with(|dev| dev.create(kind))?;
        Handle::new(raw).ok_or_else(|| {
            error!("Failed to allocate a {:?} handle.", kind);
            Error::Allocation(kind)
        })
    }

    pub fn release(&self, kind: ObjectKind, handle: Handle) -> Result<()> {
        self.with(|dev| dev.delete(kind, handle.raw()))
    }

    /// The object currently bound at `point`, or `None` for the default object.
    pub fn current(&self, point: BindPoint) -> Result<Option<Handle>> {
        let raw = self.with(|dev| dev.current(point))?;
        Ok(Handle::new(raw))
    }

    #[inline]
    pub fn is_current(&self, point: BindPoint, handle: Handle) -> Result<bool> {
        Ok(self.current(point)? == Some(handle))
    }

    /// Makes `handle` current at `point`. Nothing is issued if it is current already.
    pub fn bind(&self, point: BindPoint, handle: Handle) -> Result<()> {
        if self.is_current(point, handle)? {
            return Ok(());
        }

        self.with(|dev| dev.bind(point, handle.raw()))
    }

    /// Restores the default object at `point`, whatever was bound before.
    pub fn unbind(&self, point: BindPoint) -> Result<()> {
        self.with(|dev| dev.bind(point, 0))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Context")
    }
}
