use std::fmt;
use std::num::NonZeroU32;

use crate::device::{ObjectKind, RawHandle};
use crate::errors::*;

use super::context::Context;

/// The name of a live native object. The reserved name `0` can not be represented, so
/// an invalid handle never escapes into later calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(NonZeroU32);

impl Handle {
    /// Returns `None` for the reserved name `0`.
    #[inline]
    pub fn new(raw: RawHandle) -> Option<Self> {
        NonZeroU32::new(raw).map(Handle)
    }

    #[inline]
    pub fn raw(self) -> RawHandle {
        self.0.get()
    }
}

impl From<Handle> for RawHandle {
    fn from(handle: Handle) -> RawHandle {
        handle.raw()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The exclusive owner of one native object. The object is allocated in `new` and
/// released exactly once when the `Resource` is dropped.
pub struct Resource {
    ctx: Context,
    kind: ObjectKind,
    handle: Handle,
}

impl Resource {
    pub fn new(ctx: &Context, kind: ObjectKind) -> Result<Self> {
        let handle = ctx.allocate(kind)?;
        Ok(Resource {
            ctx: ctx.clone(),
            kind,
            handle,
        })
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    pub fn raw(&self) -> RawHandle {
        self.handle.raw()
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Resource({:?} {})", self.kind, self.handle)
    }
}

impl Drop for Resource {
    fn drop(&mut self) {
        if let Err(err) = self.ctx.release(self.kind, self.handle) {
            error!("Failed to release {:?} {}. {}", self.kind, self.handle, err);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reserved() {
        assert!(Handle::new(0).is_none());
        assert_eq!(Handle::new(7).map(|v| v.raw()), Some(7));
        assert_eq!(format!("{}", Handle::new(3).unwrap()), "#3");
    }
}
