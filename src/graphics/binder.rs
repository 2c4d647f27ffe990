use std::ops::Deref;

use crate::errors::*;

/// A resource that could be made current in its binding slot.
pub trait Bind {
    /// Binds the resource if `bind` is true, otherwise restores the default object of
    /// its slot.
    fn bind(&self, bind: bool) -> Result<()>;
}

/// Keeps a resource bound for the lifetime of the binder, and unbinds it on every exit
/// path. A binder assumes it owns the slot of its resource while it is alive.
pub struct Binder<'a, T: Bind + ?Sized + 'a> {
    target: &'a T,
}

impl<'a, T: Bind + ?Sized + 'a> Binder<'a, T> {
    pub fn new(target: &'a T) -> Result<Self> {
        target.bind(true)?;
        Ok(Binder { target })
    }
}

impl<'a, T: Bind + ?Sized + 'a> Deref for Binder<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<'a, T: Bind + ?Sized + 'a> Drop for Binder<'a, T> {
    fn drop(&mut self) {
        if let Err(err) = self.target.bind(false) {
            error!("Failed to unbind on scope exit. {}", err);
        }
    }
}
