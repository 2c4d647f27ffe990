use std::os::raw::c_void;

use crate::errors::*;

use super::events::Events;

pub mod headless;

#[cfg(feature = "glutin")]
pub mod glutin;

/// The native window and the GL context it presents.
pub trait Visitor {
    fn show(&self);
    fn hide(&self);
    fn set_title(&self, title: &str);

    /// The size of the drawable area in pixels.
    fn dimensions(&self) -> (u32, u32);
    fn resize(&mut self, dimensions: (u32, u32));
    /// The last known cursor position in pixels.
    fn cursor_position(&self) -> (f64, f64);

    /// Collects the pending events without blocking.
    fn poll_events(&mut self, events: &mut Events);
    /// Blocks until at least one event is available, and collects it.
    fn wait_events(&mut self, events: &mut Events);

    fn is_current(&self) -> bool;
    fn make_current(&self) -> Result<()>;
    fn swap_buffers(&self) -> Result<()>;

    /// The address of the GL function `symbol`, null if the backend has no native
    /// context.
    fn proc_address(&self, symbol: &str) -> *const c_void;
}
