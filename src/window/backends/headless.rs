use std::cell::RefCell;
use std::collections::VecDeque;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use crate::errors::*;

use super::super::events::{Event, Events};
use super::Visitor;

#[derive(Debug, Default)]
struct State {
    dimensions: (u32, u32),
    cursor: (f64, f64),
    title: String,
    visible: bool,
    swaps: usize,
    pending: VecDeque<Event>,
}

/// A window without any native surface. Events are scripted by the owner of a clone,
/// which shares its state with the visitor handed to a `Window`.
#[derive(Debug, Clone, Default)]
pub struct HeadlessVisitor {
    state: Rc<RefCell<State>>,
}

impl HeadlessVisitor {
    pub fn new(dimensions: (u32, u32)) -> Self {
        let visitor = HeadlessVisitor::default();
        visitor.state.borrow_mut().dimensions = dimensions;
        visitor
    }

    /// Queues `event` for the next poll.
    pub fn push(&self, event: Event) {
        let mut state = self.state.borrow_mut();
        match event {
            Event::CursorMoved { x, y } => state.cursor = (x, y),
            Event::Resized { width, height } => state.dimensions = (width, height),
            _ => {}
        }

        state.pending.push_back(event);
    }

    pub fn swaps(&self) -> usize {
        self.state.borrow().swaps
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
}

impl Visitor for HeadlessVisitor {
    fn show(&self) {
        self.state.borrow_mut().visible = true;
    }

    fn hide(&self) {
        self.state.borrow_mut().visible = false;
    }

    fn set_title(&self, title: &str) {
        self.state.borrow_mut().title = title.to_owned();
    }

    #[inline]
    fn dimensions(&self) -> (u32, u32) {
        self.state.borrow().dimensions
    }

    fn resize(&mut self, dimensions: (u32, u32)) {
        self.push(Event::Resized {
            width: dimensions.0,
            height: dimensions.1,
        });
    }

    #[inline]
    fn cursor_position(&self) -> (f64, f64) {
        self.state.borrow().cursor
    }

    fn poll_events(&mut self, events: &mut Events) {
        events.extend(self.state.borrow_mut().pending.drain(..));
    }

    #[inline]
    fn wait_events(&mut self, events: &mut Events) {
        self.poll_events(events);
    }

    #[inline]
    fn is_current(&self) -> bool {
        true
    }

    #[inline]
    fn make_current(&self) -> Result<()> {
        Ok(())
    }

    fn swap_buffers(&self) -> Result<()> {
        self.state.borrow_mut().swaps += 1;
        Ok(())
    }

    #[inline]
    fn proc_address(&self, _: &str) -> *const c_void {
        ptr::null()
    }
}
