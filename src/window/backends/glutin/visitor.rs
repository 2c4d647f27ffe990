use std::cell::Cell;
use std::os::raw::c_void;

use glutin_crate as glutin;
use glutin_crate::GlContext;

use crate::errors::*;
use crate::settings::{ContextParams, WindowParams};

use super::super::super::events::{Event, Events};
use super::super::Visitor;
use super::types;

pub struct GlutinVisitor {
    window: glutin::GlWindow,
    events_loop: glutin::EventsLoop,
    cursor: Cell<(f64, f64)>,
}

impl GlutinVisitor {
    pub fn new(params: &WindowParams, context: &ContextParams) -> Result<Self> {
        let builder = glutin::WindowBuilder::new()
            .with_title(params.title.clone())
            .with_dimensions(glutin::dpi::LogicalSize::new(
                f64::from(params.width),
                f64::from(params.height),
            ))
            .with_resizable(params.resizable)
            .with_visibility(params.visible);

        let [r, g, b, a] = params.color_bits;
        let context = glutin::ContextBuilder::new()
            .with_gl(glutin::GlRequest::Specific(
                glutin::Api::OpenGl,
                (context.major, context.minor),
            ))
            .with_gl_profile(glutin::GlProfile::Core)
            .with_gl_debug_flag(context.debug)
            .with_pixel_format(r.saturating_add(g).saturating_add(b), a)
            .with_depth_buffer(params.depth_bits)
            .with_stencil_buffer(params.stencil_bits)
            .with_multisampling(params.samples)
            .with_vsync(params.vsync);

        let events_loop = glutin::EventsLoop::new();
        let window = glutin::GlWindow::new(builder, context, &events_loop)
            .map_err(|err| Error::Window(format!("{}", err)))?;

        let visitor = GlutinVisitor {
            window,
            events_loop,
            cursor: Cell::new((0.0, 0.0)),
        };

        visitor.make_current()?;
        Ok(visitor)
    }

    fn collect(&self, source: glutin::Event, events: &mut Events) {
        let hidpi = self.window.get_hidpi_factor();
        if let Some(e) = types::from_event(source, hidpi) {
            match e {
                Event::CursorMoved { x, y } => self.cursor.set((x, y)),
                Event::Resized { width, height } => {
                    let size = glutin::dpi::PhysicalSize::new(f64::from(width), f64::from(height));
                    self.window.resize(size);
                }
                _ => {}
            }

            events.push(e);
        }
    }
}

impl Visitor for GlutinVisitor {
    #[inline]
    fn show(&self) {
        self.window.show();
    }

    #[inline]
    fn hide(&self) {
        self.window.hide();
    }

    #[inline]
    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn dimensions(&self) -> (u32, u32) {
        let hidpi = self.window.get_hidpi_factor();
        match self.window.get_inner_size() {
            Some(size) => {
                let size = size.to_physical(hidpi);
                (size.width as u32, size.height as u32)
            }
            None => (0, 0),
        }
    }

    fn resize(&mut self, dimensions: (u32, u32)) {
        let hidpi = self.window.get_hidpi_factor();
        let size = glutin::dpi::PhysicalSize::new(f64::from(dimensions.0), f64::from(dimensions.1));
        self.window.set_inner_size(size.to_logical(hidpi));
    }

    #[inline]
    fn cursor_position(&self) -> (f64, f64) {
        self.cursor.get()
    }

    fn poll_events(&mut self, events: &mut Events) {
        let mut sources = Vec::new();
        self.events_loop.poll_events(|v| sources.push(v));
        for v in sources {
            self.collect(v, events);
        }
    }

    fn wait_events(&mut self, events: &mut Events) {
        let mut sources = Vec::new();
        self.events_loop.run_forever(|v| {
            sources.push(v);
            glutin::ControlFlow::Break
        });

        self.events_loop.poll_events(|v| sources.push(v));
        for v in sources {
            self.collect(v, events);
        }
    }

    #[inline]
    fn is_current(&self) -> bool {
        self.window.is_current()
    }

    fn make_current(&self) -> Result<()> {
        unsafe {
            self.window
                .make_current()
                .map_err(|err| Error::Window(format!("{}", err)))
        }
    }

    fn swap_buffers(&self) -> Result<()> {
        self.window
            .swap_buffers()
            .map_err(|err| Error::Window(format!("{}", err)))
    }

    #[inline]
    fn proc_address(&self, symbol: &str) -> *const c_void {
        self.window.get_proc_address(symbol) as *const c_void
    }
}
