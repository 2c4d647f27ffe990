//! The window that presents the default framebuffer, and the callbacks it drives.
//!
//! ```rust,ignore
//! let mut window = Window::new(&Settings::default())?;
//! window.set_on_key(|key, _, action, _| println!("{:?} {:?}", key, action));
//! window.set_render(move || draw(&ctx));
//! window.render_loop(false)?;
//! ```

pub mod backends;
pub mod events;

pub use self::backends::headless::HeadlessVisitor;
pub use self::backends::Visitor;
pub use self::events::{Action, Event, Events, Key, Modifiers, MouseButton};

use crate::errors::*;
use crate::graphics::context::Context;

type KeyCallback = Box<dyn FnMut(Key, u32, Action, Modifiers)>;
type MouseCallback = Box<dyn FnMut(MouseButton, Action, Modifiers)>;
type MotionCallback = Box<dyn FnMut(f64, f64)>;
type ResizeCallback = Box<dyn FnMut(u32, u32)>;
type RenderCallback = Box<dyn FnMut() -> Result<()>>;

#[derive(Default)]
struct Callbacks {
    key: Option<KeyCallback>,
    mouse: Option<MouseCallback>,
    mouse_move: Option<MotionCallback>,
    scroll: Option<MotionCallback>,
    resize: Option<ResizeCallback>,
    render: Option<RenderCallback>,
}

pub struct Window {
    visitor: Box<dyn Visitor>,
    context: Context,
    events: Events,
    dimensions: (u32, u32),
    closed: bool,
    callbacks: Callbacks,
}

impl Window {
    /// Opens a native window and wraps its GL context.
    #[cfg(feature = "glutin")]
    pub fn new(settings: &crate::settings::Settings) -> Result<Self> {
        let visitor = backends::glutin::new(&settings.window, &settings.context)?;
        let context = unsafe {
            Context::gl(
                |symbol| visitor.proc_address(symbol),
                settings.context.debug,
            )?
        };
        Ok(Window::from_visitor(visitor, context))
    }

    /// Wraps `visitor`, whose GL context is driven through `context`.
    pub fn with_visitor<T: Visitor + 'static>(visitor: T, context: Context) -> Self {
        Window::from_visitor(Box::new(visitor), context)
    }

    fn from_visitor(visitor: Box<dyn Visitor>, context: Context) -> Self {
        let dimensions = visitor.dimensions();
        Window {
            visitor,
            context,
            events: Events::new(),
            dimensions,
            closed: false,
            callbacks: Callbacks::default(),
        }
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The size of the drawable area in pixels, as of the last processed event.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    #[inline]
    pub fn cursor_position(&self) -> (f64, f64) {
        self.visitor.cursor_position()
    }

    #[inline]
    pub fn should_close(&self) -> bool {
        self.closed
    }

    /// Requests the render loop to stop, and hides the window.
    pub fn close(&mut self) {
        self.closed = true;
        self.set_visible(false);
    }

    pub fn set_visible(&self, visible: bool) {
        if visible {
            self.visitor.show();
        } else {
            self.visitor.hide();
        }
    }

    #[inline]
    pub fn set_title(&self, title: &str) {
        self.visitor.set_title(title);
    }

    /// Resizes the drawable area. The resize callback runs once the window system
    /// reports the new size.
    #[inline]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.visitor.resize((width, height));
    }

    pub fn make_current(&self) -> Result<()> {
        if self.visitor.is_current() {
            return Ok(());
        }

        self.visitor.make_current()
    }

    pub fn set_on_key<F: FnMut(Key, u32, Action, Modifiers) + 'static>(&mut self, func: F) {
        self.callbacks.key = Some(Box::new(func));
    }

    pub fn set_on_mouse<F: FnMut(MouseButton, Action, Modifiers) + 'static>(&mut self, func: F) {
        self.callbacks.mouse = Some(Box::new(func));
    }

    pub fn set_on_mouse_move<F: FnMut(f64, f64) + 'static>(&mut self, func: F) {
        self.callbacks.mouse_move = Some(Box::new(func));
    }

    pub fn set_on_scroll<F: FnMut(f64, f64) + 'static>(&mut self, func: F) {
        self.callbacks.scroll = Some(Box::new(func));
    }

    /// Sets the callback of resize events. The viewport is reset to the whole drawable
    /// area before it runs.
    pub fn set_on_resize<F: FnMut(u32, u32) + 'static>(&mut self, func: F) {
        self.callbacks.resize = Some(Box::new(func));
    }

    pub fn set_render<F: FnMut() -> Result<()> + 'static>(&mut self, func: F) {
        self.callbacks.render = Some(Box::new(func));
    }

    /// Presents the frame, then processes the pending events, or waits for one if
    /// `wait` is set.
    pub fn update(&mut self, wait: bool) -> Result<()> {
        self.visitor.swap_buffers()?;

        if wait {
            self.visitor.wait_events(&mut self.events);
        } else {
            self.visitor.poll_events(&mut self.events);
        }

        let mut events = std::mem::replace(&mut self.events, Events::new());
        for v in events.drain() {
            self.dispatch(v)?;
        }

        self.events = events;
        Ok(())
    }

    /// Runs the render callback once and updates the window.
    pub fn render_once(&mut self, wait: bool) -> Result<()> {
        if let Some(ref mut render) = self.callbacks.render {
            render()?;
        }

        self.update(wait)
    }

    /// Renders until the window is closed, and returns the number of frames.
    pub fn render_loop(&mut self, wait: bool) -> Result<u64> {
        let mut frames = 0;
        while !self.should_close() {
            self.render_once(wait)?;
            frames += 1;
        }

        Ok(frames)
    }

    fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key {
                key,
                scancode,
                action,
                modifiers,
            } => {
                if let Some(ref mut func) = self.callbacks.key {
                    func(key, scancode, action, modifiers);
                }
            }

            Event::MouseButton {
                button,
                action,
                modifiers,
            } => {
                if let Some(ref mut func) = self.callbacks.mouse {
                    func(button, action, modifiers);
                }
            }

            Event::CursorMoved { x, y } => {
                if let Some(ref mut func) = self.callbacks.mouse_move {
                    func(x, y);
                }
            }

            Event::Scroll { dx, dy } => {
                if let Some(ref mut func) = self.callbacks.scroll {
                    func(dx, dy);
                }
            }

            Event::Resized { width, height } => {
                self.dimensions = (width, height);
                self.context.with(|dev| dev.viewport(0, 0, width, height))?;
                if let Some(ref mut func) = self.callbacks.resize {
                    func(width, height);
                }
            }

            Event::CloseRequested => {
                info!("Window close requested.");
                self.close();
            }
        }

        Ok(())
    }
}
