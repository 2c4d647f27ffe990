extern crate approx;
extern crate env_logger;
extern crate pigment;

use std::cell::{Cell, RefCell};

use approx::assert_relative_eq;

use pigment::device::headless::HeadlessDevice;
use pigment::prelude::*;
use pigment::window::{HeadlessVisitor, Visitor};

fn setup() -> (HeadlessDevice, HeadlessVisitor, Window) {
    let _ = env_logger::try_init();
    let device = HeadlessDevice::new();
    let visitor = HeadlessVisitor::new((640, 480));
    let window = Window::with_visitor(visitor.clone(), Context::new(device.clone()));
    (device, visitor, window)
}

#[test]
fn callbacks() {
    let (_, visitor, mut window) = setup();

    let keys = Rc::new(RefCell::new(Vec::new()));
    let clicks = Rc::new(Cell::new(0));
    let cursor = Rc::new(Cell::new((0.0, 0.0)));
    let scroll = Rc::new(Cell::new((0.0, 0.0)));

    {
        let keys = keys.clone();
        window.set_on_key(move |key, scancode, action, _| {
            keys.borrow_mut().push((key, scancode, action))
        });
    }

    {
        let clicks = clicks.clone();
        window.set_on_mouse(move |button, action, _| {
            if button == MouseButton::Left && action == Action::Press {
                clicks.set(clicks.get() + 1);
            }
        });
    }

    {
        let cursor = cursor.clone();
        window.set_on_mouse_move(move |x, y| cursor.set((x, y)));
    }

    {
        let scroll = scroll.clone();
        window.set_on_scroll(move |dx, dy| scroll.set((dx, dy)));
    }

    visitor.push(Event::Key {
        key: Key::Escape,
        scancode: 1,
        action: Action::Press,
        modifiers: Modifiers::default(),
    });
    visitor.push(Event::MouseButton {
        button: MouseButton::Left,
        action: Action::Press,
        modifiers: Modifiers::default(),
    });
    visitor.push(Event::MouseButton {
        button: MouseButton::Left,
        action: Action::Release,
        modifiers: Modifiers::default(),
    });
    visitor.push(Event::CursorMoved { x: 12.5, y: 40.0 });
    visitor.push(Event::Scroll { dx: 0.0, dy: -1.0 });

    // Events are only dispatched once the window updates.
    assert!(keys.borrow().is_empty());
    window.update(false).unwrap();

    assert_eq!(*keys.borrow(), vec![(Key::Escape, 1, Action::Press)]);
    assert_eq!(clicks.get(), 1);
    assert_relative_eq!(cursor.get().0, 12.5);
    assert_relative_eq!(cursor.get().1, 40.0);
    assert_relative_eq!(scroll.get().1, -1.0);
    assert_eq!(window.cursor_position(), (12.5, 40.0));
    assert_eq!(visitor.swaps(), 1);

    window.update(false).unwrap();
    assert_eq!(keys.borrow().len(), 1);
}

#[test]
fn resize_resets_the_viewport() {
    let (device, _, mut window) = setup();
    assert_eq!(window.dimensions(), (640, 480));

    let sizes = Rc::new(RefCell::new(Vec::new()));
    {
        let sizes = sizes.clone();
        window.set_on_resize(move |w, h| sizes.borrow_mut().push((w, h)));
    }

    window.resize(800, 600);
    window.render_once(false).unwrap();

    assert_eq!(window.dimensions(), (800, 600));
    assert_eq!(*sizes.borrow(), vec![(800, 600)]);
    assert_eq!(device.current_viewport(), [0, 0, 800, 600]);
}

#[test]
fn render_loop_runs_until_closed() {
    let (_, visitor, mut window) = setup();
    let frames = Rc::new(Cell::new(0));

    {
        let frames = frames.clone();
        let visitor = visitor.clone();
        window.set_render(move || {
            frames.set(frames.get() + 1);
            if frames.get() == 3 {
                visitor.push(Event::CloseRequested);
            }

            Ok(())
        });
    }

    visitor.show();
    assert_eq!(window.render_loop(true).unwrap(), 3);
    assert_eq!(frames.get(), 3);
    assert_eq!(visitor.swaps(), 3);
    assert!(window.should_close());
    assert!(!visitor.is_visible());
}

#[test]
fn render_errors_stop_the_loop() {
    let (_, visitor, mut window) = setup();
    window.set_render(|| Err(Error::NotBound("render a frame")));

    assert!(window.render_loop(false).is_err());
    assert_eq!(visitor.swaps(), 0);
    assert!(!window.should_close());
}

#[test]
fn window_state() {
    let (_, visitor, mut window) = setup();
    window.set_title("pigment");
    window.set_visible(true);
    assert_eq!(visitor.title(), "pigment");
    assert!(visitor.is_visible());

    window.make_current().unwrap();
    window.close();
    assert!(window.should_close());
    assert!(!visitor.is_visible());
    assert_eq!(window.render_loop(false).unwrap(), 0);
}

#[test]
fn settings() {
    let settings = Settings::from_json(
        r#"{
            "window": { "title": "Splat", "width": 1024, "resizable": true },
            "context": { "debug": true }
        }"#,
    )
    .unwrap();

    assert_eq!(settings.window.title, "Splat");
    assert_eq!(settings.window.width, 1024);
    assert_eq!(settings.window.height, 480);
    assert_eq!(settings.window.color_bits, [8, 8, 8, 8]);
    assert_eq!(settings.window.depth_bits, 24);
    assert_eq!(settings.window.stencil_bits, 8);
    assert!(settings.window.resizable);
    assert!(settings.context.debug);
    assert_eq!((settings.context.major, settings.context.minor), (4, 3));

    let defaults = Settings::default();
    assert_eq!(defaults.window.samples, 4);
    assert!(!defaults.window.resizable);

    match Settings::load("tests/_missing_settings_.json") {
        Err(Error::Io { .. }) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn orthographic_projection() {
    let m = ortho(0.0f32, 640.0, 0.0, 480.0, -1.0, 1.0).unwrap();
    assert_relative_eq!(m.x.x, 2.0 / 640.0);
    assert_relative_eq!(m.y.y, 2.0 / 480.0);
    assert_relative_eq!(m.w.x, -1.0);
    assert_relative_eq!(m.w.y, -1.0);

    match ortho(0.0f32, 0.0, 0.0, 1.0, -1.0, 1.0) {
        Err(Error::InvalidArgument(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}
