extern crate env_logger;
extern crate pigment;

use pigment::device::headless::HeadlessDevice;
use pigment::device::{BindPoint, BufferTarget, ObjectKind};
use pigment::prelude::*;

fn setup() -> (HeadlessDevice, Context) {
    let _ = env_logger::try_init();
    let device = HeadlessDevice::new();
    let ctx = Context::new(device.clone());
    (device, ctx)
}

const KINDS: [ObjectKind; 4] = [
    ObjectKind::Texture,
    ObjectKind::Buffer,
    ObjectKind::Framebuffer,
    ObjectKind::VertexArray,
];

#[test]
fn release_exactly_once() {
    let (device, ctx) = setup();

    {
        let texture = Texture::new(&ctx, 4, 4).unwrap();
        let buffer = GpuBuffer::new(&ctx).unwrap();
        let fbo = Framebuffer::new(&ctx).unwrap();
        let vao = VertexArray::new(&ctx).unwrap();
        let vbo = VertexBuffer::new(&ctx, Usage::StaticDraw).unwrap();

        for kind in &KINDS {
            assert_eq!(device.allocated(*kind), device.live(*kind));
            assert_eq!(device.released(*kind), 0);
        }

        assert_eq!(device.live(ObjectKind::Buffer), 2);

        let mut handles = vec![
            texture.handle(),
            buffer.handle(),
            fbo.handle(),
            vao.handle(),
            vbo.handle(),
        ];
        handles.sort();
        handles.dedup();
        assert_eq!(handles.len(), 5);
    }

    for kind in &KINDS {
        assert_eq!(device.live(*kind), 0);
        assert_eq!(device.allocated(*kind), device.released(*kind));
    }
}

#[test]
fn shared_resources_are_released_with_the_last_owner() {
    let (device, ctx) = setup();

    let texture = Rc::new(Texture::new(&ctx, 2, 2).unwrap());
    texture.allocate().unwrap();

    let mut fbo = Framebuffer::new(&ctx).unwrap();
    fbo.attach_texture(texture.clone()).unwrap();
    drop(texture);
    assert_eq!(device.live(ObjectKind::Texture), 1);

    drop(fbo);
    assert_eq!(device.live(ObjectKind::Texture), 0);
    assert_eq!(device.released(ObjectKind::Texture), 1);
    assert_eq!(device.released(ObjectKind::Framebuffer), 1);
}

#[test]
fn allocation_failure() {
    let (device, ctx) = setup();
    device.set_fail_allocations(true);

    match Texture::new(&ctx, 4, 4) {
        Err(Error::Allocation(ObjectKind::Texture)) => {}
        other => panic!("unexpected {:?}", other),
    }

    match GpuBuffer::new(&ctx) {
        Err(Error::Allocation(ObjectKind::Buffer)) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(Program::new(&ctx).is_err());
    assert_eq!(device.released(ObjectKind::Texture), 0);

    device.set_fail_allocations(false);
    assert!(Texture::new(&ctx, 4, 4).is_ok());
}

#[test]
fn binder_is_idempotent() {
    let (device, ctx) = setup();
    let buffer = GpuBuffer::from_slice(&ctx, &[1u32, 2, 3]).unwrap();
    let point = BindPoint::Buffer(BufferTarget::ShaderStorage);

    let binder = Binder::new(&buffer).unwrap();
    assert_eq!(device.bound(point), buffer.handle().raw());
    assert_eq!(ctx.current(point).unwrap(), Some(buffer.handle()));

    let calls = device.bind_calls();
    buffer.bind(true).unwrap();
    assert_eq!(device.bind_calls(), calls);
    assert_eq!(ctx.current(point).unwrap(), Some(buffer.handle()));

    drop(binder);
    assert_eq!(device.bound(point), 0);
    assert_eq!(ctx.current(point).unwrap(), None);
}

#[test]
fn unbind_restores_default_when_nested() {
    let (device, ctx) = setup();
    let a = GpuBuffer::new(&ctx).unwrap();
    let b = GpuBuffer::new(&ctx).unwrap();
    let point = BindPoint::Buffer(BufferTarget::ShaderStorage);

    {
        let _a = Binder::new(&a).unwrap();
        {
            let _b = Binder::new(&b).unwrap();
            assert_eq!(device.bound(point), b.handle().raw());
        }

        assert_eq!(device.bound(point), 0);
    }

    assert_eq!(device.bound(point), 0);
}

#[test]
fn dropping_bound_resource_clears_binding() {
    let (device, ctx) = setup();
    let point = BindPoint::Texture(0);

    {
        let texture = Texture::new(&ctx, 1, 1).unwrap();
        texture.bind(true).unwrap();
        assert_eq!(device.bound(point), texture.handle().raw());
    }

    assert_eq!(device.bound(point), 0);
    assert_eq!(ctx.current(point).unwrap(), None);
}

#[test]
fn context_is_not_reentrant() {
    let (_, ctx) = setup();
    let inner = ctx.clone();

    let result = ctx.with(|_| inner.with(|_| Ok(())));
    match result {
        Err(Error::Device(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}
