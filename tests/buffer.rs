extern crate env_logger;
extern crate pigment;

use pigment::device::headless::HeadlessDevice;
use pigment::device::{BindPoint, BufferTarget};
use pigment::prelude::*;

fn setup() -> (HeadlessDevice, Context) {
    let _ = env_logger::try_init();
    let device = HeadlessDevice::new();
    let ctx = Context::new(device.clone());
    (device, ctx)
}

#[test]
fn upload_reallocates_on_size_change() {
    let (device, ctx) = setup();
    let buffer = GpuBuffer::from_slice(&ctx, &[0u8; 16]).unwrap();
    assert_eq!(buffer.size().unwrap(), 16);

    for len in &[16usize, 40, 3, 0, 64] {
        let data: Vec<u8> = (0..*len).map(|v| (v * 7 % 251) as u8).collect();
        buffer.upload(&data).unwrap();
        assert_eq!(buffer.size().unwrap(), *len);

        let mut dst = vec![0xffu8; *len];
        buffer.download(&mut dst).unwrap();
        assert_eq!(dst, data);
        assert_eq!(device.buffer_bytes(buffer.handle().raw()).unwrap(), data);
    }
}

#[test]
fn typed_round_trip() {
    let (_, ctx) = setup();
    let buffer = GpuBuffer::new(&ctx).unwrap();
    assert_eq!(buffer.size().unwrap(), 0);

    let values = [1.5f32, -2.0, 3.25, 0.0];
    buffer.upload_slice(&values).unwrap();
    assert_eq!(buffer.size().unwrap(), 16);
    assert_eq!(buffer.to_vec::<f32>().unwrap(), values.to_vec());

    let mut head = [0f32; 2];
    buffer.download_slice(&mut head).unwrap();
    assert_eq!(head, [1.5, -2.0]);
}

#[test]
fn download_past_the_end() {
    let (_, ctx) = setup();
    let buffer = GpuBuffer::from_slice(&ctx, &[1u32, 2]).unwrap();

    let mut dst = [0u8; 9];
    match buffer.download(&mut dst) {
        Err(Error::SizeMismatch { expected, actual }) => {
            assert_eq!(expected, 8);
            assert_eq!(actual, 9);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn copy_restores_copy_bindings() {
    let (device, ctx) = setup();
    let src = GpuBuffer::from_slice(&ctx, &[1u32, 2, 3, 4]).unwrap();
    let dst = GpuBuffer::from_slice(&ctx, &[0u32; 2]).unwrap();
    let other = GpuBuffer::new(&ctx).unwrap();

    ctx.bind(BindPoint::Buffer(BufferTarget::CopyRead), other.handle())
        .unwrap();

    src.copy_to(&dst).unwrap();
    assert_eq!(dst.to_vec::<u32>().unwrap(), vec![1, 2, 3, 4]);

    assert_eq!(
        device.bound(BindPoint::Buffer(BufferTarget::CopyRead)),
        other.handle().raw()
    );
    assert_eq!(device.bound(BindPoint::Buffer(BufferTarget::CopyWrite)), 0);

    match src.copy_to(&src) {
        Err(ref err @ Error::InvalidArgument(_)) => assert!(err.is_usage()),
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(src.to_vec::<u32>().unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn storage_binding() {
    let (device, ctx) = setup();
    let buffer = GpuBuffer::from_slice(&ctx, &[0u32; 4]).unwrap();
    buffer.bind_base(3).unwrap();
    assert_eq!(
        device.storage_binding(BufferTarget::ShaderStorage, 3),
        buffer.handle().raw()
    );
}

fn triangle(ctx: &Context) -> VertexBuffer {
    let vbo = VertexBuffer::new(ctx, Usage::DynamicDraw).unwrap();
    vbo.create_buffer(&[-1.0f32, -1.0, 0.0, 3.0, -1.0, 0.0, -1.0, 3.0, 0.0], 3)
        .unwrap();
    vbo
}

#[test]
fn vertex_layout() {
    let (device, ctx) = setup();
    let vbo = triangle(&ctx);

    let layout = vbo.layout();
    assert_eq!(vbo.len(), 3);
    assert_eq!(layout.components, 3);
    assert_eq!(layout.data_type, DataType::Float);
    assert_eq!(layout.stride(), 12);
    assert_eq!(device.buffer_bytes(vbo.handle().raw()).unwrap().len(), 36);

    assert!(vbo.create_buffer(&[0.0f32; 4], 3).is_err());
    assert!(vbo.create_buffer(&[0.0f32; 4], 0).is_err());

    vbo.create_vectors(&[[0u16; 2]; 5]).unwrap();
    assert_eq!(vbo.len(), 5);
    assert_eq!(vbo.layout().data_type, DataType::UnsignedShort);
}

#[test]
fn out_of_range_updates_are_ignored() {
    let (device, ctx) = setup();
    let vbo = triangle(&ctx);
    let before = device.buffer_bytes(vbo.handle().raw()).unwrap();

    let data = [7.0f32; 12];
    vbo.update_buffer(&data, 2, 2).unwrap();
    vbo.update_buffer(&data, 3, 1).unwrap();
    vbo.update_buffer(&data, 0, 4).unwrap();
    vbo.update_buffer(&data[..3], 0, 2).unwrap();
    vbo.update_buffer(&data, 1, usize::max_value()).unwrap();

    assert_eq!(device.buffer_bytes(vbo.handle().raw()).unwrap(), before);
    assert_eq!(vbo.len(), 3);
}

#[test]
fn update_in_range() {
    let (device, ctx) = setup();
    let vbo = triangle(&ctx);

    let data = [[5.0f32, 6.0, 7.0]; 3];
    vbo.update_vectors(&data, 1, 1).unwrap();

    let bytes = device.buffer_bytes(vbo.handle().raw()).unwrap();
    let floats: Vec<f32> = bytes
        .chunks(4)
        .map(|v| f32::from_ne_bytes([v[0], v[1], v[2], v[3]]))
        .collect();

    assert_eq!(
        floats,
        vec![-1.0, -1.0, 0.0, 5.0, 6.0, 7.0, -1.0, 3.0, 0.0]
    );

    assert!(vbo.update_buffer(&[0i32; 9], 0, 1).is_err());
    assert!(vbo.update_vectors(&[[0f32; 2]; 3], 0, 1).is_err());
}

#[test]
fn vertex_array_attributes() {
    let (device, ctx) = setup();
    let positions = Rc::new(triangle(&ctx));
    let colors = Rc::new(VertexBuffer::new(&ctx, Usage::StaticDraw).unwrap());
    colors.create_vectors(&[[1u8, 0, 0, 255]; 3]).unwrap();

    let mut vao = VertexArray::new(&ctx).unwrap();
    vao.add_vertex_buffer(0, positions.clone()).unwrap();
    vao.add_vertex_buffer(1, colors.clone()).unwrap();

    let attrib = device.vertex_attrib(vao.handle().raw(), 0).unwrap();
    assert_eq!(attrib.buffer, positions.handle().raw());
    assert_eq!(attrib.components, 3);
    assert_eq!(attrib.data_type, DataType::Float);
    assert!(attrib.enabled);

    let attrib = device.vertex_attrib(vao.handle().raw(), 1).unwrap();
    assert_eq!(attrib.components, 4);
    assert_eq!(attrib.data_type, DataType::UnsignedByte);

    assert_eq!(vao.locations().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(device.bound(BindPoint::VertexArray), 0);
    assert_eq!(device.bound(BindPoint::Buffer(BufferTarget::Array)), 0);

    let empty = Rc::new(VertexBuffer::new(&ctx, Usage::StaticDraw).unwrap());
    assert!(vao.add_vertex_buffer(2, empty).is_err());
}

#[test]
fn render_requires_bound_array() {
    let (_, ctx) = setup();
    let vao = VertexArray::new(&ctx).unwrap();

    match vao.render(DrawMode::Triangles, 0, 3) {
        Err(Error::NotBound(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}
