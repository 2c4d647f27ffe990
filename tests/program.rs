extern crate env_logger;
extern crate pigment;

use std::fs;

use pigment::device::headless::{DispatchCall, DrawCall, HeadlessDevice};
use pigment::device::{BindPoint, BufferTarget, ObjectKind};
use pigment::prelude::*;

fn setup() -> (HeadlessDevice, Context) {
    let _ = env_logger::try_init();
    let device = HeadlessDevice::new();
    let ctx = Context::new(device.clone());
    (device, ctx)
}

const VS: &str = r"
#version 430
layout(location = 0) in vec3 position;
void main() { gl_Position = vec4(position, 1.0); }
";

const FS: &str = r"
#version 430
uniform vec4 color;
uniform sampler2D lut;
out vec4 frag;
void main() { frag = color * texture(lut, vec2(0.5)); }
";

const FS_FLAT: &str = r"
#version 430
out vec4 frag;
void main() { frag = vec4(1.0); }
";

const KERNEL: &str = r"
#version 430
layout(local_size_x = 8, local_size_y = 8) in;
layout(rgba32f, binding = 0) uniform image2D target;
uniform ivec2 offset;
void main() {
    ivec2 texel = ivec2(gl_GlobalInvocationID.xy) + offset;
    imageStore(target, texel, vec4(1.0));
}
";

#[test]
fn replacing_a_stage_frees_the_old_shader() {
    let (device, ctx) = setup();
    let mut program = RenderProgram::from_sources(&ctx, VS, FS).unwrap();
    assert_eq!(program.state(), ProgramState::Linked);
    assert_eq!(device.live(ObjectKind::Shader(ShaderStage::Fragment)), 1);

    let old = program.stage(ShaderStage::Fragment).unwrap();
    program.attach_fragment_shader(FS_FLAT).unwrap();
    let new = program.stage(ShaderStage::Fragment).unwrap();

    assert_ne!(old, new);
    assert!(program.is_linked());
    assert_eq!(device.live(ObjectKind::Shader(ShaderStage::Fragment)), 1);
    assert_eq!(device.released(ObjectKind::Shader(ShaderStage::Fragment)), 1);

    let attached = device.attached_shaders(program.handle().raw());
    assert_eq!(attached.len(), 2);
    assert!(attached.contains(&new.raw()));
    assert!(!attached.contains(&old.raw()));

    drop(program);
    assert_eq!(device.live(ObjectKind::Shader(ShaderStage::Vertex)), 0);
    assert_eq!(device.live(ObjectKind::Shader(ShaderStage::Fragment)), 0);
    assert_eq!(device.live(ObjectKind::Program), 0);
}

#[test]
fn compile_errors_reject_the_program() {
    let (device, ctx) = setup();
    let mut program = RenderProgram::from_sources(&ctx, VS, FS).unwrap();

    let broken = "#version 430\n#error broken on purpose\nvoid main() {}\n";
    match program.attach_fragment_shader(broken) {
        Err(Error::Compile { stage, source, log }) => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert_eq!(source, broken);
            assert!(log.contains("broken on purpose"));
        }
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(program.state(), ProgramState::Rejected);
    assert_eq!(device.live(ObjectKind::Shader(ShaderStage::Fragment)), 0);

    match program.bind(true) {
        Err(Error::NotLinked) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(device.bound(BindPoint::Program), 0);

    program.attach_fragment_shader(FS_FLAT).unwrap();
    assert!(program.is_linked());
    program.bind(true).unwrap();
    assert_eq!(device.bound(BindPoint::Program), program.handle().raw());
}

#[test]
fn link_errors_carry_the_log() {
    let (_, ctx) = setup();
    let mut program = RenderProgram::new(&ctx).unwrap();

    let source = "#version 430\nvoid entry() {}\n";
    match program.attach_vertex_shader(source) {
        Err(Error::Link { source: s, log }) => {
            assert!(s.contains(source));
            assert!(log.contains("main"));
        }
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(program.state(), ProgramState::Rejected);
}

#[test]
fn link_errors_carry_every_attached_source() {
    let (_, ctx) = setup();
    let mut program = RenderProgram::new(&ctx).unwrap();
    program.attach_vertex_shader(VS).unwrap();

    let source = "#version 430\nout vec4 frag;\nvoid entry() {}\n";
    match program.attach_fragment_shader(source) {
        Err(Error::Link { source: s, .. }) => {
            assert!(s.contains("// Vertex shader"));
            assert!(s.contains(VS));
            assert!(s.contains("// Fragment shader"));
            assert!(s.contains(source));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn rejected_programs_can_not_draw() {
    let (device, ctx) = setup();
    let mut program = RenderProgram::from_sources(&ctx, VS, FS).unwrap();

    let vbo = Rc::new(VertexBuffer::new(&ctx, Usage::StaticDraw).unwrap());
    vbo.create_vectors(&[[-1.0f32, -1.0, 0.0], [3.0, -1.0, 0.0], [-1.0, 3.0, 0.0]])
        .unwrap();
    let mut vao = VertexArray::new(&ctx).unwrap();
    vao.add_vertex_buffer(0, vbo).unwrap();

    program.bind(true).unwrap();
    vao.bind(true).unwrap();
    program.set("color", [1.0f32, 1.0, 1.0, 1.0]).unwrap();

    let broken = "#version 430\n#error broken on purpose\nvoid main() {}\n";
    assert!(program.attach_fragment_shader(broken).is_err());
    assert_eq!(program.state(), ProgramState::Rejected);
    assert_eq!(device.bound(BindPoint::Program), 0);
    assert!(!program.is_bound().unwrap());

    match program.set("color", [1.0f32, 0.0, 0.0, 1.0]) {
        Err(Error::NotBound(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    match vao.render(DrawMode::Triangles, 0, 3) {
        Err(Error::NotBound(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(device.draws().is_empty());
    vao.bind(false).unwrap();
}

#[test]
fn empty_and_misplaced_sources() {
    let (device, ctx) = setup();
    let mut program = RenderProgram::new(&ctx).unwrap();

    match program.attach_fragment_shader("  \n\t") {
        Err(ref err @ Error::EmptySource(ShaderStage::Fragment)) => assert!(err.is_usage()),
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(program.state(), ProgramState::Empty);
    assert_eq!(device.allocated(ObjectKind::Shader(ShaderStage::Fragment)), 0);

    match program.attach(ShaderStage::Compute, KERNEL) {
        Err(Error::InvalidArgument(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    match program.bind(true) {
        Err(Error::NotLinked) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn uniforms_require_a_bound_program() {
    let (device, ctx) = setup();
    let program = RenderProgram::from_sources(&ctx, VS, FS).unwrap();
    let id = program.handle().raw();

    match program.set("color", [1.0f32, 0.0, 0.0, 1.0]) {
        Err(ref err @ Error::NotBound(_)) => assert!(err.is_usage()),
        other => panic!("unexpected {:?}", other),
    }

    assert!(!program.is_bound().unwrap());
    let _binder = Binder::new(&program).unwrap();
    assert!(program.is_bound().unwrap());

    program.set("color", [1.0f32, 0.0, 0.0, 1.0]).unwrap();
    assert_eq!(
        device.uniform_value(id, "color"),
        Some(UniformValue::Vector4f([1.0, 0.0, 0.0, 1.0]))
    );

    program.set("missing", 3).unwrap();
    program.set("missing", 4).unwrap();
    assert_eq!(device.uniform_value(id, "missing"), None);
}

#[test]
fn samplers() {
    let (device, ctx) = setup();
    let program = RenderProgram::from_sources(&ctx, VS, FS).unwrap();
    let lut = Texture::new(&ctx, 16, 1).unwrap();
    lut.allocate().unwrap();

    assert!(program.bind_sampler("lut", 2, &lut).is_err());

    let _binder = Binder::new(&program).unwrap();
    program.bind_sampler("lut", 2, &lut).unwrap();

    assert_eq!(device.bound(BindPoint::Texture(2)), lut.handle().raw());
    assert_eq!(
        device.uniform_value(program.handle().raw(), "lut"),
        Some(UniformValue::I32(2))
    );
}

#[test]
fn draw_into_framebuffer() {
    let (device, ctx) = setup();

    let target = Rc::new(Texture::new(&ctx, 4, 4).unwrap());
    target.allocate().unwrap();
    let mut fbo = Framebuffer::new(&ctx).unwrap();
    fbo.attach_texture(target.clone()).unwrap();

    let program = RenderProgram::from_sources(&ctx, VS, FS_FLAT).unwrap();

    let vbo = Rc::new(VertexBuffer::new(&ctx, Usage::StaticDraw).unwrap());
    vbo.create_vectors(&[[-1.0f32, -1.0, 0.0], [3.0, -1.0, 0.0], [-1.0, 3.0, 0.0]])
        .unwrap();
    let mut vao = VertexArray::new(&ctx).unwrap();
    vao.add_vertex_buffer(0, vbo).unwrap();

    {
        let _fbo = Binder::new(&fbo).unwrap();
        let _program = Binder::new(&program).unwrap();
        let _vao = Binder::new(&vao).unwrap();
        vao.render(DrawMode::Triangles, 0, 3).unwrap();
    }

    assert_eq!(
        device.draws(),
        vec![DrawCall {
            program: program.handle().raw(),
            vertex_array: vao.handle().raw(),
            framebuffer: fbo.handle().raw(),
            viewport: [0, 0, 4, 4],
            mode: DrawMode::Triangles,
            first: 0,
            count: 3,
        }]
    );

    assert_eq!(device.bound(BindPoint::Program), 0);
    assert_eq!(device.bound(BindPoint::VertexArray), 0);
    assert_eq!(device.bound(BindPoint::Framebuffer), 0);
}

#[test]
fn dispatch_covers_the_region() {
    let (device, ctx) = setup();
    let kernel = ComputeProgram::new(&ctx, KERNEL).unwrap();
    assert_eq!(kernel.work_group_size().unwrap(), [8, 8, 1]);

    match kernel.dispatch(0, 0, 16, 16) {
        Err(Error::NotBound(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    let _binder = Binder::new(&kernel).unwrap();
    kernel.dispatch(0, 0, 17, 16).unwrap();
    assert_eq!(
        device.uniform_value(kernel.handle().raw(), "offset"),
        Some(UniformValue::Vector2i([0, 0]))
    );

    kernel.dispatch(4, 5, 16, 16).unwrap();
    assert_eq!(
        device.uniform_value(kernel.handle().raw(), "offset"),
        Some(UniformValue::Vector2i([4, 5]))
    );

    let program = kernel.handle().raw();
    assert_eq!(
        device.dispatches(),
        vec![
            DispatchCall {
                program,
                groups: [3, 2, 1],
            },
            DispatchCall {
                program,
                groups: [2, 2, 1],
            },
        ]
    );

    assert_eq!(device.barriers(), vec![Barrier::All, Barrier::All]);
}

#[test]
fn images_and_storage_require_a_bound_kernel() {
    let (device, ctx) = setup();
    let kernel = ComputeProgram::new(&ctx, KERNEL).unwrap();
    let target = Texture::new(&ctx, 4, 4).unwrap();
    target.allocate().unwrap();
    let buffer = GpuBuffer::from_slice(&ctx, &[0f32; 16]).unwrap();

    assert!(kernel.bind_image(0, &target, TextureAccess::WriteOnly).is_err());
    assert!(kernel.bind_storage(1, &buffer).is_err());
    assert!(kernel.dispatch_groups([1, 1, 1]).is_err());
    assert!(device.image_binding(0).is_none());

    let _binder = Binder::new(&kernel).unwrap();
    kernel.bind_image(0, &target, TextureAccess::WriteOnly).unwrap();
    kernel.bind_storage(1, &buffer).unwrap();
    kernel.dispatch_groups([1, 2, 3]).unwrap();
    kernel.memory_barrier(Barrier::ShaderStorage).unwrap();

    assert_eq!(device.image_binding(0).map(|v| v.0), Some(target.handle().raw()));
    assert_eq!(
        device.storage_binding(BufferTarget::ShaderStorage, 1),
        buffer.handle().raw()
    );
    assert_eq!(device.dispatches()[0].groups, [1, 2, 3]);
    assert_eq!(device.barriers(), vec![Barrier::ShaderStorage]);
}

#[test]
fn compute_defaults_and_limits() {
    let (device, ctx) = setup();
    let mut kernel = ComputeProgram::new(&ctx, "#version 430\nvoid main() {}\n").unwrap();
    assert_eq!(kernel.work_group_size().unwrap(), [1, 1, 1]);

    device.set_max_work_group_size([512, 512, 32]);
    assert_eq!(
        ComputeProgram::max_work_group_size(&ctx).unwrap(),
        [512, 512, 32]
    );

    kernel.attach(KERNEL).unwrap();
    assert_eq!(kernel.work_group_size().unwrap(), [8, 8, 1]);
    assert_eq!(device.live(ObjectKind::Shader(ShaderStage::Compute)), 1);

    assert!(kernel.attach("#error nope\n").is_err());
    match kernel.work_group_size() {
        Err(Error::NotLinked) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn shader_files() {
    let path = std::env::temp_dir().join("pigment-shader-files.glsl");
    fs::write(&path, FS_FLAT).unwrap();
    assert_eq!(read_shader_file(&path).unwrap(), FS_FLAT);
    fs::remove_file(&path).unwrap();

    match read_shader_file(&path) {
        Err(Error::Io { path: p, .. }) => assert!(p.contains("pigment-shader-files")),
        other => panic!("unexpected {:?}", other),
    }
}
