//! Runs against a real OpenGL 4.3 context. Needs a display:
//!
//! `cargo test --features glutin -- --ignored`
#![cfg(feature = "glutin")]

extern crate approx;
extern crate env_logger;
extern crate pigment;

use approx::assert_relative_eq;

use pigment::prelude::*;

const VS: &str = r"
#version 430
layout(location = 0) in vec2 position;
void main() { gl_Position = vec4(position, 0.0, 1.0); }
";

const FS: &str = r"
#version 430
uniform vec3 color;
out vec3 frag;
void main() { frag = color; }
";

#[test]
#[ignore]
fn triangle_covers_the_target() {
    let _ = env_logger::try_init();

    let mut settings = Settings::default();
    settings.window.visible = false;
    settings.window.width = 64;
    settings.window.height = 64;

    let window = Window::new(&settings).unwrap();
    let ctx = window.context().clone();

    let target = Rc::new(Texture::new(&ctx, 4, 4).unwrap());
    target.upload(&[0.5f32; 4 * 4 * 3]).unwrap();

    let mut fbo = Framebuffer::new(&ctx).unwrap();
    assert_eq!(
        fbo.attach_texture(target.clone()).unwrap(),
        FramebufferStatus::Complete
    );

    let program = RenderProgram::from_sources(&ctx, VS, FS).unwrap();

    let vbo = Rc::new(VertexBuffer::new(&ctx, Usage::StaticDraw).unwrap());
    vbo.create_vectors(&[[-1.0f32, -1.0], [3.0, -1.0], [-1.0, 3.0]])
        .unwrap();
    let mut vao = VertexArray::new(&ctx).unwrap();
    vao.add_vertex_buffer(0, vbo).unwrap();

    {
        let _fbo = Binder::new(&fbo).unwrap();
        let _program = Binder::new(&program).unwrap();
        program.set("color", [0.25f32, 0.5, 1.0]).unwrap();

        let _vao = Binder::new(&vao).unwrap();
        vao.render(DrawMode::Triangles, 0, 3).unwrap();
    }

    let mut texels = [0f32; 4 * 4 * 3];
    target.download(&mut texels).unwrap();
    for texel in texels.chunks(3) {
        assert_relative_eq!(texel[0], 0.25);
        assert_relative_eq!(texel[1], 0.5);
        assert_relative_eq!(texel[2], 1.0);
    }
}
