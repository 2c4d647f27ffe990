use std::ffi::{CStr, CString};
use std::os::raw::c_void;
use std::ptr;

use ::gl;
use ::gl::types::*;

use crate::device::*;
use crate::errors::*;
use crate::graphics::framebuffer::FramebufferStatus;
use crate::graphics::types::*;

use super::capabilities::Capabilities;
use super::types;

pub struct GLDevice {
    capabilities: Capabilities,
}

impl GLDevice {
    /// Creates a driver for the context current on this thread. The function pointers
    /// must have been loaded already.
    pub unsafe fn new() -> Result<Self> {
        let capabilities = Capabilities::parse()?;
        info!("GLDevice {:#?}", capabilities);
        capabilities.check()?;
        Ok(GLDevice { capabilities })
    }

    /// Loads the function pointers with `loader` and creates a driver. If `debug` is
    /// set, driver messages of medium and high severity are forwarded to `log`.
    pub unsafe fn load<F>(loader: F, debug: bool) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        gl::load_with(loader);
        let device = GLDevice::new()?;

        if debug {
            if device.capabilities.has_debug_output() {
                gl::Enable(gl::DEBUG_OUTPUT);
                gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
                gl::DebugMessageCallback(Some(debug_callback), ptr::null());
                check()?;
            } else {
                warn!("Debug output is not supported by this context.");
            }
        }

        Ok(device)
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

impl Device for GLDevice {
    fn create(&mut self, kind: ObjectKind) -> Result<RawHandle> {
        unsafe {
            let mut id = 0;
            match kind {
                ObjectKind::Texture => gl::GenTextures(1, &mut id),
                ObjectKind::Buffer => gl::GenBuffers(1, &mut id),
                ObjectKind::Framebuffer => gl::GenFramebuffers(1, &mut id),
                ObjectKind::VertexArray => gl::GenVertexArrays(1, &mut id),
                ObjectKind::Program => id = gl::CreateProgram(),
                ObjectKind::Shader(stage) => id = gl::CreateShader(stage.into()),
            }

            check()?;
            Ok(id)
        }
    }

    fn delete(&mut self, kind: ObjectKind, id: RawHandle) -> Result<()> {
        unsafe {
            match kind {
                ObjectKind::Texture => gl::DeleteTextures(1, &id),
                ObjectKind::Buffer => gl::DeleteBuffers(1, &id),
                ObjectKind::Framebuffer => gl::DeleteFramebuffers(1, &id),
                ObjectKind::VertexArray => gl::DeleteVertexArrays(1, &id),
                ObjectKind::Program => gl::DeleteProgram(id),
                ObjectKind::Shader(_) => gl::DeleteShader(id),
            }

            check()
        }
    }

    fn current(&mut self, point: BindPoint) -> Result<RawHandle> {
        unsafe {
            let mut id = 0;
            match point {
                BindPoint::Texture(unit) => {
                    gl::ActiveTexture(gl::TEXTURE0 + unit);
                    gl::GetIntegerv(gl::TEXTURE_BINDING_2D, &mut id);
                    gl::ActiveTexture(gl::TEXTURE0);
                }
                BindPoint::Buffer(target) => {
                    gl::GetIntegerv(types::buffer_binding(target), &mut id)
                }
                BindPoint::Program => gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut id),
                BindPoint::Framebuffer => gl::GetIntegerv(gl::FRAMEBUFFER_BINDING, &mut id),
                BindPoint::VertexArray => gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut id),
            }

            check()?;
            Ok(id as RawHandle)
        }
    }

    fn bind(&mut self, point: BindPoint, id: RawHandle) -> Result<()> {
        unsafe {
            match point {
                BindPoint::Texture(unit) => {
                    gl::ActiveTexture(gl::TEXTURE0 + unit);
                    gl::BindTexture(gl::TEXTURE_2D, id);
                    gl::ActiveTexture(gl::TEXTURE0);
                }
                BindPoint::Buffer(target) => gl::BindBuffer(target.into(), id),
                BindPoint::Program => gl::UseProgram(id),
                BindPoint::Framebuffer => gl::BindFramebuffer(gl::FRAMEBUFFER, id),
                BindPoint::VertexArray => gl::BindVertexArray(id),
            }

            check()
        }
    }

    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, id: RawHandle) -> Result<()> {
        unsafe {
            gl::BindBufferBase(target.into(), index, id);
            check()
        }
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        data: Option<&[u8]>,
        size: usize,
        usage: Usage,
    ) -> Result<()> {
        let ptr = match data {
            Some(v) if v.len() < size => {
                return Err(Error::Device("[GL] Buffer data is smaller than the requested size.".into()));
            }
            Some(v) => v.as_ptr() as *const c_void,
            None => ptr::null(),
        };

        unsafe {
            gl::BufferData(target.into(), size as GLsizeiptr, ptr, usage.into());
            check()
        }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) -> Result<()> {
        unsafe {
            gl::BufferSubData(
                target.into(),
                offset as GLintptr,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
            );

            check()
        }
    }

    fn buffer_size(&mut self, target: BufferTarget) -> Result<usize> {
        unsafe {
            let mut size = 0;
            gl::GetBufferParameteriv(target.into(), gl::BUFFER_SIZE, &mut size);
            check()?;
            Ok(size as usize)
        }
    }

    fn write_mapped(&mut self, target: BufferTarget, src: &[u8]) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }

        unsafe {
            let dst = gl::MapBufferRange(
                target.into(),
                0,
                src.len() as GLsizeiptr,
                gl::MAP_WRITE_BIT,
            );

            check()?;
            if dst.is_null() {
                return Err(Error::Device("[GL] Failed to map buffer for writing.".into()));
            }

            ptr::copy_nonoverlapping(src.as_ptr(), dst as *mut u8, src.len());
            gl::UnmapBuffer(target.into());
            check()
        }
    }

    fn read_mapped(&mut self, target: BufferTarget, dst: &mut [u8]) -> Result<()> {
        if dst.is_empty() {
            return Ok(());
        }

        unsafe {
            let src = gl::MapBufferRange(
                target.into(),
                0,
                dst.len() as GLsizeiptr,
                gl::MAP_READ_BIT,
            );

            check()?;
            if src.is_null() {
                return Err(Error::Device("[GL] Failed to map buffer for reading.".into()));
            }

            ptr::copy_nonoverlapping(src as *const u8, dst.as_mut_ptr(), dst.len());
            gl::UnmapBuffer(target.into());
            check()
        }
    }

    fn copy_buffer(&mut self, size: usize) -> Result<()> {
        unsafe {
            gl::CopyBufferSubData(
                gl::COPY_READ_BUFFER,
                gl::COPY_WRITE_BUFFER,
                0,
                0,
                size as GLsizeiptr,
            );

            check()
        }
    }

    fn tex_image(&mut self, storage: &TextureStorage, data: Option<&[u8]>) -> Result<()> {
        let ptr = match data {
            Some(v) if v.len() != storage.len() => {
                return Err(Error::SizeMismatch {
                    expected: storage.len(),
                    actual: v.len(),
                });
            }
            Some(v) => v.as_ptr() as *const c_void,
            None => ptr::null(),
        };

        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                storage.level,
                GLenum::from(storage.internal) as GLint,
                storage.width as GLsizei,
                storage.height as GLsizei,
                0,
                storage.format.into(),
                storage.data_type.into(),
                ptr,
            );

            check()
        }
    }

    fn tex_sampler(&mut self, sampler: &SamplerState) -> Result<()> {
        unsafe {
            let wrap = GLenum::from(sampler.wrap) as GLint;
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap);

            let min = GLenum::from(sampler.min_filter) as GLint;
            let mag = GLenum::from(sampler.mag_filter) as GLint;
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag);

            if self.capabilities.has_anisotropy() {
                gl::TexParameterf(
                    gl::TEXTURE_2D,
                    types::TEXTURE_MAX_ANISOTROPY,
                    sampler.max_anisotropy,
                );
            }

            check()
        }
    }

    fn generate_mipmap(&mut self) -> Result<()> {
        unsafe {
            gl::GenerateMipmap(gl::TEXTURE_2D);
            check()
        }
    }

    fn get_tex_image(&mut self, format: PixelFormat, tp: DataType, dst: &mut [u8]) -> Result<()> {
        unsafe {
            let mut width = 0;
            let mut height = 0;
            gl::GetTexLevelParameteriv(gl::TEXTURE_2D, 0, gl::TEXTURE_WIDTH, &mut width);
            gl::GetTexLevelParameteriv(gl::TEXTURE_2D, 0, gl::TEXTURE_HEIGHT, &mut height);

            let expected = width as usize * height as usize * format.pixel_size(tp);
            if expected != dst.len() {
                return Err(Error::SizeMismatch {
                    expected,
                    actual: dst.len(),
                });
            }

            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::GetTexImage(
                gl::TEXTURE_2D,
                0,
                format.into(),
                tp.into(),
                dst.as_mut_ptr() as *mut c_void,
            );

            check()
        }
    }

    fn bind_image_texture(&mut self, id: RawHandle, binding: &ImageBinding) -> Result<()> {
        unsafe {
            gl::BindImageTexture(
                binding.unit,
                id,
                binding.level,
                if binding.layered { gl::TRUE } else { gl::FALSE },
                binding.layer,
                binding.access.into(),
                binding.format.into(),
            );

            check()
        }
    }

    fn copy_image(&mut self, src: RawHandle, dst: RawHandle, width: u32, height: u32) -> Result<()> {
        unsafe {
            gl::CopyImageSubData(
                src,
                gl::TEXTURE_2D,
                0,
                0,
                0,
                0,
                dst,
                gl::TEXTURE_2D,
                0,
                0,
                0,
                0,
                width as GLsizei,
                height as GLsizei,
                1,
            );

            check()
        }
    }

    fn framebuffer_texture(&mut self, attachment: Attachment, id: RawHandle) -> Result<()> {
        unsafe {
            gl::FramebufferTexture2D(gl::FRAMEBUFFER, attachment.into(), gl::TEXTURE_2D, id, 0);
            check()
        }
    }

    fn framebuffer_status(&mut self) -> Result<FramebufferStatus> {
        unsafe {
            let status = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);
            check()?;
            Ok(types::framebuffer_status(status))
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        unsafe {
            gl::Viewport(x, y, width as GLsizei, height as GLsizei);
            check()
        }
    }

    fn blit_to_default(&mut self, src: (u32, u32), dst: [i32; 4]) -> Result<()> {
        let fbo = self.current(BindPoint::Framebuffer)?;
        if fbo == 0 {
            return Err(Error::Device("[GL] No framebuffer is bound as blit source.".into()));
        }

        unsafe {
            gl::BindFramebuffer(gl::READ_FRAMEBUFFER, fbo);
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, 0);
            gl::ReadBuffer(gl::COLOR_ATTACHMENT0);
            gl::BlitFramebuffer(
                0,
                0,
                src.0 as GLint,
                src.1 as GLint,
                dst[0],
                dst[1],
                dst[0] + dst[2],
                dst[1] + dst[3],
                gl::COLOR_BUFFER_BIT,
                gl::LINEAR,
            );

            gl::BindFramebuffer(gl::FRAMEBUFFER, fbo);
            check()
        }
    }

    fn vertex_attrib_pointer(&mut self, location: u32, components: u32, tp: DataType) -> Result<()> {
        unsafe {
            gl::VertexAttribPointer(
                location,
                components as GLint,
                tp.into(),
                gl::FALSE,
                0,
                ptr::null(),
            );

            check()
        }
    }

    fn enable_vertex_attrib(&mut self, location: u32) -> Result<()> {
        unsafe {
            gl::EnableVertexAttribArray(location);
            check()
        }
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) -> Result<()> {
        unsafe {
            gl::DrawArrays(mode.into(), first as GLint, count as GLsizei);
            check()
        }
    }

    fn compile_shader(&mut self, shader: RawHandle, source: &str) -> Result<Diagnostics> {
        let c_str = CString::new(source.as_bytes())
            .map_err(|_| Error::InvalidArgument("shader source contains a nul byte".into()))?;

        unsafe {
            gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
            gl::CompileShader(shader);

            let mut status = GLint::from(gl::FALSE);
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
            check()?;

            if status == GLint::from(gl::TRUE) {
                return Ok(None);
            }

            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
            Ok(Some(info_log(&buf)))
        }
    }

    fn attach_shader(&mut self, program: RawHandle, shader: RawHandle) -> Result<()> {
        unsafe {
            gl::AttachShader(program, shader);
            check()
        }
    }

    fn detach_shader(&mut self, program: RawHandle, shader: RawHandle) -> Result<()> {
        unsafe {
            gl::DetachShader(program, shader);
            check()
        }
    }

    fn link_program(&mut self, program: RawHandle) -> Result<Diagnostics> {
        unsafe {
            gl::LinkProgram(program);

            let mut status = GLint::from(gl::FALSE);
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
            check()?;

            if status == GLint::from(gl::TRUE) {
                return Ok(None);
            }

            let mut len = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf.as_mut_ptr() as *mut GLchar);
            Ok(Some(info_log(&buf)))
        }
    }

    fn uniform_location(&mut self, program: RawHandle, name: &str) -> Result<Option<i32>> {
        let c_name = CString::new(name.as_bytes())
            .map_err(|_| Error::InvalidArgument(format!("uniform name {:?}", name)))?;

        unsafe {
            let location = gl::GetUniformLocation(program, c_name.as_ptr());
            check()?;

            if location < 0 {
                Ok(None)
            } else {
                Ok(Some(location))
            }
        }
    }

    fn uniform(&mut self, location: i32, value: &UniformValue) -> Result<()> {
        unsafe {
            match *value {
                UniformValue::I32(v) => gl::Uniform1i(location, v),
                UniformValue::U32(v) => gl::Uniform1ui(location, v),
                UniformValue::F32(v) => gl::Uniform1f(location, v),
                UniformValue::Vector2i(v) => gl::Uniform2i(location, v[0], v[1]),
                UniformValue::Vector3i(v) => gl::Uniform3i(location, v[0], v[1], v[2]),
                UniformValue::Vector4i(v) => gl::Uniform4i(location, v[0], v[1], v[2], v[3]),
                UniformValue::Vector2f(v) => gl::Uniform2f(location, v[0], v[1]),
                UniformValue::Vector3f(v) => gl::Uniform3f(location, v[0], v[1], v[2]),
                UniformValue::Vector4f(v) => gl::Uniform4f(location, v[0], v[1], v[2], v[3]),
                UniformValue::Matrix3f(ref v, transpose) => gl::UniformMatrix3fv(
                    location,
                    1,
                    if transpose { gl::TRUE } else { gl::FALSE },
                    v.as_ptr() as *const GLfloat,
                ),
                UniformValue::Matrix4f(ref v, transpose) => gl::UniformMatrix4fv(
                    location,
                    1,
                    if transpose { gl::TRUE } else { gl::FALSE },
                    v.as_ptr() as *const GLfloat,
                ),
            }

            check()
        }
    }

    fn work_group_size(&mut self, program: RawHandle) -> Result<[u32; 3]> {
        unsafe {
            let mut size: [GLint; 3] = [0; 3];
            gl::GetProgramiv(program, gl::COMPUTE_WORK_GROUP_SIZE, size.as_mut_ptr());
            check()?;
            Ok([size[0] as u32, size[1] as u32, size[2] as u32])
        }
    }

    fn max_work_group_size(&mut self) -> Result<[u32; 3]> {
        Ok(self.capabilities.max_work_group_size)
    }

    fn dispatch_compute(&mut self, groups: [u32; 3]) -> Result<()> {
        unsafe {
            gl::DispatchCompute(groups[0], groups[1], groups[2]);
            check()
        }
    }

    fn memory_barrier(&mut self, barrier: Barrier) -> Result<()> {
        unsafe {
            gl::MemoryBarrier(barrier.into());
            check()
        }
    }
}

fn info_log(buf: &[u8]) -> String {
    let end = buf.iter().position(|v| *v == 0).unwrap_or_else(|| buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

extern "system" fn debug_callback(
    _: GLenum,
    tp: GLenum,
    id: GLuint,
    severity: GLenum,
    _: GLsizei,
    message: *const GLchar,
    _: *mut c_void,
) {
    if message.is_null() {
        return;
    }

    let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    match severity {
        gl::DEBUG_SEVERITY_HIGH => error!("[GL] {} (type {:#x}, id {})", message, tp, id),
        gl::DEBUG_SEVERITY_MEDIUM => warn!("[GL] {} (type {:#x}, id {})", message, tp, id),
        _ => {}
    }
}

unsafe fn check() -> Result<()> {
    let msg = match gl::GetError() {
        gl::NO_ERROR => return Ok(()),
        gl::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.".to_owned(),
        gl::INVALID_VALUE => "A numeric argument is out of range.".to_owned(),
        gl::INVALID_OPERATION => "The specified operation is not allowed in the current state.".to_owned(),
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "The command is trying to render to or read from a framebuffer that is not complete."
                .to_owned()
        }
        gl::OUT_OF_MEMORY => "There is not enough memory left to execute the command.".to_owned(),
        v => format!("Unknown OpenGL error {:#x}.", v),
    };

    Err(Error::Device(format!("[GL] {}", msg)))
}
