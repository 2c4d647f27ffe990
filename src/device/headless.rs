//! A software stand-in for the native graphics API. It never touches a GPU, but keeps
//! enough of the native object model (names, binding slots, buffer and texture bytes,
//! framebuffer attachments, program link state) to observe what the resources do.
//!
//! `HeadlessDevice` is cheap to clone and every clone shares the same state, so a test
//! can hand one clone to a `Context` and inspect the other.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::errors::*;
use crate::graphics::framebuffer::FramebufferStatus;
use crate::graphics::types::*;

use super::*;

/// A draw command recorded by `HeadlessDevice`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub program: RawHandle,
    pub vertex_array: RawHandle,
    pub framebuffer: RawHandle,
    pub viewport: [i32; 4],
    pub mode: DrawMode,
    pub first: u32,
    pub count: u32,
}

/// A compute dispatch recorded by `HeadlessDevice`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DispatchCall {
    pub program: RawHandle,
    pub groups: [u32; 3],
}

/// The description of a vertex attribute of a vertex array.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttrib {
    pub buffer: RawHandle,
    pub components: u32,
    pub data_type: DataType,
    pub enabled: bool,
}

#[derive(Debug, Default)]
struct TextureObject {
    storage: Option<TextureStorage>,
    sampler: Option<SamplerState>,
    mipmaps: bool,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct FramebufferObject {
    color: Option<RawHandle>,
    depth: Option<RawHandle>,
}

#[derive(Debug)]
struct ShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct ProgramObject {
    shaders: Vec<RawHandle>,
    linked: bool,
    compute: Option<[u32; 3]>,
    locations: HashMap<String, i32>,
    values: HashMap<i32, UniformValue>,
}

#[derive(Debug)]
enum Object {
    Texture(TextureObject),
    Buffer(Vec<u8>),
    Framebuffer(FramebufferObject),
    VertexArray(BTreeMap<u32, VertexAttrib>),
    Program(ProgramObject),
    Shader(ShaderObject),
}

impl Object {
    fn new(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Texture => Object::Texture(TextureObject::default()),
            ObjectKind::Buffer => Object::Buffer(Vec::new()),
            ObjectKind::Framebuffer => Object::Framebuffer(FramebufferObject::default()),
            ObjectKind::VertexArray => Object::VertexArray(BTreeMap::new()),
            ObjectKind::Program => Object::Program(ProgramObject::default()),
            ObjectKind::Shader(stage) => Object::Shader(ShaderObject {
                stage,
                source: String::new(),
                compiled: false,
            }),
        }
    }

    fn kind(&self) -> ObjectKind {
        match *self {
            Object::Texture(_) => ObjectKind::Texture,
            Object::Buffer(_) => ObjectKind::Buffer,
            Object::Framebuffer(_) => ObjectKind::Framebuffer,
            Object::VertexArray(_) => ObjectKind::VertexArray,
            Object::Program(_) => ObjectKind::Program,
            Object::Shader(ref v) => ObjectKind::Shader(v.stage),
        }
    }
}

#[derive(Debug)]
struct State {
    next: RawHandle,
    fail_allocations: bool,
    max_work_group_size: [u32; 3],
    objects: HashMap<RawHandle, Object>,
    allocated: HashMap<ObjectKind, usize>,
    released: HashMap<ObjectKind, usize>,
    bindings: HashMap<BindPoint, RawHandle>,
    bases: HashMap<(BufferTarget, u32), RawHandle>,
    images: HashMap<u32, (RawHandle, ImageBinding)>,
    viewport: [i32; 4],
    bind_calls: usize,
    draws: Vec<DrawCall>,
    dispatches: Vec<DispatchCall>,
    barriers: Vec<Barrier>,
    blits: Vec<[i32; 4]>,
}

impl Default for State {
    fn default() -> Self {
        State {
            next: 1,
            fail_allocations: false,
            max_work_group_size: [1024, 1024, 64],
            objects: HashMap::new(),
            allocated: HashMap::new(),
            released: HashMap::new(),
            bindings: HashMap::new(),
            bases: HashMap::new(),
            images: HashMap::new(),
            viewport: [0, 0, 0, 0],
            bind_calls: 0,
            draws: Vec::new(),
            dispatches: Vec::new(),
            barriers: Vec::new(),
            blits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessDevice {
    state: Rc<RefCell<State>>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        HeadlessDevice::default()
    }

    /// Makes every following allocation return the invalid handle `0`.
    pub fn set_fail_allocations(&self, fail: bool) {
        self.state.borrow_mut().fail_allocations = fail;
    }

    pub fn set_max_work_group_size(&self, size: [u32; 3]) {
        self.state.borrow_mut().max_work_group_size = size;
    }

    /// The number of objects of `kind` that are allocated and not yet released.
    pub fn live(&self, kind: ObjectKind) -> usize {
        let state = self.state.borrow();
        state.objects.values().filter(|v| v.kind() == kind).count()
    }

    pub fn allocated(&self, kind: ObjectKind) -> usize {
        self.state.borrow().allocated.get(&kind).cloned().unwrap_or(0)
    }

    pub fn released(&self, kind: ObjectKind) -> usize {
        self.state.borrow().released.get(&kind).cloned().unwrap_or(0)
    }

    /// The object bound at `point`, `0` if none.
    pub fn bound(&self, point: BindPoint) -> RawHandle {
        self.state.borrow().bindings.get(&point).cloned().unwrap_or(0)
    }

    /// The number of bind commands received so far.
    pub fn bind_calls(&self) -> usize {
        self.state.borrow().bind_calls
    }

    pub fn storage_binding(&self, target: BufferTarget, index: u32) -> RawHandle {
        let state = self.state.borrow();
        state.bases.get(&(target, index)).cloned().unwrap_or(0)
    }

    pub fn image_binding(&self, unit: u32) -> Option<(RawHandle, ImageBinding)> {
        self.state.borrow().images.get(&unit).cloned()
    }

    pub fn buffer_bytes(&self, id: RawHandle) -> Option<Vec<u8>> {
        match self.state.borrow().objects.get(&id) {
            Some(Object::Buffer(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn texture_bytes(&self, id: RawHandle) -> Option<Vec<u8>> {
        match self.state.borrow().objects.get(&id) {
            Some(Object::Texture(v)) => Some(v.bytes.clone()),
            _ => None,
        }
    }

    pub fn texture_sampler(&self, id: RawHandle) -> Option<SamplerState> {
        match self.state.borrow().objects.get(&id) {
            Some(Object::Texture(v)) => v.sampler,
            _ => None,
        }
    }

    pub fn texture_has_mipmaps(&self, id: RawHandle) -> bool {
        match self.state.borrow().objects.get(&id) {
            Some(Object::Texture(v)) => v.mipmaps,
            _ => false,
        }
    }

    pub fn attached_shaders(&self, program: RawHandle) -> Vec<RawHandle> {
        match self.state.borrow().objects.get(&program) {
            Some(Object::Program(v)) => v.shaders.clone(),
            _ => Vec::new(),
        }
    }

    /// The value last assigned to the uniform `name` of `program`.
    pub fn uniform_value(&self, program: RawHandle, name: &str) -> Option<UniformValue> {
        match self.state.borrow().objects.get(&program) {
            Some(Object::Program(v)) => v
                .locations
                .get(name)
                .and_then(|location| v.values.get(location))
                .cloned(),
            _ => None,
        }
    }

    pub fn vertex_attrib(&self, vao: RawHandle, location: u32) -> Option<VertexAttrib> {
        match self.state.borrow().objects.get(&vao) {
            Some(Object::VertexArray(v)) => v.get(&location).cloned(),
            _ => None,
        }
    }

    pub fn current_viewport(&self) -> [i32; 4] {
        self.state.borrow().viewport
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn dispatches(&self) -> Vec<DispatchCall> {
        self.state.borrow().dispatches.clone()
    }

    pub fn barriers(&self) -> Vec<Barrier> {
        self.state.borrow().barriers.clone()
    }

    pub fn blits(&self) -> Vec<[i32; 4]> {
        self.state.borrow().blits.clone()
    }
}

impl State {
    fn bound(&self, point: BindPoint) -> RawHandle {
        self.bindings.get(&point).cloned().unwrap_or(0)
    }

    fn buffer_mut(&mut self, target: BufferTarget) -> Result<&mut Vec<u8>> {
        let id = self.bound(BindPoint::Buffer(target));
        match self.objects.get_mut(&id) {
            Some(Object::Buffer(v)) => Ok(v),
            _ => Err(fail(format!("No buffer is bound to {:?}.", target))),
        }
    }

    fn texture(&self, id: RawHandle) -> Result<&TextureObject> {
        match self.objects.get(&id) {
            Some(Object::Texture(v)) => Ok(v),
            _ => Err(fail(format!("{} is not a texture.", id))),
        }
    }

    fn bound_texture_mut(&mut self) -> Result<&mut TextureObject> {
        let id = self.bound(BindPoint::Texture(0));
        match self.objects.get_mut(&id) {
            Some(Object::Texture(v)) => Ok(v),
            _ => Err(fail("No texture is bound on unit 0.")),
        }
    }

    fn program(&self, id: RawHandle) -> Result<&ProgramObject> {
        match self.objects.get(&id) {
            Some(Object::Program(v)) => Ok(v),
            _ => Err(fail(format!("{} is not a program.", id))),
        }
    }

    fn program_mut(&mut self, id: RawHandle) -> Result<&mut ProgramObject> {
        match self.objects.get_mut(&id) {
            Some(Object::Program(v)) => Ok(v),
            _ => Err(fail(format!("{} is not a program.", id))),
        }
    }

    fn framebuffer_status(&self, id: RawHandle) -> Result<FramebufferStatus> {
        let fbo = match self.objects.get(&id) {
            Some(Object::Framebuffer(v)) => v,
            _ => return Ok(FramebufferStatus::Complete),
        };

        if fbo.color.is_none() && fbo.depth.is_none() {
            return Ok(FramebufferStatus::MissingAttachment);
        }

        let mut dimensions = None;
        for &(attachment, depth) in [(fbo.color, false), (fbo.depth, true)].iter() {
            if let Some(id) = attachment {
                let storage = match self.texture(id)?.storage {
                    Some(v) if v.width > 0 && v.height > 0 => v,
                    _ => return Ok(FramebufferStatus::IncompleteAttachment),
                };

                if storage.internal.is_depth() != depth {
                    return Ok(FramebufferStatus::IncompleteAttachment);
                }

                if dimensions.is_some() && dimensions != Some((storage.width, storage.height)) {
                    return Ok(FramebufferStatus::MismatchedDimensions);
                }

                dimensions = Some((storage.width, storage.height));
            }
        }

        Ok(FramebufferStatus::Complete)
    }

    fn link(&mut self, id: RawHandle) -> Result<Diagnostics> {
        let shaders = self.program(id)?.shaders.clone();
        let mut sources = Vec::new();
        for v in &shaders {
            match self.objects.get(v) {
                Some(Object::Shader(shader)) => sources.push((shader.stage, shader.compiled, shader.source.clone())),
                _ => return Err(fail(format!("{} is not a shader.", v))),
            }
        }

        let diagnostics = link_diagnostics(&sources);
        let program = self.program_mut(id)?;
        program.values.clear();
        program.locations.clear();
        program.compute = None;
        program.linked = diagnostics.is_none();

        if program.linked {
            for (stage, _, source) in &sources {
                if *stage == ShaderStage::Compute {
                    program.compute = Some([
                        layout_qualifier(source, "local_size_x").unwrap_or(1),
                        layout_qualifier(source, "local_size_y").unwrap_or(1),
                        layout_qualifier(source, "local_size_z").unwrap_or(1),
                    ]);
                }

                for name in uniform_names(source) {
                    let next = program.locations.len() as i32;
                    program.locations.entry(name).or_insert(next);
                }
            }
        }

        Ok(diagnostics)
    }
}

impl Device for HeadlessDevice {
    fn create(&mut self, kind: ObjectKind) -> Result<RawHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_allocations {
            return Ok(0);
        }

        let id = state.next;
        state.next += 1;
        state.objects.insert(id, Object::new(kind));
        *state.allocated.entry(kind).or_insert(0) += 1;
        Ok(id)
    }

    fn delete(&mut self, kind: ObjectKind, id: RawHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.objects.get(&id) {
            Some(v) if v.kind() == kind => {}
            _ => return Err(fail(format!("{:?} {} is not alive.", kind, id))),
        }

        state.objects.remove(&id);
        *state.released.entry(kind).or_insert(0) += 1;

        // Deleting a bound object reverts its binding to the default object.
        for v in state.bindings.values_mut() {
            if *v == id {
                *v = 0;
            }
        }

        Ok(())
    }

    fn current(&mut self, point: BindPoint) -> Result<RawHandle> {
        Ok(self.state.borrow().bound(point))
    }

    fn bind(&mut self, point: BindPoint, id: RawHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.bind_calls += 1;

        if id != 0 {
            let kind = state.objects.get(&id).map(|v| v.kind());
            let expected = match point {
                BindPoint::Texture(_) => ObjectKind::Texture,
                BindPoint::Buffer(_) => ObjectKind::Buffer,
                BindPoint::Program => ObjectKind::Program,
                BindPoint::Framebuffer => ObjectKind::Framebuffer,
                BindPoint::VertexArray => ObjectKind::VertexArray,
            };

            if kind != Some(expected) {
                return Err(fail(format!("{} can not be bound to {:?}.", id, point)));
            }

            if point == BindPoint::Program && !state.program(id)?.linked {
                return Err(fail(format!("Program {} has not been linked.", id)));
            }
        }

        state.bindings.insert(point, id);
        Ok(())
    }

    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, id: RawHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.objects.get(&id) {
            Some(Object::Buffer(_)) => {}
            _ => return Err(fail(format!("{} is not a buffer.", id))),
        }

        state.bases.insert((target, index), id);
        state.bindings.insert(BindPoint::Buffer(target), id);
        Ok(())
    }

    fn buffer_data(
        &mut self,
        target: BufferTarget,
        data: Option<&[u8]>,
        size: usize,
        _: Usage,
    ) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let buf = state.buffer_mut(target)?;
        match data {
            Some(v) if v.len() < size => {
                return Err(fail("Buffer data is smaller than the requested size."));
            }
            Some(v) => *buf = v[..size].to_vec(),
            None => *buf = vec![0; size],
        }

        Ok(())
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let buf = state.buffer_mut(target)?;
        if offset + data.len() > buf.len() {
            return Err(fail("Buffer sub data out of bounds."));
        }

        buf[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn buffer_size(&mut self, target: BufferTarget) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        Ok(state.buffer_mut(target)?.len())
    }

    fn write_mapped(&mut self, target: BufferTarget, src: &[u8]) -> Result<()> {
        self.buffer_sub_data(target, 0, src)
    }

    fn read_mapped(&mut self, target: BufferTarget, dst: &mut [u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let buf = state.buffer_mut(target)?;
        if dst.len() > buf.len() {
            return Err(fail("Buffer read out of bounds."));
        }

        dst.copy_from_slice(&buf[..dst.len()]);
        Ok(())
    }

    fn copy_buffer(&mut self, size: usize) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let src = state.buffer_mut(BufferTarget::CopyRead)?;
        if size > src.len() {
            return Err(fail("Buffer copy reads out of bounds."));
        }

        let bytes = src[..size].to_vec();
        let dst = state.buffer_mut(BufferTarget::CopyWrite)?;
        if size > dst.len() {
            return Err(fail("Buffer copy writes out of bounds."));
        }

        dst[..size].copy_from_slice(&bytes);
        Ok(())
    }

    fn tex_image(&mut self, storage: &TextureStorage, data: Option<&[u8]>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let texture = state.bound_texture_mut()?;
        let len = storage.len();

        texture.bytes = match data {
            Some(v) if v.len() != len => {
                return Err(fail(format!("Expects {} bytes of texels, got {}.", len, v.len())));
            }
            Some(v) => v.to_vec(),
            None => vec![0; len],
        };

        texture.storage = Some(*storage);
        texture.mipmaps = false;
        Ok(())
    }

    fn tex_sampler(&mut self, sampler: &SamplerState) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.bound_texture_mut()?.sampler = Some(*sampler);
        Ok(())
    }

    fn generate_mipmap(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let texture = state.bound_texture_mut()?;
        if texture.storage.is_none() {
            return Err(fail("Can not generate mipmaps without storage."));
        }

        texture.mipmaps = true;
        Ok(())
    }

    fn get_tex_image(&mut self, format: PixelFormat, tp: DataType, dst: &mut [u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let texture = state.bound_texture_mut()?;
        let storage = texture
            .storage
            .ok_or_else(|| fail("Can not read back a texture without storage."))?;

        if storage.format != format || storage.data_type != tp {
            return Err(fail("Pixel conversions are not supported."));
        }

        if dst.len() != texture.bytes.len() {
            return Err(fail("Read back buffer size mismatch."));
        }

        dst.copy_from_slice(&texture.bytes);
        Ok(())
    }

    fn bind_image_texture(&mut self, id: RawHandle, binding: &ImageBinding) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.texture(id)?;
        state.images.insert(binding.unit, (id, *binding));
        Ok(())
    }

    fn copy_image(&mut self, src: RawHandle, dst: RawHandle, width: u32, height: u32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let (from, bytes) = {
            let v = state.texture(src)?;
            (v.storage.ok_or_else(|| fail("Source has no storage."))?, v.bytes.clone())
        };

        let texture = match state.objects.get_mut(&dst) {
            Some(Object::Texture(v)) => v,
            _ => return Err(fail(format!("{} is not a texture.", dst))),
        };

        let to = texture.storage.ok_or_else(|| fail("Destination has no storage."))?;
        let pixel = from.format.pixel_size(from.data_type);
        if pixel != to.format.pixel_size(to.data_type) {
            return Err(fail("Incompatible texel sizes."));
        }

        if width > from.width.min(to.width) || height > from.height.min(to.height) {
            return Err(fail("Image copy out of bounds."));
        }

        let row = width as usize * pixel;
        for y in 0..height as usize {
            let s = y * from.width as usize * pixel;
            let d = y * to.width as usize * pixel;
            texture.bytes[d..d + row].copy_from_slice(&bytes[s..s + row]);
        }

        Ok(())
    }

    fn framebuffer_texture(&mut self, attachment: Attachment, id: RawHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if id != 0 {
            state.texture(id)?;
        }

        let fbo = state.bound(BindPoint::Framebuffer);
        let fbo = match state.objects.get_mut(&fbo) {
            Some(Object::Framebuffer(v)) => v,
            _ => return Err(fail("No framebuffer is bound.")),
        };

        let id = if id == 0 { None } else { Some(id) };
        match attachment {
            Attachment::Color(0) => fbo.color = id,
            Attachment::Depth => fbo.depth = id,
            Attachment::Color(_) => return Err(fail("Too many color attachments.")),
        }

        Ok(())
    }

    fn framebuffer_status(&mut self) -> Result<FramebufferStatus> {
        let state = self.state.borrow();
        state.framebuffer_status(state.bound(BindPoint::Framebuffer))
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.state.borrow_mut().viewport = [x, y, width as i32, height as i32];
        Ok(())
    }

    fn blit_to_default(&mut self, _: (u32, u32), dst: [i32; 4]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.bound(BindPoint::Framebuffer) == 0 {
            return Err(fail("No framebuffer is bound as blit source."));
        }

        state.blits.push(dst);
        Ok(())
    }

    fn vertex_attrib_pointer(&mut self, location: u32, components: u32, tp: DataType) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let buffer = state.bound(BindPoint::Buffer(BufferTarget::Array));
        if buffer == 0 {
            return Err(fail("No array buffer is bound."));
        }

        let vao = state.bound(BindPoint::VertexArray);
        match state.objects.get_mut(&vao) {
            Some(Object::VertexArray(v)) => {
                let enabled = v.get(&location).map(|a| a.enabled).unwrap_or(false);
                v.insert(
                    location,
                    VertexAttrib {
                        buffer,
                        components,
                        data_type: tp,
                        enabled,
                    },
                );

                Ok(())
            }
            _ => Err(fail("No vertex array is bound.")),
        }
    }

    fn enable_vertex_attrib(&mut self, location: u32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let vao = state.bound(BindPoint::VertexArray);
        match state.objects.get_mut(&vao) {
            Some(Object::VertexArray(v)) => match v.get_mut(&location) {
                Some(attrib) => {
                    attrib.enabled = true;
                    Ok(())
                }
                None => Err(fail(format!("Attribute {} has not been described.", location))),
            },
            _ => Err(fail("No vertex array is bound.")),
        }
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: u32, count: u32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let program = state.bound(BindPoint::Program);
        let vertex_array = state.bound(BindPoint::VertexArray);
        if program == 0 || vertex_array == 0 {
            return Err(fail("Drawing requires a bound program and vertex array."));
        }

        let framebuffer = state.bound(BindPoint::Framebuffer);
        if state.framebuffer_status(framebuffer)? != FramebufferStatus::Complete {
            return Err(fail("Drawing into an incomplete framebuffer."));
        }

        let viewport = state.viewport;
        state.draws.push(DrawCall {
            program,
            vertex_array,
            framebuffer,
            viewport,
            mode,
            first,
            count,
        });

        Ok(())
    }

    fn compile_shader(&mut self, shader: RawHandle, source: &str) -> Result<Diagnostics> {
        let mut state = self.state.borrow_mut();
        let shader = match state.objects.get_mut(&shader) {
            Some(Object::Shader(v)) => v,
            _ => return Err(fail(format!("{} is not a shader.", shader))),
        };

        shader.source = source.to_owned();
        shader.compiled = false;

        for (i, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.starts_with("#error") {
                return Ok(Some(format!("0:{}: error: {}", i + 1, line)));
            }
        }

        shader.compiled = true;
        Ok(None)
    }

    fn attach_shader(&mut self, program: RawHandle, shader: RawHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.objects.get(&shader) {
            Some(Object::Shader(_)) => {}
            _ => return Err(fail(format!("{} is not a shader.", shader))),
        }

        let program = state.program_mut(program)?;
        if program.shaders.contains(&shader) {
            return Err(fail(format!("Shader {} is already attached.", shader)));
        }

        program.shaders.push(shader);
        Ok(())
    }

    fn detach_shader(&mut self, program: RawHandle, shader: RawHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let program = state.program_mut(program)?;
        let len = program.shaders.len();
        program.shaders.retain(|v| *v != shader);
        if program.shaders.len() == len {
            return Err(fail(format!("Shader {} is not attached.", shader)));
        }

        Ok(())
    }

    fn link_program(&mut self, program: RawHandle) -> Result<Diagnostics> {
        self.state.borrow_mut().link(program)
    }

    fn uniform_location(&mut self, program: RawHandle, name: &str) -> Result<Option<i32>> {
        let state = self.state.borrow();
        Ok(state.program(program)?.locations.get(name).cloned())
    }

    fn uniform(&mut self, location: i32, value: &UniformValue) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let current = state.bound(BindPoint::Program);
        if current == 0 {
            return Err(fail("No program is bound."));
        }

        state.program_mut(current)?.values.insert(location, *value);
        Ok(())
    }

    fn work_group_size(&mut self, program: RawHandle) -> Result<[u32; 3]> {
        let state = self.state.borrow();
        state
            .program(program)?
            .compute
            .ok_or_else(|| fail(format!("Program {} is not a linked compute program.", program)))
    }

    fn max_work_group_size(&mut self) -> Result<[u32; 3]> {
        Ok(self.state.borrow().max_work_group_size)
    }

    fn dispatch_compute(&mut self, groups: [u32; 3]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let program = state.bound(BindPoint::Program);
        if program == 0 || state.program(program)?.compute.is_none() {
            return Err(fail("Dispatching without a bound compute program."));
        }

        state.dispatches.push(DispatchCall { program, groups });
        Ok(())
    }

    fn memory_barrier(&mut self, barrier: Barrier) -> Result<()> {
        self.state.borrow_mut().barriers.push(barrier);
        Ok(())
    }
}

fn fail<T: AsRef<str>>(msg: T) -> Error {
    Error::Device(format!("[Headless] {}", msg.as_ref()))
}

fn link_diagnostics(sources: &[(ShaderStage, bool, String)]) -> Diagnostics {
    if sources.is_empty() {
        return Some("error: no shaders attached.".to_owned());
    }

    let compute = sources.iter().any(|v| v.0 == ShaderStage::Compute);
    if compute && sources.len() > 1 {
        return Some("error: compute shaders can not be linked with other stages.".to_owned());
    }

    for (stage, compiled, source) in sources {
        if !compiled {
            return Some(format!("error: {:?} shader has not been compiled.", stage));
        }

        if !source.contains("main") {
            return Some(format!("error: missing main function in {:?} shader.", stage));
        }
    }

    None
}

/// Finds the value of `key = N` in a layout qualifier.
fn layout_qualifier(source: &str, key: &str) -> Option<u32> {
    let start = source.find(key)? + key.len();
    let rest = source[start..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| rest.len());
    rest[..end].parse().ok()
}

/// Collects the names of the uniforms declared in `source`.
fn uniform_names(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in source.lines() {
        let line = match line.find("//") {
            Some(i) => &line[..i],
            None => line,
        };

        let mut tokens = line.split_whitespace();
        if !tokens.any(|v| v == "uniform") {
            continue;
        }

        let decl = tokens.collect::<Vec<_>>().join(" ");
        let decl = decl.split(';').next().unwrap_or("");
        let decl = decl.split('=').next().unwrap_or("");
        if let Some(name) = decl.split_whitespace().last() {
            let name = name.split('[').next().unwrap_or(name);
            names.push(name.to_owned());
        }
    }

    names
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout() {
        let src = "layout(local_size_x = 8, local_size_y=4) in;";
        assert_eq!(layout_qualifier(src, "local_size_x"), Some(8));
        assert_eq!(layout_qualifier(src, "local_size_y"), Some(4));
        assert_eq!(layout_qualifier(src, "local_size_z"), None);
    }

    #[test]
    fn uniforms() {
        let src = r"
            uniform vec3 color;
            layout(rgba32f, binding = 0) uniform image2D img;
            uniform float weights[4];
            // uniform int ignored;
            in vec3 position;
        ";

        assert_eq!(uniform_names(src), vec!["color", "img", "weights"]);
    }
}
