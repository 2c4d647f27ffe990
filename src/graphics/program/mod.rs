//! Shader programs.
//!
//! `Program` owns the native program and the shader stages linked into it, and drives
//! the `Empty -> Linked | Rejected` state machine. `RenderProgram` and `ComputeProgram`
//! add the stage management and commands of each pipeline, and share the uniform
//! protocol through the `Uniforms` trait.
//!
//! Every uniform, sampler, image or storage binding call requires the program to be
//! the currently bound one, and fails with `Error::NotBound` otherwise.

pub mod compute;
pub mod pipeline;

pub use self::compute::ComputeProgram;
pub use self::pipeline::RenderProgram;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use cgmath::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

use crate::device::{BindPoint, ObjectKind, ShaderStage, UniformValue};
use crate::errors::*;

use super::binder::Bind;
use super::context::Context;
use super::handle::{Handle, Resource};
use super::texture::Texture;

/// The link state of a program.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProgramState {
    /// Nothing has been linked yet.
    Empty,
    Linked,
    /// The last compilation or link failed. The program can not be bound until a stage
    /// is attached successfully.
    Rejected,
}

#[derive(Debug)]
struct Stage {
    shader: Resource,
    source: String,
}

#[derive(Debug)]
pub struct Program {
    stages: BTreeMap<ShaderStage, Stage>,
    res: Resource,
    state: ProgramState,
    locations: RefCell<HashMap<String, Option<i32>>>,
    missing: RefCell<HashSet<String>>,
}

impl Program {
    pub fn new(ctx: &Context) -> Result<Self> {
        Ok(Program {
            stages: BTreeMap::new(),
            res: Resource::new(ctx, ObjectKind::Program)?,
            state: ProgramState::Empty,
            locations: RefCell::new(HashMap::new()),
            missing: RefCell::new(HashSet::new()),
        })
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.res.handle()
    }

    #[inline]
    pub fn context(&self) -> &Context {
        self.res.context()
    }

    #[inline]
    pub fn state(&self) -> ProgramState {
        self.state
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.state == ProgramState::Linked
    }

    /// The shader currently attached for `stage`.
    pub fn stage(&self, stage: ShaderStage) -> Option<Handle> {
        self.stages.get(&stage).map(|v| v.shader.handle())
    }

    pub fn stages(&self) -> impl Iterator<Item = ShaderStage> + '_ {
        self.stages.keys().cloned()
    }

    /// Compiles `source` as `stage`, attaches it in place of the previous shader of the
    /// same stage and relinks the program.
    ///
    /// An empty source is refused without touching the program. A compile or link
    /// failure leaves the program `Rejected` and unbound, and returns the native log
    /// along with the sources involved.
    pub fn attach(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        if source.trim().is_empty() {
            return Err(Error::EmptySource(stage));
        }

        let program = self.res.raw();
        if let Some(old) = self.stages.remove(&stage) {
            let id = old.shader.raw();
            self.context().with(|dev| dev.detach_shader(program, id))?;
        }

        let shader = Resource::new(self.res.context(), ObjectKind::Shader(stage))?;
        let id = shader.raw();

        if let Some(log) = self.context().with(|dev| dev.compile_shader(id, source))? {
            self.reject()?;
            return Err(Error::Compile {
                stage,
                source: source.to_owned(),
                log,
            });
        }

        self.context().with(|dev| dev.attach_shader(program, id))?;
        self.stages.insert(
            stage,
            Stage {
                shader,
                source: source.to_owned(),
            },
        );

        self.locations.borrow_mut().clear();
        self.missing.borrow_mut().clear();

        if let Some(log) = self.context().with(|dev| dev.link_program(program))? {
            self.reject()?;
            return Err(Error::Link {
                source: self.sources(),
                log,
            });
        }

        debug!("Program {} linked with {:?} shader {}.", self.handle(), stage, id);
        self.state = ProgramState::Linked;
        Ok(())
    }

    fn reject(&mut self) -> Result<()> {
        self.state = ProgramState::Rejected;
        if self.context().is_current(BindPoint::Program, self.handle())? {
            self.context().unbind(BindPoint::Program)?;
        }

        Ok(())
    }

    /// The sources of every attached stage, each headed by a comment naming its stage.
    fn sources(&self) -> String {
        self.stages
            .iter()
            .map(|(stage, v)| format!("// {:?} shader\n{}", stage, v.source))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The location of the active uniform `name`, `None` if the linked program does not
    /// use it.
    pub fn location(&self, name: &str) -> Result<Option<i32>> {
        if let Some(v) = self.locations.borrow().get(name) {
            return Ok(*v);
        }

        let program = self.res.raw();
        let location = self
            .context()
            .with(|dev| dev.uniform_location(program, name))?;

        self.locations
            .borrow_mut()
            .insert(name.to_owned(), location);

        Ok(location)
    }

    fn warn_missing(&self, name: &str) {
        if self.missing.borrow_mut().insert(name.to_owned()) {
            warn!("Uniform {} is not active in program {}.", name, self.handle());
        }
    }
}

impl Bind for Program {
    fn bind(&self, bind: bool) -> Result<()> {
        if !bind {
            return self.context().unbind(BindPoint::Program);
        }

        if self.state != ProgramState::Linked {
            return Err(Error::NotLinked);
        }

        self.context().bind(BindPoint::Program, self.handle())
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        let program = self.res.raw();
        for stage in self.stages.values() {
            let id = stage.shader.raw();
            if let Err(err) = self.res.context().with(|dev| dev.detach_shader(program, id)) {
                error!("Failed to detach shader {} from program {}. {}", id, program, err);
            }
        }
    }
}

/// The uniform protocol shared by every kind of program.
pub trait Uniforms {
    fn program(&self) -> &Program;

    /// Returns true if this program is linked and is the currently bound one.
    fn is_bound(&self) -> Result<bool> {
        let program = self.program();
        if !program.is_linked() {
            return Ok(false);
        }

        program
            .context()
            .is_current(BindPoint::Program, program.handle())
    }

    /// Assigns `value` to the uniform `name`. Uniforms that are not active in the linked
    /// program are skipped with a warning.
    fn set<T: Into<UniformValue>>(&self, name: &str, value: T) -> Result<()> {
        if !self.is_bound()? {
            return Err(Error::NotBound("set an uniform of a program"));
        }

        let program = self.program();
        match program.location(name)? {
            Some(location) => {
                let value = value.into();
                program.context().with(|dev| dev.uniform(location, &value))
            }
            None => {
                program.warn_missing(name);
                Ok(())
            }
        }
    }

    /// Binds `texture` to the texture unit `unit`, and points the sampler `name` to it.
    fn bind_sampler(&self, name: &str, unit: u32, texture: &Texture) -> Result<()> {
        if !self.is_bound()? {
            return Err(Error::NotBound("bind a sampler of a program"));
        }

        texture.bind_unit(unit)?;
        self.set(name, unit as i32)
    }
}

impl Uniforms for Program {
    #[inline]
    fn program(&self) -> &Program {
        self
    }
}

/// Reads the whole shader source file at `path`.
pub fn read_shader_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|err| Error::Io {
        path: path.display().to_string(),
        err,
    })
}

macro_rules! impl_uniform_value {
    ($($tp:ty => $variant:ident,)+) => {
        $(
            impl From<$tp> for UniformValue {
                fn from(v: $tp) -> Self {
                    UniformValue::$variant(v.into())
                }
            }
        )+
    }
}

impl_uniform_value! {
    i32 => I32,
    u32 => U32,
    f32 => F32,
    [i32; 2] => Vector2i,
    [i32; 3] => Vector3i,
    [i32; 4] => Vector4i,
    [f32; 2] => Vector2f,
    [f32; 3] => Vector3f,
    [f32; 4] => Vector4f,
    Vector2<i32> => Vector2i,
    Vector3<i32> => Vector3i,
    Vector4<i32> => Vector4i,
    Vector2<f32> => Vector2f,
    Vector3<f32> => Vector3f,
    Vector4<f32> => Vector4f,
}

impl From<Matrix3<f32>> for UniformValue {
    fn from(m: Matrix3<f32>) -> Self {
        UniformValue::Matrix3f(m.into(), false)
    }
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(m: Matrix4<f32>) -> Self {
        UniformValue::Matrix4f(m.into(), false)
    }
}
