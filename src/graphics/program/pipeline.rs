use std::ops::Deref;

use crate::device::ShaderStage;
use crate::errors::*;
use crate::graphics::binder::Bind;
use crate::graphics::context::Context;

use super::{Program, Uniforms};

/// A program of the rendering pipeline, linked from vertex, tessellation, geometry and
/// fragment stages.
#[derive(Debug)]
pub struct RenderProgram {
    program: Program,
}

impl RenderProgram {
    pub fn new(ctx: &Context) -> Result<Self> {
        Ok(RenderProgram {
            program: Program::new(ctx)?,
        })
    }

    /// Creates a program linked from a vertex and a fragment shader.
    pub fn from_sources(ctx: &Context, vs: &str, fs: &str) -> Result<Self> {
        let mut program = RenderProgram::new(ctx)?;
        program.attach_vertex_shader(vs)?;
        program.attach_fragment_shader(fs)?;
        Ok(program)
    }

    /// Compiles and attaches `source` as `stage`, replacing the previous shader of that
    /// stage, and relinks.
    pub fn attach(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        if stage == ShaderStage::Compute {
            return Err(Error::InvalidArgument(
                "compute shaders belong to a ComputeProgram".into(),
            ));
        }

        self.program.attach(stage, source)
    }

    #[inline]
    pub fn attach_vertex_shader(&mut self, source: &str) -> Result<()> {
        self.attach(ShaderStage::Vertex, source)
    }

    #[inline]
    pub fn attach_tessellation_control_shader(&mut self, source: &str) -> Result<()> {
        self.attach(ShaderStage::TessellationControl, source)
    }

    #[inline]
    pub fn attach_tessellation_evaluation_shader(&mut self, source: &str) -> Result<()> {
        self.attach(ShaderStage::TessellationEvaluation, source)
    }

    #[inline]
    pub fn attach_geometry_shader(&mut self, source: &str) -> Result<()> {
        self.attach(ShaderStage::Geometry, source)
    }

    #[inline]
    pub fn attach_fragment_shader(&mut self, source: &str) -> Result<()> {
        self.attach(ShaderStage::Fragment, source)
    }
}

impl Deref for RenderProgram {
    type Target = Program;

    fn deref(&self) -> &Program {
        &self.program
    }
}

impl Uniforms for RenderProgram {
    #[inline]
    fn program(&self) -> &Program {
        &self.program
    }
}

impl Bind for RenderProgram {
    #[inline]
    fn bind(&self, bind: bool) -> Result<()> {
        self.program.bind(bind)
    }
}
