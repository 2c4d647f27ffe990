use std::ops::Deref;

use crate::device::{ShaderStage, UniformValue};
use crate::errors::*;
use crate::graphics::binder::Bind;
use crate::graphics::buffer::GpuBuffer;
use crate::graphics::context::Context;
use crate::graphics::texture::Texture;
use crate::graphics::types::{Barrier, TextureAccess};

use super::{Program, Uniforms};

/// The uniform a kernel could declare to receive the origin of the dispatched region.
pub const OFFSET_UNIFORM: &str = "offset";

/// A program linked from a single compute shader.
#[derive(Debug)]
pub struct ComputeProgram {
    program: Program,
}

impl ComputeProgram {
    pub fn new(ctx: &Context, source: &str) -> Result<Self> {
        let mut program = Program::new(ctx)?;
        program.attach(ShaderStage::Compute, source)?;
        Ok(ComputeProgram { program })
    }

    /// Replaces the kernel with `source` and relinks.
    pub fn attach(&mut self, source: &str) -> Result<()> {
        self.program.attach(ShaderStage::Compute, source)
    }

    /// The local work group size declared by the kernel.
    pub fn work_group_size(&self) -> Result<[u32; 3]> {
        if !self.program.is_linked() {
            return Err(Error::NotLinked);
        }

        let id = self.program.handle().raw();
        self.program
            .context()
            .with(|dev| dev.work_group_size(id))
    }

    /// The maximum local work group size supported by the device.
    pub fn max_work_group_size(ctx: &Context) -> Result<[u32; 3]> {
        ctx.with(|dev| dev.max_work_group_size())
    }

    /// Runs the kernel over the region `(x, y, width, height)`, and waits until its
    /// writes are visible to the following commands.
    ///
    /// Enough work groups are dispatched to cover every texel of the region. The origin
    /// of the region is passed in the `offset` uniform if the kernel declares it.
    pub fn dispatch(&self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        if !self.is_bound()? {
            return Err(Error::NotBound("dispatch a compute program"));
        }

        if let Some(location) = self.program.location(OFFSET_UNIFORM)? {
            let offset = UniformValue::Vector2i([x, y]);
            self.program
                .context()
                .with(|dev| dev.uniform(location, &offset))?;
        }

        let size = self.work_group_size()?;
        let groups = [group_count(width, size[0])?, group_count(height, size[1])?, 1];
        self.dispatch_groups(groups)?;
        self.memory_barrier(Barrier::All)
    }

    /// Dispatches `groups` work groups as is.
    pub fn dispatch_groups(&self, groups: [u32; 3]) -> Result<()> {
        if !self.is_bound()? {
            return Err(Error::NotBound("dispatch a compute program"));
        }

        self.program
            .context()
            .with(|dev| dev.dispatch_compute(groups))
    }

    pub fn memory_barrier(&self, barrier: Barrier) -> Result<()> {
        self.program
            .context()
            .with(|dev| dev.memory_barrier(barrier))
    }

    /// Exposes the level 0 of `texture` on the image unit `unit`.
    pub fn bind_image(&self, unit: u32, texture: &Texture, access: TextureAccess) -> Result<()> {
        if !self.is_bound()? {
            return Err(Error::NotBound("bind an image to a compute program"));
        }

        texture.bind_image_texture(unit, access, 0, false, 0)
    }

    /// Binds `buffer` to the shader storage binding `location`.
    pub fn bind_storage(&self, location: u32, buffer: &GpuBuffer) -> Result<()> {
        if !self.is_bound()? {
            return Err(Error::NotBound("bind a storage buffer to a compute program"));
        }

        buffer.bind_base(location)
    }
}

/// The number of work groups of `size` invocations needed to cover `extent`.
pub fn group_count(extent: u32, size: u32) -> Result<u32> {
    if size == 0 {
        return Err(Error::InvalidArgument("work group size is zero".into()));
    }

    Ok(extent.div_ceil(size))
}

impl Deref for ComputeProgram {
    type Target = Program;

    fn deref(&self) -> &Program {
        &self.program
    }
}

impl Uniforms for ComputeProgram {
    #[inline]
    fn program(&self) -> &Program {
        &self.program
    }
}

impl Bind for ComputeProgram {
    #[inline]
    fn bind(&self, bind: bool) -> Result<()> {
        self.program.bind(bind)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn groups() {
        assert_eq!(group_count(16, 8).unwrap(), 2);
        assert_eq!(group_count(17, 8).unwrap(), 3);
        assert_eq!(group_count(1, 8).unwrap(), 1);
        assert_eq!(group_count(0, 8).unwrap(), 0);
        assert_eq!(group_count(::std::u32::MAX, 1).unwrap(), ::std::u32::MAX);
        assert!(group_count(4, 0).is_err());
    }
}
