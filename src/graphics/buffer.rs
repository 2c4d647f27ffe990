use bytemuck::Pod;

use crate::device::{BindPoint, BufferTarget, ObjectKind};
use crate::errors::*;

use super::binder::{Bind, Binder};
use super::context::Context;
use super::handle::{Handle, Resource};
use super::types::Usage;

/// A shader storage buffer.
///
/// The size of the data store is always queried from the device. Uploading a number of
/// bytes that differs from it reallocates the store instead of writing partially.
#[derive(Debug)]
pub struct GpuBuffer {
    res: Resource,
}

impl GpuBuffer {
    /// Creates a buffer object without any data store.
    pub fn new(ctx: &Context) -> Result<Self> {
        Ok(GpuBuffer {
            res: Resource::new(ctx, ObjectKind::Buffer)?,
        })
    }

    /// Creates a buffer object whose data store holds a copy of `data`.
    pub fn from_slice<T: Pod>(ctx: &Context, data: &[T]) -> Result<Self> {
        let buf = GpuBuffer::new(ctx)?;
        let bytes: &[u8] = bytemuck::cast_slice(data);
        buf.create(Some(bytes), bytes.len())?;
        Ok(buf)
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.res.handle()
    }

    /// (Re)allocates a data store of exactly `len` bytes, optionally initialized with
    /// the first `len` bytes of `data`.
    pub fn create(&self, data: Option<&[u8]>, len: usize) -> Result<()> {
        if let Some(v) = data {
            if v.len() < len {
                return Err(Error::SizeMismatch {
                    expected: len,
                    actual: v.len(),
                });
            }
        }

        let _binder = Binder::new(self)?;
        self.res.context().with(|dev| {
            dev.buffer_data(BufferTarget::ShaderStorage, data, len, Usage::StaticDraw)
        })
    }

    /// The size of the data store in bytes.
    pub fn size(&self) -> Result<usize> {
        let _binder = Binder::new(self)?;
        self.res
            .context()
            .with(|dev| dev.buffer_size(BufferTarget::ShaderStorage))
    }

    /// Writes `data` into the data store, reallocating it if `data` has a different size.
    pub fn upload(&self, data: &[u8]) -> Result<()> {
        let size = self.size()?;
        if data.len() != size {
            info!(
                "Reallocates buffer {} from {} to {} bytes.",
                self.handle(),
                size,
                data.len()
            );

            return self.create(Some(data), data.len());
        }

        let _binder = Binder::new(self)?;
        self.res
            .context()
            .with(|dev| dev.write_mapped(BufferTarget::ShaderStorage, data))
    }

    /// Reads the first `dst.len()` bytes of the data store back.
    pub fn download(&self, dst: &mut [u8]) -> Result<()> {
        let size = self.size()?;
        if dst.len() > size {
            return Err(Error::SizeMismatch {
                expected: size,
                actual: dst.len(),
            });
        }

        let _binder = Binder::new(self)?;
        self.res
            .context()
            .with(|dev| dev.read_mapped(BufferTarget::ShaderStorage, dst))
    }

    pub fn upload_slice<T: Pod>(&self, data: &[T]) -> Result<()> {
        self.upload(bytemuck::cast_slice(data))
    }

    pub fn download_slice<T: Pod>(&self, dst: &mut [T]) -> Result<()> {
        self.download(bytemuck::cast_slice_mut(dst))
    }

    /// Reads the whole data store back as a vector of `T`. Trailing bytes that do not
    /// make up a whole `T` are ignored.
    pub fn to_vec<T: Pod>(&self) -> Result<Vec<T>> {
        let len = self.size()? / ::std::mem::size_of::<T>().max(1);
        let mut dst = vec![T::zeroed(); len];
        self.download_slice(&mut dst)?;
        Ok(dst)
    }

    /// Binds the whole buffer to the indexed shader storage binding `location`.
    pub fn bind_base(&self, location: u32) -> Result<()> {
        let id = self.res.raw();
        self.res
            .context()
            .with(|dev| dev.bind_buffer_base(BufferTarget::ShaderStorage, location, id))
    }

    /// Copies the data store into `other`, reallocating `other` first if the sizes
    /// differ. The copy bindings are restored afterwards. Copying a buffer onto itself
    /// is refused.
    pub fn copy_to(&self, other: &GpuBuffer) -> Result<()> {
        if self.handle() == other.handle() {
            return Err(Error::InvalidArgument(format!(
                "buffer {} can not be copied onto itself",
                self.handle()
            )));
        }

        let size = self.size()?;
        if other.size()? != size {
            other.create(None, size)?;
        }

        let ctx = self.res.context();
        let read = ctx.with(|dev| dev.current(BindPoint::Buffer(BufferTarget::CopyRead)))?;
        let write = ctx.with(|dev| dev.current(BindPoint::Buffer(BufferTarget::CopyWrite)))?;

        let (src, dst) = (self.res.raw(), other.res.raw());
        let result = ctx.with(|dev| {
            dev.bind(BindPoint::Buffer(BufferTarget::CopyRead), src)?;
            dev.bind(BindPoint::Buffer(BufferTarget::CopyWrite), dst)?;
            dev.copy_buffer(size)
        });

        ctx.with(|dev| {
            dev.bind(BindPoint::Buffer(BufferTarget::CopyRead), read)?;
            dev.bind(BindPoint::Buffer(BufferTarget::CopyWrite), write)
        })?;

        result
    }
}

impl Bind for GpuBuffer {
    fn bind(&self, bind: bool) -> Result<()> {
        let point = BindPoint::Buffer(BufferTarget::ShaderStorage);
        if bind {
            self.res.context().bind(point, self.handle())
        } else {
            self.res.context().unbind(point)
        }
    }
}
