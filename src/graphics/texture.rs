//! 2D textures.
//!
//! A `Texture` has fixed dimensions. Its storage is specified on `upload` (or
//! `allocate`), and the sampling parameters are (re)applied right after every upload.

use std::cell::Cell;

use bytemuck::Pod;
use serde::{Deserialize, Serialize};

use crate::device::{BindPoint, ImageBinding, ObjectKind, SamplerState, TextureStorage};
use crate::errors::*;

use super::binder::{Bind, Binder};
use super::context::Context;
use super::handle::{Handle, Resource};
use super::types::*;

/// The storage formats and sampling parameters of a texture.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureParams {
    pub internal: InternalFormat,
    pub format: PixelFormat,
    pub data_type: DataType,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    /// Kept for the fixed-function pipeline. Core profile devices ignore it.
    pub env_mode: EnvMode,
    pub wrap: WrapMode,
    pub mipmaps: bool,
    pub max_anisotropy: f32,
}

impl Default for TextureParams {
    fn default() -> Self {
        TextureParams {
            internal: InternalFormat::Rgb32F,
            format: PixelFormat::Rgb,
            data_type: DataType::Float,
            min_filter: MinFilter::Linear,
            mag_filter: MagFilter::Linear,
            env_mode: EnvMode::Replace,
            wrap: WrapMode::Repeat,
            mipmaps: false,
            max_anisotropy: 1.0,
        }
    }
}

impl TextureParams {
    fn sampler(&self) -> SamplerState {
        SamplerState {
            min_filter: self.min_filter,
            mag_filter: self.mag_filter,
            wrap: self.wrap,
            env_mode: self.env_mode,
            max_anisotropy: self.max_anisotropy,
        }
    }
}

#[derive(Debug)]
pub struct Texture {
    res: Resource,
    width: u32,
    height: u32,
    params: Cell<TextureParams>,
}

impl Texture {
    /// Creates a `RGB32F` texture with linear filtering and repeat wrapping.
    pub fn new(ctx: &Context, width: u32, height: u32) -> Result<Self> {
        Texture::with_params(ctx, width, height, TextureParams::default())
    }

    pub fn with_params(ctx: &Context, width: u32, height: u32, params: TextureParams) -> Result<Self> {
        Ok(Texture {
            res: Resource::new(ctx, ObjectKind::Texture)?,
            width,
            height,
            params: Cell::new(params),
        })
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.res.handle()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn params(&self) -> TextureParams {
        self.params.get()
    }

    #[inline]
    pub fn internal_format(&self) -> InternalFormat {
        self.params.get().internal
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.params.get().format
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.params.get().data_type
    }

    #[inline]
    pub fn min_filter(&self) -> MinFilter {
        self.params.get().min_filter
    }

    #[inline]
    pub fn mag_filter(&self) -> MagFilter {
        self.params.get().mag_filter
    }

    #[inline]
    pub fn wrap(&self) -> WrapMode {
        self.params.get().wrap
    }

    #[inline]
    pub fn env_mode(&self) -> EnvMode {
        self.params.get().env_mode
    }

    #[inline]
    pub fn max_anisotropy(&self) -> f32 {
        self.params.get().max_anisotropy
    }

    /// The number of bytes `upload` expects and `download` produces.
    pub fn len(&self) -> usize {
        self.storage().len()
    }

    /// Specifies the storage of this texture without initializing its texels.
    pub fn allocate(&self) -> Result<()> {
        self.upload_bytes(None)
    }

    /// Specifies the storage of this texture and fills it with `data`, laid out in the
    /// transfer format and data type of this texture.
    pub fn upload<T: Pod>(&self, data: &[T]) -> Result<()> {
        self.upload_bytes(Some(bytemuck::cast_slice(data)))
    }

    pub fn upload_bytes(&self, data: Option<&[u8]>) -> Result<()> {
        let storage = self.storage();
        if let Some(v) = data {
            if v.len() != storage.len() {
                return Err(Error::SizeMismatch {
                    expected: storage.len(),
                    actual: v.len(),
                });
            }
        }

        let params = self.params.get();
        let _binder = Binder::new(self)?;
        self.res.context().with(|dev| {
            dev.tex_image(&storage, data)?;
            if params.mipmaps {
                dev.generate_mipmap()?;
            }

            dev.tex_sampler(&params.sampler())
        })
    }

    /// Reads the texels back in the transfer format and data type of this texture.
    pub fn download<T: Pod>(&self, dst: &mut [T]) -> Result<()> {
        let params = self.params.get();
        self.download_as(dst, params.format, params.data_type)
    }

    /// Reads the texels back, converted into `format` and `tp`. `dst` must hold exactly
    /// `width * height` pixels.
    pub fn download_as<T: Pod>(&self, dst: &mut [T], format: PixelFormat, tp: DataType) -> Result<()> {
        let dst: &mut [u8] = bytemuck::cast_slice_mut(dst);
        let expected = self.width as usize * self.height as usize * format.pixel_size(tp);
        if dst.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: dst.len(),
            });
        }

        let _binder = Binder::new(self)?;
        self.res
            .context()
            .with(|dev| dev.get_tex_image(format, tp, dst))
    }

    /// Binds this texture to the texture unit `unit` for sampling.
    pub fn bind_unit(&self, unit: u32) -> Result<()> {
        self.res
            .context()
            .bind(BindPoint::Texture(unit), self.handle())
    }

    /// Exposes the level `level` of this texture on the image unit `unit`, so a shader
    /// could load and store its texels directly.
    pub fn bind_image_texture(
        &self,
        unit: u32,
        access: TextureAccess,
        level: i32,
        layered: bool,
        layer: i32,
    ) -> Result<()> {
        let binding = ImageBinding {
            unit,
            level,
            layered,
            layer,
            access,
            format: self.internal_format(),
        };

        let id = self.res.raw();
        self.res
            .context()
            .with(|dev| dev.bind_image_texture(id, &binding))
    }

    /// Copies the texels of this texture into `other` without a round-trip through
    /// client memory. `other` must be at least as large as this texture.
    pub fn copy_to(&self, other: &Texture) -> Result<()> {
        if other.width < self.width || other.height < self.height {
            return Err(Error::DimensionMismatch(self.dimensions(), other.dimensions()));
        }

        let (src, dst) = (self.res.raw(), other.res.raw());
        let (width, height) = self.dimensions();
        self.res
            .context()
            .with(|dev| dev.copy_image(src, dst, width, height))
    }

    pub fn set_wrap(&self, wrap: WrapMode) -> Result<()> {
        self.update(|v| v.wrap = wrap)
    }

    pub fn set_filter(&self, min: MinFilter, mag: MagFilter) -> Result<()> {
        self.update(|v| {
            v.min_filter = min;
            v.mag_filter = mag;
        })
    }

    pub fn set_env_mode(&self, env_mode: EnvMode) -> Result<()> {
        self.update(|v| v.env_mode = env_mode)
    }

    pub fn set_max_anisotropy(&self, anisotropy: f32) -> Result<()> {
        if !(anisotropy >= 1.0) {
            return Err(Error::InvalidArgument(format!(
                "max anisotropy must be at least 1.0, got {}",
                anisotropy
            )));
        }

        self.update(|v| v.max_anisotropy = anisotropy)
    }

    fn update<F: FnOnce(&mut TextureParams)>(&self, func: F) -> Result<()> {
        let mut params = self.params.get();
        func(&mut params);
        self.params.set(params);

        let _binder = Binder::new(self)?;
        self.res
            .context()
            .with(|dev| dev.tex_sampler(&params.sampler()))
    }

    fn storage(&self) -> TextureStorage {
        let params = self.params.get();
        TextureStorage {
            width: self.width,
            height: self.height,
            level: 0,
            internal: params.internal,
            format: params.format,
            data_type: params.data_type,
        }
    }
}

impl Bind for Texture {
    fn bind(&self, bind: bool) -> Result<()> {
        let ctx = self.res.context();
        if bind {
            ctx.bind(BindPoint::Texture(0), self.handle())
        } else {
            ctx.unbind(BindPoint::Texture(0))
        }
    }
}
