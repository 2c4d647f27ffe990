//! Enumerated configuration domains of the native API. Every enumeration here is
//! translated into a native constant by the device backend, so callers never pass
//! free integers around.

use serde::{Deserialize, Serialize};

/// The type of a single component of vertex or pixel data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    HalfFloat,
    Float,
    Double,
}

impl DataType {
    /// The size in bytes of a single component.
    pub fn size(self) -> usize {
        match self {
            DataType::Byte | DataType::UnsignedByte => 1,
            DataType::Short | DataType::UnsignedShort | DataType::HalfFloat => 2,
            DataType::Int | DataType::UnsignedInt | DataType::Float => 4,
            DataType::Double => 8,
        }
    }
}

/// Hint abouts the intended update strategy of a buffer's data store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Usage {
    /// The data store contents will be modified once and used many times as the
    /// source for drawing commands.
    StaticDraw,
    /// The data store contents will be modified repeatedly and used many times as
    /// the source for drawing commands.
    DynamicDraw,
}

impl Default for Usage {
    fn default() -> Self {
        Usage::StaticDraw
    }
}

/// Specifies what kind of primitives to render.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    Points,
    LineStrip,
    LineLoop,
    Lines,
    LineStripAdjacency,
    LinesAdjacency,
    TriangleStrip,
    TriangleFan,
    Triangles,
    TriangleStripAdjacency,
    TrianglesAdjacency,
    Patches,
}

/// The access a shader has to a texture bound on an image unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureAccess {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Default for TextureAccess {
    fn default() -> Self {
        TextureAccess::ReadWrite
    }
}

/// The texture minifying function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

/// The texture magnification function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// How texels are combined with the incoming fragment colour by the fixed-function
/// texture environment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvMode {
    Replace,
    Modulate,
    Add,
    AddSigned,
    Interpolate,
    Subtract,
}

/// Sets the wrap parameter for texture coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapMode {
    /// Samples at coord x + 1 map to coord x.
    Repeat,
    /// Samples at coord x + 1 map to coord 1 - x.
    MirroredRepeat,
    /// Samples at coord x + 1 map to coord 1.
    ClampToEdge,
    /// Samples outside [0, 1] return the border colour.
    ClampToBorder,
}

/// The format the native API uses to store texels internally.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalFormat {
    DepthComponent,
    DepthStencil,
    Red,
    Rg,
    Rgb,
    Rgba,
    R8,
    R16,
    Rg8,
    Rg16,
    Rgb8,
    Rgba8,
    Rgba16,
    R16F,
    Rg16F,
    Rgb16F,
    Rgba16F,
    R32F,
    Rg32F,
    Rgb32F,
    Rgba32F,
    R8I,
    R8Ui,
    R16I,
    R16Ui,
    R32I,
    R32Ui,
    Rg8I,
    Rg8Ui,
    Rg16I,
    Rg16Ui,
    Rg32I,
    Rg32Ui,
    Rgb8I,
    Rgb8Ui,
    Rgb16I,
    Rgb16Ui,
    Rgb32I,
    Rgb32Ui,
    Rgba8I,
    Rgba8Ui,
    Rgba16I,
    Rgba16Ui,
    Rgba32I,
    Rgba32Ui,
}

impl InternalFormat {
    /// Returns true if texels of this format are depth (or depth-stencil) values.
    pub fn is_depth(self) -> bool {
        match self {
            InternalFormat::DepthComponent | InternalFormat::DepthStencil => true,
            _ => false,
        }
    }
}

/// The layout of pixel data transferred between client memory and a texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    RedInteger,
    RgInteger,
    RgbInteger,
    BgrInteger,
    RgbaInteger,
    BgraInteger,
    StencilIndex,
    DepthComponent,
    DepthStencil,
}

impl PixelFormat {
    /// The number of components of a single pixel.
    pub fn components(self) -> usize {
        match self {
            PixelFormat::Red
            | PixelFormat::RedInteger
            | PixelFormat::StencilIndex
            | PixelFormat::DepthComponent => 1,
            PixelFormat::Rg | PixelFormat::RgInteger | PixelFormat::DepthStencil => 2,
            PixelFormat::Rgb
            | PixelFormat::Bgr
            | PixelFormat::RgbInteger
            | PixelFormat::BgrInteger => 3,
            PixelFormat::Rgba
            | PixelFormat::Bgra
            | PixelFormat::RgbaInteger
            | PixelFormat::BgraInteger => 4,
        }
    }

    /// The size in bytes of a single pixel transferred with data type `tp`.
    pub fn pixel_size(self, tp: DataType) -> usize {
        self.components() * tp.size()
    }
}

/// Kinds of memory transactions a barrier orders.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Barrier {
    All,
    ShaderStorage,
    ShaderImageAccess,
    TextureFetch,
    BufferUpdate,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pixel_size() {
        assert_eq!(PixelFormat::Rgb.pixel_size(DataType::Float), 12);
        assert_eq!(PixelFormat::Rgba.pixel_size(DataType::UnsignedByte), 4);
        assert_eq!(PixelFormat::DepthComponent.pixel_size(DataType::Float), 4);
        assert_eq!(PixelFormat::Rg.pixel_size(DataType::HalfFloat), 4);
    }
}
