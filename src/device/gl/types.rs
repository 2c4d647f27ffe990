use ::gl;
use ::gl::types::*;

use crate::device::{Attachment, BufferTarget, ShaderStage};
use crate::graphics::framebuffer::FramebufferStatus;
use crate::graphics::types::*;

/// `GL_TEXTURE_MAX_ANISOTROPY`, core since 4.6 and `_EXT` before.
pub const TEXTURE_MAX_ANISOTROPY: GLenum = 0x84FE;

/// `GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS_EXT`.
pub const FRAMEBUFFER_INCOMPLETE_DIMENSIONS: GLenum = 0x8CD9;

/// `GL_FRAMEBUFFER_INCOMPLETE_FORMATS_EXT`.
pub const FRAMEBUFFER_INCOMPLETE_FORMATS: GLenum = 0x8CDA;

impl From<DataType> for GLenum {
    fn from(tp: DataType) -> Self {
        match tp {
            DataType::Byte => gl::BYTE,
            DataType::UnsignedByte => gl::UNSIGNED_BYTE,
            DataType::Short => gl::SHORT,
            DataType::UnsignedShort => gl::UNSIGNED_SHORT,
            DataType::Int => gl::INT,
            DataType::UnsignedInt => gl::UNSIGNED_INT,
            DataType::HalfFloat => gl::HALF_FLOAT,
            DataType::Float => gl::FLOAT,
            DataType::Double => gl::DOUBLE,
        }
    }
}

impl From<Usage> for GLenum {
    fn from(usage: Usage) -> Self {
        match usage {
            Usage::StaticDraw => gl::STATIC_DRAW,
            Usage::DynamicDraw => gl::DYNAMIC_DRAW,
        }
    }
}

impl From<DrawMode> for GLenum {
    fn from(mode: DrawMode) -> Self {
        match mode {
            DrawMode::Points => gl::POINTS,
            DrawMode::LineStrip => gl::LINE_STRIP,
            DrawMode::LineLoop => gl::LINE_LOOP,
            DrawMode::Lines => gl::LINES,
            DrawMode::LineStripAdjacency => gl::LINE_STRIP_ADJACENCY,
            DrawMode::LinesAdjacency => gl::LINES_ADJACENCY,
            DrawMode::TriangleStrip => gl::TRIANGLE_STRIP,
            DrawMode::TriangleFan => gl::TRIANGLE_FAN,
            DrawMode::Triangles => gl::TRIANGLES,
            DrawMode::TriangleStripAdjacency => gl::TRIANGLE_STRIP_ADJACENCY,
            DrawMode::TrianglesAdjacency => gl::TRIANGLES_ADJACENCY,
            DrawMode::Patches => gl::PATCHES,
        }
    }
}

impl From<TextureAccess> for GLenum {
    fn from(access: TextureAccess) -> Self {
        match access {
            TextureAccess::ReadOnly => gl::READ_ONLY,
            TextureAccess::WriteOnly => gl::WRITE_ONLY,
            TextureAccess::ReadWrite => gl::READ_WRITE,
        }
    }
}

impl From<MinFilter> for GLenum {
    fn from(filter: MinFilter) -> Self {
        match filter {
            MinFilter::Nearest => gl::NEAREST,
            MinFilter::Linear => gl::LINEAR,
            MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
            MinFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
            MinFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
            MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
        }
    }
}

impl From<MagFilter> for GLenum {
    fn from(filter: MagFilter) -> Self {
        match filter {
            MagFilter::Nearest => gl::NEAREST,
            MagFilter::Linear => gl::LINEAR,
        }
    }
}

impl From<WrapMode> for GLenum {
    fn from(wrap: WrapMode) -> Self {
        match wrap {
            WrapMode::Repeat => gl::REPEAT,
            WrapMode::MirroredRepeat => gl::MIRRORED_REPEAT,
            WrapMode::ClampToEdge => gl::CLAMP_TO_EDGE,
            WrapMode::ClampToBorder => gl::CLAMP_TO_BORDER,
        }
    }
}

impl From<InternalFormat> for GLenum {
    fn from(format: InternalFormat) -> Self {
        match format {
            InternalFormat::DepthComponent => gl::DEPTH_COMPONENT,
            InternalFormat::DepthStencil => gl::DEPTH_STENCIL,
            InternalFormat::Red => gl::RED,
            InternalFormat::Rg => gl::RG,
            InternalFormat::Rgb => gl::RGB,
            InternalFormat::Rgba => gl::RGBA,
            InternalFormat::R8 => gl::R8,
            InternalFormat::R16 => gl::R16,
            InternalFormat::Rg8 => gl::RG8,
            InternalFormat::Rg16 => gl::RG16,
            InternalFormat::Rgb8 => gl::RGB8,
            InternalFormat::Rgba8 => gl::RGBA8,
            InternalFormat::Rgba16 => gl::RGBA16,
            InternalFormat::R16F => gl::R16F,
            InternalFormat::Rg16F => gl::RG16F,
            InternalFormat::Rgb16F => gl::RGB16F,
            InternalFormat::Rgba16F => gl::RGBA16F,
            InternalFormat::R32F => gl::R32F,
            InternalFormat::Rg32F => gl::RG32F,
            InternalFormat::Rgb32F => gl::RGB32F,
            InternalFormat::Rgba32F => gl::RGBA32F,
            InternalFormat::R8I => gl::R8I,
            InternalFormat::R8Ui => gl::R8UI,
            InternalFormat::R16I => gl::R16I,
            InternalFormat::R16Ui => gl::R16UI,
            InternalFormat::R32I => gl::R32I,
            InternalFormat::R32Ui => gl::R32UI,
            InternalFormat::Rg8I => gl::RG8I,
            InternalFormat::Rg8Ui => gl::RG8UI,
            InternalFormat::Rg16I => gl::RG16I,
            InternalFormat::Rg16Ui => gl::RG16UI,
            InternalFormat::Rg32I => gl::RG32I,
            InternalFormat::Rg32Ui => gl::RG32UI,
            InternalFormat::Rgb8I => gl::RGB8I,
            InternalFormat::Rgb8Ui => gl::RGB8UI,
            InternalFormat::Rgb16I => gl::RGB16I,
            InternalFormat::Rgb16Ui => gl::RGB16UI,
            InternalFormat::Rgb32I => gl::RGB32I,
            InternalFormat::Rgb32Ui => gl::RGB32UI,
            InternalFormat::Rgba8I => gl::RGBA8I,
            InternalFormat::Rgba8Ui => gl::RGBA8UI,
            InternalFormat::Rgba16I => gl::RGBA16I,
            InternalFormat::Rgba16Ui => gl::RGBA16UI,
            InternalFormat::Rgba32I => gl::RGBA32I,
            InternalFormat::Rgba32Ui => gl::RGBA32UI,
        }
    }
}

impl From<PixelFormat> for GLenum {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Red => gl::RED,
            PixelFormat::Rg => gl::RG,
            PixelFormat::Rgb => gl::RGB,
            PixelFormat::Bgr => gl::BGR,
            PixelFormat::Rgba => gl::RGBA,
            PixelFormat::Bgra => gl::BGRA,
            PixelFormat::RedInteger => gl::RED_INTEGER,
            PixelFormat::RgInteger => gl::RG_INTEGER,
            PixelFormat::RgbInteger => gl::RGB_INTEGER,
            PixelFormat::BgrInteger => gl::BGR_INTEGER,
            PixelFormat::RgbaInteger => gl::RGBA_INTEGER,
            PixelFormat::BgraInteger => gl::BGRA_INTEGER,
            PixelFormat::StencilIndex => gl::STENCIL_INDEX,
            PixelFormat::DepthComponent => gl::DEPTH_COMPONENT,
            PixelFormat::DepthStencil => gl::DEPTH_STENCIL,
        }
    }
}

impl From<Barrier> for GLbitfield {
    fn from(barrier: Barrier) -> Self {
        match barrier {
            Barrier::All => gl::ALL_BARRIER_BITS,
            Barrier::ShaderStorage => gl::SHADER_STORAGE_BARRIER_BIT,
            Barrier::ShaderImageAccess => gl::SHADER_IMAGE_ACCESS_BARRIER_BIT,
            Barrier::TextureFetch => gl::TEXTURE_FETCH_BARRIER_BIT,
            Barrier::BufferUpdate => gl::BUFFER_UPDATE_BARRIER_BIT,
        }
    }
}

impl From<ShaderStage> for GLenum {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::TessellationControl => gl::TESS_CONTROL_SHADER,
            ShaderStage::TessellationEvaluation => gl::TESS_EVALUATION_SHADER,
            ShaderStage::Geometry => gl::GEOMETRY_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
            ShaderStage::Compute => gl::COMPUTE_SHADER,
        }
    }
}

impl From<BufferTarget> for GLenum {
    fn from(target: BufferTarget) -> Self {
        match target {
            BufferTarget::Array => gl::ARRAY_BUFFER,
            BufferTarget::ShaderStorage => gl::SHADER_STORAGE_BUFFER,
            BufferTarget::CopyRead => gl::COPY_READ_BUFFER,
            BufferTarget::CopyWrite => gl::COPY_WRITE_BUFFER,
        }
    }
}

impl From<Attachment> for GLenum {
    fn from(attachment: Attachment) -> Self {
        match attachment {
            Attachment::Color(i) => gl::COLOR_ATTACHMENT0 + i,
            Attachment::Depth => gl::DEPTH_ATTACHMENT,
        }
    }
}

/// The query that returns the buffer currently bound at `target`.
pub fn buffer_binding(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Array => gl::ARRAY_BUFFER_BINDING,
        BufferTarget::ShaderStorage => gl::SHADER_STORAGE_BUFFER_BINDING,
        BufferTarget::CopyRead => gl::COPY_READ_BUFFER_BINDING,
        BufferTarget::CopyWrite => gl::COPY_WRITE_BUFFER_BINDING,
    }
}

pub fn framebuffer_status(status: GLenum) -> FramebufferStatus {
    match status {
        gl::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        FRAMEBUFFER_INCOMPLETE_DIMENSIONS => FramebufferStatus::MismatchedDimensions,
        FRAMEBUFFER_INCOMPLETE_FORMATS => FramebufferStatus::MismatchedFormats,
        gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
        gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
        gl::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        v => FramebufferStatus::Unknown(v),
    }
}
