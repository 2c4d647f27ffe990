//! Vertex buffers and the vertex arrays that describe them to a shader.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

use bytemuck::Pod;

use crate::device::{BindPoint, BufferTarget, ObjectKind};
use crate::errors::*;

use super::binder::{Bind, Binder};
use super::context::Context;
use super::handle::{Handle, Resource};
use super::types::{DataType, DrawMode, Usage};

/// A scalar type that could be used as a vertex component.
pub trait VertexComponent: Pod {
    const DATA_TYPE: DataType;
}

macro_rules! impl_vertex_component {
    ($($tp:ty => $data_type:ident,)+) => {
        $(
            impl VertexComponent for $tp {
                const DATA_TYPE: DataType = DataType::$data_type;
            }
        )+
    }
}

impl_vertex_component! {
    i8 => Byte,
    u8 => UnsignedByte,
    i16 => Short,
    u16 => UnsignedShort,
    i32 => Int,
    u32 => UnsignedInt,
    f32 => Float,
    f64 => Double,
}

/// A fixed-size vector of vertex components, e.g. `[f32; 3]` for positions.
pub trait VertexData: Pod {
    type Component: VertexComponent;
    const COMPONENTS: u32;
}

macro_rules! impl_vertex_data {
    ($($n:expr),+) => {
        $(
            impl<T: VertexComponent> VertexData for [T; $n] where [T; $n]: Pod {
                type Component = T;
                const COMPONENTS: u32 = $n;
            }
        )+
    }
}

impl_vertex_data!(1, 2, 3, 4);

/// The layout recorded by the last `create_buffer`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub data_type: DataType,
    /// The number of components per vertex.
    pub components: u32,
    /// The number of vertices.
    pub count: usize,
}

impl VertexLayout {
    #[inline]
    pub fn stride(&self) -> usize {
        self.components as usize * self.data_type.size()
    }
}

#[derive(Debug)]
pub struct VertexBuffer {
    res: Resource,
    usage: Usage,
    layout: Cell<VertexLayout>,
}

impl VertexBuffer {
    pub fn new(ctx: &Context, usage: Usage) -> Result<Self> {
        Ok(VertexBuffer {
            res: Resource::new(ctx, ObjectKind::Buffer)?,
            usage,
            layout: Cell::new(VertexLayout {
                data_type: DataType::Float,
                components: 0,
                count: 0,
            }),
        })
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.res.handle()
    }

    #[inline]
    pub fn usage(&self) -> Usage {
        self.usage
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.layout.get()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.get().count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocates the data store with `data`, a flat array of vertices made of
    /// `components` components each.
    pub fn create_buffer<T: VertexComponent>(&self, data: &[T], components: u32) -> Result<()> {
        if components == 0 || data.len() % components as usize != 0 {
            return Err(Error::InvalidArgument(format!(
                "{} components can not be split into vertices of {} components",
                data.len(),
                components
            )));
        }

        let layout = VertexLayout {
            data_type: T::DATA_TYPE,
            components,
            count: data.len() / components as usize,
        };

        let bytes: &[u8] = bytemuck::cast_slice(data);
        let usage = self.usage;

        let _binder = Binder::new(self)?;
        self.res
            .context()
            .with(|dev| dev.buffer_data(BufferTarget::Array, Some(bytes), bytes.len(), usage))?;

        self.layout.set(layout);
        Ok(())
    }

    pub fn create_vectors<V: VertexData>(&self, data: &[V]) -> Result<()> {
        self.create_buffer::<V::Component>(bytemuck::cast_slice(data), V::COMPONENTS)
    }

    /// Rewrites the vertices `[start, start + count)` with the same vertices of `data`,
    /// which is laid out like the array used to create this buffer.
    ///
    /// A range outside of the allocated vertices is skipped with a warning. The data
    /// store is never resized here.
    pub fn update_buffer<T: VertexComponent>(&self, data: &[T], start: usize, count: usize) -> Result<()> {
        let layout = self.layout.get();
        if T::DATA_TYPE != layout.data_type {
            return Err(Error::InvalidArgument(format!(
                "expects {:?} components, got {:?}",
                layout.data_type,
                T::DATA_TYPE
            )));
        }

        if start >= layout.count {
            warn!(
                "Vertex buffer {} update starts at {}, but only {} vertices are allocated. Ignoring update.",
                self.handle(),
                start,
                layout.count
            );
            return Ok(());
        }

        if start.checked_add(count).map_or(true, |end| end > layout.count) {
            warn!(
                "Vertex buffer {} update of {} vertices from {} exceeds the {} allocated vertices. Ignoring update.",
                self.handle(),
                count,
                start,
                layout.count
            );
            return Ok(());
        }

        let components = layout.components as usize;
        let (from, to) = (start * components, (start + count) * components);
        if data.len() < to {
            warn!(
                "Vertex buffer {} update of [{}, {}) reads past the {} given components. Ignoring update.",
                self.handle(),
                start,
                start + count,
                data.len()
            );
            return Ok(());
        }

        let bytes: &[u8] = bytemuck::cast_slice(&data[from..to]);
        let offset = from * mem::size_of::<T>();

        let _binder = Binder::new(self)?;
        self.res
            .context()
            .with(|dev| dev.buffer_sub_data(BufferTarget::Array, offset, bytes))
    }

    pub fn update_vectors<V: VertexData>(&self, data: &[V], start: usize, count: usize) -> Result<()> {
        let layout = self.layout.get();
        if V::COMPONENTS != layout.components {
            return Err(Error::InvalidArgument(format!(
                "expects vertices of {} components, got {}",
                layout.components,
                V::COMPONENTS
            )));
        }

        self.update_buffer::<V::Component>(bytemuck::cast_slice(data), start, count)
    }
}

impl Bind for VertexBuffer {
    fn bind(&self, bind: bool) -> Result<()> {
        let point = BindPoint::Buffer(BufferTarget::Array);
        if bind {
            self.res.context().bind(point, self.handle())
        } else {
            self.res.context().unbind(point)
        }
    }
}

/// Describes where the vertex attributes of a draw come from. The array keeps the
/// vertex buffers it references alive.
#[derive(Debug)]
pub struct VertexArray {
    res: Resource,
    buffers: BTreeMap<u32, Rc<VertexBuffer>>,
}

impl VertexArray {
    pub fn new(ctx: &Context) -> Result<Self> {
        Ok(VertexArray {
            res: Resource::new(ctx, ObjectKind::VertexArray)?,
            buffers: BTreeMap::new(),
        })
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.res.handle()
    }

    #[inline]
    pub fn buffer(&self, location: u32) -> Option<&Rc<VertexBuffer>> {
        self.buffers.get(&location)
    }

    /// The attribute locations that are fed by a buffer.
    pub fn locations(&self) -> impl Iterator<Item = u32> + '_ {
        self.buffers.keys().cloned()
    }

    /// Feeds the attribute `location` with `vbo`, using the layout recorded by its last
    /// `create_buffer`. Replaces the buffer previously added at `location`.
    pub fn add_vertex_buffer(&mut self, location: u32, vbo: Rc<VertexBuffer>) -> Result<()> {
        let layout = vbo.layout();
        if layout.components == 0 || layout.components > 4 {
            return Err(Error::InvalidArgument(format!(
                "vertex attributes have 1 to 4 components, got {}",
                layout.components
            )));
        }

        {
            let _vao = Binder::new(&*self)?;
            let _vbo = Binder::new(&*vbo)?;
            self.res.context().with(|dev| {
                dev.vertex_attrib_pointer(location, layout.components, layout.data_type)?;
                dev.enable_vertex_attrib(location)
            })?;
        }

        self.buffers.insert(location, vbo);
        Ok(())
    }

    /// Draws `count` vertices starting from `first`. This array and a linked program
    /// must be bound.
    pub fn render(&self, mode: DrawMode, first: u32, count: u32) -> Result<()> {
        let ctx = self.res.context();
        if !ctx.is_current(BindPoint::VertexArray, self.handle())? {
            return Err(Error::NotBound("render a vertex array"));
        }

        if ctx.current(BindPoint::Program)?.is_none() {
            return Err(Error::NotBound("render without a program"));
        }

        ctx.with(|dev| dev.draw_arrays(mode, first, count))
    }
}

impl Bind for VertexArray {
    fn bind(&self, bind: bool) -> Result<()> {
        if bind {
            self.res
                .context()
                .bind(BindPoint::VertexArray, self.handle())
        } else {
            self.res.context().unbind(BindPoint::VertexArray)
        }
    }
}
