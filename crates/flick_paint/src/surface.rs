//! Drawing surfaces and the surface table
//!
//! A [`Surface`] is the drawable target an animation is bound to. It owns at
//! most one rendering context, obtained on first request the way a host
//! canvas hands out its context. Surfaces live in a [`SurfaceTable`], which
//! assigns their identity and resolves them by name.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::color::Color;
use crate::context::{ContextType, RenderingContext};
use crate::error::{PaintError, Result};
use crate::geometry::{Rect, Size};

new_key_type! {
    /// Identity of a surface within its table
    pub struct SurfaceId;
}

/// A surface shared between its table and the controllers drawing on it
pub type SharedSurface<C> = Rc<RefCell<Surface<C>>>;

/// Lightweight description of a surface, handed to frame callbacks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceInfo {
    pub id: SurfaceId,
    pub size: Size,
}

impl SurfaceInfo {
    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }
}

/// A drawable target with a lazily obtained rendering context
#[derive(Debug)]
pub struct Surface<C> {
    id: SurfaceId,
    name: Option<String>,
    size: Size,
    context: Option<C>,
}

impl<C: RenderingContext> Surface<C> {
    fn new(id: SurfaceId, name: Option<String>, size: Size) -> Self {
        Self {
            id,
            name,
            size,
            context: None,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// The full surface rectangle
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    pub fn info(&self) -> SurfaceInfo {
        SurfaceInfo {
            id: self.id,
            size: self.size,
        }
    }

    /// Obtain the rendering context of the given type
    ///
    /// The first call creates the context. Later calls return the same
    /// context if the type matches and `None` if a context of a different
    /// type was already obtained.
    pub fn get_context(&mut self, context_type: ContextType) -> Option<&mut C> {
        if self.context.is_none() {
            self.context = C::create(context_type, self.size);
            if self.context.is_none() {
                tracing::warn!(
                    "Surface {:?}: backend cannot provide a {} context",
                    self.id,
                    context_type
                );
            }
        }
        self.context
            .as_mut()
            .filter(|ctx| ctx.context_type() == context_type)
    }

    /// The context obtained so far, if any
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.context.as_mut()
    }

    pub fn context_type(&self) -> Option<ContextType> {
        self.context.as_ref().map(|ctx| ctx.context_type())
    }

    /// Surface description together with its context, for frame delivery
    pub fn frame_parts(&mut self) -> Option<(SurfaceInfo, &mut C)> {
        let info = self.info();
        self.context.as_mut().map(|ctx| (info, ctx))
    }

    /// Clear the whole surface
    pub fn clear(&mut self) {
        let bounds = self.bounds();
        if let Some(ctx) = self.context.as_mut() {
            ctx.clear_rect(bounds);
        }
    }

    /// Fill the whole surface with a color
    pub fn fill(&mut self, color: Color) {
        let bounds = self.bounds();
        if let Some(ctx) = self.context.as_mut() {
            ctx.fill_rect(bounds, color);
        }
    }
}

/// Owner of all surfaces known to a host
///
/// Plays the role of the host document: surfaces are created here, get
/// their [`SurfaceId`] here, and can be looked up by name.
pub struct SurfaceTable<C> {
    surfaces: SlotMap<SurfaceId, SharedSurface<C>>,
    names: FxHashMap<String, SurfaceId>,
}

impl<C: RenderingContext> SurfaceTable<C> {
    pub fn new() -> Self {
        Self {
            surfaces: SlotMap::with_key(),
            names: FxHashMap::default(),
        }
    }

    /// Create a surface, optionally reachable by `name`
    pub fn create(&mut self, name: Option<&str>, size: Size) -> Result<SharedSurface<C>> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = name {
            if self.names.contains_key(name) {
                return Err(PaintError::DuplicateSurfaceName(name.to_string()));
            }
        }

        let owned_name = name.map(str::to_string);
        let id = self.surfaces.insert_with_key(|id| {
            Rc::new(RefCell::new(Surface::new(id, owned_name, size)))
        });
        if let Some(name) = name {
            self.names.insert(name.to_string(), id);
        }

        tracing::debug!("SurfaceTable: created surface {:?} ({:?})", id, name);
        Ok(Rc::clone(&self.surfaces[id]))
    }

    pub fn get(&self, id: SurfaceId) -> Option<SharedSurface<C>> {
        self.surfaces.get(id).cloned()
    }

    /// Look a surface up by name
    pub fn find(&self, name: &str) -> Option<SharedSurface<C>> {
        self.names
            .get(name.trim())
            .and_then(|id| self.surfaces.get(*id))
            .cloned()
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(id)
    }

    /// Remove a surface from the table
    ///
    /// Controllers still holding the surface keep it alive.
    pub fn remove(&mut self, id: SurfaceId) -> Option<SharedSurface<C>> {
        let surface = self.surfaces.remove(id)?;
        self.names.retain(|_, v| *v != id);
        Some(surface)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl<C: RenderingContext> Default for SurfaceTable<C> {
    fn default() -> Self {
        Self::new()
    }
}
