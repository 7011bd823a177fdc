//! Controller registry
//!
//! Keeps the one-controller-per-surface rule explicit: the registry owns the
//! host capabilities and the surface table, and maps each surface identity to
//! the controller bound to it.

use std::rc::Rc;

use flick_paint::{RenderingContext, SharedSurface, Size, SurfaceId, SurfaceTable};
use flick_platform::Host;
use rustc_hash::FxHashMap;

use crate::args::{resolve_args, ControllerArg};
use crate::controller::AnimationController;
use crate::error::{AnimationError, Result};
use crate::options::ControllerConfig;

/// A reference to the surface a controller should bind to
pub enum SurfaceRef<C> {
    /// Surface name, looked up in the table
    Id(String),
    /// Direct handle to a surface of the table
    Handle(SharedSurface<C>),
    /// Collection of handles; the first element is used
    Collection(Vec<SharedSurface<C>>),
}

impl<C> From<&str> for SurfaceRef<C> {
    fn from(name: &str) -> Self {
        SurfaceRef::Id(name.to_string())
    }
}

impl<C> From<String> for SurfaceRef<C> {
    fn from(name: String) -> Self {
        SurfaceRef::Id(name)
    }
}

impl<C> From<SharedSurface<C>> for SurfaceRef<C> {
    fn from(surface: SharedSurface<C>) -> Self {
        SurfaceRef::Handle(surface)
    }
}

impl<C> From<&SharedSurface<C>> for SurfaceRef<C> {
    fn from(surface: &SharedSurface<C>) -> Self {
        SurfaceRef::Handle(Rc::clone(surface))
    }
}

impl<C> From<Vec<SharedSurface<C>>> for SurfaceRef<C> {
    fn from(surfaces: Vec<SharedSurface<C>>) -> Self {
        SurfaceRef::Collection(surfaces)
    }
}

/// Factory and owner of animation controllers
pub struct ControllerRegistry<C: RenderingContext + 'static> {
    host: Host,
    surfaces: SurfaceTable<C>,
    controllers: FxHashMap<SurfaceId, AnimationController<C>>,
}

impl<C: RenderingContext + 'static> ControllerRegistry<C> {
    pub fn new(host: Host) -> Self {
        Self {
            host,
            surfaces: SurfaceTable::new(),
            controllers: FxHashMap::default(),
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn surfaces(&self) -> &SurfaceTable<C> {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut SurfaceTable<C> {
        &mut self.surfaces
    }

    /// Create a surface in the registry's table
    pub fn create_surface(&mut self, name: Option<&str>, size: Size) -> Result<SharedSurface<C>> {
        Ok(self.surfaces.create(name, size)?)
    }

    /// Resolve a surface reference against the table
    pub fn resolve(&self, surface: SurfaceRef<C>) -> Result<SharedSurface<C>> {
        let handle = match surface {
            SurfaceRef::Id(name) => {
                return self
                    .surfaces
                    .find(&name)
                    .ok_or(AnimationError::SurfaceNotFound(name));
            }
            SurfaceRef::Handle(handle) => handle,
            SurfaceRef::Collection(handles) => handles
                .into_iter()
                .next()
                .ok_or(AnimationError::EmptySurfaceCollection)?,
        };

        // Handles must belong to this table
        let id = handle.borrow().id();
        match self.surfaces.get(id) {
            Some(known) if Rc::ptr_eq(&known, &handle) => Ok(handle),
            _ => Err(AnimationError::SurfaceNotFound(format!("{:?}", id))),
        }
    }

    /// Bind a controller to a surface, or return the one already bound
    ///
    /// When a controller already exists for the surface, `config` is not
    /// applied; call `config()` on the returned controller instead.
    pub fn create(
        &mut self,
        surface: impl Into<SurfaceRef<C>>,
        config: ControllerConfig<C>,
    ) -> Result<AnimationController<C>> {
        let surface = self.resolve(surface.into()).map_err(|err| {
            tracing::error!("Cannot create animation controller: {}", err);
            err
        })?;
        let id = surface.borrow().id();

        if let Some(existing) = self.controllers.get(&id) {
            tracing::debug!("Surface {:?} already has a controller; reusing it", id);
            return Ok(existing.clone());
        }

        let controller = AnimationController::new(&self.host, surface, config)?;
        self.controllers.insert(id, controller.clone());
        Ok(controller)
    }

    /// Like [`create`](Self::create), with the configuration given as up to
    /// two positional values of distinct kinds
    pub fn create_with_args(
        &mut self,
        surface: impl Into<SurfaceRef<C>>,
        first: Option<ControllerArg<C>>,
        second: Option<ControllerArg<C>>,
    ) -> Result<AnimationController<C>> {
        let config = resolve_args(first, second).map_err(|err| {
            tracing::error!("Cannot create animation controller: {}", err);
            err
        })?;
        self.create(surface, config)
    }

    pub fn get(&self, id: SurfaceId) -> Option<AnimationController<C>> {
        self.controllers.get(&id).cloned()
    }

    /// The controller bound to a surface reference, if any
    pub fn get_for(&self, surface: impl Into<SurfaceRef<C>>) -> Option<AnimationController<C>> {
        let surface = self.resolve(surface.into()).ok()?;
        let id = surface.borrow().id();
        self.get(id)
    }

    /// Stop and unbind the controller of a surface
    pub fn remove(&mut self, id: SurfaceId) -> Option<AnimationController<C>> {
        let controller = self.controllers.remove(&id)?;
        controller.stop(false);
        Some(controller)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
