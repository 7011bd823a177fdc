//! Positional construction arguments
//!
//! A convenience layer over [`ControllerConfig`]: callers may pass up to two
//! loosely typed values (a context type name, a configuration, a callback)
//! in either order and have them sorted by kind.

use flick_paint::{ContextType, RenderingContext, SurfaceInfo};

use crate::error::{AnimationError, ArgumentKind, Result};
use crate::options::{AnimationOptions, ControllerConfig, FrameFn};

/// One positional construction value
pub enum ControllerArg<C> {
    ContextType(String),
    Config(ControllerConfig<C>),
    Callback(FrameFn<C>),
}

impl<C: RenderingContext> ControllerArg<C> {
    /// Wrap a closure as a callback argument
    pub fn callback<F>(callback: F) -> Self
    where
        F: FnMut(&SurfaceInfo, &mut C, f64) + 'static,
    {
        ControllerArg::Callback(Box::new(callback))
    }

    pub fn kind(&self) -> ArgumentKind {
        match self {
            ControllerArg::ContextType(_) => ArgumentKind::ContextType,
            ControllerArg::Config(_) => ArgumentKind::Config,
            ControllerArg::Callback(_) => ArgumentKind::Callback,
        }
    }
}

impl<C> From<&str> for ControllerArg<C> {
    fn from(value: &str) -> Self {
        ControllerArg::ContextType(value.to_string())
    }
}

impl<C> From<String> for ControllerArg<C> {
    fn from(value: String) -> Self {
        ControllerArg::ContextType(value)
    }
}

impl<C> From<ControllerConfig<C>> for ControllerArg<C> {
    fn from(config: ControllerConfig<C>) -> Self {
        ControllerArg::Config(config)
    }
}

impl<C: RenderingContext> From<AnimationOptions> for ControllerArg<C> {
    fn from(options: AnimationOptions) -> Self {
        ControllerArg::Config(options.into())
    }
}

/// Sort up to two positional values into one configuration
///
/// Two values of the same kind are an error. A callback or context type set
/// inside the configuration takes precedence over the positional one.
pub fn resolve_args<C: RenderingContext>(
    first: Option<ControllerArg<C>>,
    second: Option<ControllerArg<C>>,
) -> Result<ControllerConfig<C>> {
    if let (Some(a), Some(b)) = (&first, &second) {
        if a.kind() == b.kind() {
            return Err(AnimationError::DuplicateArgument(a.kind()));
        }
    }

    let mut context_type = None;
    let mut config = None;
    let mut callback = None;

    for arg in first.into_iter().chain(second) {
        match arg {
            ControllerArg::ContextType(name) => match ContextType::parse(&name) {
                Some(parsed) => context_type = Some(parsed),
                None => tracing::debug!("Ignoring unknown context type {:?}", name),
            },
            ControllerArg::Config(c) => config = Some(c),
            ControllerArg::Callback(f) => callback = Some(f),
        }
    }

    let mut config = config.unwrap_or_default();
    if config.context_type.is_none() {
        config.context_type = context_type;
    }
    if config.callback.is_none() {
        config.callback = callback;
    }
    Ok(config)
}
