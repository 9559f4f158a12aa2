//! Scene error types

use crate::foundation::collections::GameObjectId;
use std::fmt;
use thiserror::Error;

/// Result type returned by fallible component hooks
pub type HookResult = Result<(), HookError>;

/// Error raised from inside a component hook
#[derive(Error, Debug)]
pub enum HookError {
    /// Hook failed with a message
    #[error("{0}")]
    Failed(String),

    /// Hook failed with an underlying error
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HookError {
    /// Create a hook failure from a message
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Per-frame hook that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// `Component::start`
    Start,
    /// `Component::update`
    Update,
    /// `Component::render`
    Render,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Update => "update",
            Self::Render => "render",
        };
        f.write_str(name)
    }
}

/// Scene graph errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// A second instance of a single-instance component type was added
    #[error("Component {component} can only exist once per GameObject ({object:?})")]
    SingleInstanceViolation {
        /// Type name of the rejected component
        component: &'static str,
        /// Object the component was added to
        object: GameObjectId,
    },

    /// Handle does not name an object of this scene (never created, or destroyed)
    #[error("Unknown game object {0:?}")]
    UnknownGameObject(GameObjectId),

    /// Operation requires a live object but the object is unattached or being disposed
    #[error("Game object {0:?} is not live in this scene")]
    NotLive(GameObjectId),

    /// Reparenting would make an object its own ancestor
    #[error("Cannot parent {child:?} under {parent:?}: the parent is the object itself or one of its descendants")]
    CyclicParent {
        /// Object being reparented
        child: GameObjectId,
        /// Requested parent
        parent: GameObjectId,
    },

    /// A component hook failed while the scene propagates hook failures
    #[error("{hook} hook of {component} on {object:?} failed: {source}")]
    Hook {
        /// Owner of the failing component
        object: GameObjectId,
        /// Type name of the failing component
        component: &'static str,
        /// Hook that failed
        hook: HookKind,
        /// Underlying hook error
        #[source]
        source: HookError,
    },
}
