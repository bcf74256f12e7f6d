//! Components and messages the ECS host exposes to the auto-open loop.
use bevy::{ecs::message::Message, prelude::*};

use super::host::INTERACTIVE_OBJECT_CLASS;

/// How an object's `UsedBy` entry point reacts to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseHandler {
    /// Accepts the pawn on its own.
    PawnOnly,
    /// Wants the pawn and its controller.
    PawnAndController,
    /// Has no entry point.
    Inert,
    /// Raises whenever it is used.
    Jammed,
}

/// A world object the player can use: chests, crates, doors between areas.
#[derive(Component, Debug, Clone)]
pub struct Interactive {
    pub class: String,
    pub kind: String,
    pub definition: Option<String>,
    pub handler: UseHandler,
    pub uses: u32,
}

impl Interactive {
    pub fn new(kind: impl Into<String>, definition: Option<String>, handler: UseHandler) -> Self {
        Self {
            class: INTERACTIVE_OBJECT_CLASS.to_string(),
            kind: kind.into(),
            definition,
            handler,
            uses: 0,
        }
    }

    /// A lootable container with the given definition asset.
    pub fn container(definition: impl Into<String>) -> Self {
        Self::new(
            "Lootable",
            Some(format!(
                "InteractiveObjectDefinition'{}'",
                definition.into()
            )),
            UseHandler::PawnOnly,
        )
    }

    /// A door or lift that moves the player to another area.
    pub fn map_transit(definition: impl Into<String>) -> Self {
        Self::new(
            "Transit",
            Some(format!(
                "InteractiveObjectDefinition'GD_MapChangeObjects.{}'",
                definition.into()
            )),
            UseHandler::PawnAndController,
        )
    }

    pub fn with_handler(mut self, handler: UseHandler) -> Self {
        self.handler = handler;
        self
    }
}

/// The controller of the player pawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerController {
    pub pawn: Option<Entity>,
}

/// Sent when an object's `UsedBy` ran to completion.
#[derive(Message, Debug, Clone)]
pub struct ContainerOpened {
    pub container: Entity,
    pub name: String,
    pub opened_by: Entity,
}
