//! `AutoOpenHost` over the Bevy world.
use bevy::{
    ecs::{message::MessageWriter, system::SystemParam},
    prelude::*,
};

use crate::world::components::Player;

use super::{
    components::{ContainerOpened, Interactive, PlayerController, UseHandler},
    errors::HostError,
    host::{AutoOpenHost, ObjectKey, PlayerContext, UseArgs},
    state::AutoOpenState,
};

/// Loop state specialised to ECS entities.
pub type EcsAutoOpenState = AutoOpenState<Entity>;

/// Read access to the player and write access to interactive objects.
#[derive(SystemParam)]
pub struct EcsHost<'w, 's> {
    controllers: Query<'w, 's, (Entity, &'static PlayerController)>,
    pawns: Query<'w, 's, &'static Transform, With<Player>>,
    objects: Query<
        'w,
        's,
        (
            Entity,
            &'static mut Interactive,
            Option<&'static Transform>,
            Option<&'static Name>,
        ),
        Without<Player>,
    >,
    opened: MessageWriter<'w, ContainerOpened>,
}

impl AutoOpenHost for EcsHost<'_, '_> {
    type Object = Entity;
    type Actor = Entity;

    fn player(&self) -> Option<PlayerContext<Entity>> {
        let (controller, player_controller) = self.controllers.single().ok()?;
        let pawn = player_controller.pawn?;
        let location = self
            .pawns
            .get(pawn)
            .ok()
            .map(|transform| transform.translation);
        Some(PlayerContext {
            pawn,
            controller: Some(controller),
            location,
        })
    }

    fn find_all(&self, class: &str) -> Result<Vec<Entity>, HostError> {
        Ok(self
            .objects
            .iter()
            .filter(|(_, interactive, _, _)| interactive.class == class)
            .map(|(entity, _, _, _)| entity)
            .collect())
    }

    fn is_valid(&self, object: Entity) -> bool {
        self.objects.contains(object)
    }

    fn identity(&self, object: Entity) -> ObjectKey {
        // Entity bits include the generation, so a recycled index never aliases.
        ObjectKey::new(object.to_bits())
    }

    fn location(&self, object: Entity) -> Option<Vec3> {
        self.objects
            .get(object)
            .ok()
            .and_then(|(_, _, transform, _)| transform.map(|transform| transform.translation))
    }

    fn definition(&self, object: Entity) -> Result<Option<String>, HostError> {
        self.objects
            .get(object)
            .map(|(_, interactive, _, _)| interactive.definition.clone())
            .map_err(|_| HostError::StaleHandle)
    }

    fn display_name(&self, object: Entity) -> Option<String> {
        self.objects
            .get(object)
            .ok()
            .and_then(|(_, _, _, name)| name.map(|name| name.as_str().to_string()))
    }

    fn object_type(&self, object: Entity) -> String {
        self.objects
            .get(object)
            .map(|(_, interactive, _, _)| interactive.kind.clone())
            .unwrap_or_default()
    }

    fn used_by(&mut self, object: Entity, args: UseArgs<Entity>) -> Result<(), HostError> {
        let (entity, mut interactive, _, name) = self
            .objects
            .get_mut(object)
            .map_err(|_| HostError::StaleHandle)?;

        let pawn = match (interactive.handler, args) {
            (UseHandler::Inert, _) => return Err(HostError::MissingEntryPoint),
            (UseHandler::Jammed, _) => return Err(HostError::fault("mechanism jammed")),
            (UseHandler::PawnOnly, UseArgs::Pawn(pawn)) => pawn,
            (UseHandler::PawnAndController, UseArgs::PawnAndController(pawn, _)) => pawn,
            _ => return Err(HostError::SignatureMismatch),
        };

        interactive.uses = interactive.uses.saturating_add(1);
        let name = name
            .map(|name| name.as_str().to_string())
            .unwrap_or_else(|| format!("{entity}"));
        self.opened.write(ContainerOpened {
            container: entity,
            name,
            opened_by: pawn,
        });
        Ok(())
    }
}
