use crate::ecs::components::{AnimalKind, Kind, Transform};
use crate::session::Session;

/// Scale of a haystack the horse has already eaten.
const EATEN_SCALE: f32 = 0.5;

/// Model the renderer should draw for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Model {
    Horse = 0,
    Cow = 1,
    Chicken = 2,
    Haystack = 3,
    Farmer = 4,
}

/// One drawable actor, flattened from the entity store each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorInstance {
    pub position: [f32; 3],
    /// Yaw in radians.
    pub heading: f32,
    pub model: Model,
    pub scale: f32,
    pub visible: bool,
}

impl ActorInstance {
    /// Build an instance from components. Haystack visibility and size come
    /// from the session.
    pub fn from_components(transform: &Transform, kind: &Kind, session: &Session) -> Self {
        let (model, scale, visible) = match *kind {
            Kind::Player => (Model::Horse, 1.5, true),
            Kind::Animal(AnimalKind::Cow) => (Model::Cow, 1.0, true),
            Kind::Animal(AnimalKind::Chicken) => (Model::Chicken, 1.0, true),
            Kind::Npc(_) => (Model::Farmer, 1.0, true),
            Kind::Collectible(id) => {
                let state = session.collectible(id).unwrap_or_default();
                let scale = if state.consumed { EATEN_SCALE } else { 1.0 };
                (Model::Haystack, scale, state.visible)
            }
        };

        Self {
            position: transform.position.into(),
            heading: transform.heading,
            model,
            scale,
            visible,
        }
    }
}
