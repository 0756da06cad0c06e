use glam::{Vec2, Vec3};

use crate::field::FieldBounds;

/// World-space placement. `heading` is the yaw in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub heading: f32,
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            heading: 0.0,
        }
    }

    /// Position on the ground plane as (x, z).
    pub fn ground(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Unit vector the actor faces on the ground plane, as (x, z).
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.heading.sin(), self.heading.cos())
    }
}

/// What an entity is. One tag per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Player,
    Animal(AnimalKind),
    Collectible(CollectibleId),
    Npc(NpcRole),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimalKind {
    Cow,
    Chicken,
}

/// Index into the session's collectible table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectibleId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcRole {
    /// Farmer Joe - offers the haystack challenge.
    ChallengeHost,
    /// Farmer Steve - opens the chat panel.
    ChatGuide,
}

impl NpcRole {
    pub fn label(self) -> &'static str {
        match self {
            NpcRole::ChallengeHost => "Farmer Joe",
            NpcRole::ChatGuide => "Farmer Steve",
        }
    }
}

/// Player vertical arc.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum JumpState {
    #[default]
    Idle,
    Airborne {
        start_y: f32,
        /// 0.0 at take-off, 1.0 at landing.
        progress: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Idle,
    Ascending,
    Descending,
}

impl JumpState {
    pub fn is_jumping(&self) -> bool {
        matches!(self, JumpState::Airborne { .. })
    }

    pub fn phase(&self) -> JumpPhase {
        match *self {
            JumpState::Idle => JumpPhase::Idle,
            JumpState::Airborne { progress, .. } if progress < 0.5 => JumpPhase::Ascending,
            JumpState::Airborne { .. } => JumpPhase::Descending,
        }
    }
}

/// Random-walk state for an animal.
#[derive(Debug, Clone, Copy)]
pub struct WanderState {
    /// Travel direction in radians; x moves by cos, z by sin.
    pub direction: f32,
    /// Units per tick.
    pub speed: f32,
    /// Seconds since the last direction change.
    pub change_timer: f32,
    /// Seconds until the next direction change.
    pub change_after: f32,
    /// Home field centre, assigned at spawn and never changed.
    pub field_center: Option<Vec2>,
}

impl WanderState {
    /// Containment rectangle: around the home field when one was assigned,
    /// otherwise whichever quadrant the animal is standing in.
    pub fn field_bounds(&self, position: Vec2, inset: f32) -> Option<FieldBounds> {
        match self.field_center {
            Some(center) => Some(FieldBounds::around(center, inset)),
            None => FieldBounds::quadrant_of(position.x, position.y),
        }
    }
}

/// Interaction radius and edge-detect flag for an NPC.
#[derive(Debug, Clone, Copy)]
pub struct Npc {
    pub role: NpcRole,
    pub interaction_distance: f32,
    /// Whether the player was within range last tick.
    pub player_near: bool,
}
