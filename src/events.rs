use crate::ecs::components::{CollectibleId, NpcRole};
use crate::session::ChallengeOutcome;

/// Something the UI/audio side should react to. Raised by the simulation,
/// drained by the app once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    NpcNearby(NpcRole),
    NpcLeft(NpcRole),
    ChallengeStarted {
        duration_secs: u32,
        total: u32,
    },
    TimerTick {
        time_left: u32,
        health: f32,
    },
    CollectibleConsumed {
        id: CollectibleId,
        score: u32,
    },
    ChallengeEnded {
        outcome: ChallengeOutcome,
        score: u32,
        time_left: u32,
    },
    FreeRoamResumed,
}

/// FIFO of events raised during the current frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
