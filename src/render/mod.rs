pub mod instance;

use glam::Vec2;

use crate::ecs::components::{JumpPhase, Kind, Transform};
use crate::farm::Farm;
use crate::session::Session;

use self::instance::ActorInstance;

/// Read-outs for the overlay: mode banner, score, timer, health bar, chat
/// panel and the touch knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub mode: &'static str,
    pub score: u32,
    pub total: u32,
    pub time_left: u32,
    /// 0..=100, proportional to time left.
    pub health: f32,
    /// Whether the one-second countdown is ticking.
    pub timer_running: bool,
    pub chat_open: bool,
    pub jump: JumpPhase,
    /// Knob offset from the joystick base while a touch is active.
    pub joystick_knob: Option<Vec2>,
}

impl Hud {
    pub fn from_farm(farm: &Farm, joystick_knob: Option<Vec2>) -> Self {
        let session = &farm.session;
        Self {
            mode: session.mode().label(),
            score: session.score(),
            total: session.total(),
            time_left: session.time_left(),
            health: session.health(),
            timer_running: session.countdown_active(),
            chat_open: farm.chat_open,
            jump: farm.player_jump(),
            joystick_knob,
        }
    }
}

/// Hands committed transforms to whatever draws the scene. The buffer is
/// reused between frames.
pub struct RenderHandoff {
    instances: Vec<ActorInstance>,
}

impl RenderHandoff {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild the instance list from the entity store.
    pub fn build(&mut self, world: &hecs::World, session: &Session) -> &[ActorInstance] {
        self.instances.clear();
        for (_, (transform, kind)) in world.query::<(&Transform, &Kind)>().iter() {
            self.instances
                .push(ActorInstance::from_components(transform, kind, session));
        }
        &self.instances
    }

    pub fn instances(&self) -> &[ActorInstance] {
        &self.instances
    }

    pub fn visible_count(&self) -> usize {
        self.instances.iter().filter(|i| i.visible).count()
    }
}

#[cfg(test)]
mod tests {
    use super::instance::Model;
    use super::*;
    use crate::config::FarmConfig;
    use crate::ecs::components::CollectibleId;
    use crate::events::EventQueue;

    #[test]
    fn haystacks_follow_session_state() {
        let mut world = hecs::World::new();
        world.spawn((Kind::Player, Transform::at(0.0, 0.0, 0.0)));
        world.spawn((
            Kind::Collectible(CollectibleId(0)),
            Transform::at(10.0, 0.0, 10.0),
        ));
        world.spawn((
            Kind::Collectible(CollectibleId(1)),
            Transform::at(20.0, 0.0, 20.0),
        ));
        let mut session = Session::new(2, 60);
        let mut events = EventQueue::new();
        let mut handoff = RenderHandoff::with_capacity(8);

        handoff.build(&world, &session);
        assert_eq!(handoff.instances().len(), 3);
        assert_eq!(handoff.visible_count(), 1);

        session.start_challenge(&mut events);
        session.try_consume(CollectibleId(1), &mut events);
        let instances = handoff.build(&world, &session);
        let eaten = instances
            .iter()
            .find(|i| i.model == Model::Haystack && i.position[0] == 20.0)
            .unwrap();
        assert_eq!(eaten.scale, 0.5);
        assert!(eaten.visible);
        assert_eq!(handoff.visible_count(), 3);
    }

    #[test]
    fn hud_reflects_the_session() {
        let mut config = FarmConfig::default();
        config.sim.seed = Some(3);
        let mut farm = Farm::build(config);

        let hud = Hud::from_farm(&farm, None);
        assert_eq!(hud.mode, "Free Roam");
        assert_eq!(hud.total, 12);
        assert_eq!(hud.time_left, 60);
        assert_eq!(hud.jump, JumpPhase::Idle);
        assert!(!hud.timer_running);

        farm.session.start_challenge(&mut farm.events);
        farm.session.advance(30.0, &mut farm.events);
        let hud = Hud::from_farm(&farm, Some(Vec2::new(0.0, -50.0)));
        assert_eq!(hud.mode, "Challenge");
        assert_eq!(hud.time_left, 30);
        assert!(hud.timer_running);
        assert!((hud.health - 50.0).abs() < 1e-4);
        assert_eq!(hud.joystick_knob, Some(Vec2::new(0.0, -50.0)));
    }
}
