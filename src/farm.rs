use glam::Vec2;

use crate::config::FarmConfig;
use crate::debug::timer::SystemTimers;
use crate::ecs::components::*;
use crate::ecs::systems;
use crate::ecs::systems::locomotion::MoveOutcome;
use crate::ecs::systems::wander;
use crate::events::EventQueue;
use crate::fence::FenceRegistry;
use crate::field::FieldTheme;
use crate::input::InputSignal;
use crate::session::Session;

/// NPCs stand at least this far from their field centre, clear of the barn.
const NPC_CLEARANCE_FROM_CENTER: f32 = 600.0;

/// Candidate spots for Farmer Joe, tried in order.
const JOE_SPOTS: [Vec2; 5] = [
    Vec2::new(-1400.0, -1400.0),
    Vec2::new(-1600.0, -800.0),
    Vec2::new(-800.0, -1600.0),
    Vec2::new(-1500.0, -1000.0),
    Vec2::new(-1000.0, -1500.0),
];

/// Candidate spots for Farmer Steve, tried in order.
const STEVE_SPOTS: [Vec2; 5] = [
    Vec2::new(1400.0, -1400.0),
    Vec2::new(1600.0, -800.0),
    Vec2::new(800.0, -1600.0),
    Vec2::new(1500.0, -1000.0),
    Vec2::new(1000.0, -1500.0),
];

/// Everything the simulation owns: entity store, fences, challenge session
/// and the event queue the UI side drains.
pub struct Farm {
    pub world: hecs::World,
    fences: FenceRegistry,
    pub session: Session,
    pub events: EventQueue,
    rng: fastrand::Rng,
    config: FarmConfig,
    player: Option<hecs::Entity>,
    /// Set while the chat panel has focus; the horse ignores input.
    pub chat_open: bool,
    elapsed: f32,
}

impl Farm {
    /// Build the whole farm: fences, animals, haystacks, NPCs and the horse.
    pub fn build(config: FarmConfig) -> Self {
        let mut rng = match config.sim.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let mut world = hecs::World::new();
        let fences = FenceRegistry::farm_layout(config.world.half_extent);
        log::info!("Fenced farm with {} runs", fences.len());

        for theme in FieldTheme::ALL {
            let (kind, count) = match theme {
                FieldTheme::Pasture => (AnimalKind::Cow, config.animals.cow_count),
                FieldTheme::HayField => (AnimalKind::Chicken, config.animals.chicken_count),
                FieldTheme::Wildflowers | FieldTheme::Wheat => continue,
            };
            spawn_animals(&mut world, &mut rng, &config, theme.center(), kind, count);
            log::info!("Spawned {} {:?}s in the {}", count, kind, theme.label());
        }

        spawn_haystacks(&mut world, &mut rng, &config);

        for (role, theme, spots) in [
            (NpcRole::ChallengeHost, FieldTheme::Wildflowers, &JOE_SPOTS),
            (NpcRole::ChatGuide, FieldTheme::Wheat, &STEVE_SPOTS),
        ] {
            let spot = place_npc(spots, theme.center());
            world.spawn((
                Kind::Npc(role),
                Transform::at(spot.x, 0.0, spot.y),
                Npc {
                    role,
                    interaction_distance: config.challenge.npc_interaction_distance,
                    player_near: false,
                },
            ));
            log::info!("{} waits at ({}, {})", role.label(), spot.x, spot.y);
        }

        let [x, y, z] = config.horse.spawn;
        let player = world.spawn((Kind::Player, Transform::at(x, y, z), JumpState::Idle));

        Self {
            world,
            fences,
            session: Session::new(
                config.challenge.haystack_count,
                config.challenge.duration_secs,
            ),
            events: EventQueue::new(),
            rng,
            config,
            player: Some(player),
            chat_open: false,
            elapsed: 0.0,
        }
    }

    pub fn player(&self) -> Option<hecs::Entity> {
        self.player
    }

    pub fn player_transform(&self) -> Option<Transform> {
        let player = self.player?;
        self.world.get::<&Transform>(player).ok().map(|t| *t)
    }

    pub fn player_jump(&self) -> JumpPhase {
        self.player
            .and_then(|player| self.world.get::<&JumpState>(player).ok().map(|j| j.phase()))
            .unwrap_or(JumpPhase::Idle)
    }

    /// Whether the player is inside the given NPC's interaction radius.
    pub fn is_near(&self, role: NpcRole) -> bool {
        self.world
            .query::<&Npc>()
            .iter()
            .any(|(_, npc)| npc.role == role && npc.player_near)
    }

    /// Advance one fixed tick.
    pub fn tick(
        &mut self,
        input: &InputSignal,
        dt: f32,
        timers: &mut SystemTimers,
    ) -> Option<MoveOutcome> {
        self.elapsed += dt;
        systems::tick(
            &mut self.world,
            self.player,
            &self.fences,
            &mut self.session,
            &mut self.events,
            &mut self.rng,
            &self.config,
            input,
            self.chat_open,
            dt,
            self.elapsed,
            timers,
        )
    }
}

/// First candidate far enough from the field centre, else the first one.
/// With no candidates at all the NPC stands at the centre.
pub fn place_npc(candidates: &[Vec2], field_center: Vec2) -> Vec2 {
    candidates
        .iter()
        .copied()
        .find(|spot| spot.distance(field_center) >= NPC_CLEARANCE_FROM_CENTER)
        .or_else(|| candidates.first().copied())
        .unwrap_or(field_center)
}

fn spawn_animals(
    world: &mut hecs::World,
    rng: &mut fastrand::Rng,
    config: &FarmConfig,
    center: Vec2,
    kind: AnimalKind,
    count: usize,
) {
    let spread = config.animals.spawn_spread;
    for _ in 0..count {
        let x = center.x + (rng.f32() - 0.5) * 2.0 * spread;
        let z = center.y + (rng.f32() - 0.5) * 2.0 * spread;
        let speed = match kind {
            AnimalKind::Cow => 1.0 + rng.f32(),
            AnimalKind::Chicken => 2.0 + rng.f32() * 2.0,
        };
        let direction = rng.f32() * std::f32::consts::TAU;

        world.spawn((
            Kind::Animal(kind),
            Transform {
                position: glam::Vec3::new(x, 0.0, z),
                heading: direction + std::f32::consts::PI,
            },
            WanderState {
                direction,
                speed,
                change_timer: 0.0,
                change_after: wander::roll_change_after(&config.animals, rng),
                field_center: Some(center),
            },
        ));
    }
}

/// Haystacks start hidden; the session reveals them when a challenge begins.
fn spawn_haystacks(world: &mut hecs::World, rng: &mut fastrand::Rng, config: &FarmConfig) {
    let spread = config.challenge.haystack_spread;
    for i in 0..config.challenge.haystack_count {
        let x = (rng.f32() - 0.5) * 2.0 * spread;
        let z = (rng.f32() - 0.5) * 2.0 * spread;
        world.spawn((
            Kind::Collectible(CollectibleId(i)),
            Transform::at(x, 0.0, z),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;
    use crate::session::{ChallengeOutcome, ChallengePhase, GameMode};

    const DT: f32 = 1.0 / 60.0;

    fn seeded() -> Farm {
        let mut config = FarmConfig::default();
        config.sim.seed = Some(42);
        Farm::build(config)
    }

    fn count(farm: &Farm, pred: impl Fn(&Kind) -> bool) -> usize {
        farm.world
            .query::<&Kind>()
            .iter()
            .filter(|(_, k)| pred(k))
            .count()
    }

    fn teleport_player(farm: &mut Farm, x: f32, z: f32) {
        let player = farm.player().unwrap();
        let mut t = farm.world.get::<&mut Transform>(player).unwrap();
        t.position.x = x;
        t.position.z = z;
    }

    fn haystack_positions(farm: &Farm) -> Vec<(CollectibleId, Vec2)> {
        let mut out: Vec<_> = farm
            .world
            .query::<(&Kind, &Transform)>()
            .iter()
            .filter_map(|(_, (k, t))| match *k {
                Kind::Collectible(id) => Some((id, t.ground())),
                _ => None,
            })
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    #[test]
    fn builds_the_full_farm() {
        let farm = seeded();
        assert_eq!(farm.fences.len(), 6);
        assert_eq!(count(&farm, |k| *k == Kind::Animal(AnimalKind::Cow)), 8);
        assert_eq!(count(&farm, |k| *k == Kind::Animal(AnimalKind::Chicken)), 15);
        assert_eq!(count(&farm, |k| matches!(k, Kind::Collectible(_))), 12);
        assert_eq!(count(&farm, |k| matches!(k, Kind::Npc(_))), 2);
        assert_eq!(count(&farm, |k| *k == Kind::Player), 1);

        let horse = farm.player_transform().unwrap();
        assert_eq!(horse.ground(), Vec2::new(-600.0, -600.0));
        assert_eq!(farm.session.mode(), GameMode::FreeRoam);
    }

    #[test]
    fn npcs_skip_spots_too_close_to_the_barn() {
        let joe = place_npc(&JOE_SPOTS, FieldTheme::Wildflowers.center());
        assert_eq!(joe, Vec2::new(-1600.0, -800.0));
        let steve = place_npc(&STEVE_SPOTS, FieldTheme::Wheat.center());
        assert_eq!(steve, Vec2::new(1600.0, -800.0));
    }

    #[test]
    fn animals_stay_in_their_fields() {
        let mut farm = seeded();
        let mut timers = SystemTimers::new();
        for _ in 0..1800 {
            farm.tick(&InputSignal::default(), DT, &mut timers);
        }
        for (_, (kind, t)) in farm.world.query::<(&Kind, &Transform)>().iter() {
            let Kind::Animal(animal) = *kind else {
                continue;
            };
            let home = match animal {
                AnimalKind::Cow => FieldTheme::Pasture.center(),
                AnimalKind::Chicken => FieldTheme::HayField.center(),
            };
            // Fences keep them in the quadrant no matter what.
            assert!(t.position.x.signum() == home.x.signum(), "{animal:?} at {t:?}");
            assert!(t.position.z.signum() == home.y.signum(), "{animal:?} at {t:?}");
        }
    }

    #[test]
    fn chat_panel_freezes_the_horse() {
        let mut farm = seeded();
        let mut timers = SystemTimers::new();
        let forward = InputSignal {
            forward: 1.0,
            ..InputSignal::default()
        };
        farm.chat_open = true;
        let before = farm.player_transform().unwrap();
        assert_eq!(farm.tick(&forward, DT, &mut timers), None);
        assert_eq!(farm.player_transform().unwrap(), before);

        farm.chat_open = false;
        assert!(farm.tick(&forward, DT, &mut timers).is_some());
        assert_ne!(farm.player_transform().unwrap().ground(), before.ground());
    }

    #[test]
    fn challenge_round_trip() {
        let mut farm = seeded();
        let mut timers = SystemTimers::new();
        let idle = InputSignal::default();

        assert!(farm.session.start_challenge(&mut farm.events));

        // Visit every haystack in turn.
        for (id, pos) in haystack_positions(&farm) {
            teleport_player(&mut farm, pos.x, pos.y);
            farm.tick(&idle, DT, &mut timers);
            assert!(farm.session.collectible(id).unwrap().consumed);
        }

        assert_eq!(farm.session.score(), 12);
        assert_eq!(
            farm.session.mode(),
            GameMode::Challenge(ChallengePhase::Ended(ChallengeOutcome::AllCollected))
        );
        assert!(!farm.session.countdown_active());

        let ended = farm
            .events
            .drain()
            .filter(|e| matches!(e, GameEvent::ChallengeEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn near_host_is_reported() {
        let mut farm = seeded();
        let mut timers = SystemTimers::new();
        teleport_player(&mut farm, -1600.0, -900.0);
        farm.tick(&InputSignal::default(), DT, &mut timers);
        assert!(farm.is_near(NpcRole::ChallengeHost));
        assert!(!farm.is_near(NpcRole::ChatGuide));
        assert!(farm
            .events
            .iter()
            .any(|e| *e == GameEvent::NpcNearby(NpcRole::ChallengeHost)));
    }
}
