pub mod locomotion;
pub mod proximity;
pub mod wander;

use crate::config::FarmConfig;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::events::EventQueue;
use crate::fence::FenceRegistry;
use crate::input::InputSignal;
use crate::session::Session;

use locomotion::MoveOutcome;

/// Run all simulation systems for one fixed tick.
///
/// Order: player locomotion (with its fence checks), animals, proximity,
/// then the challenge countdown.
pub fn tick(
    world: &mut hecs::World,
    player: Option<hecs::Entity>,
    fences: &FenceRegistry,
    session: &mut Session,
    events: &mut EventQueue,
    rng: &mut fastrand::Rng,
    config: &FarmConfig,
    input: &InputSignal,
    input_suppressed: bool,
    dt: f32,
    elapsed: f32,
    timers: &mut SystemTimers,
) -> Option<MoveOutcome> {
    // 1. Horse movement (skipped entirely while the chat panel has focus)
    timers.begin();
    let outcome = if input_suppressed {
        None
    } else {
        locomotion::update(world, player, fences, &config.horse, input)
    };
    timers.end(SystemPhase::Locomotion);

    // 2. Animals
    timers.begin();
    wander::update(
        world,
        fences,
        &config.animals,
        &config.world,
        rng,
        dt,
        elapsed,
    );
    timers.end(SystemPhase::Wander);

    // 3. Pickups + NPC proximity
    timers.begin();
    proximity::update(world, player, session, events, &config.challenge);
    timers.end(SystemPhase::Proximity);

    // 4. Countdown
    timers.begin();
    session.advance(dt, events);
    timers.end(SystemPhase::Session);

    outcome
}
