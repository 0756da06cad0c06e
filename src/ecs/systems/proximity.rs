use crate::config::ChallengeConfig;
use crate::ecs::components::{Kind, Npc, Transform};
use crate::events::{EventQueue, GameEvent};
use crate::session::Session;

/// Distance checks between the horse and everything it can interact with:
/// haystack pickups during a running challenge, NPC enter/leave in free roam.
pub fn update(
    world: &mut hecs::World,
    player: Option<hecs::Entity>,
    session: &mut Session,
    events: &mut EventQueue,
    challenge: &ChallengeConfig,
) {
    let Some(player) = player else {
        return;
    };
    let Ok(player_pos) = world.get::<&Transform>(player).map(|t| t.position) else {
        return;
    };

    if session.is_running() {
        for (_, (transform, kind)) in world.query::<(&Transform, &Kind)>().iter() {
            let Kind::Collectible(id) = *kind else {
                continue;
            };
            if transform.position.distance(player_pos) < challenge.pickup_radius {
                session.try_consume(id, events);
            }
        }
    }

    let free_roam = session.is_free_roam();
    for (_, (transform, npc)) in world.query_mut::<(&Transform, &mut Npc)>() {
        let in_range = transform.position.distance(player_pos) < npc.interaction_distance;
        if in_range && free_roam && !npc.player_near {
            npc.player_near = true;
            log::debug!("{} is nearby", npc.role.label());
            events.push(GameEvent::NpcNearby(npc.role));
        } else if !in_range && npc.player_near {
            npc.player_near = false;
            events.push(GameEvent::NpcLeft(npc.role));
        }
    }
}
