use std::f32::consts::PI;

use crate::config::HorseConfig;
use crate::ecs::components::{JumpState, Transform};
use crate::fence::FenceRegistry;
use crate::input::InputSignal;

/// What happened to the horse's ground move this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Fence check passed, move applied.
    Committed,
    /// High enough in a jump that fences were ignored.
    Vaulted,
    /// Candidate overlapped a fence; x and z both left unchanged.
    Blocked,
}

/// Height of the jump arc at `progress` in [0, 1]. Peaks at 0.5.
pub fn jump_offset(progress: f32, jump_height: f32) -> f32 {
    (progress * PI).sin() * jump_height
}

/// Drive the player's horse for one tick: jump arc, collision-gated move,
/// then turning. Returns `None` when there is no player entity yet.
pub fn update(
    world: &mut hecs::World,
    player: Option<hecs::Entity>,
    fences: &FenceRegistry,
    horse: &HorseConfig,
    input: &InputSignal,
) -> Option<MoveOutcome> {
    let player = player?;
    let (transform, jump) = world
        .query_one_mut::<(&mut Transform, &mut JumpState)>(player)
        .ok()?;

    advance_jump(jump, &mut transform.position.y, input.jump, horse);

    let candidate = transform.ground() + transform.forward() * horse.speed * input.drive();

    let outcome = if clears_fences(jump, transform.position.y, horse.jump_clearance) {
        MoveOutcome::Vaulted
    } else if fences.is_blocked(candidate.x, candidate.y, horse.radius) {
        MoveOutcome::Blocked
    } else {
        MoveOutcome::Committed
    };

    if outcome != MoveOutcome::Blocked {
        transform.position.x = candidate.x;
        transform.position.z = candidate.y;
    }

    // Unclamped; sin/cos wrap it.
    transform.heading += horse.rotation_speed * input.steer();

    Some(outcome)
}

fn advance_jump(jump: &mut JumpState, y: &mut f32, requested: bool, horse: &HorseConfig) {
    if requested && !jump.is_jumping() {
        *jump = JumpState::Airborne {
            start_y: *y,
            progress: 0.0,
        };
    }

    if let JumpState::Airborne { start_y, progress } = *jump {
        let progress = progress + horse.jump_step;
        if progress <= 1.0 {
            *y = start_y + jump_offset(progress, horse.jump_height);
            *jump = JumpState::Airborne { start_y, progress };
        } else {
            // Landed
            *y = start_y;
            *jump = JumpState::Idle;
        }
    }
}

fn clears_fences(jump: &JumpState, y: f32, clearance: f32) -> bool {
    match *jump {
        JumpState::Airborne { start_y, .. } => y - start_y > clearance,
        JumpState::Idle => false,
    }
}
