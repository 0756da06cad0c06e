use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::config::{AnimalConfig, WorldConfig};
use crate::ecs::components::{AnimalKind, Kind, Transform, WanderState};
use crate::fence::FenceRegistry;

/// Total spread of the random nudge added when bouncing off a fence.
const REBOUND_JITTER: f32 = 0.5;
/// Chicken head-bob amplitude and rate.
const BOB_HEIGHT: f32 = 2.0;
const BOB_RATE: f32 = 8.0;

/// Random-walk every animal for one tick.
pub fn update(
    world: &mut hecs::World,
    fences: &FenceRegistry,
    animals: &AnimalConfig,
    bounds: &WorldConfig,
    rng: &mut fastrand::Rng,
    dt: f32,
    elapsed: f32,
) {
    for (_, (transform, wander, kind)) in
        world.query_mut::<(&mut Transform, &mut WanderState, &Kind)>()
    {
        step(transform, wander, fences, animals, bounds, rng, dt);

        if *kind == Kind::Animal(AnimalKind::Chicken) {
            transform.position.y =
                (elapsed * BOB_RATE + transform.position.x * 0.01).sin() * BOB_HEIGHT;
        }
    }
}

/// Pick the next direction-change deadline.
pub fn roll_change_after(animals: &AnimalConfig, rng: &mut fastrand::Rng) -> f32 {
    animals.change_min_secs + rng.f32() * (animals.change_max_secs - animals.change_min_secs)
}

/// One animal, one tick. Returns whether it moved.
///
/// Corrections only ever change the heading; position moves by at most
/// `speed` per tick.
pub fn step(
    transform: &mut Transform,
    wander: &mut WanderState,
    fences: &FenceRegistry,
    animals: &AnimalConfig,
    bounds: &WorldConfig,
    rng: &mut fastrand::Rng,
    dt: f32,
) -> bool {
    wander.change_timer += dt;
    if wander.change_timer > wander.change_after {
        wander.direction = rng.f32() * TAU;
        wander.change_timer = 0.0;
        wander.change_after = roll_change_after(animals, rng);
    }

    let heading = Vec2::new(wander.direction.cos(), wander.direction.sin());
    let candidate = transform.ground() + heading * wander.speed;

    let moved = if fences.is_blocked(candidate.x, candidate.y, animals.radius) {
        wander.direction += PI + (rng.f32() - 0.5) * REBOUND_JITTER;
        false
    } else {
        transform.position.x = candidate.x;
        transform.position.z = candidate.y;
        true
    };

    let position = transform.ground();

    // Head back toward the middle of the home field.
    if let Some(field) = wander.field_bounds(position, animals.field_inset) {
        if !field.contains(position.x, position.y) {
            let to_center = field.center() - position;
            wander.direction = to_center.y.atan2(to_center.x);
        }
    }

    // Last resort if something slipped past every fence.
    if position.x.abs() > bounds.safety_radius || position.y.abs() > bounds.safety_radius {
        wander.direction = (-position.y).atan2(-position.x);
    }

    // Model faces backwards relative to travel.
    transform.heading = wander.direction + PI;

    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldBounds;

    const DT: f32 = 1.0 / 60.0;

    fn cow_at(
        x: f32,
        z: f32,
        direction: f32,
        field_center: Option<Vec2>,
    ) -> (Transform, WanderState) {
        (
            Transform::at(x, 0.0, z),
            WanderState {
                direction,
                speed: 1.5,
                change_timer: 0.0,
                change_after: 5.0,
                field_center,
            },
        )
    }

    #[test]
    fn walks_along_direction() {
        let (mut t, mut w) = cow_at(-1000.0, -1000.0, 0.0, Some(Vec2::new(-1000.0, -1000.0)));
        let mut rng = fastrand::Rng::with_seed(1);
        let fences = FenceRegistry::farm_layout(2000.0);

        assert!(step(
            &mut t,
            &mut w,
            &fences,
            &AnimalConfig::default(),
            &WorldConfig::default(),
            &mut rng,
            DT
        ));
        assert!((t.position.x + 998.5).abs() < 1e-3);
        assert!((t.position.z + 1000.0).abs() < 1e-3);
        assert!((t.heading - PI).abs() < 1e-6);
    }

    #[test]
    fn rebounds_off_fence_without_moving() {
        let (mut t, mut w) = cow_at(-40.0, -1000.0, 0.0, Some(Vec2::new(-1000.0, -1000.0)));
        w.speed = 15.0;
        let mut rng = fastrand::Rng::with_seed(2);
        let fences = FenceRegistry::farm_layout(2000.0);

        let moved = step(
            &mut t,
            &mut w,
            &fences,
            &AnimalConfig::default(),
            &WorldConfig::default(),
            &mut rng,
            DT,
        );

        assert!(!moved);
        assert_eq!(t.position.x, -40.0);
        // Roughly reversed, now heading away from the divider.
        assert!(w.direction.cos() < -0.9);
    }

    #[test]
    fn strays_are_steered_home_without_teleporting() {
        let home = FieldBounds {
            min_x: -1900.0,
            max_x: -100.0,
            min_z: -1900.0,
            max_z: -100.0,
        };
        let (mut t, mut w) = cow_at(-50.0, -1000.0, 0.0, Some(home.center()));
        let animals = AnimalConfig::default();
        assert_eq!(w.field_bounds(t.ground(), animals.field_inset), Some(home));

        let fences = FenceRegistry::farm_layout(2000.0);
        let mut rng = fastrand::Rng::with_seed(3);
        let mut returned_after = None;

        for tick in 0..500 {
            let before = t.ground();
            step(&mut t, &mut w, &fences, &animals, &WorldConfig::default(), &mut rng, DT);
            assert!(t.ground().distance(before) <= w.speed + 1e-3, "jumped at tick {tick}");

            if home.contains(t.position.x, t.position.z) {
                returned_after = Some(tick);
                break;
            }
        }

        let ticks = returned_after.expect("cow never came home");
        assert!(ticks < 100, "took {ticks} ticks");
    }

    #[test]
    fn quadrant_fallback_contains_unassigned_animals() {
        // No home field: bounds come from the quadrant it stands in.
        let (mut t, mut w) = cow_at(1950.0, 1000.0, 0.0, None);
        let mut rng = fastrand::Rng::with_seed(4);

        step(
            &mut t,
            &mut w,
            &FenceRegistry::new(),
            &AnimalConfig::default(),
            &WorldConfig::default(),
            &mut rng,
            DT,
        );
        assert!(w.direction.cos() < -0.99);
    }

    #[test]
    fn safety_radius_turns_drifters_inward() {
        // Past every fence, on a divider line so no quadrant applies.
        let (mut t, mut w) = cow_at(3100.0, 0.0, 0.0, None);
        let mut rng = fastrand::Rng::with_seed(5);

        step(
            &mut t,
            &mut w,
            &FenceRegistry::new(),
            &AnimalConfig::default(),
            &WorldConfig::default(),
            &mut rng,
            DT,
        );
        assert!(w.direction.cos() < -0.99);
    }

    #[test]
    fn direction_changes_after_deadline() {
        let (mut t, mut w) = cow_at(-1000.0, -1000.0, 1.0, Some(Vec2::new(-1000.0, -1000.0)));
        w.change_timer = 4.99;
        let animals = AnimalConfig::default();
        let mut rng = fastrand::Rng::with_seed(6);

        step(
            &mut t,
            &mut w,
            &FenceRegistry::new(),
            &animals,
            &WorldConfig::default(),
            &mut rng,
            0.1,
        );

        assert_eq!(w.change_timer, 0.0);
        assert!(w.change_after >= animals.change_min_secs);
        assert!(w.change_after < animals.change_max_secs);
        assert!((0.0..TAU).contains(&w.direction));
    }

    #[test]
    fn chickens_bob_cows_do_not() {
        let mut world = hecs::World::new();
        let (ct, cw) = cow_at(-1000.0, 1000.0, 0.0, Some(Vec2::new(-1000.0, 1000.0)));
        let cow = world.spawn((Kind::Animal(AnimalKind::Cow), ct, cw));
        let (kt, kw) = cow_at(1000.0, 1000.0, 0.0, Some(Vec2::new(1000.0, 1000.0)));
        let chicken = world.spawn((Kind::Animal(AnimalKind::Chicken), kt, kw));

        let mut rng = fastrand::Rng::with_seed(7);
        update(
            &mut world,
            &FenceRegistry::farm_layout(2000.0),
            &AnimalConfig::default(),
            &WorldConfig::default(),
            &mut rng,
            DT,
            0.3,
        );

        assert_eq!(world.get::<&Transform>(cow).unwrap().position.y, 0.0);
        let y = world.get::<&Transform>(chicken).unwrap().position.y;
        assert!(y != 0.0 && y.abs() <= BOB_HEIGHT);
    }
}
