use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::FarmConfig;
use crate::debug::timer::SystemTimers;
use crate::debug::FrameStats;
use crate::ecs::components::NpcRole;
use crate::ecs::systems::locomotion::MoveOutcome;
use crate::events::GameEvent;
use crate::farm::Farm;
use crate::input::{KeyboardState, TouchControls};
use crate::render::{Hud, RenderHandoff};
use crate::session::{ChallengePhase, GameMode};

/// Horse + animals + haystacks + NPCs, with headroom.
const INSTANCE_CAPACITY: usize = 64;
/// Initial window size; touch controls are laid out for it until resized.
const WINDOW_WIDTH: f32 = 1280.0;
const WINDOW_HEIGHT: f32 = 720.0;

/// A discrete key press the driver handles outside the per-tick signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Interact,
    Back,
    PlayAgain,
}

impl Command {
    fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyF | KeyCode::KeyR => Some(Self::Interact),
            KeyCode::Escape => Some(Self::Back),
            KeyCode::KeyP | KeyCode::Enter => Some(Self::PlayAgain),
            _ => None,
        }
    }
}

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,

    farm: Farm,
    keyboard: KeyboardState,
    touch: TouchControls,

    // Fixed timestep
    tick_rate: f64,
    max_accumulator: f64,
    last_frame_time: Option<Instant>,
    accumulator: f64,
    tick_count: u64,

    // Frame timing
    frame_stats: FrameStats,
    timers: SystemTimers,

    handoff: RenderHandoff,
}

impl App {
    fn new(config: FarmConfig) -> Self {
        Self {
            window: None,
            tick_rate: 1.0 / config.sim.tick_hz as f64,
            max_accumulator: config.sim.max_accumulator_secs as f64,
            farm: Farm::build(config),
            keyboard: KeyboardState::new(),
            touch: TouchControls::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            last_frame_time: None,
            accumulator: 0.0,
            tick_count: 0,
            frame_stats: FrameStats::new(),
            timers: SystemTimers::new(),
            handoff: RenderHandoff::with_capacity(INSTANCE_CAPACITY),
        }
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator = (self.accumulator + dt).min(self.max_accumulator);

        // Sample input once per frame (not per tick)
        let input = self.keyboard.signal().merge(self.touch.signal());

        while self.accumulator >= self.tick_rate {
            let outcome = self.farm.tick(&input, self.tick_rate as f32, &mut self.timers);
            if let Some(outcome @ (MoveOutcome::Blocked | MoveOutcome::Vaulted)) = outcome {
                if let Some(horse) = self.farm.player_transform() {
                    log::trace!(
                        "Horse {outcome:?} at ({:.0}, {:.0})",
                        horse.position.x,
                        horse.position.z
                    );
                }
            }
            self.accumulator -= self.tick_rate;
            self.tick_count += 1;
        }
    }

    fn on_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        self.keyboard.set(code, pressed);

        if pressed && !event.repeat {
            if let Some(command) = Command::from_key(code) {
                apply_command(&mut self.farm, command);
            }
        }
    }

    fn on_touch(&mut self, finger: u64, phase: TouchPhase, location: Vec2) {
        if self.touch.handle(finger, phase, location) {
            apply_command(&mut self.farm, Command::Interact);
        }
    }
}

/// Apply a menu-level command. Interacting with the challenge host stands in
/// for accepting the offer.
fn apply_command(farm: &mut Farm, command: Command) {
    match command {
        Command::Interact => {
            if !farm.chat_open
                && farm.session.is_free_roam()
                && farm.is_near(NpcRole::ChallengeHost)
            {
                farm.session.start_challenge(&mut farm.events);
            }
        }
        Command::Back => {
            if farm.chat_open {
                farm.chat_open = false;
                log::info!("Chat closed");
            } else {
                farm.session.return_to_free_roam(&mut farm.events);
            }
        }
        Command::PlayAgain => {
            if matches!(
                farm.session.mode(),
                GameMode::Challenge(ChallengePhase::Ended(_))
            ) {
                farm.session.start_challenge(&mut farm.events);
            }
        }
    }
}

/// Drain this frame's events into the UI side. Only the chat guide changes
/// simulation state: reaching the guide opens the chat panel.
fn dispatch_events(farm: &mut Farm) {
    let events: Vec<GameEvent> = farm.events.drain().collect();
    for event in events {
        match event {
            GameEvent::NpcNearby(NpcRole::ChatGuide) => {
                farm.chat_open = true;
                log::info!("{} opens the chat", NpcRole::ChatGuide.label());
            }
            GameEvent::NpcNearby(role) => {
                log::info!("{} offers the haystack challenge", role.label());
            }
            GameEvent::NpcLeft(role) => log::debug!("Left {}", role.label()),
            GameEvent::ChallengeStarted {
                duration_secs,
                total,
            } => log::debug!("Show challenge HUD: {total} haystacks, {duration_secs}s"),
            GameEvent::TimerTick { time_left, health } => {
                log::debug!("{time_left}s left, health {health:.0}%");
            }
            GameEvent::CollectibleConsumed { id, score } => {
                log::info!("Ate haystack {} (score {score})", id.0);
            }
            GameEvent::ChallengeEnded {
                outcome,
                score,
                time_left,
            } => log::debug!(
                "Show results ({}): {score} haystacks, {time_left}s left",
                outcome.label()
            ),
            GameEvent::FreeRoamResumed => log::debug!("Hide challenge HUD"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Farm Ride")
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.touch.layout(size.width as f32, size.height as f32);
        log::info!("Window created: {}x{}", size.width, size.height);

        // Continuous game loop
        event_loop.set_control_flow(ControlFlow::Poll);
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.touch.layout(new_size.width as f32, new_size.height as f32);
            }
            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused
                self.keyboard.clear();
                self.touch.release_all();
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_key(&event),
            WindowEvent::Touch(touch) => {
                let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.on_touch(touch.id, touch.phase, location);
            }
            WindowEvent::RedrawRequested => {
                // --- Timing ---
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();
                    self.frame_stats.record_frame(dt, &self.timers, self.tick_count);
                    self.run_fixed_update(dt);
                }
                self.last_frame_time = Some(now);

                dispatch_events(&mut self.farm);

                // --- Hand transforms to the renderer ---
                self.handoff.build(&self.farm.world, &self.farm.session);
                let hud = Hud::from_farm(&self.farm, self.touch.knob_offset());
                log::trace!(
                    "{} of {} actors visible | {:?}",
                    self.handoff.visible_count(),
                    self.handoff.instances().len(),
                    hud
                );
            }
            _ => {}
        }
    }
}

/// Entry point: create event loop and run.
pub fn run(config: FarmConfig) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{JumpPhase, Transform};
    use crate::input::InputSignal;

    fn seeded_config() -> FarmConfig {
        let mut config = FarmConfig::default();
        config.sim.seed = Some(7);
        config
    }

    fn seeded() -> Farm {
        Farm::build(seeded_config())
    }

    fn step(farm: &mut Farm) {
        let mut timers = SystemTimers::new();
        farm.tick(&InputSignal::default(), 1.0 / 60.0, &mut timers);
    }

    fn teleport_player(farm: &mut Farm, x: f32, z: f32) {
        let player = farm.player().unwrap();
        let mut t = farm.world.get::<&mut Transform>(player).unwrap();
        t.position.x = x;
        t.position.z = z;
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key(KeyCode::KeyF), Some(Command::Interact));
        assert_eq!(Command::from_key(KeyCode::KeyR), Some(Command::Interact));
        assert_eq!(Command::from_key(KeyCode::Escape), Some(Command::Back));
        assert_eq!(Command::from_key(KeyCode::Enter), Some(Command::PlayAgain));
        assert_eq!(Command::from_key(KeyCode::KeyW), None);
    }

    #[test]
    fn interact_only_starts_near_the_host() {
        let mut farm = seeded();
        apply_command(&mut farm, Command::Interact);
        assert!(farm.session.is_free_roam());

        teleport_player(&mut farm, -1600.0, -900.0);
        step(&mut farm);
        apply_command(&mut farm, Command::Interact);
        assert!(farm.session.is_running());

        apply_command(&mut farm, Command::Back);
        assert!(farm.session.is_free_roam());
    }

    #[test]
    fn meeting_the_guide_opens_chat_and_back_closes_it() {
        let mut farm = seeded();
        teleport_player(&mut farm, 1600.0, -900.0);
        step(&mut farm);
        dispatch_events(&mut farm);
        assert!(farm.chat_open);
        assert!(farm.events.is_empty());

        apply_command(&mut farm, Command::Back);
        assert!(!farm.chat_open);
        assert!(farm.session.is_free_roam());
    }

    #[test]
    fn play_again_only_after_the_end() {
        let mut farm = seeded();
        apply_command(&mut farm, Command::PlayAgain);
        assert!(farm.session.is_free_roam());

        farm.session.start_challenge(&mut farm.events);
        farm.session.advance(61.0, &mut farm.events);
        assert!(!farm.session.is_running());

        apply_command(&mut farm, Command::PlayAgain);
        assert!(farm.session.is_running());
        assert_eq!(farm.session.score(), 0);
    }

    #[test]
    fn tapping_jump_jumps_in_place() {
        let mut app = App::new(seeded_config());
        app.on_touch(1, TouchPhase::Started, Vec2::new(1200.0, 650.0));
        app.run_fixed_update(0.1);

        assert!(app.tick_count > 0);
        let horse = app.farm.player_transform().unwrap();
        assert_eq!(horse.ground(), Vec2::new(-600.0, -600.0));
        assert_eq!(horse.heading, 0.0);
        assert_eq!(app.farm.player_jump(), JumpPhase::Ascending);
    }

    #[test]
    fn stick_drives_until_its_finger_lifts() {
        let mut app = App::new(seeded_config());
        // Stick base is at (100, 620) on the default window.
        app.on_touch(1, TouchPhase::Started, Vec2::new(100.0, 620.0));
        app.on_touch(1, TouchPhase::Moved, Vec2::new(100.0, 570.0));
        app.run_fixed_update(1.0 / 30.0);
        let moved = app.farm.player_transform().unwrap();
        assert!(moved.position.z > -600.0);

        app.on_touch(1, TouchPhase::Ended, Vec2::new(100.0, 570.0));
        assert_eq!(app.touch.knob_offset(), None);
        app.run_fixed_update(1.0 / 30.0);
        assert_eq!(app.farm.player_transform().unwrap().ground(), moved.ground());
    }

    #[test]
    fn interact_button_accepts_near_the_host() {
        let mut app = App::new(seeded_config());
        app.on_touch(3, TouchPhase::Started, Vec2::new(1050.0, 630.0));
        assert!(app.farm.session.is_free_roam());
        app.on_touch(3, TouchPhase::Ended, Vec2::new(1050.0, 630.0));

        teleport_player(&mut app.farm, -1600.0, -900.0);
        step(&mut app.farm);
        app.on_touch(4, TouchPhase::Started, Vec2::new(1050.0, 630.0));
        assert!(app.farm.session.is_running());
    }
}
