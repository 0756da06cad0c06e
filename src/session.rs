use crate::ecs::components::CollectibleId;
use crate::events::{EventQueue, GameEvent};

/// Seconds between countdown ticks.
const COUNTDOWN_PERIOD: f32 = 1.0;

/// Top-level game mode. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    FreeRoam,
    Challenge(ChallengePhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengePhase {
    Running,
    /// Score and time frozen for the results screen.
    Ended(ChallengeOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    AllCollected,
    TimeUp,
}

impl ChallengeOutcome {
    pub fn label(self) -> &'static str {
        match self {
            ChallengeOutcome::AllCollected => "all haystacks eaten",
            ChallengeOutcome::TimeUp => "time up",
        }
    }
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::FreeRoam => "Free Roam",
            GameMode::Challenge(ChallengePhase::Running) => "Challenge",
            GameMode::Challenge(ChallengePhase::Ended(_)) => "Challenge (ended)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectibleState {
    pub consumed: bool,
    pub visible: bool,
}

/// Repeating one-second task, advanced by simulation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown {
    elapsed: f32,
    active: bool,
}

impl Countdown {
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Returns true if the task was running.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.elapsed = 0.0;
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance by `dt`; returns how many periods elapsed.
    fn advance(&mut self, dt: f32) -> u32 {
        if !self.active {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= COUNTDOWN_PERIOD {
            self.elapsed -= COUNTDOWN_PERIOD;
            fired += 1;
        }
        fired
    }
}

/// Mode, score, timer and haystack status for the challenge mini-game.
pub struct Session {
    mode: GameMode,
    score: u32,
    time_left: u32,
    health: f32,
    duration_secs: u32,
    collectibles: Vec<CollectibleState>,
    countdown: Countdown,
}

impl Session {
    pub fn new(collectible_count: usize, duration_secs: u32) -> Self {
        Self {
            mode: GameMode::FreeRoam,
            score: 0,
            time_left: duration_secs,
            health: 100.0,
            duration_secs,
            collectibles: vec![CollectibleState::default(); collectible_count],
            countdown: Countdown::default(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_free_roam(&self) -> bool {
        self.mode == GameMode::FreeRoam
    }

    pub fn is_running(&self) -> bool {
        self.mode == GameMode::Challenge(ChallengePhase::Running)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Remaining time as a 0-100 percentage.
    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn total(&self) -> u32 {
        self.collectibles.len() as u32
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown.is_active()
    }

    pub fn collectible(&self, id: CollectibleId) -> Option<CollectibleState> {
        self.collectibles.get(id.0).copied()
    }

    /// Begin (or replay) the challenge. Ignored while one is already running.
    pub fn start_challenge(&mut self, events: &mut EventQueue) -> bool {
        if self.is_running() {
            return false;
        }

        self.mode = GameMode::Challenge(ChallengePhase::Running);
        self.score = 0;
        self.time_left = self.duration_secs;
        self.health = 100.0;
        for state in &mut self.collectibles {
            *state = CollectibleState {
                consumed: false,
                visible: true,
            };
        }
        self.countdown.start();

        log::info!(
            "Haystack challenge started: collect {} in {}s",
            self.total(),
            self.duration_secs
        );
        events.push(GameEvent::ChallengeStarted {
            duration_secs: self.duration_secs,
            total: self.total(),
        });
        true
    }

    /// Leave the challenge. Score is kept until the next start.
    pub fn return_to_free_roam(&mut self, events: &mut EventQueue) -> bool {
        if self.is_free_roam() {
            return false;
        }

        self.mode = GameMode::FreeRoam;
        self.countdown.cancel();
        for state in &mut self.collectibles {
            state.visible = false;
        }

        log::info!("Back to free roam");
        events.push(GameEvent::FreeRoamResumed);
        true
    }

    /// Advance the countdown by simulation time.
    pub fn advance(&mut self, dt: f32, events: &mut EventQueue) {
        let fired = self.countdown.advance(dt);
        for _ in 0..fired {
            if !self.is_running() {
                break;
            }
            self.tick_second(events);
        }
    }

    fn tick_second(&mut self, events: &mut EventQueue) {
        self.time_left = self.time_left.saturating_sub(1);
        self.health = self.time_left as f32 / self.duration_secs as f32 * 100.0;
        events.push(GameEvent::TimerTick {
            time_left: self.time_left,
            health: self.health,
        });

        if self.score >= self.total() {
            self.end(ChallengeOutcome::AllCollected, events);
        } else if self.time_left == 0 {
            self.end(ChallengeOutcome::TimeUp, events);
        }
    }

    /// Award a haystack. Only unconsumed, visible haystacks in a running
    /// challenge count; anything else is a no-op.
    pub fn try_consume(&mut self, id: CollectibleId, events: &mut EventQueue) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(state) = self.collectibles.get_mut(id.0) else {
            return false;
        };
        if state.consumed || !state.visible {
            return false;
        }

        state.consumed = true;
        self.score += 1;
        log::debug!("Haystack {} eaten, score {}/{}", id.0, self.score, self.total());
        events.push(GameEvent::CollectibleConsumed {
            id,
            score: self.score,
        });

        if self.score >= self.total() {
            self.end(ChallengeOutcome::AllCollected, events);
        }
        true
    }

    fn end(&mut self, outcome: ChallengeOutcome, events: &mut EventQueue) {
        if self.countdown.cancel() {
            log::debug!("Countdown stopped");
        }
        self.mode = GameMode::Challenge(ChallengePhase::Ended(outcome));
        log::info!(
            "Challenge over ({}): {}/{} with {}s left",
            outcome.label(),
            self.score,
            self.total(),
            self.time_left
        );
        events.push(GameEvent::ChallengeEnded {
            outcome,
            score: self.score,
            time_left: self.time_left,
        });
    }
}
