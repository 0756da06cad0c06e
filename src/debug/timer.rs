use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPhase {
    Locomotion,
    Wander,
    Proximity,
    Session,
}

impl SystemPhase {
    /// In tick order.
    pub const ALL: [SystemPhase; 4] = [
        Self::Locomotion,
        Self::Wander,
        Self::Proximity,
        Self::Session,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Locomotion => "Locomotion",
            Self::Wander => "Wander",
            Self::Proximity => "Proximity",
            Self::Session => "Session",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

const PHASE_COUNT: usize = SystemPhase::ALL.len();
/// Weight of the newest sample in each phase's moving average.
const SMOOTHING: f64 = 0.1;

/// Smoothed cost of each tick phase, in microseconds.
pub struct SystemTimers {
    smoothed_us: [f64; PHASE_COUNT],
    phase_start: Instant,
}

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            smoothed_us: [0.0; PHASE_COUNT],
            phase_start: Instant::now(),
        }
    }

    /// Mark the start of a phase.
    pub fn begin(&mut self) {
        self.phase_start = Instant::now();
    }

    /// Fold the time since `begin` into `phase`'s average.
    pub fn end(&mut self, phase: SystemPhase) {
        let sample_us = self.phase_start.elapsed().as_secs_f64() * 1_000_000.0;
        let slot = &mut self.smoothed_us[phase.index()];
        *slot += (sample_us - *slot) * SMOOTHING;
    }

    pub fn phase_us(&self, phase: SystemPhase) -> f64 {
        self.smoothed_us[phase.index()]
    }

    /// Whole tick.
    pub fn total_us(&self) -> f64 {
        SystemPhase::ALL.iter().map(|&p| self.phase_us(p)).sum()
    }

    /// One-line breakdown for the periodic stats log.
    pub fn summary(&self) -> String {
        SystemPhase::ALL
            .iter()
            .map(|&p| format!("{} {:.1}us", p.label(), self.phase_us(p)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
