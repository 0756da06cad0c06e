pub mod ring;
pub mod timer;

use instant::Instant;

use self::ring::RingBuffer;
use self::timer::SystemTimers;

/// Number of frame times kept for the rolling stats.
const FRAME_HISTORY_LEN: usize = 300;
/// How often to log FPS (seconds).
const LOG_INTERVAL: f64 = 5.0;

/// Rolling frame timing, logged periodically.
pub struct FrameStats {
    frame_times: RingBuffer<f64>,
    frame_count: u64,
    frames_since_log: u32,
    last_log_time: Instant,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: RingBuffer::new(FRAME_HISTORY_LEN),
            frame_count: 0,
            frames_since_log: 0,
            last_log_time: Instant::now(),
        }
    }

    /// Record one frame. Every few seconds logs FPS, frame-time spread and
    /// the per-system breakdown.
    pub fn record_frame(&mut self, dt: f64, timers: &SystemTimers, tick_count: u64) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_times.push(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed < LOG_INTERVAL {
            return;
        }

        if let Some(stats) = self.frame_times.stats() {
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | frames: {} | ticks: {}",
                self.frames_since_log as f64 / elapsed,
                stats.mean * 1000.0,
                stats.min * 1000.0,
                stats.max * 1000.0,
                self.frame_count,
                tick_count,
            );
        }
        log::debug!("Systems: {} (total {:.1}us)", timers.summary(), timers.total_us());

        self.last_log_time = Instant::now();
        self.frames_since_log = 0;
    }
}
