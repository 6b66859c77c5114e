//! The world clock for spleef arenas.
//!
//! A round never looks at wall-clock time. Every timer it keeps (the next
//! level drop, the session close) is an absolute world time in ticks, and
//! [`WorldClock`] is the only thing that moves world time forward: one
//! tick per resolved [`WorldClock::next_tick`].
//!
//! # Integration
//!
//! The clock sits in one branch of the arena actor's `select!`:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = commands.recv() => { /* connect, damage, death... */ }
//!         tick = clock.next_tick() => {
//!             host.time = tick.world_time;
//!             round.tick(&mut host);
//!             clock.finish_tick();
//!         }
//!     }
//! }
//! ```
//!
//! A slow tick never advances world time by more than one. When the loop
//! falls behind, [`LagPolicy`] decides whether the missed wall-clock slots
//! are dropped or burst through.

use std::time::{Duration, Instant};

use rand::Rng;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

/// World ticks per in-game second.
pub const TICKS_PER_SECOND: u64 = 20;

/// Converts whole seconds to world ticks.
pub const fn seconds(secs: u64) -> u64 {
    secs * TICKS_PER_SECOND
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What the clock does with wall-clock slots it missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LagPolicy {
    /// Drop the missed slots; the next tick is one period from now.
    #[default]
    Drop,
    /// Fire missed slots back-to-back, up to `max_burst` of them. A lag
    /// deeper than that is dropped as a whole.
    CatchUp { max_burst: u32 },
}

/// Clock settings.
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Ticks per wall-clock second. Clamped to `1..=MAX_RATE_HZ`.
    pub rate_hz: u32,
    pub lag_policy: LagPolicy,
    /// A tick whose work takes at least this fraction of the period gets a
    /// warning. Clamped to `0.0..=1.0`.
    pub slow_tick_warn: f64,
    /// Upper bound in µs of a random delay before the first tick, so
    /// arenas opened together spread out.
    pub start_jitter_us: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            rate_hz: TICKS_PER_SECOND as u32,
            lag_policy: LagPolicy::default(),
            slow_tick_warn: 0.8,
            start_jitter_us: 2_000,
        }
    }
}

impl ClockConfig {
    pub const MAX_RATE_HZ: u32 = 128;

    pub fn with_rate(rate_hz: u32) -> Self {
        Self {
            rate_hz,
            ..Self::default()
        }
    }

    /// Brings every field into range. [`WorldClock::new`] calls this.
    pub fn clamped(mut self) -> Self {
        let rate_hz = self.rate_hz.clamp(1, Self::MAX_RATE_HZ);
        if rate_hz != self.rate_hz {
            warn!(requested = self.rate_hz, rate_hz, "clock rate out of range");
            self.rate_hz = rate_hz;
        }
        self.slow_tick_warn = self.slow_tick_warn.clamp(0.0, 1.0);
        self
    }

    /// Wall-clock length of one tick.
    pub fn period(&self) -> Duration {
        Duration::from_secs(1) / self.rate_hz.max(1)
    }
}

// ---------------------------------------------------------------------------
// Tick and stats
// ---------------------------------------------------------------------------

/// One fired tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Ticks fired by this clock so far, starting at 1.
    pub number: u64,
    /// World time after this tick.
    pub world_time: u64,
    /// Fired more than a tenth of a period after its slot.
    pub late: bool,
    /// Wall-clock slots dropped while recovering from this tick's lag.
    pub dropped: u64,
}

/// Running totals.
#[derive(Debug, Clone, Default)]
pub struct ClockStats {
    pub ticks: u64,
    pub late_ticks: u64,
    pub dropped_slots: u64,
    /// Slowest tick, measured from `next_tick` returning to `finish_tick`.
    pub slowest_tick: Duration,
}

// ---------------------------------------------------------------------------
// WorldClock
// ---------------------------------------------------------------------------

/// Drives one arena's world time.
pub struct WorldClock {
    config: ClockConfig,
    period: Duration,
    world_time: u64,
    fired: u64,
    deadline: TokioInstant,
    /// Set when a tick fires, taken by `finish_tick`.
    work_started: Option<Instant>,
    paused: bool,
    stats: ClockStats,
}

impl WorldClock {
    /// A clock whose first tick moves world time to `start_time + 1`.
    pub fn new(config: ClockConfig, start_time: u64) -> Self {
        let config = config.clamped();
        let period = config.period();

        let jitter = match config.start_jitter_us {
            0 => Duration::ZERO,
            max => Duration::from_micros(rand::rng().random_range(0..max)),
        };

        debug!(rate_hz = config.rate_hz, start_time, "world clock created");

        Self {
            deadline: TokioInstant::now() + period + jitter,
            config,
            period,
            world_time: start_time,
            fired: 0,
            work_started: None,
            paused: false,
            stats: ClockStats::default(),
        }
    }

    /// Waits for the next slot and advances world time by one.
    ///
    /// Never resolves while the clock is paused, which leaves the other
    /// `select!` branches running.
    pub async fn next_tick(&mut self) -> Tick {
        if self.paused {
            std::future::pending::<()>().await;
        }

        let slot = self.deadline;
        time::sleep_until(slot).await;
        let now = TokioInstant::now();

        let lag = now.saturating_duration_since(slot);
        let late = lag > self.period / 10;
        let missed = (lag.as_nanos() / self.period.as_nanos()) as u64;
        let dropped = self.reschedule(slot, now, missed);

        self.fired += 1;
        self.world_time += 1;
        self.work_started = Some(Instant::now());

        self.stats.ticks += 1;
        self.stats.dropped_slots += dropped;
        if late {
            self.stats.late_ticks += 1;
        }
        if dropped > 0 {
            warn!(world_time = self.world_time, missed, dropped, "world clock fell behind");
        }
        trace!(world_time = self.world_time, late, "tick");

        Tick {
            number: self.fired,
            world_time: self.world_time,
            late,
            dropped,
        }
    }

    /// Sets the next deadline and returns how many slots were given up.
    fn reschedule(&mut self, slot: TokioInstant, now: TokioInstant, missed: u64) -> u64 {
        match self.config.lag_policy {
            LagPolicy::Drop => {
                self.deadline = now + self.period;
                missed
            }
            LagPolicy::CatchUp { max_burst } if missed <= u64::from(max_burst) => {
                self.deadline = slot + self.period;
                0
            }
            LagPolicy::CatchUp { max_burst } => {
                self.deadline = now + self.period;
                missed - u64::from(max_burst)
            }
        }
    }

    /// Marks the current tick's work done and checks it against the budget.
    pub fn finish_tick(&mut self) {
        let Some(started) = self.work_started.take() else {
            return;
        };
        let took = started.elapsed();
        self.stats.slowest_tick = self.stats.slowest_tick.max(took);

        let share = took.as_secs_f64() / self.period.as_secs_f64();
        if share >= self.config.slow_tick_warn {
            warn!(
                world_time = self.world_time,
                took_ms = took.as_secs_f64() * 1000.0,
                share_pct = format!("{:.1}", share * 100.0),
                "slow tick"
            );
        }
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(world_time = self.world_time, "world clock paused");
        }
    }

    /// The next tick fires one period from now; missed slots are not replayed.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.deadline = TokioInstant::now() + self.period;
            debug!(world_time = self.world_time, "world clock resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn world_time(&self) -> u64 {
        self.world_time
    }

    /// Ticks fired since the clock was created.
    pub fn ticks_fired(&self) -> u64 {
        self.fired
    }

    pub fn stats(&self) -> &ClockStats {
        &self.stats
    }

    pub fn rate_hz(&self) -> u32 {
        self.config.rate_hz
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
