//! CorePlugin owns the monotonic game clock the gameplay loops timestamp against.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(5.0, TimerMode::Repeating),
        }
    }
}

/// Monotonic game time. Never goes backwards, even when the frame delta is zero.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    elapsed: Duration,
    frames: u64,
}

impl SimulationClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: time_scale.max(MIN_TIME_SCALE),
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Total scaled time since startup.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn now_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Frames ticked since startup.
    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick(&mut self, real_delta: Duration) {
        self.elapsed += real_delta.mul_f32(self.time_scale);
        self.frames += 1;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Registers the game clock. It advances in `First` so every `Update` system sees the same time.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    #[allow(dead_code)]
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .add_systems(Startup, log_startup_time_scale)
            .add_systems(First, update_simulation_clock);

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_clock);
        }
    }
}

fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_startup_time_scale(clock: Res<SimulationClock>) {
    info!(
        "CorePlugin initialised with time scale: {:.3}",
        clock.time_scale()
    );
}

#[cfg(feature = "core_debug")]
fn log_clock(mut timer: ResMut<DebugTickTimer>, time: Res<Time>, clock: Res<SimulationClock>) {
    if timer.timer.tick(time.delta()).just_finished() {
        info!(
            target: "core_debug",
            "Game time: {:.2}s after {} frames",
            clock.now_seconds(),
            clock.frames(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_scaled_time() {
        let mut clock = SimulationClock::new(2.0);
        clock.tick(Duration::from_millis(500));
        clock.tick(Duration::from_millis(250));

        assert_eq!(clock.elapsed(), Duration::from_millis(1500));
        assert_eq!(clock.frames(), 2);
        assert!((clock.now_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn zero_delta_frames_do_not_move_time() {
        let mut clock = SimulationClock::default();
        clock.tick(Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn clock_clamps_min_time_scale() {
        let clock = SimulationClock::new(-3.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);
    }
}
