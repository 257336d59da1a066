use std::time::{Duration, Instant};

use tracing::warn;

use super::game::GameRuntime;
use super::input::InputCollector;
use super::metrics::MetricsAccumulator;
use super::LoopCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StepPlan {
    pub(crate) ticks_to_run: u32,
    pub(crate) remaining_accumulator: Duration,
    pub(crate) dropped_backlog: Duration,
}

/// Fixed-timestep clock fed by host frame signals.
#[derive(Debug)]
pub(crate) struct FixedStepClock {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    last_frame_instant: Instant,
    tick_counter: u64,
}

impl FixedStepClock {
    pub(crate) fn new(
        target_tps: u32,
        max_frame_delta: Duration,
        max_ticks_per_frame: u32,
        now: Instant,
    ) -> Self {
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / target_tps.max(1) as f64),
            max_frame_delta: normalize_non_zero_duration(
                max_frame_delta,
                Duration::from_millis(250),
            ),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
            last_frame_instant: now,
            tick_counter: 0,
        }
    }

    pub(crate) fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub(crate) fn max_ticks_per_frame(&self) -> u32 {
        self.max_ticks_per_frame
    }

    pub(crate) fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    pub(crate) fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    /// Consumes the time since the previous frame signal and returns how many
    /// ticks to run now, plus the raw frame delta for metrics.
    pub(crate) fn on_frame(&mut self, now: Instant) -> (StepPlan, Duration) {
        let raw_frame_dt = now.saturating_duration_since(self.last_frame_instant);
        self.last_frame_instant = now;

        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(clamped_frame_dt);
        let plan = plan_sim_steps(self.accumulator, self.fixed_dt, self.max_ticks_per_frame);
        self.accumulator = plan.remaining_accumulator;
        (plan, raw_frame_dt)
    }

    /// Runs the planned ticks one after another on the calling thread.
    ///
    /// A failed tick is logged and counted; the next tick still runs. A tick
    /// that takes longer than the fixed timestep is logged as an overrun.
    pub(crate) fn run_ticks(
        &mut self,
        plan: StepPlan,
        runtime: &mut GameRuntime,
        input: &mut InputCollector,
        metrics: &mut MetricsAccumulator,
    ) -> LoopCommand {
        for _ in 0..plan.ticks_to_run {
            let snapshot = input.snapshot_for_tick();
            let tick = self.tick_counter;
            self.tick_counter = self.tick_counter.saturating_add(1);

            let started = Instant::now();
            let result = runtime.tick(&snapshot);
            let tick_duration = started.elapsed();
            metrics.record_tick();

            if tick_duration > self.fixed_dt {
                metrics.record_overrun_tick();
                warn!(
                    tick,
                    tick_ms = tick_duration.as_secs_f64() * 1000.0,
                    budget_ms = self.fixed_dt.as_secs_f64() * 1000.0,
                    "tick_overrun"
                );
            }

            match result {
                Ok(LoopCommand::Continue) => {}
                Ok(LoopCommand::Quit) => return LoopCommand::Quit,
                Err(error) => {
                    metrics.record_failed_tick();
                    warn!(tick, error = %error, "tick_failed");
                }
            }
        }

        if plan.dropped_backlog > Duration::ZERO {
            let dropped_ticks = dropped_tick_count(plan.dropped_backlog, self.fixed_dt);
            metrics.record_dropped_ticks(dropped_ticks);
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                dropped_ticks,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "tick_overrun"
            );
        }

        LoopCommand::Continue
    }
}

pub(crate) fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn dropped_tick_count(backlog: Duration, fixed_dt: Duration) -> u32 {
    if fixed_dt.is_zero() {
        return 0;
    }
    (backlog.as_nanos() / fixed_dt.as_nanos()).min(u32::MAX as u128) as u32
}

pub(crate) fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

pub(crate) fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

pub(crate) fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

pub(crate) fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

pub(crate) fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}
