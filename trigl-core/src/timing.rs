//! Frame timing.
//!
//! [`Timer`] keeps the last two samples of a monotonic [`Clock`] and derives
//! the delta time between them. [`AnimationLoop`] runs one-shot
//! [`FrameTask`]s on host-driven ticks, advancing its timer once per tick.

use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`std::time::Instant`], with its origin at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// The previous and current samples of a clock.
#[derive(Debug)]
pub struct Timer<C: Clock = SystemClock> {
    clock: C,
    previous: Duration,
    current: Duration,
}

impl Timer<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for Timer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Timer<C> {
    /// Creates a timer whose two samples both hold the clock's current reading.
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            previous: now,
            current: now,
        }
    }

    /// Moves the current sample into the previous one and samples the clock again.
    pub fn advance(&mut self) {
        self.previous = self.current;
        self.current = self.clock.now();
    }

    /// Seconds between the previous and the current sample.
    pub fn delta_seconds(&self) -> f32 {
        self.current.saturating_sub(self.previous).as_secs_f32()
    }

    /// The current sample.
    pub fn current(&self) -> Duration {
        self.current
    }
}

/// What a frame task sees when it runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Timestamp of the tick, measured by the loop's clock.
    pub time: Duration,
    /// Seconds since the previous tick.
    pub delta: f32,
}

/// Identifies a scheduled frame task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// What to do after a frame task has run.
pub enum Schedule<Ctx> {
    /// Run this task on the next tick.
    Next(Box<dyn FrameTask<Ctx>>),
    /// Nothing more to do.
    Stop,
}

impl<Ctx> Schedule<Ctx> {
    /// Shorthand for `Schedule::Next(Box::new(task))`.
    pub fn next(task: impl FrameTask<Ctx> + 'static) -> Self {
        Schedule::Next(Box::new(task))
    }
}

/// Work done on one animation tick.
///
/// A task is consumed when it runs and hands back the task for the next
/// tick, if any. Closures of the form `FnOnce(&mut Ctx, Tick) -> Schedule<Ctx>`
/// are tasks too.
pub trait FrameTask<Ctx> {
    fn run(self: Box<Self>, ctx: &mut Ctx, tick: Tick) -> Schedule<Ctx>;
}

impl<Ctx, F> FrameTask<Ctx> for F
where
    F: FnOnce(&mut Ctx, Tick) -> Schedule<Ctx>,
{
    fn run(self: Box<Self>, ctx: &mut Ctx, tick: Tick) -> Schedule<Ctx> {
        (*self)(ctx, tick)
    }
}

/// Runs frame tasks once per host tick.
///
/// The host calls [`tick`](Self::tick) at every paint opportunity. Tasks
/// scheduled before a tick starts run during it; tasks scheduled by those
/// tasks wait for the following tick.
pub struct AnimationLoop<Ctx, C: Clock = SystemClock> {
    timer: Timer<C>,
    pending: Vec<(FrameHandle, Box<dyn FrameTask<Ctx>>)>,
    next_handle: u64,
}

impl<Ctx> AnimationLoop<Ctx, SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl<Ctx> Default for AnimationLoop<Ctx, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx, C: Clock> AnimationLoop<Ctx, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            timer: Timer::with_clock(clock),
            pending: Vec::new(),
            next_handle: 0,
        }
    }

    /// Registers `task` to run on the next tick.
    pub fn schedule_next_frame(&mut self, task: impl FrameTask<Ctx> + 'static) -> FrameHandle {
        self.push(Box::new(task))
    }

    /// Drops a task that has not run yet. Returns `false` if there was none.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.pending.len() != before
    }

    /// Advances the timer and runs every pending task, returning how many ran.
    ///
    /// With nothing pending the timer is left alone.
    pub fn tick(&mut self, ctx: &mut Ctx) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        self.timer.advance();
        let tick = Tick {
            time: self.timer.current(),
            delta: self.timer.delta_seconds(),
        };

        let due = std::mem::take(&mut self.pending);
        let ran = due.len();
        for (_, task) in due {
            if let Schedule::Next(next) = task.run(ctx, tick) {
                self.push(next);
            }
        }
        ran
    }

    /// Seconds between the last two ticks.
    pub fn delta_seconds(&self) -> f32 {
        self.timer.delta_seconds()
    }

    /// `true` once no task is waiting for a tick.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    fn push(&mut self, task: Box<dyn FrameTask<Ctx>>) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push((handle, task));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct ManualClock(Rc<Cell<Duration>>);

    impl ManualClock {
        fn set_millis(&self, millis: u64) {
            self.0.set(Duration::from_millis(millis));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.0.get()
        }
    }

    #[test]
    fn test_delta_is_zero_before_first_advance() {
        let clock = ManualClock::default();
        clock.set_millis(1_000);
        let timer = Timer::with_clock(clock.clone());
        clock.set_millis(5_000);
        assert_eq!(timer.delta_seconds(), 0.0);
    }

    #[test]
    fn test_delta_tracks_gap_between_samples() {
        let clock = ManualClock::default();
        let mut timer = Timer::with_clock(clock.clone());

        let samples = [16u64, 33, 33, 50, 250, 266];
        let mut previous = 0u64;
        for sample in samples {
            clock.set_millis(sample);
            timer.advance();
            let expected = (sample - previous) as f32 / 1000.0;
            assert!((timer.delta_seconds() - expected).abs() < 1e-6);
            assert!(timer.delta_seconds() >= 0.0);
            previous = sample;
        }
    }

    #[test]
    fn test_system_clock_delta_is_non_negative() {
        let mut timer = Timer::new();
        for _ in 0..10 {
            timer.advance();
            assert!(timer.delta_seconds() >= 0.0);
        }
    }

    #[test]
    fn test_tick_advances_once_for_all_tasks() {
        let clock = ManualClock::default();
        let mut frames: AnimationLoop<Vec<Tick>, _> = AnimationLoop::with_clock(clock.clone());

        for _ in 0..3 {
            frames.schedule_next_frame(|seen: &mut Vec<Tick>, tick: Tick| -> Schedule<Vec<Tick>> {
                seen.push(tick);
                Schedule::Stop
            });
        }

        clock.set_millis(20);
        let mut seen = Vec::new();
        assert_eq!(frames.tick(&mut seen), 3);
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|t| *t == seen[0]));
        assert_eq!(seen[0].time, Duration::from_millis(20));
        assert!((seen[0].delta - 0.02).abs() < 1e-6);
        assert!(frames.is_idle());
    }

    struct Counter {
        remaining: u32,
    }

    impl FrameTask<Vec<f32>> for Counter {
        fn run(mut self: Box<Self>, deltas: &mut Vec<f32>, tick: Tick) -> Schedule<Vec<f32>> {
            deltas.push(tick.delta);
            self.remaining -= 1;
            if self.remaining == 0 {
                Schedule::Stop
            } else {
                Schedule::Next(self)
            }
        }
    }

    #[test]
    fn test_follow_up_task_runs_on_next_tick() {
        let clock = ManualClock::default();
        let mut frames: AnimationLoop<Vec<f32>, _> = AnimationLoop::with_clock(clock.clone());
        frames.schedule_next_frame(Counter { remaining: 3 });

        let mut deltas: Vec<f32> = Vec::new();
        for (i, millis) in [10u64, 30, 60, 100].into_iter().enumerate() {
            clock.set_millis(millis);
            let ran = frames.tick(&mut deltas);
            assert_eq!(ran, if i < 3 { 1 } else { 0 });
        }

        assert_eq!(deltas.len(), 3);
        assert!((deltas[0] - 0.01).abs() < 1e-6);
        assert!((deltas[1] - 0.02).abs() < 1e-6);
        assert!((deltas[2] - 0.03).abs() < 1e-6);
        assert!(frames.is_idle());
    }

    #[test]
    fn test_idle_tick_does_not_advance() {
        let clock = ManualClock::default();
        let mut frames: AnimationLoop<(), _> = AnimationLoop::with_clock(clock.clone());

        clock.set_millis(500);
        assert_eq!(frames.tick(&mut ()), 0);
        assert_eq!(frames.delta_seconds(), 0.0);
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let mut frames: AnimationLoop<u32> = AnimationLoop::new();
        let keep = frames.schedule_next_frame(|count: &mut u32, _tick: Tick| -> Schedule<u32> {
            *count += 1;
            Schedule::Stop
        });
        let drop_me = frames.schedule_next_frame(|count: &mut u32, _tick: Tick| -> Schedule<u32> {
            *count += 100;
            Schedule::Stop
        });

        assert!(frames.cancel(drop_me));
        assert!(!frames.cancel(drop_me));

        let mut count = 0;
        assert_eq!(frames.tick(&mut count), 1);
        assert_eq!(count, 1);
        assert!(!frames.cancel(keep));
    }
}
