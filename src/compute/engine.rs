//! The open-ended pattern engine.
//!
//! One [`Engine::tick`] runs a fixed number of stepper invocations, each
//! timed for adaptive mutation and checked for stalls, then extracts
//! features, scores them and offers the pattern to the archive.

use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, EngineConfig, Params};

use super::evolution::{AdaptiveMutator, ArchiveEntry, FitnessEvaluator, PatternArchive};
use super::{
    Clock, FeatureVector, LifecycleController, PatternState, Regeneration, StabilityMonitor,
    Stepper, SystemClock, elapsed_ms,
};

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Engine time after the tick.
    pub time: f64,
    pub features: FeatureVector,
    pub fitness: f32,
    /// Change rate of the last step.
    pub change_rate: f32,
    /// Set if the pattern stalled and was replaced.
    pub regeneration: Option<Regeneration>,
    /// Number of adaptive mutations applied.
    pub mutations: usize,
    /// Whether the pattern entered the archive.
    pub archived: bool,
}

/// Snapshot for renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub a: Vec<f32>,
    pub b: Vec<f32>,
    pub features: FeatureVector,
    pub params: Params,
    pub fitness: f32,
    pub age: u64,
}

/// Drives one pattern through its lifecycle and maintains the archive.
pub struct Engine {
    config: EngineConfig,
    pattern: PatternState,
    stepper: Stepper,
    monitor: StabilityMonitor,
    mutator: AdaptiveMutator,
    lifecycle: LifecycleController,
    evaluator: FitnessEvaluator,
    archive: PatternArchive,
    features: FeatureVector,
    rng: StdRng,
    clock: Box<dyn Clock>,
    time: f64,
    ticks: u64,
    regenerations: u64,
    mutations: u64,
}

impl Engine {
    /// Create an engine with a random initial pattern.
    ///
    /// The RNG is seeded from `config.random_seed`, or from entropy if unset.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let pattern =
            PatternState::new(config.width, config.height, config.history_depth, &mut rng)?;
        Self::with_state(config, pattern, rng)
    }

    /// Create an engine around an existing pattern.
    pub fn with_state(
        config: EngineConfig,
        pattern: PatternState,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let found = (pattern.grid.width, pattern.grid.height);
        if found != (config.width, config.height) {
            return Err(ConfigError::StateMismatch {
                expected: (config.width, config.height),
                found,
            });
        }

        debug!(
            "engine: {}x{} grid, {} steps/tick, params {:?}",
            config.width, config.height, config.steps_per_tick, pattern.params
        );

        Ok(Self {
            stepper: Stepper::new(config.dt),
            monitor: StabilityMonitor::new(&config.stability),
            mutator: AdaptiveMutator::new(config.mutation.clone()),
            lifecycle: LifecycleController::new(config.regeneration.clone()),
            evaluator: FitnessEvaluator::new(config.fitness.clone()),
            archive: PatternArchive::new(config.archive.clone()),
            features: FeatureVector::default(),
            clock: Box::new(SystemClock::default()),
            time: 0.0,
            ticks: 0,
            regenerations: 0,
            mutations: 0,
            config,
            pattern,
            rng,
        })
    }

    /// Replace the step timer.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Advance the engine by one tick.
    pub fn tick(&mut self) -> TickReport {
        self.time += self.config.time_step;
        if self.config.autonomous_drift {
            self.pattern.params = Params::drifting(self.time);
        }

        let mut mutations = 0;

        for _ in 0..self.config.steps_per_tick {
            let start = self.clock.now_ms();
            self.stepper.step(&mut self.pattern);
            let end = self.clock.now_ms();

            match elapsed_ms(start, end) {
                Some(elapsed) => {
                    if let Some(m) =
                        self.mutator
                            .observe(&mut self.pattern.params, elapsed, &mut self.rng)
                    {
                        trace!(
                            "slow step ({elapsed:.1} ms): {:?} {:+.4} (intensity {:.2})",
                            m.kind, m.delta, m.intensity
                        );
                        mutations += 1;
                    }
                }
                None => trace!("step timer unavailable, skipping mutation check"),
            }

            self.monitor.observe(&mut self.pattern);
        }

        let regeneration = (self.config.auto_regenerate && self.monitor.is_stalled(&self.pattern))
            .then(|| self.regenerate());

        self.features = FeatureVector::extract(&self.pattern.grid, self.pattern.previous_a());
        let fitness = self.evaluator.evaluate(&self.features, self.time);
        self.pattern.fitness = fitness;

        let archived = self.archive.offer(ArchiveEntry {
            params: self.pattern.params,
            fitness,
            features: self.features,
            age: self.pattern.age,
        });
        if archived {
            debug!(
                "archived pattern (fitness {fitness:.3}, age {}), archive size {}",
                self.pattern.age,
                self.archive.len()
            );
        }

        self.ticks += 1;
        self.mutations += mutations as u64;

        TickReport {
            time: self.time,
            features: self.features,
            fitness,
            change_rate: self.pattern.change_rate,
            regeneration,
            mutations,
            archived,
        }
    }

    /// Run `ticks` ticks and return the last report.
    pub fn run(&mut self, ticks: u64) -> Option<TickReport> {
        self.run_with_callback(ticks, |_| {})
    }

    /// Run `ticks` ticks, invoking `callback` after each.
    pub fn run_with_callback<F>(&mut self, ticks: u64, mut callback: F) -> Option<TickReport>
    where
        F: FnMut(&TickReport),
    {
        let mut last = None;
        for _ in 0..ticks {
            let report = self.tick();
            callback(&report);
            last = Some(report);
        }
        last
    }

    /// Replace the current pattern with a regenerated one.
    pub fn regenerate(&mut self) -> Regeneration {
        let (next, how) = self
            .lifecycle
            .regenerate(&self.pattern, &self.archive, &mut self.rng);
        info!(
            "regenerating after {} stable steps (age {}): {:?}",
            self.pattern.stable_count, self.pattern.age, how
        );
        self.pattern = next;
        self.regenerations += 1;
        how
    }

    pub fn set_auto_regenerate(&mut self, enabled: bool) {
        self.config.auto_regenerate = enabled;
    }

    pub fn set_autonomous_drift(&mut self, enabled: bool) {
        self.config.autonomous_drift = enabled;
    }

    /// Overwrite the current params. Values are clamped to [0, 1].
    pub fn set_params(&mut self, params: Params) {
        for kind in crate::schema::ParamKind::ALL {
            self.pattern.params.set(kind, params.get(kind));
        }
    }

    /// Copy of the current fields and descriptors.
    pub fn frame(&self) -> Frame {
        Frame {
            width: self.pattern.grid.width,
            height: self.pattern.grid.height,
            a: self.pattern.grid.a.clone(),
            b: self.pattern.grid.b.clone(),
            features: self.features,
            params: self.pattern.params,
            fitness: self.pattern.fitness,
            age: self.pattern.age,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pattern(&self) -> &PatternState {
        &self.pattern
    }

    pub fn params(&self) -> &Params {
        &self.pattern.params
    }

    /// Features from the latest tick.
    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    pub fn archive(&self) -> &PatternArchive {
        &self.archive
    }

    /// Engine time (advances by `time_step` per tick).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Total adaptive mutations applied.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::compute::{ManualClock, NoClock};
    use crate::schema::{FitnessWeights, MutationConfig, NoiseTemplate};

    /// Answers the start-of-step reading but not the end-of-step one.
    #[derive(Default)]
    struct HalfClock {
        readings: Cell<u64>,
    }

    impl Clock for HalfClock {
        fn now_ms(&self) -> Option<f64> {
            let n = self.readings.get();
            self.readings.set(n + 1);
            (n % 2 == 0).then_some(n as f64 * 1000.0)
        }
    }

    fn pure_diffusion() -> Params {
        Params {
            diffusion_a: 1.0,
            diffusion_b: 1.0,
            feed_rate: 0.0,
            kill_rate: 0.0,
        }
    }

    fn small_config() -> EngineConfig {
        EngineConfig {
            width: 16,
            height: 16,
            random_seed: Some(42),
            ..Default::default()
        }
    }

    /// Uniform grid that never changes, so every step is stable.
    fn frozen_engine(config: EngineConfig) -> Engine {
        frozen_engine_with(config, pure_diffusion())
    }

    fn frozen_engine_with(config: EngineConfig, params: Params) -> Engine {
        let pattern =
            PatternState::blank(config.width, config.height, config.history_depth, params)
                .unwrap();
        Engine::with_state(config, pattern, StdRng::seed_from_u64(1))
            .unwrap()
            .with_clock(NoClock)
    }

    #[test]
    fn test_new_engine() {
        let engine = Engine::new(small_config()).unwrap();
        assert_eq!(engine.ticks(), 0);
        assert_eq!(engine.time(), 0.0);
        assert!(engine.archive().is_empty());
        assert!(engine.pattern().noise.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            width: 0,
            ..small_config()
        };
        assert!(matches!(
            Engine::new(config),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_state_mismatch_rejected() {
        let pattern = PatternState::blank(8, 8, 10, Params::default()).unwrap();
        let result = Engine::with_state(small_config(), pattern, StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(ConfigError::StateMismatch { .. })));
    }

    #[test]
    fn test_tick_advances_time_and_age() {
        let mut engine = Engine::new(small_config()).unwrap().with_clock(NoClock);
        let report = engine.tick();

        assert_eq!(engine.ticks(), 1);
        assert!((report.time - 0.01).abs() < 1e-6);
        assert_eq!(engine.pattern().age, 3);
        assert_eq!(report.mutations, 0);
        for v in report.features.as_array() {
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(engine.pattern().fitness, report.fitness);
    }

    #[test]
    fn test_stalled_pattern_regenerates_once_trigger_exceeded() {
        let mut engine = frozen_engine(small_config());

        // 30 stable steps: not yet past the trigger. The 11th tick reaches 33.
        let reports: Vec<_> = (0..10).map(|_| engine.tick()).collect();
        assert!(reports.iter().all(|r| r.regeneration.is_none()));
        assert_eq!(engine.pattern().stable_count, 30);
        assert_eq!(engine.regenerations(), 0);

        let report = engine.tick();
        assert_eq!(report.regeneration, Some(Regeneration::Perturbed));
        assert_eq!(engine.regenerations(), 1);
        assert!(engine.pattern().noise.is_some());
    }

    #[test]
    fn test_auto_regenerate_disabled() {
        let mut engine = frozen_engine(small_config());
        engine.set_auto_regenerate(false);

        engine.run(20);
        assert_eq!(engine.regenerations(), 0);
        assert_eq!(engine.pattern().stable_count, 60);
    }

    #[test]
    fn test_slow_clock_drives_mutation() {
        let config = EngineConfig {
            mutation: MutationConfig {
                rate: 1.0,
                ..Default::default()
            },
            ..small_config()
        };
        // Every step appears to take 32 ms: intensity 2, probability 2.
        let mut engine =
            frozen_engine_with(config, Params::default()).with_clock(ManualClock::new(32.0));
        engine.set_auto_regenerate(false);
        let before = *engine.params();

        let report = engine.tick();
        assert_eq!(report.mutations, 3);
        assert_eq!(engine.mutations(), 3);
        assert_ne!(*engine.params(), before);
    }

    #[test]
    fn test_unavailable_clock_skips_mutation() {
        let config = EngineConfig {
            mutation: MutationConfig {
                rate: 1.0,
                ..Default::default()
            },
            ..small_config()
        };
        let mut engine =
            frozen_engine_with(config, Params::default()).with_clock(HalfClock::default());
        engine.set_auto_regenerate(false);
        let before = *engine.params();

        for _ in 0..10 {
            assert_eq!(engine.tick().mutations, 0);
        }
        assert_eq!(engine.mutations(), 0);
        assert_eq!(*engine.params(), before);
    }

    #[test]
    fn test_clock_advances_at_large_time() {
        let mut engine = frozen_engine(small_config());
        engine.set_auto_regenerate(false);
        engine.time = 262_144.0;

        engine.run(1000);
        assert!((engine.time() - 262_154.0).abs() < 1e-6, "time = {}", engine.time());

        let report = engine.tick();
        assert!(report.time > 262_154.0);
    }

    #[test]
    fn test_fast_clock_never_mutates() {
        let mut engine = frozen_engine(small_config()).with_clock(ManualClock::new(1.0));
        engine.set_auto_regenerate(false);
        let before = *engine.params();

        engine.run(20);
        assert_eq!(engine.mutations(), 0);
        assert_eq!(*engine.params(), before);
    }

    #[test]
    fn test_archive_accepts_mature_fit_pattern() {
        let config = EngineConfig {
            fitness: FitnessWeights::constant(1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
            ..small_config()
        };
        let mut engine = frozen_engine(config);
        engine.set_auto_regenerate(false);

        // Age passes 50 on tick 17 (51 steps).
        let reports: Vec<_> = (0..17).map(|_| engine.tick()).collect();
        assert!(reports[..16].iter().all(|r| !r.archived));
        assert!(reports[16].archived);
        assert_eq!(engine.archive().len(), 1);
        assert_eq!(engine.archive().entries()[0].age, 51);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let run = || {
            let mut engine = Engine::new(small_config()).unwrap().with_clock(NoClock);
            engine.run(15);
            engine.frame()
        };
        let (first, second) = (run(), run());
        assert_eq!(first.a, second.a);
        assert_eq!(first.b, second.b);
        assert_eq!(first.params, second.params);
    }

    #[test]
    fn test_autonomous_drift_overrides_params() {
        let config = EngineConfig {
            autonomous_drift: true,
            ..small_config()
        };
        let mut engine = Engine::new(config).unwrap().with_clock(NoClock);
        engine.tick();
        assert_eq!(*engine.params(), Params::drifting(engine.time()));
    }

    #[test]
    fn test_frame_matches_pattern() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pattern = PatternState::blank(16, 16, 10, Params::default()).unwrap();
        pattern.inject_noise(NoiseTemplate::Circle, &mut rng);
        let mut engine = Engine::with_state(small_config(), pattern, rng)
            .unwrap()
            .with_clock(NoClock);
        engine.tick();

        let frame = engine.frame();
        assert_eq!((frame.width, frame.height), (16, 16));
        assert_eq!(frame.a, engine.pattern().grid.a);
        assert_eq!(frame.features, *engine.features());
        assert!(serde_json::to_string(&frame).is_ok());
    }

    #[test]
    fn test_set_params_clamps() {
        let mut engine = frozen_engine(small_config());
        engine.set_params(Params {
            diffusion_a: 2.0,
            diffusion_b: -1.0,
            feed_rate: 0.03,
            kill_rate: 0.06,
        });
        let p = engine.params();
        assert_eq!(p.diffusion_a, 1.0);
        assert_eq!(p.diffusion_b, 0.0);
        assert_eq!(p.feed_rate, 0.03);
    }
}
