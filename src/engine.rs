use crate::config::SnowflakeConfig;
use crate::error::ConfigError;
use crate::lattice::{Axial, Classification, Lattice};
use crate::walker::{DirectionBias, Walker};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How a single walker's life ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Froze onto the cluster at this coordinate
    Attached(Axial),
    /// Spawned on a site that was already frozen
    SpawnCollision,
    /// Stepped outside the hexagon and was discarded
    Escaped,
}

impl WalkOutcome {
    pub fn grew(&self) -> bool {
        matches!(self, WalkOutcome::Attached(_))
    }
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthStats {
    pub walkers: u64,
    pub attached: u64,
    pub escaped: u64,
    pub spawn_collisions: u64,
    /// Random-walk steps taken across all walkers
    pub steps: u64,
}

impl GrowthStats {
    fn record(&mut self, outcome: WalkOutcome) {
        self.walkers += 1;
        match outcome {
            WalkOutcome::Attached(_) => self.attached += 1,
            WalkOutcome::SpawnCollision => self.spawn_collisions += 1,
            WalkOutcome::Escaped => self.escaped += 1,
        }
    }
}

/// Grows a frozen cluster from the origin one walker at a time
pub struct GrowthEngine {
    lattice: Lattice,
    bias: DirectionBias,
    capacity: usize,
    stats: GrowthStats,
    rng: StdRng,
}

impl GrowthEngine {
    /// Validate `config` and set up an origin-only lattice
    pub fn new(config: &SnowflakeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bias = DirectionBias::new(config.wind_level)?;
        debug!("Direction weights: {:?}", bias.weights());
        let lattice = Lattice::new(config.mesh_length);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            lattice,
            bias,
            capacity: config.nucleus_upper_limit,
            stats: GrowthStats::default(),
            rng,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn stats(&self) -> GrowthStats {
        self.stats
    }

    pub fn is_complete(&self) -> bool {
        self.lattice.frozen_count() >= self.capacity
    }

    /// Get growth progress as a ratio (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        (self.lattice.frozen_count() as f32 / self.capacity as f32).min(1.0)
    }

    /// Spawn one walker inside the hexagon and follow it until it ends
    pub fn random_walk(&mut self) -> WalkOutcome {
        let walker = Walker::spawn(self.lattice.size(), &mut self.rng);
        self.walk(walker)
    }

    /// Follow an already placed walker until it attaches, escapes or lands on a frozen site
    pub fn walk(&mut self, mut walker: Walker) -> WalkOutcome {
        let outcome = loop {
            match self.lattice.classify(walker.position) {
                Classification::AlreadyFrozen => break WalkOutcome::SpawnCollision,
                Classification::Attach => {
                    self.lattice.attach(walker.position);
                    break WalkOutcome::Attached(walker.position);
                }
                Classification::Free => {
                    walker.step(&self.bias, &mut self.rng);
                    self.stats.steps += 1;
                    if !self.lattice.in_bounds(walker.position) {
                        break WalkOutcome::Escaped;
                    }
                }
            }
        };
        self.stats.record(outcome);
        trace!("walker {} ended: {:?}", self.stats.walkers, outcome);
        outcome
    }

    /// Grow until the cluster reaches capacity
    pub fn run(&mut self) {
        self.run_with(|_| {});
    }

    /// Grow until the cluster reaches capacity, calling `on_growth` after every attachment
    pub fn run_with<F>(&mut self, mut on_growth: F)
    where
        F: FnMut(&Lattice),
    {
        info!(
            "Growing nucleus to {} cells (mesh_length = {}, wind_level = {})",
            self.capacity,
            self.lattice.size(),
            self.bias.wind_level()
        );

        let report_every = (self.capacity / 10).max(1);
        while !self.is_complete() {
            if self.random_walk().grew() {
                on_growth(&self.lattice);
                let count = self.lattice.frozen_count();
                if count % report_every == 0 {
                    info!(
                        "Nucleus {}/{} ({:.0}%), {} walkers spawned",
                        count,
                        self.capacity,
                        self.progress() * 100.0,
                        self.stats.walkers
                    );
                }
            }
        }

        debug!("Run statistics: {:?}", self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::MAX_MESH_LENGTH;
    use crate::walker::MAX_WIND_LEVEL;

    fn config(mesh_length: u32, limit: usize, wind_level: f64) -> SnowflakeConfig {
        SnowflakeConfig {
            mesh_length,
            nucleus_upper_limit: limit,
            wind_level,
            seed: Some(2024),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        assert!(matches!(
            GrowthEngine::new(&config(10, 50, 0.5)),
            Err(ConfigError::InvalidWindLevel(_))
        ));
        assert!(matches!(
            GrowthEngine::new(&config(1, 8, 0.0)),
            Err(ConfigError::CapacityExceedsLattice { .. })
        ));
        assert!(matches!(
            GrowthEngine::new(&config(1 << 31, 50, 0.0)),
            Err(ConfigError::MeshTooLarge { .. })
        ));
    }

    #[test]
    fn test_walker_escapes_largest_hexagon() {
        let mut engine = GrowthEngine::new(&config(MAX_MESH_LENGTH, 10, MAX_WIND_LEVEL)).unwrap();
        let m = MAX_MESH_LENGTH as i32;
        // Wind pushes toward decreasing v, off the west edge
        let outcome = engine.walk(Walker::at(Axial::new(m, -m)));

        assert_eq!(outcome, WalkOutcome::Escaped);
        assert_eq!(engine.lattice().frozen_count(), 1);
    }

    #[test]
    fn test_walker_next_to_origin_attaches() {
        let mut engine = GrowthEngine::new(&config(5, 10, 0.0)).unwrap();
        let outcome = engine.walk(Walker::at(Axial::new(1, 0)));

        assert_eq!(outcome, WalkOutcome::Attached(Axial::new(1, 0)));
        assert_eq!(engine.lattice().frozen_count(), 2);
        assert!(engine.lattice().contains(Axial::new(1, 0)));
    }

    #[test]
    fn test_walker_on_frozen_site_does_nothing() {
        let mut engine = GrowthEngine::new(&config(5, 10, 0.0)).unwrap();
        let outcome = engine.walk(Walker::at(Axial::ORIGIN));

        assert_eq!(outcome, WalkOutcome::SpawnCollision);
        assert!(!outcome.grew());
        assert_eq!(engine.lattice().frozen_count(), 1);
        assert_eq!(engine.stats().spawn_collisions, 1);
        assert_eq!(engine.stats().steps, 0);
    }

    #[test]
    fn test_walk_ends_by_attaching_or_escaping() {
        let mut engine = GrowthEngine::new(&config(6, 20, 0.0)).unwrap();
        for _ in 0..200 {
            let before = engine.lattice().frozen_count();
            let outcome = engine.walk(Walker::at(Axial::new(3, 3)));
            let after = engine.lattice().frozen_count();
            match outcome {
                WalkOutcome::Attached(_) => assert_eq!(after, before + 1),
                _ => assert_eq!(after, before),
            }
        }
        let stats = engine.stats();
        assert_eq!(stats.walkers, 200);
        assert_eq!(stats.attached + stats.escaped + stats.spawn_collisions, 200);
    }

    #[test]
    fn test_run_reaches_capacity_exactly() {
        let mut engine = GrowthEngine::new(&config(15, 120, 0.0)).unwrap();
        engine.run();

        assert!(engine.is_complete());
        assert_eq!(engine.lattice().frozen_count(), 120);
        assert_eq!(engine.stats().attached, 119);
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn test_frozen_cells_stay_in_bounds_and_connected() {
        let mut engine = GrowthEngine::new(&config(12, 150, 0.08)).unwrap();
        engine.run();

        let lattice = engine.lattice();
        for cell in lattice.frozen() {
            assert!(lattice.in_bounds(cell));
            if cell != Axial::ORIGIN {
                assert!(cell.neighbors().any(|n| lattice.contains(n)));
            }
        }
    }

    #[test]
    fn test_frozen_count_never_decreases() {
        let mut engine = GrowthEngine::new(&config(10, 80, 0.0)).unwrap();
        let mut last = engine.lattice().frozen_count();
        engine.run_with(|lattice| {
            assert_eq!(lattice.frozen_count(), last + 1);
            last = lattice.frozen_count();
        });
        assert_eq!(last, 80);
    }

    #[test]
    fn test_full_hexagon_fills() {
        // Tiny hexagon grown to every vertex
        let mut engine = GrowthEngine::new(&config(1, 7, MAX_WIND_LEVEL)).unwrap();
        engine.run();
        assert_eq!(engine.lattice().frozen_count(), 7);
    }

    #[test]
    fn test_capacity_one_needs_no_walkers() {
        let mut engine = GrowthEngine::new(&config(0, 1, 0.0)).unwrap();
        engine.run();
        assert_eq!(engine.stats().walkers, 0);
        assert!(engine.is_complete());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = GrowthEngine::new(&config(10, 60, 0.05)).unwrap();
        let mut b = GrowthEngine::new(&config(10, 60, 0.05)).unwrap();
        a.run();
        b.run();

        let mut cells_a: Vec<_> = a.lattice().frozen().map(|c| (c.u, c.v)).collect();
        let mut cells_b: Vec<_> = b.lattice().frozen().map(|c| (c.u, c.v)).collect();
        cells_a.sort_unstable();
        cells_b.sort_unstable();
        assert_eq!(cells_a, cells_b);
        assert_eq!(a.stats(), b.stats());
    }
}
