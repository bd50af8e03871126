use crate::error::ConfigError;
use crate::lattice::{Axial, Direction, MAX_MESH_LENGTH};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Largest accepted wind level; at this value the eastward group is never drawn
pub const MAX_WIND_LEVEL: f64 = 1.0 / 6.0;

/// Number of tickets a probability of 1.0 is split into when discretizing the bias
const GRANULARITY: f64 = 5000.0;

/// Weighted distribution over the six lattice directions.
///
/// `wind_level` moves probability mass from the three eastward directions to
/// the three westward ones: each eastward direction gets `1/6 - wind_level`,
/// each westward one `1/6 + wind_level`, both rounded up to a multiple of
/// `1/GRANULARITY`.
#[derive(Debug, Clone)]
pub struct DirectionBias {
    wind_level: f64,
    weights: [u32; 6],
    index: WeightedIndex<u32>,
}

impl DirectionBias {
    pub fn new(wind_level: f64) -> Result<Self, ConfigError> {
        if !(0.0..=MAX_WIND_LEVEL).contains(&wind_level) {
            return Err(ConfigError::InvalidWindLevel(wind_level));
        }

        let decrease = tickets(MAX_WIND_LEVEL - wind_level);
        let increase = tickets(MAX_WIND_LEVEL + wind_level);
        let weights = [decrease, decrease, decrease, increase, increase, increase];

        // increase >= ceil(5000/6) so the total is never zero
        let index = WeightedIndex::new(weights)
            .map_err(|_| ConfigError::InvalidWindLevel(wind_level))?;

        Ok(Self {
            wind_level,
            weights,
            index,
        })
    }

    pub fn wind_level(&self) -> f64 {
        self.wind_level
    }

    /// Ticket count per direction, in `Direction::ALL` order
    pub fn weights(&self) -> [u32; 6] {
        self.weights
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[self.index.sample(rng)]
    }
}

fn tickets(probability: f64) -> u32 {
    (probability * GRANULARITY).ceil().max(0.0) as u32
}

/// One mobile particle wandering over the lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    pub position: Axial,
}

impl Walker {
    /// Spawn uniformly inside the hexagon of radius `size`.
    ///
    /// `u` is drawn first, then `v` from the slice of the hexagon at that `u`,
    /// so every spawn point passes `Lattice::in_bounds`. Radii beyond
    /// `MAX_MESH_LENGTH` are clamped to it.
    pub fn spawn<R: Rng + ?Sized>(size: u32, rng: &mut R) -> Self {
        let s = size.min(MAX_MESH_LENGTH) as i32;
        let u = rng.gen_range(-s..=s);
        let v = if u >= 0 {
            rng.gen_range(-s..=s - u)
        } else {
            rng.gen_range(-s - u..=s)
        };
        Self::at(Axial::new(u, v))
    }

    pub fn at(position: Axial) -> Self {
        Self { position }
    }

    pub fn advance(&mut self, direction: Direction) {
        self.position = self.position + direction.offset();
    }

    /// Take one step in a direction drawn from `bias`
    pub fn step<R: Rng + ?Sized>(&mut self, bias: &DirectionBias, rng: &mut R) {
        let direction = bias.sample(rng);
        self.advance(direction);
    }
}
