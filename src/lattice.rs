use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Add;

/// A vertex of the triangular lattice in axial coordinates.
///
/// The Cartesian position is `x = v + u/2`, `y = (√3/2)·u`, so `u` runs along
/// the 60° axis and `v` along the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Axial {
    pub u: i32,
    pub v: i32,
}

impl Axial {
    pub const ORIGIN: Axial = Axial { u: 0, v: 0 };

    pub const fn new(u: i32, v: i32) -> Self {
        Self { u, v }
    }

    /// The six lattice neighbors, in `Direction::ALL` order
    pub fn neighbors(self) -> impl Iterator<Item = Axial> {
        Direction::ALL.into_iter().map(move |d| self + d.offset())
    }
}

impl Add for Axial {
    type Output = Axial;

    fn add(self, rhs: Axial) -> Axial {
        Axial::new(self.u + rhs.u, self.v + rhs.v)
    }
}

/// Unit offsets of the six lattice directions, indexed like `Direction`
pub const UNIT_VECTORS: [Axial; 6] = [
    Axial::new(1, 0),
    Axial::new(0, 1),
    Axial::new(-1, 1),
    Axial::new(1, -1),
    Axial::new(-1, 0),
    Axial::new(0, -1),
];

/// One of the six legal single steps on the lattice.
///
/// The first three lean east and lose weight under wind; the last three are
/// their opposites and gain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthEast,
    East,
    SouthEast,
    NorthWest,
    SouthWest,
    West,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::NorthWest,
        Direction::SouthWest,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> Axial {
        UNIT_VECTORS[self.index()]
    }
}

/// What a walker at a given coordinate should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The site is already part of the cluster; the walker ends without effect
    AlreadyFrozen,
    /// The site touches the cluster; the walker freezes here
    Attach,
    /// Nothing nearby; keep walking
    Free,
}

/// Largest hexagon radius whose vertices, neighbors and one step beyond fit in `i32` axial coordinates
pub const MAX_MESH_LENGTH: u32 = i32::MAX as u32 - 2;

/// Number of lattice vertices inside a hexagon of the given radius, saturating at `u64::MAX`
pub fn total_vertices(size: u32) -> u64 {
    let s = size as u128;
    u64::try_from(3 * s * s + 3 * s + 1).unwrap_or(u64::MAX)
}

/// Hexagonal region of the triangular lattice plus the frozen cluster growing in it
#[derive(Debug, Clone)]
pub struct Lattice {
    size: u32,
    frozen: HashSet<Axial>,
}

impl Lattice {
    /// Create a lattice of radius `size` seeded with a frozen origin
    pub fn new(size: u32) -> Self {
        let mut frozen = HashSet::new();
        frozen.insert(Axial::ORIGIN);
        Self { size, frozen }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of frozen cells, origin included
    pub fn frozen_count(&self) -> usize {
        self.frozen.len()
    }

    pub fn contains(&self, coord: Axial) -> bool {
        self.frozen.contains(&coord)
    }

    /// Frozen cells in no particular order
    pub fn frozen(&self) -> impl Iterator<Item = Axial> + '_ {
        self.frozen.iter().copied()
    }

    pub fn total_vertices(&self) -> u64 {
        total_vertices(self.size)
    }

    fn is_frozen(&self, coord: Axial) -> bool {
        coord == Axial::ORIGIN || self.contains(coord)
    }

    pub fn classify(&self, coord: Axial) -> Classification {
        if self.is_frozen(coord) {
            return Classification::AlreadyFrozen;
        }
        if coord.neighbors().any(|n| self.is_frozen(n)) {
            Classification::Attach
        } else {
            Classification::Free
        }
    }

    /// Freeze `coord`. The caller must have seen `Classification::Attach` for it.
    pub fn attach(&mut self, coord: Axial) {
        debug_assert_eq!(self.classify(coord), Classification::Attach);
        self.frozen.insert(coord);
    }

    /// Whether `coord` lies inside the hexagon of radius `size`
    pub fn in_bounds(&self, coord: Axial) -> bool {
        let size = self.size as i64;
        let (u, v) = (coord.u as i64, coord.v as i64);
        if u >= 0 {
            u <= size && v <= size - u && v >= -size
        } else {
            u >= -size && v >= -size - u && v <= size
        }
    }

    pub fn capacity_check(&self, capacity: usize) -> Result<(), ConfigError> {
        let total = self.total_vertices();
        if capacity as u64 > total {
            return Err(ConfigError::CapacityExceedsLattice {
                capacity,
                total_vertices: total,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions_cancel() {
        let opposites = [(0, 4), (1, 5), (2, 3)];
        for (a, b) in opposites {
            assert_eq!(UNIT_VECTORS[a] + UNIT_VECTORS[b], Axial::ORIGIN);
        }
        let sum = UNIT_VECTORS.iter().fold(Axial::ORIGIN, |acc, &d| acc + d);
        assert_eq!(sum, Axial::ORIGIN);
    }

    #[test]
    fn test_origin_is_frozen_for_every_size() {
        for size in 0..20 {
            let lattice = Lattice::new(size);
            assert_eq!(lattice.classify(Axial::ORIGIN), Classification::AlreadyFrozen);
            assert_eq!(lattice.frozen_count(), 1);
        }
    }

    #[test]
    fn test_classify_neighbors_and_free_sites() {
        let lattice = Lattice::new(5);
        for n in Axial::ORIGIN.neighbors() {
            assert_eq!(lattice.classify(n), Classification::Attach);
        }
        // (1,1) is two steps away from the origin
        assert_eq!(lattice.classify(Axial::new(1, 1)), Classification::Free);
        assert_eq!(lattice.classify(Axial::new(3, -1)), Classification::Free);
    }

    #[test]
    fn test_attach_grows_cluster_by_one() {
        let mut lattice = Lattice::new(3);
        let walker_site = Axial::new(1, 0);
        assert_eq!(lattice.classify(walker_site), Classification::Attach);

        lattice.attach(walker_site);
        assert_eq!(lattice.frozen_count(), 2);
        assert!(lattice.contains(walker_site));
        assert_eq!(lattice.classify(walker_site), Classification::AlreadyFrozen);

        // (2,0) now touches the new cell
        assert_eq!(lattice.classify(Axial::new(2, 0)), Classification::Attach);
        lattice.attach(Axial::new(2, 0));
        assert_eq!(lattice.frozen_count(), 3);
    }

    #[test]
    fn test_bounds_size_one() {
        let lattice = Lattice::new(1);
        for (u, v) in [(1, 1), (2, 0), (-2, 0), (1, -2)] {
            assert!(!lattice.in_bounds(Axial::new(u, v)), "({u},{v}) should be outside");
        }
        for (u, v) in [(1, 0), (0, 1), (-1, 0), (0, -1), (1, -1), (-1, 1), (0, 0)] {
            assert!(lattice.in_bounds(Axial::new(u, v)), "({u},{v}) should be inside");
        }
    }

    #[test]
    fn test_bounds_count_matches_total_vertices() {
        for size in 0..12u32 {
            let lattice = Lattice::new(size);
            let r = size as i32 + 2;
            let inside = (-r..=r)
                .flat_map(|u| (-r..=r).map(move |v| Axial::new(u, v)))
                .filter(|&c| lattice.in_bounds(c))
                .count();
            assert_eq!(inside as u64, total_vertices(size));
        }
    }

    #[test]
    fn test_bounds_symmetric_about_origin() {
        let lattice = Lattice::new(4);
        for u in -6..=6 {
            for v in -6..=6 {
                assert_eq!(
                    lattice.in_bounds(Axial::new(u, v)),
                    lattice.in_bounds(Axial::new(-u, -v))
                );
            }
        }
    }

    #[test]
    fn test_neighbors_of_largest_hexagon_corner() {
        let m = MAX_MESH_LENGTH as i32;
        let lattice = Lattice::new(MAX_MESH_LENGTH);
        let corner = Axial::new(m, -m);
        assert!(lattice.in_bounds(corner));
        assert_eq!(lattice.classify(corner), Classification::Free);
        let outside = corner.neighbors().filter(|&n| !lattice.in_bounds(n)).count();
        assert_eq!(outside, 3);
    }

    #[test]
    fn test_capacity_check() {
        let lattice = Lattice::new(1);
        assert_eq!(lattice.total_vertices(), 7);
        assert!(lattice.capacity_check(7).is_ok());
        assert_eq!(
            lattice.capacity_check(8),
            Err(ConfigError::CapacityExceedsLattice {
                capacity: 8,
                total_vertices: 7
            })
        );
        assert!(Lattice::new(0).capacity_check(1).is_ok());
        assert!(Lattice::new(0).capacity_check(2).is_err());
    }

    #[test]
    fn test_total_vertices_of_huge_hexagon_saturates() {
        assert_eq!(total_vertices(u32::MAX), u64::MAX);
        let s = MAX_MESH_LENGTH as u64;
        assert_eq!(total_vertices(MAX_MESH_LENGTH), 3 * s * s + 3 * s + 1);
        assert!(Lattice::new(u32::MAX).capacity_check(3000).is_ok());
    }
}
