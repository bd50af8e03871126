use crate::export::axial_to_cartesian;
use crate::lattice::Lattice;

/// Braille character rendering for a quick terminal preview of the nucleus.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;

/// Render the frozen cells into `columns` characters per line.
///
/// The window is the same `[-L, L] x [-(√3/2)L, (√3/2)L]` box the plot uses,
/// so the preview keeps the hexagon's proportions.
pub fn render_lattice(lattice: &Lattice, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let half_width = lattice.size().max(1) as f64;
    let half_height = half_width * HALF_SQRT_3;

    // Braille effective resolution
    let dot_width = columns * 2;
    let dot_height = ((dot_width as f64 * HALF_SQRT_3).round() as usize).max(4);
    let rows = dot_height.div_ceil(4);

    let mut patterns = vec![0u8; rows * columns];
    for cell in lattice.frozen() {
        let (x, y) = axial_to_cartesian(cell);
        let dx = ((x + half_width) / (2.0 * half_width) * (dot_width - 1) as f64).round();
        let dy = ((half_height - y) / (2.0 * half_height) * (dot_height - 1) as f64).round();
        if dx < 0.0 || dy < 0.0 {
            continue;
        }
        let (dx, dy) = (dx as usize, dy as usize);
        if dx >= dot_width || dy >= rows * 4 {
            continue;
        }
        patterns[(dy / 4) * columns + dx / 2] |= BRAILLE_DOTS[dx % 2][dy % 4];
    }

    patterns
        .chunks(columns)
        .map(|row| {
            row.iter()
                .map(|&p| char::from_u32(BRAILLE_BASE + p as u32).unwrap_or(' '))
                .collect::<String>()
                .trim_end_matches('\u{2800}')
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Axial;

    fn dot_count(lines: &[String]) -> u32 {
        lines
            .iter()
            .flat_map(|l| l.chars())
            .map(|c| (c as u32 - BRAILLE_BASE).count_ones())
            .sum()
    }

    #[test]
    fn test_origin_only_shows_one_dot() {
        let lattice = Lattice::new(10);
        let lines = render_lattice(&lattice, 20);
        assert_eq!(dot_count(&lines), 1);
    }

    #[test]
    fn test_row_count_follows_aspect() {
        let lattice = Lattice::new(10);
        // 80 dots wide -> 69 dots tall -> 18 rows
        assert_eq!(render_lattice(&lattice, 40).len(), 18);
    }

    #[test]
    fn test_neighbors_render_as_separate_dots() {
        let mut lattice = Lattice::new(3);
        lattice.attach(Axial::new(0, 1));
        lattice.attach(Axial::new(0, -1));
        let lines = render_lattice(&lattice, 40);
        assert_eq!(dot_count(&lines), 3);
    }
}
