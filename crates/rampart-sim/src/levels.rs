//! Predefined path layouts. Every path of a level ends at the same point,
//! where the house stands.

use rampart_core::constants::LEVEL_COUNT;
use rampart_core::types::Vector2D;

/// Clamp a requested level number into `1..=LEVEL_COUNT`.
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, LEVEL_COUNT)
}

/// Waypoint lists for `level` (clamped).
pub fn paths_for_level(level: u32) -> Vec<Vec<Vector2D>> {
    let raw: &[&[(f64, f64)]] = match clamp_level(level) {
        1 => &[&[
            (0.0, 300.0),
            (200.0, 300.0),
            (400.0, 300.0),
            (600.0, 300.0),
            (760.0, 300.0),
        ]],
        // Three lanes converging on the house.
        2 => &[
            &[
                (0.0, 150.0),
                (250.0, 150.0),
                (450.0, 200.0),
                (620.0, 260.0),
                (760.0, 300.0),
            ],
            &[
                (0.0, 350.0),
                (150.0, 350.0),
                (350.0, 320.0),
                (550.0, 310.0),
                (760.0, 300.0),
            ],
            &[
                (0.0, 500.0),
                (200.0, 480.0),
                (420.0, 420.0),
                (620.0, 360.0),
                (760.0, 300.0),
            ],
        ],
        // Zigzags.
        _ => &[
            &[
                (0.0, 100.0),
                (120.0, 180.0),
                (60.0, 260.0),
                (200.0, 340.0),
                (120.0, 420.0),
                (300.0, 450.0),
                (500.0, 380.0),
                (680.0, 330.0),
                (760.0, 300.0),
            ],
            &[
                (0.0, 550.0),
                (180.0, 520.0),
                (300.0, 400.0),
                (380.0, 250.0),
                (520.0, 220.0),
                (650.0, 260.0),
                (760.0, 300.0),
            ],
            &[
                (0.0, 280.0),
                (200.0, 200.0),
                (300.0, 300.0),
                (450.0, 200.0),
                (600.0, 350.0),
                (760.0, 300.0),
            ],
        ],
    };

    raw.iter()
        .map(|path| path.iter().map(|&(x, y)| Vector2D::new(x, y)).collect())
        .collect()
}

/// House position: the final waypoint of the first path.
pub fn house_position(paths: &[Vec<Vector2D>]) -> Vector2D {
    paths
        .first()
        .and_then(|path| path.last())
        .copied()
        .unwrap_or_default()
}
