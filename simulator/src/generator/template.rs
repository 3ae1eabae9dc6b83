/// Reference rotation used to seed synthetic scans: `(angle_deg, range_mm, intensity)`.
pub const REFERENCE_PROFILE: [(f64, u32, u16); 16] = [
    (0.0, 0, 0),
    (22.5, 43520, 85),
    (45.0, 257, 153),
    (67.5, 39343, 175),
    (90.0, 21675, 0),
    (112.5, 43520, 85),
    (135.0, 10240, 217),
    (157.5, 8111, 5),
    (180.0, 37172, 0),
    (202.5, 0, 0),
    (225.0, 15000, 100),
    (247.5, 20000, 120),
    (270.0, 25000, 140),
    (292.5, 30000, 160),
    (315.0, 35000, 180),
    (337.5, 40000, 200),
];
