/// Grid cells per axis when the caller does not choose a resolution
pub const DEFAULT_RESOLUTION: usize = 1000;

/// Half-width of the first search window, in cells
pub const INITIAL_HALF_WINDOW: i64 = 2;

/// Arc-minutes in one degree
pub const ARC_MINUTES_PER_DEGREE: f64 = 60.0;

/// Statute miles in one nautical mile (one arc-minute of latitude)
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.1515;

/// Meters in one statute mile
pub const METERS_PER_STATUTE_MILE: f64 = 1609.344;

/// The ten reference positions `(latitude, longitude)` searched by the command-line tool
pub const DEFAULT_QUERY_POINTS: [(f32, f32); 10] = [
    (34.544909, -102.100843),
    (32.345544, -99.123124),
    (33.234235, -100.214124),
    (35.195739, -95.348899),
    (31.895839, -97.789573),
    (32.895839, -101.789573),
    (34.115839, -100.225732),
    (32.335839, -99.992232),
    (33.535339, -94.792232),
    (32.234235, -100.222222),
];
