/// Phone names in `S_PHONE_TABLE` order; index is the 6-bit phone code.
pub const S_PHONE_TABLE: [&str; 64] = [
    "EH3", "EH2", "EH1", "PA0", "DT", "A1", "A2", "ZH", "AH2", "I3", "I2", "I1", "M", "N", "B",
    "V", "CH", "SH", "Z", "AW1", "NG", "AH1", "OO1", "OO", "L", "K", "J", "H", "G", "F", "D", "S",
    "A", "AY", "Y1", "UH3", "AH", "P", "O", "I", "U", "Y", "T", "R", "E", "W", "AE", "AE1", "AW2",
    "UH2", "UH1", "UH", "O2", "O1", "IU", "U1", "THV", "TH", "ER", "EH", "E1", "AW", "PA1", "STOP",
];

/// Looks up a phone code by name, for callers assembling phoneme sequences.
pub fn phone_by_name(name: &str) -> Option<u8> {
    S_PHONE_TABLE.iter().position(|&n| n == name).map(|i| i as u8)
}

/// 9-point piecewise approximation of one glottal-pulse cycle, indexed by
/// `pitch >> 3`. Indices 9 and above (not reachable through this table)
/// emit silence.
pub const GLOTTAL_WAVE: [f64; 9] = [
    0.0,
    -4.0 / 7.0,
    7.0 / 7.0,
    6.0 / 7.0,
    5.0 / 7.0,
    4.0 / 7.0,
    3.0 / 7.0,
    2.0 / 7.0,
    1.0 / 7.0,
];

/// Capacitor banks addressed by each filter's quantized control register.
pub const CAPS_F1: [f64; 4] = [2546.0, 4973.0, 9861.0, 19724.0];
pub const CAPS_F2: [f64; 5] = [833.0, 1663.0, 3164.0, 6327.0, 12654.0];
pub const CAPS_F2Q: [f64; 4] = [1390.0, 2965.0, 5875.0, 11297.0];
pub const CAPS_F3: [f64; 4] = [2226.0, 4485.0, 9056.0, 18111.0];
