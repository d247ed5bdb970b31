//! Cycle-accurate emulator core for the Votrax SC-01A phonetic speech
//! synthesizer: a 64-phoneme ROM-driven sequencer feeding a bilinear-
//! transform-designed cascade of formant filters.
//!
//! ```no_run
//! use votrax::Synth;
//!
//! let rom = std::fs::read("sc01a.bin").expect("rom file");
//! let mut synth = Synth::new(&rom, votrax::DEFAULT_MAIN_CLOCK).unwrap();
//! synth.write_phone(votrax::data::phone_by_name("H").unwrap());
//! let n = synth.current_phone_duration_samples() as usize;
//! let samples = synth.generate_samples(n);
//! ```

mod analog;
pub mod bits;
mod chip;
pub mod data;
pub mod error;
pub mod filter;
pub mod rom;
pub mod sequencer;
pub mod sources;

pub use self::chip::{Synth, DEFAULT_MAIN_CLOCK};
pub use self::error::RomError;
