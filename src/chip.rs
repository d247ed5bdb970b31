use crate::analog;
use crate::data::{CAPS_F1, CAPS_F2, CAPS_F2Q, CAPS_F3};
use crate::error::RomError;
use crate::filter::{build_injection, build_lowpass, build_noise_shaper, build_standard, Biquad};
use crate::bits::bits_to_caps;
use crate::rom::Rom;
use crate::sequencer::Sequencer;
use crate::sources::Lfsr;

pub const DEFAULT_MAIN_CLOCK: u32 = 720_000;

/// Every biquad history used by the analog calculation, bundled so
/// `chip.rs` can own them without a thirteen-field flat struct.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Histories {
    pub voice_1: [f64; 4],
    pub voice_2: [f64; 4],
    pub voice_3: [f64; 4],
    pub noise_1: [f64; 4],
    pub noise_2: [f64; 4],
    pub noise_3: [f64; 4],
    pub noise_4: [f64; 4],
    pub vn_1: [f64; 4],
    pub vn_2: [f64; 4],
    pub vn_3: [f64; 4],
    pub vn_4: [f64; 4],
    pub vn_5: [f64; 4],
    pub vn_6: [f64; 4],
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Filters {
    pub f1: Biquad,
    pub f2v: Biquad,
    pub f2n: Biquad,
    pub f3: Biquad,
    pub f4: Biquad,
    pub fx: Biquad,
    pub fn_: Biquad,
}

/// Top-level synthesizer. Owns the ROM, every piece of sequencer/filter
/// state, and exposes the object's full lifecycle: one constructor, one
/// mutator per external event, one sample generator. No global state.
pub struct Synth {
    rom: Rom,
    cclock: f64,
    sclock: f64,

    sequencer: Sequencer,
    lfsr: Lfsr,

    inflection: u8,
    pitch: u8,
    closure: u32,
    sample_count: u64,

    filt_fa: i32,
    filt_fc: i32,
    filt_va: i32,
    filt_f1: i32,
    filt_f2: i32,
    filt_f2q: i32,
    filt_f3: i32,

    pub(crate) filters: Filters,
    pub(crate) hist: Histories,
}

impl Synth {
    pub fn new(rom_bytes: &[u8], main_clock: u32) -> Result<Synth, RomError> {
        let rom = Rom::new(rom_bytes)?;
        let mut synth = Synth {
            rom,
            cclock: main_clock as f64 / 36.0,
            sclock: main_clock as f64 / 18.0,
            sequencer: Sequencer::new(),
            lfsr: Lfsr::new(),
            inflection: 0,
            pitch: 0,
            closure: 0,
            sample_count: 0,
            filt_fa: 0,
            filt_fc: 0,
            filt_va: 0,
            filt_f1: 0,
            filt_f2: 0,
            filt_f2q: 0,
            filt_f3: 0,
            filters: Filters::default(),
            hist: Histories::default(),
        };
        synth.reset();
        Ok(synth)
    }

    /// Zeroes histories and counters, selects the STOP phone, commits it,
    /// and forces a full filter rebuild.
    pub fn reset(&mut self) {
        self.sequencer.reset();
        self.lfsr.reset();
        self.inflection = 0;
        self.pitch = 0;
        self.closure = 0;
        self.sample_count = 0;
        self.filt_fa = 0;
        self.filt_fc = 0;
        self.filt_va = 0;
        self.filt_f1 = 0;
        self.filt_f2 = 0;
        self.filt_f2q = 0;
        self.filt_f3 = 0;
        self.hist = Histories::default();
        self.sequencer.commit_phone(&self.rom, 0x3F);
        self.filters_commit(true);
    }

    pub fn set_inflection(&mut self, inflection: u8) {
        self.inflection = inflection;
    }

    /// Latches `phone` (masked to 6 bits) and commits it synchronously.
    pub fn write_phone(&mut self, phone: u8) {
        self.sequencer.commit_phone(&self.rom, phone);
    }

    pub fn current_phone_duration_samples(&self) -> u64 {
        32 * (self.sequencer.rom.duration as u64 * 4 + 1)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sclock
    }

    pub(crate) fn filt_f1(&self) -> i32 {
        self.filt_f1
    }

    pub(crate) fn filt_fa(&self) -> i32 {
        self.filt_fa
    }

    pub(crate) fn filt_fc(&self) -> i32 {
        self.filt_fc
    }

    pub(crate) fn filt_va(&self) -> i32 {
        self.filt_va
    }

    pub(crate) fn closure(&self) -> u32 {
        self.closure
    }

    pub(crate) fn pitch(&self) -> u8 {
        self.pitch
    }

    pub(crate) fn cur_noise(&self) -> bool {
        self.lfsr.cur_noise()
    }

    /// Generates `n` samples. The odd/even `chip_update` gate runs off
    /// `sample_count`, which persists across calls rather than resetting,
    /// so back-to-back calls continue the sub-sample sequencing seamlessly.
    pub fn generate_samples(&mut self, n: usize) -> Vec<f32> {
        let mut samples = Vec::with_capacity(n);
        for _ in 0..n {
            self.sample_count += 1;
            if self.sample_count & 1 == 1 {
                self.chip_update();
            }
            samples.push(analog::compute(self) as f32);
        }
        samples
    }

    /// Orchestrates the phoneme sequencer, interpolator, pitch counter,
    /// LFSR advance, and filter recommit at the sub-sample rate. Fires on
    /// every odd `sample_count` (half the output rate) — this sets the
    /// sub-sample update rate and must not be rewritten to every sample.
    fn chip_update(&mut self) {
        self.sequencer.advance_phoneme_tick();

        let (tick_625, tick_208) = self.sequencer.advance_update_counter();

        if tick_208
            && (!self.sequencer.rom.pause || self.filt_fa != 0 || self.filt_va != 0)
        {
            self.sequencer.interpolate_formants();
        }

        if tick_625 {
            self.sequencer.interpolate_amplitude();
        }

        if !self.sequencer.cur_closure && (self.filt_fa != 0 || self.filt_va != 0) {
            self.closure = 0;
        } else if self.closure != (7 << 2) {
            self.closure += 1;
        }

        self.pitch = self.pitch.wrapping_add(1) & 0xFF;
        let target_pitch =
            (0xE0u16 ^ ((self.inflection as u16) << 5) ^ ((self.filt_f1 as u16) << 1))
                .wrapping_add(2);
        if self.pitch as u16 == target_pitch {
            self.pitch = 0;
        }

        if (self.pitch & 0xF9) == 0x08 {
            self.filters_commit(false);
        }

        self.lfsr.advance();
    }

    /// Recomputes biquad coefficients for filters whose quantized control
    /// register changed since the last commit, or every filter when
    /// `force` is set (used by `reset()`).
    fn filters_commit(&mut self, force: bool) {
        self.filt_fa = self.sequencer.cur_fa >> 4;
        self.filt_fc = self.sequencer.cur_fc >> 4;
        self.filt_va = self.sequencer.cur_va >> 4;

        let new_f1 = self.sequencer.cur_f1 >> 4;
        let mut update_f1 = force;
        if self.filt_f1 != new_f1 {
            self.filt_f1 = new_f1;
            update_f1 = true;
        }
        if update_f1 {
            let caps = bits_to_caps(self.filt_f1 as u32, &CAPS_F1);
            self.filters.f1 = build_standard(
                self.cclock, self.sclock, 11247.0, 11797.0, 949.0, 52067.0, 2280.0 + caps, 166272.0,
            );
        }

        let new_f2 = self.sequencer.cur_f2 >> 3;
        let new_f2q = self.sequencer.cur_f2q >> 4;
        let mut update_f2 = force;
        if self.filt_f2 != new_f2 || self.filt_f2q != new_f2q {
            self.filt_f2 = new_f2;
            self.filt_f2q = new_f2q;
            update_f2 = true;
        }
        if update_f2 {
            let caps_q = bits_to_caps(self.filt_f2q as u32, &CAPS_F2Q);
            let caps_v = bits_to_caps(self.filt_f2 as u32, &CAPS_F2);
            self.filters.f2v = build_standard(
                self.cclock,
                self.sclock,
                24840.0,
                29154.0,
                829.0 + caps_q,
                38180.0,
                2352.0 + caps_v,
                34270.0,
            );
            self.filters.f2n = build_injection(
                self.cclock,
                self.sclock,
                29154.0,
                829.0 + caps_q,
                38180.0,
                2352.0 + caps_v,
                34270.0,
            );
        }

        let new_f3 = self.sequencer.cur_f3 >> 4;
        let mut update_f3 = force;
        if self.filt_f3 != new_f3 {
            self.filt_f3 = new_f3;
            update_f3 = true;
        }
        if update_f3 {
            let caps = bits_to_caps(self.filt_f3 as u32, &CAPS_F3);
            self.filters.f3 = build_standard(
                self.cclock, self.sclock, 0.0, 17594.0, 868.0, 18828.0, 8480.0 + caps, 50019.0,
            );
        }

        if force {
            self.filters.f4 = build_standard(
                self.cclock, self.sclock, 0.0, 28810.0, 1165.0, 21457.0, 8558.0, 7289.0,
            );
            self.filters.fx = build_lowpass(self.cclock, self.sclock, 1122.0, 23131.0);
            self.filters.fn_ =
                build_noise_shaper(self.cclock, self.sclock, 15500.0, 14854.0, 8450.0, 9523.0, 14083.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_rom() -> [u8; 512] {
        [0u8; 512]
    }

    #[test]
    fn rejects_bad_rom_size() {
        let err = Synth::new(&[0u8; 10], DEFAULT_MAIN_CLOCK).unwrap_err();
        match err {
            RomError::BadSize(n) => assert_eq!(n, 10),
        }
    }

    #[test]
    fn sample_rate_is_main_clock_over_eighteen() {
        let synth = Synth::new(&zero_rom(), DEFAULT_MAIN_CLOCK).unwrap();
        assert!((synth.sample_rate() - DEFAULT_MAIN_CLOCK as f64 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn generate_samples_is_total_and_finite() {
        let mut synth = Synth::new(&zero_rom(), DEFAULT_MAIN_CLOCK).unwrap();
        synth.write_phone(0x3F);
        let samples = synth.generate_samples(2000);
        assert_eq!(samples.len(), 2000);
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn reset_restores_stop_phone_and_silence() {
        let mut synth = Synth::new(&zero_rom(), DEFAULT_MAIN_CLOCK).unwrap();
        synth.write_phone(0x00);
        synth.generate_samples(100);
        synth.reset();
        let samples = synth.generate_samples(200);
        let rms = (samples.iter().map(|s| (*s as f64).powi(2)).sum::<f64>() / samples.len() as f64)
            .sqrt();
        assert!(rms < 1e-4);
    }

    #[test]
    fn write_phone_resets_sub_phoneme_counters() {
        let mut synth = Synth::new(&zero_rom(), DEFAULT_MAIN_CLOCK).unwrap();
        synth.write_phone(0x00);
        synth.generate_samples(200);
        synth.write_phone(0x01);
        assert_eq!(synth.sequencer.ticks, 0);
        assert_eq!(synth.sequencer.phonetick, 0);
    }

    /// Sets the 4-bit `f1` field and the inverted 7-bit duration field of
    /// phone `phone`'s entry, leaving every other field zero.
    fn encode_f1_entry(bytes: &mut [u8; 512], phone: u8, duration: u32, f1: u32) {
        let mut word: u64 = (phone as u64 & 0x3F) << 56;
        for (i, &pos) in [0u32, 7, 14, 21].iter().enumerate() {
            if (f1 >> (3 - i)) & 1 == 1 {
                word |= 1 << pos;
            }
        }
        for (i, &pos) in [37u32, 38, 39, 40, 41, 42, 43].iter().enumerate() {
            if (duration >> (6 - i)) & 1 == 0 {
                word |= 1 << pos;
            }
        }
        let offset = phone as usize * 8;
        bytes[offset..offset + 8].copy_from_slice(&word.to_le_bytes());
    }

    #[test]
    fn s4_phone_switch_resets_counters_and_rebuilds_filters() {
        let mut bytes = zero_rom();
        encode_f1_entry(&mut bytes, 0x01, 20, 10);
        let mut synth = Synth::new(&bytes, DEFAULT_MAIN_CLOCK).unwrap();

        synth.write_phone(0x00);
        synth.generate_samples(200);
        synth.write_phone(0x01);
        assert_eq!(synth.sequencer.ticks, 0);
        assert_eq!(synth.sequencer.phonetick, 0);

        // Drive enough samples for cur_f1 to interpolate toward the new
        // target and for the (pitch & 0xF9) == 0x08 commit gate to fire
        // after convergence.
        synth.generate_samples(20_000);
        assert_ne!(synth.filt_f1, 0);

        let caps = bits_to_caps(synth.filt_f1 as u32, &CAPS_F1);
        let expected = build_standard(
            synth.cclock, synth.sclock, 11247.0, 11797.0, 949.0, 52067.0, 2280.0 + caps, 166272.0,
        );
        assert_eq!(synth.filters.f1, expected);
    }

    #[test]
    fn s5_pitch_wraps_at_target_pitch_deterministically() {
        let mut synth = Synth::new(&zero_rom(), DEFAULT_MAIN_CLOCK).unwrap();
        synth.write_phone(0x00);

        // filt_f1 and inflection both stay 0 on a zero ROM, so target_pitch
        // is the fixed value (0xE0 ^ 0 ^ 0) + 2.
        let target_pitch: u32 = 0xE2;

        let mut wraps = 0u32;
        for _ in 0..10_000 {
            let before = synth.pitch;
            synth.chip_update();
            if before != 0 && synth.pitch == 0 {
                wraps += 1;
            }
        }
        let expected = 10_000 / target_pitch;
        assert!((wraps as i64 - expected as i64).abs() <= 1);
    }
}
