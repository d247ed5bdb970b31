use crate::bits::bitswap;
use crate::rom::Rom;

/// One decoded ROM entry: filter targets, durations, and flags for a phone.
#[derive(Debug, Default, Clone, Copy)]
pub struct RomEntry {
    pub f1: u32,
    pub va: u32,
    pub f2: u32,
    pub fc: u32,
    pub f2q: u32,
    pub f3: u32,
    pub fa: u32,
    pub cld: u32,
    pub vd: u32,
    pub closure: u32,
    pub duration: u32,
    pub pause: bool,
}

impl RomEntry {
    pub fn decode(word: u64, phone: u8) -> RomEntry {
        let inv = !word;
        RomEntry {
            f1: bitswap(word, &[0, 7, 14, 21]),
            va: bitswap(word, &[1, 8, 15, 22]),
            f2: bitswap(word, &[2, 9, 16, 23]),
            fc: bitswap(word, &[3, 10, 17, 24]),
            f2q: bitswap(word, &[4, 11, 18, 25]),
            f3: bitswap(word, &[5, 12, 19, 26]),
            fa: bitswap(word, &[6, 13, 20, 27]),
            cld: bitswap(word, &[34, 32, 30, 28]),
            vd: bitswap(word, &[35, 33, 31, 29]),
            closure: bitswap(word, &[36]),
            duration: bitswap(inv, &[37, 38, 39, 40, 41, 42, 43]),
            pause: phone == 0x03 || phone == 0x3E,
        }
    }
}

/// Advances `reg` one 7/8-step towards `target << 1`; converges to
/// `16 * target` as `target` stays fixed.
#[inline]
pub fn interpolate(reg: i32, target: i32) -> i32 {
    reg - (reg >> 3) + (target << 1)
}

/// Phoneme sequencer and register interpolator: decodes the current ROM
/// entry, drives the duration/closure/voicing tick counters, and advances
/// the interpolated registers towards their ROM targets on the tick grid.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequencer {
    pub phone: u8,
    pub rom: RomEntry,

    pub phonetick: u32,
    pub ticks: u32,
    pub update_counter: u32,

    pub cur_fa: i32,
    pub cur_fc: i32,
    pub cur_va: i32,
    pub cur_f1: i32,
    pub cur_f2: i32,
    pub cur_f2q: i32,
    pub cur_f3: i32,

    pub cur_closure: bool,
}

impl Sequencer {
    pub fn new() -> Sequencer {
        Sequencer::default()
    }

    pub fn reset(&mut self) {
        *self = Sequencer::default();
        self.cur_closure = true;
    }

    /// Latches and commits `phone` synchronously (a deliberate simplification
    /// of the hardware's timer-scheduled commit — see the chip update tick).
    pub fn commit_phone(&mut self, rom: &Rom, phone: u8) {
        self.phone = phone & 0x3F;
        self.phonetick = 0;
        self.ticks = 0;
        let word = rom.lookup(self.phone);
        self.rom = RomEntry::decode(word, self.phone);
        if self.rom.cld == 0 {
            self.cur_closure = self.rom.closure != 0;
        }
    }

    /// Advances the sub-sample phoneme tick counter; returns true on the
    /// tick that crosses a closure threshold (kept for callers that want to
    /// observe closure transitions, unused internally beyond the flag).
    pub fn advance_phoneme_tick(&mut self) {
        if self.ticks == 0x10 {
            return;
        }
        self.phonetick += 1;
        if self.phonetick == ((self.rom.duration << 2) | 1) {
            self.phonetick = 0;
            self.ticks += 1;
            if self.ticks == self.rom.cld {
                self.cur_closure = self.rom.closure != 0;
            }
        }
    }

    /// Advances the coarse counter and returns `(tick_625, tick_208)`.
    pub fn advance_update_counter(&mut self) -> (bool, bool) {
        self.update_counter += 1;
        if self.update_counter == 0x30 {
            self.update_counter = 0;
        }
        let tick_625 = (self.update_counter & 0xF) == 0;
        let tick_208 = self.update_counter == 0x28;
        (tick_625, tick_208)
    }

    pub fn interpolate_formants(&mut self) {
        self.cur_fc = interpolate(self.cur_fc, self.rom.fc as i32);
        self.cur_f1 = interpolate(self.cur_f1, self.rom.f1 as i32);
        self.cur_f2 = interpolate(self.cur_f2, self.rom.f2 as i32);
        self.cur_f2q = interpolate(self.cur_f2q, self.rom.f2q as i32);
        self.cur_f3 = interpolate(self.cur_f3, self.rom.f3 as i32);
    }

    pub fn interpolate_amplitude(&mut self) {
        if self.ticks >= self.rom.vd {
            self.cur_fa = interpolate(self.cur_fa, self.rom.fa as i32);
        }
        if self.ticks >= self.rom.cld {
            self.cur_va = interpolate(self.cur_va, self.rom.va as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_converges_to_sixteen_times_target() {
        let target = 5;
        let mut reg = 0;
        for _ in 0..64 {
            reg = interpolate(reg, target);
        }
        assert!((reg - 16 * target).abs() <= 1);
    }

    #[test]
    fn pause_phones_are_flagged() {
        let entry = RomEntry::decode(0, 0x03);
        assert!(entry.pause);
        let entry = RomEntry::decode(0, 0x3E);
        assert!(entry.pause);
        let entry = RomEntry::decode(0, 0x04);
        assert!(!entry.pause);
    }

    #[test]
    fn ticks_freeze_at_cap() {
        let rom = Rom::new(&[0u8; 512]).unwrap();
        let mut seq = Sequencer::new();
        seq.commit_phone(&rom, 0);
        // rom_duration is 0 here, so phonetick hits the threshold (1) immediately.
        for _ in 0..0x200 {
            seq.advance_phoneme_tick();
        }
        assert_eq!(seq.ticks, 0x10);
    }
}
