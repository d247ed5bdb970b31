use crate::chip::Synth;
use crate::filter::shift_hist;
use crate::sources::glottal_sample;

/// Computes one output sample by chaining the glottal/noise sources through
/// the five cascaded biquads, mirroring the reference `analog_calc` signal
/// flow: glottal wave -> voice amp -> F1 -> F2-voice; noise LFSR -> noise
/// amp -> noise shaper -> F2-noise; sum -> F3 -> second noise injection ->
/// F4 -> glottal closure amp -> fixed lowpass.
pub(crate) fn compute(synth: &mut Synth) -> f64 {
    let mut v = glottal_sample(synth.pitch());
    v = v * synth.filt_va() as f64 / 15.0;
    shift_hist(&mut synth.hist.voice_1, v);

    let v = synth.filters.f1.step(&synth.hist.voice_1, &synth.hist.voice_2);
    shift_hist(&mut synth.hist.voice_2, v);

    let v = synth.filters.f2v.step(&synth.hist.voice_2, &synth.hist.voice_3);
    shift_hist(&mut synth.hist.voice_3, v);

    let noise_sign = if (synth.pitch() & 0x40) != 0 && synth.cur_noise() { 1.0 } else { -1.0 };
    let mut n = 10000.0 * noise_sign;
    n = n * synth.filt_fa() as f64 / 15.0;
    shift_hist(&mut synth.hist.noise_1, n);

    let n = synth.filters.fn_.step(&synth.hist.noise_1, &synth.hist.noise_2);
    shift_hist(&mut synth.hist.noise_2, n);

    let n2 = n * synth.filt_fc() as f64 / 15.0;
    shift_hist(&mut synth.hist.noise_3, n2);

    let n2 = synth.filters.f2n.step(&synth.hist.noise_3, &synth.hist.noise_4);
    shift_hist(&mut synth.hist.noise_4, n2);

    let vn = v + n2;
    shift_hist(&mut synth.hist.vn_1, vn);

    let vn = synth.filters.f3.step(&synth.hist.vn_1, &synth.hist.vn_2);
    shift_hist(&mut synth.hist.vn_2, vn);

    let vn = vn + n * (5.0 + (15 ^ synth.filt_fc()) as f64) / 20.0;
    shift_hist(&mut synth.hist.vn_3, vn);

    let vn = synth.filters.f4.step(&synth.hist.vn_3, &synth.hist.vn_4);
    shift_hist(&mut synth.hist.vn_4, vn);

    let vn = vn * (7 ^ (synth.closure() >> 2)) as f64 / 7.0;
    shift_hist(&mut synth.hist.vn_5, vn);

    let vn = synth.filters.fx.step(&synth.hist.vn_5, &synth.hist.vn_6);
    shift_hist(&mut synth.hist.vn_6, vn);

    vn * 0.35
}
