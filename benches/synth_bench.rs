#[macro_use]
extern crate criterion;
extern crate votrax;

use criterion::Criterion;
use votrax::Synth;

fn bench_generate_samples(c: &mut Criterion) {
    c.bench_function("generate_samples_1024", |b| {
        let rom = [0u8; 512];
        let mut synth = Synth::new(&rom, votrax::DEFAULT_MAIN_CLOCK).unwrap();
        synth.write_phone(0x20);
        b.iter(|| synth.generate_samples(1024))
    });
}

criterion_group!(benches, bench_generate_samples);
criterion_main!(benches);
