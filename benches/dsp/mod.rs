//! Benchmarks for the per-sample primitives.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pianola::dsp::{envelope::Envelope, mix::mix_decaying};
use pianola::synth::{KeyColor, Voice};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/voice");

    for &size in BLOCK_SIZES {
        let mut voice = Voice::new(48, KeyColor::White); // A4
        voice.on(0, 0, 100);

        group.bench_with_input(BenchmarkId::new("play", size), &size, |b, &size| {
            b.iter(|| {
                let mut frame = [0i16; 2];
                for _ in 0..size {
                    voice.play(black_box(&mut frame), SAMPLE_RATE);
                }
                frame
            })
        });
    }

    group.finish();
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut env = Envelope::new();
        env.note_on();

        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    env.next_sample(black_box(SAMPLE_RATE));
                }
                env.level()
            })
        });
    }

    group.finish();
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");
    let samples: Vec<i16> = (0..512).map(|i| (i * 61 % 2000 - 1000) as i16).collect();

    for &size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("decaying", size), &size, |b, &size| {
            b.iter(|| {
                let mut slot = 0i16;
                for &s in &samples[..size] {
                    mix_decaying(&mut slot, black_box(s));
                }
                slot
            })
        });
    }

    group.finish();
}
