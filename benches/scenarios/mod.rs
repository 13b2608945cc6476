//! Benchmarks for whole files.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput};
use pianola::{Context, Scheduler};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// One track of `notes` quarter notes walking up from A0, each overlapping
/// the next by an eighth.
fn scale_track(notes: u8) -> Vec<u8> {
    let mut body = vec![0x00, 0x90, 21, 0x60];
    for i in 1..notes {
        let note = 21 + i % 88;
        body.extend_from_slice(&[0x81, 0x70, 0x90, note, 0x60]); // +240 on
        body.extend_from_slice(&[0x81, 0x70, 0x80, note - 1, 0x40]); // +240 off previous
    }
    body.extend_from_slice(&[0x00, 0x80, 21 + (notes - 1) % 88, 0x40]);
    body.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    body
}

fn smf(tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = b"MThd\x00\x00\x00\x06\x00\x01".to_vec();
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&480u16.to_be_bytes());
    for body in tracks {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
    }
    bytes
}

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/decode");

    for tracks in [1usize, 4, 16] {
        let bytes = smf(&vec![scale_track(80); tracks]);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("tracks", tracks), &bytes, |b, bytes| {
            b.iter(|| Context::decode(black_box(bytes)))
        });
    }

    group.finish();
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");

    // Ten held keys across the keyboard.
    let mut chord = Vec::new();
    for note in (30u8..100).step_by(7) {
        chord.extend_from_slice(&[0x00, 0x90, note, 0x50]);
    }
    chord.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    let context = Arc::new(Context::decode(&smf(&[chord])).unwrap());

    for &size in BLOCK_SIZES {
        let mut scheduler = Scheduler::new(Arc::clone(&context), SAMPLE_RATE).unwrap();
        let mut out = [0u8; pianola::FRAME_BYTES];

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("chord", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    scheduler.process_frame(black_box(&mut out));
                }
            })
        });
    }

    group.finish();
}
