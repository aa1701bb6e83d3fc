//! Benchmarks for message decoding and state merging

use std::sync::Arc;

use chrono::Utc;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use scorelink::MatchStateAggregator;
use scorelink::aggregator::FrameOrigin;
use scorelink::decode::MessageDecoder;
use scorelink::protocol::{Frame, FrameAssembler, FrameValidator, constants::DEFAULT_ADDRESS, encode_frame};
use scorelink::test_utils::{generic_scenario_payload, sample_stream};
use std::hint::black_box;

fn validated_frames() -> Vec<Frame> {
    let mut stream = sample_stream(1000);
    stream.extend(encode_frame(DEFAULT_ADDRESS, &generic_scenario_payload()));

    let validator = FrameValidator::default();
    FrameAssembler::new()
        .feed(&stream)
        .iter()
        .filter_map(|candidate| validator.validate(candidate).ok())
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let frames = validated_frames();
    let decoder = MessageDecoder::default();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(frames.len() as u64));
    group.bench_function("mixed_messages", |b| {
        b.iter(|| {
            for frame in &frames {
                black_box(decoder.decode(black_box(frame)));
            }
        })
    });
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let frames = validated_frames();
    let decoder = MessageDecoder::default();
    let events: Vec<_> = frames.iter().map(|frame| decoder.decode(frame)).collect();
    let peer: Arc<str> = Arc::from("bench");

    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("merge_mixed_events", |b| {
        b.iter(|| {
            let mut aggregator = MatchStateAggregator::new();
            for event in &events {
                let origin = FrameOrigin {
                    received_at: Utc::now(),
                    checksum_valid: true,
                    peer: Arc::clone(&peer),
                };
                black_box(aggregator.merge(event, origin));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_decode, bench_merge);
criterion_main!(benches);
