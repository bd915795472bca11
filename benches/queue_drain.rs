//! Benchmarks for the pending queue and package serialization
//!
//! This benchmark measures:
//! - Draining one kind out of a mixed queue
//! - Serializing a full request package

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use volland_rs::batch::PendingQueue;
use volland_rs::request::{
    ExposureRequest, ParadigmRequest, Request, RequestPackage, TrendRequest, ZeroDteRequest,
};
use volland_rs::tickers::SUPPORTED_TICKERS;
use volland_rs::{Greek, OptionKind, RequestKind};

fn mixed_request(i: usize) -> Request {
    let ticker = SUPPORTED_TICKERS[i % SUPPORTED_TICKERS.len()];
    match i % 4 {
        0 => Request::new(
            ExposureRequest::new(ticker, OptionKind::Both, Greek::Gamma, None).unwrap(),
        ),
        1 => Request::new(TrendRequest::new(ticker, Greek::Delta).unwrap()),
        2 => Request::new(ParadigmRequest::new(ticker).unwrap()),
        _ => Request::new(ZeroDteRequest::new(ticker).unwrap()),
    }
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_drain");
    for depth in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter_batched(
                || {
                    let queue = PendingQueue::new();
                    for i in 0..depth {
                        queue.enqueue(mixed_request(i));
                    }
                    queue
                },
                |queue| {
                    for kind in RequestKind::ALL {
                        black_box(queue.drain(kind, 20));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_package(c: &mut Criterion) {
    let requests: Vec<Request> = (0..20).map(mixed_request).collect();
    c.bench_function("package_to_bytes_20", |b| {
        b.iter(|| black_box(RequestPackage::from_requests(&requests).to_bytes().unwrap()))
    });
}

criterion_group!(benches, bench_drain, bench_package);
criterion_main!(benches);
