//! # PharmaChain Ledger Benchmarks
//!
//! | Area | Operation | Expectation |
//! |------|-----------|-------------|
//! | Engine | create / transfer | constant time per call |
//! | Engine | owners page | independent of history length |
//! | Dispatcher | JSON decode + execute | dominated by decoding |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pc_custody::requests::execute;
use pc_custody::{CustodyApi, LedgerCommand, LedgerRequest, NewBatch, PageRequest};
use pc_tests::fixtures::{ledger_with_batch, staffed_ledger};
use shared_types::{AuthenticatedRequest, BatchStatus};

// ============================================================================
// ENGINE
// ============================================================================

fn bench_create_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine-create");

    for size in [100u64, 1_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("create_batches", size), &size, |b, &n| {
            b.iter(|| {
                let (mut ledger, cast) = staffed_ledger();
                for i in 0..n {
                    let id = ledger
                        .create_batch(
                            cast.manufacturer,
                            NewBatch::new("Amoxicillin-500", format!("B{i}"), ""),
                        )
                        .unwrap();
                    black_box(id);
                }
            })
        });
    }

    group.finish();
}

fn bench_transfer_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine-transfer");

    for hops in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(hops as u64));
        group.bench_with_input(BenchmarkId::new("transfer_hops", hops), &hops, |b, &n| {
            b.iter(|| {
                let (mut ledger, cast, id) = ledger_with_batch();
                for i in 0..n {
                    let to = if i % 2 == 0 { cast.distributor } else { cast.pharmacy };
                    ledger
                        .transfer_batch(cast.transporter, id, to, BatchStatus::InTransit)
                        .unwrap();
                }
                black_box(ledger.last_sequence())
            })
        });
    }

    group.finish();
}

fn bench_owner_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine-pages");

    for history in [100usize, 10_000] {
        let (mut ledger, cast, id) = ledger_with_batch();
        for i in 0..history {
            let to = if i % 2 == 0 { cast.distributor } else { cast.pharmacy };
            ledger
                .transfer_batch(cast.transporter, id, to, BatchStatus::InTransit)
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("owners_page_tail", history), &history, |b, &h| {
            b.iter(|| {
                let page = ledger
                    .owners_page(id, PageRequest::new(h.saturating_sub(20), 20))
                    .unwrap();
                black_box(page.items.len())
            })
        });
    }

    group.finish();
}

// ============================================================================
// DISPATCHER
// ============================================================================

fn bench_decode_and_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatcher");

    let (_, cast) = staffed_ledger();
    let line = serde_json::to_string(&AuthenticatedRequest::new(
        cast.manufacturer,
        LedgerRequest::Command(LedgerCommand::CreateBatch {
            name: "Amoxicillin-500".into(),
            batch_number: "B100".into(),
            metadata_uri: "ipfs://amoxicillin-b100".into(),
        }),
    ))
    .unwrap();

    group.bench_function("decode_envelope", |b| {
        b.iter(|| {
            let envelope: AuthenticatedRequest<LedgerRequest> =
                serde_json::from_str(black_box(&line)).unwrap();
            black_box(envelope)
        })
    });

    group.bench_function("decode_and_execute", |b| {
        let (mut ledger, _) = staffed_ledger();
        b.iter(|| {
            let envelope: AuthenticatedRequest<LedgerRequest> =
                serde_json::from_str(black_box(&line)).unwrap();
            if let LedgerRequest::Command(command) = envelope.payload {
                black_box(execute(&mut ledger, envelope.actor, command).is_ok());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_create_batch,
    bench_transfer_chain,
    bench_owner_pages,
    bench_decode_and_execute
);
criterion_main!(benches);
