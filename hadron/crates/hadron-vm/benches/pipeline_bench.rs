//! Pipeline Benchmarks
//!
//! Run with: `cargo bench --package hadron-vm`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hadron_par::compile_source;
use hadron_util::Limits;
use hadron_vm::Vm;

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("vm_execute");
    let limits = Limits::default();

    let source = "(1 + 2) * 3 - 4 / 5 ** 2 % 7 + (0xFF & 0b1010 | 3 << 2);";
    let Ok(chunk) = compile_source(source, &limits) else {
        return;
    };
    group.throughput(Throughput::Bytes(chunk.len() as u64));

    group.bench_function("arithmetic", |b| {
        let mut vm = Vm::new(&limits);
        b.iter(|| vm.execute(black_box(&chunk)).ok())
    });

    group.finish();
}

fn bench_compile_and_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let limits = Limits::default();

    let source = "int x = (1 + 2) * 3 ** 2 - 0x10 / 4 >= 10 && 7 % 3 == 1";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("compile_and_run", |b| {
        let mut vm = Vm::new(&limits);
        b.iter(|| {
            compile_source(black_box(source), &limits)
                .ok()
                .and_then(|chunk| vm.execute(&chunk).ok())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_execute, bench_compile_and_run);
criterion_main!(benches);
