use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use anvil_di::{Argument, Compiler, DefinitionStore, ReferenceGraph};

/// A public head referencing a chain of private, singly-referenced services.
/// Every link is inlinable, so this exercises the worst case for repeated
/// sweeps: each prune strands the next link.
fn chain_store(len: usize) -> DefinitionStore {
    let mut store = DefinitionStore::new();
    store
        .register("head", "App\\Head")
        .borrow_mut()
        .add_argument(Argument::reference("link0"));
    for index in 0..len {
        let handle = store.register(format!("link{}", index), format!("App\\Link{}", index));
        let mut definition = handle.borrow_mut();
        definition.set_public(false);
        if index + 1 < len {
            definition.add_argument(Argument::reference(format!("link{}", index + 1)));
        }
    }
    store
}

/// Many public services fanning into one shared private hub: nothing is
/// inlinable or prunable, so compilation must settle in one sweep.
fn fan_store(width: usize) -> DefinitionStore {
    let mut store = DefinitionStore::new();
    store
        .register("hub", "App\\Hub")
        .borrow_mut()
        .set_public(false);
    for index in 0..width {
        store
            .register(format!("spoke{}", index), format!("App\\Spoke{}", index))
            .borrow_mut()
            .add_argument(Argument::reference("hub"));
    }
    store
}

fn bench_graph_build(c: &mut Criterion) {
    let store = fan_store(100);

    c.bench_function("graph_build_fan_100", |b| {
        b.iter(|| {
            let graph = ReferenceGraph::build(&store);
            black_box(graph.edges().len());
        })
    });
}

fn bench_compile_chain(c: &mut Criterion) {
    c.bench_function("compile_chain_20", |b| {
        b.iter_batched(
            || chain_store(20),
            |mut store| {
                Compiler::with_optimizations()
                    .compile(&mut store)
                    .unwrap();
                black_box(store.definition_count());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_compile_fan(c: &mut Criterion) {
    c.bench_function("compile_fan_100", |b| {
        b.iter_batched(
            || fan_store(100),
            |mut store| {
                Compiler::with_optimizations()
                    .compile(&mut store)
                    .unwrap();
                black_box(store.definition_count());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_graph_build,
    bench_compile_chain,
    bench_compile_fan
);
criterion_main!(benches);
