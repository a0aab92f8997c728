use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use restock_core::{ItemId, StoreId};
use restock_inventory::{
    InventoryItem, InventoryStore, NewInventoryItem, SyntheticInventory, group_and_filter,
    lookup_by_id,
};

/// Synthetic inventory repeated with fresh ids until it holds `size` items.
fn inventory(size: usize) -> Vec<InventoryItem> {
    let base = SyntheticInventory::new(StoreId::new("S001").unwrap())
        .with_seed(7)
        .generate()
        .unwrap();

    base.iter()
        .cycle()
        .take(size)
        .enumerate()
        .map(|(n, item)| {
            let mut raw = NewInventoryItem::from(item.clone());
            raw.id = ItemId::new(format!("P{}", 1000 + n)).unwrap();
            InventoryItem::try_from(raw).unwrap()
        })
        .collect()
}

fn bench_lookup_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_by_id");
    for size in [50usize, 1_000, 10_000] {
        let items = inventory(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| black_box(lookup_by_id(black_box(items)).len()));
        });
    }
    group.finish();
}

fn bench_group_and_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_and_filter");
    let items = inventory(10_000);
    group.throughput(Throughput::Elements(items.len() as u64));

    for term in ["", "toys", "sweater", "no such item"] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{term:?}")), term, |b, term| {
            b.iter(|| black_box(group_and_filter(black_box(&items), term).len()));
        });
    }
    group.finish();
}

fn bench_store_replace(c: &mut Criterion) {
    let items = inventory(10_000);
    c.bench_function("inventory_store_replace_10k", |b| {
        let mut store = InventoryStore::default();
        b.iter(|| black_box(store.replace(items.clone()).len()));
    });
}

criterion_group!(benches, bench_lookup_build, bench_group_and_filter, bench_store_replace);
criterion_main!(benches);
