use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rbt_leaderboard::{Leaderboard, RBTree};
use std::collections::BTreeMap;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Key sequences ──────────────────────────────────────────────────────────

fn random_keys(n: usize) -> Vec<i64> {
    // LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        // Folding into a small range produces duplicate keys.
        keys.push((x >> 33) as i64 % 2_000);
    }
    keys
}

// ─── Counted BTreeMap multiset for comparison ───────────────────────────────

#[derive(Default)]
struct CountedMultiset(BTreeMap<i64, usize>);

impl CountedMultiset {
    fn insert(&mut self, key: i64) {
        *self.0.entry(key).or_insert(0) += 1;
    }

    fn remove(&mut self, key: i64) -> bool {
        match self.0.get_mut(&key) {
            Some(1) => {
                self.0.remove(&key);
                true
            }
            Some(count) => {
                *count -= 1;
                true
            }
            None => false,
        }
    }

    fn count_greater(&self, key: i64) -> usize {
        self.0.range(key + 1..).map(|(_, count)| count).sum()
    }
}

// ─── Tree benchmarks ────────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_ordered");

    group.bench_function(BenchmarkId::new("RBTree", N), |b| {
        b.iter(|| {
            let mut tree = RBTree::new();
            for i in 0..N as i64 {
                tree.insert(i);
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut set = CountedMultiset::default();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("insert_random");

    group.bench_function(BenchmarkId::new("RBTree", N), |b| {
        b.iter(|| {
            let mut tree = RBTree::with_capacity(N);
            for &k in &keys {
                tree.insert(k);
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut set = CountedMultiset::default();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RBTree = keys.iter().copied().collect();
    let mut counted = CountedMultiset::default();
    for &k in &keys {
        counted.insert(k);
    }
    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("RBTree", N), |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for &k in &keys {
                    black_box(tree.remove(&k));
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || CountedMultiset(counted.0.clone()),
            |mut set| {
                for &k in &keys {
                    black_box(set.remove(k));
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_count_greater(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: RBTree = keys.iter().copied().collect();
    let mut counted = CountedMultiset::default();
    for &k in &keys {
        counted.insert(k);
    }
    let mut group = c.benchmark_group("count_greater");

    group.bench_function(BenchmarkId::new("RBTree", N), |b| {
        b.iter(|| keys.iter().map(|k| tree.count_greater(k)).sum::<usize>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| keys.iter().map(|&k| counted.count_greater(k)).sum::<usize>());
    });

    group.finish();
}

// ─── Leaderboard benchmarks ─────────────────────────────────────────────────

fn bench_leaderboard_updates(c: &mut Criterion) {
    let keys = random_keys(N);
    let names: Vec<String> = (0..500).map(|i| format!("player{i}")).collect();
    let mut group = c.benchmark_group("leaderboard_updates");

    group.bench_function(BenchmarkId::new("add_or_update+rank_of", N), |b| {
        b.iter(|| {
            let mut board = Leaderboard::new();
            for (i, &score) in keys.iter().enumerate() {
                let name = &names[i % names.len()];
                board.add_or_update(name, score);
                black_box(board.rank_of(name));
            }
            board
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_random,
    bench_remove_random,
    bench_count_greater,
    bench_leaderboard_updates,
);
criterion_main!(benches);
