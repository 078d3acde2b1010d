use criterion::{black_box, criterion_group, criterion_main, Criterion};
use authority_core::{expand, AccessControl, AccessControlId, InMemoryAccessControlStore};

// Ten roles, each inheriting the next and owning twenty permissions.
fn layered_store() -> InMemoryAccessControlStore {
    let mut store = InMemoryAccessControlStore::new();
    for role in 0..10 {
        let mut children: Vec<String> = (0..20).map(|p| format!("perm-{}-{}", role, p)).collect();
        if role < 9 {
            children.push(format!("role-{}", role + 1));
        }
        for p in 0..20 {
            store.insert(AccessControl::permission(format!("perm-{}-{}", role, p)));
        }
        store.insert(AccessControl::group(format!("role-{}", role), children));
    }
    store
}

fn expand_benchmarks(c: &mut Criterion) {
    let store = layered_store();

    c.bench_function("expand_layered_roles", |b| {
        b.iter(|| expand(&store, black_box(vec![AccessControlId::from("role-0")])))
    });

    c.bench_function("expand_dangling_root", |b| {
        b.iter(|| expand(&store, black_box(vec![AccessControlId::from("missing")])))
    });
}

criterion_group!(benches, expand_benchmarks);
criterion_main!(benches);
