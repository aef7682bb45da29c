use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyglot_host::host::{FieldSpec, HostClass, HostType, HostValue};
use polyglot_host::{DeploymentMode, FieldDescriptor};

fn sample() -> (Arc<HostClass>, HostValue) {
    let class = HostClass::builder("Particle")
        .field(FieldSpec::new("x", HostType::Double).public())
        .field(FieldSpec::new("COUNT", HostType::Int).public().as_static())
        .build();
    let obj = HostValue::Object(class.instantiate());
    (class, obj)
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for mode in [DeploymentMode::Aot, DeploymentMode::Jit] {
        let (class, obj) = sample();
        let desc = FieldDescriptor::unreflect_with(Arc::clone(class.field("x").unwrap()), mode);
        group.bench_with_input(BenchmarkId::new("instance", mode), &obj, |b, obj| {
            b.iter(|| desc.get(black_box(obj)));
        });

        let desc = FieldDescriptor::unreflect_with(Arc::clone(class.field("COUNT").unwrap()), mode);
        group.bench_with_input(BenchmarkId::new("static", mode), &obj, |b, obj| {
            b.iter(|| desc.get(black_box(obj)));
        });
    }

    group.finish();
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");

    for mode in [DeploymentMode::Aot, DeploymentMode::Jit] {
        let (class, obj) = sample();
        let desc = FieldDescriptor::unreflect_with(Arc::clone(class.field("x").unwrap()), mode);
        group.bench_with_input(BenchmarkId::new("instance", mode), &obj, |b, obj| {
            b.iter(|| desc.set(black_box(obj), HostValue::Double(1.0)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("mismatch", mode), &obj, |b, obj| {
            b.iter(|| desc.set(black_box(obj), HostValue::Bool(true)).unwrap_err());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get, bench_set);
criterion_main!(benches);
