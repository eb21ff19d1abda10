#![allow(missing_docs)]

use hkt_container::{
    Container,
    ContainerBuilder,
    TypeParameters,
    definition::{Arguments, ObjectDefinition},
    helpers::{factory, get, value},
    source::RegistryAutowiring,
};

use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};

fn container() -> Container {
    let registry = RegistryAutowiring::new().with(ObjectDefinition::new("Repository")
        .with_constructor(|args: Arguments| Ok(args.type_parameters().to_string())));

    ContainerBuilder::new()
        .add_definitions([("port", value(8080u16))])
        .add_definitions([("http.port", get("port"))])
        .with_autowiring(registry)
        .build()
}

fn benchmark(c: &mut Criterion) {
    let cached = container();
    cached.get("http.port").unwrap();

    c.bench_function("cached", |b| b.iter(
        || cached.get(black_box("http.port")).unwrap()
    ));
    c.bench_function("reference", |b| b.iter(|| {
        let container = container();
        container.get(black_box("http.port")).unwrap()
    }));
    c.bench_function("make", |b| {
        let container = container();
        container.set("counter", factory(|| 1u64));
        b.iter(|| container.make(black_box("counter"), Default::default()).unwrap())
    });
    c.bench_function("generic", |b| {
        let params = [TypeParameters::new(["User"]), TypeParameters::new(["Order"])];
        b.iter(|| {
            let container = container();
            for params in &params {
                container.get_generic(black_box("Repository"), params).unwrap();
            }
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
