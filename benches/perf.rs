use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use vi::methods::transform_buffer as vi_transform_buffer;
use vikey::{Engine, InputMethod, Shortcut};

const TELEX_CASES: &[(&str, &str)] = &[
    ("simple", "phoos"),
    ("sentence", "Tooi ddang gox Tieengs Vieejt "),
    ("mixed", "clear free pro "),
    ("uow", "huows"),
    ("cluster", "nghees"),
    ("deferred", "trawng dduowcj "),
];

const VNI_CASES: &[(&str, &str)] = &[
    ("simple", "pho61"),
    ("sentence", "To6i d9ang go4 Tie6ng1 Vie6t5 "),
    ("mixed", "clear free pro "),
    ("uow_like", "huo71"),
    ("cluster", "nghe61"),
];

fn type_seq(engine: &mut Engine, seq: &str) {
    engine.clear_all();
    for c in seq.chars() {
        black_box(engine.feed(c));
    }
}

fn type_seq_vi(def: &vi::Definition, out: &mut String, seq: &str) {
    out.clear();
    vi_transform_buffer(def, seq.chars(), out);
    black_box(&out);
}

fn engine(method: InputMethod) -> Engine {
    let mut e = Engine::new();
    e.set_input_method(method);
    e
}

fn bench_vikey_telex(c: &mut Criterion) {
    let mut group = c.benchmark_group("vikey_telex");
    for (name, seq) in TELEX_CASES {
        group.bench_with_input(BenchmarkId::from_parameter(*name), seq, |b, input| {
            let mut e = engine(InputMethod::Telex);
            b.iter(|| type_seq(&mut e, input))
        });
    }
    group.finish();
}

fn bench_vikey_vni(c: &mut Criterion) {
    let mut group = c.benchmark_group("vikey_vni");
    for (name, seq) in VNI_CASES {
        group.bench_with_input(BenchmarkId::from_parameter(*name), seq, |b, input| {
            let mut e = engine(InputMethod::Vni);
            b.iter(|| type_seq(&mut e, input))
        });
    }
    group.finish();
}

/// Boundary work: restore checks and shortcut lookups on every word.
fn bench_boundaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("vikey_boundaries");
    let cases: &[(&str, &str)] = &[
        ("restore", "tesst dausdu class "),
        ("shortcut", "vn hn ko vn "),
        ("english", "test window file "),
    ];
    for (name, seq) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(*name), seq, |b, input| {
            let mut e = engine(InputMethod::Telex);
            e.set_english_auto_restore(true);
            e.add_shortcut(Shortcut::new("vn", "Việt Nam"));
            e.add_shortcut(Shortcut::new("hn", "Hà Nội"));
            e.add_shortcut(Shortcut::new("ko", "không"));
            b.iter(|| type_seq(&mut e, input))
        });
    }
    group.finish();
}

fn bench_compare_telex(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_telex");
    for (name, seq) in TELEX_CASES {
        group.bench_with_input(BenchmarkId::new("vikey", *name), seq, |b, input| {
            let mut e = engine(InputMethod::Telex);
            b.iter(|| type_seq(&mut e, input))
        });
        group.bench_with_input(BenchmarkId::new("vi", *name), seq, |b, input| {
            let mut out = String::new();
            b.iter(|| type_seq_vi(&vi::TELEX, &mut out, input))
        });
    }
    group.finish();
}

fn bench_compare_vni(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_vni");
    for (name, seq) in VNI_CASES {
        group.bench_with_input(BenchmarkId::new("vikey", *name), seq, |b, input| {
            let mut e = engine(InputMethod::Vni);
            b.iter(|| type_seq(&mut e, input))
        });
        group.bench_with_input(BenchmarkId::new("vi", *name), seq, |b, input| {
            let mut out = String::new();
            b.iter(|| type_seq_vi(&vi::VNI, &mut out, input))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_vikey_telex,
    bench_vikey_vni,
    bench_boundaries,
    bench_compare_telex,
    bench_compare_vni
);
criterion_main!(benches);
