use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scim_gate::config::{Action, RuleConfig, TransformConfig};
use scim_gate::matcher::{ParsedPath, RuleSet};
use scim_gate::transform::apply_transforms;

fn create_test_rule(id: usize) -> RuleConfig {
    RuleConfig {
        resource: format!("/Resource{id}"),
        methods: vec!["POST".to_string(), "PUT".to_string()],
        action: Action::Silent,
    }
}

fn compile_rules(count: usize) -> RuleSet {
    let rules: Vec<RuleConfig> = (0..count).map(create_test_rule).collect();
    RuleSet::compile(&rules)
}

fn bench_rule_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_matching");

    for rule_count in [10, 50, 100, 500].iter() {
        let rules = compile_rules(*rule_count);
        group.throughput(Throughput::Elements(1));

        // Best case
        group.bench_with_input(
            BenchmarkId::new("match_first", rule_count),
            rule_count,
            |b, _| b.iter(|| rules.find(black_box("/Resource0"), black_box("post"))),
        );

        let last = format!("/Resource{}", rule_count - 1);
        group.bench_with_input(
            BenchmarkId::new("match_last", rule_count),
            rule_count,
            |b, _| b.iter(|| rules.find(black_box(&last), black_box("PUT"))),
        );

        // Scans every rule
        group.bench_with_input(
            BenchmarkId::new("match_none", rule_count),
            rule_count,
            |b, _| b.iter(|| rules.find(black_box("/Users"), black_box("GET"))),
        );
    }

    group.finish();
}

fn bench_path_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_parsing");
    group.throughput(Throughput::Elements(1));

    group.bench_function("collection", |b| {
        b.iter(|| ParsedPath::parse(black_box("/scim/v2/Users"), black_box(Some("/scim/v2"))))
    });
    group.bench_function("singleton", |b| {
        b.iter(|| {
            ParsedPath::parse(
                black_box("/scim/v2/Users/2819c223-7f76-453a-919d-413861904646"),
                black_box(Some("/scim/v2")),
            )
        })
    });
    group.bench_function("outside_base_path", |b| {
        b.iter(|| ParsedPath::parse(black_box("/health"), black_box(Some("/scim/v2"))))
    });

    group.finish();
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    let config = TransformConfig {
        inject_email_type: Some("work".to_string()),
    };

    let missing = bytes::Bytes::from_static(
        br#"{"userName":"bjensen","emails":[{"value":"bjensen@example.com","primary":true}]}"#,
    );
    let present = bytes::Bytes::from_static(
        br#"{"userName":"bjensen","emails":[{"value":"bjensen@example.com","type":"home"}]}"#,
    );

    group.bench_function("inject", |b| {
        b.iter(|| apply_transforms(black_box(&missing), black_box(&config)))
    });
    group.bench_function("already_set", |b| {
        b.iter(|| apply_transforms(black_box(&present), black_box(&config)))
    });

    group.finish();
}

criterion_group!(benches, bench_rule_matching, bench_path_parsing, bench_transforms);
criterion_main!(benches);
