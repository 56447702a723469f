//! End-to-end behaviour of plans: block metadata, series windows, rollout
//! labels, sink failures and cancellation.

use blockgen_core::block::{BlockMeta, Compaction, Downsample, ThanosMeta};
use blockgen_core::{
    generate, BlockSpec, CancellationToken, Characteristics, ContinuousAppMetric, GenType,
    GenerateError, K8sAppMetric, Labels, Meta, Plan, Profile, SeriesSpec, SeriesSpecFn,
};
use std::cell::Cell;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(3600);

fn expected_meta(min_time: i64, max_time: i64, external: &Labels) -> Meta {
    Meta {
        block: BlockMeta {
            min_time,
            max_time,
            compaction: Compaction { level: 1 },
            version: 1,
        },
        thanos: ThanosMeta {
            labels: external.to_map(),
            downsample: Downsample { resolution: 0 },
            source: "blockgen".into(),
        },
    }
}

fn app_characteristics() -> Characteristics {
    Characteristics {
        max: 200_000_000.0,
        min: 10_000_000.0,
        jitter: 30_000_000.0,
        scrape_interval: Duration::from_secs(15),
        change_interval: HOUR,
    }
}

fn custom_characteristics() -> Characteristics {
    Characteristics {
        max: 1.0,
        min: 1.0,
        jitter: 3.0,
        scrape_interval: Duration::from_secs(15),
        change_interval: HOUR,
    }
}

fn collect(plan: &Plan, series_fn: &dyn SeriesSpecFn, external: &Labels) -> Vec<BlockSpec> {
    let mut blocks = Vec::new();
    plan.generate(series_fn, &CancellationToken::new(), external, |b| {
        blocks.push(b);
        Ok(())
    })
    .expect("generation failed");
    blocks
}

fn spec(
    gen_type: GenType,
    characteristics: Characteristics,
    labels: Labels,
    min_time: i64,
    max_time: i64,
) -> SeriesSpec {
    SeriesSpec {
        targets: 1,
        gen_type,
        characteristics,
        labels,
        min_time,
        max_time,
    }
}

#[test]
fn continuous_with_builtin_app_metric() {
    let external = Labels::new();
    let blocks = collect(
        &Plan::continuous(vec![2 * HOUR], 1, 1),
        &ContinuousAppMetric,
        &external,
    );

    let expected = BlockSpec {
        meta: expected_meta(1, 7_200_000, &external),
        series: vec![spec(
            GenType::Gauge,
            app_characteristics(),
            Labels::from_pairs([("__name__", "continuous_app_metric0")]),
            1,
            7_200_000,
        )],
    };
    assert_eq!(blocks, vec![expected]);
}

#[test]
fn continuous_with_custom_factory() {
    let external = Labels::new();
    let custom = |targets: usize, index: usize, _rollout: &str| SeriesSpec {
        targets,
        gen_type: GenType::Counter,
        characteristics: custom_characteristics(),
        labels: Labels::from_pairs([("__name__", format!("custom-{index}"))]),
        min_time: 0,
        max_time: 0,
    };
    let blocks = collect(&Plan::continuous(vec![2 * HOUR], 1, 1), &custom, &external);

    let expected = BlockSpec {
        meta: expected_meta(1, 7_200_000, &external),
        series: vec![spec(
            GenType::Counter,
            custom_characteristics(),
            Labels::from_pairs([("__name__", "custom-0")]),
            1,
            7_200_000,
        )],
    };
    assert_eq!(blocks, vec![expected]);
}

#[test]
fn realistic_k8s_with_builtin_app_metric() {
    let external = Labels::new();
    let blocks = collect(
        &Plan::realistic_k8s(vec![2 * HOUR], HOUR, 1, 1),
        &K8sAppMetric,
        &external,
    );

    let series = |min_time, max_time, rollout: &str| {
        spec(
            GenType::Gauge,
            app_characteristics(),
            Labels::from_pairs([
                ("__name__", "k8s_app_metric0"),
                ("next_rollout_time", rollout),
            ]),
            min_time,
            max_time,
        )
    };
    let expected = BlockSpec {
        meta: expected_meta(1, 7_200_000, &external),
        series: vec![
            series(5_400_000, 7_200_000, "1970-01-01 01:30:00 +0000 UTC"),
            series(1_800_000, 5_400_000, "1970-01-01 00:30:00 +0000 UTC"),
            series(1, 1_800_000, "1969-12-31 23:30:00 +0000 UTC"),
        ],
    };
    assert_eq!(blocks, vec![expected]);
}

#[test]
fn realistic_k8s_with_custom_factory() {
    let external = Labels::new();
    let custom = |targets: usize, index: usize, rollout: &str| SeriesSpec {
        targets,
        gen_type: GenType::Counter,
        characteristics: custom_characteristics(),
        labels: Labels::from_pairs([
            ("__name__".to_string(), format!("custom-{index}")),
            ("rollout_time".to_string(), rollout.to_string()),
        ]),
        min_time: 0,
        max_time: 0,
    };
    let blocks = collect(
        &Plan::realistic_k8s(vec![2 * HOUR], HOUR, 1, 1),
        &custom,
        &external,
    );

    let windows: Vec<(i64, i64, String)> = blocks[0]
        .series
        .iter()
        .map(|s| {
            (
                s.min_time,
                s.max_time,
                s.labels.get("rollout_time").unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        windows,
        vec![
            (5_400_000, 7_200_000, "1970-01-01 01:30:00 +0000 UTC".into()),
            (1_800_000, 5_400_000, "1970-01-01 00:30:00 +0000 UTC".into()),
            (1, 1_800_000, "1969-12-31 23:30:00 +0000 UTC".into()),
        ]
    );
    assert!(blocks[0]
        .series
        .iter()
        .all(|s| s.gen_type == GenType::Counter && s.labels.get("__name__") == Some("custom-0")));
}

#[test]
fn profile_driven_generation() {
    let profile = Profile::from_yaml(
        r#"
ranges: [2, 4]
rolloutInterval: 0
targets: 2
metricsPerTarget: 3
specification:
  type: COUNTER
  labels:
    __name__: http_requests_total
    pod: "web-{{ .index }}"
    broken: "{{ .nope }}"
"#,
    )
    .unwrap();
    let external = Labels::from_pairs([("cluster", "bench")]);
    let blocks = collect(&profile.plan(), &profile.series_spec(), &external);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].range().min_time, 1);
    assert_eq!(blocks[0].range().max_time, 7_200_000);
    assert_eq!(blocks[1].range().min_time, 7_200_001);
    assert_eq!(blocks[1].range().max_time, 21_600_000);
    assert_eq!(
        blocks[1].meta.thanos.labels.get("cluster").map(String::as_str),
        Some("bench")
    );

    let pods: Vec<&str> = blocks[0]
        .series
        .iter()
        .map(|s| s.labels.get("pod").unwrap())
        .collect();
    assert_eq!(pods, vec!["web-0", "web-1"]);
    for s in &blocks[0].series {
        assert_eq!(s.targets, 2);
        assert_eq!(s.labels.get("broken"), Some("{{ .nope }}"));
        let names: Vec<&str> = s.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["__name__", "pod", "broken"]);
    }
}

#[test]
fn empty_ranges_emit_nothing() {
    let calls = Cell::new(0);
    generate(
        vec![],
        HOUR,
        3,
        1,
        &ContinuousAppMetric,
        &CancellationToken::new(),
        &Labels::new(),
        |_| {
            calls.set(calls.get() + 1);
            Ok(())
        },
    )
    .unwrap();
    assert_eq!(calls.get(), 0);
}

#[test]
fn sink_error_stops_generation() {
    let factory_calls = Cell::new(0);
    let counting = |targets: usize, index: usize, rollout: &str| {
        factory_calls.set(factory_calls.get() + 1);
        ContinuousAppMetric.generate(targets, index, rollout)
    };
    let sink_calls = Cell::new(0);

    let err = Plan::continuous(vec![2 * HOUR, 2 * HOUR, 2 * HOUR], 1, 1)
        .generate(&counting, &CancellationToken::new(), &Labels::new(), |_| {
            sink_calls.set(sink_calls.get() + 1);
            Err(anyhow::anyhow!("disk full"))
        })
        .unwrap_err();

    assert_eq!(sink_calls.get(), 1);
    assert_eq!(factory_calls.get(), 1, "later ranges must not be computed");
    assert!(!err.is_cancelled());
    assert_eq!(err.sink_error().unwrap().to_string(), "disk full");
    assert_eq!(err.to_string(), "disk full");
}

#[test]
fn cancellation_is_checked_between_blocks() {
    let cancel = CancellationToken::new();
    let mut seen = Vec::new();

    let err = Plan::realistic_k8s(vec![2 * HOUR, 2 * HOUR, 2 * HOUR], HOUR, 2, 1)
        .generate(&K8sAppMetric, &cancel, &Labels::new(), |b| {
            seen.push(b.series.len());
            cancel.cancel();
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, GenerateError::Cancelled));
    // The first block is complete; no partial block is ever emitted.
    assert_eq!(seen, vec![6]);
}

#[test]
fn cancelled_before_start_emits_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = Plan::continuous(vec![HOUR], 1, 1)
        .generate(&ContinuousAppMetric, &cancel, &Labels::new(), |_| {
            panic!("sink must not be called")
        })
        .unwrap_err();
    assert!(err.is_cancelled());
}
