#![allow(dead_code)]

use boxlabel::model::{Annotation, AnnotationSet};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use serde_json::{Map, Number, Value};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Any finite coordinate, weighted towards the normalized range but also
/// covering off-image boxes and awkward magnitudes.
pub fn arb_coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        6 => 0.0f64..=1.0,
        2 => -10.0f64..10.0,
        1 => prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO,
    ]
}

pub fn arb_annotation() -> impl Strategy<Value = Annotation> {
    (
        any::<u32>(),
        arb_coord(),
        arb_coord(),
        arb_coord(),
        arb_coord(),
    )
        .prop_map(|(class_id, x, y, w, h)| Annotation::new(class_id, x, y, w, h))
}

pub fn arb_annotation_set(max_len: usize) -> impl Strategy<Value = AnnotationSet> {
    prop::collection::vec(arb_annotation(), 0..=max_len).prop_map(AnnotationSet::from)
}

/// Arbitrary JSON documents with bounded depth and size.
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1.0e12f64..1.0e12).prop_filter_map("finite", |f| Number::from_f64(f).map(Value::Number)),
        ".{0,12}".prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z_]{1,8}", inner), 0..6).prop_map(|entries| {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}
