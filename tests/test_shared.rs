use behaviorable::{Composable, DynamicBehavior, SharedComposable};
use serde_json::{Value as JsonValue, json};
use std::thread;

fn counter() -> DynamicBehavior {
    DynamicBehavior::builder()
        .property("count", json!(0))
        .method("increment", |props, _args| {
            let next = props.value("count").and_then(JsonValue::as_i64).unwrap_or(0) + 1;
            props.set_value("count", json!(next));
            Ok(json!(next))
        })
        .build()
}

#[test]
fn test_concurrent_calls_are_serialized() {
    let shared = SharedComposable::new(Composable::new("Counter"));
    shared.attach_behavior("counter", counter()).unwrap();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    shared.call("increment", &[]).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(shared.get("count").unwrap(), json!(800));
}

#[test]
fn test_attach_and_detach_across_threads() {
    let shared = SharedComposable::new(Composable::new("Registry"));

    let workers: Vec<_> = (0..4)
        .map(|index| {
            let shared = shared.clone();
            thread::spawn(move || {
                let name = format!("behavior_{}", index);
                let property = format!("value_{}", index);
                shared
                    .attach_behavior(
                        name.as_str(),
                        DynamicBehavior::builder()
                            .property(property.as_str(), json!(index))
                            .build(),
                    )
                    .unwrap();
                assert_eq!(shared.get(&property).unwrap(), json!(index));
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(shared.with(|composable| composable.behavior_count()), 4);

    assert!(shared.detach_behavior("behavior_2").is_some());
    assert!(!shared.has("value_2"));
    assert!(shared.has("value_3"));
}

#[test]
fn test_lock_for_sequence_of_operations() {
    let shared = SharedComposable::new(Composable::new("Counter"));
    shared.attach_behavior("counter", counter()).unwrap();

    {
        let mut composable = shared.lock();
        composable.call("increment", &[]).unwrap();
        composable.set("count", json!(10)).unwrap();
    }

    assert_eq!(shared.call("increment", &[]).unwrap(), json!(11));
    shared.unset("count").unwrap();
    assert!(!shared.has("count"));
}
