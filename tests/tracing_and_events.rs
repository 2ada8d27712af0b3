//! Integration tests for tracing and event monitoring.
//!
//! The trace callback sees every registry operation, which is useful for debugging
//! and logging which constructors actually ran.

use instance_registry::{define_registry, RegistryEvent};
use std::sync::{Arc, Mutex};

fn collect_into(events: &Arc<Mutex<Vec<String>>>) -> impl Fn(&RegistryEvent) + Send + Sync + 'static {
    let events = events.clone();
    move |event| events.lock().unwrap().push(event.to_string())
}

#[test]
fn test_basic_tracing() {
    define_registry!(traced1);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced1::set_trace_callback(collect_into(&events));

    traced1::get_or_create(|| 42i32).unwrap();
    traced1::get_or_create(|| 0i32).unwrap();
    let _: Arc<i32> = traced1::get().unwrap();
    let _ = traced1::contains::<i32>();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "construct { type_name: i32 }",
            "reuse { type_name: i32 }",
            "get { type_name: i32, found: true }",
            "contains { type_name: i32, found: true }",
        ]
    );
}

#[test]
fn test_trace_get_found_and_not_found() {
    define_registry!(traced2);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced2::set_trace_callback(collect_into(&events));

    traced2::get_or_create(|| 123i64).unwrap();
    let _: Arc<i64> = traced2::get().unwrap();
    let _: Result<Arc<f32>, _> = traced2::get();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert!(captured[1].contains("found: true"));
    assert!(captured[2].contains("found: false"));

    traced2::clear_trace_callback();
}

#[test]
fn test_trace_failed_then_successful_construction() {
    define_registry!(traced3);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced3::set_trace_callback(collect_into(&events));

    let _ = traced3::try_get_or_create::<u32, _, _>(|| Err("not yet"));
    traced3::try_get_or_create(|| Ok::<_, std::io::Error>(1u32)).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "construct_failed { type_name: u32 }",
            "construct { type_name: u32 }",
        ]
    );
}

#[test]
fn test_register_emits_construct_or_reuse() {
    define_registry!(traced4);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced4::set_trace_callback(collect_into(&events));

    traced4::register("first".to_string()).unwrap();
    traced4::register("second".to_string()).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert!(captured[0].starts_with("construct"));
    assert!(captured[1].starts_with("reuse"));
}

#[test]
fn test_clear_trace_callback() {
    define_registry!(traced5);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced5::set_trace_callback(collect_into(&events));

    traced5::get_or_create(|| 1u8).unwrap();
    traced5::clear_trace_callback();

    traced5::get_or_create(|| 2u8).unwrap();
    let _: Arc<u8> = traced5::get().unwrap();

    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_trace_callback_with_custom_logic() {
    define_registry!(traced6);

    // Count constructions and reuses separately
    let constructs = Arc::new(Mutex::new(0));
    let reuses = Arc::new(Mutex::new(0));

    let constructs_clone = constructs.clone();
    let reuses_clone = reuses.clone();

    traced6::set_trace_callback(move |event| match event {
        RegistryEvent::Construct { .. } => *constructs_clone.lock().unwrap() += 1,
        RegistryEvent::Reuse { .. } => *reuses_clone.lock().unwrap() += 1,
        _ => {}
    });

    for _ in 0..4 {
        traced6::get_or_create(|| "cached".to_string()).unwrap();
    }
    traced6::get_or_create(|| 0usize).unwrap();

    assert_eq!(*constructs.lock().unwrap(), 2);
    assert_eq!(*reuses.lock().unwrap(), 3);
}

#[test]
fn test_events_can_be_stored() {
    define_registry!(traced7);

    let stored = Arc::new(Mutex::new(Vec::<RegistryEvent>::new()));
    let stored_clone = stored.clone();
    traced7::set_trace_callback(move |event| stored_clone.lock().unwrap().push(event.clone()));

    traced7::get_or_create(|| true).unwrap();

    assert_eq!(
        *stored.lock().unwrap(),
        vec![RegistryEvent::Construct { type_name: "bool" }]
    );
}

#[test]
fn test_panicking_constructor_reports_construct_failed() {
    define_registry!(traced8);

    let events = Arc::new(Mutex::new(Vec::new()));
    traced8::set_trace_callback(collect_into(&events));

    let panicked = std::thread::spawn(|| {
        let _ = traced8::get_or_create::<u8, _>(|| panic!("constructor blew up"));
    })
    .join();
    assert!(panicked.is_err());

    traced8::get_or_create(|| 3u8).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec!["construct_failed { type_name: u8 }", "construct { type_name: u8 }"]
    );
}
