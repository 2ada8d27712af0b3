//! Integration tests for advanced usage patterns.
//!
//! Real-world shapes: lazily built configuration, services that depend on other
//! services, shared mutable state and event channels.
//!
//! NOTE: All tests use #[serial] because they share the same registry (advanced).
//! Each test clears it first.

use instance_registry::define_registry;
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

define_registry!(advanced);

#[test]
#[serial]
fn test_configuration_pattern() {
    advanced::clear();

    #[derive(Clone, Debug, PartialEq)]
    struct AppConfig {
        database_url: String,
        max_connections: u32,
    }

    let load = || AppConfig {
        database_url: "postgresql://localhost/mydb".to_string(),
        max_connections: 100,
    };

    let config = advanced::get_or_create(load).unwrap();
    let anywhere: AppConfig = advanced::get_cloned().unwrap();
    assert_eq!(*config, anywhere);
}

#[test]
#[serial]
fn test_dependent_services() {
    advanced::clear();

    struct Database {
        url: String,
    }

    struct UserRepository {
        db: Arc<Database>,
    }

    struct UserService {
        repo: Arc<UserRepository>,
    }

    fn database() -> Arc<Database> {
        advanced::get_or_create(|| Database {
            url: "postgres://localhost".to_string(),
        })
        .unwrap()
    }

    fn repository() -> Arc<UserRepository> {
        advanced::get_or_create(|| UserRepository { db: database() }).unwrap()
    }

    fn service() -> Arc<UserService> {
        advanced::get_or_create(|| UserService { repo: repository() }).unwrap()
    }

    // Building the top of the graph builds everything below it exactly once.
    let svc = service();
    assert_eq!(svc.repo.db.url, "postgres://localhost");
    assert!(Arc::ptr_eq(&svc.repo, &repository()));
    assert!(Arc::ptr_eq(&svc.repo.db, &database()));
}

#[test]
#[serial]
fn test_factory_pattern() {
    advanced::clear();

    type UserFactory = Box<dyn Fn(String) -> User + Send + Sync>;

    #[derive(Debug, PartialEq)]
    struct User {
        name: String,
        id: usize,
    }

    let factory = advanced::get_or_create(|| -> UserFactory {
        let next_id = AtomicUsize::new(1);
        Box::new(move |name| User {
            name,
            id: next_id.fetch_add(1, Ordering::SeqCst),
        })
    })
    .unwrap();

    let alice = factory("Alice".to_string());
    let bob = advanced::get::<UserFactory>().unwrap()("Bob".to_string());

    assert_eq!(alice.id, 1);
    assert_eq!(bob.id, 2);
    assert_eq!(bob.name, "Bob");
}

#[test]
#[serial]
fn test_shared_state_pattern() {
    advanced::clear();

    struct Hits(Mutex<u32>);

    *advanced::get_or_create(|| Hits(Mutex::new(0)))
        .unwrap()
        .0
        .lock()
        .unwrap() += 10;
    *advanced::get_or_create(|| Hits(Mutex::new(0)))
        .unwrap()
        .0
        .lock()
        .unwrap() += 32;

    let hits = advanced::get::<Hits>().unwrap();
    assert_eq!(*hits.0.lock().unwrap(), 42);
}

#[test]
#[serial]
fn test_channel_communication_pattern() {
    advanced::clear();

    struct EventBus(Mutex<mpsc::Sender<String>>);

    let (tx, rx) = mpsc::channel::<String>();
    advanced::register(EventBus(Mutex::new(tx))).unwrap();

    // Send events from anywhere
    let bus = advanced::get::<EventBus>().unwrap();
    bus.0.lock().unwrap().send("Event 1".to_string()).unwrap();
    bus.0.lock().unwrap().send("Event 2".to_string()).unwrap();

    assert_eq!(rx.recv().unwrap(), "Event 1");
    assert_eq!(rx.recv().unwrap(), "Event 2");
}

#[test]
#[serial]
fn test_plugin_system_pattern() {
    advanced::clear();

    trait Plugin: Send + Sync {
        fn name(&self) -> &str;
    }

    struct LogPlugin;
    impl Plugin for LogPlugin {
        fn name(&self) -> &str {
            "Logger"
        }
    }

    struct CachePlugin;
    impl Plugin for CachePlugin {
        fn name(&self) -> &str {
            "Cache"
        }
    }

    type PluginSet = Vec<Arc<dyn Plugin>>;

    let plugins = advanced::get_or_create(|| -> PluginSet {
        vec![Arc::new(LogPlugin), Arc::new(CachePlugin)]
    })
    .unwrap();

    assert_eq!(plugins.len(), 2);
    assert_eq!(plugins[0].name(), "Logger");
    assert_eq!(plugins[1].name(), "Cache");
}
