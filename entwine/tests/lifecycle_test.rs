//! End-to-end lifecycle tests
//!
//! These tests verify that:
//! 1. Components start after their dependencies and stop before them
//! 2. Started dependencies are injected under their aliases and cleared on stop
//! 3. Malformed graphs are rejected before any component runs
//! 4. A failing component aborts the walk and is named in the error
//! 5. Systems nest as components

use entwine::prelude::*;
use entwine::Components;
use std::collections::BTreeMap;
use std::sync::Mutex;

type Journal = Arc<Mutex<Vec<String>>>;

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// A component that records its lifecycle in a shared journal
#[derive(Clone, Debug)]
struct Tracked {
    name: &'static str,
    journal: Journal,
    deps: Record,
    running: bool,
    fail_start: bool,
    fail_stop: bool,
}

impl Tracked {
    fn new(name: &'static str, fields: &[&str], journal: &Journal) -> Self {
        Self {
            name,
            journal: Arc::clone(journal),
            deps: Record::new(fields.iter().copied()),
            running: false,
            fail_start: false,
            fail_stop: false,
        }
    }

    fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    fn dependency_running(value: &ComponentRef) -> bool {
        if let Some(tracked) = value.downcast_ref::<Tracked>() {
            tracked.running
        } else {
            // nested systems and plain records count as started
            true
        }
    }
}

impl Inject for Tracked {
    fn inject(&mut self, field: &str, value: ComponentRef) -> ComponentResult<()> {
        self.deps.inject(field, value)
    }

    fn eject(&mut self, field: &str) {
        self.deps.eject(field)
    }
}

#[async_trait]
impl Lifecycle for Tracked {
    async fn start(mut self) -> ComponentResult<Self> {
        if self.fail_start {
            return Err(ComponentError::failed(format!("{} refused to start", self.name)));
        }
        for field in self.deps.fields() {
            let value = self
                .deps
                .get(field)
                .ok_or_else(|| ComponentError::failed(format!("{field} not injected")))?;
            if !Tracked::dependency_running(value) {
                return Err(ComponentError::failed(format!("{field} not started")));
            }
        }
        self.journal.lock().unwrap().push(format!("start:{}", self.name));
        self.running = true;
        Ok(self)
    }

    async fn stop(mut self) -> ComponentResult<Self> {
        if self.fail_stop {
            return Err(ComponentError::failed(format!("{} refused to stop", self.name)));
        }
        self.journal.lock().unwrap().push(format!("stop:{}", self.name));
        self.running = false;
        Ok(self)
    }
}

fn tracked(system: &System, name: &str) -> Tracked {
    system.get::<Tracked>(name).unwrap().clone()
}

/// a depends on c; b depends on a and c
fn abc(journal: &Journal) -> Vec<(&'static str, ComponentRef)> {
    vec![
        ("a", Tracked::new("a", &["c"], journal).into_ref()),
        ("b", Tracked::new("b", &["a", "c"], journal).into_ref()),
        ("c", Tracked::new("c", &[], journal).into_ref()),
    ]
}

fn abc_declarations() -> Vec<(&'static str, Declaration)> {
    vec![
        ("a", Declaration::from(["c"])),
        ("b", Declaration::from(["a", "c"])),
    ]
}

#[tokio::test]
async fn test_start_and_stop_order() {
    let journal = journal();
    let system = entwine::system(abc(&journal), abc_declarations()).unwrap();

    let started = system.start().await.unwrap();
    assert_eq!(entries(&journal), ["start:c", "start:a", "start:b"]);

    let b = tracked(&started, "b");
    assert!(b.running);
    assert!(b.deps.get_as::<Tracked>("a").unwrap().running);
    assert!(b.deps.get_as::<Tracked>("c").unwrap().running);

    let stopped = started.stop().await.unwrap();
    assert_eq!(
        entries(&journal),
        ["start:c", "start:a", "start:b", "stop:b", "stop:a", "stop:c"]
    );

    for name in ["a", "b", "c"] {
        let component = tracked(&stopped, name);
        assert!(!component.running, "{name} should be stopped");
        assert!(component.deps.fields().all(|f| !component.deps.is_set(f)));
    }

    // The input system is a snapshot and is never changed
    assert!(!tracked(&system, "b").running);
    assert!(tracked(&started, "b").running);
}

#[tokio::test]
async fn test_unknown_component_rejected_before_running() {
    let journal = journal();
    let err = entwine::system(
        abc(&journal),
        [
            ("a", Declaration::from(["d", "c"])),
            ("b", Declaration::from(["a", "c"])),
        ],
    )
    .unwrap_err();

    assert!(matches!(
        err,
        GraphError::UnknownComponent { ref name, .. } if name.as_str() == "d"
    ));
    assert!(err.to_string().contains("d"));
    assert!(entries(&journal).is_empty());
}

#[tokio::test]
async fn test_cycle_rejected_before_running() {
    let journal = journal();
    let err = entwine::system(
        abc(&journal),
        [("a", Declaration::from(["b"])), ("b", Declaration::from(["a"]))],
    )
    .unwrap_err();

    let path = err.cycle_path().unwrap();
    assert_eq!(path.first(), path.last());
    assert!(path.iter().any(|n| n.as_str() == "a"));
    assert!(path.iter().any(|n| n.as_str() == "b"));
    assert!(err.to_string().contains(" => "));
    assert!(entries(&journal).is_empty());
}

#[tokio::test]
async fn test_renamed_dependency_is_injected_under_alias() {
    let journal = journal();
    let system = entwine::system(
        [
            ("a", Tracked::new("a", &["c"], &journal).into_ref()),
            ("b", Tracked::new("b", &["a", "cc"], &journal).into_ref()),
            ("c", Tracked::new("c", &[], &journal).into_ref()),
        ],
        [
            ("a", Declaration::from(["c"])),
            ("b", Declaration::from([("a", "a"), ("c", "cc")])),
        ],
    )
    .unwrap();

    let started = system.start().await.unwrap();
    let b = tracked(&started, "b");
    assert!(b.deps.get_as::<Tracked>("cc").unwrap().running);
    assert!(!b.deps.declares("c"));

    let stopped = started.stop().await.unwrap();
    assert_eq!(
        entries(&journal),
        ["start:c", "start:a", "start:b", "stop:b", "stop:a", "stop:c"]
    );
    assert!(!tracked(&stopped, "b").deps.is_set("cc"));
}

#[tokio::test]
async fn test_renamed_dependency_with_further_consumers() {
    let journal = journal();
    let system = entwine::system(
        [
            ("a", Tracked::new("a", &["b"], &journal).into_ref()),
            ("b", Tracked::new("b", &["store"], &journal).into_ref()),
            ("c", Tracked::new("c", &[], &journal).into_ref()),
        ],
        [
            ("a", Declaration::from(["b"])),
            ("b", Declaration::from([("c", "store")])),
        ],
    )
    .unwrap();

    let stopped = system.start().await.unwrap().stop().await.unwrap();
    assert_eq!(
        entries(&journal),
        ["start:c", "start:b", "start:a", "stop:a", "stop:b", "stop:c"]
    );
    assert!(!tracked(&stopped, "b").deps.is_set("store"));
}

#[tokio::test]
async fn test_start_failure_stops_the_walk() {
    let journal = journal();
    let system = entwine::system(
        [
            ("a", Tracked::new("a", &["c"], &journal).into_ref()),
            ("b", Tracked::new("b", &["a", "c"], &journal).into_ref()),
            ("c", Tracked::new("c", &[], &journal).failing_start().into_ref()),
        ],
        abc_declarations(),
    )
    .unwrap();

    let err = system.start().await.unwrap_err();
    assert!(matches!(err, SystemError::Start { .. }));
    assert_eq!(err.component().map(ComponentName::as_str), Some("c"));
    assert!(err.to_string().contains("failed to start c"));

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("refused to start"));

    // Nothing downstream of c ever started
    assert!(entries(&journal).is_empty());
}

#[tokio::test]
async fn test_start_borrows_system_and_names_failure() {
    let journal = journal();
    let system = entwine::system(
        [("c", Tracked::new("c", &[], &journal).failing_start().into_ref())],
        Vec::<(&str, Declaration)>::new(),
    )
    .unwrap();

    // With the prelude in scope this still resolves to the inherent method
    let err: SystemError = system.start().await.unwrap_err();
    assert_eq!(err.component().map(ComponentName::as_str), Some("c"));

    // The system was only borrowed and can be started again
    assert_eq!(system.len(), 1);
    let again: entwine::SystemResult<System> = system.start().await;
    assert!(again.is_err());
}

#[tokio::test]
async fn test_stop_failure_stops_the_walk() {
    let journal = journal();
    let system = entwine::system(
        [
            ("a", Tracked::new("a", &["c"], &journal).into_ref()),
            ("b", Tracked::new("b", &["a", "c"], &journal).failing_stop().into_ref()),
            ("c", Tracked::new("c", &[], &journal).into_ref()),
        ],
        abc_declarations(),
    )
    .unwrap();

    let started = system.start().await.unwrap();
    let err = started.stop().await.unwrap_err();

    assert!(matches!(err, SystemError::Stop { .. }));
    assert_eq!(err.component().map(ComponentName::as_str), Some("b"));
    // a and c wait on b, so neither stopped
    assert_eq!(entries(&journal), ["start:c", "start:a", "start:b"]);
}

#[tokio::test]
async fn test_shared_dependency_starts_once() {
    let journal = journal();
    let system = entwine::system(
        [
            ("base", Tracked::new("base", &[], &journal).into_ref()),
            ("left", Tracked::new("left", &["base"], &journal).into_ref()),
            ("right", Tracked::new("right", &["base"], &journal).into_ref()),
            ("top", Tracked::new("top", &["left", "right", "base"], &journal).into_ref()),
        ],
        [
            ("left", Declaration::from(["base"])),
            ("right", Declaration::from(["base"])),
            ("top", Declaration::from(["left", "right", "base"])),
        ],
    )
    .unwrap();

    let started = system.start().await.unwrap();
    let log = entries(&journal);
    assert_eq!(log.iter().filter(|e| *e == "start:base").count(), 1);
    assert_eq!(log.first().map(String::as_str), Some("start:base"));
    assert_eq!(log.last().map(String::as_str), Some("start:top"));

    // Every consumer sees the same started instance
    let top = tracked(&started, "top");
    let left = tracked(&started, "left");
    assert!(Arc::ptr_eq(
        top.deps.get("base").unwrap(),
        left.deps.get("base").unwrap()
    ));
    assert!(Arc::ptr_eq(top.deps.get("base").unwrap(), started.component("base").unwrap()));
}

#[tokio::test]
async fn test_independent_components() {
    let journal = journal();
    let system = entwine::system(
        [
            ("x", Tracked::new("x", &[], &journal).into_ref()),
            ("y", Tracked::new("y", &[], &journal).into_ref()),
        ],
        Vec::<(&str, Declaration)>::new(),
    )
    .unwrap();

    let stopped = system.start().await.unwrap().stop().await.unwrap();
    let mut log = entries(&journal);
    log.sort();
    assert_eq!(log, ["start:x", "start:y", "stop:x", "stop:y"]);
    assert_eq!(stopped.len(), 2);
}

#[tokio::test]
async fn test_empty_system() {
    let system = entwine::system(
        Components::new(),
        BTreeMap::<ComponentName, Declaration>::new(),
    )
    .unwrap();

    let stopped = system.start().await.unwrap().stop().await.unwrap();
    assert!(stopped.is_empty());
}

#[tokio::test]
async fn test_nested_system() {
    let journal = journal();
    let inner = entwine::system(
        [
            ("x", Tracked::new("x", &[], &journal).into_ref()),
            ("y", Tracked::new("y", &["x"], &journal).into_ref()),
        ],
        [("y", Declaration::from(["x"]))],
    )
    .unwrap();

    let outer = entwine::system(
        [
            ("inner", inner.into_ref()),
            ("app", Tracked::new("app", &["inner"], &journal).into_ref()),
        ],
        [("app", Declaration::from(["inner"]))],
    )
    .unwrap();

    let started = outer.start().await.unwrap();
    assert_eq!(entries(&journal), ["start:x", "start:y", "start:app"]);

    let inner = started.get::<System>("inner").unwrap();
    assert!(tracked(inner, "y").running);
    assert!(tracked(&started, "app").deps.is_set("inner"));

    started.stop().await.unwrap();
    assert_eq!(
        entries(&journal),
        ["start:x", "start:y", "start:app", "stop:app", "stop:y", "stop:x"]
    );
}

#[tokio::test]
async fn test_nested_failure_is_wrapped() {
    let journal = journal();
    let inner = entwine::system(
        [("x", Tracked::new("x", &[], &journal).failing_start().into_ref())],
        Vec::<(&str, Declaration)>::new(),
    )
    .unwrap();

    let outer = entwine::system(
        [("inner", inner.into_ref())],
        Vec::<(&str, Declaration)>::new(),
    )
    .unwrap();

    let err = outer.start().await.unwrap_err();
    assert_eq!(err.component().map(ComponentName::as_str), Some("inner"));

    // The inner system's own error is the source
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("failed to start x"));
}

#[tokio::test]
async fn test_topology_from_json() {
    let journal = journal();
    let topology: BTreeMap<ComponentName, Declaration> = serde_json::from_str(
        r#"{
            "a": ["c"],
            "b": { "a": "a", "c": "cc" }
        }"#,
    )
    .unwrap();

    let system = entwine::system(
        [
            ("a", Tracked::new("a", &["c"], &journal).into_ref()),
            ("b", Tracked::new("b", &["a", "cc"], &journal).into_ref()),
            ("c", Tracked::new("c", &[], &journal).into_ref()),
        ],
        topology,
    )
    .unwrap();

    let order = system.start_order();
    let names: Vec<&str> = order.iter().map(ComponentName::as_str).collect();
    assert_eq!(names, ["c", "a", "b"]);

    system.start().await.unwrap();
    assert_eq!(entries(&journal), ["start:c", "start:a", "start:b"]);

    let dependencies = serde_json::to_value(system.dependencies()).unwrap();
    assert_eq!(dependencies["b"]["c"], "cc");
    assert_eq!(dependencies["a"]["c"], "c");
}
