use std::sync::{Arc, Mutex, OnceLock};

use spylog::{
    start, CaptureConsole, DefaultParsers, Dispatcher, Disposer, EventParsers, LoggerOverrides,
    ObjectValue, Outcome, ParsedAction, ParsedComputed, ParsedUpdate, ParserConfig, RawEvent,
    ReactionValue, SpyConfig, SpyHub, SpyLogError, StatsSnapshot, Value,
};

/// Emits what an instrumented `person.setProp(prop, value)` reports:
/// the action, the field write, the computed recompute and the autorun.
fn set_prop(hub: &SpyHub, prop: &str, value: &str) {
    let subject = ObjectValue::new("Person")
        .with_field("id", 1)
        .with_field("firstName", "John")
        .with_field("lastName", "Doe");

    hub.emit(
        &RawEvent::action("setProp")
            .on(subject.clone())
            .with_arguments(vec![Value::from(prop), Value::from(value)]),
    );
    hub.emit(&RawEvent::update(subject.clone(), prop, value));
    hub.emit(&RawEvent::compute("Person@1.fullName").on(subject));
    let autorun = ReactionValue::new("Autorun@2").observing("Person@1.fullName");
    hub.emit(&RawEvent::action("Autorun@2").with_arguments(vec![Value::Undefined, Value::from(autorun)]));
}

#[derive(Clone, Default)]
struct Recorded {
    actions: Arc<Mutex<Vec<ParsedAction>>>,
    updates: Arc<Mutex<Vec<ParsedUpdate>>>,
    computed: Arc<Mutex<Vec<ParsedComputed>>>,
}

impl Recorded {
    fn overrides(&self) -> LoggerOverrides {
        let actions = self.actions.clone();
        let updates = self.updates.clone();
        let computed = self.computed.clone();
        LoggerOverrides::new()
            .on_action(move |p| actions.lock().unwrap().push(p.clone()))
            .on_update(move |p| updates.lock().unwrap().push(p.clone()))
            .on_computed(move |p| computed.lock().unwrap().push(p.clone()))
    }

    fn counts(&self) -> (usize, usize, usize) {
        (
            self.actions.lock().unwrap().len(),
            self.updates.lock().unwrap().len(),
            self.computed.lock().unwrap().len(),
        )
    }
}

#[test]
fn test_defaults_log_every_category() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    let disposer = Dispatcher::builder().with_sink(console.clone()).start(&hub);

    set_prop(&hub, "firstName", "Jane");

    assert_eq!(
        console.plain_lines(),
        vec![
            "[@] Person#1.setProp(\"firstName\", \"Jane\")".to_string(),
            "[U] Person#1.firstName = \"Jane\"".to_string(),
            "[C] Person#1.fullName".to_string(),
            "[R] Reaction.Autorun@2(undefined, Person@1.fullName)".to_string(),
        ]
    );
    disposer.dispose();
}

#[test]
fn test_end_to_end_normalized_records() {
    let hub = SpyHub::new();
    let recorded = Recorded::default();
    let disposer = start(&hub, SpyConfig::default(), recorded.overrides());

    set_prop(&hub, "firstName", "Jane");

    let actions = recorded.actions.lock().unwrap().clone();
    assert_eq!(
        actions[0],
        ParsedAction {
            actor: "Person".to_string(),
            actor_id: "1".to_string(),
            action_name: "setProp".to_string(),
            event_arguments: "(\"firstName\", \"Jane\")".to_string(),
            is_reaction: false,
        }
    );
    assert!(actions[1].is_reaction);

    assert_eq!(
        recorded.updates.lock().unwrap()[0],
        ParsedUpdate {
            actor: "Person".to_string(),
            actor_id: "1".to_string(),
            key: "firstName".to_string(),
            new_value: "\"Jane\"".to_string(),
        }
    );
    assert_eq!(
        recorded.computed.lock().unwrap()[0],
        ParsedComputed {
            actor: "Person".to_string(),
            actor_id: "1".to_string(),
            key: "fullName".to_string(),
        }
    );
    disposer.dispose();
}

#[test]
fn test_custom_update_logger_replaces_default() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    let recorded = Recorded::default();
    let updates = recorded.updates.clone();

    let disposer = Dispatcher::builder()
        .with_sink(console.clone())
        .with_overrides(LoggerOverrides::new().on_update(move |p| updates.lock().unwrap().push(p.clone())))
        .start(&hub);

    set_prop(&hub, "firstName", "Jane");
    set_prop(&hub, "lastName", "Roe");

    // Every update went to the override, none to the default sink
    assert_eq!(recorded.counts().1, 2);
    assert!(console.plain_lines().iter().all(|line| !line.starts_with("[U]")));
    // Roles not overridden still use the defaults
    assert_eq!(console.len(), 6);
    disposer.dispose();
}

#[test]
fn test_spy_actions_off() {
    let hub = SpyHub::new();
    let recorded = Recorded::default();
    let disposer = start(&hub, SpyConfig::default().actions(false), recorded.overrides());

    set_prop(&hub, "firstName", "Jane");

    assert_eq!(recorded.counts(), (0, 1, 1));
    assert_eq!(disposer.stats(), StatsSnapshot { logged: 2, skipped: 2, dropped: 0 });
    disposer.dispose();
}

#[test]
fn test_spy_updates_and_computed_off() {
    let hub = SpyHub::new();

    let recorded = Recorded::default();
    let disposer = start(&hub, SpyConfig::default().updates(false), recorded.overrides());
    set_prop(&hub, "firstName", "Jane");
    assert_eq!(recorded.counts(), (2, 0, 1));
    disposer.dispose();

    let recorded = Recorded::default();
    let disposer = start(&hub, SpyConfig::default().computed(false), recorded.overrides());
    set_prop(&hub, "firstName", "Jane");
    assert_eq!(recorded.counts(), (2, 1, 0));
    disposer.dispose();
}

#[test]
fn test_unknown_event_types_are_ignored() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    let disposer = Dispatcher::builder().with_sink(console.clone()).start(&hub);

    hub.emit(&RawEvent::other("reaction"));
    hub.emit(&RawEvent::other("report-end"));

    assert!(console.is_empty());
    assert_eq!(disposer.stats().skipped, 2);
    disposer.dispose();
}

#[test]
fn test_dispose_is_idempotent() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    let disposer = Dispatcher::builder().with_sink(console.clone()).start(&hub);
    assert!(hub.is_spying());

    assert!(disposer.dispose());
    assert!(!disposer.dispose(), "second dispose is a no-op");
    assert!(disposer.is_disposed());
    assert!(!hub.is_spying());

    set_prop(&hub, "firstName", "Ghost");
    assert!(console.is_empty(), "no lines after dispose");
}

#[test]
fn test_dispose_mid_emit_stops_delivery() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    let slot: Arc<OnceLock<Disposer>> = Arc::new(OnceLock::new());

    // Registered first, so it runs before the logger within the same emit.
    let stopper = Arc::clone(&slot);
    hub.add_listener(Arc::new(move |_: &RawEvent| {
        if let Some(disposer) = stopper.get() {
            disposer.dispose();
        }
    }));

    let disposer = Dispatcher::builder().with_sink(console.clone()).start(&hub);
    assert!(slot.set(disposer).is_ok());

    hub.emit(&RawEvent::compute("Store@3.total"));

    // The logger's listener was already in the emit snapshot but printed nothing
    assert!(console.is_empty());
    let disposer = slot.get().unwrap();
    assert!(disposer.is_disposed());
    assert_eq!(disposer.stats(), StatsSnapshot::default());
    assert_eq!(hub.listener_count(), 1);
}

#[test]
fn test_guard_disposes_on_drop() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    {
        let _guard = Dispatcher::builder()
            .with_sink(console.clone())
            .start(&hub)
            .into_guard();
        set_prop(&hub, "firstName", "Jane");
    }
    assert!(!hub.is_spying());
    set_prop(&hub, "firstName", "Ghost");
    assert_eq!(console.len(), 4);
}

#[test]
fn test_malformed_compute_is_dropped_silently() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    let disposer = Dispatcher::builder().with_sink(console.clone()).start(&hub);

    hub.emit(&RawEvent::compute("fullName"));
    assert!(console.is_empty());

    // The subscription survives
    set_prop(&hub, "firstName", "Jane");
    assert_eq!(console.len(), 4);
    assert_eq!(disposer.stats().dropped, 1);
    disposer.dispose();
}

#[test]
fn test_panicking_logger_does_not_break_stream() {
    let hub = SpyHub::new();
    let console = CaptureConsole::new();
    let disposer = Dispatcher::builder()
        .with_sink(console.clone())
        .with_overrides(LoggerOverrides::new().on_action(|_| panic!("logger exploded")))
        .start(&hub);

    set_prop(&hub, "firstName", "Jane");

    // Both actions dropped, update and computed still printed
    assert_eq!(
        console.plain_lines(),
        vec![
            "[U] Person#1.firstName = \"Jane\"".to_string(),
            "[C] Person#1.fullName".to_string(),
        ]
    );
    assert_eq!(disposer.stats().dropped, 2);
    assert!(hub.is_spying());
    disposer.dispose();
}

struct ShoutingParsers(DefaultParsers);

impl EventParsers for ShoutingParsers {
    fn parse_action(&self, event: &RawEvent) -> ParsedAction {
        let mut parsed = self.0.parse_action(event);
        parsed.action_name = parsed.action_name.to_uppercase();
        parsed
    }

    fn parse_update(&self, event: &RawEvent) -> ParsedUpdate {
        self.0.parse_update(event)
    }

    fn parse_computed(&self, event: &RawEvent) -> Result<ParsedComputed, SpyLogError> {
        self.0.parse_computed(event)
    }
}

#[test]
fn test_parsers_are_injectable() {
    let hub = SpyHub::new();
    let recorded = Recorded::default();
    let disposer = Dispatcher::builder()
        .with_parsers(ShoutingParsers(DefaultParsers::default()))
        .with_overrides(recorded.overrides())
        .start(&hub);

    set_prop(&hub, "firstName", "Jane");

    assert_eq!(recorded.actions.lock().unwrap()[0].action_name, "SETPROP");
    disposer.dispose();
}

#[test]
fn test_reaction_heuristic_follows_config() {
    let hub = SpyHub::new();
    let recorded = Recorded::default();
    let config = SpyConfig::default().with_parser(ParserConfig { reaction_actor_from_observed: true });
    let disposer = start(&hub, config, recorded.overrides());

    set_prop(&hub, "firstName", "Jane");

    assert_eq!(recorded.actions.lock().unwrap()[1].actor, "Person@1");
    disposer.dispose();
}

#[test]
fn test_dispatch_outcomes() {
    let console = CaptureConsole::new();
    let dispatcher = Dispatcher::builder().with_sink(console.clone()).build();

    assert_eq!(
        dispatcher.dispatch(&RawEvent::compute("Store@3.total")),
        Outcome::Logged(spylog::EventKind::Compute)
    );
    assert_eq!(dispatcher.dispatch(&RawEvent::compute("total")), Outcome::Dropped);
    assert_eq!(dispatcher.dispatch(&RawEvent::other("error")), Outcome::Skipped);
    assert_eq!(console.plain_lines(), vec!["[C] Store#3.total".to_string()]);
}

#[test]
fn test_config_from_json() {
    let config = SpyConfig::from_json(r#"{"spy_updates": false}"#).unwrap();
    assert!(config.spy_actions);
    assert!(!config.spy_updates);
    assert!(config.spy_computed);
    assert!(!config.parser.reaction_actor_from_observed);

    let config = SpyConfig::from_json(r#"{"parser": {"reaction_actor_from_observed": true}}"#).unwrap();
    assert!(config.parser.reaction_actor_from_observed);

    assert!(matches!(
        SpyConfig::from_json("{not json"),
        Err(SpyLogError::InvalidConfig(_))
    ));
}

#[test]
fn test_tracing_sink_accepts_lines() {
    let dispatcher = Dispatcher::builder()
        .with_sink(spylog::output::TracingConsole)
        .build();

    // No subscriber installed: the line goes nowhere, dispatch still succeeds
    assert_eq!(
        dispatcher.dispatch(&RawEvent::update(ObjectValue::new("Person"), "age", 30)),
        Outcome::Logged(spylog::EventKind::Update)
    );
    assert_eq!(dispatcher.stats().logged, 1);
}

#[test]
fn test_quiet_panic_hook_with_panicking_logger() {
    let console = CaptureConsole::new();
    let dispatcher = Dispatcher::builder()
        .with_sink(console.clone())
        .with_overrides(LoggerOverrides::new().on_computed(|_| panic!("logger exploded")))
        .build();

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let outcome = dispatcher.dispatch(&RawEvent::compute("Store@3.total"));
    std::panic::set_hook(previous);

    assert_eq!(outcome, Outcome::Dropped);
    assert!(console.is_empty());
}
