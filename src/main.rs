use anyhow::{Context, Result};
use spylog::output::sink::AnsiConsole;
use spylog::{Dispatcher, ObjectValue, RawEvent, ReactionValue, SpyConfig, SpyHub, Value};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Stand-in for an observable store: every mutation goes through the hub
/// the way an instrumented runtime would report it.
struct Person {
    id: i32,
    first_name: String,
    last_name: String,
}

impl Person {
    fn subject(&self) -> ObjectValue {
        ObjectValue::new("Person")
            .with_field("id", self.id)
            .with_field("firstName", self.first_name.as_str())
            .with_field("lastName", self.last_name.as_str())
    }

    fn set_prop(&mut self, hub: &SpyHub, prop: &str, value: &str) {
        hub.emit(
            &RawEvent::action("setProp")
                .on(self.subject())
                .with_arguments(vec![Value::from(prop), Value::from(value)]),
        );

        match prop {
            "firstName" => self.first_name = value.to_string(),
            "lastName" => self.last_name = value.to_string(),
            _ => {}
        }
        hub.emit(&RawEvent::update(self.subject(), prop, value));

        // The autorun observing fullName recomputes it, then re-runs.
        hub.emit(&RawEvent::compute(format!("Person@{}.fullName", self.id)).on(self.subject()));
        let autorun = ReactionValue::new("Autorun@7").observing(format!("Person@{}.fullName", self.id));
        hub.emit(
            &RawEvent::action("Autorun@7")
                .with_arguments(vec![Value::Undefined, Value::from(autorun)]),
        );
        hub.emit(&RawEvent::other("reaction"));
    }
}

fn load_config() -> Result<SpyConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            SpyConfig::from_json(&content).with_context(|| format!("parsing config {}", path))
        }
        None => Ok(SpyConfig::default()),
    }
}

fn main() -> Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")?;

    let config = load_config()?;
    tracing::info!(?config, "spylog demo starting");

    // 2. Source + Logger
    let hub = SpyHub::new();
    let disposer = Dispatcher::builder()
        .with_config(config)
        .with_sink(AnsiConsole::stdout())
        .start(&hub);

    // 3. Scripted session
    let mut person = Person {
        id: 1,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
    };
    person.set_prop(&hub, "firstName", "Jane");
    person.set_prop(&hub, "lastName", "Roe");

    let cart = ObjectValue::new("Cart").with_field("label", "main");
    let line = Value::from(ObjectValue::new("LineItem").with_field("_id", "li-9"));
    hub.emit(&RawEvent::update(cart, "lastAdded", line));
    hub.emit(&RawEvent::update(
        ObjectValue::new("Cart").with_field("label", "main"),
        "filters",
        Value::record([("tags", Value::from(vec![Value::from("a"), Value::from("b")])), ("open", Value::from(true))]),
    ));

    // Malformed: dropped without output.
    hub.emit(&RawEvent::compute("not-a-computed-name"));

    let stats = disposer.stats();
    disposer.dispose();
    tracing::info!(
        logged = stats.logged,
        skipped = stats.skipped,
        dropped = stats.dropped,
        "spylog demo finished"
    );

    // Disposed: nothing is printed for this one.
    person.set_prop(&hub, "firstName", "Ghost");

    Ok(())
}
