use std::fmt;
use std::sync::Arc;

use super::sink::{ConsoleSink, StyledLine};
use super::style::{ACTION_STYLE, COMPUTED_STYLE, UPDATE_STYLE};
use crate::parse::{ParsedAction, ParsedComputed, ParsedUpdate};

pub type LogFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Receives normalized records, one call per event.
pub trait EventLoggers: Send + Sync {
    fn log_action(&self, parsed: &ParsedAction);
    fn log_update(&self, parsed: &ParsedUpdate);
    fn log_computed(&self, parsed: &ParsedComputed);
}

fn actor_id_segment(actor_id: &str) -> String {
    if actor_id.is_empty() {
        String::new()
    } else {
        format!("#{}", actor_id)
    }
}

/// `[@] Actor#id.name(args)`, `[R]` for reactions.
pub fn format_action(parsed: &ParsedAction) -> StyledLine {
    let prefix = if parsed.is_reaction { "[R] " } else { "[@] " };
    StyledLine::new()
        .push(ACTION_STYLE.prefix, prefix)
        .push(ACTION_STYLE.actor, parsed.actor.as_str())
        .push(ACTION_STYLE.actor_id, actor_id_segment(&parsed.actor_id))
        .push(ACTION_STYLE.action_name, format!(".{}", parsed.action_name))
        .push(ACTION_STYLE.event_arguments, parsed.event_arguments.as_str())
}

/// `[U] Actor#id.key = value`
pub fn format_update(parsed: &ParsedUpdate) -> StyledLine {
    StyledLine::new()
        .push(UPDATE_STYLE.prefix, "[U] ")
        .push(UPDATE_STYLE.actor, parsed.actor.as_str())
        .push(UPDATE_STYLE.actor_id, actor_id_segment(&parsed.actor_id))
        .push(UPDATE_STYLE.key, format!(".{} = ", parsed.key))
        .push(UPDATE_STYLE.new_value, parsed.new_value.as_str())
}

/// `[C] Actor#id.key`
pub fn format_computed(parsed: &ParsedComputed) -> StyledLine {
    StyledLine::new()
        .push(COMPUTED_STYLE.prefix, "[C] ")
        .push(COMPUTED_STYLE.actor, parsed.actor.as_str())
        .push(COMPUTED_STYLE.actor_id, format!("{}.", actor_id_segment(&parsed.actor_id)))
        .push(COMPUTED_STYLE.key, parsed.key.as_str())
}

/// Formats each record and writes it to a sink.
#[derive(Debug, Clone, Default)]
pub struct DefaultLoggers<S> {
    sink: S,
}

impl<S: ConsoleSink> DefaultLoggers<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: ConsoleSink> EventLoggers for DefaultLoggers<S> {
    fn log_action(&self, parsed: &ParsedAction) {
        self.sink.write_line(&format_action(parsed));
    }

    fn log_update(&self, parsed: &ParsedUpdate) {
        self.sink.write_line(&format_update(parsed));
    }

    fn log_computed(&self, parsed: &ParsedComputed) {
        self.sink.write_line(&format_computed(parsed));
    }
}

/// Per-role replacements. Roles left empty fall back to the defaults.
#[derive(Clone, Default)]
pub struct LoggerOverrides {
    pub log_action: Option<LogFn<ParsedAction>>,
    pub log_update: Option<LogFn<ParsedUpdate>>,
    pub log_computed: Option<LogFn<ParsedComputed>>,
}

impl LoggerOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_action(mut self, f: impl Fn(&ParsedAction) + Send + Sync + 'static) -> Self {
        self.log_action = Some(Arc::new(f));
        self
    }

    pub fn on_update(mut self, f: impl Fn(&ParsedUpdate) + Send + Sync + 'static) -> Self {
        self.log_update = Some(Arc::new(f));
        self
    }

    pub fn on_computed(mut self, f: impl Fn(&ParsedComputed) + Send + Sync + 'static) -> Self {
        self.log_computed = Some(Arc::new(f));
        self
    }

    /// Fill the empty roles from `defaults`.
    pub fn resolve(self, defaults: Arc<dyn EventLoggers>) -> ResolvedLoggers {
        ResolvedLoggers {
            overrides: self,
            defaults,
        }
    }
}

impl fmt::Debug for LoggerOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOverrides")
            .field("log_action", &self.log_action.is_some())
            .field("log_update", &self.log_update.is_some())
            .field("log_computed", &self.log_computed.is_some())
            .finish()
    }
}

/// The logger set a running dispatcher uses.
pub struct ResolvedLoggers {
    overrides: LoggerOverrides,
    defaults: Arc<dyn EventLoggers>,
}

impl EventLoggers for ResolvedLoggers {
    fn log_action(&self, parsed: &ParsedAction) {
        match &self.overrides.log_action {
            Some(f) => f(parsed),
            None => self.defaults.log_action(parsed),
        }
    }

    fn log_update(&self, parsed: &ParsedUpdate) {
        match &self.overrides.log_update {
            Some(f) => f(parsed),
            None => self.defaults.log_update(parsed),
        }
    }

    fn log_computed(&self, parsed: &ParsedComputed) {
        match &self.overrides.log_computed {
            Some(f) => f(parsed),
            None => self.defaults.log_computed(parsed),
        }
    }
}

impl fmt::Debug for ResolvedLoggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedLoggers")
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
