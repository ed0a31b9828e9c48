use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::config::SpyConfig;
use crate::error::SpyLogError;
use crate::output::loggers::{DefaultLoggers, EventLoggers, LoggerOverrides};
use crate::output::sink::{AnsiConsole, ConsoleSink};
use crate::parse::parsers::{DefaultParsers, EventParsers};
use crate::spy::event::{EventKind, RawEvent};
use crate::spy::hub::{InstrumentationSource, Unsubscribe};

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Logged(EventKind),
    /// Unknown type or category switched off.
    Skipped,
    /// Parse failure or panic; nothing was printed.
    Dropped,
}

#[derive(Debug, Default)]
pub struct DispatchStats {
    logged: AtomicU64,
    skipped: AtomicU64,
    dropped: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub logged: u64,
    pub skipped: u64,
    pub dropped: u64,
}

impl DispatchStats {
    fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Logged(_) => &self.logged,
            Outcome::Skipped => &self.skipped,
            Outcome::Dropped => &self.dropped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            logged: self.logged.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Routes each raw event to its parser and logger.
pub struct Dispatcher {
    config: SpyConfig,
    parsers: Arc<dyn EventParsers>,
    loggers: Arc<dyn EventLoggers>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn enabled(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Action => self.config.spy_actions,
            EventKind::Update => self.config.spy_updates,
            EventKind::Compute => self.config.spy_computed,
        }
    }

    fn route(&self, event: &RawEvent) -> Result<Outcome, SpyLogError> {
        let kind = match event.kind() {
            Some(kind) if self.enabled(kind) => kind,
            _ => return Ok(Outcome::Skipped),
        };

        match kind {
            EventKind::Action => {
                let parsed = self.parsers.parse_action(event);
                self.loggers.log_action(&parsed);
            }
            EventKind::Update => {
                let parsed = self.parsers.parse_update(event);
                self.loggers.log_update(&parsed);
            }
            EventKind::Compute => {
                let parsed = self.parsers.parse_computed(event)?;
                self.loggers.log_computed(&parsed);
            }
        }

        Ok(Outcome::Logged(kind))
    }

    /// Handle one event. Never panics and never returns an error: a failing
    /// event is dropped so the next one still gets through.
    ///
    /// A panicking parser or logger is caught here, but the process panic
    /// hook still runs first and by default prints the panic message to
    /// stderr. Install a quiet hook with [`std::panic::set_hook`] if that
    /// output is unwanted.
    pub fn dispatch(&self, event: &RawEvent) -> Outcome {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| self.route(event))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                debug!(event = event.tag(), "event dropped: {}", e);
                Outcome::Dropped
            }
            Err(_) => {
                warn!(event = event.tag(), "parser or logger panicked, event dropped");
                Outcome::Dropped
            }
        };
        self.stats.record(outcome);
        outcome
    }

    /// Subscribe to `source`. Logging continues until the returned
    /// [`Disposer`] is disposed.
    pub fn start<S>(self, source: &S) -> Disposer
    where
        S: InstrumentationSource + ?Sized,
    {
        let active = Arc::new(AtomicBool::new(true));
        let stats = Arc::clone(&self.stats);
        let config = self.config;
        let dispatcher = Arc::new(self);

        let listener_active = Arc::clone(&active);
        let unsubscribe = source.subscribe(Arc::new(move |event: &RawEvent| {
            if listener_active.load(Ordering::Acquire) {
                dispatcher.dispatch(event);
            }
        }));

        info!(
            actions = config.spy_actions,
            updates = config.spy_updates,
            computed = config.spy_computed,
            "spy logger started"
        );

        Disposer {
            unsubscribe: Mutex::new(Some(unsubscribe)),
            active,
            stats,
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct DispatcherBuilder {
    config: SpyConfig,
    parsers: Option<Arc<dyn EventParsers>>,
    defaults: Option<Arc<dyn EventLoggers>>,
    overrides: LoggerOverrides,
}

impl DispatcherBuilder {
    pub fn with_config(mut self, config: SpyConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the parser set. Defaults to [`DefaultParsers`] built from
    /// the config's parser section.
    pub fn with_parsers(mut self, parsers: impl EventParsers + 'static) -> Self {
        self.parsers = Some(Arc::new(parsers));
        self
    }

    /// Replace the default logger set wholesale.
    pub fn with_loggers(mut self, loggers: impl EventLoggers + 'static) -> Self {
        self.defaults = Some(Arc::new(loggers));
        self
    }

    /// Default loggers writing to `sink`.
    pub fn with_sink(self, sink: impl ConsoleSink + 'static) -> Self {
        self.with_loggers(DefaultLoggers::new(sink))
    }

    /// Per-role overrides on top of the default loggers.
    pub fn with_overrides(mut self, overrides: LoggerOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn build(self) -> Dispatcher {
        let parsers: Arc<dyn EventParsers> = match self.parsers {
            Some(parsers) => parsers,
            None => Arc::new(DefaultParsers::new(self.config.parser)),
        };
        let defaults: Arc<dyn EventLoggers> = match self.defaults {
            Some(loggers) => loggers,
            None => Arc::new(DefaultLoggers::new(AnsiConsole::stdout())),
        };

        Dispatcher {
            config: self.config,
            parsers,
            loggers: Arc::new(self.overrides.resolve(defaults)),
            stats: Arc::new(DispatchStats::default()),
        }
    }

    pub fn start<S>(self, source: &S) -> Disposer
    where
        S: InstrumentationSource + ?Sized,
    {
        self.build().start(source)
    }
}

/// Start logging `source` with default parsers and terminal output.
/// Roles in `loggers` replace the matching default logger.
pub fn start<S>(source: &S, config: SpyConfig, loggers: LoggerOverrides) -> Disposer
where
    S: InstrumentationSource + ?Sized,
{
    Dispatcher::builder()
        .with_config(config)
        .with_overrides(loggers)
        .start(source)
}

/// Handle to a running subscription.
///
/// Dropping it does not stop logging; call [`Disposer::dispose`] or convert
/// it with [`Disposer::into_guard`].
pub struct Disposer {
    unsubscribe: Mutex<Option<Unsubscribe>>,
    active: Arc<AtomicBool>,
    stats: Arc<DispatchStats>,
}

impl Disposer {
    /// Unregister. Returns `false` if this handle was already disposed.
    pub fn dispose(&self) -> bool {
        self.active.store(false, Ordering::Release);
        let taken = self
            .unsubscribe
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            Some(unsubscribe) => {
                unsubscribe.call();
                info!("spy logger stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        !self.active.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn into_guard(self) -> DisposeGuard {
        DisposeGuard(self)
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Disposes on drop.
#[derive(Debug)]
pub struct DisposeGuard(Disposer);

impl Drop for DisposeGuard {
    fn drop(&mut self) {
        self.0.dispose();
    }
}
