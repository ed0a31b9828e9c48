pub mod config;
pub mod dispatcher;
pub mod error;
pub mod output;
pub mod parse;
pub mod spy;

// Re-export the pieces most callers need
pub use config::{ParserConfig, SpyConfig};
pub use dispatcher::{start, DisposeGuard, Dispatcher, Disposer, Outcome, StatsSnapshot};
pub use error::SpyLogError;
pub use output::{CaptureConsole, ConsoleSink, DefaultLoggers, EventLoggers, LoggerOverrides, StyledLine};
pub use parse::{DefaultParsers, EventParsers, ParsedAction, ParsedComputed, ParsedUpdate};
pub use spy::event::{EventKind, RawEvent};
pub use spy::hub::{InstrumentationSource, SpyHub};
pub use spy::value::{ObjectValue, ReactionValue, Value};
