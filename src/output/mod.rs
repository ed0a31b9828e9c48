pub mod loggers;
pub mod sink;
pub mod style;

pub use loggers::{DefaultLoggers, EventLoggers, LoggerOverrides, ResolvedLoggers};
pub use sink::{AnsiConsole, CaptureConsole, ConsoleSink, StyledLine, TracingConsole};
