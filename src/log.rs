//! Leveled diagnostics written to stderr.
//!
//! The map reports structural rewrites at [`LogLevel::Trace`]. Nothing below [`LogLevel::Diagnostic`] is printed
//! unless a consumer raises the level with [`set_logging_level`].

use std::{
    panic::Location,
    sync::atomic::{AtomicUsize, Ordering},
};

// Low bits hold the level, the top bit says whether to emit terminal colour codes
static LOG_LEVEL: AtomicUsize = AtomicUsize::new(LogLevel::Diagnostic as usize);

const TERM_FMT_BIT: usize = !(!0 >> 1);

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off,
    Fatal,
    Error,
    Warning,
    Diagnostic,
    Exec,
    Verbose,
    Info,
    Trace,
    Debug,
}

impl LogLevel {
    const ALL: [LogLevel; 10] = [
        LogLevel::Off,
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Diagnostic,
        LogLevel::Exec,
        LogLevel::Verbose,
        LogLevel::Info,
        LogLevel::Trace,
        LogLevel::Debug,
    ];

    fn from_bits(bits: usize) -> LogLevel {
        match Self::ALL.get(bits & !TERM_FMT_BIT) {
            Some(level) => *level,
            None => panic!("Unknown logging level {}", bits & !TERM_FMT_BIT),
        }
    }
}

#[inline]
pub fn current_level() -> LogLevel {
    LogLevel::from_bits(LOG_LEVEL.load(Ordering::Relaxed))
}

#[inline]
pub fn set_logging_level(level: LogLevel) {
    let val = level as usize;
    let _ = LOG_LEVEL.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
        Some((prev & TERM_FMT_BIT) | val)
    });
}

#[inline]
pub fn use_term_formatting(use_term_fmt: bool) {
    let _ = LOG_LEVEL.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
        Some((prev & !TERM_FMT_BIT) | ((use_term_fmt as usize) << (usize::BITS - 1)))
    });
}

#[inline]
pub fn set_logging_config(level: LogLevel, use_term_fmt: bool) {
    LOG_LEVEL.store(
        (level as usize) | (use_term_fmt as usize) << (usize::BITS - 1),
        Ordering::Relaxed,
    )
}

fn print_color_code(n: u8, f: &mut core::fmt::Formatter, use_term_fmt: bool) -> core::fmt::Result {
    if use_term_fmt {
        let code = if n < 8 { 30 + n } else { 90 + (n & 7) };
        f.write_fmt(format_args!("\x1B[{:02}m", code))
    } else {
        Ok(())
    }
}

fn print_reset(f: &mut core::fmt::Formatter, use_term_fmt: bool) -> core::fmt::Result {
    if use_term_fmt {
        f.write_str("\x1B[0m")
    } else {
        Ok(())
    }
}

fn print_tag(
    tag: &str,
    color: Option<u8>,
    f: &mut core::fmt::Formatter,
    use_term_fmt: bool,
) -> core::fmt::Result {
    f.write_str("[")?;
    if let Some(n) = color {
        print_color_code(n, f, use_term_fmt)?;
        f.write_str(tag)?;
        print_reset(f, use_term_fmt)?;
    } else {
        f.write_str(tag)?;
    }
    f.write_str("] ")
}

impl core::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.display_prefix(f, (LOG_LEVEL.load(Ordering::Relaxed) & TERM_FMT_BIT) != 0)
    }
}

impl LogLevel {
    pub fn display_prefix(
        &self,
        f: &mut core::fmt::Formatter,
        use_term_fmt: bool,
    ) -> core::fmt::Result {
        match self {
            LogLevel::Off => panic!("Logging at level `Off` is forbidden"),
            LogLevel::Fatal => print_tag("FATAL", Some(1), f, use_term_fmt),
            LogLevel::Error => print_tag("ERROR", Some(9), f, use_term_fmt),
            LogLevel::Warning => print_tag("WARN", Some(11), f, use_term_fmt),
            LogLevel::Diagnostic => print_tag("DIAGNOSTIC", None, f, use_term_fmt),
            LogLevel::Exec => print_tag("EXEC", None, f, use_term_fmt),
            LogLevel::Verbose => Ok(()),
            LogLevel::Info => print_tag("INFO", Some(7), f, use_term_fmt),
            LogLevel::Trace => print_tag("TRACE", Some(8), f, use_term_fmt),
            LogLevel::Debug => print_tag("DEBUG", Some(7), f, use_term_fmt),
        }
    }
}

#[doc(hidden)]
#[inline]
pub fn __log_debug_print(level: LogLevel, f: core::fmt::Arguments, loc: &Location) {
    use std::io::Write;
    if level <= current_level() {
        // A closed stderr is not worth failing a map operation over
        let _ = writeln!(std::io::stderr(), "{}[{}]: {}", level, loc, f);
    }
}

macro_rules! log_debug{
    ($level:expr, $($fmt:tt)*) => {
        $crate::log::__log_debug_print($level, ::core::format_args!($($fmt)*), ::core::panic::Location::caller())
    };
}

pub(crate) use log_debug;
