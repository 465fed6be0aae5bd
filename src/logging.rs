pub trait Logger {
    fn log(&mut self, msg: &str);

    /// Whether messages are kept. Lets `log!` skip formatting for discarding loggers.
    fn enabled(&self) -> bool {
        true
    }
}

impl<'a, T> Logger for &'a mut T
where
    T: Logger,
{
    fn log(&mut self, msg: &str) {
        T::log(self, msg);
    }

    fn enabled(&self) -> bool {
        T::enabled(self)
    }
}

#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:tt)+) => {{
        #[allow(unused_imports)]
        use $crate::logging::Logger as _;
        if $logger.enabled() {
            $logger.log(&format!($($arg)+));
        }
    }};
}

pub struct PrintLogger {
    name: String,
}

impl PrintLogger {
    #[must_use]
    pub const fn new(name: String) -> PrintLogger {
        PrintLogger { name }
    }
}

impl Logger for PrintLogger {
    fn log(&mut self, msg: &str) {
        println!("[{}] {}", self.name, msg);
    }
}

pub struct NothingLogger;

impl Logger for NothingLogger {
    fn log(&mut self, _msg: &str) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Keeps every message in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Vec<String>,
}

impl MemoryLogger {
    #[must_use]
    pub fn new() -> MemoryLogger {
        MemoryLogger::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Logger for MemoryLogger {
    fn log(&mut self, msg: &str) {
        self.lines.push(msg.to_owned());
    }
}
