use std::io::Write;
use std::sync::{Arc, Mutex};

/// A line written to the console, tagged with its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    Out(String),
    Err(String),
}

#[derive(Debug)]
enum Target {
    Terminal,
    Buffer(Vec<ConsoleLine>),
}

/// User-facing console output, shared between fan-out threads.
///
/// Whole lines are written under one lock so concurrent reports never
/// interleave within a line.
#[derive(Debug, Clone)]
pub struct Console {
    target: Arc<Mutex<Target>>,
}

impl Console {
    pub fn terminal() -> Self {
        Self {
            target: Arc::new(Mutex::new(Target::Terminal)),
        }
    }

    /// Capture lines in memory instead of printing them.
    pub fn buffered() -> Self {
        Self {
            target: Arc::new(Mutex::new(Target::Buffer(Vec::new()))),
        }
    }

    pub fn out(&self, line: impl Into<String>) {
        self.write(ConsoleLine::Out(line.into()));
    }

    pub fn err(&self, line: impl Into<String>) {
        self.write(ConsoleLine::Err(line.into()));
    }

    /// Lines captured so far; always empty for a terminal console.
    pub fn lines(&self) -> Vec<ConsoleLine> {
        match &*self.lock() {
            Target::Terminal => Vec::new(),
            Target::Buffer(lines) => lines.clone(),
        }
    }

    fn write(&self, line: ConsoleLine) {
        let mut target = self.lock();
        match &mut *target {
            Target::Terminal => {
                // Nothing sensible to do if the terminal is gone.
                let _ = match &line {
                    ConsoleLine::Out(text) => writeln!(std::io::stdout().lock(), "{text}"),
                    ConsoleLine::Err(text) => writeln!(std::io::stderr().lock(), "{text}"),
                };
            }
            Target::Buffer(lines) => lines.push(line),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Target> {
        // A panic elsewhere must not silence the console.
        self.target.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
