use glosa_core::{ImportError, Outcome, Reporter};

/// Prints one line per entry to stdout
#[derive(Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn outcome(&mut self, label: &str, outcome: Outcome) {
        println!("{}", outcome_line(label, outcome));
    }

    fn failure(&mut self, label: &str, error: &ImportError) {
        eprintln!("Entry {label} failed: {error}");
    }
}

fn outcome_line(label: &str, outcome: Outcome) -> String {
    if outcome.is_write() {
        format!("Entry {label} {outcome}.")
    } else {
        format!("Entry {label} did not change.")
    }
}
