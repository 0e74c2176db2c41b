use colored::Colorize;
use jiff::Zoned;

const SCOPE: &str = "relbump";

/// Sink for human readable progress messages
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    /// Only shown in verbose mode
    fn debug(&self, message: &str);
}

/// Logger that writes timestamped, colored lines to the terminal
pub struct ConsoleLogger {
    verbose: bool,
}

impl ConsoleLogger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose: verbose || std::env::var("RELBUMP_VERBOSE").is_ok(),
        }
    }

    fn prefix(&self) -> String {
        let time = Zoned::now().strftime("%H:%M:%S").to_string();
        format!("[{}] [{}]", time.dimmed(), SCOPE.magenta())
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("{} {} {}", self.prefix(), "ℹ".blue(), message);
    }

    fn success(&self, message: &str) {
        println!("{} {} {}", self.prefix(), "✔".green(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {} {}", self.prefix(), "⚠".yellow(), message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {} {}", self.prefix(), "✖".red(), message.red());
    }

    fn debug(&self, message: &str) {
        if self.verbose {
            println!("{} {} {}", self.prefix(), "…".dimmed(), message.dimmed());
        }
    }
}
