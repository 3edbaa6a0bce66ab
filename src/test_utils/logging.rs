use std::sync::Once;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use crate::core::Company;

static INIT: Once = Once::new();

/// Route crate logs to the test harness once per process.
///
/// `RUST_LOG` overrides the default `techstack=debug`.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("techstack=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Prints a banner, the inputs and the ranked results of one scenario.
pub struct ScenarioLogger {
    name: String,
    start_time: Instant,
}

impl ScenarioLogger {
    pub fn new(name: &str) -> Self {
        init_test_tracing();
        let separator = "=".repeat(60);
        println!("\n{separator}");
        println!("[SCENARIO] {name}");
        println!("{separator}");
        Self {
            name: name.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn log_input<T: std::fmt::Debug>(&self, label: &str, value: &T) {
        println!("[INPUT] {label}: {value:?}");
    }

    pub fn log_results(&self, results: &[Company]) {
        println!("[RESULTS] {} companies", results.len());
        for (rank, company) in results.iter().enumerate() {
            println!("  {}. #{} {}", rank + 1, company.id, company.name);
        }
    }

    pub fn pass(&self) {
        println!("[RESULT] {} passed in {:?}", self.name, self.start_time.elapsed());
    }
}
