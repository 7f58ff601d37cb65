//! Console progress reporting for the sampling loop

use crate::sampler::ProgressSink;
use colored::*;
use std::io::Write;
use std::sync::Mutex;

const BAR_WIDTH: usize = 20;

/// Render one progress line: `[#####-----]  50% message`
pub fn progress_line(fraction: f64, message: &str, width: usize) -> String {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (fraction * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        (fraction * 100.0).round() as u32,
        message
    )
}

/// Progress sink printing one line per status update to stderr
pub struct ConsoleProgress {
    enable_color: bool,
    fraction: Mutex<f64>,
}

impl ConsoleProgress {
    pub fn new(enable_color: bool) -> Self {
        Self {
            enable_color,
            fraction: Mutex::new(0.0),
        }
    }

    fn current_fraction(&self) -> f64 {
        self.fraction.lock().map(|f| *f).unwrap_or(0.0)
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_progress(&self, fraction: f64) {
        if let Ok(mut current) = self.fraction.lock() {
            *current = fraction;
        }
    }

    fn on_status(&self, message: &str) {
        let line = progress_line(self.current_fraction(), message, BAR_WIDTH);
        let line = if self.enable_color { line.cyan().to_string() } else { line };

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", line);
    }
}
