//! Terminal progress rendering for transfers.
//!
//! Draws an indicatif bar on a terminal and falls back to throttled log
//! lines when stderr is redirected.

use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use artifetch_core::ProgressSink;
use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use tracing::info;

/// Minimum interval between plain progress lines.
const PLAIN_INTERVAL: Duration = Duration::from_secs(5);

// ============================================================================
// CLI Progress Printer
// ============================================================================

/// Progress sink that automatically selects terminal or plain output.
pub struct CliProgressPrinter {
    inner: Mutex<ProgressRender>,
    interactive: bool,
}

enum ProgressRender {
    Fancy(FancyProgress),
    Plain(PlainProgress),
}

impl CliProgressPrinter {
    /// Create a printer, auto-detecting terminal capability.
    pub fn new() -> Self {
        let interactive = io::stderr().is_terminal();
        let render = if interactive {
            ProgressRender::Fancy(FancyProgress::default())
        } else {
            ProgressRender::Plain(PlainProgress::default())
        };
        Self {
            inner: Mutex::new(render),
            interactive,
        }
    }

    /// Whether progress is drawn on a terminal.
    pub const fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn with_render(&self, f: impl FnOnce(&mut ProgressRender)) {
        if let Ok(mut render) = self.inner.lock() {
            f(&mut render);
        }
    }
}

impl Default for CliProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for CliProgressPrinter {
    fn start(&self, label: &str, total: Option<u64>) {
        self.with_render(|render| match render {
            ProgressRender::Fancy(inner) => inner.start(label, total),
            ProgressRender::Plain(inner) => inner.start(label, total),
        });
    }

    fn advance(&self, downloaded: u64) {
        self.with_render(|render| match render {
            ProgressRender::Fancy(inner) => inner.advance(downloaded),
            ProgressRender::Plain(inner) => inner.advance(downloaded),
        });
    }

    fn finish(&self) {
        self.with_render(|render| match render {
            ProgressRender::Fancy(inner) => inner.finish(),
            ProgressRender::Plain(inner) => inner.finish(),
        });
    }
}

// ============================================================================
// Fancy Terminal Progress (indicatif)
// ============================================================================

#[derive(Default)]
struct FancyProgress {
    bar: Option<ProgressBar>,
}

impl FancyProgress {
    fn start(&mut self, label: &str, total: Option<u64>) {
        self.finish();
        let bar = ProgressBar::with_draw_target(total, ProgressDrawTarget::stderr());
        if total.is_some() {
            bar.set_style(bar_style());
        } else {
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(120));
        }
        bar.set_message(format_label(label));
        self.bar = Some(bar);
    }

    fn advance(&self, downloaded: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(downloaded);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} {spinner} {human_bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .with_key("human_bytes", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{}", HumanBytes(state.pos()));
        })
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg} {bar:28.cyan/blue} {human_bytes:>9} / {human_total:>9} ({percent:>3}%) @ {binary_bytes_per_sec} ETA {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .with_key("human_bytes", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
        let _ = write!(w, "{}", HumanBytes(state.pos()));
    })
    .with_key("human_total", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
        let value = state
            .len()
            .map_or_else(|| "?".to_string(), |len| HumanBytes(len).to_string());
        let _ = write!(w, "{value}");
    })
}

fn format_label(raw: &str) -> String {
    const MAX_LABEL: usize = 40;
    if raw.chars().count() <= MAX_LABEL {
        return raw.to_string();
    }
    let mut buf: String = raw.chars().take(MAX_LABEL - 1).collect();
    buf.push('…');
    buf
}

// ============================================================================
// Plain Progress (non-terminal)
// ============================================================================

#[derive(Default)]
struct PlainProgress {
    label: String,
    total: Option<u64>,
    last_emit: Option<Instant>,
}

impl PlainProgress {
    fn start(&mut self, label: &str, total: Option<u64>) {
        label.clone_into(&mut self.label);
        self.total = total;
        self.last_emit = None;
    }

    fn advance(&mut self, downloaded: u64) {
        let complete = self.total.is_some_and(|t| downloaded >= t);
        let now = Instant::now();
        let due = self
            .last_emit
            .is_none_or(|last| now.duration_since(last) >= PLAIN_INTERVAL);
        if !due && !complete {
            return;
        }
        self.last_emit = Some(now);
        info!("{}", progress_line(&self.label, downloaded, self.total));
    }

    fn finish(&mut self) {
        self.last_emit = None;
    }
}

fn progress_line(label: &str, downloaded: u64, total: Option<u64>) -> String {
    match total.filter(|t| *t > 0) {
        Some(total) => {
            #[allow(clippy::cast_precision_loss)]
            let percent = (downloaded as f64 / total as f64) * 100.0;
            format!(
                "Progress [{label}]: {percent:.1}% ({} / {})",
                HumanBytes(downloaded),
                HumanBytes(total)
            )
        }
        None => format!("Progress [{label}]: {} downloaded", HumanBytes(downloaded)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_label_short() {
        assert_eq!(format_label("model.safetensors"), "model.safetensors");
    }

    #[test]
    fn test_format_label_truncates_long() {
        let result = format_label(&"a".repeat(50));
        assert_eq!(result.chars().count(), 40);
        assert!(result.ends_with('…'));
    }

    #[test]
    fn test_progress_line_with_total() {
        let line = progress_line("m.bin", 512, Some(1024));
        assert!(line.starts_with("Progress [m.bin]: 50.0%"));
    }

    #[test]
    fn test_progress_line_without_total() {
        let line = progress_line("m.bin", 2048, None);
        assert!(line.ends_with("downloaded"));
    }

    #[test]
    fn test_plain_progress_throttles() {
        let mut plain = PlainProgress::default();
        plain.start("m.bin", Some(10 * 1024 * 1024));
        plain.advance(1024 * 1024);
        let first = plain.last_emit;
        plain.advance(2 * 1024 * 1024);
        assert_eq!(plain.last_emit, first);
        plain.advance(10 * 1024 * 1024);
        assert!(plain.last_emit >= first);
    }

    #[test]
    fn test_printer_accepts_events_in_any_state() {
        let printer = CliProgressPrinter::new();
        printer.advance(10);
        printer.finish();
        printer.start("m.bin", None);
        printer.advance(10);
        printer.finish();
    }
}
