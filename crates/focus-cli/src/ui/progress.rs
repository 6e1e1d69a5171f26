//! Live countdown bar for `focus watch`, using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

use super::context::UiContext;
use super::format::format_clock;

/// Bar filled as the session elapses. Falls back to one line per
/// whole minute when the terminal cannot animate.
pub struct CountdownBar {
    bar: Option<IndicatifBar>,
    total: u64,
    last_minute: Option<i64>,
}

impl CountdownBar {
    pub fn new(ctx: &UiContext, total_secs: i64, message: &str) -> Self {
        let total = total_secs.max(0) as u64;
        let bar = if ctx.allows_animation() {
            let pb = IndicatifBar::new(total);
            let template = if ctx.unicode {
                "{msg} [{bar:30.cyan/dim}] {prefix}"
            } else {
                "{msg} [{bar:30}] {prefix}"
            };
            let style = ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(if ctx.unicode { "━━─" } else { "=>-" });
            pb.set_style(style);
            pb.set_message(message.to_string());
            Some(pb)
        } else {
            None
        };

        Self {
            bar,
            total,
            last_minute: None,
        }
    }

    /// Show `remaining_secs` left on the clock.
    pub fn update(&mut self, remaining_secs: i64) {
        let remaining = remaining_secs.max(0);
        match &self.bar {
            Some(bar) => {
                bar.set_position(self.position(remaining));
                bar.set_prefix(format_clock(remaining));
            }
            None => {
                let minute = (remaining + 59) / 60;
                if self.last_minute != Some(minute) {
                    self.last_minute = Some(minute);
                    println!("remaining={}", format_clock(remaining));
                }
            }
        }
    }

    fn position(&self, remaining: i64) -> u64 {
        self.total.saturating_sub(remaining as u64)
    }

    /// Clear the bar from the terminal.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;

    fn plain_ctx() -> UiContext {
        UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    #[test]
    fn test_position_counts_elapsed() {
        let bar = CountdownBar::new(&plain_ctx(), 600, "Focus");
        assert_eq!(bar.position(600), 0);
        assert_eq!(bar.position(120), 480);
        assert_eq!(bar.position(0), 600);
    }

    #[test]
    fn test_plain_updates_once_per_minute() {
        let mut bar = CountdownBar::new(&plain_ctx(), 600, "Focus");
        bar.update(600);
        bar.update(599);
        assert_eq!(bar.last_minute, Some(10));
        bar.update(540);
        assert_eq!(bar.last_minute, Some(9));
        bar.finish();
    }
}
