//! Local status display: page rotation and frame composition.
//!
//! Two pages alternate on the display-toggle cadence:
//!
//! ```text
//!   Gases                 Climate
//!   MQ135: 1234           Temp: 23.4 C
//!   MQ8:    210           Hum:  45.6 %
//!   MQ9:   3100           Fan:  100 %
//!   Dust:   180           WiFi: OK
//! ```
//!
//! A recalibration switches to a transient `Calibrating` page and holds it
//! for the feedback window; page toggles that fall inside the window are
//! skipped. The presenter only produces text; drawing belongs to the OLED
//! driver behind [`DisplayPort`](crate::app::ports::DisplayPort).

use core::fmt::{self, Write};

use crate::app::state::DeviceState;
use crate::connectivity::ConnectivityState;

/// 128 px / 6 px per glyph.
pub const LINE_CHARS: usize = 21;
/// 64 px / 16 px line pitch.
pub const MAX_LINES: usize = 4;

pub type DisplayLine = heapless::String<LINE_CHARS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPage {
    #[default]
    Gases,
    Climate,
    Calibrating,
}

/// Up to four lines of text, each truncated to the panel width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayFrame {
    lines: heapless::Vec<DisplayLine, MAX_LINES>,
}

impl DisplayFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a formatted line. Overlong text is cut at the panel width;
    /// lines past the fourth are dropped.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) {
        let mut line = Truncating(DisplayLine::new());
        let _ = line.write_fmt(args);
        let _ = self.lines.push(line.0);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(DisplayLine::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// `fmt::Write` that silently stops at capacity instead of failing.
struct Truncating(DisplayLine);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

pub struct DisplayPresenter {
    /// Rolling page (never `Calibrating`).
    page: DisplayPage,
    /// Uptime at which the calibration page ends.
    feedback_until: Option<u64>,
}

impl Default for DisplayPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPresenter {
    pub fn new() -> Self {
        Self {
            page: DisplayPage::Gases,
            feedback_until: None,
        }
    }

    /// Display-toggle task. Flips the rolling page unless the calibration
    /// page is being held. Returns the page now showing.
    pub fn on_page_tick(&mut self, now_ms: u64) -> DisplayPage {
        if self.in_feedback(now_ms) {
            return DisplayPage::Calibrating;
        }
        self.feedback_until = None;
        self.page = match self.page {
            DisplayPage::Gases => DisplayPage::Climate,
            _ => DisplayPage::Gases,
        };
        self.page
    }

    /// Show the calibration page for `window_ms` from `now_ms`.
    pub fn begin_calibration_feedback(&mut self, now_ms: u64, window_ms: u32) {
        self.feedback_until = Some(now_ms.saturating_add(u64::from(window_ms)));
    }

    /// Clears an elapsed feedback window. Returns `true` once, on the
    /// call that cleared it, so the caller can redraw the rolling page.
    pub fn expire_feedback(&mut self, now_ms: u64) -> bool {
        match self.feedback_until {
            Some(until) if now_ms >= until => {
                self.feedback_until = None;
                true
            }
            _ => false,
        }
    }

    pub fn current_page(&self, now_ms: u64) -> DisplayPage {
        if self.in_feedback(now_ms) {
            DisplayPage::Calibrating
        } else {
            self.page
        }
    }

    fn in_feedback(&self, now_ms: u64) -> bool {
        self.feedback_until.is_some_and(|until| now_ms < until)
    }

    /// Build the text for `page` from the current device state.
    pub fn compose(page: DisplayPage, state: &DeviceState) -> DisplayFrame {
        let mut f = DisplayFrame::new();
        match page {
            DisplayPage::Gases => {
                let g = &state.gas;
                f.push_fmt(format_args!("MQ135: {:>5}", g.mq135));
                f.push_fmt(format_args!("MQ8:   {:>5}", g.mq8));
                f.push_fmt(format_args!("MQ9:   {:>5}", g.mq9));
                f.push_fmt(format_args!("Dust:  {:>5}", g.dust));
            }
            DisplayPage::Climate => {
                f.push_fmt(format_args!("Temp: {:.1} C", state.climate.temperature_c));
                f.push_fmt(format_args!("Hum:  {:.1} %", state.climate.humidity_pct));
                f.push_fmt(format_args!("Fan:  {} %", state.actuator.duty_percent()));
                f.push_fmt(format_args!("WiFi: {}", link_glyph(state.connectivity)));
            }
            DisplayPage::Calibrating => {
                let o = state.offsets.values();
                f.push_fmt(format_args!("Calibrating..."));
                f.push_fmt(format_args!("clean-air baseline"));
                f.push_fmt(format_args!("135:{} 8:{}", o.mq135, o.mq8));
                f.push_fmt(format_args!("9:{} D:{}", o.mq9, o.dust));
            }
        }
        f
    }
}

fn link_glyph(state: ConnectivityState) -> &'static str {
    match state {
        ConnectivityState::Connected => "OK",
        ConnectivityState::Associating => "..",
        ConnectivityState::Disconnected => "--",
    }
}
