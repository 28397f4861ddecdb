mod state;

use crossterm::event::KeyCode;

use crate::types::{Mode, Range};

pub use state::App;

/// Logical sizes of the chart surfaces; the terminal canvas scales them.
pub const BAR_SURFACE: (f64, f64) = (420.0, 220.0);
pub const PIE_SURFACE: (f64, f64) = (220.0, 220.0);
pub const FACE_SURFACE: (f64, f64) = (220.0, 220.0);

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Main,
    Help,
}

/// Every state change the UI can request. Keys are mapped onto these and
/// applied by [`App::dispatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Reset,
    Commit,
    SetMode(Mode),
    ToggleMode,
    OpenDurationPopup,
    ConfigureDuration { hours: u32, minutes: u32 },
    OpenSubjectPopup,
    AddSubject(String),
    NextSubject,
    PrevSubject,
    SelectRange(Range),
    ToggleHelp,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationField {
    Hours,
    Minutes,
}

#[derive(Clone, Debug)]
pub struct DurationPopup {
    pub hours: String,
    pub minutes: String,
    pub field: DurationField,
}

impl DurationPopup {
    const MAX_DIGITS: usize = 3;

    pub fn new() -> Self {
        Self {
            hours: String::new(),
            minutes: String::new(),
            field: DurationField::Minutes,
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            DurationField::Hours => DurationField::Minutes,
            DurationField::Minutes => DurationField::Hours,
        };
    }

    pub fn push_digit(&mut self, ch: char) {
        if !ch.is_ascii_digit() {
            return;
        }
        let target = self.active_mut();
        if target.len() < Self::MAX_DIGITS {
            target.push(ch);
        }
    }

    pub fn pop(&mut self) {
        self.active_mut().pop();
    }

    /// Parsed `(hours, minutes)`; blank fields count as zero.
    pub fn values(&self) -> (u32, u32) {
        (parse_field(&self.hours), parse_field(&self.minutes))
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            DurationField::Hours => &mut self.hours,
            DurationField::Minutes => &mut self.minutes,
        }
    }
}

fn parse_field(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

#[derive(Clone, Debug, Default)]
pub struct SubjectPopup {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_popup_accepts_digits_only() {
        let mut popup = DurationPopup::new();
        popup.push_digit('2');
        popup.push_digit('x');
        popup.push_digit('5');
        popup.switch_field();
        popup.push_digit('1');
        assert_eq!(popup.values(), (1, 25));
        popup.pop();
        assert_eq!(popup.values(), (0, 25));
    }

    #[test]
    fn duration_fields_are_capped() {
        let mut popup = DurationPopup::new();
        for _ in 0..5 {
            popup.push_digit('9');
        }
        assert_eq!(popup.minutes, "999");
    }
}
