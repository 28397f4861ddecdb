use std::time::Instant;

use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::style::Color;
use tracing::{debug, info, warn};

use crate::chart::{self, DrawList};
use crate::color::{ColorAssigner, SubjectColor};
use crate::db::{self, BlobStore, RecordsHealth};
use crate::stats::{Totals, compute_range_totals};
use crate::timer::{StartOutcome, TimerEngine};
use crate::types::{Mode, Range, Records, Settings};

use super::{
    Action, AppEvent, AppView, BAR_SURFACE, DurationPopup, FACE_SURFACE, PIE_SURFACE,
    SubjectPopup,
};

/// The top-level application state. Owns everything the timer, the
/// statistics and the charts read or write.
pub struct App {
    pub running: bool,
    store: Box<dyn BlobStore>,
    pub view: AppView,
    pub settings: Settings,
    pub records: Records,
    records_health: RecordsHealth,
    pub engine: TimerEngine,
    colors: ColorAssigner,
    pub range: Range,
    pub selected_subject_index: usize,
    pub totals: Totals,
    pub bar_chart: DrawList,
    pub pie_chart: DrawList,
    pub face: DrawList,
    pub status: Option<String>,
    pub duration_popup: Option<DurationPopup>,
    pub subject_popup: Option<SubjectPopup>,
}

impl App {
    pub fn new(store: Box<dyn BlobStore>) -> Self {
        let settings = db::load_settings(store.as_ref());
        let (records, records_health) = db::load_records(store.as_ref());
        let status = records_status(&records_health);
        let engine = TimerEngine::new(settings.mode);
        let mut app = Self {
            running: true,
            store,
            view: AppView::Main,
            settings,
            records,
            records_health,
            engine,
            colors: ColorAssigner::new(),
            range: Range::Month,
            selected_subject_index: 0,
            totals: Totals::default(),
            bar_chart: DrawList::new(BAR_SURFACE.0, BAR_SURFACE.1),
            pie_chart: DrawList::new(PIE_SURFACE.0, PIE_SURFACE.1),
            face: DrawList::new(FACE_SURFACE.0, FACE_SURFACE.1),
            status,
            duration_popup: None,
            subject_popup: None,
        };

        app.refresh_stats();
        app.redraw_face();

        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(Instant::now()),
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    pub fn selected_subject(&self) -> Option<&str> {
        self.settings
            .subjects
            .get(self.selected_subject_index)
            .map(String::as_str)
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Color a subject was bound to by the last chart draw, if any.
    pub fn subject_color(&self, subject: &str) -> Option<Color> {
        self.colors.get(subject).map(SubjectColor::to_color)
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "dispatch");
        match action {
            Action::Start => self.start_timer(),
            Action::Stop => {
                self.engine.stop();
                self.redraw_face();
            }
            Action::Reset => {
                self.engine.reset();
                self.clear_status();
                self.redraw_face();
            }
            Action::Commit => self.commit(),
            Action::SetMode(mode) => self.set_mode(mode),
            Action::ToggleMode => self.set_mode(self.engine.mode().toggled()),
            Action::OpenDurationPopup => self.open_duration_popup(),
            Action::ConfigureDuration { hours, minutes } => {
                self.configure_duration(hours, minutes)
            }
            Action::OpenSubjectPopup => self.subject_popup = Some(SubjectPopup::default()),
            Action::AddSubject(name) => self.add_subject(&name),
            Action::NextSubject => {
                let len = self.settings.subjects.len();
                if len > 0 {
                    self.selected_subject_index = (self.selected_subject_index + 1) % len;
                }
            }
            Action::PrevSubject => {
                let len = self.settings.subjects.len();
                if len > 0 {
                    self.selected_subject_index = if self.selected_subject_index == 0 {
                        len - 1
                    } else {
                        self.selected_subject_index - 1
                    };
                }
            }
            Action::SelectRange(range) => {
                self.range = range;
                self.refresh_stats();
            }
            Action::ToggleHelp => {
                self.view = match self.view {
                    AppView::Main => AppView::Help,
                    AppView::Help => AppView::Main,
                };
            }
            Action::Quit => self.running = false,
        }
    }

    fn on_tick(&mut self, now: Instant) {
        let poll = self.engine.poll(now);
        if poll.ticks > 0 {
            self.redraw_face();
        }
        if poll.finished {
            self.status = Some("Time's up! Press c to record it.".to_string());
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.duration_popup.is_some() {
            self.handle_duration_key(key);
            return;
        }
        if self.subject_popup.is_some() {
            self.handle_subject_key(key);
            return;
        }

        if let Some(action) = self.action_for_key(key) {
            self.dispatch(action);
        }
    }

    fn action_for_key(&self, key: KeyCode) -> Option<Action> {
        if self.view == AppView::Help {
            return match key {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') | KeyCode::Esc => Some(Action::ToggleHelp),
                _ => None,
            };
        }
        let action = match key {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('s') | KeyCode::Char(' ') => Action::Start,
            KeyCode::Char('x') => Action::Stop,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('c') => Action::Commit,
            KeyCode::Char('m') => Action::ToggleMode,
            KeyCode::Char('d') => Action::OpenDurationPopup,
            KeyCode::Char('a') => Action::OpenSubjectPopup,
            KeyCode::Char('1') => Action::SelectRange(Range::Day),
            KeyCode::Char('2') => Action::SelectRange(Range::Week),
            KeyCode::Char('3') => Action::SelectRange(Range::Month),
            KeyCode::Tab | KeyCode::Right => Action::SelectRange(self.range.next()),
            KeyCode::BackTab | KeyCode::Left => Action::SelectRange(self.range.prev()),
            KeyCode::Up => Action::PrevSubject,
            KeyCode::Down => Action::NextSubject,
            _ => return None,
        };
        Some(action)
    }

    fn handle_duration_key(&mut self, key: KeyCode) {
        let Some(popup) = self.duration_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.duration_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => {
                let (hours, minutes) = popup.values();
                self.dispatch(Action::ConfigureDuration { hours, minutes });
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => popup.switch_field(),
            KeyCode::Backspace | KeyCode::Delete => popup.pop(),
            KeyCode::Char(ch) => popup.push_digit(ch),
            _ => {}
        }
    }

    fn handle_subject_key(&mut self, key: KeyCode) {
        let Some(popup) = self.subject_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.subject_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => {
                let name = popup.name.clone();
                self.dispatch(Action::AddSubject(name));
            }
            KeyCode::Backspace | KeyCode::Delete => {
                popup.name.pop();
            }
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                popup.name.push(ch);
            }
            _ => {}
        }
    }

    fn start_timer(&mut self) {
        match self.engine.start() {
            StartOutcome::Started => {
                self.clear_status();
                self.redraw_face();
            }
            StartOutcome::AlreadyRunning => {}
            StartOutcome::NeedsDuration => self.open_duration_popup(),
            StartOutcome::NeedsReset => {
                self.status = Some("Countdown finished. Press r to reset.".to_string());
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        self.engine.set_mode(mode);
        info!(mode = mode.label(), "mode changed");
        self.clear_status();
        self.redraw_face();
    }

    fn open_duration_popup(&mut self) {
        if self.engine.mode() != Mode::Countdown {
            self.status = Some("Durations only apply in timer mode.".to_string());
            return;
        }
        self.duration_popup = Some(DurationPopup::new());
    }

    fn configure_duration(&mut self, hours: u32, minutes: u32) {
        if hours == 0 && minutes == 0 {
            self.status = Some("Duration must be longer than zero.".to_string());
            return;
        }
        self.duration_popup = None;
        if self.engine.configure_duration(hours, minutes) {
            self.status = Some(format!(
                "Timer set to {}. Press s to start.",
                chart::format_minutes(hours.saturating_mul(60).saturating_add(minutes))
            ));
            self.redraw_face();
        }
    }

    fn commit(&mut self) {
        let Some(subject) = self.selected_subject().map(str::to_string) else {
            self.status = Some("Add a subject first.".to_string());
            return;
        };
        let today = Local::now().date_naive();
        let Some(minutes) = self.engine.commit(&subject, today, &mut self.records) else {
            self.status = Some("Nothing to record yet.".to_string());
            return;
        };
        info!(subject = %subject, minutes, "recorded study time");
        let saved = db::save_records(
            self.store.as_ref(),
            &self.records,
            &mut self.records_health,
        );
        if let Err(err) = saved {
            warn!("failed to save records: {err:#}");
            self.status = Some(format!("Failed to save records: {err}"));
        } else {
            self.status = Some(format!(
                "Recorded {} of {subject}.",
                chart::format_minutes(minutes)
            ));
        }
        self.refresh_stats();
    }

    fn add_subject(&mut self, name: &str) {
        self.subject_popup = None;
        let Some(added) = self.settings.add_subject(name) else {
            return;
        };
        info!(subject = %added, "subject added");
        self.selected_subject_index = self.settings.subjects.len() - 1;
        if let Err(err) = db::save_settings(self.store.as_ref(), &self.settings) {
            warn!("failed to save settings: {err:#}");
            self.status = Some(format!("Failed to save settings: {err}"));
        } else {
            self.status = Some(format!("Added {added}."));
        }
    }

    fn refresh_stats(&mut self) {
        self.totals = compute_range_totals(&self.records, self.range, Local::now());
        self.bar_chart.clear();
        chart::bar::draw(&mut self.bar_chart, &self.totals, &mut self.colors);
        self.pie_chart.clear();
        chart::pie::draw(&mut self.pie_chart, &self.totals, &mut self.colors);
    }

    fn redraw_face(&mut self) {
        self.face.clear();
        chart::face::draw(&mut self.face, &self.engine);
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

fn records_status(health: &RecordsHealth) -> Option<String> {
    match health {
        RecordsHealth::Clean => None,
        RecordsHealth::Salvaged { skipped, .. } => Some(format!(
            "Skipped {skipped} unreadable record entries. The old data is backed up on the next save."
        )),
        RecordsHealth::Unreadable => {
            Some("Saved records could not be read. New sessions will not be saved.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::timer::TimerStatus;
    use crate::types::date_key;

    fn app() -> App {
        App::new(Box::new(MemoryStore::default()))
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.update(AppEvent::KeyPress(*key));
        }
    }

    fn today() -> String {
        date_key(Local::now().date_naive())
    }

    #[test]
    fn starts_with_defaults() {
        let app = app();
        assert_eq!(app.selected_subject(), Some("Math"));
        assert_eq!(app.engine.mode(), Mode::Countdown);
        assert_eq!(app.range, Range::Month);
        assert!(!app.has_records());
        assert_eq!(app.face.texts().collect::<Vec<_>>(), vec!["00:00"]);
    }

    #[test]
    fn starting_countdown_without_duration_prompts() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('s')]);
        assert!(app.duration_popup.is_some());
        assert!(!app.engine.is_running());

        press(
            &mut app,
            &[
                KeyCode::Char('2'),
                KeyCode::Tab,
                KeyCode::Char('1'),
                KeyCode::Enter,
            ],
        );
        assert!(app.duration_popup.is_none());
        assert_eq!(app.engine.total_seconds(), 3600 + 120);
        assert!(!app.engine.is_running());
        assert_eq!(app.face.texts().collect::<Vec<_>>(), vec!["62:00"]);
    }

    #[test]
    fn zero_duration_keeps_popup_open() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('d'), KeyCode::Enter]);
        assert!(app.duration_popup.is_some());
        assert_eq!(app.engine.total_seconds(), 0);
        press(&mut app, &[KeyCode::Esc]);
        assert!(app.duration_popup.is_none());
    }

    #[test]
    fn commit_writes_today_and_persists() {
        let mut app = app();
        app.dispatch(Action::SetMode(Mode::Stopwatch));
        app.dispatch(Action::Start);
        for _ in 0..125 {
            app.engine.tick();
        }
        app.dispatch(Action::Stop);
        app.dispatch(Action::Commit);

        assert_eq!(app.records[&today()]["Math"], 2);
        assert_eq!(app.totals.get("Math"), Some(2));
        assert!(!app.bar_chart.commands().is_empty());
        assert!(!app.pie_chart.commands().is_empty());

        let (stored, _) = db::load_records(app.store.as_ref());
        assert_eq!(stored[&today()]["Math"], 2);

        app.dispatch(Action::Commit);
        assert_eq!(app.records[&today()]["Math"], 4);
        assert_eq!(app.engine.status(), TimerStatus::Stopped);
    }

    fn record_sixty_seconds(app: &mut App) {
        app.dispatch(Action::SetMode(Mode::Stopwatch));
        app.dispatch(Action::Start);
        for _ in 0..60 {
            app.engine.tick();
        }
        app.dispatch(Action::Stop);
        app.dispatch(Action::Commit);
    }

    #[test]
    fn commit_keeps_history_next_to_a_bad_entry() {
        let store = MemoryStore::default();
        store
            .set(
                "records",
                r#"{"2024-06-01":{"Math":30},"2024-06-02":{"Math":12.5}}"#,
            )
            .unwrap();
        let mut app = App::new(Box::new(store));
        assert!(app.status.is_some());

        record_sixty_seconds(&mut app);
        assert_eq!(app.records["2024-06-01"]["Math"], 30);
        assert_eq!(app.records[&today()]["Math"], 1);

        let (stored, _) = db::load_records(app.store.as_ref());
        assert_eq!(stored["2024-06-01"]["Math"], 30);
        assert_eq!(stored[&today()]["Math"], 1);
    }

    struct UnreadableStore;

    impl BlobStore for UnreadableStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("disk I/O error"))
        }

        fn set(&self, key: &str, _value: &str) -> anyhow::Result<()> {
            panic!("unexpected write to {key}");
        }
    }

    #[test]
    fn unreadable_records_are_never_overwritten() {
        let mut app = App::new(Box::new(UnreadableStore));
        record_sixty_seconds(&mut app);
        assert_eq!(app.records[&today()]["Math"], 1);
        let status = app.status.clone().unwrap_or_default();
        assert!(status.starts_with("Failed to save records"), "{status}");
    }

    #[test]
    fn empty_commit_is_a_no_op() {
        let mut app = app();
        app.dispatch(Action::ConfigureDuration {
            hours: 0,
            minutes: 25,
        });
        app.dispatch(Action::Commit);
        assert!(app.records.is_empty());
        assert_eq!(app.store.get("records").unwrap(), None);
    }

    #[test]
    fn add_subject_selects_and_persists() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('a')]);
        for ch in "Art".chars() {
            press(&mut app, &[KeyCode::Char(ch)]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.selected_subject(), Some("Art"));
        let stored = db::load_settings(app.store.as_ref());
        assert_eq!(stored.subjects.last().map(String::as_str), Some("Art"));

        app.dispatch(Action::AddSubject("Art".to_string()));
        assert_eq!(
            app.settings.subjects.iter().filter(|s| *s == "Art").count(),
            1
        );
    }

    #[test]
    fn subject_navigation_wraps() {
        let mut app = app();
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.selected_subject_index, app.settings.subjects.len() - 1);
        press(&mut app, &[KeyCode::Down]);
        assert_eq!(app.selected_subject_index, 0);
    }

    #[test]
    fn range_keys_recompute_totals() {
        let mut app = app();
        app.records
            .entry("2000-01-01".to_string())
            .or_default()
            .insert("Math".to_string(), 30);
        app.dispatch(Action::SelectRange(Range::Day));
        assert!(app.totals.is_empty());
        assert!(app.bar_chart.commands().is_empty());
        press(&mut app, &[KeyCode::Char('3')]);
        assert_eq!(app.range, Range::Month);
        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.range, Range::Day);
    }

    #[test]
    fn mode_toggle_discards_session() {
        let mut app = app();
        app.dispatch(Action::ConfigureDuration {
            hours: 0,
            minutes: 10,
        });
        app.dispatch(Action::Start);
        press(&mut app, &[KeyCode::Char('m')]);
        assert_eq!(app.engine.mode(), Mode::Stopwatch);
        assert_eq!(app.engine.total_seconds(), 0);
        assert!(!app.engine.is_running());
    }

    #[test]
    fn duration_popup_refused_in_stopwatch() {
        let mut app = app();
        app.dispatch(Action::SetMode(Mode::Stopwatch));
        app.dispatch(Action::OpenDurationPopup);
        assert!(app.duration_popup.is_none());
        assert!(app.status.is_some());
    }

    #[test]
    fn help_and_quit() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('?')]);
        assert_eq!(app.view, AppView::Help);
        press(&mut app, &[KeyCode::Char('s')]);
        assert!(app.duration_popup.is_none());
        press(&mut app, &[KeyCode::Esc, KeyCode::Char('q')]);
        assert!(!app.running);
    }
}
