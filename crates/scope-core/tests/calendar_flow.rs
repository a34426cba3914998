use std::cell::{Cell, RefCell};
use std::fs;

use chrono::NaiveDate;
use scope_core::calendar::{
    AgendaBody, CalendarController, CalendarEvent, CalendarSession, CellKind, ControllerOptions,
    EventSource, Locale,
};
use scope_core::config::Config;
use scope_core::datetime::{DateRange, FixedClock, YearMonth};
use scope_core::error::CalendarError;
use tempfile::tempdir;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// In-memory backend that records every range it is asked for.
#[derive(Default)]
struct RecordingSource {
    events: Vec<CalendarEvent>,
    calls: RefCell<Vec<DateRange>>,
    slow_month: Option<YearMonth>,
    fail: Cell<bool>,
}

impl RecordingSource {
    fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl EventSource for RecordingSource {
    async fn fetch_events(&self, range: &DateRange) -> Result<Vec<CalendarEvent>, CalendarError> {
        self.calls.borrow_mut().push(*range);

        if self
            .slow_month
            .is_some_and(|month| month.first_day() == range.start)
        {
            for _ in 0..16 {
                tokio::task::yield_now().await;
            }
        }

        if self.fail.get() {
            return Err(CalendarError::fetch("backend unavailable"));
        }

        Ok(self
            .events
            .iter()
            .filter(|event| range.contains(event.start))
            .cloned()
            .collect())
    }
}

fn session(
    source: RecordingSource,
    today: NaiveDate,
) -> CalendarSession<RecordingSource, FixedClock> {
    let controller = CalendarController::new(FixedClock(today), ControllerOptions::default());
    CalendarSession::new(source, controller)
}

fn march_events() -> Vec<CalendarEvent> {
    vec![
        CalendarEvent::new(ymd(2024, 3, 15), "Pay rent", "/tasks/1/", "#EF4444", false),
        CalendarEvent::new(ymd(2024, 3, 15), "Call bank", "/tasks/2/", "#3B82F6", true),
    ]
}

#[tokio::test(flavor = "current_thread")]
async fn initial_view_lists_todays_tasks() {
    let session = session(RecordingSource::with_events(march_events()), ymd(2024, 3, 15));

    let view = session.initialize().await;
    assert_eq!(view.title, "March 2024");
    assert_eq!(view.grid.cells.len(), 35);
    assert_eq!(view.grid.leading, 4);

    let today = view
        .grid
        .cells
        .iter()
        .find(|cell| cell.is_today)
        .expect("today cell");
    assert_eq!(today.date_key(), "2024-03-15");
    assert_eq!(today.markers.len(), 2);

    assert_eq!(view.agenda.heading, "Tasks for 15 March");
    let titles = view
        .agenda
        .entries()
        .iter()
        .map(|entry| entry.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Pay rent", "Call bank"]);

    let calls = session.source().calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].start_key(), "2024-03-01");
    assert_eq!(calls[0].end_key(), "2024-03-31");
}

#[tokio::test(flavor = "current_thread")]
async fn selecting_a_day_never_fetches() {
    let session = session(RecordingSource::with_events(march_events()), ymd(2024, 3, 15));
    session.initialize().await;

    let view = session.select_date("2024-03-16").expect("valid key");
    assert_eq!(view.agenda.date_key(), "2024-03-16");
    assert_eq!(
        view.agenda.body,
        AgendaBody::Empty("No tasks for this day".to_string())
    );
    assert_eq!(session.source().call_count(), 1);

    let err = session.select_date("2024-3-16").expect_err("malformed key");
    assert_eq!(err, CalendarError::InvalidDateKey("2024-3-16".to_string()));
    assert_eq!(session.render().agenda.date_key(), "2024-03-16");
}

#[tokio::test(flavor = "current_thread")]
async fn rapid_navigation_keeps_the_last_month() {
    let source = RecordingSource {
        slow_month: YearMonth::new(2024, 4),
        ..RecordingSource::with_events(vec![
            CalendarEvent::new(ymd(2024, 4, 2), "April task", "/tasks/4/", "#10B981", false),
            CalendarEvent::new(ymd(2024, 5, 2), "May task", "/tasks/5/", "#10B981", false),
        ])
    };
    let session = session(source, ymd(2024, 3, 15));
    session.initialize().await;

    let (first, second) = tokio::join!(session.go_to_next_month(), session.go_to_next_month());

    assert_eq!(second.title, "May 2024");
    assert_eq!(first.title, "May 2024");
    assert_eq!(session.displayed(), YearMonth::new(2024, 5).expect("valid month"));

    let view = session.render();
    let marked = view
        .grid
        .cells
        .iter()
        .filter(|cell| !cell.markers.is_empty())
        .map(|cell| cell.date_key())
        .collect::<Vec<_>>();
    assert_eq!(marked, ["2024-05-02"]);
    assert_eq!(session.source().call_count(), 3);
}

#[tokio::test(flavor = "current_thread")]
async fn failed_fetch_still_renders_the_grid() {
    let source = RecordingSource::with_events(march_events());
    source.fail.set(true);
    let session = session(source, ymd(2024, 3, 15));

    let view = session.initialize().await;
    assert_eq!(view.grid.cells.len(), 35);
    assert!(view.grid.cells.iter().all(|cell| cell.markers.is_empty()));

    session.source().fail.set(false);
    let view = session.reload().await;
    assert_eq!(view.agenda.entries().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn year_boundary_navigation() {
    let session = session(RecordingSource::default(), ymd(2023, 12, 31));
    session.initialize().await;

    let view = session.go_to_next_month().await;
    assert_eq!(view.title, "January 2024");
    assert!(view.grid.cells.iter().all(|cell| !cell.is_today));
    assert_eq!(view.agenda.date_key(), "2023-12-31");

    let view = session.go_to_today().await;
    assert_eq!(view.title, "December 2023");
    let last = view
        .grid
        .cells
        .iter()
        .filter(|cell| cell.kind == CellKind::Current)
        .last()
        .expect("current cells");
    assert!(last.is_today);
}

#[test]
fn config_file_selects_locale_and_marker_limit() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("scope.toml");
    fs::write(
        &path,
        r#"
[server]
base_url = "http://tasks.internal:8080"
csrf_token = "abc123"

[calendar]
locale = "ru"
marker_limit = 2
timezone = "Europe/Moscow"

[output]
color = false
"#,
    )
    .expect("write config");

    let cfg = Config::load(Some(&path)).expect("load config");
    assert_eq!(cfg.locale(), Locale::Ru);
    assert_eq!(cfg.controller_options().marker_limit, 2);
    assert!(!cfg.output.color);
    assert_eq!(
        cfg.server.events_endpoint().expect("events url").as_str(),
        "http://tasks.internal:8080/api/calendar-events/"
    );

    let controller = CalendarController::new(FixedClock(ymd(2024, 3, 15)), cfg.controller_options());
    let view = controller.render();
    assert_eq!(view.title, "Март 2024");
    assert_eq!(view.agenda.heading, "Задачи на 15 марта");
}

#[test]
fn missing_config_file_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("absent.toml");
    assert!(Config::load(Some(&path)).is_err());
}
