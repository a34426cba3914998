use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::calendar::{AgendaBody, CalendarView, CellKind, DayCell, EventMarker};
use crate::config::Config;

const CELL_WIDTH: usize = 5;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.output.color,
        }
    }

    #[tracing::instrument(skip(self, view), fields(month = %view.month))]
    pub fn print_calendar(&mut self, view: &CalendarView) -> anyhow::Result<()> {
        let color = self.color && io::stdout().is_terminal();
        let mut out = io::stdout().lock();
        write_calendar(&mut out, view, color)
    }

    pub fn print_line(&mut self, line: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        Ok(())
    }
}

/// Writes the month grid followed by the day's task list.
///
/// Today is drawn as `[dd]`, the selected day as `<dd>`. Each week row is
/// followed by a marker row (one dot per shown event, `+n` for the rest)
/// when any day of that week has events.
pub fn write_calendar<W: Write>(
    mut writer: W,
    view: &CalendarView,
    color: bool,
) -> anyhow::Result<()> {
    let grid_width = CELL_WIDTH * 7;

    writeln!(writer, "{}", center(&view.title, grid_width))?;
    for label in &view.weekday_labels {
        write!(writer, "{}", pad_left(label, CELL_WIDTH))?;
    }
    writeln!(writer)?;

    for week in view.grid.weeks() {
        for cell in week {
            let text = pad_left(&day_text(cell), CELL_WIDTH);
            let text = if cell.kind == CellKind::Current {
                text
            } else {
                paint(&text, "2", color)
            };
            write!(writer, "{text}")?;
        }
        writeln!(writer)?;

        if week.iter().any(|cell| !cell.markers.is_empty()) {
            for cell in week {
                let plain = marker_text(&cell.markers, cell.overflow);
                let padding = CELL_WIDTH.saturating_sub(UnicodeWidthStr::width(plain.as_str()));
                write!(
                    writer,
                    "{}{}",
                    " ".repeat(padding),
                    painted_markers(&cell.markers, cell.overflow, color)
                )?;
            }
            writeln!(writer)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "{}", view.agenda.heading)?;
    match &view.agenda.body {
        AgendaBody::Entries(entries) => {
            for entry in entries {
                let check = if entry.completed { "[x]" } else { "[ ]" };
                let time = entry
                    .time
                    .as_deref()
                    .map(|time| format!("{time} "))
                    .unwrap_or_default();
                let bullet = paint("●", &ansi_rgb(&entry.color), color);
                writeln!(
                    writer,
                    "  {bullet} {check} {time}{}  {}",
                    entry.title, entry.url
                )?;
            }
        }
        AgendaBody::Empty(message) => {
            writeln!(writer, "  {message}")?;
        }
    }

    Ok(())
}

fn day_text(cell: &DayCell) -> String {
    if cell.is_today {
        format!("[{:>2}]", cell.day)
    } else if cell.is_selected {
        format!("<{:>2}>", cell.day)
    } else {
        format!("{:>2} ", cell.day)
    }
}

fn marker_text(markers: &[EventMarker], overflow: usize) -> String {
    let mut text = "•".repeat(markers.len());
    if overflow > 0 {
        text.push_str(&format!("+{overflow}"));
    }
    text
}

fn painted_markers(markers: &[EventMarker], overflow: usize, color: bool) -> String {
    let mut text = markers
        .iter()
        .map(|marker| {
            let code = if marker.completed {
                "2".to_string()
            } else {
                ansi_rgb(&marker.color)
            };
            paint("•", &code, color)
        })
        .collect::<String>();
    if overflow > 0 {
        text.push_str(&format!("+{overflow}"));
    }
    text
}

/// `#RRGGBB` to a 24-bit foreground SGR code.
fn ansi_rgb(hex: &str) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|raw| u8::from_str_radix(raw, 16).ok())
            .unwrap_or(0)
    };
    format!("38;2;{};{};{}", channel(1..3), channel(3..5), channel(5..7))
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    format!("\x1b[{code}m{text}\x1b[0m")
}

fn pad_left(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", " ".repeat(padding), text)
}

fn center(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", " ".repeat(padding / 2), text)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::calendar::{CalendarController, CalendarEvent, ControllerOptions};
    use crate::datetime::FixedClock;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn rendered(controller: &CalendarController<FixedClock>) -> String {
        let mut buf = Vec::new();
        write_calendar(&mut buf, &controller.render(), false).expect("write calendar");
        String::from_utf8(buf).expect("utf8 output")
    }

    #[test]
    fn plain_output_marks_today_and_lists_agenda() {
        let mut controller =
            CalendarController::new(FixedClock(ymd(2024, 3, 15)), ControllerOptions::default());
        let request = controller.initialize();
        controller.complete_fetch(
            &request,
            Ok(vec![CalendarEvent::new(
                ymd(2024, 3, 15),
                "Ship release",
                "/tasks/7/",
                "#3B82F6",
                true,
            )]),
        );

        let output = rendered(&controller);
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[0].trim(), "March 2024");
        assert!(lines[1].starts_with("  Mon  Tue"));
        assert!(output.contains("[15]"));
        assert!(output.contains("Tasks for 15 March"));
        assert!(output.contains("[x] Ship release  /tasks/7/"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn empty_day_prints_message() {
        let mut controller =
            CalendarController::new(FixedClock(ymd(2024, 3, 15)), ControllerOptions::default());
        controller.initialize();
        controller.select_date("2024-03-16").expect("valid key");

        let output = rendered(&controller);
        assert!(output.contains("<16>"));
        assert!(output.contains("No tasks for this day"));
    }

    #[test]
    fn marker_row_shows_overflow() {
        let markers = vec![
            EventMarker {
                color: "#EF4444".to_string(),
                completed: false,
            };
            3
        ];
        assert_eq!(marker_text(&markers, 2), "•••+2");
        assert_eq!(ansi_rgb("#EF4444"), "38;2;239;68;68");
    }
}
