use chrono::{Datelike, NaiveDate};

use super::grid::{month_label, DayCell, MonthGrid, SkippedItem, WeekRow, DAYS_IN_WEEK};
use super::timestamp::{resolve, Zone};
use crate::models::song;

const CELL_WIDTH: usize = 6;
const WEEKDAYS: [&str; DAYS_IN_WEEK] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

pub fn render_month(grid: &MonthGrid, today: NaiveDate) -> String {
    let mut lines = Vec::with_capacity(grid.weeks.len() * 2 + 2);
    let width = CELL_WIDTH * DAYS_IN_WEEK;
    lines.push(format!("{:^width$}", month_label(grid.month)));
    lines.push(row(WEEKDAYS.iter().map(|wd| wd.to_string())));
    for week in &grid.weeks {
        lines.push(row(week.iter().map(|cell| day_number(grid, cell, today))));
        if week.has_content() {
            lines.push(counts_row(week));
        }
    }
    join_lines(lines)
}

pub fn render_day(cell: &DayCell, zone: &Zone) -> String {
    let mut lines = vec![cell.date.format("%A, %B %-d, %Y").to_string()];
    if cell.is_empty() {
        lines.push("No entries for this day".to_string());
        return join_lines(lines);
    }
    if !cell.songs.is_empty() {
        lines.push(format!("Songs ({})", cell.songs.len()));
        for s in &cell.songs {
            let title = song::describe(&s.title, s.artist.as_deref());
            lines.push(with_time(&title, &s.timestamp, zone));
        }
    }
    if !cell.photos.is_empty() {
        lines.push(format!("Photos ({})", cell.photos.len()));
        for p in &cell.photos {
            let label = p
                .label
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or("(untitled)");
            lines.push(with_time(label, &p.timestamp, zone));
        }
    }
    join_lines(lines)
}

pub fn render_skipped(skipped: &[SkippedItem]) -> Vec<String> {
    skipped
        .iter()
        .map(|s| format!("skipped {} #{}: {}", s.kind, s.index, s.reason))
        .collect()
}

fn day_number(grid: &MonthGrid, cell: &DayCell, today: NaiveDate) -> String {
    let day = cell.date.day();
    if cell.date == today {
        format!("[{day:2}]")
    } else if grid.in_month(cell.date) {
        day.to_string()
    } else {
        format!("·{day}")
    }
}

fn counts_row(week: &WeekRow) -> String {
    row(week.iter().map(|cell| {
        let mut s = String::new();
        if !cell.songs.is_empty() {
            s.push_str(&format!("♪{}", cell.songs.len()));
        }
        if !cell.photos.is_empty() {
            s.push_str(&format!("▣{}", cell.photos.len()));
        }
        s
    }))
}

fn row(cells: impl Iterator<Item = String>) -> String {
    cells
        .map(|c| format!("{c:>width$}", width = CELL_WIDTH))
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn with_time(text: &str, timestamp: &str, zone: &Zone) -> String {
    match resolve(timestamp, zone).ok().and_then(|r| r.time()) {
        Some(time) => format!("  {}  {}", text, time.format("%-I:%M %p")),
        None => format!("  {}", text),
    }
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
