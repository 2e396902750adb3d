use std::array;
use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::{debug, warn};

use super::timestamp::{local_day, Zone};
use crate::errors::OutOfTimeError;
use crate::models::calendar::{CalendarPhoto, CalendarSong, Timestamped};

pub const DAYS_IN_WEEK: usize = 7;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub songs: Vec<CalendarSong>,
    pub photos: Vec<CalendarPhoto>,
}

impl DayCell {
    fn empty(date: NaiveDate) -> Self {
        DayCell {
            date,
            songs: Vec::new(),
            photos: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.photos.is_empty()
    }
}

/// Sunday through Saturday.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekRow {
    pub days: [DayCell; DAYS_IN_WEEK],
}

impl WeekRow {
    pub fn iter(&self) -> std::slice::Iter<'_, DayCell> {
        self.days.iter()
    }

    pub fn has_content(&self) -> bool {
        self.days.iter().any(|d| !d.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Song,
    Photo,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Song => f.write_str("song"),
            ItemKind::Photo => f.write_str("photo"),
        }
    }
}

/// An input item left out of the grid because its timestamp has no calendar
/// date. `index` is the item's position in its input list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedItem {
    pub kind: ItemKind,
    pub index: usize,
    pub timestamp: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    /// First day of the month the grid was built for.
    pub month: NaiveDate,
    pub weeks: Vec<WeekRow>,
    pub skipped: Vec<SkippedItem>,
}

impl MonthGrid {
    pub fn start(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.days[0].date)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|w| w.days[DAYS_IN_WEEK - 1].date)
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.weeks.iter().flat_map(WeekRow::iter)
    }

    pub fn day_count(&self) -> usize {
        self.weeks.len() * DAYS_IN_WEEK
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        let offset = usize::try_from((date - self.start()?).num_days()).ok()?;
        self.weeks
            .get(offset / DAYS_IN_WEEK)
            .map(|w| &w.days[offset % DAYS_IN_WEEK])
    }

    pub fn in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.month.year() && date.month() == self.month.month()
    }
}

/// First and last day of the month containing `cursor`.
pub fn month_bounds(cursor: NaiveDate) -> Result<(NaiveDate, NaiveDate), OutOfTimeError> {
    let first = cursor.with_day(1).ok_or(OutOfTimeError)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or(OutOfTimeError)?;
    Ok((first, last))
}

/// The Sunday on or before the 1st and the Saturday on or after the last day
/// of the month containing `cursor`.
pub fn grid_bounds(cursor: NaiveDate) -> Result<(NaiveDate, NaiveDate), OutOfTimeError> {
    let (first, last) = month_bounds(cursor)?;
    let lead = first.weekday().num_days_from_sunday();
    let trail = 6 - last.weekday().num_days_from_sunday();
    let start = first
        .checked_sub_days(Days::new(lead.into()))
        .ok_or(OutOfTimeError)?;
    let end = last
        .checked_add_days(Days::new(trail.into()))
        .ok_or(OutOfTimeError)?;
    Ok((start, end))
}

/// Buckets `songs` and `photos` into the week rows covering the month of
/// `cursor`. Only the year and month of `cursor` matter.
///
/// Each cell lists its items in input order. Items dated outside the grid are
/// not placed anywhere; items whose timestamp cannot be parsed are reported in
/// [`MonthGrid::skipped`] instead of failing the whole grid.
pub fn build_month_grid(
    cursor: NaiveDate,
    songs: &[CalendarSong],
    photos: &[CalendarPhoto],
    zone: &Zone,
) -> Result<MonthGrid, OutOfTimeError> {
    let (month, _) = month_bounds(cursor)?;
    let (start, end) = grid_bounds(cursor)?;
    let day_qty = usize::try_from((end - start).num_days() + 1).map_err(|_| OutOfTimeError)?;
    let week_qty = day_qty / DAYS_IN_WEEK;

    // Every date between `start` and `end` is representable, so the additions
    // below cannot overflow.
    let mut weeks: Vec<WeekRow> = (0..week_qty)
        .map(|w| WeekRow {
            days: array::from_fn(|i| {
                DayCell::empty(start + Days::new((w * DAYS_IN_WEEK + i) as u64))
            }),
        })
        .collect();

    let mut skipped = Vec::new();
    place(&mut weeks, start, songs, zone, &mut skipped);
    place(&mut weeks, start, photos, zone, &mut skipped);

    debug!(
        month = %month,
        grid_start = %start,
        grid_end = %end,
        weeks = weeks.len(),
        skipped = skipped.len(),
        "built month grid"
    );
    Ok(MonthGrid {
        month,
        weeks,
        skipped,
    })
}

/// Shifts `cursor` by `delta` months and returns the first day of that month.
pub fn shift_month(cursor: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let first = cursor.with_day(1)?;
    let months = Months::new(delta.unsigned_abs());
    if delta >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    }
}

pub fn month_label(month: NaiveDate) -> String {
    month.format("%B %Y").to_string()
}

trait CellItem: Timestamped + Clone {
    const KIND: ItemKind;

    fn slot(cell: &mut DayCell) -> &mut Vec<Self>;
}

impl CellItem for CalendarSong {
    const KIND: ItemKind = ItemKind::Song;

    fn slot(cell: &mut DayCell) -> &mut Vec<Self> {
        &mut cell.songs
    }
}

impl CellItem for CalendarPhoto {
    const KIND: ItemKind = ItemKind::Photo;

    fn slot(cell: &mut DayCell) -> &mut Vec<Self> {
        &mut cell.photos
    }
}

fn place<T: CellItem>(
    weeks: &mut [WeekRow],
    start: NaiveDate,
    items: &[T],
    zone: &Zone,
    skipped: &mut Vec<SkippedItem>,
) {
    for (index, item) in items.iter().enumerate() {
        match local_day(item.timestamp(), zone) {
            Ok(date) => {
                if let Some(cell) = cell_mut(weeks, start, date) {
                    T::slot(cell).push(item.clone());
                }
            }
            Err(err) => {
                let kind = T::KIND;
                warn!(
                    %kind,
                    index,
                    timestamp = item.timestamp(),
                    "skipping item with unparseable timestamp"
                );
                skipped.push(SkippedItem {
                    kind,
                    index,
                    timestamp: item.timestamp().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

fn cell_mut(weeks: &mut [WeekRow], start: NaiveDate, date: NaiveDate) -> Option<&mut DayCell> {
    // Negative offsets (before the grid) fail the conversion.
    let offset = usize::try_from((date - start).num_days()).ok()?;
    weeks
        .get_mut(offset / DAYS_IN_WEEK)
        .map(|w| &mut w.days[offset % DAYS_IN_WEEK])
}
