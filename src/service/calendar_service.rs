use chrono::NaiveDate;
use tracing::info;

use super::diary_api::DiaryApi;
use crate::calendar::grid::month_label;
use crate::calendar::{build_month_grid, DayCell, MonthGrid, Zone};
use crate::errors::{DiaryError, DiaryResult};

pub struct CalendarService;

impl CalendarService {
    /// Fetches the calendar payload and buckets it into the month of `cursor`.
    pub async fn month<A: DiaryApi + ?Sized>(
        api: &A,
        cursor: NaiveDate,
        zone: &Zone,
    ) -> DiaryResult<MonthGrid> {
        let data = api.calendar_data().await?;
        let grid = build_month_grid(cursor, &data.songs, &data.photos, zone)?;
        info!(
            month = %grid.month,
            songs = data.songs.len(),
            photos = data.photos.len(),
            skipped = grid.skipped.len(),
            "calendar month loaded"
        );
        Ok(grid)
    }

    pub async fn day<A: DiaryApi + ?Sized>(
        api: &A,
        date: NaiveDate,
        zone: &Zone,
    ) -> DiaryResult<(DayCell, MonthGrid)> {
        let grid = Self::month(api, date, zone).await?;
        let cell = day_cell(&grid, date)?;
        Ok((cell, grid))
    }
}

fn day_cell(grid: &MonthGrid, date: NaiveDate) -> DiaryResult<DayCell> {
    grid.day(date).cloned().ok_or_else(|| {
        DiaryError::InvalidInput(format!(
            "{} is not shown in the {} grid",
            date,
            month_label(grid.month)
        ))
    })
}
