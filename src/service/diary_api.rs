use async_trait::async_trait;

use crate::errors::DiaryResult;
use crate::models::calendar::CalendarData;
use crate::models::photo::{NewPhoto, Photo};
use crate::models::response::{Ack, Answer, Health, Question, Recognition};
use crate::models::song::{AudioClip, NewSong, Song};

/// The diary backend's REST surface.
#[async_trait]
pub trait DiaryApi: Send + Sync {
    async fn health(&self) -> DiaryResult<Health>;

    async fn songs(&self) -> DiaryResult<Vec<Song>>;

    async fn photos(&self) -> DiaryResult<Vec<Photo>>;

    async fn calendar_data(&self) -> DiaryResult<CalendarData>;

    async fn add_song(&self, song: &NewSong) -> DiaryResult<Ack>;

    async fn add_photo(&self, photo: &NewPhoto) -> DiaryResult<Ack>;

    async fn recognize_song(&self, clip: AudioClip) -> DiaryResult<Recognition>;

    async fn ask(&self, question: &Question) -> DiaryResult<Answer>;

    async fn delete_photo(&self, id: i64) -> DiaryResult<Ack>;

    async fn clear_history(&self) -> DiaryResult<Ack>;
}
