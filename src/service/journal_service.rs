use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::info;

use super::diary_api::DiaryApi;
use crate::errors::{DiaryError, DiaryResult};
use crate::models::photo::{self, NewPhoto, Photo};
use crate::models::response::{Ack, Health, Question, Recognition};
use crate::models::song::{self, AudioClip, NewSong, Song};

/// Songs, photos and questions: everything except the calendar view.
pub struct JournalService;

impl JournalService {
    pub async fn health<A: DiaryApi + ?Sized>(api: &A) -> DiaryResult<Health> {
        api.health().await
    }

    pub async fn songs<A: DiaryApi + ?Sized>(api: &A) -> DiaryResult<Vec<Song>> {
        api.songs().await
    }

    pub async fn photos<A: DiaryApi + ?Sized>(api: &A) -> DiaryResult<Vec<Photo>> {
        api.photos().await
    }

    pub async fn add_song<A: DiaryApi + ?Sized>(
        api: &A,
        title: &str,
        artist: Option<&str>,
    ) -> DiaryResult<Ack> {
        let song = NewSong::new(title, artist);
        if song.title.is_empty() {
            return Err(DiaryError::InvalidInput("Title is required".to_string()));
        }
        let ack = api.add_song(&song).await?;
        info!(title = %song.title, "song logged");
        Ok(ack)
    }

    pub async fn add_photo<A: DiaryApi + ?Sized>(
        api: &A,
        path: &Path,
        label: Option<&str>,
    ) -> DiaryResult<Ack> {
        let subtype = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(photo::image_subtype)
            .ok_or_else(|| {
                DiaryError::InvalidInput(format!(
                    "{} is not a png, jpeg, gif or webp image",
                    path.display()
                ))
            })?;
        let bytes = read_file(path).await?;
        if bytes.is_empty() {
            return Err(DiaryError::InvalidInput(format!("{} is empty", path.display())));
        }
        let new_photo = NewPhoto {
            data_url: encode_data_url(subtype, &bytes),
            label: label.map(str::trim).unwrap_or_default().to_string(),
        };
        let ack = Self::upload_photo(api, &new_photo).await?;
        info!(path = %path.display(), bytes = bytes.len(), "photo uploaded");
        Ok(ack)
    }

    /// Sends an already encoded photo. The data URL must carry an image type.
    pub async fn upload_photo<A: DiaryApi + ?Sized>(
        api: &A,
        new_photo: &NewPhoto,
    ) -> DiaryResult<Ack> {
        if !photo::is_image_data_url(&new_photo.data_url) {
            return Err(DiaryError::InvalidInput("Invalid data URL format".to_string()));
        }
        api.add_photo(new_photo).await
    }

    pub async fn recognize<A: DiaryApi + ?Sized>(api: &A, path: &Path) -> DiaryResult<Recognition> {
        let bytes = read_file(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording")
            .to_string();
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .map(song::audio_mime)
            .unwrap_or("application/octet-stream")
            .to_string();
        api.recognize_song(AudioClip {
            file_name,
            mime,
            bytes,
        })
        .await
    }

    pub async fn ask<A: DiaryApi + ?Sized>(api: &A, question: &str) -> DiaryResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DiaryError::InvalidInput("Question is required".to_string()));
        }
        let answer = api
            .ask(&Question {
                question: question.to_string(),
            })
            .await?;
        Ok(answer.answer.unwrap_or_default())
    }

    pub async fn delete_photo<A: DiaryApi + ?Sized>(api: &A, id: i64) -> DiaryResult<Ack> {
        let ack = api.delete_photo(id).await?;
        info!(id, "photo deleted");
        Ok(ack)
    }

    pub async fn clear_history<A: DiaryApi + ?Sized>(api: &A) -> DiaryResult<Ack> {
        let ack = api.clear_history().await?;
        info!("history cleared");
        Ok(ack)
    }
}

pub fn encode_data_url(subtype: &str, bytes: &[u8]) -> String {
    format!("{}{};base64,{}", photo::DATA_URL_PREFIX, subtype, STANDARD.encode(bytes))
}

async fn read_file(path: &Path) -> DiaryResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| DiaryError::Io {
        path: path.display().to_string(),
        source,
    })
}
