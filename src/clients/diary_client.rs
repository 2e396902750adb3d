use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::errors::{DiaryError, DiaryResult};
use crate::models::calendar::CalendarData;
use crate::models::photo::{NewPhoto, Photo};
use crate::models::response::{Ack, Answer, Health, Question, Recognition};
use crate::models::song::{AudioClip, NewSong, Song};
use crate::service::diary_api::DiaryApi;

pub const AUDIO_FIELD: &str = "audio_data";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiaryClient {
    http: Client,
    base: String,
}

impl DiaryClient {
    pub fn new(base: &str, timeout: Duration) -> DiaryResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| DiaryError::Transport {
                endpoint: "client".to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base, endpoint)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> DiaryResult<T> {
        debug!(endpoint, "diary request");
        let response = request.send().await.map_err(|source| DiaryError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        // read the body once
        let text = response.text().await.map_err(|source| DiaryError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| text.trim().to_string());
            error!(endpoint, %status, message = %message, "diary request rejected");
            return Err(DiaryError::Rejected {
                endpoint: endpoint.to_string(),
                status,
                message,
            });
        }

        serde_json::from_str(&text).map_err(|source| DiaryError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> DiaryResult<T> {
        self.send(endpoint, self.http.get(self.url(endpoint))).await
    }

    async fn acknowledged(&self, endpoint: &str, request: RequestBuilder) -> DiaryResult<Ack> {
        let ack: Ack = self.send(endpoint, request).await?;
        if ack.success {
            Ok(ack)
        } else {
            Err(DiaryError::Rejected {
                endpoint: endpoint.to_string(),
                status: StatusCode::OK,
                message: ack.message,
            })
        }
    }
}

#[async_trait]
impl DiaryApi for DiaryClient {
    async fn health(&self) -> DiaryResult<Health> {
        self.get("health").await
    }

    async fn songs(&self) -> DiaryResult<Vec<Song>> {
        self.get("songs").await
    }

    async fn photos(&self) -> DiaryResult<Vec<Photo>> {
        self.get("photos").await
    }

    async fn calendar_data(&self) -> DiaryResult<CalendarData> {
        self.get("calendar-data").await
    }

    async fn add_song(&self, song: &NewSong) -> DiaryResult<Ack> {
        let endpoint = "add-song";
        self.acknowledged(endpoint, self.http.post(self.url(endpoint)).json(song))
            .await
    }

    async fn add_photo(&self, photo: &NewPhoto) -> DiaryResult<Ack> {
        let endpoint = "add-photo";
        self.acknowledged(endpoint, self.http.post(self.url(endpoint)).json(photo))
            .await
    }

    async fn recognize_song(&self, clip: AudioClip) -> DiaryResult<Recognition> {
        let endpoint = "recognize-song";
        let part = Part::bytes(clip.bytes)
            .file_name(clip.file_name)
            .mime_str(&clip.mime)
            .map_err(|source| DiaryError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let form = Form::new().part(AUDIO_FIELD, part);
        let recognition: Recognition = self
            .send(endpoint, self.http.post(self.url(endpoint)).multipart(form))
            .await?;
        if recognition.success {
            Ok(recognition)
        } else {
            Err(DiaryError::Rejected {
                endpoint: endpoint.to_string(),
                status: StatusCode::OK,
                message: recognition.message,
            })
        }
    }

    async fn ask(&self, question: &Question) -> DiaryResult<Answer> {
        let endpoint = "ask";
        let answer: Answer = self
            .send(endpoint, self.http.post(self.url(endpoint)).json(question))
            .await?;
        if answer.success {
            Ok(answer)
        } else {
            Err(DiaryError::Rejected {
                endpoint: endpoint.to_string(),
                status: StatusCode::OK,
                message: answer.message.unwrap_or_default(),
            })
        }
    }

    async fn delete_photo(&self, id: i64) -> DiaryResult<Ack> {
        let endpoint = format!("photos/{}", id);
        self.acknowledged(&endpoint, self.http.delete(self.url(&endpoint)))
            .await
    }

    async fn clear_history(&self) -> DiaryResult<Ack> {
        let endpoint = "clear-history";
        self.acknowledged(endpoint, self.http.post(self.url(endpoint)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = DiaryClient::new("http://localhost:5001/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base(), "http://localhost:5001/api");
        assert_eq!(client.url("calendar-data"), "http://localhost:5001/api/calendar-data");
    }
}
