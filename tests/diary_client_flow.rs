use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use emotionary::calendar::Zone;
use emotionary::clients::diary_client::DiaryClient;
use emotionary::errors::DiaryError;
use emotionary::service::calendar_service::CalendarService;
use emotionary::service::diary_api::DiaryApi;
use emotionary::service::journal_service::JournalService;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

type Received = Arc<Mutex<Vec<(String, Value)>>>;

fn reply(body: Value, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&body), status)
}

// Mimics the Flask backend closely enough to exercise every endpoint.
fn spawn_backend() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));

    let health = warp::path!("api" / "health")
        .and(warp::get())
        .map(|| reply(json!({"status": "ok", "message": "Backend is running"}), StatusCode::OK));

    let songs = warp::path!("api" / "songs").and(warp::get()).map(|| {
        reply(
            json!([
                {"id": 2, "title": "Hype Boy", "artist": null, "listened_at": "2024-02-11T08:00:00"},
                {"id": 1, "title": "Ditto", "artist": "NewJeans", "listened_at": "2024-02-10T10:00:00.123456"}
            ]),
            StatusCode::OK,
        )
    });

    let photos = warp::path!("api" / "photos").and(warp::get()).map(|| {
        reply(
            json!([{"id": 7, "data_url": "data:image/png;base64,AAAA", "label": "picnic", "taken_at": "2024-02-10T12:00:00"}]),
            StatusCode::OK,
        )
    });

    let calendar = warp::path!("api" / "calendar-data").and(warp::get()).map(|| {
        reply(
            json!({
                "songs": [
                    {"title": "Hype Boy", "artist": null, "timestamp": "2024-02-11T08:00:00"},
                    {"title": "Ditto", "artist": "NewJeans", "timestamp": "2024-02-10T10:00:00.123456"}
                ],
                "photos": [
                    {"data_url": "data:image/png;base64,AAAA", "label": "picnic", "timestamp": "2024-02-10T12:00:00"},
                    {"data_url": "data:image/png;base64,AAAA", "label": "mystery", "timestamp": "someday"}
                ]
            }),
            StatusCode::OK,
        )
    });

    let add_song = {
        let received = received.clone();
        warp::path!("api" / "add-song")
            .and(warp::post())
            .and(warp::body::json())
            .map(move |body: Value| {
                received.lock().unwrap().push(("add-song".to_string(), body.clone()));
                if body["title"].as_str().unwrap_or_default().is_empty() {
                    reply(json!({"success": false, "message": "Title is required"}), StatusCode::BAD_REQUEST)
                } else {
                    reply(json!({"success": true, "message": "Song added successfully"}), StatusCode::OK)
                }
            })
    };

    let add_photo = {
        let received = received.clone();
        warp::path!("api" / "add-photo")
            .and(warp::post())
            .and(warp::body::json())
            .map(move |body: Value| {
                received.lock().unwrap().push(("add-photo".to_string(), body.clone()));
                if !body["data_url"].as_str().unwrap_or_default().starts_with("data:image/") {
                    reply(json!({"success": false, "message": "Invalid data URL format"}), StatusCode::BAD_REQUEST)
                } else {
                    reply(json!({"success": true, "message": "Photo added successfully"}), StatusCode::OK)
                }
            })
    };

    let recognize = {
        let received = received.clone();
        warp::path!("api" / "recognize-song")
            .and(warp::post())
            .and(warp::header::<String>("content-type"))
            .and(warp::body::bytes())
            .map(move |content_type: String, body: warp::hyper::body::Bytes| {
                let has_field = body.windows(b"audio_data".len()).any(|w| w == b"audio_data");
                received.lock().unwrap().push((
                    "recognize-song".to_string(),
                    json!({"multipart": content_type.starts_with("multipart/form-data"), "field": has_field}),
                ));
                if has_field {
                    reply(
                        json!({"success": true, "song": {"title": "Ditto", "artist": "NewJeans"}, "message": "Song recognized and saved"}),
                        StatusCode::OK,
                    )
                } else {
                    reply(json!({"success": false, "message": "No audio data provided"}), StatusCode::BAD_REQUEST)
                }
            })
    };

    let ask = warp::path!("api" / "ask")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            let question = body["question"].as_str().unwrap_or_default().to_string();
            reply(json!({"success": true, "answer": format!("You asked: {}", question)}), StatusCode::OK)
        });

    let delete_photo = {
        let received = received.clone();
        warp::path!("api" / "photos" / i64)
            .and(warp::delete())
            .map(move |id: i64| {
                received.lock().unwrap().push(("delete-photo".to_string(), json!(id)));
                reply(json!({"success": true, "message": "Photo deleted"}), StatusCode::OK)
            })
    };

    let clear = warp::path!("api" / "clear-history")
        .and(warp::post())
        .map(|| reply(json!({"success": false, "message": "History is locked"}), StatusCode::OK));

    let routes = health
        .or(songs)
        .or(photos)
        .or(calendar)
        .or(add_song)
        .or(add_photo)
        .or(recognize)
        .or(ask)
        .or(delete_photo)
        .or(clear);

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (format!("http://{}/api", addr), received)
}

fn client(base: &str) -> DiaryClient {
    DiaryClient::new(base, Duration::from_secs(5)).expect("client should build")
}

#[tokio::test]
async fn calendar_month_from_backend() {
    let (base, _) = spawn_backend();
    let api = client(&base);
    let zone = Zone::Named(chrono_tz::UTC);

    let grid = CalendarService::month(&api, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), &zone)
        .await
        .expect("calendar should load");

    let tenth = grid.day(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()).unwrap();
    assert_eq!(tenth.songs.len(), 1);
    assert_eq!(tenth.songs[0].title, "Ditto");
    assert_eq!(tenth.photos.len(), 1);
    let eleventh = grid.day(NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()).unwrap();
    assert_eq!(eleventh.songs[0].artist, None);
    assert_eq!(grid.skipped.len(), 1);
    assert_eq!(grid.skipped[0].timestamp, "someday");
}

#[tokio::test]
async fn lists_songs_and_photos() {
    let (base, _) = spawn_backend();
    let api = client(&base);

    let songs = JournalService::songs(&api).await.unwrap();
    assert_eq!(songs.len(), 2);
    assert_eq!(songs[1].artist.as_deref(), Some("NewJeans"));
    let photos = JournalService::photos(&api).await.unwrap();
    assert_eq!(photos[0].id, 7);
    let health = JournalService::health(&api).await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn add_song_posts_trimmed_json() {
    let (base, received) = spawn_backend();
    let api = client(&base);

    let ack = JournalService::add_song(&api, " Ditto ", Some("NewJeans")).await.unwrap();
    assert_eq!(ack.message, "Song added successfully");

    let received = received.lock().unwrap();
    assert_eq!(received[0].0, "add-song");
    assert_eq!(received[0].1, json!({"title": "Ditto", "artist": "NewJeans"}));
}

#[tokio::test]
async fn backend_rejection_surfaces_message() {
    let (base, _) = spawn_backend();
    let api = client(&base);

    // Bypass the service-side validation to hit the backend's 400 path.
    let err = api
        .add_song(&emotionary::models::song::NewSong::new("", None))
        .await
        .unwrap_err();
    match err {
        DiaryError::Rejected { status, message, .. } => {
            assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
            assert_eq!(message, "Title is required");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn unsuccessful_ack_is_an_error() {
    let (base, _) = spawn_backend();
    let api = client(&base);

    let err = JournalService::clear_history(&api).await.unwrap_err();
    assert!(matches!(err, DiaryError::Rejected { ref message, .. } if message == "History is locked"));
}

#[tokio::test]
async fn add_photo_uploads_data_url() {
    let (base, received) = spawn_backend();
    let api = client(&base);

    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

    JournalService::add_photo(&api, file.path(), Some("desk"))
        .await
        .expect("photo upload should succeed");

    let received = received.lock().unwrap();
    assert_eq!(received[0].0, "add-photo");
    assert_eq!(received[0].1["data_url"], "data:image/png;base64,iVBORw==");
    assert_eq!(received[0].1["label"], "desk");
}

#[tokio::test]
async fn recognize_sends_multipart_audio() {
    let (base, received) = spawn_backend();
    let api = client(&base);

    let mut file = tempfile::Builder::new().suffix(".webm").tempfile().unwrap();
    file.write_all(b"fake audio").unwrap();

    let recognition = JournalService::recognize(&api, file.path()).await.unwrap();
    let song = recognition.song.expect("song should be recognized");
    assert_eq!(song.title, "Ditto");

    let received = received.lock().unwrap();
    assert_eq!(received[0].1, json!({"multipart": true, "field": true}));
}

#[tokio::test]
async fn ask_and_delete() {
    let (base, received) = spawn_backend();
    let api = client(&base);

    let answer = JournalService::ask(&api, "  what did I hear?  ").await.unwrap();
    assert_eq!(answer, "You asked: what did I hear?");

    JournalService::delete_photo(&api, 7).await.unwrap();
    let received = received.lock().unwrap();
    assert_eq!(received[0], ("delete-photo".to_string(), json!(7)));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let api = client("http://127.0.0.1:9/api");
    let err = JournalService::health(&api).await.unwrap_err();
    assert!(matches!(err, DiaryError::Transport { .. }));
}
