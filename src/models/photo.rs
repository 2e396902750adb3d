use serde::{Deserialize, Serialize};

pub const DATA_URL_PREFIX: &str = "data:image/";

// Row returned by `GET /api/photos`, newest first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: i64,
    pub data_url: String,
    #[serde(default)]
    pub label: Option<String>,
    pub taken_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub data_url: String,
    pub label: String,
}

/// Maps an image file extension onto the MIME subtype used in the data URL.
/// Returns `None` for anything the backend would not accept as an image.
pub fn image_subtype(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("png"),
        "jpg" | "jpeg" => Some("jpeg"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        _ => None,
    }
}

pub fn is_image_data_url(data_url: &str) -> bool {
    data_url.starts_with(DATA_URL_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_subtype_is_case_insensitive() {
        assert_eq!(image_subtype("JPG"), Some("jpeg"));
        assert_eq!(image_subtype("png"), Some("png"));
        assert_eq!(image_subtype("bmp"), None);
    }

    #[test]
    fn data_url_prefix_check() {
        assert!(is_image_data_url("data:image/png;base64,AAAA"));
        assert!(!is_image_data_url("data:text/plain;base64,AAAA"));
    }
}
