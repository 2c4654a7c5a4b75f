//! Cover lookups against the Last.fm `album.getinfo` endpoint.
//!
//! One lookup request resolves the image URL, a second request downloads the
//! bytes. Both calls block the caller until they finish or time out.

use std::io::Read;
use std::time::Duration;

use log::info;
use serde::Deserialize;

use crate::album_identity::AlbumIdentity;
use crate::config::LastFmConfig;
use crate::cover_image::CoverImage;

const ALBUM_INFO_METHOD: &str = "album.getinfo";

#[derive(Debug, thiserror::Error)]
pub enum CoverFetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Last.fm API error: {0}")]
    Service(String),
    #[error("No cover found for {0}")]
    NotFound(AlbumIdentity),
    #[error("Downloaded file is not an image: {0}")]
    InvalidContent(String),
}

/// Anything able to turn an album identity into cover bytes.
pub trait CoverSource {
    fn fetch_cover(&self, identity: &AlbumIdentity) -> Result<CoverImage, CoverFetchError>;
}

#[derive(Debug, Default, Deserialize)]
struct AlbumInfoResponse {
    album: Option<AlbumInfo>,
    error: Option<serde_json::Value>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AlbumInfo {
    #[serde(default)]
    image: Vec<AlbumImage>,
}

#[derive(Debug, Default, Deserialize)]
struct AlbumImage {
    #[serde(default)]
    size: String,
    #[serde(rename = "#text", default)]
    url: String,
}

/// Picks the first non-empty URL, walking `preferred_sizes` in order.
fn select_image_url<'a>(images: &'a [AlbumImage], preferred_sizes: &[String]) -> Option<&'a str> {
    preferred_sizes.iter().find_map(|size| {
        images
            .iter()
            .find(|image| image.size == *size && !image.url.trim().is_empty())
            .map(|image| image.url.trim())
    })
}

fn parse_album_info(body: &str) -> Result<AlbumInfoResponse, CoverFetchError> {
    let parsed: AlbumInfoResponse = serde_json::from_str(body.trim())
        .map_err(|error| CoverFetchError::Service(format!("Invalid JSON response: {error}")))?;
    if parsed.error.is_some() {
        let message = parsed
            .message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(CoverFetchError::Service(message));
    }
    Ok(parsed)
}

fn request_error(error: ureq::Error) -> CoverFetchError {
    CoverFetchError::Network(format!("Request failed: {error}"))
}

/// Blocking Last.fm client; one instance serves a whole scan.
pub struct LastFmClient {
    http_client: ureq::Agent,
    config: LastFmConfig,
}

impl LastFmClient {
    pub fn new(config: LastFmConfig) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .user_agent(&config.user_agent)
            .build();
        Self {
            http_client,
            config,
        }
    }

    fn album_info_url(&self, identity: &AlbumIdentity) -> String {
        let params = [
            ("method", ALBUM_INFO_METHOD),
            ("api_key", self.config.api_key.as_str()),
            ("artist", identity.artist.as_str()),
            ("album", identity.album.as_str()),
            ("format", "json"),
        ];

        let mut url = self.config.api_url.clone();
        url.push(if url.contains('?') { '&' } else { '?' });
        for (index, (key, value)) in params.iter().enumerate() {
            if index > 0 {
                url.push('&');
            }
            url.push_str(key);
            url.push('=');
            url.push_str(urlencoding::encode(value).as_ref());
        }
        url
    }

    fn http_get(&self, url: &str, timeout: Duration) -> Result<ureq::Response, CoverFetchError> {
        self.http_client
            .get(url)
            .timeout(timeout)
            .call()
            .map_err(request_error)
    }

    fn lookup_image_url(&self, identity: &AlbumIdentity) -> Result<String, CoverFetchError> {
        let response = self.http_get(&self.album_info_url(identity), self.config.lookup_timeout())?;
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|error| {
                CoverFetchError::Network(format!("Failed to read response: {error}"))
            })?;

        let parsed = parse_album_info(&body)?;
        let images = parsed.album.map(|album| album.image).unwrap_or_default();
        select_image_url(&images, &self.config.image_sizes)
            .map(str::to_string)
            .ok_or_else(|| CoverFetchError::NotFound(identity.clone()))
    }

    fn download_image(&self, image_url: &str) -> Result<CoverImage, CoverFetchError> {
        let response = self.http_get(image_url, self.config.download_timeout())?;
        let content_type = response
            .header("content-type")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(CoverFetchError::InvalidContent(content_type));
        }

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|error| CoverFetchError::Network(format!("Failed to read image: {error}")))?;
        let cover = CoverImage::new(bytes);
        if cover.is_empty() {
            return Err(CoverFetchError::InvalidContent(format!("{content_type} (empty body)")));
        }
        Ok(cover)
    }
}

impl CoverSource for LastFmClient {
    fn fetch_cover(&self, identity: &AlbumIdentity) -> Result<CoverImage, CoverFetchError> {
        info!("\t\tSearching cover for {identity}");
        let image_url = self.lookup_image_url(identity)?;
        info!("\t\tCover found: {image_url}");
        self.download_image(&image_url)
    }
}
