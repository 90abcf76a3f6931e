use async_trait::async_trait;
use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{timedtext, CaptionProvider};
use crate::config::ProviderConfig;
use crate::transcript::{CaptionSegment, CaptionTrack, TranslationLanguage};
use crate::video_id::VideoId;
use crate::{TranscriptError, TranscriptResult};

const YOUTUBE_URL: &str = "https://www.youtube.com";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";
const CONSENT_FORM_MARKER: &str = "action=\"https://consent.youtube.com/s\"";

/// Caption provider backed by YouTube's InnerTube player API
pub struct YoutubeProvider {
    client: Client,
    cookies: Arc<Jar>,
    request_delay: Duration,
}

impl YoutubeProvider {
    pub fn new(config: &ProviderConfig) -> TranscriptResult<Self> {
        let mut headers = HeaderMap::new();
        let accept_language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| TranscriptError::Provider(format!("Invalid Accept-Language header: {}", e)))?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        if let Some(agent) = &config.user_agent {
            let agent = HeaderValue::from_str(agent)
                .map_err(|e| TranscriptError::Provider(format!("Invalid User-Agent header: {}", e)))?;
            headers.insert(USER_AGENT, agent);
        }

        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranscriptError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            cookies,
            request_delay: Duration::from_millis(config.request_delay_ms),
        })
    }

    async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    /// Fetch the watch page, retrying once behind the EU consent interstitial
    async fn fetch_watch_html(&self, video_id: &VideoId) -> TranscriptResult<String> {
        let url = video_id.watch_url();
        tracing::debug!("Fetching watch page: {}", url);

        let html = self.get_text(&url, video_id).await?;
        if !html.contains(CONSENT_FORM_MARKER) {
            return Ok(html);
        }

        tracing::debug!("Consent page served for {}, accepting and retrying", video_id);
        self.accept_consent(&html, video_id)?;
        self.pause().await;
        let html = self.get_text(&url, video_id).await?;
        if html.contains(CONSENT_FORM_MARKER) {
            return Err(TranscriptError::Provider(format!(
                "Failed to get past the YouTube consent page for video {}",
                video_id
            )));
        }

        Ok(html)
    }

    /// Store the `CONSENT` cookie the interstitial form would have set
    fn accept_consent(&self, html: &str, video_id: &VideoId) -> TranscriptResult<()> {
        let value = extract_consent_value(html).ok_or_else(|| {
            TranscriptError::Provider(format!("Failed to read the YouTube consent form for video {}", video_id))
        })?;
        let origin = Url::parse(YOUTUBE_URL).map_err(|e| TranscriptError::Provider(e.to_string()))?;
        self.cookies
            .add_cookie_str(&format!("CONSENT=YES+{}; Domain=.youtube.com; Path=/", value), &origin);
        Ok(())
    }

    async fn fetch_player_data(&self, video_id: &VideoId, api_key: &str) -> TranscriptResult<Value> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id.as_str()
        });

        self.pause().await;
        tracing::debug!("Requesting InnerTube player data for {}", video_id);

        let response = self
            .client
            .post(INNERTUBE_PLAYER_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptError::Provider(format!("Failed to fetch player data: {}", e)))?;

        let response = check_status(response, video_id)?;
        response
            .json()
            .await
            .map_err(|e| TranscriptError::Provider(format!("Failed to parse player data: {}", e)))
    }

    async fn get_text(&self, url: &str, video_id: &VideoId) -> TranscriptResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranscriptError::Provider(format!("Request to {} failed: {}", url, e)))?;

        check_status(response, video_id)?
            .text()
            .await
            .map_err(|e| TranscriptError::Provider(format!("Failed to read response from {}: {}", url, e)))
    }
}

#[async_trait]
impl CaptionProvider for YoutubeProvider {
    async fn list_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>> {
        self.pause().await;
        let html = self.fetch_watch_html(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        let player = self.fetch_player_data(video_id, &api_key).await?;

        let tracks = parse_caption_tracks(video_id, &player)?;
        tracing::debug!("Found {} caption tracks for {}", tracks.len(), video_id);
        Ok(tracks)
    }

    async fn fetch_payload(
        &self,
        video_id: &VideoId,
        track: &CaptionTrack,
    ) -> TranscriptResult<Vec<CaptionSegment>> {
        let base_url = track.base_url.as_deref().ok_or_else(|| TranscriptError::NoTranscriptFound {
            video_id: video_id.to_string(),
            languages: vec![track.language_code.clone()],
        })?;

        if base_url.contains("&exp=xpe") {
            return Err(TranscriptError::Provider(format!(
                "Captions for video {} require a PO token",
                video_id
            )));
        }

        self.pause().await;
        tracing::debug!("Downloading '{}' captions for {}", track.language_code, video_id);

        let xml = self.get_text(base_url, video_id).await?;
        timedtext::parse(&xml)
    }

    async fn request_translation(
        &self,
        track: &CaptionTrack,
        target_language: &str,
    ) -> TranscriptResult<CaptionTrack> {
        let unsupported = || TranscriptError::TranslationUnsupported {
            source_language: track.language_code.clone(),
            target_language: target_language.to_string(),
        };

        let target = match track.translation_language(target_language) {
            Some(target) if track.is_translatable => target,
            _ => return Err(unsupported()),
        };

        let base_url = track.base_url.as_deref().ok_or_else(unsupported)?;
        let mut url = Url::parse(base_url)
            .map_err(|e| TranscriptError::Provider(format!("Invalid caption URL: {}", e)))?;
        url.query_pairs_mut().append_pair("tlang", target_language);

        Ok(CaptionTrack {
            language_code: target.language_code.clone(),
            display_language: target.language.clone(),
            is_generated: track.is_generated,
            is_translatable: false,
            translation_targets: Vec::new(),
            base_url: Some(url.to_string()),
        })
    }

    fn provider_name(&self) -> &'static str {
        "YouTube"
    }
}

fn check_status(response: Response, video_id: &VideoId) -> TranscriptResult<Response> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::RequestBlocked(video_id.to_string()));
    }
    if !status.is_success() {
        return Err(TranscriptError::Provider(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }
    Ok(response)
}

/// Pull the InnerTube API key out of the watch page
pub(crate) fn extract_api_key(html: &str, video_id: &VideoId) -> TranscriptResult<String> {
    if html.contains("g-recaptcha") {
        return Err(TranscriptError::RequestBlocked(video_id.to_string()));
    }

    let pattern = Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
        .map_err(|e| TranscriptError::Provider(e.to_string()))?;

    pattern
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|key| key.as_str().to_string())
        .ok_or_else(|| {
            TranscriptError::Provider(format!("Could not find the InnerTube API key for video {}", video_id))
        })
}

/// Value of the consent form's hidden `v` input
pub(crate) fn extract_consent_value(html: &str) -> Option<String> {
    let pattern = Regex::new(r#"name="v" value="(.*?)""#).ok()?;
    pattern
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_string())
        .filter(|value| !value.is_empty())
}

/// Map `playabilityStatus` onto the error taxonomy
pub(crate) fn assert_playability(video_id: &VideoId, player: &Value) -> TranscriptResult<()> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability["status"].as_str().unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability["reason"].as_str().unwrap_or("");
    if status == "LOGIN_REQUIRED" && reason.contains("not a bot") {
        return Err(TranscriptError::RequestBlocked(video_id.to_string()));
    }

    let detail = if reason.is_empty() {
        format!("{} ({})", video_id, status)
    } else {
        format!("{} ({})", video_id, reason)
    };
    Err(TranscriptError::VideoUnavailable(detail))
}

/// Turn an InnerTube player response into caption tracks, keeping provider order
pub(crate) fn parse_caption_tracks(video_id: &VideoId, player: &Value) -> TranscriptResult<Vec<CaptionTrack>> {
    assert_playability(video_id, player)?;

    let renderer = &player["captions"]["playerCaptionsTracklistRenderer"];
    if renderer.is_null() {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    }

    let translation_languages: Vec<TranslationLanguage> = renderer["translationLanguages"]
        .as_array()
        .map(|languages| {
            languages
                .iter()
                .filter_map(|language| {
                    Some(TranslationLanguage {
                        language_code: language["languageCode"].as_str()?.to_string(),
                        language: text_of(&language["languageName"])?,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let tracks: Vec<CaptionTrack> = renderer["captionTracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|caption| {
                    let language_code = caption["languageCode"].as_str()?.to_string();
                    let base_url = caption["baseUrl"].as_str()?.replace("&fmt=srv3", "");
                    let is_translatable = caption["isTranslatable"].as_bool().unwrap_or(false);

                    Some(CaptionTrack {
                        display_language: text_of(&caption["name"]).unwrap_or_else(|| language_code.clone()),
                        language_code,
                        is_generated: caption["kind"].as_str() == Some("asr"),
                        is_translatable,
                        translation_targets: if is_translatable {
                            translation_languages.clone()
                        } else {
                            Vec::new()
                        },
                        base_url: Some(base_url),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(tracks)
}

/// InnerTube text objects come as `{"simpleText": ..}` or `{"runs": [{"text": ..}]}`
fn text_of(value: &Value) -> Option<String> {
    value["simpleText"]
        .as_str()
        .or_else(|| value["runs"][0]["text"].as_str())
        .map(str::to_string)
}
