use std::env;
use std::time::Duration;

use alingo_core::model::{CourseId, ExerciseId, ExercisePage, SoundName, Verdict};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::contract::{AnswerVerifier, AudioClip, CueResolver, ExerciseSource};
use crate::error::RemoteError;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub token: Option<String>,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `RemoteError::Url` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        let token = token.filter(|token| !token.trim().is_empty());
        Ok(Self { base_url, token })
    }

    /// Reads `ALINGO_API_URL` and `ALINGO_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Url` if the configured URL is invalid.
    pub fn from_env() -> Result<Self, RemoteError> {
        let base_url = env::var("ALINGO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        Self::new(&base_url, env::var("ALINGO_TOKEN").ok())
    }
}

/// reqwest-backed client for the exercise, answer and sound endpoints.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn checked(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = RemoteError::from_status(status, &body);
        warn!(%status, message = %err.message(), "request rejected");
        Err(err)
    }
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    answer: &'a str,
}

#[async_trait]
impl ExerciseSource for HttpApi {
    async fn fetch_page(
        &self,
        course: CourseId,
        page: u32,
        page_size: u32,
    ) -> Result<ExercisePage, RemoteError> {
        let url = self.endpoint(&["course", &course.to_string(), "exercise"])?;
        debug!(%course, page, page_size, "fetching exercise page");
        let request = self
            .client
            .get(url)
            .query(&[("page", page), ("amount", page_size)]);
        let response = Self::checked(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AnswerVerifier for HttpApi {
    async fn submit_guess(
        &self,
        exercise: ExerciseId,
        answer: &str,
    ) -> Result<Verdict, RemoteError> {
        let url = self.endpoint(&["exercise", &exercise.to_string()])?;
        debug!(%exercise, "submitting guess");
        let request = self.client.post(url).json(&AnswerRequest { answer });
        let response = Self::checked(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CueResolver for HttpApi {
    async fn resolve_cue(&self, sound: &SoundName) -> Result<AudioClip, RemoteError> {
        let url = self.endpoint(&["sound", sound.as_str()])?;
        debug!(%sound, "resolving cue");
        let request = self.client.get(url);
        let response = Self::checked(self.authorize(request).send().await?).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        Ok(AudioClip {
            name: sound.clone(),
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(ApiConfig::new(base, Some("jwt".into())).unwrap()).unwrap()
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let api = api("http://localhost:8000/api/");
        let url = api.endpoint(&["course", "3", "exercise"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/course/3/exercise");
    }

    #[test]
    fn endpoint_escapes_sound_names() {
        let api = api("http://localhost:8000");
        let url = api.endpoint(&["sound", "la mem.mp3"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/sound/la%20mem.mp3");
    }

    #[test]
    fn config_rejects_relative_urls_and_blank_tokens() {
        assert!(ApiConfig::new("localhost", None).is_err());
        assert!(ApiConfig::new("mailto:someone@example.com", None).is_err());
        let config = ApiConfig::new("https://alingo.example", Some("  ".into())).unwrap();
        assert!(config.token.is_none());
    }
}
