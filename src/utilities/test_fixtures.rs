use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use super::api_utils::{HttpClient, HttpResponse};
use crate::apis::youtube::{Video, VideoStatistics, YouTube};

pub const API_KEY: &str = "test-key";

type Handler = Box<dyn Fn(&Url) -> (StatusCode, String) + Send + Sync>;

/// Answers requests with a scripted handler and remembers every requested URL.
pub struct FakeHttpClient {
    handler: Handler,
    requests: Mutex<Vec<Url>>,
}

impl FakeHttpClient {
    pub fn new(handler: impl Fn(&Url) -> (StatusCode, String) + Send + Sync + 'static) -> Self {
        Self { handler: Box::new(handler), requests: Mutex::new(Vec::new()) }
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get(&self, url: Url) -> reqwest::Result<HttpResponse> {
        let (status, body) = (self.handler)(&url);
        self.requests.lock().unwrap().push(url);

        Ok(HttpResponse { status, body })
    }
}

pub fn youtube(http_client: FakeHttpClient) -> YouTube<FakeHttpClient> {
    let api_url = Url::parse("https://api.test/youtube/v3/").unwrap();
    YouTube::new(http_client, API_KEY.into(), &api_url).unwrap()
}

pub fn video(id: &str) -> Video {
    Video::new(
        "Some Video",
        "Some Channel",
        id.into(),
        VideoStatistics { view_count: 1000, like_count: 50 },
    )
}
