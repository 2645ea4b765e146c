use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The only HTTP operation API wrappers need, so they can be exercised without a network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: Url) -> reqwest::Result<HttpResponse>;
}

#[async_trait]
impl HttpClient for reqwest::Client {
    async fn get(&self, url: Url) -> reqwest::Result<HttpResponse> {
        let response = Self::get(self, url).send().await?;
        let status = response.status();

        Ok(HttpResponse { status, body: response.text().await? })
    }
}
