use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, de};
use url::{ParseError, Url};

use crate::commands::CommandError;
use crate::utilities::api_utils::HttpClient;
use crate::utilities::text_utils::EscapeMarkdown;

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=";
const SEARCH_RESULTS_URL: &str = "https://www.youtube.com/results";

#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
}

#[derive(Deserialize)]
struct VideosResponse {
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    statistics: VideoStatistics,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(deserialize_with = "deserialize_count")]
    pub view_count: u64,
    #[serde(deserialize_with = "deserialize_count")]
    pub like_count: u64,
}

/// Counts are sent as decimal strings.
fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    /// HTML-unescaped and Markdown-escaped.
    pub title: String,
    /// HTML-unescaped and Markdown-escaped.
    pub username: String,
    pub id: String,
    pub video_statistics: VideoStatistics,
}

impl Video {
    pub fn new(title: &str, username: &str, id: String, video_statistics: VideoStatistics) -> Self {
        Self {
            title: EscapeMarkdown(&html_escape::decode_html_entities(title)).to_string(),
            username: EscapeMarkdown(&html_escape::decode_html_entities(username)).to_string(),
            id,
            video_statistics,
        }
    }

    pub fn url(&self) -> String {
        format!("{VIDEO_URL}{}", self.id)
    }

    /// Formats the video as a ranked MarkdownV2 search result entry.
    pub fn to_markdown(&self, index: usize) -> String {
        format!(
            "*{index}\\. [{}]({})*\n↳ 👤 {} 👁 {} 👍 {}\n",
            self.title,
            self.url(),
            self.username,
            self.video_statistics.view_count,
            self.video_statistics.like_count
        )
    }
}

/// Link to the equivalent search on the YouTube website.
pub fn search_results_url(query: &str) -> Url {
    Url::parse_with_params(SEARCH_RESULTS_URL, [("search_query", query)]).unwrap()
}

pub struct YouTube<C> {
    http_client: C,
    api_key: String,
    search_endpoint: Url,
    videos_endpoint: Url,
}

impl<C: HttpClient> YouTube<C> {
    pub fn new(http_client: C, api_key: String, api_url: &Url) -> Result<Self, ParseError> {
        Ok(Self {
            http_client,
            api_key,
            search_endpoint: api_url.join("search")?,
            videos_endpoint: api_url.join("videos")?,
        })
    }

    /// Returns `None` if the API refused the request.
    pub async fn get_statistics(&self, id: &str) -> Result<Option<VideoStatistics>, CommandError> {
        let mut url = self.videos_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("part", "statistics")
            .append_pair("id", id)
            .append_pair("key", &self.api_key);

        let response = self.http_client.get(url).await?;

        if response.status != StatusCode::OK {
            log::error!(
                "YouTube statistics response not successful: response code {}",
                response.status
            );
            return Ok(None);
        }

        let statistics = serde_json::from_str::<VideosResponse>(&response.body)?
            .items
            .into_iter()
            .next()
            .ok_or_else(|| {
                CommandError::UnexpectedResponse(format!("no statistics returned for video {id}"))
            })?
            .statistics;

        Ok(Some(statistics))
    }

    /// Searches for videos, fetching statistics for every result in order. Returns `None` if
    /// the search or any of the statistics requests were refused, never a partial list.
    pub async fn search(&self, query: &str) -> Result<Option<Vec<Video>>, CommandError> {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("q", query)
            .append_pair("safeSearch", "strict")
            .append_pair("type", "video")
            .append_pair("key", &self.api_key);

        let response = self.http_client.get(url).await?;

        if response.status != StatusCode::OK {
            log::error!("YouTube search response not successful: response code {}", response.status);
            return Ok(None);
        }

        let items = serde_json::from_str::<SearchResponse>(&response.body)?.items;
        let mut videos = Vec::with_capacity(items.len());

        for item in items {
            let Some(statistics) = self.get_statistics(&item.id.video_id).await? else {
                log::warn!("YouTube statistics response not successful, aborting YouTube search");
                return Ok(None);
            };

            videos.push(Video::new(
                &item.snippet.title,
                &item.snippet.channel_title,
                item.id.video_id,
                statistics,
            ));
        }

        Ok(Some(videos))
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::utilities::test_fixtures::{self, FakeHttpClient};

    fn query_pairs(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    fn search_body(videos: &[(&str, &str, &str)]) -> String {
        let items = videos
            .iter()
            .map(|(id, title, channel)| {
                json!({
                    "kind": "youtube#searchResult",
                    "id": { "kind": "youtube#video", "videoId": id },
                    "snippet": { "title": title, "channelTitle": channel },
                })
            })
            .collect::<Vec<_>>();

        json!({ "kind": "youtube#searchListResponse", "items": items }).to_string()
    }

    fn statistics_body(view_count: &str, like_count: &str) -> String {
        json!({
            "items": [{
                "id": "ignored",
                "statistics": { "viewCount": view_count, "likeCount": like_count },
            }]
        })
        .to_string()
    }

    /// Serves three search results; statistics for `failing_id` are refused.
    fn three_results(failing_id: Option<&'static str>) -> FakeHttpClient {
        FakeHttpClient::new(move |url| {
            if url.path().ends_with("/search") {
                return (
                    StatusCode::OK,
                    search_body(&[("a", "first", "one"), ("b", "second", "two"), ("c", "third", "three")]),
                );
            }

            let id = query_pairs(url)["id"].clone();
            if Some(id.as_str()) == failing_id {
                return (StatusCode::FORBIDDEN, r#"{"error":{"code":403}}"#.into());
            }

            let views = match id.as_str() {
                "a" => "1",
                "b" => "20",
                _ => "300",
            };
            (StatusCode::OK, statistics_body(views, "7"))
        })
    }

    #[tokio::test]
    async fn test_search_keeps_api_order() {
        let youtube = test_fixtures::youtube(three_results(None));

        let videos = youtube.search("numbers").await.unwrap().unwrap();

        let ids = videos.iter().map(|video| video.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b", "c"]);
        let views = videos.iter().map(|video| video.video_statistics.view_count).collect::<Vec<_>>();
        assert_eq!(views, [1, 20, 300]);
        assert_eq!(youtube.http_client.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_statistics_failure_aborts_search() {
        for (k, failing_id) in ["a", "b", "c"].into_iter().enumerate() {
            let youtube = test_fixtures::youtube(three_results(Some(failing_id)));

            assert_eq!(youtube.search("numbers").await.unwrap(), None);
            // the search request plus statistics up to and including the failing one
            assert_eq!(youtube.http_client.requests().len(), k + 2);
        }
    }

    #[tokio::test]
    async fn test_search_failure_skips_statistics() {
        let youtube = test_fixtures::youtube(FakeHttpClient::new(|_| {
            (StatusCode::FORBIDDEN, r#"{"error":{"code":403,"message":"quotaExceeded"}}"#.into())
        }));

        assert_eq!(youtube.search("lofi").await.unwrap(), None);

        let requests = youtube.http_client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].path().ends_with("/search"));
    }

    #[tokio::test]
    async fn test_empty_search() {
        let youtube = test_fixtures::youtube(FakeHttpClient::new(|_| {
            (StatusCode::OK, json!({ "items": [] }).to_string())
        }));

        assert_eq!(youtube.search("nothing").await.unwrap(), Some(Vec::new()));
        assert_eq!(youtube.http_client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let youtube = test_fixtures::youtube(three_results(None));

        youtube.search("lofi & chill").await.unwrap();

        let requests = youtube.http_client.requests();
        assert_eq!(requests[0].as_str().split('?').next(), Some("https://api.test/youtube/v3/search"));
        assert_eq!(
            query_pairs(&requests[0]),
            HashMap::from([
                ("part".into(), "snippet".into()),
                ("q".into(), "lofi & chill".into()),
                ("safeSearch".into(), "strict".into()),
                ("type".into(), "video".into()),
                ("key".into(), test_fixtures::API_KEY.into()),
            ])
        );

        assert_eq!(requests[1].as_str().split('?').next(), Some("https://api.test/youtube/v3/videos"));
        assert_eq!(
            query_pairs(&requests[1]),
            HashMap::from([
                ("part".into(), "statistics".into()),
                ("id".into(), "a".into()),
                ("key".into(), test_fixtures::API_KEY.into()),
            ])
        );
    }

    #[tokio::test]
    async fn test_get_statistics() {
        let youtube = test_fixtures::youtube(FakeHttpClient::new(|_| {
            (StatusCode::OK, statistics_body("1234567", "89"))
        }));

        let statistics = youtube.get_statistics("abc123").await.unwrap();

        assert_eq!(statistics, Some(VideoStatistics { view_count: 1_234_567, like_count: 89 }));
    }

    #[tokio::test]
    async fn test_malformed_statistics() {
        for body in [
            "not json".to_string(),
            json!({ "items": [] }).to_string(),
            json!({ "items": [{ "statistics": { "viewCount": "10" } }] }).to_string(),
            statistics_body("lots", "10"),
        ] {
            let youtube =
                test_fixtures::youtube(FakeHttpClient::new(move |_| (StatusCode::OK, body.clone())));

            let result = youtube.get_statistics("abc123").await;

            assert!(matches!(result, Err(CommandError::UnexpectedResponse(_))), "{result:?}");
        }
    }

    #[tokio::test]
    async fn test_malformed_search() {
        let youtube = test_fixtures::youtube(FakeHttpClient::new(|_| {
            (StatusCode::OK, json!({ "items": [{ "id": {} }] }).to_string())
        }));

        let result = youtube.search("lofi").await;

        assert!(matches!(result, Err(CommandError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_search_example() {
        let youtube = test_fixtures::youtube(FakeHttpClient::new(|url| {
            if url.path().ends_with("/search") {
                (StatusCode::OK, search_body(&[("abc123", "Lo-Fi &amp; Chill", "BeatsCo")]))
            } else {
                (StatusCode::OK, statistics_body("100", "10"))
            }
        }));

        let videos = youtube.search("lofi").await.unwrap().unwrap();

        assert_eq!(
            videos,
            [Video {
                title: "Lo\\-Fi & Chill".into(),
                username: "BeatsCo".into(),
                id: "abc123".into(),
                video_statistics: VideoStatistics { view_count: 100, like_count: 10 },
            }]
        );
        assert_eq!(
            videos[0].to_markdown(1),
            concat!(
                "*1\\. [Lo\\-Fi & Chill](https://www.youtube.com/watch?v=abc123)*\n",
                "↳ 👤 BeatsCo 👁 100 👍 10\n",
            )
        );
    }

    #[test]
    fn test_video_escaping() {
        let video = Video::new(
            "*Best* of_2024 &quot;live&quot; &#39;n&#39; more",
            "DJ_Cool &amp; [Friends]",
            "xyz".into(),
            VideoStatistics { view_count: 0, like_count: 0 },
        );

        assert_eq!(video.title, "\\*Best\\* of\\_2024 \"live\" 'n' more");
        assert_eq!(video.username, "DJ\\_Cool & \\[Friends\\]");
        assert_eq!(
            video.to_markdown(1),
            concat!(
                "*1\\. [\\*Best\\* of\\_2024 \"live\" 'n' more](https://www.youtube.com/watch?v=xyz)*\n",
                "↳ 👤 DJ\\_Cool & \\[Friends\\] 👁 0 👍 0\n",
            )
        );
    }

    #[test]
    fn test_rank_only_changes_rank() {
        let video = test_fixtures::video("abc123");

        let first = video.to_markdown(1);
        let tenth = video.to_markdown(10);

        assert_ne!(first, tenth);
        assert_eq!(first.strip_prefix("*1"), tenth.strip_prefix("*10"));
    }

    #[test]
    fn test_search_results_url() {
        assert_eq!(
            search_results_url("lofi hip hop & chill").as_str(),
            "https://www.youtube.com/results?search_query=lofi+hip+hop+%26+chill"
        );
    }
}
