use async_trait::async_trait;

use super::{CommandResult, CommandTrait};
use crate::apis::youtube::{self, Video};
use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::{ConvertArgument, StringGreedy};
use crate::utilities::rate_limit::RateLimiter;
use crate::utilities::text_utils::EscapeMarkdown;

pub struct YouTubeSearch;

#[async_trait]
impl CommandTrait for YouTubeSearch {
    fn command_names(&self) -> &[&str] {
        &["youtube", "yt"]
    }

    fn description(&self) -> Option<&'static str> {
        Some("send the top results of a YouTube search")
    }

    fn rate_limit(&self) -> RateLimiter<i64> {
        RateLimiter::new(1, 15)
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult {
        let (StringGreedy(query), _) = StringGreedy::convert(&arguments)?;

        ctx.send_typing().await?;

        let videos = ctx.bot_state.youtube.search(&query).await?;
        ctx.reply_markdown(format_reply(&query, videos.as_deref())).await?;

        Ok(())
    }
}

fn format_reply(query: &str, videos: Option<&[Video]>) -> String {
    match videos {
        Some(videos) if !videos.is_empty() => {
            let results = videos
                .iter()
                .enumerate()
                .map(|(i, video)| video.to_markdown(i + 1))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "*[📺 YouTube results for {}]({})*\n\n{results}",
                EscapeMarkdown(query),
                youtube::search_results_url(query)
            )
        }
        _ => "*Something went wrong :/*\nSorry, we could not find a YouTube video\\.".into(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utilities::test_fixtures;

    #[test]
    fn test_reply_lists_every_video_in_order() {
        let videos = ["a", "b", "c"].map(test_fixtures::video);

        let reply = format_reply("lofi beats", Some(&videos));

        let mut lines = reply.lines();
        assert_eq!(
            lines.next(),
            Some(
                "*[📺 YouTube results for lofi beats](https://www.youtube.com/results?search_query=lofi+beats)*"
            )
        );
        assert_eq!(lines.next(), Some(""));

        let entries = lines.filter(|line| line.starts_with('*')).collect::<Vec<_>>();
        assert_eq!(entries.len(), 3);
        for (i, (entry, id)) in entries.into_iter().zip(["a", "b", "c"]).enumerate() {
            assert!(entry.starts_with(&format!("*{}\\. ", i + 1)), "{entry}");
            assert!(entry.ends_with(&format!("(https://www.youtube.com/watch?v={id})*")), "{entry}");
        }
    }

    #[test]
    fn test_reply_escapes_query() {
        let videos = [test_fixtures::video("a")];

        let reply = format_reply("c++ (tutorial)", Some(&videos));

        assert!(reply.starts_with("*[📺 YouTube results for c\\+\\+ \\(tutorial\\)]("));
        assert!(reply.contains("(https://www.youtube.com/results?search_query=c%2B%2B+%28tutorial%29)*"));
    }

    #[test]
    fn test_reply_without_videos() {
        let failure = "*Something went wrong :/*\nSorry, we could not find a YouTube video\\.";

        assert_eq!(format_reply("lofi", None), failure);
        assert_eq!(format_reply("lofi", Some(&[])), failure);
    }
}
