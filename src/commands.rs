use async_trait::async_trait;
use tdlib::types::Error as TdError;

use crate::utilities::command_context::CommandContext;
use crate::utilities::convert_argument::ConversionError;
use crate::utilities::rate_limit::RateLimiter;

pub mod youtube;

pub type CommandResult = Result<(), CommandError>;

#[async_trait]
pub trait CommandTrait {
    fn command_names(&self) -> &[&str];

    fn description(&self) -> Option<&'static str> {
        None
    }

    fn rate_limit(&self) -> RateLimiter<i64> {
        RateLimiter::new(4, 20)
    }

    async fn execute(&self, ctx: &CommandContext, arguments: String) -> CommandResult;
}

#[derive(Debug)]
pub enum CommandError {
    ArgumentConversion(ConversionError),
    Telegram(TdError),
    Reqwest(reqwest::Error),
    /// The external service answered with a body of an unexpected shape.
    UnexpectedResponse(String),
}

impl From<ConversionError> for CommandError {
    fn from(value: ConversionError) -> Self {
        Self::ArgumentConversion(value)
    }
}

impl From<TdError> for CommandError {
    fn from(value: TdError) -> Self {
        Self::Telegram(value)
    }
}

impl From<reqwest::Error> for CommandError {
    fn from(value: reqwest::Error) -> Self {
        Self::Reqwest(value)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(value: serde_json::Error) -> Self {
        Self::UnexpectedResponse(value.to_string())
    }
}
