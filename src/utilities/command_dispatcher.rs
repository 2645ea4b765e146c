use std::error::Error;
use std::sync::Arc;

use super::command_context::CommandContext;
use super::command_manager::CommandInstance;
use crate::bot::TdResult;
use crate::commands::CommandError;
use crate::utilities::text_utils;

pub async fn dispatch_command(
    command: Arc<CommandInstance>,
    arguments: String,
    context: CommandContext,
) {
    if let Some(cooldown) = check_rate_limit(&command, &context) {
        if let Err(err) = report_rate_limit(&context, cooldown).await {
            log::error!(
                "TDLib error occurred while reporting a rate limit: {}: {}",
                err.code,
                err.message
            );
        }
        return;
    }

    log::info!("running {command} {arguments:?} for {} in {}", context.user, context.chat);

    if let Err(err) = command.command.execute(&context, arguments).await
        && let Err(err) = report_command_error(&command, &context, err).await
    {
        log::error!(
            "TDLib error occurred while handling the previous error {}: {}",
            err.code,
            err.message
        );
    }
}

fn check_rate_limit(command: &CommandInstance, context: &CommandContext) -> Option<u64> {
    let cooldown = command
        .rate_limiter
        .lock()
        .ok()?
        .update_rate_limit(context.user.id, context.message.date)?;
    let cooldown = u64::try_from(cooldown).unwrap_or_default();

    log::info!(
        "{command} rate limit exceeded by {} by {}",
        text_utils::format_duration(cooldown),
        context.user
    );

    Some(cooldown)
}

async fn report_rate_limit(context: &CommandContext, cooldown: u64) -> TdResult<()> {
    let notice_suppressed = context.bot_state.rate_limits.lock().is_ok_and(|mut rate_limits| {
        rate_limits
            .rate_limit_exceeded
            .update_rate_limit(context.user.id, context.message.date)
            .is_some()
    });

    if notice_suppressed {
        return Ok(());
    }

    context
        .reply(format!(
            "you can use this command again in {}.",
            text_utils::format_duration(cooldown)
        ))
        .await?;

    Ok(())
}

async fn report_command_error(
    command: &CommandInstance,
    context: &CommandContext,
    error: CommandError,
) -> TdResult<()> {
    match error {
        CommandError::ArgumentConversion(err) => context.reply(err.to_string()).await?,
        CommandError::Telegram(err) => {
            log::error!("TDLib error in the {command} command: {}: {}", err.code, err.message);
            context.reply(format!("sending the message failed ({}) 😔", err.message)).await?
        }
        CommandError::Reqwest(err) => {
            let err = err.without_url();

            let text =
                err.source().map_or_else(|| err.to_string(), |source| format!("{err}: {source}"));

            log::error!("HTTP error in the {command} command: {text}");
            context.reply(text).await?
        }
        CommandError::UnexpectedResponse(err) => {
            log::error!("unexpected API response in the {command} command: {err}");
            context
                .reply("an external service used by this command sent an unexpected response.".into())
                .await?
        }
    };

    Ok(())
}
