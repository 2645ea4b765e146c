use std::process::ExitCode;

use bot::Bot;
use utilities::bot_state::BotState;
use utilities::config::Config;
use utilities::logchamp;

mod apis;
mod bot;
mod commands;
mod utilities;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = logchamp::init() {
        eprintln!("failed to initialize logging: {err:?}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = dotenvy::dotenv() {
        log::debug!("not loading .env: {err}");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let state = match BotState::new(config) {
        Ok(state) => state,
        Err(err) => {
            log::error!("failed to initialize the bot: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut bot = Bot::new(state);
    bot.add_command(commands::youtube::YouTubeSearch);
    bot.run().await;

    ExitCode::SUCCESS
}
