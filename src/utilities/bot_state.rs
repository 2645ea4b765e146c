use std::error::Error;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Client, redirect};

use super::cache::Cache;
use super::config::Config;
use super::rate_limit::{RateLimiter, RateLimits};
use crate::apis::youtube::YouTube;

#[derive(Clone, Copy)]
pub enum BotStatus {
    Running,
    WaitingToClose,
    Closing,
    Closed,
}

pub struct BotState {
    pub status: Mutex<BotStatus>,
    pub config: Config,
    pub cache: Mutex<Cache>,
    pub youtube: YouTube<Client>,
    pub rate_limits: Mutex<RateLimits>,
}

impl BotState {
    pub fn new(config: Config) -> Result<Self, Box<dyn Error>> {
        let mut http_client = Client::builder();

        if let Some(user_agent) = &config.user_agent {
            http_client = http_client.user_agent(user_agent);
        }

        let http_client = http_client
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(300))
            .build()?;

        let youtube =
            YouTube::new(http_client, config.youtube_api_key.clone(), &config.youtube_api_url)?;

        Ok(Self {
            status: Mutex::new(BotStatus::Closed),
            config,
            cache: Mutex::new(Cache::default()),
            youtube,
            rate_limits: Mutex::new(RateLimits { rate_limit_exceeded: RateLimiter::new(1, 20) }),
        })
    }
}
