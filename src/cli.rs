//! Command-line arguments and their merge with the config file

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::MentionError;
use crate::mention::{Account, RetryPolicy, RoomToken, SessionContext};

#[derive(Parser, Debug)]
#[command(name = "mentions")]
#[command(about = "Chat composer with @-mention suggestions from a Nextcloud Talk room")]
#[command(version)]
pub struct Args {
    /// Room token of the conversation to mention people in
    #[arg(long, short = 'r')]
    pub room: Option<String>,

    /// Server base URL (overrides the config file)
    #[arg(long, short = 's')]
    pub server: Option<String>,

    /// Login name (overrides the config file)
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// App password (overrides the config file)
    #[arg(long)]
    pub token: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write logs to this file (overrides the config file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Everything the composer needs to start, resolved from arguments and config
#[derive(Debug, Clone)]
pub struct Settings {
    pub session: SessionContext,
    pub policy: RetryPolicy,
    pub limit: u32,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Command-line values win over the config file; blank values count as missing
    pub fn resolve(args: &Args, config: &Config) -> Result<Self, MentionError> {
        let room = pick(args.room.as_deref(), None, "room")?;
        let server = pick(
            args.server.as_deref(),
            config.server.base_url.as_deref(),
            "server",
        )?;
        let user = pick(
            args.user.as_deref(),
            config.account.user_id.as_deref(),
            "user",
        )?;
        let token = pick(
            args.token.as_deref(),
            config.account.token.as_deref(),
            "token",
        )?;

        Ok(Self {
            session: SessionContext::new(Account::new(server, user, token), RoomToken::new(room)),
            policy: config.lookup.retry_policy(),
            limit: config.lookup.limit,
            log_file: args
                .log_file
                .clone()
                .or_else(|| config.logging.file.clone()),
        })
    }
}

fn pick<'a>(
    cli: Option<&'a str>,
    file: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, MentionError> {
    cli.or(file)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(MentionError::MissingSetting(name))
}
