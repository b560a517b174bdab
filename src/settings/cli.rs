use super::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "tokenkeeper", about = "Issue, validate and revoke session tokens")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Issue an access/refresh pair for an already authenticated principal
    Issue {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Validate a token and print its claims
    Validate {
        token: String,
        #[arg(long, value_enum, default_value_t = TokenKind::Access)]
        kind: TokenKind,
    },
    /// Exchange a refresh token for a new access token
    Refresh { token: String },
    /// Blacklist a token for the rest of its lifetime
    Revoke { token: String },
    /// Remove a token from the blacklist
    Unrevoke { token: String },
    /// End the session of the principal owning an access token
    Logout { token: String },
    /// Report whether a principal has an active session
    Session { id: i64 },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    Any,
}
