//! Command-line arguments.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use models::{RecordId, Sexe};
use url::Url;
use utils::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "lapgest",
    version,
    about = "LAPGEST-PRO client: session checks, routing and farm data from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API base URL (defaults to LAPGEST_API_URL, then http://127.0.0.1:5000).
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<Url>,

    /// Request timeout in seconds. No timeout when unset.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(
        long,
        value_enum,
        default_value = "compact",
        env = "LAPGEST_LOG_FORMAT",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the session and print the auth state.
    Session,

    /// Resolve a path against the current session.
    Route {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// List rabbits.
    Lapins {
        /// Only one sex (m or f).
        #[arg(long, value_parser = parse_sexe)]
        sexe: Option<Sexe>,

        /// Only animals that can be mated.
        #[arg(long)]
        breeding: bool,
    },

    /// Show parents and offspring of one rabbit.
    Genealogy {
        #[arg(value_name = "ID")]
        id: RecordId,
    },

    /// List scheduled shifts.
    Planning {
        #[arg(long)]
        employe: Option<RecordId>,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },

    /// List absence requests.
    Absences {
        /// Only requests awaiting a decision.
        #[arg(long)]
        pending: bool,
    },

    /// Approve an absence request.
    Approve {
        #[arg(value_name = "ID")]
        id: RecordId,
    },

    /// Refuse an absence request.
    Refuse {
        #[arg(value_name = "ID")]
        id: RecordId,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn parse_sexe(raw: &str) -> Result<Sexe, String> {
    raw.to_lowercase()
        .parse::<Sexe>()
        .map_err(|_| format!("expected m or f, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sexe_accepts_short_and_long_forms() {
        assert_eq!(parse_sexe("M"), Ok(Sexe::Male));
        assert_eq!(parse_sexe("femelle"), Ok(Sexe::Femelle));
        assert!(parse_sexe("x").is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from([
            "lapgest",
            "lapins",
            "--sexe",
            "f",
            "-vv",
            "--api-url",
            "http://ferme.local:5000",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.api_url.unwrap().host_str(), Some("ferme.local"));
        assert!(matches!(
            cli.command,
            Command::Lapins {
                sexe: Some(Sexe::Femelle),
                breeding: false
            }
        ));
    }
}
