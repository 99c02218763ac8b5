use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fanpulse_core::model::{ReportFormat, SentimentLabel, Source, TrendPeriod};
use log::LevelFilter;

/// Terminal client for the FanPulse fan sentiment dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Config file; defaults to ./fanpulse.ron.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List comments, optionally marking some as processed.
    Comments(CommentsArgs),
    /// Sentiment statistics, collection totals and top teams.
    Stats {
        #[arg(long, default_value_t = fanpulse_core::metrics::TOP_TEAMS_LIMIT)]
        top: usize,
    },
    /// Analyse one text.
    Analyze {
        text: String,
        #[arg(long, default_value = fanpulse_engine::resources::sentiments::DEFAULT_LANGUAGE)]
        language: String,
    },
    /// Analyse up to 50 texts, given as arguments or one per line in a file.
    Batch {
        texts: Vec<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Analyse and save the backlog of unprocessed comments.
    Process,
    /// List teams.
    Teams {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        active: bool,
        /// Insert the default clubs.
        #[arg(long)]
        seed: bool,
    },
    /// Sentiment report for one team.
    Report {
        team: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Trigger a collection run.
    Collect {
        #[command(subcommand)]
        target: CollectTarget,
    },
    /// AI insight endpoints: enhanced statistics and trend commentary.
    Insights {
        #[arg(long)]
        team: Option<String>,
        /// Generate the daily summary instead.
        #[arg(long)]
        daily: bool,
    },
    /// Daily volume per team and generated insights for a period.
    Trends {
        /// 7d, 30d or 90d.
        #[arg(long, default_value = "7d", value_parser = parse_period)]
        period: TrendPeriod,
        /// Keep refreshing until interrupted.
        #[arg(long)]
        watch: bool,
        /// Seconds between refreshes when watching.
        #[arg(long)]
        interval: Option<u64>,
        /// Stop watching after this many refreshes.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Download the executive report.
    ExecutiveReport {
        #[arg(long, default_value = "7d", value_parser = parse_period)]
        period: TrendPeriod,
        /// html or json.
        #[arg(long, default_value = "html", value_parser = parse_format)]
        format: ReportFormat,
        /// Target file; defaults to executive-report-<period>.<format>.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Poll live totals until interrupted.
    Monitor {
        /// Seconds between polls; overrides the config file.
        #[arg(long)]
        interval: Option<u64>,
        /// Stop after this many snapshots.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Backend health check.
    Health,
    /// Manage the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
pub struct CommentsArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub team: Option<String>,
    #[arg(long, value_parser = parse_source)]
    pub source: Option<Source>,
    #[arg(long, value_parser = parse_label)]
    pub sentiment: Option<SentimentLabel>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub sort_by: Option<String>,
    /// Oldest first.
    #[arg(long)]
    pub asc: bool,
    /// Mark these comment ids as processed.
    #[arg(long, num_args = 1..)]
    pub mark: Vec<String>,
    /// Mark every comment on the listed page as processed.
    #[arg(long, conflicts_with = "mark")]
    pub mark_page: bool,
}

#[derive(Subcommand, Debug)]
pub enum CollectTarget {
    Reddit,
    Youtube,
    Subreddit { name: String },
    /// Restart the live Reddit stream; defaults to the dashboard's subreddits.
    LiveStart { subreddits: Vec<String> },
    LiveStatus,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a config file with the default values.
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration.
    Show,
}

fn parse_source(raw: &str) -> Result<Source, String> {
    Source::parse(raw).ok_or_else(|| format!("unknown source {raw:?}"))
}

fn parse_period(raw: &str) -> Result<TrendPeriod, String> {
    TrendPeriod::parse(raw).ok_or_else(|| format!("unknown period {raw:?}, use 7d, 30d or 90d"))
}

fn parse_format(raw: &str) -> Result<ReportFormat, String> {
    ReportFormat::parse(raw).ok_or_else(|| format!("unknown report format {raw:?}"))
}

fn parse_label(raw: &str) -> Result<SentimentLabel, String> {
    SentimentLabel::parse(raw).ok_or_else(|| format!("unknown sentiment {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_filters_parse() {
        let cli = Cli::try_parse_from([
            "fanpulse", "comments", "--team", "galatasaray", "--source", "reddit",
            "--sentiment", "negative", "--from", "2024-05-01", "--page", "3",
        ])
        .unwrap();
        let Command::Comments(args) = cli.command else {
            panic!("expected comments");
        };
        assert_eq!(args.team.as_deref(), Some("galatasaray"));
        assert_eq!(args.source, Some(Source::Reddit));
        assert_eq!(args.sentiment, Some(SentimentLabel::Negative));
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(args.page, 3);
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!(Cli::try_parse_from(["fanpulse", "comments", "--source", "myspace"]).is_err());
    }

    #[test]
    fn trend_period_is_validated() {
        let cli = Cli::try_parse_from(["fanpulse", "trends", "--period", "30d", "--watch"]).unwrap();
        let Command::Trends { period, watch, .. } = cli.command else {
            panic!("expected trends");
        };
        assert_eq!(period, TrendPeriod::Month);
        assert!(watch);
        assert!(Cli::try_parse_from(["fanpulse", "trends", "--period", "1y"]).is_err());
    }

    #[test]
    fn mark_and_mark_page_conflict() {
        let parsed =
            Cli::try_parse_from(["fanpulse", "comments", "--mark", "c1", "--mark-page"]);
        assert!(parsed.is_err());
    }
}
