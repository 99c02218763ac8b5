use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fanpulse_core::model::DateRange;
use fanpulse_core::{FilterPatch, FilterState, Notice, SortOrder};
use fanpulse_engine::resources::{collect, dashboard, insights, teams, trends};
use fanpulse_engine::{
    ApiClient, CommentsSession, DashboardError, MarkOutcome, PollTask, Poller, QueryCache,
    RealtimeMonitor, SentimentSession, TrendMonitor, TREND_POLL_INTERVAL,
};
use fanpulse_logging::{pulse_debug, pulse_info};

use crate::cli::{CollectTarget, Command, CommentsArgs};
use crate::config::AppConfig;
use crate::render;

/// Shared handles for one CLI invocation.
pub struct AppContext {
    pub api: ApiClient,
    pub cache: Arc<QueryCache>,
    pub config: AppConfig,
    pub notices: Receiver<Notice>,
}

impl AppContext {
    /// Prints pending notices to stderr.
    pub fn flush_notices(&self) {
        for notice in self.notices.try_iter() {
            eprintln!("{}", render::render_notice(&notice));
        }
    }
}

pub async fn run(command: Command, ctx: &AppContext) -> Result<()> {
    match command {
        Command::Comments(args) => comments(args, ctx).await,
        Command::Stats { top } => stats(top, ctx).await,
        Command::Analyze { text, language } => {
            let mut session = SentimentSession::new(ctx.api.clone(), Arc::clone(&ctx.cache));
            let result = session.analyze_text(text, language).await?;
            print_lines(render::render_result(&result));
            Ok(())
        }
        Command::Batch { texts, file } => batch(texts, file, ctx).await,
        Command::Process => {
            let mut session = SentimentSession::new(ctx.api.clone(), Arc::clone(&ctx.cache));
            let outcome = session.process_unprocessed().await?;
            println!("{}", render::render_processing(&outcome));
            Ok(())
        }
        Command::Teams {
            search,
            active,
            seed,
        } => {
            if seed {
                let seeded = teams::seed_teams(&ctx.api).await?;
                println!(
                    "Seeded {} teams ({} total)",
                    seeded.inserted_count, seeded.total_teams
                );
            }
            let list = match (search, active) {
                (Some(query), _) => teams::search_teams(&ctx.api, &query).await?,
                (None, true) => teams::active_teams(&ctx.api).await?,
                (None, false) => teams::list_teams(&ctx.api).await?,
            };
            print_lines(render::render_teams(&list.teams));
            Ok(())
        }
        Command::Report { team, from, to } => {
            let session = SentimentSession::new(ctx.api.clone(), Arc::clone(&ctx.cache));
            let range = DateRange {
                start: from,
                end: to,
            };
            let report = session.team_report(&team, range).await?;
            print_lines(render::render_report(&report));
            Ok(())
        }
        Command::Collect { target } => {
            let response = match target {
                CollectTarget::Reddit => collect::collect_reddit(&ctx.api).await?,
                CollectTarget::Youtube => collect::collect_youtube(&ctx.api).await?,
                CollectTarget::Subreddit { name } => {
                    collect::collect_subreddit(&ctx.api, &name).await?
                }
                CollectTarget::LiveStart { subreddits } => {
                    let names: Vec<&str> = if subreddits.is_empty() {
                        collect::LIVE_SUBREDDITS.to_vec()
                    } else {
                        subreddits.iter().map(String::as_str).collect()
                    };
                    collect::start_live_stream(&ctx.api, &names).await?
                }
                CollectTarget::LiveStatus => collect::live_stream_status(&ctx.api).await?,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Insights { team, daily } => {
            let team = team.as_deref();
            if daily {
                let summary = insights::generate_daily_summary(&ctx.api, team).await?;
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let (stats, trends) = tokio::try_join!(
                    insights::enhanced_stats(&ctx.api, team),
                    insights::trend_insights(&ctx.api, team)
                )?;
                println!("{}", serde_json::to_string_pretty(&stats)?);
                println!("{}", serde_json::to_string_pretty(&trends)?);
            }
            Ok(())
        }
        Command::Trends {
            period,
            watch: false,
            ..
        } => {
            let view = trends::trend_view(&ctx.api, period).await?;
            print_lines(render::render_trend_view(&view));
            Ok(())
        }
        Command::Trends {
            period,
            interval,
            count,
            ..
        } => {
            let interval = interval_or(interval, TREND_POLL_INTERVAL);
            let task = TrendMonitor::new(ctx.api.clone(), period);
            watch(task, interval, count, ctx, |view| {
                print_lines(render::render_trend_view(&view))
            })
            .await
        }
        Command::ExecutiveReport {
            period,
            format,
            output,
        } => {
            let report = trends::executive_report(&ctx.api, period, format).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(format.file_name(period)));
            fs::write(&path, report).with_context(|| format!("writing {}", path.display()))?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Command::Monitor { interval, count } => {
            let interval = interval_or(interval, ctx.config.poll_interval());
            let task = RealtimeMonitor::new(ctx.api.clone());
            watch(task, interval, count, ctx, |snapshot| {
                println!("{}", render::render_snapshot(&snapshot))
            })
            .await
        }
        Command::Health => {
            let health = dashboard::health(&ctx.api).await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
            Ok(())
        }
        Command::Config { .. } => bail!("config commands run before the client is built"),
    }
}

async fn comments(args: CommentsArgs, ctx: &AppContext) -> Result<()> {
    let patch = FilterPatch::new()
        .team(args.team)
        .source(args.source)
        .sentiment(args.sentiment)
        .search(args.search)
        .date_range(args.from, args.to);
    let mut filter = FilterState::with_patch(patch);
    filter.set_limit(args.limit.unwrap_or(ctx.config.page_size));
    if args.sort_by.is_some() || args.asc {
        let order = if args.asc {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };
        let sort_by = args.sort_by.unwrap_or_else(|| filter.sort_by().to_string());
        filter.set_sorting(sort_by, order);
    }
    filter.set_page(args.page);

    let mut session =
        CommentsSession::with_filter(ctx.api.clone(), Arc::clone(&ctx.cache), filter);
    session.refresh().await;

    let outcome = if !args.mark.is_empty() {
        Some(session.mark_processed(args.mark).await?)
    } else if args.mark_page {
        session.select_all();
        Some(session.mark_selected_processed().await?)
    } else {
        None
    };
    match outcome {
        Some(MarkOutcome::Updated(count)) => pulse_info!("{} comments updated", count),
        Some(MarkOutcome::NothingSelected) => println!("Nothing to mark on this page"),
        None => {}
    }

    print_lines(render::render_comments(&session.view()));
    Ok(())
}

async fn stats(top: usize, ctx: &AppContext) -> Result<()> {
    let mut session = SentimentSession::new(ctx.api.clone(), Arc::clone(&ctx.cache));
    session.refresh().await;
    print_lines(render::render_sentiment(&session.view()));

    let (summary, comparison) = tokio::try_join!(
        async {
            dashboard::collection_summary(&ctx.api)
                .await
                .map_err(DashboardError::from)
        },
        session.team_comparison()
    )?;
    print_lines(render::render_summary(&summary));
    let best = fanpulse_core::metrics::top_teams(&comparison.teams, top);
    if !best.is_empty() {
        println!("Top teams:");
        print_lines(render::render_top_teams(&best));
    }
    Ok(())
}

async fn batch(mut texts: Vec<String>, file: Option<PathBuf>, ctx: &AppContext) -> Result<()> {
    if let Some(path) = file {
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        texts.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    let mut session = SentimentSession::new(ctx.api.clone(), Arc::clone(&ctx.cache));
    let response = session.analyze_batch(texts.clone()).await?;
    if let Some((success, failed)) = response.server_counts() {
        println!("{success} analysed, {failed} failed");
        return Ok(());
    }
    for (text, result) in texts.iter().zip(&response.results) {
        match result {
            Some(result) => println!(
                "{:<8} {}",
                fanpulse_core::display::label_display_name(result.label),
                text
            ),
            None => println!("{:<8} {}", "failed", text),
        }
    }
    Ok(())
}

fn interval_or(secs: Option<u64>, fallback: Duration) -> Duration {
    secs.map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or(fallback)
}

/// Polls `task` and prints each result until interrupted or `count` is reached.
async fn watch<T: PollTask>(
    task: T,
    interval: Duration,
    count: Option<usize>,
    ctx: &AppContext,
    show: impl Fn(T::Output),
) -> Result<()> {
    let poller = Poller::new(interval);
    let mut handle = poller.start(Arc::new(task));
    pulse_info!("polling every {}s", interval.as_secs());

    let mut seen = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                pulse_debug!("interrupted");
                break;
            }
            next = handle.next() => {
                match next {
                    Some(Ok(output)) => show(output),
                    // The gateway has already queued a notice.
                    Some(Err(_)) => {}
                    None => break,
                }
                ctx.flush_notices();
                seen += 1;
                if count.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
        }
    }
    handle.join().await;
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
