mod aggregate;
mod charts;
mod config;
mod dashboard;
mod error;
mod loader;
mod models;
mod utils;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::charts::{heatmap_matrix, HeatmapAxis, Palette};
use crate::config::AppConfig;
use crate::dashboard::{Dashboard, DashboardState, ViewModel};
use crate::loader::load_data;
use crate::models::{DateRange, MetricColumn, MetricRecord, ViewMode};

#[derive(Parser)]
#[command(name = "yt-dashboard", about = "YouTube channel metrics dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Channel CSV export (overrides config)
    #[arg(long, env = "YTD_DATA", global = true)]
    data: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Render the dashboard for a date range
    Render {
        /// First day of the range (default: earliest date in the data)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the range (default: latest date in the data)
        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long, value_enum)]
        mode: Option<ViewMode>,

        #[arg(long)]
        organic_palette: Option<Palette>,

        #[arg(long)]
        paid_palette: Option<Palette>,

        /// Include the raw daily rows
        #[arg(long)]
        table: bool,

        /// Emit the view model as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Show all-time statistics and traffic shares
    Stats,

    /// Max-per-cell heatmap of a metric over two calendar axes
    Heatmap {
        #[arg(long, default_value = "year")]
        y: HeatmapAxis,

        #[arg(long, default_value = "month")]
        x: HeatmapAxis,

        #[arg(long, default_value = "VIEWS")]
        value: MetricColumn,

        #[arg(long)]
        json: bool,
    },

    /// Print the raw daily rows
    Table {
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "yt_dashboard=info,warn",
        1 => "yt_dashboard=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;
    let csv_path = cli.data.unwrap_or_else(|| config.data.csv_path.clone());

    let table = {
        let _t = utils::Timer::start("Load channel data");
        load_data(&csv_path)?
    };
    let dashboard = Dashboard::new(table);

    match cli.command {
        Command::Render {
            start,
            end,
            mode,
            organic_palette,
            paid_palette,
            table,
            json,
        } => {
            let bounds = dashboard
                .date_bounds()
                .with_context(|| format!("{:?} has no rows", csv_path))?;
            let range = DateRange::new(start.unwrap_or(bounds.start), end.unwrap_or(bounds.end));

            let mut state = DashboardState::new(range, &config.dashboard);
            state.mode = mode.unwrap_or(state.mode);
            state.organic_palette = organic_palette.unwrap_or(state.organic_palette);
            state.paid_palette = paid_palette.unwrap_or(state.paid_palette);
            state.show_raw_table |= table;

            let view = dashboard.render(&state)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
        }

        Command::Stats => {
            let all_time = dashboard.all_time();
            let traffic = dashboard.traffic(
                config.dashboard.organic_palette,
                config.dashboard.paid_palette,
            )?;
            let bounds = dashboard.date_bounds();
            println!("─────────────────────────────────");
            println!("  {} — All-Time Statistics", crate::dashboard::TITLE);
            println!("─────────────────────────────────");
            println!("  Days        : {}", utils::format_with_commas(dashboard.base().len() as i64));
            println!("  From        : {}", bounds.map(|r| r.start.to_string()).unwrap_or("—".into()));
            println!("  To          : {}", bounds.map(|r| r.end.to_string()).unwrap_or("—".into()));
            println!("  Subscribers : {} ({})", utils::format_with_commas(all_time.total_subscribers), all_time.total_subscribers_short);
            println!("  Views       : {} ({})", utils::format_with_commas(all_time.total_views), all_time.total_views_short);
            println!("  Organic     : {}", traffic.organic.center_text);
            println!("  Paid        : {}", traffic.paid.center_text);
            println!("─────────────────────────────────");
        }

        Command::Heatmap { y, x, value, json } => {
            let cells = heatmap_matrix(dashboard.base(), y, x, value);
            info!("{} heatmap cells", cells.len());
            if json {
                println!("{}", serde_json::to_string_pretty(&cells)?);
            } else {
                println!("max({}) by {:?} × {:?}", value, y, x);
                for cell in &cells {
                    println!("  {:>6} {:>4}  {}", cell.y, cell.x, utils::format_with_commas(cell.value));
                }
            }
        }

        Command::Table { limit } => {
            let rows = dashboard.base().records();
            let shown = limit.unwrap_or(rows.len()).min(rows.len());
            print_table_header();
            for r in &rows[..shown] {
                print_row(r);
            }
            if shown < rows.len() {
                println!("… {} more rows", rows.len() - shown);
            }
        }
    }

    Ok(())
}

fn print_table_header() {
    println!(
        "{:<10}  {:>8} {:>8} {:>10} {:>10} {:>8} {:>8} {:>8}  {}",
        "DATE", "GAINED", "LOST", "TOTAL", "VIEWS", "HOURS", "LIKES", "NET", "type"
    );
}

fn print_row(r: &MetricRecord) {
    println!(
        "{}  {:>8} {:>8} {:>10} {:>10} {:>8} {:>8} {:>8}  {}",
        r.date,
        r.subscribers_gained,
        r.subscribers_lost,
        r.total_subscribers,
        r.views,
        r.watch_hours,
        r.likes,
        r.net_subscribers,
        r.source_type,
    );
}

fn print_view(view: &ViewModel) {
    println!("═════════════════════════════════════════════");
    println!("  {}", view.title);
    println!("═════════════════════════════════════════════");
    println!("  Key Metrics — All-Time Statistics");
    println!("    Total Subscribers : {}", view.all_time.total_subscribers_short);
    println!("    Total Views       : {}", view.all_time.total_views_short);
    println!("    Organic           : {}", view.traffic.organic.center_text);
    println!("    Paid              : {}", view.traffic.paid.center_text);
    println!("─────────────────────────────────────────────");
    println!(
        "  Selected Duration — {} → {} ({})",
        view.range.start, view.range.end, view.mode
    );
    for card in &view.cards {
        let line = sparkline(card.trend.iter().map(|p| p.value));
        println!("    {:<18}: {:>14}  {}", card.title, card.total_display, line);
    }

    if let Some(rows) = &view.raw_table {
        println!("─────────────────────────────────────────────");
        print_table_header();
        for r in rows {
            print_row(r);
        }
    }
}

/// Terminal stand-in for the area chart: one block glyph per point.
fn sparkline(values: impl Iterator<Item = i64> + Clone) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let (Some(min), Some(max)) = (values.clone().min(), values.clone().max()) else {
        return String::new();
    };
    let span = (max - min).max(1) as f64;
    values
        .map(|v| BARS[(((v - min) as f64 / span) * 7.0).round() as usize])
        .collect()
}
