//! Sticky Note CLI: inspect org charts and reviews from a local data directory
//!
//! Runs the same library operations the dashboard serves, without a server.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use sticky_note::org::{build_chart, ChartLevel, CompanyDirectory, ExecutiveStore};
use sticky_note::review::{
    summarize, JsonFileReviewStore, Relationship, ReviewDraft, ReviewPage, ReviewStore,
};
use sticky_note::DashboardConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sticky-note", version, about = "Sticky Note dashboard CLI")]
struct Cli {
    /// Directory holding <ticker>_executives.json files
    #[arg(long, global = true, env = "STICKY_NOTE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Ticker to company name mapping
    #[arg(long, global = true, env = "STICKY_NOTE_COMPANIES_FILE")]
    companies_file: Option<PathBuf>,

    /// Shared review file
    #[arg(long, global = true, env = "STICKY_NOTE_REVIEW_FILE")]
    review_file: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List companies
    Companies,
    /// List a company's executives
    Executives {
        ticker: String,
    },
    /// Show the reporting chart around an executive
    Chart {
        ticker: String,
        executive: String,
    },
    /// Show one page of an executive's reviews, newest first
    Reviews {
        executive: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Aggregate statistics for an executive's reviews
    Summary {
        executive: String,
    },
    /// Submit a review
    Review {
        executive: String,

        /// Star rating, 1 to 5
        #[arg(long)]
        rating: Option<u8>,

        /// Review text
        #[arg(long, default_value = "")]
        text: String,

        #[arg(long)]
        reviewer: Option<String>,

        /// Direct Report, Indirect Report, Peer, Manager or No Direct Relationship
        #[arg(long, default_value = "No Direct Relationship")]
        relationship: String,

        /// Reviewer currently works at the company
        #[arg(long)]
        current: bool,
    },
}

/// Flags win over `STICKY_NOTE_*` settings already applied to `base`
fn resolve_config(cli: &Cli, base: DashboardConfig) -> DashboardConfig {
    let mut config = base;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(file) = cli.companies_file.clone() {
        config.companies_file = file;
    }
    if let Some(file) = cli.review_file.clone() {
        config.review_file = file;
    }
    config
}

fn main() {
    let cli = Cli::parse();
    let config = resolve_config(&cli, DashboardConfig::default().with_env());

    let result = match cli.command {
        Commands::Companies => run_companies(&config, &cli.format),
        Commands::Executives { ticker } => run_executives(&config, &ticker, &cli.format),
        Commands::Chart { ticker, executive } => {
            run_chart(&config, &ticker, &executive, &cli.format)
        }
        Commands::Reviews { executive, page, page_size } => {
            let page_size = page_size.unwrap_or(config.page_size);
            run_reviews(&config, &executive, page, page_size, &cli.format)
        }
        Commands::Summary { executive } => run_summary(&config, &executive, &cli.format),
        Commands::Review {
            executive,
            rating,
            text,
            reviewer,
            relationship,
            current,
        } => {
            let relationship = match Relationship::parse(&relationship) {
                Some(r) => r,
                None => {
                    eprintln!("Error: unknown relationship '{}'", relationship);
                    std::process::exit(2);
                }
            };
            let draft = ReviewDraft {
                rating,
                review: text,
                reviewer,
                is_current_employee: current,
                relationship,
            };
            run_submit(&config, &executive, draft)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn new_table<S: ToString>(header: &[S]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    table
}

fn run_companies(config: &DashboardConfig, format: &OutputFormat) -> CliResult {
    let options = CompanyDirectory::load(&config.companies_file).options();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        OutputFormat::Table => {
            let mut table = new_table(&["Ticker", "Company"]);
            for option in &options {
                table.add_row(vec![option.ticker.clone(), option.name.clone()]);
            }
            println!("{}", table);
            println!("{} companies", options.len());
        }
    }
    Ok(())
}

fn run_executives(config: &DashboardConfig, ticker: &str, format: &OutputFormat) -> CliResult {
    let Some(executives) = ExecutiveStore::new(&config.data_dir).load(ticker) else {
        println!("Executive information not available for this company.");
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&executives)?),
        OutputFormat::Table => {
            let mut table = new_table(&["Name", "Title", "Tag", "Reports To", "Direct Reports"]);
            for (name, record) in &executives {
                table.add_row(vec![
                    name.clone(),
                    record.title.clone(),
                    record.role_tag.to_string(),
                    record.reports_to.clone().unwrap_or_default(),
                    record.direct_reports.len().to_string(),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_chart(
    config: &DashboardConfig,
    ticker: &str,
    executive: &str,
    format: &OutputFormat,
) -> CliResult {
    let Some(executives) = ExecutiveStore::new(&config.data_dir).load(ticker) else {
        println!("Executive information not available for this company.");
        return Ok(());
    };
    let chart = build_chart(&executives, executive)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&chart)?),
        OutputFormat::Table => {
            let mut table = new_table(&["Level", "Label", "Tag", "X", "Y"]);
            for node in &chart.nodes {
                let level = match node.level {
                    ChartLevel::Manager => "manager",
                    ChartLevel::Focal => "selected",
                    ChartLevel::Report => "report",
                };
                table.add_row(vec![
                    level.to_string(),
                    node.label.clone(),
                    node.role_tag.to_string(),
                    format!("{:.1}", node.x),
                    format!("{:.1}", node.y),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_reviews(
    config: &DashboardConfig,
    executive: &str,
    page: usize,
    page_size: usize,
    format: &OutputFormat,
) -> CliResult {
    let reviews = JsonFileReviewStore::new(&config.review_file).reviews_for(executive);
    let page = ReviewPage::new(&reviews, page, page_size);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Table => {
            if page.reviews.is_empty() {
                println!("(no reviews)");
            } else {
                let mut table = new_table(&["Rating", "Reviewer", "Relationship", "When", "Review"]);
                for review in &page.reviews {
                    table.add_row(vec![
                        "★".repeat(review.rating as usize),
                        review.reviewer.clone(),
                        review.relationship.to_string(),
                        review.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                        review.review.clone(),
                    ]);
                }
                println!("{}", table);
            }
            println!("Page {} of {}", page.page_number, page.total_pages);
        }
    }
    Ok(())
}

fn run_summary(config: &DashboardConfig, executive: &str, format: &OutputFormat) -> CliResult {
    let reviews = JsonFileReviewStore::new(&config.review_file).reviews_for(executive);
    let summary = summarize(&reviews);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            let average = summary
                .average_rating
                .map(|a| format!("{:.1}", a))
                .unwrap_or_else(|| "-".to_string());
            let bias = summary
                .reviewer_bias
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("Reviews:          {}", summary.total_reviews);
            println!("Average rating:   {}", average);
            println!("Unique reviewers: {}", summary.unique_reviewer_count);
            println!(
                "Positive/neutral/negative: {}/{}/{}",
                summary.positive_count, summary.neutral_count, summary.negative_count
            );
            println!("Sentiment:        {}", summary.sentiment);
            println!("Reviewer bias:    {}", bias);
        }
    }
    Ok(())
}

fn run_submit(config: &DashboardConfig, executive: &str, draft: ReviewDraft) -> CliResult {
    let review = draft.into_review(chrono::Local::now().naive_local())?;
    JsonFileReviewStore::new(&config.review_file).append(executive, review)?;
    println!("Review for {} saved.", executive);
    Ok(())
}
