use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use reptile_classifier_core::{
    ClassificationController, Config, ReptileClassifier, WorkflowState,
    config::ConfigBuilder,
    init,
    view::{ResultsView, View},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to classify without opening the window (PNG, JPG, JPEG)
    file: Option<PathBuf>,

    /// Override the prediction service URL defined in .env
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Check the service health endpoint and exit
    #[arg(long)]
    health: bool,

    /// Print the raw prediction list as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    init();
    init_logging();
    let args = Args::parse();
    tracing::debug!(?args, "parsed arguments");

    let config = build_config(&args).context("Failed to load configuration")?;
    let app = ReptileClassifier::with_config(config).context("Failed to initialize classifier")?;

    if args.health {
        let health = app
            .health()
            .await
            .with_context(|| format!("Health check against {} failed", app.config().api_url))?;
        println!("{}: {}", health.status, health.message);
        if !health.is_ok() {
            bail!("Service reported status '{}'", health.status);
        }
        return Ok(());
    }

    match args.file {
        Some(path) => {
            let json = args.json;
            tokio::task::spawn_blocking(move || classify_file(&app, path, json))
                .await
                .context("Classification task panicked")?
        }
        None => {
            app.run_interactive().context("Failed to run the classifier window")?;
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads config from the environment and applies command-line overrides.
///
/// Overrides are applied before validation, so a flag can replace a broken
/// environment value.
fn build_config(args: &Args) -> Result<Config> {
    let mut builder = ConfigBuilder::from_env();
    if let Some(url) = &args.api_url {
        builder = builder.with_api_url(url.as_str());
    }
    if let Some(secs) = args.timeout {
        builder = builder.with_timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}

/// Runs one file through the same selection and workflow the window uses.
fn classify_file(app: &ReptileClassifier, path: PathBuf, json: bool) -> Result<()> {
    let image = app
        .surface()
        .select_path(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let Some(image) = image else {
        bail!("{} is not a PNG or JPEG image", path.display());
    };

    let mut controller = app.controller();
    controller.select(image);
    controller.classify();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.green} {msg}")?,
    );
    spinner.set_message(format!("Classifying {}...", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = wait_for_result(&mut controller, app.config().request_timeout);
    spinner.finish_and_clear();
    outcome?;

    let view = controller.view();
    if let Some(error) = &view.error {
        bail!("{}", error);
    }

    if json {
        let results = controller
            .phase()
            .predictions()
            .map(|p| p.as_slice().to_vec())
            .unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

fn wait_for_result(controller: &mut ClassificationController, timeout: Duration) -> Result<()> {
    // the HTTP client enforces the timeout; the margin covers thread startup
    let deadline = timeout + Duration::from_secs(5);
    while controller.state() == WorkflowState::Submitting {
        if !controller.wait(deadline) {
            bail!("No response from the prediction service");
        }
    }
    Ok(())
}

fn print_view(view: &View) {
    match &view.results {
        Some(results) => print_results(results),
        None => println!("The service returned no predictions."),
    }
}

fn print_results(results: &ResultsView) {
    println!("Top Prediction: {}", results.top.label);
    println!("Confidence: {}", results.top.confidence);
    println!();
    println!("All Probabilities:");

    let width = results
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);
    for row in &results.rows {
        println!("  {:<width$}  {:>6}", row.label, row.confidence, width = width);
    }
}
