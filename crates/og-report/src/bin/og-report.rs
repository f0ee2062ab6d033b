// ABOUTME: CLI binary for og-report.
// ABOUTME: Renders a URL, prints a tag table or JSON, and optionally saves and serves an HTML preview.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use og_report::formats::{self, OutputFormat};
use og_report::options::{DEFAULT_PORT, DEFAULT_REPORTS_DIR};
use og_report::{save, server, Client, Options, RendererKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "og-report")]
#[command(
    about = "Create Open Graph reports and sharing previews for sites running on your localhost"
)]
struct Args {
    /// The URL to test (http:// is assumed when no scheme is given)
    #[arg(short = 'u', long = "url")]
    url: String,

    /// The port to run the report server on
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Save the HTML report under the reports directory
    #[arg(short = 's', long = "save")]
    save: bool,

    /// Serve an HTML preview instead of printing a table
    #[arg(short = 'v', long = "visual")]
    visual: bool,

    /// Seconds allowed for rendering and extraction
    #[arg(long = "timeout", default_value_t = 20)]
    timeout: u64,

    /// Renderer: chromium, or http to fetch markup without running JavaScript
    #[arg(
        long = "renderer",
        value_enum,
        ignore_case = true,
        default_value_t = RendererKind::Chromium
    )]
    renderer: RendererKind,

    /// Directory saved reports are written to
    #[arg(long = "reports-dir", default_value = DEFAULT_REPORTS_DIR)]
    reports_dir: PathBuf,

    /// Print the report as JSON instead of a table
    #[arg(long = "json")]
    json_output: bool,

    /// Do not open a browser at the served report
    #[arg(long = "no-open")]
    no_open: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("og_report=info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Format written to stdout; none when the HTML preview replaces the table.
fn stdout_format(opts: &Options, json_output: bool) -> Option<OutputFormat> {
    if json_output {
        Some(OutputFormat::Json)
    } else if opts.visual {
        None
    } else {
        Some(OutputFormat::Table)
    }
}

async fn serve_preview(opts: &Options, html: String) -> Result<(), og_report::ReportError> {
    let listener = server::bind(opts.port).await?;
    let report_url = format!("http://localhost:{}", opts.port);
    tracing::info!("report available at {}", report_url);

    if opts.open_browser {
        if let Err(e) = open::that(&report_url) {
            tracing::warn!(error = %e, "failed to open browser; open the URL above manually");
        }
    }

    server::serve(listener, html, server::ctrl_c()).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let opts = match Options::builder()
        .url(args.url)
        .port(args.port)
        .save(args.save)
        .visual(args.visual)
        .timeout(Duration::from_secs(args.timeout))
        .renderer(args.renderer)
        .reports_dir(args.reports_dir)
        .open_browser(!args.no_open)
        .build()
    {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: og-report --url <URL> [--port <PORT>] [--save] [--visual]");
            return ExitCode::from(2);
        }
    };

    let client = Client::new(opts.clone());
    let model = match client.report().await {
        Ok(model) => model,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(format) = stdout_format(&opts, args.json_output) {
        match formats::render(&model, format) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("error formatting {} report: {}", format, e);
                return ExitCode::from(1);
            }
        }
    }

    if !opts.save && !opts.visual {
        return ExitCode::SUCCESS;
    }

    let html = match formats::render(&model, OutputFormat::Html) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("error rendering HTML report: {}", e);
            return ExitCode::from(1);
        }
    };

    if opts.save {
        if let Err(e) = save::save_report(&opts.reports_dir, &opts.url, &html) {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    }

    if opts.visual {
        if let Err(e) = serve_preview(&opts, html).await {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    }

    ExitCode::SUCCESS
}
