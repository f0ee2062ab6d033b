// ABOUTME: Run configuration for og-report: Options, RendererKind, and the validating OptionsBuilder.
// ABOUTME: The builder defaults the URL scheme and rejects a missing or unparseable URL before any I/O.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::ReportError;

/// Port the report server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8080;
/// Wall-clock budget for render, extraction and resolution together.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
/// Directory saved HTML reports are written to.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Leading `scheme://`; a `://` later in the URL (say, in a query) does not count.
static SCHEME_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap());

/// Which render collaborator produces the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RendererKind {
    /// Headless Chromium, waiting for the network to settle.
    #[default]
    Chromium,
    /// Plain HTTP GET of the markup; no JavaScript runs.
    #[value(alias = "static")]
    Http,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RendererKind::Chromium => "chromium",
            RendererKind::Http => "http",
        };
        write!(f, "{}", s)
    }
}

/// Validated configuration for one report run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Absolute URL to report on, scheme already defaulted.
    pub url: String,
    pub port: u16,
    pub save: bool,
    pub visual: bool,
    pub timeout: Duration,
    pub renderer: RendererKind,
    pub reports_dir: PathBuf,
    pub open_browser: bool,
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }
}

/// Prepends `http://` when the input carries no scheme.
pub fn default_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    if SCHEME_PREFIX_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Defaults the scheme and checks the result is an http(s) URL with a host.
pub fn normalize_url(raw: &str) -> Result<String, ReportError> {
    if raw.trim().is_empty() {
        return Err(ReportError::missing_url("Options"));
    }

    let candidate = default_scheme(raw);
    let parsed = Url::parse(&candidate).map_err(|e| {
        ReportError::invalid_url(&candidate, "Options", Some(anyhow::anyhow!("{}", e)))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ReportError::invalid_url(
            &candidate,
            "Options",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ReportError::invalid_url(
            &candidate,
            "Options",
            Some(anyhow::anyhow!("URL has no host")),
        ));
    }

    Ok(parsed.to_string())
}

/// Builder for [`Options`]; `build` validates before anything touches the network.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    url: Option<String>,
    port: u16,
    save: bool,
    visual: bool,
    timeout: Duration,
    renderer: RendererKind,
    reports_dir: PathBuf,
    open_browser: bool,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            port: DEFAULT_PORT,
            save: false,
            visual: false,
            timeout: DEFAULT_TIMEOUT,
            renderer: RendererKind::default(),
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            open_browser: true,
        }
    }

    /// Set the URL to report on.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the report server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Persist the HTML report under the reports directory.
    pub fn save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    /// Produce an HTML report and serve it instead of printing a table.
    pub fn visual(mut self, visual: bool) -> Self {
        self.visual = visual;
        self
    }

    /// Set the wall-clock budget for the whole pipeline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose the render collaborator.
    pub fn renderer(mut self, renderer: RendererKind) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set the directory saved reports go to.
    pub fn reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = dir.into();
        self
    }

    /// Open the default browser at the served report.
    pub fn open_browser(mut self, open: bool) -> Self {
        self.open_browser = open;
        self
    }

    /// Validate and build the Options.
    pub fn build(self) -> Result<Options, ReportError> {
        let raw = self.url.ok_or_else(|| ReportError::missing_url("Options"))?;
        let url = normalize_url(&raw)?;

        Ok(Options {
            url,
            port: self.port,
            save: self.save,
            visual: self.visual,
            timeout: self.timeout,
            renderer: self.renderer,
            reports_dir: self.reports_dir,
            open_browser: self.open_browser,
        })
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
