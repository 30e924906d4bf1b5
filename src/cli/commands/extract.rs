use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config::{OutputFormat, RepoctxConfig};
use crate::select::relevance::parse_keywords;
use crate::select::{CancellationToken, ExtractionResult, Extractor, SelectionStatus};

#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// Directory to select files from
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Only keep files with these extensions (comma-separated, dot optional)
    #[arg(short = 'e', long = "include-ext", value_delimiter = ',')]
    pub include_ext: Vec<String>,

    /// Additional exclude patterns (`dir/`, `*.glob`, or a path prefix)
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Do not apply the root .gitignore
    #[arg(long)]
    pub no_gitignore: bool,

    /// Do not apply the built-in exclude rules
    #[arg(long)]
    pub no_default_rules: bool,

    /// Keep only files mentioning these keywords, ranked by relevance
    #[arg(short, long, value_name = "WORDS")]
    pub keywords: Option<String>,

    /// Token budget, 0 for unlimited
    #[arg(short, long, value_name = "TOKENS")]
    pub budget: Option<usize>,

    /// Put entry points (main.*, README*, ...) first
    #[arg(long)]
    pub prioritize_entry_points: bool,

    /// Maximum worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Abort if traversal and classification take longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// List files that did not fit in the budget
    #[arg(long)]
    pub show_excluded: bool,

    /// Exit with an error when nothing is selected
    #[arg(long)]
    pub fail_empty: bool,
}

impl ExtractArgs {
    /// Apply flags on top of the loaded configuration
    pub fn apply(&self, config: &mut RepoctxConfig) {
        if !self.include_ext.is_empty() {
            let extensions: BTreeSet<String> = self
                .include_ext
                .iter()
                .map(|ext| ext.trim().to_string())
                .filter(|ext| !ext.is_empty())
                .collect();
            config.filter.include_extensions = Some(extensions);
        }
        config.filter.exclude_patterns.extend(self.exclude.iter().cloned());
        if self.no_gitignore {
            config.filter.use_gitignore = false;
        }
        if self.no_default_rules {
            config.filter.use_default_rules = false;
        }
        if let Some(keywords) = &self.keywords {
            config.filter.relevance_keywords = parse_keywords(keywords);
        }
        if let Some(budget) = self.budget {
            config.filter.token_budget = budget;
        }
        if self.prioritize_entry_points {
            config.engine.prioritize_entry_points = true;
        }
        if let Some(threads) = self.threads {
            config.engine.max_threads = threads;
        }
        if let Some(timeout) = self.timeout {
            config.engine.timeout_secs = timeout;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.show_excluded {
            config.output.show_excluded = true;
        }
    }
}

pub async fn execute(args: ExtractArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let mut config = RepoctxConfig::load(custom_config)?;
    args.apply(&mut config);
    tracing::debug!("Effective filter config: {:?}", config.filter);

    let extractor = Extractor::new(&args.path, config.filter.clone(), config.engine.clone())?;

    let mut cancel = CancellationToken::new();
    if let Some(timeout) = config.engine.timeout() {
        cancel = cancel.with_timeout(timeout);
    }
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = tokio::task::spawn_blocking(move || extractor.run_with_cancel(&cancel))
        .await
        .context("Extraction task failed")?;
    interrupt.abort();
    let result = result?;

    write_result(&result, &config, args.output.as_deref())?;
    report(&result, config.output.show_excluded, output);

    if args.fail_empty {
        result.into_selected()?;
    }
    Ok(())
}

fn write_result(result: &ExtractionResult, config: &RepoctxConfig, path: Option<&Path>) -> Result<()> {
    let rendered = match config.output.format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => serde_json::to_string_pretty(result)? + "\n",
        OutputFormat::Yaml => serde_yml::to_string(result)?,
    };

    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(rendered.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(rendered.as_bytes())?;
            lock.flush()?;
        }
    }
    Ok(())
}

/// Plain per-file dump in selection order
pub fn render_text(result: &ExtractionResult) -> String {
    let mut out = String::new();
    for file in &result.included {
        out.push_str(&format!("==> {} ({} tokens) <==\n", file.relative_path, file.tokens));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn report(result: &ExtractionResult, show_excluded: bool, output: &Output) {
    if output.is_quiet() {
        return;
    }
    let stats = &result.stats;

    match result.status() {
        SelectionStatus::Selected => output.success(&format!(
            "Selected {} files ({} tokens)",
            result.included.len(),
            result.token_count
        )),
        SelectionStatus::NoFilesMatched => output.warning("No files matched the configured filters"),
        SelectionStatus::BudgetTooLow => output.warning(&format!(
            "Token budget of {} is too low for any of the {} matching files",
            result.max_tokens,
            result.excluded_count()
        )),
    }

    if output.is_verbose() {
        for rejection in &result.rejected {
            output.verbose(&format!("Skipped {} ({})", rejection.relative_path, rejection.stage));
        }

        output.header("Filtering");
        output.breakdown("files discovered", stats.files_discovered);
        output.breakdown("ignored by .gitignore", stats.filtered_by_gitignore);
        output.breakdown("excluded by default rules", stats.filtered_by_default_rules);
        output.breakdown("excluded by patterns", stats.filtered_by_custom_exclude);
        output.breakdown("outside the extension allow-list", stats.filtered_by_extension);
        output.breakdown("without keyword hits", stats.filtered_by_relevance);
        output.breakdown("unreadable", stats.files_unreadable);

        output.header("Budget");
        let budget = if result.max_tokens == 0 {
            "unlimited".to_string()
        } else {
            result.max_tokens.to_string()
        };
        output.table_row("Budget", &budget);
        output.table_row("Included tokens", &result.token_count.to_string());
        output.table_row("Candidate tokens", &result.total_tokens.to_string());
        output.table_row("Efficiency", &format!("{:.1}%", result.efficiency() * 100.0));
        output.table_row("Duration", &format!("{}ms", stats.duration_ms));
    }

    if show_excluded && !result.excluded.is_empty() {
        output.header(&format!("Over budget ({})", result.excluded_count()));
        for file in &result.excluded {
            output.list_item(&format!("{} ({} tokens)", file.relative_path, file.tokens));
        }
    }

    for warning in &result.warnings {
        output.warning(&warning.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = ExtractArgs {
            include_ext: vec!["rs".into(), " ".into()],
            exclude: vec!["fixtures/".into()],
            no_gitignore: true,
            keywords: Some("Auth, login".into()),
            budget: Some(4000),
            format: Some(OutputFormat::Json),
            ..Default::default()
        };
        let mut config = RepoctxConfig::default();
        args.apply(&mut config);

        assert_eq!(config.filter.include_extensions, Some(BTreeSet::from(["rs".to_string()])));
        assert_eq!(config.filter.exclude_patterns, vec!["fixtures/"]);
        assert!(!config.filter.use_gitignore);
        assert!(config.filter.use_default_rules);
        assert_eq!(config.filter.relevance_keywords, vec!["auth", "login"]);
        assert_eq!(config.filter.token_budget, 4000);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let mut config = RepoctxConfig::default();
        config.filter.token_budget = 123;
        ExtractArgs::default().apply(&mut config);
        assert_eq!(config.filter.token_budget, 123);
        assert!(config.filter.include_extensions.is_none());
    }
}
