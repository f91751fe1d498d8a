//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_profile, FetchProfile};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use futures::StreamExt;
use std::io::Write;
use std::pin::pin;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                url,
                max_items,
                count,
            } => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                self.fetch(url.as_deref(), *max_items, *count, &mut out)
                    .await
            }
            Commands::Validate => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                self.validate(&mut out)
            }
        }
    }

    /// Load the profile named on the command line
    fn load_profile(&self) -> Result<FetchProfile> {
        let path = self
            .cli
            .profile
            .as_ref()
            .ok_or_else(|| Error::config("Profile not specified (use -p flag)"))?;
        load_profile(path)
    }

    /// Stream items to `out` as they arrive
    pub async fn fetch<W: Write>(
        &self,
        url: Option<&str>,
        max_items: Option<usize>,
        count_only: bool,
        out: &mut W,
    ) -> Result<()> {
        let profile = self.load_profile()?;
        if max_items == Some(0) && !count_only {
            warn!("Nothing to fetch with --max-items 0");
            return Ok(());
        }

        let fetcher = profile.build_fetcher(url).await?;
        let start = Instant::now();

        if count_only {
            let total = fetcher.count().await?;
            writeln!(out, "{total}")?;
            return Ok(());
        }

        let mut items = pin!(fetcher.items());
        let mut written = 0usize;

        while let Some(item) = items.next().await {
            let item = item?;
            self.write_item(&item, out)?;
            written += 1;

            // Stop before the stream requests a page nobody will read
            if max_items.is_some_and(|max| written >= max) {
                warn!("Stopping after {written} items (--max-items)");
                break;
            }
        }

        info!(
            profile = profile.display_name(),
            items = written,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetch finished"
        );
        Ok(())
    }

    /// Validate the profile and print a summary
    pub fn validate<W: Write>(&self, out: &mut W) -> Result<()> {
        let profile = self.load_profile()?;

        writeln!(out, "Profile '{}' is valid", profile.display_name())?;
        let unset = profile.unset_variables();
        if !unset.is_empty() {
            writeln!(out, "  unset variables:  {}", unset.join(", "))?;
        }
        if self.cli.verbose {
            writeln!(out, "  url:              {}", profile.url)?;
            writeln!(out, "  items key:        {}", profile.items_key)?;
            writeln!(out, "  continuation key: {}", profile.continuation_key)?;
            writeln!(out, "  dispatch:         {}", profile.dispatch)?;
            writeln!(
                out,
                "  auth:             {}",
                profile.auth.resolve().map_or("unresolved", |a| a.kind())
            )?;
        }
        Ok(())
    }

    fn write_item<W: Write>(&self, item: &JsonObject, out: &mut W) -> Result<()> {
        // Serializing a JSON map only fails on the writer, so report it as I/O
        match self.cli.format {
            OutputFormat::Json => serde_json::to_writer(&mut *out, item),
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *out, item),
        }
        .map_err(std::io::Error::from)?;
        writeln!(out)?;
        Ok(())
    }
}
