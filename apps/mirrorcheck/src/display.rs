//! Output rendering and formatting

use crate::report::{CommandOutput, DiscoverySummary, ValidationReport};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    colors: bool,
}

impl OutputRenderer {
    pub fn new(json_output: bool) -> Self {
        Self {
            json_output,
            colors: Term::stdout().features().colors_supported(),
        }
    }

    /// Render command result
    pub fn render(&self, output: &CommandOutput) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(output).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        match output {
            CommandOutput::Validate(report) => self.render_validation(report),
            CommandOutput::Discover(summary) => {
                self.render_discovery(summary);
                Ok(())
            }
        }
    }

    fn render_validation(&self, report: &ValidationReport) -> io::Result<()> {
        println!(
            "{} {} ({} policy, {} ms)",
            self.style(Style::new().bold()).apply_to("Validated"),
            report.origin,
            report.policy,
            report.duration_ms
        );

        if !report.errors.is_empty() {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![
                Cell::new("Kind").add_attribute(Attribute::Bold),
                Cell::new("Artifact").add_attribute(Attribute::Bold),
                Cell::new("Message").add_attribute(Attribute::Bold),
            ]);

            for (kind, entries) in &report.errors {
                for entry in entries {
                    table.add_row(vec![
                        Cell::new(kind).fg(Color::Red),
                        Cell::new(entry.artifact.as_deref().unwrap_or("-")),
                        Cell::new(&entry.message),
                    ]);
                }
            }
            println!("{table}");
        }

        for warning in &report.warnings {
            println!(
                "{} {}",
                self.style(Style::new().yellow()).apply_to("warning:"),
                warning.message
            );
        }

        if report.ignored > 0 {
            println!("{} error(s) ignored by filters", report.ignored);
        }

        if let Some(fatal) = &report.fatal {
            println!("{} {fatal}", self.style(Style::new().red().bold()).apply_to("fatal:"));
        }

        if report.success {
            println!("{}", self.style(Style::new().green()).apply_to("[OK] All artifacts match"));
        } else {
            println!(
                "{}",
                self.style(Style::new().red())
                    .apply_to(format!("[ERROR] {} error(s) recorded", report.error_count))
            );
        }

        Ok(())
    }

    fn render_discovery(&self, summary: &DiscoverySummary) {
        println!(
            "{} {} artifact(s) from {} listing(s) under {} into {}",
            self.style(Style::new().bold()).apply_to("Discovered"),
            summary.artifacts,
            summary.listings,
            summary.origin,
            summary.manifest
        );
        if summary.failed_listings > 0 {
            println!(
                "{} {} listing(s) could not be fetched",
                self.style(Style::new().yellow()).apply_to("warning:"),
                summary.failed_listings
            );
        }
    }

    fn style(&self, style: Style) -> Style {
        if self.colors {
            style
        } else {
            Style::new()
        }
    }
}
