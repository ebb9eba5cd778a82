//! Output formatters: console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, ResumeGapError};
use crate::output::report::GapReport;
use crate::processing::gap_analyzer::Priority;
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::Path;

/// Trait for formatting gap reports
pub trait OutputFormatter {
    fn format_report(&self, report: &GapReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured consumers
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches to the formatter matching the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn fmt_err(e: std::fmt::Error) -> ResumeGapError {
    ResumeGapError::OutputFormatting(e.to_string())
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            75..=100 => ("STRONG", Color::Green),
            60..=74 => ("GOOD", Color::BrightGreen),
            45..=59 => ("MODERATE", Color::Yellow),
            30..=44 => ("WEAK", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn priority_tag(&self, priority: Priority) -> String {
        let (tag, color) = match priority {
            Priority::Critical => ("[!]", Color::Red),
            Priority::Moderate => ("[*]", Color::Yellow),
            Priority::Minor => ("[-]", Color::Blue),
        };
        self.colorize(tag, color)
    }

    fn coverage_bar(ratio: f32) -> String {
        let filled = (ratio.clamp(0.0, 1.0) * 10.0).round() as usize;
        format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &GapReport) -> Result<String> {
        let mut output = String::new();
        let analysis = &report.analysis;

        output.push_str(&self.format_header("RESUME SKILL GAP ANALYSIS", 1));
        writeln!(
            output,
            "Generated: {}",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .map_err(fmt_err)?;

        output.push_str(&self.format_header("Summary", 2));
        writeln!(
            output,
            "Text similarity: {}% {}",
            report.summary.similarity_percentage,
            self.format_score_badge(report.summary.similarity_percentage)
        )
        .map_err(fmt_err)?;
        writeln!(output, "Required skills found: {}%", report.summary.skill_match_percentage).map_err(fmt_err)?;
        writeln!(output, "Match confidence: {}%", report.summary.match_confidence_percentage).map_err(fmt_err)?;
        writeln!(output, "Verdict: {}", self.colorize(&report.summary.verdict, Color::Cyan)).map_err(fmt_err)?;

        if !report.summary.strengths.is_empty() {
            output.push_str(&self.format_header("Strengths", 3));
            for strength in &report.summary.strengths {
                writeln!(output, "  • {}", self.colorize(strength, Color::Green)).map_err(fmt_err)?;
            }
        }

        output.push_str(&self.format_header("Skill Gaps", 2));
        if analysis.gaps.is_empty() {
            writeln!(output, "No skill gaps found.").map_err(fmt_err)?;
        }
        for gap in &analysis.gaps {
            writeln!(
                output,
                "{} {} {}",
                self.priority_tag(gap.priority),
                self.colorize(&gap.skill.canonical_name, Color::White),
                self.colorize(&format!("({}, {})", gap.skill.category, gap.kind), Color::BrightBlack)
            )
            .map_err(fmt_err)?;
            writeln!(
                output,
                "    {} {}",
                gap.reason,
                self.colorize(&format!("[impact {:.2}]", gap.impact), Color::BrightBlack)
            )
            .map_err(fmt_err)?;
            if !gap.similar_terms.is_empty() {
                writeln!(output, "    Did you mean: {}", gap.similar_terms.join(", ")).map_err(fmt_err)?;
            }
        }

        if !analysis.category_coverage.is_empty() {
            output.push_str(&self.format_header("Category Coverage", 2));
            for coverage in &analysis.category_coverage {
                writeln!(
                    output,
                    "  {:<14} {} {:>3.0}% ({}/{})",
                    coverage.category,
                    Self::coverage_bar(coverage.ratio),
                    coverage.ratio * 100.0,
                    coverage.matched_count,
                    coverage.required_count
                )
                .map_err(fmt_err)?;
            }
        }

        if !report.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 2));
            for (i, rec) in report.recommendations.iter().enumerate() {
                writeln!(output, "{}. {} {}", i + 1, self.priority_tag(rec.priority), rec.title).map_err(fmt_err)?;
                writeln!(output, "   {}", rec.description).map_err(fmt_err)?;
                writeln!(output, "   Action: {}", self.colorize(&rec.action, Color::Green)).map_err(fmt_err)?;
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Detailed Analysis", 2));

            let similarity = &analysis.similarity;
            writeln!(
                output,
                "Method: {} | Jaccard: {:.1}% | Job term coverage: {:.1}%",
                similarity.method,
                similarity.jaccard_similarity * 100.0,
                similarity.term_coverage * 100.0
            )
            .map_err(fmt_err)?;

            if !similarity.top_matching_terms.is_empty() {
                output.push_str(&self.format_header("Top Matching Terms", 3));
                for term in &similarity.top_matching_terms {
                    writeln!(output, "  {:<20} {:.3}", term.term, term.weight).map_err(fmt_err)?;
                }
            }
            if !similarity.job_unique_terms.is_empty() {
                writeln!(output, "\nOnly in job description: {}", similarity.job_unique_terms.join(", ")).map_err(fmt_err)?;
            }
            if !similarity.resume_unique_terms.is_empty() {
                writeln!(output, "Only in resume: {}", similarity.resume_unique_terms.join(", ")).map_err(fmt_err)?;
            }

            output.push_str(&self.format_header("Extracted Skills", 3));
            for (label, skills) in [("Resume", &analysis.resume_skills), ("Job", &analysis.job_skills)] {
                let listed: Vec<String> = skills
                    .iter()
                    .map(|s| format!("{} x{}", s.canonical_name, s.occurrence_count))
                    .collect();
                writeln!(output, "  {}: {}", label, listed.join(", ")).map_err(fmt_err)?;
            }

            writeln!(
                output,
                "\nResume: {} words, {} tokens | Job: {} words, {} tokens | Catalog v{}",
                analysis.resume_stats.word_count,
                analysis.resume_stats.token_count,
                analysis.job_stats.word_count,
                analysis.job_stats.token_count,
                report.metadata.catalog_version
            )
            .map_err(fmt_err)?;
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &GapReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &GapReport) -> Result<String> {
        let mut md = String::new();
        let analysis = &report.analysis;

        writeln!(md, "# Resume Skill Gap Analysis\n").map_err(fmt_err)?;
        writeln!(md, "## Summary\n").map_err(fmt_err)?;
        writeln!(md, "| Metric | Value |").map_err(fmt_err)?;
        writeln!(md, "|--------|-------|").map_err(fmt_err)?;
        writeln!(md, "| Text similarity | {}% |", report.summary.similarity_percentage).map_err(fmt_err)?;
        writeln!(md, "| Required skills found | {}% |", report.summary.skill_match_percentage).map_err(fmt_err)?;
        writeln!(md, "| Match confidence | {}% |", report.summary.match_confidence_percentage).map_err(fmt_err)?;
        writeln!(md, "| Verdict | {} |\n", report.summary.verdict).map_err(fmt_err)?;

        if !report.summary.strengths.is_empty() {
            writeln!(md, "### Strengths\n").map_err(fmt_err)?;
            for strength in &report.summary.strengths {
                writeln!(md, "- {}", strength).map_err(fmt_err)?;
            }
            md.push('\n');
        }

        writeln!(md, "## Skill Gaps\n").map_err(fmt_err)?;
        if analysis.gaps.is_empty() {
            writeln!(md, "No skill gaps found.\n").map_err(fmt_err)?;
        } else {
            writeln!(md, "| Priority | Skill | Category | Kind | Impact | Reason |").map_err(fmt_err)?;
            writeln!(md, "|----------|-------|----------|------|--------|--------|").map_err(fmt_err)?;
            for gap in &analysis.gaps {
                writeln!(
                    md,
                    "| {} | {} | {} | {} | {:.2} | {} |",
                    gap.priority, gap.skill.canonical_name, gap.skill.category, gap.kind, gap.impact, gap.reason
                )
                .map_err(fmt_err)?;
            }
            md.push('\n');
        }

        if !analysis.category_coverage.is_empty() {
            writeln!(md, "## Category Coverage\n").map_err(fmt_err)?;
            writeln!(md, "| Category | Matched | Required | Coverage |").map_err(fmt_err)?;
            writeln!(md, "|----------|---------|----------|----------|").map_err(fmt_err)?;
            for coverage in &analysis.category_coverage {
                writeln!(
                    md,
                    "| {} | {} | {} | {:.0}% |",
                    coverage.category,
                    coverage.matched_count,
                    coverage.required_count,
                    coverage.ratio * 100.0
                )
                .map_err(fmt_err)?;
            }
            md.push('\n');
        }

        if !report.recommendations.is_empty() {
            writeln!(md, "## Recommendations\n").map_err(fmt_err)?;
            for (i, rec) in report.recommendations.iter().enumerate() {
                writeln!(md, "{}. **{}** ({}): {}", i + 1, rec.title, rec.priority, rec.description).map_err(fmt_err)?;
                writeln!(md, "   - Action: {}", rec.action).map_err(fmt_err)?;
            }
            md.push('\n');
        }

        if self.include_metadata {
            writeln!(md, "---\n").map_err(fmt_err)?;
            writeln!(
                md,
                "*Generated {} by resume-gap v{} (catalog v{})*",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.tool_version,
                report.metadata.catalog_version
            )
            .map_err(fmt_err)?;
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate(&self, report: &GapReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn save_report(&self, report: &GapReport, format: OutputFormat, path: &Path) -> Result<()> {
        let content = self.generate(report, format)?;
        std::fs::write(path, content)?;
        log::info!("Report saved to {}", path.display());
        Ok(())
    }
}
