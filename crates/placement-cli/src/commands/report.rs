//! Report commands
//!
//! Generate a report file offline, or preview the rows behind a report.

use anyhow::Result;
use clap::{Args, Subcommand};
use placement_core::{ReportRequest, ReportService, ReportSource};

use crate::commands::Context;
use crate::output::{print_info, print_rows, print_success};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Generate a report document and write it to a file
    Generate {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Document format: pdf, excel or csv
        #[arg(long = "as", value_name = "FORMAT", default_value = "pdf")]
        file_format: String,

        /// Output file path (default: placement_report.<format>)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the rows a report would contain
    Show {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

/// Report type plus the scoping field it needs
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Report type: individual, branch or batch
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub report_type: String,

    /// Student id (individual reports)
    #[arg(long)]
    pub student_id: Option<String>,

    /// Branch (branch reports)
    #[arg(long)]
    pub branch: Option<String>,

    /// Batch year (batch reports)
    #[arg(long)]
    pub year: Option<String>,
}

impl ScopeArgs {
    fn into_request(self, format: &str) -> ReportRequest {
        ReportRequest {
            report_type: self.report_type,
            format: format.to_string(),
            student_id: self.student_id,
            year: self.year,
            branch: self.branch,
        }
    }
}

pub async fn execute(ctx: &Context, action: ReportAction) -> Result<()> {
    match action {
        ReportAction::Generate {
            scope,
            file_format,
            output,
        } => generate(ctx, scope, file_format, output).await,
        ReportAction::Show { scope } => show(ctx, scope).await,
    }
}

async fn generate(
    ctx: &Context,
    scope: ScopeArgs,
    file_format: String,
    output: Option<String>,
) -> Result<()> {
    let request = scope.into_request(&file_format);
    print_info(
        &format!("Generating {} report as {}", request.report_type, request.format),
        ctx.quiet,
    );

    let service = ReportService::new(ctx.db.clone());
    let buffer = service.generate(&request).await?;

    let path = match output {
        Some(path) => shellexpand::tilde(&path).to_string(),
        None => buffer.file_name(),
    };
    std::fs::write(&path, buffer.bytes())?;
    log::debug!("Report written to {}", path);

    print_success(
        &format!("Wrote {} bytes ({}) to {}", buffer.bytes().len(), buffer.content_type(), path),
        ctx.quiet,
    );
    Ok(())
}

async fn show(ctx: &Context, scope: ScopeArgs) -> Result<()> {
    // Format is irrelevant here; only the scope is resolved
    let request = scope.into_request("");
    let rows = ctx.db.fetch(&request.scope()?).await?;
    print_rows(&rows, ctx.format)
}
