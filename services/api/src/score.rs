use clap::Args;
use receipt_points::error::AppError;
use receipt_points::receipts::{
    validate, PointsBreakdown, PointsEngine, ReceiptServiceError, ValidationErrors,
};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Receipt JSON file in the same shape accepted by POST /receipts/process
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the total only, without the per-rule breakdown
    #[arg(long)]
    pub(crate) quiet: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let reader = BufReader::new(File::open(&args.file)?);
    let payload: Value = serde_json::from_reader(reader)?;

    match score_payload(&payload) {
        Ok(breakdown) => {
            if args.quiet {
                println!("{}", breakdown.total);
            } else {
                print!("{}", render_breakdown(&breakdown));
            }
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                println!("- {}: {}", error.field, error.message);
            }
            Err(ReceiptServiceError::Validation(errors).into())
        }
    }
}

fn score_payload(payload: &Value) -> Result<PointsBreakdown, ValidationErrors> {
    let receipt = validate(payload)?;
    Ok(PointsEngine::new().score(&receipt))
}

fn render_breakdown(breakdown: &PointsBreakdown) -> String {
    let mut output = String::from("Points breakdown\n");
    for component in &breakdown.components {
        output.push_str(&format!(
            "  {:<24} {:>5}  {}\n",
            component.rule.label(),
            component.points,
            component.notes
        ));
    }
    output.push_str(&format!("  {:<24} {:>5}\n", "Total", breakdown.total));
    output
}
