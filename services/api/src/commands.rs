use crate::infra::parse_threshold;
use clap::Args;
use fair_lending::config::{AppConfig, ArtifactConfig, FairnessConfig};
use fair_lending::error::AppError;
use fair_lending::lending::dataset;
use fair_lending::lending::domain::ProtectedGroup;
use fair_lending::lending::scoring::{FairnessAudit, PreprocessorArtifact};
use fair_lending::lending::{ApprovalBaseline, FeatureTransformer, LoanScoringService};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct PrepareArgs {
    /// Labelled loan application CSV used to fit the transformer
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Where to write the preprocessor artifact (defaults to the configured path)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    /// Print per-column statistics of the transformed training data
    #[arg(long)]
    pub(crate) show_stats: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// Labelled loan application CSV to score and audit
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Maximum tolerated disparity (defaults to APP_FAIRNESS_THRESHOLD)
    #[arg(long, value_parser = parse_threshold)]
    pub(crate) threshold: Option<f64>,
    /// Directory holding the model and preprocessor artifacts
    #[arg(long)]
    pub(crate) model_dir: Option<PathBuf>,
}

pub(crate) struct PrepareOutcome {
    pub(crate) path: PathBuf,
    pub(crate) rows: usize,
    pub(crate) artifact: PreprocessorArtifact,
}

pub(crate) fn run_prepare(args: PrepareArgs) -> Result<(), AppError> {
    let PrepareArgs {
        data,
        out,
        show_stats,
    } = args;

    let out = match out {
        Some(path) => path,
        None => AppConfig::load()?.artifacts.preprocessor_path,
    };
    let outcome = prepare(&data, &out)?;
    print!("{}", render_prepare_summary(&outcome, show_stats));
    Ok(())
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let AuditArgs {
        data,
        threshold,
        model_dir,
    } = args;

    let config = AppConfig::load()?;
    let artifacts = match model_dir {
        Some(dir) => config.artifacts.in_dir(dir),
        None => config.artifacts,
    };
    let threshold = threshold.unwrap_or(config.fairness.threshold);

    let audit = audit(&artifacts, config.fairness, &data, threshold)?;
    println!("{}", audit.rendered);
    println!();
    println!("Threshold: {threshold:.3}");
    println!("Verdict: {}", audit.verdict.summary());
    Ok(())
}

/// Fit a transformer on `data`, attach the label baseline and persist the artifact.
pub(crate) fn prepare(data: &Path, out: &Path) -> Result<PrepareOutcome, AppError> {
    let records = dataset::read_records(data)?;
    let mut transformer = FeatureTransformer::new();
    let features = transformer.fit_transform(&records)?;
    let baseline = ApprovalBaseline::from_features(&features).transpose()?;

    let artifact = PreprocessorArtifact::new(transformer, baseline)?;
    artifact.save(out)?;

    Ok(PrepareOutcome {
        path: out.to_path_buf(),
        rows: records.len(),
        artifact,
    })
}

pub(crate) fn audit(
    artifacts: &ArtifactConfig,
    fairness: FairnessConfig,
    data: &Path,
    threshold: f64,
) -> Result<FairnessAudit, AppError> {
    let service = LoanScoringService::load(artifacts)?.with_fairness_config(fairness);
    let records = dataset::read_records(data)?;
    Ok(service.audit(&records, threshold)?)
}

pub(crate) fn render_prepare_summary(outcome: &PrepareOutcome, show_stats: bool) -> String {
    let transformer = &outcome.artifact.transformer;
    let columns = transformer.columns().unwrap_or_default();

    let mut lines = vec![
        format!("Preprocessor fitted on {} applications", outcome.rows),
        format!("- Artifact: {}", outcome.path.display()),
        format!("- Output columns: {}", columns.len()),
    ];
    if let Some(encoding) = transformer.encoding() {
        lines.push(format!(
            "- Loan purposes: {}",
            encoding.purpose_values().join(", ")
        ));
    }
    match &outcome.artifact.approval_baseline {
        Some(baseline) => {
            lines.push("Historical approval rates:".to_string());
            for group in [ProtectedGroup::Privileged, ProtectedGroup::Unprivileged] {
                lines.push(format!(
                    "  - {}: {:.3}",
                    group.label(),
                    baseline.approval_rate(group)
                ));
            }
        }
        None => {
            lines.push("Historical approval rates: unavailable (unlabelled data)".to_string())
        }
    }

    if show_stats {
        if let Some(stats) = transformer.feature_stats() {
            lines.push(String::new());
            lines.push(format!(
                "{:<28} {:>10} {:>10} {:>10} {:>10}",
                "column", "mean", "std", "min", "max"
            ));
            lines.extend(columns.iter().filter_map(|column| {
                stats.get(column).map(|entry| {
                    format!(
                        "{:<28} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                        column, entry.mean, entry.std, entry.min, entry.max
                    )
                })
            }));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
