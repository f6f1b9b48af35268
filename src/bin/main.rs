//! RTSVM Command Line Interface
//!
//! Model selection for Twin SVM classifiers: grid search over C1/C2/gamma,
//! single-point evaluation and search-space inspection, on LibSVM and CSV
//! data.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use rtsvm::core::{Estimator, HyperParams, Matrix, Result, TsvmError};
use rtsvm::metrics::MetricsReport;
use rtsvm::selection::{
    generate, EvaluationMethod, ExponentRange, FailurePolicy, GridSearch, SearchReport,
    SearchSpace, SearchStrategy, ValidationResult, Validator,
};
use rtsvm::utils::scaling::{fit_transform, ScalingMethod};
use rtsvm::utils::validation::{check_label_balance, class_labels, validate_binary_labels};
use rtsvm::{CSVDataset, Dataset, KernelType, LibSVMDataset, OneVsAll, OneVsOne, ResultsFile, TwinSvm};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "rtsvm")]
#[command(about = "Model selection and validation for Twin Support Vector Machines")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "RTSVM Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Grid search over a hyperparameter search space
    Search(SearchArgs),
    /// Validate a single hyperparameter point
    Evaluate(EvaluateArgs),
    /// Print the generated search space
    Space(SpaceArgs),
}

#[derive(Args)]
struct DataArgs {
    /// Data file (LibSVM or CSV format)
    #[arg(long)]
    data: PathBuf,

    /// Data format: auto, libsvm, or csv
    #[arg(short, long, default_value = "auto")]
    format: String,

    /// Dataset name used in result names (defaults to the file stem)
    #[arg(long)]
    name: Option<String>,

    /// Feature scaling method
    #[arg(long)]
    feature_scaling: Option<CliScalingMethod>,
}

#[derive(Args)]
struct ModelArgs {
    /// Kernel function
    #[arg(short, long, default_value = "linear")]
    kernel: CliKernel,

    /// Classifier: binary TSVM or a multi-class scheme
    #[arg(long, default_value = "tsvm")]
    classifier: CliClassifier,

    /// Evaluation method: cv:<folds> or split:<test fraction>
    #[arg(short, long, default_value = "cv:5")]
    method: EvaluationMethod,
}

#[derive(Args)]
struct RangeArgs {
    /// C1 exponent range lo:hi (values 2^lo .. 2^hi)
    #[arg(long, default_value = "-8:2", allow_hyphen_values = true)]
    c1_range: ExponentRange,

    /// C2 exponent range lo:hi
    #[arg(long, default_value = "-8:2", allow_hyphen_values = true)]
    c2_range: ExponentRange,

    /// Gamma exponent range lo:hi (required for the RBF kernel)
    #[arg(long, allow_hyphen_values = true)]
    gamma_range: Option<ExponentRange>,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    model: ModelArgs,

    #[command(flatten)]
    ranges: RangeArgs,

    /// What to do when a point fails to validate
    #[arg(long, default_value = "skip")]
    on_failure: CliFailurePolicy,

    /// Directory for the JSON result file (not written if omitted)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct EvaluateArgs {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    model: ModelArgs,

    /// Parameter C1
    #[arg(long, default_value = "1.0")]
    c1: f64,

    /// Parameter C2
    #[arg(long, default_value = "1.0")]
    c2: f64,

    /// RBF kernel width
    #[arg(short, long)]
    gamma: Option<f64>,

    /// Show per-fold metrics
    #[arg(long)]
    detailed: bool,
}

#[derive(Args)]
struct SpaceArgs {
    /// Kernel function
    #[arg(short, long, default_value = "linear")]
    kernel: CliKernel,

    #[command(flatten)]
    ranges: RangeArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliKernel {
    /// Linear kernel
    #[value(name = "linear")]
    Linear,
    /// Gaussian RBF kernel
    #[value(name = "rbf")]
    Rbf,
}

impl From<CliKernel> for KernelType {
    fn from(kernel: CliKernel) -> Self {
        match kernel {
            CliKernel::Linear => KernelType::Linear,
            CliKernel::Rbf => KernelType::Rbf,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliClassifier {
    /// Binary TSVM, labels must be +1/-1
    #[value(name = "tsvm")]
    Tsvm,
    /// One-vs-all multi-class TSVM
    #[value(name = "ova")]
    Ova,
    /// One-vs-one multi-class TSVM
    #[value(name = "ovo")]
    Ovo,
}

#[derive(ValueEnum, Clone, Debug)]
enum CliScalingMethod {
    /// Min-Max scaling to [-1, 1] range
    #[value(name = "minmax")]
    MinMax,
    /// Standard score (Z-score) normalization
    #[value(name = "standard")]
    StandardScore,
    /// Unit scaling by maximum absolute value
    #[value(name = "unit")]
    UnitScale,
}

impl From<CliScalingMethod> for ScalingMethod {
    fn from(cli_method: CliScalingMethod) -> Self {
        match cli_method {
            CliScalingMethod::MinMax => ScalingMethod::MinMax {
                min_val: -1.0,
                max_val: 1.0,
            },
            CliScalingMethod::StandardScore => ScalingMethod::StandardScore,
            CliScalingMethod::UnitScale => ScalingMethod::UnitScale,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliFailurePolicy {
    /// Log and skip failing points
    #[value(name = "skip")]
    Skip,
    /// Stop at the first failing point
    #[value(name = "abort")]
    Abort,
}

impl From<CliFailurePolicy> for FailurePolicy {
    fn from(policy: CliFailurePolicy) -> Self {
        match policy {
            CliFailurePolicy::Skip => FailurePolicy::Skip,
            CliFailurePolicy::Abort => FailurePolicy::Abort,
        }
    }
}

/// Dataset loaded into memory, optionally scaled
struct LoadedData {
    name: String,
    features: Matrix,
    labels: Vec<f64>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Search(args) => search_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Space(args) => space_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn search_command(args: SearchArgs) -> Result<()> {
    let data = load_data(&args.data)?;
    let kernel: KernelType = args.model.kernel.into();
    let space = build_space(kernel, &args.ranges)?;
    let method = args.model.method;
    let policy: FailurePolicy = args.on_failure.into();

    info!(
        "Grid search on {} ({} samples) over {} points",
        data.name,
        data.labels.len(),
        space.len()
    );

    let base = TwinSvm::new(kernel);
    let (classifier, report) = match args.model.classifier {
        CliClassifier::Tsvm => run_grid(
            &Validator::binary(&data.features, &data.labels, method, base)?,
            &space,
            policy,
        )?,
        CliClassifier::Ova => run_grid(
            &Validator::multiclass(&data.features, &data.labels, method, OneVsAll::new(base))?,
            &space,
            policy,
        )?,
        CliClassifier::Ovo => run_grid(
            &Validator::multiclass(&data.features, &data.labels, method, OneVsOne::new(base))?,
            &space,
            policy,
        )?,
    };

    let results = ResultsFile::new(&data.name, &classifier, kernel.name(), method, report);
    results.print_summary();

    if let Some(dir) = &args.output_dir {
        let path = results.save_to_dir(dir)?;
        println!("Results saved to: {}", path.display());
    }

    Ok(())
}

fn run_grid<E: Estimator + Clone>(
    validator: &Validator<'_, E>,
    space: &SearchSpace,
    policy: FailurePolicy,
) -> Result<(String, SearchReport)> {
    let report = GridSearch::new(validator, space)
        .with_failure_policy(policy)
        .run()?;
    if !report.failures.is_empty() {
        warn!("{} of {} points failed", report.failures.len(), space.len());
    }
    Ok((validator.estimator().name(), report))
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    let data = load_data(&args.data)?;
    let kernel: KernelType = args.model.kernel.into();
    let method = args.model.method;

    let mut params = HyperParams::new(args.c1, args.c2);
    if let Some(gamma) = args.gamma {
        params = params.with_gamma(gamma);
    }

    let base = TwinSvm::new(kernel);
    let (classifier, strategy, result) = match args.model.classifier {
        CliClassifier::Tsvm => validate_point(
            &Validator::binary(&data.features, &data.labels, method, base)?,
            &params,
        )?,
        CliClassifier::Ova => validate_point(
            &Validator::multiclass(&data.features, &data.labels, method, OneVsAll::new(base))?,
            &params,
        )?,
        CliClassifier::Ovo => validate_point(
            &Validator::multiclass(&data.features, &data.labels, method, OneVsOne::new(base))?,
            &params,
        )?,
    };

    println!("=== Validation Results ===");
    println!(
        "Result: {}",
        rtsvm::selection::result_name(&data.name, &classifier, kernel.name(), &method)
    );
    println!("Strategy: {strategy}");
    println!("Parameters: {params}");
    println!("Accuracy: {:.2}%", result.mean_accuracy);
    println!("Std deviation: {:.2}", result.std_deviation);

    for (i, report) in result.fold_metrics.iter().enumerate() {
        println!("  Fold {}: {:.2}%", i + 1, report.accuracy());
        if args.detailed {
            print_metrics(report);
        }
    }

    Ok(())
}

fn validate_point<E: Estimator + Clone>(
    validator: &Validator<'_, E>,
    params: &HyperParams,
) -> Result<(String, String, ValidationResult)> {
    let result = validator.validate(params)?;
    Ok((
        validator.estimator().name(),
        validator.choose_validator().to_string(),
        result,
    ))
}

fn print_metrics(report: &MetricsReport) {
    match report {
        MetricsReport::Binary(m) => {
            println!("    TP: {}  TN: {}  FP: {}  FN: {}", m.tp, m.tn, m.fp, m.fn_);
            println!(
                "    Positive: precision {:.2}  recall {:.2}  F1 {:.2}",
                m.precision_pos, m.recall_pos, m.f1_pos
            );
            println!(
                "    Negative: precision {:.2}  recall {:.2}  F1 {:.2}",
                m.precision_neg, m.recall_neg, m.f1_neg
            );
        }
        MetricsReport::MultiClass(m) => {
            for class in &m.classes {
                println!(
                    "    Class {}: precision {:.2}  recall {:.2}  F1 {:.2}",
                    class.label, class.precision, class.recall, class.f1
                );
            }
        }
    }
}

fn space_command(args: SpaceArgs) -> Result<()> {
    let space = build_space(args.kernel.into(), &args.ranges)?;

    println!("# {} points", space.len());
    for (i, params) in space.iter().enumerate() {
        println!("{}\t{params}", i + 1);
    }

    Ok(())
}

fn build_space(kernel: KernelType, ranges: &RangeArgs) -> Result<SearchSpace> {
    if !kernel.has_width_parameter() && ranges.gamma_range.is_some() {
        warn!("Gamma range is ignored for the {kernel} kernel");
    }
    generate(
        kernel,
        SearchStrategy::FullGrid,
        ranges.c1_range,
        ranges.c2_range,
        ranges.gamma_range,
    )
}

fn load_data(args: &DataArgs) -> Result<LoadedData> {
    let format = if args.format == "auto" {
        detect_format(&args.data)
    } else {
        args.format.clone()
    };

    info!("Loading {:?} as {format} format", args.data);

    let mut data = match format.as_str() {
        "libsvm" => into_loaded(LibSVMDataset::from_file(&args.data)?),
        "csv" => into_loaded(CSVDataset::from_file(&args.data)?),
        _ => {
            return Err(TsvmError::InvalidParameter(format!(
                "Unsupported format: {format}. Use 'libsvm' or 'csv'"
            )))
        }
    };

    info!(
        "Loaded {} samples with {} dimensions",
        data.labels.len(),
        data.features.ncols()
    );

    if validate_binary_labels(&data.labels).is_ok() {
        let (positive, negative, ratio) = check_label_balance(&data.labels);
        info!("Binary labels: {positive} positive, {negative} negative (ratio {ratio:.2})");
    } else {
        info!("{} distinct classes", class_labels(&data.labels).len());
    }

    if let Some(name) = &args.name {
        data.name = name.clone();
    }

    if let Some(method) = &args.feature_scaling {
        info!("Using feature scaling: {method:?}");
        let (scaled, _) = fit_transform(&data.features, method.clone().into());
        data.features = scaled;
    }

    Ok(data)
}

fn into_loaded<D: Dataset>(dataset: D) -> LoadedData {
    LoadedData {
        name: dataset.name().to_string(),
        features: dataset.features().clone(),
        labels: dataset.labels().to_vec(),
    }
}

fn detect_format(path: &Path) -> String {
    if let Some(ext) = path.extension() {
        match ext.to_str() {
            Some("csv") => "csv".to_string(),
            Some("libsvm") | Some("svm") => "libsvm".to_string(),
            _ => {
                warn!("Unknown file extension, assuming LibSVM format");
                "libsvm".to_string()
            }
        }
    } else {
        warn!("No file extension, assuming LibSVM format");
        "libsvm".to_string()
    }
}
