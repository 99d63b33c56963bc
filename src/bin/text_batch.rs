use clap::Parser;
use text_pipeline::config::toml_config::TomlConfig;
use text_pipeline::core::ConfigProvider;
use text_pipeline::utils::{logger, validation::Validate};
use text_pipeline::{BatchEngine, LinePipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "text-batch")]
#[command(about = "Run the text pipeline over every line of a file, driven by a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "text-pipeline.toml")]
    config: String,

    /// Override the input path from config ("-" reads standard input)
    #[arg(short, long)]
    input: Option<String>,

    /// Override the output directory from config
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_batch_logger(args.verbose, args.log_json);

    tracing::info!("🚀 Starting text batch tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.source.path = input;
    }
    if let Some(output) = args.output.clone() {
        tracing::info!("🔧 Output overridden to: {}", output);
        config.load.output_path = output;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        println!("✅ Dry run complete. Remove --dry-run to process the input.");
        return Ok(());
    }

    // 相對路徑以目前工作目錄為起點
    let storage = LocalStorage::new(".");
    let pipeline = LinePipeline::new(storage, config);
    let engine = BatchEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            println!("✅ Processed {} lines", report.summary.processed);
            println!("   Blank lines skipped: {}", report.summary.skipped_blank);
            println!("   Plausible emails: {}", report.summary.plausible_emails);
            println!("   Records written: {}", report.records_written);
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Batch run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if let Some(max_records) = config.max_records() {
        println!("  Max Records: {}", max_records);
    }

    println!("  Skip Blank Lines: {}", config.skip_blank_lines());
    println!("  Emails Only: {}", config.emails_only());

    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
