use clap::Parser;
use pokemon_popularity::config::OutputFormat;
use pokemon_popularity::render::{export_trends_csv, ReportRenderer};
use pokemon_popularity::utils::error::ErrorSeverity;
use pokemon_popularity::utils::logger::{self, LogFormat};
use pokemon_popularity::utils::validation::Validate;
use pokemon_popularity::{
    AggregateResult, AppConfig, CanonicalNameSet, CliConfig, HttpAggregator, PopularityError,
};

fn fail(e: &PopularityError) -> ! {
    tracing::error!(
        "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,      // 輸入錯誤
        ErrorSeverity::Medium => 2,   // 可重試
        ErrorSeverity::High => 3,     // 設定錯誤
        ErrorSeverity::Critical => 4, // 系統錯誤
    };
    std::process::exit(exit_code);
}

fn load_config(cli: &CliConfig) -> Result<AppConfig, PopularityError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn output(cli: &CliConfig, result: &AggregateResult) -> Result<(), PopularityError> {
    let mut renderer = ReportRenderer::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.format {
        OutputFormat::Text => renderer.render_text(result, &mut out)?,
        OutputFormat::Json => renderer.render_json(result, &mut out)?,
    }

    if let Some(path) = &cli.trends_csv {
        export_trends_csv(result, path)?;
        tracing::info!("📁 Trend series saved to: {}", path);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_flag(cli.log_json), cli.verbose);

    tracing::info!("Starting pokemon-popularity");
    tracing::debug!(
        "Lookup: {} (format: {:?}, config: {:?})",
        cli.name,
        cli.format,
        cli.config
    );

    let config = load_config(&cli).unwrap_or_else(|e| fail(&e));

    // 名字與憑證都在任何網路請求之前檢查
    let name = CanonicalNameSet::bundled()
        .check(&cli.name)
        .unwrap_or_else(|e| fail(&e));
    let aggregator = HttpAggregator::from_config(&config).unwrap_or_else(|e| fail(&e));

    let result = aggregator
        .aggregate(&name)
        .await
        .unwrap_or_else(|e| fail(&e));

    output(&cli, &result).unwrap_or_else(|e| fail(&e));
    Ok(())
}
