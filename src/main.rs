use anyhow::Context;
use clap::Parser;
use metafield_transfer::utils::{logger, validation::Validate};
use metafield_transfer::{
    inspect_export, run_export, run_import, Cli, Command, ImportSummary, TransferConfig,
    TransferError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting metafield-transfer");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut config = TransferConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load config file '{}'", cli.config))?;

    if let Command::Import {
        strict_handles: true,
        ..
    } = cli.command
    {
        config.matching.strict_handles = true;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let export_id = cli.command.export_id();
    let outcome = match &cli.command {
        Command::Export => run_export(&config).await.map(|report| {
            println!("✅ Export completed: {} products with metafields", report.records);
            println!("📁 Export saved as: {}", report.export_id);
        }),
        Command::Import { .. } => run_import(&config, export_id.as_ref())
            .await
            .map(|summary| print_summary(&summary)),
        Command::Inspect { .. } => {
            inspect_export(&config, export_id.as_ref())
                .await
                .map(|(id, rows)| {
                    println!("📁 {} ({} products)", id, rows.len());
                    for row in &rows {
                        match row {
                            Ok(record) => println!(
                                "   {} ({}) - {} metafields",
                                record.title,
                                record.handle,
                                record.metafields.len()
                            ),
                            Err(malformed) => println!("   ❌ {}", malformed),
                        }
                    }
                })
        }
    };

    if let Err(e) = outcome {
        report_failure(&e);
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    println!("Import Summary:");
    println!("✅ Successfully processed: {} products", summary.processed);
    println!("❌ Products not found: {}", summary.not_found);
    println!("⚠️  Processing errors: {}", summary.errored);
    println!(
        "📝 Metafields created: {} (already present: {}, failed: {})",
        summary.metafields_created, summary.metafields_duplicate, summary.metafield_errors
    );

    if !summary.all_matched() {
        println!("❌ Products not found in destination store:");
        for product in &summary.not_found_products {
            println!("   - {}", product);
        }
    }
    if !summary.malformed_rows.is_empty() {
        println!("❌ Export rows that could not be read:");
        for row in &summary.malformed_rows {
            println!("   - {}", row);
        }
    }
}

fn report_failure(e: &TransferError) {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = e.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
