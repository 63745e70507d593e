use bid_timeout::utils::{logger, validation::Validate};
use bid_timeout::{adjusted_timeout, evaluate, CliConfig, ModifierBreakdown, RuleTable};
use clap::Parser;
use serde::Serialize;

#[derive(Serialize)]
struct TimeoutReport<'a> {
    base_timeout_ms: u64,
    modifier_ms: i64,
    timeout_ms: u64,
    breakdown: &'a ModifierBreakdown,
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting bid-timeout CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let rules = match RuleTable::from_file(&config.rules) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("❌ Failed to load rule table '{}': {}", config.rules, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 嚴格模式：先檢查規則表
    if config.strict {
        if let Err(e) = rules.validate() {
            tracing::error!("❌ Rule table validation failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
        tracing::info!("✅ Rule table passed strict validation");
    }

    let placements = match config.load_placements() {
        Ok(placements) => placements,
        Err(e) => {
            eprintln!("❌ Failed to load placements: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let signals = config.signals();
    let breakdown = evaluate(&placements, Some(&rules), &signals);
    let modifier = breakdown.total();
    let timeout = adjusted_timeout(config.base_timeout, modifier);
    tracing::debug!(
        "Classified device={} connection={} video={} placements={}",
        breakdown.classification.device,
        breakdown.classification.connection,
        breakdown.classification.has_video,
        breakdown.classification.placement_count
    );
    tracing::debug!("Timeout modifier: {:+} ms", modifier);

    if config.json {
        let report = TimeoutReport {
            base_timeout_ms: config.base_timeout,
            modifier_ms: modifier,
            timeout_ms: timeout,
            breakdown: &breakdown,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_breakdown(&breakdown);
        println!(
            "⏱️  Timeout: {} ms (base {} ms, modifier {:+} ms)",
            timeout, config.base_timeout, modifier
        );
    }

    Ok(())
}

fn display_breakdown(breakdown: &ModifierBreakdown) {
    let classification = &breakdown.classification;
    println!("📋 Signals:");
    println!("  Device: {}", classification.device);
    println!("  Connection: {}", classification.connection);
    println!("  Video: {}", classification.has_video);
    println!("  Placements: {}", classification.placement_count);
    println!();

    println!("🔧 Modifiers:");
    for contribution in &breakdown.contributions {
        match &contribution.key {
            Some(key) => println!(
                "  {} [{}]: {:+}",
                contribution.axis.section(),
                key,
                contribution.modifier
            ),
            None => println!("  {}: no matching rule", contribution.axis.section()),
        }
    }
    println!();
}
