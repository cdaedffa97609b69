//! Compare command: every registered strategy over the same data.

use anyhow::{bail, Result};
use tracing::warn;
use trading_backtest::{comparison_table, run_many, BacktestConfig};
use trading_config::AppConfig;
use trading_strategies::StrategyRegistry;

use super::{apply_risk_overrides, load_series};
use crate::cli::{CompareArgs, OutputFormat};

pub async fn run(args: CompareArgs, app: &AppConfig) -> Result<()> {
    let series = load_series(&args.data, app).await?;
    let registry = StrategyRegistry::new();

    let configs = registry
        .names()
        .into_iter()
        .map(|name| -> Result<BacktestConfig> {
            let mut config = BacktestConfig {
                strategy: registry.create_default(name)?,
                ..app.backtest.clone()
            };
            apply_risk_overrides(&mut config, &args.risk);
            Ok(config)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut results = Vec::with_capacity(configs.len());
    for (config, outcome) in configs.iter().zip(run_many(&series, &configs)) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => warn!(strategy = config.strategy.key(), error = %e, "Skipping strategy"),
        }
    }

    if results.is_empty() {
        bail!("No strategy could be run on {} ({} bars)", series.symbol, series.len());
    }

    match args.output {
        OutputFormat::Json => {
            let stats: Vec<_> = results
                .iter()
                .map(|r| serde_json::json!({ "strategy": r.strategy, "stats": r.stats }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Text => {
            println!("{} ({} bars)\n", series.symbol, series.len());
            print!("{}", comparison_table(&results));
        }
    }

    Ok(())
}
