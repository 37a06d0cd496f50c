mod cli;
mod config;
mod consts;
mod core;
mod error;
mod logging;
mod output;
mod pricing;
mod source;

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;

use cli::{Cli, Commands};
use config::Config;
use crate::core::Origin;
use error::AppError;
use output::{
    CostTableOptions, output_cost_json, output_lookup_json, output_pricing_json,
    pricing_status_line, print_cost_table, print_lookup_table, print_pricing_table,
};
use pricing::{CostEstimator, ModelResolver, PricingCatalog, PricingLoader, PricingStatus};
use source::{Source, get_source, load_entries};

fn main() -> ExitCode {
    let config = Config::load();
    let mut cli = Cli::parse().with_config(&config);
    logging::init(cli.debug);

    let command = cli.take_command();
    match run(&cli, &config, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config, command: Commands) -> Result<(), AppError> {
    let pricing_config = config.pricing_config()?;
    let loader = PricingLoader::from_config(&pricing_config);

    let start = Instant::now();
    let status = loader.acquire(cli.offline);
    if cli.show_status() {
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("{}", pricing_status_line(&status, elapsed_ms));
    }

    let resolver = ModelResolver::default();
    match command {
        Commands::Pricing => {
            if cli.json {
                println!("{}", output_pricing_json(&status, loader.cache_path())?);
            } else {
                print_pricing_table(&status, loader.cache_path(), cli.use_color());
            }
            Ok(())
        }
        Commands::Lookup {
            model,
            origin,
            provider,
        } => run_lookup(cli, &status.catalog, &resolver, &model, origin, provider.as_deref()),
        report => {
            let Some(source) = report.source_name().and_then(get_source) else {
                return Ok(());
            };
            run_report(cli, source, &status, &resolver)
        }
    }
}

fn run_lookup(
    cli: &Cli,
    catalog: &PricingCatalog,
    resolver: &ModelResolver,
    model: &str,
    origin: Origin,
    provider: Option<&str>,
) -> Result<(), AppError> {
    let resolved = resolver
        .resolve_model(catalog, model, provider, origin)
        .ok_or_else(|| AppError::UnknownModel {
            model: model.to_string(),
        })?;

    if cli.json {
        println!("{}", output_lookup_json(model, origin, &resolved)?);
    } else {
        print_lookup_table(model, origin, &resolved, cli.use_color());
    }
    Ok(())
}

fn run_report(
    cli: &Cli,
    source: &dyn Source,
    status: &PricingStatus,
    resolver: &ModelResolver,
) -> Result<(), AppError> {
    let loaded = load_entries(source);
    let estimator = CostEstimator::new(&status.catalog, resolver);
    let summary = estimator.summarize(&loaded.entries);

    if cli.json {
        println!("{}", output_cost_json(source.name(), &summary, &loaded, status)?);
        return Ok(());
    }

    if loaded.entries.is_empty() {
        println!("No {} usage data found.", source.display_name());
        return Ok(());
    }
    print_cost_table(
        &summary,
        &loaded,
        CostTableOptions {
            source_label: source.display_name(),
            use_color: cli.use_color(),
        },
    );
    Ok(())
}
