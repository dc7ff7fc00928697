//! CLI entrypoint for cloudops
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use cloudops_application::{
    BatchOperation, ClientFactory, ComplianceEngine, ComplianceParams, CredentialResolver,
    DispatchEvent, DispatchLogger, Dispatcher, NoDispatchLogger, NoScanProgress, RequestContext,
    ScanPass, ScanProgressNotifier, ToolBatchOperation, ToolListOperation, ToolSchemaPort,
};
use cloudops_domain::{ComplianceResult, CredentialScope, ResourcePredicate, ToolRegistry};
use cloudops_infrastructure::catalog::compute;
use cloudops_infrastructure::{
    ConfigLoader, EnvCredentialResolver, FileConfig, JsonSchemaConverter, JsonlDispatchLogger,
    RemoteClientCache,
};
use cloudops_presentation::{
    CallArgs, Cli, Command, ComplianceCommand, OutputConfig, OutputFormatter, RemediateArgs,
    RemediationAction, ScanArgs, ScanProgressReporter, SimpleScanProgress, ToolsArgs,
    formatter_for,
};
use serde_json::{Map, Value, json};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    let output = OutputConfig::resolve(cli.output, config.output.format)
        .with_color(config.output.color)
        .with_max_listed_ids(config.output.max_listed_ids);
    output.apply();
    let formatter = formatter_for(&output);

    let Some(command) = cli.command else {
        bail!("No command given. Run `cloudops --help` for usage.");
    };

    info!("Starting cloudops");

    // === Dependency Injection ===
    let (registry, factory) = build_catalog()?;
    let clients = Arc::new(RemoteClientCache::new(factory));
    let logger = audit_logger(&config);
    let dispatcher = Arc::new(
        Dispatcher::new(Arc::new(registry), clients).with_logger(logger.clone()),
    );
    let resolver = EnvCredentialResolver::from_env(config.aws.default_region.clone());

    let progress: Box<dyn ScanProgressNotifier> = if cli.quiet {
        Box::new(NoScanProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ScanProgressReporter::new())
    } else {
        // Spinners only garble piped or captured stderr
        Box::new(SimpleScanProgress)
    };

    match command {
        Command::Tools(args) => {
            print_tools(dispatcher.registry(), &args, formatter.as_ref());
            Ok(ExitCode::SUCCESS)
        }
        Command::Call(args) => call(&dispatcher, &resolver, &args, formatter.as_ref()).await,
        Command::Compliance(ComplianceCommand::Scan(args)) => {
            let scope = resolve_scope(&resolver, args.region.as_deref())?;
            let params = compliance_params(&config, &args);
            let engine = ComplianceEngine::new(params);
            let result = scan(&dispatcher, &engine, &scope, progress.as_ref()).await?;
            println!(
                "{}",
                formatter.format_compliance(&engine.params().required_tag, &result)
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Compliance(ComplianceCommand::Remediate(args)) => {
            remediate(
                &dispatcher,
                &resolver,
                &config,
                &args,
                logger.as_ref(),
                progress.as_ref(),
                formatter.as_ref(),
            )
            .await
        }
    }
}

// ==================== Wiring ====================

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let issues = config.validate();
    for issue in &issues {
        warn!("Config: {} (using the default instead)", issue);
    }
    Ok(config.with_defaults_for(&issues))
}

#[cfg(feature = "aws")]
fn build_catalog() -> Result<(ToolRegistry, Arc<dyn ClientFactory>)> {
    let registry =
        cloudops_infrastructure::default_registry().context("Tool catalog is inconsistent")?;
    let stats = registry.stats();
    info!(
        "Catalog: {} tool(s), {} mutating",
        stats.total_tools, stats.mutating_tools
    );
    Ok((
        registry,
        Arc::new(cloudops_infrastructure::AwsClientFactory::new()),
    ))
}

#[cfg(not(feature = "aws"))]
fn build_catalog() -> Result<(ToolRegistry, Arc<dyn ClientFactory>)> {
    bail!("cloudops was built without the `aws` feature; no remote tools are available")
}

fn audit_logger(config: &FileConfig) -> Arc<dyn DispatchLogger> {
    match config
        .dispatch
        .audit_log
        .as_ref()
        .and_then(JsonlDispatchLogger::new)
    {
        Some(logger) => {
            info!("Audit log: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoDispatchLogger),
    }
}

fn resolve_scope(
    resolver: &EnvCredentialResolver,
    region: Option<&str>,
) -> Result<CredentialScope> {
    let mut context = RequestContext::new();
    if let Some(region) = region {
        context = context.with_region(region);
    }
    resolver
        .resolve(&context)
        .context("Could not resolve credentials")
}

fn compliance_params(config: &FileConfig, args: &ScanArgs) -> ComplianceParams {
    let mut params = config.compliance.to_params();
    if let Some(tag) = &args.tag {
        params = params.with_required_tag(tag);
    }
    if let Some(max_items) = args.max_items.filter(|n| *n > 0) {
        params = params.with_max_items(max_items);
    }
    params
}

// ==================== Commands ====================

fn print_tools(registry: &ToolRegistry, args: &ToolsArgs, formatter: &dyn OutputFormatter) {
    let mut tools: Vec<_> = registry
        .all()
        .filter(|t| args.domain.as_deref().is_none_or(|d| t.domain() == d))
        .filter(|t| !args.read_only || !t.definition().is_mutating())
        .collect();
    tools.sort_by(|a, b| a.domain().cmp(b.domain()).then(a.name().cmp(b.name())));

    if args.json {
        let converter = JsonSchemaConverter;
        let schemas: Vec<Value> = tools
            .iter()
            .map(|t| converter.tool_to_schema(t.definition()))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&schemas).unwrap_or_else(|_| "[]".to_string())
        );
    } else {
        println!("{}", formatter.format_tools(&tools));
    }
}

async fn call(
    dispatcher: &Dispatcher,
    resolver: &EnvCredentialResolver,
    args: &CallArgs,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let mut params = match serde_json::from_str::<Value>(&args.params)
        .context("--params is not valid JSON")?
    {
        Value::Object(map) => map,
        other => bail!("--params must be a JSON object, got: {}", other),
    };
    if let Some(region) = &args.region {
        params
            .entry("region")
            .or_insert_with(|| Value::String(region.clone()));
    }

    let scope = resolve_scope(resolver, None)?;
    let envelope = dispatcher.dispatch(&args.tool, params, &scope).await;
    println!("{}", formatter.format_envelope(&envelope));

    Ok(if envelope.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn scan(
    dispatcher: &Arc<Dispatcher>,
    engine: &ComplianceEngine,
    scope: &CredentialScope,
    progress: &dyn ScanProgressNotifier,
) -> Result<ComplianceResult> {
    let tag = engine.params().required_tag.clone();
    let listing = |label: String| {
        ToolListOperation::new(
            Arc::clone(dispatcher),
            compute::LIST_INSTANCES,
            compute::NEXT_TOKEN,
            scope.clone(),
        )
        .with_label(label)
    };

    let all = ScanPass::new(Arc::new(listing("all instances".to_string())))
        .with_predicate(ResourcePredicate::active());
    let matching = ScanPass::new(Arc::new(
        listing(format!("tagged {}", tag)).with_param("tag_key", tag.clone()),
    ))
    .with_predicate(ResourcePredicate::active().and(ResourcePredicate::has_tag(&tag)));

    engine
        .scan_with_progress(&all, &matching, progress)
        .await
        .context("Compliance scan failed")
}

async fn remediate(
    dispatcher: &Arc<Dispatcher>,
    resolver: &EnvCredentialResolver,
    config: &FileConfig,
    args: &RemediateArgs,
    logger: &dyn DispatchLogger,
    progress: &dyn ScanProgressNotifier,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let scope = resolve_scope(resolver, args.scan.region.as_deref())?;
    let mut params = compliance_params(config, &args.scan);
    if let Some(concurrency) = args.concurrency.filter(|n| *n > 0) {
        params = params.with_concurrency(concurrency);
    }
    let engine = ComplianceEngine::new(params);
    let tag = engine.params().required_tag.clone();

    let result = scan(dispatcher, &engine, &scope, progress).await?;
    println!("{}", formatter.format_compliance(&tag, &result));

    if result.truncated && !args.allow_truncated {
        bail!(
            "A scan pass stopped at its item cap; refusing to remediate a partial inventory \
             (raise --max-items or pass --allow-truncated)"
        );
    }
    if result.is_compliant() {
        return Ok(ExitCode::SUCCESS);
    }

    let (tool, ids_param) = match args.action {
        RemediationAction::Tag => (compute::CREATE_TAGS, "resource_ids"),
        RemediationAction::Terminate => (compute::TERMINATE_INSTANCES, "instance_ids"),
    };

    if args.dry_run {
        eprintln!(
            "Dry run: {} resource(s) would be remediated with {}",
            result.non_conforming_count(),
            tool
        );
        return Ok(ExitCode::SUCCESS);
    }

    let mut operation =
        ToolBatchOperation::new(Arc::clone(dispatcher), tool, ids_param, scope.clone());
    if args.action == RemediationAction::Tag {
        operation = operation.with_param("tags", json!([{ "key": tag, "value": args.tag_value }]));
    }

    let batch = engine
        .remediate_with_progress(result.sorted_ids(), &operation, progress)
        .await
        .context("Remediation could not start")?;

    let mut event = Map::new();
    event.insert("tool".to_string(), json!(operation.label()));
    event.insert("required_tag".to_string(), json!(tag));
    event.insert("chunks_succeeded".to_string(), json!(batch.chunks_succeeded));
    event.insert("chunks_failed".to_string(), json!(batch.chunks_failed));
    event.insert("items_succeeded".to_string(), json!(batch.items_succeeded));
    event.insert("items_failed".to_string(), json!(batch.items_failed));
    event.insert("fingerprint".to_string(), json!(scope.fingerprint().as_str()));
    logger.log(DispatchEvent::new("remediation", Value::Object(event)));

    println!("{}", formatter.format_batch(operation.label(), &batch));

    Ok(if batch.is_complete_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
