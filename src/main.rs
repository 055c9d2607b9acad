// ABOUTME: Entry point for the atk CLI application.
// ABOUTME: Parses arguments and drives module manifests through their lifecycle.

mod cli;
mod output;

use atkmod::config::RuntimeSettings;
use atkmod::error::{Error, Result};
use atkmod::hooks::Hook;
use atkmod::lifecycle::DeployableModule;
use atkmod::manifest::{ManifestFileLoader, ModuleLoader};
use atkmod::runner::RunContext;
use clap::Parser;
use cli::{Cli, Commands};
use output::Output;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());

    if let Err(e) = run(cli.command, &mut output) {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(command: Commands, output: &mut Output) -> Result<()> {
    match command {
        Commands::Check { manifest } => check(&manifest, output),
        Commands::Deploy { manifest, runtime } => deploy(&manifest, &runtime.settings(), output),
        Commands::Hook {
            hook,
            manifest,
            runtime,
        } => run_hook(hook.into(), &manifest, &runtime.settings(), output),
    }
}

/// Report whether a manifest can be deployed.
fn check(path: &Path, output: &Output) -> Result<()> {
    let module = ManifestFileLoader::new().load(path)?;
    output.progress(&format!("Module: {}", module.metadata.name));
    output.progress(&format!("  apiVersion: {}", module.api_version));
    output.progress(&format!("  kind: {}", module.kind));
    module.ensure_supported()?;
    output.success(&format!("{} is supported", path.display()));
    Ok(())
}

/// Step a module from `invalid` to `done`, stopping at the first failure.
fn deploy(path: &Path, settings: &RuntimeSettings, output: &mut Output) -> Result<()> {
    let module = ManifestFileLoader::new().load_supported(path)?;
    output.progress(&format!("Deploying {}", module.metadata.name));
    output.start_timer();

    let mut deployment = DeployableModule::new(&module, settings.runner(), RunContext::inherit());
    let mut steps = 0;
    loop {
        let (cmd, has_more) = deployment.next_step();
        if !has_more {
            break;
        }
        steps += 1;
        output.step(steps, deployment.state());
        if let Err(source) = deployment.execute(cmd) {
            return Err(Error::Deployment {
                state: deployment.previous_state(),
                source,
            });
        }
    }

    output.success(&format!("Deployed {} in {steps} steps", module.metadata.name));
    Ok(())
}

/// Run a single hook container with the terminal's streams attached.
fn run_hook(hook: Hook, path: &Path, settings: &RuntimeSettings, output: &Output) -> Result<()> {
    let module = ManifestFileLoader::new().load_supported(path)?;
    let mut deployment = DeployableModule::new(&module, settings.runner(), RunContext::inherit());
    deployment.run_hook(hook)?;
    output.success(&format!("{hook} hook finished"));
    Ok(())
}
