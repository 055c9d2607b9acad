// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the check, deploy, and hook subcommands and their arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use atkmod::config::RuntimeSettings;
use atkmod::hooks::Hook;

use crate::output::OutputMode;

#[derive(Parser)]
#[command(name = "atk")]
#[command(about = "Deploy modules implemented as container plugins")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that a manifest's apiVersion and kind are supported
    Check {
        /// Path to the install manifest
        manifest: PathBuf,
    },

    /// Run a module through pre-deploy, deploy, and post-deploy
    Deploy {
        /// Path to the install manifest
        manifest: PathBuf,

        #[command(flatten)]
        runtime: RuntimeArgs,
    },

    /// Run one of a module's hooks
    Hook {
        #[arg(value_enum)]
        hook: HookArg,

        /// Path to the install manifest
        manifest: PathBuf,

        #[command(flatten)]
        runtime: RuntimeArgs,
    },
}

#[derive(Args)]
pub struct RuntimeArgs {
    /// Container runtime executable [default: $ITZ_PODMAN_PATH or /usr/local/bin/podman]
    #[arg(long)]
    pub runtime: Option<String>,

    /// Host directory mounted at /workspace in every container
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Extra runtime flag placed after the subcommand (repeatable)
    #[arg(long = "flag", allow_hyphen_values = true)]
    pub flags: Vec<String>,
}

impl RuntimeArgs {
    pub fn settings(self) -> RuntimeSettings {
        RuntimeSettings::from_env()
            .runtime_path(self.runtime)
            .workspace(self.workspace)
            .flags(self.flags)
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum HookArg {
    List,
    Validate,
    GetState,
}

impl From<HookArg> for Hook {
    fn from(arg: HookArg) -> Self {
        match arg {
            HookArg::List => Hook::List,
            HookArg::Validate => Hook::Validate,
            HookArg::GetState => Hook::GetState,
        }
    }
}
