//! CLI command definitions and handlers

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use oprun_core::{wrapper, Config, Dispatcher, Invocation, Mode, Paths, Presence, TargetKind};
use std::ffi::OsString;

/// oprun - Run local commands with secrets injected from a reference file
#[derive(Parser)]
#[command(name = "oprun")]
#[command(version)]
#[command(about = "Run local commands with secrets injected from a reference file")]
#[command(after_help = "\
WRAPPERS:
    run-lambda [ARGS...]       python3 run_lambda_handler.py [ARGS...]
    run-tests [ARGS...]        pytest [ARGS...]
    run-api [ARGS...]          python3 run_api.py [ARGS...]

    With .env.op present each runs under `op run --env-file=.env.op --`.
    Without it, a warning is printed and the command runs directly.

EXAMPLES:
    oprun status               How would run-tests behave here?
    oprun status lambda --json Same for the Lambda handler, as JSON
    oprun targets              List targets and their commands
    oprun init                 Create oprun.yaml with the defaults
    oprun run tests -- -x      Same as: run-tests -x

CONFIG:
    ./oprun.yaml, else ~/.config/oprun/config.yaml, or $OPRUN_CONFIG.
    OPRUN_REFERENCE_FILE and OPRUN_INJECTOR override single fields.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show how a target would run in this directory, without running it
    Status {
        /// Target to inspect (lambda, tests, api)
        #[arg(default_value = "tests")]
        target: TargetKind,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List targets and the commands they run
    Targets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create oprun.yaml in the current directory
    Init {
        /// Overwrite an existing oprun.yaml
        #[arg(long)]
        force: bool,
    },

    /// Run a target like its run-* wrapper (a leading `--` is consumed;
    /// the run-* binaries forward it verbatim)
    #[command(disable_help_flag = true)]
    Run {
        /// Target to run (lambda, tests, api)
        target: TargetKind,
        /// Arguments for the target
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
}

/// Run the CLI, returning the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Status { target, json } => cmd_status(target, json),
        Commands::Targets { json } => cmd_targets(json),
        Commands::Init { force } => cmd_init(force),
        Commands::Run { target, args } => Ok(wrapper::run(target, args)),
    }
}

fn cmd_status(target: TargetKind, json: bool) -> Result<i32> {
    let paths = Paths::new();
    let loaded = Config::load(&paths)?;
    let source = loaded.source.to_string();
    let dispatcher = Dispatcher::new(loaded.config, paths);
    let plan = dispatcher.plan(target, Vec::new());

    if json {
        let status = serde_json::json!({
            "target": target.name(),
            "config": source,
            "reference_file": plan.reference.path.display().to_string(),
            "reference": plan.reference.presence,
            "mode": plan.mode,
            "command": plan.invocation.command_line(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(0);
    }

    let presence = match plan.reference.presence {
        Presence::Present => "present",
        Presence::Absent => "missing",
    };

    println!("Target:          {}", target);
    println!("Config:          {}", source);
    println!("Reference file:  {} ({})", plan.reference.path.display(), presence);
    match plan.mode {
        Mode::Injected => println!(
            "Mode:            injected via {}",
            dispatcher.config().injector.program.display()
        ),
        Mode::Direct => println!("Mode:            direct - secrets will not be injected"),
    }
    println!("Command:         {}", plan.invocation.command_line());

    Ok(0)
}

fn cmd_targets(json: bool) -> Result<i32> {
    let loaded = Config::load(&Paths::new())?;
    let targets = &loaded.config.targets;

    if json {
        let list: Vec<_> = TargetKind::ALL
            .iter()
            .map(|kind| {
                let spec = targets.get(*kind);
                serde_json::json!({
                    "name": kind.name(),
                    "wrapper": format!("run-{}", kind.name()),
                    "program": spec.program,
                    "args": spec.args,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(0);
    }

    for kind in TargetKind::ALL {
        let spec = targets.get(kind);
        let invocation = Invocation::new(&spec.program, spec.args.iter().map(OsString::from).collect());
        println!("  {:<8} {}", kind.name(), invocation.command_line());
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32> {
    let path = Paths::new().project_config();

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save(&path)?;

    println!("success: Created {}", path.display());
    println!("Edit the targets to match your project, then run: oprun status");

    Ok(0)
}
