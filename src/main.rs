use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rexec_cli::RexecError;
use rexec_cli::config::{
	CONFIG_FILE_NAME, Config, discover_configs, generate_init_template, load_config_file,
	load_merged_config, merge_configs, user_config_path,
};
use rexec_cli::exec::{Dispatcher, ExecutionResult, PassthroughOptions};
use rexec_cli::location::Location;

#[derive(Parser)]
#[command(name = "rexec")]
#[command(
	author,
	version,
	about = "Run a command against a local path or a host:path remote location"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[command(flatten)]
	global: GlobalArgs,

	/// Print the command that would run instead of running it
	#[arg(long)]
	dry_run: bool,

	/// Create a template .rexec.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .rexec.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Local path, or host:path for a remote location. A relative path named
	/// like a subcommand must be written with a leading ./ (e.g. ./exists)
	#[arg(value_name = "LOCATION")]
	location: Option<String>,

	/// Command to run; ::path:: and ::host:: are substituted
	#[arg(
		value_name = "COMMAND",
		trailing_var_arg = true,
		allow_hyphen_values = true
	)]
	words: Vec<String>,
}

#[derive(Args)]
struct GlobalArgs {
	/// Use this config file instead of the .rexec.toml cascade
	#[arg(long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Increase log verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Force pseudo-terminal allocation (ssh -t); repeat to force harder
	#[arg(short = 't', action = ArgAction::Count, global = true)]
	tty: u8,

	/// Disable pseudo-terminal allocation (ssh -T)
	#[arg(short = 'T', global = true, conflicts_with = "tty")]
	no_tty: bool,

	/// Identity file (ssh -i)
	#[arg(short = 'i', value_name = "FILE", global = true)]
	identity: Vec<String>,

	/// ssh option in key=value form (ssh -o)
	#[arg(short = 'o', value_name = "OPTION", global = true)]
	ssh_option: Vec<String>,

	/// Remote port (ssh -p)
	#[arg(short = 'p', value_name = "PORT", global = true)]
	port: Option<u16>,

	/// Remote login name (ssh -l)
	#[arg(short = 'l', value_name = "USER", global = true)]
	login: Option<String>,

	/// ssh client config file (ssh -F)
	#[arg(short = 'F', value_name = "FILE", global = true)]
	ssh_config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Exit 0 if the location's path exists, 1 if it does not
	Exists {
		#[arg(value_name = "LOCATION")]
		location: Option<String>,
	},
	/// Show how a location string is parsed
	Resolve {
		#[arg(value_name = "LOCATION")]
		location: Option<String>,
	},
	/// Create the location's directory, including parents
	Mkdir {
		#[arg(value_name = "LOCATION")]
		location: Option<String>,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display config files in cascade order and the effective settings
	Show,
	/// Check all config files for errors without running anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.global.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			let code = e
				.chain()
				.find_map(|cause| cause.downcast_ref::<RexecError>())
				.map(RexecError::exit_code)
				.unwrap_or(1);
			ExitCode::from(code)
		}
	}
}

fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if cli.init {
		return handle_init(cli.force);
	}

	if let Some(command) = cli.command {
		return match command {
			Commands::Resolve { location } => handle_resolve(location.as_deref()),
			Commands::Exists { location } => handle_exists(&cli.global, location.as_deref()),
			Commands::Mkdir { location } => handle_mkdir(&cli.global, location.as_deref()),
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
		};
	}

	handle_execute(&cli.global, cli.location.as_deref(), &cli.words, cli.dry_run)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_execute(
	global: &GlobalArgs,
	location: Option<&str>,
	words: &[String],
	dry_run: bool,
) -> Result<ExitCode> {
	let raw = location.ok_or(RexecError::MissingArgument { name: "location" })?;
	if words.is_empty() {
		return Err(RexecError::MissingArgument { name: "command" }.into());
	}
	let template = words.join(" ");

	let dispatcher = build_dispatcher(global)?;
	let options = passthrough_options(global)?;

	if dry_run {
		let plan = dispatcher.plan(raw, &template, &options)?;
		println!("{}", plan.display());
		return Ok(ExitCode::SUCCESS);
	}

	let result = dispatcher
		.execute(raw, &template, &options)
		.with_context(|| format!("Failed to run command against {raw}"))?;
	Ok(exit_code(&result))
}

fn handle_resolve(location: Option<&str>) -> Result<ExitCode> {
	let raw = location.ok_or(RexecError::MissingArgument { name: "location" })?;
	let location = Location::parse(raw)?;

	println!("remote: {}", location.is_remote());
	println!("host: {}", location.host().unwrap_or_default());
	println!("path: {}", location.path());
	Ok(ExitCode::SUCCESS)
}

fn handle_exists(global: &GlobalArgs, location: Option<&str>) -> Result<ExitCode> {
	let raw = location.ok_or(RexecError::MissingArgument { name: "location" })?;
	let location = Location::parse(raw)?;

	let dispatcher = build_dispatcher(global)?;
	let options = passthrough_options(global)?;

	let found = dispatcher
		.exists(&location, &options)
		.with_context(|| format!("Failed to check {raw}"))?;
	Ok(if found {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

fn handle_mkdir(global: &GlobalArgs, location: Option<&str>) -> Result<ExitCode> {
	let raw = location.ok_or(RexecError::MissingArgument { name: "location" })?;

	let dispatcher = build_dispatcher(global)?;
	let options = passthrough_options(global)?;

	let result = dispatcher
		.ensure_dir(raw, &options)
		.with_context(|| format!("Failed to create {raw}"))?;
	Ok(exit_code(&result))
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("Configuration files (in cascade order):\n");
	}

	for loaded in &configs {
		let file = &loaded.config;
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", file.root);
		if let Some(ref env_var) = file.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		if let Some(ref program) = file.ssh.program {
			println!("  ssh.program: {}", program);
		}
		if let Some(status) = file.ssh.connection_failure_status {
			println!("  ssh.connection-failure-status: {}", status);
		}
		for flag in &file.ssh.options {
			println!("  ssh.options: {}", flag.to_args().join(" "));
		}
		if let Some(ref shell) = file.local.shell {
			println!("  local.shell: {}", shell);
		}
		println!();
	}

	print_effective(&merge_configs(&configs));

	if let Ok(user_path) = user_config_path() {
		println!();
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn print_effective(config: &Config) {
	println!("Effective settings:");
	println!("  ssh.program: {}", config.ssh.program);
	println!(
		"  ssh.connection-failure-status: {}",
		config.ssh.connection_failure_status
	);
	println!("  ssh.options: {}", config.default_options.to_args().join(" "));
	println!("  local.shell: {}", config.shell);
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!("  {}", loaded.path.display());
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::from(e.exit_code()))
		}
	}
}

fn build_dispatcher(global: &GlobalArgs) -> Result<Dispatcher> {
	let config = match global.config {
		Some(ref path) => load_config(path)?,
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			load_merged_config(&cwd).context("Failed to load configuration")?
		}
	};
	Ok(Dispatcher::new(config))
}

fn load_config(path: &Path) -> Result<Config> {
	load_config_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn passthrough_options(global: &GlobalArgs) -> Result<PassthroughOptions> {
	let mut options = PassthroughOptions::new();

	for _ in 0..global.tty {
		options.push('t', None)?;
	}
	if global.no_tty {
		options.push('T', None)?;
	}
	for identity in &global.identity {
		options.push('i', Some(identity.clone()))?;
	}
	for option in &global.ssh_option {
		options.push('o', Some(option.clone()))?;
	}
	if let Some(port) = global.port {
		options.push('p', Some(port.to_string()))?;
	}
	if let Some(ref login) = global.login {
		options.push('l', Some(login.clone()))?;
	}
	if let Some(ref file) = global.ssh_config {
		options.push('F', Some(file.clone()))?;
	}

	Ok(options)
}

fn exit_code(result: &ExecutionResult) -> ExitCode {
	ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1))
}
