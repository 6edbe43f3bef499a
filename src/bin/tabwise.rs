//! Tabwise Demo Binary
//!
//! A small hierarchical tool wired to the completion engine. The generated
//! scripts call this binary back with `__complete` at every keypress.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tabwise::command::{Command, CommandTree, PositionalArgs};
use tabwise::completion::{add_completion_command, filter_by_prefix, Candidate, Directive, RequestKind};
use tabwise::config::{ConfigLoader, TabwiseConfig};
use tabwise::error::RegistrationError;
use tabwise::flags::{self, Flag, FlagValues, ParseMode};
use tabwise::logging::{init_logging, LoggingConfig};
use tracing::{debug, error, info};

const SERVICES: [(&str, &str); 4] = [
    ("api", "Public HTTP API"),
    ("web", "Browser frontend"),
    ("worker", "Background job runner"),
    ("scheduler", "Cron-style trigger service"),
];

const ENVIRONMENTS: [(&str, &str); 3] = [
    ("dev", "Development sandbox"),
    ("staging", "Pre-production mirror"),
    ("prod", "Production"),
];

/// Keys of `--tag key=value` release tags
const TAG_KEYS: [&str; 3] = ["release", "owner", "ticket"];

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let serving_completion = args
        .first()
        .map_or(false, |first| RequestKind::from_name(first).is_some());

    let globals = global_options(&args);
    let config_path = globals.get("config").map(PathBuf::from);

    let config = match ConfigLoader::load_with(config_path.as_deref()) {
        Ok(config) => config,
        // A broken config file must not break completion in the shell
        Err(_) if serving_completion => TabwiseConfig::default(),
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&config, &globals);
    if let Err(e) = init_logging(Some(&logging_config), serving_completion) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Tabwise starting");

    let tree = match build_tree(&config, config_path) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Failed to build command tree: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    match tree.execute(&args, &mut out, &mut err) {
        Ok(()) => {
            debug!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {}", e);
            let _ = out.flush();
            let _ = writeln!(err, "Error: {}", e);
            process::exit(1);
        }
    }
}

/// Root persistent flags, readable before the tree runs.
fn root_flags() -> Vec<Flag> {
    vec![
        Flag::value("config").usage("Configuration file layered over the global one"),
        Flag::bool("verbose").short('v').usage("Log at debug level"),
        Flag::bool("quiet").short('q').usage("Disable logging"),
        Flag::value("log-format")
            .choices(["text", "json"])
            .usage("Log line format"),
    ]
}

/// Extract the root's persistent flags from anywhere on the line.
fn global_options(args: &[String]) -> FlagValues {
    let declared = root_flags();
    let refs: Vec<&Flag> = declared.iter().collect();
    let tokens = match args.first() {
        Some(first) if RequestKind::from_name(first).is_some() => &args[1..],
        _ => args,
    };
    flags::parse(&refs, tokens, ParseMode::Lenient)
        .map(|line| line.values)
        .unwrap_or_default()
}

/// Build logging configuration from the loaded config and global flags.
/// Precedence: flags override the config file override defaults.
fn build_logging_config(config: &TabwiseConfig, globals: &FlagValues) -> LoggingConfig {
    let mut logging = config.logging.clone();
    if globals.get_bool("verbose") {
        logging.level = "debug".to_string();
    }
    if globals.get_bool("quiet") {
        logging.level = "off".to_string();
    }
    if let Some(format) = globals.get("log-format") {
        logging.format = format.to_string();
    }
    logging
}

fn candidates(pairs: &[(&str, &str)]) -> Vec<Candidate> {
    pairs
        .iter()
        .map(|(value, description)| Candidate::with_description(*value, *description))
        .collect()
}

fn build_tree(
    config: &TabwiseConfig,
    config_path: Option<PathBuf>,
) -> Result<CommandTree, RegistrationError> {
    let mut root = Command::new("tabwise").short("Deploy services and manage tabwise settings");
    for flag in root_flags() {
        root = root.persistent_flag(flag);
    }
    let mut tree = CommandTree::new(root).with_settings(config.completion.clone());
    let root = tree.root();

    let deploy = tree.add_subcommand(
        root,
        Command::new("deploy")
            .alias("ship")
            .short("Deploy one or more services")
            .flag(Flag::value("env").short('e').default_value("dev").usage("Target environment"))
            .flag(Flag::value("manifest").short('m').usage("Deployment manifest"))
            .flag(Flag::multi("tag").short('t').usage("Extra release tag as key=value"))
            .flag(Flag::bool("dry-run").usage("Print the plan only"))
            .args(PositionalArgs::Minimum(1))
            .run(|inv| {
                let env = inv.flags.get("env").unwrap_or("dev");
                let verb = if inv.flags.get_bool("dry-run") { "Would deploy" } else { "Deploying" };
                writeln!(
                    inv.out,
                    "{} {} to {} at {}",
                    verb,
                    inv.args.join(", "),
                    env,
                    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
                )?;
                for tag in inv.flags.get_all("tag") {
                    writeln!(inv.out, "  tag {}", tag)?;
                }
                Ok(())
            }),
    )?;
    // Services not yet named on the line
    tree.register_args_completion(deploy, |_: &Command, args: &[String], to_complete: &str| {
        let remaining: Vec<Candidate> = candidates(&SERVICES)
            .into_iter()
            .filter(|c| !args.contains(&c.value))
            .collect();
        (filter_by_prefix(remaining, to_complete), Directive::NO_FILE_COMP)
    })?;
    tree.register_flag_completion(deploy, "env", |_: &Command, _: &[String], _: &str| {
        (
            candidates(&ENVIRONMENTS),
            Directive::NO_FILE_COMP | Directive::KEEP_ORDER,
        )
    })?;
    tree.register_flag_completion(deploy, "manifest", |_: &Command, _: &[String], _: &str| {
        (
            vec![Candidate::new("yaml"), Candidate::new("yml")],
            Directive::FILTER_FILE_EXT,
        )
    })?;

    // The user types the value right after the key
    tree.register_flag_completion(deploy, "tag", |_: &Command, _: &[String], to_complete: &str| {
        let keys = TAG_KEYS.iter().map(|key| Candidate::new(format!("{}=", key))).collect();
        (
            filter_by_prefix(keys, to_complete),
            Directive::NO_SPACE | Directive::NO_FILE_COMP,
        )
    })?;

    let config_cmd = tree.add_subcommand(
        root,
        Command::new("config").short("Inspect and change tabwise settings"),
    )?;

    let loaded = Arc::new(config.clone());
    let shown = Arc::clone(&loaded);
    let get = tree.add_subcommand(
        config_cmd,
        Command::new("get")
            .short("Print one setting")
            .args(PositionalArgs::Exact(1))
            .run(move |inv| {
                match shown.get(&inv.args[0]) {
                    Some(value) => writeln!(inv.out, "{}", value)?,
                    None => anyhow::bail!("unknown configuration key: {}", inv.args[0]),
                }
                Ok(())
            }),
    )?;
    let keys = Arc::clone(&loaded);
    tree.register_args_completion(get, move |_: &Command, _: &[String], to_complete: &str| {
        let all = keys.keys().into_iter().map(Candidate::new).collect();
        (filter_by_prefix(all, to_complete), Directive::NO_FILE_COMP)
    })?;

    let target = config_path.or_else(ConfigLoader::xdg_config_path);
    let set = tree.add_subcommand(
        config_cmd,
        Command::new("set")
            .short("Write one setting to the configuration file")
            .args(PositionalArgs::Exact(2))
            .run(move |inv| {
                let Some(path) = target.as_deref() else {
                    anyhow::bail!("no configuration file location available");
                };
                ConfigLoader::set_in_file(path, &inv.args[0], &inv.args[1])?;
                writeln!(inv.out, "{} = {} ({})", inv.args[0], inv.args[1], path.display())?;
                Ok(())
            }),
    )?;
    let settable = Arc::clone(&loaded);
    tree.register_args_completion(set, move |_: &Command, args: &[String], to_complete: &str| {
        let all: Vec<Candidate> = match args {
            [] => settable.keys().into_iter().map(Candidate::new).collect(),
            [key] => value_candidates(&settable, key),
            _ => Vec::new(),
        };
        (filter_by_prefix(all, to_complete), Directive::NO_FILE_COMP)
    })?;

    tree.add_subcommand(
        config_cmd,
        Command::new("path")
            .short("Print where the global configuration file lives")
            .args(PositionalArgs::None)
            .run(|inv| {
                match ConfigLoader::xdg_config_path() {
                    Some(path) => writeln!(inv.out, "{}", path.display())?,
                    None => anyhow::bail!("no home directory to place configuration in"),
                }
                Ok(())
            }),
    )?;

    tree.add_subcommand(
        root,
        Command::new("version")
            .short("Print the version number")
            .args(PositionalArgs::None)
            .run(|inv| {
                writeln!(inv.out, "tabwise {}", env!("CARGO_PKG_VERSION"))?;
                Ok(())
            }),
    )?;

    add_completion_command(&mut tree)?;
    Ok(tree)
}

/// Values worth offering for `config set <key> <value>`.
fn value_candidates(config: &TabwiseConfig, key: &str) -> Vec<Candidate> {
    match key {
        "logging.level" => LEVELS.iter().map(|l| Candidate::new(*l)).collect(),
        "logging.format" => vec![Candidate::new("text"), Candidate::new("json")],
        "logging.output" => ["stderr", "stdout", "file"].into_iter().map(Candidate::new).collect(),
        _ if key.starts_with("logging.modules.") => LEVELS.iter().map(|l| Candidate::new(*l)).collect(),
        _ => match config.get(key).as_deref() {
            Some("true") | Some("false") => vec![Candidate::new("true"), Candidate::new("false")],
            _ => Vec::new(),
        },
    }
}
