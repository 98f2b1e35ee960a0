use anyhow::Context;
use clap::{crate_version, Arg, ArgAction, Command};
use portal_shell::{Mounted, Shell, ShellConfig, View};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("portal-shell")
        .version(crate_version!())
        .about("Host shell composing remotely deployed portal modules")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML settings file (PORTAL_* variables still override it)"),
        )
        .arg(
            Arg::new("manifest")
                .long("manifest")
                .short('m')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Federation manifest replacing the built-in remotes"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs to stderr as JSON lines"),
        )
        .subcommand(Command::new("routes").about("List routes and where their modules are served from"))
        .subcommand(
            Command::new("render")
                .about("Navigate to a path, load it and print the page")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .help("URL path, e.g. /attendance-portal"),
                ),
        )
        .subcommand(Command::new("preload").about("Load every remote and report its state"))
        .subcommand(
            Command::new("browse")
                .about("Interactive session: enter a path, back, forward, retry, status or quit"),
        )
        .subcommand(Command::new("config").about("Print the effective configuration"))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.with_target(false).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let mut config = ShellConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("failed to load shell configuration")?;
    if let Some(manifest) = matches.get_one::<PathBuf>("manifest") {
        config.manifest = Some(manifest.clone());
    }

    if let Some(("config", _)) = matches.subcommand() {
        print!("{}", config.to_toml().context("failed to serialize configuration")?);
        return Ok(());
    }

    let shell = Shell::from_config(&config).context("failed to start shell")?;

    match matches.subcommand() {
        Some(("routes", _)) => print_routes(&shell),
        Some(("render", args)) => {
            let path = args
                .get_one::<String>("path")
                .map_or("/", String::as_str);
            let view = match shell.visit(path).await {
                Mounted::Current(view) => view,
                Mounted::Stale { .. } => shell.current_view(),
            };
            println!("{}", shell.render(&view)?);
            if view.is_error() {
                std::process::exit(1);
            }
        }
        Some(("preload", _)) => {
            let report = shell.loader().preload_all().await;
            print_status(&shell);
            for (name, err) in &report.failed {
                eprintln!("{name}: {err}");
            }
            if !report.all_loaded() {
                std::process::exit(1);
            }
        }
        Some(("browse", _)) => browse(&shell).await?,
        _ => anyhow::bail!("no command given"),
    }

    Ok(())
}

fn print_routes(shell: &Shell) {
    for entry in shell.routes().entries() {
        let location = entry
            .module()
            .and_then(|name| shell.loader().registry().resolve(name.as_str()).ok())
            .map_or("-", |descriptor| descriptor.entry_location().as_str());
        println!("{:<20} {:<18} {}", entry.path, entry.label, location);
    }
}

fn print_status(shell: &Shell) {
    for (name, phase) in shell.loader().snapshot() {
        println!(
            "{:<20} {:<14} fetches={}",
            name.as_str(),
            phase.to_string(),
            shell.loader().fetch_count(name.as_str())
        );
    }
}

fn print_view(shell: &Shell, view: &View) -> anyhow::Result<()> {
    println!("{}", shell.render(view)?);
    Ok(())
}

async fn browse(shell: &Shell) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_view(shell, &shell.current_view())?;

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let mounted = match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "status" => {
                print_status(shell);
                continue;
            }
            "retry" => shell.retry().await,
            "back" => match shell.back() {
                Some(navigation) => shell.resolve(&navigation).await,
                None => {
                    eprintln!("already at the oldest entry");
                    continue;
                }
            },
            "forward" => match shell.forward() {
                Some(navigation) => shell.resolve(&navigation).await,
                None => {
                    eprintln!("already at the newest entry");
                    continue;
                }
            },
            path => {
                let navigation = shell.navigate(path);
                let pending = shell.current_view();
                if matches!(pending, View::Loading { .. }) {
                    print_view(shell, &pending)?;
                }
                shell.resolve(&navigation).await
            }
        };

        if let Mounted::Current(view) = mounted {
            print_view(shell, &view)?;
        }
    }

    tracing::info!("stdin closed, leaving browse session");
    Ok(())
}
