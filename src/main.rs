use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pip_on_top::actor;
use pip_on_top::actor::config_watcher::ConfigWatcher;
use pip_on_top::actor::reactor::{self, Reactor};
use pip_on_top::common::config::{Config, config_file};
use pip_on_top::common::log::init_logging;
use pip_on_top::sys::window_system::SharedWindowSystem;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "pip-on-top",
    version = env!("CARGO_PKG_VERSION"),
    about = "Keeps picture-in-picture windows above others and remembers where they were"
)]
struct Cli {
    /// Config file to use instead of the one in the user config directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Don't reload settings when the config file changes.
    #[arg(long)]
    no_watch: bool,

    /// Print the effective config and exit.
    #[arg(long)]
    print_config: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = match cli.config {
        Some(path) => path,
        None => config_file().context("could not determine the config directory")?,
    };
    let config = Config::read(&path)?;

    if cli.print_config {
        print!("{}", config.to_toml().context("could not serialize the config")?);
        return Ok(());
    }

    let (events_tx, events_rx) = actor::channel();
    let host = connect_host(events_tx.clone())?;

    let _watcher = if cli.no_watch {
        None
    } else {
        ConfigWatcher::spawn(path, config.settings, events_tx.clone())
            .inspect_err(|err| warn!(%err, "Not watching the config file"))
            .ok()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start the runtime")?;
    runtime.block_on(async move {
        forward_shutdown(events_tx)?;
        Reactor::new(&config, host).run(events_rx).await;
        Ok::<_, anyhow::Error>(())
    })
}

#[cfg(unix)]
fn forward_shutdown(events_tx: reactor::Sender) -> anyhow::Result<()> {
    use pip_on_top::actor::shutdown::ShutdownSignals;

    let signals = ShutdownSignals::listen().context("could not listen for shutdown signals")?;
    tokio::spawn(signals.forward(events_tx));
    Ok(())
}

#[cfg(not(unix))]
fn forward_shutdown(events_tx: reactor::Sender) -> anyhow::Result<()> {
    use pip_on_top::actor::reactor::Event;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            events_tx.send(Event::Shutdown);
        }
    });
    Ok(())
}

#[cfg(target_os = "linux")]
fn connect_host(events_tx: reactor::Sender) -> anyhow::Result<SharedWindowSystem> {
    use std::rc::Rc;

    use pip_on_top::sys::x11::X11WindowSystem;

    let host = X11WindowSystem::connect().context("could not connect to the X server")?;
    host.event_pump(events_tx).spawn().context("could not start the X event thread")?;
    Ok(Rc::new(host))
}

#[cfg(not(target_os = "linux"))]
fn connect_host(_events_tx: reactor::Sender) -> anyhow::Result<SharedWindowSystem> {
    anyhow::bail!("only X11 window managers on Linux are supported")
}
