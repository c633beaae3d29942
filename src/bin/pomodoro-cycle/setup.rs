use std::path::PathBuf;
use std::sync::Arc;

use pomodoro_cycle::adapter::config::{self, Configuration};
use pomodoro_cycle::adapter::console::Console;
use pomodoro_cycle::adapter::outbound::NotifyService;
use pomodoro_cycle::adapter::repository::{
    JournalRepository, NotificationConfiguration, SettingsConfiguration,
};
use pomodoro_cycle::domain::pomodoro::ApplicationCore;
use pomodoro_cycle::utils::xdg::{Xdg, XdgBaseKind};
use snafu::{prelude::*, Whatever};
use tokio::io::{BufReader, Stdin, Stdout};

use crate::cli::Arguments;

const APP_NAME: &str = "pomodoro-cycle";

pub type StdConsole = Console<BufReader<Stdin>, Stdout>;

pub async fn bootstrap(arg: Arguments) -> Result<StdConsole, Whatever> {
    let xdg = Xdg::new(APP_NAME).whatever_context("Could not use XDG base directories")?;
    let configuration = configuration(&arg, &xdg)?;
    let journal = journal_path(&arg, &configuration, &xdg)?;
    tracing::info!(journal = %journal.display(), "Using journal");

    let core = core(configuration, journal).await?;
    let console = Console::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        core,
    );
    Ok(console)
}

fn configuration(arg: &Arguments, xdg: &Xdg) -> Result<Arc<Configuration>, Whatever> {
    let res = match &arg.config {
        Some(path) => config::load_with_path(path),
        None => config::load_with_xdg(xdg),
    };

    let configuration = res.whatever_context("Could not load configuration")?;
    Ok(Arc::new(configuration))
}

fn journal_path(
    arg: &Arguments,
    configuration: &Configuration,
    xdg: &Xdg,
) -> Result<PathBuf, Whatever> {
    if let Some(path) = arg.journal.as_ref().or(configuration.storage.journal.as_ref()) {
        return Ok(path.clone());
    }
    xdg.resolve_create(XdgBaseKind::Data, "journal.json")
        .whatever_context("Could not use XDG data directory")
}

async fn core(config: Arc<Configuration>, journal: PathBuf) -> Result<ApplicationCore, Whatever> {
    let notify_port = Arc::new(NotifyService::new(APP_NAME.to_owned()));
    let settings_repository = Arc::new(SettingsConfiguration::new(Arc::clone(&config)));
    let notification_repository = Arc::new(NotificationConfiguration::new(config));
    let cycle_repository = Arc::new(
        JournalRepository::open(&journal)
            .await
            .whatever_context(format!("Could not open journal {}", journal.display()))?,
    );

    let core = ApplicationCore::setup(
        notify_port,
        settings_repository,
        notification_repository,
        cycle_repository,
    )
    .await
    .whatever_context("Could not setup application core")?;

    Ok(core)
}
