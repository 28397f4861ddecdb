mod app;
mod chart;
mod cli;
mod color;
mod db;
mod event;
mod logging;
mod stats;
mod timer;
mod tui;
mod types;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let db_path = cli_opts.db.unwrap_or_else(db::default_db_path);
    let conn = db::init(&db_path)?;

    if let Some(command) = cli_opts.command {
        logging::init_stderr()?;
        return cli::run(command, &conn);
    }

    logging::init_file(&db_path)?;
    info!(db = %db_path.display(), "starting studytick");

    let mut app = app::App::new(Box::new(conn));
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
