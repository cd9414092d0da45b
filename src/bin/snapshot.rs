//! Snapshot generator: renders one dashboard page without an interactive
//! session.
//!
//! Arguments are `key=value` pairs replayed as session commands in order,
//! e.g. `snapshot tab=risks severity=critical open=r4`.
//!
//! Output: $RISKBOARD_OUT/index.html + summary.json, and docs/dashboard.html
//! when RISKBOARD_DOCS_COPY=true.

use anyhow::{bail, Result};
use std::fs;

use riskboard::app::{bootstrap, write_outputs};
use riskboard::config::Config;
use riskboard::controller::command::{self, Command};

fn main() -> Result<()> {
    println!("=== Risk Dashboard Snapshot ===");
    let cfg = Config::from_env();
    let mut session = bootstrap(&cfg)?;

    for arg in std::env::args().skip(1) {
        let line = match arg.split_once('=') {
            Some((key, value)) => format!("{} {}", key, value),
            None => arg.clone(),
        };
        match command::parse(&line) {
            Ok(Command::Dispatch(event)) => {
                println!("  apply: {}", event.name());
                session.dispatch(event);
            }
            Ok(_) => {}
            Err(msg) => bail!("bad argument {:?}: {}", arg, msg),
        }
    }

    let pass = session.current();
    let index = write_outputs(&cfg.out_dir, pass)?;

    println!("  tab: {}", pass.view.active_tab.as_str());
    println!("  visible risks: {}", pass.view.visible_risks);
    println!(
        "  {} written ({:.1} KB)",
        index.display(),
        pass.html.len() as f64 / 1024.0
    );

    if cfg.docs_copy {
        fs::create_dir_all("docs")?;
        fs::write("docs/dashboard.html", &pass.html)?;
        println!("  docs/dashboard.html written");
    }
    Ok(())
}
