use anyhow::Result;
use std::io::{self, Write};

use riskboard::app::{bootstrap, read_line_lossy, write_outputs};
use riskboard::config::Config;
use riskboard::controller::command::{self, Command, USAGE};
use riskboard::logging::{log, obj, Domain, Level};
use serde_json::json;

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let mut session = bootstrap(&cfg)?;

    let index = write_outputs(&cfg.out_dir, session.current())?;
    println!("dashboard: {}", index.display());
    print!("{}", session.current().text);
    println!("type `help` for commands");

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    while let Some(line) = read_line_lossy(&mut stdin)? {
        match command::parse(&line) {
            Ok(Command::Dispatch(event)) => {
                let pass = session.dispatch(event);
                write_outputs(&cfg.out_dir, pass)?;
                print!("{}", pass.text);
            }
            Ok(Command::Help) => println!("{}", USAGE),
            Ok(Command::Noop) => {}
            Ok(Command::Quit) => break,
            Err(msg) => println!("{}\n{}", msg, USAGE),
        }
        stdout.flush()?;
    }

    log(
        Level::Info,
        Domain::System,
        "session_end",
        obj(&[
            ("render_passes", json!(session.render_count())),
            ("state_hash", json!(session.state().hash())),
        ]),
    );
    Ok(())
}
