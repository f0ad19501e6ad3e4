// src/main.rs

//! Interactive entry point: a plain buffered-stdin command loop over
//! the plotting [`Session`]. Line editing, history navigation and raw
//! terminal mode are deliberately absent; any readline wrapper (e.g.
//! `rlwrap`) can supply them from outside.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::info;

use dotplot::config::CONFIG;
use dotplot::session::{Outcome, Session};

const PROMPT: &str = " > ";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    info!("starting dotplot session");
    let mut session = Session::new(&CONFIG);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "{}", PROMPT).context("failed to write prompt")?;
    stdout.flush().context("failed to flush stdout")?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read command line")?;
        if line.trim().is_empty() {
            write!(stdout, "{}", PROMPT)?;
            stdout.flush()?;
            continue;
        }

        match session.execute(&line) {
            Outcome::Quit => break,
            Outcome::Message(message) => {
                writeln!(stdout, "{}", message)?;
            }
            Outcome::Frame { frame, message } => {
                writeln!(stdout)?;
                write!(stdout, "{}", frame)?;
                match message {
                    Some(message) => writeln!(stdout, "\n{}", message)?,
                    None => writeln!(stdout)?,
                }
            }
        }

        write!(stdout, "{}", PROMPT)?;
        stdout.flush().context("failed to flush stdout")?;
    }

    info!("session ended");
    Ok(())
}
