use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use zeroize::Zeroizing;

use crate::cli::ResetArgs;
use crate::config;
use crate::widget::view::{render_dialog, render_panel};
use crate::widget::{PasswordResetWidget, Phase};

/// What the operator typed at the hidden prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Generate,
    Show,
    Confirm,
    Cancel,
    Password(String),
}

fn parse_input(line: String) -> Input {
    let command = match line.trim() {
        "/generate" => Some(Input::Generate),
        "/show" => Some(Input::Show),
        "/confirm" => Some(Input::Confirm),
        "/cancel" => Some(Input::Cancel),
        _ => None,
    };
    command.unwrap_or_else(|| Input::Password(line))
}

pub async fn run(args: ResetArgs) -> Result<()> {
    let root = config::project_root()?;
    let cfg = config::read(&root)?;

    let mut widget = super::open_widget(&root, &cfg, args.project_ref.clone()).await?;
    print!("{}", render_panel(&widget.view()));

    if widget.view().trigger.disabled {
        bail!("The database password cannot be reset right now.");
    }
    if widget.model().project_ref.is_none() {
        println!("  No project selected. Pass --project-ref or set project_ref in config.toml.");
    }

    if !args.yes {
        widget.click_trigger();
        return run_interactive(&mut widget, &args).await;
    }

    let source = if args.generate {
        Source::Generate
    } else if args.password_stdin {
        Source::Supplied(read_stdin_line().await?)
    } else {
        bail!("--yes needs --generate or --password-stdin.");
    };
    widget.click_trigger();
    run_unattended(&mut widget, source).await
}

/// Where an unattended reset gets its password from.
enum Source {
    Generate,
    Supplied(Zeroizing<String>),
}

async fn read_stdin_line() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read password from stdin")?;
    Ok(line)
}

async fn run_unattended(widget: &mut PasswordResetWidget, source: Source) -> Result<()> {
    let generated = matches!(source, Source::Generate);
    match source {
        Source::Generate => widget.generate_strong_password(),
        Source::Supplied(line) => widget.set_password(line.trim_end_matches(['\r', '\n'])),
    }

    widget.settle().await;
    print!("{}", render_dialog(&widget.view()));

    let password = Zeroizing::new(widget.model().password.as_str().to_owned());
    let model = widget.model();
    if model.project_ref.is_none() {
        bail!("No project selected.");
    }
    if !model.meets_threshold() {
        bail!(
            "Password is not strong enough (score {}, need {}).",
            model.strength.score,
            model.settings.min_strength
        );
    }

    widget.confirm();
    widget.settle().await;

    if widget.model().phase() != Phase::Closed {
        bail!("Database password was not reset.");
    }
    if generated {
        println!("New password: {}", password.as_str());
    }
    Ok(())
}

enum Event {
    Line(Option<String>),
    Progress,
}

async fn run_interactive(widget: &mut PasswordResetWidget, args: &ResetArgs) -> Result<()> {
    let mut lines = spawn_hidden_reader();

    if args.generate {
        widget.generate_strong_password();
    }

    println!("Type a new password (input is hidden), or a command.");
    let mut last = widget.view();
    print!("{}", render_dialog(&last));

    let mut cancelled = false;
    while widget.model().dialog.visible {
        let event = tokio::select! {
            line = lines.recv() => Event::Line(line),
            _ = widget.step(), if widget.is_busy() => Event::Progress,
        };

        match event {
            Event::Progress => {}
            Event::Line(None) => {
                widget.cancel();
                cancelled = !widget.model().dialog.visible;
                if !cancelled {
                    // Input closed mid-request; let it finish.
                    widget.settle().await;
                }
                break;
            }
            Event::Line(Some(line)) => match parse_input(line) {
                Input::Generate => widget.generate_strong_password(),
                Input::Show => println!("  {}", widget.model().password.as_str()),
                Input::Confirm => widget.confirm(),
                Input::Cancel => {
                    widget.cancel();
                    cancelled = !widget.model().dialog.visible;
                }
                Input::Password(value) => widget.set_password(value),
            },
        }

        let current = widget.view();
        if current != last && current.dialog.is_some() {
            print!("{}", render_dialog(&current));
        }
        last = current;
    }

    if cancelled {
        println!("Cancelled. The database password was not changed.");
    }
    Ok(())
}

/// Read hidden lines on a dedicated thread; rpassword blocks on the terminal.
fn spawn_hidden_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match rpassword::read_password() {
            Ok(line) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "stopped reading input");
                break;
            }
        }
    });
    rx
}
