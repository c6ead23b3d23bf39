use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use animator::{HexpressionsConfig, PuzzleHandle, PuzzleModule, RenderTarget, run_animation_loop};
use color_eyre::eyre::eyre;
use crossbeam_channel::{Receiver, Sender};
use hexpr_core::{Judge, TargetWordJudge};
use interpreter::{HELP, Interpreter, Outcome, Pacing, SystemClock};
use log::{debug, info};
use owo_colors::OwoColorize;

use crate::console::{ConsoleTarget, describe};

pub type Handle = PuzzleHandle<ConsoleTarget, TargetWordJudge>;

/// Reads commands from stdin until `quit` or end of input.
///
/// Commands run one at a time on a worker thread so `cancel`, `state` and
/// `help` are answered while a long command is still pressing buttons.
pub fn run(handle: &Handle, config: &HexpressionsConfig) -> color_eyre::Result<()> {
    let interpreter = Interpreter::new(Pacing::from(config));
    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
    let (command_tx, command_rx) = crossbeam_channel::unbounded::<String>();

    let animation = {
        let handle = Arc::clone(handle);
        let frame = config.frame_interval();
        thread::spawn(move || run_animation_loop(&handle, frame, &shutdown_rx))
    };

    let worker = {
        let handle = Arc::clone(handle);
        let interpreter = interpreter.clone();
        let command_rx = command_rx.clone();
        thread::spawn(move || run_commands(&handle, &interpreter, &command_rx))
    };

    println!("{}", HELP.dimmed());
    let result = read_lines(handle, &interpreter, &command_tx);

    let dropped = command_rx.try_iter().count();
    if dropped > 0 {
        debug!(target: "interpreter", "Dropped queued commands: count={dropped}");
    }
    interpreter.cancel_flag().close();
    drop(command_tx);
    worker
        .join()
        .map_err(|_| eyre!("The command thread panicked"))?;
    drop(shutdown_tx);
    animation
        .join()
        .map_err(|_| eyre!("The animation thread panicked"))?;

    result
}

fn read_lines(
    handle: &Handle,
    interpreter: &Interpreter,
    commands: &Sender<String>,
) -> color_eyre::Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        match line.trim().to_lowercase().as_str() {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "cancel" => {
                info!(target: "interpreter", "Cancellation requested");
                interpreter.cancel_flag().request();
            }
            "state" => print_state(handle),
            _ => commands.send(line)?,
        }
    }

    Ok(())
}

fn run_commands(handle: &Handle, interpreter: &Interpreter, commands: &Receiver<String>) {
    let mut controls = Arc::clone(handle);
    let mut clock = SystemClock::new();

    for line in commands {
        if interpreter.cancel_flag().is_closed() {
            break;
        }
        clock.restart();
        match interpreter.run(&line, &mut controls, &mut clock) {
            Ok(Outcome::Completed { presses }) => {
                debug!(target: "interpreter", "Finished `{line}`: presses={presses}");
            }
            Ok(Outcome::Cancelled { presses }) => {
                println!("{} after {presses} press(es)", "cancelled".yellow());
            }
            Err(err) => println!("{}", err.to_chat().red()),
        }
    }
}

fn print_state(handle: &Handle) {
    for line in state_report(&handle.lock()) {
        println!("{line}");
    }
}

/// What `state` prints. While a turn is in flight the arrangement and the top
/// word are withheld and the display shows the seed label instead.
fn state_report<R: RenderTarget, J: Judge>(module: &PuzzleModule<R, J>) -> Vec<String> {
    let engine = module.engine();
    let mut lines = vec![];

    match engine.active_turn() {
        Some(turn) => lines.push(format!("{} {}", "turning".dimmed(), turn.face().yellow())),
        None => lines.push(format!("{} {}", "arrangement".dimmed(), engine.arrangement())),
    }
    lines.push(describe(&module.display()));
    lines.push(format!(
        "{} {}  {} {}",
        "strikes".dimmed(),
        module.strikes(),
        "solved".dimmed(),
        if module.is_solved() {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        }
    ));

    lines
}
