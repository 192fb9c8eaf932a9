mod cli;

use clap::{CommandFactory, Parser};
use cli::{Cli, Command};
use std::io::{self, BufRead, Write};
use tabled::{Table, Tabled};
use tasklist_core::config::{Palette, load_config_with_fallback, palette_for_theme};
use tasklist_core::controller::{SubmitOutcome, TaskListController};
use tasklist_core::error::AppError;
use tasklist_core::model::{Priority, Task, is_late_at, now_local};
use tasklist_core::notify::{notifier_from_env, notify_late};
use tasklist_core::storage::FileStore;
use time::macros::format_description;

type Controller = TaskListController<FileStore>;

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Late")]
    late: String,
}

fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>, AppError> {
    raw.map(Priority::from_label).transpose()
}

fn print_task_json(task: &Task) {
    let json = serde_json::json!({
        "text": task.text,
        "date": task.date,
        "time": task.time,
        "priority": task.priority,
    });
    println!("{}", json);
}

fn report_submit(outcome: SubmitOutcome, json: bool) -> Result<(), AppError> {
    match outcome {
        SubmitOutcome::Added(task) => {
            if json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({} {})", task.text, task.date, task.time);
            }
        }
        SubmitOutcome::Updated { task, .. } => {
            if json {
                print_task_json(&task);
            } else {
                println!("Updated task: {} ({} {})", task.text, task.date, task.time);
            }
        }
        // a blank required field is ignored without any output
        SubmitOutcome::MissingField => {}
        SubmitOutcome::NotInFuture => {
            return Err(AppError::invalid_input(
                "scheduled time must be in the future",
            ));
        }
    }

    Ok(())
}

fn print_list(controller: &Controller, palette: &Palette, json: bool) -> Result<(), AppError> {
    let now = now_local();
    let filtered = controller.filtered_tasks();

    if json {
        let mut payload = Vec::with_capacity(filtered.len());
        for (index, task) in &filtered {
            payload.push(serde_json::json!({
                "index": index,
                "text": task.text,
                "date": task.date,
                "time": task.time,
                "priority": task.priority,
                "late": is_late_at(task, now),
            }));
        }
        println!("{}", serde_json::Value::Array(payload));
        return Ok(());
    }

    let clock_format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    let clock = now
        .format(&clock_format)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{}", palette.mutedize(&format!("Now: {clock}")));
    if !controller.search().trim().is_empty() {
        println!(
            "{}",
            palette.mutedize(&format!("Filter: {}", controller.search()))
        );
    }

    if filtered.is_empty() {
        println!("No tasks");
        return Ok(());
    }

    let rows: Vec<Row> = filtered
        .iter()
        .map(|(index, task)| Row {
            index: *index,
            text: task.text.clone(),
            date: task.date.clone(),
            time: task.time.clone(),
            priority: task.priority.label(),
            late: if is_late_at(task, now) {
                palette.accentize("late")
            } else {
                String::new()
            },
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

fn confirm_clear() -> Result<bool, AppError> {
    print!("Remove all tasks? [y/N] ");
    io::stdout()
        .flush()
        .map_err(|err| AppError::io(err.to_string()))?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|err| AppError::io(err.to_string()))?;

    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn run_command(controller: &mut Controller, palette: &Palette, cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Add {
            text,
            date,
            time,
            priority,
        } => {
            let priority = parse_priority(priority.as_deref())?;
            // a rejected edit earlier in the session must not leave its
            // cursor armed, or this add would replace that record
            controller.cancel_edit();
            let draft = controller.draft_mut();
            draft.text = text.unwrap_or_default();
            draft.date = date.unwrap_or_default();
            draft.time = time.unwrap_or_default();
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            report_submit(controller.submit()?, cli.json)?;
        }
        Command::Edit {
            index,
            text,
            date,
            time,
            priority,
        } => {
            let priority = parse_priority(priority.as_deref())?;
            controller.begin_edit(index)?;
            let draft = controller.draft_mut();
            if let Some(text) = text {
                draft.text = text;
            }
            if let Some(date) = date {
                draft.date = date;
            }
            if let Some(time) = time {
                draft.time = time;
            }
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            report_submit(controller.submit()?, cli.json)?;
        }
        Command::Delete { index } => {
            let task = controller.delete(index)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Deleted task: {} ({} {})", task.text, task.date, task.time);
            }
        }
        Command::Clear { yes } => {
            let confirmed = yes || confirm_clear()?;
            let cleared = controller.clear_all(confirmed)?;
            if cli.json {
                println!("{}", serde_json::json!({ "cleared": cleared }));
            } else if cleared {
                println!("Cleared all tasks");
            } else {
                println!("Kept all tasks");
            }
        }
        Command::Search { query } => {
            controller.set_search(query.as_deref().unwrap_or(""));
            print_list(controller, palette, cli.json)?;
        }
        Command::List => {
            print_list(controller, palette, cli.json)?;
        }
        Command::Notify => {
            let notifier = notifier_from_env()?;
            let outcome = notify_late(controller.tasks(), notifier.as_ref());
            for failure in &outcome.failures {
                eprintln!("ERROR: {}", failure.error);
            }
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "notified": outcome.notified.len(),
                        "failures": outcome.failures.len(),
                    })
                );
            } else {
                println!("Notified {} late task(s)", outcome.notified.len());
            }
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_quotes => escape = true,
            '"' => in_quotes = !in_quotes,
            _ if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

/// Line loop holding one controller, so the search filter and edit state
/// behave like the widget's transient state.
fn run_interactive(controller: &mut Controller, palette: &Palette) -> Result<(), AppError> {
    let mut input = String::new();

    loop {
        input.clear();
        let bytes = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(controller, palette, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let config = load_config_with_fallback();
    let palette = palette_for_theme(config.theme.as_deref());

    let store = match FileStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };
    let mut controller = TaskListController::new(store);

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&mut controller, &palette) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
        Err(err) => {
            // --help / --version
            let _ = err.print();
            return;
        }
    };

    if let Err(err) = run_command(&mut controller, &palette, cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
