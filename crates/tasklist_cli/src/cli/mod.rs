use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task
    ///
    /// Example: tasklist add "Buy milk" --date 2099-01-01 --time 10:00 --priority high
    Add {
        text: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        /// high, medium or low (default medium)
        #[arg(long)]
        priority: Option<String>,
    },
    /// Edit the task at an index and resubmit it
    ///
    /// Example: tasklist edit 0 --time 14:00
    Edit {
        index: usize,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete the task at an index
    ///
    /// Example: tasklist delete 0
    Delete {
        index: usize,
    },
    /// Remove every task (asks for confirmation)
    ///
    /// Example: tasklist clear --yes
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Filter the list by a case-insensitive substring of the task text
    ///
    /// Example: tasklist search milk
    Search {
        query: Option<String>,
    },
    /// Show the task list
    ///
    /// Example: tasklist list
    List,
    /// Send desktop notifications for late tasks
    ///
    /// Example: tasklist notify
    Notify,
}
