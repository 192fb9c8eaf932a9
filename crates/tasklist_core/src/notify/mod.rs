use crate::error::AppError;
use crate::model::{Task, is_late_at, now_local};
use time::OffsetDateTime;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

pub trait Notifier {
    fn notify(&self, task: &Task) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _task: &Task) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn notifier_from_env() -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var("TASKLIST_DISABLE_NOTIFICATIONS").is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(NoopNotifier)),
            other => Err(other),
        },
    }
}

#[derive(Debug)]
pub struct NotifyOutcome {
    pub notified: Vec<Task>,
    pub failures: Vec<NotifyFailure>,
}

#[derive(Debug)]
pub struct NotifyFailure {
    pub text: String,
    pub error: AppError,
}

/// Sends one notification per late task. Lateness stays advisory: the
/// collection is never mutated here, and a failing notifier is recorded
/// instead of aborting the rest.
pub fn notify_late(tasks: &[Task], notifier: &dyn Notifier) -> NotifyOutcome {
    notify_late_at(tasks, notifier, now_local())
}

pub fn notify_late_at(
    tasks: &[Task],
    notifier: &dyn Notifier,
    now: OffsetDateTime,
) -> NotifyOutcome {
    let mut notified = Vec::new();
    let mut failures = Vec::new();

    for task in tasks {
        if !is_late_at(task, now) {
            continue;
        }

        match notifier.notify(task) {
            Ok(_) => notified.push(task.clone()),
            Err(err) => failures.push(NotifyFailure {
                text: task.text.clone(),
                error: err,
            }),
        }
    }

    NotifyOutcome { notified, failures }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}
