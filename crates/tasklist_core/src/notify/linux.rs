use crate::error::AppError;
use crate::model::Task;
use crate::notify::Notifier;
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, task: &Task) -> Result<(), AppError> {
        Notification::new()
            .summary("tasklist")
            .body(&format!(
                "{} was due {} {}",
                task.text, task.date, task.time
            ))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
