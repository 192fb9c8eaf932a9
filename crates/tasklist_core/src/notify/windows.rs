use crate::error::AppError;
use crate::model::Task;
use crate::notify::Notifier;
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, task: &Task) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title("tasklist")
            .text1(&task.text)
            .text2(&format!("was due {} {}", task.date, task.time))
            .show()
            .map_err(|err| AppError::io(err.to_string()))
    }
}
