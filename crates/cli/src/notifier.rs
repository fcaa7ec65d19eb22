//! Terminal notice sink.

use missiondesk_core::{Notice, NoticeLevel, Notifier};
use tracing::{info, warn};

/// Prints notices to the terminal and mirrors them to the log.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                warn!("{}", notice.message);
                eprintln!("{}", notice);
            }
            NoticeLevel::Success | NoticeLevel::Info => {
                info!("{}", notice.message);
                println!("{}", notice);
            }
        }
    }
}
