//! rHomeTasks main entrypoint.

use rhometasks::run;
use rhometasks::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(if e.is_client_error() { 2 } else { 1 });
    }
}
