//! Binary entrypoint that opens the chat application.

use std::process::ExitCode;

use chatroom::start_chatroom;

/// Restore persisted chat state (seeding demo data on first run) and report it.
fn main() -> ExitCode {
    start_chatroom::run()
}
