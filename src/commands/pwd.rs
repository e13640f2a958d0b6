use crate::commands::command::{BadUsageSnafu, CommandError};
use crate::shell::Session;

pub(super) fn run(session: &mut Session, args: &[&str]) -> Result<Option<String>, CommandError> {
    if !args.is_empty() {
        return BadUsageSnafu { usage: "pwd" }.fail();
    }
    Ok(Some(session.current_path()))
}
