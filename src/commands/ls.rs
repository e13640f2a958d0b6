use snafu::ResultExt;

use crate::commands::command::{BadUsageSnafu, CommandError, FsSnafu};
use crate::fs::path;
use crate::shell::Session;

const VERB: &str = "ls";

pub(super) fn run(session: &mut Session, args: &[&str]) -> Result<Option<String>, CommandError> {
    let target = match args {
        [] => session.cwd().clone(),
        [path_arg] => path::resolve(path_arg, session.cwd(), session.root())
            .context(FsSnafu { verb: VERB })?,
        _ => return BadUsageSnafu { usage: "ls [PATH]" }.fail(),
    };
    Ok(Some(target.list()))
}
