use snafu::ResultExt;
use tracing::debug;

use crate::commands::command::{CommandError, FsSnafu, MissingOperandSnafu};
use crate::fs::path;
use crate::shell::Session;

const VERB: &str = "rm";

pub(super) fn run(session: &mut Session, args: &[&str]) -> Result<Option<String>, CommandError> {
    if args.is_empty() {
        return MissingOperandSnafu { verb: VERB }.fail();
    }
    for path_arg in args {
        let (dir_path, name) = path::split(path_arg);
        let dest = path::resolve(dir_path, session.cwd(), session.root())
            .context(FsSnafu { verb: VERB })?;
        debug!("Removing '{}' from '{}'", name, dest.name());
        dest.remove(name).context(FsSnafu { verb: VERB })?;
    }
    Ok(None)
}
