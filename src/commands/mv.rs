use snafu::ResultExt;
use tracing::debug;

use crate::commands::command::{BadUsageSnafu, CommandError, FsSnafu};
use crate::fs::{FsError, path};
use crate::shell::Session;

const VERB: &str = "mv";

pub(super) fn run(session: &mut Session, args: &[&str]) -> Result<Option<String>, CommandError> {
    let &[src, dest_path] = args else {
        return BadUsageSnafu {
            usage: "mv SOURCE DEST_DIR",
        }
        .fail();
    };
    let (src_dir_path, name) = path::split(src);
    let src_dir = path::resolve(src_dir_path, session.cwd(), session.root())
        .context(FsSnafu { verb: VERB })?;
    let dest = path::resolve(dest_path, session.cwd(), session.root())
        .context(FsSnafu { verb: VERB })?;
    if src_dir == dest {
        return Ok(None);
    }
    match src_dir.find_dir(name) {
        Ok(dir) => {
            debug!("Moving directory '{}' into '{}'", name, dest.name());
            dir.move_to(&dest).context(FsSnafu { verb: VERB })?;
        }
        Err(_) => {
            // Files have no back-reference to relink; a move is a checked
            // remove-and-re-add.
            let file = src_dir.find_file(name).context(FsSnafu { verb: VERB })?;
            if dest.exists(name) {
                return Err(FsError::AlreadyExists {
                    name: name.to_owned(),
                })
                .context(FsSnafu { verb: VERB });
            }
            src_dir.remove(name).context(FsSnafu { verb: VERB })?;
            dest.add_file(file).context(FsSnafu { verb: VERB })?;
        }
    }
    Ok(None)
}
