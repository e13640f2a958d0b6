use snafu::Snafu;

use crate::fs::FsError;
use crate::shell::Session;

use super::{cd, help, ls, mkdir, mv, pwd, rename, rm, touch};

/// The shell's verb set, in the order `help` reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Touch,
    Mkdir,
    Ls,
    Cd,
    Pwd,
    Rm,
    Rename,
    Mv,
    Help,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Touch,
        Command::Mkdir,
        Command::Ls,
        Command::Cd,
        Command::Pwd,
        Command::Rm,
        Command::Rename,
        Command::Mv,
        Command::Help,
    ];

    pub fn verb(self) -> &'static str {
        match self {
            Command::Touch => "touch",
            Command::Mkdir => "mkdir",
            Command::Ls => "ls",
            Command::Cd => "cd",
            Command::Pwd => "pwd",
            Command::Rm => "rm",
            Command::Rename => "rename",
            Command::Mv => "mv",
            Command::Help => "help",
        }
    }

    /// Runs the verb. `Some` output is meant for the user; the first error
    /// aborts the remaining arguments of the same invocation.
    pub fn run(
        self,
        session: &mut Session,
        args: &[&str],
    ) -> Result<Option<String>, CommandError> {
        match self {
            Command::Touch => touch::run(session, args),
            Command::Mkdir => mkdir::run(session, args),
            Command::Ls => ls::run(session, args),
            Command::Cd => cd::run(session, args),
            Command::Pwd => pwd::run(session, args),
            Command::Rm => rm::run(session, args),
            Command::Rename => rename::run(session, args),
            Command::Mv => mv::run(session, args),
            Command::Help => help::run(session, args),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("{}: missing operand", verb))]
    MissingOperand { verb: &'static str },
    #[snafu(display("usage: {}", usage))]
    BadUsage { usage: &'static str },
    #[snafu(display("{}: command not found", name))]
    UnknownCommand { name: String },
    #[snafu(display("{}: {}", verb, source))]
    Fs {
        verb: &'static str,
        source: FsError,
    },
}
