use std::io::{self, BufRead, Write};

use colored::Colorize;
use hashlink::LinkedHashMap;
use tracing::debug;

use crate::commands::{Command, CommandError};
use crate::fs::{Dir, EntryKind};

/// One interactive (or batch) shell session over a single tree.
///
/// The session holds the only process-wide handles: the root and the current
/// directory. Verbs are dispatched through a registry with stable insertion
/// order, which is also the order `help` reports.
pub struct Session {
    root: Dir,
    cwd: Dir,
    commands: LinkedHashMap<&'static str, Command>,
}

impl Session {
    pub fn new(root: Dir) -> Self {
        if supports_color::on(supports_color::Stream::Stdout).is_none() {
            colored::control::set_override(false);
        }
        let mut commands = LinkedHashMap::new();
        for command in Command::ALL {
            commands.insert(command.verb(), command);
        }
        Session {
            cwd: root.clone(),
            root,
            commands,
        }
    }

    pub fn root(&self) -> &Dir {
        &self.root
    }

    pub fn cwd(&self) -> &Dir {
        &self.cwd
    }

    pub fn set_cwd(&mut self, to: Dir) {
        self.cwd = to;
    }

    pub fn verbs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Absolute path of the current directory, built by walking the parent
    /// references up to the root.
    pub fn current_path(&self) -> String {
        let mut segments = Vec::new();
        let mut cursor = self.cwd.clone();
        while !cursor.is_root() {
            segments.push(cursor.name());
            let above = cursor.parent();
            if above == cursor {
                break;
            }
            cursor = above;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Evaluates one input line: the first token is the verb, the rest are
    /// its arguments. An empty line is a no-op.
    pub fn eval(&mut self, line: &str) -> Result<Option<String>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();
        let Some(command) = self.commands.get(verb).copied() else {
            return Err(CommandError::UnknownCommand {
                name: verb.to_owned(),
            });
        };
        debug!("Dispatching '{}' with {} argument(s)", verb, args.len());
        command.run(self, &args)
    }

    /// Runs `;`-separated commands, stopping at the first error.
    pub fn run_batch(&mut self, script: &str) -> Result<(), CommandError> {
        for piece in script.split(';') {
            if let Some(output) = self.eval(piece)? {
                self.print_listing(&output);
            }
        }
        Ok(())
    }

    /// The interactive loop. Errors are reported and the session continues;
    /// `exit` or end of input ends it.
    pub fn run_interactive(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut line = String::new();
        loop {
            write!(stdout, "{} ", self.prompt())?;
            stdout.flush()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let input = line.trim();
            if input == "exit" {
                break;
            }
            match self.eval(input) {
                Ok(Some(output)) => self.print_listing(&output),
                Ok(None) => {}
                Err(error) => eprintln!("vsh: {error}"),
            }
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        format!("{} $", self.current_path().cyan().bold())
    }

    fn print_listing(&self, output: &str) {
        let dir_tag = format!("{} ", EntryKind::Dir);
        for line in output.lines() {
            match line.strip_prefix(&dir_tag) {
                Some(name) => println!("{}{}", dir_tag, name.blue().bold()),
                None => println!("{line}"),
            }
        }
    }
}
