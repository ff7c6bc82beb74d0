use std::io::{BufRead, Write};

use log::{error, info};
use rbt_leaderboard::{Leaderboard, Player};

use crate::command::{Command, parse_score};
use crate::config::ShellConfig;
use crate::error::ShellError;

const HELP: &str = "\
Commands:
  help      - show this help
  print     - show full leaderboard
  validate  - check red-black tree invariants
  exit      - quit

You can enter either:
  <name> <score>   (one line)
or:
  <name>           (then I'll prompt for score)
";

/// A line-oriented session over one [`Leaderboard`].
pub(crate) struct Shell<R, W> {
    input: R,
    output: W,
    board: Leaderboard,
    config: ShellConfig,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(crate) fn new(input: R, output: W, config: ShellConfig) -> Self {
        Self {
            input,
            output,
            board: Leaderboard::new(),
            config,
        }
    }

    /// Runs until `exit`, `quit` or end of input.
    pub(crate) fn run(&mut self) -> Result<(), ShellError> {
        writeln!(self.output, "RBT Leaderboard. Type 'help' for help.")?;

        loop {
            write!(self.output, "\nname or command> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            let Some(command) = Command::parse(&line) else {
                continue;
            };

            match command {
                Command::Help => write!(self.output, "{HELP}")?,
                Command::Print => self.print_standings()?,
                Command::Validate => {
                    let verdict = if self.board.validate_tree() { "VALID" } else { "INVALID" };
                    writeln!(self.output, "{verdict}")?;
                }
                Command::Exit => break,
                Command::Submit { name, score } => self.submit(&name, score)?,
                Command::Name(name) => {
                    write!(self.output, "score> ")?;
                    self.output.flush()?;
                    let Some(line) = self.read_line()? else {
                        break;
                    };
                    match parse_score(&line) {
                        Some(score) => self.submit(&name, score)?,
                        None => writeln!(self.output, "Please enter an integer score.")?,
                    }
                }
            }
        }

        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ShellError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn print_standings(&mut self) -> Result<(), ShellError> {
        writeln!(self.output, "=== Leaderboard (highest first) ===")?;
        for (place, player) in self.board.standings().iter().enumerate() {
            writeln!(self.output, "{}. {} : {}", place + 1, player.name, player.score)?;
        }
        Ok(())
    }

    fn submit(&mut self, name: &str, score: i64) -> Result<(), ShellError> {
        self.board.add_or_update(name, score);

        let Some(rank) = self.board.rank_of(name) else {
            error!("{name} missing from the board right after an update");
            writeln!(self.output, "Unexpected: player not found after update.")?;
            return Ok(());
        };
        info!("{name} at {} is ranked {} of {}", rank.score, rank.rank, rank.total_players);

        writeln!(self.output, "\n=== Result ===")?;
        writeln!(self.output, "Name : {name}")?;
        writeln!(self.output, "Score: {}", rank.score)?;
        writeln!(self.output, "Rank : {} of {}", rank.rank, rank.total_players)?;
        writeln!(self.output, "Same score count: {}", rank.same_score_count)?;

        let around = self.board.neighbors_around(name, self.config.neighbor_window);
        if !around.is_empty() {
            writeln!(self.output, "\nAround this rank:")?;
            self.print_neighbors(&around, name)?;
        }

        if self.config.validate_after_update {
            let valid = self.board.validate_tree();
            if !valid {
                error!("score tree failed validation after updating {name}");
            }
            writeln!(self.output, "\nTree check: {}", if valid { "VALID" } else { "INVALID" })?;
        }

        Ok(())
    }

    fn print_neighbors(&mut self, rows: &[Player], name: &str) -> Result<(), ShellError> {
        for row in rows {
            let marker = if row.name == name { " -> " } else { "    " };
            writeln!(self.output, "{marker}{} : {}", row.name, row.score)?;
        }
        Ok(())
    }
}
