/// One line of shell input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Print,
    Validate,
    Exit,
    /// `<name> <score>` on one line.
    Submit { name: String, score: i64 },
    /// Anything else is taken as a player name; its score is asked for next.
    Name(String),
}

const KEYWORDS: [&str; 5] = ["help", "print", "validate", "exit", "quit"];

impl Command {
    /// Parses a line of input. Blank lines yield `None`.
    pub(crate) fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        match line {
            "" => return None,
            "help" => return Some(Command::Help),
            "print" => return Some(Command::Print),
            "validate" => return Some(Command::Validate),
            "exit" | "quit" => return Some(Command::Exit),
            _ => {}
        }

        let mut words = line.split_whitespace();
        if let (Some(name), Some(score)) = (words.next(), words.next())
            && !KEYWORDS.contains(&name)
            && let Some(score) = parse_score(score)
        {
            return Some(Command::Submit {
                name: name.to_owned(),
                score,
            });
        }

        Some(Command::Name(line.to_owned()))
    }
}

/// Reads a score from the leading integer of the first word of `text`.
///
/// Trailing characters after the digits are ignored, so `10abc` scores 10.
/// A word without leading digits, or one that overflows, is not a score.
pub(crate) fn parse_score(text: &str) -> Option<i64> {
    let word = text.split_whitespace().next()?;
    let sign = usize::from(word.starts_with(['+', '-']));
    let digits = word[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    word[..sign + digits].parse().ok()
}
