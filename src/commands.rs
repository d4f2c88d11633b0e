use chrono::{DateTime, Utc};

use crate::db::models::{Match, Team};
use crate::db::MatchStore;
use crate::scoreboard::{ScoreboardError, ScoreboardService};

pub const HELP: &str = "\
commands:
  register HOME AWAY                 put a fixture on the board
  start HOME AWAY                    kick off a registered fixture at 0-0
  score HOME AWAY H A                set the running score
  finish HOME AWAY H A [RFC3339]     finish with the final score
  summary                            ranked list of started matches
  help                               this text
team names with spaces: use underscores (South_Korea) or quotes (\"South Korea\")";

/// One scoreboard console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Register { home: Team, away: Team },
    Start { home: Team, away: Team },
    Score { game: Match },
    Finish { game: Match },
    Summary,
    Help,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' expects {expected}")]
    WrongArity {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid score '{0}'")]
    InvalidScore(String),
    #[error("invalid finish time '{0}' (expected RFC 3339)")]
    InvalidTime(String),
    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// What a command produced, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Updated(Match),
    Summary(Vec<Match>),
    Help,
}

/// Parse one input line.  Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let tokens = tokenize(line)?;
    let (verb, args) = match tokens.split_first() {
        Some((verb, args)) => (verb.to_lowercase(), args),
        None => return Ok(None),
    };

    let command = match verb.as_str() {
        "register" | "add" => {
            let (home, away) = teams("register", "HOME AWAY", args, 2)?;
            Command::Register { home, away }
        }
        "start" => {
            let (home, away) = teams("start", "HOME AWAY", args, 2)?;
            Command::Start { home, away }
        }
        "score" | "update" => {
            let (home, away) = teams("score", "HOME AWAY H A", args, 4)?;
            Command::Score {
                game: Match::with_score(home, away, score(&args[2])?, score(&args[3])?),
            }
        }
        "finish" | "end" => {
            if args.len() != 4 && args.len() != 5 {
                return Err(ParseError::WrongArity {
                    command: "finish",
                    expected: "HOME AWAY H A [FINISH_TIME]",
                });
            }
            let mut game = Match::with_score(
                team(&args[0]),
                team(&args[1]),
                score(&args[2])?,
                score(&args[3])?,
            );
            game.finished_at = args.get(4).map(|s| finish_time(s)).transpose()?;
            Command::Finish { game }
        }
        "summary" | "board" => Command::Summary,
        "help" | "?" => Command::Help,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Run a parsed command against the service.
pub fn execute<S: MatchStore>(
    service: &ScoreboardService<S>,
    command: Command,
) -> Result<Reply, ScoreboardError> {
    let reply = match command {
        Command::Register { home, away } => Reply::Updated(service.register_fixture(home, away)?),
        Command::Start { home, away } => {
            Reply::Updated(service.start_game(&Match::new(home, away))?)
        }
        Command::Score { game } => Reply::Updated(service.update_score(&game)?),
        Command::Finish { game } => Reply::Updated(service.finish_game(&game)?),
        Command::Summary => Reply::Summary(service.get_summary()?),
        Command::Help => Reply::Help,
    };
    Ok(reply)
}

fn teams(
    command: &'static str,
    expected: &'static str,
    args: &[String],
    arity: usize,
) -> Result<(Team, Team), ParseError> {
    if args.len() != arity {
        return Err(ParseError::WrongArity { command, expected });
    }
    Ok((team(&args[0]), team(&args[1])))
}

fn team(raw: &str) -> Team {
    Team::new(raw.replace('_', " "))
}

// Negative values parse here; the service rejects them.
fn score(raw: &str) -> Result<i32, ParseError> {
    raw.parse::<i32>()
        .map_err(|_| ParseError::InvalidScore(raw.to_string()))
}

fn finish_time(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ParseError::InvalidTime(raw.to_string()))
}

/// Whitespace split with double-quoted tokens.
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err(ParseError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryStore, SharedStore};
    use chrono::TimeZone;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# opening day").unwrap(), None);
    }

    #[test]
    fn parses_quoted_and_underscored_names() {
        let cmd = parse_line(r#"register "South Korea" Costa_Rica"#).unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Register {
                home: Team::new("South Korea"),
                away: Team::new("Costa Rica"),
            }
        );
    }

    #[test]
    fn parses_score_and_finish() {
        let cmd = parse_line("score Mexico Canada 0 5").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Score {
                game: Match::with_score(Team::new("Mexico"), Team::new("Canada"), 0, 5),
            }
        );

        let cmd = parse_line("FINISH Spain Brazil 10 2 2023-08-28T16:00:00Z")
            .unwrap()
            .unwrap();
        match cmd {
            Command::Finish { game } => {
                assert_eq!((game.home_score, game.away_score), (10, 2));
                assert_eq!(
                    game.finished_at,
                    Some(Utc.with_ymd_and_hms(2023, 8, 28, 16, 0, 0).unwrap())
                );
            }
            other => panic!("Expected Finish, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            parse_line("kickoff Spain Brazil").unwrap_err(),
            ParseError::UnknownCommand("kickoff".into())
        );
        assert!(matches!(
            parse_line("start Spain").unwrap_err(),
            ParseError::WrongArity { command: "start", .. }
        ));
        assert_eq!(
            parse_line("score Spain Brazil one 0").unwrap_err(),
            ParseError::InvalidScore("one".into())
        );
        assert_eq!(
            parse_line("finish Spain Brazil 1 0 yesterday").unwrap_err(),
            ParseError::InvalidTime("yesterday".into())
        );
        assert_eq!(
            parse_line(r#"start "Spain Brazil"#).unwrap_err(),
            ParseError::UnterminatedQuote
        );
    }

    #[test]
    fn negative_scores_reach_the_service() {
        let cmd = parse_line("score Spain Brazil -1 0").unwrap().unwrap();
        let service = ScoreboardService::new(SharedStore::new(InMemoryStore::new()));
        execute(&service, parse_line("register Spain Brazil").unwrap().unwrap()).unwrap();
        execute(&service, parse_line("start Spain Brazil").unwrap().unwrap()).unwrap();

        let err = execute(&service, cmd).unwrap_err();
        assert!(matches!(err, ScoreboardError::InvalidArgument { .. }));
    }

    #[test]
    fn script_drives_the_board() {
        let service = ScoreboardService::new(SharedStore::new(InMemoryStore::new()));
        let script = "\
register Mexico Canada
register Spain Brazil
start Mexico Canada
start Spain Brazil
score Mexico Canada 0 5
score Spain Brazil 10 2
summary";
        let mut last = None;
        for line in script.lines() {
            let cmd = parse_line(line).unwrap().unwrap();
            last = Some(execute(&service, cmd).unwrap());
        }
        match last {
            Some(Reply::Summary(games)) => {
                let totals: Vec<i64> = games.iter().map(Match::total_score).collect();
                assert_eq!(totals, vec![12, 5]);
            }
            other => panic!("Expected Summary, got {:?}", other),
        }
    }
}
