//! Line commands accepted by the interactive session.

use super::events::Event;
use super::state::Tab;
use crate::filter::Selection;
use crate::model::{Severity, Status};

pub const USAGE: &str = "\
commands:
  location <id|all>        filter by site
  severity <level|all>     low | medium | high | critical
  status <status|all>      active | monitoring | mitigated | resolved
  search [text]            case-insensitive substring; empty clears
  tab <name>               overview | risks | locations | mitigation
  open <risk-id>           show risk details
  site <location-id>       jump to the risks of a site
  close                    close the detail dialog
  clear                    reset all filters
  theme                    toggle light/dark
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Event),
    Help,
    Quit,
    Noop,
}

fn selection<T>(arg: &str, parse: impl Fn(&str) -> Option<T>, what: &str) -> Result<Selection<T>, String> {
    if arg == "all" {
        return Ok(Selection::All);
    }
    parse(arg)
        .map(Selection::Only)
        .ok_or_else(|| format!("unknown {}: {:?}", what, arg))
}

fn required<'a>(arg: &'a str, cmd: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("{} needs an argument", cmd))
    } else {
        Ok(arg)
    }
}

/// Parses one input line. Only `search` keeps its argument verbatim (minus
/// the single separator after the command word); other arguments are trimmed.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n').trim_start();
    let (cmd, raw) = match line.split_once(char::is_whitespace) {
        Some((c, rest)) => (c, rest),
        None => (line, ""),
    };
    let arg = raw.trim();

    let event = match cmd {
        "" => return Ok(Command::Noop),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "location" => {
            let arg = required(arg, cmd)?;
            Event::SetLocationFilter(selection(arg, |s| Some(s.to_string()), "location")?)
        }
        "severity" => Event::SetSeverityFilter(selection(required(arg, cmd)?, Severity::parse, "severity")?),
        "status" => Event::SetStatusFilter(selection(required(arg, cmd)?, Status::parse, "status")?),
        "search" => Event::SetSearch(raw.to_string()),
        "tab" => {
            let arg = required(arg, cmd)?;
            Event::SelectTab(Tab::parse(arg).ok_or_else(|| format!("unknown tab: {:?}", arg))?)
        }
        "open" => Event::SelectRisk(required(arg, cmd)?.to_string()),
        "site" => Event::SelectLocation(required(arg, cmd)?.to_string()),
        "close" => Event::CloseDialog,
        "clear" => Event::ClearFilters,
        "theme" => Event::ToggleTheme,
        other => return Err(format!("unknown command: {:?}", other)),
    };
    Ok(Command::Dispatch(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_commands() {
        assert_eq!(
            parse("severity critical").unwrap(),
            Command::Dispatch(Event::SetSeverityFilter(Selection::Only(Severity::Critical)))
        );
        assert_eq!(
            parse("status all").unwrap(),
            Command::Dispatch(Event::SetStatusFilter(Selection::All))
        );
        assert_eq!(
            parse("location l2").unwrap(),
            Command::Dispatch(Event::SetLocationFilter(Selection::Only("l2".into())))
        );
    }

    #[test]
    fn search_text_is_taken_verbatim() {
        assert_eq!(
            parse("search fire suppression").unwrap(),
            Command::Dispatch(Event::SetSearch("fire suppression".into()))
        );
        assert_eq!(
            parse("search  leak \r\n").unwrap(),
            Command::Dispatch(Event::SetSearch(" leak ".into()))
        );
        assert_eq!(parse("search   ").unwrap(), Command::Dispatch(Event::SetSearch("  ".into())));
        assert_eq!(parse("search").unwrap(), Command::Dispatch(Event::SetSearch(String::new())));
    }

    #[test]
    fn other_arguments_are_trimmed() {
        assert_eq!(
            parse("  tab   risks  ").unwrap(),
            Command::Dispatch(Event::SelectTab(Tab::Risks))
        );
        assert_eq!(parse("open r4 ").unwrap(), Command::Dispatch(Event::SelectRisk("r4".into())));
    }

    #[test]
    fn rejects_bad_input_without_event() {
        assert!(parse("severity extreme").is_err());
        assert!(parse("tab charts").is_err());
        assert!(parse("open").is_err());
        assert!(parse("frobnicate").is_err());
    }

    #[test]
    fn control_commands() {
        assert_eq!(parse("").unwrap(), Command::Noop);
        assert_eq!(parse("help").unwrap(), Command::Help);
        assert_eq!(parse("quit").unwrap(), Command::Quit);
        assert_eq!(parse("site l1").unwrap(), Command::Dispatch(Event::SelectLocation("l1".into())));
    }
}
