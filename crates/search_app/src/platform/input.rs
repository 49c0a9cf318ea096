use search_core::Msg;

use super::Inbox;

/// Maps one stdin line to driver input.
///
/// Plain lines are the whole search box text after a change event. Lines
/// starting with `:` are commands; unknown commands yield `None`.
pub fn parse_line(line: &str) -> Option<Inbox> {
    let Some(command) = line.strip_prefix(':') else {
        return Some(Inbox::Core(Msg::InputChanged(line.to_string())));
    };

    let mut parts = command.split_whitespace();
    let inbox = match (parts.next(), parts.next()) {
        (Some("quit" | "q"), None) => Inbox::Quit,
        (Some("reset"), None) => Inbox::Core(Msg::Reset),
        (Some("on"), Some(source)) => Inbox::Core(Msg::SourceToggled {
            source: source.to_string(),
            enabled: true,
        }),
        (Some("off"), Some(source)) => Inbox::Core(Msg::SourceToggled {
            source: source.to_string(),
            enabled: false,
        }),
        (Some("history"), Some("on")) => Inbox::Core(Msg::HistoryToggled(true)),
        (Some("history"), Some("off")) => Inbox::Core(Msg::HistoryToggled(false)),
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(inbox)
}
