use flashdeck_core::Msg;

/// One parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msgs(Vec<Msg>),
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  file <path>        select a document
  upload [path]      upload the selected (or given) document
  cancel             abandon the current upload
  topic <text>       set the flashcard topic
  count <n>          set how many cards to request
  generate [topic]   generate a deck
  next | n           next card
  prev | p           previous card
  flip | f           show or hide the answer
  help | ?           show this text
  quit | q           exit";

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Msgs(Vec::new()),
        "file" => Command::Msgs(vec![Msg::FileSelected(rest.to_string())]),
        "upload" if rest.is_empty() => Command::Msgs(vec![Msg::UploadClicked]),
        "upload" => Command::Msgs(vec![
            Msg::FileSelected(rest.to_string()),
            Msg::UploadClicked,
        ]),
        "cancel" => Command::Msgs(vec![Msg::CancelUploadClicked]),
        "topic" => Command::Msgs(vec![Msg::TopicChanged(rest.to_string())]),
        "count" => Command::Msgs(vec![Msg::CountChanged(rest.to_string())]),
        "generate" | "gen" if rest.is_empty() => Command::Msgs(vec![Msg::GenerateClicked]),
        "generate" | "gen" => Command::Msgs(vec![
            Msg::TopicChanged(rest.to_string()),
            Msg::GenerateClicked,
        ]),
        "next" | "n" => Command::Msgs(vec![Msg::NextCard]),
        "prev" | "previous" | "p" => Command::Msgs(vec![Msg::PreviousCard]),
        "flip" | "f" | "reveal" => Command::Msgs(vec![Msg::ToggleReveal]),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}
