use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use catalog_core::{Msg, SelectedFile, ACCEPTED_SPREADSHEET_TYPES};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub const HELP: &str = "\
Type text to edit the search box (an empty line clears the text).
  :enter            search now (Enter key)
  :search           search now (search icon)
  :clear            clear the search
  :compose          start an IME composition
  :commit TEXT      finish the composition with TEXT
  :page N | :next | :prev
  :file PATH        select a spreadsheet
  :unselect         clear the selected file
  :upload           upload the selected file
  :help | :quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    SelectFile(PathBuf),
    Help,
    Quit,
    Unknown(String),
}

/// Maps one line of terminal input to a command.
pub fn parse_line(line: &str) -> Command {
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Dispatch(Msg::SearchInputChanged(line.to_string()));
    };
    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest.trim(), ""),
    };

    match (name, argument) {
        ("enter", "") => Command::Dispatch(Msg::EnterPressed),
        ("search", "") => Command::Dispatch(Msg::SearchIconClicked),
        ("clear", "") => Command::Dispatch(Msg::ClearClicked),
        ("compose", "") => Command::Dispatch(Msg::CompositionStarted),
        ("commit", text) => Command::Dispatch(Msg::CompositionEnded(text.to_string())),
        ("next", "") => Command::Dispatch(Msg::NextPageClicked),
        ("prev", "") => Command::Dispatch(Msg::PreviousPageClicked),
        ("page", number) => match number.parse::<u32>() {
            Ok(page) => Command::Dispatch(Msg::PageSelected(page)),
            Err(_) => Command::Unknown(line.to_string()),
        },
        ("file", path) if !path.is_empty() => Command::SelectFile(PathBuf::from(path)),
        ("unselect", "") => Command::Dispatch(Msg::FileSelected(None)),
        ("upload", "") => Command::Dispatch(Msg::UploadClicked),
        ("help", "") => Command::Help,
        ("quit", "") | ("q", "") => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Reads a picked file and reports its MIME type from the extension, the
/// way a browser file picker does.
pub fn load_selected_file(path: &Path) -> io::Result<SelectedFile> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile {
        name,
        content_type: content_type_for(path).to_string(),
        bytes,
    })
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xls") => ACCEPTED_SPREADSHEET_TYPES[0],
        Some("xlsx") => ACCEPTED_SPREADSHEET_TYPES[1],
        _ => FALLBACK_CONTENT_TYPE,
    }
}
