use clap::{Parser, Subcommand};
use qrpro_types::{AppEvent, Page};

use crate::cli::{GenerateCommand, HistoryCommand, ScanCommand, ThemeCommand};

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug)]
enum ReplCommand {
    #[command(subcommand, alias = "gen")]
    Generate(GenerateCommand),
    #[command(subcommand)]
    Scan(ScanCommand),
    /// Stop the camera
    Stop,
    #[command(subcommand)]
    History(HistoryCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// Switch page
    Go { page: Page },
    /// Copy the last scan result
    Copy,
    /// Open the last scan result
    Open,
    /// Save the last generated code as PNG
    Download,
    Share,
    #[command(alias = "exit")]
    Quit,
}

/// What a line typed at the prompt asks for
#[derive(Debug)]
pub enum ReplAction {
    Send(Vec<AppEvent>),
    /// Usage or parse error to print
    Print(String),
    Quit,
}

pub fn parse_line(line: &str) -> ReplAction {
    let args = match split_args(line) {
        Ok(args) => args,
        Err(e) => return ReplAction::Print(e),
    };
    if args.is_empty() {
        return ReplAction::Send(Vec::new());
    }

    let parsed = match ReplLine::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) => return ReplAction::Print(e.render().to_string()),
    };

    let events = match parsed.command {
        ReplCommand::Generate(preset) => vec![
            AppEvent::Navigate(Page::Generator),
            AppEvent::Generate(preset.form()),
        ],
        ReplCommand::Scan(scan) => scan.events(),
        ReplCommand::Stop => vec![AppEvent::StopCamera],
        ReplCommand::History(history) => history.events(),
        ReplCommand::Theme(theme) => theme.events(),
        ReplCommand::Go { page } => vec![AppEvent::Navigate(page)],
        ReplCommand::Copy => vec![AppEvent::CopyResult],
        ReplCommand::Open => vec![AppEvent::OpenResult],
        ReplCommand::Download => vec![AppEvent::Download],
        ReplCommand::Share => vec![AppEvent::Share],
        ReplCommand::Quit => return ReplAction::Quit,
    };
    ReplAction::Send(events)
}

/// Whitespace split honouring single and double quotes
fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unclosed quote".to_string());
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use qrpro_types::{PresetForm, Theme};

    use super::*;

    #[test]
    fn quotes_group_words() {
        assert_eq!(
            split_args(r#"generate text "hello world" 'a b'"#).unwrap(),
            vec!["generate", "text", "hello world", "a b"]
        );
        assert_eq!(split_args(r#"generate text """#).unwrap(), vec!["generate", "text", ""]);
        assert!(split_args(r#"generate text "oops"#).is_err());
    }

    #[test]
    fn generate_switches_to_generator() {
        match parse_line(r#"gen text "hello world""#) {
            ReplAction::Send(events) => assert!(matches!(
                &events[..],
                [
                    AppEvent::Navigate(Page::Generator),
                    AppEvent::Generate(PresetForm::Text { text })
                ] if text == "hello world"
            )),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn page_and_theme_commands() {
        assert!(matches!(
            parse_line("go history"),
            ReplAction::Send(ref events) if matches!(&events[..], [AppEvent::Navigate(Page::History)])
        ));
        assert!(matches!(
            parse_line("theme set dark"),
            ReplAction::Send(ref events) if matches!(&events[..], [AppEvent::SetTheme(Theme::Dark)])
        ));
    }

    #[test]
    fn blank_line_sends_nothing() {
        assert!(matches!(parse_line("   "), ReplAction::Send(ref e) if e.is_empty()));
    }

    #[test]
    fn quit_and_errors() {
        assert!(matches!(parse_line("exit"), ReplAction::Quit));
        assert!(matches!(parse_line("frobnicate"), ReplAction::Print(_)));
    }
}
