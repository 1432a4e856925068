use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qrpro_types::{AppEvent, HistoryCategory, Page, PresetForm, Theme, WifiSecurity};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "qrpro", version, about = "Generate and scan QR codes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Profile to load from the user config directory
    #[arg(long, global = true, default_value = "main")]
    pub profile: String,

    /// Log as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a code from a preset
    Generate {
        #[command(subcommand)]
        preset: GenerateCommand,

        /// Save the code as PNG in the export directory
        #[arg(long)]
        download: bool,

        /// Hand the code to the platform share sheet
        #[arg(long)]
        share: bool,
    },
    /// Decode a code
    #[command(subcommand)]
    Scan(ScanCommand),
    /// Inspect and edit history
    #[command(subcommand)]
    History(HistoryCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// Open a link in the browser
    Open { url: String },
    /// Save a generated history entry as PNG
    Download {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    /// Share a generated history entry
    Share {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Interactive session
    Repl,
}

#[derive(Subcommand, Debug)]
pub enum GenerateCommand {
    Text {
        text: String,
    },
    Wifi {
        ssid: String,
        #[arg(long, default_value = "")]
        password: String,
        /// WPA, WEP or nopass
        #[arg(long, default_value = "WPA")]
        security: WifiSecurity,
    },
    Vcard {
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        org: String,
    },
    Email {
        to: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        body: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScanCommand {
    /// Decode an image file
    File { path: PathBuf },
    /// Poll the camera until a code is found
    Camera {
        /// Directory of frames to replay instead of the configured source
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Decode the image on the clipboard
    Clipboard,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    List,
    Delete {
        category: HistoryCategory,
        #[arg(required_unless_present = "id")]
        index: Option<usize>,
        #[arg(long, conflicts_with = "index")]
        id: Option<Uuid>,
    },
    Clear {
        category: HistoryCategory,
    },
    /// Copy a record's data to the clipboard
    Copy {
        category: HistoryCategory,
        index: usize,
    },
    /// Generate again from a "generated" record
    Regenerate {
        #[arg(default_value_t = 0)]
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    Show,
    Toggle,
    Set { theme: Theme },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Create a profile cloned from main
    Add { name: String },
}

impl GenerateCommand {
    pub fn form(&self) -> PresetForm {
        match self {
            GenerateCommand::Text { text } => PresetForm::Text { text: text.clone() },
            GenerateCommand::Wifi {
                ssid,
                password,
                security,
            } => PresetForm::Wifi {
                ssid: ssid.clone(),
                password: password.clone(),
                security: *security,
            },
            GenerateCommand::Vcard {
                name,
                phone,
                email,
                org,
            } => PresetForm::Vcard {
                name: name.clone(),
                phone: phone.clone(),
                email: email.clone(),
                org: org.clone(),
            },
            GenerateCommand::Email { to, subject, body } => PresetForm::Email {
                to: to.clone(),
                subject: subject.clone(),
                body: body.clone(),
            },
        }
    }
}

impl ScanCommand {
    pub fn events(&self) -> Vec<AppEvent> {
        match self {
            ScanCommand::File { path } => vec![AppEvent::ScanFile(path.clone())],
            ScanCommand::Camera { .. } => {
                vec![AppEvent::Navigate(Page::Scanner), AppEvent::StartCamera]
            }
            ScanCommand::Clipboard => vec![AppEvent::ScanClipboard],
        }
    }
}

impl HistoryCommand {
    pub fn events(&self) -> Vec<AppEvent> {
        match self {
            HistoryCommand::List => vec![AppEvent::LoadHistory],
            HistoryCommand::Delete {
                category,
                id: Some(id),
                ..
            } => vec![AppEvent::DeleteHistoryById {
                category: *category,
                id: *id,
            }],
            HistoryCommand::Delete {
                category, index, ..
            } => vec![AppEvent::DeleteHistory {
                category: *category,
                index: index.unwrap_or_default(),
            }],
            HistoryCommand::Clear { category } => vec![AppEvent::ClearHistory(*category)],
            HistoryCommand::Copy { category, index } => vec![AppEvent::CopyHistory {
                category: *category,
                index: *index,
            }],
            HistoryCommand::Regenerate { index } => {
                vec![AppEvent::RegenerateFromHistory(*index)]
            }
        }
    }
}

impl ThemeCommand {
    pub fn events(&self) -> Vec<AppEvent> {
        match self {
            ThemeCommand::Show => vec![AppEvent::ReportTheme],
            ThemeCommand::Toggle => vec![AppEvent::ToggleTheme],
            ThemeCommand::Set { theme } => vec![AppEvent::SetTheme(*theme)],
        }
    }
}

impl Commands {
    /// Requests to run through the event loop, `None` for commands handled
    /// outside of it
    pub fn events(&self) -> Option<Vec<AppEvent>> {
        let events = match self {
            Commands::Generate {
                preset,
                download,
                share,
            } => {
                let mut events = vec![AppEvent::Generate(preset.form())];
                if *download {
                    events.push(AppEvent::Download);
                }
                if *share {
                    events.push(AppEvent::Share);
                }
                events
            }
            Commands::Scan(scan) => scan.events(),
            Commands::History(history) => history.events(),
            Commands::Theme(theme) => theme.events(),
            Commands::Download { index } => {
                vec![AppEvent::RecallFromHistory(*index), AppEvent::Download]
            }
            Commands::Share { index } => {
                vec![AppEvent::RecallFromHistory(*index), AppEvent::Share]
            }
            Commands::Open { .. } | Commands::Profile(_) | Commands::Repl => return None,
        };
        Some(events)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("qrpro").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn wifi_defaults_to_wpa_and_empty_password() {
        let cli = parse(&["generate", "wifi", "Home"]);
        let events = cli.command.unwrap().events().unwrap();
        assert!(matches!(
            &events[..],
            [AppEvent::Generate(PresetForm::Wifi { ssid, password, security: WifiSecurity::Wpa })]
                if ssid == "Home" && password.is_empty()
        ));
    }

    #[test]
    fn generate_flags_append_export_requests() {
        let cli = parse(&["generate", "--download", "--share", "text", "hello"]);
        let events = cli.command.unwrap().events().unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], AppEvent::Download));
        assert!(matches!(events[2], AppEvent::Share));
    }

    #[test]
    fn download_recalls_history_entry() {
        let cli = parse(&["download", "2"]);
        let events = cli.command.unwrap().events().unwrap();
        assert!(matches!(
            &events[..],
            [AppEvent::RecallFromHistory(2), AppEvent::Download]
        ));

        let cli = parse(&["share"]);
        let events = cli.command.unwrap().events().unwrap();
        assert!(matches!(
            &events[..],
            [AppEvent::RecallFromHistory(0), AppEvent::Share]
        ));
    }

    #[test]
    fn camera_scan_navigates_first() {
        let cli = parse(&["scan", "camera"]);
        let events = cli.command.unwrap().events().unwrap();
        assert!(matches!(
            &events[..],
            [AppEvent::Navigate(Page::Scanner), AppEvent::StartCamera]
        ));
    }

    #[test]
    fn delete_accepts_index_or_id() {
        let cli = parse(&["history", "delete", "scanned", "3"]);
        let events = cli.command.unwrap().events().unwrap();
        assert!(matches!(
            &events[..],
            [AppEvent::DeleteHistory {
                category: HistoryCategory::Scanned,
                index: 3
            }]
        ));

        let id = Uuid::new_v4();
        let cli = parse(&["history", "delete", "generated", "--id", &id.to_string()]);
        let events = cli.command.unwrap().events().unwrap();
        assert!(matches!(
            &events[..],
            [AppEvent::DeleteHistoryById { id: found, .. }] if *found == id
        ));

        assert!(Cli::try_parse_from(["qrpro", "history", "delete", "generated"]).is_err());
    }

    #[test]
    fn open_runs_outside_the_event_loop() {
        let cli = parse(&["open", "https://example.com"]);
        assert!(cli.command.unwrap().events().is_none());
    }

    #[test]
    fn profile_and_json_are_global() {
        let cli = parse(&["theme", "show", "--profile", "work", "--json"]);
        assert_eq!(cli.profile, "work");
        assert!(cli.json);
    }
}
