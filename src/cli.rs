use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::MAX_PAGE_SIZE;
use crate::documents::{CleaningType, Room};
use crate::output::OUTPUT_FORMATS;

#[derive(Parser, Debug)]
#[command(
    name = "tidyhaus",
    version,
    about = "Serve and explore TidyHaus FAQ and checklist content"
)]
pub struct Cli {
    /// JSON config file; every field is optional.
    #[arg(long, global = true, env = "TIDYHAUS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "TIDYHAUS_CONTENT_DIR")]
    pub content_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP content and question bank API.
    Serve(ServeArgs),
    /// Seed or clean up the local question bank.
    Init {
        #[arg(long, default_value = "text")]
        output: String,
    },
    /// Page through the FAQ the way the site does.
    Faq(FaqArgs),
    /// Show checklist tasks for a room and cleaning type.
    Checklist(ChecklistArgs),
    /// Inspect or replace static page documents.
    #[command(subcommand)]
    Content(ContentCommand),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "TIDYHAUS_BIND")]
    pub bind: Option<SocketAddr>,
}

#[derive(Args, Debug)]
pub struct FaqArgs {
    /// Base URL of a running `tidyhaus serve`; reads the content dir when unset.
    #[arg(long, env = "TIDYHAUS_SERVER")]
    pub server: Option<String>,

    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Number of Load More clicks to perform.
    #[arg(long, default_value_t = 0)]
    pub load_more: u32,

    /// Step back one Load More increment after loading.
    #[arg(long)]
    pub hide: bool,

    #[arg(long)]
    pub page_size: Option<u32>,

    #[arg(long, default_value = "text")]
    pub output: String,
}

#[derive(Args, Debug)]
pub struct ChecklistArgs {
    #[arg(long, env = "TIDYHAUS_SERVER")]
    pub server: Option<String>,

    #[arg(long, default_value = "living")]
    pub room: Room,

    #[arg(long = "type", default_value = "routine")]
    pub cleaning_type: CleaningType,

    /// Open the detail modal for this room.
    #[arg(long)]
    pub open: Option<Room>,

    /// Cleaning type selected inside the modal.
    #[arg(long, requires = "open")]
    pub modal_type: Option<CleaningType>,

    #[arg(long, default_value = "text")]
    pub output: String,
}

#[derive(Subcommand, Debug)]
pub enum ContentCommand {
    List,
    Get { page: String },
    /// Replace a document with the JSON object in `file`.
    Put { page: String, file: PathBuf },
}

fn check_output(output: &str) -> Result<(), String> {
    if OUTPUT_FORMATS.contains(&output) {
        Ok(())
    } else {
        Err(format!("output must be one of {}", OUTPUT_FORMATS.join(", ")))
    }
}

fn check_server(server: Option<&str>) -> Result<(), String> {
    match server {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            Err(format!("server must be an http(s) URL, got {url}"))
        }
        _ => Ok(()),
    }
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Serve(_) | Command::Content(_) => Ok(()),
            Command::Init { output } => check_output(output),
            Command::Faq(args) => {
                check_output(&args.output)?;
                check_server(args.server.as_deref())?;
                if let Some(size) = args.page_size {
                    if size == 0 || size > MAX_PAGE_SIZE {
                        return Err(format!("page-size must be within 1..={MAX_PAGE_SIZE}"));
                    }
                }
                Ok(())
            }
            Command::Checklist(args) => {
                check_output(&args.output)?;
                check_server(args.server.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_faq_defaults() {
        let cli = Cli::try_parse_from(["tidyhaus", "faq"]).expect("parse");
        let Command::Faq(args) = &cli.command else {
            panic!("expected faq");
        };
        assert_eq!(args.output, "text");
        assert_eq!(args.load_more, 0);
        assert!(!args.hide);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn parses_checklist_selection() {
        let args = [
            "tidyhaus",
            "--content-dir",
            "site",
            "checklist",
            "--room",
            "kitchen",
            "--type",
            "deep",
            "--open",
            "kitchen",
            "--output",
            "json",
        ];
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(cli.content_dir, Some(PathBuf::from("site")));
        let Command::Checklist(args) = cli.command else {
            panic!("expected checklist");
        };
        assert_eq!(args.room, Room::Kitchen);
        assert_eq!(args.cleaning_type, CleaningType::Deep);
        assert_eq!(args.open, Some(Room::Kitchen));
        assert_eq!(args.modal_type, None);
    }

    #[test]
    fn rejects_unknown_room_and_bad_output() {
        assert!(Cli::try_parse_from(["tidyhaus", "checklist", "--room", "garage"]).is_err());
        assert!(
            Cli::try_parse_from(["tidyhaus", "checklist", "--modal-type", "deep"]).is_err()
        );

        let cli = Cli::try_parse_from(["tidyhaus", "faq", "--output", "yaml"]).expect("parse");
        assert!(cli.validate().is_err());

        let cli = Cli::try_parse_from(["tidyhaus", "faq", "--server", "localhost:3000"])
            .expect("parse");
        assert!(cli.validate().is_err());
    }
}
