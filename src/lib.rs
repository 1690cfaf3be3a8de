pub mod api;
pub mod cli;
pub mod config;
pub mod disclosure;
pub mod documents;
pub mod error;
pub mod explorer;
pub mod format;
pub mod model;
pub mod output;
pub mod question_bank;
pub mod runner;
pub mod scroll_lock;
pub mod seed;
pub mod server;
pub mod store;

pub use api::{ContentSource, HttpClient, LocalQuestionBank, QuestionBankApi};
pub use config::AppConfig;
pub use disclosure::{DisclosureState, FaqDisclosure};
pub use error::{CmsError, Result};
pub use explorer::{ChecklistExplorer, ChecklistSession};
pub use question_bank::QuestionBank;
pub use scroll_lock::{ScrollLock, ScrollSurface, VirtualDocument};
