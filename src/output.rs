use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use crate::disclosure::DisclosureState;
use crate::documents::{CleaningType, FaqPageDocument, Room};
use crate::error::{CmsError, Result};
use crate::explorer::{ChecklistExplorer, ModalState};
use crate::format::format_text_for_preview;
use crate::model::{FaqQuestion, InitializeOutcome};

pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];

fn check_format(format: &str) -> Result<()> {
    if OUTPUT_FORMATS.contains(&format) {
        Ok(())
    } else {
        Err(CmsError::InvalidArg(format!("Unknown output format: {format}")))
    }
}

pub fn print_faq(format: &str, page: &FaqPageDocument, state: &DisclosureState) -> Result<()> {
    check_format(format)?;
    let mut out = io::stdout().lock();
    match format {
        "json" => write_json(&mut out, &FaqView::new(page, state)),
        _ => write_faq_text(&mut out, page, state),
    }
}

pub fn print_checklist(format: &str, explorer: &ChecklistExplorer) -> Result<()> {
    check_format(format)?;
    let mut out = io::stdout().lock();
    match format {
        "json" => write_json(&mut out, &ChecklistView::new(explorer)),
        _ => write_checklist_text(&mut out, explorer),
    }
}

pub fn print_initialize(format: &str, outcome: &InitializeOutcome) -> Result<()> {
    check_format(format)?;
    let mut out = io::stdout().lock();
    match format {
        "json" => write_json(&mut out, outcome),
        _ => {
            writeln!(out, "{}", outcome.message())?;
            Ok(())
        }
    }
}

pub fn print_document(document: &Value) -> Result<()> {
    write_json(&mut io::stdout().lock(), document)
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FaqView<'a> {
    heading: String,
    search: &'a str,
    category: &'a str,
    current_page: u32,
    total_questions: usize,
    has_more: bool,
    show_load_more: bool,
    show_hide: bool,
    load_more_clicks: u32,
    categories: &'a [String],
    questions: &'a [FaqQuestion],
}

impl<'a> FaqView<'a> {
    fn new(page: &FaqPageDocument, state: &'a DisclosureState) -> Self {
        Self {
            heading: format_text_for_preview(&page.hero.heading),
            search: state.search_query(),
            category: state.selected_category().as_str(),
            current_page: state.current_page(),
            total_questions: state.total_questions(),
            has_more: state.has_more(),
            show_load_more: state.show_load_more(),
            show_hide: state.show_hide(),
            load_more_clicks: state.load_more_clicks(),
            categories: state.categories(),
            questions: state.questions(),
        }
    }
}

fn write_faq_text<W: Write>(out: &mut W, page: &FaqPageDocument, state: &DisclosureState) -> Result<()> {
    writeln!(out, "{}", format_text_for_preview(&page.hero.heading))?;
    writeln!(
        out,
        "Category: {}   Search: {:?}",
        state.selected_category(),
        state.search_query()
    )?;
    if !state.categories().is_empty() {
        writeln!(out, "Categories: all, {}", state.categories().join(", "))?;
    }
    writeln!(out)?;

    if state.questions().is_empty() {
        writeln!(out, "No questions found.")?;
    }
    for (idx, question) in state.questions().iter().enumerate() {
        write!(out, "{:>3}. {}", idx + 1, format_text_for_preview(&question.question))?;
        let tags = question.display_tags();
        if !tags.is_empty() {
            write!(out, " [{}]", tags.join(", "))?;
        }
        writeln!(out)?;
        writeln!(out, "     {}", format_text_for_preview(&question.answer))?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Showing {} of {} (page {})",
        state.questions().len(),
        state.total_questions(),
        state.current_page()
    )?;
    let mut actions = Vec::new();
    if state.show_load_more() {
        actions.push("load more");
    }
    if state.show_hide() {
        actions.push("hide");
    }
    if !actions.is_empty() {
        writeln!(out, "Available: {}", actions.join(", "))?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChecklistView<'a> {
    heading: String,
    description: String,
    room: Room,
    cleaning_type: CleaningType,
    tasks: &'a [String],
    modal: &'a ModalState,
}

impl<'a> ChecklistView<'a> {
    fn new(explorer: &'a ChecklistExplorer) -> Self {
        let document = explorer.document();
        Self {
            heading: format_text_for_preview(&document.heading),
            description: format_text_for_preview(&document.description),
            room: explorer.active_room(),
            cleaning_type: explorer.cleaning_type(),
            tasks: explorer.inline_tasks(),
            modal: explorer.modal(),
        }
    }
}

fn write_tasks<W: Write>(out: &mut W, tasks: &[String]) -> Result<()> {
    if tasks.is_empty() {
        writeln!(out, "  (no tasks listed)")?;
    }
    for task in tasks {
        writeln!(out, "  - {}", format_text_for_preview(task))?;
    }
    Ok(())
}

fn write_checklist_text<W: Write>(out: &mut W, explorer: &ChecklistExplorer) -> Result<()> {
    let document = explorer.document();
    writeln!(out, "{}", format_text_for_preview(&document.heading))?;
    writeln!(out)?;
    writeln!(
        out,
        "{} / {}",
        explorer.active_room().title(),
        explorer.cleaning_type().label()
    )?;
    write_tasks(out, explorer.inline_tasks())?;

    let modal = explorer.modal();
    if let (true, Some(data)) = (modal.open, modal.data.as_ref()) {
        writeln!(out)?;
        writeln!(out, "== {} ({}) ==", data.title, data.image)?;
        for cleaning_type in CleaningType::ALL {
            let marker = if cleaning_type == modal.cleaning_type { "*" } else { " " };
            writeln!(out, "{marker} {}", cleaning_type.label())?;
            write_tasks(out, data.tasks(cleaning_type))?;
        }
    }
    Ok(())
}
