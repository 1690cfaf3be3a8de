use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;
use crate::model::FaqQuestion;
use crate::store::{ContentStore, validate_page_id};

const QUESTIONS_FILE: &str = "questions.jsonl";

/// One `<page>.json` per document and a JSONL file for questions.
#[derive(Debug, Clone)]
pub struct FileContentStore {
    root: PathBuf,
}

impl FileContentStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, page: &str) -> Result<PathBuf> {
        validate_page_id(page)?;
        Ok(self.root.join(format!("{page}.json")))
    }
}

impl ContentStore for FileContentStore {
    fn load_document(&self, page: &str) -> Result<Option<Value>> {
        let path = self.document_path(page)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    fn save_document(&self, page: &str, document: &Value) -> Result<()> {
        let path = self.document_path(page)?;
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;
        debug!(page, path = %path.display(), "saved content document");
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<String>> {
        let mut pages = Vec::new();
        for entry in WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_page_id(stem).is_ok() {
                    pages.push(stem.to_string());
                }
            }
        }
        pages.sort();
        Ok(pages)
    }

    fn load_questions(&self) -> Result<Vec<FaqQuestion>> {
        let path = self.root.join(QUESTIONS_FILE);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut questions = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            questions.push(serde_json::from_str(&line)?);
        }
        Ok(questions)
    }

    fn save_questions(&self, questions: &[FaqQuestion]) -> Result<()> {
        let path = self.root.join(QUESTIONS_FILE);
        let tmp = path.with_extension("jsonl.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            for question in questions {
                serde_json::to_writer(&mut writer, question)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
