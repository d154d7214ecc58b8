//! Text extraction from Office Open XML word-processing documents.
//!
//! A `.docx` file is a zip archive. The body lives in `word/document.xml`;
//! headers and footers are separate parts reached through
//! `word/_rels/document.xml.rels`.

use crate::error::{ExtractionError, ExtractionResult};
use crate::extractor::xml::XmlElement;
use crate::extractor::TextExtractor;
use log::{debug, trace};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
/// Upper bound on the buffer reserved up front for one archive entry.
const MAX_PREALLOCATION: usize = 8 * 1024 * 1024;

pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn extract_blocks(&self, data: &[u8]) -> ExtractionResult<Vec<String>> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let document =
            read_part(&mut archive, DOCUMENT_PART)?.ok_or(ExtractionError::MissingPart {
                part: DOCUMENT_PART.to_string(),
            })?;
        let document = XmlElement::parse(&document)?;
        let body = document
            .child("body")
            .ok_or_else(|| ExtractionError::Invalid {
                message: "document has no body".to_string(),
            })?;

        let relationships = match read_part(&mut archive, DOCUMENT_RELS_PART)? {
            Some(rels) => parse_relationships(&rels)?,
            None => HashMap::new(),
        };

        let mut blocks = Vec::new();

        for paragraph in body.children_named("p") {
            blocks.push(paragraph_text(paragraph));
        }
        let body_paragraphs = blocks.len();

        let sections = collect_sections(body);
        let mut header: Option<String> = None;
        let mut footer: Option<String> = None;
        for section in &sections {
            if let Some(id) = &section.header {
                header = Some(id.clone());
            }
            if let Some(id) = &section.footer {
                footer = Some(id.clone());
            }
            blocks.extend(story_paragraphs(&mut archive, &relationships, header.as_deref())?);
            blocks.extend(story_paragraphs(&mut archive, &relationships, footer.as_deref())?);
        }
        let story_paragraphs_count = blocks.len() - body_paragraphs;

        for table in body.children_named("tbl") {
            blocks.extend(table_cell_texts(table));
        }

        debug!(
            "docx: {} body paragraphs, {} sections ({} header/footer paragraphs), {} table cells",
            body_paragraphs,
            sections.len(),
            story_paragraphs_count,
            blocks.len() - body_paragraphs - story_paragraphs_count
        );

        Ok(blocks)
    }
}

/// Default header/footer relationship ids declared by one `w:sectPr`.
#[derive(Debug, Default, Clone, PartialEq)]
struct Section {
    header: Option<String>,
    footer: Option<String>,
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> ExtractionResult<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::with_capacity(capacity_hint(file.size()));
    file.read_to_end(&mut bytes)
        .map_err(|source| ExtractionError::Part {
            part: name.to_string(),
            source,
        })?;
    Ok(Some(bytes))
}

/// Initial buffer size for an entry whose header declares `declared` bytes,
/// capped at `MAX_PREALLOCATION`.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATION)
}

fn parse_relationships(xml: &[u8]) -> ExtractionResult<HashMap<String, String>> {
    let root = XmlElement::parse(xml)?;
    Ok(root
        .children_named("Relationship")
        .filter_map(|rel| Some((rel.attr("Id")?.to_string(), rel.attr("Target")?.to_string())))
        .collect())
}

/// Resolve a relationship target to a zip entry name. Targets are relative to `word/`.
fn part_name(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}

/// Sections in document order: every paragraph-level `w:sectPr`, then the body's own.
fn collect_sections(body: &XmlElement) -> Vec<Section> {
    let mut sections: Vec<Section> = body
        .children_named("p")
        .filter_map(|p| p.child("pPr").and_then(|ppr| ppr.child("sectPr")))
        .map(section_from)
        .collect();

    if let Some(sect_pr) = body.child("sectPr") {
        sections.push(section_from(sect_pr));
    }

    sections
}

fn section_from(sect_pr: &XmlElement) -> Section {
    let default_reference = |kind: &str| {
        sect_pr
            .children_named(kind)
            .find(|r| r.attr("type").unwrap_or("default") == "default")
            .and_then(|r| r.attr("id"))
            .map(str::to_string)
    };

    Section {
        header: default_reference("headerReference"),
        footer: default_reference("footerReference"),
    }
}

/// Paragraphs of a header or footer part. A section with no definition
/// anywhere in its inheritance chain yields a single empty paragraph.
fn story_paragraphs<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
    relationship_id: Option<&str>,
) -> ExtractionResult<Vec<String>> {
    let Some(id) = relationship_id else {
        return Ok(vec![String::new()]);
    };

    let Some(target) = relationships.get(id) else {
        trace!("docx: dangling relationship {}", id);
        return Ok(vec![String::new()]);
    };

    let name = part_name(target);
    let Some(xml) = read_part(archive, &name)? else {
        trace!("docx: missing story part {}", name);
        return Ok(vec![String::new()]);
    };

    let root = XmlElement::parse(&xml)?;
    Ok(root.children_named("p").map(paragraph_text).collect())
}

/// Text of a paragraph: its runs, including runs wrapped in hyperlinks.
pub(crate) fn paragraph_text(paragraph: &XmlElement) -> String {
    let mut text = String::new();
    for child in paragraph.elements() {
        if child.is("r") {
            push_run_text(child, &mut text);
        } else if child.is("hyperlink") {
            for run in child.children_named("r") {
                push_run_text(run, &mut text);
            }
        }
    }
    text
}

fn push_run_text(run: &XmlElement, out: &mut String) {
    for item in run.elements() {
        match item.local_name() {
            "t" => out.push_str(&item.text()),
            "tab" | "ptab" => out.push('\t'),
            "br" => {
                if matches!(item.attr("type"), None | Some("textWrapping")) {
                    out.push('\n');
                }
            }
            "cr" => out.push('\n'),
            "noBreakHyphen" => out.push('-'),
            _ => {}
        }
    }
}

/// Cell texts row-major. Horizontally merged cells repeat once per grid
/// column they span; vertical-merge continuations repeat the cell above,
/// matched by grid column. Columns skipped by `w:gridBefore` or
/// `w:gridAfter` produce nothing.
fn table_cell_texts(table: &XmlElement) -> Vec<String> {
    let mut texts = Vec::new();
    let mut previous_row: HashMap<usize, String> = HashMap::new();

    for row in table.children_named("tr") {
        let mut current_row: HashMap<usize, String> = HashMap::new();
        let mut column = grid_before(row);

        for cell in row.children_named("tc") {
            let properties = cell.child("tcPr");
            let span = properties
                .and_then(|p| p.child("gridSpan"))
                .and_then(|g| g.attr("val"))
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(1)
                .max(1);
            let continues_merge = properties
                .and_then(|p| p.child("vMerge"))
                .map(|v| v.attr("val").unwrap_or("continue") == "continue")
                .unwrap_or(false);

            let text = if continues_merge {
                previous_row
                    .get(&column)
                    .cloned()
                    .unwrap_or_else(|| cell_text(cell))
            } else {
                cell_text(cell)
            };

            for offset in column..column + span {
                texts.push(text.clone());
                current_row.insert(offset, text.clone());
            }
            column += span;
        }

        previous_row = current_row;
    }

    texts
}

/// Grid columns left empty before the first cell of a row.
fn grid_before(row: &XmlElement) -> usize {
    row.child("trPr")
        .and_then(|p| p.child("gridBefore"))
        .and_then(|g| g.attr("val"))
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0)
}

fn cell_text(cell: &XmlElement) -> String {
    cell.children_named("p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}
