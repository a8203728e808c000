//! Output formatting utilities for the CLI
//!
//! Two renderings are available for every list: bordered tables for people
//! and `---`-separated YAML spec documents for re-import.

use anyhow::Result;
use fleet_core::{HostResponse, LabelSpec, PackSpec, QuerySpec, SpecDocument};
use std::io::Write;
use tabled::{settings::Style, Table, Tabled};

/// Line written before every document of a multi-document stream
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Output mode of a list command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Fixed-column table
    Table,
    /// Versioned YAML spec documents
    Document,
}

impl OutputMode {
    /// `--yaml` selects documents, otherwise a table
    pub fn from_yaml_flag(yaml: bool) -> Self {
        if yaml {
            OutputMode::Document
        } else {
            OutputMode::Table
        }
    }
}

/// Writes spec documents to an output stream.
pub struct DocumentWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> DocumentWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Write one document, preceded by [`DOCUMENT_SEPARATOR`] when `separated`.
    ///
    /// The document is serialized before anything is written, so a
    /// serialization failure leaves the stream untouched.
    pub fn write(&mut self, doc: &SpecDocument, separated: bool) -> Result<()> {
        let body = doc.to_yaml()?;
        if separated {
            self.out.write_all(DOCUMENT_SEPARATOR.as_bytes())?;
        }
        self.out.write_all(body.as_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Documents written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Message printed instead of an empty table
pub fn empty_message(plural: &str) -> String {
    format!("no {} found", plural)
}

#[derive(Tabled)]
struct QueryRow<'a> {
    #[tabled(rename = "name")]
    name: &'a str,
    #[tabled(rename = "description")]
    description: &'a str,
    #[tabled(rename = "query")]
    query: &'a str,
}

#[derive(Tabled)]
struct PackRow<'a> {
    #[tabled(rename = "name")]
    name: &'a str,
    #[tabled(rename = "platform")]
    platform: &'a str,
    #[tabled(rename = "description")]
    description: &'a str,
}

#[derive(Tabled)]
struct LabelRow<'a> {
    #[tabled(rename = "name")]
    name: &'a str,
    #[tabled(rename = "platform")]
    platform: &'a str,
    #[tabled(rename = "description")]
    description: &'a str,
    #[tabled(rename = "query")]
    query: &'a str,
}

#[derive(Tabled)]
struct HostRow<'a> {
    #[tabled(rename = "uuid")]
    uuid: &'a str,
    #[tabled(rename = "hostname")]
    hostname: &'a str,
    #[tabled(rename = "platform")]
    platform: &'a str,
    #[tabled(rename = "status")]
    status: &'a str,
}

fn render<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::modern()).to_string()
}

/// Format queries as a table
pub fn format_queries(queries: &[QuerySpec]) -> String {
    render(
        queries
            .iter()
            .map(|q| QueryRow {
                name: &q.name,
                description: &q.description,
                query: &q.query,
            })
            .collect(),
    )
}

/// Format packs as a table
pub fn format_packs(packs: &[PackSpec]) -> String {
    render(
        packs
            .iter()
            .map(|p| PackRow {
                name: &p.name,
                platform: &p.platform,
                description: &p.description,
            })
            .collect(),
    )
}

/// Format labels as a table
pub fn format_labels(labels: &[LabelSpec]) -> String {
    render(
        labels
            .iter()
            .map(|l| LabelRow {
                name: &l.name,
                platform: &l.platform,
                description: &l.description,
                query: &l.query,
            })
            .collect(),
    )
}

/// Format hosts as a table
pub fn format_hosts(hosts: &[HostResponse]) -> String {
    render(
        hosts
            .iter()
            .map(|h| HostRow {
                uuid: &h.host.uuid,
                hostname: &h.display_text,
                platform: &h.host.platform,
                status: &h.status,
            })
            .collect(),
    )
}
