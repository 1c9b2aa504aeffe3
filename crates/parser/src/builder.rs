//! State machine that assembles ordered campaign records from the token
//! stream of one generation response.

use adforge_core::types::{CampaignRecord, SectionValue};
use indexmap::IndexMap;
use tracing::debug;

use crate::tokenizer::{classify, LineKind};

/// Hard ceiling on records returned from one parse. Matches the largest
/// batch the campaign prompt ever asks a model for.
pub const MAX_CAMPAIGNS: usize = 10;

/// Parse one generation response into an ordered sequence of campaign
/// records.
///
/// `max_count` is clamped to `1..=MAX_CAMPAIGNS`; records past the cap are
/// discarded. Input that never mentions a campaign marker yields an empty
/// sequence — a recoverable condition for the caller, never an error.
pub fn parse_campaigns(raw_text: &str, max_count: usize) -> Vec<CampaignRecord> {
    let cap = max_count.clamp(1, MAX_CAMPAIGNS);
    let mut parser = Parser::new(cap);
    for line in raw_text.lines() {
        parser.consume(line.trim());
    }
    parser.finish()
}

/// Transient per-parse state: the record under construction, the open
/// section key, and the open subsection accumulator. At most one record is
/// open at a time, and a subsection only ever attaches to its owning
/// section key.
struct Parser {
    cap: usize,
    sealed: Vec<CampaignRecord>,
    current: Option<CampaignRecord>,
    section: Option<String>,
    subsection: Option<IndexMap<String, String>>,
}

impl Parser {
    fn new(cap: usize) -> Self {
        Self {
            cap,
            sealed: Vec::new(),
            current: None,
            section: None,
            subsection: None,
        }
    }

    fn consume(&mut self, line: &str) {
        match classify(line) {
            LineKind::Blank => {}
            LineKind::CampaignStart => self.start_campaign(line),
            LineKind::SectionHeader => self.start_section(line),
            LineKind::SubsectionLine => self.subsection_line(line),
            LineKind::KeyValue => self.key_value_line(line),
        }
    }

    /// Seal any open record, then open a new one named after the text past
    /// the first colon (or the whole line when no colon is present).
    fn start_campaign(&mut self, line: &str) {
        self.seal_current();
        let name = match line.split_once(':') {
            Some((_, rest)) => rest.trim(),
            None => line,
        };
        self.current = Some(CampaignRecord::with_name(name));
    }

    fn start_section(&mut self, line: &str) {
        if self.current.is_none() {
            // Header before any campaign marker: nothing to attach it to.
            return;
        }
        self.flush_subsection();

        let (head, inline_value) = match line.split_once(':') {
            Some((head, rest)) => (head, Some(rest.trim())),
            None => (line, None),
        };
        let key = derive_key(head.split_once('.').map(|(_, k)| k).unwrap_or(head));
        self.section = Some(key.clone());

        match inline_value {
            // Inline scalar: the header carries the section's whole value
            // and no subsection follows.
            Some(value) if !value.is_empty() => {
                if let Some(record) = self.current.as_mut() {
                    record.set_text(key, value);
                }
                self.subsection = None;
            }
            // Bare header (or empty remainder): open a fresh accumulator.
            _ => self.subsection = Some(IndexMap::new()),
        }
    }

    /// Only meaningful while a subsection accumulator is open; later
    /// duplicate sub-keys overwrite earlier ones.
    fn subsection_line(&mut self, line: &str) {
        let Some(subsection) = self.subsection.as_mut() else {
            return;
        };
        let text = line.trim_start_matches(['-', ' ']);
        let (key_part, value) = match text.split_once(':') {
            Some((key, rest)) => (key, rest.trim()),
            None => (text, text),
        };
        subsection.insert(derive_key(key_part), value.to_string());
    }

    /// Direct top-level scalar assignment on the open record. Fallback
    /// lines without a colon separator carry nothing to assign.
    fn key_value_line(&mut self, line: &str) {
        let Some(record) = self.current.as_mut() else {
            return;
        };
        let Some((key_part, value)) = line.split_once(':') else {
            return;
        };
        record.set_text(derive_key(key_part), value.trim());
    }

    /// Attach the open subsection to its owning section key. An empty
    /// accumulator is discarded, leaving the section absent.
    fn flush_subsection(&mut self) {
        let Some(subsection) = self.subsection.take() else {
            return;
        };
        if subsection.is_empty() {
            return;
        }
        if let (Some(section), Some(record)) = (self.section.as_ref(), self.current.as_mut()) {
            record.set(section.clone(), SectionValue::Subsection(subsection));
        }
    }

    fn seal_current(&mut self) {
        self.flush_subsection();
        self.section = None;
        if let Some(record) = self.current.take() {
            if self.sealed.len() < self.cap {
                self.sealed.push(record);
            } else {
                debug!(cap = self.cap, "campaign cap reached, discarding record");
            }
        }
    }

    fn finish(mut self) -> Vec<CampaignRecord> {
        self.seal_current();
        self.sealed
    }
}

/// Section and sub-key derivation: lower-case, spaces joined with
/// underscores.
fn derive_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}
