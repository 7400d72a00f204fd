// cli/src/console.rs
//
// Host that prints every UI call as one line of text.

use std::io::Write;

use imbridge_core::{Host, LookupTable, PreeditText, Property, PropertyKind, SpanClass};

pub struct ConsoleHost<W: Write> {
    out: W,
}

impl<W: Write> ConsoleHost<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn emit(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            tracing::warn!(%err, "console write failed");
        }
    }
}

/// `ni|hao [0..2 illegal #e76f00]`, with `|` at the caret.
pub fn format_preedit(preedit: &PreeditText) -> String {
    let mut text = String::new();
    for (i, ch) in preedit.text.chars().enumerate() {
        if i == preedit.caret {
            text.push('|');
        }
        text.push(ch);
    }
    if preedit.caret >= preedit.text.chars().count() {
        text.push('|');
    }
    let styled: Vec<String> = preedit
        .styled_spans()
        .map(|(span, color)| {
            let class = match span.class {
                SpanClass::Illegal => "illegal",
                SpanClass::UserChoice => "choice",
                SpanClass::Normal => "normal",
            };
            format!("{}..{} {} #{:06x}", span.range.start, span.range.end, class, color)
        })
        .collect();
    if styled.is_empty() {
        text
    } else {
        format!("{} [{}]", text, styled.join(", "))
    }
}

/// `1.你 [2.呢] 3.泥`, the highlighted entry in brackets.
pub fn format_lookup(table: &LookupTable<'_>) -> String {
    table
        .candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == table.cursor {
                format!("[{}.{}]", i + 1, c)
            } else {
                format!("{}.{}", i + 1, c)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_property(property: &Property) -> String {
    match property.kind {
        PropertyKind::Toggle { state } => {
            format!("{}={} ({})", property.key, property.label, if state { "on" } else { "off" })
        }
        PropertyKind::Normal => format!("{}={}", property.key, property.label),
    }
}

impl<W: Write> Host for ConsoleHost<W> {
    fn commit_text(&mut self, text: &str) {
        self.emit(&format!("commit: {text}"));
    }

    fn update_preedit_text(&mut self, preedit: &PreeditText) {
        self.emit(&format!("preedit: {}", format_preedit(preedit)));
    }

    fn hide_preedit_text(&mut self) {
        self.emit("preedit: (hidden)");
    }

    fn update_lookup_table(&mut self, table: &LookupTable<'_>, visible: bool) {
        if visible {
            self.emit(&format!("lookup: {}", format_lookup(table)));
        }
    }

    fn hide_lookup_table(&mut self) {
        self.emit("lookup: (hidden)");
    }

    fn register_properties(&mut self, properties: &[Property]) {
        let line = properties
            .iter()
            .map(format_property)
            .collect::<Vec<_>>()
            .join(" ");
        self.emit(&format!("properties: {line}"));
    }

    fn update_property(&mut self, property: &Property) {
        self.emit(&format!("property: {}", format_property(property)));
    }

    fn launch_setup(&mut self) {
        self.emit("setup: launched");
    }
}
