//! Block constructors for the three logical pages of the audit report
//!
//! Each page template is a pure function of [`FieldState`]: the text of a
//! block is the literal interpolation of its template string with the
//! current field values. [`BlockCache`] memoizes a page keyed on exactly
//! the fields that page references.

use gpaudit_ast::{Align, Block, Cell, CellAlign, Document, Row, TextStyle};
use tracing::debug;

use crate::fields::{Field, FieldState};

/// Report title, also written to document metadata
pub const REPORT_TITLE: &str = "గ్రామ పంచాయతీ ఆడిట్ నివేదిక";

/// A fixed page template
#[derive(Clone, Copy)]
pub struct PageTemplate {
    /// 1-based page number
    pub number: usize,
    /// Fields interpolated into this page
    pub fields: &'static [Field],
    /// Block constructor
    pub build: fn(&FieldState) -> Vec<Block>,
}

/// The report's pages in order
pub const PAGES: [PageTemplate; 3] = [
    PageTemplate {
        number: 1,
        fields: &[
            Field::GpName,
            Field::Mandal,
            Field::District,
            Field::FinancialYear,
            Field::ReportDate,
            Field::AuditorName,
        ],
        build: page_one,
    },
    PageTemplate {
        number: 2,
        fields: &[
            Field::Sarpanch,
            Field::Secretary,
            Field::Income,
            Field::Expense,
            Field::FinalDate,
        ],
        build: page_two,
    },
    PageTemplate {
        number: 3,
        fields: &[
            Field::GpName,
            Field::FinancialYear,
            Field::AuditorName,
            Field::Sarpanch,
            Field::Secretary,
            Field::Income,
            Field::Expense,
            Field::FinalDate,
        ],
        build: page_three,
    },
];

/// Cover page: report identity and submission note
pub fn page_one(f: &FieldState) -> Vec<Block> {
    vec![
        Block::heading(REPORT_TITLE, TextStyle::aligned(Align::Center).bold()),
        Block::paragraph(
            "(మండల ఆడిట్ రిపోర్టర్‌కు సమర్పించుటకు)",
            TextStyle::aligned(Align::Center).italic(),
        ),
        Block::paragraph(
            format!(
                "గ్రామ పంచాయతీ పేరు : {}\nమండలం : {}\nజిల్లా : {}\nఆర్థిక సంవత్సరం : {}\nఆడిట్ నివేదిక తేదీ : {}",
                f.gp_name, f.mandal, f.district, f.financial_year, f.report_date
            ),
            TextStyle::aligned(Align::Center),
        ),
        Block::paragraph(
            "గ్రామ పంచాయతీ పరిధిలో నిర్వహించబడిన అభివృద్ధి కార్యక్రమాలు, నిధుల వినియోగం, ఆదాయ–వ్యయాల వివరాలు, రికార్డుల నిర్వహణ తదితర అంశాలపై ఈ ఆడిట్ నివేదికను మండల ఆడిట్ రిపోర్టర్ గారికి సమర్పిస్తున్నాము.",
            TextStyle::aligned(Align::Justify),
        ),
        Block::paragraph(
            format!("ఆడిట్ రిపోర్టర్ పేరు : {}", f.auditor_name),
            TextStyle::default().bold(),
        ),
    ]
}

/// Governing body and financial figures
pub fn page_two(f: &FieldState) -> Vec<Block> {
    vec![
        Block::heading(
            "గ్రామ పంచాయతీ పాలకవర్గ వివరాలు",
            TextStyle::default().bold(),
        ),
        Block::paragraph(
            format!(
                "సర్పంచ్ పేరు : {}\nపంచాయతీ కార్యదర్శి : {}",
                f.sarpanch, f.secretary
            ),
            TextStyle::default(),
        ),
        Block::heading("ఆర్థిక వివరాలు", TextStyle::default().bold()),
        Block::paragraph(
            format!(
                "మొత్తం ఆదాయం రూ. {}/-\nమొత్తం వ్యయం రూ. {}/-",
                f.income, f.expense
            ),
            TextStyle::default(),
        ),
        Block::paragraph(
            "ఈ ఆడిట్ నివేదికలో పొందుపరిచిన సమాచారం పంచాయతీ రికార్డుల ఆధారంగా సమర్పించబడినదిగా తెలియజేస్తున్నాము.",
            TextStyle::aligned(Align::Justify),
        ),
        Block::paragraph(format!("తేదీ : {}", f.final_date), TextStyle::default()),
    ]
}

/// Closing page: summary table and signatures
pub fn page_three(f: &FieldState) -> Vec<Block> {
    let amount = |text: &str| Cell::new(format!("రూ. {}/-", text)).aligned(CellAlign::Right);
    let centered_header = |text: &str| Cell::new(text).bold().aligned(CellAlign::Center);

    vec![
        Block::heading(
            "ఆదాయ–వ్యయ సారాంశం",
            TextStyle::aligned(Align::Center).bold(),
        ),
        Block::paragraph(
            format!("ఆర్థిక సంవత్సరం : {}", f.financial_year),
            TextStyle::aligned(Align::Center),
        ),
        Block::table(vec![
            Row::new(vec![
                centered_header("వివరాలు"),
                centered_header("మొత్తం"),
            ]),
            Row::new(vec![Cell::new("మొత్తం ఆదాయం"), amount(&f.income)]),
            Row::new(vec![Cell::new("మొత్తం వ్యయం"), amount(&f.expense)]),
        ]),
        Block::heading("సంతకాలు", TextStyle::default().bold()),
        Block::table(vec![
            Row::new(vec![
                centered_header("సర్పంచ్"),
                centered_header("పంచాయతీ కార్యదర్శి"),
                centered_header("ఆడిట్ రిపోర్టర్"),
            ]),
            Row::new(vec![
                Cell::new(f.sarpanch.as_str()).aligned(CellAlign::Center),
                Cell::new(f.secretary.as_str()).aligned(CellAlign::Center),
                Cell::new(f.auditor_name.as_str()).aligned(CellAlign::Center),
            ]),
        ]),
        Block::paragraph(format!("స్థలం : {}", f.gp_name), TextStyle::default()),
        Block::paragraph(
            format!("తేదీ : {}", f.final_date),
            TextStyle::aligned(Align::Right),
        ),
    ]
}

/// Build the full report from the current field values
pub fn build_document(fields: &FieldState) -> Document {
    let mut doc = Document::with_title(REPORT_TITLE);
    for template in &PAGES {
        doc.push_page((template.build)(fields));
    }
    doc
}

#[derive(Debug, Clone)]
struct CacheEntry {
    key: Vec<String>,
    blocks: Vec<Block>,
}

/// Per-page memoization of block construction
///
/// A page is rebuilt only when one of the fields it references changed
/// since the last build.
#[derive(Debug, Default)]
pub struct BlockCache {
    entries: Vec<Option<CacheEntry>>,
    rebuilds: usize,
}

impl BlockCache {
    pub fn new() -> Self {
        Self {
            entries: vec![None; PAGES.len()],
            rebuilds: 0,
        }
    }

    /// Blocks for the page at `index` (0-based)
    ///
    /// # Panics
    /// Panics if `index` is not a valid page index.
    pub fn page(&mut self, index: usize, fields: &FieldState) -> &[Block] {
        let template = &PAGES[index];
        if self.entries.len() < PAGES.len() {
            self.entries.resize(PAGES.len(), None);
        }

        let key = fields.snapshot(template.fields);
        let stale = match &self.entries[index] {
            Some(entry) => entry.key != key,
            None => true,
        };
        if stale {
            debug!(page = template.number, "rebuilding page blocks");
            self.rebuilds += 1;
            self.entries[index] = Some(CacheEntry {
                key,
                blocks: (template.build)(fields),
            });
        }

        self.entries[index]
            .as_ref()
            .map(|entry| entry.blocks.as_slice())
            .unwrap_or_default()
    }

    /// Full document, reusing unchanged pages
    pub fn document(&mut self, fields: &FieldState) -> Document {
        let mut doc = Document::with_title(REPORT_TITLE);
        for index in 0..PAGES.len() {
            let blocks = self.page(index, fields).to_vec();
            doc.push_page(blocks);
        }
        doc
    }

    /// Number of page builds performed so far
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}
