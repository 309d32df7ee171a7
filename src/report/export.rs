//! Renders reports into downloadable files.

use csv::WriterBuilder;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Serialize;

use crate::{
    Error,
    currency::{Currency, format_currency},
    report::Summary,
    transaction::Transaction,
};

/// The data every export format is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportData {
    /// Transactions in the order they should be listed, newest first.
    pub transactions: Vec<Transaction>,
    /// Totals and budget utilization over `transactions`.
    pub summary: Summary,
    /// The currency symbol to format amounts with.
    pub currency: Currency,
}

/// A file format a report can be exported to.
pub trait ReportExporter {
    /// The MIME type of the rendered file.
    fn content_type(&self) -> &'static str;

    /// The file name suggested to the client.
    fn file_name(&self) -> &'static str;

    /// Render the report.
    ///
    /// # Errors
    /// Returns [Error::ExportError] if the file could not be written.
    fn render(&self, data: &ExportData) -> Result<Vec<u8>, Error>;
}

/// Exports the transactions as CSV, one row per transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    description: &'a str,
    amount: String,
    #[serde(rename = "type")]
    transaction_type: &'static str,
    category: &'a str,
}

impl ReportExporter for CsvExporter {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn file_name(&self) -> &'static str {
        "financial-report.csv"
    }

    fn render(&self, data: &ExportData) -> Result<Vec<u8>, Error> {
        // Headers are written by hand so that an empty export still has them.
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);

        writer
            .write_record(["date", "description", "amount", "type", "category"])
            .map_err(|error| Error::ExportError(error.to_string()))?;

        for transaction in &data.transactions {
            writer
                .serialize(CsvRow {
                    date: transaction.date.to_string(),
                    description: &transaction.description,
                    amount: format_currency(transaction.amount, data.currency),
                    transaction_type: transaction.transaction_type.as_str(),
                    category: &transaction.category,
                })
                .inspect_err(|error| tracing::error!("failed to serialize export row: {error}"))
                .map_err(|error| Error::ExportError(error.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|error| Error::ExportError(error.to_string()))
    }
}

/// Exports a printable summary, transaction list and budget overview as PDF.
///
/// Text is set in the built-in Helvetica fonts, which have no rupee glyph, so
/// rupee amounts are written with "Rs." instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

/// A4 in millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const MM_PER_POINT: f32 = 25.4 / 72.0;
const LINE_SPACING: f32 = 1.4;
/// Lines longer than this many characters are wrapped between words.
const WRAP_COLUMN: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TextStyle {
    Title,
    Heading,
    Body,
}

impl TextStyle {
    fn font_size(self) -> f32 {
        match self {
            TextStyle::Title => 20.0,
            TextStyle::Heading => 16.0,
            TextStyle::Body => 12.0,
        }
    }

    fn line_height(self) -> f32 {
        self.font_size() * MM_PER_POINT * LINE_SPACING
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Text(TextStyle, String),
    Gap,
}

/// A line of text with its baseline, in millimetres from the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    style: TextStyle,
    text: String,
    y: f32,
}

impl ReportExporter for PdfExporter {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_name(&self) -> &'static str {
        "financial-report.pdf"
    }

    fn render(&self, data: &ExportData) -> Result<Vec<u8>, Error> {
        let pages = layout_pages(&report_blocks(data));

        let (document, first_page, first_layer) = PdfDocument::new(
            "Financial Report",
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );
        let regular = document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|error| Error::ExportError(error.to_string()))?;
        let bold = document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|error| Error::ExportError(error.to_string()))?;

        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                document.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
            };
            let layer = document.get_page(page).get_layer(layer);

            for line in lines {
                let font = match line.style {
                    TextStyle::Body => &regular,
                    TextStyle::Title | TextStyle::Heading => &bold,
                };

                layer.use_text(
                    line.text.as_str(),
                    line.style.font_size(),
                    Mm(MARGIN),
                    Mm(line.y),
                    font,
                );
            }
        }

        tracing::debug!("Rendered report PDF with {} pages", pages.len());

        document
            .save_to_bytes()
            .map_err(|error| Error::ExportError(error.to_string()))
    }
}

fn pdf_money(amount: f64, currency: Currency) -> String {
    let formatted = format_currency(amount, currency);

    match currency {
        Currency::Inr => formatted.replacen(currency.symbol(), "Rs.", 1),
        Currency::Usd | Currency::Eur => formatted,
    }
}

/// The report content, top to bottom.
fn report_blocks(data: &ExportData) -> Vec<Block> {
    let money = |amount: f64| pdf_money(amount, data.currency);
    let summary = &data.summary;
    let body = |text: String| Block::Text(TextStyle::Body, text);
    let heading = |text: &str| Block::Text(TextStyle::Heading, text.to_owned());

    let mut blocks = vec![
        Block::Text(TextStyle::Title, "Financial Report".to_owned()),
        Block::Gap,
        heading("Summary"),
        body(format!("Total Income: {}", money(summary.total_income))),
        body(format!("Total Expenses: {}", money(summary.total_expenses))),
        body(format!("Net Savings: {}", money(summary.net_savings))),
        body(format!("Savings Rate: {:.1}%", summary.savings_rate)),
        Block::Gap,
        heading("Recent Transactions"),
    ];

    blocks.extend(data.transactions.iter().map(|transaction| {
        body(format!(
            "{} - {} - {} - {} ({})",
            transaction.date,
            transaction.description,
            transaction.category,
            money(transaction.amount),
            transaction.transaction_type
        ))
    }));

    blocks.push(Block::Gap);
    blocks.push(heading("Budget Overview"));
    blocks.extend(summary.budget_utilization.iter().map(|utilization| {
        body(format!(
            "{}: Budget {} - Spent {} - Remaining {}",
            utilization.category,
            money(utilization.budget),
            money(utilization.spent),
            money(utilization.remaining)
        ))
    }));

    blocks
}

/// Place `blocks` top to bottom, starting a new page whenever the next line
/// would cross the bottom margin.
fn layout_pages(blocks: &[Block]) -> Vec<Vec<PlacedLine>> {
    let top = PAGE_HEIGHT - MARGIN;
    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut cursor = top;

    for block in blocks {
        let (style, text) = match block {
            Block::Gap => {
                cursor -= TextStyle::Body.line_height();
                continue;
            }
            Block::Text(style, text) => (*style, text),
        };

        for text in wrap(text, WRAP_COLUMN) {
            let height = style.line_height();

            if cursor - height < MARGIN {
                pages.push(std::mem::take(&mut page));
                cursor = top;
            }

            cursor -= height;
            page.push(PlacedLine {
                style,
                text,
                y: cursor,
            });
        }
    }

    pages.push(page);
    pages
}

/// Split `text` into lines of at most `width` characters, breaking between
/// words. A word longer than `width` gets a line of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let line_length = line.chars().count();

        if line_length > 0 && line_length + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }

        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }

    lines
}
