//! Single-snapshot health report export.

use anyhow::Result;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use vitals_common::models::{HealthRecord, User};
use vitals_common::scoring::HealthAssessment;

pub const REPORT_TITLE: &str = "Smart Health Monitoring Report";

/// Fixed-layout content of a report, independent of the output format
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub title: String,
    /// Name, email and generation time lines
    pub identity: Vec<(String, String)>,
    /// The seven metrics followed by the health score
    pub rows: Vec<(String, String)>,
}

impl ReportData {
    pub fn new(user: &User, record: &HealthRecord, assessment: &HealthAssessment) -> Self {
        let identity = vec![
            ("Name".to_string(), user.name.clone()),
            ("Email".to_string(), user.email.clone()),
            (
                "Generated On".to_string(),
                record.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
            ),
        ];

        let bmi = record
            .bmi
            .map(|b| b.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        let rows = vec![
            ("Weight (kg)".to_string(), record.weight.to_string()),
            ("Height (m)".to_string(), record.height.to_string()),
            ("BMI".to_string(), bmi),
            ("Blood Pressure".to_string(), record.blood_pressure()),
            ("Sugar Level".to_string(), record.sugar.to_string()),
            ("Water Intake (L)".to_string(), record.water.to_string()),
            ("Health Score (%)".to_string(), assessment.score.to_string()),
        ];

        Self {
            title: REPORT_TITLE.to_string(),
            identity,
            rows,
        }
    }
}

/// Turns report data into a downloadable document
pub trait DocumentExporter: Send + Sync {
    fn export(&self, report: &ReportData) -> Result<Vec<u8>>;

    fn content_type(&self) -> &'static str;

    /// Suggested attachment file name
    fn file_name(&self) -> &'static str;
}

/// A4 PDF using the built-in Helvetica fonts
#[derive(Debug, Clone, Default)]
pub struct PdfExporter;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 25.0;
const VALUE_COLUMN_MM: f32 = 110.0;
const LINE_MM: f32 = 8.0;

impl DocumentExporter for PdfExporter {
    fn export(&self, report: &ReportData) -> Result<Vec<u8>> {
        let (doc, page, layer) = PdfDocument::new(
            report.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Report",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("Failed to load PDF font: {:?}", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow::anyhow!("Failed to load PDF font: {:?}", e))?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        layer.use_text(report.title.as_str(), 18.0, Mm(MARGIN_MM), Mm(y), &bold);
        y -= LINE_MM * 2.0;

        for (label, value) in &report.identity {
            layer.use_text(
                format!("{}: {}", label, value),
                11.0,
                Mm(MARGIN_MM),
                Mm(y),
                &regular,
            );
            y -= LINE_MM;
        }
        y -= LINE_MM;

        for (label, value) in &report.rows {
            layer.use_text(label.as_str(), 11.0, Mm(MARGIN_MM), Mm(y), &bold);
            layer.use_text(value.as_str(), 11.0, Mm(VALUE_COLUMN_MM), Mm(y), &regular);
            y -= LINE_MM;
        }

        doc.save_to_bytes()
            .map_err(|e| anyhow::anyhow!("Failed to write PDF: {:?}", e))
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_name(&self) -> &'static str {
        "health_report.pdf"
    }
}
