//! Report sinks: console grid, grouped CSV, per-sample CSV, JSON report.
//!
//! # Grouped CSV
//!
//! One row per material × anneal cell in axis order. Quantity columns hold
//! the cell's raw sequence as a quoted bracketed list, the last column the
//! sample count:
//!
//! ```text
//! Material,AnnealType,S Parameter,...,Right W Uncertainty,N Samples
//! gold,annealed,"[0.55, 0.57]",...,"[0.002, 0.002]",2
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::dataset::{Dataset, MaterialTrend, SummaryTable};
use crate::error::LookupError;
use crate::ingest::IngestReport;
use crate::label::title_case;
use crate::quantity::{COUNT_DEPTH, N_SAMPLES, Quantity};
use crate::stats::{LinearFit, WidthSample};

/// Column width of the console grid.
const CELL_WIDTH: usize = 12;

/// Console placeholder for a cell without samples.
pub const NO_DATA: &str = "(NO DATA)";

// ---------------------------------------------------------------------------
// Console grid
// ---------------------------------------------------------------------------

/// Render the mean of one quantity as a material × anneal grid.
///
/// Parameters get a second line per anneal row holding their mean
/// uncertainty; uncertainties and the count slot take one line.
pub fn render_grid(data: &Dataset, quantity_name: &str) -> Result<String, LookupError> {
    let depth = data.index().depth_of(quantity_name)?;
    let paired = Quantity::from_depth(depth).and_then(Quantity::uncertainty);

    let mut out = format!("{quantity_name}\n{:<CELL_WIDTH$}", "");
    for material in data.index().materials() {
        out.push_str(&format!("{:^CELL_WIDTH$}", title_case(material)));
    }
    out.push('\n');

    for treatment in data.index().treatments() {
        let row = treatment.row();
        let mut main = format!("{:^CELL_WIDTH$}", title_case(treatment.as_str()));
        let mut below = format!("{:<CELL_WIDTH$}", "");
        for col in 0..data.index().cols() {
            let (text, unc_text) = if depth == COUNT_DEPTH {
                (data.grid().count(row, col).to_string(), String::new())
            } else {
                match data.mean_of(row, col, depth) {
                    None => (NO_DATA.to_string(), String::new()),
                    Some(mean) => {
                        let unc = paired
                            .and_then(|u| data.mean_of(row, col, u.depth()))
                            .map(|u| format!("±{u:.6}"))
                            .unwrap_or_default();
                        (format!("{mean:.6}"), unc)
                    }
                }
            };
            main.push_str(&format!("{text:^CELL_WIDTH$}"));
            below.push_str(&format!("{unc_text:^CELL_WIDTH$}"));
        }
        out.push_str(main.trim_end());
        out.push('\n');
        if paired.is_some() {
            out.push_str(below.trim_end());
            out.push('\n');
        }
    }
    Ok(out)
}

/// Render the count / mean S / mean S uncertainty cross-tabulation.
pub fn render_summary(table: &SummaryTable) -> String {
    let mut out = format!(
        "{:<12} {:<12} {:>8} {:>12} {:>12}\n",
        "Material", "Anneal", "Samples", "S-Param", "Uncertainty"
    );
    out.push_str(&"-".repeat(60));
    out.push('\n');
    for entry in &table.entries {
        let fmt = |v: Option<f64>| v.map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.8}"));
        out.push_str(&format!(
            "{:<12} {:<12} {:>8} {:>12} {:>12}\n",
            title_case(&entry.material),
            title_case(entry.treatment.as_str()),
            entry.count,
            fmt(entry.mean_s),
            fmt(entry.mean_s_uncertainty),
        ));
    }
    out
}

/// Render per-material S-vs-W fits as `S(W) = slope * W + (intercept)`.
pub fn render_trends(trends: &[MaterialTrend]) -> String {
    let mut out = String::new();
    for trend in trends {
        match &trend.fit {
            Ok(fit) => out.push_str(&format!(
                "{:<12} n={:<4} S(W) = {:.6} * W + ({:.6})   r^2 = {:.4}\n",
                title_case(&trend.material),
                trend.samples,
                fit.slope,
                fit.intercept,
                fit.r_squared
            )),
            Err(e) => out.push_str(&format!(
                "{:<12} n={:<4} no fit: {e}\n",
                title_case(&trend.material),
                trend.samples
            )),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header of the grouped CSV.
pub fn grouped_header() -> String {
    let mut cols = vec!["Material", "AnnealType"];
    cols.extend(Quantity::ALL.iter().map(|q| q.name()));
    cols.push(N_SAMPLES);
    cols.join(",")
}

/// Write one row per material × anneal cell.
pub fn write_grouped_csv<W: Write>(data: &Dataset, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", grouped_header())?;
    for (col, material) in data.index().materials().iter().enumerate() {
        for treatment in data.index().treatments() {
            let cell = data.cell(treatment.row(), col);
            let mut fields = vec![csv_field(material), treatment.as_str().to_string()];
            fields.extend(Quantity::ALL.iter().map(|&q| format_sequence(cell.values(q))));
            fields.push(cell.count().to_string());
            writeln!(out, "{}", fields.join(","))?;
        }
    }
    Ok(())
}

/// Header of the per-sample CSV.
pub fn samples_header() -> String {
    let mut cols = vec!["Material", "AnnealType"];
    cols.extend(Quantity::ALL.iter().map(|q| q.name()));
    cols.extend(["W Parameter", "W Uncertainty"]);
    cols.join(",")
}

/// Write one row per ingested sample with its composite W width appended.
pub fn write_samples_csv<W: Write>(data: &Dataset, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", samples_header())?;
    for (col, material) in data.index().materials().iter().enumerate() {
        for treatment in data.index().treatments() {
            let row = treatment.row();
            let widths = data.composite_width_series(row, col);
            for (values, w) in data.cell(row, col).samples().zip(widths) {
                let mut fields = vec![csv_field(material), treatment.as_str().to_string()];
                fields.extend(values.iter().map(|v| format_value(*v)));
                fields.push(format_value(w.width));
                fields.push(format_value(w.uncertainty));
                writeln!(out, "{}", fields.join(","))?;
            }
        }
    }
    Ok(())
}

/// `{date}_all_samples_pepto.csv`
pub fn grouped_file_name(date: &str) -> String {
    format!("{date}_all_samples_pepto.csv")
}

/// `{date}_per_sample_pepto.csv`
pub fn samples_file_name(date: &str) -> String {
    format!("{date}_per_sample_pepto.csv")
}

/// Write the grouped CSV into `dir`, returning the file path.
pub fn export_grouped(data: &Dataset, dir: &Path, date: &str) -> io::Result<PathBuf> {
    let path = dir.join(grouped_file_name(date));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_grouped_csv(data, &mut writer)?;
    writer.flush()?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

/// Write the per-sample CSV into `dir`, returning the file path.
pub fn export_samples(data: &Dataset, dir: &Path, date: &str) -> io::Result<PathBuf> {
    let path = dir.join(samples_file_name(date));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_samples_csv(data, &mut writer)?;
    writer.flush()?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

/// Sequence as a quoted bracketed list: `"[0.55, 0.57]"`.
fn format_sequence(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format_value(*v)).collect();
    format!("\"[{}]\"", items.join(", "))
}

/// Shortest round-trip representation, always with a decimal point.
fn format_value(v: f64) -> String {
    format!("{v:?}")
}

/// Quote a text field if it needs it.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

/// S-vs-W fit outcome in the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct TrendEntry {
    pub material: String,
    pub samples: usize,
    pub fit: Option<LinearFit>,
    pub error: Option<String>,
}

impl From<&MaterialTrend> for TrendEntry {
    fn from(t: &MaterialTrend) -> Self {
        Self {
            material: t.material.clone(),
            samples: t.samples,
            fit: t.fit.as_ref().ok().copied(),
            error: t.fit.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Per-cell composite W series in the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct WidthSeries {
    pub material: String,
    pub treatment: String,
    pub samples: Vec<WidthSample>,
}

/// Machine-readable snapshot of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub pepto_version: String,
    pub generated_at: String,
    pub shape: [usize; 3],
    pub ingest: IngestReport,
    pub summary: SummaryTable,
    pub widths: Vec<WidthSeries>,
    pub trends: Vec<TrendEntry>,
}

impl RunReport {
    pub fn new(data: &Dataset, ingest: &IngestReport) -> Self {
        let (rows, cols, depth) = data.index().shape();
        let widths = data
            .index()
            .materials()
            .iter()
            .enumerate()
            .flat_map(|(col, material)| {
                data.index().treatments().into_iter().map(move |t| WidthSeries {
                    material: material.clone(),
                    treatment: t.as_str().to_string(),
                    samples: data.composite_width_series(t.row(), col),
                })
            })
            .collect();

        Self {
            pepto_version: crate::VERSION.to_string(),
            generated_at: UtcTime::from_system_time(SystemTime::now()).iso8601(),
            shape: [rows, cols, depth],
            ingest: ingest.clone(),
            summary: data.summary_table(),
            widths,
            trends: data.s_vs_w_trends().iter().map(TrendEntry::from).collect(),
        }
    }

    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// `MM_DD_YYYY` stamp (UTC) used in export file names.
pub fn date_stamp(at: SystemTime) -> String {
    let t = UtcTime::from_system_time(at);
    format!("{:02}_{:02}_{:04}", t.month, t.day, t.year)
}

/// Calendar breakdown of a UTC instant. No leap seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UtcTime {
    year: u64,
    month: u64,
    day: u64,
    hour: u64,
    minute: u64,
    second: u64,
}

impl UtcTime {
    /// Instants before the epoch clamp to it.
    fn from_system_time(at: SystemTime) -> Self {
        let secs = at.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let (mut days, rem) = (secs / 86_400, secs % 86_400);

        let mut year = 1970;
        while days >= days_in_year(year) {
            days -= days_in_year(year);
            year += 1;
        }

        let lengths = month_lengths(year);
        let mut month = 0;
        while days >= lengths[month] {
            days -= lengths[month];
            month += 1;
        }

        Self {
            year,
            month: month as u64 + 1,
            day: days + 1,
            hour: rem / 3600,
            minute: rem / 60 % 60,
            second: rem % 60,
        }
    }

    /// `2023-06-15T01:30:00Z`
    fn iso8601(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn days_in_year(year: u64) -> u64 {
    month_lengths(year).iter().sum()
}

fn month_lengths(year: u64) -> [u64; 12] {
    let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
    [31, if leap { 29 } else { 28 }, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
}
