//! Side-by-side summary of fitted factor models.
//!
//! One column per model and a fixed set of rows: each coefficient followed by
//! its standard error, then the overall F-test p-value and the two R² values.
//! Coefficients and the F-test p-value carry significance stars.

use serde::{Deserialize, Serialize};
use std::fmt;
use tuck_data::Factor;
use tuck_model::{Coefficient, ModelFit, ModelFits, RegressionResult};

/// Row labels in display order.
pub const ROW_LABELS: [&str; 15] = [
    "Intercept",
    "Intercept (SE)",
    "Mkt-RF",
    "Mkt-RF (SE)",
    "SMB",
    "SMB (SE)",
    "HML",
    "HML (SE)",
    "RMW",
    "RMW (SE)",
    "CMA",
    "CMA (SE)",
    "Overall Significance",
    "R-Square",
    "Adjusted R-Square",
];

/// Cell text for every row of a model that could not be fitted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Significance stars for a p-value.
///
/// Cumulative: `*` below 0.10, `**` below 0.05, `***` below 0.01.
/// NaN gets no stars.
///
/// # Examples
///
/// ```
/// use tuck_output::stars;
///
/// assert_eq!(stars(0.005), "***");
/// assert_eq!(stars(0.04), "**");
/// assert_eq!(stars(0.5), "");
/// ```
pub fn stars(p_value: f64) -> &'static str {
    if p_value < 0.01 {
        "***"
    } else if p_value < 0.05 {
        "**"
    } else if p_value < 0.10 {
        "*"
    } else {
        ""
    }
}

/// A value with three decimals followed by its stars.
pub fn format_significant(value: f64, p_value: f64) -> String {
    format!("{:.3}{}", value, stars(p_value))
}

/// A standard error in parentheses with three decimals.
pub fn format_std_error(std_error: f64) -> String {
    format!("({:.3})", std_error)
}

/// One labelled row of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Row label, e.g. `Mkt-RF (SE)`.
    pub label: String,
    /// One cell per model column.
    pub cells: Vec<String>,
}

/// Formatted comparison of several model fits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    columns: Vec<String>,
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Build the table from a set of fits, keeping model order.
    ///
    /// Factors a model does not use are left blank. A model whose fit failed
    /// shows [`NOT_AVAILABLE`] in every row.
    pub fn from_fits(fits: &ModelFits) -> Self {
        let columns: Vec<String> = fits.iter().map(|f| f.name().to_string()).collect();
        let model_cells: Vec<Vec<String>> = fits.iter().map(column_cells).collect();

        let rows = ROW_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| SummaryRow {
                label: (*label).to_string(),
                cells: model_cells.iter().map(|cells| cells[i].clone()).collect(),
            })
            .collect();

        Self { columns, rows }
    }

    /// Model names, one per column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Cell at a row label and model name.
    pub fn cell(&self, row: &str, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        let row = self.rows.iter().find(|r| r.label == row)?;
        row.cells.get(col).map(String::as_str)
    }

    /// Format as an ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.cells.get(j))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let total = label_width + widths.iter().map(|w| w + 3).sum::<usize>();
        let mut output = String::new();

        output.push_str(&"=".repeat(total));
        output.push('\n');
        output.push_str(&format!("{:<label_width$}", ""));
        for (name, width) in self.columns.iter().zip(&widths) {
            output.push_str(&format!("   {:>width$}", name));
        }
        output.push('\n');
        output.push_str(&"-".repeat(total));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!("{:<label_width$}", row.label));
            for (cell, width) in row.cells.iter().zip(&widths) {
                output.push_str(&format!("   {:>width$}", cell));
            }
            output.push('\n');
            // Separate the coefficient block from the fit statistics.
            if row.label == "CMA (SE)" {
                output.push_str(&"-".repeat(total));
                output.push('\n');
            }
        }

        output.push_str(&"=".repeat(total));
        output.push('\n');
        output.push_str("* p<0.10, ** p<0.05, *** p<0.01\n");
        output
    }

    /// Format as a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push('|');
        output.push_str(" |");
        for name in &self.columns {
            output.push_str(&format!(" {} |", escape_markdown(name)));
        }
        output.push('\n');

        output.push_str("|---|");
        for _ in &self.columns {
            output.push_str("---:|");
        }
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!("| {} |", escape_markdown(&row.label)));
            for cell in &row.cells {
                output.push_str(&format!(" {} |", escape_markdown(cell)));
            }
            output.push('\n');
        }

        output
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

impl From<&ModelFits> for SummaryTable {
    fn from(fits: &ModelFits) -> Self {
        Self::from_fits(fits)
    }
}

/// All cells of one model column, in [`ROW_LABELS`] order.
fn column_cells(fit: &ModelFit) -> Vec<String> {
    let Some(result) = fit.result() else {
        return vec![NOT_AVAILABLE.to_string(); ROW_LABELS.len()];
    };

    let mut cells = Vec::with_capacity(ROW_LABELS.len());
    push_coefficient(&mut cells, result.intercept());
    for factor in Factor::ALL {
        push_coefficient(&mut cells, result.factor(factor));
    }
    push_fit_statistics(&mut cells, result);
    cells
}

fn push_coefficient(cells: &mut Vec<String>, coefficient: Option<&Coefficient>) {
    match coefficient {
        Some(c) => {
            cells.push(format_significant(c.estimate, c.p_value));
            cells.push(format_std_error(c.std_error));
        }
        None => {
            cells.push(String::new());
            cells.push(String::new());
        }
    }
}

fn push_fit_statistics(cells: &mut Vec<String>, result: &RegressionResult) {
    cells.push(format_significant(result.f_p_value, result.f_p_value));
    cells.push(format!("{:.3}", result.r_squared));
    cells.push(format!("{:.3}", result.adj_r_squared));
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|").replace('*', "\\*")
}
