//! Shared report rendering
//!
//! Every query function renders through this builder so all reports share one
//! shape: a title, an explicit restatement of the applied filters, a
//! returned-versus-total count, then one labeled block per result row. A
//! missing value always renders as the literal placeholder rather than the
//! field being dropped, and nothing here depends on wall-clock state, so the
//! same inputs produce byte-identical output.

/// Placeholder for fields the schema defines but the row does not populate.
pub const NOT_AVAILABLE: &str = "not available";

pub fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

pub struct Report {
    out: String,
}

impl Report {
    pub fn new(title: &str) -> Self {
        let mut out = String::with_capacity(2048);
        out.push_str(&format!("# {}\n\n", title));
        Report { out }
    }

    /// Restate the filters that were applied; an absent filter reads `all`.
    pub fn filters(&mut self, pairs: &[(&str, Option<&str>)]) {
        let rendered: Vec<String> = pairs
            .iter()
            .map(|(label, value)| format!("{}={}", label, value.unwrap_or("all")))
            .collect();
        self.out
            .push_str(&format!("**Filters**: {}\n", rendered.join(", ")));
    }

    /// Returned-versus-matched counts. `total` is the match count before the
    /// result cap was applied, so it is always >= `returned`.
    pub fn counts(&mut self, returned: usize, total: usize) {
        self.out.push_str(&format!(
            "**Records shown**: {} (of {} matched)\n",
            returned, total
        ));
    }

    pub fn heading(&mut self, text: &str) {
        self.blank();
        self.out.push_str(&format!("## {}\n", text));
    }

    pub fn subheading(&mut self, text: &str) {
        self.blank();
        self.out.push_str(&format!("### {}\n", text));
    }

    pub fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        if !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    /// One labeled field of a result block.
    pub fn field(&mut self, label: &str, value: Option<&str>) {
        self.out
            .push_str(&format!("- **{}**: {}\n", label, or_missing(value)));
    }

    /// A labeled numeric field with optional unit and error-margin companions.
    /// The unit is appended after the value; an error renders in parentheses.
    pub fn measurement(
        &mut self,
        label: &str,
        value: Option<&str>,
        unit: Option<&str>,
        error: Option<&str>,
    ) {
        let Some(value) = value else {
            self.field(label, None);
            return;
        };

        let mut cell = value.to_string();
        if let Some(unit) = unit {
            cell.push_str(&format!(" {}", unit));
        }
        if let Some(error) = error {
            cell.push_str(&format!(" (error: {})", error));
        }
        self.out.push_str(&format!("- **{}**: {}\n", label, cell));
    }

    /// Finish with exactly one trailing newline.
    pub fn finish(mut self) -> String {
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_shape_is_stable() {
        let mut report = Report::new("Enzyme reaction search");
        report.filters(&[("enzyme", Some("OTC")), ("organism", None)]);
        report.counts(1, 3);
        report.heading("PMID1:reaction_1");
        report.field("Enzyme", Some("Ornithine transcarbamoylase"));
        report.field("PDB id", None);

        let text = report.finish();
        assert_eq!(
            text,
            "# Enzyme reaction search\n\n\
             **Filters**: enzyme=OTC, organism=all\n\
             **Records shown**: 1 (of 3 matched)\n\n\
             ## PMID1:reaction_1\n\
             - **Enzyme**: Ornithine transcarbamoylase\n\
             - **PDB id**: not available\n"
        );
    }

    #[test]
    fn measurements_attach_unit_and_error() {
        let mut report = Report::new("t");
        report.measurement("Conversion rate", Some("85"), Some("%"), None);
        report.measurement("Product yield", Some("78"), Some("%"), Some("±3"));
        report.measurement("Enantiomeric excess", None, Some("%"), Some("±1"));

        let text = report.finish();
        assert!(text.contains("- **Conversion rate**: 85 %\n"));
        assert!(text.contains("- **Product yield**: 78 % (error: ±3)\n"));
        // No unit or error text leaks onto a missing value.
        assert!(text.contains("- **Enantiomeric excess**: not available\n"));
    }

    #[test]
    fn identical_inputs_render_identically() {
        let build = || {
            let mut report = Report::new("Statistics");
            report.counts(2, 2);
            report.field("Rows", Some("10"));
            report.finish()
        };
        assert_eq!(build(), build());
    }
}
