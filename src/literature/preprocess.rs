//! Document preprocessing for the literature collaborator
//!
//! Scientific full texts end in boilerplate (references, acknowledgements,
//! funding statements) that only inflates prompts. The stripper cuts at the
//! first boilerplate section header found in the second half of the document;
//! a header in the first half is assumed to be part of the content and never
//! cuts.

/// Section headers that mark the start of trailing boilerplate. Matching is
/// prefix-based, so "FUNDING" also covers "FUNDING INFORMATION".
const STOP_SECTION_KEYWORDS: [&str; 30] = [
    "REFERENCES",
    "REFERENCE LIST",
    "LITERATURE CITED",
    "BIBLIOGRAPHY",
    "ACKNOWLEDGEMENTS",
    "ACKNOWLEDGMENTS",
    "ACKNOWLEDGMENT",
    "SUPPLEMENTAL MATERIAL",
    "SUPPLEMENTARY MATERIAL",
    "SUPPORTING INFORMATION",
    "SUPPLEMENTARY DATA",
    "AUTHOR CONTRIBUTIONS",
    "AUTHORSHIP CONTRIBUTIONS",
    "CONTRIBUTIONS",
    "CORRESPONDENCE",
    "COMPETING INTERESTS",
    "DECLARATION OF COMPETING INTEREST",
    "CONFLICT OF INTEREST",
    "FINANCIAL DISCLOSURES",
    "DISCLOSURE STATEMENT",
    "FUNDING",
    "DATA AVAILABILITY",
    "AVAILABILITY OF DATA AND MATERIALS",
    "CODE AVAILABILITY",
    "ETHICS STATEMENT",
    "ETHICAL APPROVAL",
    "ANIMAL ETHICS",
    "HUMAN ETHICS",
    "APPENDIX",
    "APPENDICES",
];

/// Whether a line is a boilerplate section header: optional markdown hashes
/// (which must be followed by whitespace), then a stop keyword, then a word
/// boundary. "REFERENCESX" is not a header, "REFERENCES:" and
/// "## References" are.
fn is_stop_header(line: &str) -> bool {
    let mut rest = line.trim_start();
    if rest.starts_with('#') {
        let stripped = rest.trim_start_matches('#');
        if !stripped.starts_with(char::is_whitespace) {
            return false;
        }
        rest = stripped.trim_start();
    }

    let upper = rest.to_uppercase();
    STOP_SECTION_KEYWORDS.iter().any(|keyword| {
        match upper.strip_prefix(keyword) {
            Some(after) => match after.chars().next() {
                None => true,
                Some(c) => c == ':' || c.is_whitespace() || !c.is_alphanumeric(),
            },
            None => false,
        }
    })
}

/// Cut the document at the first boilerplate header past its midpoint.
/// Returns the (trimmed) input unchanged when no header qualifies.
pub fn strip_trailing_sections(text: &str) -> &str {
    let threshold = text.len() / 2;

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if start > threshold && is_stop_header(line) {
            return text[..start].trim();
        }
    }

    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_shapes_are_recognized() {
        assert!(is_stop_header("REFERENCES"));
        assert!(is_stop_header("References:"));
        assert!(is_stop_header("  ## Acknowledgements"));
        assert!(is_stop_header("FUNDING INFORMATION"));
        assert!(is_stop_header("Data availability statement"));

        // Hashes without a following space are not markdown headers, and a
        // keyword glued to more letters is not a section header.
        assert!(!is_stop_header("#REFERENCES"));
        assert!(!is_stop_header("REFERENCESX"));
        assert!(!is_stop_header("see the references section"));
    }

    #[test]
    fn boilerplate_in_the_second_half_is_cut() {
        let body = "enzyme assay results follow.\n".repeat(20);
        let text = format!("{}REFERENCES\n1. Smith et al. 2019\n", body);

        let kept = strip_trailing_sections(&text);
        assert!(kept.ends_with("enzyme assay results follow."));
        assert!(!kept.contains("Smith"));
    }

    #[test]
    fn the_earliest_qualifying_header_wins() {
        let body = "x\n".repeat(200);
        let text = format!("{}ACKNOWLEDGEMENTS\nthanks\nREFERENCES\n1. Smith\n", body);

        let kept = strip_trailing_sections(&text);
        assert!(!kept.contains("thanks"));
        assert!(!kept.contains("Smith"));
    }

    #[test]
    fn first_half_headers_never_cut() {
        let text = format!("REFERENCES to prior work shape this study.\n{}", "data\n".repeat(30));
        let kept = strip_trailing_sections(&text);
        assert!(kept.contains("REFERENCES to prior work"));
        assert!(kept.ends_with("data"));
    }

    #[test]
    fn untouched_documents_are_only_trimmed() {
        assert_eq!(strip_trailing_sections("  short note  "), "short note");
        assert_eq!(strip_trailing_sections(""), "");
    }
}
