//! Annotation formatting
//!
//! Annotations are right-justified against the far edge of the display
//! area rather than placed at an offset from the candidate, so that they
//! line up in a scannable column whatever the candidate length. The
//! formatter cannot know the candidate length or the frame width, so it
//! emits an [`Segment::Align`] spacer that the renderer resolves later.

use super::Note;
use crate::utils::width::{display_width, truncate};

/// Column budget of the value field in two-field annotations
pub const VALUE_WIDTH: usize = 20;

/// Display style of a piece of annotation text (decorative only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Face {
    Documentation,
    Key,
    Value,
    /// Text shown in the candidate face itself
    Named(String),
}

/// One piece of a formatted annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text { text: String, face: Option<Face> },
    /// Invisible filler extending to `frame_width - from_right`
    Align { from_right: usize },
}

/// A formatted annotation, ready to be appended to a candidate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
    segments: Vec<Segment>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn text(&mut self, text: impl Into<String>, face: Option<Face>) {
        self.segments.push(Segment::Text { text: text.into(), face });
    }

    /// Append a right-justified field: separator, spacer, truncated text
    fn aligned(&mut self, raw: &str, budget: usize, extra_inset: usize, face: Face) {
        let truncated = truncate(raw, budget);
        let from_right = extra_inset.saturating_add(display_width(&truncated));
        self.text(" ", None);
        self.segments.push(Segment::Align { from_right });
        self.text(truncated, Some(face));
    }

    /// Visible text with spacers removed
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::Text { text, .. } => Some(text.as_str()),
                Segment::Align { .. } => None,
            })
            .collect()
    }

    /// Render to plain text, starting at `start_column` of a `frame_width` area
    pub fn render(&self, start_column: usize, frame_width: usize) -> String {
        let mut out = String::new();
        let mut column = start_column;
        for seg in &self.segments {
            match seg {
                Segment::Text { text, .. } => {
                    out.push_str(text);
                    column += display_width(text);
                }
                Segment::Align { from_right } => {
                    let target = frame_width.saturating_sub(*from_right);
                    let pad = target.saturating_sub(column);
                    out.extend(std::iter::repeat(' ').take(pad));
                    column += pad;
                }
            }
        }
        out
    }
}

/// Render one completion line: the candidate followed by its annotation
pub fn render_candidate(candidate: &str, annotation: Option<&Annotation>, frame_width: usize) -> String {
    let mut line = candidate.to_string();
    if let Some(annotation) = annotation {
        line.push_str(&annotation.render(display_width(candidate), frame_width));
    }
    line
}

/// Format raw documentation text into a right-justified annotation.
///
/// `None` means the annotator had nothing to say; an empty string still
/// produces an (empty) annotation.
pub fn format(raw: Option<&str>, column_budget: usize, extra_inset: usize) -> Option<Annotation> {
    let raw = raw?;
    let mut annotation = Annotation::new();
    annotation.aligned(raw, column_budget, extra_inset, Face::Documentation);
    Some(annotation)
}

/// Turns annotator output into formatted annotations for one column budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    pub column_budget: usize,
}

impl Formatter {
    pub fn new(column_budget: usize) -> Self {
        Self { column_budget }
    }

    pub fn format_note(&self, note: &Note) -> Annotation {
        let mut annotation = Annotation::new();
        match note {
            Note::Doc(doc) => {
                annotation.aligned(doc, self.column_budget, 0, Face::Documentation);
            }
            Note::Binding(keys) => {
                annotation.text(format!(" ({})", keys), Some(Face::Key));
            }
            Note::Value { value, doc } => {
                annotation.aligned(value, VALUE_WIDTH, self.column_budget.saturating_add(1), Face::Value);
                annotation.aligned(doc, self.column_budget, 0, Face::Documentation);
            }
            Note::Preview { face, sample, doc } => {
                annotation.aligned(
                    sample,
                    VALUE_WIDTH,
                    self.column_budget.saturating_add(1),
                    Face::Named(face.clone()),
                );
                annotation.aligned(doc, self.column_budget, 0, Face::Documentation);
            }
        }
        annotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FRAME: usize = 60;

    /// Display column right after `needle` in `line`
    fn end_column(line: &str, needle: &str) -> usize {
        let start = line.find(needle).expect("needle present");
        display_width(&line[..start]) + display_width(needle)
    }

    fn start_column(line: &str, needle: &str) -> usize {
        let start = line.find(needle).expect("needle present");
        display_width(&line[..start])
    }

    #[test]
    fn test_format_none_is_none() {
        assert_eq!(format(None, 20, 0), None);
        let empty = format(Some(""), 20, 0).unwrap();
        assert_eq!(empty.plain_text(), " ");
    }

    #[test]
    fn test_format_segments() {
        let ann = format(Some("Visit a file\nMore text"), 10, 2).unwrap();
        assert_eq!(
            ann.segments(),
            &[
                Segment::Text { text: " ".to_string(), face: None },
                Segment::Align { from_right: 12 },
                Segment::Text { text: "Visit a f…".to_string(), face: Some(Face::Documentation) },
            ]
        );
    }

    #[test]
    fn test_flush_right_alignment() {
        let short = format(Some("Short doc."), 30, 0).unwrap();
        let long = format(Some("A considerably longer documentation string."), 30, 0).unwrap();

        let a = render_candidate("find-file", Some(&short), FRAME);
        let b = render_candidate("switch-to-buffer-other-window", Some(&long), FRAME);

        let b_text = truncate("A considerably longer documentation string.", 30);
        assert_eq!(end_column(&a, "Short doc."), FRAME);
        assert_eq!(end_column(&b, &b_text), FRAME);
        assert_ne!(start_column(&a, "Short doc."), start_column(&b, &b_text));
        assert_eq!(display_width(&a), FRAME);
    }

    #[test]
    fn test_inset_moves_the_right_edge() {
        let ann = format(Some("doc"), 30, 5).unwrap();
        let line = render_candidate("x", Some(&ann), FRAME);
        assert_eq!(end_column(&line, "doc"), FRAME - 5);
    }

    #[test]
    fn test_spacer_collapses_when_candidate_is_too_long() {
        let ann = format(Some("doc"), 10, 0).unwrap();
        let candidate = "c".repeat(FRAME);
        let line = render_candidate(&candidate, Some(&ann), FRAME);
        assert_eq!(line, format!("{} doc", candidate));
    }

    #[test]
    fn test_binding_note() {
        let ann = Formatter::new(40).format_note(&Note::Binding("C-x C-f".to_string()));
        assert_eq!(render_candidate("find-file", Some(&ann), FRAME), "find-file (C-x C-f)");
    }

    #[test]
    fn test_value_note_has_two_aligned_fields() {
        let formatter = Formatter::new(30);
        let ann = formatter.format_note(&Note::Value {
            value: "70".to_string(),
            doc: "Column beyond which automatic line-wrapping should happen.".to_string(),
        });
        let line = render_candidate("fill-column", Some(&ann), FRAME);
        let doc = truncate("Column beyond which automatic line-wrapping should happen.", 30);

        assert_eq!(end_column(&line, "70"), FRAME - 31);
        assert_eq!(end_column(&line, &doc), FRAME);
        assert_eq!(ann.plain_text(), format!(" 70 {}", doc));
    }

    #[test]
    fn test_preview_note_uses_candidate_face() {
        let ann = Formatter::new(30).format_note(&Note::Preview {
            face: "bold".to_string(),
            sample: "abc".to_string(),
            doc: "Bold face.".to_string(),
        });
        assert!(ann.segments().contains(&Segment::Text {
            text: "abc".to_string(),
            face: Some(Face::Named("bold".to_string())),
        }));
    }

    #[test]
    fn test_tabbed_documentation_stays_flush_right() {
        let ann = format(Some("Width\tof a tab\x07 stop."), 12, 0).unwrap();
        let line = render_candidate("tab-width", Some(&ann), FRAME);
        assert!(line.ends_with("Width of a …"));
        assert_eq!(display_width(&line), FRAME);
    }

    #[test]
    fn test_huge_budget_does_not_overflow() {
        let ann = Formatter::new(usize::MAX).format_note(&Note::Value {
            value: "8".to_string(),
            doc: "Distance between tab stops.".to_string(),
        });
        assert_eq!(ann.plain_text(), " 8 Distance between tab stops.");
        let line = render_candidate("tab-width", Some(&ann), FRAME);
        assert!(line.starts_with("tab-width 8 "));
    }
}
