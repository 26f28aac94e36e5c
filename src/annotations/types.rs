//! Annotation types
//!
//! Ingestion hands over loosely typed [`RawAnnotation`] records (a `type`
//! string, a span, and whatever extra fields that type carries). They are
//! turned into the closed [`AnnotationKind`] enum in exactly one place,
//! `Annotation::try_from`, so an unknown type can never slip through to the
//! renderer unnoticed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SerializeError};

/// Character-offset interval over a base text
///
/// Offsets count Unicode scalar values, not bytes. `end` is an insertion
/// position: closing markup lands just before the character at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `offset` falls inside the span (`start <= offset < end`)
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Annotation record as produced by ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAnnotation {
    #[serde(rename = "type")]
    pub annotation_type: String,
    pub span: TextSpan,
    /// Type-specific fields (`page_index`, `page_info`, `correction`, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawAnnotation {
    pub fn new(annotation_type: &str, span: TextSpan) -> Self {
        Self {
            annotation_type: annotation_type.to_string(),
            span,
            fields: Map::new(),
        }
    }

    /// Set an extra field
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Field rendered as text; numbers are accepted for page indices
    fn text_field(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn required_field(&self, key: &str) -> Result<String> {
        self.text_field(key)
            .ok_or_else(|| SerializeError::MalformedAnnotation {
                kind: self.annotation_type.clone(),
                reason: format!("missing field `{}`", key),
            })
    }
}

/// Every annotation type the renderer knows how to mark up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Page break marker (point annotation)
    Pagination { page_index: String, page_info: String },
    /// Suggested reading for the spanned text
    Correction { correction: String },
    /// Peydurma note marker (point annotation)
    Peydurma,
    ErrorCandidate,
    BookTitle,
    Author,
    ChapterTitle,
    /// Root text
    Tsawa,
    Quotation,
    /// Structural outline heading
    Sabche,
    /// Small-script commentary
    Yigchung,
}

/// Markup spliced around an annotation
///
/// `end` is `None` for point annotations, which only mark their start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub start: String,
    pub end: Option<String>,
}

impl Payload {
    fn pair(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: Some(end.to_string()),
        }
    }

    fn point(start: String) -> Self {
        Self { start, end: None }
    }

    fn span(class: &str) -> Self {
        Self {
            start: format!("<span class=\"{}\">", class),
            end: Some("</span>".to_string()),
        }
    }

    pub fn is_point(&self) -> bool {
        self.end.is_none()
    }

    /// Characters this payload adds to the rendered text
    pub fn char_len(&self) -> usize {
        self.start.chars().count() + self.end.as_deref().map_or(0, |e| e.chars().count())
    }
}

impl AnnotationKind {
    /// Wire name of the type, as used by ingestion
    pub fn type_name(&self) -> &'static str {
        match self {
            AnnotationKind::Pagination { .. } => "pagination",
            AnnotationKind::Correction { .. } => "correction",
            AnnotationKind::Peydurma => "peydurma",
            AnnotationKind::ErrorCandidate => "error_candidate",
            AnnotationKind::BookTitle => "book_title",
            AnnotationKind::Author => "author",
            AnnotationKind::ChapterTitle => "chapter_title",
            AnnotationKind::Tsawa => "tsawa",
            AnnotationKind::Quotation => "quotation",
            AnnotationKind::Sabche => "sabche",
            AnnotationKind::Yigchung => "yigchung",
        }
    }

    pub fn payload(&self) -> Payload {
        match self {
            AnnotationKind::Pagination {
                page_index,
                page_info,
            } => Payload::point(format!("[{}] {}\n", page_index, page_info)),
            AnnotationKind::Correction { correction } => Payload {
                start: "(".to_string(),
                end: Some(format!(",{})", correction)),
            },
            AnnotationKind::Peydurma => Payload::point("#".to_string()),
            AnnotationKind::ErrorCandidate => Payload::pair("[", "]"),
            AnnotationKind::BookTitle => Payload::span("credits-page_front-title"),
            AnnotationKind::Author => Payload::span("credits-page_front-page---text-author"),
            AnnotationKind::ChapterTitle => Payload::span("tibetan-chapter"),
            AnnotationKind::Tsawa => {
                Payload::span("tibetan-root-text_tibetan-root-text-middle-lines")
            }
            AnnotationKind::Quotation => {
                Payload::span("tibetan-citations-in-verse_tibetan-citations-middle-lines")
            }
            AnnotationKind::Sabche => Payload::span("tibetan-sabche"),
            AnnotationKind::Yigchung => Payload::span("tibetan-commentary-small"),
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Pagination { .. } | AnnotationKind::Peydurma
        )
    }
}

/// A typed annotation anchored to volume-relative offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub span: TextSpan,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, span: TextSpan) -> Self {
        Self { kind, span }
    }

    pub fn payload(&self) -> Payload {
        self.kind.payload()
    }

    pub fn is_point(&self) -> bool {
        self.kind.is_point()
    }

    /// Whether the annotation covers `offset`; point annotations only cover their start
    pub fn covers(&self, offset: usize) -> bool {
        if self.is_point() {
            self.span.start == offset
        } else {
            self.span.contains(offset)
        }
    }
}

impl TryFrom<RawAnnotation> for Annotation {
    type Error = SerializeError;

    fn try_from(raw: RawAnnotation) -> Result<Self> {
        let kind = match raw.annotation_type.as_str() {
            "pagination" => AnnotationKind::Pagination {
                page_index: raw.required_field("page_index")?,
                page_info: raw.text_field("page_info").unwrap_or_default(),
            },
            "correction" => AnnotationKind::Correction {
                correction: raw.required_field("correction")?,
            },
            "peydurma" => AnnotationKind::Peydurma,
            "error_candidate" => AnnotationKind::ErrorCandidate,
            "book_title" => AnnotationKind::BookTitle,
            "author" => AnnotationKind::Author,
            "chapter_title" => AnnotationKind::ChapterTitle,
            "tsawa" => AnnotationKind::Tsawa,
            "quotation" => AnnotationKind::Quotation,
            "sabche" => AnnotationKind::Sabche,
            "yigchung" => AnnotationKind::Yigchung,
            other => return Err(SerializeError::UnsupportedAnnotationType(other.to_string())),
        };
        Ok(Annotation::new(kind, raw.span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawAnnotation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_pagination() {
        let ann: Annotation = raw(
            r#"{"type": "pagination", "span": {"start": 0, "end": 24}, "page_index": "1a", "page_info": "kha"}"#,
        )
        .try_into()
        .unwrap();

        assert!(ann.is_point());
        assert_eq!(ann.span, TextSpan::new(0, 24));
        assert_eq!(ann.payload().start, "[1a] kha\n");
        assert_eq!(ann.payload().end, None);
    }

    #[test]
    fn test_numeric_page_index() {
        let ann: Annotation = RawAnnotation::new("pagination", TextSpan::new(3, 3))
            .with_field("page_index", 12)
            .try_into()
            .unwrap();

        assert_eq!(ann.payload().start, "[12] \n");
    }

    #[test]
    fn test_correction_payload() {
        let ann: Annotation = RawAnnotation::new("correction", TextSpan::new(1838, 1843))
            .with_field("correction", "མཆིའོ་")
            .try_into()
            .unwrap();

        assert_eq!(ann.payload(), Payload::pair("(", ",མཆིའོ་)"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = Annotation::try_from(RawAnnotation::new("footnote", TextSpan::new(0, 1)));
        assert!(matches!(
            result,
            Err(SerializeError::UnsupportedAnnotationType(t)) if t == "footnote"
        ));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let result = Annotation::try_from(RawAnnotation::new("correction", TextSpan::new(0, 1)));
        assert!(matches!(
            result,
            Err(SerializeError::MalformedAnnotation { kind, .. }) if kind == "correction"
        ));
    }

    #[test]
    fn test_only_pagination_and_peydurma_are_points() {
        let kinds = [
            AnnotationKind::Pagination {
                page_index: "1".into(),
                page_info: String::new(),
            },
            AnnotationKind::Correction {
                correction: "x".into(),
            },
            AnnotationKind::Peydurma,
            AnnotationKind::ErrorCandidate,
            AnnotationKind::BookTitle,
            AnnotationKind::Author,
            AnnotationKind::ChapterTitle,
            AnnotationKind::Tsawa,
            AnnotationKind::Quotation,
            AnnotationKind::Sabche,
            AnnotationKind::Yigchung,
        ];

        for kind in &kinds {
            let payload = kind.payload();
            assert_eq!(payload.is_point(), kind.is_point(), "{}", kind.type_name());
            let expect_point = matches!(kind.type_name(), "pagination" | "peydurma");
            assert_eq!(kind.is_point(), expect_point, "{}", kind.type_name());
        }
    }

    #[test]
    fn test_type_names_parse_back() {
        for name in [
            "peydurma",
            "error_candidate",
            "book_title",
            "author",
            "chapter_title",
            "tsawa",
            "quotation",
            "sabche",
            "yigchung",
        ] {
            let ann = Annotation::try_from(RawAnnotation::new(name, TextSpan::new(0, 0))).unwrap();
            assert_eq!(ann.kind.type_name(), name);
        }
    }

    #[test]
    fn test_covers() {
        let chapter = Annotation::new(AnnotationKind::ChapterTitle, TextSpan::new(2, 5));
        assert!(!chapter.covers(1));
        assert!(chapter.covers(2));
        assert!(chapter.covers(4));
        assert!(!chapter.covers(5));

        let mark = Annotation::new(AnnotationKind::Peydurma, TextSpan::new(4, 9));
        assert!(mark.covers(4));
        assert!(!mark.covers(5));
    }

    #[test]
    fn test_chapter_title_markup() {
        let payload = AnnotationKind::ChapterTitle.payload();
        assert_eq!(payload.start, "<span class=\"tibetan-chapter\">");
        assert_eq!(payload.end.as_deref(), Some("</span>"));
        assert_eq!(payload.char_len(), 30 + 7);
    }
}
