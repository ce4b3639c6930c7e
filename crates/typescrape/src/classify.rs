//! Type classifier: `Type: ...` text to a [`TypeDescriptor`].
//!
//! The fixed grammar of primitive and composite spellings is parsed into a
//! closed [`TypeText`] value first; everything outside it names a nested
//! type page, which is resolved (at most once per session) by scraping the
//! linked page.

use crate::error::ScrapeError;
use crate::fetch::PageSource;
use crate::schema::{ScalarKind, TypeDescriptor};
use crate::scrape::dom::TypeLine;
use crate::scrape::scrape_page;
use crate::session::Session;
use futures::future::BoxFuture;
use tracing::debug;
use url::Url;

/// Container prefix of a type spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bare,
    /// `Array of ...`
    Array,
    /// `Object of ...`
    Object,
}

impl Shape {
    pub fn wrap(self, inner: TypeDescriptor) -> TypeDescriptor {
        match self {
            Self::Bare => inner,
            Self::Array => TypeDescriptor::list(inner),
            Self::Object => TypeDescriptor::record(inner),
        }
    }
}

/// Parsed form of a type spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeText<'a> {
    /// `Integer`, `Array of String`, `Object of Boolean`, ...
    Primitive(Shape, ScalarKind),
    /// `Object`, `Array of Array`, ... (fixed composite shapes of `Json`).
    Composite(TypeDescriptor),
    /// A nested type page; `name` is the final token of the text.
    Named { shape: Shape, name: &'a str },
}

/// Parse trimmed, case-sensitive type text against the fixed grammar.
pub fn parse_type_text(text: &str) -> TypeText<'_> {
    use ScalarKind::*;

    let text = text.trim();
    let (shape, rest) = if let Some(rest) = text.strip_prefix("Array of ") {
        (Shape::Array, rest)
    } else if let Some(rest) = text.strip_prefix("Object of ") {
        (Shape::Object, rest)
    } else {
        (Shape::Bare, text)
    };

    let json = || TypeDescriptor::Scalar(Json);
    match (shape, rest) {
        (Shape::Bare | Shape::Object, "Object") => TypeText::Composite(TypeDescriptor::record(json())),
        (Shape::Object, "Array") => TypeText::Composite(TypeDescriptor::record(TypeDescriptor::list(json()))),
        (Shape::Array, "Array") => TypeText::Composite(TypeDescriptor::list(TypeDescriptor::list(json()))),
        (Shape::Array, "Object") => TypeText::Composite(TypeDescriptor::list(TypeDescriptor::record(json()))),
        (_, "Integer" | "Number") => TypeText::Primitive(shape, Number),
        (_, "String") => TypeText::Primitive(shape, String),
        (_, "Boolean") => TypeText::Primitive(shape, Boolean),
        (_, "Json") => TypeText::Primitive(shape, Json),
        _ => TypeText::Named {
            shape,
            name: text.split_whitespace().last().unwrap_or(text),
        },
    }
}

/// Classify one type line found on the page at `page_url`.
///
/// Named types must carry a link. The first reference to a name within the
/// session marks it resolved, scrapes the linked page and stores the result
/// under the name used here; later references return the `Ref` directly.
pub fn classify<'a>(
    session: &'a mut Session,
    source: &'a dyn PageSource,
    page_url: &'a Url,
    line: &'a TypeLine,
) -> BoxFuture<'a, Result<TypeDescriptor, ScrapeError>> {
    Box::pin(async move {
        let (shape, name) = match parse_type_text(&line.text) {
            TypeText::Primitive(shape, kind) => return Ok(shape.wrap(TypeDescriptor::Scalar(kind))),
            TypeText::Composite(ty) => return Ok(ty),
            TypeText::Named { shape, name } => (shape, name),
        };

        let href = line.href.as_deref().ok_or_else(|| ScrapeError::UnlinkedType {
            url: page_url.to_string(),
            text: line.text.clone(),
        })?;

        if session.is_resolved(name) {
            debug!(name, "nested type already resolved in this session");
            return Ok(shape.wrap(TypeDescriptor::Ref(name.to_string())));
        }

        let link = page_url.join(href).map_err(|source| ScrapeError::InvalidUrl {
            url: page_url.to_string(),
            href: href.to_string(),
            source,
        })?;

        session.mark_resolved(name, link.clone());
        let mut schema = scrape_page(session, source, &link).await?;
        schema.name = name.to_string();
        session.store(name, schema);

        Ok(shape.wrap(TypeDescriptor::Ref(name.to_string())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemorySource;
    use ScalarKind::*;

    fn scalar(kind: ScalarKind) -> TypeDescriptor {
        TypeDescriptor::Scalar(kind)
    }

    fn list(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::list(inner)
    }

    fn record(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::record(inner)
    }

    async fn classify_text(text: &str) -> Result<TypeDescriptor, ScrapeError> {
        let url = Url::parse("https://docs.example.com/reference/page.html").unwrap();
        let mut session = Session::new(url.clone());
        let source = MemorySource::new();
        let line = TypeLine {
            text: text.to_string(),
            href: None,
        };
        classify(&mut session, &source, &url, &line).await
    }

    #[tokio::test]
    async fn test_grammar_table() {
        let table = vec![
            ("Integer", scalar(Number)),
            ("Number", scalar(Number)),
            ("Array of Integer", list(scalar(Number))),
            ("Array of Number", list(scalar(Number))),
            ("Object of Integer", record(scalar(Number))),
            ("Object of Number", record(scalar(Number))),
            ("String", scalar(String)),
            ("Array of String", list(scalar(String))),
            ("Object of String", record(scalar(String))),
            ("Boolean", scalar(Boolean)),
            ("Array of Boolean", list(scalar(Boolean))),
            ("Object of Boolean", record(scalar(Boolean))),
            ("Json", scalar(Json)),
            ("Array of Json", list(scalar(Json))),
            ("Object of Json", record(scalar(Json))),
            ("Object", record(scalar(Json))),
            ("Object of Object", record(scalar(Json))),
            ("Object of Array", record(list(scalar(Json)))),
            ("Array of Array", list(list(scalar(Json)))),
            ("Array of Object", list(record(scalar(Json)))),
        ];

        for (text, expected) in table {
            assert_eq!(classify_text(text).await.unwrap(), expected, "type text {text:?}");
        }
    }

    #[tokio::test]
    async fn test_text_is_trimmed() {
        assert_eq!(
            classify_text("  Array of String \n").await.unwrap(),
            list(scalar(String))
        );
    }

    #[tokio::test]
    async fn test_grammar_is_case_sensitive() {
        let err = classify_text("string").await.unwrap_err();
        assert!(matches!(err, ScrapeError::UnlinkedType { .. }));
    }

    #[tokio::test]
    async fn test_named_type_without_link_fails() {
        let err = classify_text("Array of Tag").await.unwrap_err();
        match err {
            ScrapeError::UnlinkedType { text, url } => {
                assert_eq!(text, "Array of Tag");
                assert!(url.ends_with("page.html"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(
            parse_type_text("Array of LoggingConfiguration"),
            TypeText::Named {
                shape: Shape::Array,
                name: "LoggingConfiguration"
            }
        );
        assert_eq!(
            parse_type_text("Object of Rule"),
            TypeText::Named {
                shape: Shape::Object,
                name: "Rule"
            }
        );
        assert_eq!(
            parse_type_text("Demo Retention Policy"),
            TypeText::Named {
                shape: Shape::Bare,
                name: "Policy"
            }
        );
    }

    #[tokio::test]
    async fn test_resolved_name_is_not_fetched_again() {
        let url = Url::parse("https://docs.example.com/reference/page.html").unwrap();
        let mut session = Session::new(url.clone());
        session.mark_resolved(
            "Tag",
            Url::parse("https://docs.example.com/reference/tag.html").unwrap(),
        );
        let source = MemorySource::new();
        let line = TypeLine {
            text: "Object of Tag".to_string(),
            href: Some("tag.html".to_string()),
        };

        let ty = classify(&mut session, &source, &url, &line).await.unwrap();
        assert_eq!(ty, record(TypeDescriptor::Ref("Tag".to_string())));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_nested_page_stored_under_display_name() {
        let url = Url::parse("https://docs.example.com/reference/page.html").unwrap();
        let source = MemorySource::new().with_page(
            "https://docs.example.com/reference/aws-properties-demo-tag.html",
            "<h1>AWS Demo Resource Tag</h1><p>A key-value pair.</p>",
        );
        let mut session = Session::new(url.clone());
        let line = TypeLine {
            text: "Label".to_string(),
            href: Some("aws-properties-demo-tag.html".to_string()),
        };

        let ty = classify(&mut session, &source, &url, &line).await.unwrap();
        assert_eq!(ty, TypeDescriptor::Ref("Label".to_string()));
        let stored = session.get("Label").unwrap();
        assert_eq!(stored.name, "Label");
        assert_eq!(
            stored.link,
            "https://docs.example.com/reference/aws-properties-demo-tag.html"
        );
    }
}
