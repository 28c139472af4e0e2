use roxmltree::{Document, Node, ParsingOptions};

use crate::error::MalformedDocument;
use crate::markup;
use crate::record::DictionaryRecord;

const ID_ATTR: &str = "id";
const CHECKSUM_ATTR: &str = "md5hash";
const TITLE_WORD_TAG: &str = "titleWord";
const TITLE_WORD_NORMALIZED_TAG: &str = "titleWordNormalized";
const BODY_TAG: &str = "body";
const PARAGRAPH_TAG: &str = "paragraph";
const ARTICLE_TAG: &str = "article";

/// Parse one XML entry document into a candidate record.
///
/// Only the identifier is mandatory. Missing title or body elements, missing
/// checksum attributes and empty paragraphs all fall back to empty strings.
/// A document type declaration is accepted and its internal entities expanded.
pub fn extract(xml: &str) -> Result<DictionaryRecord, MalformedDocument> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    let root = doc.root_element();

    let mut record = DictionaryRecord::new(parse_id(root)?);

    (record.title_word, record.title_word_checksum) = text_field(root, TITLE_WORD_TAG);
    (
        record.title_word_normalized,
        record.title_word_normalized_checksum,
    ) = text_field(root, TITLE_WORD_NORMALIZED_TAG);
    (record.body_html, record.body_checksum) = body(root);

    Ok(record)
}

fn parse_id(root: Node<'_, '_>) -> Result<u64, MalformedDocument> {
    let raw = root
        .attribute(ID_ATTR)
        .ok_or(MalformedDocument::MissingId)?;

    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(MalformedDocument::InvalidId(raw.to_string())),
    }
}

/// First element named `tag` in document order, root included
fn find<'a, 'input>(root: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    root.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

fn checksum(node: Node<'_, '_>) -> String {
    node.attribute(CHECKSUM_ATTR).unwrap_or_default().to_string()
}

fn text_field(root: Node<'_, '_>, tag: &str) -> (String, String) {
    match find(root, tag) {
        Some(node) => (node.text().unwrap_or_default().to_string(), checksum(node)),
        None => {
            tracing::debug!("no <{tag}> element, defaulting to empty");
            (String::new(), String::new())
        }
    }
}

fn body(root: Node<'_, '_>) -> (String, String) {
    let Some(body) = find(root, BODY_TAG) else {
        tracing::debug!("no <{BODY_TAG}> element, body left empty");
        return (String::new(), String::new());
    };

    let paragraphs: Vec<String> = body
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == PARAGRAPH_TAG)
        .map(|p| markup::render(p.text().unwrap_or_default()))
        .collect();

    let html = format!(
        "<{ARTICLE_TAG}>\n{}\n</{ARTICLE_TAG}>",
        paragraphs.join("\n")
    );
    (html, checksum(body))
}
