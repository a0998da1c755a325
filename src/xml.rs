//! Minimal XML ingestion turning the article format of the external
//! interface into a `Document`.
//!
//! Reference upstream: `src/summarizer/article.h` (format description via
//! `src/example.cc`'s fixture documents). No schema validation or XPath;
//! a single linear pass over the `quick_xml` event stream tracking the
//! handful of elements the format defines.
//!
//! Expected shape:
//! ```xml
//! <article id="...">
//!   <title>...</title>
//!   <body><item><text><p>
//!     <sentence>
//!       <plainText>...</plainText>
//!       <tokens><token pos="NN">cat</token>...</tokens>
//!     </sentence>
//!   </p></text></item></body>
//! </article>
//! ```

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::document::{Document, Sentence};
use crate::error::{Result, SummarizerError};

/// Parse one article's XML `content` into a `Document`.
pub fn parse_article(content: &str) -> Result<Document> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut article_id: Option<String> = None;
    let mut title: Option<String> = None;
    let mut sentences = Vec::new();

    let mut in_title = false;
    let mut in_plain_text = false;
    let mut in_token = false;

    let mut current_plain_text: Option<String> = None;
    let mut current_tokens: Vec<String> = Vec::new();
    let mut current_pos_tags: Vec<String> = Vec::new();
    let mut current_pos: Option<String> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            SummarizerError::Input(format!("XML parse error: {e}"))
        })?;
        match event {
            Event::Eof => break,
            Event::Start(tag) => {
                let name = tag.name();
                let local = name.as_ref();
                match local {
                    b"article" => {
                        for attr in tag.attributes().flatten() {
                            if attr.key.as_ref() == b"id" {
                                article_id = Some(
                                    attr.unescape_value()
                                        .map_err(|e| {
                                            SummarizerError::Input(format!("bad article id: {e}"))
                                        })?
                                        .into_owned(),
                                );
                            }
                        }
                    }
                    b"title" => in_title = true,
                    b"sentence" => {
                        current_plain_text = None;
                        current_tokens.clear();
                        current_pos_tags.clear();
                    }
                    b"plainText" => in_plain_text = true,
                    b"token" => {
                        in_token = true;
                        current_pos = None;
                        for attr in tag.attributes().flatten() {
                            if attr.key.as_ref() == b"pos" {
                                current_pos = Some(
                                    attr.unescape_value()
                                        .map_err(|e| {
                                            SummarizerError::Input(format!("bad token pos: {e}"))
                                        })?
                                        .into_owned(),
                                );
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(text) => {
                let unescaped = text.unescape().map_err(|e| {
                    SummarizerError::Input(format!("XML text decode error: {e}"))
                })?;
                if in_title {
                    title = Some(unescaped.into_owned());
                } else if in_plain_text {
                    current_plain_text = Some(unescaped.into_owned());
                } else if in_token {
                    current_tokens.push(unescaped.into_owned());
                    current_pos_tags.push(current_pos.clone().unwrap_or_default());
                }
            }
            Event::End(tag) => match tag.name().as_ref() {
                b"title" => in_title = false,
                b"plainText" => in_plain_text = false,
                b"token" => in_token = false,
                b"sentence" => {
                    let mut sentence = Sentence::new(std::mem::take(&mut current_tokens));
                    if !current_pos_tags.iter().all(String::is_empty) {
                        sentence = sentence.with_pos_tags(std::mem::take(&mut current_pos_tags));
                    } else {
                        current_pos_tags.clear();
                    }
                    if let Some(raw) = current_plain_text.take() {
                        sentence = sentence.with_raw(raw);
                    }
                    sentences.push(sentence);
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    if sentences.is_empty() {
        tracing::warn!("article XML parsed with zero sentences");
        return Err(SummarizerError::Input(
            "article contains no sentences".to_string(),
        ));
    }

    let mut document = Document::new(sentences);
    if let Some(id) = article_id {
        document = document.with_id(id);
    }
    if let Some(title) = title {
        document = document.with_title(title);
    }
    Ok(document)
}
