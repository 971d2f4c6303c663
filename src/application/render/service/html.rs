use std::{borrow::Cow, cell::RefCell, rc::Rc};

use lol_html::{RewriteStrSettings, element, rewrite_str};
use tracing::{debug, warn};
use url::Url;

use crate::application::render::markup::{Element, Node};
use crate::application::render::types::{AudioTrack, Payload, RenderError};

use super::generic::GenericStage;

pub const AUDIO_HEADING: &str = "Extracted audio:";

/// Finds `<audio>` sources in raw HTML so they can be re-hosted as players.
#[derive(Debug, Clone, Default)]
pub(crate) struct AudioExtractor {
    base_url: Option<Url>,
}

/// Outcome of scanning one HTML payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AudioScan {
    pub(crate) audio_elements: usize,
    pub(crate) tracks: Vec<AudioTrack>,
}

impl AudioExtractor {
    pub(crate) fn new(base_url: Option<Url>) -> Self {
        Self { base_url }
    }

    /// Scan `html` for audio elements. Parse failures degrade to an empty scan.
    pub(crate) fn scan(&self, html: &str) -> AudioScan {
        match scan_audio_sources(html) {
            Ok(per_element) => AudioScan {
                audio_elements: per_element.len(),
                tracks: per_element
                    .into_iter()
                    .flatten()
                    .map(|src| AudioTrack::new(self.resolve(src)))
                    .collect(),
            },
            Err(err) => {
                warn!(
                    target = "application::render::html",
                    error = %err,
                    "audio scan failed; rendering without extracted audio"
                );
                AudioScan::default()
            }
        }
    }

    fn resolve(&self, src: String) -> String {
        match &self.base_url {
            Some(base) => base.join(&src).map(String::from).unwrap_or(src),
            None => src,
        }
    }
}

/// Render HTML through the generic stage, then append a player for every audio
/// source embedded in the source payload.
pub(crate) fn render_html(
    generic: &GenericStage<'_>,
    extractor: &AudioExtractor,
    payload: &Payload,
    mime_type: &str,
) -> Result<Element, RenderError> {
    let mut container = generic.render(payload, Some(mime_type))?;

    let scan = extractor.scan(&payload.to_source_string());
    if scan.audio_elements == 0 {
        return Ok(container);
    }

    debug!(
        target = "application::render::html",
        audio_elements = scan.audio_elements,
        tracks = scan.tracks.len(),
        "re-hosting embedded audio"
    );
    container.push_child(Element::new("h2").with_text(AUDIO_HEADING).into());
    for track in scan.tracks {
        container.push_child(Node::AudioPlayer(track));
    }
    Ok(container)
}

/// Source URLs grouped per `<audio>` element, in document order.
fn scan_audio_sources(html: &str) -> Result<Vec<Vec<String>>, RenderError> {
    let sources: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("audio", {
                    let sources = Rc::clone(&sources);
                    move |_el| {
                        sources.borrow_mut().push(Vec::new());
                        Ok(())
                    }
                }),
                element!("audio source", {
                    let sources = Rc::clone(&sources);
                    move |el| {
                        let Some(src) = el.get_attribute("src") else {
                            return Ok(());
                        };
                        let decoded = decode_character_references(src.trim());
                        if !decoded.is_empty()
                            && let Some(current) = sources.borrow_mut().last_mut()
                        {
                            current.push(decoded.into_owned());
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::Document {
        message: err.to_string(),
    })?;

    let sources = Rc::try_unwrap(sources)
        .map(RefCell::into_inner)
        .unwrap_or_else(|rc| rc.borrow().clone());
    Ok(sources)
}

/// Longest reference body considered, e.g. `#x10FFFF` or `quot`.
const MAX_REFERENCE_LEN: usize = 10;

/// Decode the character references a DOM resolves in attribute values: the
/// markup-significant named ones and numeric references. Anything else stays
/// verbatim.
fn decode_character_references(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        rest = &rest[start..];

        let reference = rest[1..]
            .find(';')
            .filter(|end| *end <= MAX_REFERENCE_LEN)
            .and_then(|end| resolve_reference(&rest[1..=end]).map(|ch| (ch, end + 2)));
        match reference {
            Some((ch, consumed)) => {
                decoded.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

fn resolve_reference(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let numeric = body.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code).filter(|ch| *ch != '\0')
        }
    }
}
