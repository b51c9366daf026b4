//! AngelCode BMFont text descriptors
//!
//! Only the text flavour of the format is read. Each line is a tag followed
//! by `key=value` pairs, where values may be quoted:
//!
//! ```text
//! common lineHeight=32 base=26 scaleW=256 scaleH=256 pages=1
//! page id=0 file="font_0.png"
//! char id=65 x=10 y=0 width=18 height=22 xoffset=0 yoffset=4 xadvance=18 page=0 chnl=15
//! ```

use std::collections::HashMap;

use crate::foundation::math::Rect;

use super::font_atlas::{FontError, FontResult, GlyphInfo};

/// The parts of a descriptor an atlas needs
#[derive(Debug, Clone, PartialEq)]
pub struct BmFontDescriptor {
    /// Line height in pixels, used as the baseline size
    pub line_height: u32,
    /// Page image files, indexed by page id
    pub pages: Vec<String>,
    /// Glyphs in file order
    pub glyphs: Vec<GlyphInfo>,
}

impl BmFontDescriptor {
    /// Parse a text descriptor
    pub fn parse(text: &str) -> FontResult<Self> {
        let mut line_height = None;
        let mut pages: Vec<(u32, String)> = Vec::new();
        let mut glyphs = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let mut tokens = tokenize(line);
            let Some(tag) = tokens.next() else {
                continue;
            };
            let fields: HashMap<&str, &str> = tokens.filter_map(key_value).collect();
            let field = |key: &str| Field {
                key: key.to_string(),
                value: fields.get(key).copied(),
                line: line_no,
            };

            match tag {
                "common" => line_height = Some(field("lineHeight").number::<u32>()?),
                "page" => pages.push((field("id").number()?, field("file").text()?.to_string())),
                "char" => {
                    let id: u32 = field("id").number()?;
                    let codepoint = char::from_u32(id).ok_or_else(|| FontError::Parse {
                        line: line_no,
                        reason: format!("invalid codepoint {id}"),
                    })?;
                    glyphs.push(GlyphInfo {
                        codepoint,
                        source_rect: Rect::new(
                            field("x").number()?,
                            field("y").number()?,
                            field("width").number()?,
                            field("height").number()?,
                        ),
                        offset_x: field("xoffset").number()?,
                        offset_y: field("yoffset").number()?,
                        advance_x: field("xadvance").number()?,
                    });
                }
                _ => {}
            }
        }

        let line_height = line_height.ok_or_else(|| FontError::Parse {
            line: 0,
            reason: "missing common line".to_string(),
        })?;
        pages.sort_by_key(|(id, _)| *id);

        Ok(Self {
            line_height,
            pages: pages.into_iter().map(|(_, file)| file).collect(),
            glyphs,
        })
    }
}

struct Field<'a> {
    key: String,
    value: Option<&'a str>,
    line: usize,
}

impl<'a> Field<'a> {
    fn text(&self) -> FontResult<&'a str> {
        self.value.ok_or_else(|| FontError::Parse {
            line: self.line,
            reason: format!("missing {}", self.key),
        })
    }

    fn number<T: std::str::FromStr>(&self) -> FontResult<T> {
        let raw = self.text()?;
        raw.parse().map_err(|_| FontError::Parse {
            line: self.line,
            reason: format!("{} is not a number: {raw}", self.key),
        })
    }
}

/// Split on whitespace outside of double quotes
fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    let mut rest = line.trim_start();
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let mut in_quotes = false;
        let end = rest
            .char_indices()
            .find(|&(_, c)| {
                if c == '"' {
                    in_quotes = !in_quotes;
                }
                c.is_whitespace() && !in_quotes
            })
            .map_or(rest.len(), |(i, _)| i);

        let token = &rest[..end];
        rest = rest[end..].trim_start();
        Some(token)
    })
}

/// Split `key=value`, dropping quotes around the value
fn key_value(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once('=')?;
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((key, value))
}
