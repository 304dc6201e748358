// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! Line oriented parser of the unit file dialect.
//!
//! Each section contains a header, indicated by a name in square brackets, plus
//! key/value options delimited by `=` or `:`. Values can span multiple lines as
//! long as the following lines are indented deeper than the first line of the
//! value. Unlike a plain ini parser a key repeated within a section does not
//! overwrite the previous value: every occurrence is collected into an ordered
//! list and the option becomes multi-valued.
use crate::document::{ConfigDocument, Value};
use crate::error::{Error, ParsingError, Result};
use nom::{
    bytes::complete::{is_not, take_till},
    character::complete::{char, one_of},
    combinator::{opt, rest},
    sequence::{delimited, preceded},
    IResult,
};
use std::collections::HashSet;

/// Dialect settings of a [UnitParser].
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Fail on a section or an option repeated within one source.
    pub strict: bool,
    /// Blank lines inside a value are kept as empty continuation lines.
    pub empty_lines_in_values: bool,
    /// Accept keys without delimiter and value.
    pub allow_no_value: bool,
    /// Prefixes of full line comments.
    pub comment_prefixes: Vec<String>,
    /// Prefixes of comments following content on the same line.
    pub inline_comment_prefixes: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            strict: false,
            empty_lines_in_values: true,
            allow_no_value: true,
            comment_prefixes: vec!["#".to_string(), ";".to_string()],
            inline_comment_prefixes: Vec::new(),
        }
    }
}

/// Parse `text` with the default dialect settings.
pub fn parse(text: &str) -> Result<ConfigDocument> {
    UnitParser::default().parse(text)
}

struct PendingOption {
    key: String,
    // one entry per occurrence of the key, each holding its physical lines; None for a bare key
    occurrences: Option<Vec<Vec<String>>>,
    multi: bool,
}

impl PendingOption {
    fn into_value(self) -> Value {
        let occurrences = match self.occurrences {
            None => return Value::Bare,
            Some(o) => o,
        };
        let mut joined: Vec<String> = occurrences
            .into_iter()
            .map(|lines| lines.join("\n").trim_end().to_string())
            .collect();
        if self.multi {
            Value::Multi(joined)
        } else {
            Value::Single(joined.pop().unwrap_or_default())
        }
    }
}

struct PendingSection {
    name: String,
    options: Vec<PendingOption>,
}

/// Parser of the unit file dialect.
#[derive(Debug, Clone, Default)]
pub struct UnitParser {
    options: ParserOptions,
}

impl UnitParser {
    ///
    pub fn new(options: ParserOptions) -> Self {
        UnitParser { options }
    }

    ///
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a whole source into a new document.
    ///
    /// Malformed option lines do not stop the parse: they are collected and
    /// reported together once the last line has been consumed.
    pub fn parse(&self, text: &str) -> Result<ConfigDocument> {
        let mut sections: Vec<PendingSection> = Vec::new();
        let mut seen_sections: HashSet<String> = HashSet::new();
        let mut seen_options: HashSet<(String, String)> = HashSet::new();
        let mut errors: Vec<ParsingError> = Vec::new();

        let mut cursect: Option<usize> = None;
        let mut curopt: Option<usize> = None;
        let mut indent_level = 0;

        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let comment_start = self.comment_start(line);
            let value = match comment_start {
                Some(pos) => &line[..pos],
                None => line,
            }
            .trim();

            if value.is_empty() {
                if self.options.empty_lines_in_values {
                    // comment lines are not part of a value
                    if comment_start.is_none() {
                        if let Some(lines) = last_lines(&mut sections, cursect, curopt) {
                            lines.push(String::new());
                        }
                    }
                } else {
                    indent_level = usize::MAX;
                }
                continue;
            }

            let cur_indent_level = line.len() - line.trim_start().len();
            if cursect.is_some() && curopt.is_some() && cur_indent_level > indent_level {
                match last_lines(&mut sections, cursect, curopt) {
                    Some(lines) => lines.push(value.to_string()),
                    None => errors.push(ParsingError {
                        lineno,
                        line: line.to_string(),
                    }),
                }
                continue;
            }
            indent_level = cur_indent_level;

            if let Ok((_, name)) = section_header(value) {
                if self.options.strict && seen_sections.contains(name) {
                    return Err(Error::DuplicateSection {
                        section: name.to_string(),
                        lineno,
                    });
                }
                seen_sections.insert(name.to_string());
                let pos = match sections.iter().position(|s| s.name == name) {
                    Some(pos) => pos,
                    None => {
                        sections.push(PendingSection {
                            name: name.to_string(),
                            options: Vec::new(),
                        });
                        sections.len() - 1
                    }
                };
                cursect = Some(pos);
                // sections can't start with a continuation line
                curopt = None;
                continue;
            }

            let sect = match cursect.and_then(|pos| sections.get_mut(pos)) {
                Some(sect) => sect,
                None => {
                    return Err(Error::MissingSectionHeader {
                        lineno,
                        line: line.to_string(),
                    })
                }
            };

            let (key, optval) = match option_line(value) {
                Ok((_, (key, optval)))
                    if !key.is_empty() && (optval.is_some() || self.options.allow_no_value) =>
                {
                    (key, optval)
                }
                _ => {
                    log::debug!("Malformed line {}: {:?}", lineno, line);
                    errors.push(ParsingError {
                        lineno,
                        line: line.to_string(),
                    });
                    continue;
                }
            };

            if self.options.strict
                && !seen_options.insert((sect.name.clone(), key.to_string()))
            {
                return Err(Error::DuplicateOption {
                    section: sect.name.clone(),
                    option: key.to_string(),
                    lineno,
                });
            }

            curopt = Some(add_occurrence(sect, key, optval));
        }

        if !errors.is_empty() {
            return Err(Error::Parse { errors });
        }

        let mut doc = ConfigDocument::new();
        for pending in sections {
            let section = doc.add_section(&pending.name);
            for option in pending.options {
                let key = option.key.clone();
                section.set(key, option.into_value());
            }
        }
        Ok(doc)
    }

    /// Position of the comment on a line, if any.
    ///
    /// An inline comment prefix counts only at the start of the line or after whitespace.
    fn comment_start(&self, line: &str) -> Option<usize> {
        let trimmed = line.trim();
        if self
            .options
            .comment_prefixes
            .iter()
            .any(|p| trimmed.starts_with(p.as_str()))
        {
            return Some(0);
        }

        self.options
            .inline_comment_prefixes
            .iter()
            .filter_map(|p| {
                line.match_indices(p.as_str()).map(|(i, _)| i).find(|&i| {
                    i == 0
                        || line[..i]
                            .chars()
                            .next_back()
                            .map_or(false, char::is_whitespace)
                })
            })
            .min()
    }
}

/// Lines of the current occurrence of the current option, None for a bare key.
fn last_lines(
    sections: &mut [PendingSection],
    cursect: Option<usize>,
    curopt: Option<usize>,
) -> Option<&mut Vec<String>> {
    sections
        .get_mut(cursect?)?
        .options
        .get_mut(curopt?)?
        .occurrences
        .as_mut()?
        .last_mut()
}

/// Record one occurrence of `key`, returning the option's position in the section.
fn add_occurrence(sect: &mut PendingSection, key: &str, optval: Option<&str>) -> usize {
    let pos = sect.options.iter().position(|o| o.key == key);
    match (pos, optval) {
        (Some(pos), Some(v)) => {
            let option = &mut sect.options[pos];
            option.multi = true;
            option
                .occurrences
                .get_or_insert_with(Vec::new)
                .push(vec![v.to_string()]);
            pos
        }
        (Some(pos), None) => {
            let option = &mut sect.options[pos];
            option.occurrences = None;
            option.multi = false;
            pos
        }
        (None, optval) => {
            sect.options.push(PendingOption {
                key: key.to_string(),
                occurrences: optval.map(|v| vec![vec![v.to_string()]]),
                multi: false,
            });
            sect.options.len() - 1
        }
    }
}

fn section_header(i: &str) -> IResult<&str, &str> {
    delimited(char('['), is_not("]"), char(']'))(i)
}

// returns (key, value), value is None if the line holds no delimiter
fn option_line(i: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (i, key) = take_till(|c| c == '=' || c == ':')(i)?;
    let (i, value) = opt(preceded(one_of("=:"), rest))(i)?;
    Ok((i, (key.trim_end(), value.map(str::trim))))
}
