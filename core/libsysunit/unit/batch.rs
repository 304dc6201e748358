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

//! Expansion of a batch of units.
//!
//! A batch is one unit definition holding `{var}` placeholders in its base name
//! and option values. Every variable maps to a sequence of values; the i-th unit
//! of the batch is produced by substituting the i-th value of every variable.
//! Literal braces are written as `{{` and `}}`.
use crate::error::*;
use basic::unit_name::UnitName;
use std::collections::{BTreeMap, HashMap};
use unit_parser::prelude::ConfigDocument;

/// Named sequences of values, substituted index by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchVariables {
    vars: BTreeMap<String, Vec<String>>,
}

impl BatchVariables {
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sequence of values of a variable, replacing the previous one.
    pub fn set<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vars.insert(
            name.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
    }

    ///
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.vars.get(name).map(|v| v.as_slice())
    }

    ///
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The number of units in the batch.
    ///
    /// Every sequence must hold the same, non-zero number of values.
    pub fn count(&self) -> Result<usize> {
        let mut iter = self.vars.iter();
        let expected = match iter.next() {
            None => return Err(Error::MissingBatchVariables),
            Some((_, values)) => values.len(),
        };
        for (name, values) in iter {
            if values.len() != expected {
                return Err(Error::BatchSizeMismatch {
                    name: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }
        if expected == 0 {
            return Err(Error::MissingBatchVariables);
        }
        Ok(expected)
    }

    /// The values of the index-th unit of the batch.
    fn row(&self, index: usize) -> HashMap<&str, &str> {
        self.vars
            .iter()
            .filter_map(|(name, values)| Some((name.as_str(), values.get(index)?.as_str())))
            .collect()
    }
}

/// Replace every `{name}` of `text` with its value in `vars`.
///
/// Only the given mapping is consulted: a name missing from it is an error.
pub fn substitute(text: &str, vars: &HashMap<&str, &str>) -> Result<String> {
    let mut ret = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                ret.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(Error::PlaceholderSyntax {
                                value: text.to_string(),
                            })
                        }
                        Some(c) => name.push(c),
                    }
                }
                match vars.get(name.as_str()) {
                    Some(v) => ret.push_str(v),
                    None => {
                        return Err(Error::PlaceholderSubstitution {
                            value: text.to_string(),
                            name,
                        })
                    }
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                ret.push('}');
            }
            '}' => {
                return Err(Error::PlaceholderSyntax {
                    value: text.to_string(),
                })
            }
            c => ret.push(c),
        }
    }

    Ok(ret)
}

/// A copy of `doc` with the placeholders of every option value substituted.
fn format_document(doc: &ConfigDocument, vars: &HashMap<&str, &str>) -> Result<ConfigDocument> {
    let mut formatted = doc.clone();
    for section in doc.sections() {
        for (key, value) in section.options() {
            let value = value.try_map(|s| substitute(s, vars))?;
            if let Some(target) = formatted.section_mut(section.name()) {
                target.set(key.as_str(), value);
            }
        }
    }
    Ok(formatted)
}

/// The full names of the units of a batch, in index order.
pub fn expand_names(name: &UnitName, vars: &BatchVariables) -> Result<Vec<String>> {
    let count = vars.count()?;
    (0..count)
        .map(|i| {
            let base = substitute(name.base(), &vars.row(i))?;
            Ok(name.with_base(base).full_name())
        })
        .collect()
}

/// Expand a batch into (full name, document) pairs, in index order.
///
/// Nothing is returned unless every unit of the batch could be expanded.
pub fn expand(
    name: &UnitName,
    doc: &ConfigDocument,
    vars: &BatchVariables,
) -> Result<Vec<(String, ConfigDocument)>> {
    let count = vars.count()?;
    (0..count)
        .map(|i| {
            let row = vars.row(i);
            let base = substitute(name.base(), &row)?;
            let full_name = name.with_base(base).full_name();
            Ok((full_name, format_document(doc, &row)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use basic::unit_name::UnitType;
    use unit_parser::prelude::Value;

    fn vars(pairs: &[(&str, &[&str])]) -> BatchVariables {
        let mut vars = BatchVariables::new();
        for (name, values) in pairs {
            vars.set(name, values.iter().copied());
        }
        vars
    }

    #[test]
    fn test_substitute() {
        let map: HashMap<&str, &str> = [("tag", "a"), ("n", "1")].into_iter().collect();
        assert_eq!(substitute("hello {tag}-{n}", &map).unwrap(), "hello a-1");
        assert_eq!(substitute("${{HOME}}/{tag}", &map).unwrap(), "${HOME}/a");
        assert_eq!(substitute("plain", &map).unwrap(), "plain");
    }

    #[test]
    fn test_substitute_unknown_name() {
        let map: HashMap<&str, &str> = [("tag", "a")].into_iter().collect();
        match substitute("{tag} {HOME}", &map) {
            Err(Error::PlaceholderSubstitution { name, .. }) => assert_eq!(name, "HOME"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            substitute("{}", &map),
            Err(Error::PlaceholderSubstitution { .. })
        ));
    }

    #[test]
    fn test_substitute_unbalanced() {
        let map: HashMap<&str, &str> = [("tag", "a")].into_iter().collect();
        for text in ["{tag", "tag}", "{ta{g}"] {
            assert!(matches!(
                substitute(text, &map),
                Err(Error::PlaceholderSyntax { .. })
            ));
        }
    }

    #[test]
    fn test_count() {
        assert!(matches!(
            BatchVariables::new().count(),
            Err(Error::MissingBatchVariables)
        ));
        assert!(matches!(
            vars(&[("a", &[])]).count(),
            Err(Error::MissingBatchVariables)
        ));
        assert!(matches!(
            vars(&[("a", &["1", "2"]), ("b", &["1"])]).count(),
            Err(Error::BatchSizeMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        assert_eq!(vars(&[("a", &["1", "2"]), ("b", &["x", "y"])]).count().unwrap(), 2);
    }

    #[test]
    fn test_expand_is_index_aligned() {
        let name = UnitName::parse("svc-{tag}.service", None).unwrap();
        let mut doc = ConfigDocument::new();
        doc.add_section("Unit").set("Description", "hello {tag}");
        doc.add_section("Service")
            .set("Environment", vec!["TAG={tag}", "PORT={port}"]);

        let batch = vars(&[("tag", &["a", "b"]), ("port", &["80", "81"])]);
        let units = expand(&name, &doc, &batch).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].0, "svc-a.service");
        assert_eq!(units[1].0, "svc-b.service");
        assert_eq!(
            units[0].1.get("Unit", "Description"),
            Some(&Value::from("hello a"))
        );
        assert_eq!(
            units[1].1.get("Unit", "Description"),
            Some(&Value::from("hello b"))
        );
        assert_eq!(
            units[1].1.get("Service", "Environment"),
            Some(&Value::from(vec!["TAG=b", "PORT=81"]))
        );
        // the source document is left untouched
        assert_eq!(
            doc.get("Unit", "Description"),
            Some(&Value::from("hello {tag}"))
        );
    }

    #[test]
    fn test_expand_template_batch() {
        let name = UnitName::parse("worker-{n}@", Some(UnitType::UnitService)).unwrap();
        let names = expand_names(&name, &vars(&[("n", &["1", "2", "3"])])).unwrap();
        assert_eq!(
            names,
            vec![
                "worker-1@.service",
                "worker-2@.service",
                "worker-3@.service"
            ]
        );
    }

    #[test]
    fn test_expand_fails_on_undeclared_variable() {
        let name = UnitName::parse("svc-{tag}.service", None).unwrap();
        let mut doc = ConfigDocument::new();
        doc.add_section("Service").set("ExecStart", "/bin/run {other}");
        let ret = expand(&name, &doc, &vars(&[("tag", &["a"])]));
        assert!(matches!(ret, Err(Error::PlaceholderSubstitution { .. })));
    }
}
