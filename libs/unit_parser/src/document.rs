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

//! In-memory model of a unit file: an ordered list of uniquely named sections,
//! each holding an ordered list of options.
//!
//! An option holding [`Value::Multi`] is a multi-valued option: it is written as
//! one `key=value` line per element and every repeated key is collected back
//! into the list on parse.
use crate::error::{NoSectionSnafu, Result};
use snafu::OptionExt;

/// Sections persisted under this prefix are internal, i.e. ignored by the service manager.
pub const INTERNAL_PREFIX: &str = "x-";

/// Snapshot of a document: section name to its (option, value) pairs, in document order.
pub type Mapping = Vec<(String, Vec<(String, Value)>)>;

/// The value of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single, possibly multi-line, string.
    Single(String),
    /// One string per occurrence of the key, in source order.
    Multi(Vec<String>),
    /// A key without delimiter and value.
    Bare,
}

impl Value {
    /// true if the option is multi-valued
    pub fn is_multi(&self) -> bool {
        matches!(self, Value::Multi(_))
    }

    /// The string of a single value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Single(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of a multi-valued option.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::Multi(v) => Some(v),
            _ => None,
        }
    }

    /// Apply `f` to every string held by the value, keeping its shape.
    pub fn try_map<F, E>(&self, mut f: F) -> std::result::Result<Value, E>
    where
        F: FnMut(&str) -> std::result::Result<String, E>,
    {
        Ok(match self {
            Value::Single(s) => Value::Single(f(s)?),
            Value::Multi(v) => Value::Multi(
                v.iter()
                    .map(|s| f(s))
                    .collect::<std::result::Result<Vec<_>, E>>()?,
            ),
            Value::Bare => Value::Bare,
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Single(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Single(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Multi(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::Multi(v.into_iter().map(String::from).collect())
    }
}

impl<T: Into<String>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(s) => Value::Single(s.into()),
            None => Value::Bare,
        }
    }
}

/// A named group of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    options: Vec<(String, Value)>,
    internal: bool,
}

impl Section {
    /// Create an empty, external section.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Section {
            name: name.into(),
            options: Vec::new(),
            internal: false,
        }
    }

    ///
    pub fn name(&self) -> &str {
        &self.name
    }

    /// true if the section is ignored by the service manager
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    ///
    pub fn set_internal(&mut self, internal: bool) {
        self.internal = internal;
    }

    /// Options in insertion order.
    pub fn options(&self) -> &[(String, Value)] {
        &self.options
    }

    ///
    pub fn get(&self, option: &str) -> Option<&Value> {
        self.options
            .iter()
            .find(|(k, _)| k == option)
            .map(|(_, v)| v)
    }

    ///
    pub fn contains(&self, option: &str) -> bool {
        self.get(option).is_some()
    }

    pub(crate) fn get_mut(&mut self, option: &str) -> Option<&mut Value> {
        self.options
            .iter_mut()
            .find(|(k, _)| k == option)
            .map(|(_, v)| v)
    }

    /// Take the value out while keeping the option's position.
    fn take(&mut self, option: &str) -> Option<Value> {
        self.get_mut(option)
            .map(|v| std::mem::replace(v, Value::Bare))
    }

    /// Set an option, keeping its position if it already exists.
    pub fn set<K: Into<String>, V: Into<Value>>(&mut self, option: K, value: V) {
        let option = option.into();
        let value = value.into();
        match self.get_mut(&option) {
            Some(v) => *v = value,
            None => self.options.push((option, value)),
        }
    }

    /// Remove an option and return its value.
    pub fn remove(&mut self, option: &str) -> Option<Value> {
        let pos = self.options.iter().position(|(k, _)| k == option)?;
        Some(self.options.remove(pos).1)
    }

    /// Set every option of `other` on this section.
    fn merge(&mut self, other: Section) {
        for (k, v) in other.options {
            self.set(k, v);
        }
    }

    fn renamed(&self, name: String, internal: bool) -> Section {
        Section {
            name,
            options: self.options.clone(),
            internal,
        }
    }
}

/// An ordered sequence of uniquely named sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<Section>,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    ///
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name()).collect()
    }

    ///
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    ///
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    ///
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    fn section_or_err(&mut self, name: &str) -> Result<&mut Section> {
        self.sections
            .iter_mut()
            .find(|s| s.name == name)
            .context(NoSectionSnafu { section: name })
    }

    /// Add a section, or return the existing one with that name.
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        let pos = match self.sections.iter().position(|s| s.name == name) {
            Some(pos) => pos,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos]
    }

    /// Remove a section object from the document.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let pos = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(pos))
    }

    /// Remove a section and return its options.
    ///
    /// Only the content of the section is returned, not the section itself.
    pub fn pop_section(&mut self, name: &str) -> Result<Vec<(String, Value)>> {
        let section = self
            .remove_section(name)
            .context(NoSectionSnafu { section: name })?;
        Ok(section.options)
    }

    ///
    pub fn get(&self, section: &str, option: &str) -> Option<&Value> {
        self.section(section)?.get(option)
    }

    /// Set the value of an option in an existing section.
    ///
    /// With `multioption` a single value is stored as a one-element list, so the
    /// option is written as repeated keys from then on.
    pub fn set<V: Into<Value>>(
        &mut self,
        section: &str,
        option: &str,
        value: V,
        multioption: bool,
    ) -> Result<()> {
        let value: Value = value.into();
        let value = match (value, multioption) {
            (Value::Single(s), true) => Value::Multi(vec![s]),
            (v, _) => v,
        };
        self.section_or_err(section)?.set(option, value);
        Ok(())
    }

    /// Add another value to an option, making it multi-valued.
    pub fn append<S: Into<String>>(&mut self, section: &str, option: &str, value: S) -> Result<()> {
        let value = value.into();
        let sect = self.section_or_err(section)?;
        let appended = match sect.take(option) {
            Some(Value::Multi(mut list)) => {
                list.push(value);
                list
            }
            Some(Value::Single(first)) => vec![first, value],
            Some(Value::Bare) | None => vec![value],
        };
        sect.set(option, Value::Multi(appended));
        Ok(())
    }

    /// true if the option exists and holds a list
    pub fn is_multi(&self, section: &str, option: &str) -> bool {
        self.get(section, option).map_or(false, Value::is_multi)
    }

    /// Mark a section as ignored by the service manager.
    pub fn mark_internal(&mut self, section: &str) -> Result<()> {
        self.section_or_err(section)?.internal = true;
        Ok(())
    }

    /// Mark a section as read by the service manager. This is the default.
    pub fn mark_external(&mut self, section: &str) -> Result<()> {
        self.section_or_err(section)?.internal = false;
        Ok(())
    }

    /// Non-existing sections are not internal.
    pub fn is_internal(&self, section: &str) -> bool {
        self.section(section).map_or(false, Section::is_internal)
    }

    /// Snapshot of all sections and options.
    pub fn to_mapping(&self) -> Mapping {
        self.sections
            .iter()
            .map(|s| (s.name.clone(), s.options.clone()))
            .collect()
    }

    /// Add a section, merging it into an existing section with the same name.
    fn insert_section(&mut self, section: Section) {
        match self.section_mut(&section.name) {
            Some(existing) => {
                existing.internal = section.internal;
                existing.merge(section);
            }
            None => self.sections.push(section),
        }
    }

    /// A copy of the document as it is persisted: every internal section `S` is
    /// renamed `x-S` and no longer marked internal.
    pub fn externalize(&self) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for s in &self.sections {
            if s.internal {
                doc.insert_section(s.renamed(format!("{}{}", INTERNAL_PREFIX, s.name), false));
            } else {
                doc.insert_section(s.clone());
            }
        }
        doc
    }

    /// A copy of a persisted document: every section `x-S` is renamed `S` and
    /// marked internal.
    pub fn internalize(&self) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for s in &self.sections {
            match s.name.strip_prefix(INTERNAL_PREFIX) {
                Some(name) => doc.insert_section(s.renamed(name.to_string(), true)),
                None => doc.insert_section(s.clone()),
            }
        }
        doc
    }
}
