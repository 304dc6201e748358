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

//! Interfaces related to the unit name.
//!
//! Take `foo@.service` for example, "foo" is its base name, "@" marks it as a
//! template and "service" is its type. `foo@bar.service` is an instance of it.
//! A base name holding both "{" and "}" is the name of a batch of units.
use crate::error::{Error, Result};
use crate::{UNIT_SUFFIX_SEPARATOR, UNIT_TEMPLATE_MARKER};
use std::fmt;
use std::str::FromStr;

/// The kinds of unit this crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    ///
    UnitTarget,
    ///
    UnitService,
    ///
    UnitTimer,
    ///
    UnitPath,
}

impl UnitType {
    /// The file suffix of the type, without the dot.
    pub fn suffix(&self) -> &'static str {
        match self {
            UnitType::UnitTarget => "target",
            UnitType::UnitService => "service",
            UnitType::UnitTimer => "timer",
            UnitType::UnitPath => "path",
        }
    }
}

impl Default for UnitType {
    fn default() -> Self {
        UnitType::UnitService
    }
}

impl FromStr for UnitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let ret = match s {
            "target" => UnitType::UnitTarget,
            "service" => UnitType::UnitService,
            "timer" => UnitType::UnitTimer,
            "path" => UnitType::UnitPath,
            _ => {
                return Err(Error::InvalidName {
                    name: s.to_string(),
                    what: "unsupported unit type".to_string(),
                })
            }
        };
        Ok(ret)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A resolved unit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitName {
    base: String,
    unit_type: UnitType,
    template: bool,
    batched: bool,
}

fn invalid(name: &str, what: &str) -> Error {
    Error::InvalidName {
        name: name.to_string(),
        what: what.to_string(),
    }
}

/// A base name holding both "{" and "}" names a batch of units.
pub fn base_is_batched(base: &str) -> bool {
    base.contains('{') && base.contains('}')
}

impl UnitName {
    /// Create a unit name from its parts.
    pub fn new<S: Into<String>>(base: S, unit_type: UnitType, template: bool) -> Self {
        let base = base.into();
        let batched = base_is_batched(&base);
        UnitName {
            base,
            unit_type,
            template,
            batched,
        }
    }

    /// Resolve a raw unit name such as `foo.service`, `foo@.timer` or `foo-{tag}`.
    ///
    /// The suffix, if present, overrides `default_type`; without both the unit is a service.
    pub fn parse(name: &str, default_type: Option<UnitType>) -> Result<Self> {
        let parts: Vec<&str> = name.split(UNIT_SUFFIX_SEPARATOR).collect();
        let (first_name, unit_type) = match parts.as_slice() {
            [first] => (*first, default_type.unwrap_or_default()),
            [first, suffix] => (*first, suffix.parse::<UnitType>()?),
            _ => return Err(invalid(name, "only a single \".\" is permitted")),
        };

        let (base, template) = match first_name.split_once(UNIT_TEMPLATE_MARKER) {
            None => (first_name, false),
            Some((_, rest)) if rest.contains(UNIT_TEMPLATE_MARKER) => {
                return Err(invalid(name, "only a single \"@\" is permitted"))
            }
            Some((base, "")) => (base, true),
            Some(_) => {
                return Err(invalid(
                    name,
                    "\"@\" is only permitted at the end of the name or before the suffix",
                ))
            }
        };

        if base.is_empty() {
            return Err(invalid(name, "the base name is empty"));
        }

        Ok(UnitName::new(base, unit_type, template))
    }

    /// The name without template marker and suffix.
    pub fn base(&self) -> &str {
        &self.base
    }

    ///
    pub fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    ///
    pub fn set_unit_type(&mut self, unit_type: UnitType) {
        self.unit_type = unit_type;
    }

    ///
    pub fn is_template(&self) -> bool {
        self.template
    }

    ///
    pub fn is_batched(&self) -> bool {
        self.batched
    }

    /// The same name with another base, e.g. after substituting batch variables.
    pub fn with_base<S: Into<String>>(&self, base: S) -> UnitName {
        UnitName::new(base, self.unit_type, self.template)
    }

    /// File name of the unit, i.e. `foo.service` or `foo@.service` for a template.
    pub fn full_name(&self) -> String {
        self.instance_name("")
    }

    /// File name of a concrete instantiation, i.e. `foo@bar.service`.
    pub fn instance_name(&self, instance: &str) -> String {
        let marker = if self.template { "@" } else { "" };
        format!(
            "{}{}{}{}{}",
            self.base, marker, instance, UNIT_SUFFIX_SEPARATOR, self.unit_type
        )
    }
}

impl FromStr for UnitName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        UnitName::parse(s, None)
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
