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

//! A unit and the file(s) it is persisted to.
use super::batch::{self, BatchVariables};
use super::spec::UnitSpecification;
use crate::config::SysunitConfig;
use crate::error::*;
use crate::exec::{ControlOutput, UnitController};
use basic::unit_name::{UnitName, UnitType};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use unit_parser::prelude::{ConfigDocument, Mapping, ParserOptions, UnitParser, Value, INTERNAL_PREFIX};

/// A named unit of the service manager.
///
/// A unit whose base name holds `{var}` placeholders is a batch: it stands for
/// one file per index of its batch variables, see [`SystemUnit::set_batch_var`].
#[derive(Debug, Clone)]
pub struct SystemUnit {
    name: Option<UnitName>,
    spec: UnitSpecification,
    path: PathBuf,
    batch_vars: BatchVariables,
    parser: UnitParser,
}

impl SystemUnit {
    /// Create an empty unit; the type comes from the suffix of `name`, service if none.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_type(name, None)
    }

    /// Create an empty unit; `default_type` applies if `name` has no suffix.
    pub fn with_type(name: &str, default_type: Option<UnitType>) -> Result<Self> {
        let name = UnitName::parse(name, default_type)?;
        let spec = UnitSpecification::new(name.unit_type());
        Ok(Self::build(Some(name), spec))
    }

    /// Manage an existing specification. Its type wins over the suffix of `name`.
    ///
    /// A unit without a name can be edited but not persisted.
    pub fn with_spec(spec: UnitSpecification, name: Option<&str>) -> Result<Self> {
        let name = match name {
            None => None,
            Some(n) => {
                let mut name = UnitName::parse(n, Some(spec.unit_type()))?;
                name.set_unit_type(spec.unit_type());
                Some(name)
            }
        };
        Ok(Self::build(name, spec))
    }

    fn build(name: Option<UnitName>, spec: UnitSpecification) -> Self {
        SystemUnit {
            name,
            spec,
            path: PathBuf::from(&SysunitConfig::global().Manager.UnitPath),
            batch_vars: BatchVariables::new(),
            parser: UnitParser::default(),
        }
    }

    ///
    pub fn name(&self) -> Option<&UnitName> {
        self.name.as_ref()
    }

    ///
    pub fn unit_type(&self) -> UnitType {
        self.spec.unit_type()
    }

    ///
    pub fn spec(&self) -> &UnitSpecification {
        &self.spec
    }

    ///
    pub fn document(&self) -> &ConfigDocument {
        self.spec.document()
    }

    ///
    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        self.spec.document_mut()
    }

    /// Directory holding the unit file(s).
    pub fn path(&self) -> &Path {
        &self.path
    }

    ///
    pub fn set_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.path = path.into();
    }

    /// Dialect used by [`SystemUnit::read`].
    pub fn set_parser_options(&mut self, options: ParserOptions) {
        self.parser = UnitParser::new(options);
    }

    /// Set an option of an existing section, see [`ConfigDocument::set`].
    pub fn set<V: Into<Value>>(
        &mut self,
        section: &str,
        option: &str,
        value: V,
        multioption: bool,
    ) -> Result<()> {
        self.document_mut()
            .set(section, option, value, multioption)
            .map_err(Error::from)
    }

    /// Add a value to an option of an existing section, see [`ConfigDocument::append`].
    pub fn append<S: Into<String>>(&mut self, section: &str, option: &str, value: S) -> Result<()> {
        self.document_mut()
            .append(section, option, value)
            .map_err(Error::from)
    }

    /// Set options of a section read by the service manager, creating it if needed.
    pub fn update_section<I, K, V>(&mut self, name: &str, options: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let section = self.document_mut().add_section(name);
        for (k, v) in options {
            section.set(k, v);
        }
        section.set_internal(false);
    }

    /// Set options of a section ignored by the service manager, creating it if needed.
    ///
    /// The section is stored without its `x-` prefix, if given one.
    pub fn update_internal_section<I, K, V>(&mut self, name: &str, options: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let name = name.strip_prefix(INTERNAL_PREFIX).unwrap_or(name);
        let section = self.document_mut().add_section(name);
        for (k, v) in options {
            section.set(k, v);
        }
        section.set_internal(true);
    }

    ///
    pub fn mark_internal(&mut self, section: &str) -> Result<()> {
        self.document_mut()
            .mark_internal(section)
            .map_err(Error::from)
    }

    ///
    pub fn mark_external(&mut self, section: &str) -> Result<()> {
        self.document_mut()
            .mark_external(section)
            .map_err(Error::from)
    }

    /// Empty a section and return what it held.
    pub fn pop_section(&mut self, section: &str) -> Result<Vec<(String, Value)>> {
        self.document_mut()
            .pop_section(section)
            .map_err(Error::from)
    }

    ///
    pub fn to_mapping(&self) -> Mapping {
        self.document().to_mapping()
    }

    /// Set the values of a batch variable, the i-th one is used for the i-th unit.
    pub fn set_batch_var<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.batch_vars.set(name, values);
    }

    ///
    pub fn batch_vars(&self) -> &BatchVariables {
        &self.batch_vars
    }

    ///
    pub fn is_batched(&self) -> bool {
        self.name.as_ref().map_or(false, UnitName::is_batched)
    }

    fn unit_name(&self) -> Result<&UnitName> {
        self.name.as_ref().ok_or(Error::MissingFileName)
    }

    /// The file name of the unit, placeholders included for a batch.
    pub fn full_name(&self) -> Result<String> {
        Ok(self.unit_name()?.full_name())
    }

    /// The file names of every unit this one stands for.
    pub fn names(&self) -> Result<Vec<String>> {
        let name = self.unit_name()?;
        if name.is_batched() {
            batch::expand_names(name, &self.batch_vars)
        } else {
            Ok(vec![name.full_name()])
        }
    }

    /// The text of every file, keyed by file name, in batch order.
    pub fn render(&self) -> Result<Vec<(String, String)>> {
        let name = self.unit_name()?;
        if !name.is_batched() {
            return Ok(vec![(name.full_name(), self.spec.render())]);
        }

        let units = batch::expand(name, self.document(), &self.batch_vars)?;
        Ok(units
            .into_iter()
            .map(|(full_name, doc)| {
                let spec = UnitSpecification::from_document(self.unit_type(), doc);
                (full_name, spec.render())
            })
            .collect())
    }

    /// Persist the unit, returning the paths written.
    ///
    /// Every file is rendered before the first one is written.
    pub fn write(&self) -> Result<Vec<PathBuf>> {
        let files = self.render()?;
        let mut written = Vec::with_capacity(files.len());
        for (full_name, text) in files {
            let path = self.path.join(&full_name);
            fs::write(&path, text).context(IoSnafu { path: path.clone() })?;
            log::info!("Wrote unit file {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Replace the in-memory unit by the content of its file.
    pub fn read(&mut self) -> Result<()> {
        let path = self.path.join(self.full_name()?);
        let text = fs::read_to_string(&path).context(IoSnafu { path: path.clone() })?;
        let spec = UnitSpecification::parse(self.unit_type(), &self.parser, &text)
            .context(ParseSnafu { path: path.clone() })?;
        log::info!("Read unit file {}", path.display());
        self.spec = spec;
        Ok(())
    }

    /// Delete every file of the unit.
    ///
    /// A file that can't be deleted doesn't stop the others from being deleted,
    /// its error is logged and returned as a warning.
    pub fn remove(&self) -> Result<Vec<Error>> {
        let mut warnings = Vec::new();
        for full_name in self.names()? {
            let path = self.path.join(&full_name);
            match fs::remove_file(&path) {
                Ok(()) => log::info!("Removed unit file {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::warn!("Unit file {} does not exist, skipping", path.display());
                    warnings.push(Error::FileNotFoundOnRemove { path });
                }
                Err(e) => {
                    log::warn!("Failed to remove unit file {}: {}", path.display(), e);
                    warnings.push(Error::Io { source: e, path });
                }
            }
        }
        Ok(warnings)
    }

    /// true if every file of the unit exists
    pub fn exists(&self) -> Result<bool> {
        Ok(self
            .names()?
            .iter()
            .all(|name| self.path.join(name).exists()))
    }

    /// The file names of the unit that exist.
    pub fn existing(&self) -> Result<Vec<String>> {
        Ok(self
            .names()?
            .into_iter()
            .filter(|name| self.path.join(name).exists())
            .collect())
    }

    /// Run `command` for every file of the unit, one after the other.
    pub fn control(
        &self,
        controller: &dyn UnitController,
        command: &str,
    ) -> Result<BTreeMap<String, ControlOutput>> {
        let mut ret = BTreeMap::new();
        for name in self.names()? {
            let output = controller.invoke(command, Some(&name))?;
            ret.insert(name, output);
        }
        Ok(ret)
    }
}
