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

//! Serializer of the unit file dialect.
use crate::document::{ConfigDocument, Section, Value};
use std::fmt;

/// Delimiter written between key and value.
pub const DELIMITER: char = '=';

/// Render a document as unit file text.
pub fn serialize(doc: &ConfigDocument) -> String {
    doc.to_string()
}

// newlines are followed by a tab so the value is read back as a continuation block
fn write_option(f: &mut fmt::Formatter<'_>, key: &str, value: &str) -> fmt::Result {
    writeln!(f, "{}{}{}", key, DELIMITER, value.replace('\n', "\n\t"))
}

fn write_section(f: &mut fmt::Formatter<'_>, section: &Section) -> fmt::Result {
    writeln!(f, "[{}]", section.name())?;
    for (key, value) in section.options() {
        match value {
            Value::Single(s) => write_option(f, key, s)?,
            Value::Multi(list) => {
                for s in list {
                    write_option(f, key, s)?;
                }
            }
            Value::Bare => writeln!(f, "{}", key)?,
        }
    }
    writeln!(f)
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in self.sections() {
            write_section(f, section)?;
        }
        Ok(())
    }
}
