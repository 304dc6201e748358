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

//! Definitions for all possible errors used in this crate.
use snafu::Snafu;
use std::fmt;

/// One malformed line seen during a parse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingError {
    /// 1-based line number.
    pub lineno: usize,
    /// The raw line, without its line terminator.
    pub line: String,
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {:2}]: {:?}", self.lineno, self.line)
    }
}

fn join_lines(errors: &[ParsingError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n\t")
}

/// Errors used in crate.
#[derive(Debug, Snafu)]
#[allow(missing_docs)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("File contains no section headers.\n[line {:2}]: {:?}", lineno, line))]
    MissingSectionHeader { lineno: usize, line: String },

    #[snafu(display("While reading [line {:2}]: section {:?} already exists.", lineno, section))]
    DuplicateSection { section: String, lineno: usize },

    #[snafu(display(
        "While reading [line {:2}]: option {:?} in section {:?} already exists.",
        lineno,
        option,
        section
    ))]
    DuplicateOption {
        section: String,
        option: String,
        lineno: usize,
    },

    #[snafu(display("Source contains parsing errors:\n\t{}", join_lines(errors)))]
    Parse { errors: Vec<ParsingError> },

    #[snafu(display("No section: {:?}.", section))]
    NoSection { section: String },
}

/// Result of the dialect parser and the document model.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_lists_every_line() {
        let e = Error::Parse {
            errors: vec![
                ParsingError {
                    lineno: 3,
                    line: "bogus".to_string(),
                },
                ParsingError {
                    lineno: 7,
                    line: "=novalue".to_string(),
                },
            ],
        };
        let msg = e.to_string();
        assert!(msg.contains("[line  3]: \"bogus\""));
        assert!(msg.contains("[line  7]: \"=novalue\""));
    }
}
