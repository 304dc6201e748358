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

//! Error define. Each crate of the workspace defines its own error.rs; this one wraps
//! the errors of the name resolver and of the unit file parser, and adds the errors
//! of batch expansion and of the file operations.
use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;
use std::path::PathBuf;

/// sysunit Error
#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Invalid unit name: {}", source))]
    Name { source: basic::Error },

    #[snafu(display("Unit configuration error: {}", source))]
    Document { source: unit_parser::error::Error },

    #[snafu(display("Failed to parse unit file {}: {}", path.display(), source))]
    Parse {
        source: unit_parser::error::Error,
        path: PathBuf,
    },

    #[snafu(display("You need to provide a valid name for the unit file."))]
    MissingFileName,

    #[snafu(display("Missing batch variables, specify them with set_batch_var()."))]
    MissingBatchVariables,

    #[snafu(display(
        "Batch variable '{}' holds {} values, expected {}.",
        name,
        actual,
        expected
    ))]
    BatchSizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[snafu(display("'{}' references '{}', which is not a batch variable.", value, name))]
    PlaceholderSubstitution { value: String, name: String },

    #[snafu(display("Unbalanced braces in '{}'.", value))]
    PlaceholderSyntax { value: String },

    #[snafu(display("IoError {}: {}", path.display(), source))]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("Unit file {} does not exist.", path.display()))]
    FileNotFoundOnRemove { path: PathBuf },

    #[snafu(display("Confique error: {}", source))]
    Confique { source: confique::Error },

    #[snafu(display("Failed to spawn '{}': {}", command, source))]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

/// Errors of the name resolver.
impl From<basic::Error> for Error {
    fn from(source: basic::Error) -> Self {
        Error::Name { source }
    }
}

/// Errors of document mutation.
impl From<unit_parser::error::Error> for Error {
    fn from(source: unit_parser::error::Error) -> Self {
        Error::Document { source }
    }
}

/// new Result
pub type Result<T, E = Error> = std::result::Result<T, E>;
