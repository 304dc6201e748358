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

//! Crate for parsing and writing systemd-style unit files.
//! This crate provides an ordered document model of sections and options, a parser
//! that collects repeated keys into multi-valued options, and the matching writer.

pub mod document;
pub mod error;
pub mod parser;
pub mod writer;

/// All public interfaces for normal usage.
/// Use `use unit_parser::prelude::*;` to include.
pub mod prelude;
