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

//! sysunit writes, reads and removes the unit files of the service manager.
//!
//! ```no_run
//! use sysunit::unit::SystemUnit;
//!
//! let mut unit = SystemUnit::new("web-{port}.service")?;
//! unit.set("Service", "ExecStart", "/usr/bin/web --port {port}", false)?;
//! unit.update_section("Install", [("WantedBy", "default.target")]);
//! unit.set_batch_var("port", ["8080", "8081"]);
//! unit.write()?;
//! # Ok::<(), sysunit::Error>(())
//! ```
pub mod config;
pub mod error;
pub mod exec;
pub mod logger;
pub mod unit;
pub use error::*;

pub use basic::unit_name::{UnitName, UnitType};
pub use unit_parser::prelude::{ConfigDocument, Mapping, ParserOptions, Section, Value};
