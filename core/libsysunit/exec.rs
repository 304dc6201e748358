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

//! Invocation of the service manager.
use crate::config::SysunitConfig;
use crate::error::*;
use std::fmt;
use std::process::Command;
use std::str::FromStr;

/// What the service manager printed for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlOutput {
    ///
    pub stdout: String,
    ///
    pub stderr: String,
}

/// Sends commands such as `start` or `daemon-reload` to the service manager.
pub trait UnitController {
    /// Run `command`, for `unit_name` if given, and wait for it to finish.
    fn invoke(&self, command: &str, unit_name: Option<&str>) -> Result<ControlOutput>;
}

/// The instance of the service manager to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerScope {
    ///
    User,
    ///
    #[default]
    System,
}

impl ManagerScope {
    ///
    pub fn flag(&self) -> &'static str {
        match self {
            ManagerScope::User => "--user",
            ManagerScope::System => "--system",
        }
    }
}

impl FromStr for ManagerScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" => Ok(ManagerScope::User),
            "system" => Ok(ManagerScope::System),
            _ => Err(format!("unknown service manager scope: {}", s)),
        }
    }
}

impl fmt::Display for ManagerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerScope::User => f.write_str("user"),
            ManagerScope::System => f.write_str("system"),
        }
    }
}

/// Controller running `systemctl --<scope> <command> [unit]`.
#[derive(Debug, Clone)]
pub struct Systemctl {
    program: String,
    scope: ManagerScope,
}

impl Systemctl {
    ///
    pub fn new<S: Into<String>>(program: S, scope: ManagerScope) -> Self {
        Systemctl {
            program: program.into(),
            scope,
        }
    }

    /// Program and scope from the configuration; an unknown scope means the system manager.
    pub fn from_config(config: &SysunitConfig) -> Self {
        let scope = config.Manager.Scope.parse().unwrap_or_else(|e| {
            log::warn!("{}, using the system scope", e);
            ManagerScope::System
        });
        Systemctl::new(config.Manager.Systemctl.clone(), scope)
    }

    ///
    pub fn scope(&self) -> ManagerScope {
        self.scope
    }
}

impl UnitController for Systemctl {
    fn invoke(&self, command: &str, unit_name: Option<&str>) -> Result<ControlOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(self.scope.flag()).arg(command);
        if let Some(name) = unit_name {
            cmd.arg(name);
        }
        log::debug!("Running {:?}", cmd);

        let output = cmd.output().context(SpawnSnafu {
            command: format!("{} {}", self.program, command),
        })?;
        if !output.status.success() {
            log::debug!(
                "{} {} {} exited with {}",
                self.program,
                command,
                unit_name.unwrap_or_default(),
                output.status
            );
        }

        Ok(ControlOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
