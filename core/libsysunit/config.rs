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

//! Settings of the unit writer, loaded from toml and the environment.
#![allow(non_snake_case)]
use crate::error::*;
use confique::Config;
use once_cell::sync::Lazy;

/// default configuration file
pub const SYSUNIT_CONFIG: &str = "/etc/sysunit/sysunit.toml";
/// default directory of unit files
pub const DEFAULT_UNIT_PATH: &str = "/etc/systemd/system";
/// default service manager scope
pub const DEFAULT_SCOPE: &str = "system";
/// default service manager control program
pub const DEFAULT_SYSTEMCTL: &str = "systemctl";

///
#[derive(Config, Debug)]
pub struct SysunitConfig {
    ///
    #[config(nested)]
    pub Manager: SectionManager,
}

///
#[derive(Config, Debug)]
pub struct SectionManager {
    /// directory unit files are written to
    #[config(env = "SYSUNIT_UNIT_PATH", default = "/etc/systemd/system")]
    pub UnitPath: String,
    /// "user" or "system"
    #[config(env = "SYSUNIT_SCOPE", default = "system")]
    pub Scope: String,
    ///
    #[config(env = "SYSUNIT_SYSTEMCTL", default = "systemctl")]
    pub Systemctl: String,
}

impl Default for SysunitConfig {
    fn default() -> Self {
        SysunitConfig {
            Manager: SectionManager::default(),
        }
    }
}

impl Default for SectionManager {
    fn default() -> Self {
        SectionManager {
            UnitPath: DEFAULT_UNIT_PATH.to_string(),
            Scope: DEFAULT_SCOPE.to_string(),
            Systemctl: DEFAULT_SYSTEMCTL.to_string(),
        }
    }
}

static SYSUNIT_DEFAULT: Lazy<SysunitConfig> = Lazy::new(|| SysunitConfig::new(None));

impl SysunitConfig {
    /// The configuration loaded from the default file, loaded once per process.
    pub fn global() -> &'static SysunitConfig {
        &SYSUNIT_DEFAULT
    }

    /// Load the configuration, falling back to the defaults if it can't be loaded.
    pub fn new(file: Option<&str>) -> SysunitConfig {
        match Self::load(file) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to load configuration, using defaults: {}", e);
                SysunitConfig::default()
            }
        }
    }

    /// Load the configuration from the environment and `file`.
    pub fn load(file: Option<&str>) -> Result<SysunitConfig> {
        SysunitConfig::builder()
            .env()
            .file(file.unwrap_or(SYSUNIT_CONFIG))
            .load()
            .context(ConfiqueSnafu)
    }
}
