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

//! Console logger for programs using this crate.
use std::io::Write;

fn write_msg_common(writer: &mut impl Write, name: &str, module: &str, msg: String) {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S ").to_string();

    /* 1. Write time */
    if let Err(e) = writer.write(now.as_bytes()) {
        eprintln!("Failed to log time message: {}", e);
        return;
    }

    /* 2. Write program and module */
    if let Err(e) = writer.write(format!("{}[{}] ", name, module).as_bytes()) {
        eprintln!("Failed to log module message: {}", e);
        return;
    }

    /* 3. Write message */
    if let Err(e) = writer.write((msg + "\n").as_bytes()) {
        eprintln!("Failed to log message: {}", e);
    }
}

struct ConsoleLogger {
    name: String,
    level: log::Level,
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr();
        let module_path = match record.module_path() {
            None => "unknown",
            Some(v) => v,
        };
        write_msg_common(
            &mut stderr,
            &self.name,
            module_path,
            record.args().to_string(),
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Initialize the console logger.
///
/// Only the first call installs the logger, later calls only change the max level.
pub fn init_log_to_console(name: &str, level: log::Level) {
    let logger = ConsoleLogger {
        name: name.to_string(),
        level,
    };
    if log::set_boxed_logger(Box::new(logger)).is_err() {
        log::debug!("Logger has been initialized already.");
    }
    log::set_max_level(level.to_level_filter());
}
