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

mod common;

use std::fs;
use sysunit::unit::SystemUnit;
use sysunit::{Error, ParserOptions, UnitType, Value};

#[test]
fn unit_file_write_read_internal_section() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "web.service");
    unit.set("Unit", "Description", "web server", false).unwrap();
    unit.set("Service", "ExecStart", "/usr/bin/web\n--verbose", false)
        .unwrap();
    unit.update_section("Install", [("WantedBy", "default.target")]);
    unit.update_internal_section("X", [("Owner", "ops"), ("Ticket", "42")]);
    unit.write().unwrap();

    let text = fs::read_to_string(dir.path().join("web.service")).unwrap();
    assert!(text.contains("[x-X]\nOwner=ops\nTicket=42\n"));
    assert!(text.contains("ExecStart=/usr/bin/web\n\t--verbose\n"));

    let mut back = common::unit_in(dir.path(), "web.service");
    back.read().unwrap();
    assert!(back.document().is_internal("X"));
    assert!(!back.document().has_section("x-X"));
    assert_eq!(back.to_mapping(), unit.to_mapping());
    assert_eq!(
        back.document().get("Service", "ExecStart"),
        Some(&Value::from("/usr/bin/web\n--verbose"))
    );
}

#[test]
fn unit_file_write_read_bare_key() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "oneshot.service");
    unit.set("Service", "Type", "oneshot", false).unwrap();
    unit.set("Service", "RemainAfterExit", Value::Bare, false)
        .unwrap();
    unit.write().unwrap();

    let text = fs::read_to_string(dir.path().join("oneshot.service")).unwrap();
    assert!(text.contains("\nRemainAfterExit\n"));

    let mut back = common::unit_in(dir.path(), "oneshot.service");
    back.read().unwrap();
    assert_eq!(
        back.document().get("Service", "RemainAfterExit"),
        Some(&Value::Bare)
    );
    assert_eq!(back.to_mapping(), unit.to_mapping());
}

#[test]
fn unit_file_single_element_list_reads_back_single() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "pre.service");
    unit.append("Service", "ExecStartPre", "/bin/a").unwrap();
    assert!(unit.document().is_multi("Service", "ExecStartPre"));
    unit.write().unwrap();

    let mut back = common::unit_in(dir.path(), "pre.service");
    back.read().unwrap();
    assert_eq!(
        back.document().get("Service", "ExecStartPre"),
        Some(&Value::from("/bin/a"))
    );
    assert_ne!(back.to_mapping(), unit.to_mapping());
}

#[test]
fn unit_file_read_replaces_document() {
    let dir = common::unit_dir();
    fs::write(
        dir.path().join("tick.timer"),
        "# managed by hand\n[Unit]\nDescription=tick\n\n[Timer]\nOnCalendar=hourly\nOnCalendar=daily\n",
    )
    .unwrap();

    let mut unit = common::unit_in(dir.path(), "tick.timer");
    unit.update_section("Install", [("WantedBy", "timers.target")]);
    unit.read().unwrap();

    assert!(!unit.document().has_section("Install"));
    assert_eq!(
        unit.document().get("Timer", "OnCalendar"),
        Some(&Value::from(vec!["hourly", "daily"]))
    );
}

#[test]
fn unit_file_read_with_inline_comments() {
    let dir = common::unit_dir();
    fs::write(
        dir.path().join("svc.service"),
        "[Service]\nExecStart=/bin/true ; trailing\n",
    )
    .unwrap();

    let mut unit = common::unit_in(dir.path(), "svc.service");
    unit.read().unwrap();
    assert_eq!(
        unit.document().get("Service", "ExecStart"),
        Some(&Value::from("/bin/true ; trailing"))
    );

    unit.set_parser_options(ParserOptions {
        inline_comment_prefixes: vec![";".to_string()],
        ..Default::default()
    });
    unit.read().unwrap();
    assert_eq!(
        unit.document().get("Service", "ExecStart"),
        Some(&Value::from("/bin/true"))
    );
    // mandatory sections are restored after reading
    assert!(unit.document().has_section("Unit"));
}

#[test]
fn unit_file_batch_write() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "worker-{tag}.service");
    unit.set("Unit", "Description", "hello {tag}", false).unwrap();
    unit.set("Service", "Environment", vec!["TAG={tag}", "HOME=${{HOME}}"], true)
        .unwrap();
    unit.set_batch_var("tag", ["a", "b"]);

    let written = unit.write().unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(
        common::listing(dir.path()),
        vec!["worker-a.service", "worker-b.service"]
    );

    let mut b = common::unit_in(dir.path(), "worker-b.service");
    b.read().unwrap();
    assert_eq!(
        b.document().get("Unit", "Description"),
        Some(&Value::from("hello b"))
    );
    assert_eq!(
        b.document().get("Service", "Environment"),
        Some(&Value::from(vec!["TAG=b", "HOME=${HOME}"]))
    );
    assert!(unit.exists().unwrap());
}

#[test]
fn unit_file_batch_mismatch_writes_nothing() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "svc-{a}-{b}.service");
    unit.set_batch_var("a", ["1", "2"]);
    unit.set_batch_var("b", ["1"]);

    assert!(matches!(
        unit.write(),
        Err(Error::BatchSizeMismatch { .. })
    ));
    assert!(common::listing(dir.path()).is_empty());
}

#[test]
fn unit_file_batch_undeclared_variable_writes_nothing() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "svc-{n}.service");
    unit.set("Service", "ExecStart", "/bin/run {n}", false).unwrap();
    unit.set("Service", "WorkingDirectory", "{HOME}", false).unwrap();
    unit.set_batch_var("n", ["1", "2"]);

    assert!(matches!(
        unit.write(),
        Err(Error::PlaceholderSubstitution { .. })
    ));
    assert!(common::listing(dir.path()).is_empty());
}

#[test]
fn unit_file_batch_partial_removal() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "svc-{n}.service");
    unit.set_batch_var("n", ["1", "2"]);
    unit.write().unwrap();
    fs::remove_file(dir.path().join("svc-1.service")).unwrap();

    assert!(!unit.exists().unwrap());
    assert_eq!(unit.existing().unwrap(), vec!["svc-2.service"]);

    let warnings = unit.remove().unwrap();
    assert_eq!(warnings.len(), 1);
    match &warnings[0] {
        Error::FileNotFoundOnRemove { path } => {
            assert_eq!(path, &dir.path().join("svc-1.service"))
        }
        e => panic!("unexpected warning: {}", e),
    }
    assert!(common::listing(dir.path()).is_empty());
    assert!(unit.existing().unwrap().is_empty());
}

#[test]
fn unit_file_template() {
    let dir = common::unit_dir();
    let mut unit = common::unit_in(dir.path(), "getty@");
    unit.set("Service", "ExecStart", "/sbin/agetty %I", false).unwrap();
    unit.write().unwrap();

    assert_eq!(common::listing(dir.path()), vec!["getty@.service"]);
    assert_eq!(unit.name().unwrap().instance_name("tty1"), "getty@tty1.service");
}

#[test]
fn unit_file_from_spec() {
    let dir = common::unit_dir();
    let mut spec = sysunit::unit::UnitSpecification::new(UnitType::UnitPath);
    spec.document_mut()
        .set("Path", "PathChanged", "/etc/app.conf", false)
        .unwrap();

    let mut unit = SystemUnit::with_spec(spec, Some("app")).unwrap();
    unit.set_path(dir.path());
    unit.write().unwrap();
    assert_eq!(common::listing(dir.path()), vec!["app.path"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("app.path")).unwrap(),
        "[Unit]\n\n[Path]\nPathChanged=/etc/app.conf\n\n"
    );
}
