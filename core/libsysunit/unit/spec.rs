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

use basic::unit_name::UnitType;
use unit_parser::prelude::*;

/// Sections every unit of the type carries.
pub fn mandatory_sections(unit_type: UnitType) -> &'static [&'static str] {
    match unit_type {
        UnitType::UnitTarget => &["Unit"],
        UnitType::UnitService => &["Unit", "Service"],
        UnitType::UnitTimer => &["Unit", "Timer"],
        UnitType::UnitPath => &["Unit", "Path"],
    }
}

/// The configuration of one unit of a given type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSpecification {
    unit_type: UnitType,
    document: ConfigDocument,
}

impl UnitSpecification {
    ///
    pub fn new(unit_type: UnitType) -> Self {
        Self::from_document(unit_type, ConfigDocument::new())
    }

    /// Wrap a document, adding the mandatory sections it lacks.
    pub fn from_document(unit_type: UnitType, mut document: ConfigDocument) -> Self {
        for name in mandatory_sections(unit_type) {
            document.add_section(name);
        }
        UnitSpecification {
            unit_type,
            document,
        }
    }

    /// Read a persisted unit: `x-` sections become internal sections again.
    pub fn parse(unit_type: UnitType, parser: &UnitParser, text: &str) -> Result<Self> {
        let document = parser.parse(text)?;
        Ok(Self::from_document(unit_type, document.internalize()))
    }

    /// The text of the unit as persisted, internal sections under their `x-` name.
    pub fn render(&self) -> String {
        serialize(&self.document.externalize())
    }

    ///
    pub fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    ///
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    ///
    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_sections() {
        let spec = UnitSpecification::new(UnitType::UnitTimer);
        assert_eq!(spec.document().section_names(), vec!["Unit", "Timer"]);
        let spec = UnitSpecification::new(UnitType::UnitTarget);
        assert_eq!(spec.document().section_names(), vec!["Unit"]);
        let spec = UnitSpecification::new(UnitType::UnitPath);
        assert_eq!(spec.document().section_names(), vec!["Unit", "Path"]);
    }

    #[test]
    fn test_existing_sections_are_not_duplicated() {
        let mut doc = ConfigDocument::new();
        doc.add_section("Service").set("Type", "oneshot");
        let spec = UnitSpecification::from_document(UnitType::UnitService, doc);
        assert_eq!(spec.document().section_names(), vec!["Service", "Unit"]);
        assert_eq!(
            spec.document().get("Service", "Type"),
            Some(&Value::from("oneshot"))
        );
    }

    #[test]
    fn test_render_and_parse_internal_section() {
        let mut spec = UnitSpecification::new(UnitType::UnitService);
        let doc = spec.document_mut();
        doc.add_section("Meta").set("Owner", "ops");
        doc.mark_internal("Meta").unwrap();

        let text = spec.render();
        assert!(text.contains("[x-Meta]\nOwner=ops\n"));

        let back = UnitSpecification::parse(UnitType::UnitService, &UnitParser::default(), &text)
            .unwrap();
        assert!(back.document().is_internal("Meta"));
        assert_eq!(back, spec);
    }
}
