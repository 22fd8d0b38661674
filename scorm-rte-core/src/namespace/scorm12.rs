//! SCORM 1.2 data model (`cmi.*`).

use super::{AccessMode, ElementDef, NamespaceTable};
use crate::datatype::DataType;
use once_cell::sync::Lazy;

use super::AccessMode::{ReadOnly as RO, ReadWrite as RW, WriteOnly as WO};

const LESSON_STATUS: &[&str] = &["passed", "completed", "failed", "incomplete", "browsed"];
const OBJECTIVE_STATUS: &[&str] = &[
    "passed",
    "completed",
    "failed",
    "incomplete",
    "browsed",
    "not attempted",
];
const INTERACTION_TYPE: &[&str] = &[
    "true-false",
    "choice",
    "fill-in",
    "matching",
    "performance",
    "sequencing",
    "likert",
    "numeric",
];
const INTERACTION_RESULT: &[&str] = &["correct", "wrong", "unanticipated", "neutral"];

fn el(name: &str, access: AccessMode, data_type: DataType) -> ElementDef {
    ElementDef::new(name, access, data_type)
}

fn score(prefix: &str, access: AccessMode) -> Vec<ElementDef> {
    ["raw", "min", "max"]
        .iter()
        .map(|part| {
            el(
                &format!("{}.{}", prefix, part),
                access,
                DataType::decimal_or_blank(0.0, 100.0),
            )
        })
        .collect()
}

pub(super) static TABLE: Lazy<NamespaceTable> = Lazy::new(|| {
    let mut elements = vec![
        el("cmi._version", RO, DataType::Any).with_default("3.4"),
        el("cmi.core._children", RO, DataType::Any).with_default(
            "student_id,student_name,lesson_location,credit,lesson_status,entry,score,total_time,lesson_mode,exit,session_time",
        ),
        el("cmi.core.student_id", RO, DataType::Identifier),
        el("cmi.core.student_name", RO, DataType::string(255)),
        el("cmi.core.lesson_location", RW, DataType::string(255)),
        el("cmi.core.credit", RO, DataType::vocabulary(&["credit", "no-credit"]))
            .with_default("credit"),
        el("cmi.core.lesson_status", RW, DataType::vocabulary(LESSON_STATUS))
            .with_default("not attempted"),
        el("cmi.core.entry", RO, DataType::vocabulary(&["ab-initio", "resume", ""]))
            .with_default("ab-initio"),
        el("cmi.core.score._children", RO, DataType::Any).with_default("raw,min,max"),
        el("cmi.core.total_time", RO, DataType::Timespan).with_default("0000:00:00"),
        el(
            "cmi.core.lesson_mode",
            RO,
            DataType::vocabulary(&["browse", "normal", "review"]),
        )
        .with_default("normal"),
        el(
            "cmi.core.exit",
            WO,
            DataType::vocabulary(&["time-out", "suspend", "logout", ""]),
        ),
        el("cmi.core.session_time", WO, DataType::Timespan),
        el("cmi.suspend_data", RW, DataType::string(4096)),
        el("cmi.launch_data", RO, DataType::string(4096)),
        el("cmi.comments", RW, DataType::string(4096)),
        el("cmi.comments_from_lms", RO, DataType::string(4096)),
        // objectives
        el("cmi.objectives._children", RO, DataType::Any).with_default("id,score,status"),
        el("cmi.objectives._count", RO, DataType::Any),
        el("cmi.objectives.n.id", RW, DataType::Identifier),
        el("cmi.objectives.n.score._children", RO, DataType::Any).with_default("raw,min,max"),
        el("cmi.objectives.n.status", RW, DataType::vocabulary(OBJECTIVE_STATUS))
            .with_default("not attempted"),
        // student data
        el("cmi.student_data._children", RO, DataType::Any)
            .with_default("mastery_score,max_time_allowed,time_limit_action"),
        el(
            "cmi.student_data.mastery_score",
            RO,
            DataType::decimal(0.0, 100.0),
        ),
        el("cmi.student_data.max_time_allowed", RO, DataType::Timespan),
        el(
            "cmi.student_data.time_limit_action",
            RO,
            DataType::vocabulary(&[
                "exit,message",
                "exit,no message",
                "continue,message",
                "continue,no message",
            ]),
        )
        .with_default("continue,no message"),
        // student preference
        el("cmi.student_preference._children", RO, DataType::Any)
            .with_default("audio,language,speed,text"),
        el("cmi.student_preference.audio", RW, DataType::integer(-1, 100)).with_default("0"),
        el("cmi.student_preference.language", RW, DataType::string(255)),
        el("cmi.student_preference.speed", RW, DataType::integer(-100, 100)).with_default("0"),
        el("cmi.student_preference.text", RW, DataType::integer(-1, 1)).with_default("0"),
        // interactions
        el("cmi.interactions._children", RO, DataType::Any).with_default(
            "id,objectives,time,type,correct_responses,weighting,student_response,result,latency",
        ),
        el("cmi.interactions._count", RO, DataType::Any),
        el("cmi.interactions.n.id", WO, DataType::Identifier),
        el("cmi.interactions.n.objectives._count", RO, DataType::Any),
        el("cmi.interactions.n.objectives.n.id", WO, DataType::Identifier),
        el("cmi.interactions.n.time", WO, DataType::Time),
        el("cmi.interactions.n.type", WO, DataType::vocabulary(INTERACTION_TYPE)),
        el("cmi.interactions.n.correct_responses._count", RO, DataType::Any),
        el(
            "cmi.interactions.n.correct_responses.n.pattern",
            WO,
            DataType::string(255),
        ),
        el(
            "cmi.interactions.n.weighting",
            WO,
            DataType::Decimal {
                min: None,
                max: None,
            },
        ),
        el("cmi.interactions.n.student_response", WO, DataType::string(255)),
        el("cmi.interactions.n.result", WO, DataType::vocabulary(INTERACTION_RESULT)),
        el("cmi.interactions.n.latency", WO, DataType::Timespan),
    ];
    elements.extend(score("cmi.core.score", RW));
    elements.extend(score("cmi.objectives.n.score", RW));

    NamespaceTable::new(elements)
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_unique_names() {
        let mut names: Vec<&str> = TABLE.elements().iter().map(|e| e.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_defaults_satisfy_their_types() {
        for def in TABLE.elements() {
            if def.default.is_empty() || def.is_count() {
                continue;
            }
            // lesson_status defaults to a value content may not write back
            if def.name == "cmi.core.lesson_status" {
                continue;
            }
            assert!(
                def.data_type.validate(&def.default).is_ok(),
                "default of {} violates its type",
                def.name
            );
        }
    }

    #[test]
    fn test_score_raw_is_bounded() {
        let raw = TABLE.lookup("cmi.core.score.raw").unwrap();
        assert_eq!(raw.def.access, AccessMode::ReadWrite);
        assert!(raw.def.data_type.validate("150").is_err());
    }

    #[test]
    fn test_scores_may_be_blank() {
        for name in [
            "cmi.core.score.raw",
            "cmi.core.score.min",
            "cmi.core.score.max",
            "cmi.objectives.3.score.raw",
        ] {
            let def = TABLE.lookup(name).unwrap().def;
            assert!(def.data_type.validate("").is_ok(), "{name}");
            assert!(def.data_type.validate("abc").is_err(), "{name}");
        }
    }
}
