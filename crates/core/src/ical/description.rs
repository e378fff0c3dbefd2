//! Structured fields embedded in the institution's `DESCRIPTION` text.
//!
//! The feed describes every event as
//! `Veranstaltung: <course> Dozent: <lecturer> Pause: <break> Raum: <room> Anmerkung: <note>`
//! where `<course>` is `<type> <module-number> <name>` or `<type> <name>`.

use std::sync::LazyLock;

use regex::Regex;

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Veranstaltung:\s*(.*?)\s+Dozent:\s*(.*?)\s+Pause:\s*(.*?)\s+Raum:\s*(.*?)\s+Anmerkung:\s*(.*)",
    )
    .expect("valid regex")
});

static COURSE_WITH_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+(.*)$").expect("valid regex"));

static COURSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(.*)$").expect("valid regex"));

/// Course type, module number, and name taken from `Veranstaltung`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseInfo {
    pub course_type: Option<String>,
    pub module_number: Option<String>,
    pub name: Option<String>,
}

/// All labelled fields of a description. Blank captures are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionFields {
    pub course: Option<CourseInfo>,
    pub professor: Option<String>,
    pub break_info: Option<String>,
    pub room: Option<String>,
    pub annotation: Option<String>,
}

/// Parse a description. Returns `None` when any of the five labels is missing.
pub fn parse_description(value: &str) -> Option<DescriptionFields> {
    let caps = DESCRIPTION_RE.captures(value)?;
    let field = |i: usize| caps.get(i).and_then(|m| non_blank(m.as_str()));

    let course = field(1).and_then(|raw| {
        let parsed = parse_course(&raw);
        if parsed.is_none() {
            tracing::warn!(course = %raw, "Course string does not match a known layout");
        }
        parsed
    });

    Some(DescriptionFields {
        course,
        professor: field(2),
        break_info: field(3),
        room: field(4),
        annotation: field(5),
    })
}

/// Split a course string into type, optional module number, and name.
pub fn parse_course(raw: &str) -> Option<CourseInfo> {
    if let Some(caps) = COURSE_WITH_NUMBER_RE.captures(raw) {
        return Some(CourseInfo {
            course_type: caps.get(1).and_then(|m| non_blank(m.as_str())),
            module_number: caps.get(2).and_then(|m| non_blank(m.as_str())),
            name: caps.get(3).and_then(|m| non_blank(m.as_str())),
        });
    }

    COURSE_RE.captures(raw).map(|caps| CourseInfo {
        course_type: caps.get(1).and_then(|m| non_blank(m.as_str())),
        module_number: None,
        name: caps.get(2).and_then(|m| non_blank(m.as_str())),
    })
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
