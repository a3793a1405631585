//! JUnit XML reporter.
//!
//! One `<testsuite>` holds one `<testcase>` per artifact identity:
//! - the failure channel becomes `<failure type="failure" message=...>`
//! - the warning channel becomes `<error type="error" message=...>`
//! - the information channel becomes `<system-out>`

use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use super::{Reporter, SUITE_NAME};
use crate::results::{ResultEntry, ResultSet};

pub struct JUnitReporter;

impl Reporter for JUnitReporter {
    fn name(&self) -> &'static str {
        "junit"
    }

    fn generate(&self, results: &ResultSet) -> Result<String> {
        let entries = results.entries();
        let tests = entries.len().to_string();
        let failures = results.failure_count().to_string();
        let errors = results.warning_count().to_string();

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut suites = BytesStart::new("testsuites");
        suites.push_attribute(("tests", tests.as_str()));
        suites.push_attribute(("failures", failures.as_str()));
        suites.push_attribute(("errors", errors.as_str()));
        writer.write_event(Event::Start(suites))?;

        let mut suite = BytesStart::new("testsuite");
        suite.push_attribute(("name", SUITE_NAME));
        suite.push_attribute(("tests", tests.as_str()));
        suite.push_attribute(("failures", failures.as_str()));
        suite.push_attribute(("errors", errors.as_str()));
        writer.write_event(Event::Start(suite))?;

        for entry in &entries {
            write_test_case(&mut writer, entry)?;
        }

        writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
        writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

fn write_test_case(writer: &mut Writer<Vec<u8>>, entry: &ResultEntry) -> Result<()> {
    let mut case = BytesStart::new("testcase");
    case.push_attribute(("name", entry.name.as_str()));
    case.push_attribute(("classname", entry.name.as_str()));

    if entry.failure.is_none() && entry.warning.is_none() && entry.information.is_none() {
        writer.write_event(Event::Empty(case))?;
        return Ok(());
    }

    writer.write_event(Event::Start(case))?;

    if let Some(message) = &entry.failure {
        let mut failure = BytesStart::new("failure");
        failure.push_attribute(("type", "failure"));
        failure.push_attribute(("message", message.as_str()));
        writer.write_event(Event::Empty(failure))?;
    }
    if let Some(message) = &entry.warning {
        let mut error = BytesStart::new("error");
        error.push_attribute(("type", "error"));
        error.push_attribute(("message", message.as_str()));
        writer.write_event(Event::Empty(error))?;
    }
    if let Some(text) = &entry.information {
        writer.write_event(Event::Start(BytesStart::new("system-out")))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("system-out")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}
