//! JSON rendering for structured log records.
//!
//! Library code logs through [`log`] with key/value pairs; this module is
//! the sink the demo binaries install. Every record becomes one JSON object
//! on stderr carrying `level`, an ISO-8601 `ts`, `msg`, and the record's
//! key/value fields.

use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use log::kv::{self, VisitSource};
use serde_json::{Map, Value};

use crate::LOG_TARGET;

/// Install the JSON logger.
///
/// The filter defaults to this crate's records at info level; `RUST_LOG`
/// overrides it as usual.
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::new().default_filter_or(format!("{LOG_TARGET}=info")),
    )
    .format(|buf, record| {
        let line = render(record)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
        writeln!(buf, "{line}")
    })
    .init();
}

fn render(record: &log::Record) -> Result<String, kv::Error> {
    let mut fields = Map::new();
    fields.insert("level".to_owned(), Value::from(record.level().as_str()));
    fields.insert(
        "ts".to_owned(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    fields.insert("msg".to_owned(), Value::from(record.args().to_string()));
    record.key_values().visit(&mut Collect(&mut fields))?;
    Ok(Value::Object(fields).to_string())
}

struct Collect<'a>(&'a mut Map<String, Value>);

impl<'a, 'kvs> VisitSource<'kvs> for Collect<'a> {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        // Values that don't serialize cleanly fall back to their Display form.
        let rendered =
            serde_json::to_value(&value).unwrap_or_else(|_| Value::String(value.to_string()));
        self.0.insert(key.to_string(), rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_render_as_json_objects() {
        let kvs: &[(&str, kv::Value)] = &[
            ("flag_name", kv::Value::from("doors_enabled")),
            ("current_value", kv::Value::from(true)),
        ];
        let rendered = render(
            &log::Record::builder()
                .level(log::Level::Info)
                .target(LOG_TARGET)
                .key_values(&kvs)
                .args(format_args!("flag changed"))
                .build(),
        )
        .unwrap();

        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["msg"], "flag changed");
        assert_eq!(parsed["flag_name"], "doors_enabled");
        assert_eq!(parsed["current_value"], true);
        assert!(parsed["ts"].as_str().unwrap().ends_with('Z'));
    }
}
