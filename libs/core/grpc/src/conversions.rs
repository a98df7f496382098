//! Wire representations used by the taskhub protos: UUIDs as strings and
//! timestamps as unix seconds.

use chrono::{DateTime, Utc};
use tonic::Status;
use uuid::Uuid;

/// Parses a UUID field, naming the field in the error.
pub fn parse_uuid(field: &str, value: &str) -> Result<Uuid, Status> {
  Uuid::parse_str(value.trim())
    .map_err(|_| Status::invalid_argument(format!("{field} is not a valid UUID: {value:?}")))
}

/// Empty strings are treated as absent.
pub fn parse_opt_uuid(field: &str, value: Option<&str>) -> Result<Option<Uuid>, Status> {
  match value {
    Some(v) if !v.trim().is_empty() => parse_uuid(field, v).map(Some),
    _ => Ok(None),
  }
}

pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> i64 {
  dt.timestamp()
}

pub fn timestamp_to_datetime(field: &str, timestamp: i64) -> Result<DateTime<Utc>, Status> {
  DateTime::from_timestamp(timestamp, 0)
    .ok_or_else(|| Status::invalid_argument(format!("{field} is out of range: {timestamp}")))
}

pub fn opt_timestamp_to_datetime(
  field: &str,
  timestamp: Option<i64>,
) -> Result<Option<DateTime<Utc>>, Status> {
  timestamp
    .map(|ts| timestamp_to_datetime(field, ts))
    .transpose()
}

pub fn opt_datetime_to_timestamp(dt: Option<DateTime<Utc>>) -> Option<i64> {
  dt.map(datetime_to_timestamp)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tonic::Code;

  #[test]
  fn test_parse_uuid_names_field() {
    let status = parse_uuid("task_id", "nope").unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(status.message().contains("task_id"));
  }

  #[test]
  fn test_parse_opt_uuid_blank_is_none() {
    assert_eq!(parse_opt_uuid("assignee_id", Some("  ")).unwrap(), None);
    assert_eq!(parse_opt_uuid("assignee_id", None).unwrap(), None);

    let id = Uuid::now_v7();
    assert_eq!(
      parse_opt_uuid("assignee_id", Some(&id.to_string())).unwrap(),
      Some(id)
    );
  }

  #[test]
  fn test_timestamp_out_of_range() {
    assert!(timestamp_to_datetime("due_date", i64::MAX).is_err());
  }

  #[test]
  fn test_timestamp_seconds_precision() {
    let now = Utc::now();
    let back = timestamp_to_datetime("due_date", datetime_to_timestamp(now)).unwrap();
    assert_eq!(back.timestamp(), now.timestamp());
    assert_eq!(opt_timestamp_to_datetime("due_date", None).unwrap(), None);
  }
}
