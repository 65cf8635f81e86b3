use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata of one remotely stored file, as returned by the files API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: String,
    pub filename: String,
    pub bytes: u64,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl FileRecord {
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        bytes: u64,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            bytes,
            created_at,
            object: "file".to_string(),
            purpose: None,
            status: None,
        }
    }

    pub fn created_at_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        render_created_at(self.created_at, tz)
    }
}

/// One page of the list endpoint.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct FileList {
    pub data: Vec<FileRecord>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub last_id: Option<String>,
}

impl FileList {
    /// Cursor for the next page, if the service reported one.
    pub fn next_cursor(&self) -> Option<String> {
        if !self.has_more {
            return None;
        }
        self.last_id
            .clone()
            .or_else(|| self.data.last().map(|record| record.id.clone()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeletionStatus {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub deleted: bool,
}

/// Renders `created_at` as `YYYY-MM-DD HH:MM:SS` in `tz`.
///
/// Falls back to the raw seconds when the timestamp is out of chrono's range.
pub fn render_created_at<Tz: TimeZone>(created_at: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match Utc.timestamp_opt(created_at, 0).single() {
        Some(utc) => utc
            .with_timezone(tz)
            .format(CREATED_AT_FORMAT)
            .to_string(),
        None => created_at.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn test_deserialize_list_page() {
        let page: FileList = serde_json::from_str(
            r#"{
                "object": "list",
                "data": [
                    {
                        "id": "file-abc123",
                        "object": "file",
                        "bytes": 175,
                        "created_at": 1613677385,
                        "filename": "salesOverview.pdf",
                        "purpose": "assistants"
                    },
                    {
                        "id": "file-abc456",
                        "object": "file",
                        "bytes": 140,
                        "created_at": 1613779121,
                        "filename": "puppy.jsonl",
                        "purpose": "fine-tune",
                        "status": "processed"
                    }
                ],
                "has_more": true,
                "first_id": "file-abc123",
                "last_id": "file-abc456"
            }"#,
        )
        .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].filename, "salesOverview.pdf");
        assert_eq!(page.data[0].purpose.as_deref(), Some("assistants"));
        assert_eq!(page.data[1].status.as_deref(), Some("processed"));
        assert_eq!(page.next_cursor().as_deref(), Some("file-abc456"));
    }

    #[test]
    fn test_deserialize_list_page_without_cursor_fields() {
        let page: FileList = serde_json::from_str(
            r#"{"object": "list", "data": [{"id": "f1", "bytes": 1, "created_at": 0, "filename": "a"}]}"#,
        )
        .unwrap();

        assert!(!page.has_more);
        assert_eq!(page.next_cursor(), None);
        assert_eq!(page.data[0], FileRecord { object: String::new(), ..FileRecord::new("f1", "a", 1, 0) });
    }

    #[test]
    fn test_next_cursor_falls_back_to_last_record() {
        let page = FileList {
            data: vec![FileRecord::new("f1", "a", 1, 0), FileRecord::new("f2", "b", 1, 0)],
            has_more: true,
            last_id: None,
        };
        assert_eq!(page.next_cursor().as_deref(), Some("f2"));
    }

    #[test]
    fn test_deserialize_deletion_status() {
        let status: DeletionStatus =
            serde_json::from_str(r#"{"id": "file-abc123", "object": "file", "deleted": true}"#)
                .unwrap();
        assert_eq!(status.id, "file-abc123");
        assert!(status.deleted);
    }

    #[test]
    fn test_render_created_at_epoch() {
        assert_eq!(render_created_at(0, &Utc), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_render_created_at_offset() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(render_created_at(1613677385, &Utc), "2021-02-18 19:43:05");
        assert_eq!(render_created_at(1613677385, &tz), "2021-02-19 04:43:05");
        assert_eq!(
            FileRecord::new("f1", "a", 1, 1613677385).created_at_in(&tz),
            "2021-02-19 04:43:05"
        );
    }

    #[test]
    fn test_render_created_at_out_of_range() {
        assert_eq!(render_created_at(i64::MAX, &Utc), i64::MAX.to_string());
    }
}
