//! Commit records and the delimiter-encoded log format they are decoded from.
//!
//! The log export wraps every commit as `+++<subject>__<body>__<short>__<full>`.
//! The separators are out-of-band by convention only: a subject or body that
//! itself contains `+++` or `__` will shift the fields of that record. That is a
//! known limitation of the format and is deliberately left as is.

/// Separator placed in front of every commit record
pub const RECORD_SEPARATOR: &str = "+++";

/// Separator between the fields of one commit record
pub const FIELD_SEPARATOR: &str = "__";

/// `git log --format` string producing the delimiter-encoded export
pub const LOG_FORMAT: &str = "+++%s__%b__%h__%H";

/// One parsed log entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitRecord {
    pub subject: String,
    pub body: String,
    pub short_hash: String,
    pub full_hash: String,
}

impl CommitRecord {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        short_hash: impl Into<String>,
        full_hash: impl Into<String>,
    ) -> Self {
        CommitRecord {
            subject: subject.into(),
            body: body.into(),
            short_hash: short_hash.into(),
            full_hash: full_hash.into(),
        }
    }

    /// Encode this record the way [`LOG_FORMAT`] renders it, newline included
    pub fn encode(&self) -> String {
        format!(
            "{RECORD_SEPARATOR}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}\n",
            self.subject, self.body, self.short_hash, self.full_hash
        )
    }
}

/// Turns a raw log export into commit records.
///
/// Kept narrow so the textual export can be swapped for a structured one
/// without touching classification.
pub trait LogDecoder {
    fn decode(&self, raw: &str) -> Vec<CommitRecord>;
}

/// Decoder for the `+++`/`__` delimited export
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedLogDecoder;

impl LogDecoder for DelimitedLogDecoder {
    fn decode(&self, raw: &str) -> Vec<CommitRecord> {
        raw.split(RECORD_SEPARATOR)
            .filter(|chunk| !chunk.is_empty())
            .filter_map(|chunk| {
                let mut fields = chunk.split(FIELD_SEPARATOR).map(str::trim);
                let subject = fields.next().unwrap_or_default();
                let body = fields.next().unwrap_or_default();
                let short_hash = fields.next().unwrap_or_default();
                let full_hash = fields.next().unwrap_or_default();

                let record = CommitRecord::new(subject, body, short_hash, full_hash);
                // whitespace between records, e.g. a leading newline
                (record != CommitRecord::default()).then_some(record)
            })
            .collect()
    }
}

/// Decode a log export with the default delimiter scheme
pub fn decode_log(raw: &str) -> Vec<CommitRecord> {
    DelimitedLogDecoder.decode(raw)
}
