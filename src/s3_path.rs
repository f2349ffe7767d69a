use std::{fmt, str::FromStr};

use crate::error::RmError;

pub const SCHEME: &str = "s3://";

/// Bucket and key-prefix of an `s3://bucket/prefix` path. An empty prefix covers the whole bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Path {
    pub bucket: String,
    pub prefix: String,
}

impl S3Path {
    /// Split the path on the first '/' after the scheme. The bucket-name and the prefix are not validated any further.
    pub fn parse(path: &str) -> Result<Self, RmError> {
        if path.len() <= SCHEME.len() || !path.starts_with(SCHEME) {
            return Err(RmError::invalid_path(path, "must start with `s3://` followed by a bucket"));
        }

        let bucket_and_prefix = &path[SCHEME.len()..];
        let (bucket, prefix) = match bucket_and_prefix.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix),
            None => (bucket_and_prefix, ""),
        };
        if bucket.is_empty() {
            return Err(RmError::invalid_path(path, "bucket name is empty"));
        }

        Ok(Self {
            bucket: bucket.to_owned(),
            prefix: prefix.to_owned(),
        })
    }
}

impl FromStr for S3Path {
    type Err = RmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for S3Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.prefix)
    }
}
