//! Block records as they appear in the data file.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// One entry of the data file, describing a single block page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Record {
    /// Block identifier as written in the source
    #[serde(default)]
    pub n: Option<BlockId>,

    /// Block title
    #[serde(default, deserialize_with = "nullable_text")]
    pub title: String,

    /// Block text, may span several lines
    #[serde(default, deserialize_with = "nullable_text")]
    pub body: String,

    /// Part the block belongs to
    #[serde(default, deserialize_with = "nullable_text")]
    pub part: String,

    /// Chapter the block belongs to
    #[serde(default, deserialize_with = "nullable_text")]
    pub chapter: String,
}

impl Record {
    /// The page number for this record, if it has a usable one.
    pub fn id(&self) -> Option<u64> {
        self.n.as_ref().and_then(BlockId::number)
    }
}

/// Raw identifier value. Data files written by hand mix numbers and numeric
/// strings, so anything is accepted here and coerced later.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BlockId {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl BlockId {
    /// Coerce to a positive integer.
    ///
    /// Integral floats (`3.0`) and numeric strings (`" 3 "`, `"+3"`) are
    /// accepted. Fractional numbers, values outside `u64`, non-numeric text,
    /// zero, negatives and any other value yield `None`.
    pub fn number(&self) -> Option<u64> {
        let n = match self {
            Self::Integer(n) => u64::try_from(*n).ok()?,
            Self::Unsigned(n) => *n,
            // `u64::MAX as f64` rounds up to 2^64, hence the strict bound
            Self::Float(f) if f.fract() == 0.0 && *f >= 1.0 && *f < u64::MAX as f64 => {
                *f as u64
            }
            Self::Text(s) => s.trim().parse::<u64>().ok()?,
            Self::Float(_) | Self::Other(_) => return None,
        };

        Some(n).filter(|n| *n > 0)
    }
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
