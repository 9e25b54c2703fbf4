use std::fmt;
use std::str::FromStr;
use serde_json::Value;

/// A single tabular row, column name to value
pub type Row = serde_json::Map<String, Value>;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AlignMethod {
    Exact,
    Fuzzy
}

impl fmt::Display for AlignMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlignMethod::Exact => write!(f, "exact"),
            AlignMethod::Fuzzy => write!(f, "fuzzy")
        }
    }
}

impl FromStr for AlignMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(AlignMethod::Exact),
            "fuzzy" => Ok(AlignMethod::Fuzzy),
            _ => Err(format!("Invalid alignment method: {}", s))
        }
    }
}

///
/// A row of the noisy directory dataset. Starts unaligned and is aligned
/// at most once, by either the exact or the fuzzy pass
///
#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryRecord {
    /// Every column of the source row, passed through to the output
    pub props: Row,

    aligned_name: Option<String>,
    method: Option<AlignMethod>
}

impl DirectoryRecord {
    pub fn new(props: Row) -> Self {
        DirectoryRecord {
            props,
            aligned_name: None,
            method: None
        }
    }

    ///
    /// The raw name as it appears in the source text
    ///
    pub fn raw_name(&self, key: &str) -> Option<&str> {
        match self.props.get(key) {
            Some(Value::String(name)) => Some(name.as_str()),
            _ => None
        }
    }

    pub fn aligned_name(&self) -> Option<&str> {
        self.aligned_name.as_ref().map(|name| name.as_str())
    }

    pub fn method(&self) -> Option<AlignMethod> {
        self.method
    }

    pub fn is_aligned(&self) -> bool {
        self.aligned_name.is_some()
    }

    ///
    /// Irrevocably assign a canonical name to this record
    ///
    pub fn align(&mut self, name: impl ToString, method: AlignMethod) -> Result<(), String> {
        if let Some(ref current) = self.aligned_name {
            return Err(format!("Record already aligned to {} ({})", current, self.method.map(|m| m.to_string()).unwrap_or_default()));
        }

        self.aligned_name = Some(name.to_string());
        self.method = Some(method);

        Ok(())
    }
}
