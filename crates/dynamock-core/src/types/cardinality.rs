//! Invocation count bounds.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Minimum and maximum number of times a behaviour may be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    min: usize,
    max: Option<usize>,
}

impl Cardinality {
    /// `min..=max`; `max` of `None` means unbounded.
    ///
    /// Panics if `max < min`.
    pub fn new(min: usize, max: Option<usize>) -> Self {
        if let Some(max) = max {
            assert!(max >= min, "cardinality upper bound {max} is below lower bound {min}");
        }
        Self { min, max }
    }

    pub fn exactly(n: usize) -> Self {
        Self::new(n, Some(n))
    }

    /// Default bound of an expectation.
    pub fn once() -> Self {
        Self::exactly(1)
    }

    pub fn never() -> Self {
        Self::exactly(0)
    }

    pub fn at_least(n: usize) -> Self {
        Self::new(n, None)
    }

    pub fn at_most(n: usize) -> Self {
        Self::new(0, Some(n))
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self::new(min, Some(max))
    }

    /// Zero or more; default bound of a stub.
    pub fn any() -> Self {
        Self::at_least(0)
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn allows_more(&self, count: usize) -> bool {
        self.max.is_none_or(|max| count < max)
    }

    pub fn needs_more(&self, count: usize) -> bool {
        count < self.min
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Self::once()
    }
}

fn times(n: usize) -> String {
    match n {
        1 => "once".to_string(),
        2 => "twice".to_string(),
        n => format!("{n} times"),
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, Some(0)) => f.write_str("never"),
            (0, None) => f.write_str("any number of times"),
            (min, Some(max)) if min == max => write!(f, "exactly {}", times(min)),
            (0, Some(max)) => write!(f, "at most {}", times(max)),
            (min, None) => write!(f, "at least {}", times(min)),
            (min, Some(max)) => write!(f, "between {min} and {max} times"),
        }
    }
}

/// Scripts accept a bare count, one of `once`/`twice`/`never`/`any`, or a
/// `{ min, max }` map with either bound omitted.
impl<'de> Deserialize<'de> for Cardinality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let bound = |v: Option<&Value>| -> Result<Option<usize>, D::Error> {
            match v {
                None | Some(Value::Null) => Ok(None),
                Some(Value::Number(n)) => n
                    .as_u64()
                    .map(|n| Some(n as usize))
                    .ok_or_else(|| serde::de::Error::custom("bound must be a non-negative integer")),
                Some(_) => Err(serde::de::Error::custom("bound must be a non-negative integer")),
            }
        };
        let cardinality = match &value {
            Value::Number(_) => Cardinality::exactly(bound(Some(&value))?.unwrap_or(0)),
            Value::String(s) => match s.as_str() {
                "once" => Cardinality::once(),
                "twice" => Cardinality::exactly(2),
                "never" => Cardinality::never(),
                "any" => Cardinality::any(),
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "unknown cardinality '{other}'"
                    )))
                }
            },
            Value::Object(map) => {
                let min = bound(map.get("min"))?.unwrap_or(0);
                let max = bound(map.get("max"))?;
                if max.is_some_and(|max| max < min) {
                    return Err(serde::de::Error::custom(
                        "cardinality max must not be below min",
                    ));
                }
                Cardinality::new(min, max)
            }
            _ => {
                return Err(serde::de::Error::custom(
                    "Cardinality must be a count, a keyword or a {min, max} object",
                ))
            }
        };
        Ok(cardinality)
    }
}

impl Serialize for Cardinality {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match (self.min, self.max) {
            (0, None) => "any".serialize(serializer),
            (min, Some(max)) if min == max => min.serialize(serializer),
            (min, max) => {
                let mut map = serde_json::Map::new();
                map.insert("min".to_string(), Value::from(min));
                if let Some(max) = max {
                    map.insert("max".to_string(), Value::from(max));
                }
                map.serialize(serializer)
            }
        }
    }
}
