use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language level. Ordered: a later target supports everything an
/// earlier one does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsTarget {
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    #[default]
    EsNext,
}

impl EsTarget {
    pub const ALL: [EsTarget; 10] = [
        EsTarget::Es5,
        EsTarget::Es2015,
        EsTarget::Es2016,
        EsTarget::Es2017,
        EsTarget::Es2018,
        EsTarget::Es2019,
        EsTarget::Es2020,
        EsTarget::Es2021,
        EsTarget::Es2022,
        EsTarget::EsNext,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EsTarget::Es5 => "es5",
            EsTarget::Es2015 => "es2015",
            EsTarget::Es2016 => "es2016",
            EsTarget::Es2017 => "es2017",
            EsTarget::Es2018 => "es2018",
            EsTarget::Es2019 => "es2019",
            EsTarget::Es2020 => "es2020",
            EsTarget::Es2021 => "es2021",
            EsTarget::Es2022 => "es2022",
            EsTarget::EsNext => "esnext",
        }
    }

    /// Whether syntax introduced in `level` is available at this target.
    #[inline]
    pub fn supports(self, level: EsTarget) -> bool {
        self >= level
    }
}

impl fmt::Display for EsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EsTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let normalized = match lower.as_str() {
            "es6" => "es2015",
            "latest" => "esnext",
            other => other,
        };
        EsTarget::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown target '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(EsTarget::Es2020.supports(EsTarget::Es2015));
        assert!(!EsTarget::Es5.supports(EsTarget::Es2015));
        assert!(EsTarget::EsNext.supports(EsTarget::Es2022));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ES6".parse::<EsTarget>(), Ok(EsTarget::Es2015));
        assert_eq!("esnext".parse::<EsTarget>(), Ok(EsTarget::EsNext));
        assert!("es1999".parse::<EsTarget>().is_err());
    }
}
