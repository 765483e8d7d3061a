use core::{fmt, str::FromStr};

/// The kind of entity an identifier belongs to.
///
/// Each domain owns an independent sequence and a fixed tag embedded in every
/// identifier it issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Domain {
    /// Compounds, tagged `CID`.
    Compound,
    /// Substances, tagged `SID`.
    Substance,
    /// List records, tagged `RID`.
    Record,
}

impl Domain {
    /// All domains, in tag order.
    pub const ALL: [Self; 3] = [Self::Compound, Self::Substance, Self::Record];

    /// The fixed tag written after the prefix.
    ///
    /// ```
    /// use chemreg_id::Domain;
    ///
    /// assert_eq!(Domain::Compound.tag(), "CID");
    /// assert_eq!(Domain::Record.tag(), "RID");
    /// ```
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Compound => "CID",
            Self::Substance => "SID",
            Self::Record => "RID",
        }
    }

    /// Lowercase domain name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compound => "compound",
            Self::Substance => "substance",
            Self::Record => "record",
        }
    }

    /// Counter key used when none is configured.
    pub const fn default_sequence_key(self) -> &'static str {
        match self {
            Self::Compound => "compound_seq",
            Self::Substance => "substance_seq",
            Self::Record => "record_seq",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known [`Domain`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown domain {0:?}: expected compound, substance, record or their tags")]
pub struct UnknownDomain(pub String);

impl FromStr for Domain {
    type Err = UnknownDomain;

    /// Accepts the domain name or its tag, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s) || d.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDomain(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_tags() {
        assert_eq!("compound".parse(), Ok(Domain::Compound));
        assert_eq!("SID".parse(), Ok(Domain::Substance));
        assert_eq!("rid".parse(), Ok(Domain::Record));
        assert_eq!("Record".parse(), Ok(Domain::Record));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "molecule".parse::<Domain>().unwrap_err();
        assert_eq!(err, UnknownDomain("molecule".to_owned()));
    }

    #[test]
    fn default_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            Domain::ALL.iter().map(|d| d.default_sequence_key()).collect();
        assert_eq!(keys.len(), 3);
    }
}
