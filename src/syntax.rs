#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The dialect a config file is written in.
///
/// A single syntax is applied to a whole document: the grammar that parses the
/// file and the renderer that writes it back are both chosen by it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Syntax {
    /// ini-like files without any product specific extension.
    #[default]
    Generic,
    /// `my.cnf` style files, the same grammar as [`Syntax::Generic`].
    MySql,
    /// `haproxy.cfg` style files, sections are keywords without brackets.
    HaProxy,
    /// The indentation based YAML subset.
    Yaml,
    /// Nothing is parsed and nothing is rendered.
    Unknown,
}

impl Syntax {
    pub fn name(&self) -> &'static str {
        match self {
            Syntax::Generic => "generic",
            Syntax::MySql => "mysql",
            Syntax::HaProxy => "haproxy",
            Syntax::Yaml => "yaml",
            Syntax::Unknown => "unknown",
        }
    }

    pub fn is_ini(&self) -> bool {
        matches!(self, Syntax::Generic | Syntax::MySql)
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
