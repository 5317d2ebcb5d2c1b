use serde::{Deserialize, Serialize};

/// What restore does after cloning a bare repository that has secondary remotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BareSecondaryPolicy {
    /// Stop the whole restore successfully; later records are left unprocessed.
    #[default]
    Halt,
    /// Move on to the next record. The secondary remotes are not attached.
    Continue,
}

impl std::fmt::Display for BareSecondaryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BareSecondaryPolicy::Halt => write!(f, "halt"),
            BareSecondaryPolicy::Continue => write!(f, "continue"),
        }
    }
}

impl std::str::FromStr for BareSecondaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "halt" => Ok(BareSecondaryPolicy::Halt),
            "continue" => Ok(BareSecondaryPolicy::Continue),
            _ => Err(format!("unknown bare secondary policy: {s}")),
        }
    }
}

/// How secondary remotes are named when attached after a clone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryNaming {
    /// Every secondary remote is added as `upstream`; a second one collides.
    #[default]
    Fixed,
    /// `upstream`, `upstream-2`, `upstream-3`, ...
    Numbered,
}

impl SecondaryNaming {
    /// Remote name for the secondary remote at `index` (0-based).
    pub fn remote_name(&self, index: usize) -> String {
        match self {
            SecondaryNaming::Fixed => "upstream".to_string(),
            SecondaryNaming::Numbered if index == 0 => "upstream".to_string(),
            SecondaryNaming::Numbered => format!("upstream-{}", index + 1),
        }
    }
}

impl std::fmt::Display for SecondaryNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecondaryNaming::Fixed => write!(f, "fixed"),
            SecondaryNaming::Numbered => write!(f, "numbered"),
        }
    }
}

impl std::str::FromStr for SecondaryNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(SecondaryNaming::Fixed),
            "numbered" => Ok(SecondaryNaming::Numbered),
            _ => Err(format!("unknown secondary naming: {s}")),
        }
    }
}
