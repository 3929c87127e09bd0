use std::fmt;

use crate::common::layout::{AGENTS_DIR, PROMPTS_DIR, SKILLS_DIR};
use crate::resources::ResourceKind;
use crate::resources::agent::AGENT_SUFFIX;
use crate::resources::prompt::PROMPT_SUFFIX;
use crate::resources::skill::SKILL_FILE;

/// The three manifest fields that reference repository resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceField {
    Agents,
    Commands,
    Skills,
}

impl ReferenceField {
    pub const ALL: [ReferenceField; 3] = [
        ReferenceField::Agents,
        ReferenceField::Commands,
        ReferenceField::Skills,
    ];

    pub fn field(self) -> &'static str {
        match self {
            ReferenceField::Agents => "agents",
            ReferenceField::Commands => "commands",
            ReferenceField::Skills => "skills",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            ReferenceField::Agents => "./agents/",
            ReferenceField::Commands => "./commands/",
            ReferenceField::Skills => "./skills/",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ReferenceField::Agents | ReferenceField::Commands => ".md",
            ReferenceField::Skills => "/",
        }
    }

    /// Resource kind a reference in this field points at.
    pub fn item_kind(self) -> ResourceKind {
        match self {
            ReferenceField::Agents => ResourceKind::Agent,
            ReferenceField::Commands => ResourceKind::Prompt,
            ReferenceField::Skills => ResourceKind::Skill,
        }
    }
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Shape rule a reference string broke. Rules are checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShapeViolation {
    #[error("must start with \"./\"")]
    MissingDotSlash,

    #[error("must start with \"{0}\"")]
    WrongPrefix(&'static str),

    #[error("must end with \"{0}\"")]
    WrongSuffix(&'static str),
}

/// A well-formed reference, resolved to its repository source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub field: ReferenceField,
    /// Name between the field prefix and suffix.
    pub base: String,
}

impl SourceRef {
    pub fn parse(field: ReferenceField, reference: &str) -> Result<Self, ShapeViolation> {
        if !reference.starts_with("./") {
            return Err(ShapeViolation::MissingDotSlash);
        }
        let Some(rest) = reference.strip_prefix(field.prefix()) else {
            return Err(ShapeViolation::WrongPrefix(field.prefix()));
        };
        let Some(base) = rest.strip_suffix(field.suffix()) else {
            return Err(ShapeViolation::WrongSuffix(field.suffix()));
        };
        Ok(Self {
            field,
            base: base.to_string(),
        })
    }

    /// Repository-relative source: a file for agents and commands, a folder for skills.
    pub fn source_path(&self) -> String {
        match self.field {
            ReferenceField::Agents => format!("{AGENTS_DIR}/{}{AGENT_SUFFIX}", self.base),
            ReferenceField::Commands => format!("{PROMPTS_DIR}/{}{PROMPT_SUFFIX}", self.base),
            ReferenceField::Skills => format!("{SKILLS_DIR}/{}", self.base),
        }
    }

    /// Repository-relative file whose existence makes the reference valid.
    pub fn required_file(&self) -> String {
        match self.field {
            ReferenceField::Skills => format!("{}/{SKILL_FILE}", self.source_path()),
            _ => self.source_path(),
        }
    }

    /// Plugin-relative location of the materialized copy.
    pub fn destination(&self) -> String {
        match self.field {
            ReferenceField::Skills => format!("{}/{}", self.field.field(), self.base),
            _ => format!("{}/{}{}", self.field.field(), self.base, self.field.suffix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_resolve() {
        let agent = SourceRef::parse(ReferenceField::Agents, "./agents/reviewer.md").unwrap();
        assert_eq!(agent.source_path(), "agents/reviewer.agent.md");
        assert_eq!(agent.destination(), "agents/reviewer.md");

        let command = SourceRef::parse(ReferenceField::Commands, "./commands/review.md").unwrap();
        assert_eq!(command.source_path(), "prompts/review.prompt.md");
        assert_eq!(command.destination(), "commands/review.md");

        let skill = SourceRef::parse(ReferenceField::Skills, "./skills/deploy/").unwrap();
        assert_eq!(skill.source_path(), "skills/deploy");
        assert_eq!(skill.required_file(), "skills/deploy/SKILL.md");
        assert_eq!(skill.destination(), "skills/deploy");
    }

    #[test]
    fn test_shape_rules_in_order() {
        assert_eq!(
            SourceRef::parse(ReferenceField::Agents, "agents/x.md"),
            Err(ShapeViolation::MissingDotSlash)
        );
        assert_eq!(
            SourceRef::parse(ReferenceField::Agents, "./prompts/x.md"),
            Err(ShapeViolation::WrongPrefix("./agents/"))
        );
        assert_eq!(
            SourceRef::parse(ReferenceField::Skills, "./skills/deploy"),
            Err(ShapeViolation::WrongSuffix("/"))
        );
        assert_eq!(
            ShapeViolation::WrongSuffix(".md").to_string(),
            "must end with \".md\""
        );
    }
}
