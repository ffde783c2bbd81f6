use std::fmt::{Display, Write};

use thiserror::Error;

const IDENTIFIER_MAX_LEN: usize = 32767;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced resource location (`namespace:value`) borrowed from a registry document.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Identifier<'a> {
    namespace: Option<&'a str>,
    value: &'a str,
}

impl<'a> Identifier<'a> {
    pub fn parse(string: &'a str) -> Result<Self, IdentifierParseError> {
        if string.len() > IDENTIFIER_MAX_LEN {
            return Err(IdentifierParseError::TooLong(string.to_owned()));
        }

        let mut colon_i = None;
        let mut in_path = false;

        for (i, c) in string.char_indices() {
            match c {
                'a'..='z' | '0'..='9' | '.' | '-' | '_' => continue,
                ':' if colon_i.is_none() && !in_path => colon_i = Some(i),
                '/' => in_path = true,
                _ => {
                    return Err(IdentifierParseError::IllegalCharacter(
                        string.to_owned(),
                        i,
                    ))
                }
            }
        }

        let (namespace, value) = match colon_i {
            Some(i) => (Some(&string[..i]), &string[i + 1..]),
            None => (None, string),
        };

        if value.is_empty() {
            return Err(IdentifierParseError::EmptyValue(string.to_owned()));
        }

        Ok(Self { namespace, value })
    }

    pub fn namespace(&self) -> &'a str {
        match self.namespace {
            Some(namespace) if !namespace.is_empty() => namespace,
            _ => DEFAULT_NAMESPACE,
        }
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    /// The name used to look this identifier up in a runtime catalog.
    ///
    /// Entries of the default namespace drop their prefix (`minecraft:oak_log` becomes
    /// `OAK_LOG`), other namespaces are kept (`mymod:ruby_ore` becomes `MYMOD:RUBY_ORE`).
    pub fn catalog_name(&self) -> String {
        let namespace = self.namespace();
        if namespace == DEFAULT_NAMESPACE {
            self.value.to_ascii_uppercase()
        } else {
            let mut name = String::with_capacity(namespace.len() + self.value.len() + 1);
            name.push_str(namespace);
            name.push(':');
            name.push_str(self.value);
            name.make_ascii_uppercase();
            name
        }
    }
}

/// Normalizes a namespaced registry name into its catalog name.
///
/// Letter case is not significant, `Minecraft:Stick` and `minecraft:stick` both give `STICK`.
pub fn normalize_name(name: &str) -> Result<String, IdentifierParseError> {
    let lowercase = name.to_ascii_lowercase();
    Identifier::parse(&lowercase).map(|identifier| identifier.catalog_name())
}

impl Display for Identifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(namespace) = self.namespace {
            namespace.fmt(f)?;
            f.write_char(':')?;
        }
        self.value.fmt(f)
    }
}

impl PartialEq for Identifier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace() && self.value == other.value
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierParseError {
    #[error(
        "identifier {0} is too long, must be at most {} characters",
        IDENTIFIER_MAX_LEN
    )]
    TooLong(String),
    #[error("identifier {0} has illegal character at position {1}, must be one of [a-z0-9.-_] in namespace or [a-z0-9.-_/] in value")]
    IllegalCharacter(String, usize),
    #[error("identifier {0} has an empty value")]
    EmptyValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_namespace_is_stripped() {
        assert_eq!(normalize_name("minecraft:oak_log").unwrap(), "OAK_LOG");
        assert_eq!(normalize_name("stone").unwrap(), "STONE");
    }

    #[test]
    fn letter_case_is_ignored() {
        assert_eq!(normalize_name("Minecraft:Foo").unwrap(), "FOO");
        assert_eq!(normalize_name("minecraft:Stick").unwrap(), "STICK");
        assert_eq!(normalize_name("MINECRAFT:OAK_LOG").unwrap(), "OAK_LOG");
        assert_eq!(normalize_name("MyMod:Ruby_Ore").unwrap(), "MYMOD:RUBY_ORE");
    }

    #[test]
    fn foreign_namespace_is_kept() {
        assert_eq!(
            normalize_name("mymod:ruby_ore").unwrap(),
            "MYMOD:RUBY_ORE"
        );
    }

    #[test]
    fn implicit_namespace_equals_explicit() {
        assert_eq!(
            Identifier::parse("stone").unwrap(),
            Identifier::parse("minecraft:stone").unwrap()
        );
        assert_eq!(Identifier::parse("stone").unwrap().to_string(), "stone");
    }

    #[test]
    fn path_segments() {
        let identifier = Identifier::parse("minecraft:worldgen/biome").unwrap();
        assert_eq!(identifier.namespace(), "minecraft");
        assert_eq!(identifier.value(), "worldgen/biome");
        assert!(Identifier::parse("worldgen/biome").is_ok());
    }

    #[test]
    fn rejects_bad_identifiers() {
        assert_eq!(
            Identifier::parse("minecraft:Stone"),
            Err(IdentifierParseError::IllegalCharacter(
                "minecraft:Stone".to_owned(),
                10
            ))
        );
        assert!(matches!(
            Identifier::parse("a/b:c"),
            Err(IdentifierParseError::IllegalCharacter(_, 3))
        ));
        assert!(matches!(
            Identifier::parse("a:b:c"),
            Err(IdentifierParseError::IllegalCharacter(_, 3))
        ));
        assert!(matches!(
            Identifier::parse("minecraft:"),
            Err(IdentifierParseError::EmptyValue(_))
        ));
        assert!(matches!(
            Identifier::parse(&"a".repeat(IDENTIFIER_MAX_LEN + 1)),
            Err(IdentifierParseError::TooLong(_))
        ));
    }
}
