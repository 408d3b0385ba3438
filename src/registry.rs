//! Registry parsing: features, extensions, and command signatures.
//!
//! The cl.xml registry mixes plain text with `<type>` and `<name>` elements
//! inside `<proto>` and `<param>` nodes. Each node is scanned into two
//! ordered fragment sequences, one before the declared name and one after
//! it, which are joined exactly once into a [`Type`].

use std::collections::HashSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::{Error, Result};

/// A C declaration split around the declared name.
///
/// `prefix` holds everything before the name (base type, qualifiers and
/// pointer stars); `suffix` holds what follows it (array brackets or trailing
/// stars in postfix position). `prefix + " " + name + suffix` reconstructs
/// the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    prefix: String,
    suffix: String,
}

impl Type {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let suffix = suffix.into();
        Self {
            prefix: prefix.trim().to_string(),
            suffix: suffix.trim().to_string(),
        }
    }

    /// The declaration with `name` in declarator position,
    /// e.g. `const char* name[]`.
    pub fn with_name(&self, name: &str) -> String {
        format!("{} {}{}", self.prefix, name, self.suffix)
    }

    /// The bare type text, e.g. `cl_int*`.
    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.suffix)
    }
}

/// An identifier paired with its type. Used for the return value (where the
/// name is the command name) and for every parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAndType {
    pub name: String,
    pub ty: Type,
}

impl NameAndType {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One API function. Slot 0 is the return value, whose name is the command
/// name; the remaining slots are parameters in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    slots: Vec<NameAndType>,
}

impl Command {
    /// `slots[0]` must be the return value.
    pub fn new(slots: Vec<NameAndType>) -> Self {
        debug_assert!(!slots.is_empty());
        Self { slots }
    }

    pub fn name(&self) -> &str {
        &self.slots[0].name
    }

    pub fn return_type(&self) -> &Type {
        &self.slots[0].ty
    }

    pub fn params(&self) -> &[NameAndType] {
        &self.slots[1..]
    }
}

/// A version milestone and the commands it introduces.
#[derive(Debug, Clone)]
pub struct Feature {
    pub version: String,
    pub commands: Vec<String>,
}

/// An optionally-enabled capability and the commands it introduces.
#[derive(Debug, Clone)]
pub struct Extension {
    pub name: String,
    pub commands: Vec<String>,
}

/// The parsed registry. Immutable once built; the command table keeps
/// document order.
#[derive(Debug, Default)]
pub struct Registry {
    pub features: Vec<Feature>,
    pub extensions: Vec<Extension>,
    pub commands: Vec<Command>,
}

impl Registry {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut registry = Registry::default();
        let mut saw_commands = false;
        loop {
            match read(&mut reader)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"feature" => {
                        let version = required_attr(&e, "number", "feature")?;
                        let commands = collect_command_refs(&mut reader)?;
                        registry.features.push(Feature { version, commands });
                    }
                    b"extensions" => {
                        collect_extensions(&mut reader, &mut registry.extensions)?;
                    }
                    b"commands" => {
                        if saw_commands {
                            return Err(Error::MalformedRegistry(
                                "more than one <commands> table".into(),
                            ));
                        }
                        saw_commands = true;
                        collect_commands(&mut reader, &mut registry.commands)?;
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        registry.validate()?;
        Ok(registry)
    }

    /// Command names must be unique, and every name a feature or extension
    /// references must exist in the command table.
    fn validate(&self) -> Result<()> {
        let mut known: HashSet<&str> = HashSet::new();
        for command in &self.commands {
            if !known.insert(command.name()) {
                return Err(Error::MalformedRegistry(format!(
                    "duplicate command `{}`",
                    command.name()
                )));
            }
        }
        for feature in &self.features {
            for name in &feature.commands {
                if !known.contains(name.as_str()) {
                    return Err(Error::MalformedRegistry(format!(
                        "feature {} references unknown command `{name}`",
                        feature.version
                    )));
                }
            }
        }
        for extension in &self.extensions {
            for name in &extension.commands {
                if !known.contains(name.as_str()) {
                    return Err(Error::MalformedRegistry(format!(
                        "extension {} references unknown command `{name}`",
                        extension.name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn read<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>> {
    reader
        .read_event()
        .map_err(|e| Error::MalformedRegistry(format!("invalid xml: {e}")))
}

fn required_attr(e: &BytesStart<'_>, key: &str, element: &str) -> Result<String> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| Error::MalformedRegistry(format!("bad attribute on <{element}>: {err}")))?
        .ok_or_else(|| {
            Error::MalformedRegistry(format!("<{element}> is missing the `{key}` attribute"))
        })?;
    let value = attr
        .unescape_value()
        .map_err(|err| Error::MalformedRegistry(format!("bad `{key}` value on <{element}>: {err}")))?;
    Ok(value.into_owned())
}

/// Consume events up to and including the end tag matching the opening tag
/// that was just consumed.
fn skip_subtree(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut depth = 0usize;
    loop {
        match read(reader)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::MalformedRegistry("unterminated element".into())),
            _ => {}
        }
    }
    Ok(())
}

/// Collect the `name` attribute of every `<command>` reference in the subtree
/// whose opening tag was just consumed.
fn collect_command_refs(reader: &mut Reader<&[u8]>) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    loop {
        match read(reader)? {
            Event::Start(e) => {
                if e.name().as_ref() == b"command" {
                    names.push(required_attr(&e, "name", "command")?);
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"command" {
                    names.push(required_attr(&e, "name", "command")?);
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => return Err(Error::MalformedRegistry("unterminated element".into())),
            _ => {}
        }
    }
    Ok(names)
}

fn collect_extensions(reader: &mut Reader<&[u8]>, out: &mut Vec<Extension>) -> Result<()> {
    loop {
        match read(reader)? {
            Event::Start(e) => {
                if e.name().as_ref() == b"extension" {
                    let name = required_attr(&e, "name", "extension")?;
                    let commands = collect_command_refs(reader)?;
                    out.push(Extension { name, commands });
                } else {
                    skip_subtree(reader)?;
                }
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"extension" {
                    let name = required_attr(&e, "name", "extension")?;
                    out.push(Extension {
                        name,
                        commands: Vec::new(),
                    });
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(Error::MalformedRegistry("unterminated <extensions>".into())),
            _ => {}
        }
    }
    Ok(())
}

fn collect_commands(reader: &mut Reader<&[u8]>, out: &mut Vec<Command>) -> Result<()> {
    loop {
        match read(reader)? {
            Event::Start(e) => {
                if e.name().as_ref() == b"command" {
                    out.push(parse_command(reader)?);
                } else {
                    skip_subtree(reader)?;
                }
            }
            Event::Empty(_) => {}
            Event::End(_) => break,
            Event::Eof => return Err(Error::MalformedRegistry("unterminated <commands>".into())),
            _ => {}
        }
    }
    Ok(())
}

fn parse_command(reader: &mut Reader<&[u8]>) -> Result<Command> {
    let mut slots: Vec<NameAndType> = Vec::new();
    loop {
        match read(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"proto" => {
                    if !slots.is_empty() {
                        return Err(Error::MalformedRegistry(
                            "<command> has more than one <proto>".into(),
                        ));
                    }
                    slots.push(parse_declaration(reader)?);
                }
                b"param" => {
                    if slots.is_empty() {
                        return Err(Error::MalformedRegistry(
                            "<param> precedes <proto> in <command>".into(),
                        ));
                    }
                    slots.push(parse_declaration(reader)?);
                }
                other => {
                    return Err(Error::MalformedRegistry(format!(
                        "unexpected <{}> in <command>",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::End(_) => break,
            Event::Eof => return Err(Error::MalformedRegistry("unterminated <command>".into())),
            _ => {}
        }
    }
    if slots.is_empty() {
        return Err(Error::MalformedRegistry("<command> without <proto>".into()));
    }
    Ok(Command::new(slots))
}

/// One lexical piece of a declaration. `*` binds tightly to whatever
/// precedes it; everything else is space-joined.
#[derive(Debug)]
struct Fragment {
    text: String,
    tight: bool,
}

/// Two-phase declaration scanner: fragments land in the pre-name buffer
/// until the `<name>` child is seen, then in the post-name buffer. Joined
/// exactly once by [`Composer::finish`].
#[derive(Debug, Default)]
struct Composer {
    bufs: [Vec<Fragment>; 2],
    post: bool,
}

impl Composer {
    fn push(&mut self, text: &str, star_binds: bool) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.bufs[self.post as usize].push(Fragment {
            text: text.to_string(),
            tight: star_binds && text == "*",
        });
    }

    fn finish(self) -> Type {
        fn join(fragments: Vec<Fragment>) -> String {
            let mut joined = String::new();
            for fragment in fragments {
                if !fragment.tight && !joined.is_empty() {
                    joined.push(' ');
                }
                joined.push_str(&fragment.text);
            }
            joined
        }
        let [pre, post] = self.bufs;
        Type::new(join(pre), join(post))
    }
}

#[derive(Debug, Clone, Copy)]
enum Child {
    Type,
    Name,
}

/// Parse the mixed content of a `<proto>` or `<param>` whose opening tag was
/// just consumed.
fn parse_declaration(reader: &mut Reader<&[u8]>) -> Result<NameAndType> {
    let mut composer = Composer::default();
    let mut name: Option<String> = None;
    let mut child: Option<Child> = None;

    loop {
        match read(reader)? {
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|err| Error::MalformedRegistry(format!("bad text node: {err}")))?;
                match child {
                    None => composer.push(&text, true),
                    Some(Child::Type) => composer.push(&text, false),
                    Some(Child::Name) => match name.as_mut() {
                        Some(existing) => existing.push_str(text.trim()),
                        None => name = Some(text.trim().to_string()),
                    },
                }
            }
            Event::Start(e) => match e.name().as_ref() {
                b"type" => child = Some(Child::Type),
                b"name" => {
                    if composer.post || name.is_some() {
                        return Err(Error::MalformedRegistry(
                            "declaration has more than one <name>".into(),
                        ));
                    }
                    child = Some(Child::Name);
                }
                other => {
                    return Err(Error::MalformedRegistry(format!(
                        "unexpected <{}> in declaration",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Empty(e) => {
                return Err(Error::MalformedRegistry(format!(
                    "unexpected <{}> in declaration",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::End(e) => match e.name().as_ref() {
                b"type" => child = None,
                b"name" => {
                    child = None;
                    composer.post = true;
                }
                _ => break,
            },
            Event::Eof => return Err(Error::MalformedRegistry("unterminated declaration".into())),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| Error::MalformedRegistry("declaration without <name>".into()))?;
    Ok(NameAndType::new(name, composer.finish()))
}
