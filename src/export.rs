//! Flat-file serialization of a directory, plus the printable listing.
//!
//! The format is line-oriented text in three sections: a header with the
//! element count and the id counter, one block per person in presentation
//! order, and a trailing relations section listing each person's outgoing
//! edges in list order.
//!
//! ```text
//! knowbook address directory
//! elements: 2, next id: 3
//!
//! person, id 1
//! name: Jan _ Kowalski
//! phone: 555123456
//! address: Polna, 10/2, 01-234, Gdansk
//!
//! person, id 2
//! ...
//!
//! relations
//!
//! person 1:
//! id 2 Anna Nowak strength: 7
//! ```
//!
//! A missing middle name is the sentinel `_`. Relation lines carry a name
//! snapshot of the target; the reader resolves targets by id and ignores
//! the snapshot. Reading rebuilds the person sequence in file order, then
//! each relation list in file order.

use std::io::{BufRead, Write};

use crate::directory::Directory;
use crate::model::{Address, Person, PersonDetails, PersonId, PostalCode, Relation, Strength};
use crate::{Error, Result};

const HEADER: &str = "knowbook address directory";
const NO_MIDDLE_NAME: &str = "_";

// ============================================================================
// Writing
// ============================================================================

/// Serializes the directory in a form [`read_directory`] can round-trip.
pub fn write_directory(directory: &Directory, writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "{HEADER}")?;
    writeln!(
        writer,
        "elements: {}, next id: {}",
        directory.len(),
        directory.next_id()
    )?;

    for person in directory.persons() {
        writeln!(writer)?;
        writeln!(writer, "person, id {}", person.id())?;
        writeln!(
            writer,
            "name: {} {} {}",
            person.given_name,
            person.middle_name.as_deref().unwrap_or(NO_MIDDLE_NAME),
            person.surname,
        )?;
        writeln!(writer, "phone: {}", person.phone)?;
        let a = &person.address;
        writeln!(
            writer,
            "address: {}, {}/{}, {}, {}",
            a.street, a.house_no, a.apartment_no, a.postal_code, a.city,
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "relations")?;
    for person in directory.persons() {
        writeln!(writer)?;
        writeln!(writer, "person {}:", person.id())?;
        for relation in person.relations() {
            // the target is live by the no-dangling invariant
            let Some(target) = directory.find(relation.target) else {
                continue;
            };
            writeln!(
                writer,
                "id {} {} {} strength: {}",
                relation.target, target.given_name, target.surname, relation.strength,
            )?;
        }
    }
    Ok(())
}

/// Renders the book for humans: every person with address, phone, and
/// acquaintance list, in current presentation order.
pub fn write_listing(directory: &Directory, writer: &mut impl Write) -> Result<()> {
    for person in directory.persons() {
        writeln!(writer, "Id {}: {}", person.id(), full_name(person))?;
        let a = &person.address;
        writeln!(
            writer,
            "address: {} {}/{}, {} {}",
            a.street, a.house_no, a.apartment_no, a.postal_code, a.city,
        )?;
        writeln!(writer, "phone: {}", person.phone)?;
        writeln!(writer, "knows:")?;
        for relation in person.relations() {
            if let Some(target) = directory.find(relation.target) {
                writeln!(
                    writer,
                    "  id {} {} {}, strength {}",
                    relation.target, target.given_name, target.surname, relation.strength,
                )?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Renders a found chain, one person per line, source first.
pub fn write_route(
    directory: &Directory,
    route: &crate::search::Route,
    writer: &mut impl Write,
) -> Result<()> {
    for &stop in &route.stops {
        let person = directory.person(stop)?;
        writeln!(writer, "id {} {} {}", stop, person.given_name, person.surname)?;
    }
    Ok(())
}

fn full_name(person: &Person) -> String {
    match &person.middle_name {
        Some(middle) => format!("{} {} {}", person.given_name, middle, person.surname),
        None => format!("{} {}", person.given_name, person.surname),
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Rebuilds a directory from its serialized form.
pub fn read_directory(reader: impl BufRead) -> Result<Directory> {
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
    let mut parser = Parser { lines: &lines, pos: 0 };

    // --- header ---
    let (no, line) = parser.next().ok_or_else(|| parse_err(1, "empty file"))?;
    if line != HEADER {
        return Err(parse_err(no, format!("expected {HEADER:?}")));
    }
    let (header_no, line) = parser
        .next()
        .ok_or_else(|| parse_err(2, "missing element count"))?;
    let (count, next_id) = parse_counts(header_no, line)?;
    let mut directory = Directory::restore(next_id);

    // --- person blocks, in file order ---
    loop {
        let (no, line) = parser
            .next_nonblank()
            .ok_or_else(|| parse_err(lines.len(), "missing relations section"))?;
        if line == "relations" {
            break;
        }
        let id = parse_prefixed(no, line, "person, id ")?;
        if directory.find(PersonId(id)).is_some() {
            return Err(parse_err(no, format!("duplicate person id {id}")));
        }
        let details = parse_person_details(&mut parser)?;
        directory.restore_person(Person::new(PersonId(id), details));
    }
    if directory.len() != count {
        return Err(parse_err(
            header_no,
            format!("header says {count} persons, file has {}", directory.len()),
        ));
    }

    // --- relation lists, in file order ---
    while let Some((no, line)) = parser.next_nonblank() {
        let owner = line
            .strip_prefix("person ")
            .and_then(|rest| rest.strip_suffix(':'))
            .and_then(|id| id.parse::<u64>().ok())
            .ok_or_else(|| parse_err(no, "expected \"person <id>:\""))?;
        let owner = PersonId(owner);
        if directory.find(owner).is_none() {
            return Err(parse_err(no, format!("unknown person {owner}")));
        }

        while let Some((no, line)) = parser.next() {
            if line.trim().is_empty() {
                break;
            }
            let relation = parse_relation_line(no, line)?;
            if directory.find(owner).is_some_and(|p| p.knows(relation.target)) {
                return Err(parse_err(
                    no,
                    format!("duplicate relation {owner} -> {}", relation.target),
                ));
            }
            if !directory.restore_relation(owner, relation) {
                return Err(parse_err(
                    no,
                    format!("relation targets unknown person {}", relation.target),
                ));
            }
        }
    }

    verify_pairing(&directory, lines.len())?;
    Ok(directory)
}

fn parse_prefixed(no: usize, line: &str, prefix: &str) -> Result<u64> {
    line.strip_prefix(prefix)
        .and_then(|rest| rest.parse().ok())
        .ok_or_else(|| parse_err(no, format!("expected \"{prefix}<id>\"")))
}

fn parse_counts(no: usize, line: &str) -> Result<(usize, u64)> {
    let parsed = line.strip_prefix("elements: ").and_then(|rest| {
        let (count, next_id) = rest.split_once(", next id: ")?;
        Some((count.parse().ok()?, next_id.parse().ok()?))
    });
    parsed.ok_or_else(|| parse_err(no, "expected \"elements: <n>, next id: <n>\""))
}

fn parse_person_details(parser: &mut Parser<'_>) -> Result<PersonDetails> {
    let eof = parser.lines.len();
    let (no, line) = parser.next().ok_or_else(|| parse_err(eof, "truncated person block"))?;
    let name = line
        .strip_prefix("name: ")
        .ok_or_else(|| parse_err(no, "expected \"name: <given> <middle|_> <surname>\""))?;
    let parts: Vec<&str> = name.split_whitespace().collect();
    let [given_name, middle_name, surname] = parts[..] else {
        return Err(parse_err(no, "name needs exactly three tokens"));
    };

    let (no, line) = parser.next().ok_or_else(|| parse_err(no, "truncated person block"))?;
    let phone = line
        .strip_prefix("phone: ")
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| parse_err(no, "expected \"phone: <digits>\""))?;

    let (no, line) = parser.next().ok_or_else(|| parse_err(no, "truncated person block"))?;
    let address = parse_address(no, line)?;

    Ok(PersonDetails {
        given_name: given_name.to_string(),
        middle_name: (middle_name != NO_MIDDLE_NAME).then(|| middle_name.to_string()),
        surname: surname.to_string(),
        address,
        phone,
    })
}

fn parse_address(no: usize, line: &str) -> Result<Address> {
    let err = || parse_err(no, "expected \"address: <street>, <house>/<apartment>, DD-DDD, <city>\"");
    let rest = line.strip_prefix("address: ").ok_or_else(err)?;
    let fields: Vec<&str> = rest.split(", ").collect();
    let [street, numbers, postal_code, city] = fields[..] else {
        return Err(err());
    };
    let (house_no, apartment_no) = numbers
        .split_once('/')
        .and_then(|(h, a)| Some((h.parse().ok()?, a.parse().ok()?)))
        .ok_or_else(err)?;
    let postal_code = PostalCode::parse(postal_code)
        .ok_or_else(|| parse_err(no, format!("postal code {postal_code:?} does not match DD-DDD")))?;

    Ok(Address {
        street: street.to_string(),
        house_no,
        apartment_no,
        postal_code,
        city: city.to_string(),
    })
}

fn parse_relation_line(no: usize, line: &str) -> Result<Relation> {
    let err = || parse_err(no, "expected \"id <target> <given> <surname> strength: <1-10>\"");
    let tokens: Vec<&str> = line.split_whitespace().collect();
    // the two name tokens are a snapshot; only the ids and strength matter
    let ["id", target, _given, _surname, "strength:", strength] = tokens[..] else {
        return Err(err());
    };
    let target = PersonId(target.parse().map_err(|_| err())?);
    let strength = strength
        .parse::<u8>()
        .ok()
        .and_then(Strength::new)
        .ok_or_else(|| parse_err(no, format!("strength {strength:?} is outside 1..=10")))?;
    Ok(Relation { target, strength })
}

/// A loaded file must satisfy the paired-edge invariant, or every mutation
/// after it would operate on a broken graph.
fn verify_pairing(directory: &Directory, last_line: usize) -> Result<()> {
    for person in directory.persons() {
        for relation in person.relations() {
            let paired = directory
                .find(relation.target)
                .is_some_and(|t| t.knows(person.id()));
            if !paired {
                return Err(parse_err(
                    last_line,
                    format!("relation {} -> {} has no reverse entry", person.id(), relation.target),
                ));
            }
        }
    }
    Ok(())
}

fn parse_err(line: usize, message: impl Into<String>) -> Error {
    Error::Parse { line, message: message.into() }
}

struct Parser<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Next line with its 1-based number.
    fn next(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line.as_str()))
    }

    fn next_nonblank(&mut self) -> Option<(usize, &'a str)> {
        loop {
            let (no, line) = self.next()?;
            if !line.trim().is_empty() {
                return Some((no, line));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
