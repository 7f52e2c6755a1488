//! Episode Credits
//!
//! The remote catalog sends episode credits as flat string lists. Directors
//! and writers are plain names. Guest stars are `"Name (Role)"` entries, but
//! upstream data is inconsistent: a guest star with several roles is often
//! split across consecutive entries (`"Name (Role1"`, `"Role2"`, `"Role3)"`).

use crate::models::{Person, PersonKind};

/// Plain name credits: trimmed, blanks and duplicates dropped, order kept.
pub fn parse_names(entries: &[String], kind: PersonKind) -> Vec<Person> {
    let mut people: Vec<Person> = Vec::with_capacity(entries.len());
    for name in entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        if !people.iter().any(|p| p.name == name) {
            people.push(Person::new(name, kind));
        }
    }
    people
}

/// Rebuild guest stars and their roles from `"Name (Role)"` entries.
///
/// An entry that opens a parenthesis without closing it starts a multi-role
/// credit: the following entries are taken as further roles up to and
/// including the one holding the closing parenthesis. An unterminated credit
/// runs to the end of the list.
///
/// # Examples
///
/// ```
/// use marquee_resolver::credits::parse_guest_stars;
///
/// let entries = ["John Doe (Role1", "Role2", "Role3)", "Jane Roe (Solo)"].map(String::from);
/// let people = parse_guest_stars(&entries);
/// assert_eq!(people.len(), 2);
/// assert_eq!(people[0].role.as_deref(), Some("Role1, Role2, Role3"));
/// assert_eq!(people[1].role.as_deref(), Some("Solo"));
/// ```
pub fn parse_guest_stars(entries: &[String]) -> Vec<Person> {
    let mut people = Vec::new();
    let mut entries = entries.iter().map(|e| e.trim());
    while let Some(entry) = entries.next() {
        if entry.is_empty() {
            continue;
        }
        let Some(open) = entry.find('(') else {
            people.push(Person::new(entry, PersonKind::GuestStar));
            continue;
        };
        let name = entry[..open].trim();
        let first = &entry[open + 1..];
        let mut roles: Vec<&str> = Vec::new();
        match first.find(')') {
            Some(close) => roles.push(&first[..close]),
            None => {
                roles.push(first);
                for next in entries.by_ref() {
                    if let Some(close) = next.find(')') {
                        roles.push(&next[..close]);
                        break;
                    }
                    roles.push(next);
                }
            },
        }
        if name.is_empty() {
            continue;
        }
        let role = roles.iter().map(|r| r.trim()).filter(|r| !r.is_empty()).collect::<Vec<_>>().join(", ");
        let person = Person::new(name, PersonKind::GuestStar);
        people.push(if role.is_empty() { person } else { person.with_role(role) });
    }
    people
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    fn roles(people: &[Person]) -> Vec<(&str, Option<&str>)> {
        people.iter().map(|p| (p.name.as_str(), p.role.as_deref())).collect()
    }

    #[test]
    fn test_multi_entry_roles() {
        let people = parse_guest_stars(&strings(&["John Doe (Role1", "Role2", "Role3)", "Jane Roe (Solo)"]));
        assert_eq!(roles(&people), vec![("John Doe", Some("Role1, Role2, Role3")), ("Jane Roe", Some("Solo"))]);
        assert!(people.iter().all(|p| p.kind == PersonKind::GuestStar));
    }

    #[rstest]
    #[case(&["Jane Roe"], vec![("Jane Roe", None)])]
    #[case(&["Jane Roe ()"], vec![("Jane Roe", None)])]
    #[case(&["  Jane Roe  ( Herself )  "], vec![("Jane Roe", Some("Herself"))])]
    #[case(&["", "Jane Roe (Solo)", "  "], vec![("Jane Roe", Some("Solo"))])]
    #[case(&["John Doe (Role1", "Role2"], vec![("John Doe", Some("Role1, Role2"))])]
    #[case(&["John Doe (Role1", "", "Role2)"], vec![("John Doe", Some("Role1, Role2"))])]
    #[case(&["(Uncredited)", "Jane Roe (Solo)"], vec![("Jane Roe", Some("Solo"))])]
    #[case(&["A (X", "B (Y)", "C (Z)"], vec![("A", Some("X, B (Y")), ("C", Some("Z"))])]
    fn test_guest_star_edge_cases(#[case] entries: &[&str], #[case] expected: Vec<(&str, Option<&str>)>) {
        assert_eq!(roles(&parse_guest_stars(&strings(entries))), expected);
    }

    #[test]
    fn test_parse_names() {
        let people = parse_names(&strings(&[" Ann Director ", "", "Bo Director", "Ann Director"]), PersonKind::Director);
        assert_eq!(roles(&people), vec![("Ann Director", None), ("Bo Director", None)]);
        assert!(people.iter().all(|p| p.kind == PersonKind::Director));
    }
}
