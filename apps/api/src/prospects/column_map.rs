//! Column mapping: resolves user-supplied CSV headers to prospect fields.
//!
//! Each field carries an ordered list of match rules: its canonical name first,
//! then its synonyms. Rules are tried in order, each against every header in
//! file order, and the first header a rule accepts wins. A required field's
//! synonyms form one rule, so the earliest header naming any of them wins.
//! Optional fields try each synonym as its own rule, in list order.
//! Comparison is case-insensitive and ignores surrounding whitespace.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProspectField {
    FirstName,
    LastName,
    Email,
    Company,
    Position,
    Location,
    LinkedInUrl,
    Notes,
    Tags,
}

impl ProspectField {
    /// Fields every import must be able to map.
    pub const REQUIRED: [ProspectField; 5] = [
        ProspectField::FirstName,
        ProspectField::LastName,
        ProspectField::Email,
        ProspectField::Company,
        ProspectField::Position,
    ];

    /// Fields copied when present; never block an import.
    pub const OPTIONAL: [ProspectField; 4] = [
        ProspectField::Location,
        ProspectField::LinkedInUrl,
        ProspectField::Notes,
        ProspectField::Tags,
    ];

    pub fn canonical_name(self) -> &'static str {
        match self {
            ProspectField::FirstName => "firstName",
            ProspectField::LastName => "lastName",
            ProspectField::Email => "email",
            ProspectField::Company => "company",
            ProspectField::Position => "position",
            ProspectField::Location => "location",
            ProspectField::LinkedInUrl => "linkedInUrl",
            ProspectField::Notes => "notes",
            ProspectField::Tags => "tags",
        }
    }

    /// Alternate header spellings, lowercase. Order sets priority for optional fields.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            ProspectField::FirstName => &["first name", "first_name", "firstname"],
            ProspectField::LastName => &["last name", "last_name", "lastname"],
            ProspectField::Email => &["email address", "email_address", "emailaddress"],
            ProspectField::Company => &[
                "company name",
                "company_name",
                "companyname",
                "organization",
            ],
            ProspectField::Position => &["job title", "job_title", "jobtitle", "title", "role"],
            ProspectField::Location => &["location", "city", "state", "country", "address"],
            ProspectField::LinkedInUrl => {
                &["linkedin", "linkedin url", "linkedin_url", "linkedinurl"]
            }
            ProspectField::Notes => &["notes", "comments", "description"],
            ProspectField::Tags => &[],
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// The ordered rule list for this field.
    pub fn match_rules(self) -> Vec<MatchRule> {
        let canonical = MatchRule::Canonical(self.canonical_name());
        if self.is_required() {
            return vec![canonical, MatchRule::Synonyms(self.synonyms())];
        }
        std::iter::once(canonical)
            .chain(
                self.synonyms()
                    .iter()
                    .map(std::slice::from_ref)
                    .map(MatchRule::Synonyms),
            )
            .collect()
    }
}

/// A single header test. Both variants compare case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Canonical(&'static str),
    /// Accepts a header equal to any name in the set.
    Synonyms(&'static [&'static str]),
}

impl MatchRule {
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        match self {
            MatchRule::Canonical(name) => header.eq_ignore_ascii_case(name),
            MatchRule::Synonyms(names) => names.iter().any(|s| header.eq_ignore_ascii_case(s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required columns: {}", .missing.join(", "))]
pub struct MissingColumns {
    pub missing: Vec<&'static str>,
}

/// Field → column index for one CSV header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: BTreeMap<ProspectField, usize>,
}

impl ColumnMapping {
    pub fn index_of(&self, field: ProspectField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Canonical name → header text, for the fields that were matched.
    pub fn resolved_headers<'h>(&self, headers: &'h [String]) -> BTreeMap<&'static str, &'h str> {
        self.columns
            .iter()
            .map(|(field, idx)| (field.canonical_name(), headers[*idx].as_str()))
            .collect()
    }
}

/// Returns the index of the first header accepted by the earliest matching rule.
pub fn find_column(field: ProspectField, headers: &[String]) -> Option<usize> {
    field
        .match_rules()
        .iter()
        .find_map(|rule| headers.iter().position(|h| rule.matches(h)))
}

/// Maps every required and optional field. Fails listing all unmatched required fields.
pub fn map_columns(headers: &[String]) -> Result<ColumnMapping, MissingColumns> {
    let mut columns = BTreeMap::new();
    let mut missing = Vec::new();

    for field in ProspectField::REQUIRED {
        match find_column(field, headers) {
            Some(idx) => {
                columns.insert(field, idx);
            }
            None => missing.push(field.canonical_name()),
        }
    }

    if !missing.is_empty() {
        return Err(MissingColumns { missing });
    }

    for field in ProspectField::OPTIONAL {
        if let Some(idx) = find_column(field, headers) {
            columns.insert(field, idx);
        }
    }

    Ok(ColumnMapping { columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(line: &str) -> Vec<String> {
        line.split(',').map(String::from).collect()
    }

    fn canonical_set(mapping: &ColumnMapping) -> Vec<ProspectField> {
        ProspectField::REQUIRED
            .into_iter()
            .filter(|f| mapping.index_of(*f).is_some())
            .collect()
    }

    #[test]
    fn test_exact_names_map() {
        let h = headers("firstName,lastName,email,company,position");
        let mapping = map_columns(&h).unwrap();
        assert_eq!(mapping.index_of(ProspectField::FirstName), Some(0));
        assert_eq!(mapping.index_of(ProspectField::Position), Some(4));
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let h = headers("FIRSTNAME,LastName,Email,COMPANY,Position");
        assert!(map_columns(&h).is_ok());
    }

    #[test]
    fn test_synonym_header_resolves_same_canonical_set() {
        let exact = map_columns(&headers("firstName,lastName,email,company,position")).unwrap();
        let spaced = headers("First Name,Last Name,Email,Company,Position");
        let synonym = map_columns(&spaced).unwrap();
        assert_eq!(canonical_set(&exact), canonical_set(&synonym));
        assert_eq!(synonym.index_of(ProspectField::FirstName), Some(0));
        assert_eq!(
            synonym.resolved_headers(&spaced)["firstName"],
            "First Name"
        );
    }

    #[test]
    fn test_alternate_synonyms() {
        let h = headers("first_name,LASTNAME,Email Address,Organization,Job Title");
        let mapping = map_columns(&h).unwrap();
        assert_eq!(mapping.index_of(ProspectField::Company), Some(3));
        assert_eq!(mapping.index_of(ProspectField::Position), Some(4));
    }

    #[test]
    fn test_header_whitespace_ignored() {
        let h = headers(" firstName , lastName,email ,company,  role ");
        assert!(map_columns(&h).is_ok());
    }

    #[test]
    fn test_missing_columns_lists_every_unmatched_field_in_order() {
        let h = headers("firstName,phone,company");
        let err = map_columns(&h).unwrap_err();
        assert_eq!(err.missing, vec!["lastName", "email", "position"]);
        assert_eq!(
            err.to_string(),
            "Missing required columns: lastName, email, position"
        );
    }

    #[test]
    fn test_empty_header_row_misses_everything() {
        let err = map_columns(&[]).unwrap_err();
        assert_eq!(err.missing.len(), 5);
    }

    #[test]
    fn test_canonical_rule_beats_earlier_synonym_header() {
        let h = headers("title,firstName,lastName,email,company,position");
        let mapping = map_columns(&h).unwrap();
        assert_eq!(mapping.index_of(ProspectField::Position), Some(5));
    }

    #[test]
    fn test_required_synonyms_follow_header_order() {
        let h = headers("firstName,lastName,email,company,Role,Title");
        let mapping = map_columns(&h).unwrap();
        assert_eq!(mapping.index_of(ProspectField::Position), Some(4));

        let h = headers("Organization,First Name,lastName,email,Company Name,position");
        let mapping = map_columns(&h).unwrap();
        assert_eq!(mapping.index_of(ProspectField::Company), Some(0));
    }

    #[test]
    fn test_optional_synonym_priority_follows_list_order() {
        let h = headers("firstName,lastName,email,company,position,City,Location");
        let mapping = map_columns(&h).unwrap();
        assert_eq!(mapping.index_of(ProspectField::Location), Some(6));
    }

    #[test]
    fn test_optional_fields_mapped_when_present() {
        let h = headers("firstName,lastName,email,company,position,LinkedIn URL,Comments,Tags");
        let mapping = map_columns(&h).unwrap();
        assert_eq!(mapping.index_of(ProspectField::LinkedInUrl), Some(5));
        assert_eq!(mapping.index_of(ProspectField::Notes), Some(6));
        assert_eq!(mapping.index_of(ProspectField::Tags), Some(7));
        assert_eq!(mapping.index_of(ProspectField::Location), None);
    }

    #[test]
    fn test_match_rules_start_with_canonical_name() {
        let rules = ProspectField::Email.match_rules();
        assert_eq!(rules[0], MatchRule::Canonical("email"));
        assert_eq!(
            rules[1],
            MatchRule::Synonyms(&["email address", "email_address", "emailaddress"])
        );
        assert_eq!(rules.len(), 2);

        let rules = ProspectField::Notes.match_rules();
        assert_eq!(rules[1], MatchRule::Synonyms(&["notes"]));
        assert_eq!(rules.len(), 4);
    }
}
