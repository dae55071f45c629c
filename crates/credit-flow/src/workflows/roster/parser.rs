use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::{RosterImportError, Signatory, SignatoryRole};
use crate::workflows::credit::approvals::SignatoryId;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<Signatory>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut signatories = Vec::new();
    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        let id = row
            .director_id
            .ok_or(RosterImportError::MissingId { row: index + 1 })?;

        signatories.push(Signatory {
            id: SignatoryId(id),
            name: row.name.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            role: row
                .role
                .as_deref()
                .map(SignatoryRole::from_label)
                .unwrap_or(SignatoryRole::BoardMember),
        });
    }

    Ok(signatories)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(
        rename = "Director ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    director_id: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "Role", default, deserialize_with = "empty_string_as_none")]
    role: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
