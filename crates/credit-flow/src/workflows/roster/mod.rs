//! Authorized-signatory roster: the directory consulted when signature
//! requests go out, plus a CSV importer for customer-supplied director lists.

mod parser;

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::workflows::credit::approvals::SignatoryId;

/// Board roles recognized on import. Unknown labels fall back to
/// `BoardMember` rather than failing the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatoryRole {
    ManagingDirector,
    FinanceDirector,
    OperationsDirector,
    BoardMember,
}

impl SignatoryRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ManagingDirector => "Managing Director",
            Self::FinanceDirector => "Finance Director",
            Self::OperationsDirector => "Operations Director",
            Self::BoardMember => "Board Member",
        }
    }

    pub(crate) fn from_label(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "managing director" | "md" | "ceo" => Self::ManagingDirector,
            "finance director" | "fd" | "cfo" => Self::FinanceDirector,
            "operations director" | "od" | "coo" => Self::OperationsDirector,
            _ => Self::BoardMember,
        }
    }
}

/// One authorized signatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signatory {
    pub id: SignatoryId,
    pub name: String,
    pub email: String,
    pub role: SignatoryRole,
}

/// Deduplicated set of signatories eligible to approve requests.
#[derive(Debug, Clone, Default)]
pub struct SignatoryDirectory {
    signatories: Vec<Signatory>,
}

impl SignatoryDirectory {
    /// Build a directory, keeping the first entry per signatory id.
    pub fn new(entries: Vec<Signatory>) -> Self {
        let mut signatories: Vec<Signatory> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !signatories.iter().any(|existing| existing.id == entry.id) {
                signatories.push(entry);
            }
        }
        Self { signatories }
    }

    /// Built-in roster used by demos and tests.
    pub fn standard() -> Self {
        Self::new(vec![
            Signatory {
                id: SignatoryId("dir-aoife".to_string()),
                name: "Aoife Brennan".to_string(),
                email: "aoife.brennan@example.ie".to_string(),
                role: SignatoryRole::ManagingDirector,
            },
            Signatory {
                id: SignatoryId("dir-marc".to_string()),
                name: "Marc Delacroix".to_string(),
                email: "marc.delacroix@example.ie".to_string(),
                role: SignatoryRole::FinanceDirector,
            },
            Signatory {
                id: SignatoryId("dir-sile".to_string()),
                name: "Síle Nic Dhomhnaill".to_string(),
                email: "sile.nd@example.ie".to_string(),
                role: SignatoryRole::OperationsDirector,
            },
            Signatory {
                id: SignatoryId("dir-tomas".to_string()),
                name: "Tomás Ó Ríordáin".to_string(),
                email: "tomas.oriordain@example.ie".to_string(),
                role: SignatoryRole::BoardMember,
            },
        ])
    }

    pub fn signatories(&self) -> &[Signatory] {
        &self.signatories
    }

    pub fn ids(&self) -> Vec<SignatoryId> {
        self.signatories
            .iter()
            .map(|signatory| signatory.id.clone())
            .collect()
    }

    pub fn contains(&self, id: &SignatoryId) -> bool {
        self.signatories.iter().any(|signatory| &signatory.id == id)
    }

    pub fn len(&self) -> usize {
        self.signatories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatories.is_empty()
    }
}

/// Roster import failures.
#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("unable to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed roster row: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster row {row} is missing a director id")]
    MissingId { row: usize },
    #[error("roster contains no signatories")]
    Empty,
}

/// Builds a `SignatoryDirectory` from a CSV export with the columns
/// `Director ID,Name,Email,Role`.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path(path: PathBuf) -> Result<SignatoryDirectory, RosterImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SignatoryDirectory, RosterImportError> {
        let entries = parser::parse_records(reader)?;
        if entries.is_empty() {
            return Err(RosterImportError::Empty);
        }
        Ok(SignatoryDirectory::new(entries))
    }
}
