use crate::domain::row::Row;
use crate::error::CoreError;

pub const DEFAULT_CONTACT_ID_COLUMN: &str = "CID";
pub const DEFAULT_ACCOUNT_ID_COLUMN: &str = "AID";
pub const DEFAULT_PHONE_COLUMN: &str = "Phone";
pub const DEFAULT_DISPLAY_NAME_COLUMN: &str = "Name";
pub const DEFAULT_DISPLAY_NAME_ALIASES: [&str; 2] = ["Name", "Customer Name"];

/// Required columns of an input sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    contact_id: String,
    account_id: String,
    phone: String,
    display_name: String,
    display_name_aliases: Vec<String>,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            contact_id: DEFAULT_CONTACT_ID_COLUMN.to_string(),
            account_id: DEFAULT_ACCOUNT_ID_COLUMN.to_string(),
            phone: DEFAULT_PHONE_COLUMN.to_string(),
            display_name: DEFAULT_DISPLAY_NAME_COLUMN.to_string(),
            display_name_aliases: DEFAULT_DISPLAY_NAME_ALIASES
                .iter()
                .map(|alias| alias.to_string())
                .collect(),
        }
    }
}

impl ColumnSchema {
    /// The canonical display-name column is always an accepted spelling.
    pub fn new(
        contact_id: &str,
        account_id: &str,
        phone: &str,
        display_name: &str,
        display_name_aliases: &[String],
    ) -> Result<Self, CoreError> {
        let display_name = column_name(display_name)?;
        let mut aliases = vec![display_name.clone()];
        for alias in display_name_aliases {
            let alias = column_name(alias)?;
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }

        Ok(Self {
            contact_id: column_name(contact_id)?,
            account_id: column_name(account_id)?,
            phone: column_name(phone)?,
            display_name,
            display_name_aliases: aliases,
        })
    }

    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn display_name_aliases(&self) -> &[String] {
        &self.display_name_aliases
    }

    /// Column order used when writing cleaned rows back out.
    pub fn export_columns(&self) -> [&str; 4] {
        [
            self.contact_id(),
            self.account_id(),
            self.display_name.as_str(),
            self.phone.as_str(),
        ]
    }

    /// Checks the required columns against a header row and returns the
    /// spelling of the display-name column it uses.
    pub fn validate(&self, row: &Row) -> Result<String, CoreError> {
        require(row, &self.contact_id)?;
        require(row, &self.account_id)?;
        let display_source = self
            .display_name_aliases
            .iter()
            .find(|alias| row.contains(alias))
            .cloned()
            .ok_or_else(|| CoreError::MissingColumn {
                column: self.display_name.clone(),
                accepted: self.display_name_aliases.clone(),
            })?;
        require(row, &self.phone)?;
        Ok(display_source)
    }

    /// Copies a row with its display-name column under the canonical name.
    pub fn canonicalize(&self, row: &Row, display_source: &str) -> Row {
        let mut row = row.clone();
        row.rename(display_source, &self.display_name);
        row
    }
}

fn require(row: &Row, column: &str) -> Result<(), CoreError> {
    if row.contains(column) {
        Ok(())
    } else {
        Err(CoreError::MissingColumn {
            column: column.to_string(),
            accepted: vec![column.to_string()],
        })
    }
}

fn column_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidColumnName);
    }
    Ok(trimmed.to_string())
}
